use clap::{Args, Subcommand};
use serde_json::Value;

use super::submit;
use crate::cli::config::Admin;
use crate::cli::utils::{output_record, output_rows, report_mutation};
use crate::drawer::forms::{EntityBusinessForm, EntitySimpleForm, TenantForm};
use crate::drawer::Drawer;
use crate::list::matches_search;
use crate::mutation::RowActions;
use crate::resources::{Tenant, TENANTS};
use crate::tenants::{list_tenants, load_entity};

#[derive(Subcommand)]
pub enum TenantCommands {
    #[command(about = "List tenants with their domains")]
    List {
        #[arg(long, help = "Filter by name")]
        search: Option<String>,
    },

    #[command(about = "Create a tenant")]
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, help = "PRGI registration number")]
        prgi: Option<String>,
        #[arg(long, help = "State id")]
        state: String,
    },

    #[command(about = "Show a tenant's publisher entity")]
    Entity { id: String },

    #[command(about = "Mark a tenant's PRGI registration verified")]
    PrgiVerify { id: String },

    #[command(about = "Reject a tenant's PRGI registration")]
    PrgiReject {
        id: String,
        #[arg(long)]
        reason: String,
    },

    #[command(about = "Save registration details")]
    EntitySimple {
        id: String,
        #[command(flatten)]
        fields: EntitySimpleArgs,
    },

    #[command(about = "Save printing and address details")]
    EntityBusiness {
        id: String,
        #[command(flatten)]
        fields: EntityBusinessArgs,
    },
}

/// Unset flags keep the stored value.
#[derive(Args, Debug, Default)]
pub struct EntitySimpleArgs {
    #[arg(long, help = "e.g. DAILY, WEEKLY")]
    pub periodicity: Option<String>,
    #[arg(long, help = "YYYY-MM-DD")]
    pub registration_date: Option<String>,
    #[arg(long)]
    pub admin_mobile: Option<String>,
    #[arg(long)]
    pub publisher_mobile: Option<String>,
    #[arg(long)]
    pub publisher_name: Option<String>,
    #[arg(long)]
    pub editor_name: Option<String>,
    #[arg(long)]
    pub printing_press_name: Option<String>,
    #[arg(long)]
    pub printing_city_name: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long, help = "Language id")]
    pub language: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct EntityBusinessArgs {
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub printing_press_name: Option<String>,
    #[arg(long)]
    pub printing_city_name: Option<String>,
    #[arg(long, help = "District id")]
    pub printing_district: Option<String>,
    #[arg(long, help = "Mandal id")]
    pub printing_mandal: Option<String>,
}

fn apply(target: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *target = v;
    }
}

fn tenant_row(tenant: &Tenant) -> anyhow::Result<Value> {
    let mut row = serde_json::to_value(tenant)?;
    row["primaryDomain"] = tenant.primary_domain().map(|d| d.domain.clone()).into();
    Ok(row)
}

pub async fn handle(cmd: TenantCommands, admin: &Admin) -> anyhow::Result<()> {
    match cmd {
        TenantCommands::List { search } => {
            let tenants = list_tenants(&admin.client).await?;
            let rows = tenants.iter().map(tenant_row).collect::<anyhow::Result<Vec<_>>>()?;
            let needle = search.unwrap_or_default();
            let visible: Vec<&Value> = rows.iter().filter(|r| matches_search(r, TENANTS.search_keys, &needle)).collect();
            let columns = [
                ("ID", "id"),
                ("NAME", "name"),
                ("PRGI", "prgiNumber"),
                ("PRGI STATUS", "prgiStatus"),
                ("PRIMARY DOMAIN", "primaryDomain"),
                ("DOMAINS", "domains"),
            ];
            output_rows(&admin.output, TENANTS.name, &columns, &visible, None, "No tenants found")
        }
        TenantCommands::Create { name, prgi, state } => {
            let form = TenantForm { name, prgi_number: prgi.unwrap_or_default(), state_id: state };
            submit(admin, Drawer::create(form), "Tenant created").await
        }
        TenantCommands::Entity { id } => match load_entity(&admin.client, &id).await? {
            Some(entity) => output_record(&admin.output, "entity", &serde_json::to_value(entity)?),
            None => output_record(&admin.output, "entity", &Value::Null),
        },
        TenantCommands::PrgiVerify { id } => {
            let outcome = RowActions::new(admin.client.clone()).prgi_verify(&id).await?;
            report_mutation(&admin.output, outcome, "PRGI verified")
        }
        TenantCommands::PrgiReject { id, reason } => {
            let outcome = RowActions::new(admin.client.clone()).prgi_reject(&id, &reason).await?;
            report_mutation(&admin.output, outcome, "PRGI rejected")
        }
        TenantCommands::EntitySimple { id, fields } => {
            let entity = load_entity(&admin.client, &id).await?.unwrap_or_default();
            let mut form = EntitySimpleForm::from_entity(&id, &entity);
            apply(&mut form.periodicity, fields.periodicity);
            apply(&mut form.registration_date, fields.registration_date);
            apply(&mut form.admin_mobile, fields.admin_mobile);
            apply(&mut form.publisher_mobile, fields.publisher_mobile);
            apply(&mut form.publisher_name, fields.publisher_name);
            apply(&mut form.editor_name, fields.editor_name);
            apply(&mut form.printing_press_name, fields.printing_press_name);
            apply(&mut form.printing_city_name, fields.printing_city_name);
            apply(&mut form.address, fields.address);
            apply(&mut form.language_id, fields.language);
            submit(admin, Drawer::edit(id, form), "Entity details saved").await
        }
        TenantCommands::EntityBusiness { id, fields } => {
            let entity = load_entity(&admin.client, &id).await?.unwrap_or_default();
            let mut form = EntityBusinessForm::from_entity(&id, &entity);
            apply(&mut form.address, fields.address);
            apply(&mut form.printing_press_name, fields.printing_press_name);
            apply(&mut form.printing_city_name, fields.printing_city_name);
            apply(&mut form.printing_district_id, fields.printing_district);
            apply(&mut form.printing_mandal_id, fields.printing_mandal);
            submit(admin, Drawer::edit(id, form), "Business details saved").await
        }
    }
}
