use clap::Subcommand;
use serde_json::{json, Value};

use super::{split_csv, submit};
use crate::cli::config::Admin;
use crate::cli::utils::output_rows;
use crate::cli::OutputFormat;
use crate::drawer::forms::{DomainCategoriesForm, DomainForm, DomainVerifyForm, VerifyMethod};
use crate::drawer::Drawer;
use crate::tenants::{find_tenant, tenant_categories};

#[derive(Subcommand)]
pub enum DomainCommands {
    #[command(about = "List a tenant's domains and enabled categories")]
    List { tenant: String },

    #[command(about = "Add a domain to a tenant")]
    Add {
        tenant: String,
        domain: String,
        #[arg(long, help = "Make this the tenant's primary domain")]
        primary: bool,
    },

    #[command(about = "Add epaper.<primary domain> to a tenant")]
    AddEpaper { tenant: String },

    #[command(about = "Start or re-run verification of a domain")]
    Verify {
        domain_id: String,
        #[arg(long, default_value = "DNS_TXT", help = "DNS_TXT or HTTP_FILE")]
        method: VerifyMethod,
        #[arg(long)]
        force: bool,
    },

    #[command(about = "Replace the categories linked to a domain")]
    LinkCategories {
        domain_id: String,
        #[arg(long, help = "Comma-separated category ids")]
        categories: String,
    },
}

pub async fn handle(cmd: DomainCommands, admin: &Admin) -> anyhow::Result<()> {
    match cmd {
        DomainCommands::List { tenant } => {
            let (tenant, categories) =
                futures::try_join!(find_tenant(&admin.client, &tenant), tenant_categories(&admin.client, &tenant))?;
            let rows: Vec<Value> = tenant.domains.iter().map(serde_json::to_value).collect::<Result<_, _>>()?;
            let rows: Vec<&Value> = rows.iter().collect();
            match admin.output {
                OutputFormat::Json => {
                    let body = json!({ "tenant": tenant.name, "domains": rows, "categories": categories });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                OutputFormat::Text => {
                    let columns = [("ID", "id"), ("DOMAIN", "domain"), ("PRIMARY", "isPrimary"), ("STATUS", "status")];
                    output_rows(&admin.output, "domains", &columns, &rows, None, "No domains yet")?;
                    let names: Vec<String> = categories.iter().map(crate::resources::display_name).collect();
                    println!("\nEnabled categories: {}", if names.is_empty() { "-".to_string() } else { names.join(", ") });
                }
            }
            Ok(())
        }
        DomainCommands::Add { tenant, domain, primary } => {
            let tenant = find_tenant(&admin.client, &tenant).await?;
            let mut form = DomainForm::for_tenant(&tenant);
            form.domain = domain;
            form.is_primary = primary;
            submit(admin, Drawer::create(form), "Domain added").await
        }
        DomainCommands::AddEpaper { tenant } => {
            let tenant = find_tenant(&admin.client, &tenant).await?;
            let form = DomainForm::epaper_for(&tenant)?;
            submit(admin, Drawer::create(form), "E-paper domain added").await
        }
        DomainCommands::Verify { domain_id, method, force } => {
            let form = DomainVerifyForm { domain_id: domain_id.clone(), method, force };
            submit(admin, Drawer::edit(domain_id, form), "Verification requested").await
        }
        DomainCommands::LinkCategories { domain_id, categories } => {
            let form = DomainCategoriesForm { domain_id: domain_id.clone(), category_ids: split_csv(&categories) };
            submit(admin, Drawer::edit(domain_id, form), "Domain categories updated").await
        }
    }
}
