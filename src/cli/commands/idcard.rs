use clap::{Args, Subcommand};

use super::{submit, PageArgs};
use crate::cli::config::Admin;
use crate::cli::utils::{output_record, output_rows};
use crate::drawer::{Drawer, DrawerMode};
use crate::settings::{list_id_card_settings, IdCardForm, ValidityType};

#[derive(Subcommand)]
pub enum IdCardCommands {
    #[command(about = "List tenants' ID card settings")]
    List {
        #[command(flatten)]
        paging: PageArgs,
    },

    #[command(about = "Show a tenant's ID card settings (defaults when none are stored)")]
    Show { tenant: String },

    #[command(about = "Save a tenant's ID card settings")]
    Save {
        tenant: String,
        #[command(flatten)]
        fields: IdCardArgs,
    },
}

/// Unset flags keep the stored value.
#[derive(Args, Debug, Default)]
pub struct IdCardArgs {
    #[arg(long)]
    pub template: Option<String>,
    #[arg(long)]
    pub front_logo_url: Option<String>,
    #[arg(long)]
    pub round_stamp_url: Option<String>,
    #[arg(long)]
    pub sign_url: Option<String>,
    #[arg(long)]
    pub primary_color: Option<String>,
    #[arg(long)]
    pub secondary_color: Option<String>,
    #[arg(long = "term", help = "Terms line; repeat up to 5 times to replace all terms")]
    pub terms: Vec<String>,
    #[arg(long)]
    pub office_address: Option<String>,
    #[arg(long)]
    pub help_line1: Option<String>,
    #[arg(long)]
    pub help_line2: Option<String>,
    #[arg(long, help = "PER_USER_DAYS or FIXED_END_DATE")]
    pub validity: Option<ValidityType>,
    #[arg(long)]
    pub validity_days: Option<u32>,
    #[arg(long, help = "ISO timestamp, for FIXED_END_DATE")]
    pub valid_until: Option<String>,
    #[arg(long)]
    pub id_prefix: Option<String>,
    #[arg(long)]
    pub id_digits: Option<u32>,
}

impl IdCardArgs {
    fn apply(self, form: &mut IdCardForm) {
        let text = |target: &mut String, value: Option<String>| {
            if let Some(v) = value {
                *target = v;
            }
        };
        text(&mut form.template_id, self.template);
        text(&mut form.front_logo_url, self.front_logo_url);
        text(&mut form.round_stamp_url, self.round_stamp_url);
        text(&mut form.sign_url, self.sign_url);
        text(&mut form.primary_color, self.primary_color);
        text(&mut form.secondary_color, self.secondary_color);
        text(&mut form.office_address, self.office_address);
        text(&mut form.help_line1, self.help_line1);
        text(&mut form.help_line2, self.help_line2);
        text(&mut form.fixed_valid_until, self.valid_until);
        text(&mut form.id_prefix, self.id_prefix);
        if !self.terms.is_empty() {
            form.terms_json = self.terms;
        }
        if let Some(v) = self.validity {
            form.validity_type = v;
        }
        if let Some(days) = self.validity_days {
            form.validity_days = days;
        }
        if let Some(digits) = self.id_digits {
            form.id_digits = digits;
        }
    }
}

pub async fn handle(cmd: IdCardCommands, admin: &Admin) -> anyhow::Result<()> {
    match cmd {
        IdCardCommands::List { paging } => {
            let size = paging.size(admin)?;
            let page = list_id_card_settings(&admin.client, paging.page, size).await?;
            let rows: Vec<_> = page.rows.iter().collect();
            let columns = [("TENANT", "tenantId"), ("TEMPLATE", "templateId"), ("PREFIX", "idPrefix"), ("VALIDITY", "validityType")];
            output_rows(&admin.output, "settings", &columns, &rows, Some(&page.meta), "No ID card settings found")
        }
        IdCardCommands::Show { tenant } => {
            let (mode, form) = IdCardForm::load(&admin.client, &tenant).await?;
            if mode == DrawerMode::Create {
                eprintln!("No ID card settings stored yet; showing defaults");
            }
            output_record(&admin.output, "idCard", &serde_json::to_value(&form)?)
        }
        IdCardCommands::Save { tenant, fields } => {
            if fields.terms.len() > crate::settings::MAX_TERMS {
                return Err(anyhow::anyhow!("At most {} terms are allowed", crate::settings::MAX_TERMS));
            }
            let (mode, mut form) = IdCardForm::load(&admin.client, &tenant).await?;
            fields.apply(&mut form);
            submit(admin, Drawer::new(mode, form), "ID card settings saved").await
        }
    }
}
