use clap::{Args, Subcommand};
use serde_json::Value;

use super::{submit, PageArgs};
use crate::cli::config::Admin;
use crate::cli::utils::{output_record, output_rows};
use crate::drawer::Drawer;
use crate::settings::{list_razorpay_configs, search_configs, RazorpayForm, RazorpayTarget};

#[derive(Subcommand)]
pub enum RazorpayCommands {
    #[command(about = "List tenant Razorpay configs")]
    List {
        #[arg(long, help = "Show inactive configs instead of active ones")]
        inactive: bool,
        #[command(flatten)]
        paging: PageArgs,
    },

    #[command(about = "Show a tenant's Razorpay config")]
    Show { tenant: String },

    #[command(about = "Create or update a tenant's Razorpay config")]
    Set {
        tenant: String,
        #[command(flatten)]
        keys: KeyArgs,
    },

    #[command(about = "Show the platform-wide Razorpay config")]
    GlobalShow,

    #[command(about = "Update the platform-wide Razorpay config")]
    GlobalSet {
        #[command(flatten)]
        keys: KeyArgs,
    },
}

#[derive(Args, Debug)]
pub struct KeyArgs {
    #[arg(long, help = "Required when creating; omitted keeps the stored key id")]
    pub key_id: Option<String>,
    #[arg(long, help = "Required when creating; blank keeps the stored secret (falls back to KAB_RAZORPAY_SECRET)")]
    pub key_secret: Option<String>,
    #[arg(long, value_name = "BOOL", help = "Enable or disable the config; omitted keeps the stored state")]
    pub active: Option<bool>,
}

async fn show(admin: &Admin, target: RazorpayTarget) -> anyhow::Result<()> {
    match RazorpayForm::load(&admin.client, &target).await? {
        Some(config) => output_record(&admin.output, "razorpay", &serde_json::to_value(config)?),
        None => {
            eprintln!("Razorpay config not set");
            output_record(&admin.output, "razorpay", &Value::Null)
        }
    }
}

async fn set(admin: &Admin, target: RazorpayTarget, keys: KeyArgs) -> anyhow::Result<()> {
    let (mode, mut form) = RazorpayForm::open(&admin.client, target).await?;
    if let Some(key_id) = keys.key_id {
        form.key_id = key_id;
    }
    form.key_secret = keys
        .key_secret
        .or_else(|| std::env::var("KAB_RAZORPAY_SECRET").ok())
        .unwrap_or_default();
    if let Some(active) = keys.active {
        form.active = active;
    }
    submit(admin, Drawer::new(mode, form), "Razorpay config saved").await
}

pub async fn handle(cmd: RazorpayCommands, admin: &Admin) -> anyhow::Result<()> {
    match cmd {
        RazorpayCommands::List { inactive, paging } => {
            let size = paging.size(admin)?;
            let page = list_razorpay_configs(&admin.client, !inactive, paging.page, size).await?;
            let rows = search_configs(&page.rows, paging.search.as_deref().unwrap_or_default());
            let columns = [
                ("TENANT", "tenant.name"),
                ("KEY ID", "keyId"),
                ("SECRET", "keySecretMasked"),
                ("ACTIVE", "active"),
                ("UPDATED", "updatedAt"),
            ];
            output_rows(&admin.output, "configs", &columns, &rows, Some(&page.meta), "No Razorpay configs found")
        }
        RazorpayCommands::Show { tenant } => show(admin, RazorpayTarget::Tenant(tenant)).await,
        RazorpayCommands::Set { tenant, keys } => set(admin, RazorpayTarget::Tenant(tenant), keys).await,
        RazorpayCommands::GlobalShow => show(admin, RazorpayTarget::Global).await,
        RazorpayCommands::GlobalSet { keys } => set(admin, RazorpayTarget::Global, keys).await,
    }
}
