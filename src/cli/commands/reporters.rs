use clap::Subcommand;

use super::{list_scoped, PageArgs};
use crate::cli::config::Admin;
use crate::resources::{REPORTERS, TENANTS};

#[derive(Subcommand)]
pub enum ReporterCommands {
    #[command(about = "List a tenant's reporters")]
    List {
        #[arg(long, help = "Tenant id")]
        tenant: Option<String>,
        #[command(flatten)]
        paging: PageArgs,
    },
}

pub async fn handle(cmd: ReporterCommands, admin: &Admin) -> anyhow::Result<()> {
    match cmd {
        ReporterCommands::List { tenant, paging } => {
            let columns = [
                ("ID", "id"),
                ("NAME", "fullName"),
                ("MOBILE", "mobileNumber"),
                ("LEVEL", "level"),
                ("DESIGNATION", "designation"),
                ("KYC", "kycStatus"),
                ("ACTIVE", "active"),
            ];
            list_scoped(admin, &TENANTS, &REPORTERS, tenant, &paging, &columns).await
        }
    }
}
