use std::path::PathBuf;

use clap::Subcommand;
use serde_json::json;

use super::{hard_delete, list_scoped, submit, PageArgs};
use crate::cli::config::Admin;
use crate::cli::utils::output_success;
use crate::drawer::forms::MandalForm;
use crate::drawer::upload::{bulk_upload, BulkTarget};
use crate::drawer::Drawer;
use crate::resources::{DISTRICTS, MANDALS};

#[derive(Subcommand)]
pub enum MandalCommands {
    #[command(about = "List mandals of a district")]
    List {
        #[arg(long, help = "District id")]
        district: Option<String>,
        #[command(flatten)]
        paging: PageArgs,
    },

    #[command(about = "Create a mandal")]
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, help = "District id")]
        district: String,
        #[arg(long, help = "The mandal is also an assembly constituency")]
        assembly_constituency: bool,
    },

    #[command(about = "Update a mandal")]
    Edit {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, value_name = "BOOL", help = "Set or clear the assembly constituency flag; omitted keeps it")]
        assembly_constituency: Option<bool>,
    },

    #[command(about = "Delete a mandal permanently")]
    Delete {
        id: String,
        #[arg(long, help = "Mandal name, shown in the confirmation")]
        name: Option<String>,
        #[arg(long, short = 'y')]
        yes: bool,
    },

    #[command(about = "Import mandals from a CSV (name plus districtId or districtName)")]
    BulkUpload { file: PathBuf },
}

pub async fn handle(cmd: MandalCommands, admin: &Admin) -> anyhow::Result<()> {
    match cmd {
        MandalCommands::List { district, paging } => {
            let columns = [("ID", "id"), ("NAME", "name"), ("ASSEMBLY", "isAssemblyConstituency")];
            list_scoped(admin, &DISTRICTS, &MANDALS, district, &paging, &columns).await
        }
        MandalCommands::Create { name, district, assembly_constituency } => {
            let form = MandalForm { name, district_id: district, is_assembly_constituency: Some(assembly_constituency) };
            submit(admin, Drawer::create(form), "Mandal created").await
        }
        MandalCommands::Edit { id, name, assembly_constituency } => {
            let form = MandalForm { name, district_id: String::new(), is_assembly_constituency: assembly_constituency };
            submit(admin, Drawer::edit(id, form), "Mandal updated").await
        }
        MandalCommands::Delete { id, name, yes } => {
            let name = name.unwrap_or_else(|| id.clone());
            let row = json!({ "id": id, "name": name });
            hard_delete(admin, &MANDALS, row, yes).await
        }
        MandalCommands::BulkUpload { file } => {
            let csv = tokio::fs::read(&file).await?;
            let filename = file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            let summary = bulk_upload(&admin.client, BulkTarget::Mandals, &filename, csv).await?;
            output_success(&admin.output, "Mandals imported", Some(summary))
        }
    }
}
