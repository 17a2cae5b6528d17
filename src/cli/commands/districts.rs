use std::path::PathBuf;

use clap::Subcommand;

use super::{list_scoped, set_deleted, submit, PageArgs};
use crate::cli::config::Admin;
use crate::cli::utils::output_success;
use crate::drawer::forms::DistrictForm;
use crate::drawer::upload::{bulk_upload, BulkTarget};
use crate::drawer::Drawer;
use crate::resources::{DISTRICTS, STATES};

const COLUMNS: &[(&str, &str)] = &[("ID", "id"), ("NAME", "name"), ("STATE", "state"), ("DELETED", "isDeleted")];

#[derive(Subcommand)]
pub enum DistrictCommands {
    #[command(about = "List districts, optionally for one state")]
    List {
        #[arg(long, help = "State id; omit for all states")]
        state: Option<String>,
        #[command(flatten)]
        paging: PageArgs,
    },

    #[command(about = "Create a district")]
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, help = "State id")]
        state: String,
    },

    #[command(about = "Rename a district")]
    Edit {
        id: String,
        #[arg(long)]
        name: String,
    },

    #[command(about = "Mark a district deleted")]
    Delete {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },

    #[command(about = "Restore a deleted district")]
    Restore {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },

    #[command(about = "Import districts from a CSV (name plus stateId or stateName)")]
    BulkUpload { file: PathBuf },
}

pub async fn handle(cmd: DistrictCommands, admin: &Admin) -> anyhow::Result<()> {
    match cmd {
        DistrictCommands::List { state, paging } => {
            list_scoped(admin, &STATES, &DISTRICTS, state, &paging, COLUMNS).await
        }
        DistrictCommands::Create { name, state } => {
            let drawer = Drawer::create(DistrictForm { name, state_id: state });
            submit(admin, drawer, "District created").await
        }
        DistrictCommands::Edit { id, name } => {
            let drawer = Drawer::edit(id, DistrictForm { name, state_id: String::new() });
            submit(admin, drawer, "District updated").await
        }
        DistrictCommands::Delete { id, name, yes } => set_deleted(admin, &DISTRICTS, &id, &name, true, yes).await,
        DistrictCommands::Restore { id, name, yes } => set_deleted(admin, &DISTRICTS, &id, &name, false, yes).await,
        DistrictCommands::BulkUpload { file } => {
            let csv = tokio::fs::read(&file).await?;
            let filename = file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            let summary = bulk_upload(&admin.client, BulkTarget::Districts, &filename, csv).await?;
            output_success(&admin.output, "Districts imported", Some(summary))
        }
    }
}
