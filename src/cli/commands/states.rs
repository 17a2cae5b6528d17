use clap::Subcommand;

use super::{list_resource, set_deleted, PageArgs};
use crate::cli::config::Admin;
use crate::resources::STATES;

#[derive(Subcommand)]
pub enum StateCommands {
    #[command(about = "List states")]
    List {
        #[command(flatten)]
        paging: PageArgs,
    },

    #[command(about = "Mark a state deleted")]
    Delete {
        id: String,
        #[arg(long, help = "Current state name (sent with the toggle)")]
        name: String,
        #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },

    #[command(about = "Restore a deleted state")]
    Restore {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

pub async fn handle(cmd: StateCommands, admin: &Admin) -> anyhow::Result<()> {
    match cmd {
        StateCommands::List { paging } => {
            list_resource(admin, &STATES, &paging, &[("ID", "id"), ("NAME", "name"), ("DELETED", "isDeleted")]).await
        }
        StateCommands::Delete { id, name, yes } => set_deleted(admin, &STATES, &id, &name, true, yes).await,
        StateCommands::Restore { id, name, yes } => set_deleted(admin, &STATES, &id, &name, false, yes).await,
    }
}
