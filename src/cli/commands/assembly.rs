use clap::Subcommand;

use super::{list_scoped, set_deleted, submit, PageArgs};
use crate::cli::config::Admin;
use crate::drawer::forms::AssemblyForm;
use crate::drawer::Drawer;
use crate::resources::{ASSEMBLY_CONSTITUENCIES, DISTRICTS};

#[derive(Subcommand)]
pub enum AssemblyCommands {
    #[command(about = "List assembly constituencies of a district")]
    List {
        #[arg(long, help = "District id")]
        district: Option<String>,
        #[command(flatten)]
        paging: PageArgs,
    },

    #[command(about = "Create an assembly constituency")]
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, help = "District id")]
        district: String,
    },

    #[command(about = "Rename a constituency (also restores it)")]
    Edit {
        id: String,
        #[arg(long)]
        name: String,
    },

    #[command(about = "Mark a constituency deleted")]
    Delete {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },

    #[command(about = "Restore a deleted constituency")]
    Restore {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

pub async fn handle(cmd: AssemblyCommands, admin: &Admin) -> anyhow::Result<()> {
    let target = &ASSEMBLY_CONSTITUENCIES;
    match cmd {
        AssemblyCommands::List { district, paging } => {
            let columns = [("ID", "id"), ("NAME", "name"), ("DELETED", "isDeleted")];
            list_scoped(admin, &DISTRICTS, target, district, &paging, &columns).await
        }
        AssemblyCommands::Create { name, district } => {
            let drawer = Drawer::create(AssemblyForm { name, district_id: district });
            submit(admin, drawer, "Constituency created").await
        }
        AssemblyCommands::Edit { id, name } => {
            let drawer = Drawer::edit(id, AssemblyForm { name, district_id: String::new() });
            submit(admin, drawer, "Constituency updated").await
        }
        AssemblyCommands::Delete { id, name, yes } => set_deleted(admin, target, &id, &name, true, yes).await,
        AssemblyCommands::Restore { id, name, yes } => set_deleted(admin, target, &id, &name, false, yes).await,
    }
}
