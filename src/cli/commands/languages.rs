use clap::Subcommand;

use super::{list_resource, submit, PageArgs};
use crate::cli::config::Admin;
use crate::drawer::forms::LanguageForm;
use crate::drawer::Drawer;
use crate::resources::LANGUAGES;

#[derive(Subcommand)]
pub enum LanguageCommands {
    #[command(about = "List languages")]
    List {
        #[command(flatten)]
        paging: PageArgs,
    },

    #[command(about = "Add a language")]
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, help = "ISO code, e.g. te")]
        code: String,
    },
}

pub async fn handle(cmd: LanguageCommands, admin: &Admin) -> anyhow::Result<()> {
    match cmd {
        LanguageCommands::List { paging } => {
            let columns = [("ID", "id"), ("CODE", "code"), ("NAME", "name"), ("NATIVE", "nativeName")];
            list_resource(admin, &LANGUAGES, &paging, &columns).await
        }
        LanguageCommands::Create { name, code } => {
            submit(admin, Drawer::create(LanguageForm { name, code }), "Language created").await
        }
    }
}
