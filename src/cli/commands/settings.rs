use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::config::Admin;
use crate::cli::utils::{output_record, output_success};
use crate::settings::{parse_value, SettingsEditor};

#[derive(Subcommand)]
pub enum SettingsCommands {
    #[command(about = "Show a domain's settings (the local draft when one exists)")]
    Show {
        tenant: String,
        domain: String,
        #[arg(long, help = "Ignore the local draft and show the server copy")]
        remote: bool,
        #[arg(long, help = "Only this dotted path, e.g. theme.colors.primary")]
        path: Option<String>,
    },

    #[command(about = "Set one value in the local draft")]
    Set {
        tenant: String,
        domain: String,
        #[arg(help = "Dotted path, e.g. theme.colors.primary")]
        path: String,
        #[arg(help = "JSON value; anything that is not valid JSON is stored as a string")]
        value: String,
    },

    #[command(about = "Start the draft from the default settings (only when none exist)")]
    Defaults { tenant: String, domain: String },

    #[command(about = "Push the local draft to the server")]
    Save { tenant: String, domain: String },

    #[command(about = "Throw away the local draft")]
    Discard { tenant: String, domain: String },
}

/// The draft if one is staged, else the server copy.
async fn open_editor(admin: &Admin, tenant: &str, domain: &str) -> anyhow::Result<(SettingsEditor, bool)> {
    match admin.load_settings_draft(tenant, domain)? {
        Some(document) => Ok((SettingsEditor::new(tenant, domain, document), true)),
        None => Ok((SettingsEditor::load(&admin.client, tenant, domain).await?, false)),
    }
}

pub async fn handle(cmd: SettingsCommands, admin: &Admin) -> anyhow::Result<()> {
    match cmd {
        SettingsCommands::Show { tenant, domain, remote, path } => {
            let (editor, draft) = if remote {
                (SettingsEditor::load(&admin.client, &tenant, &domain).await?, false)
            } else {
                open_editor(admin, &tenant, &domain).await?
            };
            if draft {
                eprintln!("(showing unsaved local draft)");
            }
            let shown = match &path {
                Some(p) => editor.get(p).cloned().unwrap_or(Value::Null),
                None => editor.document().clone(),
            };
            output_record(&admin.output, "settings", &shown)
        }
        SettingsCommands::Set { tenant, domain, path, value } => {
            let (mut editor, _) = open_editor(admin, &tenant, &domain).await?;
            let value = parse_value(&value);
            editor.set(&path, value.clone())?;
            let file = admin.save_settings_draft(&tenant, &domain, editor.document())?;
            output_success(
                &admin.output,
                &format!("Set {} in draft {}", path, file.display()),
                Some(json!({ "path": path, "value": value })),
            )
        }
        SettingsCommands::Defaults { tenant, domain } => {
            let (mut editor, _) = open_editor(admin, &tenant, &domain).await?;
            editor.use_defaults()?;
            let file = admin.save_settings_draft(&tenant, &domain, editor.document())?;
            output_success(&admin.output, &format!("Draft {} starts from the defaults", file.display()), None)
        }
        SettingsCommands::Save { tenant, domain } => {
            let document = admin
                .load_settings_draft(&tenant, &domain)?
                .ok_or_else(|| anyhow::anyhow!("No local draft for this domain; use `kab settings set` first"))?;
            let mut editor = SettingsEditor::new(&tenant, &domain, document);
            let saved = editor.save(&admin.client).await?;
            admin.clear_settings_draft(&tenant, &domain)?;
            output_success(&admin.output, "Settings saved", saved)
        }
        SettingsCommands::Discard { tenant, domain } => {
            admin.clear_settings_draft(&tenant, &domain)?;
            output_success(&admin.output, "Draft discarded", None)
        }
    }
}
