use clap::Subcommand;
use serde_json::Value;

use super::{list_resource, submit, PageArgs};
use crate::api::ApiRequest;
use crate::cli::config::Admin;
use crate::cli::utils::output_rows;
use crate::drawer::forms::RoleForm;
use crate::drawer::Drawer;
use crate::permissions::{load_modules, PermissionSet, RolePermissionsForm};
use crate::resources::ROLES;

#[derive(Subcommand)]
pub enum RoleCommands {
    #[command(about = "List roles")]
    List {
        #[command(flatten)]
        paging: PageArgs,
    },

    #[command(about = "Create a role")]
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "", help = "Comma-separated module:action entries")]
        permissions: String,
    },

    #[command(about = "Show the permission module catalogue")]
    Modules,

    #[command(about = "Grant or revoke actions on a role")]
    Grant {
        role_id: String,
        #[arg(long, default_value = "", help = "module:action entries to add")]
        add: String,
        #[arg(long, default_value = "", help = "module:action entries to remove")]
        remove: String,
        #[arg(long, help = "Replace all grants with --add instead of merging")]
        replace: bool,
    },
}

pub async fn handle(cmd: RoleCommands, admin: &Admin) -> anyhow::Result<()> {
    match cmd {
        RoleCommands::List { paging } => {
            list_resource(admin, &ROLES, &paging, &[("ID", "id"), ("NAME", "name"), ("PERMISSIONS", "permissions")]).await
        }
        RoleCommands::Create { name, permissions } => {
            submit(admin, Drawer::create(RoleForm { name, permissions }), "Role created").await
        }
        RoleCommands::Modules => {
            let modules = load_modules(&admin.client).await?;
            let rows: Vec<Value> = modules.iter().map(serde_json::to_value).collect::<Result<_, _>>()?;
            let rows: Vec<&Value> = rows.iter().collect();
            let columns = [("KEY", "key"), ("LABEL", "label"), ("ACTIONS", "typicalActions")];
            output_rows(&admin.output, "modules", &columns, &rows, None, "No permission modules found")
        }
        RoleCommands::Grant { role_id, add, remove, replace } => {
            let roles = admin.client.fetch_list(ApiRequest::get(ROLES.path)).await?;
            let role = roles
                .rows
                .iter()
                .find(|r| r.get("id").and_then(Value::as_str) == Some(role_id.as_str()))
                .ok_or_else(|| anyhow::anyhow!("Role {} not found", role_id))?;

            let mut form = RolePermissionsForm::for_role(role);
            if replace {
                form.permissions = PermissionSet::new();
            }
            form.permissions.merge(&PermissionSet::from_csv(&add));
            form.permissions.subtract(&PermissionSet::from_csv(&remove));
            submit(admin, Drawer::edit(role_id, form), "Role permissions updated").await
        }
    }
}
