pub mod assembly;
pub mod auth;
pub mod categories;
pub mod districts;
pub mod domains;
pub mod idcard;
pub mod languages;
pub mod mandals;
pub mod media;
pub mod razorpay;
pub mod reporters;
pub mod roles;
pub mod settings;
pub mod states;
pub mod tenants;
pub mod users;

use clap::Args;
use serde_json::{json, Value};

use crate::cli::config::Admin;
use crate::cli::utils::{confirmer, output_rows, report_mutation, report_submit};
use crate::drawer::{Drawer, Form};
use crate::list::{CascadeState, ChildPhase, FilterCascade, ListController, ListScope};
use crate::mutation::RowActions;
use crate::resources::ResourceDef;

/// Number of parent options offered when a scoped list has no parent yet
const PARENT_OPTIONS_PAGE: u32 = 100;

#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1, help = "Page number")]
    pub page: u32,

    #[arg(long, help = "Rows per page (defaults to KAB_DEFAULT_PAGE_SIZE)")]
    pub page_size: Option<u32>,

    #[arg(long, help = "Filter the fetched rows by name")]
    pub search: Option<String>,
}

impl PageArgs {
    pub fn size(&self, admin: &Admin) -> anyhow::Result<u32> {
        page_size(self.page_size, admin.page_size, &admin.page_sizes)
    }
}

/// The requested page size when it is one of `allowed`, else the default.
fn page_size(requested: Option<u32>, default: u32, allowed: &[u32]) -> anyhow::Result<u32> {
    match requested {
        None => Ok(default),
        Some(size) if allowed.is_empty() || allowed.contains(&size) => Ok(size),
        Some(size) => {
            let options: Vec<String> = allowed.iter().map(u32::to_string).collect();
            Err(anyhow::anyhow!("Page size {} is not offered; use one of {}", size, options.join(", ")))
        }
    }
}

/// List an unscoped collection.
pub async fn list_resource(
    admin: &Admin,
    resource: &'static ResourceDef,
    paging: &PageArgs,
    columns: &[(&str, &str)],
) -> anyhow::Result<()> {
    let mut list = ListController::new(resource, paging.size(admin)?);
    let plan = list.set_page(paging.page);
    list.execute(&admin.client, plan).await;
    print_list(admin, &mut list, paging, columns)
}

/// List a collection under a parent picker. Without a parent, a required
/// scope prints the prompt and the available parents instead of rows.
pub async fn list_scoped(
    admin: &Admin,
    parent: &'static ResourceDef,
    child: &'static ResourceDef,
    parent_id: Option<String>,
    paging: &PageArgs,
    columns: &[(&str, &str)],
) -> anyhow::Result<()> {
    let mut cascade = FilterCascade::new(parent, child, paging.size(admin)?);
    // the parent change resets paging, so only the page plan is executed
    cascade.select(parent_id);
    let plan = cascade.child_mut().set_page(paging.page);
    cascade.child_mut().execute(&admin.client, plan).await;

    match cascade.state() {
        CascadeState::NoParentSelected => {
            let request = parent.list_request(&ListScope::new(PARENT_OPTIONS_PAGE));
            if let Some(request) = request {
                cascade.load_parents(&admin.client, request).await?;
            }
            let options: Vec<&Value> = cascade.parents().iter().collect();
            output_rows(
                &admin.output,
                parent.name,
                &[("ID", "id"), ("NAME", "name")],
                &options,
                None,
                &format!("No {} found", parent.name),
            )?;
            eprintln!("\n{}", cascade.child().empty_message());
            Ok(())
        }
        CascadeState::AllParents(ChildPhase::Error(e))
        | CascadeState::ParentSelected { phase: ChildPhase::Error(e), .. } => Err(anyhow::anyhow!(e)),
        _ => print_list(admin, cascade.child_mut(), paging, columns),
    }
}

fn print_list(
    admin: &Admin,
    list: &mut ListController,
    paging: &PageArgs,
    columns: &[(&str, &str)],
) -> anyhow::Result<()> {
    if let Some(err) = list.error() {
        return Err(anyhow::anyhow!(err.to_string()));
    }
    if let Some(search) = &paging.search {
        list.set_search(search.clone());
    }
    let rows = list.visible_rows();
    let meta = list.resource().paginated.then(|| list.meta());
    output_rows(&admin.output, list.resource().name, columns, &rows, meta, &list.empty_message())
}

/// Submit a form through the drawer protocol.
pub async fn submit<F: Form>(admin: &Admin, mut drawer: Drawer<F>, message: &str) -> anyhow::Result<()> {
    let outcome = drawer.submit(&admin.client).await;
    report_submit(&admin.output, outcome, message)
}

/// Soft-delete (`deleted = true`) or restore a row.
pub async fn set_deleted(
    admin: &Admin,
    resource: &'static ResourceDef,
    id: &str,
    name: &str,
    deleted: bool,
    yes: bool,
) -> anyhow::Result<()> {
    let row = json!({ "id": id, "name": name });
    let actions = RowActions::new(admin.client.clone());
    let outcome = actions
        .set_deleted(resource, &row, deleted, confirmer(yes).as_ref())
        .await?;
    let verb = if deleted { "marked deleted" } else { "restored" };
    report_mutation(&admin.output, outcome, &format!("{} {} {}", resource.singular, name, verb))
}

pub async fn hard_delete(admin: &Admin, resource: &'static ResourceDef, row: Value, yes: bool) -> anyhow::Result<()> {
    let actions = RowActions::new(admin.client.clone());
    let outcome = actions.hard_delete(resource, &row, confirmer(yes).as_ref()).await?;
    report_mutation(&admin.output, outcome, &format!("{} deleted", resource.singular))
}

/// Split a comma-separated flag value, dropping blanks.
pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_must_be_an_offered_option() {
        assert_eq!(page_size(None, 10, &[10, 20, 50]).unwrap(), 10);
        assert_eq!(page_size(Some(50), 10, &[10, 20, 50]).unwrap(), 50);
        let err = page_size(Some(7), 10, &[10, 20, 50]).unwrap_err();
        assert_eq!(err.to_string(), "Page size 7 is not offered; use one of 10, 20, 50");
        assert_eq!(page_size(Some(7), 10, &[]).unwrap(), 7);
    }
}
