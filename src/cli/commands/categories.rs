use std::path::PathBuf;

use clap::Subcommand;
use serde_json::{json, Value};

use super::{hard_delete, submit, PageArgs};
use crate::api::ApiRequest;
use crate::cli::config::Admin;
use crate::cli::utils::{output_rows, report_mutation};
use crate::drawer::forms::CategoryForm;
use crate::drawer::upload::{upload_media, MediaUpload};
use crate::drawer::Drawer;
use crate::list::{ListController, ListScope};
use crate::mutation::RowActions;
use crate::resources::{default_language, Category, Language, CATEGORIES, LANGUAGES};

#[derive(Subcommand)]
pub enum CategoryCommands {
    #[command(about = "List categories of a language (English by default)")]
    List {
        #[arg(long, help = "Language id")]
        language: Option<String>,
        #[command(flatten)]
        paging: PageArgs,
    },

    #[command(about = "Create a category")]
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, help = "Language id (English by default)")]
        language: Option<String>,
        #[arg(long, help = "Parent category id")]
        parent: Option<String>,
        #[arg(long, help = "Icon URL")]
        icon: Option<String>,
        #[arg(long, help = "Upload this image and use it as the icon", conflicts_with = "icon")]
        icon_file: Option<PathBuf>,
        #[arg(long)]
        inactive: bool,
    },

    #[command(about = "Update a category; fields not given keep their stored values")]
    Edit {
        id: String,
        #[arg(long, help = "Language the category belongs to (English by default)")]
        language: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long, conflicts_with = "icon")]
        icon_file: Option<PathBuf>,
        #[arg(long, value_name = "BOOL")]
        active: Option<bool>,
    },

    #[command(about = "Delete a category permanently")]
    Delete {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, short = 'y')]
        yes: bool,
    },

    #[command(about = "Ask the server to regenerate a category's translations")]
    Retranslate { id: String },
}

/// `--language`, else the default language from the server's list.
async fn resolve_language(admin: &Admin, language: Option<String>) -> anyhow::Result<Option<String>> {
    if let Some(id) = language.filter(|l| !l.trim().is_empty()) {
        return Ok(Some(id));
    }
    let request = LANGUAGES
        .list_request(&ListScope::new(admin.page_size))
        .unwrap_or_else(|| ApiRequest::get(LANGUAGES.path));
    let languages = admin.client.fetch_list(request).await?.typed::<Language>()?.rows;
    Ok(default_language(&languages).map(|l| l.id.clone()))
}

async fn icon_url(admin: &Admin, icon: Option<String>, icon_file: Option<PathBuf>) -> anyhow::Result<String> {
    match icon_file {
        Some(path) => {
            let upload = MediaUpload::from_path(&path, "categories", "image").await?;
            Ok(upload_media(&admin.client, upload).await?)
        }
        None => Ok(icon.unwrap_or_default()),
    }
}

/// Depth-first search through `children`
fn find_category<'a>(rows: &'a [Value], id: &str) -> Option<&'a Value> {
    rows.iter().find_map(|row| {
        if row.get("id").and_then(Value::as_str) == Some(id) {
            return Some(row);
        }
        let children = row.get("children").and_then(Value::as_array)?;
        find_category(children, id)
    })
}

/// The stored category, read from its language's tree
async fn load_category(admin: &Admin, id: &str, language: Option<String>) -> anyhow::Result<CategoryForm> {
    let language = resolve_language(admin, language).await?;
    let mut list = ListController::new(&CATEGORIES, admin.page_size);
    let plan = list.set_parent(language);
    list.execute(&admin.client, plan).await;
    if let Some(err) = list.error() {
        return Err(anyhow::anyhow!(err.to_string()));
    }
    let record = find_category(list.rows(), id)
        .ok_or_else(|| anyhow::anyhow!("Category {id} not found; pass --language if it is not English"))?;
    Ok(CategoryForm::from_record(record))
}

/// Tree rows flattened with indented names
fn indented(rows: &[&Value]) -> Vec<Value> {
    let categories: Vec<Category> = rows
        .iter()
        .filter_map(|r| serde_json::from_value((*r).clone()).ok())
        .collect();
    Category::flatten(&categories)
        .into_iter()
        .map(|(depth, c)| {
            json!({
                "id": c.id,
                "name": format!("{}{}", "  ".repeat(depth), c.name),
                "isActive": c.is_active,
            })
        })
        .collect()
}

pub async fn handle(cmd: CategoryCommands, admin: &Admin) -> anyhow::Result<()> {
    match cmd {
        CategoryCommands::List { language, paging } => {
            let language = resolve_language(admin, language).await?;
            let mut list = ListController::new(&CATEGORIES, paging.size(admin)?);
            let plan = list.set_parent(language);
            list.execute(&admin.client, plan).await;
            if let Some(err) = list.error() {
                return Err(anyhow::anyhow!(err.to_string()));
            }
            if let Some(search) = &paging.search {
                list.set_search(search.clone());
            }
            let rows = indented(&list.visible_rows());
            let rows: Vec<&Value> = rows.iter().collect();
            let columns = [("ID", "id"), ("NAME", "name"), ("ACTIVE", "isActive")];
            output_rows(&admin.output, CATEGORIES.name, &columns, &rows, None, &list.empty_message())
        }
        CategoryCommands::Create { name, language, parent, icon, icon_file, inactive } => {
            let language_id = resolve_language(admin, language).await?.unwrap_or_default();
            let form = CategoryForm {
                name,
                icon_url: icon_url(admin, icon, icon_file).await?,
                is_active: !inactive,
                parent_id: parent.unwrap_or_default(),
                language_id,
            };
            submit(admin, Drawer::create(form), "Category created").await
        }
        CategoryCommands::Edit { id, language, name, parent, icon, icon_file, active } => {
            let mut form = load_category(admin, &id, language).await?;
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(parent) = parent {
                form.parent_id = parent;
            }
            if icon.is_some() || icon_file.is_some() {
                form.icon_url = icon_url(admin, icon, icon_file).await?;
            }
            if let Some(active) = active {
                form.is_active = active;
            }
            submit(admin, Drawer::edit(id, form), "Category updated").await
        }
        CategoryCommands::Delete { id, name, yes } => {
            let name = name.unwrap_or_else(|| id.clone());
            hard_delete(admin, &CATEGORIES, json!({ "id": id, "name": name }), yes).await
        }
        CategoryCommands::Retranslate { id } => {
            let outcome = RowActions::new(admin.client.clone()).retranslate_category(&id).await?;
            report_mutation(&admin.output, outcome, "Retranslation requested")
        }
    }
}
