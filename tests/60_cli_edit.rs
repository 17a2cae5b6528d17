mod common;

use std::sync::Arc;

use anyhow::Result;
use common::ScriptedTransport;
use kaburlu_admin::api::{ApiResponse, Method};
use kaburlu_admin::cli::commands::categories::{self, CategoryCommands};
use kaburlu_admin::cli::commands::mandals::{self, MandalCommands};
use kaburlu_admin::cli::commands::razorpay::{self, KeyArgs, RazorpayCommands};
use kaburlu_admin::cli::config::Admin;
use kaburlu_admin::cli::OutputFormat;
use kaburlu_admin::resources::{tenant_path, CATEGORIES, LANGUAGES, MANDALS};
use serde_json::{json, Value};
use tempfile::TempDir;

fn admin(transport: &Arc<ScriptedTransport>, dir: &TempDir) -> Admin {
    Admin {
        client: transport.client(),
        session: common::admin_session(),
        output: OutputFormat::Json,
        page_size: 10,
        page_sizes: vec![10, 20, 50],
        config_dir: dir.path().to_path_buf(),
    }
}

fn last_body(transport: &ScriptedTransport, method: Method, path: &str) -> Value {
    transport
        .requests_to(path)
        .into_iter()
        .filter(|r| r.method == method)
        .last()
        .and_then(|r| r.json_body().cloned())
        .unwrap_or(Value::Null)
}

#[tokio::test]
async fn mandal_rename_leaves_assembly_flag_alone() -> Result<()> {
    let transport = ScriptedTransport::new();
    let dir = tempfile::tempdir()?;
    let path = MANDALS.record_path("M1");
    transport.reply(Method::Put, &path, ApiResponse::json(200, json!({ "id": "M1" })));
    transport.reply(Method::Put, &path, ApiResponse::json(200, json!({ "id": "M1" })));
    let admin = admin(&transport, &dir);

    let rename = MandalCommands::Edit { id: "M1".into(), name: "Tenali".into(), assembly_constituency: None };
    mandals::handle(rename, &admin).await?;
    assert_eq!(last_body(&transport, Method::Put, &path), json!({ "name": "Tenali" }));

    let clear = MandalCommands::Edit { id: "M1".into(), name: "Tenali".into(), assembly_constituency: Some(false) };
    mandals::handle(clear, &admin).await?;
    assert_eq!(
        last_body(&transport, Method::Put, &path),
        json!({ "name": "Tenali", "isAssemblyConstituency": false })
    );
    Ok(())
}

#[tokio::test]
async fn category_rename_keeps_stored_fields() -> Result<()> {
    let transport = ScriptedTransport::new();
    let dir = tempfile::tempdir()?;
    transport.reply_when(
        Method::Get,
        CATEGORIES.path,
        &[("languageId", "L1")],
        ApiResponse::json(
            200,
            json!([{
                "id": "C1", "name": "Politics", "iconUrl": "https://cdn/p.png",
                "isActive": false, "parentId": "P1", "languageId": "L1"
            }]),
        ),
    );
    let path = CATEGORIES.record_path("C1");
    transport.reply(Method::Put, &path, ApiResponse::json(200, json!({ "id": "C1" })));
    let admin = admin(&transport, &dir);

    let edit = CategoryCommands::Edit {
        id: "C1".into(),
        language: Some("L1".into()),
        name: Some("State Politics".into()),
        parent: None,
        icon: None,
        icon_file: None,
        active: None,
    };
    categories::handle(edit, &admin).await?;

    assert_eq!(
        last_body(&transport, Method::Put, &path),
        json!({ "name": "State Politics", "iconUrl": "https://cdn/p.png", "isActive": false, "parentId": "P1" })
    );
    Ok(())
}

#[tokio::test]
async fn category_edit_finds_nested_child_in_default_language() -> Result<()> {
    let transport = ScriptedTransport::new();
    let dir = tempfile::tempdir()?;
    transport.reply(
        Method::Get,
        LANGUAGES.path,
        ApiResponse::json(200, json!([{ "id": "L1", "code": "te", "name": "Telugu" }, { "id": "L2", "code": "en", "name": "English" }])),
    );
    transport.reply_when(
        Method::Get,
        CATEGORIES.path,
        &[("languageId", "L2")],
        ApiResponse::json(
            200,
            json!([{
                "id": "A", "name": "News", "isActive": true,
                "children": [{ "id": "A1", "name": "Local", "isActive": true, "parentId": "A" }]
            }]),
        ),
    );
    let path = CATEGORIES.record_path("A1");
    transport.reply(Method::Put, &path, ApiResponse::json(200, json!({ "id": "A1" })));
    let admin = admin(&transport, &dir);

    let edit = CategoryCommands::Edit {
        id: "A1".into(),
        language: None,
        name: None,
        parent: None,
        icon: None,
        icon_file: None,
        active: Some(false),
    };
    categories::handle(edit, &admin).await?;

    assert_eq!(
        last_body(&transport, Method::Put, &path),
        json!({ "name": "Local", "isActive": false, "parentId": "A" })
    );
    Ok(())
}

#[tokio::test]
async fn category_edit_of_unknown_id_sends_nothing() -> Result<()> {
    let transport = ScriptedTransport::new();
    let dir = tempfile::tempdir()?;
    transport.reply_when(Method::Get, CATEGORIES.path, &[("languageId", "L1")], ApiResponse::json(200, json!([])));
    let admin = admin(&transport, &dir);

    let edit = CategoryCommands::Edit {
        id: "C9".into(),
        language: Some("L1".into()),
        name: Some("X".into()),
        parent: None,
        icon: None,
        icon_file: None,
        active: None,
    };
    let err = categories::handle(edit, &admin).await.unwrap_err();
    assert!(err.to_string().starts_with("Category C9 not found"));
    assert!(transport.requests_to(&CATEGORIES.record_path("C9")).is_empty());
    Ok(())
}

#[tokio::test]
async fn razorpay_secret_rotation_keeps_key_and_state() -> Result<()> {
    let transport = ScriptedTransport::new();
    let dir = tempfile::tempdir()?;
    let path = tenant_path("T1", "/razorpay-config");
    transport.reply(
        Method::Get,
        &path,
        ApiResponse::json(200, json!({ "keyId": "rzp_live_1", "keySecretMasked": "****abcd", "active": false })),
    );
    transport.reply(Method::Put, &path, ApiResponse::json(200, json!({ "ok": true })));
    let admin = admin(&transport, &dir);

    let keys = KeyArgs { key_id: None, key_secret: Some("n3w".into()), active: None };
    razorpay::handle(RazorpayCommands::Set { tenant: "T1".into(), keys }, &admin).await?;

    assert_eq!(
        last_body(&transport, Method::Put, &path),
        json!({ "keyId": "rzp_live_1", "keySecret": "n3w", "active": false })
    );
    Ok(())
}

#[tokio::test]
async fn page_size_outside_the_offered_options_is_refused() -> Result<()> {
    let transport = ScriptedTransport::new();
    let dir = tempfile::tempdir()?;
    let admin = admin(&transport, &dir);

    let paging = kaburlu_admin::cli::commands::PageArgs { page: 1, page_size: Some(15), search: None };
    let list = MandalCommands::List { district: Some("D1".into()), paging };
    let err = mandals::handle(list, &admin).await.unwrap_err();
    assert!(err.to_string().contains("10, 20, 50"));
    assert!(transport.requests().is_empty());
    Ok(())
}
