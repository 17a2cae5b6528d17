mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use common::ScriptedTransport;
use kaburlu_admin::api::{ApiResponse, Method};
use kaburlu_admin::drawer::forms::{DistrictForm, LanguageForm};
use kaburlu_admin::drawer::{Drawer, DrawerMode, SubmitOutcome};
use kaburlu_admin::list::ListController;
use kaburlu_admin::mutation::{AssumeYes, MutationOutcome, RowActions};
use kaburlu_admin::resources::{DISTRICTS, LANGUAGES, MANDALS, STATES};
use kaburlu_admin::settings::{IdCardForm, RazorpayForm, RazorpayTarget, ValidityType};
use serde_json::json;

#[tokio::test]
async fn invalid_form_sends_nothing_and_keeps_drawer_open() -> Result<()> {
    let transport = ScriptedTransport::new();
    let client = transport.client();

    let mut drawer = Drawer::create(DistrictForm { name: "Guntur".into(), state_id: String::new() });
    let outcome = drawer.submit(&client).await;

    assert_eq!(outcome, SubmitOutcome::Invalid("State is required".into()));
    assert!(drawer.is_open());
    assert_eq!(drawer.error(), Some("State is required"));
    assert!(transport.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn saved_create_closes_drawer_and_refetches_list() -> Result<()> {
    let transport = ScriptedTransport::new();
    let client = transport.client();
    transport.reply(Method::Post, DISTRICTS.path, ApiResponse::json(201, json!({ "id": "D9", "name": "Palnadu" })));
    transport.reply_when(
        Method::Get,
        DISTRICTS.path,
        &[("stateId", "S1")],
        ApiResponse::json(200, common::rows(&["Guntur", "Palnadu"])),
    );

    let mut list = ListController::new(&DISTRICTS, 10);
    list.set_parent(Some("S1".into()));

    let mut drawer = Drawer::create(DistrictForm { name: " Palnadu ".into(), state_id: "S1".into() });
    let outcome = drawer.submit_then_refresh(&client, &mut list).await;

    assert!(outcome.is_saved());
    assert!(!drawer.is_open());
    assert_eq!(common::names(list.rows()), vec!["Guntur", "Palnadu"]);

    let post = &transport.requests_to(DISTRICTS.path)[0];
    assert_eq!(post.method, Method::Post);
    assert_eq!(post.json_body(), Some(&json!({ "name": "Palnadu", "stateId": "S1" })));
    Ok(())
}

#[tokio::test]
async fn failed_save_keeps_the_draft() -> Result<()> {
    let transport = ScriptedTransport::new();
    let client = transport.client();
    transport.reply(Method::Put, &DISTRICTS.record_path("D1"), ApiResponse::empty(500));

    let mut drawer = Drawer::edit("D1", DistrictForm { name: "Krishna".into(), state_id: "S1".into() });
    let outcome = drawer.submit(&client).await;

    assert_eq!(outcome, SubmitOutcome::Failed("Update failed: 500".into()));
    assert!(drawer.is_open());
    assert_eq!(drawer.form().name, "Krishna");
    assert_eq!(drawer.mode(), &DrawerMode::Edit("D1".into()));
    Ok(())
}

#[tokio::test]
async fn busy_drawer_refuses_a_second_submit() -> Result<()> {
    let transport = ScriptedTransport::new();
    let client = transport.client();
    transport.reply(Method::Post, LANGUAGES.path, ApiResponse::json(201, json!({ "id": "L1" })));

    let mut drawer = Drawer::create(LanguageForm { name: "Telugu".into(), code: "te".into() });
    let submission = drawer.begin_submit().unwrap();
    assert_eq!(drawer.submit(&client).await, SubmitOutcome::Busy);

    let result = submission.send(&client).await;
    assert!(drawer.finish(result).is_saved());
    assert_eq!(transport.requests().len(), 1);
    Ok(())
}

#[tokio::test]
async fn razorpay_secret_is_scrubbed_from_errors() -> Result<()> {
    let transport = ScriptedTransport::new();
    let client = transport.client();
    let path = RazorpayTarget::Tenant("T1".into()).path();
    transport.reply(
        Method::Post,
        &path,
        ApiResponse::json(400, json!({ "message": "key sk_live_123 rejected by gateway" })),
    );

    let mut form = RazorpayForm::new(RazorpayTarget::Tenant("T1".into()));
    form.key_id = "rzp_live_1".into();
    form.key_secret = "sk_live_123".into();
    let mut drawer = Drawer::create(form);

    let outcome = drawer.submit(&client).await;
    assert_eq!(outcome, SubmitOutcome::Failed("key **** rejected by gateway".into()));
    Ok(())
}

#[tokio::test]
async fn id_card_settings_load_as_create_when_absent() -> Result<()> {
    let transport = ScriptedTransport::new();
    let client = transport.client();
    let endpoint = IdCardForm::endpoint("T1");
    transport.reply(Method::Put, &endpoint, ApiResponse::json(200, json!({ "success": true })));

    let (mode, mut form) = IdCardForm::load(&client, "T1").await?;
    assert_eq!(mode, DrawerMode::Create);
    form.terms_json = vec!["  Carry at all times ".into(), "".into()];
    form.validity_type = ValidityType::FixedEndDate;
    form.fixed_valid_until = "2027-03-31".into();

    let mut drawer = Drawer::new(mode, form);
    assert!(drawer.submit(&client).await.is_saved());

    let put = transport.requests_to(&endpoint).pop().unwrap();
    let body = put.json_body().unwrap();
    assert_eq!(put.method, Method::Put);
    assert_eq!(body["termsJson"], json!(["Carry at all times"]));
    assert_eq!(body["validityType"], "FIXED_END_DATE");
    assert_eq!(body["validityDays"], 0);
    assert_eq!(body["fixedValidUntil"], "2027-03-31");
    Ok(())
}

#[tokio::test]
async fn declined_confirmation_sends_nothing() -> Result<()> {
    let transport = ScriptedTransport::new();
    let actions = RowActions::new(transport.client());
    let asked = AtomicUsize::new(0);
    let decline = |prompt: &str| {
        asked.fetch_add(1, Ordering::SeqCst);
        assert_eq!(prompt, "Delete mandal Tenali?");
        false
    };

    let row = json!({ "id": "M1", "name": "Tenali" });
    let outcome = actions.hard_delete(&MANDALS, &row, &decline).await?;
    assert_eq!(outcome, MutationOutcome::Declined);
    assert_eq!(asked.load(Ordering::SeqCst), 1);
    assert!(transport.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn soft_delete_toggle_refetches_and_releases_the_row() -> Result<()> {
    let transport = ScriptedTransport::new();
    let client = transport.client();
    transport.reply(Method::Get, STATES.path, ApiResponse::json(200, json!([{ "id": "S1", "name": "Goa", "isDeleted": false }])));
    transport.reply(Method::Put, &STATES.record_path("S1"), ApiResponse::json(200, json!({ "ok": true })));
    transport.reply(Method::Get, STATES.path, ApiResponse::json(200, json!([{ "id": "S1", "name": "Goa", "isDeleted": true }])));

    let mut list = ListController::new(&STATES, 10);
    list.reload(&client).await;
    let row = list.rows()[0].clone();

    let actions = RowActions::new(client.clone());
    let outcome = actions.toggle_in_list(&mut list, &row, &AssumeYes).await?;
    assert!(outcome.is_done());
    assert!(!actions.locks().is_locked("S1"));
    assert_eq!(list.rows()[0]["isDeleted"], true);

    let put = &transport.requests_to(&STATES.record_path("S1"))[0];
    assert_eq!(put.json_body(), Some(&json!({ "name": "Goa", "isDeleted": true })));
    Ok(())
}

#[tokio::test]
async fn concurrent_action_on_same_row_is_busy() -> Result<()> {
    let transport = ScriptedTransport::new();
    let actions = RowActions::new(transport.client());
    let _held = actions.locks().try_lock("M1").unwrap();

    let row = json!({ "id": "M1", "name": "Tenali" });
    let outcome = actions.hard_delete(&MANDALS, &row, &AssumeYes).await?;
    assert_eq!(outcome, MutationOutcome::Busy);
    assert!(transport.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn failed_toggle_releases_the_row() -> Result<()> {
    let transport = ScriptedTransport::new();
    let actions = RowActions::new(transport.client());
    let path = DISTRICTS.record_path("D1");
    transport.reply(Method::Put, &path, ApiResponse::empty(500));
    transport.reply(Method::Put, &path, ApiResponse::json(200, json!({ "ok": true })));

    let row = json!({ "id": "D1", "name": "Guntur" });
    assert!(actions.set_deleted(&DISTRICTS, &row, true, &AssumeYes).await.is_err());
    assert!(!actions.locks().is_locked("D1"));

    let retry = actions.set_deleted(&DISTRICTS, &row, true, &AssumeYes).await?;
    assert!(retry.is_done());
    assert_eq!(transport.requests_to(&path).len(), 2);
    Ok(())
}

#[tokio::test]
async fn failed_delete_releases_the_row() -> Result<()> {
    let transport = ScriptedTransport::new();
    let actions = RowActions::new(transport.client());
    let path = MANDALS.record_path("M1");
    transport.reply(Method::Delete, &path, ApiResponse::empty(500));
    transport.reply(Method::Delete, &path, ApiResponse::empty(204));

    let row = json!({ "id": "M1", "name": "Tenali" });
    assert!(actions.hard_delete(&MANDALS, &row, &AssumeYes).await.is_err());
    assert!(!actions.locks().is_locked("M1"));

    let retry = actions.hard_delete(&MANDALS, &row, &AssumeYes).await?;
    assert!(retry.is_done());
    Ok(())
}

#[tokio::test]
async fn delete_in_list_refetches_the_scope() -> Result<()> {
    let transport = ScriptedTransport::new();
    let client = transport.client();
    let scope = [("districtId", "D1")];
    transport.reply_when(Method::Get, MANDALS.path, &scope, ApiResponse::json(200, common::rows(&["Tenali", "Bapatla"])));
    transport.reply(Method::Delete, &MANDALS.record_path("R1"), ApiResponse::empty(204));
    transport.reply_when(Method::Get, MANDALS.path, &scope, ApiResponse::json(200, common::rows(&["Bapatla"])));

    let mut list = ListController::new(&MANDALS, 10);
    let plan = list.set_parent(Some("D1".into()));
    list.execute(&client, plan).await;
    let row = list.rows()[0].clone();

    let actions = RowActions::new(client.clone());
    let outcome = actions.delete_in_list(&mut list, &row, &AssumeYes).await?;
    assert!(outcome.is_done());
    assert_eq!(common::names(list.rows()), vec!["Bapatla"]);
    Ok(())
}
