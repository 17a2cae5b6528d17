mod common;

use anyhow::Result;
use kaburlu_admin::drawer::upload::{bulk_upload, upload_media, BulkTarget, MediaUpload};
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn media_upload_returns_public_url() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/media/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "publicUrl": "https://cdn.kaburlu.test/logos/logo.png" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir()?;
    let file = dir.path().join("logo.png");
    std::fs::write(&file, b"\x89PNG fake")?;

    let client = common::http_client(&server.uri());
    let upload = MediaUpload::from_path(&file, "logos", "image").await?;
    let url = upload_media(&client, upload).await?;
    assert_eq!(url, "https://cdn.kaburlu.test/logos/logo.png");

    let received = server.received_requests().await.unwrap_or_default();
    let body = String::from_utf8_lossy(&received[0].body);
    assert!(body.contains("filename=\"logo.png\""));
    assert!(body.contains("image/png"));
    assert!(body.contains("name=\"folder\"\r\n\r\nlogos"));
    Ok(())
}

#[tokio::test]
async fn upload_without_url_is_an_error() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/media/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let client = common::http_client(&server.uri());
    let upload = MediaUpload::image(b"GIF89a".to_vec(), Some("icon.gif".into()));
    assert!(upload_media(&client, upload).await.is_err());
    Ok(())
}

#[tokio::test]
async fn bulk_csv_with_bad_header_is_refused_locally() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/mandals/bulk-upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "created": 2 } })))
        .expect(1)
        .mount(&server)
        .await;
    let client = common::http_client(&server.uri());

    let bad = b"name,stateId\nTenali,S1\n".to_vec();
    let err = bulk_upload(&client, BulkTarget::Mandals, "mandals.csv", bad).await.unwrap_err();
    assert_eq!(err.to_string(), "CSV must have a districtId or districtName column");

    let good = b"name,districtName,isAssemblyConstituency\nTenali,Guntur,false\nBapatla,Bapatla,true\n".to_vec();
    let summary = bulk_upload(&client, BulkTarget::Mandals, "mandals.csv", good).await?;
    assert_eq!(summary, json!({ "created": 2 }));
    Ok(())
}
