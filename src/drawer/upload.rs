//! Media upload and CSV bulk import.
//!
//! Uploads are independent of record saves: the returned URL is copied into a
//! form field, and an abandoned form leaves the asset to the server.

use std::path::Path;

use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::api::{ApiClient, ApiRequest, FormPart, Method};
use crate::error::{AdminError, AdminResult};

pub const MEDIA_UPLOAD_PATH: &str = "/api/v1/media/upload";

#[derive(Debug, Clone, PartialEq)]
pub struct MediaUpload {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub folder: String,
    pub kind: String,
}

impl MediaUpload {
    pub fn image(bytes: Vec<u8>, filename: Option<String>) -> Self {
        let content_type = filename.as_deref().and_then(image_content_type).map(str::to_string);
        Self { bytes, filename, content_type, folder: String::new(), kind: "image".to_string() }
    }

    pub async fn from_path(path: &Path, folder: &str, kind: &str) -> AdminResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        let filename = path.file_name().map(|n| n.to_string_lossy().into_owned());
        let mut upload = Self::image(bytes, filename);
        upload.folder = folder.to_string();
        upload.kind = kind.to_string();
        Ok(upload)
    }

    fn parts(self) -> Vec<FormPart> {
        let name = self
            .filename
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("upload-{}", Uuid::new_v4()));
        vec![
            FormPart::File {
                name: "file".to_string(),
                filename: name.clone(),
                content_type: self.content_type,
                bytes: self.bytes,
            },
            FormPart::text("key", name.clone()),
            FormPart::text("filename", name),
            FormPart::text("folder", self.folder),
            FormPart::text("kind", self.kind),
        ]
    }
}

fn image_content_type(filename: &str) -> Option<&'static str> {
    let ext = filename.rsplit('.').next()?.to_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "ico" => Some("image/x-icon"),
        _ => None,
    }
}

/// Public URL from an upload response: `publicUrl`, `url`, `location`,
/// looked up at the top level and then under `data`.
pub fn uploaded_url(body: &Value) -> Option<String> {
    let pick = |v: &Value| {
        ["publicUrl", "url", "location"]
            .iter()
            .find_map(|k| v.get(*k).and_then(Value::as_str).filter(|s| !s.is_empty()))
            .map(str::to_string)
    };
    pick(body).or_else(|| body.get("data").and_then(pick))
}

/// Upload a file and return its public URL.
pub async fn upload_media(client: &ApiClient, upload: MediaUpload) -> AdminResult<String> {
    let request = ApiRequest::new(Method::Post, MEDIA_UPLOAD_PATH).multipart(upload.parts());
    let response = client.send(request).await?;
    if !response.is_success() {
        return Err(AdminError::from_response("Upload", response.status, response.body.as_ref()));
    }
    let url = response
        .body
        .as_ref()
        .and_then(uploaded_url)
        .ok_or_else(|| AdminError::Decode("upload response carried no URL".to_string()))?;
    info!("uploaded media to {}", url);
    Ok(url)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkTarget {
    /// `name` plus `stateId` or `stateName`
    Districts,
    /// `name` plus `districtId` or `districtName`, optional `isAssemblyConstituency`
    Mandals,
}

impl BulkTarget {
    pub fn path(&self) -> &'static str {
        match self {
            BulkTarget::Districts => "/api/v1/districts/bulk-upload",
            BulkTarget::Mandals => "/api/v1/mandals/bulk-upload",
        }
    }

    fn parent_columns(&self) -> [&'static str; 2] {
        match self {
            BulkTarget::Districts => ["stateId", "stateName"],
            BulkTarget::Mandals => ["districtId", "districtName"],
        }
    }

    /// Check the header row against the import's column contract.
    pub fn check_header(&self, csv: &str) -> AdminResult<()> {
        let header = csv
            .lines()
            .map(|l| l.trim_start_matches('\u{feff}').trim())
            .find(|l| !l.is_empty())
            .ok_or_else(|| AdminError::validation("CSV file is empty"))?;
        let columns: Vec<&str> = header.split(',').map(|c| c.trim().trim_matches('"')).collect();

        if !columns.contains(&"name") {
            return Err(AdminError::validation("CSV must have a name column"));
        }
        let [by_id, by_name] = self.parent_columns();
        if !columns.contains(&by_id) && !columns.contains(&by_name) {
            return Err(AdminError::validation(format!("CSV must have a {} or {} column", by_id, by_name)));
        }
        Ok(())
    }
}

/// Upload a CSV to a bulk import endpoint; returns the server's `data` summary.
pub async fn bulk_upload(client: &ApiClient, target: BulkTarget, filename: &str, csv: Vec<u8>) -> AdminResult<Value> {
    let text = String::from_utf8_lossy(&csv);
    target.check_header(&text)?;

    let part = FormPart::File {
        name: "file".to_string(),
        filename: filename.to_string(),
        content_type: Some("text/csv".to_string()),
        bytes: csv,
    };
    let request = ApiRequest::new(Method::Post, target.path()).multipart(vec![part]);
    let response = client.send(request).await?;
    if !response.is_success() {
        return Err(AdminError::from_response("Upload", response.status, response.body.as_ref()));
    }
    let body = response.body.unwrap_or(Value::Null);
    Ok(body.get("data").cloned().unwrap_or(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_lookup_order() {
        assert_eq!(uploaded_url(&json!({ "publicUrl": "a", "url": "b" })).as_deref(), Some("a"));
        assert_eq!(uploaded_url(&json!({ "location": "c" })).as_deref(), Some("c"));
        assert_eq!(uploaded_url(&json!({ "data": { "url": "d" } })).as_deref(), Some("d"));
        assert_eq!(uploaded_url(&json!({ "publicUrl": "" })), None);
    }

    #[test]
    fn parts_carry_contract_fields() {
        let parts = MediaUpload::image(vec![1, 2], Some("logo.png".into())).parts();
        let names: Vec<&str> = parts.iter().map(FormPart::name).collect();
        assert_eq!(names, vec!["file", "key", "filename", "folder", "kind"]);
        match &parts[0] {
            FormPart::File { content_type, filename, .. } => {
                assert_eq!(content_type.as_deref(), Some("image/png"));
                assert_eq!(filename, "logo.png");
            }
            other => panic!("unexpected part {:?}", other),
        }
    }

    #[test]
    fn nameless_upload_gets_generated_key() {
        let parts = MediaUpload::image(vec![], None).parts();
        match (&parts[1], &parts[2]) {
            (FormPart::Text { value: key, .. }, FormPart::Text { value: filename, .. }) => {
                assert!(key.starts_with("upload-"));
                assert_eq!(key, filename);
            }
            other => panic!("unexpected parts {:?}", other),
        }
    }

    #[test]
    fn csv_header_contract() {
        assert!(BulkTarget::Districts.check_header("name,stateId\nA,S1").is_ok());
        assert!(BulkTarget::Districts.check_header("\u{feff}name,stateName\n").is_ok());
        assert!(BulkTarget::Mandals.check_header("name,districtName,isAssemblyConstituency").is_ok());
        let err = BulkTarget::Mandals.check_header("name,stateId").unwrap_err();
        assert_eq!(err.to_string(), "CSV must have a districtId or districtName column");
        assert!(BulkTarget::Districts.check_header("\n\n").is_err());
    }
}
