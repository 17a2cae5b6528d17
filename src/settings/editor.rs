use serde_json::{Map, Value};
use tracing::{debug, info};

use super::defaults::default_settings;
use super::path::{get_path, set_path};
use crate::api::{ApiClient, ApiRequest};
use crate::error::{AdminError, AdminResult};
use crate::resources::tenant_path;

/// The settings document inside a read response: `settings`, else
/// `effective`, else `data`, else the body itself.
pub fn extract_settings(body: Value) -> Value {
    match body {
        Value::Object(mut obj) => ["settings", "effective", "data"]
            .iter()
            .find_map(|k| obj.remove(*k).filter(|v| v.is_object()))
            .unwrap_or(Value::Object(obj)),
        Value::Null => Value::Object(Map::new()),
        other => other,
    }
}

/// Working copy of one domain's settings document.
///
/// Edits are local until `save`, which always sends the whole document.
#[derive(Debug, Clone)]
pub struct SettingsEditor {
    tenant_id: String,
    domain_id: String,
    document: Value,
    dirty: bool,
}

impl SettingsEditor {
    pub fn new(tenant_id: impl Into<String>, domain_id: impl Into<String>, document: Value) -> Self {
        let document = if document.is_null() { Value::Object(Map::new()) } else { document };
        Self { tenant_id: tenant_id.into(), domain_id: domain_id.into(), document, dirty: false }
    }

    pub fn endpoint(tenant_id: &str, domain_id: &str) -> String {
        tenant_path(tenant_id, &format!("/domains/{}/settings", domain_id))
    }

    /// Fetch the current document; a domain without settings yields `{}`.
    pub async fn load(client: &ApiClient, tenant_id: &str, domain_id: &str) -> AdminResult<Self> {
        let path = Self::endpoint(tenant_id, domain_id);
        let document = match client.fetch_record(ApiRequest::get(path)).await? {
            Some(body) => extract_settings(body),
            None => {
                debug!("no settings yet for domain {}", domain_id);
                Value::Object(Map::new())
            }
        };
        Ok(Self::new(tenant_id, domain_id, document))
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn into_document(self) -> Value {
        self.document
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_empty(&self) -> bool {
        match &self.document {
            Value::Object(map) => map.is_empty(),
            Value::Null => true,
            _ => false,
        }
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        get_path(&self.document, path)
    }

    pub fn set(&mut self, path: &str, value: Value) -> AdminResult<()> {
        self.document = set_path(&self.document, path, value)?;
        self.dirty = true;
        Ok(())
    }

    /// Replace an empty document with the baseline. A document that already
    /// has content, however partial, is left alone.
    pub fn use_defaults(&mut self) -> AdminResult<()> {
        if !self.is_empty() {
            return Err(AdminError::validation(
                "Settings already exist; defaults only apply to an empty document",
            ));
        }
        self.document = default_settings();
        self.dirty = true;
        Ok(())
    }

    pub async fn save(&mut self, client: &ApiClient) -> AdminResult<Option<Value>> {
        let path = Self::endpoint(&self.tenant_id, &self.domain_id);
        let saved = client.save_document(&path, &self.document).await?;
        self.dirty = false;
        info!("saved settings for domain {}", self.domain_id);
        Ok(saved)
    }
}
