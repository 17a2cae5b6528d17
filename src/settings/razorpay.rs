//! Razorpay credentials, per tenant and platform-wide.
//!
//! The key secret is write-only: reads expose only `keySecretMasked` and a
//! draft never starts with a secret filled in.

use serde_json::{json, Value};

use crate::api::{ApiClient, ApiRequest, Page};
use crate::drawer::validate::required;
use crate::drawer::{DrawerMode, Form, Submission};
use crate::error::{AdminError, AdminResult};
use crate::list::matches_search;
use crate::resources::{tenant_path, RazorpayConfig, RAZORPAY_CONFIGS};

pub const GLOBAL_RAZORPAY_PATH: &str = "/api/v1/admin/razorpay-config/global";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RazorpayTarget {
    Tenant(String),
    Global,
}

impl RazorpayTarget {
    pub fn path(&self) -> String {
        match self {
            RazorpayTarget::Tenant(id) => tenant_path(id, "/razorpay-config"),
            RazorpayTarget::Global => GLOBAL_RAZORPAY_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RazorpayForm {
    pub target: RazorpayTarget,
    pub key_id: String,
    pub key_secret: String,
    pub active: bool,
}

impl RazorpayForm {
    pub fn new(target: RazorpayTarget) -> Self {
        Self { target, key_id: String::new(), key_secret: String::new(), active: true }
    }

    /// Edit draft from a stored config. The secret stays blank.
    pub fn from_config(target: RazorpayTarget, config: &RazorpayConfig) -> Self {
        Self { target, key_id: config.key_id.clone(), key_secret: String::new(), active: config.active }
    }

    /// Current config for `target`; `None` when none has been set.
    pub async fn load(client: &ApiClient, target: &RazorpayTarget) -> AdminResult<Option<RazorpayConfig>> {
        match client.fetch_record(ApiRequest::get(target.path())).await? {
            Some(record) => Ok(Some(serde_json::from_value(record)?)),
            None => Ok(None),
        }
    }

    /// Draft plus drawer mode: edit when a config exists, create otherwise.
    pub async fn open(client: &ApiClient, target: RazorpayTarget) -> AdminResult<(DrawerMode, Self)> {
        let existing = Self::load(client, &target).await?;
        let mode_id = match &target {
            RazorpayTarget::Tenant(id) => id.clone(),
            RazorpayTarget::Global => "global".to_string(),
        };
        Ok(match existing {
            Some(config) => (DrawerMode::Edit(mode_id), Self::from_config(target, &config)),
            None => (DrawerMode::Create, Self::new(target)),
        })
    }
}

impl Form for RazorpayForm {
    fn submission(&self, mode: &DrawerMode) -> AdminResult<Submission> {
        let key_id = required("Key ID", &self.key_id)?;
        let secret = self.key_secret.trim();
        let mut body = json!({ "keyId": key_id, "active": self.active });

        let creating = mode.is_create() && self.target != RazorpayTarget::Global;
        if creating && secret.is_empty() {
            return Err(AdminError::validation("Key Secret is required"));
        }
        if !secret.is_empty() {
            body["keySecret"] = json!(secret);
        }

        let path = self.target.path();
        Ok(if creating { Submission::create(path, body) } else { Submission::update(path, body) })
    }

    fn secrets(&self) -> Vec<&str> {
        vec![self.key_secret.as_str()]
    }
}

pub async fn list_razorpay_configs(
    client: &ApiClient,
    active: bool,
    page: u32,
    page_size: u32,
) -> AdminResult<Page<Value>> {
    let request = ApiRequest::get(RAZORPAY_CONFIGS.path)
        .query("active", active)
        .query("page", page)
        .query("pageSize", page_size);
    client.fetch_list(request).await
}

/// Local filter over a loaded page by tenant name or key id.
pub fn search_configs<'a>(rows: &'a [Value], needle: &str) -> Vec<&'a Value> {
    rows.iter()
        .filter(|row| matches_search(row, RAZORPAY_CONFIGS.search_keys, needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;

    fn tenant() -> RazorpayTarget {
        RazorpayTarget::Tenant("T1".into())
    }

    #[test]
    fn create_needs_secret() {
        let mut form = RazorpayForm::new(tenant());
        form.key_id = "rzp_live_1".into();
        let err = form.submission(&DrawerMode::Create).unwrap_err();
        assert_eq!(err.to_string(), "Key Secret is required");

        form.key_secret = " s3cret ".into();
        let sub = form.submission(&DrawerMode::Create).unwrap();
        assert_eq!(sub.method, Method::Post);
        assert_eq!(sub.path, "/api/v1/tenants/T1/razorpay-config");
        assert_eq!(sub.body, json!({ "keyId": "rzp_live_1", "keySecret": "s3cret", "active": true }));
    }

    #[test]
    fn edit_omits_blank_secret() {
        let config = RazorpayConfig {
            key_id: "rzp_1".into(),
            key_secret_masked: Some("****abcd".into()),
            active: false,
            ..Default::default()
        };
        let form = RazorpayForm::from_config(tenant(), &config);
        assert!(form.key_secret.is_empty());
        let sub = form.submission(&DrawerMode::Edit("T1".into())).unwrap();
        assert_eq!(sub.method, Method::Put);
        assert_eq!(sub.body, json!({ "keyId": "rzp_1", "active": false }));
    }

    #[test]
    fn global_is_always_put() {
        let mut form = RazorpayForm::new(RazorpayTarget::Global);
        form.key_id = "rzp_g".into();
        let sub = form.submission(&DrawerMode::Create).unwrap();
        assert_eq!(sub.method, Method::Put);
        assert_eq!(sub.path, GLOBAL_RAZORPAY_PATH);
    }

    #[test]
    fn search_by_tenant_or_key() {
        let rows = vec![
            json!({ "keyId": "rzp_a", "tenant": { "name": "Prashna" } }),
            json!({ "keyId": "rzp_b", "tenant": { "name": "Kaburlu" } }),
        ];
        assert_eq!(search_configs(&rows, "kab").len(), 1);
        assert_eq!(search_configs(&rows, "RZP_A").len(), 1);
        assert_eq!(search_configs(&rows, "").len(), 2);
    }
}
