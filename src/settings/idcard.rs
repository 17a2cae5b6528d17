//! Per-tenant press ID card settings.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::{ApiClient, ApiRequest, Method, Page};
use crate::drawer::{DrawerMode, Form, Submission};
use crate::error::{AdminError, AdminResult};
use crate::resources::{tenant_path, ID_CARD_SETTINGS};

pub const MAX_TERMS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidityType {
    #[default]
    PerUserDays,
    FixedEndDate,
}

impl std::str::FromStr for ValidityType {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "PER_USER_DAYS" => Ok(ValidityType::PerUserDays),
            "FIXED_END_DATE" => Ok(ValidityType::FixedEndDate),
            other => Err(AdminError::validation(format!("Unknown validity type '{}'", other))),
        }
    }
}

/// Editable ID card settings for one tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdCardForm {
    #[serde(skip)]
    pub tenant_id: String,
    pub template_id: String,
    pub front_logo_url: String,
    pub round_stamp_url: String,
    pub sign_url: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub terms_json: Vec<String>,
    pub office_address: String,
    pub help_line1: String,
    pub help_line2: String,
    pub validity_type: ValidityType,
    pub validity_days: u32,
    pub fixed_valid_until: String,
    pub id_prefix: String,
    pub id_digits: u32,
}

impl Default for IdCardForm {
    fn default() -> Self {
        Self {
            tenant_id: String::new(),
            template_id: "STYLE_1".to_string(),
            front_logo_url: String::new(),
            round_stamp_url: String::new(),
            sign_url: String::new(),
            primary_color: "#004f9f".to_string(),
            secondary_color: "#ff0000".to_string(),
            terms_json: vec![String::new()],
            office_address: String::new(),
            help_line1: String::new(),
            help_line2: String::new(),
            validity_type: ValidityType::PerUserDays,
            validity_days: 0,
            fixed_valid_until: String::new(),
            id_prefix: "KM".to_string(),
            id_digits: 6,
        }
    }
}

impl IdCardForm {
    pub fn blank(tenant_id: impl Into<String>) -> Self {
        Self { tenant_id: tenant_id.into(), ..Self::default() }
    }

    /// Form seeded from a stored record; blank or missing fields take the
    /// defaults and terms are cut to the first five.
    pub fn from_record(tenant_id: &str, record: &Value) -> Self {
        let base = Self::blank(tenant_id);
        let text = |key: &str, fallback: &str| {
            record
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };
        let number = |key: &str, fallback: u32| {
            record.get(key).and_then(Value::as_u64).map(|n| n as u32).unwrap_or(fallback)
        };
        let mut terms: Vec<String> = record
            .get("termsJson")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();
        terms.truncate(MAX_TERMS);
        if terms.is_empty() {
            terms.push(String::new());
        }
        let validity_type = record
            .get("validityType")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        Self {
            template_id: text("templateId", &base.template_id),
            front_logo_url: text("frontLogoUrl", ""),
            round_stamp_url: text("roundStampUrl", ""),
            sign_url: text("signUrl", ""),
            primary_color: text("primaryColor", &base.primary_color),
            secondary_color: text("secondaryColor", &base.secondary_color),
            terms_json: terms,
            office_address: text("officeAddress", ""),
            help_line1: text("helpLine1", ""),
            help_line2: text("helpLine2", ""),
            validity_type,
            validity_days: number("validityDays", 0),
            fixed_valid_until: text("fixedValidUntil", ""),
            id_prefix: text("idPrefix", &base.id_prefix),
            id_digits: number("idDigits", base.id_digits),
            tenant_id: base.tenant_id,
        }
    }

    pub fn endpoint(tenant_id: &str) -> String {
        tenant_path(tenant_id, "/id-card-settings")
    }

    /// Stored settings as an edit draft, or a blank create draft on 404.
    pub async fn load(client: &ApiClient, tenant_id: &str) -> AdminResult<(DrawerMode, Self)> {
        let record = client.fetch_record(ApiRequest::get(Self::endpoint(tenant_id))).await?;
        Ok(match record {
            Some(record) => (DrawerMode::Edit(tenant_id.to_string()), Self::from_record(tenant_id, &record)),
            None => (DrawerMode::Create, Self::blank(tenant_id)),
        })
    }

    pub fn add_term(&mut self, term: impl Into<String>) -> AdminResult<()> {
        if self.terms_json.len() >= MAX_TERMS {
            return Err(AdminError::validation(format!("At most {} terms are allowed", MAX_TERMS)));
        }
        self.terms_json.push(term.into());
        Ok(())
    }

    fn payload(&self) -> Value {
        let terms: Vec<&str> = self
            .terms_json
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .take(MAX_TERMS)
            .collect();
        let (days, until) = match self.validity_type {
            ValidityType::PerUserDays => (self.validity_days, Value::Null),
            ValidityType::FixedEndDate => (0, json!(self.fixed_valid_until)),
        };
        json!({
            "templateId": self.template_id,
            "frontLogoUrl": self.front_logo_url,
            "roundStampUrl": self.round_stamp_url,
            "signUrl": self.sign_url,
            "primaryColor": self.primary_color,
            "secondaryColor": self.secondary_color,
            "termsJson": terms,
            "officeAddress": self.office_address,
            "helpLine1": self.help_line1,
            "helpLine2": self.help_line2,
            "validityType": self.validity_type,
            "validityDays": days,
            "fixedValidUntil": until,
            "idPrefix": self.id_prefix,
            "idDigits": if self.id_digits == 0 { 6 } else { self.id_digits },
        })
    }
}

impl Form for IdCardForm {
    fn submission(&self, _mode: &DrawerMode) -> AdminResult<Submission> {
        if self.tenant_id.trim().is_empty() {
            return Err(AdminError::validation("Tenant is required"));
        }
        if self.validity_type == ValidityType::FixedEndDate && self.fixed_valid_until.trim().is_empty() {
            return Err(AdminError::validation("Valid until date is required"));
        }
        Ok(Submission {
            action: "Save",
            method: Method::Put,
            path: Self::endpoint(&self.tenant_id),
            body: self.payload(),
        })
    }
}

pub async fn list_id_card_settings(client: &ApiClient, page: u32, page_size: u32) -> AdminResult<Page<Value>> {
    let request = ApiRequest::get(ID_CARD_SETTINGS.path)
        .query("page", page)
        .query("pageSize", page_size);
    client.fetch_list(request).await
}
