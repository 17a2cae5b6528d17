// Typed views of API records. Every field is defaulted: the server owns these
// records and the client only needs to read what is there.
use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Language {
    pub id: String,
    pub code: String,
    pub name: String,
    pub native_name: Option<String>,
    pub direction: Option<String>,
    pub is_deleted: bool,
}

impl Language {
    /// Name, falling back to the code
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.code
        } else {
            &self.name
        }
    }
}

/// The language preselected on the categories screen: `en`/English, else the first.
pub fn default_language(languages: &[Language]) -> Option<&Language> {
    languages
        .iter()
        .find(|l| l.code.eq_ignore_ascii_case("en") || l.name.eq_ignore_ascii_case("english"))
        .or_else(|| languages.first())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: Option<String>,
    pub icon_url: Option<String>,
    pub is_active: bool,
    pub parent_id: Option<String>,
    pub language_id: Option<String>,
    pub children: Vec<Category>,
}

impl Category {
    /// Depth-first flattening with nesting depth, for indented listings.
    ///
    /// Servers may return a child both nested under its parent and again at
    /// the top level; it is listed once, under the parent.
    pub fn flatten(categories: &[Category]) -> Vec<(usize, &Category)> {
        fn nested<'a>(items: &'a [Category], ids: &mut HashSet<&'a str>) {
            for c in items {
                ids.extend(c.children.iter().map(|child| child.id.as_str()).filter(|id| !id.is_empty()));
                nested(&c.children, ids);
            }
        }
        fn walk<'a>(
            out: &mut Vec<(usize, &'a Category)>,
            seen: &mut HashSet<&'a str>,
            items: &'a [Category],
            depth: usize,
        ) {
            for c in items {
                if !c.id.is_empty() && !seen.insert(c.id.as_str()) {
                    continue;
                }
                out.push((depth, c));
                walk(out, seen, &c.children, depth + 1);
            }
        }
        let mut children = HashSet::new();
        nested(categories, &mut children);
        let roots: Vec<&Category> = categories.iter().filter(|c| !children.contains(c.id.as_str())).collect();
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        for root in roots {
            walk(&mut out, &mut seen, std::slice::from_ref(root), 0);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrgiStatus {
    Pending,
    Verified,
    Rejected,
}

impl PrgiStatus {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::to_uppercase) {
            Some(s) if s == "VERIFIED" => PrgiStatus::Verified,
            Some(s) if s.starts_with("REJECT") => PrgiStatus::Rejected,
            _ => PrgiStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainStatus {
    Pending,
    Active,
    Other(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Domain {
    pub id: String,
    pub domain: String,
    pub is_primary: bool,
    pub status: Option<String>,
    pub verified_at: Option<String>,
}

impl Domain {
    pub fn status(&self) -> DomainStatus {
        match self.status.as_deref().map(str::to_uppercase).as_deref() {
            Some("ACTIVE") => DomainStatus::Active,
            Some("PENDING") | None => DomainStatus::Pending,
            Some(other) => DomainStatus::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub slug: Option<String>,
    pub prgi_number: Option<String>,
    pub prgi_status: Option<String>,
    pub state_id: Option<String>,
    pub entity: Option<TenantEntity>,
    pub domains: Vec<Domain>,
}

impl Tenant {
    pub fn prgi(&self) -> PrgiStatus {
        PrgiStatus::parse(self.prgi_status.as_deref())
    }

    pub fn primary_domain(&self) -> Option<&Domain> {
        self.domains.iter().find(|d| d.is_primary)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TenantEntity {
    pub periodicity: Option<String>,
    pub registration_date: Option<String>,
    pub publisher_name: Option<String>,
    pub editor_name: Option<String>,
    pub admin_mobile: Option<String>,
    pub publisher_mobile: Option<String>,
    pub printing_press_name: Option<String>,
    pub printing_city_name: Option<String>,
    pub printing_district_id: Option<String>,
    pub printing_mandal_id: Option<String>,
    pub address: Option<String>,
    pub language_id: Option<String>,
}

/// Razorpay credentials as read back from the server. The raw secret is
/// never part of a read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RazorpayConfig {
    pub id: Option<String>,
    pub tenant_id: Option<String>,
    pub key_id: String,
    pub key_secret_masked: Option<String>,
    pub active: bool,
    pub tenant: Option<Value>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub permissions: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub role: Option<Value>,
    pub role_id: Option<String>,
    pub language_id: Option<String>,
    pub status: Option<String>,
    pub device_id: Option<String>,
    pub location: Option<Location>,
}

impl User {
    /// Mobile number, else email, else id
    pub fn label(&self) -> &str {
        self.mobile_number
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.email.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reporter {
    pub id: String,
    pub full_name: Option<String>,
    pub mobile_number: Option<String>,
    pub level: Option<Value>,
    pub designation: Option<Value>,
    pub kyc_status: Option<String>,
    pub active: bool,
    pub subscription_active: bool,
    pub monthly_subscription_amount: Option<f64>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PermissionModule {
    #[serde(alias = "module", alias = "name")]
    pub key: String,
    pub label: Option<String>,
    #[serde(alias = "actions")]
    pub typical_actions: Vec<String>,
}

/// Name of a nested `{name}` object, or the value itself when it is a string
pub fn display_name(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(o) => o
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

/// `YYYY-MM-DD` to the `DD/MM/YYYY` form the registration endpoint expects.
/// Anything that is not an ISO date passes through unchanged.
pub fn to_dd_mm_yyyy(iso: &str) -> String {
    match NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => iso.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn english_is_default_language() {
        let langs: Vec<Language> = serde_json::from_value(json!([
            { "id": "L1", "code": "te", "name": "Telugu" },
            { "id": "L2", "code": "en", "name": "English" }
        ]))
        .unwrap();
        assert_eq!(default_language(&langs).unwrap().id, "L2");
        assert_eq!(default_language(&langs[..1]).unwrap().id, "L1");
        assert!(default_language(&[]).is_none());
    }

    #[test]
    fn tenant_primary_and_prgi() {
        let tenant: Tenant = serde_json::from_value(json!({
            "id": "T1", "name": "Daily", "prgiStatus": "verified",
            "domains": [
                { "id": "D1", "domain": "epaper.daily.in", "isPrimary": false },
                { "id": "D2", "domain": "daily.in", "isPrimary": true, "status": "ACTIVE" }
            ]
        }))
        .unwrap();
        assert_eq!(tenant.prgi(), PrgiStatus::Verified);
        let primary = tenant.primary_domain().unwrap();
        assert_eq!(primary.domain, "daily.in");
        assert_eq!(primary.status(), DomainStatus::Active);
    }

    #[test]
    fn category_tree_flattens_depth_first() {
        let cats: Vec<Category> = serde_json::from_value(json!([
            { "id": "A", "name": "News", "children": [{ "id": "A1", "name": "Local" }] },
            { "id": "B", "name": "Sports" }
        ]))
        .unwrap();
        let flat: Vec<_> = Category::flatten(&cats).into_iter().map(|(d, c)| (d, c.id.as_str())).collect();
        assert_eq!(flat, vec![(0, "A"), (1, "A1"), (0, "B")]);
    }

    #[test]
    fn child_listed_flat_and_nested_appears_once() {
        let cats: Vec<Category> = serde_json::from_value(json!([
            { "id": "A1", "name": "Local", "parentId": "A" },
            { "id": "A", "name": "News", "children": [{ "id": "A1", "name": "Local" }] },
            { "id": "B", "name": "Sports" }
        ]))
        .unwrap();
        let flat: Vec<_> = Category::flatten(&cats).into_iter().map(|(d, c)| (d, c.id.as_str())).collect();
        assert_eq!(flat, vec![(0, "A"), (1, "A1"), (0, "B")]);
    }

    #[test]
    fn registration_date_conversion() {
        assert_eq!(to_dd_mm_yyyy("2024-03-07"), "07/03/2024");
        assert_eq!(to_dd_mm_yyyy("07/03/2024"), "07/03/2024");
    }

    #[test]
    fn user_label_prefers_mobile() {
        let user = User { id: "U".into(), email: Some("a@b.c".into()), ..Default::default() };
        assert_eq!(user.label(), "a@b.c");
    }
}
