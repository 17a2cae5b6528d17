use serde::Serialize;
use serde_json::{json, Map, Value};

use super::validate::{self, optional, required};
use super::{DrawerMode, Form, Submission};
use crate::api::Method;
use crate::error::{AdminError, AdminResult};
use crate::resources::{
    tenant_path, to_dd_mm_yyyy, Tenant, TenantEntity, ASSEMBLY_CONSTITUENCIES, CATEGORIES, DISTRICTS,
    LANGUAGES, MANDALS, ROLES, TENANTS, USERS,
};

fn text(record: &Value, key: &str) -> String {
    record.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

/// `key`, else `nested.id` (records often embed the parent object)
fn id_ref(record: &Value, key: &str, nested: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .or_else(|| record.get(nested).and_then(|n| n.get("id")).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

fn create_only(mode: &DrawerMode, what: &str) -> AdminResult<()> {
    match mode {
        DrawerMode::Create => Ok(()),
        DrawerMode::Edit(_) => Err(AdminError::validation(format!("{} cannot be edited", what))),
    }
}

/// Drop keys whose value is null, matching how absent optional fields are sent.
fn compact(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(map.into_iter().filter(|(_, v)| !v.is_null()).collect::<Map<_, _>>()),
        other => other,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistrictForm {
    pub name: String,
    pub state_id: String,
}

impl DistrictForm {
    pub fn from_record(record: &Value) -> Self {
        Self { name: text(record, "name"), state_id: id_ref(record, "stateId", "state") }
    }
}

impl Form for DistrictForm {
    fn submission(&self, mode: &DrawerMode) -> AdminResult<Submission> {
        let name = required("Name", &self.name)?;
        match mode {
            DrawerMode::Create => {
                let state_id = required("State", &self.state_id)?;
                Ok(Submission::create(DISTRICTS.path, json!({ "name": name, "stateId": state_id })))
            }
            DrawerMode::Edit(id) => Ok(Submission::update(DISTRICTS.record_path(id), json!({ "name": name }))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssemblyForm {
    pub name: String,
    pub district_id: String,
}

impl AssemblyForm {
    pub fn from_record(record: &Value) -> Self {
        Self { name: text(record, "name"), district_id: id_ref(record, "districtId", "district") }
    }
}

impl Form for AssemblyForm {
    fn submission(&self, mode: &DrawerMode) -> AdminResult<Submission> {
        let name = required("Name", &self.name)?;
        match mode {
            DrawerMode::Create => {
                let district_id = required("District", &self.district_id)?;
                Ok(Submission::create(
                    ASSEMBLY_CONSTITUENCIES.path,
                    json!({ "name": name, "districtId": district_id }),
                ))
            }
            // saving an edit also restores a soft-deleted row
            DrawerMode::Edit(id) => Ok(Submission::update(
                ASSEMBLY_CONSTITUENCIES.record_path(id),
                json!({ "name": name, "isDeleted": false }),
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MandalForm {
    pub name: String,
    pub district_id: String,
    /// `None` leaves the stored flag untouched on edit
    pub is_assembly_constituency: Option<bool>,
}

impl MandalForm {
    pub fn from_record(record: &Value) -> Self {
        Self {
            name: text(record, "name"),
            district_id: id_ref(record, "districtId", "district"),
            is_assembly_constituency: Some(
                record.get("isAssemblyConstituency").and_then(Value::as_bool).unwrap_or(false),
            ),
        }
    }
}

impl Form for MandalForm {
    fn submission(&self, mode: &DrawerMode) -> AdminResult<Submission> {
        let name = required("Name", &self.name)?;
        match mode {
            DrawerMode::Create => {
                let district_id = required("District", &self.district_id)?;
                Ok(Submission::create(
                    MANDALS.path,
                    json!({
                        "name": name,
                        "districtId": district_id,
                        "isAssemblyConstituency": self.is_assembly_constituency.unwrap_or(false),
                    }),
                ))
            }
            DrawerMode::Edit(id) => {
                let mut body = json!({ "name": name });
                if let Some(flag) = self.is_assembly_constituency {
                    body["isAssemblyConstituency"] = json!(flag);
                }
                Ok(Submission::update(MANDALS.record_path(id), body))
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageForm {
    pub name: String,
    pub code: String,
}

impl Form for LanguageForm {
    fn submission(&self, mode: &DrawerMode) -> AdminResult<Submission> {
        create_only(mode, "Languages")?;
        let name = required("Name", &self.name)?;
        let code = required("Code", &self.code)?;
        Ok(Submission::create(LANGUAGES.path, json!({ "name": name, "code": code })))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryForm {
    pub name: String,
    pub icon_url: String,
    pub is_active: bool,
    pub parent_id: String,
    pub language_id: String,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            icon_url: String::new(),
            is_active: true,
            parent_id: String::new(),
            language_id: String::new(),
        }
    }
}

impl CategoryForm {
    pub fn from_record(record: &Value) -> Self {
        Self {
            name: text(record, "name"),
            icon_url: text(record, "iconUrl"),
            is_active: record.get("isActive").and_then(Value::as_bool).unwrap_or(true),
            parent_id: text(record, "parentId"),
            language_id: id_ref(record, "languageId", "language"),
        }
    }
}

impl Form for CategoryForm {
    fn submission(&self, mode: &DrawerMode) -> AdminResult<Submission> {
        let name = required("Name", &self.name)?;
        let mut body = json!({
            "name": name,
            "iconUrl": optional(&self.icon_url),
            "isActive": self.is_active,
            "parentId": optional(&self.parent_id),
        });
        match mode {
            DrawerMode::Create => {
                body["languageId"] = json!(required("Language", &self.language_id)?);
                Ok(Submission::create(CATEGORIES.path, compact(body)))
            }
            DrawerMode::Edit(id) => Ok(Submission::update(CATEGORIES.record_path(id), compact(body))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TenantForm {
    pub name: String,
    pub prgi_number: String,
    pub state_id: String,
}

impl Form for TenantForm {
    fn submission(&self, mode: &DrawerMode) -> AdminResult<Submission> {
        create_only(mode, "Tenants")?;
        let name = required("Name", &self.name)?;
        let state_id = required("State", &self.state_id)?;
        let body = json!({ "name": name, "prgiNumber": optional(&self.prgi_number), "stateId": state_id });
        Ok(Submission::create(TENANTS.path, compact(body)))
    }
}

/// Add a domain to a tenant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainForm {
    pub tenant_id: String,
    pub domain: String,
    pub is_primary: bool,
    /// The tenant's current primary domain, if any
    pub existing_primary: Option<String>,
}

impl DomainForm {
    pub fn for_tenant(tenant: &Tenant) -> Self {
        Self {
            tenant_id: tenant.id.clone(),
            existing_primary: tenant.primary_domain().map(|d| d.domain.clone()),
            ..Default::default()
        }
    }

    /// The e-paper companion of the primary domain; never itself primary.
    pub fn epaper_for(tenant: &Tenant) -> AdminResult<Self> {
        let primary = tenant
            .primary_domain()
            .ok_or_else(|| AdminError::validation("Tenant has no primary domain"))?;
        Ok(Self {
            tenant_id: tenant.id.clone(),
            domain: format!("epaper.{}", primary.domain),
            is_primary: false,
            existing_primary: Some(primary.domain.clone()),
        })
    }
}

impl Form for DomainForm {
    fn submission(&self, mode: &DrawerMode) -> AdminResult<Submission> {
        create_only(mode, "Domains")?;
        let tenant_id = required("Tenant", &self.tenant_id)?;
        let domain = validate::domain(&self.domain)?;
        if self.is_primary {
            if let Some(existing) = &self.existing_primary {
                return Err(AdminError::validation(format!(
                    "Tenant already has a primary domain ({})",
                    existing
                )));
            }
        }
        Ok(Submission::create(
            tenant_path(&tenant_id, "/domains"),
            json!({ "domain": domain, "isPrimary": self.is_primary }),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerifyMethod {
    DnsTxt,
    HttpFile,
}

impl std::str::FromStr for VerifyMethod {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "DNS_TXT" | "DNS" => Ok(VerifyMethod::DnsTxt),
            "HTTP_FILE" | "HTTP" => Ok(VerifyMethod::HttpFile),
            other => Err(AdminError::validation(format!("Unknown verification method {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainVerifyForm {
    pub domain_id: String,
    pub method: VerifyMethod,
    pub force: bool,
}

impl Form for DomainVerifyForm {
    fn submission(&self, _mode: &DrawerMode) -> AdminResult<Submission> {
        let id = required("Domain", &self.domain_id)?;
        Ok(Submission {
            action: "Verify",
            method: Method::Post,
            path: format!("/api/v1/domains/{}/verify", id),
            body: json!({ "method": self.method, "force": self.force }),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainCategoriesForm {
    pub domain_id: String,
    pub category_ids: Vec<String>,
}

impl Form for DomainCategoriesForm {
    fn submission(&self, _mode: &DrawerMode) -> AdminResult<Submission> {
        let id = required("Domain", &self.domain_id)?;
        let ids: Vec<&str> = self
            .category_ids
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        Ok(Submission::update(
            format!("/api/v1/domains/{}/categories", id),
            json!({ "categoryIds": ids }),
        ))
    }
}

/// Registration details (`POST /tenants/{id}/entity/simple`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntitySimpleForm {
    pub tenant_id: String,
    pub periodicity: String,
    /// `YYYY-MM-DD`; sent as `DD/MM/YYYY`
    pub registration_date: String,
    pub admin_mobile: String,
    pub publisher_mobile: String,
    pub publisher_name: String,
    pub editor_name: String,
    pub printing_press_name: String,
    pub printing_city_name: String,
    pub address: String,
    pub language_id: String,
}

impl EntitySimpleForm {
    pub fn from_entity(tenant_id: &str, entity: &TenantEntity) -> Self {
        let s = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            tenant_id: tenant_id.to_string(),
            periodicity: s(&entity.periodicity),
            registration_date: s(&entity.registration_date),
            admin_mobile: s(&entity.admin_mobile),
            publisher_mobile: s(&entity.publisher_mobile),
            publisher_name: s(&entity.publisher_name),
            editor_name: s(&entity.editor_name),
            printing_press_name: s(&entity.printing_press_name),
            printing_city_name: s(&entity.printing_city_name),
            address: s(&entity.address),
            language_id: s(&entity.language_id),
        }
    }
}

impl Form for EntitySimpleForm {
    fn submission(&self, _mode: &DrawerMode) -> AdminResult<Submission> {
        let tenant_id = required("Tenant", &self.tenant_id)?;
        let periodicity = required("Periodicity", &self.periodicity)?;
        let date = required("Registration date", &self.registration_date)?;
        let admin = validate::normalize_mobile("Admin mobile", &self.admin_mobile)?;
        let publisher_name = required("Publisher name", &self.publisher_name)?;
        let language_id = required("Language", &self.language_id)?;
        let publisher_mobile = match optional(&self.publisher_mobile) {
            Some(m) => Some(validate::normalize_mobile("Publisher mobile", &m)?),
            None => None,
        };

        let body = json!({
            "periodicity": periodicity.to_uppercase(),
            "registrationDate": to_dd_mm_yyyy(&date),
            "adminMobile": admin,
            "publisherMobile": publisher_mobile,
            "publisherName": publisher_name,
            "editorName": optional(&self.editor_name),
            "printingPressName": optional(&self.printing_press_name),
            "printingCityName": optional(&self.printing_city_name),
            "address": optional(&self.address),
            "languageId": language_id,
        });
        Ok(Submission {
            action: "Save",
            method: Method::Post,
            path: tenant_path(&tenant_id, "/entity/simple"),
            body: compact(body),
        })
    }
}

/// Printing and address details (`PUT /tenants/{id}/entity/business`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityBusinessForm {
    pub tenant_id: String,
    pub address: String,
    pub printing_press_name: String,
    pub printing_city_name: String,
    pub printing_district_id: String,
    pub printing_mandal_id: String,
}

impl EntityBusinessForm {
    pub fn from_entity(tenant_id: &str, entity: &TenantEntity) -> Self {
        let s = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            tenant_id: tenant_id.to_string(),
            address: s(&entity.address),
            printing_press_name: s(&entity.printing_press_name),
            printing_city_name: s(&entity.printing_city_name),
            printing_district_id: s(&entity.printing_district_id),
            printing_mandal_id: s(&entity.printing_mandal_id),
        }
    }
}

impl Form for EntityBusinessForm {
    fn submission(&self, _mode: &DrawerMode) -> AdminResult<Submission> {
        let tenant_id = required("Tenant", &self.tenant_id)?;
        let body = json!({
            "address": optional(&self.address),
            "printingPressName": optional(&self.printing_press_name),
            "printingCityName": optional(&self.printing_city_name),
            "printingDistrictId": optional(&self.printing_district_id),
            "printingMandalId": optional(&self.printing_mandal_id),
        });
        Ok(Submission {
            action: "Save",
            method: Method::Put,
            path: tenant_path(&tenant_id, "/entity/business"),
            body: compact(body),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleForm {
    pub name: String,
    /// Comma-separated `module:action` entries
    pub permissions: String,
}

impl Form for RoleForm {
    fn submission(&self, mode: &DrawerMode) -> AdminResult<Submission> {
        create_only(mode, "Roles")?;
        let name = required("Name", &self.name)?;
        let permissions: Vec<&str> = self
            .permissions
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        Ok(Submission::create(ROLES.path, json!({ "name": name, "permissions": permissions })))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserForm {
    pub name: String,
    pub mobile_number: String,
    pub email: String,
    pub role_id: String,
    pub language_id: String,
    pub device_id: String,
    pub latitude: String,
    pub longitude: String,
    /// Write-only; blank on edit keeps the current MPIN
    pub mpin: String,
}

impl UserForm {
    pub fn from_record(record: &Value) -> Self {
        let coord = |key: &str| {
            record
                .get("location")
                .and_then(|l| l.get(key))
                .and_then(Value::as_f64)
                .map(|n| n.to_string())
                .unwrap_or_default()
        };
        Self {
            name: text(record, "name"),
            mobile_number: text(record, "mobileNumber"),
            email: text(record, "email"),
            role_id: id_ref(record, "roleId", "role"),
            language_id: id_ref(record, "languageId", "language"),
            device_id: text(record, "deviceId"),
            latitude: coord("latitude"),
            longitude: coord("longitude"),
            mpin: String::new(),
        }
    }

    fn coordinate(label: &str, raw: &str) -> AdminResult<f64> {
        match optional(raw) {
            None => Ok(0.0),
            Some(v) => v
                .parse()
                .map_err(|_| AdminError::validation(format!("{} must be a number", label))),
        }
    }
}

impl Form for UserForm {
    fn submission(&self, mode: &DrawerMode) -> AdminResult<Submission> {
        let mobile = validate::normalize_mobile("Mobile number", &self.mobile_number)?;
        match mode {
            DrawerMode::Create => {
                let mpin = self.mpin.trim();
                validate::mpin(mpin)?;
                let role_id = required("Role", &self.role_id)?;
                let language_id = required("Language", &self.language_id)?;
                let body = json!({
                    "roleId": role_id,
                    "languageId": language_id,
                    "mobileNumber": mobile,
                    "mpin": mpin,
                    "email": optional(&self.email),
                });
                Ok(Submission::create(USERS.path, compact(body)))
            }
            DrawerMode::Edit(id) => {
                let language_id = required("Language", &self.language_id)?;
                let mut body = compact(json!({
                    "name": optional(&self.name),
                    "mobileNumber": mobile,
                    "email": optional(&self.email),
                    "languageId": language_id,
                    "deviceId": optional(&self.device_id),
                }));
                body["location"] = json!({
                    "latitude": Self::coordinate("Latitude", &self.latitude)?,
                    "longitude": Self::coordinate("Longitude", &self.longitude)?,
                });
                if let Some(mpin) = optional(&self.mpin) {
                    validate::mpin(&mpin)?;
                    body["mpin"] = json!(mpin);
                }
                Ok(Submission::update(USERS.record_path(id), body))
            }
        }
    }

    fn secrets(&self) -> Vec<&str> {
        vec![self.mpin.as_str()]
    }
}
