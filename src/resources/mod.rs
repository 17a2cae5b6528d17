//! Descriptors for every collection the admin surface manages.
//!
//! Each descriptor records the endpoint, how a parent scope is applied, and
//! which delete convention the server uses for that resource. The
//! soft/hard split is per resource and is not derived from anything.

pub mod models;

pub use models::*;

use crate::api::ApiRequest;
use crate::list::ListScope;

pub const API_PREFIX: &str = "/api/v1";

/// How the parent id reaches the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeParam {
    /// `?stateId=...`
    Query(&'static str),
    /// Path template with a `{id}` placeholder
    Path(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopePolicy {
    /// Never scoped
    None,
    /// No parent, no request
    Required(ScopeParam),
    /// Parent narrows the list; without one the unscoped list is fetched
    Optional(ScopeParam),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// `PUT {name, isDeleted}`; the row can be restored
    SoftToggle,
    /// `DELETE /{id}`
    Hard,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDef {
    /// Plural, used in empty-list messages
    pub name: &'static str,
    pub singular: &'static str,
    pub path: &'static str,
    pub scope: ScopePolicy,
    pub delete: DeletePolicy,
    pub paginated: bool,
    pub include_deleted: bool,
    /// Shown instead of rows while a required parent is missing
    pub empty_prompt: Option<&'static str>,
    /// Fields matched by the client-side search box; dotted for nested
    pub search_keys: &'static [&'static str],
}

impl ResourceDef {
    pub fn record_path(&self, id: &str) -> String {
        format!("{}/{}", self.path, id)
    }

    pub fn requires_parent(&self) -> bool {
        matches!(self.scope, ScopePolicy::Required(_))
    }

    /// Build the list request for `scope`, or `None` when a required parent
    /// is missing and nothing may be fetched.
    pub fn list_request(&self, scope: &ListScope) -> Option<ApiRequest> {
        let parent = scope.parent.as_deref().map(str::trim).filter(|p| !p.is_empty());

        let (param, parent) = match (self.scope, parent) {
            (ScopePolicy::None, _) => (None, None),
            (ScopePolicy::Required(_), None) => return None,
            (ScopePolicy::Required(param), Some(id)) | (ScopePolicy::Optional(param), Some(id)) => {
                (Some(param), Some(id))
            }
            (ScopePolicy::Optional(_), None) => (None, None),
        };

        let mut request = match (param, parent) {
            (Some(ScopeParam::Path(template)), Some(id)) => ApiRequest::get(template.replace("{id}", id)),
            (Some(ScopeParam::Query(key)), Some(id)) => ApiRequest::get(self.path).query(key, id),
            _ => ApiRequest::get(self.path),
        };
        if self.include_deleted {
            request = request.query("includeDeleted", true);
        }
        for (k, v) in &scope.filters {
            request = request.query(k.as_str(), v);
        }
        if self.paginated {
            request = request.query("page", scope.page).query("pageSize", scope.page_size);
        }
        Some(request)
    }
}

pub static STATES: ResourceDef = ResourceDef {
    name: "states",
    singular: "state",
    path: "/api/v1/states",
    scope: ScopePolicy::None,
    delete: DeletePolicy::SoftToggle,
    paginated: false,
    include_deleted: false,
    empty_prompt: None,
    search_keys: &["name"],
};

/// Districts allow the unscoped "All States" listing.
pub static DISTRICTS: ResourceDef = ResourceDef {
    name: "districts",
    singular: "district",
    path: "/api/v1/districts",
    scope: ScopePolicy::Optional(ScopeParam::Query("stateId")),
    delete: DeletePolicy::SoftToggle,
    paginated: true,
    include_deleted: true,
    empty_prompt: None,
    search_keys: &["name"],
};

pub static ASSEMBLY_CONSTITUENCIES: ResourceDef = ResourceDef {
    name: "constituencies",
    singular: "constituency",
    path: "/api/v1/assembly-constituencies",
    scope: ScopePolicy::Required(ScopeParam::Query("districtId")),
    delete: DeletePolicy::SoftToggle,
    paginated: false,
    include_deleted: true,
    empty_prompt: Some("Select a district to view constituencies"),
    search_keys: &["name"],
};

pub static MANDALS: ResourceDef = ResourceDef {
    name: "mandals",
    singular: "mandal",
    path: "/api/v1/mandals",
    scope: ScopePolicy::Required(ScopeParam::Query("districtId")),
    delete: DeletePolicy::Hard,
    paginated: true,
    include_deleted: true,
    empty_prompt: Some("Select a district to view mandals"),
    search_keys: &["name"],
};

pub static LANGUAGES: ResourceDef = ResourceDef {
    name: "languages",
    singular: "language",
    path: "/api/v1/languages",
    scope: ScopePolicy::None,
    delete: DeletePolicy::None,
    paginated: false,
    include_deleted: false,
    empty_prompt: None,
    search_keys: &["name", "code"],
};

pub static CATEGORIES: ResourceDef = ResourceDef {
    name: "categories",
    singular: "category",
    path: "/api/v1/categories",
    scope: ScopePolicy::Required(ScopeParam::Query("languageId")),
    delete: DeletePolicy::Hard,
    paginated: false,
    include_deleted: false,
    empty_prompt: Some("Select a language to view categories"),
    search_keys: &["name"],
};

pub static TENANTS: ResourceDef = ResourceDef {
    name: "tenants",
    singular: "tenant",
    path: "/api/v1/tenants",
    scope: ScopePolicy::None,
    delete: DeletePolicy::None,
    paginated: false,
    include_deleted: false,
    empty_prompt: None,
    search_keys: &["name", "slug"],
};

pub static USERS: ResourceDef = ResourceDef {
    name: "users",
    singular: "user",
    path: "/api/v1/users",
    scope: ScopePolicy::None,
    delete: DeletePolicy::Hard,
    paginated: false,
    include_deleted: false,
    empty_prompt: None,
    search_keys: &["mobileNumber", "email", "name"],
};

pub static ROLES: ResourceDef = ResourceDef {
    name: "roles",
    singular: "role",
    path: "/api/v1/roles",
    scope: ScopePolicy::None,
    delete: DeletePolicy::None,
    paginated: false,
    include_deleted: false,
    empty_prompt: None,
    search_keys: &["name"],
};

pub static REPORTERS: ResourceDef = ResourceDef {
    name: "reporters",
    singular: "reporter",
    path: "/api/v1/tenants/{id}/reporters",
    scope: ScopePolicy::Required(ScopeParam::Path("/api/v1/tenants/{id}/reporters")),
    delete: DeletePolicy::None,
    paginated: false,
    include_deleted: false,
    empty_prompt: Some("Select a tenant to view reporters"),
    search_keys: &["fullName", "mobileNumber"],
};

pub static RAZORPAY_CONFIGS: ResourceDef = ResourceDef {
    name: "razorpay configs",
    singular: "razorpay config",
    path: "/api/v1/tenants/razorpay-configs",
    scope: ScopePolicy::None,
    delete: DeletePolicy::None,
    paginated: true,
    include_deleted: false,
    empty_prompt: None,
    search_keys: &["tenant.name", "keyId"],
};

pub static ID_CARD_SETTINGS: ResourceDef = ResourceDef {
    name: "id card settings",
    singular: "id card settings",
    path: "/api/v1/tenants/id-card-settings",
    scope: ScopePolicy::None,
    delete: DeletePolicy::None,
    paginated: true,
    include_deleted: false,
    empty_prompt: None,
    search_keys: &["tenant.name", "tenantId"],
};

pub fn tenant_path(tenant_id: &str, rest: &str) -> String {
    format!("{}/tenants/{}{}", API_PREFIX, tenant_id, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_scope_without_parent_builds_nothing() {
        let scope = ListScope::new(10);
        assert!(MANDALS.list_request(&scope).is_none());
        assert!(REPORTERS.list_request(&scope.clone().with_parent(Some("  ".into()))).is_none());
    }

    #[test]
    fn district_scope_is_query_param() {
        let scope = ListScope::new(10).with_parent(Some("S1".into()));
        let request = DISTRICTS.list_request(&scope).unwrap();
        assert_eq!(request.path, "/api/v1/districts");
        assert_eq!(request.query_value("stateId"), Some("S1"));
        assert_eq!(request.query_value("includeDeleted"), Some("true"));
        assert_eq!(request.query_value("page"), Some("1"));
        assert_eq!(request.query_value("pageSize"), Some("10"));
    }

    #[test]
    fn all_states_mode_is_unscoped() {
        let request = DISTRICTS.list_request(&ListScope::new(20)).unwrap();
        assert_eq!(request.query_value("stateId"), None);
        assert_eq!(request.query_value("pageSize"), Some("20"));
    }

    #[test]
    fn reporters_scope_goes_in_path() {
        let scope = ListScope::new(10).with_parent(Some("T9".into()));
        let request = REPORTERS.list_request(&scope).unwrap();
        assert_eq!(request.path, "/api/v1/tenants/T9/reporters");
        assert!(request.query.is_empty());
    }

    #[test]
    fn delete_conventions() {
        assert_eq!(DISTRICTS.delete, DeletePolicy::SoftToggle);
        assert_eq!(STATES.delete, DeletePolicy::SoftToggle);
        assert_eq!(ASSEMBLY_CONSTITUENCIES.delete, DeletePolicy::SoftToggle);
        assert_eq!(MANDALS.delete, DeletePolicy::Hard);
        assert_eq!(CATEGORIES.delete, DeletePolicy::Hard);
        assert_eq!(USERS.delete, DeletePolicy::Hard);
        assert_eq!(LANGUAGES.delete, DeletePolicy::None);
    }
}
