//! Role permissions.
//!
//! The API hands permissions back in two shapes: a flat list of
//! `"module:action"` strings, or a map of module to action list. Both decode
//! into one `PermissionSet`; saving always sends the map.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{json, Map, Value};

use crate::api::{ApiClient, ApiRequest, Method};
use crate::drawer::{DrawerMode, Form, Submission};
use crate::error::{AdminError, AdminResult};
use crate::resources::{PermissionModule, ROLES};

pub const PERMISSION_MODULES_PATH: &str = "/api/v1/permissions/modules/detailed";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    grants: BTreeMap<String, BTreeSet<String>>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts either wire form. Entries without an action are skipped.
    pub fn decode(value: &Value) -> Self {
        let mut set = Self::new();
        match value {
            Value::Array(items) => {
                for item in items.iter().filter_map(Value::as_str) {
                    set.insert_entry(item);
                }
            }
            Value::Object(map) => {
                for (module, actions) in map {
                    let actions = actions.as_array().map(Vec::as_slice).unwrap_or_default();
                    for action in actions.iter().filter_map(Value::as_str) {
                        set.grant(module, action);
                    }
                }
            }
            _ => {}
        }
        set
    }

    /// Comma-separated `module:action` entries, as typed on the command line.
    pub fn from_csv(raw: &str) -> Self {
        let mut set = Self::new();
        for entry in raw.split(',') {
            set.insert_entry(entry);
        }
        set
    }

    fn insert_entry(&mut self, entry: &str) {
        if let Some((module, action)) = entry.trim().split_once(':') {
            self.grant(module, action);
        }
    }

    pub fn grant(&mut self, module: &str, action: &str) {
        let (module, action) = (module.trim(), action.trim());
        if module.is_empty() || action.is_empty() {
            return;
        }
        self.grants.entry(module.to_string()).or_default().insert(action.to_string());
    }

    pub fn revoke(&mut self, module: &str, action: &str) {
        if let Some(actions) = self.grants.get_mut(module) {
            actions.remove(action);
            if actions.is_empty() {
                self.grants.remove(module);
            }
        }
    }

    /// Add every grant in `other`.
    pub fn merge(&mut self, other: &PermissionSet) {
        for (module, actions) in &other.grants {
            for action in actions {
                self.grant(module, action);
            }
        }
    }

    /// Remove every grant in `other`.
    pub fn subtract(&mut self, other: &PermissionSet) {
        for (module, actions) in &other.grants {
            for action in actions {
                self.revoke(module, action);
            }
        }
    }

    /// Flip one action; returns whether it is now granted.
    pub fn toggle(&mut self, module: &str, action: &str) -> bool {
        if self.contains(module, action) {
            self.revoke(module, action);
            false
        } else {
            self.grant(module, action);
            self.contains(module, action)
        }
    }

    pub fn contains(&self, module: &str, action: &str) -> bool {
        self.grants.get(module).map(|a| a.contains(action)).unwrap_or(false)
    }

    pub fn actions(&self, module: &str) -> Vec<&str> {
        self.grants
            .get(module)
            .map(|a| a.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.values().all(BTreeSet::is_empty)
    }

    pub fn encode_map(&self) -> Value {
        let map: Map<String, Value> = self
            .grants
            .iter()
            .map(|(module, actions)| (module.clone(), json!(actions)))
            .collect();
        Value::Object(map)
    }

    pub fn encode_list(&self) -> Value {
        let list: Vec<String> = self
            .grants
            .iter()
            .flat_map(|(module, actions)| actions.iter().map(move |a| format!("{}:{}", module, a)))
            .collect();
        json!(list)
    }
}

/// Replace a role's grants with `permissions`.
#[derive(Debug, Clone, PartialEq)]
pub struct RolePermissionsForm {
    pub role_id: String,
    pub permissions: PermissionSet,
}

impl RolePermissionsForm {
    pub fn for_role(role: &Value) -> Self {
        Self {
            role_id: role.get("id").and_then(Value::as_str).unwrap_or_default().to_string(),
            permissions: PermissionSet::decode(role.get("permissions").unwrap_or(&Value::Null)),
        }
    }
}

impl Form for RolePermissionsForm {
    fn submission(&self, _mode: &DrawerMode) -> AdminResult<Submission> {
        if self.role_id.trim().is_empty() {
            return Err(AdminError::validation("Role is required"));
        }
        if self.permissions.is_empty() {
            return Err(AdminError::validation("Select at least one action"));
        }
        Ok(Submission {
            action: "Update",
            method: Method::Post,
            path: format!("{}/permissions", ROLES.record_path(&self.role_id)),
            body: json!({ "permissions": self.permissions.encode_map() }),
        })
    }
}

/// Module catalogue with each module's typical actions.
pub async fn load_modules(client: &ApiClient) -> AdminResult<Vec<PermissionModule>> {
    let page = client.fetch_list(ApiRequest::get(PERMISSION_MODULES_PATH)).await?;
    Ok(page.typed::<PermissionModule>()?.rows)
}
