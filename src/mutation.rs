//! Row-level actions: soft-delete toggles, hard deletes and one-shot
//! server actions (retranslate, PRGI review).
//!
//! Only one request per row id may be outstanding; the lock is released when
//! the request settles, whatever the result.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::api::{ApiClient, Method};
use crate::error::{AdminError, AdminResult};
use crate::list::ListController;
use crate::resources::{DeletePolicy, ResourceDef, CATEGORIES, USERS};

#[derive(Debug, Clone, Default)]
pub struct RowLocks {
    held: Arc<Mutex<HashSet<String>>>,
}

impl RowLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while another action on `id` is in flight
    pub fn try_lock(&self, id: &str) -> Option<RowGuard> {
        let mut held = held_ids(&self.held);
        if held.insert(id.to_string()) {
            Some(RowGuard { held: Arc::clone(&self.held), id: id.to_string() })
        } else {
            None
        }
    }

    pub fn is_locked(&self, id: &str) -> bool {
        held_ids(&self.held).contains(id)
    }
}

/// The id set stays consistent across a panic in another holder, so a
/// poisoned lock is still usable.
fn held_ids(held: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    held.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
pub struct RowGuard {
    held: Arc<Mutex<HashSet<String>>>,
    id: String,
}

impl Drop for RowGuard {
    fn drop(&mut self) {
        held_ids(&self.held).remove(&self.id);
    }
}

/// Asks the user before a destructive request goes out
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool + Send + Sync> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Pre-approved, e.g. `--yes`
#[derive(Debug, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Done(Option<Value>),
    /// The confirmation was declined; nothing was sent
    Declined,
    /// Another action on the same row is still in flight
    Busy,
}

impl MutationOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, MutationOutcome::Done(_))
    }
}

fn row_id(row: &Value) -> AdminResult<String> {
    row.get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AdminError::validation("Record has no id"))
}

fn row_name(row: &Value) -> &str {
    row.get("name").and_then(Value::as_str).unwrap_or_default()
}

pub fn toggle_prompt(resource: &ResourceDef, row: &Value, deleted: bool) -> String {
    let verb = if deleted { "Mark deleted" } else { "Restore" };
    format!("{} {} {}?", verb, resource.singular, row_name(row))
}

pub fn delete_prompt(resource: &ResourceDef, row: &Value) -> String {
    let label = if resource.name == USERS.name {
        ["mobileNumber", "email"]
            .iter()
            .find_map(|k| row.get(*k).and_then(Value::as_str).filter(|s| !s.is_empty()))
            .unwrap_or_default()
    } else {
        row_name(row)
    };
    format!("Delete {} {}?", resource.singular, label)
}

/// Row actions bound to one client, sharing one lock table.
#[derive(Debug, Clone)]
pub struct RowActions {
    client: ApiClient,
    locks: RowLocks,
}

impl RowActions {
    pub fn new(client: ApiClient) -> Self {
        Self { client, locks: RowLocks::new() }
    }

    pub fn locks(&self) -> &RowLocks {
        &self.locks
    }

    /// Soft-delete or restore: `PUT {name, isDeleted}`.
    pub async fn set_deleted(
        &self,
        resource: &ResourceDef,
        row: &Value,
        deleted: bool,
        confirm: &dyn Confirm,
    ) -> AdminResult<MutationOutcome> {
        if resource.delete != DeletePolicy::SoftToggle {
            return Err(AdminError::validation(format!("{} cannot be soft-deleted", resource.name)));
        }
        let id = row_id(row)?;
        if !confirm.confirm(&toggle_prompt(resource, row, deleted)) {
            return Ok(MutationOutcome::Declined);
        }
        let _guard = match self.locks.try_lock(&id) {
            Some(g) => g,
            None => return Ok(MutationOutcome::Busy),
        };
        let body = json!({ "name": row_name(row), "isDeleted": deleted });
        let result = self
            .client
            .mutate("Toggle", Method::Put, &resource.record_path(&id), Some(body))
            .await?;
        info!("{} {} isDeleted={}", resource.singular, id, deleted);
        Ok(MutationOutcome::Done(result))
    }

    /// Flip the row's current `isDeleted` flag.
    pub async fn toggle_deleted(
        &self,
        resource: &ResourceDef,
        row: &Value,
        confirm: &dyn Confirm,
    ) -> AdminResult<MutationOutcome> {
        let current = row.get("isDeleted").and_then(Value::as_bool).unwrap_or(false);
        self.set_deleted(resource, row, !current, confirm).await
    }

    pub async fn hard_delete(
        &self,
        resource: &ResourceDef,
        row: &Value,
        confirm: &dyn Confirm,
    ) -> AdminResult<MutationOutcome> {
        if resource.delete != DeletePolicy::Hard {
            return Err(AdminError::validation(format!("{} cannot be deleted", resource.name)));
        }
        let id = row_id(row)?;
        if !confirm.confirm(&delete_prompt(resource, row)) {
            return Ok(MutationOutcome::Declined);
        }
        let _guard = match self.locks.try_lock(&id) {
            Some(g) => g,
            None => return Ok(MutationOutcome::Busy),
        };
        let result = self
            .client
            .mutate("Delete", Method::Delete, &resource.record_path(&id), None)
            .await?;
        info!("deleted {} {}", resource.singular, id);
        Ok(MutationOutcome::Done(result))
    }

    /// Toggle a row shown in `list`, re-fetching the list's scope afterwards.
    pub async fn toggle_in_list(
        &self,
        list: &mut ListController,
        row: &Value,
        confirm: &dyn Confirm,
    ) -> AdminResult<MutationOutcome> {
        let outcome = self.toggle_deleted(list.resource(), row, confirm).await?;
        if outcome.is_done() {
            list.reload(&self.client).await;
        }
        Ok(outcome)
    }

    pub async fn delete_in_list(
        &self,
        list: &mut ListController,
        row: &Value,
        confirm: &dyn Confirm,
    ) -> AdminResult<MutationOutcome> {
        let outcome = self.hard_delete(list.resource(), row, confirm).await?;
        if outcome.is_done() {
            list.reload(&self.client).await;
        }
        Ok(outcome)
    }

    pub async fn retranslate_category(&self, category_id: &str) -> AdminResult<MutationOutcome> {
        let path = format!("{}/retranslate", CATEGORIES.record_path(category_id));
        self.locked(category_id, "Translate", Method::Post, &path, None).await
    }

    pub async fn prgi_verify(&self, tenant_id: &str) -> AdminResult<MutationOutcome> {
        let path = format!("/api/v1/prgi/{}/verify", tenant_id);
        self.locked(tenant_id, "Verify", Method::Post, &path, None).await
    }

    pub async fn prgi_reject(&self, tenant_id: &str, reason: &str) -> AdminResult<MutationOutcome> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AdminError::validation("Rejection reason is required"));
        }
        let path = format!("/api/v1/prgi/{}/reject", tenant_id);
        self.locked(tenant_id, "Reject", Method::Post, &path, Some(json!({ "reason": reason })))
            .await
    }

    async fn locked(
        &self,
        id: &str,
        action: &str,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> AdminResult<MutationOutcome> {
        let _guard = match self.locks.try_lock(id) {
            Some(g) => g,
            None => {
                debug!("{} on {} already in flight", action, id);
                return Ok(MutationOutcome::Busy);
            }
        };
        let result = self.client.mutate(action, method, path, body).await?;
        Ok(MutationOutcome::Done(result))
    }
}
