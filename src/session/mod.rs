//! The persisted sign-in and the gate in front of every admin operation.
//!
//! The session is an explicit value handed to `ApiClient::with_session`; no
//! API call reads it from ambient storage.

mod guard;
mod store;

pub use guard::{restricted_view, role_of, GuardOutcome, SessionGuard};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::api::{ApiClient, ApiRequest, Method};
use crate::drawer::validate;
use crate::error::{server_message, AdminError, AdminResult};

pub const LOGIN_PATH: &str = "/api/v1/auth/login";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub token: String,
    /// Full `data` object from the login response
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub saved_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn new(token: impl Into<String>, data: Value) -> Self {
        let user = data.get("user").filter(|u| !u.is_null()).cloned();
        Self { token: token.into(), data, user, saved_at: Utc::now() }
    }

    /// `user`, else `data.user`
    pub fn user(&self) -> Option<&Value> {
        self.user
            .as_ref()
            .or_else(|| self.data.get("user"))
            .filter(|u| !u.is_null())
    }

    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

/// Sign in with mobile number and MPIN, persisting the session on success.
pub async fn login(
    client: &ApiClient,
    store: &dyn SessionStore,
    mobile_number: &str,
    mpin: &str,
) -> AdminResult<AuthSession> {
    validate::mobile(mobile_number)?;
    validate::mpin(mpin)?;

    let mut anonymous = client.clone();
    anonymous.set_token(None);
    let request = ApiRequest::new(Method::Post, LOGIN_PATH)
        .json(json!({ "mobileNumber": mobile_number, "mpin": mpin }));
    let response = anonymous.send(request).await?;
    if !response.is_success() {
        return Err(AdminError::from_response("Login", response.status, response.body.as_ref()));
    }

    let body = response.body.unwrap_or(Value::Null);
    if body.get("success").and_then(Value::as_bool) != Some(true) {
        let message = server_message(&body).unwrap_or_else(|| "Login failed".to_string());
        return Err(AdminError::Http { status: response.status, message });
    }

    let data = body.get("data").cloned().unwrap_or(Value::Null);
    let token = data
        .get("jwt")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AdminError::Decode("login response carried no jwt".to_string()))?
        .to_string();

    let session = AuthSession::new(token, data);
    store.save(&session)?;
    info!("signed in as {}", mobile_number);
    Ok(session)
}

pub fn logout(store: &dyn SessionStore) -> AdminResult<()> {
    store.clear()?;
    info!("signed out");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_falls_back_to_data_user() {
        let mut session = AuthSession::new("t", json!({ "user": { "role": "SUPER_ADMIN" } }));
        assert!(session.user().is_some());
        session.user = None;
        assert_eq!(session.user().unwrap()["role"], "SUPER_ADMIN");
    }

    #[test]
    fn saved_at_is_epoch_millis_on_the_wire() {
        let session = AuthSession::new("t", json!({}));
        let wire = serde_json::to_value(&session).unwrap();
        assert_eq!(wire["savedAt"].as_i64(), Some(session.saved_at.timestamp_millis()));
        assert!(wire.get("user").unwrap().is_null());
    }
}
