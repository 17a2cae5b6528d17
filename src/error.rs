// Client-side error taxonomy for calls against the admin API
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
    /// Transport failure; the request never produced a status code
    #[error("Network error")]
    Network(String),

    /// Non-2xx response, message already resolved from the body or templated
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Local validation failure, raised before any request is issued
    #[error("{0}")]
    Validation(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Session storage error: {0}")]
    Storage(String),
}

pub type AdminResult<T> = Result<T, AdminError>;

impl AdminError {
    pub fn validation(message: impl Into<String>) -> Self {
        AdminError::Validation(message.into())
    }

    /// Build the error for a non-2xx response.
    ///
    /// The body's `message` wins, then `error`, then `"<action> failed: <status>"`.
    pub fn from_response(action: &str, status: u16, body: Option<&Value>) -> Self {
        let message = body
            .and_then(server_message)
            .unwrap_or_else(|| format!("{} failed: {}", action, status));
        AdminError::Http { status, message }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            AdminError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AdminError::Network(_) => "NETWORK_ERROR",
            AdminError::Http { status: 401, .. } => "UNAUTHORIZED",
            AdminError::Http { status: 403, .. } => "FORBIDDEN",
            AdminError::Http { status: 404, .. } => "NOT_FOUND",
            AdminError::Http { status: 409, .. } => "CONFLICT",
            AdminError::Http { .. } => "HTTP_ERROR",
            AdminError::Validation(_) => "VALIDATION_ERROR",
            AdminError::Decode(_) => "INVALID_RESPONSE",
            AdminError::InvalidUrl(_) => "INVALID_URL",
            AdminError::Unauthenticated => "UNAUTHENTICATED",
            AdminError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Scrub a write-only value out of the user-facing message.
    pub fn redacted(self, secret: &str) -> Self {
        let secret = secret.trim();
        if secret.is_empty() {
            return self;
        }
        match self {
            AdminError::Http { status, message } => AdminError::Http {
                status,
                message: message.replace(secret, "****"),
            },
            AdminError::Validation(message) => AdminError::Validation(message.replace(secret, "****")),
            other => other,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "error": self.message(),
            "error_code": self.error_code(),
        });
        if let Some(status) = self.status_code() {
            body["status"] = json!(status);
        }
        body
    }
}

/// `message` or `error` from a JSON error body, when either is a non-empty string.
pub fn server_message(body: &Value) -> Option<String> {
    ["message", "error"].iter().find_map(|key| {
        body.get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

impl From<reqwest::Error> for AdminError {
    fn from(err: reqwest::Error) -> Self {
        AdminError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AdminError {
    fn from(err: serde_json::Error) -> Self {
        AdminError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for AdminError {
    fn from(err: url::ParseError) -> Self {
        AdminError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for AdminError {
    fn from(err: std::io::Error) -> Self {
        AdminError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_field_takes_precedence() {
        let body = json!({ "message": "Name already exists", "error": "CONFLICT" });
        let err = AdminError::from_response("Create", 409, Some(&body));
        assert_eq!(err.to_string(), "Name already exists");
        assert_eq!(err.error_code(), "CONFLICT");
    }

    #[test]
    fn error_field_used_when_message_missing() {
        let body = json!({ "error": "Tenant Razorpay config not set" });
        let err = AdminError::from_response("Request", 404, Some(&body));
        assert_eq!(err.to_string(), "Tenant Razorpay config not set");
        assert!(err.is_not_found());
    }

    #[test]
    fn templated_message_without_body() {
        let err = AdminError::from_response("Request", 500, None);
        assert_eq!(err.to_string(), "Request failed: 500");

        let blank = json!({ "message": "   " });
        let err = AdminError::from_response("Update", 502, Some(&blank));
        assert_eq!(err.to_string(), "Update failed: 502");
    }

    #[test]
    fn network_error_is_generic() {
        let err = AdminError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error");
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn redaction_hides_secret() {
        let body = json!({ "message": "invalid secret s3cr3t-value" });
        let err = AdminError::from_response("Update", 400, Some(&body)).redacted("s3cr3t-value");
        assert_eq!(err.to_string(), "invalid secret ****");
    }
}
