//! Local checks run before any request leaves the client.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AdminError, AdminResult};

static MOBILE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10}$").expect("valid regex"));
static MPIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4,6}$").expect("valid regex"));
static DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?(\.[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?)+$")
        .expect("valid regex")
});

/// Trimmed value, or "`label` is required"
pub fn required(label: &str, value: &str) -> AdminResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AdminError::validation(format!("{} is required", label)))
    } else {
        Ok(trimmed.to_string())
    }
}

/// `None` for blank input, the trimmed text otherwise
pub fn optional(value: &str) -> Option<String> {
    Some(value.trim().to_string()).filter(|s| !s.is_empty())
}

/// Exactly ten digits, as typed at login.
pub fn mobile(value: &str) -> AdminResult<()> {
    if MOBILE.is_match(value) {
        Ok(())
    } else {
        Err(AdminError::validation("Enter valid 10 digit mobile number"))
    }
}

/// Strip formatting from a mobile number and require ten digits.
pub fn normalize_mobile(label: &str, value: &str) -> AdminResult<String> {
    let digits: String = value.chars().filter(char::is_ascii_digit).take(10).collect();
    if digits.len() == 10 {
        Ok(digits)
    } else {
        Err(AdminError::validation(format!("{} must be 10 digits", label)))
    }
}

pub fn mpin(value: &str) -> AdminResult<()> {
    if MPIN.is_match(value) {
        Ok(())
    } else {
        Err(AdminError::validation("MPIN must be 4-6 digits"))
    }
}

/// Lowercased host name. Schemes, paths, whitespace and single-label names
/// are refused.
pub fn domain(value: &str) -> AdminResult<String> {
    let candidate = value.trim().to_lowercase();
    let ok = !candidate.contains("://")
        && !candidate.contains('/')
        && !candidate.chars().any(char::is_whitespace)
        && DOMAIN.is_match(&candidate);
    if ok {
        Ok(candidate)
    } else {
        Err(AdminError::validation("Enter a valid domain like example.com"))
    }
}
