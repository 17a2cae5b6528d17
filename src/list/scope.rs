use serde_json::Value;

/// What a list fetch currently targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListScope {
    pub parent: Option<String>,
    pub page: u32,
    pub page_size: u32,
    /// Extra query filters, e.g. `active=true`
    pub filters: Vec<(String, String)>,
}

impl ListScope {
    pub fn new(page_size: u32) -> Self {
        Self { parent: None, page: 1, page_size, filters: Vec::new() }
    }

    pub fn with_parent(mut self, parent: Option<String>) -> Self {
        self.parent = normalize_parent(parent);
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let key = key.into();
        self.filters.retain(|(k, _)| *k != key);
        self.filters.push((key, value.to_string()));
        self
    }
}

/// Blank ids mean "nothing selected"
pub(crate) fn normalize_parent(parent: Option<String>) -> Option<String> {
    parent
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}

/// Case-insensitive substring match of `needle` against any of `keys`.
///
/// Keys may be dotted to reach into nested objects (`tenant.name`). An empty
/// needle matches every row.
pub fn matches_search(row: &Value, keys: &[&str], needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    keys.iter().any(|key| {
        key.split('.')
            .try_fold(row, |v, part| v.get(part))
            .and_then(Value::as_str)
            .map(|s| s.to_lowercase().contains(&needle))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_parent_is_none() {
        assert_eq!(ListScope::new(10).with_parent(Some(" ".into())).parent, None);
        assert_eq!(ListScope::new(10).with_parent(Some("D1".into())).parent.as_deref(), Some("D1"));
    }

    #[test]
    fn search_is_case_insensitive_and_nested() {
        let row = json!({ "keyId": "rzp_live_X", "tenant": { "name": "Prajavani" } });
        assert!(matches_search(&row, &["tenant.name", "keyId"], "praja"));
        assert!(matches_search(&row, &["tenant.name", "keyId"], "RZP_LIVE"));
        assert!(!matches_search(&row, &["tenant.name"], "live"));
        assert!(matches_search(&row, &["name"], "  "));
    }

    #[test]
    fn filters_replace_same_key() {
        let scope = ListScope::new(10).with_filter("active", true).with_filter("active", false);
        assert_eq!(scope.filters, vec![("active".to_string(), "false".to_string())]);
    }
}
