//! Response-shape normalization.
//!
//! Collection endpoints answer with either a bare array or
//! `{data: [...], meta: {page, pageSize, total, totalPages}}`; single-record
//! endpoints with the bare object or `{data: {...}}`. Both collapse here into
//! one shape so nothing downstream inspects raw JSON layout.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::AdminResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl PageMeta {
    pub fn single(page: u32, page_size: u32, rows: usize) -> Self {
        Self {
            page: page.max(1),
            page_size,
            total: rows as u64,
            total_pages: 1,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// "page 1 of 3 (total 25)"; the total is left off when zero.
    pub fn summary(&self) -> String {
        if self.total > 0 {
            format!("page {} of {} (total {})", self.page, self.total_pages, self.total)
        } else {
            format!("page {} of {}", self.page, self.total_pages)
        }
    }
}

impl Default for PageMeta {
    fn default() -> Self {
        Self::single(1, 0, 0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn empty(page: u32, page_size: u32) -> Self {
        Self { rows: Vec::new(), meta: PageMeta::single(page, page_size, 0) }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Page<Value> {
    pub fn typed<T: DeserializeOwned>(self) -> AdminResult<Page<T>> {
        let rows = self
            .rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        Ok(Page { rows, meta: self.meta })
    }
}

/// Normalize a collection body into rows + meta.
///
/// `page`/`page_size` are the values that were requested; they fill in for a
/// missing or partial `meta`. Missing `totalPages` means 1, missing `total`
/// means the number of rows returned.
pub fn normalize_list(body: Option<Value>, page: u32, page_size: u32) -> Page<Value> {
    match body {
        None | Some(Value::Null) => Page::empty(page, page_size),
        Some(Value::Array(rows)) => {
            let meta = PageMeta::single(page, page_size, rows.len());
            Page { rows, meta }
        }
        Some(Value::Object(mut obj)) => {
            let rows = match obj.remove("data").or_else(|| obj.remove("items")) {
                Some(Value::Array(rows)) => rows,
                Some(other) => {
                    warn!("collection envelope carried non-array data: {}", kind(&other));
                    Vec::new()
                }
                None => Vec::new(),
            };
            let meta = obj.get("meta").map(|m| read_meta(m, page, page_size, rows.len()));
            Page {
                meta: meta.unwrap_or_else(|| PageMeta::single(page, page_size, rows.len())),
                rows,
            }
        }
        Some(other) => {
            warn!("collection endpoint returned {}", kind(&other));
            Page::empty(page, page_size)
        }
    }
}

fn read_meta(meta: &Value, page: u32, page_size: u32, rows: usize) -> PageMeta {
    let num = |key: &str| meta.get(key).and_then(Value::as_u64).filter(|n| *n > 0);
    // Saturate rather than wrap: 2^32 pages must not read as page 0.
    let small = |key: &str| num(key).map(|n| u32::try_from(n).unwrap_or(u32::MAX));
    PageMeta {
        page: small("page").unwrap_or(page.max(1)),
        page_size: small("pageSize").unwrap_or(page_size),
        total: num("total").unwrap_or(rows as u64),
        total_pages: small("totalPages").unwrap_or(1),
    }
}

/// Strip a `{data: {...}}` wrapper from a single-record body.
pub fn unwrap_record(body: Value) -> Value {
    match body {
        Value::Object(mut obj) if matches!(obj.get("data"), Some(Value::Object(_))) => {
            obj.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn oversized_meta_numbers_saturate() {
        let body = json!({
            "data": [{ "id": "1" }],
            "meta": { "page": 4_294_967_296u64, "pageSize": 10, "total": 9_000_000_000u64, "totalPages": 5_000_000_000u64 }
        });
        let page = normalize_list(Some(body), 1, 10);
        assert_eq!(page.meta.page, u32::MAX);
        assert_eq!(page.meta.total, 9_000_000_000);
        assert_eq!(page.meta.total_pages, u32::MAX);
    }

    #[test]
    fn bare_array_becomes_single_page() {
        let page = normalize_list(Some(json!([{ "id": "1" }, { "id": "2" }])), 1, 10);
        assert_eq!(page.len(), 2);
        assert_eq!(page.meta, PageMeta { page: 1, page_size: 10, total: 2, total_pages: 1 });
    }

    #[test]
    fn envelope_meta_is_read() {
        let body = json!({
            "data": [{ "id": "D1", "name": "Alpha" }],
            "meta": { "page": 1, "pageSize": 10, "total": 1, "totalPages": 1 }
        });
        let page = normalize_list(Some(body), 1, 10);
        assert_eq!(page.rows[0]["name"], "Alpha");
        assert_eq!(page.meta.summary(), "page 1 of 1 (total 1)");
    }

    #[test]
    fn partial_meta_falls_back() {
        let body = json!({ "data": [{}, {}, {}], "meta": { "page": 2 } });
        let page = normalize_list(Some(body), 2, 20);
        assert_eq!(page.meta.total, 3);
        assert_eq!(page.meta.total_pages, 1);
        assert_eq!(page.meta.page_size, 20);
    }

    #[test]
    fn null_and_scalar_bodies_are_empty() {
        assert!(normalize_list(None, 1, 10).is_empty());
        assert!(normalize_list(Some(json!("oops")), 1, 10).is_empty());
        assert!(normalize_list(Some(json!({ "data": { "id": 1 } })), 1, 10).is_empty());
    }

    #[test]
    fn items_key_is_accepted() {
        let page = normalize_list(Some(json!({ "items": [{ "id": "T1" }] })), 1, 0);
        assert_eq!(page.len(), 1);
    }

    #[test]
    fn unwrap_record_handles_both_shapes() {
        assert_eq!(unwrap_record(json!({ "data": { "id": "x" } })), json!({ "id": "x" }));
        assert_eq!(unwrap_record(json!({ "id": "x" })), json!({ "id": "x" }));
        // a list under data is not a record wrapper
        assert_eq!(unwrap_record(json!({ "data": [1] })), json!({ "data": [1] }));
    }

    #[test]
    fn navigation_flags() {
        let meta = PageMeta { page: 2, page_size: 10, total: 30, total_pages: 3 };
        assert!(meta.has_prev());
        assert!(meta.has_next());
        assert_eq!(PageMeta::single(1, 10, 0).summary(), "page 1 of 1");
    }
}
