//! Dotted-path access into JSON documents.
//!
//! `set_path` never mutates its input: it rebuilds only the containers on the
//! path and clones every sibling untouched.

use serde_json::{Map, Value};

use crate::error::{AdminError, AdminResult};

fn segments(path: &str) -> AdminResult<Vec<&str>> {
    let segs: Vec<&str> = path.split('.').map(str::trim).collect();
    if segs.iter().any(|s| s.is_empty()) {
        return Err(AdminError::validation(format!("Invalid settings path '{}'", path)));
    }
    Ok(segs)
}

pub fn get_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    let segs = segments(path).ok()?;
    segs.into_iter().try_fold(doc, |node, seg| match node {
        Value::Array(items) => seg.parse::<usize>().ok().and_then(|i| items.get(i)),
        other => other.get(seg),
    })
}

/// Copy of `doc` with `value` stored at `path`.
///
/// Missing or non-object intermediate nodes become objects. A numeric segment
/// under an array addresses an element, padding with nulls when needed.
pub fn set_path(doc: &Value, path: &str, value: Value) -> AdminResult<Value> {
    let segs = segments(path)?;
    Ok(set_in(doc, &segs, value))
}

fn set_in(node: &Value, segs: &[&str], value: Value) -> Value {
    let (seg, rest) = match segs.split_first() {
        Some(split) => split,
        None => return value,
    };

    if let (Value::Array(items), Ok(index)) = (node, seg.parse::<usize>()) {
        let mut items = items.clone();
        if items.len() <= index {
            items.resize(index + 1, Value::Null);
        }
        items[index] = set_in(&items[index], rest, value);
        return Value::Array(items);
    }

    let mut map = node.as_object().cloned().unwrap_or_else(Map::new);
    let child = map.get(*seg).cloned().unwrap_or(Value::Null);
    map.insert(seg.to_string(), set_in(&child, rest, value));
    Value::Object(map)
}

/// Parse command-line input as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
