use super::RawEntry;
use crate::backends::descriptor::OutputFormat;
use crate::error::{HomedeclError, Result};
use serde_json::{Map, Value};

/// JSON array of objects; `name_key` names the identifier field.
///
/// Objects without a string identifier are skipped.
pub(super) fn parse_json_array(output: &str, format: &OutputFormat) -> Result<Vec<RawEntry>> {
    let json = decode(output, format)?;

    let Some(target) = select(&json, format) else {
        return Ok(Vec::new());
    };

    let items = match target {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => return Err(shape_error(format, "an array", other)),
    };

    let mut entries = Vec::new();
    for item in items {
        let Some(object) = item.as_object() else {
            continue;
        };
        let Some(identifier) = object.get(&format.name_key).and_then(Value::as_str) else {
            continue;
        };
        if identifier.trim().is_empty() {
            continue;
        }

        let mut entry = RawEntry::new(identifier.trim());
        copy_fields(object, Some(&format.name_key), &mut entry);
        entries.push(entry);
    }

    Ok(entries)
}

/// JSON object whose keys are identifiers.
///
/// Object values contribute their keys as fields, scalar values land under
/// `value`, and `null` values are dropped.
pub(super) fn parse_json_map(output: &str, format: &OutputFormat) -> Result<Vec<RawEntry>> {
    let json = decode(output, format)?;

    let Some(target) = select(&json, format) else {
        return Ok(Vec::new());
    };

    let map = match target {
        Value::Object(map) => map,
        Value::Null => return Ok(Vec::new()),
        other => return Err(shape_error(format, "an object", other)),
    };

    let mut entries = Vec::new();
    for (key, value) in map {
        if key.trim().is_empty() {
            continue;
        }
        let mut entry = RawEntry::new(key.trim());
        match value {
            Value::Null => continue,
            Value::Object(object) => copy_fields(object, None, &mut entry),
            scalar => {
                if let Some(text) = scalar_to_string(scalar) {
                    entry.fields.insert("value".to_string(), text);
                }
            }
        }
        entries.push(entry);
    }

    Ok(entries)
}

/// Navigate through JSON structure using dot notation path (`a.b.0.c`)
pub fn navigate_json_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;

    for part in path.split('.').filter(|p| !p.is_empty()) {
        match current {
            Value::Object(map) => {
                current = map.get(part)?;
            }
            Value::Array(arr) => {
                let index = part.parse::<usize>().ok()?;
                current = arr.get(index)?;
            }
            _ => return None,
        }
    }

    Some(current)
}

fn decode(output: &str, format: &OutputFormat) -> Result<Value> {
    serde_json::from_str(output.trim()).map_err(|e| HomedeclError::ParseError {
        file: format!("{} output", format.strategy),
        message: format!("invalid JSON: {}", e),
    })
}

fn select<'a>(json: &'a Value, format: &OutputFormat) -> Option<&'a Value> {
    match &format.json_path {
        Some(path) => navigate_json_path(json, path),
        None => Some(json),
    }
}

fn shape_error(format: &OutputFormat, expected: &str, found: &Value) -> HomedeclError {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    HomedeclError::ParseError {
        file: format!("{} output", format.strategy),
        message: format!("expected {} but found {}", expected, found),
    }
}

fn copy_fields(object: &Map<String, Value>, skip_key: Option<&str>, entry: &mut RawEntry) {
    for (key, value) in object {
        if Some(key.as_str()) == skip_key {
            continue;
        }
        if let Some(text) = scalar_to_string(value) {
            entry.fields.insert(key.clone(), text);
        }
    }
}

/// Strings verbatim, other scalars as JSON text, nested values as compact JSON.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
