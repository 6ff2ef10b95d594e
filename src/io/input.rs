use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error::LabelError;

/// Raw label input in one of the two accepted shapes.
#[derive(Debug, Clone)]
pub enum RawEntries {
    /// Already-structured sequence of field mappings.
    Structured(Vec<HashMap<String, String>>),
    /// Delimited text blob: blank line between records, `key: value`
    /// lines within a record.
    Delimited(String),
}

/// Interpret the `entries` value of a request payload.
///
/// Accepted shapes: an array of objects (scalar values are coerced to
/// strings, other value types are silently dropped) or a single string
/// holding a delimited text blob. Anything else is `MalformedInput`.
pub fn parse_entries(value: Option<&Value>) -> Result<RawEntries, LabelError> {
    let value =
        value.ok_or_else(|| LabelError::MalformedInput("missing 'entries' payload".to_string()))?;

    match value {
        Value::Array(items) => {
            let mut maps = Vec::with_capacity(items.len());
            for item in items {
                let Value::Object(object) = item else {
                    return Err(LabelError::MalformedInput(
                        "'entries' array items must be objects".to_string(),
                    ));
                };
                let mut fields = HashMap::new();
                for (key, val) in object {
                    if let Some(text) = scalar_to_string(val) {
                        fields.insert(key.clone(), text);
                    }
                }
                maps.push(fields);
            }
            Ok(RawEntries::Structured(maps))
        }
        Value::String(text) => Ok(RawEntries::Delimited(text.clone())),
        _ => Err(LabelError::MalformedInput(
            "'entries' must be an array of objects or a text block".to_string(),
        )),
    }
}

/// Coerce a scalar JSON value to a string; non-scalars have no place in a
/// label field and are dropped.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parse a delimited text blob into field mappings. Records are separated
/// by blank lines; each field line is split at the first `": "`. Lines
/// without the separator are skipped, not an error.
pub fn parse_delimited(text: &str) -> Vec<HashMap<String, String>> {
    let mut records = Vec::new();
    let mut current: HashMap<String, String> = HashMap::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                records.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some((key, value)) = line.split_once(": ") {
            current.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    if !current.is_empty() {
        records.push(current);
    }

    records
}

/// Load label input from a local file. A file that parses as JSON is
/// treated as a request payload (either a bare entries value or an object
/// with an `entries` key); anything else is taken as a delimited blob.
pub fn read_input_file(path: &Path) -> Result<RawEntries, LabelError> {
    let content = std::fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(object)) => parse_entries(object.get("entries")),
        Ok(value) => parse_entries(Some(&value)),
        Err(_) => Ok(RawEntries::Delimited(content)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_entries_structured() {
        let value = json!([
            {"customer": "Acme", "order": "PO-17"},
            {"customer": "Globex", "position": 42, "flag": true}
        ]);
        let RawEntries::Structured(maps) = parse_entries(Some(&value)).unwrap() else {
            panic!("expected structured entries");
        };

        assert_eq!(maps.len(), 2);
        assert_eq!(maps[0]["customer"], "Acme");
        assert_eq!(maps[1]["position"], "42");
        assert_eq!(maps[1]["flag"], "true");
    }

    #[test]
    fn test_parse_entries_drops_non_scalar_values() {
        let value = json!([{"customer": "Acme", "nested": {"a": 1}}]);
        let RawEntries::Structured(maps) = parse_entries(Some(&value)).unwrap() else {
            panic!("expected structured entries");
        };
        assert!(!maps[0].contains_key("nested"));
    }

    #[test]
    fn test_parse_entries_text_blob() {
        let value = json!("customer: Acme\norder: PO-17");
        assert!(matches!(
            parse_entries(Some(&value)).unwrap(),
            RawEntries::Delimited(_)
        ));
    }

    #[test]
    fn test_parse_entries_rejects_missing_and_wrong_shapes() {
        assert!(matches!(
            parse_entries(None),
            Err(LabelError::MalformedInput(_))
        ));
        assert!(matches!(
            parse_entries(Some(&json!(42))),
            Err(LabelError::MalformedInput(_))
        ));
        assert!(matches!(
            parse_entries(Some(&json!(["not-an-object"]))),
            Err(LabelError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_parse_delimited_splits_records_on_blank_lines() {
        let text = "customer: Acme\norder: PO-17\n\ncustomer: Globex\norder: PO-18\n";
        let records = parse_delimited(text);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["customer"], "Acme");
        assert_eq!(records[1]["order"], "PO-18");
    }

    #[test]
    fn test_parse_delimited_skips_malformed_lines() {
        let text = "customer: Acme\nthis line has no separator\norder: PO-17";
        let records = parse_delimited(text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].len(), 2);
        assert_eq!(records[0]["customer"], "Acme");
        assert_eq!(records[0]["order"], "PO-17");
    }

    #[test]
    fn test_parse_delimited_splits_at_first_separator_and_trims() {
        let text = "content: boxes: 12, crates: 3\nowner:   Dock 4  ";
        let records = parse_delimited(text);

        assert_eq!(records[0]["content"], "boxes: 12, crates: 3");
        assert_eq!(records[0]["owner"], "Dock 4");
    }
}
