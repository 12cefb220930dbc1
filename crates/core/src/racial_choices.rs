//! Per-character racial choices, stored as an opaque JSON object.

use serde_json::{Map, Value};

use crate::error::CoreError;

/// Normalize a submitted racial-choices document.
///
/// Absent or `null` becomes `{}`. Anything other than an object is rejected.
pub fn normalize_racial_choices(input: Option<Value>) -> Result<Value, CoreError> {
    match input {
        None | Some(Value::Null) => Ok(Value::Object(Map::new())),
        Some(value @ Value::Object(_)) => Ok(value),
        Some(other) => Err(CoreError::Validation(format!(
            "racial_choices must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn missing_and_null_default_to_empty_object() {
        assert_eq!(normalize_racial_choices(None).unwrap(), json!({}));
        assert_eq!(normalize_racial_choices(Some(Value::Null)).unwrap(), json!({}));
    }

    #[test]
    fn object_is_kept_verbatim() {
        let doc = json!({ "versatil": { "pericias": [3, 7] }, "heranca": "Aggelus" });
        assert_eq!(normalize_racial_choices(Some(doc.clone())).unwrap(), doc);
    }

    #[test]
    fn non_object_is_rejected() {
        assert_matches!(
            normalize_racial_choices(Some(json!([1, 2]))),
            Err(CoreError::Validation(msg)) if msg.contains("array")
        );
        assert!(normalize_racial_choices(Some(json!("x"))).is_err());
    }
}
