//! Lenient helpers for extracting typed parameters from a `serde_json::Value`.
//!
//! Each helper takes a JSON value, a key name, and a default. If the key is
//! missing or the value is not the expected type, the default is returned.
//! The host hands over whatever its widgets produced, so these never fail.

use serde_json::Value;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// Accepts both JSON numbers (including integers) and converts them to f64.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a list of strings from `params[name]`.
///
/// An array keeps only its string elements; a single string becomes a
/// one-element list. Anything else (or a missing key) yields an empty list.
pub fn param_string_list(params: &Value, name: &str) -> Vec<String> {
    match params.get(name) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Human-readable JSON type name, for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
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
    use serde_json::json;

    // -- param_f64 --

    #[test]
    fn param_f64_extracts_existing_float() {
        let params = json!({"energyLevel": 150.5});
        assert!((param_f64(&params, "energyLevel", 80.0) - 150.5).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_extracts_integer_as_float() {
        let params = json!({"intensity": 100});
        assert!((param_f64(&params, "intensity", 0.0) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_when_key_missing() {
        let params = json!({"other": 1.0});
        assert!((param_f64(&params, "frequency", 4.8) - 4.8).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_when_wrong_type() {
        let params = json!({"frequency": "fast"});
        assert!((param_f64(&params, "frequency", 1.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_for_null_value() {
        let params = json!({"particleSpin": null});
        assert!((param_f64(&params, "particleSpin", 1.5) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_for_non_object() {
        let params = json!("not an object");
        assert!((param_f64(&params, "intensity", 42.0) - 42.0).abs() < f64::EPSILON);
    }

    // -- param_string_list --

    #[test]
    fn param_string_list_keeps_string_elements_only() {
        let params = json!({"anomalies": ["Flux Pinch", 3, null, "Event Horizon"]});
        assert_eq!(
            param_string_list(&params, "anomalies"),
            vec!["Flux Pinch".to_string(), "Event Horizon".to_string()]
        );
    }

    #[test]
    fn param_string_list_wraps_single_string() {
        let params = json!({"anomalies": "Phase Drift"});
        assert_eq!(param_string_list(&params, "anomalies"), vec!["Phase Drift"]);
    }

    #[test]
    fn param_string_list_empty_for_missing_or_wrong_type() {
        assert!(param_string_list(&json!({}), "anomalies").is_empty());
        assert!(param_string_list(&json!({"anomalies": 5}), "anomalies").is_empty());
    }

    #[test]
    fn json_type_name_covers_all_variants() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(true)), "boolean");
        assert_eq!(json_type_name(&json!(1)), "number");
        assert_eq!(json_type_name(&json!("s")), "string");
        assert_eq!(json_type_name(&json!([])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }
}
