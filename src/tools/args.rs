//! Argument extraction for tool invocations.
//!
//! Arguments arrive as an untyped JSON object. Only the checks each tool
//! needs to build its registry query are done here; a JSON `null` is
//! treated the same as an absent optional argument.

use serde_json::Value;

use super::ToolError;

fn present<'a>(params: &'a Value, name: &str) -> Option<&'a Value> {
    params.get(name).filter(|v| !v.is_null())
}

pub fn required_str<'a>(params: &'a Value, name: &str) -> Result<&'a str, ToolError> {
    match present(params, name) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(ToolError::InvalidArguments(format!(
            "Invalid parameter: {name} must be a string"
        ))),
        None => Err(ToolError::InvalidArguments(format!(
            "Missing required parameter: {name}"
        ))),
    }
}

pub fn optional_str<'a>(params: &'a Value, name: &str) -> Result<Option<&'a str>, ToolError> {
    match present(params, name) {
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(ToolError::InvalidArguments(format!(
            "Invalid parameter: {name} must be a string"
        ))),
        None => Ok(None),
    }
}

pub fn optional_bool(params: &Value, name: &str) -> Result<Option<bool>, ToolError> {
    match present(params, name) {
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ToolError::InvalidArguments(format!(
            "Invalid parameter: {name} must be a boolean"
        ))),
        None => Ok(None),
    }
}

/// Reads a non-negative whole number. LLMs often send `5.0` for `5`,
/// so whole floats are accepted.
pub fn optional_count(params: &Value, name: &str) -> Result<Option<u64>, ToolError> {
    let Some(value) = present(params, name) else {
        return Ok(None);
    };
    value
        .as_u64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        })
        .map(Some)
        .ok_or_else(|| {
            ToolError::InvalidArguments(format!(
                "Invalid parameter: {name} must be a non-negative integer"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_str_present() {
        let params = json!({"intent": "send emails"});
        assert_eq!(required_str(&params, "intent").unwrap(), "send emails");
    }

    #[test]
    fn test_required_str_missing() {
        let err = required_str(&json!({}), "intent").unwrap_err();
        assert_eq!(err.to_string(), "Missing required parameter: intent");
    }

    #[test]
    fn test_required_str_null_is_missing() {
        let err = required_str(&json!({"intent": null}), "intent").unwrap_err();
        assert!(err.to_string().contains("Missing required parameter"));
    }

    #[test]
    fn test_required_str_wrong_type() {
        let err = required_str(&json!({"intent": 3}), "intent").unwrap_err();
        assert!(err.to_string().contains("must be a string"));
    }

    #[test]
    fn test_arguments_not_an_object() {
        // No arguments at all: the protocol layer passes `null`
        assert!(required_str(&Value::Null, "skill_id").is_err());
        assert_eq!(optional_count(&Value::Null, "limit").unwrap(), None);
    }

    #[test]
    fn test_optional_count_accepts_integers_and_whole_floats() {
        assert_eq!(optional_count(&json!({"limit": 10}), "limit").unwrap(), Some(10));
        assert_eq!(optional_count(&json!({"limit": 7.0}), "limit").unwrap(), Some(7));
        assert_eq!(optional_count(&json!({}), "limit").unwrap(), None);
    }

    #[test]
    fn test_optional_count_rejects_invalid() {
        assert!(optional_count(&json!({"limit": -1}), "limit").is_err());
        assert!(optional_count(&json!({"limit": 2.5}), "limit").is_err());
        assert!(optional_count(&json!({"limit": "ten"}), "limit").is_err());
    }

    #[test]
    fn test_optional_bool() {
        assert_eq!(optional_bool(&json!({"verified": true}), "verified").unwrap(), Some(true));
        assert_eq!(optional_bool(&json!({"verified": null}), "verified").unwrap(), None);
        assert!(optional_bool(&json!({"verified": "yes"}), "verified").is_err());
    }

    #[test]
    fn test_optional_str() {
        assert_eq!(optional_str(&json!({"category": "api"}), "category").unwrap(), Some("api"));
        assert_eq!(optional_str(&json!({}), "category").unwrap(), None);
        assert!(optional_str(&json!({"category": 1}), "category").is_err());
    }
}
