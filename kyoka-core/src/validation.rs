//! Field-level checks shared by the services.
//!
//! Inputs arrive as loosely typed JSON; these helpers turn them into the
//! strict model types or a `Validation` error naming the offending field.

use serde_json::Value;

use crate::error::{KyokaError, Result};

/// Non-empty text field. The value is kept exactly as supplied.
pub fn required_text(field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        Some(_) => Err(KyokaError::validation(format!("{} must not be empty", field))),
        None => Err(KyokaError::validation(format!("{} is required", field))),
    }
}

/// Non-negative integer age.
///
/// Numeric strings such as `"30"` are coerced.
pub fn required_age(field: &str, value: Option<&Value>) -> Result<u32> {
    let invalid = || KyokaError::validation(format!("{} must be a non-negative integer", field));

    match value {
        None | Some(Value::Null) => Err(KyokaError::validation(format!("{} is required", field))),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(invalid),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(KyokaError::validation(format!("{} must not be empty", field)))
        }
        Some(Value::String(s)) => s.trim().parse::<u32>().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn is_validation(result: Result<impl std::fmt::Debug>) -> bool {
        matches!(result, Err(KyokaError::Validation { .. }))
    }

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("name", Some("John Doe".into())).unwrap(), "John Doe");
        assert!(is_validation(required_text("name", None)));
        assert!(is_validation(required_text("name", Some(String::new()))));
        assert!(is_validation(required_text("name", Some("   ".into()))));
    }

    #[test]
    fn test_required_age_accepts_integers() {
        assert_eq!(required_age("age", Some(&json!(30))).unwrap(), 30);
        assert_eq!(required_age("age", Some(&json!(0))).unwrap(), 0);
        assert_eq!(required_age("age", Some(&json!("42"))).unwrap(), 42);
    }

    #[test]
    fn test_required_age_rejects() {
        assert!(is_validation(required_age("age", None)));
        assert!(is_validation(required_age("age", Some(&Value::Null))));
        assert!(is_validation(required_age("age", Some(&json!(-1)))));
        assert!(is_validation(required_age("age", Some(&json!(30.5)))));
        assert!(is_validation(required_age("age", Some(&json!("thirty")))));
        assert!(is_validation(required_age("age", Some(&json!("")))));
        assert!(is_validation(required_age("age", Some(&json!([30])))));
    }

    #[test]
    fn test_error_names_field() {
        let err = required_text("treatmentPlan", None).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: treatmentPlan is required");
    }
}
