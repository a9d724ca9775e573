//! Validation error types
//!
//! Validation failures carry a list of field-level errors so the API can
//! return a 422 body telling the caller exactly which fields failed.

use std::fmt;

use serde::Serialize;

/// One failed field: where, what, and which kind of failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Location of the failure, e.g. `["body", "name"]`
    pub loc: Vec<String>,

    /// Human-readable message
    pub msg: String,

    /// Machine-readable failure kind, e.g. `value_error.missing`
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    /// Required field absent from the request body.
    pub fn missing(field: &str) -> Self {
        Self {
            loc: vec!["body".to_string(), field.to_string()],
            msg: "field required".to_string(),
            kind: "value_error.missing".to_string(),
        }
    }

    /// Field present but empty where a value is required.
    pub fn empty(field: &str) -> Self {
        Self {
            loc: vec!["body".to_string(), field.to_string()],
            msg: "must not be empty".to_string(),
            kind: "value_error.empty".to_string(),
        }
    }

    /// Field present but failing a semantic rule.
    pub fn invalid(field: &str, msg: impl Into<String>) -> Self {
        Self {
            loc: vec!["body".to_string(), field.to_string()],
            msg: msg.into(),
            kind: "value_error.invalid".to_string(),
        }
    }

    /// Failure that cannot be attributed to a single field.
    pub fn body(msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: vec!["body".to_string()],
            msg: msg.into(),
            kind: kind.into(),
        }
    }
}

/// Validation failure: one or more field errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn single(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Classify a serde deserialization message into a field error.
    ///
    /// serde_json reports missing and unknown fields as
    /// ``missing field `name` at line ...``; the field name between the
    /// backticks is lifted into the error location so callers still get a
    /// per-field report even though deserialization stops at the first
    /// failure.
    pub fn from_body_error(message: &str) -> Self {
        let field_between_backticks = |s: &str| -> Option<String> {
            let start = s.find('`')? + 1;
            let end = s[start..].find('`')? + start;
            Some(s[start..end].to_string())
        };

        let error = if message.starts_with("missing field") {
            match field_between_backticks(message) {
                Some(field) => FieldError::missing(&field),
                None => FieldError::body(message, "value_error.missing"),
            }
        } else if message.starts_with("unknown field") {
            match field_between_backticks(message) {
                Some(field) => FieldError {
                    loc: vec!["body".to_string(), field],
                    msg: "unknown field".to_string(),
                    kind: "value_error.unknown".to_string(),
                },
                None => FieldError::body(message, "value_error.unknown"),
            }
        } else if message.starts_with("invalid type") {
            FieldError::body(message, "type_error")
        } else {
            FieldError::body(message, "value_error.malformed")
        };

        Self::single(error)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msgs: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.loc.join("."), e.msg))
            .collect();
        write!(f, "{}", msgs.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Accumulates field errors while a payload is checked.
#[derive(Debug, Default)]
pub struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a non-empty string.
    pub fn non_empty(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.errors.push(FieldError::empty(field));
        }
    }

    /// Require a strictly positive integer.
    pub fn positive(&mut self, field: &'static str, value: i64) {
        if value < 1 {
            self.errors
                .push(FieldError::invalid(field, "must be greater than zero"));
        }
    }

    /// Require a strictly positive float.
    pub fn positive_f64(&mut self, field: &'static str, value: f64) {
        if !(value > 0.0) {
            self.errors
                .push(FieldError::invalid(field, "must be greater than zero"));
        }
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::single(FieldError::empty("name"));
        assert_eq!(err.to_string(), "body.name: must not be empty");
    }

    #[test]
    fn missing_field_message_is_attributed() {
        let err = ValidationError::from_body_error("missing field `autor` at line 1 column 30");
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].loc, vec!["body", "autor"]);
        assert_eq!(err.errors[0].kind, "value_error.missing");
    }

    #[test]
    fn type_error_message_stays_body_level() {
        let err = ValidationError::from_body_error("invalid type: string \"x\", expected i64");
        assert_eq!(err.errors[0].loc, vec!["body"]);
        assert_eq!(err.errors[0].kind, "type_error");
    }

    #[test]
    fn checker_accumulates() {
        let mut check = Checker::new();
        check.non_empty("name", "");
        check.positive("repetition", 0);
        let err = check.finish().unwrap_err();
        assert_eq!(err.errors.len(), 2);
    }

    #[test]
    fn field_error_serializes_kind_as_type() {
        let json = serde_json::to_value(FieldError::missing("size")).unwrap();
        assert_eq!(json["type"], "value_error.missing");
        assert_eq!(json["loc"][1], "size");
    }
}
