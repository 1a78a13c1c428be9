// Declarative input schemas for API payloads
pub mod columns;
pub mod ticket_assignees;
pub mod tickets;
pub mod users;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single violated field, reported back to the client verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Accepted value shapes for schema fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any JSON string.
    String,
    /// A string with at least one non-whitespace character.
    NonEmptyString,
    /// A string shaped like `local@domain`.
    Email,
    /// A string of at least MIN_PASSWORD_LENGTH characters.
    Password,
    /// An array whose elements are all strings.
    StringArray,
}

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// A per-entity, per-operation input schema.
///
/// `validate` checks every declared field and reports the full list of
/// violations, not just the first. Unrecognized fields are dropped from the
/// normalized output rather than rejected.
pub struct Schema {
    pub entity: &'static str,
    /// Update schemas set this: an input that patches nothing is a violation.
    pub require_some: bool,
    pub fields: &'static [FieldSpec],
}

impl Schema {
    pub fn validate(&self, input: &Value) -> Result<Map<String, Value>, Vec<FieldViolation>> {
        let obj = match input.as_object() {
            Some(obj) => obj,
            None => {
                return Err(vec![FieldViolation::new("$", "expected a JSON object")]);
            }
        };

        let mut normalized = Map::new();
        let mut violations = Vec::new();

        for spec in self.fields {
            match obj.get(spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        violations.push(FieldViolation::new(spec.name, "this field is required"));
                    }
                }
                Some(value) => match check_kind(spec.kind, value) {
                    Ok(()) => {
                        normalized.insert(spec.name.to_string(), value.clone());
                    }
                    Err(message) => violations.push(FieldViolation::new(spec.name, message)),
                },
            }
        }

        if violations.is_empty() && self.require_some && normalized.is_empty() {
            violations.push(FieldViolation::new("$", "at least one updatable field is required"));
        }

        if violations.is_empty() {
            Ok(normalized)
        } else {
            Err(violations)
        }
    }
}

fn check_kind(kind: FieldKind, value: &Value) -> Result<(), String> {
    match kind {
        FieldKind::String => match value.as_str() {
            Some(_) => Ok(()),
            None => Err("expected a string".to_string()),
        },
        FieldKind::NonEmptyString => match value.as_str() {
            Some(s) if !s.trim().is_empty() => Ok(()),
            Some(_) => Err("must not be empty".to_string()),
            None => Err("expected a string".to_string()),
        },
        FieldKind::Email => match value.as_str() {
            Some(s) => check_email(s),
            None => Err("expected a string".to_string()),
        },
        FieldKind::Password => match value.as_str() {
            Some(s) if s.len() >= MIN_PASSWORD_LENGTH => Ok(()),
            Some(_) => Err(format!("must be at least {} characters", MIN_PASSWORD_LENGTH)),
            None => Err("expected a string".to_string()),
        },
        FieldKind::StringArray => match value.as_array() {
            Some(items) if items.iter().all(Value::is_string) => Ok(()),
            Some(_) => Err("every element must be a string".to_string()),
            None => Err("expected an array of strings".to_string()),
        },
    }
}

fn check_email(email: &str) -> Result<(), String> {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err("invalid email format".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static TEST_CREATE: Schema = Schema {
        entity: "widgets",
        require_some: false,
        fields: &[
            FieldSpec { name: "name", kind: FieldKind::NonEmptyString, required: true },
            FieldSpec { name: "email", kind: FieldKind::Email, required: true },
            FieldSpec { name: "tags", kind: FieldKind::StringArray, required: false },
        ],
    };

    static TEST_UPDATE: Schema = Schema {
        entity: "widgets",
        require_some: true,
        fields: &[
            FieldSpec { name: "name", kind: FieldKind::NonEmptyString, required: false },
            FieldSpec { name: "email", kind: FieldKind::Email, required: false },
        ],
    };

    #[test]
    fn reports_every_violation_not_just_the_first() {
        let err = TEST_CREATE.validate(&json!({ "tags": [1, 2] })).unwrap_err();
        let fields: Vec<&str> = err.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "tags"]);
    }

    #[test]
    fn drops_unrecognized_fields() {
        let normalized = TEST_CREATE
            .validate(&json!({ "name": "a", "email": "a@x.com", "bogus": true }))
            .unwrap();
        assert!(normalized.contains_key("name"));
        assert!(!normalized.contains_key("bogus"));
    }

    #[test]
    fn null_counts_as_missing() {
        let err = TEST_CREATE.validate(&json!({ "name": null, "email": "a@x.com" })).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].field, "name");
        assert_eq!(err[0].message, "this field is required");
    }

    #[test]
    fn rejects_non_object_input() {
        let err = TEST_CREATE.validate(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err[0].field, "$");
    }

    #[test]
    fn update_requires_at_least_one_field() {
        let err = TEST_UPDATE.validate(&json!({})).unwrap_err();
        assert_eq!(err[0].field, "$");

        let ok = TEST_UPDATE.validate(&json!({ "name": "b" })).unwrap();
        assert_eq!(ok.len(), 1);
    }

    #[test]
    fn email_shape_is_checked() {
        assert!(check_email("a@x.com").is_ok());
        assert!(check_email("ax.com").is_err());
        assert!(check_email("@x.com").is_err());
        assert!(check_email("a@").is_err());
    }

    #[test]
    fn string_array_rejects_mixed_elements() {
        let err = TEST_CREATE
            .validate(&json!({ "name": "a", "email": "a@x.com", "tags": ["ok", 1] }))
            .unwrap_err();
        assert_eq!(err[0].field, "tags");
    }
}
