use std::fmt::Display;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required key is absent from the input.
    MissingField,
    /// The value has the wrong shape for the field.
    BadType,
    /// The value is well-typed but not acceptable (e.g. malformed uuid).
    BadValue,
    /// Storage refused the change; it has been rolled back.
    PersistenceFailure,
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub field: Option<String>,
    pub message: String,
}

impl ValidationError {
    pub fn missing(field: &str) -> Self {
        Self {
            kind: ValidationErrorKind::MissingField,
            field: Some(field.to_string()),
            message: format!("Invalid Promotion: missing {}", field),
        }
    }

    pub fn bad_type(field: &str, detail: impl Display) -> Self {
        Self {
            kind: ValidationErrorKind::BadType,
            field: Some(field.to_string()),
            message: format!(
                "Invalid Promotion: body of request contained bad or no data {}: {}",
                field, detail
            ),
        }
    }

    /// A string that does not parse for its field (e.g. a malformed timestamp).
    /// Same kind as [`Self::bad_type`], worded like [`Self::bad_value`].
    pub fn bad_format(field: &str, detail: impl Display) -> Self {
        Self {
            kind: ValidationErrorKind::BadType,
            field: Some(field.to_string()),
            message: format!(
                "Invalid Promotion: body of request contained bad data type {}: {}",
                field, detail
            ),
        }
    }

    pub fn bad_value(field: &str, detail: impl Display) -> Self {
        Self {
            kind: ValidationErrorKind::BadValue,
            field: Some(field.to_string()),
            message: format!(
                "Invalid Promotion: body of request contained bad data type {}: {}",
                field, detail
            ),
        }
    }

    pub fn persistence(cause: impl Display) -> Self {
        Self {
            kind: ValidationErrorKind::PersistenceFailure,
            field: None,
            message: cause.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_message_names_field() {
        let err = ValidationError::missing("start_date");
        assert_eq!(err.kind, ValidationErrorKind::MissingField);
        assert_eq!(err.field.as_deref(), Some("start_date"));
        assert_eq!(err.to_string(), "Invalid Promotion: missing start_date");
    }

    #[test]
    fn test_bad_type_and_bad_format_wording() {
        let err = ValidationError::bad_type("end_date", 20231231);
        assert_eq!(err.kind, ValidationErrorKind::BadType);
        assert!(err.to_string().contains("bad or no data end_date"));

        let err = ValidationError::bad_format("end_date", "invalid isoformat string: 'x'");
        assert_eq!(err.kind, ValidationErrorKind::BadType);
        assert!(err.to_string().contains("bad data type end_date"));
    }

    #[test]
    fn test_persistence_keeps_cause() {
        let err = ValidationError::persistence("duplicate key value violates unique constraint");
        assert_eq!(err.kind, ValidationErrorKind::PersistenceFailure);
        assert!(err.field.is_none());
        assert!(err.to_string().contains("duplicate key"));
    }
}
