//! Entity trait - common interface for all inventory row types

use miette::Diagnostic;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Common trait for all persisted inventory rows
pub trait Entity: Serialize + DeserializeOwned {
    /// Human-readable entity kind (e.g., "material", "product type")
    const KIND: &'static str;

    /// The natural key used for update-by-key and delete-by-key
    fn key(&self) -> String;

    /// Form-level validation, run before any write is attempted
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Validation failures caught before a statement is issued
#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum ValidationError {
    #[error("required field '{field}' is empty")]
    #[diagnostic(
        code(minv::validation::missing),
        help("every {kind} needs a non-empty {field}")
    )]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("'{field}' cannot be negative (got {value})")]
    #[diagnostic(code(minv::validation::negative))]
    Negative { field: &'static str, value: f64 },

    #[error("'{field}' is not a finite number")]
    #[diagnostic(code(minv::validation::not_finite))]
    NotFinite { field: &'static str },
}

/// Reject blank text fields
pub fn require_text(
    kind: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { kind, field });
    }
    Ok(())
}

/// Reject NaN, infinities and negative values
pub fn require_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(())
}

/// Only require the value to be a real number
pub fn require_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert!(require_text("material", "name", "Oak board").is_ok());
        assert_eq!(
            require_text("material", "name", "   "),
            Err(ValidationError::MissingField {
                kind: "material",
                field: "name"
            })
        );
    }

    #[test]
    fn test_require_non_negative() {
        assert!(require_non_negative("price", 0.0).is_ok());
        assert!(require_non_negative("price", 12.5).is_ok());
        assert!(matches!(
            require_non_negative("price", -1.0),
            Err(ValidationError::Negative { field: "price", .. })
        ));
        assert_eq!(
            require_non_negative("price", f64::NAN),
            Err(ValidationError::NotFinite { field: "price" })
        );
    }

    #[test]
    fn test_require_finite_allows_negative() {
        assert!(require_finite("defect_percent", -3.0).is_ok());
        assert!(require_finite("defect_percent", f64::INFINITY).is_err());
    }
}
