//! Custom error types for datebench.
//!
//! Explicit enum error types only: no `Box<dyn Error>`, no `anyhow::Result`
//! in library code. Every failure mode is a named variant.

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{Library, OperationName, Projected, Projection};

/// Top-level error type for datebench.
#[derive(Debug, Error)]
pub enum DateBenchError {
    // =========================================================================
    // Configuration Errors - Fail-Fast on Invalid Config
    // =========================================================================
    #[error("Hard validation error: {0}")]
    HardValidation(#[from] HardValidationError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    // =========================================================================
    // Registry Errors
    // =========================================================================
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    // =========================================================================
    // Equivalence Errors - Libraries Disagree
    // =========================================================================
    #[error("Equivalence check failed: {0}")]
    Equivalence(#[from] EquivalenceError),

    // =========================================================================
    // Input Errors - Generated Value Not Representable
    // =========================================================================
    #[error("Cannot convert input for {library}: {message}")]
    InputConversion { library: Library, message: String },

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Hard validation errors abort startup.
#[derive(Debug, Error)]
pub enum HardValidationError {
    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown library: {name}")]
    UnknownLibrary { name: String },

    #[error("Unknown operation: {name}")]
    UnknownOperation { name: String },

    #[error("Empty selection: {field} must list at least one entry when present")]
    EmptySelection { field: &'static str },
}

/// Registry construction and lookup errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Operation already declared: {operation}")]
    DuplicateOperation { operation: OperationName },

    #[error("Library {library} already registered for operation {operation}")]
    DuplicateEntry {
        operation: OperationName,
        library: Library,
    },

    #[error("Operation not found: {operation}")]
    OperationNotFound { operation: String },

    #[error("Library {library} is not registered for operation {operation}")]
    LibraryNotRegistered {
        operation: OperationName,
        library: Library,
    },
}

/// Cross-library equivalence failures.
#[derive(Debug, Error)]
pub enum EquivalenceError {
    #[error("Libraries disagree on {projection} for {operation}: {}", format_values(values))]
    Mismatch {
        operation: OperationName,
        projection: Projection,
        values: BTreeMap<Library, Projected>,
    },

    #[error("{library} failed on {operation}: {message}")]
    Invocation {
        operation: OperationName,
        library: Library,
        message: String,
    },

    #[error("{library} result for {operation} ({type_name}) has no {projection} projection")]
    Unprojectable {
        operation: OperationName,
        library: Library,
        projection: Projection,
        type_name: &'static str,
    },
}

fn format_values(values: &BTreeMap<Library, Projected>) -> String {
    values
        .iter()
        .map(|(lib, value)| format!("{}={}", lib, value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias using DateBenchError.
pub type DateBenchResult<T> = Result<T, DateBenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn op(name: &str) -> OperationName {
        OperationName::new(name).unwrap()
    }

    #[test]
    fn test_mismatch_display_names_every_library() {
        let mut values = BTreeMap::new();
        values.insert(Library::Chrono, Projected::Integer(19));
        values.insert(Library::Jiff, Projected::Integer(20));

        let err = EquivalenceError::Mismatch {
            operation: op("parse_utc_from_rfc_3339"),
            projection: Projection::DayOfMonth,
            values,
        };
        let text = err.to_string();
        assert!(text.contains("day_of_month"));
        assert!(text.contains("chrono=19"));
        assert!(text.contains("jiff=20"));
    }

    #[test]
    fn test_error_chain() {
        let registry_err = RegistryError::OperationNotFound {
            operation: "now_mars".to_string(),
        };
        let err: DateBenchError = registry_err.into();
        assert!(matches!(err, DateBenchError::Registry(_)));
        assert!(err.to_string().contains("now_mars"));
    }
}
