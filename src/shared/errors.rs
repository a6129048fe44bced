//! Strict error handling with CommandError enum
//!
//! Every widget operation returns `CommandResult<T>`. All variants are
//! recoverable and serializable so the frontend can show them as a toast
//! instead of corrupting its display.

use thiserror::Error;
use serde::Serialize;

/// Widget operation errors
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum CommandError {
    /// Expression contains characters outside `[0-9+\-*/().]`
    #[error("Invalid characters in expression: {0}")]
    InvalidCharacters(String),

    /// Expression passed the character whitelist but is not well formed
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    #[error("Cannot divide by zero")]
    DivisionByZero,

    /// Function argument outside its mathematical domain
    #[error("Domain error: {0}")]
    DomainError(String),

    /// No direct, reciprocal or pivot rate connects the two currencies
    #[error("No exchange rate from {from} to {to}")]
    UnresolvedConversion { from: String, to: String },

    /// Numeric field holds text that is not a finite number
    #[error("Not a finite number: {0}")]
    NonFiniteInput(String),

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    /// Invalid input or parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network/API error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// System I/O error (settings file, data directories)
    #[error("System I/O error: {0}")]
    SystemIO(String),
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::SystemIO(err.to_string())
    }
}

impl From<reqwest::Error> for CommandError {
    fn from(err: reqwest::Error) -> Self {
        CommandError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        CommandError::InvalidInput(format!("JSON error: {}", err))
    }
}

// Helper type alias for command results
pub type CommandResult<T> = Result<T, CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_tagged() {
        let json = serde_json::to_value(CommandError::DomainError("sqrt of negative".into())).unwrap();
        assert_eq!(json["type"], "DomainError");
        assert_eq!(json["message"], "sqrt of negative");
    }

    #[test]
    fn test_unit_variant_serializes_without_message() {
        let json = serde_json::to_value(CommandError::DivisionByZero).unwrap();
        assert_eq!(json["type"], "DivisionByZero");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_display_messages() {
        let err = CommandError::UnresolvedConversion {
            from: "EUR".into(),
            to: "XYZ".into(),
        };
        assert_eq!(err.to_string(), "No exchange rate from EUR to XYZ");
        assert_eq!(CommandError::DivisionByZero.to_string(), "Cannot divide by zero");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(matches!(CommandError::from(io), CommandError::SystemIO(_)));
    }
}
