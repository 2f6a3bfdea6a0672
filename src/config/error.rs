//! Configuration error types.

use thiserror::Error;

/// Broad category of a [`ConfigError`], for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// A raw value could not be coerced to its declared type.
    InvalidValue,
    /// A cross-field rule failed during validation.
    InvariantViolation,
}

/// Configuration loading or validation error.
///
/// Both variants are fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {field}: {value:?} ({reason})")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("{message}")]
    InvariantViolation {
        field: &'static str,
        message: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn invalid_value(
        field: &'static str,
        value: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        ConfigError::InvalidValue {
            field,
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn violation(field: &'static str, message: &'static str) -> Self {
        ConfigError::InvariantViolation { field, message }
    }

    pub fn kind(&self) -> ConfigErrorKind {
        match self {
            ConfigError::InvalidValue { .. } => ConfigErrorKind::InvalidValue,
            ConfigError::InvariantViolation { .. } => ConfigErrorKind::InvariantViolation,
        }
    }

    /// Name of the environment variable the error is about.
    pub fn field(&self) -> &'static str {
        match self {
            ConfigError::InvalidValue { field, .. } => *field,
            ConfigError::InvariantViolation { field, .. } => *field,
        }
    }
}
