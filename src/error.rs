//! The crate-wide error taxonomy (kinds, not type names): navigation,
//! validation, io, backend, parse, cancellation, corruption.

use std::path::PathBuf;
use thiserror::Error;

/// A single navigation-rule-table violation.
#[derive(Debug, Clone, Error)]
#[error("invalid transition from {from} to {to} in phase {phase}: {rationale}")]
pub struct NavigationError {
    pub from: u8,
    pub to: u8,
    pub phase: u8,
    pub rationale: String,
}

/// Top-level error for every fallible operation in the crate.
#[derive(Debug, Error)]
pub enum ObotError {
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("backend error: {0}")]
    Backend(String),

    #[error("could not parse policy response: {0}")]
    Parse(String),

    #[error("operation cancelled")]
    Cancellation,

    #[error("corrupted artifact at {path}: {reason}")]
    Corruption { path: PathBuf, reason: String },
}

impl ObotError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn corruption(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Corruption { path: path.into(), reason: reason.into() }
    }

    /// The error taxonomy kind, used for logging and tests that assert on
    /// the kind rather than the type.
    pub fn kind(&self) -> &'static str {
        match self {
            ObotError::Navigation(_) => "navigation",
            ObotError::Validation(_) => "validation",
            ObotError::Io { .. } => "io",
            ObotError::Backend(_) => "backend",
            ObotError::Parse(_) => "parse",
            ObotError::Cancellation => "cancellation",
            ObotError::Corruption { .. } => "corruption",
        }
    }
}

pub type Result<T> = std::result::Result<T, ObotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_error_carries_rationale() {
        let e = NavigationError { from: 1, to: 3, phase: 3, rationale: "from P1 allowed: {P1, P2}".into() };
        let err: ObotError = e.into();
        assert_eq!(err.kind(), "navigation");
        assert!(err.to_string().contains("from P1 allowed"));
    }

    #[test]
    fn kinds_are_stable_strings() {
        assert_eq!(ObotError::Validation("x".into()).kind(), "validation");
        assert_eq!(ObotError::Cancellation.kind(), "cancellation");
    }
}
