//! Core error types for grammar and diagram processing
//!
//! Every failure the pipeline itself can produce is a [`RailyardError`].
//! Drawing backends report their own failure kind through
//! [`CanvasProvider::Error`](crate::render::CanvasProvider::Error); those are
//! never wrapped in this type.

use thiserror::Error;

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, RailyardError>;

/// Core error types for grammar and diagram processing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RailyardError {
    #[error("Malformed character set {input:?}: {message}")]
    MalformedCharacterSet { input: String, message: String },

    #[error("Unresolved reference: no production named '{name}'")]
    UnresolvedReference { name: String },

    #[error("Structural invariant violated: {message}")]
    StructuralInvariant { message: String },

    #[error("Duplicate production: '{name}' is already defined")]
    DuplicateProduction { name: String },

    #[error("Invalid option '{key}': {message}")]
    InvalidOption { key: String, message: String },
}

impl RailyardError {
    /// Create a new malformed character set error
    pub fn malformed_charset(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedCharacterSet {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create a new unresolved reference error
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self::UnresolvedReference { name: name.into() }
    }

    /// Create a new structural invariant error
    pub fn structural(message: impl Into<String>) -> Self {
        Self::StructuralInvariant {
            message: message.into(),
        }
    }

    /// Create a new duplicate production error
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateProduction { name: name.into() }
    }

    /// Create a new invalid option error
    pub fn invalid_option(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            key: key.into(),
            message: message.into(),
        }
    }
}
