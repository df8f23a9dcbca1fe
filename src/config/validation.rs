//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, host non-empty)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FixtureConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::FixtureConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Check a deserialized configuration for values the server cannot run with.
pub fn validate_config(config: &FixtureConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "listener.host" });
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::Zero { field: "listener.max_connections" });
    }
    if config.handshake.max_head_bytes == 0 {
        errors.push(ValidationError::Zero { field: "handshake.max_head_bytes" });
    }
    if config.handshake.fallback_host.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "handshake.fallback_host" });
    }
    if config.session.max_message_bytes == 0 {
        errors.push(ValidationError::Zero { field: "session.max_message_bytes" });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
