//! Error types for the relay
//!
//! Validation failures are the only errors a caller can cause. They are always
//! detected before any state is touched.

use crate::signal::Action;
use thiserror::Error;

/// Rejection of a malformed request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Missing symbol for action {0}")]
    MissingSymbol(Action),
}
