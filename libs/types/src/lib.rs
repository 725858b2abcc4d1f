//! Types library for the trade copier relay
//!
//! This library provides the value types shared by the relay engine and the
//! gateway: identifiers, trade actions, signals and the validation taxonomy.
//!
//! # Modules
//! - `ids`: Identifiers (MasterId, SlaveId, SignalId, Ticket)
//! - `signal`: Trade actions, inbound signal requests and queued signals
//! - `errors`: Validation error taxonomy

// Public modules
pub mod errors;
pub mod ids;
pub mod signal;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::*;
    pub use crate::ids::*;
    pub use crate::signal::*;
}
