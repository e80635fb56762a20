//! Core types for the nfctap NFC tag session library.
//!
//! This crate holds the shared vocabulary of the workspace: the
//! caller-facing session configuration ([`SessionMode`], [`TagFormat`]),
//! the per-tag runtime capability ([`TagCapability`]), the session
//! outcome ([`SessionOutcome`]), the error taxonomy ([`Error`]) and the
//! status-message constants.
//!
//! Higher layers build on these:
//! - `nfctap-ndef` implements the NDEF record model and codec.
//! - `nfctap-session` implements the tag-session state machine and the
//!   platform session abstractions.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
