//! Mock platform implementations for testing and development.
//!
//! This module provides simulated sessions, tags and a provider that can
//! be scripted programmatically without requiring an NFC radio.

pub mod provider;
pub mod session;
pub mod tag;

// Re-export commonly used types
pub use provider::MockSessionProvider;
pub use session::{MockNdefSession, MockRawSession, MockSession, MockSessionHandle};
pub use tag::{MockNdefTag, MockNdefTagHandle, MockRawTag};
