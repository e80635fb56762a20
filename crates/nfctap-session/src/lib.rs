//! Tag session orchestration for the nfctap scan/write demo core.
//!
//! This crate drives one NFC tag session at a time: it starts a platform
//! session, waits for a tag detection, connects, queries the tag's NDEF
//! capability and performs the selected operation (read, write or lock),
//! then terminates the session with a single stored outcome.
//!
//! # Architecture
//!
//! - [`traits`] defines the platform boundary: a [`SessionProvider`]
//!   hands out sessions, sessions deliver tags, tags expose the radio
//!   primitives. All traits use native `async fn` (Rust 1.90 + Edition
//!   2024 RPITIT) and are exercised through generic dispatch.
//! - [`state`] is the session lifecycle state machine with a bounded
//!   transition history.
//! - [`decide`] maps the configured mode and the queried capability to
//!   the operation (or rejection) for this session.
//! - [`outcome`] stores the one-per-session result and lets observers
//!   watch for it.
//! - [`controller`] ties it all together in [`TagSessionController`].
//! - [`mock`] provides scripted sessions, tags and a provider so the
//!   whole flow runs in tests without an NFC radio.
//!
//! # Example
//!
//! ```
//! use nfctap_core::{SessionMode, TagCapability};
//! use nfctap_ndef::{NdefMessage, NdefRecord};
//! use nfctap_session::TagSessionController;
//! use nfctap_session::mock::{MockNdefSession, MockNdefTag, MockSessionProvider};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> nfctap_core::Result<()> {
//! let (session, handle) = MockNdefSession::new();
//! let (tag, _tag_handle) = MockNdefTag::new(TagCapability::ReadWrite);
//! let tag = tag.with_message(NdefMessage::from(NdefRecord::text("hello")));
//! handle.deliver_tags(vec![tag]);
//!
//! let provider = MockSessionProvider::new().with_ndef_session(session);
//! let mut controller = TagSessionController::new(provider);
//! controller.set_mode(SessionMode::Read);
//!
//! controller.begin_scanning().await?;
//! assert_eq!(controller.outcome_text().as_deref(), Some("hello"));
//! # Ok(())
//! # }
//! ```
//!
//! [`SessionProvider`]: traits::SessionProvider

pub mod controller;
pub mod decide;
pub mod mock;
pub mod outcome;
pub mod state;
pub mod traits;

// Re-export commonly used types for convenience
pub use controller::{SessionConfig, TagSessionController};
pub use decide::{Decision, Rejection, decide};
pub use outcome::{OutcomeCell, OutcomeWatcher};
pub use state::{SessionState, StateMachine, StateTransition};
pub use traits::{NdefSession, NdefTag, RawSession, RawTag, SessionControl, SessionProvider};
