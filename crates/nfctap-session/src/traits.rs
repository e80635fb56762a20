//! Platform session trait definitions.
//!
//! These traits are the boundary between the session controller and the
//! platform's near-field radio service. The controller only ever talks to
//! a [`SessionProvider`] and the sessions and tags it hands out, so the
//! whole flow runs against mock implementations without any radio
//! hardware.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024
//! RPITIT), eliminating the need for the `async_trait` macro. They are
//! not object-safe; use generic type parameters for dispatch.

#![allow(async_fn_in_trait)]

use nfctap_core::{PollingOption, Result, TagCapability, TagTechnology};
use nfctap_ndef::NdefMessage;

/// An NDEF-capable tag detected by a record session.
///
/// Every method is a suspension point: the platform performs the radio
/// exchange in the background and completes the future when it finishes.
/// Methods must only be called after [`connect`](NdefTag::connect) has
/// succeeded, except `connect` itself.
pub trait NdefTag: Send {
    /// Establish a logical connection to the tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag has left the field or the radio
    /// exchange fails.
    async fn connect(&mut self) -> Result<()>;

    /// Query the tag's NDEF capability.
    ///
    /// # Errors
    ///
    /// Returns an error if the status exchange fails; the session then
    /// terminates with the capability-query failure message.
    async fn query_capability(&mut self) -> Result<TagCapability>;

    /// Read the tag's NDEF message.
    ///
    /// # Errors
    ///
    /// Returns an error if the read exchange fails.
    async fn read_message(&mut self) -> Result<NdefMessage>;

    /// Write an NDEF message to the tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag rejects the write or the exchange
    /// fails; the error text is surfaced in the write-failure outcome.
    async fn write_message(&mut self, message: &NdefMessage) -> Result<()>;
}

/// A raw tag detected by a technology-restricted session.
pub trait RawTag: Send {
    /// Establish a logical connection to the tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag has left the field or the radio
    /// exchange fails.
    async fn connect(&mut self) -> Result<()>;

    /// The physical subtype the platform identified.
    fn technology(&self) -> TagTechnology;

    /// The fixed-format tag identifier (the IDm for FeliCa tags).
    fn identifier(&self) -> &[u8];
}

/// Session control operations shared by both session kinds.
pub trait SessionControl: Send {
    /// Restart the radio polling phase.
    ///
    /// Used after a wrong-subtype detection so the user can retry with a
    /// different tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the session handle is already gone.
    async fn restart_polling(&mut self) -> Result<()>;

    /// Update the user-visible status message for this session.
    fn set_status_message(&mut self, message: &str);

    /// Invalidate the session, optionally with an error message.
    ///
    /// Implementations must tolerate repeat calls; the controller
    /// guarantees it records an outcome only once, but the platform may
    /// deliver its own invalidation callback as well.
    fn invalidate(&mut self, error: Option<&str>);
}

/// A record-oriented (NDEF) reader session.
pub trait NdefSession: SessionControl {
    /// The tag type this session detects.
    type Tag: NdefTag;

    /// Wait for the next tag-detection event.
    ///
    /// The platform delivers exactly one detection per polling cycle; the
    /// returned vector holds every tag seen simultaneously in that cycle.
    ///
    /// # Errors
    ///
    /// Returns an error if the session handle is invalidated or lost
    /// while polling.
    async fn next_tags(&mut self) -> Result<Vec<Self::Tag>>;
}

/// A raw tag-oriented reader session restricted to one polling technology.
pub trait RawSession: SessionControl {
    /// The tag type this session detects.
    type Tag: RawTag;

    /// Wait for the next tag-detection event.
    ///
    /// # Errors
    ///
    /// Returns an error if the session handle is invalidated or lost
    /// while polling.
    async fn next_tags(&mut self) -> Result<Vec<Self::Tag>>;
}

/// The platform's near-field radio service.
///
/// At most one session of each kind is active at a time; starting a new
/// scan drops any stale handle before a fresh one is created.
pub trait SessionProvider: Send {
    /// Record-oriented session type.
    type NdefSession: NdefSession;

    /// Raw session type.
    type RawSession: RawSession;

    /// Whether this device has a usable NFC radio.
    fn scanning_available(&self) -> bool;

    /// Start a record-oriented (NDEF) session.
    ///
    /// # Errors
    ///
    /// Returns an error if the radio cannot start a session.
    async fn start_ndef_session(&mut self) -> Result<Self::NdefSession>;

    /// Start a raw session restricted to the given polling technology.
    ///
    /// # Errors
    ///
    /// Returns an error if the radio cannot start a session.
    async fn start_raw_session(&mut self, polling: PollingOption) -> Result<Self::RawSession>;
}
