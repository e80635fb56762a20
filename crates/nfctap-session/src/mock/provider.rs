//! Mock session provider.

use nfctap_core::{Error, PollingOption, Result};

use crate::mock::session::{MockNdefSession, MockRawSession};
use crate::traits::SessionProvider;

/// Mock [`SessionProvider`] holding at most one pre-built session of each
/// kind.
///
/// Each start call hands out the stored session; a second start without
/// re-arming the provider fails with [`Error::SessionClosed`], mirroring
/// a radio that refuses to open a second concurrent session.
#[derive(Debug, Default)]
pub struct MockSessionProvider {
    available: bool,
    ndef: Option<MockNdefSession>,
    raw: Option<MockRawSession>,
    requested_polling: Option<PollingOption>,
}

impl MockSessionProvider {
    /// Create an available provider with no sessions armed.
    pub fn new() -> Self {
        Self {
            available: true,
            ..Self::default()
        }
    }

    /// Create a provider that reports scanning as unavailable.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Arm the provider with an NDEF session.
    pub fn with_ndef_session(mut self, session: MockNdefSession) -> Self {
        self.ndef = Some(session);
        self
    }

    /// Arm the provider with a raw session.
    pub fn with_raw_session(mut self, session: MockRawSession) -> Self {
        self.raw = Some(session);
        self
    }

    /// Re-arm the provider with a fresh NDEF session.
    pub fn set_ndef_session(&mut self, session: MockNdefSession) {
        self.ndef = Some(session);
    }

    /// Re-arm the provider with a fresh raw session.
    pub fn set_raw_session(&mut self, session: MockRawSession) {
        self.raw = Some(session);
    }

    /// The polling option of the last raw session start, if any.
    pub fn requested_polling(&self) -> Option<PollingOption> {
        self.requested_polling
    }
}

impl SessionProvider for MockSessionProvider {
    type NdefSession = MockNdefSession;
    type RawSession = MockRawSession;

    fn scanning_available(&self) -> bool {
        self.available
    }

    async fn start_ndef_session(&mut self) -> Result<Self::NdefSession> {
        self.ndef
            .take()
            .ok_or_else(|| Error::session_closed("no NDEF session armed"))
    }

    async fn start_raw_session(&mut self, polling: PollingOption) -> Result<Self::RawSession> {
        self.requested_polling = Some(polling);
        self.raw
            .take()
            .ok_or_else(|| Error::session_closed("no raw session armed"))
    }
}
