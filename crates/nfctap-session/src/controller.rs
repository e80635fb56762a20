//! Tag session controller.
//!
//! [`TagSessionController`] owns the active session, selects which
//! session protocol to start from the configured [`TagFormat`], drives
//! the detected tag through connect, capability query and the selected
//! operation, and publishes the result through the outcome cell.
//!
//! One scan is one call to [`TagSessionController::begin_scanning`]: the
//! future resolves when the session terminates. Every platform call is an
//! await; the controller never blocks a thread while the radio works.

use std::time::Duration;

use tracing::{debug, info, warn};

use nfctap_core::constants::{
    DEFAULT_MAX_SUBTYPE_RETRIES, DEFAULT_WRITE_TEXT, MSG_CAPABILITY_QUERY_FAILED,
    MSG_CONNECT_FAILED, MSG_LOCK_COMPLETED, MSG_NO_TAG_DETECTED, MSG_READ_COMPLETED,
    MSG_SCAN_PROMPT, MSG_WRITE_FAILED_PREFIX, MSG_WRITE_SUCCESSFUL, MSG_WRONG_SUBTYPE,
    RESTART_POLLING_DELAY,
};
use nfctap_core::{
    Error, PollingOption, Result, SessionId, SessionMode, SessionOutcome, TagFormat,
    TagTechnology,
};
use nfctap_ndef::NdefMessage;

use crate::decide::{Decision, decide};
use crate::outcome::{OutcomeCell, OutcomeWatcher};
use crate::state::{SessionState, StateMachine};
use crate::traits::{NdefSession, NdefTag, RawSession, RawTag, SessionControl, SessionProvider};

/// Caller-selected configuration for the next scan.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// What to do with the next detected tag.
    pub mode: SessionMode,

    /// Which session protocol to start.
    pub format: TagFormat,

    /// Text written in write mode.
    pub write_text: String,

    /// How many polling restarts a FeliCa session tolerates before a
    /// wrong-subtype detection becomes terminal.
    pub max_subtype_retries: u32,

    /// Delay before polling restarts after a wrong-subtype detection.
    pub restart_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: SessionMode::Read,
            format: TagFormat::Ndef,
            write_text: DEFAULT_WRITE_TEXT.to_string(),
            max_subtype_retries: DEFAULT_MAX_SUBTYPE_RETRIES,
            restart_delay: RESTART_POLLING_DELAY,
        }
    }
}

/// Drives one tag session at a time against a [`SessionProvider`].
///
/// # Examples
///
/// ```no_run
/// use nfctap_core::SessionMode;
/// use nfctap_session::TagSessionController;
/// use nfctap_session::mock::MockSessionProvider;
///
/// # async fn example() -> nfctap_core::Result<()> {
/// let provider = MockSessionProvider::new();
/// let mut controller = TagSessionController::new(provider);
/// controller.set_mode(SessionMode::Read);
///
/// controller.begin_scanning().await?;
///
/// if let Some(outcome) = controller.outcome() {
///     println!("{:?}", outcome.kind);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TagSessionController<P: SessionProvider> {
    provider: P,
    config: SessionConfig,
    session_id: SessionId,
    machine: StateMachine,
    outcome: OutcomeCell,
}

impl<P: SessionProvider> TagSessionController<P> {
    /// Create a controller with the default configuration (NDEF read).
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, SessionConfig::default())
    }

    /// Create a controller with an explicit configuration.
    pub fn with_config(provider: P, config: SessionConfig) -> Self {
        Self {
            provider,
            config,
            session_id: SessionId::new(),
            machine: StateMachine::new(),
            outcome: OutcomeCell::new(),
        }
    }

    /// The session mode for the next scan.
    pub fn mode(&self) -> SessionMode {
        self.config.mode
    }

    /// Select the session mode for the next scan.
    pub fn set_mode(&mut self, mode: SessionMode) {
        self.config.mode = mode;
    }

    /// The tag format for the next scan.
    pub fn format(&self) -> TagFormat {
        self.config.format
    }

    /// Select the tag format for the next scan.
    pub fn set_format(&mut self, format: TagFormat) {
        self.config.format = format;
    }

    /// The text written in write mode.
    pub fn write_text(&self) -> &str {
        &self.config.write_text
    }

    /// Set the text written in write mode.
    pub fn set_write_text(&mut self, text: impl Into<String>) {
        self.config.write_text = text.into();
    }

    /// Whether this device can scan at all.
    pub fn scanning_available(&self) -> bool {
        self.provider.scanning_available()
    }

    /// The current session state.
    pub fn state(&self) -> &SessionState {
        self.machine.current_state()
    }

    /// Whether the current session has terminated.
    pub fn is_terminated(&self) -> bool {
        self.machine.current_state().is_terminal()
    }

    /// The stored outcome of the last terminated session, if any.
    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome.get()
    }

    /// The decoded display text of the last session, if it produced one.
    pub fn outcome_text(&self) -> Option<String> {
        self.outcome.get().and_then(|o| o.text().map(str::to_owned))
    }

    /// Subscribe to outcome changes.
    pub fn subscribe(&self) -> OutcomeWatcher {
        self.outcome.subscribe()
    }

    /// Borrow the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutably borrow the underlying provider.
    ///
    /// Useful for re-arming a mock provider between scans.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Record an externally observed session error.
    ///
    /// The platform can invalidate a session on its own (radio timeout,
    /// system interruption). If the session already terminated this is a
    /// no-op: the stored outcome is never overwritten.
    pub fn invalidate_with_error(&mut self, reason: &str) {
        if self.is_terminated() {
            debug!(session_id = %self.session_id, reason, "ignoring invalidation of terminated session");
            return;
        }
        warn!(session_id = %self.session_id, reason, "session invalidated externally");
        self.outcome.set_once(SessionOutcome::failure(reason));
        self.machine.terminate();
    }

    /// Run one scan session to termination.
    ///
    /// Starts the session selected by the configured [`TagFormat`],
    /// drives it through detection, connection and the mode branch, and
    /// stores the outcome. Any state left over from a previous scan is
    /// invalidated first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScanningUnavailable`] if the device has no usable
    /// radio, or an error from the provider if no session can be started.
    /// Session-level failures do not surface here; they terminate the
    /// session with a failure outcome.
    pub async fn begin_scanning(&mut self) -> Result<()> {
        if !self.provider.scanning_available() {
            warn!("NFC scanning is not available on this device");
            return Err(Error::ScanningUnavailable);
        }

        // A new scan invalidates whatever the previous one left behind.
        self.session_id = SessionId::new();
        self.machine.reset();
        self.outcome.clear();
        self.machine.transition_to(SessionState::Polling)?;

        info!(
            session_id = %self.session_id,
            mode = %self.config.mode,
            format = %self.config.format,
            "scan started"
        );

        match self.config.format {
            TagFormat::Ndef => self.run_ndef_session().await,
            TagFormat::FeliCa => self.run_raw_session().await,
        }
    }

    async fn run_ndef_session(&mut self) -> Result<()> {
        let mut session = self.provider.start_ndef_session().await?;
        session.set_status_message(MSG_SCAN_PROMPT);

        loop {
            let tags = match session.next_tags().await {
                Ok(tags) => tags,
                Err(error) => {
                    self.fail(&mut session, &error.to_string());
                    return Ok(());
                }
            };

            // More than one tag in the field: abort this detection
            // silently and keep the session pending.
            if tags.len() > 1 {
                debug!(
                    session_id = %self.session_id,
                    count = tags.len(),
                    "multiple tags detected, ignoring detection"
                );
                continue;
            }

            let Some(mut tag) = tags.into_iter().next() else {
                self.fail(&mut session, MSG_NO_TAG_DETECTED);
                return Ok(());
            };

            self.machine.transition_to(SessionState::Connected)?;
            if let Err(error) = tag.connect().await {
                debug!(session_id = %self.session_id, %error, "connect failed");
                self.fail(&mut session, MSG_CONNECT_FAILED);
                return Ok(());
            }

            self.machine.transition_to(SessionState::Deciding)?;
            let capability = match tag.query_capability().await {
                Ok(capability) => capability,
                Err(error) => {
                    debug!(session_id = %self.session_id, %error, "capability query failed");
                    self.fail(&mut session, MSG_CAPABILITY_QUERY_FAILED);
                    return Ok(());
                }
            };
            debug!(session_id = %self.session_id, %capability, "capability queried");

            match decide(self.config.mode, capability) {
                Decision::Read => {
                    self.machine.transition_to(SessionState::Reading)?;
                    match tag.read_message().await {
                        Ok(message) => {
                            let text = nfctap_ndef::decode(&message);
                            self.succeed(
                                &mut session,
                                MSG_READ_COMPLETED,
                                SessionOutcome::content(text),
                            );
                        }
                        Err(error) => self.fail(&mut session, &error.to_string()),
                    }
                }
                Decision::Write => {
                    self.machine.transition_to(SessionState::Writing)?;
                    let message = NdefMessage::from(nfctap_ndef::encode(&self.config.write_text));
                    match tag.write_message(&message).await {
                        Ok(()) => {
                            self.succeed(
                                &mut session,
                                MSG_WRITE_SUCCESSFUL,
                                SessionOutcome::completion(MSG_WRITE_SUCCESSFUL),
                            );
                        }
                        Err(error) => {
                            // WriteFailed already renders with the prefix.
                            let reason = match error {
                                Error::WriteFailed { reason } => reason,
                                other => other.to_string(),
                            };
                            self.fail(
                                &mut session,
                                &format!("{}{}", MSG_WRITE_FAILED_PREFIX, reason),
                            );
                        }
                    }
                }
                Decision::Lock => {
                    self.machine.transition_to(SessionState::Locking)?;
                    // No lock primitive exists in this flow; it only
                    // reports completion.
                    self.succeed(
                        &mut session,
                        MSG_LOCK_COMPLETED,
                        SessionOutcome::completion(MSG_LOCK_COMPLETED),
                    );
                }
                Decision::Reject(rejection) => {
                    debug!(session_id = %self.session_id, ?rejection, "session rejected");
                    self.fail(&mut session, rejection.status_message());
                }
            }
            return Ok(());
        }
    }

    async fn run_raw_session(&mut self) -> Result<()> {
        let mut session = self.provider.start_raw_session(PollingOption::Iso18092).await?;
        session.set_status_message(MSG_SCAN_PROMPT);

        let mut wrong_subtype_attempts: u32 = 0;
        loop {
            let tags = match session.next_tags().await {
                Ok(tags) => tags,
                Err(error) => {
                    self.fail(&mut session, &error.to_string());
                    return Ok(());
                }
            };

            // Only the first detected tag is used; extras are ignored.
            let Some(mut tag) = tags.into_iter().next() else {
                self.fail(&mut session, MSG_NO_TAG_DETECTED);
                return Ok(());
            };

            self.machine.transition_to(SessionState::Connected)?;
            if let Err(error) = tag.connect().await {
                debug!(session_id = %self.session_id, %error, "connect failed");
                self.fail(&mut session, MSG_CONNECT_FAILED);
                return Ok(());
            }

            if tag.technology() != TagTechnology::FeliCa {
                wrong_subtype_attempts += 1;
                warn!(
                    session_id = %self.session_id,
                    technology = %tag.technology(),
                    attempt = wrong_subtype_attempts,
                    "wrong tag subtype detected"
                );

                if wrong_subtype_attempts > self.config.max_subtype_retries {
                    self.fail(&mut session, MSG_WRONG_SUBTYPE);
                    return Ok(());
                }

                session.set_status_message(MSG_WRONG_SUBTYPE);
                tokio::time::sleep(self.config.restart_delay).await;
                if let Err(error) = session.restart_polling().await {
                    debug!(session_id = %self.session_id, %error, "polling restart failed");
                    self.fail(&mut session, &error.to_string());
                    return Ok(());
                }
                self.machine.transition_to(SessionState::Polling)?;
                continue;
            }

            self.machine.transition_to(SessionState::Reading)?;
            let idm = nfctap_ndef::hex_lower(tag.identifier());
            self.succeed(&mut session, MSG_READ_COMPLETED, SessionOutcome::content(idm));
            return Ok(());
        }
    }

    /// Terminate with a success outcome. No-op if already terminated.
    fn succeed<S: SessionControl>(&mut self, session: &mut S, status: &str, outcome: SessionOutcome) {
        if self.is_terminated() {
            return;
        }
        session.set_status_message(status);
        session.invalidate(None);
        self.outcome.set_once(outcome);
        self.machine.terminate();
        info!(session_id = %self.session_id, status, "session terminated");
    }

    /// Terminate with a failure outcome. No-op if already terminated.
    fn fail<S: SessionControl>(&mut self, session: &mut S, reason: &str) {
        if self.is_terminated() {
            return;
        }
        session.invalidate(Some(reason));
        self.outcome.set_once(SessionOutcome::failure(reason));
        self.machine.terminate();
        warn!(session_id = %self.session_id, reason, "session terminated with failure");
    }
}
