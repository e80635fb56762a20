//! Channel-backed mock sessions.
//!
//! A mock session receives tag-detection events over a bounded channel
//! and records every status message, polling restart and invalidation in
//! a shared log. Tests script detections through the handle and assert
//! on the log afterwards.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;

use nfctap_core::{Error, Result};

use crate::mock::tag::{MockNdefTag, MockRawTag};
use crate::traits::{NdefSession, RawSession, SessionControl};

const DETECTION_CHANNEL_CAPACITY: usize = 8;

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Everything the controller did to a mock session.
#[derive(Debug, Default)]
struct SessionLog {
    status_messages: Vec<String>,
    invalidations: Vec<Option<String>>,
    restart_count: u32,
    restart_error: Option<String>,
}

/// Mock session of either kind, parameterized over the tag type.
///
/// Use the [`MockNdefSession`] and [`MockRawSession`] aliases; the
/// session-kind traits are implemented per tag type.
#[derive(Debug)]
pub struct MockSession<T> {
    detections: mpsc::Receiver<Vec<T>>,
    log: Arc<Mutex<SessionLog>>,
}

/// A record-oriented mock session.
pub type MockNdefSession = MockSession<MockNdefTag>;

/// A raw mock session.
pub type MockRawSession = MockSession<MockRawTag>;

impl<T> MockSession<T> {
    /// Create a session and the handle that scripts it.
    pub fn new() -> (Self, MockSessionHandle<T>) {
        let (detections_tx, detections) = mpsc::channel(DETECTION_CHANNEL_CAPACITY);
        let log = Arc::new(Mutex::new(SessionLog::default()));
        let session = Self {
            detections,
            log: Arc::clone(&log),
        };
        (session, MockSessionHandle { detections_tx, log })
    }
}

impl<T: Send> SessionControl for MockSession<T> {
    async fn restart_polling(&mut self) -> Result<()> {
        let mut log = locked(&self.log);
        if let Some(reason) = &log.restart_error {
            return Err(Error::session_closed(reason.clone()));
        }
        log.restart_count += 1;
        Ok(())
    }

    fn set_status_message(&mut self, message: &str) {
        locked(&self.log).status_messages.push(message.to_string());
    }

    fn invalidate(&mut self, error: Option<&str>) {
        locked(&self.log)
            .invalidations
            .push(error.map(str::to_owned));
    }
}

impl NdefSession for MockNdefSession {
    type Tag = MockNdefTag;

    async fn next_tags(&mut self) -> Result<Vec<MockNdefTag>> {
        self.detections
            .recv()
            .await
            .ok_or_else(|| Error::session_closed("detection channel closed"))
    }
}

impl RawSession for MockRawSession {
    type Tag = MockRawTag;

    async fn next_tags(&mut self) -> Result<Vec<MockRawTag>> {
        self.detections
            .recv()
            .await
            .ok_or_else(|| Error::session_closed("detection channel closed"))
    }
}

/// Handle for scripting a [`MockSession`] and inspecting its log.
///
/// Cloning the handle shares both the detection channel and the log.
#[derive(Debug, Clone)]
pub struct MockSessionHandle<T> {
    detections_tx: mpsc::Sender<Vec<T>>,
    log: Arc<Mutex<SessionLog>>,
}

impl<T> MockSessionHandle<T> {
    /// Queue one tag-detection event.
    ///
    /// # Panics
    ///
    /// Panics if the detection channel is full or the session is gone;
    /// both indicate a broken test script.
    pub fn deliver_tags(&self, tags: Vec<T>) {
        self.detections_tx
            .try_send(tags)
            .expect("mock session should accept detection");
    }

    /// All status messages set on the session, in order.
    pub fn status_messages(&self) -> Vec<String> {
        locked(&self.log).status_messages.clone()
    }

    /// The most recent status message, if any.
    pub fn last_status_message(&self) -> Option<String> {
        locked(&self.log).status_messages.last().cloned()
    }

    /// All invalidations, each with its optional error message.
    pub fn invalidations(&self) -> Vec<Option<String>> {
        locked(&self.log).invalidations.clone()
    }

    /// Number of invalidations.
    pub fn invalidation_count(&self) -> u32 {
        locked(&self.log).invalidations.len() as u32
    }

    /// Number of successful polling restarts.
    pub fn restart_count(&self) -> u32 {
        locked(&self.log).restart_count
    }

    /// Make subsequent polling restarts fail, as when the platform's
    /// session handle is already gone.
    pub fn fail_restart_polling(&self, reason: impl Into<String>) {
        locked(&self.log).restart_error = Some(reason.into());
    }
}
