//! Error types for NFC session and codec operations.
//!
//! All terminal session errors are eventually rendered as a human-readable
//! status string in the session outcome; the caller never observes them as
//! propagated exceptions. The only recoverable error is [`Error::WrongTagSubtype`],
//! which triggers a bounded polling restart.

use crate::types::TagTechnology;

/// Result type alias for nfctap operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during tag sessions and record handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Logical connection to the detected tag could not be established.
    #[error("Unable to connect to tag: {reason}")]
    ConnectionFailed { reason: String },

    /// The NDEF capability of the tag could not be queried.
    #[error("Unable to query the NDEF status of tag: {reason}")]
    CapabilityQueryFailed { reason: String },

    /// The tag does not support NDEF at all.
    #[error("Tag is not NDEF compliant")]
    UnsupportedTag,

    /// A write was requested against a read-only tag.
    #[error("Tag is read only")]
    ReadOnlyViolation,

    /// The NDEF message could not be read from the tag.
    #[error("Tag read failed: {reason}")]
    ReadFailed { reason: String },

    /// The NDEF message could not be written to the tag.
    #[error("Write NDEF message fail: {reason}")]
    WriteFailed { reason: String },

    /// A raw-format detection returned a tag of the wrong physical subtype.
    ///
    /// Recoverable: the controller restarts polling after a fixed delay.
    #[error("Wrong tag subtype detected: {technology}")]
    WrongTagSubtype { technology: TagTechnology },

    /// The platform reported a capability value this crate does not know.
    #[error("Unknown NDEF tag status: {0}")]
    UnknownCapability(u8),

    /// Too many consecutive wrong-subtype detections.
    #[error("Retry limit exceeded after {attempts} wrong-subtype detections")]
    RetryLimitExceeded { attempts: u32 },

    /// A detection event arrived with no tags in it.
    #[error("No tag detected")]
    NoTagDetected,

    /// A read produced a message with no records.
    #[error("Empty NDEF message")]
    EmptyMessage,

    /// A record failed structural validation.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// The state machine rejected a transition.
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    /// The underlying session handle is gone (channel closed, radio reset).
    #[error("Session closed: {0}")]
    SessionClosed(String),

    /// The device has no usable NFC radio.
    #[error("NFC scanning is not available on this device")]
    ScanningUnavailable,

    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a connection failure error.
    pub fn connection_failed(reason: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            reason: reason.into(),
        }
    }

    /// Create a capability-query failure error.
    pub fn capability_query_failed(reason: impl Into<String>) -> Self {
        Self::CapabilityQueryFailed {
            reason: reason.into(),
        }
    }

    /// Create a read failure error.
    pub fn read_failed(reason: impl Into<String>) -> Self {
        Self::ReadFailed {
            reason: reason.into(),
        }
    }

    /// Create a write failure error.
    pub fn write_failed(reason: impl Into<String>) -> Self {
        Self::WriteFailed {
            reason: reason.into(),
        }
    }

    /// Create a wrong-subtype error for the given detected technology.
    pub fn wrong_subtype(technology: TagTechnology) -> Self {
        Self::WrongTagSubtype { technology }
    }

    /// Create an invalid-record error.
    pub fn invalid_record(reason: impl Into<String>) -> Self {
        Self::InvalidRecord(reason.into())
    }

    /// Create a session-closed error.
    pub fn session_closed(reason: impl Into<String>) -> Self {
        Self::SessionClosed(reason.into())
    }

    /// Whether the session may continue after this error.
    ///
    /// Only wrong-subtype detections are recoverable; everything else
    /// terminates the current session.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::WrongTagSubtype { .. })
    }
}
