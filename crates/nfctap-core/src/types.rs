//! Shared types for the NFC tag session flow.
//!
//! These types model the caller-selected session configuration, the
//! per-tag capability reported by the platform at runtime, and the final
//! session outcome consumed by the presentation layer.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the caller wants to do with the next detected tag.
///
/// Selected before scanning begins; determines the branch taken once the
/// tag capability is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Read the tag's NDEF message and decode it to display text.
    Read,

    /// Encode the configured text and write it to the tag.
    Write,

    /// Lock flow. Currently produces a completion message only and invokes
    /// no lock primitive on the tag.
    Lock,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self {
            SessionMode::Read => "read",
            SessionMode::Write => "write",
            SessionMode::Lock => "lock",
        };
        write!(f, "{}", mode)
    }
}

/// Which underlying session protocol to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagFormat {
    /// Standard NDEF record session. Supports read, write and lock modes.
    Ndef,

    /// Raw tag session restricted to ISO 18092 polling, reading the FeliCa
    /// IDm identifier. Supports identifier read only.
    FeliCa,
}

impl fmt::Display for TagFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = match self {
            TagFormat::Ndef => "ndef",
            TagFormat::FeliCa => "felica",
        };
        write!(f, "{}", format)
    }
}

/// NDEF capability of a detected tag, queried per-tag at runtime.
///
/// Gates whether a write is permitted. `Unrecognized` carries the raw
/// platform value for capability states introduced after this crate was
/// written; the session terminates with an unknown-status message rather
/// than guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCapability {
    /// Tag does not support NDEF.
    NotSupported,

    /// NDEF message can be read but not written.
    ReadOnly,

    /// NDEF message can be read and written.
    ReadWrite,

    /// Forward-compatibility catch-all for unknown platform values.
    Unrecognized(u8),
}

impl TagCapability {
    /// Map a raw platform status value to a capability.
    ///
    /// # Examples
    ///
    /// ```
    /// use nfctap_core::TagCapability;
    ///
    /// assert_eq!(TagCapability::from_raw(1), TagCapability::NotSupported);
    /// assert_eq!(TagCapability::from_raw(2), TagCapability::ReadWrite);
    /// assert_eq!(TagCapability::from_raw(3), TagCapability::ReadOnly);
    /// assert_eq!(TagCapability::from_raw(9), TagCapability::Unrecognized(9));
    /// ```
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::NotSupported,
            2 => Self::ReadWrite,
            3 => Self::ReadOnly,
            other => Self::Unrecognized(other),
        }
    }

    /// Whether the tag's NDEF message can be read at all.
    pub fn is_readable(&self) -> bool {
        matches!(self, Self::ReadOnly | Self::ReadWrite)
    }

    /// Whether the tag's NDEF message can be written.
    pub fn is_writable(&self) -> bool {
        matches!(self, Self::ReadWrite)
    }
}

impl fmt::Display for TagCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagCapability::NotSupported => write!(f, "not_supported"),
            TagCapability::ReadOnly => write!(f, "read_only"),
            TagCapability::ReadWrite => write!(f, "read_write"),
            TagCapability::Unrecognized(raw) => write!(f, "unrecognized({})", raw),
        }
    }
}

/// Physical subtype of a tag detected by a raw session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum TagTechnology {
    /// FeliCa (ISO 18092) tag exposing an IDm identifier.
    FeliCa,

    /// MiFare family (ISO 14443-A).
    MiFare,

    /// ISO 15693 vicinity tag.
    Iso15693,

    /// ISO 7816 smart card.
    Iso7816,
}

impl fmt::Display for TagTechnology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tech = match self {
            TagTechnology::FeliCa => "felica",
            TagTechnology::MiFare => "mifare",
            TagTechnology::Iso15693 => "iso15693",
            TagTechnology::Iso7816 => "iso7816",
        };
        write!(f, "{}", tech)
    }
}

/// Radio polling technology a raw session is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum PollingOption {
    /// ISO 18092, used by FeliCa tags.
    Iso18092,

    /// ISO 14443-A/B proximity tags.
    Iso14443,

    /// ISO 15693 vicinity tags.
    Iso15693,
}

/// Unique identifier for one scan session, used for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh session id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a terminated session produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Decoded display text: NDEF record content or a FeliCa IDm in
    /// lowercase hex.
    Content(String),

    /// Status-only success: the operation completed without producing
    /// any tag content (write and lock flows).
    Completion(String),

    /// Human-readable failure reason.
    Failure(String),
}

/// Result of a terminated session.
///
/// Created exactly once at session termination, consumed by the
/// presentation layer, and discarded after display. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    /// Decoded content or failure reason.
    pub kind: OutcomeKind,

    /// When the session terminated.
    pub recorded_at: DateTime<Utc>,
}

impl SessionOutcome {
    /// Create a content outcome with the current timestamp.
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Content(text.into()),
            recorded_at: Utc::now(),
        }
    }

    /// Create a status-only completion outcome with the current timestamp.
    pub fn completion(message: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Completion(message.into()),
            recorded_at: Utc::now(),
        }
    }

    /// Create a failure outcome with the current timestamp.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Failure(reason.into()),
            recorded_at: Utc::now(),
        }
    }

    /// The decoded tag content, if this is a content outcome.
    ///
    /// Completion statuses are not tag content and return `None`.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            OutcomeKind::Content(text) => Some(text),
            OutcomeKind::Completion(_) | OutcomeKind::Failure(_) => None,
        }
    }

    /// The completion status, if this is a status-only success outcome.
    pub fn completion_message(&self) -> Option<&str> {
        match &self.kind {
            OutcomeKind::Completion(message) => Some(message),
            OutcomeKind::Content(_) | OutcomeKind::Failure(_) => None,
        }
    }

    /// The failure reason, if this is a failure outcome.
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.kind {
            OutcomeKind::Failure(reason) => Some(reason),
            OutcomeKind::Content(_) | OutcomeKind::Completion(_) => None,
        }
    }

    /// Whether this outcome is a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self.kind, OutcomeKind::Failure(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, TagCapability::NotSupported)]
    #[case(2, TagCapability::ReadWrite)]
    #[case(3, TagCapability::ReadOnly)]
    #[case(0, TagCapability::Unrecognized(0))]
    #[case(42, TagCapability::Unrecognized(42))]
    fn test_capability_from_raw(#[case] raw: u8, #[case] expected: TagCapability) {
        assert_eq!(TagCapability::from_raw(raw), expected);
    }

    #[test]
    fn test_capability_predicates() {
        assert!(TagCapability::ReadOnly.is_readable());
        assert!(TagCapability::ReadWrite.is_readable());
        assert!(!TagCapability::NotSupported.is_readable());
        assert!(!TagCapability::Unrecognized(9).is_readable());

        assert!(TagCapability::ReadWrite.is_writable());
        assert!(!TagCapability::ReadOnly.is_writable());
    }

    #[test]
    fn test_session_mode_serialization() {
        let mode = SessionMode::Write;
        let json = serde_json::to_string(&mode).unwrap();
        assert_eq!(json, "\"write\"");

        let deserialized: SessionMode = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, mode);
    }

    #[test]
    fn test_outcome_content_accessors() {
        let outcome = SessionOutcome::content("hello");
        assert_eq!(outcome.text(), Some("hello"));
        assert!(!outcome.is_failure());
    }

    #[test]
    fn test_outcome_completion_accessors() {
        let outcome = SessionOutcome::completion("Write NDEF message successful.");
        assert_eq!(
            outcome.completion_message(),
            Some("Write NDEF message successful.")
        );
        // A completion status is not tag content.
        assert_eq!(outcome.text(), None);
        assert!(!outcome.is_failure());
    }

    #[test]
    fn test_outcome_failure_accessors() {
        let outcome = SessionOutcome::failure("Tag is read only.");
        assert_eq!(outcome.text(), None);
        assert_eq!(outcome.completion_message(), None);
        assert!(outcome.is_failure());
    }

    #[test]
    fn test_session_id_uniqueness() {
        let a = SessionId::new();
        let b = SessionId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(SessionMode::Lock.to_string(), "lock");
        assert_eq!(TagFormat::FeliCa.to_string(), "felica");
        assert_eq!(TagTechnology::MiFare.to_string(), "mifare");
        assert_eq!(TagCapability::Unrecognized(7).to_string(), "unrecognized(7)");
    }
}
