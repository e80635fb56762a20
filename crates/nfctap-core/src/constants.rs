//! Core constants for the NFC tag session flow.
//!
//! This module centralizes every user-facing status message and every
//! timing/retry knob used by the session controller. The status strings are
//! the session's only error surface: terminal failures are never propagated
//! to the caller as errors, only rendered as one of these messages in the
//! session outcome.
//!
//! # Usage
//!
//! ```
//! use nfctap_core::constants::*;
//! use std::time::Duration;
//!
//! assert_eq!(MSG_READ_COMPLETED, "The tag reading has been completed.");
//! let delay = RESTART_POLLING_DELAY;
//! assert_eq!(delay, Duration::from_millis(500));
//! ```

use std::time::Duration;

/// Prompt shown while the session is polling for a tag.
pub const MSG_SCAN_PROMPT: &str = "Hold your device near the NFC tag.";

/// Status message for a completed read, for both NDEF and FeliCa sessions.
pub const MSG_READ_COMPLETED: &str = "The tag reading has been completed.";

/// Status message when the logical connection to a detected tag fails.
pub const MSG_CONNECT_FAILED: &str = "Unable to connect to tag.";

/// Status message when the NDEF capability query fails.
pub const MSG_CAPABILITY_QUERY_FAILED: &str = "Unable to query the NDEF status of tag.";

/// Status message for a tag without NDEF support.
pub const MSG_NOT_NDEF_COMPLIANT: &str = "Tag is not NDEF compliant.";

/// Status message when a write is requested against a read-only tag.
pub const MSG_READ_ONLY: &str = "Tag is read only.";

/// Status message for a successful NDEF write.
pub const MSG_WRITE_SUCCESSFUL: &str = "Write NDEF message successful.";

/// Prefix for a failed NDEF write; the platform error is appended.
pub const MSG_WRITE_FAILED_PREFIX: &str = "Write NDEF message fail: ";

/// Status message for a completed lock flow.
pub const MSG_LOCK_COMPLETED: &str = "The tag locking has been completed.";

/// Status message for a capability value this crate does not recognize.
pub const MSG_UNKNOWN_STATUS: &str = "Unknown NDEF tag status.";

/// Retry prompt shown when a non-FeliCa tag is detected in FeliCa mode.
pub const MSG_WRONG_SUBTYPE: &str =
    "A tag that is not FeliCa is detected, please try again with tag FeliCa.";

/// Status message when a detection event arrives with no tags.
pub const MSG_NO_TAG_DETECTED: &str = "No tag detected.";

/// Delay before polling is restarted after a wrong-subtype detection.
pub const RESTART_POLLING_DELAY: Duration = Duration::from_millis(500);

/// Default bound on consecutive wrong-subtype detections.
///
/// Bounded so a session cannot spin forever against the wrong tag.
pub const DEFAULT_MAX_SUBTYPE_RETRIES: u32 = 3;

/// Default text written in write mode when the caller sets none.
pub const DEFAULT_WRITE_TEXT: &str = "nfctap test message";
