//! Mode/capability decision table.
//!
//! Once a tag's NDEF capability is known, this pure function selects the
//! branch the session takes. Keeping it free of platform types makes the
//! whole decision surface testable as a table.

use nfctap_core::constants::{MSG_NOT_NDEF_COMPLIANT, MSG_READ_ONLY, MSG_UNKNOWN_STATUS};
use nfctap_core::{SessionMode, TagCapability};

/// Branch selected for a connected NDEF tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Read the tag's NDEF message and decode it.
    Read,

    /// Encode the configured text and write it.
    Write,

    /// Run the lock flow (completion message only, no tag primitive).
    Lock,

    /// Terminate the session without any tag operation.
    Reject(Rejection),
}

/// Terminal rejection reasons from the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Tag does not support NDEF; rejected regardless of mode.
    NotNdefCompliant,

    /// Write requested against a read-only tag.
    ReadOnly,

    /// Capability value unknown to this crate; rejected regardless of
    /// mode.
    UnknownStatus(u8),
}

impl Rejection {
    /// The user-facing status message for this rejection.
    pub fn status_message(&self) -> &'static str {
        match self {
            Rejection::NotNdefCompliant => MSG_NOT_NDEF_COMPLIANT,
            Rejection::ReadOnly => MSG_READ_ONLY,
            Rejection::UnknownStatus(_) => MSG_UNKNOWN_STATUS,
        }
    }
}

/// Select the branch for a session mode and tag capability.
///
/// Unsupported and unrecognized capabilities reject regardless of mode.
/// Lock proceeds for any readable capability; it does not check
/// writability because the flow performs no tag operation.
///
/// # Examples
///
/// ```
/// use nfctap_core::{SessionMode, TagCapability};
/// use nfctap_session::decide::{decide, Decision, Rejection};
///
/// assert_eq!(
///     decide(SessionMode::Write, TagCapability::ReadOnly),
///     Decision::Reject(Rejection::ReadOnly)
/// );
/// assert_eq!(
///     decide(SessionMode::Read, TagCapability::ReadOnly),
///     Decision::Read
/// );
/// ```
pub fn decide(mode: SessionMode, capability: TagCapability) -> Decision {
    match capability {
        TagCapability::NotSupported => Decision::Reject(Rejection::NotNdefCompliant),
        TagCapability::Unrecognized(raw) => Decision::Reject(Rejection::UnknownStatus(raw)),
        TagCapability::ReadOnly | TagCapability::ReadWrite => match mode {
            SessionMode::Read => Decision::Read,
            SessionMode::Lock => Decision::Lock,
            SessionMode::Write => {
                if capability.is_writable() {
                    Decision::Write
                } else {
                    Decision::Reject(Rejection::ReadOnly)
                }
            }
        },
    }
}
