//! Record codec: NDEF message to display text and back.
//!
//! `decode` turns a message read from a tag into the string shown to the
//! user; `encode` turns the configured write text into the single record
//! written to a tag. Both are pure functions of their input, with no
//! platform or clock dependency.

use crate::record::{NdefMessage, NdefRecord};

/// Separator placed between interpreted records in the decoded output.
const RECORD_SEPARATOR: &str = "\n\n";

/// Decode an NDEF message into display text.
///
/// Only well-known records contribute. Each is interpreted as an RTD-URI
/// record first; failing that, as raw UTF-8 text; failing both it is
/// silently dropped. Survivors are joined with a blank line in original
/// record order. An empty string is a valid, non-error result.
///
/// # Examples
///
/// ```
/// use nfctap_ndef::{decode, NdefMessage, NdefRecord};
///
/// let message: NdefMessage =
///     [NdefRecord::text("a"), NdefRecord::text("b")].into_iter().collect();
/// assert_eq!(decode(&message), "a\n\nb");
/// ```
pub fn decode(message: &NdefMessage) -> String {
    message
        .records()
        .iter()
        .filter(|record| record.is_well_known())
        .filter_map(|record| {
            record
                .well_known_uri()
                .or_else(|| record.text_payload().map(str::to_owned))
        })
        .collect::<Vec<_>>()
        .join(RECORD_SEPARATOR)
}

/// Encode write text into the outgoing well-known text record.
///
/// Produces a `"T"` record with an empty identifier and the UTF-8 bytes of
/// `text` as payload. The platform call this maps to can reject text that
/// is not representable as UTF-8; a Rust `&str` is UTF-8 by construction,
/// so that failure mode is unreachable here and the function is infallible.
///
/// # Examples
///
/// ```
/// use nfctap_ndef::{decode, encode, NdefMessage};
///
/// let record = encode("hello");
/// assert_eq!(decode(&NdefMessage::from(record)), "hello");
/// ```
pub fn encode(text: &str) -> NdefRecord {
    NdefRecord::text(text)
}

/// Render bytes as lowercase hex, two digits per byte, no separator.
///
/// Used for the FeliCa IDm identifier outcome.
///
/// # Examples
///
/// ```
/// use nfctap_ndef::hex_lower;
///
/// assert_eq!(hex_lower(&[0x01, 0xAB, 0xFF]), "01abff");
/// ```
pub fn hex_lower(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
