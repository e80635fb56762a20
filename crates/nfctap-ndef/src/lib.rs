//! NDEF (NFC Data Exchange Format) record model and codec.
//!
//! This crate is the pure, I/O-free half of the nfctap workspace: it
//! models NDEF records and messages as the platform delivers them and
//! converts between them and display text.
//!
//! # Decode
//!
//! [`decode`] filters a message to its well-known records, interprets each
//! as an RTD-URI record first and as raw UTF-8 text second, drops records
//! that match neither, and joins the survivors with a blank line:
//!
//! ```
//! use nfctap_ndef::{decode, NdefMessage, NdefRecord};
//!
//! let message: NdefMessage = [
//!     NdefRecord::uri("https://example.com"),
//!     NdefRecord::text("hello"),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(decode(&message), "https://example.com\n\nhello");
//! ```
//!
//! # Encode
//!
//! [`encode`] builds the single outgoing well-known `"T"` record for a
//! write:
//!
//! ```
//! use nfctap_ndef::{decode, encode, NdefMessage};
//!
//! let record = encode("hello");
//! assert_eq!(decode(&NdefMessage::from(record)), "hello");
//! ```

pub mod codec;
pub mod record;
mod uri;

pub use codec::{decode, encode, hex_lower};
pub use record::{NdefMessage, NdefRecord, RTD_TEXT, RTD_URI, TypeNameFormat};
