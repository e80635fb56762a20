//! NDEF record and message model.
//!
//! Records are immutable once constructed, mirroring how the platform
//! hands them over per detected tag. Only well-known URI and text records
//! are interpreted by the codec; everything else is carried opaquely.

use serde::{Deserialize, Serialize};

use crate::uri;

/// Well-known record type marker for text records.
pub const RTD_TEXT: &[u8] = b"T";

/// Well-known record type marker for URI records.
pub const RTD_URI: &[u8] = b"U";

/// NDEF Type Name Format values.
///
/// The wire encoding reserves three bits for the TNF; all eight values the
/// platform can report are modeled even though the codec only interprets
/// `WellKnown` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeNameFormat {
    /// Empty record with no type or payload.
    Empty,

    /// NFC Forum well-known type (RTD).
    WellKnown,

    /// Media type per RFC 2046.
    Media,

    /// Absolute URI per RFC 3986.
    AbsoluteUri,

    /// NFC Forum external type.
    External,

    /// Unknown payload type.
    Unknown,

    /// Chunked payload continuation.
    Unchanged,
}

impl TypeNameFormat {
    /// Map a raw 3-bit TNF value.
    ///
    /// Values outside the defined range map to `Unknown`.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0x00 => Self::Empty,
            0x01 => Self::WellKnown,
            0x02 => Self::Media,
            0x03 => Self::AbsoluteUri,
            0x04 => Self::External,
            0x06 => Self::Unchanged,
            _ => Self::Unknown,
        }
    }

    /// The raw 3-bit TNF value.
    pub fn as_raw(&self) -> u8 {
        match self {
            Self::Empty => 0x00,
            Self::WellKnown => 0x01,
            Self::Media => 0x02,
            Self::AbsoluteUri => 0x03,
            Self::External => 0x04,
            Self::Unknown => 0x05,
            Self::Unchanged => 0x06,
        }
    }
}

/// A single NDEF record as supplied by the platform.
///
/// # Examples
///
/// ```
/// use nfctap_ndef::NdefRecord;
///
/// let record = NdefRecord::text("hello");
/// assert!(record.is_well_known());
/// assert_eq!(record.payload(), b"hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NdefRecord {
    type_name_format: TypeNameFormat,
    record_type: Vec<u8>,
    identifier: Vec<u8>,
    payload: Vec<u8>,
}

impl NdefRecord {
    /// Create a record from its raw parts.
    pub fn new(
        type_name_format: TypeNameFormat,
        record_type: impl Into<Vec<u8>>,
        identifier: impl Into<Vec<u8>>,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            type_name_format,
            record_type: record_type.into(),
            identifier: identifier.into(),
            payload: payload.into(),
        }
    }

    /// Create a well-known text record.
    ///
    /// Type tag `"T"`, empty identifier, payload set to the UTF-8 bytes of
    /// `text` with no language-code header. This is the exact shape the
    /// write flow puts on a tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use nfctap_ndef::NdefRecord;
    ///
    /// let record = NdefRecord::text("hello");
    /// assert_eq!(record.text_payload(), Some("hello"));
    /// ```
    pub fn text(text: &str) -> Self {
        Self::new(TypeNameFormat::WellKnown, RTD_TEXT, Vec::new(), text.as_bytes())
    }

    /// Create a well-known URI record with the best-match RTD-URI prefix
    /// abbreviation.
    ///
    /// # Examples
    ///
    /// ```
    /// use nfctap_ndef::NdefRecord;
    ///
    /// let record = NdefRecord::uri("https://example.com");
    /// assert_eq!(record.well_known_uri().as_deref(), Some("https://example.com"));
    /// ```
    pub fn uri(uri_str: &str) -> Self {
        let (code, rest) = uri::abbreviate(uri_str);
        let mut payload = Vec::with_capacity(1 + rest.len());
        payload.push(code);
        payload.extend_from_slice(rest.as_bytes());
        Self::new(TypeNameFormat::WellKnown, RTD_URI, Vec::new(), payload)
    }

    /// The record's type name format.
    pub fn type_name_format(&self) -> TypeNameFormat {
        self.type_name_format
    }

    /// The record type field (e.g. `b"T"`, `b"U"`).
    pub fn record_type(&self) -> &[u8] {
        &self.record_type
    }

    /// The record identifier field.
    pub fn identifier(&self) -> &[u8] {
        &self.identifier
    }

    /// The raw payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Whether this is an NFC Forum well-known record.
    pub fn is_well_known(&self) -> bool {
        self.type_name_format == TypeNameFormat::WellKnown
    }

    /// Interpret this record as an RTD-URI record.
    ///
    /// Returns the full URI string for a well-known `"U"` record with a
    /// decodable payload, `None` otherwise.
    pub fn well_known_uri(&self) -> Option<String> {
        if !self.is_well_known() || self.record_type != RTD_URI {
            return None;
        }
        uri::decode_payload(&self.payload)
    }

    /// Interpret the raw payload as UTF-8 text.
    ///
    /// This is deliberately the raw payload, not an RTD-Text parse: it is
    /// the fallback interpretation the read flow applies after the URI
    /// attempt fails.
    pub fn text_payload(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

/// An ordered sequence of NDEF records, produced by a successful read or
/// constructed for a write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NdefMessage {
    records: Vec<NdefRecord>,
}

impl NdefMessage {
    /// Create a message from records, preserving order.
    pub fn new(records: Vec<NdefRecord>) -> Self {
        Self { records }
    }

    /// An empty message.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The records in original tag order.
    pub fn records(&self) -> &[NdefRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the message has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<NdefRecord> for NdefMessage {
    fn from(record: NdefRecord) -> Self {
        Self::new(vec![record])
    }
}

impl FromIterator<NdefRecord> for NdefMessage {
    fn from_iter<I: IntoIterator<Item = NdefRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
