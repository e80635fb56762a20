//! RTD-URI prefix abbreviation handling.
//!
//! NDEF URI records (well-known type `"U"`) start with a single
//! identifier-code byte that abbreviates a common URI prefix; the rest of
//! the payload is the UTF-8 remainder of the URI. This module implements
//! the abbreviation table from the NFC Forum URI Record Type Definition.

/// URI prefix abbreviation table, indexed by identifier code.
///
/// Code `0x00` means "no abbreviation". Codes at or beyond the table
/// length are reserved for future use and are treated as no abbreviation,
/// as the RTD requires.
const URI_PREFIXES: [&str; 36] = [
    "",
    "http://www.",
    "https://www.",
    "http://",
    "https://",
    "tel:",
    "mailto:",
    "ftp://anonymous:anonymous@",
    "ftp://ftp.",
    "ftps://",
    "sftp://",
    "smb://",
    "nfs://",
    "ftp://",
    "dav://",
    "news:",
    "telnet://",
    "imap:",
    "rtsp://",
    "urn:",
    "pop:",
    "sip:",
    "sips:",
    "tftp:",
    "btspp://",
    "btl2cap://",
    "btgoep://",
    "tcpobex://",
    "irdaobex://",
    "file://",
    "urn:epc:id:",
    "urn:epc:tag:",
    "urn:epc:pat:",
    "urn:epc:raw:",
    "urn:epc:",
    "urn:nfc:",
];

/// Expand the prefix for an identifier code.
///
/// Reserved codes expand to the empty prefix per the RTD.
pub(crate) fn prefix_for(code: u8) -> &'static str {
    URI_PREFIXES.get(code as usize).copied().unwrap_or("")
}

/// Decode an RTD-URI payload into its full URI string.
///
/// Returns `None` for an empty payload or a remainder that is not valid
/// UTF-8.
pub(crate) fn decode_payload(payload: &[u8]) -> Option<String> {
    let (&code, rest) = payload.split_first()?;
    let rest = std::str::from_utf8(rest).ok()?;
    Some(format!("{}{}", prefix_for(code), rest))
}

/// Abbreviate a URI into (identifier code, remainder).
///
/// Picks the longest matching prefix from the table; falls back to code
/// `0x00` with the whole URI as remainder.
pub(crate) fn abbreviate(uri: &str) -> (u8, &str) {
    let mut best: (u8, &str) = (0, uri);
    for (code, prefix) in URI_PREFIXES.iter().enumerate().skip(1) {
        if let Some(rest) = uri.strip_prefix(prefix)
            && prefix.len() > URI_PREFIXES[best.0 as usize].len()
        {
            best = (code as u8, rest);
        }
    }
    best
}
