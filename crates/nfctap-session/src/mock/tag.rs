//! Scripted mock tags.
//!
//! Mock tags are configured up front with a capability, message content
//! and optional failures, then handed to a mock session for delivery.
//! A cloneable handle records what the controller did to the tag.

use std::sync::{Arc, Mutex, MutexGuard};

use nfctap_core::{Error, Result, TagCapability, TagTechnology};
use nfctap_ndef::NdefMessage;

use crate::traits::{NdefTag, RawTag};

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// What the controller did to a mock NDEF tag.
#[derive(Debug, Default)]
struct TagLog {
    connect_count: u32,
    capability_queries: u32,
    read_count: u32,
    writes: Vec<NdefMessage>,
}

/// Mock NDEF tag with scripted behavior.
///
/// # Examples
///
/// ```
/// use nfctap_core::TagCapability;
/// use nfctap_ndef::{NdefMessage, NdefRecord};
/// use nfctap_session::mock::MockNdefTag;
///
/// let (tag, handle) = MockNdefTag::new(TagCapability::ReadOnly);
/// let tag = tag.with_message(NdefMessage::from(NdefRecord::text("hello")));
/// assert_eq!(handle.write_count(), 0);
/// ```
#[derive(Debug)]
pub struct MockNdefTag {
    capability: TagCapability,
    message: NdefMessage,
    connect_error: Option<String>,
    capability_error: Option<String>,
    read_error: Option<String>,
    write_error: Option<String>,
    log: Arc<Mutex<TagLog>>,
}

impl MockNdefTag {
    /// Create a tag with the given capability and an empty message.
    ///
    /// Returns the tag and a handle that records the controller's calls.
    pub fn new(capability: TagCapability) -> (Self, MockNdefTagHandle) {
        let log = Arc::new(Mutex::new(TagLog::default()));
        let tag = Self {
            capability,
            message: NdefMessage::empty(),
            connect_error: None,
            capability_error: None,
            read_error: None,
            write_error: None,
            log: Arc::clone(&log),
        };
        (tag, MockNdefTagHandle { log })
    }

    /// Set the message returned by reads.
    pub fn with_message(mut self, message: NdefMessage) -> Self {
        self.message = message;
        self
    }

    /// Make the connect attempt fail.
    pub fn fail_connect(mut self, reason: impl Into<String>) -> Self {
        self.connect_error = Some(reason.into());
        self
    }

    /// Make the capability query fail.
    pub fn fail_capability_query(mut self, reason: impl Into<String>) -> Self {
        self.capability_error = Some(reason.into());
        self
    }

    /// Make reads fail.
    pub fn fail_read(mut self, reason: impl Into<String>) -> Self {
        self.read_error = Some(reason.into());
        self
    }

    /// Make writes fail.
    pub fn fail_write(mut self, reason: impl Into<String>) -> Self {
        self.write_error = Some(reason.into());
        self
    }
}

impl NdefTag for MockNdefTag {
    async fn connect(&mut self) -> Result<()> {
        locked(&self.log).connect_count += 1;
        match &self.connect_error {
            Some(reason) => Err(Error::connection_failed(reason.clone())),
            None => Ok(()),
        }
    }

    async fn query_capability(&mut self) -> Result<TagCapability> {
        locked(&self.log).capability_queries += 1;
        match &self.capability_error {
            Some(reason) => Err(Error::capability_query_failed(reason.clone())),
            None => Ok(self.capability),
        }
    }

    async fn read_message(&mut self) -> Result<NdefMessage> {
        locked(&self.log).read_count += 1;
        match &self.read_error {
            Some(reason) => Err(Error::read_failed(reason.clone())),
            None => Ok(self.message.clone()),
        }
    }

    async fn write_message(&mut self, message: &NdefMessage) -> Result<()> {
        match &self.write_error {
            Some(reason) => Err(Error::write_failed(reason.clone())),
            None => {
                locked(&self.log).writes.push(message.clone());
                Ok(())
            }
        }
    }
}

/// Handle for inspecting what the controller did to a [`MockNdefTag`].
#[derive(Debug, Clone)]
pub struct MockNdefTagHandle {
    log: Arc<Mutex<TagLog>>,
}

impl MockNdefTagHandle {
    /// Number of connect attempts.
    pub fn connect_count(&self) -> u32 {
        locked(&self.log).connect_count
    }

    /// Number of capability queries.
    pub fn capability_query_count(&self) -> u32 {
        locked(&self.log).capability_queries
    }

    /// Number of read attempts.
    pub fn read_count(&self) -> u32 {
        locked(&self.log).read_count
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> u32 {
        locked(&self.log).writes.len() as u32
    }

    /// The messages written to the tag, in order.
    pub fn writes(&self) -> Vec<NdefMessage> {
        locked(&self.log).writes.clone()
    }
}

/// Mock raw tag with a fixed technology and identifier.
#[derive(Debug, Clone)]
pub struct MockRawTag {
    technology: TagTechnology,
    identifier: Vec<u8>,
    connect_error: Option<String>,
}

impl MockRawTag {
    /// Create a FeliCa tag with the given IDm.
    pub fn felica(idm: impl Into<Vec<u8>>) -> Self {
        Self::with_technology(TagTechnology::FeliCa, idm)
    }

    /// Create a tag of an arbitrary technology.
    pub fn with_technology(technology: TagTechnology, identifier: impl Into<Vec<u8>>) -> Self {
        Self {
            technology,
            identifier: identifier.into(),
            connect_error: None,
        }
    }

    /// Make the connect attempt fail.
    pub fn fail_connect(mut self, reason: impl Into<String>) -> Self {
        self.connect_error = Some(reason.into());
        self
    }
}

impl RawTag for MockRawTag {
    async fn connect(&mut self) -> Result<()> {
        match &self.connect_error {
            Some(reason) => Err(Error::connection_failed(reason.clone())),
            None => Ok(()),
        }
    }

    fn technology(&self) -> TagTechnology {
        self.technology
    }

    fn identifier(&self) -> &[u8] {
        &self.identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfctap_ndef::NdefRecord;

    #[tokio::test]
    async fn test_mock_ndef_tag_records_calls() {
        let (mut tag, handle) = MockNdefTag::new(TagCapability::ReadWrite);

        tag.connect().await.unwrap();
        let capability = tag.query_capability().await.unwrap();
        assert_eq!(capability, TagCapability::ReadWrite);

        let message = NdefMessage::from(NdefRecord::text("x"));
        tag.write_message(&message).await.unwrap();

        assert_eq!(handle.connect_count(), 1);
        assert_eq!(handle.capability_query_count(), 1);
        assert_eq!(handle.write_count(), 1);
        assert_eq!(handle.writes()[0], message);
    }

    #[tokio::test]
    async fn test_mock_ndef_tag_scripted_failures() {
        let (tag, handle) = MockNdefTag::new(TagCapability::ReadWrite);
        let mut tag = tag.fail_write("tag moved away");

        let message = NdefMessage::from(NdefRecord::text("x"));
        let error = tag.write_message(&message).await.unwrap_err();
        assert!(matches!(error, Error::WriteFailed { .. }));
        assert_eq!(handle.write_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_raw_tag() {
        let mut tag = MockRawTag::felica(vec![0x01, 0xAB]);
        tag.connect().await.unwrap();
        assert_eq!(tag.technology(), TagTechnology::FeliCa);
        assert_eq!(tag.identifier(), &[0x01, 0xAB]);
    }
}
