//! End-to-end session flow tests against the mock platform.
//!
//! Each test scripts one session through the mock provider, runs the
//! controller to termination and asserts on the stored outcome and the
//! mock logs.

use std::time::Duration;

use nfctap_core::constants::{
    MSG_CAPABILITY_QUERY_FAILED, MSG_CONNECT_FAILED, MSG_LOCK_COMPLETED, MSG_NO_TAG_DETECTED,
    MSG_NOT_NDEF_COMPLIANT, MSG_READ_COMPLETED, MSG_READ_ONLY, MSG_SCAN_PROMPT,
    MSG_UNKNOWN_STATUS, MSG_WRITE_SUCCESSFUL, MSG_WRONG_SUBTYPE, RESTART_POLLING_DELAY,
};
use nfctap_core::{SessionMode, TagCapability, TagFormat, TagTechnology};
use nfctap_ndef::{NdefMessage, NdefRecord, decode};
use nfctap_session::mock::{
    MockNdefSession, MockNdefTag, MockRawSession, MockRawTag, MockSessionHandle,
    MockSessionProvider,
};
use nfctap_session::{SessionConfig, TagSessionController};

fn ndef_controller(
    mode: SessionMode,
) -> (
    TagSessionController<MockSessionProvider>,
    MockSessionHandle<MockNdefTag>,
) {
    let (session, handle) = MockNdefSession::new();
    let provider = MockSessionProvider::new().with_ndef_session(session);
    let mut controller = TagSessionController::new(provider);
    controller.set_mode(mode);
    (controller, handle)
}

fn felica_controller(
    config: SessionConfig,
) -> (
    TagSessionController<MockSessionProvider>,
    MockSessionHandle<MockRawTag>,
) {
    let (session, handle) = MockRawSession::new();
    let provider = MockSessionProvider::new().with_raw_session(session);
    let mut controller = TagSessionController::with_config(provider, config);
    controller.set_format(TagFormat::FeliCa);
    (controller, handle)
}

#[tokio::test]
async fn test_read_text_record() {
    let (mut controller, session_handle) = ndef_controller(SessionMode::Read);
    let (tag, tag_handle) = MockNdefTag::new(TagCapability::ReadWrite);
    let tag = tag.with_message(NdefMessage::from(NdefRecord::text("hello, tag")));
    session_handle.deliver_tags(vec![tag]);

    controller.begin_scanning().await.unwrap();

    assert_eq!(controller.outcome_text().as_deref(), Some("hello, tag"));
    assert!(controller.is_terminated());
    assert_eq!(tag_handle.connect_count(), 1);
    assert_eq!(tag_handle.read_count(), 1);
    assert_eq!(
        session_handle.last_status_message().as_deref(),
        Some(MSG_READ_COMPLETED)
    );
    assert_eq!(session_handle.invalidations(), vec![None]);
}

#[tokio::test]
async fn test_read_uri_record_expands_prefix() {
    let (mut controller, session_handle) = ndef_controller(SessionMode::Read);
    let (tag, _) = MockNdefTag::new(TagCapability::ReadOnly);
    let tag = tag.with_message(NdefMessage::from(NdefRecord::uri("https://www.example.com/")));
    session_handle.deliver_tags(vec![tag]);

    controller.begin_scanning().await.unwrap();

    assert_eq!(
        controller.outcome_text().as_deref(),
        Some("https://www.example.com/")
    );
}

#[tokio::test]
async fn test_read_joins_records_with_blank_line() {
    let (mut controller, session_handle) = ndef_controller(SessionMode::Read);
    let message = NdefMessage::new(vec![NdefRecord::text("first"), NdefRecord::text("second")]);
    let (tag, _) = MockNdefTag::new(TagCapability::ReadWrite);
    session_handle.deliver_tags(vec![tag.with_message(message)]);

    controller.begin_scanning().await.unwrap();

    assert_eq!(controller.outcome_text().as_deref(), Some("first\n\nsecond"));
}

#[tokio::test]
async fn test_write_stores_text_record() {
    let (mut controller, session_handle) = ndef_controller(SessionMode::Write);
    controller.set_write_text("note to self");
    let (tag, tag_handle) = MockNdefTag::new(TagCapability::ReadWrite);
    session_handle.deliver_tags(vec![tag]);

    controller.begin_scanning().await.unwrap();

    let outcome = controller.outcome().unwrap();
    assert_eq!(outcome.completion_message(), Some(MSG_WRITE_SUCCESSFUL));
    // The status is not tag content.
    assert_eq!(controller.outcome_text(), None);
    let writes = tag_handle.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(decode(&writes[0]), "note to self");
}

#[tokio::test]
async fn test_write_rejected_on_read_only_tag() {
    let (mut controller, session_handle) = ndef_controller(SessionMode::Write);
    let (tag, tag_handle) = MockNdefTag::new(TagCapability::ReadOnly);
    session_handle.deliver_tags(vec![tag]);

    controller.begin_scanning().await.unwrap();

    let outcome = controller.outcome().unwrap();
    assert!(outcome.is_failure());
    assert_eq!(outcome.failure_reason(), Some(MSG_READ_ONLY));
    assert_eq!(tag_handle.write_count(), 0);
    assert_eq!(
        session_handle.invalidations(),
        vec![Some(MSG_READ_ONLY.to_string())]
    );
}

#[tokio::test]
async fn test_non_compliant_tag_rejected_in_any_mode() {
    for mode in [SessionMode::Read, SessionMode::Write, SessionMode::Lock] {
        let (mut controller, session_handle) = ndef_controller(mode);
        let (tag, _) = MockNdefTag::new(TagCapability::NotSupported);
        session_handle.deliver_tags(vec![tag]);

        controller.begin_scanning().await.unwrap();

        let outcome = controller.outcome().unwrap();
        assert_eq!(outcome.failure_reason(), Some(MSG_NOT_NDEF_COMPLIANT), "{mode:?}");
    }
}

#[tokio::test]
async fn test_unrecognized_capability_rejected() {
    let (mut controller, session_handle) = ndef_controller(SessionMode::Read);
    let (tag, _) = MockNdefTag::new(TagCapability::Unrecognized(7));
    session_handle.deliver_tags(vec![tag]);

    controller.begin_scanning().await.unwrap();

    let outcome = controller.outcome().unwrap();
    assert_eq!(outcome.failure_reason(), Some(MSG_UNKNOWN_STATUS));
}

#[tokio::test]
async fn test_connect_failure_terminates_session() {
    let (mut controller, session_handle) = ndef_controller(SessionMode::Read);
    let (tag, tag_handle) = MockNdefTag::new(TagCapability::ReadWrite);
    session_handle.deliver_tags(vec![tag.fail_connect("tag left the field")]);

    controller.begin_scanning().await.unwrap();

    let outcome = controller.outcome().unwrap();
    assert_eq!(outcome.failure_reason(), Some(MSG_CONNECT_FAILED));
    assert_eq!(tag_handle.capability_query_count(), 0);
}

#[tokio::test]
async fn test_capability_query_failure_terminates_session() {
    let (mut controller, session_handle) = ndef_controller(SessionMode::Read);
    let (tag, tag_handle) = MockNdefTag::new(TagCapability::ReadWrite);
    session_handle.deliver_tags(vec![tag.fail_capability_query("status exchange timeout")]);

    controller.begin_scanning().await.unwrap();

    let outcome = controller.outcome().unwrap();
    assert_eq!(outcome.failure_reason(), Some(MSG_CAPABILITY_QUERY_FAILED));
    assert_eq!(tag_handle.read_count(), 0);
}

#[tokio::test]
async fn test_read_failure_surfaces_reason() {
    let (mut controller, session_handle) = ndef_controller(SessionMode::Read);
    let (tag, _) = MockNdefTag::new(TagCapability::ReadWrite);
    session_handle.deliver_tags(vec![tag.fail_read("tag moved away")]);

    controller.begin_scanning().await.unwrap();

    let outcome = controller.outcome().unwrap();
    assert_eq!(outcome.failure_reason(), Some("Tag read failed: tag moved away"));
}

#[tokio::test]
async fn test_write_failure_uses_prefixed_message() {
    let (mut controller, session_handle) = ndef_controller(SessionMode::Write);
    let (tag, tag_handle) = MockNdefTag::new(TagCapability::ReadWrite);
    session_handle.deliver_tags(vec![tag.fail_write("tag moved away")]);

    controller.begin_scanning().await.unwrap();

    let outcome = controller.outcome().unwrap();
    assert_eq!(
        outcome.failure_reason(),
        Some("Write NDEF message fail: tag moved away")
    );
    assert_eq!(tag_handle.write_count(), 0);
}

#[tokio::test]
async fn test_lock_reports_completion_without_touching_records() {
    // Locking proceeds regardless of writability.
    for capability in [TagCapability::ReadWrite, TagCapability::ReadOnly] {
        let (mut controller, session_handle) = ndef_controller(SessionMode::Lock);
        let (tag, tag_handle) = MockNdefTag::new(capability);
        session_handle.deliver_tags(vec![tag]);

        controller.begin_scanning().await.unwrap();

        let outcome = controller.outcome().unwrap();
        assert_eq!(outcome.completion_message(), Some(MSG_LOCK_COMPLETED));
        assert_eq!(controller.outcome_text(), None);
        assert_eq!(tag_handle.read_count(), 0);
        assert_eq!(tag_handle.write_count(), 0);
    }
}

#[tokio::test]
async fn test_multi_tag_detection_is_ignored_silently() {
    let (mut controller, session_handle) = ndef_controller(SessionMode::Read);

    let (first, _) = MockNdefTag::new(TagCapability::ReadWrite);
    let (second, _) = MockNdefTag::new(TagCapability::ReadWrite);
    session_handle.deliver_tags(vec![first, second]);

    let (single, _) = MockNdefTag::new(TagCapability::ReadWrite);
    let single = single.with_message(NdefMessage::from(NdefRecord::text("only me")));
    session_handle.deliver_tags(vec![single]);

    controller.begin_scanning().await.unwrap();

    assert_eq!(controller.outcome_text().as_deref(), Some("only me"));
    // The multi-tag detection produced no status change or invalidation.
    assert_eq!(session_handle.invalidation_count(), 1);
}

#[tokio::test]
async fn test_empty_detection_fails_session() {
    let (mut controller, session_handle) = ndef_controller(SessionMode::Read);
    session_handle.deliver_tags(Vec::new());

    controller.begin_scanning().await.unwrap();

    let outcome = controller.outcome().unwrap();
    assert_eq!(outcome.failure_reason(), Some(MSG_NO_TAG_DETECTED));
}

#[tokio::test]
async fn test_lost_session_channel_records_failure() {
    let (session, handle) = MockNdefSession::new();
    drop(handle);
    let provider = MockSessionProvider::new().with_ndef_session(session);
    let mut controller = TagSessionController::new(provider);

    controller.begin_scanning().await.unwrap();

    let outcome = controller.outcome().unwrap();
    assert!(outcome.is_failure());
    assert!(controller.is_terminated());
}

#[tokio::test]
async fn test_scan_prompt_is_set_before_detection() {
    let (mut controller, session_handle) = ndef_controller(SessionMode::Read);
    let (tag, _) = MockNdefTag::new(TagCapability::ReadWrite);
    session_handle.deliver_tags(vec![tag]);

    controller.begin_scanning().await.unwrap();

    assert_eq!(
        session_handle.status_messages().first().map(String::as_str),
        Some(MSG_SCAN_PROMPT)
    );
}

#[tokio::test]
async fn test_felica_read_renders_idm_as_lowercase_hex() {
    let (mut controller, session_handle) = felica_controller(SessionConfig::default());
    session_handle.deliver_tags(vec![MockRawTag::felica(vec![0xA3, 0x01, 0x9F, 0x00])]);

    controller.begin_scanning().await.unwrap();

    assert_eq!(controller.outcome_text().as_deref(), Some("a3019f00"));
    assert_eq!(
        controller.provider().requested_polling(),
        Some(nfctap_core::PollingOption::Iso18092)
    );
    assert_eq!(
        session_handle.last_status_message().as_deref(),
        Some(MSG_READ_COMPLETED)
    );
}

#[tokio::test(start_paused = true)]
async fn test_wrong_subtype_restarts_polling_after_delay() {
    let (mut controller, session_handle) = felica_controller(SessionConfig::default());
    session_handle.deliver_tags(vec![MockRawTag::with_technology(
        TagTechnology::MiFare,
        vec![0x04, 0x2A],
    )]);
    session_handle.deliver_tags(vec![MockRawTag::felica(vec![0x01, 0x02])]);

    let started = tokio::time::Instant::now();
    controller.begin_scanning().await.unwrap();

    // Under the paused clock the only time that passes is the single
    // restart delay before the retry.
    assert_eq!(started.elapsed(), RESTART_POLLING_DELAY);
    assert_eq!(controller.outcome_text().as_deref(), Some("0102"));
    assert_eq!(session_handle.restart_count(), 1);
    assert!(
        session_handle
            .status_messages()
            .iter()
            .any(|m| m == MSG_WRONG_SUBTYPE)
    );
}

#[tokio::test(start_paused = true)]
async fn test_restart_polling_failure_records_outcome() {
    let (mut controller, session_handle) = felica_controller(SessionConfig::default());
    session_handle.deliver_tags(vec![MockRawTag::with_technology(
        TagTechnology::MiFare,
        vec![0x04, 0x2A],
    )]);
    session_handle.fail_restart_polling("handle gone");

    // The failure terminates the session; it never escapes the scan.
    controller.begin_scanning().await.unwrap();

    let outcome = controller.outcome().unwrap();
    assert_eq!(outcome.failure_reason(), Some("Session closed: handle gone"));
    assert!(controller.is_terminated());
    assert_eq!(session_handle.restart_count(), 0);
    assert_eq!(
        session_handle.invalidations(),
        vec![Some("Session closed: handle gone".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn test_wrong_subtype_retry_limit_is_terminal() {
    let config = SessionConfig {
        max_subtype_retries: 3,
        restart_delay: Duration::from_millis(500),
        ..SessionConfig::default()
    };
    let (mut controller, session_handle) = felica_controller(config);
    for _ in 0..4 {
        session_handle.deliver_tags(vec![MockRawTag::with_technology(
            TagTechnology::MiFare,
            vec![0x04, 0x2A],
        )]);
    }

    controller.begin_scanning().await.unwrap();

    let outcome = controller.outcome().unwrap();
    assert_eq!(outcome.failure_reason(), Some(MSG_WRONG_SUBTYPE));
    assert_eq!(session_handle.restart_count(), 3);
}

#[tokio::test]
async fn test_felica_connect_failure_terminates_session() {
    let (mut controller, session_handle) = felica_controller(SessionConfig::default());
    session_handle.deliver_tags(vec![
        MockRawTag::felica(vec![0x01]).fail_connect("tag left the field"),
    ]);

    controller.begin_scanning().await.unwrap();

    let outcome = controller.outcome().unwrap();
    assert_eq!(outcome.failure_reason(), Some(MSG_CONNECT_FAILED));
}

#[tokio::test]
async fn test_rescan_replaces_previous_outcome() {
    let (mut controller, session_handle) = ndef_controller(SessionMode::Read);
    let (tag, _) = MockNdefTag::new(TagCapability::ReadWrite);
    session_handle.deliver_tags(vec![tag.with_message(NdefMessage::from(NdefRecord::text("one")))]);
    controller.begin_scanning().await.unwrap();
    assert_eq!(controller.outcome_text().as_deref(), Some("one"));

    let (session, second_handle) = MockNdefSession::new();
    let (tag, _) = MockNdefTag::new(TagCapability::ReadWrite);
    second_handle.deliver_tags(vec![tag.with_message(NdefMessage::from(NdefRecord::text("two")))]);
    controller.provider_mut().set_ndef_session(session);

    controller.begin_scanning().await.unwrap();
    assert_eq!(controller.outcome_text().as_deref(), Some("two"));
}

#[tokio::test]
async fn test_external_invalidation_after_completion_is_a_no_op() {
    let (mut controller, session_handle) = ndef_controller(SessionMode::Read);
    let (tag, _) = MockNdefTag::new(TagCapability::ReadWrite);
    session_handle.deliver_tags(vec![tag.with_message(NdefMessage::from(NdefRecord::text("kept")))]);
    controller.begin_scanning().await.unwrap();

    controller.invalidate_with_error("late radio callback");

    assert_eq!(controller.outcome_text().as_deref(), Some("kept"));
}

#[tokio::test]
async fn test_outcome_watcher_observes_termination() {
    let (mut controller, session_handle) = ndef_controller(SessionMode::Read);
    let mut watcher = controller.subscribe();
    assert!(watcher.current().is_none());

    let (tag, _) = MockNdefTag::new(TagCapability::ReadWrite);
    session_handle.deliver_tags(vec![tag.with_message(NdefMessage::from(NdefRecord::text("seen")))]);
    controller.begin_scanning().await.unwrap();

    let outcome = watcher.changed().await.unwrap();
    assert_eq!(outcome.text(), Some("seen"));
}
