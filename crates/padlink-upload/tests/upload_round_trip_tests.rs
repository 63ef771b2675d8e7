//! Integration tests for the single-file upload transaction.

mod common;

use std::sync::Arc;

use common::{RecordingTransport, fixed_clock};
use padlink_core::{ActionPayload, UploadOutcome};
use padlink_upload::UploadClient;

#[tokio::test]
async fn upload_round_trip_tests_text_payload_is_sent_verbatim() {
    let transport = Arc::new(RecordingTransport::answering(200, r#"{"success":true}"#));
    let client = UploadClient::new(transport.clone()).with_clock(fixed_clock);
    let payload = ActionPayload::from_text("abc", "text").expect("payload should build");

    let outcome = client.upload_payload(&payload).await;
    assert_eq!(outcome.status_text(), "Saved!");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].len(), 1);
    let part = &requests[0][0];
    assert_eq!(part.field, "photos");
    assert_eq!(part.filename, "text_1700000000000.txt");
    assert_eq!(part.mime, "text/plain");
    assert_eq!(part.bytes, b"abc");
}

#[tokio::test]
async fn upload_round_trip_tests_server_rejection_is_surfaced() {
    let transport = Arc::new(RecordingTransport::answering(
        500,
        r#"{"success":false,"error":"disk full"}"#,
    ));
    let client = UploadClient::new(transport);
    let payload = ActionPayload::from_text("abc", "scan").expect("payload should build");

    let outcome = client.upload_payload(&payload).await;
    assert_eq!(
        outcome,
        UploadOutcome::ServerRejected {
            message: "disk full".to_string()
        }
    );
    assert_eq!(outcome.status_text(), "Upload error: disk full");
}

#[tokio::test]
async fn upload_round_trip_tests_each_push_is_a_separate_request() {
    let transport = Arc::new(RecordingTransport::answering(200, r#"{"success":true}"#));
    let client = UploadClient::new(transport.clone());
    let payload = ActionPayload::from_text("again", "text").expect("payload should build");

    let _ = client.upload_payload(&payload).await;
    let _ = client.upload_payload(&payload).await;
    assert_eq!(transport.requests().len(), 2);
}
