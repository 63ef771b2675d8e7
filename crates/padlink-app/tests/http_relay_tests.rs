//! Integration tests for the reqwest adapter against a mock relay server.

mod common;

use std::sync::Arc;

use common::{bar_for, relay_for, uploader_for};
use mockito::Matcher;
use padlink_canvas::{
    CanvasEngine, CanvasSizeSource, MemorySnapshotStore, RecoveryChoice, SizeSyncError,
    StartupOutcome,
};
use padlink_core::{CanvasSize, status_text};
use padlink_files::{FileIndex, FilesError};
use padlink_ui::{PhotoSelection, SelectedPhoto, TEXT_PREFIX, TextCapture, photo_status};
use padlink_upload::TransportError;

#[tokio::test]
async fn http_relay_tests_text_push_sends_one_photos_part() {
    let mut server = mockito::Server::new_async().await;
    let upload = server
        .mock("POST", "/api/file_share/upload")
        .match_header("content-type", Matcher::Regex("^multipart/form-data".to_string()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="photos""#.to_string()),
            Matcher::Regex(r#"filename="text_42.txt""#.to_string()),
            Matcher::Regex("Content-Type: text/plain".to_string()),
            Matcher::Regex("\r\n\r\nabc\r\n".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"files":["text_42.txt"]}"#)
        .create_async()
        .await;
    let relay = relay_for(&server.url());

    let mut capture = TextCapture::new(bar_for(&relay, TEXT_PREFIX));
    capture.input("abc");
    capture.bar_mut().push().await;

    upload.assert_async().await;
    assert_eq!(capture.bar().status().text(), status_text::SAVED);
}

#[tokio::test]
async fn http_relay_tests_server_rejection_message_is_shown() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/file_share/upload")
        .with_status(500)
        .with_body(r#"{"success":false,"error":"disk full"}"#)
        .create_async()
        .await;
    let relay = relay_for(&server.url());

    let mut capture = TextCapture::new(bar_for(&relay, TEXT_PREFIX));
    capture.input("abc");
    capture.bar_mut().push().await;

    assert_eq!(capture.bar().status().text(), "Upload error: disk full");
}

#[tokio::test]
async fn http_relay_tests_non_json_answer_is_a_transport_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/file_share/upload")
        .with_status(502)
        .with_body("<html>bad gateway</html>")
        .create_async()
        .await;
    let relay = relay_for(&server.url());

    let mut capture = TextCapture::new(bar_for(&relay, TEXT_PREFIX));
    capture.input("abc");
    capture.bar_mut().push().await;

    assert_eq!(capture.bar().status().text(), status_text::UPLOAD_FAILED);
}

#[tokio::test]
async fn http_relay_tests_photos_share_one_request_with_original_names() {
    let mut server = mockito::Server::new_async().await;
    let upload = server
        .mock("POST", "/api/file_share/upload")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"filename="a.jpg""#.to_string()),
            Matcher::Regex(r#"filename="b.png""#.to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .expect(1)
        .create_async()
        .await;
    let relay = relay_for(&server.url());

    let mut selection = PhotoSelection::new(uploader_for(&relay));
    selection.select(vec![
        SelectedPhoto {
            name: "a.jpg".to_string(),
            mime: "image/jpeg".to_string(),
            bytes: vec![0xff, 0xd8],
        },
        SelectedPhoto {
            name: "b.png".to_string(),
            mime: "image/png".to_string(),
            bytes: vec![0x89, b'P'],
        },
    ]);
    selection.send().await;

    upload.assert_async().await;
    assert_eq!(selection.status().text(), photo_status::SENT);
}

#[tokio::test]
async fn http_relay_tests_canvas_size_drives_engine_startup() {
    let mut server = mockito::Server::new_async().await;
    let size = server
        .mock("GET", "/canvas/size")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"width":560,"height":300}"#)
        .expect(1)
        .create_async()
        .await;
    let relay = relay_for(&server.url());

    let mut engine = CanvasEngine::new(
        CanvasSize::BROWSER_DEFAULT,
        Arc::new(relay.clone()),
        Arc::new(MemorySnapshotStore::default()),
        uploader_for(&relay),
    );
    let outcome = engine.start(&RecoveryChoice::DiscardAndSync).await;

    size.assert_async().await;
    assert_eq!(
        outcome,
        StartupOutcome::Synced(CanvasSize::new(560, 300).expect("valid size"))
    );
}

#[tokio::test]
async fn http_relay_tests_canvas_size_errors_are_typed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/canvas/size")
        .with_status(500)
        .create_async()
        .await;
    let relay = relay_for(&server.url());

    let error = relay
        .fetch_canvas_size()
        .await
        .expect_err("500 should fail");

    assert!(matches!(
        error,
        SizeSyncError::Transport(TransportError::Status(500))
    ));
}

#[tokio::test]
async fn http_relay_tests_file_list_and_download() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/file_share/files")
        .with_status(200)
        .with_body(r#"[{"name":"a b","ext":".txt","size":3,"mtime":1700000000.5}]"#)
        .create_async()
        .await;
    let download = server
        .mock("GET", "/api/file_share/download")
        .match_query(Matcher::UrlEncoded(
            "filename".to_string(),
            "a b.txt".to_string(),
        ))
        .with_status(200)
        .with_body("abc")
        .create_async()
        .await;
    let relay = relay_for(&server.url());

    let files = relay.list_files().await.expect("listing should parse");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_name(), "a b.txt");

    let bytes = relay
        .download(&files[0].file_name())
        .await
        .expect("download should succeed");
    download.assert_async().await;
    assert_eq!(bytes, b"abc".to_vec());
}

#[tokio::test]
async fn http_relay_tests_missing_download_maps_to_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/file_share/download")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;
    let relay = relay_for(&server.url());

    let error = relay.download("gone.txt").await.expect_err("404 should fail");
    assert!(matches!(
        error,
        FilesError::Transport(TransportError::Status(404))
    ));
}
