//! Integration tests for listing, selection and downloads.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use common::StaticIndex;
use padlink_files::{FileBrowser, FilesError, FsDownloadSink, files_status};

fn sample_index() -> StaticIndex {
    StaticIndex::with_files(&[
        ("notes", ".txt", &b"hello"[..]),
        ("photo", ".jpg", &b"\xff\xd8\xff"[..]),
        ("archive", "", &b"raw"[..]),
    ])
}

#[tokio::test(flavor = "current_thread")]
async fn file_browser_tests_refresh_keeps_server_order() {
    let index = Arc::new(sample_index());
    let mut browser = FileBrowser::new(index.clone());
    assert!(!browser.can_download());

    let files = browser.refresh().await.expect("listing should load");
    let names: Vec<String> = files.iter().map(|file| file.file_name()).collect();

    assert_eq!(names, vec!["notes.txt", "photo.jpg", "archive"]);
    assert!(browser.can_download());
}

#[tokio::test(flavor = "current_thread")]
async fn file_browser_tests_empty_selection_reports_and_skips_requests() {
    let index = Arc::new(sample_index());
    let mut browser = FileBrowser::new(index.clone());
    browser.refresh().await.expect("listing should load");
    let dir = tempfile::tempdir().expect("temp dir");

    let result = browser
        .download_selected(&FsDownloadSink::new(dir.path()))
        .await;

    assert!(matches!(result, Err(FilesError::NothingSelected)));
    assert_eq!(browser.status().text(), files_status::NOTHING_SELECTED);
    assert!(index.downloads().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn file_browser_tests_downloads_checked_rows_sequentially() {
    let index = Arc::new(sample_index());
    let mut browser = FileBrowser::new(index.clone());
    browser.refresh().await.expect("listing should load");
    assert!(browser.toggle("archive"));
    assert!(browser.toggle("notes.txt"));
    assert!(!browser.toggle("missing.bin"));
    let dir = tempfile::tempdir().expect("temp dir");

    let report = browser
        .download_selected(&FsDownloadSink::new(dir.path().join("out")))
        .await
        .expect("download should run");

    assert_eq!(index.downloads(), vec!["notes.txt", "archive"]);
    assert_eq!(report.saved.len(), 2);
    assert!(report.failed.is_empty());
    assert_eq!(
        std::fs::read(dir.path().join("out").join("notes.txt")).expect("file written"),
        b"hello"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn file_browser_tests_one_failure_does_not_stop_the_rest() {
    let mut index = sample_index();
    index.contents.remove("photo.jpg");
    let index = Arc::new(index);
    let mut browser = FileBrowser::new(index.clone());
    browser.refresh().await.expect("listing should load");
    browser.select_all();
    let dir = tempfile::tempdir().expect("temp dir");

    let report = browser
        .download_selected(&FsDownloadSink::new(dir.path()))
        .await
        .expect("download should run");

    assert_eq!(index.downloads().len(), 3);
    assert_eq!(report.saved.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "photo.jpg");
    assert_eq!(browser.status().text(), files_status::downloaded(2, 1));
}

#[tokio::test(flavor = "current_thread")]
async fn file_browser_tests_failed_refresh_keeps_previous_rows() {
    let index = Arc::new(sample_index());
    let mut browser = FileBrowser::new(index.clone());
    browser.refresh().await.expect("listing should load");
    browser.toggle("photo.jpg");

    index.list_fails.store(true, Ordering::SeqCst);
    assert!(browser.refresh().await.is_err());

    assert_eq!(browser.status().text(), files_status::LIST_FAILED);
    assert_eq!(browser.files().len(), 3);
    assert_eq!(browser.selected(), vec!["photo.jpg"]);
}
