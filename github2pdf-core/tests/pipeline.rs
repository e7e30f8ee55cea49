mod common;

use std::fs;
use std::sync::{Arc, Mutex};

use common::{build_zip, code_lines};
use github2pdf_core::config::RunConfig;
use github2pdf_core::contract::{DownloadError, MockDownloader};
use github2pdf_core::download::{FetchError, GitSource};
use github2pdf_core::pipeline::{build_pdf, PipelineError};
use tempfile::tempdir;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::Registry;

fn source() -> GitSource {
    GitSource::new("https://github.com/org/myrepo", "main")
}

#[tokio::test]
async fn builds_pdf_from_qualifying_files_in_order() {
    let a = code_lines(12);
    let b = code_lines(15);
    let zip = build_zip(&[
        ("myrepo-main/", None),
        ("myrepo-main/README.md", Some(a.as_bytes())),
        ("myrepo-main/src/a.go", Some(a.as_bytes())),
        ("myrepo-main/src/a_test.go", Some(a.as_bytes())),
        ("myrepo-main/src/b.py", Some(b.as_bytes())),
    ]);

    let mut downloader = MockDownloader::new();
    downloader
        .expect_download_archive()
        .withf(|s: &GitSource| s.repo_url == "https://github.com/org/myrepo" && s.reference == "main")
        .times(1)
        .returning(move |_| Ok(zip.clone()));

    let dir = tempdir().unwrap();
    let config = RunConfig::new(source(), dir.path().join("myrepo_all_files.pdf"));

    let report = build_pdf(&config, &downloader).await.expect("pipeline should succeed");

    assert_eq!(report.files, vec!["myrepo-main/src/a.go", "myrepo-main/src/b.py"]);
    assert_eq!(report.output_path, config.output_path);
    let pdf = fs::read(&config.output_path).unwrap();
    assert_eq!(&pdf[0..4], b"%PDF");
}

#[tokio::test]
async fn empty_result_still_writes_a_document() {
    let zip = build_zip(&[("myrepo-main/", None), ("myrepo-main/LICENSE", Some(b"MIT".as_slice()))]);
    let mut downloader = MockDownloader::new();
    downloader
        .expect_download_archive()
        .returning(move |_| Ok(zip.clone()));

    let dir = tempdir().unwrap();
    let config = RunConfig::new(source(), dir.path().join("myrepo_all_files.pdf"));

    let report = build_pdf(&config, &downloader).await.expect("empty repo is fine");
    assert!(report.files.is_empty());
    assert!(config.output_path.exists());
}

#[tokio::test]
async fn download_failure_stops_before_writing() {
    let mut downloader = MockDownloader::new();
    downloader.expect_download_archive().returning(|s| {
        Err(DownloadError::Status {
            url: s.archive_url(),
            status: 404,
        })
    });

    let dir = tempdir().unwrap();
    let config = RunConfig::new(source(), dir.path().join("myrepo_all_files.pdf"));

    let err = build_pdf(&config, &downloader).await.unwrap_err();
    assert_eq!(err.download_error().and_then(|e| e.status_code()), Some(404));
    assert!(!config.output_path.exists());
}

#[tokio::test]
async fn malformed_archive_is_propagated() {
    let mut downloader = MockDownloader::new();
    downloader
        .expect_download_archive()
        .returning(|_| Ok(b"<html>not a zip</html>".to_vec()));

    let dir = tempdir().unwrap();
    let config = RunConfig::new(source(), dir.path().join("myrepo_all_files.pdf"));

    let err = build_pdf(&config, &downloader).await.unwrap_err();
    assert!(matches!(err, PipelineError::Fetch(FetchError::Archive(_))), "got {err:?}");
    assert!(err.download_error().is_none());
    assert!(!config.output_path.exists());
}

/// Collects the `message` field of every event.
struct EventCollector {
    messages: Arc<Mutex<Vec<String>>>,
}

struct MessageVisitor<'a>(&'a mut String);

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = format!("{value:?}");
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for EventCollector {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut message = String::new();
        event.record(&mut MessageVisitor(&mut message));
        self.messages.lock().unwrap().push(message);
    }
}

#[tokio::test]
async fn failed_download_is_logged_as_pipeline_error() {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let subscriber = Registry::default().with(EventCollector {
        messages: messages.clone(),
    });
    let _guard = tracing::subscriber::set_default(subscriber);

    let mut downloader = MockDownloader::new();
    downloader.expect_download_archive().returning(|s| {
        Err(DownloadError::Status {
            url: s.archive_url(),
            status: 500,
        })
    });
    let dir = tempdir().unwrap();
    let config = RunConfig::new(source(), dir.path().join("out.pdf"));

    let _ = build_pdf(&config, &downloader).await;

    let messages = messages.lock().unwrap();
    assert!(
        messages.iter().any(|m| m.contains("Fetching repository failed")),
        "expected a pipeline error event, got: {messages:?}"
    );
}
