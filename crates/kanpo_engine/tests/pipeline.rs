use std::fs;
use std::path::Path;
use std::time::Duration;

use kanpo_core::{ExtractionStrategy, Phase, RunMode, TargetDate};
use kanpo_engine::{EngineConfig, FetchPipeline};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INDEX: &str = r#"<html><body>
<a class="pdfDlb" href="./20250703/20250703h01500/20250703h015000000f.html">令和7年7月3日 本紙 第1500号</a>
<a class="pdfDlb" href="./20250702/20250702h01499/20250702h014990000f.html">令和7年7月2日 本紙 第1499号</a>
<a href="./20250703/other.html">20250703 unrelated</a>
</body></html>"#;

const ISSUE_PAGE: &str = r#"<html><body>
<div class="pdfHeader"><p class="date">令和7年7月3日</p></div>
<iframe src="../pdf/20250703h01500full00010032.pdf"></iframe>
</body></html>"#;

fn target() -> TargetDate {
    TargetDate::from_ymd(2025, 7, 3).unwrap()
}

fn config(server: &MockServer, output: &Path) -> EngineConfig {
    kanpo_logging::initialize_for_tests();
    EngineConfig {
        base_url: server.uri(),
        download_pause: Duration::ZERO,
        ..EngineConfig::default_with_output(output.to_path_buf())
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

async fn mount_index(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn mount_issue(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/20250703/20250703h01500/20250703h015000000f.html"))
        .respond_with(html(ISSUE_PAGE))
        .mount(server)
        .await;
}

async fn mount_pdf(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/20250703/pdf/20250703h01500full00010032.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .mount(server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/20250703/pdf/20250703h01500full00010032.pdf"))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Type", "application/pdf"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn downloads_issue_and_writes_manifest() {
    let server = MockServer::start().await;
    mount_index(&server, INDEX).await;
    mount_issue(&server).await;
    mount_pdf(&server).await;

    let temp = TempDir::new().unwrap();
    let pipeline = FetchPipeline::new(config(&server, temp.path())).unwrap();
    let report = pipeline.run(target()).await;

    assert_eq!(report.phase, Phase::ManifestWritten);
    assert!(report.outcome.found);
    assert_eq!(report.outcome.documents.len(), 1);
    assert_eq!(report.attempted, 1);
    assert_eq!(report.failed, 0);

    let run_dir = temp.path().join("2025-07-03");
    assert_eq!(report.run_dir, run_dir);
    let pdf = run_dir.join("20250703h01500full00010032.pdf");
    assert_eq!(fs::read(&pdf).unwrap(), b"%PDF-1.4");
    assert_eq!(report.outcome.documents[0].local_path.as_deref(), Some(pdf.as_path()));

    let manifest = run_dir.join("官報_2025-07-03.md");
    assert_eq!(report.manifest_path.as_deref(), Some(manifest.as_path()));
    let content = fs::read_to_string(&manifest).unwrap();
    assert!(content.contains("テストモード: 無効"));
    assert!(content.contains("件数: 1"));
    assert!(content.contains("- [令和7年7月3日](20250703h01500full00010032.pdf)"));
}

#[tokio::test]
async fn rerun_rewrites_identical_manifest() {
    let server = MockServer::start().await;
    mount_index(&server, INDEX).await;
    mount_issue(&server).await;
    mount_pdf(&server).await;

    let temp = TempDir::new().unwrap();
    let pipeline = FetchPipeline::new(config(&server, temp.path())).unwrap();
    let first = pipeline.run(target()).await;
    let first_manifest = fs::read_to_string(first.manifest_path.as_ref().unwrap()).unwrap();
    let second = pipeline.run(target()).await;
    let second_manifest = fs::read_to_string(second.manifest_path.as_ref().unwrap()).unwrap();

    assert_eq!(first.outcome, second.outcome);
    assert_eq!(first_manifest, second_manifest);
    let entries = fs::read_dir(temp.path().join("2025-07-03")).unwrap().count();
    assert_eq!(entries, 2);
}

#[tokio::test]
async fn dry_run_probes_without_writing_documents() {
    let server = MockServer::start().await;
    mount_index(&server, INDEX).await;
    mount_issue(&server).await;
    mount_pdf(&server).await;

    let temp = TempDir::new().unwrap();
    let pipeline = FetchPipeline::new(EngineConfig {
        mode: RunMode::DryRun,
        ..config(&server, temp.path())
    })
    .unwrap();
    let report = pipeline.run(target()).await;

    assert!(report.outcome.found);
    assert_eq!(report.outcome.documents[0].local_path, None);
    let run_dir = temp.path().join("2025-07-03");
    assert!(!run_dir.join("20250703h01500full00010032.pdf").exists());
    let manifest = fs::read_to_string(run_dir.join("官報_2025-07-03.md")).unwrap();
    assert!(manifest.contains("テストモード: 有効"));

    let gets = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "GET" && r.url.path().ends_with(".pdf"))
        .count();
    assert_eq!(gets, 0);
}

#[tokio::test]
async fn unavailable_index_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let pipeline = FetchPipeline::new(config(&server, temp.path())).unwrap();
    let report = pipeline.run(target()).await;

    assert_eq!(report.phase, Phase::NoIndex);
    assert!(!report.outcome.found);
    assert!(report.outcome.documents.is_empty());
    assert!(!temp.path().join("2025-07-03").exists());
}

#[tokio::test]
async fn no_matching_link_is_not_found() {
    let server = MockServer::start().await;
    mount_index(&server, INDEX).await;

    let temp = TempDir::new().unwrap();
    let pipeline = FetchPipeline::new(config(&server, temp.path())).unwrap();
    let report = pipeline.run(TargetDate::from_ymd(2025, 7, 4).unwrap()).await;

    assert_eq!(report.phase, Phase::NoLinks);
    assert!(!report.outcome.found);
    assert!(!temp.path().join("2025-07-04").exists());
}

#[tokio::test]
async fn class_filter_can_be_disabled() {
    let server = MockServer::start().await;
    mount_index(&server, INDEX).await;
    mount_issue(&server).await;
    mount_pdf(&server).await;
    Mock::given(method("GET"))
        .and(path("/20250703/other.html"))
        .respond_with(html("<html><body>no documents</body></html>"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let pipeline = FetchPipeline::new(EngineConfig {
        link_class: None,
        ..config(&server, temp.path())
    })
    .unwrap();
    let report = pipeline.run(target()).await;

    assert!(report.outcome.found);
    assert_eq!(report.outcome.documents.len(), 1);
}

#[tokio::test]
async fn failed_sub_page_is_skipped() {
    let server = MockServer::start().await;
    mount_index(&server, INDEX).await;
    Mock::given(method("GET"))
        .and(path("/20250702/20250702h01499/20250702h014990000f.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_issue(&server).await;
    mount_pdf(&server).await;

    let temp = TempDir::new().unwrap();
    let pipeline = FetchPipeline::new(EngineConfig {
        include_previous_day: true,
        ..config(&server, temp.path())
    })
    .unwrap();
    let report = pipeline.run(target()).await;

    assert_eq!(report.phase, Phase::ManifestWritten);
    assert_eq!(report.outcome.documents.len(), 1);
}

#[tokio::test]
async fn failed_download_yields_no_documents() {
    let server = MockServer::start().await;
    mount_index(&server, INDEX).await;
    mount_issue(&server).await;
    Mock::given(method("GET"))
        .and(path("/20250703/pdf/20250703h01500full00010032.pdf"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let pipeline = FetchPipeline::new(config(&server, temp.path())).unwrap();
    let report = pipeline.run(target()).await;

    assert_eq!(report.phase, Phase::NoDocuments);
    assert!(!report.outcome.found);
    assert_eq!(report.attempted, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.manifest_path, None);
}

#[tokio::test]
async fn anchor_strategy_uses_link_text_as_name() {
    let server = MockServer::start().await;
    mount_index(&server, INDEX).await;
    Mock::given(method("GET"))
        .and(path("/20250703/20250703h01500/20250703h015000000f.html"))
        .respond_with(html(
            r#"<html><body><p class="date">令和7年7月3日</p>
            <a href="0001.pdf">本文 1頁</a><a href="index.html">戻る</a></body></html>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/20250703/20250703h01500/0001.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF".to_vec(), "application/pdf"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let pipeline = FetchPipeline::new(EngineConfig {
        strategy: ExtractionStrategy::Anchor,
        ..config(&server, temp.path())
    })
    .unwrap();
    let report = pipeline.run(target()).await;

    assert!(report.outcome.found);
    let document = &report.outcome.documents[0];
    assert_eq!(document.descriptor.label(), "本文 1頁");
    assert!(temp.path().join("2025-07-03").join("0001.pdf").exists());
}

#[tokio::test]
async fn single_issue_with_single_frame() {
    let server = MockServer::start().await;
    mount_index(
        &server,
        r#"<html><body><a href="/20250703/index.html">2025年07月03日</a></body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/20250703/index.html"))
        .respond_with(html(r#"<html><body><iframe src="doc1.pdf"></iframe></body></html>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/20250703/doc1.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF".to_vec(), "application/pdf"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let pipeline = FetchPipeline::new(EngineConfig {
        link_class: None,
        ..config(&server, temp.path())
    })
    .unwrap();
    let report = pipeline.run(target()).await;

    assert!(report.outcome.found);
    assert_eq!(report.outcome.documents.len(), 1);
    let descriptor = &report.outcome.documents[0].descriptor;
    assert_eq!(descriptor.filename, "doc1.pdf");
    assert_eq!(descriptor.display_name, None);

    let manifest = fs::read_to_string(report.manifest_path.unwrap()).unwrap();
    assert!(manifest.contains("件数: 1"));
    assert!(manifest.contains("- [doc1.pdf](doc1.pdf)"));
}
