use kanpo_core::{
    build_extractor, AnchorExtractor, DocumentExtractor, DocumentSource, ExtractionStrategy,
    FrameExtractor, TitleMarker, DEFAULT_TITLE_MARKER, NESTED_TITLE_MARKER,
};
use pretty_assertions::assert_eq;
use url::Url;

fn page_url() -> Url {
    Url::parse("https://www.kanpo.go.jp/20250703/20250703h01500/20250703h015000000f.html").unwrap()
}

fn marker(css: &str) -> TitleMarker {
    TitleMarker::parse(css).unwrap()
}

const FRAME_PAGE: &str = r#"
<html><body>
  <p class="date">令和7年7月3日（木）</p>
  <iframe src="pdf/20250703h015000001.pdf"></iframe>
  <iframe src="/menu.html"></iframe>
  <iframe src="https://cdn.example.jp/doc/ANNEX.PDF"></iframe>
  <a href="pdf/ignored-by-frame-strategy.pdf">PDF</a>
</body></html>
"#;

#[test]
fn frame_strategy_collects_pdf_frames_in_order() {
    let extractor = FrameExtractor::new(marker(DEFAULT_TITLE_MARKER), "pdf");
    let extraction = extractor.extract(FRAME_PAGE, &page_url());

    assert_eq!(extraction.title.as_deref(), Some("令和7年7月3日（木）"));
    assert_eq!(extraction.documents.len(), 2);

    let first = &extraction.documents[0];
    assert_eq!(
        first.url.as_str(),
        "https://www.kanpo.go.jp/20250703/20250703h01500/pdf/20250703h015000001.pdf"
    );
    assert_eq!(first.filename, "20250703h015000001.pdf");
    assert_eq!(first.display_name.as_deref(), Some("令和7年7月3日（木）"));
    assert_eq!(first.source, DocumentSource::EmbeddedFrame);

    assert_eq!(extraction.documents[1].filename, "ANNEX.PDF");
}

#[test]
fn missing_marker_leaves_display_name_empty() {
    let html = r#"<iframe src="doc1.pdf"></iframe>"#;
    let extraction =
        FrameExtractor::new(marker(DEFAULT_TITLE_MARKER), "pdf").extract(html, &page_url());

    assert_eq!(extraction.title, None);
    assert_eq!(extraction.documents.len(), 1);
    assert_eq!(extraction.documents[0].display_name, None);
    assert_eq!(extraction.documents[0].filename, "doc1.pdf");
}

#[test]
fn nested_marker_reads_header_container() {
    let html = r#"
    <p class="date">outside</p>
    <div class="pdfHeader"><span class="date">令和7年7月3日</span></div>
    <iframe src="doc1.pdf"></iframe>"#;
    let extraction =
        FrameExtractor::new(marker(NESTED_TITLE_MARKER), "pdf").extract(html, &page_url());

    assert_eq!(extraction.title.as_deref(), Some("令和7年7月3日"));
}

#[test]
fn page_without_documents_yields_empty_sequence() {
    let html = "<html><body><p>本日の官報はありません</p></body></html>";
    for strategy in [ExtractionStrategy::EmbeddedFrame, ExtractionStrategy::Anchor] {
        let extractor = build_extractor(strategy, marker(DEFAULT_TITLE_MARKER), "pdf");
        assert_eq!(extractor.strategy(), strategy);
        assert!(extractor.extract(html, &page_url()).documents.is_empty());
    }
}

#[test]
fn anchor_strategy_uses_link_text_or_filename() {
    let html = r#"
    <a href="pdf/a.pdf">本紙 第1500号</a>
    <a href="pdf/b.pdf"><img src="icon.png"></a>
    <a href="index.html">戻る</a>"#;
    let extraction =
        AnchorExtractor::new(marker(DEFAULT_TITLE_MARKER), "pdf").extract(html, &page_url());

    let names: Vec<Option<&str>> = extraction
        .documents
        .iter()
        .map(|d| d.display_name.as_deref())
        .collect();
    assert_eq!(names, vec![Some("本紙 第1500号"), Some("b.pdf")]);
    assert!(extraction
        .documents
        .iter()
        .all(|d| d.source == DocumentSource::Anchor));
}

#[test]
fn strategies_do_not_merge() {
    let frame = build_extractor(
        ExtractionStrategy::EmbeddedFrame,
        marker(DEFAULT_TITLE_MARKER),
        "pdf",
    );
    let anchor = build_extractor(ExtractionStrategy::Anchor, marker(DEFAULT_TITLE_MARKER), "pdf");

    let frames = frame.extract(FRAME_PAGE, &page_url()).documents;
    let anchors = anchor.extract(FRAME_PAGE, &page_url()).documents;

    assert!(frames.iter().all(|d| d.source == DocumentSource::EmbeddedFrame));
    assert_eq!(anchors.len(), 1);
    assert_eq!(anchors[0].filename, "ignored-by-frame-strategy.pdf");
}
