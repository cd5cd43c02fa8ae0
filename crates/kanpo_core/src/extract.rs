use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::discovery::stripped_text;
use crate::types::{DocumentDescriptor, DocumentSource};

/// `<p class="date">` on issue pages.
pub const DEFAULT_TITLE_MARKER: &str = "p.date";
/// Later page layout: the date sits inside `<div class="pdfHeader">`.
pub const NESTED_TITLE_MARKER: &str = "div.pdfHeader .date";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MarkerError {
    #[error("invalid title marker selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Which element kind carries document links on sub-pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// `<iframe src="...pdf">` viewers.
    #[default]
    EmbeddedFrame,
    /// Plain `<a href="...pdf">` links.
    Anchor,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extraction {
    /// Text of the page's date/title marker, if the page has one.
    pub title: Option<String>,
    pub documents: Vec<DocumentDescriptor>,
}

pub trait DocumentExtractor: Send + Sync {
    fn strategy(&self) -> ExtractionStrategy;

    /// Collect document descriptors from a sub-page, in page order.
    /// `page_url` resolves relative references.
    fn extract(&self, html: &str, page_url: &Url) -> Extraction;
}

/// Locates the optional date/title element on a sub-page.
#[derive(Debug, Clone)]
pub struct TitleMarker {
    css: String,
    selector: Selector,
}

impl TitleMarker {
    pub fn parse(css: &str) -> Result<Self, MarkerError> {
        let selector = Selector::parse(css).map_err(|err| MarkerError::InvalidSelector {
            selector: css.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self {
            css: css.to_string(),
            selector,
        })
    }

    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn find(&self, document: &Html) -> Option<String> {
        document
            .select(&self.selector)
            .next()
            .map(|node| stripped_text(&node))
            .filter(|text| !text.is_empty())
    }
}

/// Scans `<iframe src>` elements whose path ends with the document extension.
#[derive(Debug, Clone)]
pub struct FrameExtractor {
    marker: TitleMarker,
    extension: String,
}

impl FrameExtractor {
    pub fn new(marker: TitleMarker, extension: &str) -> Self {
        Self {
            marker,
            extension: normalize_extension(extension),
        }
    }
}

impl DocumentExtractor for FrameExtractor {
    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::EmbeddedFrame
    }

    fn extract(&self, html: &str, page_url: &Url) -> Extraction {
        let document = Html::parse_document(html);
        let title = self.marker.find(&document);

        let documents = select_all(&document, "iframe[src]")
            .into_iter()
            .filter_map(|frame| {
                let src = frame.value().attr("src")?;
                let (url, filename) = resolve_document(src, page_url, &self.extension)?;
                Some(DocumentDescriptor {
                    url,
                    display_name: title.clone(),
                    filename,
                    source: DocumentSource::EmbeddedFrame,
                })
            })
            .collect();

        Extraction { title, documents }
    }
}

/// Scans `<a href>` elements that point straight at documents.
#[derive(Debug, Clone)]
pub struct AnchorExtractor {
    marker: TitleMarker,
    extension: String,
}

impl AnchorExtractor {
    pub fn new(marker: TitleMarker, extension: &str) -> Self {
        Self {
            marker,
            extension: normalize_extension(extension),
        }
    }
}

impl DocumentExtractor for AnchorExtractor {
    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::Anchor
    }

    fn extract(&self, html: &str, page_url: &Url) -> Extraction {
        let document = Html::parse_document(html);
        let title = self.marker.find(&document);

        let documents = select_all(&document, "a[href]")
            .into_iter()
            .filter_map(|anchor| {
                let href = anchor.value().attr("href")?;
                let (url, filename) = resolve_document(href, page_url, &self.extension)?;
                let text = stripped_text(&anchor);
                let display_name = if text.is_empty() {
                    filename.clone()
                } else {
                    text
                };
                Some(DocumentDescriptor {
                    url,
                    display_name: Some(display_name),
                    filename,
                    source: DocumentSource::Anchor,
                })
            })
            .collect();

        Extraction { title, documents }
    }
}

/// Extractor for the configured strategy.
pub fn build_extractor(
    strategy: ExtractionStrategy,
    marker: TitleMarker,
    extension: &str,
) -> Box<dyn DocumentExtractor> {
    match strategy {
        ExtractionStrategy::EmbeddedFrame => Box::new(FrameExtractor::new(marker, extension)),
        ExtractionStrategy::Anchor => Box::new(AnchorExtractor::new(marker, extension)),
    }
}

fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Absolute URL plus final path segment, if the reference names a document.
fn resolve_document(reference: &str, page_url: &Url, extension: &str) -> Option<(Url, String)> {
    let trimmed = reference.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let url = page_url.join(trimmed).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    if !url.path().to_ascii_lowercase().ends_with(extension) {
        return None;
    }
    let filename = url.path_segments()?.next_back()?.to_string();
    if filename.is_empty() {
        return None;
    }
    Some((url, filename))
}

/// `pdf`, `.pdf` and `PDF` all become `.pdf`.
fn normalize_extension(extension: &str) -> String {
    format!(".{}", extension.trim().trim_start_matches('.').to_ascii_lowercase())
}
