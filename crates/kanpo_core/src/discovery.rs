use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::matcher::DateMatcher;
use crate::types::DiscoveredLink;

/// How many leading candidates are sampled when nothing matched.
pub const UNMATCHED_SAMPLE_LIMIT: usize = 10;

/// Result of scanning an index page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Discovery {
    pub links: Vec<DiscoveredLink>,
    /// Number of anchors that passed the class filter.
    pub candidates: usize,
    /// Texts of the first candidates, filled only when `links` is empty.
    /// Advisory output for operators.
    pub unmatched_sample: Vec<String>,
}

/// Finds the anchors on an index page that point at the target date's issues.
#[derive(Debug, Clone, Default)]
pub struct LinkDiscovery {
    class_filter: Option<String>,
}

impl LinkDiscovery {
    pub fn new(class_filter: Option<String>) -> Self {
        let class_filter = class_filter.filter(|c| !c.trim().is_empty());
        Self { class_filter }
    }

    pub fn class_filter(&self) -> Option<&str> {
        self.class_filter.as_deref()
    }

    pub fn discover(&self, html: &str, page_url: &Url, matcher: &DateMatcher) -> Discovery {
        let document = Html::parse_document(html);
        self.discover_in(&document, page_url, matcher)
    }

    pub fn discover_in(&self, document: &Html, page_url: &Url, matcher: &DateMatcher) -> Discovery {
        let candidates: Vec<ElementRef> = anchors(document)
            .into_iter()
            .filter(|anchor| self.is_eligible(anchor))
            .collect();

        let mut links = Vec::new();
        for anchor in &candidates {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let text = stripped_text(anchor);
            // Text first, then the raw href.
            let Some(pattern) = matcher
                .first_match(&text)
                .or_else(|| matcher.first_match(href))
            else {
                continue;
            };
            if let Ok(url) = page_url.join(href.trim()) {
                links.push(DiscoveredLink {
                    url,
                    display_text: text,
                    matched_pattern: pattern.to_string(),
                });
            }
        }

        let unmatched_sample = if links.is_empty() {
            candidates
                .iter()
                .take(UNMATCHED_SAMPLE_LIMIT)
                .map(stripped_text)
                .filter(|text| text.chars().count() > 3)
                .collect()
        } else {
            Vec::new()
        };

        Discovery {
            links,
            candidates: candidates.len(),
            unmatched_sample,
        }
    }

    fn is_eligible(&self, anchor: &ElementRef) -> bool {
        match &self.class_filter {
            Some(class) => anchor.value().classes().any(|c| c == class),
            None => true,
        }
    }
}

fn anchors(document: &Html) -> Vec<ElementRef<'_>> {
    match Selector::parse("a[href]") {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Concatenation of the element's text nodes, each trimmed, empties dropped.
pub(crate) fn stripped_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}
