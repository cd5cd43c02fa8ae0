use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use url::Url;

use crate::types::{DiscoveredLink, DocumentDescriptor, DownloadResult, RunOutcome};

/// Last milestone a run has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Init,
    LinksDiscovered,
    /// Documents of sub-page `link` are being handled.
    DocsExtracted { link: usize },
    /// Every document of sub-page `link` has been attempted.
    DocsDownloaded { link: usize },
    ManifestWritten,
    /// Documents were retrieved but the manifest could not be written.
    ManifestFailed,
    NoIndex,
    NoLinks,
    NoDocuments,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Phase::ManifestWritten
                | Phase::ManifestFailed
                | Phase::NoIndex
                | Phase::NoLinks
                | Phase::NoDocuments
        )
    }

    pub fn is_success(self) -> bool {
        matches!(self, Phase::ManifestWritten | Phase::ManifestFailed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Awaiting {
    #[default]
    Nothing,
    Index,
    Page(usize),
    Document,
    Manifest,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunState {
    phase: Phase,
    awaiting: Awaiting,
    links: Vec<DiscoveredLink>,
    current_link: usize,
    pending: VecDeque<DocumentDescriptor>,
    in_flight: Option<DocumentDescriptor>,
    seen_urls: HashSet<Url>,
    completed: Vec<DownloadResult>,
    attempted: usize,
    failed: usize,
    duplicates: usize,
    manifest_path: Option<PathBuf>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn links(&self) -> &[DiscoveredLink] {
        &self.links
    }

    /// Successful results so far, in attempt order.
    pub fn completed(&self) -> &[DownloadResult] {
        &self.completed
    }

    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Documents skipped because their URL was already queued in this run.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn manifest_path(&self) -> Option<&Path> {
        self.manifest_path.as_deref()
    }

    pub fn outcome(&self) -> RunOutcome {
        if self.phase.is_success() {
            RunOutcome {
                found: true,
                documents: self.completed.clone(),
            }
        } else {
            RunOutcome::not_found()
        }
    }

    pub(crate) fn awaiting(&self) -> Awaiting {
        self.awaiting
    }

    pub(crate) fn expect_index(&mut self) {
        self.awaiting = Awaiting::Index;
    }

    pub(crate) fn finish(&mut self, phase: Phase) {
        self.phase = phase;
        self.awaiting = Awaiting::Nothing;
    }

    pub(crate) fn set_links(&mut self, links: Vec<DiscoveredLink>) {
        self.links = links;
        self.phase = Phase::LinksDiscovered;
    }

    pub(crate) fn in_flight(&self) -> Option<&DocumentDescriptor> {
        self.in_flight.as_ref()
    }

    /// Queue documents for the current link, skipping URLs already seen.
    pub(crate) fn queue_documents(&mut self, documents: Vec<DocumentDescriptor>) {
        for document in documents {
            if self.seen_urls.insert(document.url.clone()) {
                self.pending.push_back(document);
            } else {
                self.duplicates += 1;
            }
        }
    }

    pub(crate) fn record(&mut self, result: DownloadResult) {
        self.in_flight = None;
        self.attempted += 1;
        if result.succeeded {
            self.completed.push(result);
        } else {
            self.failed += 1;
        }
    }

    pub(crate) fn set_manifest_path(&mut self, path: PathBuf) {
        self.manifest_path = Some(path);
    }

    /// Request sub-page `link`.
    pub(crate) fn request_page(&mut self, link: usize) -> Option<(usize, Url)> {
        let url = self.links.get(link)?.url.clone();
        self.current_link = link;
        self.awaiting = Awaiting::Page(link);
        Some((link, url))
    }

    /// Next document of the current link, if any.
    pub(crate) fn next_document(&mut self) -> Option<DocumentDescriptor> {
        let next = self.pending.pop_front()?;
        self.in_flight = Some(next.clone());
        self.awaiting = Awaiting::Document;
        self.phase = Phase::DocsExtracted {
            link: self.current_link,
        };
        Some(next)
    }

    pub(crate) fn current_link(&self) -> usize {
        self.current_link
    }

    pub(crate) fn mark_link_done(&mut self) {
        self.phase = Phase::DocsDownloaded {
            link: self.current_link,
        };
    }

    pub(crate) fn expect_manifest(&mut self) {
        self.awaiting = Awaiting::Manifest;
    }
}
