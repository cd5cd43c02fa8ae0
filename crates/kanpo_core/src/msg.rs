use std::path::PathBuf;

use crate::types::{DiscoveredLink, DocumentDescriptor, DownloadResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Begin the run.
    Start,
    /// Index page fetched and scanned.
    IndexLoaded(Vec<DiscoveredLink>),
    /// Index page could not be fetched.
    IndexUnavailable { reason: String },
    /// Sub-page `link` fetched and its documents extracted.
    PageLoaded {
        link: usize,
        documents: Vec<DocumentDescriptor>,
    },
    /// Sub-page `link` could not be fetched.
    PageUnavailable { link: usize, reason: String },
    /// One download (or dry-run verification) attempt finished.
    DocumentHandled(DownloadResult),
    ManifestWritten(PathBuf),
    ManifestFailed { reason: String },
}
