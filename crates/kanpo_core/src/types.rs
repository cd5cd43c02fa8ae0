use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

/// An index-page anchor whose text or target matched a date pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredLink {
    pub url: Url,
    pub display_text: String,
    pub matched_pattern: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    Anchor,
    EmbeddedFrame,
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::Anchor => write!(f, "anchor"),
            DocumentSource::EmbeddedFrame => write!(f, "iframe"),
        }
    }
}

/// One downloadable document found on a sub-page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentDescriptor {
    pub url: Url,
    pub display_name: Option<String>,
    /// Last segment of the URL path, unsanitized.
    pub filename: String,
    pub source: DocumentSource,
}

impl DocumentDescriptor {
    /// Display name for reports; falls back to the filename.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.filename)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadResult {
    pub descriptor: DocumentDescriptor,
    pub succeeded: bool,
    /// Where the body landed. Absent for dry runs and failures.
    pub local_path: Option<PathBuf>,
}

impl DownloadResult {
    pub fn failed(descriptor: DocumentDescriptor) -> Self {
        Self {
            descriptor,
            succeeded: false,
            local_path: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Confirm reachability with header-only requests, persist no documents.
    DryRun,
    #[default]
    Download,
}

impl RunMode {
    pub fn is_dry_run(self) -> bool {
        matches!(self, RunMode::DryRun)
    }
}

/// Final value of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RunOutcome {
    pub found: bool,
    /// Successfully handled documents, in processing order.
    pub documents: Vec<DownloadResult>,
}

impl RunOutcome {
    pub fn not_found() -> Self {
        Self::default()
    }
}
