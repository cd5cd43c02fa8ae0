use std::path::PathBuf;
use std::time::Duration;

use kanpo_core::{ExtractionStrategy, PatternStyle, RunMode, DEFAULT_TITLE_MARKER};

use crate::fetch::FetchSettings;
use crate::manifest::DEFAULT_MANIFEST_PREFIX;

pub const DEFAULT_BASE_URL: &str = "https://www.kanpo.go.jp";
pub const DEFAULT_INDEX_PATH: &str = "/index.html";
pub const DEFAULT_LINK_CLASS: &str = "pdfDlb";
pub const DEFAULT_EXTENSION: &str = "pdf";

/// Everything a pipeline needs, constructed up front and owned by it.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub base_url: String,
    pub index_path: String,
    /// Only anchors carrying this class are considered on the index page.
    pub link_class: Option<String>,
    /// Run directories are created as `{output_root}/{YYYY-MM-DD}`.
    pub output_root: PathBuf,
    pub extension: String,
    pub strategy: ExtractionStrategy,
    pub patterns: PatternStyle,
    pub include_previous_day: bool,
    /// CSS selector of the date/title element on sub-pages.
    pub title_marker: String,
    pub manifest_prefix: String,
    /// Pause after every document attempt.
    pub download_pause: Duration,
    pub mode: RunMode,
    pub fetch: FetchSettings,
}

impl EngineConfig {
    pub fn default_with_output(output_root: PathBuf) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            index_path: DEFAULT_INDEX_PATH.to_string(),
            link_class: Some(DEFAULT_LINK_CLASS.to_string()),
            output_root,
            extension: DEFAULT_EXTENSION.to_string(),
            strategy: ExtractionStrategy::default(),
            patterns: PatternStyle::default(),
            include_previous_day: false,
            title_marker: DEFAULT_TITLE_MARKER.to_string(),
            manifest_prefix: DEFAULT_MANIFEST_PREFIX.to_string(),
            download_pause: Duration::from_secs(1),
            mode: RunMode::default(),
            fetch: FetchSettings::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::default_with_output(PathBuf::from("kanpo"))
    }
}
