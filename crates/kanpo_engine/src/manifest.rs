use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use kanpo_core::{DownloadResult, RunMode, TargetDate};

use crate::persist::{AtomicFileWriter, PersistError};

pub const DEFAULT_MANIFEST_PREFIX: &str = "官報_";

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("no retrieved documents to record")]
    Empty,
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Human-readable record of one run's retrieved documents.
#[derive(Debug, Clone)]
pub struct ManifestWriter {
    prefix: String,
}

impl Default for ManifestWriter {
    fn default() -> Self {
        Self::new(DEFAULT_MANIFEST_PREFIX)
    }
}

impl ManifestWriter {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    pub fn filename(&self, date: TargetDate) -> String {
        format!("{}{}.md", self.prefix, date.iso())
    }

    /// Markdown body. Contains no wall-clock time, so reruns over the same
    /// content produce the same bytes.
    pub fn render(&self, date: TargetDate, mode: RunMode, results: &[DownloadResult]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# 官報 {}", date.iso());
        out.push('\n');
        let _ = writeln!(
            out,
            "テストモード: {}",
            if mode.is_dry_run() { "有効" } else { "無効" }
        );
        let _ = writeln!(out, "件数: {}", results.len());
        out.push('\n');
        out.push_str("## ダウンロードファイル\n\n");
        for result in results {
            let descriptor = &result.descriptor;
            let _ = writeln!(out, "- [{}]({})", descriptor.label(), entry_filename(result));
            let _ = writeln!(out, "  - URL: {}", descriptor.url);
        }
        out
    }

    /// Rewrite `{dir}/{prefix}{date}.md`. Refuses to write an empty manifest.
    pub fn write(
        &self,
        dir: &Path,
        date: TargetDate,
        mode: RunMode,
        results: &[DownloadResult],
    ) -> Result<PathBuf, ManifestError> {
        if results.is_empty() {
            return Err(ManifestError::Empty);
        }
        let content = self.render(date, mode, results);
        let writer = AtomicFileWriter::new(dir.to_path_buf());
        Ok(writer.write(&self.filename(date), &content)?)
    }
}

/// Name of the file on disk; dry runs have none and fall back to the
/// descriptor's own filename.
fn entry_filename(result: &DownloadResult) -> String {
    result
        .local_path
        .as_deref()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| result.descriptor.filename.clone())
}
