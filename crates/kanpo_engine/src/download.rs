use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use kanpo_core::{DocumentDescriptor, DownloadResult, RunMode};
use kanpo_logging::{kanpo_debug, kanpo_info, kanpo_warn};

use crate::fetch::{map_reqwest_error, HttpClient};
use crate::filename::sanitize_filename;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("write failed: {0}")]
    Persist(#[from] PersistError),
}

/// Retrieves single documents, one attempt each.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: HttpClient,
    extension: String,
}

impl Downloader {
    pub fn new(client: HttpClient, extension: &str) -> Self {
        Self {
            client,
            extension: extension.trim().trim_start_matches('.').to_string(),
        }
    }

    /// Name the document gets inside the run directory.
    pub fn local_filename(&self, descriptor: &DocumentDescriptor) -> String {
        sanitize_filename(&descriptor.filename, &self.extension)
    }

    /// Dry-run or full download, per `mode`.
    pub async fn handle(
        &self,
        descriptor: &DocumentDescriptor,
        target_dir: &Path,
        mode: RunMode,
    ) -> DownloadResult {
        match mode {
            RunMode::DryRun => {
                let succeeded = self.verify(descriptor).await;
                DownloadResult {
                    descriptor: descriptor.clone(),
                    succeeded,
                    local_path: None,
                }
            }
            RunMode::Download => self.fetch(descriptor, target_dir).await,
        }
    }

    /// Header-only reachability check.
    pub async fn verify(&self, descriptor: &DocumentDescriptor) -> bool {
        kanpo_info!("Verifying {} ({})", descriptor.label(), descriptor.url);
        match self.client.probe(&descriptor.url).await {
            Ok(info) => {
                kanpo_info!(
                    "  reachable: status={} size={} type={}",
                    info.status,
                    info.content_length
                        .map(|len| format!("{len} bytes"))
                        .unwrap_or_else(|| "unknown".to_string()),
                    info.content_type.as_deref().unwrap_or("unknown")
                );
                true
            }
            Err(err) => {
                kanpo_warn!("  verification failed for {}: {}", descriptor.url, err);
                false
            }
        }
    }

    /// Stream the document into `target_dir`. The final name only appears
    /// once the whole body has arrived.
    pub async fn fetch(&self, descriptor: &DocumentDescriptor, target_dir: &Path) -> DownloadResult {
        kanpo_info!("Downloading {} ({})", descriptor.label(), descriptor.url);
        match self.try_fetch(descriptor, target_dir).await {
            Ok((path, bytes)) => {
                kanpo_info!("  saved {} ({} bytes)", path.display(), bytes);
                DownloadResult {
                    descriptor: descriptor.clone(),
                    succeeded: true,
                    local_path: Some(path),
                }
            }
            Err(err) => {
                kanpo_warn!("  download failed for {}: {}", descriptor.url, err);
                DownloadResult::failed(descriptor.clone())
            }
        }
    }

    async fn try_fetch(
        &self,
        descriptor: &DocumentDescriptor,
        target_dir: &Path,
    ) -> Result<(PathBuf, u64), DownloadError> {
        let response = self.client.open(&descriptor.url).await?;
        let writer = AtomicFileWriter::new(target_dir.to_path_buf());
        let mut pending = writer.begin(&self.local_filename(descriptor))?;
        kanpo_debug!("  streaming into {}", pending.target().display());

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            pending.write_chunk(&chunk)?;
        }

        let bytes = pending.bytes_written();
        let path = pending.commit()?;
        Ok((path, bytes))
    }
}
