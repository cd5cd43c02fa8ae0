//! Kanpo engine: HTTP, filesystem and the pipeline driver that executes the
//! core state machine's effects.
mod config;
mod decode;
mod download;
mod fetch;
mod filename;
mod manifest;
mod persist;
mod pipeline;
mod types;

pub use config::{
    EngineConfig, DEFAULT_BASE_URL, DEFAULT_EXTENSION, DEFAULT_INDEX_PATH, DEFAULT_LINK_CLASS,
};
pub use decode::{decode_html, DecodedHtml};
pub use download::{DownloadError, Downloader};
pub use fetch::{FetchSettings, FetchedPage, HttpClient, ProbeInfo, DEFAULT_USER_AGENT};
pub use filename::sanitize_filename;
pub use manifest::{ManifestError, ManifestWriter, DEFAULT_MANIFEST_PREFIX};
pub use persist::{ensure_output_dir, AtomicFileWriter, PendingFile, PersistError};
pub use pipeline::{FetchPipeline, PipelineError, RunReport};
pub use types::{FailureKind, FetchError};
