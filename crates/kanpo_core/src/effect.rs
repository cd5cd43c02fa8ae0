use url::Url;

use crate::types::{DocumentDescriptor, DownloadResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchIndex,
    FetchPage { link: usize, url: Url },
    HandleDocument(DocumentDescriptor),
    WriteManifest(Vec<DownloadResult>),
}
