use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use kanpo_core::{DocumentSource, RunOutcome};
use kanpo_logging::kanpo_info;
use serde::Serialize;

/// One `pdf_infos` entry.
#[derive(Debug, Serialize)]
struct PdfInfo<'a> {
    url: &'a str,
    name: &'a str,
    filename: &'a str,
    source: DocumentSource,
    local_path: Option<&'a Path>,
}

/// `key=value` lines describing the outcome, one per output.
pub fn render(outcome: &RunOutcome) -> anyhow::Result<String> {
    let infos: Vec<PdfInfo> = outcome
        .documents
        .iter()
        .map(|result| PdfInfo {
            url: result.descriptor.url.as_str(),
            name: result.descriptor.label(),
            filename: &result.descriptor.filename,
            source: result.descriptor.source,
            local_path: result.local_path.as_deref(),
        })
        .collect();
    let json = serde_json::to_string(&infos).context("serializing pdf_infos")?;
    Ok(format!("kanpou_found={}\npdf_infos={}\n", outcome.found, json))
}

/// Append the outputs to `path`, or note that there is nowhere to put them.
pub fn emit(path: Option<&PathBuf>, outcome: &RunOutcome) -> anyhow::Result<()> {
    let Some(path) = path else {
        kanpo_info!("No step output file configured, skipping kanpou_found/pdf_infos");
        return Ok(());
    };
    let content = render(outcome)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening step output file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("writing step output file {}", path.display()))?;
    kanpo_info!("Step outputs appended to {}", path.display());
    Ok(())
}
