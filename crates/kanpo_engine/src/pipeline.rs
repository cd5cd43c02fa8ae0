use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use kanpo_core::{
    build_extractor, update, DateMatcher, DocumentDescriptor, DocumentExtractor, DownloadResult,
    Effect, LinkDiscovery, MarkerError, Msg, Phase, RunOutcome, RunState, TargetDate, TitleMarker,
};
use kanpo_logging::{kanpo_debug, kanpo_error, kanpo_info, kanpo_warn};
use url::Url;

use crate::config::EngineConfig;
use crate::download::Downloader;
use crate::fetch::HttpClient;
use crate::manifest::ManifestWriter;
use crate::FetchError;

/// Faults outside the run's own failure handling: bad configuration or a
/// client that cannot be built. Never produced by remote content.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid index url {url:?}: {message}")]
    InvalidIndexUrl { url: String, message: String },
    #[error(transparent)]
    Marker(#[from] MarkerError),
    #[error("http client setup failed: {0}")]
    Client(#[from] FetchError),
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub phase: Phase,
    pub run_dir: PathBuf,
    pub manifest_path: Option<PathBuf>,
    pub attempted: usize,
    pub failed: usize,
}

/// Drives the core state machine, executing each effect in turn.
pub struct FetchPipeline {
    config: EngineConfig,
    index_url: Url,
    client: HttpClient,
    discovery: LinkDiscovery,
    extractor: Box<dyn DocumentExtractor>,
    downloader: Downloader,
    manifest: ManifestWriter,
}

impl FetchPipeline {
    pub fn new(config: EngineConfig) -> Result<Self, PipelineError> {
        let index_url = index_url(&config)?;
        let client = HttpClient::new(config.fetch.clone())?;
        let marker = TitleMarker::parse(&config.title_marker)?;
        let extractor = build_extractor(config.strategy, marker, &config.extension);
        let downloader = Downloader::new(client.clone(), &config.extension);
        Ok(Self {
            discovery: LinkDiscovery::new(config.link_class.clone()),
            manifest: ManifestWriter::new(&config.manifest_prefix),
            index_url,
            client,
            extractor,
            downloader,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn index_url(&self) -> &Url {
        &self.index_url
    }

    pub fn run_dir(&self, date: TargetDate) -> PathBuf {
        self.config.output_root.join(date.iso())
    }

    pub fn matcher(&self, date: TargetDate) -> DateMatcher {
        let matcher = DateMatcher::new(date, self.config.patterns);
        if self.config.include_previous_day {
            matcher.with_previous_day(date, self.config.patterns)
        } else {
            matcher
        }
    }

    /// One complete run for `date`. Remote and filesystem failures end up in
    /// the report, never as an error.
    pub async fn run(&self, date: TargetDate) -> RunReport {
        let ctx = RunContext {
            date,
            matcher: self.matcher(date),
            run_dir: self.run_dir(date),
        };
        kanpo_info!(
            "Starting run for {} (mode={:?}, strategy={:?})",
            date,
            self.config.mode,
            self.extractor.strategy()
        );
        kanpo_debug!("Date patterns: {:?}", ctx.matcher.patterns());

        let (mut state, effects) = update(RunState::new(), Msg::Start);
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            let msg = self.execute(&state, &ctx, effect).await;
            let (next, effects) = update(state, msg);
            state = next;
            queue.extend(effects);
        }

        self.report(&state, ctx.run_dir)
    }

    async fn execute(&self, state: &RunState, ctx: &RunContext, effect: Effect) -> Msg {
        match effect {
            Effect::FetchIndex => self.fetch_index(ctx).await,
            Effect::FetchPage { link, url } => {
                let total = state.links().len();
                if let Some(found) = state.links().get(link) {
                    kanpo_info!("Processing link {}/{}: {}", link + 1, total, found.display_text);
                }
                self.fetch_page(link, &url).await
            }
            Effect::HandleDocument(descriptor) => self.handle_document(ctx, &descriptor).await,
            Effect::WriteManifest(results) => self.write_manifest(ctx, &results),
        }
    }

    async fn fetch_index(&self, ctx: &RunContext) -> Msg {
        kanpo_info!("Fetching index page {}", self.index_url);
        let page = match self.client.fetch_page(&self.index_url).await {
            Ok(page) => page,
            Err(err) => {
                kanpo_error!("Index page unavailable: {}", err);
                return Msg::IndexUnavailable {
                    reason: err.to_string(),
                };
            }
        };
        kanpo_debug!("Index page: {} bytes, {}", page.byte_len, page.encoding);

        let discovery = self
            .discovery
            .discover(&page.html, &page.final_url, &ctx.matcher);
        for link in &discovery.links {
            kanpo_info!(
                "  found {} -> {} (pattern {})",
                link.display_text,
                link.url,
                link.matched_pattern
            );
        }
        if discovery.links.is_empty() {
            kanpo_warn!(
                "No link for {} among {} candidate(s) (class filter: {:?})",
                ctx.date,
                discovery.candidates,
                self.discovery.class_filter()
            );
            for (i, text) in discovery.unmatched_sample.iter().enumerate() {
                kanpo_info!("    {}. {}", i + 1, text);
            }
        }
        Msg::IndexLoaded(discovery.links)
    }

    async fn fetch_page(&self, link: usize, url: &Url) -> Msg {
        let page = match self.client.fetch_page(url).await {
            Ok(page) => page,
            Err(err) => {
                kanpo_warn!("Sub-page {} unavailable: {}", url, err);
                return Msg::PageUnavailable {
                    link,
                    reason: err.to_string(),
                };
            }
        };

        let extraction = self.extractor.extract(&page.html, &page.final_url);
        match &extraction.title {
            Some(title) => kanpo_info!("  issue date: {}", title),
            None => kanpo_warn!("  no title marker ({}) on {}", self.config.title_marker, url),
        }
        for document in &extraction.documents {
            kanpo_info!("  document ({}): {}", document.source, document.filename);
        }
        kanpo_info!("  {} document(s) on this page", extraction.documents.len());
        Msg::PageLoaded {
            link,
            documents: extraction.documents,
        }
    }

    async fn handle_document(&self, ctx: &RunContext, descriptor: &DocumentDescriptor) -> Msg {
        let result = self
            .downloader
            .handle(descriptor, &ctx.run_dir, self.config.mode)
            .await;
        if !self.config.download_pause.is_zero() {
            tokio::time::sleep(self.config.download_pause).await;
        }
        Msg::DocumentHandled(result)
    }

    fn write_manifest(&self, ctx: &RunContext, results: &[DownloadResult]) -> Msg {
        match self
            .manifest
            .write(&ctx.run_dir, ctx.date, self.config.mode, results)
        {
            Ok(path) => {
                kanpo_info!("Manifest written: {}", path.display());
                Msg::ManifestWritten(path)
            }
            Err(err) => {
                kanpo_error!("Manifest not written to {}: {}", ctx.run_dir.display(), err);
                Msg::ManifestFailed {
                    reason: err.to_string(),
                }
            }
        }
    }

    fn report(&self, state: &RunState, run_dir: PathBuf) -> RunReport {
        let outcome = state.outcome();
        match state.phase() {
            Phase::ManifestWritten | Phase::ManifestFailed => kanpo_info!(
                "Retrieved {} document(s) into {}",
                outcome.documents.len(),
                run_dir.display()
            ),
            Phase::NoIndex => kanpo_warn!("Run ended: index page unavailable"),
            Phase::NoLinks => kanpo_warn!("Run ended: no issue links for the target date"),
            Phase::NoDocuments => kanpo_warn!(
                "Run ended: no documents retrieved ({} attempted, {} failed)",
                state.attempted(),
                state.failed()
            ),
            other => kanpo_error!("Run stopped in non-terminal phase {:?}", other),
        }
        RunReport {
            outcome,
            phase: state.phase(),
            manifest_path: state.manifest_path().map(Path::to_path_buf),
            attempted: state.attempted(),
            failed: state.failed(),
            run_dir,
        }
    }
}

struct RunContext {
    date: TargetDate,
    matcher: DateMatcher,
    run_dir: PathBuf,
}

fn index_url(config: &EngineConfig) -> Result<Url, PipelineError> {
    let invalid = |message: String| PipelineError::InvalidIndexUrl {
        url: format!("{}{}", config.base_url, config.index_path),
        message,
    };
    let base = Url::parse(&config.base_url).map_err(|err| invalid(err.to_string()))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", base.scheme())));
    }
    base.join(&config.index_path)
        .map_err(|err| invalid(err.to_string()))
}
