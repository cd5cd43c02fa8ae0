//! Kanpo core: date matching, link discovery, document extraction and the
//! pure fetch pipeline state machine. Nothing in here touches the network or
//! the filesystem.
mod date;
mod discovery;
mod effect;
mod extract;
mod matcher;
mod msg;
mod state;
mod types;
mod update;

pub use date::{DateError, TargetDate, JST_OFFSET_SECS};
pub use discovery::{Discovery, LinkDiscovery, UNMATCHED_SAMPLE_LIMIT};
pub use effect::Effect;
pub use extract::{
    build_extractor, AnchorExtractor, DocumentExtractor, Extraction, ExtractionStrategy,
    FrameExtractor, MarkerError, TitleMarker, DEFAULT_TITLE_MARKER, NESTED_TITLE_MARKER,
};
pub use matcher::{DateMatcher, PatternStyle};
pub use msg::Msg;
pub use state::{Phase, RunState};
pub use types::{
    DiscoveredLink, DocumentDescriptor, DocumentSource, DownloadResult, RunMode, RunOutcome,
};
pub use update::update;
