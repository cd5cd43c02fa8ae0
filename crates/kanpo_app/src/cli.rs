use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use kanpo_core::{ExtractionStrategy, PatternStyle, TargetDate};

/// Fetch the day's Official Gazette (官報) PDFs from kanpo.go.jp.
#[derive(Parser, Debug, Clone)]
#[command(name = "kanpo", version, about)]
pub struct Cli {
    /// Issue date to fetch (YYYY-MM-DD); today in Japan when omitted
    #[arg(long)]
    pub date: Option<TargetDate>,

    /// Check document availability with HEAD requests, download nothing
    #[arg(long, visible_alias = "test")]
    pub dry_run: bool,

    /// Root directory; documents land in <OUTPUT_DIR>/<YYYY-MM-DD>/
    #[arg(long, env = "KANPO_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Where document links live on issue pages
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Which date spellings identify an issue link
    #[arg(long, value_enum)]
    pub patterns: Option<PatternsArg>,

    /// Also accept links for the previous calendar day
    #[arg(long)]
    pub previous_day: bool,

    /// Only consider index anchors carrying this class
    #[arg(long, conflicts_with = "no_link_class")]
    pub link_class: Option<String>,

    /// Consider every index anchor regardless of class
    #[arg(long)]
    pub no_link_class: bool,

    /// CSS selector of the date element on issue pages
    #[arg(long)]
    pub title_marker: Option<String>,

    /// RON configuration file; flags take precedence over its values
    #[arg(long, env = "KANPO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also write log records to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Append `kanpou_found` and `pdf_infos` step outputs to this file
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub step_output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// `<iframe src>` viewers
    Frame,
    /// Plain `<a href>` links
    Anchor,
}

impl From<StrategyArg> for ExtractionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Frame => ExtractionStrategy::EmbeddedFrame,
            StrategyArg::Anchor => ExtractionStrategy::Anchor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PatternsArg {
    /// YYYYMMDD only
    Compact,
    /// YYYYMMDD plus Japanese, ISO and month/day spellings
    Localized,
}

impl From<PatternsArg> for PatternStyle {
    fn from(arg: PatternsArg) -> Self {
        match arg {
            PatternsArg::Compact => PatternStyle::Compact,
            PatternsArg::Localized => PatternStyle::Localized,
        }
    }
}
