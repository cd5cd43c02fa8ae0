use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use kanpo_core::{ExtractionStrategy, PatternStyle, RunMode};
use kanpo_engine::EngineConfig;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Contents of a `--config` file. Every field is optional; missing ones keep
/// the engine defaults.
///
/// ```ron
/// (
///     output_dir: Some("archive/kanpo"),
///     patterns: Some(localized),
///     download_pause_ms: Some(2000),
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub base_url: Option<String>,
    pub index_path: Option<String>,
    /// An empty string disables the class filter.
    pub link_class: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub strategy: Option<ExtractionStrategy>,
    pub patterns: Option<PatternStyle>,
    pub include_previous_day: Option<bool>,
    pub title_marker: Option<String>,
    pub manifest_prefix: Option<String>,
    pub download_pause_ms: Option<u64>,
    pub dry_run: Option<bool>,
    pub user_agent: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub page_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
    pub redirect_limit: Option<usize>,
    pub max_page_bytes: Option<u64>,
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        ron::from_str(&content).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// File values over engine defaults, then flags over both.
    pub fn into_engine_config(self, cli: &Cli) -> EngineConfig {
        let mut config = EngineConfig::default();

        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(index_path) = self.index_path {
            config.index_path = index_path;
        }
        if let Some(class) = self.link_class {
            config.link_class = non_empty(class);
        }
        if let Some(dir) = self.output_dir {
            config.output_root = dir;
        }
        if let Some(extension) = self.extension {
            config.extension = extension;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(patterns) = self.patterns {
            config.patterns = patterns;
        }
        if let Some(previous) = self.include_previous_day {
            config.include_previous_day = previous;
        }
        if let Some(marker) = self.title_marker {
            config.title_marker = marker;
        }
        if let Some(prefix) = self.manifest_prefix {
            config.manifest_prefix = prefix;
        }
        if let Some(ms) = self.download_pause_ms {
            config.download_pause = Duration::from_millis(ms);
        }
        if self.dry_run == Some(true) {
            config.mode = RunMode::DryRun;
        }
        if let Some(agent) = self.user_agent {
            config.fetch.user_agent = agent;
        }
        if let Some(secs) = self.connect_timeout_secs {
            config.fetch.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.page_timeout_secs {
            config.fetch.page_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.read_timeout_secs {
            config.fetch.read_timeout = Duration::from_secs(secs);
        }
        if let Some(limit) = self.redirect_limit {
            config.fetch.redirect_limit = limit;
        }
        if let Some(bytes) = self.max_page_bytes {
            config.fetch.max_page_bytes = bytes;
        }

        apply_flags(&mut config, cli);
        config
    }
}

fn apply_flags(config: &mut EngineConfig, cli: &Cli) {
    if cli.dry_run {
        config.mode = RunMode::DryRun;
    }
    if let Some(dir) = &cli.output_dir {
        config.output_root = dir.clone();
    }
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy.into();
    }
    if let Some(patterns) = cli.patterns {
        config.patterns = patterns.into();
    }
    if cli.previous_day {
        config.include_previous_day = true;
    }
    if cli.no_link_class {
        config.link_class = None;
    } else if let Some(class) = &cli.link_class {
        config.link_class = non_empty(class.clone());
    }
    if let Some(marker) = &cli.title_marker {
        config.title_marker = marker.clone();
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["kanpo"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn empty_file_keeps_defaults() {
        let config: AppConfig = ron::from_str("()").unwrap();
        assert_eq!(config, AppConfig::default());

        let engine = config.into_engine_config(&cli(&[]));
        assert_eq!(engine.base_url, "https://www.kanpo.go.jp");
        assert_eq!(engine.link_class.as_deref(), Some("pdfDlb"));
        assert_eq!(engine.output_root, PathBuf::from("kanpo"));
        assert_eq!(engine.download_pause, Duration::from_secs(1));
        assert_eq!(engine.mode, RunMode::Download);
    }

    #[test]
    fn file_values_are_applied() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kanpo.ron");
        fs::write(
            &path,
            r#"(
                output_dir: Some("archive"),
                link_class: Some(""),
                strategy: Some(anchor),
                patterns: Some(localized),
                download_pause_ms: Some(250),
                page_timeout_secs: Some(3),
            )"#,
        )
        .unwrap();

        let engine = AppConfig::load(&path).unwrap().into_engine_config(&cli(&[]));
        assert_eq!(engine.output_root, PathBuf::from("archive"));
        assert_eq!(engine.link_class, None);
        assert_eq!(engine.strategy, ExtractionStrategy::Anchor);
        assert_eq!(engine.patterns, PatternStyle::Localized);
        assert_eq!(engine.download_pause, Duration::from_millis(250));
        assert_eq!(engine.fetch.page_timeout, Duration::from_secs(3));
    }

    #[test]
    fn flags_override_file() {
        let file = AppConfig {
            output_dir: Some(PathBuf::from("from-file")),
            strategy: Some(ExtractionStrategy::Anchor),
            ..AppConfig::default()
        };
        let engine = file.into_engine_config(&cli(&[
            "--output-dir",
            "from-flag",
            "--strategy",
            "frame",
            "--dry-run",
            "--no-link-class",
        ]));
        assert_eq!(engine.output_root, PathBuf::from("from-flag"));
        assert_eq!(engine.strategy, ExtractionStrategy::EmbeddedFrame);
        assert_eq!(engine.mode, RunMode::DryRun);
        assert_eq!(engine.link_class, None);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kanpo.ron");
        fs::write(&path, "(output: Some(\"x\"))").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(AppConfig::load(&temp.path().join("absent.ron")).is_err());
    }
}
