use serde::{Deserialize, Serialize};

use crate::date::TargetDate;

/// Which textual encodings of a date are searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternStyle {
    /// Only `YYYYMMDD`, as the index page embeds it in issue URLs.
    #[default]
    Compact,
    /// Compact plus Japanese full date, ISO date, month/day forms.
    Localized,
}

/// Ordered, de-duplicated set of literal substrings that stand for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatcher {
    patterns: Vec<String>,
}

impl DateMatcher {
    pub fn new(date: TargetDate, style: PatternStyle) -> Self {
        let mut matcher = Self {
            patterns: Vec::new(),
        };
        matcher.extend(date_patterns(date, style));
        matcher
    }

    /// Also accept the previous calendar day's patterns, after today's.
    pub fn with_previous_day(mut self, date: TargetDate, style: PatternStyle) -> Self {
        if let Some(previous) = date.previous_day() {
            self.extend(date_patterns(previous, style));
        }
        self
    }

    fn extend(&mut self, patterns: Vec<String>) {
        for pattern in patterns {
            if !pattern.is_empty() && !self.patterns.contains(&pattern) {
                self.patterns.push(pattern);
            }
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// First pattern that occurs verbatim in `candidate`.
    pub fn first_match(&self, candidate: &str) -> Option<&str> {
        if candidate.is_empty() {
            return None;
        }
        self.patterns
            .iter()
            .find(|pattern| candidate.contains(pattern.as_str()))
            .map(String::as_str)
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.first_match(candidate).is_some()
    }
}

fn date_patterns(date: TargetDate, style: PatternStyle) -> Vec<String> {
    let (y, m, d) = (date.year(), date.month(), date.day());
    match style {
        PatternStyle::Compact => vec![date.compact()],
        PatternStyle::Localized => vec![
            date.compact(),
            format!("{y:04}年{m:02}月{d:02}日"),
            date.iso(),
            format!("{m:02}月{d:02}日"),
            format!("{m:02}/{d:02}"),
        ],
    }
}
