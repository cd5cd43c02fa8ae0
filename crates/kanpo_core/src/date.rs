use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Japan Standard Time, the zone the gazette is published in.
pub const JST_OFFSET_SECS: i32 = 9 * 3600;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DateError {
    #[error("invalid date {input:?}, expected YYYY-MM-DD (e.g. 2025-07-03)")]
    Invalid { input: String },
    #[error("invalid utc offset of {0} seconds")]
    Offset(i32),
}

/// Calendar day a run is looking for. Fixed for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetDate(NaiveDate);

impl TargetDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Current calendar day at the given UTC offset.
    pub fn today_at(offset_secs: i32) -> Result<Self, DateError> {
        let offset = FixedOffset::east_opt(offset_secs).ok_or(DateError::Offset(offset_secs))?;
        Ok(Self(Utc::now().with_timezone(&offset).date_naive()))
    }

    /// Current calendar day in Japan.
    pub fn today_jst() -> Result<Self, DateError> {
        Self::today_at(JST_OFFSET_SECS)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn previous_day(&self) -> Option<Self> {
        self.0.checked_sub_days(Days::new(1)).map(Self)
    }

    /// `YYYYMMDD`, the form the site embeds in its issue URLs.
    pub fn compact(&self) -> String {
        format!("{:04}{:02}{:02}", self.year(), self.month(), self.day())
    }

    /// `YYYY-MM-DD`, used for the run directory and manifest name.
    pub fn iso(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

impl fmt::Display for TargetDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iso())
    }
}

impl FromStr for TargetDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DateError::Invalid {
                input: s.to_string(),
            })
    }
}
