use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::collision::CollisionEstimate;
use crate::errors::GenerationError;

/// Options for a fixture generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Directory where both datasets and the run report are written.
    pub out_dir: PathBuf,
    /// File name of the subject (client) dataset.
    pub subject_file: String,
    /// File name of the watchlist (server) dataset.
    pub watchlist_file: String,
    /// Total subject records, anchor included.
    pub subject_count: u64,
    /// Total watchlist records, anchor included.
    pub watchlist_count: u64,
    /// Place the shared anchor record at row 0 of both datasets.
    pub include_anchor: bool,
    /// Seed for the random source; drawn from the OS when absent.
    pub seed: Option<u64>,
    /// Earliest year of birth (from January 1st).
    pub start_year: i32,
    /// Latest year of birth (through December 31st).
    pub end_year: i32,
    /// Probability that a watchlist record carries an alias.
    pub alias_probability: f64,
    /// Collision probability above which the run logs a sizing warning.
    pub max_collision_probability: f64,
    /// Optional directory with pool overrides (one value per line).
    pub assets_dir: Option<PathBuf>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            subject_file: "client_data_large.csv".to_string(),
            watchlist_file: "server_data_large.csv".to_string(),
            subject_count: 1000,
            watchlist_count: 1000,
            include_anchor: true,
            seed: None,
            start_year: 1940,
            end_year: 2005,
            alias_probability: 0.1,
            max_collision_probability: 0.05,
            assets_dir: None,
        }
    }
}

impl GenerateOptions {
    /// Check everything that can be rejected before generation starts.
    pub fn validate(&self) -> Result<(), GenerationError> {
        self.date_range()?;
        self.policy()?;
        check_probability("max_collision_probability", self.max_collision_probability)?;
        if self.subject_file.trim().is_empty() {
            return Err(GenerationError::InvalidOptions(
                "subject_file must not be empty".to_string(),
            ));
        }
        if self.watchlist_file.trim().is_empty() {
            return Err(GenerationError::InvalidOptions(
                "watchlist_file must not be empty".to_string(),
            ));
        }
        if self.subject_file == self.watchlist_file {
            return Err(GenerationError::InvalidOptions(
                "subject_file and watchlist_file must differ".to_string(),
            ));
        }
        Ok(())
    }

    pub fn date_range(&self) -> Result<DateRange, GenerationError> {
        DateRange::new(self.start_year, self.end_year)
    }

    pub fn policy(&self) -> Result<GenerationPolicy, GenerationError> {
        GenerationPolicy::new(self.date_range()?, self.alias_probability)
    }

    pub fn subject_path(&self) -> PathBuf {
        self.out_dir.join(&self.subject_file)
    }

    pub fn watchlist_path(&self) -> PathBuf {
        self.out_dir.join(&self.watchlist_file)
    }

    pub fn report_path(&self) -> PathBuf {
        self.out_dir.join("generation_report.json")
    }
}

/// Inclusive range of calendar days, from January 1st of the first year to
/// December 31st of the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    earliest: NaiveDate,
    latest: NaiveDate,
}

impl DateRange {
    pub fn new(start_year: i32, end_year: i32) -> Result<Self, GenerationError> {
        if start_year > end_year {
            return Err(GenerationError::InvalidOptions(format!(
                "start_year {start_year} is after end_year {end_year}"
            )));
        }
        let earliest = NaiveDate::from_ymd_opt(start_year, 1, 1).ok_or_else(|| {
            GenerationError::InvalidOptions(format!("start_year {start_year} is out of range"))
        })?;
        let latest = NaiveDate::from_ymd_opt(end_year, 12, 31).ok_or_else(|| {
            GenerationError::InvalidOptions(format!("end_year {end_year} is out of range"))
        })?;
        Ok(Self { earliest, latest })
    }

    pub fn earliest(&self) -> NaiveDate {
        self.earliest
    }

    pub fn latest(&self) -> NaiveDate {
        self.latest
    }

    /// Days between the bounds; valid offsets are `0..=span_days`.
    pub fn span_days(&self) -> u64 {
        (self.latest - self.earliest).num_days().unsigned_abs()
    }

    /// Number of distinct representable dates.
    pub fn day_count(&self) -> u64 {
        self.span_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.earliest <= date && date <= self.latest
    }
}

/// Constants that drive record synthesis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationPolicy {
    pub date_range: DateRange,
    pub alias_probability: f64,
}

impl GenerationPolicy {
    pub fn new(date_range: DateRange, alias_probability: f64) -> Result<Self, GenerationError> {
        check_probability("alias_probability", alias_probability)?;
        Ok(Self {
            date_range,
            alias_probability,
        })
    }
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        let options = GenerateOptions::default();
        let earliest = NaiveDate::from_ymd_opt(options.start_year, 1, 1).unwrap_or_default();
        let latest = NaiveDate::from_ymd_opt(options.end_year, 12, 31).unwrap_or_default();
        Self {
            date_range: DateRange { earliest, latest },
            alias_probability: options.alias_probability,
        }
    }
}

fn check_probability(name: &str, value: f64) -> Result<(), GenerationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GenerationError::InvalidOptions(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

/// Summary of one written dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub rows: u64,
    pub bytes_written: u64,
    pub sha256: String,
    /// Row 0 holds the anchor record.
    pub anchored: bool,
}

/// Report for a generation run, persisted as `generation_report.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    /// Absent when the caller supplied its own random source.
    pub seed: Option<u64>,
    /// Both datasets carry the anchor at row 0.
    pub anchor_included: bool,
    pub subjects: FileReport,
    pub watchlist: FileReport,
    pub collision: CollisionEstimate,
    /// Distinct (name, date_of_birth, country) triples present in both files.
    pub observed_matches: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    /// Matches beyond the designed anchor.
    pub fn accidental_matches(&self) -> u64 {
        if self.anchor_included {
            self.observed_matches.saturating_sub(1)
        } else {
            self.observed_matches
        }
    }
}
