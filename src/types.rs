//! Core types for the Pulse pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: raw header-keyed rows, normalized daily entries, scored entries and
//! the dashboard snapshot handed to the presentation layer.

use crate::normalizer::is_passthrough_column;
use serde::{Deserialize, Serialize};

/// One data row keyed by header name.
///
/// Keys keep the header order of the export. A repeated header name keeps its
/// first position but takes the later cell value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing the value of an existing key in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Output of the tabular parser
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRecord>,
}

impl ParsedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Measured quantities read from the log.
///
/// `None` means the column is missing or the cell is blank. Scoring treats
/// `None` as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyMetrics {
    /// Hours slept (`SleepHours`)
    pub sleep_hours: Option<f64>,
    /// Step count (`Steps`)
    pub steps: Option<f64>,
    /// Minutes spent with the kids (`KidsMinutes`)
    pub kids_minutes: Option<f64>,
    /// Focused work minutes (`DeepWorkMinutes`)
    pub deep_work_minutes: Option<f64>,
}

/// Binary yes/no habit columns (`*YN`).
///
/// Values are expected to be 0 or 1 but are kept as read; scoring multiplies
/// them by their weight without clamping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitIndicators {
    pub strength: Option<f64>,
    pub protein: Option<f64>,
    pub calories: Option<f64>,
    pub proactive: Option<f64>,
    pub follow_through: Option<f64>,
    pub no_escalation: Option<f64>,
    pub no_impulse: Option<f64>,
    pub tracked_spending: Option<f64>,
    pub invest: Option<f64>,
    pub skill20: Option<f64>,
    pub shipped: Option<f64>,
    pub build_artifact: Option<f64>,
    pub tomorrow_one_sentence: Option<f64>,
}

/// A dated log row with typed known fields and the cells it was read from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    /// Canonical `YYYY-MM-DD` date, never empty
    pub date: String,
    pub metrics: DailyMetrics,
    pub habits: HabitIndicators,
    /// The source row verbatim, in sheet column order
    pub cells: RawRecord,
}

impl DailyEntry {
    /// Entry with only a date set; every other field is absent
    pub fn dated(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            metrics: DailyMetrics::default(),
            habits: HabitIndicators::default(),
            cells: RawRecord::new(),
        }
    }

    /// Sheet cell as read, before coercion
    pub fn cell(&self, column: &str) -> Option<&str> {
        self.cells.get(column)
    }

    /// Columns the scorer does not read, in sheet order
    pub fn extra(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().filter(|(key, _)| is_passthrough_column(key))
    }
}

/// The four pillar sub-scores and their sum
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PillarScores {
    pub health: f64,
    pub family: f64,
    pub wealth: f64,
    pub creation: f64,
    pub total: f64,
}

/// Per-day warning flags, each 0 or 1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningFlags {
    pub low_sleep: u8,
    pub low_deep: u8,
    pub escalation: u8,
    pub impulse: u8,
}

/// Warning flag counts summed over a trailing window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningTotals {
    pub low_sleep: u32,
    pub low_deep: u32,
    pub escalation: u32,
    pub impulse: u32,
}

/// A daily entry with its scores and warning flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntry {
    pub entry: DailyEntry,
    pub scores: PillarScores,
    pub flags: WarningFlags,
}

impl ScoredEntry {
    pub fn date(&self) -> &str {
        &self.entry.date
    }

    pub fn total(&self) -> f64 {
        self.scores.total
    }
}

/// Everything the presentation layer needs from one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Scored entries in ascending date order; the pipeline never emits an
    /// empty snapshot
    pub entries: Vec<ScoredEntry>,
    /// Rolling average of totals, aligned by index with `entries`
    pub rolling_average: Vec<f64>,
    /// Window used for `rolling_average`
    pub rolling_window: usize,
    /// Consecutive days ending at the latest entry
    pub streak: u32,
    /// Warning counts over the trailing window
    pub warnings: WarningTotals,
    /// Window used for `warnings`
    pub warning_window: usize,
}

impl DashboardSnapshot {
    /// Most recent entry, `None` for a hand-built or deserialized empty
    /// snapshot
    pub fn latest(&self) -> Option<&ScoredEntry> {
        self.entries.last()
    }

    /// Rolling average at the latest entry
    pub fn latest_average(&self) -> Option<f64> {
        self.rolling_average.last().copied()
    }

    /// Last `n` entries, oldest first
    pub fn trailing(&self, n: usize) -> &[ScoredEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Last `n` entries, newest first
    pub fn recent_first(&self, n: usize) -> Vec<&ScoredEntry> {
        self.trailing(n).iter().rev().collect()
    }

    pub fn dates(&self) -> Vec<&str> {
        self.entries.iter().map(ScoredEntry::date).collect()
    }

    pub fn totals(&self) -> Vec<f64> {
        self.entries.iter().map(ScoredEntry::total).collect()
    }
}
