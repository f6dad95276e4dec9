//! Report encoding
//!
//! This module renders pipeline outcomes for the presentation layer: a JSON
//! report carrying producer metadata, a plain-text summary mirroring the
//! dashboard's status panel, and a CSV export of the recent-days table.

use crate::error::PulseError;
use crate::normalizer::columns;
use crate::pipeline::PipelineOutcome;
use crate::types::{DashboardSnapshot, ScoredEntry, WarningTotals};
use crate::{PRODUCER_NAME, PULSE_VERSION};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use uuid::Uuid;

/// Column headers of the recent-days table
pub const TABLE_COLUMNS: [&str; 10] = [
    "Date",
    "total",
    "health",
    "family",
    "wealth",
    "creation",
    "SleepHours",
    "Steps",
    "KidsMinutes",
    "DeepWorkMinutes",
];

pub const NO_DATA_MESSAGE: &str = "No rows found in the export.";
pub const NO_USABLE_ROWS_MESSAGE: &str =
    "No usable rows after parsing. Confirm your sheet has Date or Timestamp values.";

/// Report producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Pillar breakdown for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarPoint {
    pub date: String,
    pub total: f64,
    pub health: f64,
    pub family: f64,
    pub wealth: f64,
    pub creation: f64,
}

/// One row of the recent-days table.
///
/// Metric columns carry the sheet cell as typed (`7.50` stays `7.50`); blank
/// or missing cells are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(flatten)]
    pub pillars: PillarPoint,
    pub sleep_hours: Option<String>,
    pub steps: Option<String>,
    pub kids_minutes: Option<String>,
    pub deep_work_minutes: Option<String>,
}

impl From<&ScoredEntry> for PillarPoint {
    fn from(scored: &ScoredEntry) -> Self {
        Self {
            date: scored.entry.date.clone(),
            total: scored.scores.total,
            health: scored.scores.health,
            family: scored.scores.family,
            wealth: scored.scores.wealth,
            creation: scored.scores.creation,
        }
    }
}

impl From<&ScoredEntry> for TableRow {
    fn from(scored: &ScoredEntry) -> Self {
        let cell = |column: &str| {
            scored
                .entry
                .cell(column)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        Self {
            pillars: PillarPoint::from(scored),
            sleep_hours: cell(columns::SLEEP_HOURS),
            steps: cell(columns::STEPS),
            kids_minutes: cell(columns::KIDS_MINUTES),
            deep_work_minutes: cell(columns::DEEP_WORK_MINUTES),
        }
    }
}

impl TableRow {
    fn cells(&self) -> [String; 10] {
        let p = &self.pillars;
        [
            p.date.clone(),
            format_number(p.total),
            format_number(p.health),
            format_number(p.family),
            format_number(p.wealth),
            format_number(p.creation),
            self.sleep_hours.clone().unwrap_or_default(),
            self.steps.clone().unwrap_or_default(),
            self.kids_minutes.clone().unwrap_or_default(),
            self.deep_work_minutes.clone().unwrap_or_default(),
        ]
    }
}

/// Dashboard section of a JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub rows: usize,
    pub last_entry: String,
    pub today: PillarPoint,
    pub rolling_average: Option<f64>,
    pub rolling_window: usize,
    pub streak: u32,
    pub warnings: WarningTotals,
    pub warning_window: usize,
    /// Full series for the score chart
    pub dates: Vec<String>,
    pub totals: Vec<f64>,
    pub rolling_series: Vec<f64>,
    /// Trailing pillar series for the pillar chart, oldest first
    pub pillars: Vec<PillarPoint>,
    /// Recent-days table, newest first
    pub recent: Vec<TableRow>,
}

/// Complete JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub producer: ReportProducer,
    pub generated_at_utc: String,
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<DashboardReport>,
}

/// Encoder for dashboard reports
pub struct ReportEncoder {
    instance_id: String,
    table_rows: usize,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
            table_rows: crate::config::DEFAULT_TABLE_ROWS,
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self {
            instance_id,
            ..Self::new()
        }
    }

    /// Number of rows in the recent-days table
    pub fn table_rows(mut self, rows: usize) -> Self {
        self.table_rows = rows;
        self
    }

    /// Build the report structure for an outcome
    pub fn encode(&self, outcome: &PipelineOutcome) -> Report {
        let no_data = || ("no_data", NO_DATA_MESSAGE.to_string(), Some(0), None);

        // a snapshot without entries reports like an empty export
        let (status, message, parsed_rows, dashboard) = match outcome {
            PipelineOutcome::NoData => no_data(),
            PipelineOutcome::NoUsableRows { parsed_rows } => (
                "no_usable_rows",
                NO_USABLE_ROWS_MESSAGE.to_string(),
                Some(*parsed_rows),
                None,
            ),
            PipelineOutcome::Dashboard(snapshot) => match self.build_dashboard(snapshot) {
                Some(dashboard) => (
                    "ok",
                    loaded_message(dashboard.rows, &dashboard.last_entry),
                    None,
                    Some(dashboard),
                ),
                None => no_data(),
            },
        };

        Report {
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: PULSE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            generated_at_utc: Utc::now().to_rfc3339(),
            status: status.to_string(),
            message,
            parsed_rows,
            dashboard,
        }
    }

    /// Encode to a JSON string
    pub fn encode_to_json(&self, outcome: &PipelineOutcome, pretty: bool) -> Result<String, PulseError> {
        let report = self.encode(outcome);
        let json = if pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        Ok(json)
    }

    /// Render the plain-text status panel
    pub fn encode_text(&self, outcome: &PipelineOutcome) -> String {
        let latest = outcome
            .snapshot()
            .and_then(|snapshot| snapshot.latest().map(|today| (snapshot, today)));
        let Some((snapshot, today)) = latest else {
            return match outcome {
                PipelineOutcome::NoUsableRows { .. } => format!("{NO_USABLE_ROWS_MESSAGE}\n"),
                _ => format!("{NO_DATA_MESSAGE}\n"),
            };
        };

        let w = &snapshot.warnings;
        let mut out = String::new();

        // writing into a String cannot fail
        let _ = writeln!(out, "{}", loaded_message(snapshot.entries.len(), today.date()));
        let _ = writeln!(out);
        let _ = writeln!(out, "Today score:  {}", format_number(today.scores.total));
        let _ = writeln!(
            out,
            "{}-day avg:    {}",
            snapshot.rolling_window,
            snapshot
                .latest_average()
                .map_or_else(|| "–".to_string(), format_number)
        );
        let _ = writeln!(out, "Streak:       {} days", snapshot.streak);
        let _ = writeln!(out);
        let _ = writeln!(out, "Health {}/25", format_number(today.scores.health));
        let _ = writeln!(out, "Family {}/25", format_number(today.scores.family));
        let _ = writeln!(out, "Wealth {}/25", format_number(today.scores.wealth));
        let _ = writeln!(out, "Creation {}/25", format_number(today.scores.creation));
        let _ = writeln!(out);
        let _ = writeln!(out, "Warnings (last {} entries)", snapshot.warning_window);
        let _ = writeln!(out, "Low sleep: {}", w.low_sleep);
        let _ = writeln!(out, "Low deep work: {}", w.low_deep);
        let _ = writeln!(out, "Escalations: {}", w.escalation);
        let _ = writeln!(out, "Impulse spends: {}", w.impulse);
        let _ = writeln!(out);

        let rows: Vec<[String; 10]> = self.recent_rows(snapshot).iter().map(TableRow::cells).collect();
        let widths: Vec<usize> = (0..TABLE_COLUMNS.len())
            .map(|i| {
                rows.iter()
                    .map(|r| r[i].chars().count())
                    .chain(std::iter::once(TABLE_COLUMNS[i].len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = TABLE_COLUMNS
            .iter()
            .zip(&widths)
            .map(|(h, &w)| format!("{h:<w$}"))
            .collect();
        let _ = writeln!(out, "{}", header.join("  ").trim_end());
        for row in &rows {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(c, &w)| format!("{c:<w$}"))
                .collect();
            let _ = writeln!(out, "{}", line.join("  ").trim_end());
        }

        out
    }

    /// Write the recent-days table as CSV, newest first
    pub fn encode_csv(&self, snapshot: &DashboardSnapshot) -> Result<String, PulseError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(TABLE_COLUMNS)?;
        for row in self.recent_rows(snapshot) {
            writer.write_record(row.cells())?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| PulseError::EncodingError(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| PulseError::EncodingError(e.to_string()))
    }

    fn recent_rows(&self, snapshot: &DashboardSnapshot) -> Vec<TableRow> {
        snapshot
            .recent_first(self.table_rows)
            .into_iter()
            .map(TableRow::from)
            .collect()
    }

    fn build_dashboard(&self, snapshot: &DashboardSnapshot) -> Option<DashboardReport> {
        let today = snapshot.latest()?;
        Some(DashboardReport {
            rows: snapshot.entries.len(),
            last_entry: today.entry.date.clone(),
            today: PillarPoint::from(today),
            rolling_average: snapshot.latest_average(),
            rolling_window: snapshot.rolling_window,
            streak: snapshot.streak,
            warnings: snapshot.warnings,
            warning_window: snapshot.warning_window,
            dates: snapshot.dates().into_iter().map(str::to_string).collect(),
            totals: snapshot.totals(),
            rolling_series: snapshot.rolling_average.clone(),
            pillars: snapshot
                .trailing(snapshot.warning_window)
                .iter()
                .map(PillarPoint::from)
                .collect(),
            recent: self.recent_rows(snapshot),
        })
    }
}

fn loaded_message(rows: usize, last_entry: &str) -> String {
    format!("Loaded {rows} rows. Last entry: {last_entry}")
}

/// Format like the dashboard does: integers without a fractional part
pub fn format_number(value: f64) -> String {
    format!("{value}")
}
