//! Record normalization
//!
//! This module turns raw header-keyed rows into dated, typed entries:
//! - The date comes from `Date`, then `Timestamp`, then `timestamp`
//! - Rows without a recognisable date are dropped
//! - Entries are sorted by canonical date
//! - Known columns are coerced into typed fields, the rest pass through

use crate::coercion::{coerce_field, to_iso_date};
use crate::types::{DailyEntry, DailyMetrics, HabitIndicators, RawRecord};
use tracing::debug;

/// Columns consulted for the entry date, highest priority first
pub const DATE_COLUMNS: [&str; 3] = ["Date", "Timestamp", "timestamp"];

/// Column names read by the scorer
pub mod columns {
    pub const SLEEP_HOURS: &str = "SleepHours";
    pub const STEPS: &str = "Steps";
    pub const KIDS_MINUTES: &str = "KidsMinutes";
    pub const DEEP_WORK_MINUTES: &str = "DeepWorkMinutes";
    pub const STRENGTH: &str = "StrengthYN";
    pub const PROTEIN: &str = "ProteinYN";
    pub const CALORIES: &str = "CaloriesYN";
    pub const PROACTIVE: &str = "ProactiveYN";
    pub const FOLLOW_THROUGH: &str = "FollowThroughYN";
    pub const NO_ESCALATION: &str = "NoEscalationYN";
    pub const NO_IMPULSE: &str = "NoImpulseYN";
    pub const TRACKED_SPENDING: &str = "TrackedSpendingYN";
    pub const INVEST: &str = "InvestYN";
    pub const SKILL20: &str = "Skill20YN";
    pub const SHIPPED: &str = "ShippedYN";
    pub const BUILD_ARTIFACT: &str = "BuildArtifactYN";
    pub const TOMORROW_ONE_SENTENCE: &str = "TomorrowOneSentenceYN";

    pub const KNOWN: [&str; 17] = [
        SLEEP_HOURS,
        STEPS,
        KIDS_MINUTES,
        DEEP_WORK_MINUTES,
        STRENGTH,
        PROTEIN,
        CALORIES,
        PROACTIVE,
        FOLLOW_THROUGH,
        NO_ESCALATION,
        NO_IMPULSE,
        TRACKED_SPENDING,
        INVEST,
        SKILL20,
        SHIPPED,
        BUILD_ARTIFACT,
        TOMORROW_ONE_SENTENCE,
    ];
}

/// True for columns that are neither a date source nor read by the scorer
pub fn is_passthrough_column(name: &str) -> bool {
    !DATE_COLUMNS.contains(&name) && !columns::KNOWN.contains(&name)
}

/// Normalizer for converting raw rows into daily entries
pub struct Normalizer;

impl Normalizer {
    /// Normalize raw rows into date-sorted entries, dropping undateable rows
    pub fn normalize(rows: &[RawRecord]) -> Vec<DailyEntry> {
        let mut entries: Vec<DailyEntry> = rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| {
                let entry = Self::normalize_row(row);
                if entry.is_none() {
                    debug!(row = index + 1, "dropping row without a usable date");
                }
                entry
            })
            .collect();

        // stable: rows sharing a date keep their sheet order
        entries.sort_by(|a, b| a.date.cmp(&b.date));
        entries
    }

    /// Normalize a single row; `None` when the row cannot be dated
    pub fn normalize_row(row: &RawRecord) -> Option<DailyEntry> {
        let date = to_iso_date(resolve_date_source(row));
        if date.is_empty() {
            return None;
        }

        Some(DailyEntry {
            date,
            metrics: extract_metrics(row),
            habits: extract_habits(row),
            cells: row.clone(),
        })
    }
}

/// First non-empty date column. A non-empty but unparseable `Date` does not
/// fall back to the timestamp columns.
fn resolve_date_source(row: &RawRecord) -> &str {
    DATE_COLUMNS
        .iter()
        .filter_map(|column| row.get(column))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

fn extract_metrics(row: &RawRecord) -> DailyMetrics {
    let field = |name: &str| coerce_field(row.get(name));
    DailyMetrics {
        sleep_hours: field(columns::SLEEP_HOURS),
        steps: field(columns::STEPS),
        kids_minutes: field(columns::KIDS_MINUTES),
        deep_work_minutes: field(columns::DEEP_WORK_MINUTES),
    }
}

fn extract_habits(row: &RawRecord) -> HabitIndicators {
    let field = |name: &str| coerce_field(row.get(name));
    HabitIndicators {
        strength: field(columns::STRENGTH),
        protein: field(columns::PROTEIN),
        calories: field(columns::CALORIES),
        proactive: field(columns::PROACTIVE),
        follow_through: field(columns::FOLLOW_THROUGH),
        no_escalation: field(columns::NO_ESCALATION),
        no_impulse: field(columns::NO_IMPULSE),
        tracked_spending: field(columns::TRACKED_SPENDING),
        invest: field(columns::INVEST),
        skill20: field(columns::SKILL20),
        shipped: field(columns::SHIPPED),
        build_artifact: field(columns::BUILD_ARTIFACT),
        tomorrow_one_sentence: field(columns::TOMORROW_ONE_SENTENCE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_table;

    fn row(pairs: &[(&str, &str)]) -> RawRecord {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_date_priority() {
        let r = row(&[("Date", "1/2/2026"), ("Timestamp", "2026-05-05 10:00")]);
        assert_eq!(Normalizer::normalize_row(&r).unwrap().date, "2026-01-02");

        let r = row(&[("Date", ""), ("Timestamp", "2/3/2026 9:00:00")]);
        assert_eq!(Normalizer::normalize_row(&r).unwrap().date, "2026-02-03");

        let r = row(&[("timestamp", "2026-03-04T12:00:00Z")]);
        assert_eq!(Normalizer::normalize_row(&r).unwrap().date, "2026-03-04");
    }

    #[test]
    fn test_unparseable_date_does_not_fall_back() {
        let r = row(&[("Date", "someday"), ("Timestamp", "2026-05-05")]);
        assert!(Normalizer::normalize_row(&r).is_none());
    }

    #[test]
    fn test_rows_without_date_columns_are_dropped() {
        let table = parse_table("Steps,SleepHours\n8000,7\n9000,8\n");
        assert!(Normalizer::normalize(&table.rows).is_empty());
    }

    #[test]
    fn test_sorted_by_canonical_date() {
        let table = parse_table(
            "Date,Steps\n1/10/2026,3\n2026-01-02,1\n,9\n1/5/2026 8:00,2\n",
        );
        let entries = Normalizer::normalize(&table.rows);

        let dates: Vec<&str> = entries.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-01-02", "2026-01-05", "2026-01-10"]);
        assert_eq!(entries[0].metrics.steps, Some(1.0));
    }

    #[test]
    fn test_passthrough_columns_keep_sheet_order() {
        let table = parse_table("Timestamp,Weather,Steps,Mood,Energy
2026-01-01,rain,100,good,3
");
        let entry = &Normalizer::normalize(&table.rows)[0];

        let names: Vec<&str> = entry.extra().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Weather", "Mood", "Energy"]);
    }

    #[test]
    fn test_typed_fields_and_passthrough() {
        let table = parse_table(
            "Date,SleepHours,Steps,ProteinYN,Mood,Notes\n2026-01-01,7.5,,1,good,\"long, day\"\n",
        );
        let entry = &Normalizer::normalize(&table.rows)[0];

        assert_eq!(entry.metrics.sleep_hours, Some(7.5));
        assert_eq!(entry.metrics.steps, None);
        assert_eq!(entry.metrics.kids_minutes, None);
        assert_eq!(entry.habits.protein, Some(1.0));
        let extra: Vec<(&str, &str)> = entry.extra().collect();
        assert_eq!(extra, vec![("Mood", "good"), ("Notes", "long, day")]);
        assert_eq!(entry.cell("SleepHours"), Some("7.5"));
    }
}
