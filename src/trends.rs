//! Trend aggregation
//!
//! Statistics over the date-sorted series of scored entries: a trailing rolling
//! average of totals, the current consecutive-day streak and warning counts
//! over a trailing window.

use crate::types::{ScoredEntry, WarningTotals};
use chrono::NaiveDate;

/// Default rolling average window in entries
pub const DEFAULT_ROLLING_WINDOW: usize = 7;

/// Default warning aggregation window in entries
pub const DEFAULT_WARNING_WINDOW: usize = 14;

/// Trailing rolling average, one value per input, rounded to one decimal.
///
/// The window narrows near the start instead of padding.
pub fn rolling_avg(values: &[f64], window_size: usize) -> Vec<f64> {
    let window_size = window_size.max(1);
    (0..values.len())
        .map(|index| {
            let start = (index + 1).saturating_sub(window_size);
            let window = &values[start..=index];
            let mean = window.iter().sum::<f64>() / window.len() as f64;
            round_tenths(mean)
        })
        .collect()
}

/// Round half-up on the tenths digit
fn round_tenths(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// True when `current` is exactly one calendar day after `previous`
pub fn is_consecutive(previous: &str, current: &str) -> bool {
    match (parse_date(previous), parse_date(current)) {
        (Some(a), Some(b)) => (b - a).num_days() == 1,
        _ => false,
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Number of consecutive days ending at the last date.
///
/// `dates` must be ascending canonical dates. Empty input yields 0.
pub fn calc_streak<S: AsRef<str>>(dates: &[S]) -> u32 {
    if dates.is_empty() {
        return 0;
    }

    let consecutive = dates
        .windows(2)
        .rev()
        .take_while(|pair| is_consecutive(pair[0].as_ref(), pair[1].as_ref()))
        .count();

    1 + consecutive as u32
}

impl WarningTotals {
    /// Sum warning flags over the last `window` entries
    pub fn over_trailing(entries: &[ScoredEntry], window: usize) -> Self {
        let start = entries.len().saturating_sub(window);
        entries[start..]
            .iter()
            .fold(WarningTotals::default(), |mut totals, scored| {
                totals.low_sleep += u32::from(scored.flags.low_sleep);
                totals.low_deep += u32::from(scored.flags.low_deep);
                totals.escalation += u32::from(scored.flags.escalation);
                totals.impulse += u32::from(scored.flags.impulse);
                totals
            })
    }
}
