//! Pillar scoring
//!
//! Maps one daily entry to four pillar sub-scores (health, family, wealth,
//! creation) and a total out of 100, plus independent warning flags.
//!
//! Measured quantities go through fixed non-linear band tables; yes/no habits
//! contribute `value × weight`. Both are hand-tuned constants reproduced as-is.

use crate::types::{DailyEntry, PillarScores, ScoredEntry, WarningFlags};

/// Maximum points per pillar
pub const PILLAR_MAX: f64 = 25.0;

/// One scoring band: `lower <= x < upper` (or `<= upper` when inclusive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub lower: f64,
    pub upper: f64,
    pub upper_inclusive: bool,
    pub points: f64,
}

impl Band {
    const fn at_least(lower: f64, points: f64) -> Self {
        Self {
            lower,
            upper: f64::INFINITY,
            upper_inclusive: true,
            points,
        }
    }

    const fn half_open(lower: f64, upper: f64, points: f64) -> Self {
        Self {
            lower,
            upper,
            upper_inclusive: false,
            points,
        }
    }

    const fn closed(lower: f64, upper: f64, points: f64) -> Self {
        Self {
            lower,
            upper,
            upper_inclusive: true,
            points,
        }
    }

    fn contains(&self, x: f64) -> bool {
        let below_upper = if self.upper_inclusive {
            x <= self.upper
        } else {
            x < self.upper
        };
        x >= self.lower && below_upper
    }
}

/// Sleep hours: 7–8.5 is ideal, oversleeping earns nothing
pub const SLEEP_BANDS: [Band; 3] = [
    Band::closed(7.0, 8.5, 8.0),
    Band::half_open(6.0, 7.0, 6.0),
    Band::half_open(5.0, 6.0, 3.0),
];

pub const STEPS_BANDS: [Band; 3] = [
    Band::at_least(10_000.0, 6.0),
    Band::at_least(7_000.0, 4.0),
    Band::at_least(4_000.0, 2.0),
];

pub const KIDS_BANDS: [Band; 4] = [
    Band::at_least(60.0, 10.0),
    Band::at_least(30.0, 7.0),
    Band::at_least(15.0, 4.0),
    Band::at_least(1.0, 2.0),
];

pub const DEEP_WORK_BANDS: [Band; 4] = [
    Band::at_least(120.0, 10.0),
    Band::at_least(60.0, 7.0),
    Band::at_least(30.0, 4.0),
    Band::at_least(1.0, 2.0),
];

/// Habit weights (points awarded for a value of 1)
pub mod weights {
    pub const STRENGTH: f64 = 4.0;
    pub const PROTEIN: f64 = 3.0;
    pub const CALORIES: f64 = 4.0;

    pub const PROACTIVE: f64 = 5.0;
    pub const FOLLOW_THROUGH: f64 = 5.0;
    pub const NO_ESCALATION: f64 = 5.0;

    pub const NO_IMPULSE: f64 = 8.0;
    pub const TRACKED_SPENDING: f64 = 5.0;
    pub const INVEST: f64 = 7.0;
    pub const SKILL20: f64 = 5.0;

    pub const SHIPPED: f64 = 7.0;
    pub const BUILD_ARTIFACT: f64 = 5.0;
    pub const TOMORROW_ONE_SENTENCE: f64 = 3.0;
}

/// Flag thresholds
pub const LOW_SLEEP_HOURS: f64 = 6.0;
pub const LOW_DEEP_WORK_MINUTES: f64 = 30.0;

/// Points for the first band containing `x`, else 0
pub fn band_points(bands: &[Band], x: f64) -> f64 {
    bands
        .iter()
        .find(|band| band.contains(x))
        .map_or(0.0, |band| band.points)
}

pub fn sleep_pts(hours: f64) -> f64 {
    band_points(&SLEEP_BANDS, hours)
}

pub fn steps_pts(steps: f64) -> f64 {
    band_points(&STEPS_BANDS, steps)
}

pub fn kids_pts(minutes: f64) -> f64 {
    band_points(&KIDS_BANDS, minutes)
}

pub fn deep_pts(minutes: f64) -> f64 {
    band_points(&DEEP_WORK_BANDS, minutes)
}

/// Scorer for computing pillar scores and warning flags
pub struct Scorer;

impl Scorer {
    /// Score an entry. Never fails: absent fields count as 0.
    pub fn score(entry: DailyEntry) -> ScoredEntry {
        let scores = Self::pillars(&entry);
        let flags = Self::flags(&entry);
        ScoredEntry {
            entry,
            scores,
            flags,
        }
    }

    pub fn pillars(entry: &DailyEntry) -> PillarScores {
        let m = &entry.metrics;
        let h = &entry.habits;
        let v = |x: Option<f64>| x.unwrap_or(0.0);

        let health = sleep_pts(v(m.sleep_hours))
            + steps_pts(v(m.steps))
            + v(h.strength) * weights::STRENGTH
            + v(h.protein) * weights::PROTEIN
            + v(h.calories) * weights::CALORIES;

        let family = kids_pts(v(m.kids_minutes))
            + v(h.proactive) * weights::PROACTIVE
            + v(h.follow_through) * weights::FOLLOW_THROUGH
            + v(h.no_escalation) * weights::NO_ESCALATION;

        let wealth = v(h.no_impulse) * weights::NO_IMPULSE
            + v(h.tracked_spending) * weights::TRACKED_SPENDING
            + v(h.invest) * weights::INVEST
            + v(h.skill20) * weights::SKILL20;

        let creation = deep_pts(v(m.deep_work_minutes))
            + v(h.shipped) * weights::SHIPPED
            + v(h.build_artifact) * weights::BUILD_ARTIFACT
            + v(h.tomorrow_one_sentence) * weights::TOMORROW_ONE_SENTENCE;

        PillarScores {
            health,
            family,
            wealth,
            creation,
            total: health + family + wealth + creation,
        }
    }

    pub fn flags(entry: &DailyEntry) -> WarningFlags {
        let m = &entry.metrics;
        let h = &entry.habits;
        let v = |x: Option<f64>| x.unwrap_or(0.0);
        let bit = |cond: bool| u8::from(cond);

        WarningFlags {
            low_sleep: bit(v(m.sleep_hours) < LOW_SLEEP_HOURS),
            low_deep: bit(v(m.deep_work_minutes) < LOW_DEEP_WORK_MINUTES),
            escalation: bit(v(h.no_escalation) == 0.0),
            impulse: bit(v(h.no_impulse) == 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DailyMetrics, HabitIndicators};
    use pretty_assertions::assert_eq;

    fn perfect_day() -> DailyEntry {
        let mut entry = DailyEntry::dated("2026-01-01");
        entry.metrics = DailyMetrics {
            sleep_hours: Some(8.0),
            steps: Some(12_000.0),
            kids_minutes: Some(90.0),
            deep_work_minutes: Some(150.0),
        };
        entry.habits = HabitIndicators {
            strength: Some(1.0),
            protein: Some(1.0),
            calories: Some(1.0),
            proactive: Some(1.0),
            follow_through: Some(1.0),
            no_escalation: Some(1.0),
            no_impulse: Some(1.0),
            tracked_spending: Some(1.0),
            invest: Some(1.0),
            skill20: Some(1.0),
            shipped: Some(1.0),
            build_artifact: Some(1.0),
            tomorrow_one_sentence: Some(1.0),
        };
        entry
    }

    #[test]
    fn test_sleep_band_edges() {
        assert_eq!(sleep_pts(4.9), 0.0);
        assert_eq!(sleep_pts(5.0), 3.0);
        assert_eq!(sleep_pts(5.9), 3.0);
        assert_eq!(sleep_pts(6.0), 6.0);
        assert_eq!(sleep_pts(6.9), 6.0);
        assert_eq!(sleep_pts(7.0), 8.0);
        assert_eq!(sleep_pts(8.5), 8.0);
        assert_eq!(sleep_pts(8.6), 0.0);
    }

    #[test]
    fn test_sleep_band_gap_between_revisions() {
        // Half-open [6, 7): values between 6.9 and 7 still earn 6, not 0.
        assert_eq!(sleep_pts(6.95), 6.0);
        assert_eq!(sleep_pts(6.999), 6.0);
    }

    #[test]
    fn test_steps_band_edges() {
        assert_eq!(steps_pts(3_999.0), 0.0);
        assert_eq!(steps_pts(4_000.0), 2.0);
        assert_eq!(steps_pts(6_999.0), 2.0);
        assert_eq!(steps_pts(7_000.0), 4.0);
        assert_eq!(steps_pts(9_999.0), 4.0);
        assert_eq!(steps_pts(10_000.0), 6.0);
    }

    #[test]
    fn test_kids_and_deep_bands() {
        assert_eq!(kids_pts(0.0), 0.0);
        assert_eq!(kids_pts(0.5), 0.0);
        assert_eq!(kids_pts(1.0), 2.0);
        assert_eq!(kids_pts(15.0), 4.0);
        assert_eq!(kids_pts(30.0), 7.0);
        assert_eq!(kids_pts(60.0), 10.0);

        assert_eq!(deep_pts(29.0), 2.0);
        assert_eq!(deep_pts(30.0), 4.0);
        assert_eq!(deep_pts(60.0), 7.0);
        assert_eq!(deep_pts(119.0), 7.0);
        assert_eq!(deep_pts(120.0), 10.0);
    }

    #[test]
    fn test_perfect_day_scores_100() {
        let scored = Scorer::score(perfect_day());

        assert_eq!(
            scored.scores,
            PillarScores {
                health: 25.0,
                family: 25.0,
                wealth: 25.0,
                creation: 25.0,
                total: 100.0,
            }
        );
        assert_eq!(scored.flags, WarningFlags::default());
    }

    #[test]
    fn test_empty_day_scores_zero_and_raises_all_flags() {
        let scored = Scorer::score(DailyEntry::dated("2026-01-01"));

        assert_eq!(scored.scores, PillarScores::default());
        assert_eq!(
            scored.flags,
            WarningFlags {
                low_sleep: 1,
                low_deep: 1,
                escalation: 1,
                impulse: 1,
            }
        );
    }

    #[test]
    fn test_pillars_stay_in_bounds_for_binary_habits() {
        let sleeps = [0.0, 5.5, 6.5, 7.5, 9.0];
        let minutes = [0.0, 10.0, 45.0, 200.0];
        for (i, sleep) in sleeps.iter().enumerate() {
            for (j, mins) in minutes.iter().enumerate() {
                let mut entry = perfect_day();
                entry.metrics.sleep_hours = Some(*sleep);
                entry.metrics.kids_minutes = Some(*mins);
                entry.metrics.deep_work_minutes = Some(*mins);
                entry.habits.protein = Some(((i + j) % 2) as f64);
                entry.habits.invest = Some((j % 2) as f64);

                let s = Scorer::pillars(&entry);
                for pillar in [s.health, s.family, s.wealth, s.creation] {
                    assert!((0.0..=PILLAR_MAX).contains(&pillar));
                }
                assert_eq!(s.total, s.health + s.family + s.wealth + s.creation);
            }
        }
    }

    #[test]
    fn test_habits_are_multiplied_without_clamping() {
        let mut entry = DailyEntry::dated("2026-01-01");
        entry.habits.shipped = Some(2.0);
        assert_eq!(Scorer::pillars(&entry).creation, 14.0);
    }

    #[test]
    fn test_flag_thresholds() {
        let mut entry = DailyEntry::dated("2026-01-01");
        entry.metrics.sleep_hours = Some(6.0);
        entry.metrics.deep_work_minutes = Some(29.0);
        entry.habits.no_escalation = Some(1.0);
        entry.habits.no_impulse = Some(0.0);

        let flags = Scorer::flags(&entry);
        assert_eq!(flags.low_sleep, 0);
        assert_eq!(flags.low_deep, 1);
        assert_eq!(flags.escalation, 0);
        assert_eq!(flags.impulse, 1);
    }
}
