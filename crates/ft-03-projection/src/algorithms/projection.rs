//! # Replacement Projection
//!
//! Mines completed install/uninstall pairs for per-cohort lifespans and
//! forecasts the next replacement of every installed unit.
//!
//! ## Numeric Rules
//!
//! - Durations are whole calendar days (`uninstall - install`).
//! - Non-positive durations are data-entry anomalies and are discarded.
//! - Means are rounded half-up, so identical input always gives identical
//!   forecasts.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use shared_types::{StageStamp, UnitRecord, UnitState};
use tracing::{debug, warn};

use crate::domain::{
    CohortKey, DurationSample, Forecast, ProjectionResult, ProjectionStats, UNASSIGNED_CLIENT,
};

/// Integer mean rounded half-up. Zero for an empty set.
pub fn round_half_up(sum: i64, count: i64) -> i64 {
    if count <= 0 {
        return 0;
    }
    (2 * sum + count).div_euclid(2 * count)
}

/// Cohort a record belongs to.
pub fn cohort_of(record: &UnitRecord) -> CohortKey {
    CohortKey {
        client: record
            .client
            .as_ref()
            .map(|c| c.key())
            .unwrap_or_else(|| UNASSIGNED_CLIENT.to_string()),
        reference: record.reference.clone(),
    }
}

/// Calendar date read from one stage stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StampDate {
    Missing,
    Unparsable,
    Date(NaiveDate),
}

fn stamp_date(record: &UnitRecord, stage: UnitState) -> StampDate {
    match record.stamp(stage) {
        None => StampDate::Missing,
        Some(StageStamp { date, .. }) if date.trim().is_empty() => StampDate::Missing,
        Some(stamp) => stamp
            .calendar_date()
            .map_or(StampDate::Unparsable, StampDate::Date),
    }
}

/// `start + days`, or `None` when the result leaves chrono's range.
fn add_days(start: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|d| start.checked_add_signed(d))
}

/// One sample per UNINSTALLED record with two valid dates.
pub fn collect_samples(records: &[UnitRecord]) -> Vec<DurationSample> {
    let mut samples = Vec::new();
    for record in records.iter().filter(|r| r.state == UnitState::Uninstalled) {
        let dates = (
            stamp_date(record, UnitState::Installed),
            stamp_date(record, UnitState::Uninstalled),
        );
        let (installed, removed) = match dates {
            (StampDate::Date(installed), StampDate::Date(removed)) => (installed, removed),
            (StampDate::Unparsable, _) | (_, StampDate::Unparsable) => {
                warn!(id = %record.id, key = %record.key(), "[ft-03] skipping record with unparsable date");
                continue;
            }
            _ => continue,
        };

        let days = (removed - installed).num_days();
        if days <= 0 {
            debug!(id = %record.id, days, "[ft-03] discarding non-positive duration");
            continue;
        }
        samples.push(DurationSample {
            cohort: cohort_of(record),
            days,
        });
    }
    samples
}

/// Rounded mean duration per cohort.
pub fn cohort_means(samples: &[DurationSample]) -> BTreeMap<CohortKey, i64> {
    let mut sums: BTreeMap<CohortKey, (i64, i64)> = BTreeMap::new();
    for sample in samples {
        let entry = sums.entry(sample.cohort.clone()).or_insert((0, 0));
        entry.0 += sample.days;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(cohort, (sum, count))| (cohort, round_half_up(sum, count)))
        .collect()
}

/// Forecasts for every INSTALLED record, earliest replacement first.
pub fn forecast(
    records: &[UnitRecord],
    means: &BTreeMap<CohortKey, i64>,
    default_days: i64,
) -> Vec<Forecast> {
    let mut forecasts = Vec::new();
    for record in records.iter().filter(|r| r.state == UnitState::Installed) {
        let installed_on = match stamp_date(record, UnitState::Installed) {
            StampDate::Date(date) => date,
            StampDate::Missing => continue,
            StampDate::Unparsable => {
                warn!(id = %record.id, key = %record.key(), "[ft-03] skipping record with unparsable date");
                continue;
            }
        };

        let historical = means.get(&cohort_of(record)).copied();
        let mean = historical.unwrap_or(default_days);
        let Some(estimated) = add_days(installed_on, mean) else {
            warn!(id = %record.id, mean, "[ft-03] replacement date out of range");
            continue;
        };

        forecasts.push(Forecast {
            client: record
                .client
                .as_ref()
                .map(|c| c.to_string())
                .unwrap_or_else(|| UNASSIGNED_CLIENT.to_string()),
            reference: record.reference.clone(),
            serial: record.serial.clone(),
            plate: record.plate.clone(),
            installed_on,
            mean_duration_days: mean,
            estimated_replacement: estimated,
            from_history: historical.is_some(),
        });
    }
    forecasts.sort_by_key(|f| f.estimated_replacement);
    forecasts
}

/// Full projection over `records`.
pub fn project(records: &[UnitRecord], default_days: i64) -> ProjectionResult {
    let samples = collect_samples(records);
    let means = cohort_means(&samples);
    let forecasts = forecast(records, &means, default_days);

    let sum: i64 = samples.iter().map(|s| s.days).sum();
    let stats = ProjectionStats {
        total_samples: samples.len(),
        overall_mean_days: round_half_up(sum, samples.len() as i64),
        forecast_count: forecasts.len(),
    };
    ProjectionResult { forecasts, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shared_types::{ClientName, RecordId};

    fn record(
        id: u64,
        client: &str,
        reference: &str,
        state: UnitState,
        installed: Option<&str>,
        removed: Option<&str>,
    ) -> UnitRecord {
        UnitRecord {
            id: RecordId(id),
            reference: reference.into(),
            serial: format!("S{}", id),
            state,
            client: ClientName::parse(client),
            actor_plant: None,
            actor_dispatch: None,
            actor_install: None,
            actor_uninstall: None,
            plate: Some(format!("P{}", id)),
            installer_name: None,
            odometer_install: None,
            odometer_uninstall: None,
            stored_at: None,
            dispatched_at: None,
            installed_at: installed.map(|d| StageStamp::new(d, "09:00:00")),
            uninstalled_at: removed.map(|d| StageStamp::new(d, "09:00:00")),
        }
    }

    fn day(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(0, 0), 0);
        assert_eq!(round_half_up(181, 2), 91);
        assert_eq!(round_half_up(180, 2), 90);
        assert_eq!(round_half_up(10, 3), 3);
        assert_eq!(round_half_up(11, 3), 4);
    }

    #[test]
    fn test_single_pair_gives_ninety_days() {
        let records = vec![
            record(1, "ClientA", "REF1", UnitState::Uninstalled, Some("01/01/2024"), Some("31/03/2024")),
            record(2, "CLIENTA", "REF1", UnitState::Installed, Some("10/04/2024"), None),
        ];
        let result = project(&records, 90);

        assert_eq!(result.stats.total_samples, 1);
        assert_eq!(result.stats.overall_mean_days, 90);
        assert_eq!(result.forecasts.len(), 1);
        let f = &result.forecasts[0];
        assert_eq!(f.mean_duration_days, 90);
        assert!(f.from_history);
        assert_eq!(f.estimated_replacement, day(9, 7, 2024));
    }

    #[test]
    fn test_default_when_no_history() {
        let records = vec![
            record(1, "ClientA", "REF1", UnitState::Uninstalled, Some("01/01/2024"), Some("11/01/2024")),
            record(2, "ClientA", "REF2", UnitState::Installed, Some("01/02/2024"), None),
            record(3, "ClientB", "REF1", UnitState::Installed, Some("01/02/2024"), None),
        ];
        let result = project(&records, 90);
        for f in &result.forecasts {
            assert_eq!(f.mean_duration_days, 90);
            assert!(!f.from_history);
            assert_eq!(f.estimated_replacement, day(1, 5, 2024));
        }
        assert_eq!(result.stats.forecast_count, 2);
    }

    #[test]
    fn test_bucket_mean_and_overall_mean() {
        let records = vec![
            record(1, "A", "R", UnitState::Uninstalled, Some("01/01/2024"), Some("11/01/2024")),
            record(2, "A", "R", UnitState::Uninstalled, Some("01/01/2024"), Some("12/01/2024")),
            record(3, "B", "R", UnitState::Uninstalled, Some("01/01/2024"), Some("31/01/2024")),
        ];
        let samples = collect_samples(&records);
        let means = cohort_means(&samples);
        let a = CohortKey {
            client: "A".into(),
            reference: "R".into(),
        };
        // (10 + 11) / 2 = 10.5 rounds up
        assert_eq!(means[&a], 11);
        // (10 + 11 + 30) / 3 = 17
        assert_eq!(project(&records, 90).stats.overall_mean_days, 17);
    }

    #[test]
    fn test_anomalies_and_bad_dates_are_skipped() {
        let records = vec![
            record(1, "A", "R", UnitState::Uninstalled, Some("10/01/2024"), Some("10/01/2024")),
            record(2, "A", "R", UnitState::Uninstalled, Some("10/01/2024"), Some("01/01/2024")),
            record(3, "A", "R", UnitState::Uninstalled, Some("bad"), Some("01/02/2024")),
            record(4, "A", "R", UnitState::Uninstalled, None, Some("01/02/2024")),
            record(5, "A", "R", UnitState::Installed, Some("99/99/2024"), None),
            record(6, "A", "R", UnitState::Installed, None, None),
        ];
        let result = project(&records, 90);
        assert_eq!(result.stats.total_samples, 0);
        assert_eq!(result.stats.overall_mean_days, 0);
        assert!(result.forecasts.is_empty());
    }

    #[test]
    fn test_unassigned_bucket() {
        let records = vec![
            record(1, "", "R", UnitState::Uninstalled, Some("01/01/2024"), Some("21/01/2024")),
            record(2, "", "R", UnitState::Installed, Some("01/03/2024"), None),
        ];
        let result = project(&records, 90);
        assert_eq!(result.forecasts[0].client, UNASSIGNED_CLIENT);
        assert_eq!(result.forecasts[0].mean_duration_days, 20);
    }

    #[test]
    fn test_forecasts_sorted_ascending() {
        let records = vec![
            record(1, "A", "R", UnitState::Installed, Some("01/06/2024"), None),
            record(2, "A", "R", UnitState::Installed, Some("01/01/2024"), None),
            record(3, "A", "R", UnitState::Installed, Some("01/03/2024"), None),
        ];
        let serials: Vec<String> = project(&records, 30)
            .forecasts
            .into_iter()
            .map(|f| f.serial)
            .collect();
        assert_eq!(serials, vec!["S2", "S3", "S1"]);
    }

    #[test]
    fn test_stamp_date_kinds() {
        let r = record(1, "A", "R", UnitState::Uninstalled, Some("bad"), Some("  "));
        assert_eq!(stamp_date(&r, UnitState::Installed), StampDate::Unparsable);
        assert_eq!(stamp_date(&r, UnitState::Uninstalled), StampDate::Missing);
        assert_eq!(stamp_date(&r, UnitState::Dispatched), StampDate::Missing);

        let r = record(2, "A", "R", UnitState::Installed, Some("05/03/2024"), None);
        assert_eq!(
            stamp_date(&r, UnitState::Installed),
            StampDate::Date(day(5, 3, 2024))
        );
    }

    #[test]
    fn test_huge_default_skips_instead_of_panicking() {
        let records = vec![
            record(1, "A", "R", UnitState::Installed, Some("01/01/2024"), None),
            record(2, "B", "R", UnitState::Uninstalled, Some("01/01/2024"), Some("11/01/2024")),
            record(3, "B", "R", UnitState::Installed, Some("01/02/2024"), None),
        ];
        for default_days in [i64::MAX, i64::MIN, 1 << 50] {
            let result = project(&records, default_days);
            assert_eq!(result.forecasts.len(), 1);
            assert!(result.forecasts[0].from_history);
            assert_eq!(result.forecasts[0].estimated_replacement, day(11, 2, 2024));
        }
        assert_eq!(add_days(day(1, 1, 2024), i64::MAX), None);
        assert_eq!(add_days(day(1, 1, 2024), 31), Some(day(1, 2, 2024)));
    }

    proptest! {
        #[test]
        fn prop_projection_is_deterministic(offsets in proptest::collection::vec(1i64..400, 1..20)) {
            let base = day(1, 1, 2023);
            let records: Vec<UnitRecord> = offsets
                .iter()
                .enumerate()
                .map(|(i, off)| {
                    let removed = shared_types::format_ledger_date(base + Duration::days(*off));
                    record(
                        i as u64 + 1,
                        "A",
                        "R",
                        UnitState::Uninstalled,
                        Some("01/01/2023"),
                        Some(removed.as_str()),
                    )
                })
                .collect();
            let first = project(&records, 90);
            let second = project(&records, 90);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.stats.total_samples, offsets.len());
            let min = *offsets.iter().min().unwrap();
            let max = *offsets.iter().max().unwrap();
            prop_assert!(first.stats.overall_mean_days >= min);
            prop_assert!(first.stats.overall_mean_days <= max);
        }
    }
}
