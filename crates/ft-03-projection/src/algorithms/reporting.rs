//! Recent-record and per-state counting helpers.

use chrono::NaiveDate;
use shared_types::{UnitRecord, UnitState};

use crate::domain::LedgerStats;

/// Last `limit` records in ledger order, most recent first.
pub fn most_recent(records: Vec<UnitRecord>, limit: usize) -> Vec<UnitRecord> {
    let skip = records.len().saturating_sub(limit);
    records.into_iter().skip(skip).rev().collect()
}

/// Per-state counts, plus records stamped on `today`.
pub fn tally(records: &[UnitRecord], today: NaiveDate) -> LedgerStats {
    let mut stats = LedgerStats {
        total: records.len(),
        ..LedgerStats::default()
    };
    for record in records {
        match record.state {
            UnitState::Stored => stats.stored += 1,
            UnitState::Dispatched => stats.dispatched += 1,
            UnitState::Installed => stats.installed += 1,
            UnitState::Uninstalled => stats.uninstalled += 1,
        }
        if record.touched_on(today) {
            stats.today += 1;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{RecordId, StageStamp, UnitKey};

    fn stored(id: u64, date: &str) -> UnitRecord {
        UnitRecord::stored(
            RecordId(id),
            &UnitKey::new("R", id.to_string()),
            "planta",
            StageStamp::new(date, "08:00:00"),
        )
    }

    #[test]
    fn test_most_recent_reverses_tail() {
        let records: Vec<_> = (1..=5).map(|i| stored(i, "01/01/2024")).collect();
        let ids: Vec<u64> = most_recent(records.clone(), 3)
            .iter()
            .map(|r| r.id.0)
            .collect();
        assert_eq!(ids, vec![5, 4, 3]);
        assert_eq!(most_recent(records.clone(), 50).len(), 5);
        assert!(most_recent(records, 0).is_empty());
    }

    #[test]
    fn test_tally_counts_states_and_today() {
        let mut records: Vec<_> = (1..=4).map(|i| stored(i, "01/01/2024")).collect();
        records[1].state = UnitState::Dispatched;
        records[2].state = UnitState::Installed;
        records[2].installed_at = Some(StageStamp::new("5/1/2024", "10:00:00"));
        records[3].state = UnitState::Uninstalled;

        let stats = tally(&records, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(
            stats,
            LedgerStats {
                total: 4,
                stored: 1,
                dispatched: 1,
                installed: 1,
                uninstalled: 1,
                today: 1,
            }
        );
    }
}
