//! Results of a scan.

use serde::Serialize;
use shared_types::{ClientName, RecordId, UnitKey, UnitRecord, UnitState};

use super::payload::RequiredData;

/// What a scan did to the unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdvanceOutcome {
    /// First sighting; the unit is now STORED.
    Created {
        /// Assigned id
        id: RecordId,
    },
    /// The unit moved to `state`.
    Advanced {
        /// State reached
        state: UnitState,
    },
    /// The caller must collect more data and scan again. Nothing was written.
    NeedsData {
        /// Payload to collect
        required: RequiredData,
    },
    /// The unit is already UNINSTALLED. No fields were changed.
    AlreadyCompleted,
}

/// Non-fatal conditions attached to a successful scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdvanceWarning {
    /// The global row was written but the client's view was not updated.
    MirrorSyncFailed {
        /// View that could not be updated
        client: ClientName,
        /// Backend detail
        reason: String,
    },
}

/// Result of `scan_code`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AdvanceResult {
    /// Unit scanned.
    pub key: UnitKey,
    /// What happened.
    pub outcome: AdvanceOutcome,
    /// Record as it stands after the scan.
    pub record: UnitRecord,
    /// Degraded-but-successful conditions.
    pub warnings: Vec<AdvanceWarning>,
}

impl AdvanceResult {
    /// State of the unit after the scan.
    pub fn state(&self) -> UnitState {
        self.record.state
    }

    /// Whether the ledger now holds a new state for the unit.
    pub fn changed_state(&self) -> bool {
        matches!(
            self.outcome,
            AdvanceOutcome::Created { .. } | AdvanceOutcome::Advanced { .. }
        )
    }

    /// Whether any client view is known to be stale.
    pub fn mirror_sync_failed(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, AdvanceWarning::MirrorSyncFailed { .. }))
    }
}
