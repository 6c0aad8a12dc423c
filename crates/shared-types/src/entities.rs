//! # Core Domain Entities
//!
//! The unit record and its four-stage lifecycle.
//!
//! ## Lifecycle
//!
//! ```text
//! STORED ──→ DISPATCHED ──→ INSTALLED ──→ UNINSTALLED (terminal)
//! ```
//!
//! Each stage is reached exactly once and stamps its own actor, date and time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::actor::normalize_identity;
use crate::client::ClientName;
use crate::code::UnitKey;
use crate::dates::parse_ledger_date;
use crate::errors::InvalidTransition;

/// Sequential surrogate id assigned by the ledger at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a unit. Ordering follows the lifecycle.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitState {
    /// Received into the warehouse.
    #[default]
    Stored,
    /// Sent out to a client.
    Dispatched,
    /// Fitted to a vehicle.
    Installed,
    /// Removed from the vehicle.
    Uninstalled,
}

impl UnitState {
    /// All states in lifecycle order.
    pub const ALL: [UnitState; 4] = [
        UnitState::Stored,
        UnitState::Dispatched,
        UnitState::Installed,
        UnitState::Uninstalled,
    ];

    /// The state a scan advances to, if any.
    pub fn next(&self) -> Option<UnitState> {
        match self {
            UnitState::Stored => Some(UnitState::Dispatched),
            UnitState::Dispatched => Some(UnitState::Installed),
            UnitState::Installed => Some(UnitState::Uninstalled),
            UnitState::Uninstalled => None,
        }
    }

    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: UnitState) -> bool {
        matches!(
            (self, next),
            (UnitState::Stored, UnitState::Dispatched)
                | (UnitState::Dispatched, UnitState::Installed)
                | (UnitState::Installed, UnitState::Uninstalled)
        )
    }

    /// Is this a terminal state?
    pub fn is_terminal(&self) -> bool {
        matches!(self, UnitState::Uninstalled)
    }

    /// Ledger label.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitState::Stored => "STORED",
            UnitState::Dispatched => "DISPATCHED",
            UnitState::Installed => "INSTALLED",
            UnitState::Uninstalled => "UNINSTALLED",
        }
    }
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alias used where a state names the stage that produced a stamp.
pub type Stage = UnitState;

/// Date and time text written when a stage is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageStamp {
    /// `dd/mm/yyyy`
    pub date: String,
    /// `HH:MM:SS`
    pub time: String,
}

impl StageStamp {
    /// Build a stamp from ledger text.
    pub fn new(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
        }
    }

    /// Parsed calendar date, if the text is well formed.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_ledger_date(&self.date)
    }
}

/// Global ledger row for one physical unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Surrogate id.
    pub id: RecordId,
    /// Product reference.
    pub reference: String,
    /// Unit serial.
    pub serial: String,
    /// Current lifecycle state.
    pub state: UnitState,
    /// Client the unit was dispatched to.
    #[serde(default)]
    pub client: Option<ClientName>,

    /// Who stored the unit.
    #[serde(default)]
    pub actor_plant: Option<String>,
    /// Who dispatched the unit.
    #[serde(default)]
    pub actor_dispatch: Option<String>,
    /// Who installed the unit.
    #[serde(default)]
    pub actor_install: Option<String>,
    /// Who uninstalled the unit.
    #[serde(default)]
    pub actor_uninstall: Option<String>,

    /// Vehicle plate at installation.
    #[serde(default)]
    pub plate: Option<String>,
    /// Installer name at installation.
    #[serde(default)]
    pub installer_name: Option<String>,
    /// Odometer reading at installation.
    #[serde(default)]
    pub odometer_install: Option<String>,
    /// Odometer reading at removal.
    #[serde(default)]
    pub odometer_uninstall: Option<String>,

    /// STORED stamp.
    #[serde(default)]
    pub stored_at: Option<StageStamp>,
    /// DISPATCHED stamp.
    #[serde(default)]
    pub dispatched_at: Option<StageStamp>,
    /// INSTALLED stamp.
    #[serde(default)]
    pub installed_at: Option<StageStamp>,
    /// UNINSTALLED stamp.
    #[serde(default)]
    pub uninstalled_at: Option<StageStamp>,
}

impl UnitRecord {
    /// A freshly stored unit.
    pub fn stored(id: RecordId, key: &UnitKey, actor: &str, stamp: StageStamp) -> Self {
        Self {
            id,
            reference: key.reference.clone(),
            serial: key.serial.clone(),
            state: UnitState::Stored,
            client: None,
            actor_plant: Some(actor.to_string()),
            actor_dispatch: None,
            actor_install: None,
            actor_uninstall: None,
            plate: None,
            installer_name: None,
            odometer_install: None,
            odometer_uninstall: None,
            stored_at: Some(stamp),
            dispatched_at: None,
            installed_at: None,
            uninstalled_at: None,
        }
    }

    /// Natural key.
    pub fn key(&self) -> UnitKey {
        UnitKey::new(&self.reference, &self.serial)
    }

    /// Stamp written when `stage` was reached.
    pub fn stamp(&self, stage: Stage) -> Option<&StageStamp> {
        match stage {
            UnitState::Stored => self.stored_at.as_ref(),
            UnitState::Dispatched => self.dispatched_at.as_ref(),
            UnitState::Installed => self.installed_at.as_ref(),
            UnitState::Uninstalled => self.uninstalled_at.as_ref(),
        }
    }

    /// Actor recorded for `stage`.
    pub fn actor(&self, stage: Stage) -> Option<&str> {
        match stage {
            UnitState::Stored => self.actor_plant.as_deref(),
            UnitState::Dispatched => self.actor_dispatch.as_deref(),
            UnitState::Installed => self.actor_install.as_deref(),
            UnitState::Uninstalled => self.actor_uninstall.as_deref(),
        }
    }

    /// Whether `identity` (already normalized) appears in any actor field.
    pub fn involves_actor(&self, identity: &str) -> bool {
        !identity.is_empty()
            && UnitState::ALL
                .iter()
                .filter_map(|stage| self.actor(*stage))
                .any(|actor| normalize_identity(actor) == identity)
    }

    /// Whether any stage was stamped on `day`.
    pub fn touched_on(&self, day: NaiveDate) -> bool {
        UnitState::ALL
            .iter()
            .filter_map(|stage| self.stamp(*stage))
            .any(|stamp| stamp.calendar_date() == Some(day))
    }

    /// Move to `next`, stamping the stage's actor and time.
    ///
    /// Rejects anything other than the single next lifecycle step.
    pub fn advance(
        &mut self,
        next: UnitState,
        actor: &str,
        stamp: StageStamp,
    ) -> Result<(), InvalidTransition> {
        let rejected = InvalidTransition {
            from: self.state,
            to: next,
        };
        if !self.state.can_transition_to(next) {
            return Err(rejected);
        }
        let actor = Some(actor.to_string());
        match next {
            UnitState::Stored => return Err(rejected),
            UnitState::Dispatched => {
                self.actor_dispatch = actor;
                self.dispatched_at = Some(stamp);
            }
            UnitState::Installed => {
                self.actor_install = actor;
                self.installed_at = Some(stamp);
            }
            UnitState::Uninstalled => {
                self.actor_uninstall = actor;
                self.uninstalled_at = Some(stamp);
            }
        }
        self.state = next;
        Ok(())
    }
}
