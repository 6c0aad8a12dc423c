//! # Lifecycle Service
//!
//! Applies one lifecycle step per scan.
//!
//! ## Scan Flow
//!
//! ```text
//! code ──parse──→ UnitKey ──lock──→ find_by_key
//!                                      │
//!      ┌──────────────┬───────────────┼────────────────┬─────────────────┐
//!      ↓              ↓               ↓                ↓                 ↓
//!   (absent)       STORED        DISPATCHED        INSTALLED        UNINSTALLED
//!   append      ensure client    InstallData?     UninstallData?    repair views
//!   STORED      → DISPATCHED     → INSTALLED      → UNINSTALLED     AlreadyCompleted
//!                     │               │                │
//!                     └───────────────┴── update_row ──┴──→ link client views
//! ```
//!
//! The global row is always written before any client view. A failed view
//! link is reported as a warning on an otherwise successful result.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use ft_01_ledger_store::{ClientDirectory, LedgerStore, StoreError, TimeSource, UnitDraft};
use shared_types::{
    format_ledger_date, format_ledger_time, parse_code, ActorContext, ClientName, StageStamp,
    UnitKey, UnitRecord, UnitState,
};
use tracing::{debug, info, warn};

use crate::config::LifecycleConfig;
use crate::domain::{
    validate_install, validate_uninstall, AdvanceOutcome, AdvanceResult, AdvanceWarning,
    LifecycleError, StoreOp, TransitionPayload,
};
use crate::locks::{ClientLocks, KeyedLocks};
use crate::ports::LifecycleApi;

/// Ports the lifecycle engine is wired to.
///
/// Clones share one client lock table, so a [`LifecycleService`] and a
/// [`ClientAdminService`](crate::ClientAdminService) built from the same
/// dependencies serialize dispatches against client deletion.
#[derive(Clone)]
pub struct LifecycleDependencies {
    /// Global ledger and client views.
    pub ledger: Arc<dyn LedgerStore>,
    /// Client directory.
    pub directory: Arc<dyn ClientDirectory>,
    /// Clock for stage stamps.
    pub clock: Arc<dyn TimeSource>,
    /// Per-client locks held across directory checks and the global write.
    pub client_locks: Arc<ClientLocks>,
}

impl LifecycleDependencies {
    /// Wire the ports with a fresh client lock table.
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        directory: Arc<dyn ClientDirectory>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            ledger,
            directory,
            clock,
            client_locks: Arc::new(ClientLocks::new(DEFAULT_CLIENT_LOCK_THRESHOLD)),
        }
    }
}

const DEFAULT_CLIENT_LOCK_THRESHOLD: usize = 256;

/// Run a store call under the configured timeout, attaching op and key.
pub(crate) async fn bounded<T, F>(
    config: &LifecycleConfig,
    op: StoreOp,
    key: &str,
    call: F,
) -> Result<T, (StoreOp, StoreError)>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(config.store_timeout(), call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => Err((op, source)),
        Err(_) => {
            warn!(op = %op, key, timeout_ms = config.store_timeout_ms, "[ft-02] store call timed out");
            Err((
                op,
                StoreError::Unavailable {
                    message: format!("timed out after {}ms", config.store_timeout_ms),
                },
            ))
        }
    }
}

/// Lifecycle engine.
pub struct LifecycleService {
    config: LifecycleConfig,
    deps: LifecycleDependencies,
    locks: KeyedLocks,
}

impl LifecycleService {
    /// Create a new lifecycle service.
    pub fn new(config: LifecycleConfig, deps: LifecycleDependencies) -> Self {
        let locks = KeyedLocks::new(config.lock_reclaim_threshold);
        Self {
            config,
            deps,
            locks,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Number of key lock slots currently tracked.
    pub fn tracked_locks(&self) -> usize {
        self.locks.len()
    }

    async fn store<T, F>(&self, op: StoreOp, key: &UnitKey, call: F) -> Result<T, LifecycleError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        bounded(&self.config, op, &key.to_string(), call)
            .await
            .map_err(|(op, source)| LifecycleError::StoreUnavailable {
                op,
                key: key.to_string(),
                source,
            })
    }

    fn stamp(&self) -> StageStamp {
        let now = self.deps.clock.now();
        StageStamp::new(format_ledger_date(now.date()), format_ledger_time(now.time()))
    }

    async fn advance(
        &self,
        key: UnitKey,
        actor: &ActorContext,
        payload: TransitionPayload,
    ) -> Result<AdvanceResult, LifecycleError> {
        let _guard = self.locks.acquire(&key).await;

        let existing = self
            .store(StoreOp::Lookup, &key, self.deps.ledger.find_by_key(&key))
            .await?;

        match existing {
            None => self.create(key, actor).await,
            Some(record) => match record.state {
                UnitState::Stored => self.dispatch(key, record, actor).await,
                UnitState::Dispatched => self.install(key, record, actor, &payload).await,
                UnitState::Installed => self.uninstall(key, record, actor, &payload).await,
                UnitState::Uninstalled => Ok(self.revisit_completed(key, record, actor).await),
            },
        }
    }

    async fn create(
        &self,
        key: UnitKey,
        actor: &ActorContext,
    ) -> Result<AdvanceResult, LifecycleError> {
        let draft = UnitDraft {
            key: key.clone(),
            actor_plant: actor.identity.clone(),
            stored_at: self.stamp(),
        };
        let record = self
            .store(StoreOp::Append, &key, self.deps.ledger.append_row(draft))
            .await?;

        info!(key = %key, id = %record.id, actor = %actor.identity, "[ft-02] 📦 unit stored");
        Ok(AdvanceResult {
            key,
            outcome: AdvanceOutcome::Created { id: record.id },
            record,
            warnings: Vec::new(),
        })
    }

    /// STORED → DISPATCHED.
    ///
    /// Holds the client's lock from the directory check through the global
    /// write. A client created here is removed again if the write fails.
    async fn dispatch(
        &self,
        key: UnitKey,
        mut record: UnitRecord,
        actor: &ActorContext,
    ) -> Result<AdvanceResult, LifecycleError> {
        let hint = match actor.client_hint.clone() {
            Some(client) => client,
            None => {
                info!(key = %key, role = %actor.role, "[ft-02] dispatch refused: no client");
                return Err(LifecycleError::MissingClient {
                    key,
                    role: actor.role,
                });
            }
        };

        let _client_guard = self.deps.client_locks.acquire(&hint.key()).await;
        let directory = &self.deps.directory;

        let registered = self
            .store(StoreOp::ClientDirectory, &key, directory.find_client(&hint))
            .await?;
        let (client, created) = match registered {
            Some(entry) => (entry.name, false),
            None => {
                let today = self.deps.clock.today();
                let created = self
                    .store(
                        StoreOp::ClientDirectory,
                        &key,
                        directory.ensure_client(&hint, today),
                    )
                    .await?;
                (hint, created)
            }
        };

        record.client = Some(client.clone());
        let written = match record.advance(UnitState::Dispatched, &actor.identity, self.stamp()) {
            Ok(()) => self.write_row(&key, &record).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = written {
            if created {
                self.forget_client(&key, &client).await;
            }
            return Err(e);
        }
        if created {
            info!(client = %client, "[ft-02] new client registered on dispatch");
        }
        Ok(self.finish(key, record, actor).await)
    }

    /// Undo a client registration whose dispatch did not land.
    async fn forget_client(&self, key: &UnitKey, client: &ClientName) {
        let removal = bounded(
            &self.config,
            StoreOp::ClientDirectory,
            &key.to_string(),
            self.deps.directory.remove_client(client),
        )
        .await;
        match removal {
            Ok(_) => info!(key = %key, client = %client, "[ft-02] rolled back client registration"),
            Err((_, e)) => warn!(
                key = %key,
                client = %client,
                error = %e,
                "[ft-02] could not roll back client registration"
            ),
        }
    }

    async fn install(
        &self,
        key: UnitKey,
        mut record: UnitRecord,
        actor: &ActorContext,
        payload: &TransitionPayload,
    ) -> Result<AdvanceResult, LifecycleError> {
        let valid = match validate_install(payload, self.config.min_installer_name_len) {
            Ok(valid) => valid,
            Err(required) => {
                info!(key = %key, ?required, "[ft-02] install needs data");
                return Ok(needs_data(key, record, required));
            }
        };

        record.plate = Some(valid.plate);
        record.odometer_install = Some(valid.odometer);
        record.installer_name = Some(valid.installer_name);
        record.advance(UnitState::Installed, &actor.identity, self.stamp())?;
        self.commit(key, record, actor).await
    }

    async fn uninstall(
        &self,
        key: UnitKey,
        mut record: UnitRecord,
        actor: &ActorContext,
        payload: &TransitionPayload,
    ) -> Result<AdvanceResult, LifecycleError> {
        let odometer = match validate_uninstall(payload) {
            Ok(odometer) => odometer,
            Err(required) => {
                info!(key = %key, "[ft-02] uninstall needs data");
                return Ok(needs_data(key, record, required));
            }
        };

        record.odometer_uninstall = Some(odometer);
        record.advance(UnitState::Uninstalled, &actor.identity, self.stamp())?;
        self.commit(key, record, actor).await
    }

    /// Write the advanced record, then bring client views up to date.
    async fn commit(
        &self,
        key: UnitKey,
        record: UnitRecord,
        actor: &ActorContext,
    ) -> Result<AdvanceResult, LifecycleError> {
        self.write_row(&key, &record).await?;
        Ok(self.finish(key, record, actor).await)
    }

    async fn write_row(&self, key: &UnitKey, record: &UnitRecord) -> Result<(), LifecycleError> {
        self.store(
            StoreOp::Update,
            key,
            self.deps.ledger.update_row(record.id, record.clone()),
        )
        .await
    }

    async fn finish(&self, key: UnitKey, record: UnitRecord, actor: &ActorContext) -> AdvanceResult {
        info!(
            key = %key,
            id = %record.id,
            state = %record.state,
            actor = %actor.identity,
            "[ft-02] ✅ unit advanced"
        );

        let warnings = self.sync_views(&key, &record, actor, false).await;
        AdvanceResult {
            key,
            outcome: AdvanceOutcome::Advanced {
                state: record.state,
            },
            record,
            warnings,
        }
    }

    async fn revisit_completed(
        &self,
        key: UnitKey,
        record: UnitRecord,
        actor: &ActorContext,
    ) -> AdvanceResult {
        debug!(key = %key, "[ft-02] re-scan of completed unit");
        let warnings = self.sync_views(&key, &record, actor, true).await;
        AdvanceResult {
            key,
            outcome: AdvanceOutcome::AlreadyCompleted,
            record,
            warnings,
        }
    }

    /// Link the record into its client's view and, if the actor works for a
    /// different client, into that one as well.
    ///
    /// With `repair_only`, views that already hold the record are left alone.
    async fn sync_views(
        &self,
        key: &UnitKey,
        record: &UnitRecord,
        actor: &ActorContext,
        repair_only: bool,
    ) -> Vec<AdvanceWarning> {
        let mut warnings = Vec::new();
        for client in view_targets(record, actor) {
            if let Err(reason) = self.sync_view(key, record, &client, repair_only).await {
                warn!(
                    key = %key,
                    client = %client,
                    reason = %reason,
                    "[ft-02] ⚠️ client view out of sync"
                );
                warnings.push(AdvanceWarning::MirrorSyncFailed {
                    client,
                    reason: reason.to_string(),
                });
            }
        }
        warnings
    }

    async fn sync_view(
        &self,
        key: &UnitKey,
        record: &UnitRecord,
        client: &ClientName,
        repair_only: bool,
    ) -> Result<(), StoreError> {
        let key_text = key.to_string();
        let ledger = &self.deps.ledger;

        if repair_only {
            let present = bounded(
                &self.config,
                StoreOp::Lookup,
                &key_text,
                ledger.client_view_contains(client, record.id),
            )
            .await
            .map_err(|(_, e)| e)?;
            if present {
                return Ok(());
            }
            info!(key = %key, client = %client, "[ft-02] repairing missing client view row");
        }

        bounded(
            &self.config,
            StoreOp::Update,
            &key_text,
            ledger.link_client_view(client, record.id),
        )
        .await
        .map_err(|(_, e)| e)
    }
}

fn needs_data(
    key: UnitKey,
    record: UnitRecord,
    required: crate::domain::RequiredData,
) -> AdvanceResult {
    AdvanceResult {
        key,
        outcome: AdvanceOutcome::NeedsData { required },
        record,
        warnings: Vec::new(),
    }
}

/// Views that must show `record`: its own client's, plus the actor's client
/// when that differs.
fn view_targets(record: &UnitRecord, actor: &ActorContext) -> Vec<ClientName> {
    let mut targets: Vec<ClientName> = record.client.iter().cloned().collect();
    if let Some(hint) = &actor.client_hint {
        if !targets.contains(hint) {
            targets.push(hint.clone());
        }
    }
    targets
}

#[async_trait]
impl LifecycleApi for LifecycleService {
    async fn scan_code(
        &self,
        code: &str,
        actor: &ActorContext,
        payload: TransitionPayload,
    ) -> Result<AdvanceResult, LifecycleError> {
        let key = match parse_code(code) {
            Ok(key) => key,
            Err(e) => {
                info!(raw = code, "[ft-02] rejected scan: {}", e);
                return Err(e.into());
            }
        };
        self.advance(key, actor, payload).await
    }
}
