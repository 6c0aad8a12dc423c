//! # Integration Test Flows
//!
//! Drives units through the lifecycle engine and reads the result back
//! through the projection engine, over the same ledger.
//!
//! ## Flows Tested:
//!
//! 1. **Scan → Ledger**: the four-scan walk of one unit
//! 2. **Ledger → Projection**: history-based and default forecasts
//! 3. **Mirror repair**: view failure, then repair by re-scan
//! 4. **Client admin**: deletion blocked by dispatched units

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use ft_01_ledger_store::{FixedTimeSource, InMemoryLedger, LedgerStore};
    use ft_02_lifecycle::{
        AdvanceOutcome, ClientAdminApi, ClientAdminService, DirectoryError, InstallData,
        LifecycleApi, LifecycleConfig, LifecycleDependencies, LifecycleError, LifecycleService,
        TransitionPayload, UninstallData,
    };
    use ft_03_projection::{ProjectionApi, ProjectionConfig, ProjectionService, ReportingApi};
    use shared_types::{ActorContext, ActorRole, ClientName, RecordId, RecordScope, UnitState};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Stack {
        ledger: Arc<InMemoryLedger>,
        clock: Arc<FixedTimeSource>,
        lifecycle: LifecycleService,
        clients: ClientAdminService,
        projection: ProjectionService,
    }

    fn stack() -> Stack {
        let ledger = Arc::new(InMemoryLedger::new());
        let clock = Arc::new(FixedTimeSource::new(
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        ));
        let deps = LifecycleDependencies::new(ledger.clone(), ledger.clone(), clock.clone());
        Stack {
            lifecycle: LifecycleService::new(LifecycleConfig::for_testing(), deps.clone()),
            clients: ClientAdminService::new(LifecycleConfig::for_testing(), deps),
            projection: ProjectionService::new(
                ProjectionConfig::for_testing(),
                ledger.clone(),
                clock.clone(),
            ),
            ledger,
            clock,
        }
    }

    fn mechanic() -> ActorContext {
        ActorContext::new("mecanico@taller", ActorRole::Mechanic)
    }

    fn dispatcher(client: &str) -> ActorContext {
        ActorContext::new("despacho@planta", ActorRole::Dispatcher).with_client(client)
    }

    fn install(plate: &str) -> TransitionPayload {
        TransitionPayload::Install(InstallData {
            plate: plate.into(),
            odometer: "1000".into(),
            installer_name: "Jon".into(),
        })
    }

    fn uninstall(odometer: &str) -> TransitionPayload {
        TransitionPayload::Uninstall(UninstallData {
            odometer: odometer.into(),
        })
    }

    /// Walk `code` through all four stages, moving the clock between scans.
    async fn complete_unit(s: &Stack, code: &str, client: &str, installed_for_days: i64) {
        s.lifecycle
            .scan_code(code, &mechanic(), TransitionPayload::None)
            .await
            .unwrap();
        s.lifecycle
            .scan_code(code, &dispatcher(client), TransitionPayload::None)
            .await
            .unwrap();
        s.lifecycle
            .scan_code(code, &mechanic(), install("ABC123"))
            .await
            .unwrap();
        s.clock.advance_days(installed_for_days);
        s.lifecycle
            .scan_code(code, &mechanic(), uninstall("15000"))
            .await
            .unwrap();
    }

    // =============================================================================
    // SCAN → LEDGER
    // =============================================================================

    #[tokio::test]
    async fn test_four_scan_walk() {
        let s = stack();
        let code = "OG971390|202630010002";

        let r = s
            .lifecycle
            .scan_code(code, &mechanic(), TransitionPayload::None)
            .await
            .unwrap();
        assert_eq!(r.outcome, AdvanceOutcome::Created { id: RecordId(1) });
        assert_eq!(r.state(), UnitState::Stored);

        let r = s
            .lifecycle
            .scan_code(code, &dispatcher("ACME"), TransitionPayload::None)
            .await
            .unwrap();
        assert_eq!(r.state(), UnitState::Dispatched);
        assert_eq!(r.record.client.as_ref().map(|c| c.as_str()), Some("ACME"));

        let r = s
            .lifecycle
            .scan_code(code, &mechanic(), install("ABC123"))
            .await
            .unwrap();
        assert_eq!(r.state(), UnitState::Installed);
        assert_eq!(r.record.plate.as_deref(), Some("ABC123"));

        let r = s
            .lifecycle
            .scan_code(code, &mechanic(), uninstall("15000"))
            .await
            .unwrap();
        assert_eq!(r.state(), UnitState::Uninstalled);

        let r = s
            .lifecycle
            .scan_code(code, &mechanic(), TransitionPayload::None)
            .await
            .unwrap();
        assert_eq!(r.outcome, AdvanceOutcome::AlreadyCompleted);
        assert_eq!(s.ledger.len(), 1);

        let stored = s.ledger.scan_all().await.unwrap();
        assert_eq!(stored[0].odometer_uninstall.as_deref(), Some("15000"));
        assert!(stored[0].dispatched_at.is_some());
    }

    #[tokio::test]
    async fn test_garbage_never_reaches_ledger() {
        let s = stack();
        for _ in 0..3 {
            let err = s
                .lifecycle
                .scan_code("garbage-text", &mechanic(), TransitionPayload::None)
                .await
                .unwrap_err();
            assert!(matches!(err, LifecycleError::InvalidFormat(_)));
        }
        assert!(s.ledger.is_empty());
    }

    // =============================================================================
    // LEDGER → PROJECTION
    // =============================================================================

    #[tokio::test]
    async fn test_history_drives_forecast() {
        let s = stack();
        // 01/01/2024 → 31/03/2024 is 90 days
        complete_unit(&s, "REF1|1", "ClientA", 90).await;

        let code = "REF1|2";
        s.lifecycle
            .scan_code(code, &mechanic(), TransitionPayload::None)
            .await
            .unwrap();
        s.lifecycle
            .scan_code(code, &dispatcher("clienta"), TransitionPayload::None)
            .await
            .unwrap();
        s.lifecycle
            .scan_code(code, &mechanic(), install("XYZ987"))
            .await
            .unwrap();

        let result = s.projection.project(None).await.unwrap();
        assert_eq!(result.stats.total_samples, 1);
        assert_eq!(result.stats.overall_mean_days, 90);
        assert_eq!(result.forecasts.len(), 1);

        let f = &result.forecasts[0];
        assert!(f.from_history);
        assert_eq!(f.installed_on, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(
            f.estimated_replacement,
            NaiveDate::from_ymd_opt(2024, 6, 29).unwrap()
        );
        assert_eq!(f.plate.as_deref(), Some("XYZ987"));
    }

    #[tokio::test]
    async fn test_unknown_cohort_defaults_to_90_days() {
        let s = stack();
        complete_unit(&s, "REF1|1", "ClientA", 30).await;

        let code = "REF2|1";
        s.lifecycle
            .scan_code(code, &mechanic(), TransitionPayload::None)
            .await
            .unwrap();
        s.lifecycle
            .scan_code(code, &dispatcher("ClientA"), TransitionPayload::None)
            .await
            .unwrap();
        s.lifecycle
            .scan_code(code, &mechanic(), install("AAA111"))
            .await
            .unwrap();

        let result = s
            .projection
            .project(ClientName::parse("ClientA"))
            .await
            .unwrap();
        let f = &result.forecasts[0];
        assert_eq!(f.reference, "REF2");
        assert!(!f.from_history);
        assert_eq!(f.mean_duration_days, 90);
    }

    #[tokio::test]
    async fn test_recent_and_stats_follow_scope() {
        let s = stack();
        complete_unit(&s, "REF1|1", "ClientA", 10).await;
        s.lifecycle
            .scan_code("REF1|2", &mechanic(), TransitionPayload::None)
            .await
            .unwrap();
        s.lifecycle
            .scan_code("REF1|2", &dispatcher("ClientB"), TransitionPayload::None)
            .await
            .unwrap();
        s.lifecycle
            .scan_code(
                "REF1|3",
                &ActorContext::new("otro", ActorRole::Mechanic),
                TransitionPayload::None,
            )
            .await
            .unwrap();

        let all = s.projection.compute_stats(&RecordScope::All).await.unwrap();
        assert_eq!(all.total, 3);
        assert_eq!(all.uninstalled, 1);
        assert_eq!(all.dispatched, 1);
        assert_eq!(all.stored, 1);
        assert_eq!(all.today, 3);

        let b = RecordScope::Client(ClientName::parse("clientb").unwrap());
        let recent = s.projection.list_recent(&b, None).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].serial, "2");

        let mine = RecordScope::resolve(&mechanic(), None);
        let recent = s.projection.list_recent(&mine, None).await.unwrap();
        let serials: Vec<&str> = recent.iter().map(|r| r.serial.as_str()).collect();
        assert_eq!(serials, vec!["2", "1"]);
    }

    // =============================================================================
    // MIRROR REPAIR
    // =============================================================================

    #[tokio::test]
    async fn test_view_failure_then_repair() {
        let s = stack();
        let code = "REF1|9";
        s.lifecycle
            .scan_code(code, &mechanic(), TransitionPayload::None)
            .await
            .unwrap();
        s.lifecycle
            .scan_code(code, &dispatcher("ACME"), TransitionPayload::None)
            .await
            .unwrap();
        s.lifecycle
            .scan_code(code, &mechanic(), install("ABC123"))
            .await
            .unwrap();

        s.ledger.set_view_link_failure(true);
        let acme = ClientName::parse("ACME").unwrap();
        let before = s
            .projection
            .list_recent(&RecordScope::Client(acme), None)
            .await
            .unwrap();
        assert_eq!(before.len(), 1);

        let r = s
            .lifecycle
            .scan_code(
                code,
                &ActorContext::new("tecnico", ActorRole::Mechanic).with_client("Fleet"),
                uninstall("20000"),
            )
            .await
            .unwrap();
        assert_eq!(r.state(), UnitState::Uninstalled);
        assert!(r.mirror_sync_failed());

        let fleet = ClientName::parse("Fleet").unwrap();
        assert!(!s.ledger.client_view_contains(&fleet, r.record.id).await.unwrap());

        s.ledger.set_view_link_failure(false);
        let r = s
            .lifecycle
            .scan_code(
                code,
                &ActorContext::new("tecnico", ActorRole::Mechanic).with_client("Fleet"),
                TransitionPayload::None,
            )
            .await
            .unwrap();
        assert_eq!(r.outcome, AdvanceOutcome::AlreadyCompleted);
        assert!(r.warnings.is_empty());
        assert!(s.ledger.client_view_contains(&fleet, r.record.id).await.unwrap());
    }

    // =============================================================================
    // CLIENT ADMIN
    // =============================================================================

    #[tokio::test]
    async fn test_client_with_units_cannot_be_deleted() {
        let s = stack();
        s.lifecycle
            .scan_code("REF1|1", &mechanic(), TransitionPayload::None)
            .await
            .unwrap();
        s.lifecycle
            .scan_code("REF1|1", &dispatcher("ACME"), TransitionPayload::None)
            .await
            .unwrap();

        let listed = s.clients.list_clients().await.unwrap();
        assert_eq!(listed.len(), 1);

        let err = s.clients.delete_client("acme").await.unwrap_err();
        assert!(matches!(err, DirectoryError::ClientHasRecords { count: 1, .. }));

        s.clients.register_client("Spare").await.unwrap();
        s.clients.delete_client("SPARE").await.unwrap();
        assert_eq!(s.clients.list_clients().await.unwrap().len(), 1);
    }
}
