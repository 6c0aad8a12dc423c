//! # Filter-Trace Engine Benchmarks
//!
//! | Engine | Operation | Shape |
//! |--------|-----------|-------|
//! | ft-03 Projection | `project` over N records | linear in N |
//! | ft-02 Lifecycle | fresh-code scan | one append per scan |

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ft_01_ledger_store::{FixedTimeSource, InMemoryLedger};
use ft_02_lifecycle::{
    LifecycleApi, LifecycleConfig, LifecycleDependencies, LifecycleService, TransitionPayload,
};
use ft_03_projection::algorithms::project;
use shared_types::{
    ActorContext, ActorRole, ClientName, RecordId, StageStamp, UnitRecord, UnitState,
};

fn synthetic_ledger(size: u64) -> Vec<UnitRecord> {
    let base = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    (1..=size)
        .map(|i| {
            let installed = base + chrono::Duration::days((i % 200) as i64);
            let removed = installed + chrono::Duration::days(30 + (i % 90) as i64);
            let state = if i % 3 == 0 {
                UnitState::Installed
            } else {
                UnitState::Uninstalled
            };
            UnitRecord {
                id: RecordId(i),
                reference: format!("REF{}", i % 7),
                serial: i.to_string(),
                state,
                client: ClientName::parse(&format!("Client{}", i % 5)),
                actor_plant: Some("planta".into()),
                actor_dispatch: Some("despacho".into()),
                actor_install: Some("mecanico".into()),
                actor_uninstall: None,
                plate: None,
                installer_name: None,
                odometer_install: None,
                odometer_uninstall: None,
                stored_at: None,
                dispatched_at: None,
                installed_at: Some(StageStamp::new(
                    installed.format("%d/%m/%Y").to_string(),
                    "08:00:00",
                )),
                uninstalled_at: (state == UnitState::Uninstalled).then(|| {
                    StageStamp::new(removed.format("%d/%m/%Y").to_string(), "08:00:00")
                }),
            }
        })
        .collect()
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("ft-03-projection");
    group.measurement_time(Duration::from_secs(5));

    for size in [100u64, 1_000, 10_000] {
        let records = synthetic_ledger(size);
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("project", size), &records, |b, records| {
            b.iter(|| black_box(project(records, 90)))
        });
    }
    group.finish();
}

fn bench_fresh_scans(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("ft-02-lifecycle");

    group.bench_function("scan_fresh_code", |b| {
        let ledger = Arc::new(InMemoryLedger::new());
        let now = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let service = LifecycleService::new(
            LifecycleConfig::default(),
            LifecycleDependencies::new(
                ledger.clone(),
                ledger,
                Arc::new(FixedTimeSource::new(now)),
            ),
        );
        let actor = ActorContext::new("planta", ActorRole::Mechanic);
        let mut serial = 0u64;
        b.iter(|| {
            serial += 1;
            let code = format!("BENCH|{}", serial);
            runtime.block_on(async {
                black_box(
                    service
                        .scan_code(&code, &actor, TransitionPayload::None)
                        .await
                        .is_ok(),
                )
            })
        });
    });
    group.finish();
}

criterion_group!(benches, bench_projection, bench_fresh_scans);
criterion_main!(benches);
