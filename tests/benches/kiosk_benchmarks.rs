//! # VoteSafe Kiosk Benchmarks
//!
//! | Subsystem | Operation | Target |
//! |-----------|-----------|--------|
//! | vk-03 Vote Sealing | seal one vote | < 1ms |
//! | vk-03 Vote Sealing | verify one vote | < 1ms |
//! | vk-04 Audit Log | append | < 10µs |
//! | vk-04 Audit Log | status over N events | linear in N |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_crypto::KioskRng;
use shared_types::{CandidateId, EventSource, ManualClock, NewSecurityEvent, Severity};
use std::sync::Arc;
use std::time::Duration;
use vk_02_ballot_registry::{SessionSalt, VoteRecord};
use vk_03_vote_sealing::{SealingConfig, StandardVoteSealer, VoteSealer};
use vk_04_audit_log::{aggregate, AuditLog, AuditLogApi};

fn sealer() -> StandardVoteSealer {
    StandardVoteSealer::new(
        &SealingConfig {
            sealing_secret: [0x5A; 32],
        },
        KioskRng::seeded(1),
        Arc::new(ManualClock::new(1_700_000_000_000)),
    )
}

fn record(n: u8) -> VoteRecord {
    VoteRecord::new(
        SessionSalt::from_bytes([n; 16]),
        CandidateId::new("C002"),
        1_700_000_000_000,
    )
}

// ============================================================================
// VK-03: Vote Sealing
// ============================================================================

fn bench_vote_sealing(c: &mut Criterion) {
    let runtime = match tokio::runtime::Builder::new_current_thread().build() {
        Ok(runtime) => runtime,
        Err(e) => panic!("benchmark runtime: {e}"),
    };
    let mut group = c.benchmark_group("vk-03-vote-sealing");
    group.measurement_time(Duration::from_secs(5));

    let sealer = sealer();
    let vote = record(7);
    group.bench_function("seal", |b| {
        b.iter(|| black_box(runtime.block_on(sealer.seal(&vote)).is_ok()))
    });

    let sealed = match runtime.block_on(sealer.seal(&vote)) {
        Ok(sealed) => sealed,
        Err(e) => panic!("seal failed: {e}"),
    };
    group.bench_function("verify", |b| b.iter(|| black_box(sealer.verify(&sealed))));
    group.bench_function("unseal", |b| b.iter(|| black_box(sealer.unseal(&sealed).is_ok())));

    group.finish();
}

// ============================================================================
// VK-04: Audit Log
// ============================================================================

fn bench_audit_log(c: &mut Criterion) {
    let mut group = c.benchmark_group("vk-04-audit-log");

    let log = AuditLog::new(Arc::new(ManualClock::new(0)));
    group.bench_function("append", |b| {
        b.iter(|| {
            black_box(log.append(NewSecurityEvent::info(
                EventSource::Session,
                "benchmark event",
            )))
        })
    });

    for size in [100usize, 1_000, 10_000] {
        let log = AuditLog::new(Arc::new(ManualClock::new(0)));
        for i in 0..size {
            let severity = if i % 50 == 0 {
                Severity::Warning
            } else {
                Severity::Info
            };
            log.append(NewSecurityEvent::new(EventSource::Printer, severity, "slip"));
        }
        let events = log.snapshot();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("aggregate", size), &events, |b, events| {
            b.iter(|| black_box(aggregate(events)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_vote_sealing, bench_audit_log);
criterion_main!(benches);
