//! # Audit Log Under Concurrency
//!
//! Several producers write to one log at once: the session controller,
//! the hardware ingest loop and direct appenders. Sequence numbers must stay
//! gapless and readers must only ever see a consistent prefix.

#[cfg(test)]
mod tests {
    use super::super::*;
    use shared_types::{EventSource, NewSecurityEvent, SecurityStatus};
    use std::time::Duration;
    use tokio::sync::watch;
    use vk_04_audit_log::{AuditLogApi, HardwareSignal};
    use vk_05_session_control::{AdminReportingApi, SessionControlApi};

    fn assert_gapless(kiosk: &KioskContainer) {
        let events = kiosk.audit.snapshot();
        for (index, event) in events.iter().enumerate() {
            assert_eq!(event.sequence, index as u64 + 1);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_producers_stay_gapless() {
        let (mut kiosk, _clock) = wired_kiosk(&kiosk_config());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let tasks = kiosk.start(shutdown_rx);

        let mut writers = Vec::new();
        for worker in 0..4 {
            let audit = kiosk.audit.clone();
            writers.push(tokio::spawn(async move {
                for i in 0..50 {
                    audit.append(NewSecurityEvent::info(
                        EventSource::Operator,
                        format!("worker {worker} note {i}"),
                    ));
                    tokio::task::yield_now().await;
                }
            }));
        }

        let sender = kiosk.hardware_sender();
        let signals = tokio::spawn(async move {
            for _ in 0..20 {
                sender.send(HardwareSignal::BatteryLow { percent: 15 }).await.unwrap();
            }
        });

        let controller = kiosk.controller.clone();
        let voter = tokio::spawn(async move {
            controller.begin().unwrap();
            controller.submit_credential(&credential(9)).unwrap();
            controller.submit_biometric(good_sample()).await.unwrap();
            controller
                .select_candidate(&shared_types::CandidateId::new("C001"))
                .unwrap();
            controller.submit_vote().await.unwrap();
        });

        for writer in writers {
            writer.await.unwrap();
        }
        signals.await.unwrap();
        voter.await.unwrap();

        let expected = 4 * 50 + 20 + 1;
        for _ in 0..200 {
            if kiosk.audit.len() == expected {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(kiosk.audit.len(), expected);
        assert_gapless(&kiosk);
        assert_eq!(kiosk.controller.security_status(), SecurityStatus::Warning);

        shutdown_tx.send(true).unwrap();
        for task in tasks {
            task.await.unwrap();
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_see_consistent_prefix() {
        let (kiosk, _clock) = wired_kiosk(&kiosk_config());

        let writer = {
            let audit = kiosk.audit.clone();
            tokio::spawn(async move {
                for i in 0..300 {
                    audit.append(NewSecurityEvent::warning(
                        EventSource::Scanner,
                        format!("scanner retry {i}"),
                    ));
                    if i % 10 == 0 {
                        tokio::task::yield_now().await;
                    }
                }
            })
        };

        let reader = {
            let controller = kiosk.controller.clone();
            let audit = kiosk.audit.clone();
            tokio::spawn(async move {
                for _ in 0..100 {
                    let recent = controller.recent_events(25);
                    // Newest first, strictly descending, no holes.
                    for pair in recent.windows(2) {
                        assert_eq!(pair[0].sequence, pair[1].sequence + 1);
                    }
                    let page = audit.query(Some(5), Some(10));
                    for (offset, event) in page.iter().enumerate() {
                        assert_eq!(event.sequence, 6 + offset as u64);
                    }
                    tokio::task::yield_now().await;
                }
            })
        };

        writer.await.unwrap();
        reader.await.unwrap();
        assert_gapless(&kiosk);
    }

    #[tokio::test]
    async fn test_tamper_alert_persists_until_resolved() {
        let (mut kiosk, _clock) = wired_kiosk(&kiosk_config());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let tasks = kiosk.start(shutdown_rx);

        let sender = kiosk.hardware_sender();
        sender.send(HardwareSignal::TamperOpened).await.unwrap();
        sender.send(HardwareSignal::EnclosureClosed).await.unwrap();
        for _ in 0..200 {
            if kiosk.audit.len() == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        // Closing the enclosure does not clear the alert.
        assert_eq!(kiosk.controller.security_status(), SecurityStatus::Alert);
        assert_eq!(
            kiosk.controller.component_status()[&EventSource::TamperSensor],
            SecurityStatus::Alert
        );

        shutdown_tx.send(true).unwrap();
        for task in tasks {
            task.await.unwrap();
        }
    }
}
