//! End-to-end orchestration tests over the in-memory collaborators:
//! idempotency, failure containment, the reduced-write fallback, and the
//! dispatch modes.

mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use common::{non_payment_due, pacific_morning, RawRecordBuilder};
use outreach_core::config::OutreachConfig;
use outreach_core::models::RawRecord;
use outreach_core::orchestration::{CampaignOrchestrator, OrchestrationError};
use outreach_core::test_helpers::{
    failed_outcome, InMemoryRecordStore, ScriptedVoiceService,
};

fn test_config() -> OutreachConfig {
    let mut config = OutreachConfig::default();
    config.dispatch.max_concurrent_calls = 2;
    config.dispatch.call_timeout_seconds = 5;
    config.persistence.retry_delay_ms = 10;
    config.gating.enabled = false;
    config
}

fn orchestrator(
    records: Vec<RawRecord>,
) -> (
    CampaignOrchestrator<InMemoryRecordStore, ScriptedVoiceService>,
    Arc<InMemoryRecordStore>,
    Arc<ScriptedVoiceService>,
) {
    let store = Arc::new(InMemoryRecordStore::new(records));
    let voice = Arc::new(ScriptedVoiceService::new());
    let orchestrator =
        CampaignOrchestrator::new(Arc::clone(&store), Arc::clone(&voice), test_config()).unwrap();
    (orchestrator, store, voice)
}

#[tokio::test]
async fn contact_advances_stage_and_books_business_day_follow_up() {
    // Mon 2026-01-05 with deadline Fri 2026-01-16: 9 business days remain,
    // so the 0 -> 1 transition books the follow-up 3 business days out.
    let (orchestrator, store, voice) =
        orchestrator(vec![non_payment_due("c1", "2026-01-05", "2026-01-16")]);

    let summary = orchestrator
        .run_pass(pacific_morning(2026, 1, 5), false)
        .await
        .unwrap();

    assert_eq!(summary.eligible, 1);
    assert_eq!(summary.contacts_persisted, 1);
    assert_eq!(voice.calls_placed().len(), 1);
    assert_eq!(
        voice.calls_placed()[0].script_variant,
        "non_payment_first_reminder"
    );

    let stored = store.record("c1").unwrap();
    assert_eq!(stored.stage.as_deref(), Some("1"));
    assert_eq!(stored.next_trigger_date.as_deref(), Some("2026-01-08"));
    assert_eq!(stored.contact_history.len(), 1);
}

#[tokio::test]
async fn two_passes_on_the_same_day_contact_once() {
    let (orchestrator, store, _voice) =
        orchestrator(vec![non_payment_due("c2", "2026-01-05", "2026-01-16")]);

    let first = orchestrator
        .run_pass(pacific_morning(2026, 1, 5), false)
        .await
        .unwrap();
    assert_eq!(first.contacts_persisted, 1);

    // Second invocation an hour later, same calendar date
    let later = Utc.with_ymd_and_hms(2026, 1, 5, 19, 0, 0).unwrap();
    let second = orchestrator.run_pass(later, false).await.unwrap();
    assert_eq!(second.eligible, 0);
    assert_eq!(second.contacts_persisted, 0);

    assert_eq!(store.record("c2").unwrap().contact_history.len(), 1);
}

#[tokio::test]
async fn placement_failure_leaves_record_eligible_for_next_pass() {
    let (orchestrator, store, voice) =
        orchestrator(vec![non_payment_due("c3", "2026-01-05", "2026-01-16")]);
    voice.script("c3", Ok(failed_outcome()));

    let summary = orchestrator
        .run_pass(pacific_morning(2026, 1, 5), false)
        .await
        .unwrap();

    assert_eq!(summary.contacts_failed, 1);
    assert_eq!(summary.contacts_persisted, 0);

    // Untouched: same stage, no history, so the next pass can retry
    let stored = store.record("c3").unwrap();
    assert!(stored.stage.is_none());
    assert!(stored.contact_history.is_empty());
}

#[tokio::test]
async fn persistence_falls_back_to_reduced_write() {
    let (orchestrator, store, _voice) =
        orchestrator(vec![non_payment_due("c4", "2026-01-05", "2026-01-16")]);
    store.fail_next_updates("c4", 3);

    let summary = orchestrator
        .run_pass(pacific_morning(2026, 1, 5), false)
        .await
        .unwrap();
    assert_eq!(summary.reduced_writes, 1);

    // Stage is stale but the contact marker landed...
    let stored = store.record("c4").unwrap();
    assert!(stored.stage.is_none());
    assert_eq!(stored.contact_history.len(), 1);

    // ...so a second same-day pass is still blocked by the dedup guard.
    let later = Utc.with_ymd_and_hms(2026, 1, 5, 20, 0, 0).unwrap();
    let second = orchestrator.run_pass(later, false).await.unwrap();
    assert_eq!(second.eligible, 0);
    assert_eq!(store.record("c4").unwrap().contact_history.len(), 1);
}

#[tokio::test]
async fn losing_even_the_reduced_write_is_surfaced() {
    let (orchestrator, store, _voice) =
        orchestrator(vec![non_payment_due("c5", "2026-01-05", "2026-01-16")]);
    store.fail_next_updates("c5", 3);
    store.fail_reduced_writes("c5");

    let summary = orchestrator
        .run_pass(pacific_morning(2026, 1, 5), false)
        .await
        .unwrap();

    assert_eq!(summary.persistence_lost, 1);
    assert_eq!(summary.contacts_persisted, 0);
}

#[tokio::test]
async fn terminal_contact_clears_trigger_and_never_sets_completed() {
    // Final stage (2 of 3): contact advances to the terminal count
    let record = RawRecordBuilder::new("c6")
        .reason("Cancellation - Non-Payment")
        .amount_due("$88.00")
        .deadline("2026-01-16")
        .stage(2)
        .next_trigger("2026-01-13")
        .build();
    let (orchestrator, store, _voice) = orchestrator(vec![record]);

    let summary = orchestrator
        .run_pass(pacific_morning(2026, 1, 13), false)
        .await
        .unwrap();
    assert_eq!(summary.contacts_persisted, 1);

    let stored = store.record("c6").unwrap();
    assert_eq!(stored.stage.as_deref(), Some("3"));
    assert!(stored.next_trigger_date.is_none());
    // Close-out stays manual
    assert_ne!(stored.completed, Some(true));

    // The terminal record is never selected again
    let next_day = orchestrator
        .run_pass(pacific_morning(2026, 1, 14), false)
        .await
        .unwrap();
    assert_eq!(next_day.eligible, 0);
}

#[tokio::test]
async fn sequential_partition_isolates_per_record_failure() {
    // Two stage-1 records (sequential mode), the first one failing
    let make = |id: &str| {
        RawRecordBuilder::new(id)
            .reason("Cancellation - Non-Payment")
            .amount_due("$10.00")
            .deadline("2026-01-16")
            .stage(1)
            .next_trigger("2026-01-08")
            .build()
    };
    let (orchestrator, store, voice) = orchestrator(vec![make("s1"), make("s2")]);
    voice.script("s1", Err("carrier rejected the call".to_string()));

    let summary = orchestrator
        .run_pass(pacific_morning(2026, 1, 8), false)
        .await
        .unwrap();

    assert_eq!(summary.contacts_failed, 1);
    assert_eq!(summary.contacts_persisted, 1);
    assert!(store.record("s1").unwrap().contact_history.is_empty());
    assert_eq!(store.record("s2").unwrap().contact_history.len(), 1);
}

#[tokio::test]
async fn batch_dispatch_honors_the_concurrency_bound() {
    let records: Vec<RawRecord> = (0..5)
        .map(|i| non_payment_due(&format!("b{i}"), "2026-01-05", "2026-01-16"))
        .collect();

    let store = Arc::new(InMemoryRecordStore::new(records));
    let voice =
        Arc::new(ScriptedVoiceService::new().with_call_delay(Duration::from_millis(50)));
    let orchestrator =
        CampaignOrchestrator::new(Arc::clone(&store), Arc::clone(&voice), test_config()).unwrap();

    let summary = orchestrator
        .run_pass(pacific_morning(2026, 1, 5), false)
        .await
        .unwrap();

    assert_eq!(summary.contacts_persisted, 5);
    assert_eq!(voice.calls_placed().len(), 5);
    assert!(
        voice.max_concurrent_calls() <= 2,
        "batch fan-out exceeded the configured bound: {}",
        voice.max_concurrent_calls()
    );
}

#[tokio::test]
async fn unreachable_store_aborts_the_pass() {
    let (orchestrator, store, _voice) = orchestrator(vec![]);
    store.set_unavailable(true);

    let result = orchestrator
        .run_pass(pacific_morning(2026, 1, 5), false)
        .await;
    assert!(matches!(
        result,
        Err(OrchestrationError::StoreUnavailable { .. })
    ));
}

#[tokio::test]
async fn time_gate_blocks_unforced_early_pass() {
    let mut config = test_config();
    config.gating.enabled = true;

    let store = Arc::new(InMemoryRecordStore::new(vec![non_payment_due(
        "g1",
        "2026-01-05",
        "2026-01-16",
    )]));
    let voice = Arc::new(ScriptedVoiceService::new());
    let orchestrator =
        CampaignOrchestrator::new(Arc::clone(&store), Arc::clone(&voice), config).unwrap();

    // 11:00 UTC is 03:00 Pacific: outside the calling window
    let small_hours = Utc.with_ymd_and_hms(2026, 1, 5, 11, 0, 0).unwrap();

    let gated = orchestrator.run_pass(small_hours, false).await.unwrap();
    assert!(gated.gated);
    assert!(voice.calls_placed().is_empty());

    // A forced run at the same instant proceeds
    let forced = orchestrator.run_pass(small_hours, true).await.unwrap();
    assert!(!forced.gated);
    assert_eq!(forced.contacts_persisted, 1);
}

#[tokio::test]
async fn ingestion_failures_are_isolated() {
    let broken = RawRecord {
        record_id: "x1".to_string(),
        // No company, no phone: fails ingestion
        ..RawRecord::default()
    };
    let (orchestrator, _store, _voice) = orchestrator(vec![
        broken,
        non_payment_due("x2", "2026-01-05", "2026-01-16"),
    ]);

    let summary = orchestrator
        .run_pass(pacific_morning(2026, 1, 5), false)
        .await
        .unwrap();

    assert_eq!(summary.ingestion_failures, 1);
    assert_eq!(summary.contacts_persisted, 1);
}

#[tokio::test]
async fn safety_net_records_join_the_eligible_set() {
    let requote = RawRecordBuilder::new("q1")
        .reason("Re-Quote")
        .status("Re-Quote")
        .build();
    let (orchestrator, store, voice) = orchestrator(vec![requote]);

    let summary = orchestrator
        .run_pass(pacific_morning(2026, 1, 5), false)
        .await
        .unwrap();

    assert_eq!(summary.eligible, 1);
    assert_eq!(summary.contacts_persisted, 1);
    assert_eq!(voice.calls_placed()[0].script_variant, "requote_outreach");
    let stored = store.record("q1").unwrap();
    assert_eq!(stored.stage.as_deref(), Some("1"));
    // No deadline: the follow-up books the fallback interval (5 business
    // days from Mon 2026-01-05)
    assert_eq!(stored.next_trigger_date.as_deref(), Some("2026-01-12"));
}

#[tokio::test]
async fn voicemail_outcome_still_advances_the_stage() {
    // A voicemail is a placed-and-concluded contact, not a placement failure
    let (orchestrator, store, voice) =
        orchestrator(vec![non_payment_due("v1", "2026-01-05", "2026-01-16")]);
    voice.script("v1", Ok(outreach_core::test_helpers::voicemail_outcome()));

    let summary = orchestrator
        .run_pass(pacific_morning(2026, 1, 5), false)
        .await
        .unwrap();

    assert_eq!(summary.contacts_persisted, 1);
    let stored = store.record("v1").unwrap();
    assert_eq!(stored.stage.as_deref(), Some("1"));
    assert_eq!(
        stored.contact_history[0].ended_reason,
        outreach_core::models::EndedReason::Voicemail
    );
}
