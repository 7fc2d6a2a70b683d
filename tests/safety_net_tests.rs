//! Safety-net scenario tests: the status-only secondary path and its
//! precedence relative to the primary evaluator.

mod common;

use chrono_tz::Tz;
use common::{contact_event_at, date, pacific_morning, RawRecordBuilder};
use outreach_core::eligibility::{
    EligibilityDecision, EligibilityEvaluator, EligibilityPath, SafetyNetEvaluator,
};
use outreach_core::models::PolicyRecord;

fn tz() -> Tz {
    "America/Los_Angeles".parse().unwrap()
}

fn evaluators() -> (EligibilityEvaluator, SafetyNetEvaluator) {
    (
        EligibilityEvaluator::new(2, tz()),
        SafetyNetEvaluator::new(7, tz()),
    )
}

fn requote(record_id: &str) -> RawRecordBuilder {
    RawRecordBuilder::new(record_id)
        .reason("Re-Quote")
        .status("Re-Quote")
}

#[test]
fn primary_declines_and_safety_net_catches_fresh_record() {
    // A status-triggered record with no follow-up anchor: the primary path
    // declines (missing trigger date), the safety net re-admits it.
    let (primary, net) = evaluators();
    let record = PolicyRecord::from_raw(requote("q1").build()).unwrap();
    let today = date(2026, 3, 2);

    let first = primary.evaluate(&record, today);
    assert!(!first.is_eligible());

    assert_eq!(
        net.evaluate(&record, today),
        EligibilityDecision::Eligible {
            stage: 0,
            path: EligibilityPath::SafetyNet
        }
    );
}

#[test]
fn safety_net_never_overrides_a_primary_selection() {
    // With a trigger date equal to today the primary path selects the
    // record; the orchestrator then never consults the safety net. Verify
    // the primary decision stands on its own.
    let (primary, _net) = evaluators();
    let record = PolicyRecord::from_raw(
        requote("q2").next_trigger("2026-03-02").build(),
    )
    .unwrap();

    assert_eq!(
        primary.evaluate(&record, date(2026, 3, 2)),
        EligibilityDecision::Eligible {
            stage: 0,
            path: EligibilityPath::Primary
        }
    );
}

#[test]
fn lapsed_trigger_within_lookback_is_rescued() {
    let (primary, net) = evaluators();
    let record = PolicyRecord::from_raw(
        requote("q3")
            .stage(1)
            .next_trigger("2026-02-26")
            .with_contact(contact_event_at(pacific_morning(2026, 2, 10)))
            .build(),
    )
    .unwrap();
    let today = date(2026, 3, 2);

    // Primary: trigger date is in the past, not today
    assert!(!primary.evaluate(&record, today).is_eligible());
    // Safety net: lapsed 4 days ago, uncontacted since, within 7-day window
    assert_eq!(
        net.evaluate(&record, today),
        EligibilityDecision::Eligible {
            stage: 1,
            path: EligibilityPath::SafetyNet
        }
    );
}

#[test]
fn lapse_older_than_lookback_stays_dropped() {
    let (_, net) = evaluators();
    let record = PolicyRecord::from_raw(
        requote("q4")
            .stage(1)
            .next_trigger("2026-02-10")
            .with_contact(contact_event_at(pacific_morning(2026, 2, 2)))
            .build(),
    )
    .unwrap();

    // 20 days lapsed: outside the bounded window
    assert!(!net.evaluate(&record, date(2026, 3, 2)).is_eligible());
}

#[test]
fn wrong_status_is_not_rescued() {
    let (_, net) = evaluators();
    let record = PolicyRecord::from_raw(
        requote("q5").status("Pending UW Review").build(),
    )
    .unwrap();

    assert!(!net.evaluate(&record, date(2026, 3, 2)).is_eligible());
}

#[test]
fn non_status_triggered_classes_never_use_the_net() {
    let (_, net) = evaluators();
    let record = PolicyRecord::from_raw(
        RawRecordBuilder::new("q6")
            .reason("Renewal")
            .status("Renewal")
            .deadline("2026-03-20")
            .build(),
    )
    .unwrap();

    assert!(!net.evaluate(&record, date(2026, 3, 2)).is_eligible());
}
