//! # Safety-Net Evaluator (secondary path)
//!
//! Guards against status-triggered records that should have matched a
//! simpler, status-only trigger but were missed, either because the primary
//! evaluator's stricter preconditions excluded them, or because a run-cycle
//! was skipped and their trigger date lapsed.
//!
//! Consulted only after the primary path declines; its result is unioned
//! into the eligible set, so a record is never selected by both paths.

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::classification::normalize;
use crate::models::PolicyRecord;
use crate::schedule;

use super::{shared_guards, EligibilityDecision, EligibilityPath, SkipReason};

pub struct SafetyNetEvaluator {
    lookback_days: i64,
    tz: Tz,
}

impl SafetyNetEvaluator {
    pub fn new(lookback_days: i64, tz: Tz) -> Self {
        Self { lookback_days, tz }
    }

    pub fn evaluate(&self, record: &PolicyRecord, today: NaiveDate) -> EligibilityDecision {
        let Some(trigger_status) = record.classification.trigger_status() else {
            return EligibilityDecision::skip(SkipReason::NotDue {
                detail: "classification is not status-triggered".to_string(),
            });
        };
        let Some(template) = schedule::template_for(record.classification) else {
            return EligibilityDecision::skip(SkipReason::Unclassified);
        };

        if let Some(reason) = shared_guards(record, template, today, self.tz) {
            return EligibilityDecision::skip(reason);
        }

        if normalize(&record.status_label) != trigger_status {
            return EligibilityDecision::skip(SkipReason::NotDue {
                detail: format!(
                    "status '{}' does not match the trigger status",
                    record.status_label
                ),
            });
        }

        // (i) never contacted: unconditional first outreach
        if record.stage == 0 && record.contact_history.is_empty() {
            return EligibilityDecision::eligible(0, EligibilityPath::SafetyNet);
        }

        // (ii) lapsed trigger date within the bounded lookback window,
        // uncontacted since. Today itself belongs to the primary path.
        if let Some(trigger) = record.next_trigger_date {
            let lapsed_days = (today - trigger).num_days();
            if lapsed_days >= 1 && lapsed_days <= self.lookback_days {
                let contacted_since = record
                    .contact_history
                    .iter()
                    .any(|event| event.local_date(self.tz) >= trigger);
                if !contacted_since {
                    return EligibilityDecision::eligible(
                        record.stage,
                        EligibilityPath::SafetyNet,
                    );
                }
            }
        }

        EligibilityDecision::skip(SkipReason::NotDue {
            detail: "no lapsed trigger within the lookback window".to_string(),
        })
    }
}
