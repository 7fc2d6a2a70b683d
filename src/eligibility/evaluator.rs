//! # Eligibility Evaluator (primary path)
//!
//! Decides whether a record is due for contact at its current stage today.
//!
//! Preconditions run in order with short-circuit: settlement exclusion,
//! manual completion, required attributes, terminal stage, same-day dedup.
//! The core decision then branches on the schedule unit:
//!
//! - **Calendar-day stages** derive each stage target freshly from the
//!   deadline (`adjust_for_weekend(deadline - offset)`). An exact match is
//!   due; a bounded catch-up window of business days after a missed target
//!   keeps the record eligible if that stage was never contacted. Stage
//!   adjustment is upward only: a record behind the derived target stage is
//!   contacted at the target stage, a record past it is skipped.
//! - **Business-day stages** are due exactly when the stored trigger date is
//!   today. The deadline/trigger ordering is deliberately not re-validated:
//!   a stricter check was observed to silently skip valid due-today records,
//!   so once the trigger date arrives the contact is unconditional.

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;

use crate::calendar::{adjust_for_weekend, count_business_days};
use crate::classification::CampaignClass;
use crate::models::PolicyRecord;
use crate::schedule::{self, ScheduleTemplate, ScheduleUnit};

use super::{EligibilityDecision, EligibilityPath, SkipReason};

pub struct EligibilityEvaluator {
    catch_up_window_business_days: i64,
    tz: Tz,
}

impl EligibilityEvaluator {
    pub fn new(catch_up_window_business_days: i64, tz: Tz) -> Self {
        Self {
            catch_up_window_business_days,
            tz,
        }
    }

    /// Evaluate one record against today's date. Pure: no clocks, no stores.
    pub fn evaluate(&self, record: &PolicyRecord, today: NaiveDate) -> EligibilityDecision {
        // Settlement wins over everything, classification included.
        if crate::classification::is_settled(&record.status_label) {
            return EligibilityDecision::skip(SkipReason::Settled);
        }
        if record.completed {
            return EligibilityDecision::skip(SkipReason::ManuallyCompleted);
        }

        if record.classification == CampaignClass::Unclassified {
            return EligibilityDecision::skip(SkipReason::Unclassified);
        }
        let Some(template) = schedule::template_for(record.classification) else {
            return EligibilityDecision::skip(SkipReason::Unclassified);
        };
        if let Some(reason) = self.required_attribute_gap(record) {
            return EligibilityDecision::skip(reason);
        }
        if template.is_terminal(record.stage) {
            return EligibilityDecision::skip(SkipReason::SequenceComplete {
                stage: record.stage,
            });
        }
        if super::dedup::contacted_on(&record.contact_history, today, self.tz) {
            return EligibilityDecision::skip(SkipReason::AlreadyContactedToday);
        }

        let stage_def = template
            .stage(record.stage)
            .expect("stage checked against terminal count above");

        match stage_def.unit {
            ScheduleUnit::CalendarDays => self.evaluate_calendar(record, template, today),
            ScheduleUnit::BusinessDays => self.evaluate_business(record, today),
        }
    }

    /// Classification-specific required attributes, absent-or-empty both
    /// counting as missing.
    fn required_attribute_gap(&self, record: &PolicyRecord) -> Option<SkipReason> {
        if record.classification.requires_deadline() && record.deadline_date.is_none() {
            return Some(SkipReason::MissingRequiredAttribute {
                field: "deadline_date".to_string(),
            });
        }
        if record.classification.requires_amount_due() && !record.has_amount_due() {
            return Some(SkipReason::MissingRequiredAttribute {
                field: "amount_due".to_string(),
            });
        }
        None
    }

    fn evaluate_calendar(
        &self,
        record: &PolicyRecord,
        template: &ScheduleTemplate,
        today: NaiveDate,
    ) -> EligibilityDecision {
        let deadline = record
            .deadline_date
            .expect("calendar-day classes require a deadline; gated above");

        // Walk every stage target and keep the latest one matching today,
        // either exactly or inside the catch-up window. Windows of adjacent
        // stages can collide across a weekend; the later stage wins.
        let mut due_stage: Option<u32> = None;
        for (index, stage_def) in template.stages.iter().enumerate() {
            let target = adjust_for_weekend(deadline - Duration::days(stage_def.offset_days));

            if today == target {
                due_stage = Some(index as u32);
            } else if today > target && record.stage as usize <= index {
                // Missed target; still eligible within the bounded catch-up
                // window as long as this stage was never contacted.
                let elapsed = count_business_days(target, today);
                if elapsed >= 1 && elapsed <= self.catch_up_window_business_days {
                    due_stage = Some(index as u32);
                }
            }
        }

        match due_stage {
            None => {
                let days_out = (deadline - today).num_days();
                EligibilityDecision::skip(SkipReason::NotDue {
                    detail: format!("no stage target matches today (deadline in {days_out} days)"),
                })
            }
            Some(target) if record.stage > target => {
                EligibilityDecision::skip(SkipReason::AlreadyPastStage {
                    current: record.stage,
                    target,
                })
            }
            Some(target) => EligibilityDecision::eligible(target, EligibilityPath::Primary),
        }
    }

    fn evaluate_business(&self, record: &PolicyRecord, today: NaiveDate) -> EligibilityDecision {
        match record.next_trigger_date {
            // Stage 0 needs its initial follow-up anchor before anything can
            // be due; later stages always have one set by the advancer.
            None => EligibilityDecision::skip(SkipReason::MissingRequiredAttribute {
                field: "next_trigger_date".to_string(),
            }),
            Some(trigger) if trigger == today => {
                // Due unconditionally; no deadline re-validation here.
                EligibilityDecision::eligible(record.stage, EligibilityPath::Primary)
            }
            Some(trigger) => EligibilityDecision::skip(SkipReason::NotDue {
                detail: format!("trigger date {trigger} is not today"),
            }),
        }
    }
}
