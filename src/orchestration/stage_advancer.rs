//! # Stage Advancer
//!
//! After a confirmed contact, computes the new stage and, for business-day
//! schedules, the next trigger date using halving-interval backoff: the
//! first transition books the follow-up a third of the remaining business
//! days out, the second half of them, so successive reminders compress as
//! the deadline approaches.
//!
//! Calendar-day stages stay stateless between runs: no trigger date is
//! stored, and the next target is re-derived from the deadline and the
//! stage offset on every pass.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::calendar::{add_business_days, count_business_days};
use crate::constants::system;
use crate::schedule::{ScheduleTemplate, ScheduleUnit};

use super::types::StageAdvance;

/// Divisor for the remaining-business-days interval at each transition.
fn backoff_divisor(contacted_stage: u32) -> f64 {
    if contacted_stage == 0 {
        3.0
    } else {
        2.0
    }
}

/// Compute the advancement for a contact made today at `contacted_stage`.
pub fn advance(
    template: &ScheduleTemplate,
    contacted_stage: u32,
    deadline: Option<NaiveDate>,
    today: NaiveDate,
) -> StageAdvance {
    let new_stage = contacted_stage + 1;

    if template.is_terminal(new_stage) {
        // No further automatic contact. Completion stays a manual action.
        debug!(
            class = %template.class,
            new_stage = new_stage,
            "Terminal stage reached; clearing trigger date"
        );
        return StageAdvance {
            new_stage,
            next_trigger_date: None,
        };
    }

    let next_def = template
        .stage(new_stage)
        .expect("non-terminal stage exists");

    match next_def.unit {
        ScheduleUnit::CalendarDays => {
            // Stateless between runs; the evaluator re-derives the target.
            StageAdvance {
                new_stage,
                next_trigger_date: None,
            }
        }
        ScheduleUnit::BusinessDays => {
            // Status-triggered classes may carry no deadline; without one the
            // halving interval has no anchor, so fall back to a fixed gap
            // rather than stalling the record forever.
            let Some(deadline) = deadline else {
                let next_trigger =
                    add_business_days(today, system::FALLBACK_FOLLOW_UP_BUSINESS_DAYS);
                warn!(
                    class = %template.class,
                    new_stage = new_stage,
                    next_trigger = %next_trigger,
                    "Business-day stage without a deadline; using the fallback interval"
                );
                return StageAdvance {
                    new_stage,
                    next_trigger_date: Some(next_trigger),
                };
            };

            let remaining = count_business_days(today, deadline);
            let interval =
                ((remaining as f64 / backoff_divisor(contacted_stage)).round() as i64).max(1);
            let next_trigger = add_business_days(today, interval);

            debug!(
                class = %template.class,
                stage_transition = %format!("{contacted_stage}->{new_stage}"),
                remaining_business_days = remaining,
                interval = interval,
                next_trigger = %next_trigger,
                "📅 Computed business-day follow-up"
            );

            StageAdvance {
                new_stage,
                next_trigger_date: Some(next_trigger),
            }
        }
    }
}
