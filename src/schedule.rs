//! # Schedule Template Registry
//!
//! Static per-classification schedule templates: the ordered stage
//! definitions (offset, unit, calling mode, script variant) that drive the
//! eligibility evaluator and the stage advancer.
//!
//! Calendar-day stages carry a fixed offset from the deadline date and their
//! offsets strictly decrease toward it. Business-day stages carry no fixed
//! offset; their trigger dates are recomputed dynamically from the remaining
//! business days at each stage transition.

use serde::{Deserialize, Serialize};

use crate::classification::CampaignClass;

/// Unit a stage's trigger date is computed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleUnit {
    /// Fixed offset from the deadline, adjusted off weekends.
    CalendarDays,
    /// Dynamic trigger computed from remaining weekdays to the deadline.
    BusinessDays,
}

/// How a stage's eligible records are dispatched to the calling service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallingMode {
    /// All records of the partition concurrently, bounded fan-out.
    Batch,
    /// Strictly one record at a time.
    Sequential,
}

/// One stage of a campaign schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDefinition {
    /// Days before the deadline for calendar-day stages; unused (zero) for
    /// business-day stages.
    pub offset_days: i64,
    pub unit: ScheduleUnit,
    pub calling_mode: CallingMode,
    /// Script variant the calling service uses for this (class, stage).
    pub script_variant: &'static str,
}

/// Ordered stage list for one classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleTemplate {
    pub class: CampaignClass,
    pub stages: &'static [StageDefinition],
}

impl ScheduleTemplate {
    /// Stage count after which no further automatic contact occurs.
    pub fn terminal_stage_count(&self) -> u32 {
        self.stages.len() as u32
    }

    pub fn stage(&self, stage: u32) -> Option<&'static StageDefinition> {
        self.stages.get(stage as usize)
    }

    pub fn is_terminal(&self, stage: u32) -> bool {
        stage >= self.terminal_stage_count()
    }
}

const NON_PAYMENT_STAGES: &[StageDefinition] = &[
    StageDefinition {
        offset_days: 0,
        unit: ScheduleUnit::BusinessDays,
        calling_mode: CallingMode::Batch,
        script_variant: "non_payment_first_reminder",
    },
    StageDefinition {
        offset_days: 0,
        unit: ScheduleUnit::BusinessDays,
        calling_mode: CallingMode::Sequential,
        script_variant: "non_payment_second_reminder",
    },
    StageDefinition {
        offset_days: 0,
        unit: ScheduleUnit::BusinessDays,
        calling_mode: CallingMode::Sequential,
        script_variant: "non_payment_final_reminder",
    },
];

const RENEWAL_STAGES: &[StageDefinition] = &[
    StageDefinition {
        offset_days: 14,
        unit: ScheduleUnit::CalendarDays,
        calling_mode: CallingMode::Batch,
        script_variant: "renewal_first_reminder",
    },
    StageDefinition {
        offset_days: 7,
        unit: ScheduleUnit::CalendarDays,
        calling_mode: CallingMode::Sequential,
        script_variant: "renewal_second_reminder",
    },
    StageDefinition {
        offset_days: 1,
        unit: ScheduleUnit::CalendarDays,
        calling_mode: CallingMode::Sequential,
        script_variant: "renewal_final_reminder",
    },
    StageDefinition {
        offset_days: 0,
        unit: ScheduleUnit::CalendarDays,
        calling_mode: CallingMode::Sequential,
        script_variant: "renewal_final_reminder",
    },
];

const NON_RENEWAL_STAGES: &[StageDefinition] = &[
    StageDefinition {
        offset_days: 14,
        unit: ScheduleUnit::CalendarDays,
        calling_mode: CallingMode::Batch,
        script_variant: "non_renewal_notice",
    },
    StageDefinition {
        offset_days: 7,
        unit: ScheduleUnit::CalendarDays,
        calling_mode: CallingMode::Sequential,
        script_variant: "non_renewal_notice",
    },
    StageDefinition {
        offset_days: 1,
        unit: ScheduleUnit::CalendarDays,
        calling_mode: CallingMode::Sequential,
        script_variant: "non_renewal_final_notice",
    },
];

const PAYMENT_DUE_STAGES: &[StageDefinition] = &[
    StageDefinition {
        offset_days: 14,
        unit: ScheduleUnit::CalendarDays,
        calling_mode: CallingMode::Batch,
        script_variant: "payment_due_first_reminder",
    },
    StageDefinition {
        offset_days: 7,
        unit: ScheduleUnit::CalendarDays,
        calling_mode: CallingMode::Sequential,
        script_variant: "payment_due_second_reminder",
    },
    StageDefinition {
        offset_days: 3,
        unit: ScheduleUnit::CalendarDays,
        calling_mode: CallingMode::Sequential,
        script_variant: "payment_due_final_reminder",
    },
];

const REQUOTE_STAGES: &[StageDefinition] = &[
    StageDefinition {
        offset_days: 0,
        unit: ScheduleUnit::BusinessDays,
        calling_mode: CallingMode::Batch,
        script_variant: "requote_outreach",
    },
    StageDefinition {
        offset_days: 0,
        unit: ScheduleUnit::BusinessDays,
        calling_mode: CallingMode::Sequential,
        script_variant: "requote_follow_up",
    },
];

const NON_PAYMENT_TEMPLATE: ScheduleTemplate = ScheduleTemplate {
    class: CampaignClass::NonPayment,
    stages: NON_PAYMENT_STAGES,
};
const RENEWAL_TEMPLATE: ScheduleTemplate = ScheduleTemplate {
    class: CampaignClass::Renewal,
    stages: RENEWAL_STAGES,
};
const NON_RENEWAL_TEMPLATE: ScheduleTemplate = ScheduleTemplate {
    class: CampaignClass::NonRenewal,
    stages: NON_RENEWAL_STAGES,
};
const PAYMENT_DUE_TEMPLATE: ScheduleTemplate = ScheduleTemplate {
    class: CampaignClass::PaymentDue,
    stages: PAYMENT_DUE_STAGES,
};
const REQUOTE_TEMPLATE: ScheduleTemplate = ScheduleTemplate {
    class: CampaignClass::Requote,
    stages: REQUOTE_STAGES,
};

/// Look up the schedule template for a classification. `Unclassified` has no
/// template and is excluded from all scheduling.
pub fn template_for(class: CampaignClass) -> Option<&'static ScheduleTemplate> {
    match class {
        CampaignClass::NonPayment => Some(&NON_PAYMENT_TEMPLATE),
        CampaignClass::Renewal => Some(&RENEWAL_TEMPLATE),
        CampaignClass::NonRenewal => Some(&NON_RENEWAL_TEMPLATE),
        CampaignClass::PaymentDue => Some(&PAYMENT_DUE_TEMPLATE),
        CampaignClass::Requote => Some(&REQUOTE_TEMPLATE),
        CampaignClass::Unclassified => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TEMPLATES: &[&ScheduleTemplate] = &[
        &NON_PAYMENT_TEMPLATE,
        &RENEWAL_TEMPLATE,
        &NON_RENEWAL_TEMPLATE,
        &PAYMENT_DUE_TEMPLATE,
        &REQUOTE_TEMPLATE,
    ];

    #[test]
    fn test_calendar_offsets_strictly_decrease() {
        for template in ALL_TEMPLATES {
            let offsets: Vec<i64> = template
                .stages
                .iter()
                .filter(|s| s.unit == ScheduleUnit::CalendarDays)
                .map(|s| s.offset_days)
                .collect();
            for pair in offsets.windows(2) {
                assert!(
                    pair[0] > pair[1],
                    "{}: calendar offsets must strictly decrease toward the deadline",
                    template.class
                );
            }
        }
    }

    #[test]
    fn test_stage_zero_is_batch_later_stages_sequential() {
        for template in ALL_TEMPLATES {
            assert_eq!(template.stages[0].calling_mode, CallingMode::Batch);
            for stage in &template.stages[1..] {
                assert_eq!(stage.calling_mode, CallingMode::Sequential);
            }
        }
    }

    #[test]
    fn test_unclassified_has_no_template() {
        assert!(template_for(CampaignClass::Unclassified).is_none());
    }

    #[test]
    fn test_terminal_stage_counts() {
        assert_eq!(NON_PAYMENT_TEMPLATE.terminal_stage_count(), 3);
        assert_eq!(RENEWAL_TEMPLATE.terminal_stage_count(), 4);
        assert!(NON_PAYMENT_TEMPLATE.is_terminal(3));
        assert!(!NON_PAYMENT_TEMPLATE.is_terminal(2));
        assert!(NON_PAYMENT_TEMPLATE.stage(3).is_none());
    }
}
