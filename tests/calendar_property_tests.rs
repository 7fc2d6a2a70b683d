//! Property tests for the calendar utility: the invariants every schedule
//! computation leans on.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use outreach_core::calendar::{
    add_business_days, adjust_for_weekend, count_business_days, is_weekend,
};

fn any_date() -> impl Strategy<Value = NaiveDate> {
    // A few years around the engine's era, covering many weekend layouts
    (0i64..2000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
    })
}

proptest! {
    /// Property: adding n >= 1 business days lands strictly after the start,
    /// on a weekday.
    #[test]
    fn add_business_days_is_monotonic_and_lands_on_weekdays(
        start in any_date(),
        n in 1i64..60,
    ) {
        let result = add_business_days(start, n);
        prop_assert!(result > start);
        prop_assert!(!is_weekend(result));
    }

    /// Property: counting back what was added returns exactly n, for every
    /// start date including weekends.
    #[test]
    fn count_business_days_round_trips_add(
        start in any_date(),
        n in 1i64..60,
    ) {
        let end = add_business_days(start, n);
        prop_assert_eq!(count_business_days(start, end), n);
    }

    /// Property: weekend adjustment never yields a weekend, never moves a
    /// weekday, and never moves any date forward.
    #[test]
    fn adjust_for_weekend_rolls_back_to_weekdays(date in any_date()) {
        let adjusted = adjust_for_weekend(date);
        prop_assert!(!is_weekend(adjusted));
        prop_assert!(adjusted <= date);
        if !is_weekend(date) {
            prop_assert_eq!(adjusted, date);
        } else {
            // The preceding Friday is at most two days back
            prop_assert!(date - adjusted <= Duration::days(2));
        }
    }

    /// Property: the count is antisymmetric; reversing the endpoints flips
    /// the sign.
    #[test]
    fn count_business_days_is_antisymmetric(a in any_date(), b in any_date()) {
        prop_assert_eq!(
            count_business_days(a, b),
            -count_business_days(b, a)
        );
    }

    /// Property: adding zero business days is the identity.
    #[test]
    fn add_zero_business_days_is_identity(start in any_date()) {
        prop_assert_eq!(add_business_days(start, 0), start);
    }
}
