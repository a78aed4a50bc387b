//! Property-based tests for date advancing.

use chrono::{Datelike, Days, NaiveDate};
use proptest::prelude::*;

use super::frequency::Frequency;
use super::schedule::{add_months, advance_anchored, next_run_date};

/// Dates between 1990 and 2100.
fn date() -> impl Strategy<Value = NaiveDate> {
    (0u64..40_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1990, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap()
    })
}

fn frequency() -> impl Strategy<Value = Frequency> {
    prop_oneof![
        Just(Frequency::Weekly),
        Just(Frequency::Monthly),
        Just(Frequency::Yearly)
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Twelve monthly steps equal one yearly step.
    #[test]
    fn prop_twelve_months_is_one_year(start in date()) {
        let anchor = start.day();
        let mut cursor = start;
        for _ in 0..12 {
            cursor = next_run_date(cursor, "monthly", anchor);
        }
        prop_assert_eq!(cursor, next_run_date(start, "yearly", anchor));
    }

    /// The cursor only moves forward.
    #[test]
    fn prop_advance_is_strictly_forward(start in date(), freq in frequency()) {
        prop_assert!(advance_anchored(start, freq, start.day()) > start);
    }

    /// Month arithmetic keeps the anchor whenever the month is long enough.
    #[test]
    fn prop_anchor_clamped_to_month(start in date(), months in 0u32..48, anchor in 1u32..=31) {
        let result = add_months(start, months, anchor).unwrap();
        prop_assert!(result.day() <= anchor);
        let month_index = |d: NaiveDate| i64::from(d.year()) * 12 + i64::from(d.month0());
        prop_assert_eq!(month_index(result) - month_index(start), i64::from(months));
        if result.day() < anchor {
            // clamped: the result is the last day of its month
            prop_assert_eq!(result.succ_opt().unwrap().day(), 1);
        }
    }
}
