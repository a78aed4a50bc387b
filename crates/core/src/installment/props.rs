//! Property-based tests for installment expansion.

use chrono::{Datelike, Days, NaiveDate};
use proptest::prelude::*;

use super::{MAX_INSTALLMENTS, MIN_INSTALLMENTS, expand};

fn date() -> impl Strategy<Value = NaiveDate> {
    (0u64..20_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap()
    })
}

fn month_index(d: NaiveDate) -> i64 {
    i64::from(d.year()) * 12 + i64::from(d.month0())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// `n` rows, strictly increasing dates one calendar month apart, and
    /// positions `1..=n`.
    #[test]
    fn prop_plan_shape(base in date(), count in MIN_INSTALLMENTS..=MAX_INSTALLMENTS) {
        let plan = expand(&(), count, base).unwrap();

        prop_assert_eq!(plan.len(), count as usize);
        prop_assert_eq!(plan[0].purchase_date, base);
        for (idx, pair) in plan.windows(2).enumerate() {
            prop_assert!(pair[1].purchase_date > pair[0].purchase_date);
            prop_assert_eq!(month_index(pair[1].purchase_date) - month_index(pair[0].purchase_date), 1);
            prop_assert_eq!(pair[0].current_installment, i32::try_from(idx).unwrap() + 1);
        }
        prop_assert_eq!(plan[plan.len() - 1].current_installment, i32::try_from(count).unwrap());
    }
}
