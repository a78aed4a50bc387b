//! Property-based tests for entry date resolution.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use super::types::EntryStatus;
use super::validation::resolve_dates;

fn date() -> impl Strategy<Value = NaiveDate> {
    (0u64..10_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2015, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap()
    })
}

fn status() -> impl Strategy<Value = EntryStatus> {
    prop_oneof![Just(EntryStatus::Pago), Just(EntryStatus::Pendente)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Exactly one of due date and payment date is set, matching the status.
    #[test]
    fn prop_due_and_payment_exclusive(
        status in status(),
        entry in proptest::option::of(date()),
        due in proptest::option::of(date()),
        paid in proptest::option::of(date()),
        today in date(),
    ) {
        let dates = resolve_dates(status, entry, due, paid, today);

        match status {
            EntryStatus::Pendente => {
                prop_assert!(dates.due_date.is_some());
                prop_assert!(dates.payment_date.is_none());
            }
            EntryStatus::Pago => {
                prop_assert!(dates.due_date.is_none());
                prop_assert!(dates.payment_date.is_some());
            }
        }
        prop_assert_eq!(dates.entry_date, entry.unwrap_or(today));
    }
}
