//! Property-based tests for materialization decisions.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use uuid::Uuid;

use super::materialize::{Decision, RuleSnapshot, decide};

fn date() -> impl Strategy<Value = NaiveDate> {
    (0u64..20_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap()
    })
}

fn frequency() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("weekly"), Just("monthly"), Just("yearly")]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A due rule yields one occurrence at its cursor and moves the cursor
    /// forward.
    #[test]
    fn prop_due_rule_materializes_cursor(
        start in date(),
        lag in 0u64..400,
        ahead in 0u64..30,
        freq in frequency(),
    ) {
        let next = start.checked_add_days(Days::new(lag)).unwrap();
        let today = next.checked_add_days(Days::new(ahead)).unwrap();
        let rule = RuleSnapshot {
            id: Uuid::new_v4(),
            frequency: freq.to_string(),
            start_date: start,
            next_run_date: next,
            end_date: None,
            is_active: true,
        };

        match decide(&rule, today) {
            Decision::Materialize(occ) => {
                prop_assert_eq!(occ.due_date, next);
                prop_assert_eq!(occ.entry_date, today);
                prop_assert!(occ.next_run_date > next);
                prop_assert!(!occ.deactivate);
            }
            other => prop_assert!(false, "expected materialize, got {:?}", other),
        }
    }

    /// A rule due today is not due again once its cursor is moved.
    #[test]
    fn prop_same_day_rerun_not_due_when_current(start in date(), freq in frequency()) {
        let mut rule = RuleSnapshot {
            id: Uuid::new_v4(),
            frequency: freq.to_string(),
            start_date: start,
            next_run_date: start,
            end_date: None,
            is_active: true,
        };

        let Decision::Materialize(occ) = decide(&rule, start) else {
            return Err(TestCaseError::fail("expected materialize"));
        };
        rule.next_run_date = occ.next_run_date;

        prop_assert_eq!(decide(&rule, start), Decision::NotDue);
    }
}
