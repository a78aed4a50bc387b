//! Property-based tests for trial evaluation.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use super::TrialPolicy;

/// Instants between 2020 and 2035.
fn instant() -> impl Strategy<Value = DateTime<Utc>> {
    (1_577_836_800i64..2_051_222_400i64).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Expired exactly when `now >= trial_end`, and no days remain once expired.
    #[test]
    fn prop_expired_iff_past_end(
        created in instant(),
        offset_secs in -30i64 * 86_400..30 * 86_400,
        days in 1i64..60,
    ) {
        let policy = TrialPolicy::new(days);
        let trial_end = created + Duration::days(days);
        let now = trial_end + Duration::seconds(offset_secs);

        let status = policy.evaluate(created, None, now);

        prop_assert_eq!(status.expired, now >= trial_end);
        if status.expired {
            prop_assert_eq!(status.remaining_days, 0);
        } else {
            prop_assert!(status.remaining_days >= 1);
            prop_assert!(status.remaining_days <= days + 30);
        }
    }

    /// Remaining days never exceed the distance to the end by a full day.
    #[test]
    fn prop_remaining_days_is_ceiling(
        now in instant(),
        left_secs in 1i64..90 * 86_400,
    ) {
        let policy = TrialPolicy::default();
        let end = now + Duration::seconds(left_secs);

        let status = policy.evaluate(now, Some(end), now);

        prop_assert!(status.remaining_days * 86_400 >= left_secs);
        prop_assert!((status.remaining_days - 1) * 86_400 < left_secs);
    }
}
