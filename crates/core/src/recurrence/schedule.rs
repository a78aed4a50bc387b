//! Date advancing for recurring rules.
//!
//! Month arithmetic is anchored: months are added to the calendar month and
//! the rule's anchor day (the day-of-month it started on) is clamped to the
//! length of the target month. `Jan 31 -> Feb 28 -> Mar 31 -> Apr 30`.
//! A year is twelve months under the same rule, so twelve monthly steps land
//! on the same date as one yearly step.
//!
//! Dates past the calendar's representable range stay unchanged.

use chrono::{Datelike, Days, NaiveDate};

use super::frequency::Frequency;

/// Number of days in `month` of `year`.
fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|last| last.day())
}

/// Adds `months` calendar months to `date`, placing the result on
/// `anchor_day` clamped to the target month's length.
///
/// Returns `None` when the result is outside the representable range.
#[must_use]
pub fn add_months(date: NaiveDate, months: u32, anchor_day: u32) -> Option<NaiveDate> {
    let total = i64::from(date.year()) * 12 + i64::from(date.month0()) + i64::from(months);
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
    let day = anchor_day.clamp(1, 31).min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Advances `current` by one step of `frequency`, keeping `anchor_day` for
/// month-based cadences.
#[must_use]
pub fn advance_anchored(current: NaiveDate, frequency: Frequency, anchor_day: u32) -> NaiveDate {
    let next = match frequency {
        Frequency::Weekly => current.checked_add_days(Days::new(7)),
        Frequency::Monthly => add_months(current, 1, anchor_day),
        Frequency::Yearly => add_months(current, 12, anchor_day),
    };
    next.unwrap_or(current)
}

/// Advances a stored cursor by its stored frequency string, keeping the
/// rule's `anchor_day` (the day-of-month of its start date).
///
/// Unknown frequencies leave the date unchanged.
#[must_use]
pub fn next_run_date(current: NaiveDate, frequency: &str, anchor_day: u32) -> NaiveDate {
    frequency
        .parse::<Frequency>()
        .map_or(current, |freq| advance_anchored(current, freq, anchor_day))
}

/// Lists up to `count` upcoming occurrences starting at `from` (inclusive),
/// stopping after `end_date` when one is set.
#[must_use]
pub fn preview(
    from: NaiveDate,
    frequency: Frequency,
    anchor_day: u32,
    count: usize,
    end_date: Option<NaiveDate>,
) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(count);
    let mut cursor = from;

    while dates.len() < count && end_date.is_none_or(|end| cursor <= end) {
        dates.push(cursor);
        let next = advance_anchored(cursor, frequency, anchor_day);
        if next == cursor {
            break;
        }
        cursor = next;
    }

    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_weekly_adds_seven_days() {
        assert_eq!(
            advance_anchored(d(2025, 12, 29), Frequency::Weekly, 29),
            d(2026, 1, 5)
        );
    }

    #[rstest]
    #[case(d(2025, 1, 15), d(2025, 2, 15))]
    #[case(d(2025, 1, 31), d(2025, 2, 28))]
    #[case(d(2024, 1, 31), d(2024, 2, 29))]
    #[case(d(2025, 12, 31), d(2026, 1, 31))]
    fn test_monthly(#[case] from: NaiveDate, #[case] expected: NaiveDate) {
        assert_eq!(advance_anchored(from, Frequency::Monthly, from.day()), expected);
    }

    #[test]
    fn test_anchor_restores_day_after_short_month() {
        let feb = advance_anchored(d(2025, 1, 31), Frequency::Monthly, 31);
        assert_eq!(feb, d(2025, 2, 28));
        let mar = advance_anchored(feb, Frequency::Monthly, 31);
        assert_eq!(mar, d(2025, 3, 31));
        let apr = advance_anchored(mar, Frequency::Monthly, 31);
        assert_eq!(apr, d(2025, 4, 30));
    }

    #[rstest]
    #[case(d(2024, 2, 29), d(2025, 2, 28))]
    #[case(d(2025, 6, 10), d(2026, 6, 10))]
    fn test_yearly(#[case] from: NaiveDate, #[case] expected: NaiveDate) {
        assert_eq!(advance_anchored(from, Frequency::Yearly, from.day()), expected);
    }

    #[test]
    fn test_unknown_frequency_is_noop() {
        let today = d(2025, 3, 10);
        assert_eq!(next_run_date(today, "fortnightly", 10), today);
        assert_eq!(next_run_date(today, "", 10), today);
        assert_eq!(next_run_date(today, "weekly", 10), d(2025, 3, 17));
    }

    #[test]
    fn test_stored_frequency_keeps_anchor() {
        let mut cursor = d(2025, 1, 31);
        for _ in 0..12 {
            cursor = next_run_date(cursor, "monthly", 31);
        }
        assert_eq!(cursor, d(2026, 1, 31));
        assert_eq!(next_run_date(d(2025, 1, 31), "yearly", 31), d(2026, 1, 31));
        assert_eq!(next_run_date(d(2025, 2, 28), "monthly", 31), d(2025, 3, 31));
    }

    #[test]
    fn test_preview_respects_count_and_end() {
        let dates = preview(d(2025, 1, 31), Frequency::Monthly, 31, 4, None);
        assert_eq!(
            dates,
            vec![d(2025, 1, 31), d(2025, 2, 28), d(2025, 3, 31), d(2025, 4, 30)]
        );

        let dates = preview(d(2025, 1, 1), Frequency::Weekly, 1, 10, Some(d(2025, 1, 15)));
        assert_eq!(dates, vec![d(2025, 1, 1), d(2025, 1, 8), d(2025, 1, 15)]);
    }

    #[test]
    fn test_preview_empty_when_cursor_past_end() {
        let dates = preview(d(2025, 2, 1), Frequency::Monthly, 1, 6, Some(d(2025, 1, 31)));
        assert!(dates.is_empty());
    }

    #[test]
    fn test_add_months_at_range_edge() {
        assert!(add_months(NaiveDate::MAX, 1, 1).is_none());
        assert_eq!(
            advance_anchored(NaiveDate::MAX, Frequency::Weekly, 1),
            NaiveDate::MAX
        );
    }
}
