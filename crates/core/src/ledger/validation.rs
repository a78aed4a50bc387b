//! Field rules shared by entries, rules, purchases and categories.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::EntryStatus;

/// Color given to categories created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#94a3b8";

/// Largest value `numeric(12,2)` holds.
const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Dates an entry is stored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryDates {
    /// Bookkeeping date.
    pub entry_date: NaiveDate,
    /// Set only while pending.
    pub due_date: Option<NaiveDate>,
    /// Set only once paid.
    pub payment_date: Option<NaiveDate>,
}

/// Resolves the stored dates of an entry from its status.
///
/// `entry_date` defaults to `today`. A pending entry keeps a due date
/// (defaulting to the entry date) and no payment date; a paid entry keeps a
/// payment date (defaulting to the entry date) and no due date.
#[must_use]
pub fn resolve_dates(
    status: EntryStatus,
    entry_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    payment_date: Option<NaiveDate>,
    today: NaiveDate,
) -> EntryDates {
    let entry_date = entry_date.unwrap_or(today);
    match status {
        EntryStatus::Pendente => EntryDates {
            entry_date,
            due_date: Some(due_date.unwrap_or(entry_date)),
            payment_date: None,
        },
        EntryStatus::Pago => EntryDates {
            entry_date,
            due_date: None,
            payment_date: Some(payment_date.unwrap_or(entry_date)),
        },
    }
}

/// Trims and checks a description.
///
/// # Errors
///
/// Returns `LedgerError::EmptyDescription` if nothing is left after trimming.
pub fn validate_description(description: &str) -> Result<String, LedgerError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}

/// Checks that an amount is positive and fits `numeric(12,2)`.
///
/// # Errors
///
/// Returns an error for zero/negative amounts, more than two decimals, or
/// values above 9 999 999 999.99.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount);
    }
    if amount.normalize().scale() > 2 {
        return Err(LedgerError::TooManyDecimals);
    }
    if amount > MAX_AMOUNT {
        return Err(LedgerError::AmountTooLarge);
    }
    Ok(amount)
}

/// Validates a category name and optional color, returning the trimmed
/// name and the color to store.
///
/// # Errors
///
/// Returns `EmptyCategoryName` for a blank name and `InvalidColor` for a
/// color that is not `#RRGGBB`.
pub fn validate_category(name: &str, color: Option<&str>) -> Result<(String, String), LedgerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::EmptyCategoryName);
    }

    let color = match color.map(str::trim) {
        None | Some("") => DEFAULT_CATEGORY_COLOR.to_string(),
        Some(c) if is_hex_color(c) => c.to_ascii_lowercase(),
        Some(c) => return Err(LedgerError::InvalidColor(c.to_string())),
    };

    Ok((name.to_string(), color))
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
