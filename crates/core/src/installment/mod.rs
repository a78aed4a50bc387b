//! Installment plans for credit-card purchases.
//!
//! A parcelled purchase is stored as one row per installment, all generated
//! when the purchase is created. Row `i` (0-indexed) falls `i` months after
//! the base date, anchored at the base date's day-of-month.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::recurrence::add_months;

#[cfg(test)]
mod props;

/// Smallest count that makes a purchase parcelled.
pub const MIN_INSTALLMENTS: u32 = 2;

/// Largest accepted installment count (six years of monthly rows).
pub const MAX_INSTALLMENTS: u32 = 72;

/// Installment errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstallmentError {
    /// Count outside `MIN_INSTALLMENTS..=MAX_INSTALLMENTS`.
    #[error("Installment count must be between 2 and 72, got {0}")]
    InvalidCount(u32),

    /// Only one of `total_installments` / `current_installment` was given.
    #[error("total_installments and current_installment must be given together")]
    IncompletePair,

    /// `current_installment` outside `1..=total_installments`.
    #[error("Installment {current} is outside 1..={total}")]
    OutOfRange {
        /// Current installment.
        current: i32,
        /// Total installments.
        total: i32,
    },

    /// A generated date is outside the representable range.
    #[error("Installment date out of range")]
    DateOutOfRange,
}

/// One generated installment row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installment<T> {
    /// Payload copied from the base purchase.
    pub item: T,
    /// Purchase date of this installment.
    pub purchase_date: NaiveDate,
    /// 1-based position in the plan.
    pub current_installment: i32,
    /// Plan length.
    pub total_installments: i32,
}

/// Expands `base` into `count` monthly installments starting at `base_date`.
///
/// # Errors
///
/// Returns `InstallmentError::InvalidCount` when `count` is out of range.
pub fn expand<T: Clone>(
    base: &T,
    count: u32,
    base_date: NaiveDate,
) -> Result<Vec<Installment<T>>, InstallmentError> {
    if !(MIN_INSTALLMENTS..=MAX_INSTALLMENTS).contains(&count) {
        return Err(InstallmentError::InvalidCount(count));
    }
    let total = i32::try_from(count).map_err(|_| InstallmentError::InvalidCount(count))?;

    (0..count)
        .zip(1..=total)
        .map(|(offset, current)| {
            let purchase_date = add_months(base_date, offset, base_date.day())
                .ok_or(InstallmentError::DateOutOfRange)?;
            Ok(Installment {
                item: base.clone(),
                purchase_date,
                current_installment: current,
                total_installments: total,
            })
        })
        .collect()
}

/// Validates an explicit `(total_installments, current_installment)` pair
/// on a single purchase row.
///
/// # Errors
///
/// Returns `IncompletePair` when only one side is present and `OutOfRange`
/// when `current` is not within `1..=total`.
pub fn validate_pair(total: Option<i32>, current: Option<i32>) -> Result<(), InstallmentError> {
    match (total, current) {
        (None, None) => Ok(()),
        (Some(total), Some(current)) if current >= 1 && current <= total => Ok(()),
        (Some(total), Some(current)) => Err(InstallmentError::OutOfRange { current, total }),
        _ => Err(InstallmentError::IncompletePair),
    }
}
