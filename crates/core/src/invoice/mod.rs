//! Credit-card invoices.
//!
//! A card's invoice for a month is every purchase of that card dated within
//! the month. Closing an invoice turns its total into one pending expense
//! due on the card's due day of that month.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

static INVOICE_DESCRIPTION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^Fatura\s.+\s-\s.+$").ok());

/// Invoice errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvoiceError {
    /// Month is not `YYYY-MM`.
    #[error("Mês inválido: {0}. Use o formato AAAA-MM.")]
    InvalidMonth(String),

    /// Closing or due day outside 1..=31.
    #[error("Dia inválido: {0}. Use um valor entre 1 e 31.")]
    InvalidDay(i32),

    /// No purchases in the month.
    #[error("Não há compras nesta fatura.")]
    Empty,
}

/// A calendar month an invoice covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InvoiceMonth {
    first_day: NaiveDate,
}

impl InvoiceMonth {
    /// Creates the month containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }

    /// First day of the month.
    #[must_use]
    pub const fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Last day of the month.
    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        self.first_day
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(self.first_day)
    }

    /// Whether `date` falls in this month.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.first_day.year() && date.month() == self.first_day.month()
    }

    /// `MM/YYYY`, as printed on invoice descriptions.
    #[must_use]
    pub fn label(&self) -> String {
        self.first_day.format("%m/%Y").to_string()
    }

    /// `day` within this month, clamped to the month's length.
    #[must_use]
    pub fn day_clamped(&self, day: u32) -> NaiveDate {
        let last = self.last_day();
        last.with_day(day.clamp(1, last.day())).unwrap_or(last)
    }
}

impl fmt::Display for InvoiceMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first_day.format("%Y-%m"))
    }
}

impl FromStr for InvoiceMonth {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvoiceError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| Self { first_day })
            .ok_or_else(invalid)
    }
}

impl Serialize for InvoiceMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Validates a closing or due day.
///
/// # Errors
///
/// Returns `InvoiceError::InvalidDay` outside `1..=31`.
pub fn validate_card_day(day: i32) -> Result<i32, InvoiceError> {
    if (1..=31).contains(&day) {
        Ok(day)
    } else {
        Err(InvoiceError::InvalidDay(day))
    }
}

/// Description of the expense an invoice closes into.
#[must_use]
pub fn invoice_description(card_name: &str, month: InvoiceMonth) -> String {
    format!("Fatura {} - {}", card_name.trim(), month.label())
}

/// Whether a ledger description was produced by closing an invoice.
#[must_use]
pub fn is_invoice_description(description: &str) -> bool {
    INVOICE_DESCRIPTION
        .as_ref()
        .is_some_and(|re| re.is_match(description))
}

/// Due date of a card's invoice for `month`.
#[must_use]
pub fn invoice_due_date(month: InvoiceMonth, due_day: i32) -> NaiveDate {
    month.day_clamped(u32::try_from(due_day).unwrap_or(1))
}

/// A purchase as it appears on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceLine {
    /// Purchase ID.
    pub id: Uuid,
    /// Description.
    pub description: String,
    /// Amount of this row (one installment when parcelled).
    pub amount: Decimal,
    /// Purchase date.
    pub purchase_date: NaiveDate,
    /// Category ID.
    pub category_id: Option<Uuid>,
    /// 1-based installment position.
    pub current_installment: Option<i32>,
    /// Plan length.
    pub total_installments: Option<i32>,
}

/// A card's invoice for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invoice {
    /// Covered month.
    pub month: InvoiceMonth,
    /// Sum of all lines.
    pub total: Decimal,
    /// Purchases in the month, oldest first.
    pub purchases: Vec<InvoiceLine>,
}

impl Invoice {
    /// Builds the invoice for `month` from a card's purchases; purchases
    /// outside the month are ignored.
    #[must_use]
    pub fn build(month: InvoiceMonth, purchases: impl IntoIterator<Item = InvoiceLine>) -> Self {
        let mut purchases: Vec<InvoiceLine> = purchases
            .into_iter()
            .filter(|p| month.contains(p.purchase_date))
            .collect();
        purchases.sort_by(|a, b| a.purchase_date.cmp(&b.purchase_date));
        let total = purchases.iter().map(|p| p.amount).sum();

        Self {
            month,
            total,
            purchases,
        }
    }

    /// Whether the invoice has no purchases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.purchases.is_empty()
    }
}

/// The pending expense an invoice closes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceClosing {
    /// `Fatura <card> - MM/YYYY`.
    pub description: String,
    /// Invoice total.
    pub amount: Decimal,
    /// Card's due day within the month.
    pub due_date: NaiveDate,
    /// Closing day.
    pub entry_date: NaiveDate,
}

/// Computes the expense for closing `invoice` of `card_name` on `today`.
///
/// # Errors
///
/// Returns `InvoiceError::Empty` when the invoice has no purchases.
pub fn close_invoice(
    invoice: &Invoice,
    card_name: &str,
    due_day: i32,
    today: NaiveDate,
) -> Result<InvoiceClosing, InvoiceError> {
    if invoice.is_empty() || invoice.total <= Decimal::ZERO {
        return Err(InvoiceError::Empty);
    }

    Ok(InvoiceClosing {
        description: invoice_description(card_name, invoice.month),
        amount: invoice.total,
        due_date: invoice_due_date(invoice.month, due_day),
        entry_date: today,
    })
}
