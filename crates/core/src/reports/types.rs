//! Report data types.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ReportError;
use crate::ledger::{EffectiveStatus, EntryKind, EntryStatus};

/// Query value selecting uncategorized entries.
pub const UNCATEGORIZED_KEY: &str = "sem-categoria";

/// Label of the uncategorized bucket.
pub const UNCATEGORIZED_NAME: &str = "Sem categoria";

/// Which date places an entry in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportBasis {
    /// Cash basis: payment date. Pending entries have none and drop out.
    #[default]
    Caixa,
    /// Accrual basis: due date. Paid entries have none and drop out.
    Competencia,
}

impl FromStr for ReportBasis {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "caixa" => Ok(Self::Caixa),
            "competencia" => Ok(Self::Competencia),
            other => Err(ReportError::InvalidBasis(other.to_string())),
        }
    }
}

/// Category selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    /// Entries without a (known) category.
    Uncategorized,
    /// Entries of one category.
    Category(Uuid),
}

impl FromStr for CategoryFilter {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == UNCATEGORIZED_KEY {
            return Ok(Self::Uncategorized);
        }
        s.parse::<Uuid>()
            .map(Self::Category)
            .map_err(|_| ReportError::InvalidCategory(s.to_string()))
    }
}

/// Filters applied before aggregation. Empty lists select everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Date basis.
    pub basis: ReportBasis,
    /// Inclusive start.
    pub from: Option<NaiveDate>,
    /// Inclusive end.
    pub to: Option<NaiveDate>,
    /// Effective statuses to keep.
    pub statuses: Vec<EffectiveStatus>,
    /// Categories to keep.
    pub categories: Vec<CategoryFilter>,
}

impl ReportFilter {
    /// Builds a filter from raw query values; `status` and `category` are
    /// comma-separated lists.
    ///
    /// # Errors
    ///
    /// Returns a `ReportError` for any unrecognized value or an inverted
    /// date range.
    pub fn parse(
        basis: Option<&str>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        status: Option<&str>,
        category: Option<&str>,
    ) -> Result<Self, ReportError> {
        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            return Err(ReportError::InvertedRange);
        }

        let basis = basis
            .filter(|b| !b.trim().is_empty())
            .map(str::parse::<ReportBasis>)
            .transpose()?
            .unwrap_or_default();

        let statuses = split_list(status)
            .map(|s| {
                s.parse::<EffectiveStatus>()
                    .map_err(|_| ReportError::InvalidStatus(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let categories = split_list(category)
            .map(str::parse)
            .collect::<Result<Vec<CategoryFilter>, _>>()?;

        Ok(Self {
            basis,
            from,
            to,
            statuses,
            categories,
        })
    }
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// A ledger entry as seen by reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// Entry ID.
    pub id: Uuid,
    /// Description.
    pub description: String,
    /// Amount.
    pub amount: Decimal,
    /// Income or expense.
    pub kind: EntryKind,
    /// Stored status.
    pub status: EntryStatus,
    /// Category ID.
    pub category_id: Option<Uuid>,
    /// Due date (pending entries).
    pub due_date: Option<NaiveDate>,
    /// Payment date (paid entries).
    pub payment_date: Option<NaiveDate>,
}

impl ReportEntry {
    /// The date this entry sits on under `basis`.
    #[must_use]
    pub const fn date_on(&self, basis: ReportBasis) -> Option<NaiveDate> {
        match basis {
            ReportBasis::Caixa => self.payment_date,
            ReportBasis::Competencia => self.due_date,
        }
    }
}

/// A category as seen by reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInfo {
    /// Category ID.
    pub id: Uuid,
    /// Name.
    pub name: String,
    /// Display color.
    pub color: String,
}

/// Headline figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Kpis {
    /// Income total.
    pub receitas: Decimal,
    /// Expense total.
    pub despesas: Decimal,
    /// Income minus expenses.
    pub saldo: Decimal,
}

/// Totals for one `YYYY-MM` month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    /// `YYYY-MM`.
    pub month: String,
    /// Income.
    pub receita: Decimal,
    /// Expenses.
    pub despesa: Decimal,
    /// Income minus expenses.
    pub saldo: Decimal,
}

/// Running balance at the end of a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CumulativePoint {
    /// `YYYY-MM`.
    pub month: String,
    /// Balance accumulated up to and including this month.
    pub acumulado: Decimal,
}

/// Total for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// Category ID; `None` for the uncategorized bucket.
    pub category_id: Option<Uuid>,
    /// Name.
    pub name: String,
    /// Display color.
    pub color: String,
    /// Total.
    pub total: Decimal,
}

/// One of the largest expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopExpense {
    /// Entry ID.
    pub id: Uuid,
    /// Description.
    pub description: String,
    /// Amount.
    pub amount: Decimal,
    /// Date on the report's basis.
    pub date: Option<NaiveDate>,
}

/// Count and total for one effective status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMetric {
    /// Effective status.
    pub status: EffectiveStatus,
    /// Number of entries.
    pub count: usize,
    /// Sum of amounts.
    pub total: Decimal,
}

/// Full report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Date basis used.
    pub basis: ReportBasis,
    /// Inclusive start, if any.
    pub from: Option<NaiveDate>,
    /// Inclusive end, if any.
    pub to: Option<NaiveDate>,
    /// Headline figures.
    pub kpis: Kpis,
    /// Monthly totals, ascending.
    pub by_month: Vec<MonthTotals>,
    /// Running balance per month.
    pub cumulative: Vec<CumulativePoint>,
    /// Expense totals per category, largest first.
    pub expenses_by_category: Vec<CategoryTotal>,
    /// Income totals per category, largest first.
    pub revenues_by_category: Vec<CategoryTotal>,
    /// Five largest expenses.
    pub top_expenses: Vec<TopExpense>,
    /// Per-status metrics ordered pago, pendente, vencido.
    pub status_metrics: Vec<StatusMetric>,
}
