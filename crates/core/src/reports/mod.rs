//! Financial reports over ledger entries.
//!
//! Entries are placed on a date by the chosen basis (cash: payment date,
//! accrual: due date), filtered, and aggregated into:
//! - KPIs (income, expenses, balance)
//! - Monthly series and cumulative balance
//! - Totals per category
//! - Largest expenses
//! - Counts and totals per effective status

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
