//! Ledger entries (lançamentos) and the rules they are written under.
//!
//! - `types` - entry kind and status, including the derived `vencido`
//! - `validation` - field rules and date resolution by status
//! - `export` - CSV rendering
//! - `error` - validation errors

pub mod error;
pub mod export;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::LedgerError;
pub use export::{ExportRow, export_filename, write_csv};
pub use types::{EffectiveStatus, EntryKind, EntryStatus};
pub use validation::{
    DEFAULT_CATEGORY_COLOR, EntryDates, resolve_dates, validate_amount, validate_category,
    validate_description,
};
