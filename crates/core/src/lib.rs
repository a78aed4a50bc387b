//! Core business logic for Balanço Certo.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `trial` - Free-trial evaluation and the creation gate
//! - `recurrence` - Recurring rules: date advancing and materialization decisions
//! - `installment` - Installment plan expansion for card purchases
//! - `invoice` - Credit-card invoices and their closing
//! - `ledger` - Entry kinds, statuses, validation and CSV export
//! - `profile` - User profile validation
//! - `reports` - Report aggregation
//! - `tenancy` - Organization ownership checks

pub mod installment;
pub mod invoice;
pub mod ledger;
pub mod profile;
pub mod recurrence;
pub mod reports;
pub mod tenancy;
pub mod trial;
