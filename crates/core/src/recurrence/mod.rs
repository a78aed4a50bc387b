//! Recurring-transaction rules.
//!
//! - `frequency` - the supported cadences
//! - `schedule` - date advancing and schedule previews
//! - `materialize` - what a due rule turns into on a given day

pub mod frequency;
pub mod materialize;
pub mod schedule;

#[cfg(test)]
mod materialize_props;
#[cfg(test)]
mod schedule_props;

pub use frequency::{Frequency, UnknownFrequency};
pub use materialize::{Decision, Occurrence, RuleSnapshot, RunOutcome, RunReport, decide};
pub use schedule::{add_months, advance_anchored, next_run_date, preview};
