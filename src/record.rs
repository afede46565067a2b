//! Immutable row types produced by the simulations.

pub mod lead;
pub mod retail;

pub use lead::{Lead, LeadId};
pub use retail::{RetailTransaction, TransactionId};

/// `YYYY-MM-DD`, the date layout of every date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `YYYY-MM`, the layout of month bucket columns.
pub const MONTH_FORMAT: &str = "%Y-%m";
