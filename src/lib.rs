//! Deterministic synthetic business datasets and static analytics dashboards.
//!
//! The generator simulates a retail chain (transactions with seasonality,
//! product trends, store mix and a stock ledger) and a B2B sales funnel
//! (leads moving through stages by age, source quality and rep skill). The
//! renderer turns the resulting tables into self-contained HTML dashboards.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod insights;
pub mod io;
pub mod pipeline;
pub mod prelude;
pub mod profile;
pub mod record;
pub mod report;
pub mod sim;
pub mod telemetry;
