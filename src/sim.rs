//! Day-by-day simulation loops and the sampling primitives they share.

pub mod channel;
pub mod demand;
pub mod funnel;
pub mod leads;
pub mod retail;
pub mod stock;
pub mod weighted;

pub use funnel::{Stage, StageThresholds};
pub use leads::LeadGenerator;
pub use retail::RetailGenerator;
pub use weighted::WeightedTable;
