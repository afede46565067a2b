//! Static profile tables driving the simulation.
//!
//! Every table is a plain immutable value with a `Default` equal to the
//! canonical business story, so tests can swap in reduced tables (one store,
//! one product, ...) without touching the generators.

pub mod leads;
pub mod retail;

pub use leads::{
    BurstSchedule, ContactPools, LeadProfiles, LeadSourceProfile, LeadVolume, RepSpecialty,
    SalesRepProfile,
};
pub use retail::{
    CategoryProfile, Popularity, PricingRule, ProductProfile, RetailProfiles, StoreProfile,
    TrendTag,
};
