use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use rand::Rng;
use tracing::debug;

use crate::profile::RetailProfiles;

/// Day of the week on which the restock rule runs, after that day's sales.
pub const RESTOCK_DAY: Weekday = Weekday::Mon;

/// Units added to a product holding `level` units at restock time.
pub fn restock_amount<R: Rng + ?Sized>(level: u32, rng: &mut R) -> u32 {
    if level < 100 {
        rng.random_range(50..=150)
    } else if level < 200 {
        rng.random_range(30..=80)
    } else {
        0
    }
}

/// Units on hand per product, never negative.
///
/// Keyed by product name in sorted order, so restock draws happen in the same
/// order on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockLedger {
    levels: BTreeMap<String, u32>,
}

impl StockLedger {
    /// Opens the ledger with every catalogue product at its popularity's
    /// initial stock.
    pub fn from_profiles(profiles: &RetailProfiles) -> Self {
        let levels = profiles
            .products()
            .map(|(_, p)| (p.name.clone(), p.popularity.initial_stock()))
            .collect();
        Self { levels }
    }

    pub fn level(&self, product: &str) -> u32 {
        self.levels.get(product).copied().unwrap_or(0)
    }

    /// Removes `quantity` units, flooring at zero, and returns the new level.
    pub fn sell(&mut self, product: &str, quantity: u32) -> u32 {
        let level = self.levels.entry(product.to_string()).or_insert(0);
        *level = level.saturating_sub(quantity);
        *level
    }

    /// Applies the weekly restock rule if `date` is a restock day.
    ///
    /// Returns the number of products that received units.
    pub fn restock_if_due<R: Rng + ?Sized>(&mut self, date: NaiveDate, rng: &mut R) -> usize {
        if date.weekday() != RESTOCK_DAY {
            return 0;
        }
        let mut restocked = 0;
        for (product, level) in self.levels.iter_mut() {
            let added = restock_amount(*level, rng);
            if added > 0 {
                debug!(%date, product = %product, from = *level, added, "Restocked product");
                *level += added;
                restocked += 1;
            }
        }
        restocked
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.levels.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
