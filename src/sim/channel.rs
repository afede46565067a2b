use rand::Rng;

use crate::{
    error::BizsimResult,
    profile::{CategoryProfile, StoreProfile},
    sim::weighted::WeightedTable,
};

/// Factor applied to a store's weight for sales in its specialty category.
pub const SPECIALTY_BOOST: f64 = 1.3;

/// Units per transaction with their relative weights.
pub const QUANTITY_WEIGHTS: [(u32, f64); 5] =
    [(1, 60.0), (2, 25.0), (3, 10.0), (4, 3.0), (5, 2.0)];

/// Rounds to cents, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Store weight for a sale in `category`.
pub fn store_weight(store: &StoreProfile, category: &str) -> f64 {
    if store.specialty.as_deref() == Some(category) {
        store.multiplier * SPECIALTY_BOOST
    } else {
        store.multiplier
    }
}

/// Picks the selling store of a transaction.
///
/// Weights depend only on the category, so one table per category is built
/// up front and reused for every transaction.
#[derive(Debug, Clone)]
pub struct StoreAssigner {
    by_category: Vec<WeightedTable<usize>>,
}

impl StoreAssigner {
    pub fn new(stores: &[StoreProfile], categories: &[CategoryProfile]) -> BizsimResult<Self> {
        let by_category = categories
            .iter()
            .map(|category| {
                WeightedTable::new(
                    &format!("stores for {}", category.name),
                    stores
                        .iter()
                        .enumerate()
                        .map(|(i, s)| (i, store_weight(s, &category.name))),
                )
            })
            .collect::<BizsimResult<Vec<_>>>()?;
        Ok(Self { by_category })
    }

    /// Index into the store table for a sale in the `category_idx`-th category.
    pub fn pick<R: Rng + ?Sized>(&self, category_idx: usize, rng: &mut R) -> usize {
        *self.by_category[category_idx].sample(rng)
    }
}

/// Draws the number of units of one transaction.
#[derive(Debug, Clone)]
pub struct QuantitySampler(WeightedTable<u32>);

impl QuantitySampler {
    pub fn new() -> BizsimResult<Self> {
        WeightedTable::new("quantity", QUANTITY_WEIGHTS).map(Self)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        *self.0.sample(rng)
    }
}

/// Draws a unit price for `store`, rounded to cents.
pub fn sample_unit_price<R: Rng + ?Sized>(base_price: f64, store: &StoreProfile, rng: &mut R) -> f64 {
    round2(base_price * store.pricing.price_factor(rng))
}

/// Revenue of a line item, derived from the already rounded unit price.
pub fn line_revenue(unit_price: f64, quantity: u32) -> f64 {
    round2(unit_price * f64::from(quantity))
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::profile::{PricingRule, RetailProfiles};

    #[test]
    fn specialty_gets_boosted() {
        let store = StoreProfile::new("s", 1.0, Some("Beauty"), PricingRule::List);
        assert_eq!(store_weight(&store, "Beauty"), SPECIALTY_BOOST);
        assert_eq!(store_weight(&store, "Sports"), 1.0);
    }

    #[test]
    fn quantities_stay_within_one_to_five() {
        let sampler = QuantitySampler::new().unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let draws: Vec<u32> = (0..2_000).map(|_| sampler.sample(&mut rng)).collect();
        assert!(draws.iter().all(|q| (1..=5).contains(q)));
        let singles = draws.iter().filter(|q| **q == 1).count();
        assert!(singles > 1_000, "singles {singles}");
    }

    #[test]
    fn outlet_prices_are_discounted() {
        let outlet = StoreProfile::new("o", 0.6, None, PricingRule::Outlet);
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..500 {
            let price = sample_unit_price(100.0, &outlet, &mut rng);
            assert!((70.0..=85.0).contains(&price), "price {price}");
        }
    }

    #[test]
    fn revenue_matches_rounded_price_times_quantity() {
        let mut rng = StdRng::seed_from_u64(13);
        let store = StoreProfile::new("s", 1.0, None, PricingRule::List);
        for q in 1..=5 {
            let price = sample_unit_price(149.0, &store, &mut rng);
            assert_eq!(price, round2(price));
            assert_eq!(line_revenue(price, q), round2(price * q as f64));
        }
    }

    #[test]
    fn assigner_covers_every_category() {
        let profiles = RetailProfiles::default();
        let assigner = StoreAssigner::new(&profiles.stores, &profiles.categories).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        for idx in 0..profiles.categories.len() {
            let store = assigner.pick(idx, &mut rng);
            assert!(store < profiles.stores.len());
        }
    }
}
