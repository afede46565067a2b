use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info, instrument};

use crate::{
    config::{GeneratorConfig, RETAIL_STREAM, SimulationWindow},
    error::BizsimResult,
    profile::RetailProfiles,
    record::{RetailTransaction, TransactionId},
    sim::{
        channel::{QuantitySampler, StoreAssigner, line_revenue, sample_unit_price},
        demand::{
            expected_transactions, sample_count, seasonal_multiplier, trend_multiplier,
            weekend_multiplier,
        },
        stock::StockLedger,
    },
};

/// Day-by-day simulation of store sales with stock depletion and weekly
/// restocking.
#[derive(Debug, Clone)]
pub struct RetailGenerator {
    seed: u64,
    window: SimulationWindow,
    profiles: RetailProfiles,
    stores: StoreAssigner,
    quantities: QuantitySampler,
}

impl RetailGenerator {
    pub fn new(cfg: &GeneratorConfig) -> BizsimResult<Self> {
        let profiles = cfg.retail().clone();
        profiles.validate()?;
        Ok(Self {
            seed: cfg.stream_seed(RETAIL_STREAM),
            window: *cfg.window(),
            stores: StoreAssigner::new(&profiles.stores, &profiles.categories)?,
            quantities: QuantitySampler::new()?,
            profiles,
        })
    }

    /// Runs the simulation over the whole window.
    ///
    /// Transactions come out in generation order: by day, then category and
    /// product in catalogue order.
    #[instrument(skip(self), fields(seed = self.seed, start = %self.window.start(), end = %self.window.end()))]
    pub fn generate(&self) -> Vec<RetailTransaction> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut stock = StockLedger::from_profiles(&self.profiles);
        let mut transactions = Vec::new();
        let mut next_id = 1u32;

        for date in self.window.days() {
            let progress = self.window.progress(date);
            let weekend = weekend_multiplier(date);

            for (category_idx, category) in self.profiles.categories.iter().enumerate() {
                let seasonal = seasonal_multiplier(date, &category.peak_months, &mut rng);

                for product in &category.products {
                    let trend = trend_multiplier(product.trend, progress, &mut rng);
                    let lambda = expected_transactions(product, category, seasonal, trend, weekend);

                    for _ in 0..sample_count(lambda, &mut rng) {
                        let store = &self.profiles.stores[self.stores.pick(category_idx, &mut rng)];
                        let quantity = self.quantities.sample(&mut rng);
                        let unit_price = sample_unit_price(product.base_price, store, &mut rng);
                        let stock_level = stock.sell(&product.name, quantity);

                        transactions.push(RetailTransaction {
                            transaction_id: TransactionId(next_id),
                            date,
                            product_name: product.name.clone(),
                            category: category.name.clone(),
                            unit_price,
                            quantity,
                            total_revenue: line_revenue(unit_price, quantity),
                            store: store.name.clone(),
                            stock_level,
                            product_trend: product.trend,
                        });
                        next_id += 1;
                    }
                }
            }

            let restocked = stock.restock_if_due(date, &mut rng);
            if restocked > 0 {
                debug!(%date, restocked, "Weekly restock");
            }
        }

        info!(
            transactions = transactions.len(),
            "Retail sales generation finished"
        );
        transactions
    }
}
