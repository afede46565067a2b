use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::{BizsimResult, ConfigError};

// ================================================================================================
// Tags
// ================================================================================================

/// Lifecycle category of a product, driving its demand multiplier over time.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TrendTag {
    /// Fast riser: starts elevated and keeps climbing.
    Hot,
    Growing,
    Stable,
    Declining,
    /// Flat trend; demand swings are carried by the category's peak months.
    Seasonal,
}

impl TrendTag {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Coarse popularity bucket of a product.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Popularity {
    High,
    Medium,
    Low,
}

impl Popularity {
    /// Baseline number of daily transactions before any multiplier.
    pub fn base_rate(&self) -> f64 {
        match self {
            Self::High => 3.0,
            Self::Medium => 2.0,
            Self::Low => 1.0,
        }
    }

    /// Units on hand when the simulation starts.
    pub fn initial_stock(&self) -> u32 {
        match self {
            Self::High => 500,
            Self::Medium => 300,
            Self::Low => 200,
        }
    }
}

/// How a store perturbs a product's list price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PricingRule {
    /// List price with a ±5% jitter.
    #[default]
    List,

    /// Outlet discount of 15–30% off list.
    Outlet,
}

impl PricingRule {
    /// Draws the factor applied to the product's base price.
    pub fn price_factor<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Self::List => rng.random_range(0.95..1.05),
            Self::Outlet => rng.random_range(0.70..0.85),
        }
    }
}

// ================================================================================================
// Profiles
// ================================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductProfile {
    pub name: String,
    pub base_price: f64,
    pub popularity: Popularity,
    pub trend: TrendTag,
}

impl ProductProfile {
    pub fn new(name: &str, base_price: f64, popularity: Popularity, trend: TrendTag) -> Self {
        Self {
            name: name.to_string(),
            base_price,
            popularity,
            trend,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfile {
    pub name: String,
    pub products: Vec<ProductProfile>,
    /// Calendar months (1 = January) with elevated demand.
    pub peak_months: Vec<u32>,
    pub base_demand: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreProfile {
    pub name: String,
    /// Relative traffic weight of the store.
    pub multiplier: f64,
    /// Category this store is known for; boosts its share of that category.
    pub specialty: Option<String>,
    pub pricing: PricingRule,
}

impl StoreProfile {
    pub fn new(name: &str, multiplier: f64, specialty: Option<&str>, pricing: PricingRule) -> Self {
        Self {
            name: name.to_string(),
            multiplier,
            specialty: specialty.map(str::to_string),
            pricing,
        }
    }
}

/// Stores and product catalogue of the retail simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetailProfiles {
    pub stores: Vec<StoreProfile>,
    pub categories: Vec<CategoryProfile>,
}

impl RetailProfiles {
    pub fn new(stores: Vec<StoreProfile>, categories: Vec<CategoryProfile>) -> Self {
        Self { stores, categories }
    }

    /// Iterates `(category, product)` pairs in catalogue order.
    pub fn products(&self) -> impl Iterator<Item = (&CategoryProfile, &ProductProfile)> {
        self.categories
            .iter()
            .flat_map(|c| c.products.iter().map(move |p| (c, p)))
    }

    pub fn validate(&self) -> BizsimResult<()> {
        if self.stores.is_empty() {
            return Err(ConfigError::EmptyProfileTable("stores").into());
        }
        if self.categories.is_empty() || self.categories.iter().all(|c| c.products.is_empty()) {
            return Err(ConfigError::EmptyProfileTable("categories").into());
        }
        for store in &self.stores {
            if !(store.multiplier.is_finite() && store.multiplier > 0.0) {
                return Err(ConfigError::InvalidWeight {
                    name: store.name.clone(),
                    weight: store.multiplier,
                }
                .into());
            }
        }
        for category in &self.categories {
            if !(category.base_demand.is_finite() && category.base_demand >= 0.0) {
                return Err(ConfigError::InvalidWeight {
                    name: category.name.clone(),
                    weight: category.base_demand,
                }
                .into());
            }
        }
        Ok(())
    }
}

impl Default for RetailProfiles {
    fn default() -> Self {
        use Popularity::{High, Low, Medium};
        use TrendTag::{Declining, Growing, Hot, Seasonal, Stable};

        let stores = vec![
            StoreProfile::new("Downtown Flagship", 1.4, Some("Electronics"), PricingRule::List),
            StoreProfile::new("Mall Central", 1.2, Some("Clothing"), PricingRule::List),
            StoreProfile::new("Suburban Plaza", 1.0, Some("Home & Kitchen"), PricingRule::List),
            StoreProfile::new("Airport Express", 0.9, Some("Beauty"), PricingRule::List),
            StoreProfile::new("Outlet Store", 0.6, None, PricingRule::Outlet),
        ];

        let category = |name: &str, peak_months: &[u32], base_demand: f64, products| {
            CategoryProfile {
                name: name.to_string(),
                products,
                peak_months: peak_months.to_vec(),
                base_demand,
            }
        };
        let p = ProductProfile::new;

        let categories = vec![
            category(
                "Electronics",
                &[11, 12],
                1.3,
                vec![
                    p("Wireless Earbuds Pro", 149.0, High, Hot),
                    p("Smart Watch Series X", 299.0, High, Growing),
                    p("4K Webcam", 89.0, Medium, Stable),
                    p("Portable Charger 20K", 45.0, High, Stable),
                    p("Bluetooth Speaker Mini", 79.0, Medium, Stable),
                    p("USB-C Hub Pro", 65.0, Medium, Growing),
                    p("Noise Canceling Headphones", 249.0, High, Hot),
                    p("Tablet Stand Adjustable", 35.0, Low, Declining),
                    p("Wireless Mouse Ergonomic", 55.0, Medium, Stable),
                    p("LED Desk Lamp Smart", 75.0, Medium, Growing),
                ],
            ),
            category(
                "Clothing",
                &[10, 11, 12],
                1.0,
                vec![
                    p("Premium Cotton T-Shirt", 35.0, High, Stable),
                    p("Slim Fit Jeans", 75.0, High, Stable),
                    p("Winter Jacket Insulated", 189.0, Medium, Seasonal),
                    p("Running Sneakers Pro", 129.0, High, Growing),
                    p("Casual Hoodie", 65.0, High, Stable),
                    p("Formal Dress Shirt", 55.0, Medium, Declining),
                    p("Athletic Shorts", 40.0, Medium, Stable),
                    p("Wool Sweater Classic", 95.0, Medium, Seasonal),
                    p("Canvas Sneakers", 55.0, Medium, Stable),
                    p("Baseball Cap Logo", 28.0, Low, Stable),
                ],
            ),
            category(
                "Home & Kitchen",
                &[11, 12],
                0.9,
                vec![
                    p("Air Fryer Digital 5L", 119.0, High, Hot),
                    p("Coffee Maker Programmable", 89.0, High, Stable),
                    p("Knife Set Professional", 149.0, Medium, Stable),
                    p("Non-Stick Pan Set", 79.0, Medium, Stable),
                    p("Blender High-Speed", 99.0, Medium, Stable),
                    p("Instant Pot Multi-Use", 129.0, High, Growing),
                    p("Toaster 4-Slice", 55.0, Low, Declining),
                    p("Food Storage Set", 45.0, Medium, Stable),
                    p("Electric Kettle", 40.0, Medium, Stable),
                    p("Kitchen Scale Digital", 25.0, Low, Stable),
                ],
            ),
            category(
                "Beauty",
                &[11, 12, 2],
                1.1,
                vec![
                    p("Vitamin C Serum", 45.0, High, Hot),
                    p("Hair Dryer Professional", 129.0, High, Growing),
                    p("Moisturizer Daily SPF", 38.0, High, Growing),
                    p("Perfume Signature 50ml", 85.0, Medium, Stable),
                    p("Makeup Brush Set", 55.0, Medium, Stable),
                    p("Face Mask Hydrating", 28.0, High, Hot),
                    p("Curling Iron Ceramic", 75.0, Medium, Stable),
                    p("Nail Polish Set", 32.0, Low, Stable),
                    p("Electric Shaver", 89.0, Medium, Stable),
                    p("Lip Balm Collection", 18.0, Medium, Stable),
                ],
            ),
            category(
                "Sports",
                &[1, 9],
                0.8,
                vec![
                    p("Yoga Mat Premium", 45.0, High, Growing),
                    p("Dumbbell Set Adjustable", 199.0, Medium, Stable),
                    p("Fitness Tracker Band", 79.0, High, Growing),
                    p("Resistance Bands Set", 28.0, High, Hot),
                    p("Water Bottle Insulated", 32.0, High, Stable),
                    p("Jump Rope Speed", 18.0, Medium, Stable),
                    p("Foam Roller", 35.0, Medium, Growing),
                    p("Gym Bag Duffle", 55.0, Medium, Stable),
                    p("Protein Shaker Bottle", 15.0, Medium, Stable),
                    p("Exercise Ball 65cm", 28.0, Low, Declining),
                ],
            ),
        ];

        Self { stores, categories }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn default_catalogue_is_valid() {
        let profiles = RetailProfiles::default();
        profiles.validate().expect("default profiles must validate");
        assert_eq!(profiles.stores.len(), 5);
        assert_eq!(profiles.categories.len(), 5);
        assert_eq!(profiles.products().count(), 50);
    }

    #[test]
    fn exactly_one_outlet_store() {
        let profiles = RetailProfiles::default();
        let outlets: Vec<_> = profiles
            .stores
            .iter()
            .filter(|s| s.pricing == PricingRule::Outlet)
            .collect();
        assert_eq!(outlets.len(), 1);
        assert_eq!(outlets[0].name, "Outlet Store");
        assert!(outlets[0].specialty.is_none());
    }

    #[test]
    fn validate_rejects_empty_and_non_positive_tables() {
        let mut profiles = RetailProfiles::default();
        profiles.stores.clear();
        assert!(profiles.validate().is_err());

        let mut profiles = RetailProfiles::default();
        profiles.stores[0].multiplier = 0.0;
        assert!(profiles.validate().is_err());

        let mut profiles = RetailProfiles::default();
        profiles.categories.iter_mut().for_each(|c| c.products.clear());
        assert!(profiles.validate().is_err());
    }

    #[test]
    fn trend_tag_round_trips_through_its_label() {
        assert_eq!(TrendTag::Hot.to_string(), "hot");
        assert_eq!(TrendTag::from_str("declining").unwrap(), TrendTag::Declining);
        assert!(TrendTag::from_str("viral").is_err());
    }

    #[test]
    fn price_factors_stay_in_band() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let list = PricingRule::List.price_factor(&mut rng);
            assert!((0.95..1.05).contains(&list), "list factor {list}");
            let outlet = PricingRule::Outlet.price_factor(&mut rng);
            assert!((0.70..0.85).contains(&outlet), "outlet factor {outlet}");
        }
    }

    #[test]
    fn popularity_drives_rate_and_stock() {
        assert_eq!(Popularity::High.base_rate(), 3.0);
        assert_eq!(Popularity::Low.base_rate(), 1.0);
        assert_eq!(Popularity::Medium.initial_stock(), 300);
    }
}
