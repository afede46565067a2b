use chrono::{Datelike, NaiveDate, Weekday};
use rand::Rng;
use rand_distr::{Distribution, Poisson};

use crate::profile::{CategoryProfile, ProductProfile, TrendTag};

/// Multiplier applied to every product's demand on weekend days.
pub const WEEKEND_BOOST: f64 = 1.3;

/// Calendar-driven demand factor of a category on `date`.
///
/// Peak months surge, the July/August summer lull dampens demand, and the
/// remaining months jitter around 1.0.
pub fn seasonal_multiplier<R: Rng + ?Sized>(
    date: NaiveDate,
    peak_months: &[u32],
    rng: &mut R,
) -> f64 {
    let month = date.month();
    if peak_months.contains(&month) {
        1.5 + rng.random_range(0.0..0.3)
    } else if matches!(month, 7 | 8) {
        0.7 + rng.random_range(0.0..0.1)
    } else {
        1.0 + rng.random_range(-0.1..0.1)
    }
}

/// Lifecycle demand factor of a product at `progress` (0..=1) through the window.
pub fn trend_multiplier<R: Rng + ?Sized>(tag: TrendTag, progress: f64, rng: &mut R) -> f64 {
    match tag {
        TrendTag::Hot => 1.2 + progress * 0.4,
        TrendTag::Growing => 1.0 + progress * 0.2,
        TrendTag::Declining => 1.0 - progress * 0.3,
        TrendTag::Seasonal => 1.0,
        TrendTag::Stable => 1.0 + rng.random_range(-0.05..0.05),
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn weekend_multiplier(date: NaiveDate) -> f64 {
    if is_weekend(date) { WEEKEND_BOOST } else { 1.0 }
}

/// Mean of the daily transaction count of `product`.
pub fn expected_transactions(
    product: &ProductProfile,
    category: &CategoryProfile,
    seasonal: f64,
    trend: f64,
    weekend: f64,
) -> f64 {
    product.popularity.base_rate() * seasonal * trend * weekend * category.base_demand
}

/// Draws a Poisson count with mean `lambda`; a non-positive or non-finite
/// mean yields zero.
pub fn sample_count<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> u32 {
    if !(lambda.is_finite() && lambda > 0.0) {
        return 0;
    }
    match Poisson::new(lambda) {
        Ok(dist) => {
            let n: f64 = dist.sample(rng);
            n as u32
        }
        Err(_) => 0,
    }
}
