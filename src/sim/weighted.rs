use rand::{Rng, distr::Distribution, distr::weighted::WeightedIndex};

use crate::error::{BizsimResult, ConfigError};

/// Fixed set of values with relative weights, sampled with replacement.
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    values: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T> WeightedTable<T> {
    /// Builds a table from `(value, weight)` pairs.
    ///
    /// `label` names the table in the error returned for an empty table or
    /// for weights that are negative, non-finite or all zero.
    pub fn new(label: &str, entries: impl IntoIterator<Item = (T, f64)>) -> BizsimResult<Self> {
        let (values, weights): (Vec<T>, Vec<f64>) = entries.into_iter().unzip();
        let index = WeightedIndex::new(&weights).map_err(|e| ConfigError::InvalidWeight {
            name: format!("{label} ({e})"),
            weight: weights.iter().sum(),
        })?;
        Ok(Self { values, index })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        &self.values[self.index.sample(rng)]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
