#![allow(dead_code)]

use bizsim::{prelude::*, profile::TrendTag};
use chrono::NaiveDate;
use tempfile::TempDir;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Scratch working root with the `data/` and `dashboards/` layout.
pub fn setup_layout() -> (TempDir, DataLayout) {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());
    (dir, layout)
}

pub fn setup_short_config() -> GeneratorConfig {
    let window = SimulationWindow::new(date(2024, 10, 15), date(2024, 11, 15)).unwrap();
    GeneratorConfig::default().with_window(window)
}

/// `n` single-unit sales of one product priced 100 in one store.
pub fn setup_flat_price_sales(n: u32) -> Vec<RetailTransaction> {
    (1..=n)
        .map(|i| RetailTransaction {
            transaction_id: TransactionId(i),
            date: date(2024, 11, 1) + chrono::Days::new(u64::from(i % 30)),
            product_name: "Widget".into(),
            category: "Widgets".into(),
            unit_price: 100.0,
            quantity: 1,
            total_revenue: 100.0,
            store: "Only Store".into(),
            stock_level: 500 - i,
            product_trend: TrendTag::Stable,
        })
        .collect()
}
