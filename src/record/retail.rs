use std::{fmt, mem};

use chrono::NaiveDate;
use polars::{df, frame::DataFrame};
use serde::{Deserialize, Serialize};

use crate::{
    error::{BizsimError, BizsimResult},
    profile::TrendTag,
    record::{DATE_FORMAT, MONTH_FORMAT},
    report::{polars_ext::polars_to_bizsim_error, retail_sales::RetailCol},
    sim::demand::is_weekend,
};

/// Sequential transaction number, rendered as `TXN000001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionId(pub u32);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TXN{:06}", self.0)
    }
}

/// One sale of one product at one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetailTransaction {
    pub transaction_id: TransactionId,
    pub date: NaiveDate,
    pub product_name: String,
    pub category: String,
    /// Unit price in dollars, already rounded to cents.
    pub unit_price: f64,
    pub quantity: u32,
    pub total_revenue: f64,
    pub store: String,
    /// Units left of this product right after the sale.
    pub stock_level: u32,
    pub product_trend: TrendTag,
}

impl RetailTransaction {
    pub fn day_of_week(&self) -> String {
        self.date.format("%A").to_string()
    }

    pub fn month(&self) -> String {
        self.date.format(MONTH_FORMAT).to_string()
    }

    pub fn is_weekend(&self) -> bool {
        is_weekend(self.date)
    }
}

/// Column-oriented form of a transaction batch, ready for `df!`.
#[derive(Default, Debug)]
pub(crate) struct RetailSoA {
    transaction_id: Vec<String>,
    date: Vec<String>,
    product_name: Vec<String>,
    category: Vec<String>,
    unit_price: Vec<f64>,
    quantity: Vec<u32>,
    total_revenue: Vec<f64>,
    store: Vec<String>,
    stock_level: Vec<u32>,
    day_of_week: Vec<String>,
    month: Vec<String>,
    is_weekend: Vec<bool>,
    product_trend: Vec<String>,
}

impl RetailSoA {
    fn with_capacity(n: usize) -> Self {
        Self {
            transaction_id: Vec::with_capacity(n),
            date: Vec::with_capacity(n),
            product_name: Vec::with_capacity(n),
            category: Vec::with_capacity(n),
            unit_price: Vec::with_capacity(n),
            quantity: Vec::with_capacity(n),
            total_revenue: Vec::with_capacity(n),
            store: Vec::with_capacity(n),
            stock_level: Vec::with_capacity(n),
            day_of_week: Vec::with_capacity(n),
            month: Vec::with_capacity(n),
            is_weekend: Vec::with_capacity(n),
            product_trend: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, t: &RetailTransaction) {
        self.transaction_id.push(t.transaction_id.to_string());
        self.date.push(t.date.format(DATE_FORMAT).to_string());
        self.product_name.push(t.product_name.clone());
        self.category.push(t.category.clone());
        self.unit_price.push(t.unit_price);
        self.quantity.push(t.quantity);
        self.total_revenue.push(t.total_revenue);
        self.store.push(t.store.clone());
        self.stock_level.push(t.stock_level);
        self.day_of_week.push(t.day_of_week());
        self.month.push(t.month());
        self.is_weekend.push(t.is_weekend());
        self.product_trend.push(t.product_trend.to_string());
    }
}

impl<'a> FromIterator<&'a RetailTransaction> for RetailSoA {
    fn from_iter<I: IntoIterator<Item = &'a RetailTransaction>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut soa = Self::with_capacity(iter.size_hint().0);
        iter.for_each(|t| soa.push(t));
        soa
    }
}

impl TryFrom<RetailSoA> for DataFrame {
    type Error = BizsimError;

    fn try_from(mut soa: RetailSoA) -> BizsimResult<Self> {
        df![
            RetailCol::TransactionId.as_str() => mem::take(&mut soa.transaction_id),
            RetailCol::Date.as_str()          => mem::take(&mut soa.date),
            RetailCol::ProductName.as_str()   => mem::take(&mut soa.product_name),
            RetailCol::Category.as_str()      => mem::take(&mut soa.category),
            RetailCol::UnitPrice.as_str()     => mem::take(&mut soa.unit_price),
            RetailCol::Quantity.as_str()      => mem::take(&mut soa.quantity),
            RetailCol::TotalRevenue.as_str()  => mem::take(&mut soa.total_revenue),
            RetailCol::Store.as_str()         => mem::take(&mut soa.store),
            RetailCol::StockLevel.as_str()    => mem::take(&mut soa.stock_level),
            RetailCol::DayOfWeek.as_str()     => mem::take(&mut soa.day_of_week),
            RetailCol::Month.as_str()         => mem::take(&mut soa.month),
            RetailCol::IsWeekend.as_str()     => mem::take(&mut soa.is_weekend),
            RetailCol::ProductTrend.as_str()  => mem::take(&mut soa.product_trend),
        ]
        .map_err(|e| polars_to_bizsim_error("retail sales", e))
    }
}
