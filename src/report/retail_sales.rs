use std::sync::Arc;

use polars::{
    frame::DataFrame,
    prelude::{
        DataType, Field, IntoLazy, PlSmallStr, Schema, SchemaRef, SortMultipleOptions, col,
        lit,
    },
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{
    error::{BizsimError, BizsimResult},
    profile::TrendTag,
    record::{RetailTransaction, retail::RetailSoA},
    report::{
        io::{Report, ReportName, ToSchema, conform_to_schema},
        polars_ext::{DataFrameExt, labelled_f64, polars_to_bizsim_error},
    },
};

/// Columns of the retail sales table, in file order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    PartialOrd,
    Ord,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum RetailCol {
    // === Identifiers ===
    /// Sequential id, e.g. `TXN000001`.
    TransactionId,
    /// Sale date, `YYYY-MM-DD`.
    Date,

    // === Product ===
    ProductName,
    Category,
    /// Unit price after store pricing, rounded to cents.
    UnitPrice,
    Quantity,
    /// `unit_price * quantity`, rounded to cents.
    TotalRevenue,

    // === Channel ===
    Store,
    /// Units of the product left right after this sale.
    StockLevel,

    // === Calendar ===
    /// English weekday name, e.g. `Monday`.
    DayOfWeek,
    /// Month bucket, `YYYY-MM`.
    Month,
    IsWeekend,

    /// Lifecycle tag of the product (`hot`, `growing`, ...).
    ProductTrend,
}

impl From<RetailCol> for PlSmallStr {
    fn from(value: RetailCol) -> Self {
        value.as_str().into()
    }
}

impl RetailCol {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Retail transactions table.
#[derive(Debug, Clone)]
pub struct RetailSales {
    df: DataFrame,
}

impl RetailSales {
    pub const BASE_NAME: &'static str = "retail_sales";

    pub fn from_records(records: &[RetailTransaction]) -> BizsimResult<Self> {
        let soa: RetailSoA = records.iter().collect();
        Self::try_from(DataFrame::try_from(soa)?)
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn total_revenue(&self) -> BizsimResult<f64> {
        Ok(self
            .df
            .f64_col(RetailCol::TotalRevenue.as_str())?
            .into_no_null_iter()
            .sum())
    }

    /// Earliest and latest sale date, `None` for an empty table.
    pub fn date_range(&self) -> BizsimResult<Option<(String, String)>> {
        let dates = self.df.str_col(RetailCol::Date.as_str())?;
        let min = dates.into_no_null_iter().min();
        let max = dates.into_no_null_iter().max();
        Ok(min.zip(max).map(|(a, b)| (a.to_string(), b.to_string())))
    }

    /// Distinct values of a text column, sorted.
    pub fn unique_sorted(&self, column: RetailCol) -> BizsimResult<Vec<String>> {
        let values = self.df.str_col(column.as_str())?;
        let mut out: Vec<String> = values.into_no_null_iter().map(str::to_string).collect();
        out.sort_unstable();
        out.dedup();
        Ok(out)
    }

    /// Revenue per value of `by`, highest first (ties broken by name).
    pub fn revenue_by(&self, by: RetailCol) -> BizsimResult<Vec<(String, f64)>> {
        let revenue = RetailCol::TotalRevenue.as_str();
        let grouped = self
            .df
            .clone()
            .lazy()
            .group_by([col(by.as_str())])
            .agg([col(revenue).sum()])
            .sort(
                [revenue, by.as_str()],
                SortMultipleOptions::default()
                    .with_order_descending_multi([true, false])
                    .with_maintain_order(true),
            )
            .collect()
            .map_err(|e| polars_to_bizsim_error("revenue breakdown", e))?;
        labelled_f64(&grouped, by.as_str(), revenue)
    }

    /// Revenue per product among products tagged `trend`, highest first.
    pub fn product_revenue_for_trend(&self, trend: TrendTag) -> BizsimResult<Vec<(String, f64)>> {
        let product = RetailCol::ProductName.as_str();
        let revenue = RetailCol::TotalRevenue.as_str();
        let grouped = self
            .df
            .clone()
            .lazy()
            .filter(col(RetailCol::ProductTrend.as_str()).eq(lit(trend.as_str())))
            .group_by([col(product)])
            .agg([col(revenue).sum()])
            .sort(
                [revenue, product],
                SortMultipleOptions::default()
                    .with_order_descending_multi([true, false])
                    .with_maintain_order(true),
            )
            .collect()
            .map_err(|e| polars_to_bizsim_error("trend revenue", e))?;
        labelled_f64(&grouped, product, revenue)
    }

    /// Revenue per `YYYY-MM` month in calendar order.
    pub fn monthly_revenue(&self) -> BizsimResult<Vec<(String, f64)>> {
        let month = RetailCol::Month.as_str();
        let revenue = RetailCol::TotalRevenue.as_str();
        let grouped = self
            .df
            .clone()
            .lazy()
            .group_by([col(month)])
            .agg([col(revenue).sum()])
            .sort([month], SortMultipleOptions::default())
            .collect()
            .map_err(|e| polars_to_bizsim_error("monthly revenue", e))?;
        labelled_f64(&grouped, month, revenue)
    }

    /// Stock level after the last recorded sale of each product, by name.
    pub fn latest_stock(&self) -> BizsimResult<Vec<(String, u32)>> {
        let product = RetailCol::ProductName.as_str();
        let stock = RetailCol::StockLevel.as_str();
        let grouped = self
            .df
            .clone()
            .lazy()
            .group_by_stable([col(product)])
            .agg([col(stock).last()])
            .sort([product], SortMultipleOptions::default())
            .collect()
            .map_err(|e| polars_to_bizsim_error("latest stock", e))?;

        let names = grouped.str_col(product)?;
        let levels = grouped.u32_col(stock)?;
        Ok(names
            .into_no_null_iter()
            .zip(levels.into_no_null_iter())
            .map(|(n, s)| (n.to_string(), s))
            .collect())
    }
}

impl TryFrom<DataFrame> for RetailSales {
    type Error = BizsimError;

    fn try_from(df: DataFrame) -> BizsimResult<Self> {
        let df = conform_to_schema(df, &Self::to_schema())?;
        Ok(Self { df })
    }
}

impl ReportName for RetailSales {
    fn base_name(&self) -> String {
        Self::BASE_NAME.to_string()
    }
}

impl Report for RetailSales {
    fn as_df(&self) -> &DataFrame {
        &self.df
    }

    fn as_df_mut(&mut self) -> &mut DataFrame {
        &mut self.df
    }
}

impl ToSchema for RetailSales {
    fn to_schema() -> SchemaRef {
        let fields: Vec<Field> = RetailCol::iter()
            .map(|col| {
                let dtype = match col {
                    RetailCol::TransactionId
                    | RetailCol::Date
                    | RetailCol::ProductName
                    | RetailCol::Category
                    | RetailCol::Store
                    | RetailCol::DayOfWeek
                    | RetailCol::Month
                    | RetailCol::ProductTrend => DataType::String,

                    RetailCol::UnitPrice | RetailCol::TotalRevenue => DataType::Float64,

                    RetailCol::Quantity | RetailCol::StockLevel => DataType::UInt32,

                    RetailCol::IsWeekend => DataType::Boolean,
                };
                Field::new(col.into(), dtype)
            })
            .collect();

        Arc::new(Schema::from_iter(fields))
    }
}
