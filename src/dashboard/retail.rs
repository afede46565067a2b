use std::collections::BTreeSet;

use strum::IntoEnumIterator;
use tracing::{info, instrument};

use crate::{
    dashboard::{Template, data_period, embed_json, options_html},
    error::BizsimResult,
    format::{money, thousands},
    profile::TrendTag,
    report::{
        io::{Report, ToJson},
        polars_ext::DataFrameExt,
        retail_sales::{RetailCol, RetailSales},
    },
};

const TEMPLATE: Template = Template::new(
    "retail-inventory",
    include_str!("../../templates/retail_dashboard.html"),
);

pub const RETAIL_TITLE: &str = "Retail Analytics Dashboard | Interactive Business Intelligence";

/// First-paint headline figures of the retail dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct RetailKpis {
    pub total_revenue: f64,
    pub transactions: usize,
    /// Distinct products with at least one sale.
    pub products_sold: usize,
}

impl RetailKpis {
    /// Aggregates in row order so the figures are reproducible bit for bit.
    pub fn from_sales(sales: &RetailSales) -> BizsimResult<Self> {
        let df = sales.as_df();
        let total_revenue = df
            .f64_col(RetailCol::TotalRevenue.as_str())?
            .into_no_null_iter()
            .fold(0.0, |acc, v| acc + v);
        let products_sold = df
            .str_col(RetailCol::ProductName.as_str())?
            .into_no_null_iter()
            .collect::<BTreeSet<_>>()
            .len();
        Ok(Self {
            total_revenue,
            transactions: df.height(),
            products_sold,
        })
    }

    pub fn avg_transaction(&self) -> f64 {
        if self.transactions == 0 {
            0.0
        } else {
            self.total_revenue / self.transactions as f64
        }
    }
}

fn trend_label(tag: TrendTag) -> &'static str {
    match tag {
        TrendTag::Hot => "Hot Products",
        TrendTag::Growing => "Growing",
        TrendTag::Stable => "Stable",
        TrendTag::Declining => "Declining",
        TrendTag::Seasonal => "Seasonal",
    }
}

/// Renders the retail sales & inventory dashboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetailDashboard;

impl RetailDashboard {
    #[instrument(skip_all, fields(rows = sales.height()))]
    pub fn render(sales: &RetailSales) -> BizsimResult<String> {
        let kpis = RetailKpis::from_sales(sales)?;

        let categories = sales.unique_sorted(RetailCol::Category)?;
        let stores = sales.unique_sorted(RetailCol::Store)?;
        let months = sales.unique_sorted(RetailCol::Month)?;
        let present_trends = sales.unique_sorted(RetailCol::ProductTrend)?;
        let trends: Vec<TrendTag> = TrendTag::iter()
            .filter(|t| present_trends.iter().any(|p| p == t.as_str()))
            .collect();

        let same = |values: &[String]| options_html(values.iter().map(|v| (v.as_str(), v.as_str())));

        let html = TEMPLATE.render(&[
            ("__TITLE__", RETAIL_TITLE.to_string()),
            ("__DATA_PERIOD__", data_period(sales.date_range()?)),
            ("__CATEGORY_OPTIONS__", same(&categories)),
            ("__STORE_OPTIONS__", same(&stores)),
            ("__MONTH_OPTIONS__", same(&months)),
            (
                "__TREND_OPTIONS__",
                options_html(trends.iter().map(|t| (t.as_str(), trend_label(*t)))),
            ),
            ("__KPI_REVENUE__", money(kpis.total_revenue, 2)),
            ("__KPI_TRANSACTIONS__", thousands(kpis.transactions as u64)),
            ("__KPI_PRODUCTS__", thousands(kpis.products_sold as u64)),
            ("__KPI_AVG__", money(kpis.avg_transaction(), 2)),
            ("__RAW_DATA__", embed_json(&sales.to_json()?)?),
        ])?;

        info!(bytes = html.len(), template = TEMPLATE.name(), "Rendered dashboard");
        Ok(html)
    }
}
