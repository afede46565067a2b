//! Headline findings a reader should be able to rediscover in the dashboards.

use std::fmt;

use serde::Serialize;

use crate::{
    error::BizsimResult,
    format::{money, percent},
    profile::TrendTag,
    report::{
        marketing_leads::{MarketingLeads, SourceConversion},
        retail_sales::{RetailCol, RetailSales},
    },
};

/// Products whose latest stock level is below this count need restocking.
pub const LOW_STOCK_THRESHOLD: u32 = 50;

/// Number of hot products listed as growth drivers.
const HOT_PRODUCT_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetailInsights {
    pub best_store: Option<(String, f64)>,
    pub worst_store: Option<(String, f64)>,
    pub top_category: Option<(String, f64)>,
    /// Month with the highest revenue.
    pub peak_month: Option<(String, f64)>,
    pub hot_products: Vec<String>,
    pub low_stock_products: usize,
}

impl RetailInsights {
    pub fn from_sales(sales: &RetailSales) -> BizsimResult<Self> {
        let stores = sales.revenue_by(RetailCol::Store)?;
        let categories = sales.revenue_by(RetailCol::Category)?;
        let peak_month = sales
            .monthly_revenue()?
            .into_iter()
            .fold(None, |best: Option<(String, f64)>, (m, r)| match best {
                Some((_, top)) if top >= r => best,
                _ => Some((m, r)),
            });
        let hot_products = sales
            .product_revenue_for_trend(TrendTag::Hot)?
            .into_iter()
            .take(HOT_PRODUCT_COUNT)
            .map(|(name, _)| name)
            .collect();
        let low_stock_products = sales
            .latest_stock()?
            .iter()
            .filter(|(_, level)| *level < LOW_STOCK_THRESHOLD)
            .count();

        Ok(Self {
            best_store: stores.first().cloned(),
            worst_store: stores.last().cloned(),
            top_category: categories.first().cloned(),
            peak_month,
            hot_products,
            low_stock_products,
        })
    }
}

impl fmt::Display for RetailInsights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Retail Insights:")?;
        if let Some((store, revenue)) = &self.best_store {
            writeln!(f, "1. Best store: {store} ({})", money(*revenue, 0))?;
        }
        if let Some((store, revenue)) = &self.worst_store {
            writeln!(
                f,
                "   Worst store: {store} ({}) - needs attention!",
                money(*revenue, 0)
            )?;
        }
        if let Some((category, revenue)) = &self.top_category {
            writeln!(f, "2. Top category: {category} ({})", money(*revenue, 0))?;
        }
        if let Some((month, revenue)) = &self.peak_month {
            writeln!(f, "3. Peak month: {month} at {}", money(*revenue, 0))?;
        }
        if !self.hot_products.is_empty() {
            writeln!(
                f,
                "4. Hot products driving growth: {}",
                self.hot_products.join(", ")
            )?;
        }
        if self.low_stock_products > 0 {
            writeln!(
                f,
                "5. Low stock alert: {} products need restocking!",
                self.low_stock_products
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadInsights {
    pub best_source: Option<SourceConversion>,
    /// Rep with the highest closed-won deal value.
    pub top_rep: Option<(String, f64)>,
    /// Rep with the most closed-lost deals.
    pub needs_coaching: Option<String>,
    /// Expected value of all open leads.
    pub active_pipeline: f64,
}

impl LeadInsights {
    pub fn from_leads(leads: &MarketingLeads) -> BizsimResult<Self> {
        Ok(Self {
            best_source: leads.source_conversion()?.into_iter().next(),
            top_rep: leads.won_value_by_rep()?.into_iter().next(),
            needs_coaching: leads
                .lost_deals_by_rep()?
                .into_iter()
                .next()
                .map(|(rep, _)| rep),
            active_pipeline: leads.active_pipeline_value()?,
        })
    }
}

impl fmt::Display for LeadInsights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Lead Insights:")?;
        if let Some(best) = &self.best_source {
            writeln!(
                f,
                "1. Best converting source: {} ({} conversion)",
                best.source,
                percent(best.conversion_rate, 1)
            )?;
        }
        if let Some((rep, value)) = &self.top_rep {
            writeln!(f, "2. Top performer: {rep} ({} closed)", money(*value, 0))?;
        }
        if let Some(rep) = &self.needs_coaching {
            writeln!(f, "3. Needs coaching: {rep} (highest lost deals)")?;
        }
        writeln!(
            f,
            "4. Active pipeline: {} expected value",
            money(self.active_pipeline, 0)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::GeneratorConfig,
        sim::{LeadGenerator, RetailGenerator},
    };

    #[test]
    fn default_run_tells_the_business_story() {
        let cfg = GeneratorConfig::default();
        let sales =
            RetailSales::from_records(&RetailGenerator::new(&cfg).unwrap().generate()).unwrap();
        let insights = RetailInsights::from_sales(&sales).unwrap();

        assert_eq!(insights.worst_store.as_ref().unwrap().0, "Outlet Store");
        assert_eq!(insights.best_store.as_ref().unwrap().0, "Downtown Flagship");
        let peak = &insights.peak_month.as_ref().unwrap().0;
        assert!(peak == "2024-11" || peak == "2024-12", "peak {peak}");
        assert_eq!(insights.hot_products.len(), 3);

        let text = insights.to_string();
        assert!(text.starts_with("Retail Insights:"));
        assert!(text.contains("needs attention"));
    }

    #[test]
    fn lead_insights_render() {
        let cfg = GeneratorConfig::default();
        let leads =
            MarketingLeads::from_records(&LeadGenerator::new(&cfg).unwrap().generate()).unwrap();
        let insights = LeadInsights::from_leads(&leads).unwrap();
        assert!(insights.best_source.is_some());
        assert!(insights.top_rep.is_some());
        assert!(insights.active_pipeline > 0.0);
        assert!(insights.to_string().contains("Active pipeline: $"));
    }
}
