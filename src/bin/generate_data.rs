use std::time::Instant;

use anyhow::{Context, Result};
use bizsim::{
    format::{money, percent, thousands},
    prelude::*,
    telemetry::init_tracing,
};
use tracing::info;

fn main() -> Result<()> {
    let _guard = init_tracing("bizsim-generate")?;

    let cfg = GeneratorConfig::default();
    let layout = DataLayout::from_env();

    banner("BUSINESS ANALYTICS DATA GENERATION");
    println!(
        "Period: {} to {}",
        cfg.window().start().format("%Y-%m-%d"),
        cfg.window().end().format("%Y-%m-%d")
    );
    println!("\nThis data tells a coherent business story:");
    println!("- Seasonal patterns (holiday spike in Nov-Dec)");
    println!("- Store performance variations (one struggling store)");
    println!("- Product lifecycle trends (hot products vs declining)");
    println!("- Marketing channel effectiveness differences");
    println!("- Sales rep performance variations");

    let start = Instant::now();
    let outcome = generate_datasets(&cfg, &layout).context("Failed to generate datasets")?;
    info!(elapsed = ?start.elapsed(), "Generation finished");

    banner("RETAIL SALES DATA WITH BUSINESS PATTERNS");
    retail_summary(&outcome.sales)?;

    banner("MARKETING LEAD DATA WITH FUNNEL LOGIC");
    lead_summary(&outcome.leads)?;

    banner("DATA SAVED");
    for path in &outcome.files {
        println!("{}", path.display());
    }

    banner("KEY INSIGHTS TO DISCOVER IN THE DATA");
    println!();
    print!("{}", RetailInsights::from_sales(&outcome.sales)?);
    println!();
    print!("{}", LeadInsights::from_leads(&outcome.leads)?);

    banner("DATA GENERATION COMPLETE!");
    println!("\nNext: Run 'create_dashboards' to generate interactive dashboards.");

    Ok(())
}

fn banner(title: &str) {
    let rule = "=".repeat(60);
    println!("\n{rule}\n{title}\n{rule}");
}

fn retail_summary(sales: &RetailSales) -> Result<()> {
    println!("Generated {} transactions", thousands(sales.height() as u64));
    if let Some((first, last)) = sales.date_range()? {
        println!("Date range: {first} to {last}");
    }
    println!("Total revenue: {}", money(sales.total_revenue()?, 2));
    Ok(())
}

fn lead_summary(leads: &MarketingLeads) -> Result<()> {
    println!("Generated {} leads", thousands(leads.height() as u64));
    if let Some((first, last)) = leads.date_range()? {
        println!("Date range: {first} to {last}");
    }
    println!("Total pipeline: {}", money(leads.total_pipeline()?, 0));

    println!("\nSource Performance:");
    let mut sources = leads.source_conversion()?;
    sources.sort_by(|a, b| a.source.cmp(&b.source));
    for s in sources.iter().filter(|s| s.won + s.lost > 0) {
        println!(
            "  {}: {} leads, {} conversion rate",
            s.source,
            s.leads,
            percent(s.conversion_rate, 1)
        );
    }
    Ok(())
}
