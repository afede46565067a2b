use std::{collections::HashMap, fs};

use bizsim::{prelude::*, sim::channel::round2};
use chrono::{Datelike, NaiveDate, Weekday};

mod common;

#[test]
fn retail_rows_round_revenue() {
    let cfg = common::setup_short_config();
    let transactions = RetailGenerator::new(&cfg).unwrap().generate();
    assert!(!transactions.is_empty());

    for t in &transactions {
        assert_eq!(t.total_revenue, round2(t.unit_price * f64::from(t.quantity)));
        assert!(t.unit_price > 0.0);
    }
}

#[test]
fn stock_rises_only_across_a_monday_restock() {
    let cfg = GeneratorConfig::default();
    let transactions = RetailGenerator::new(&cfg).unwrap().generate();

    let mut last_seen: HashMap<&str, (NaiveDate, u32)> = HashMap::new();
    let mut restocked_sales = 0;
    for t in &transactions {
        if let Some(&(prev_day, prev_level)) = last_seen.get(t.product_name.as_str()) {
            let sold_down = prev_level.saturating_sub(t.quantity);
            // Restock runs after Monday's sales, so it lands between the
            // previous sale and this one only if a Monday lies in
            // [prev_day, t.date).
            let restock_between = prev_day
                .iter_days()
                .take_while(|d| *d < t.date)
                .any(|d| d.weekday() == Weekday::Mon);

            if restock_between {
                assert!(t.stock_level >= sold_down, "{} on {}", t.product_name, t.date);
                if t.stock_level > sold_down {
                    restocked_sales += 1;
                }
            } else {
                assert_eq!(t.stock_level, sold_down, "{} on {}", t.product_name, t.date);
            }
        }
        last_seen.insert(t.product_name.as_str(), (t.date, t.stock_level));
    }
    assert!(restocked_sales > 0, "no restock visible in the table");
}

#[test]
fn closed_leads_carry_close_dates_and_expected_values() {
    // Leads close only after the resolve threshold, so the window must be
    // longer than that.
    let cfg = GeneratorConfig::default();
    assert!(cfg.window().span_days() > cfg.stage_thresholds().resolve_days);
    let leads = LeadGenerator::new(&cfg).unwrap().generate();
    assert!(!leads.is_empty());

    let (mut won, mut lost) = (0, 0);
    for lead in &leads {
        let contact_gap = (lead.contact_date - lead.lead_date).num_days();
        assert!((1..=5).contains(&contact_gap));
        assert_eq!(
            lead.days_in_pipeline,
            (cfg.window().end() - lead.lead_date).num_days()
        );
        assert_eq!(
            lead.expected_value(),
            f64::from(lead.deal_value) * lead.stage.win_probability()
        );
        match lead.close_date {
            Some(close) => {
                assert!(lead.stage.is_closed(), "{} is open but closed", lead.lead_id);
                assert!((30..=90).contains(&(close - lead.lead_date).num_days()));
            }
            None => assert!(!lead.stage.is_closed(), "{} has no close date", lead.lead_id),
        }
        match lead.stage {
            Stage::ClosedWon => {
                won += 1;
                assert_eq!(lead.expected_value(), f64::from(lead.deal_value));
            }
            Stage::ClosedLost => {
                lost += 1;
                assert_eq!(lead.expected_value(), 0.0);
            }
            _ => {}
        }
    }
    assert!(won > 0, "no closed-won leads");
    assert!(lost > 0, "no closed-lost leads");
}

#[test]
fn holiday_months_outsell_the_rest_of_the_year() {
    let cfg = GeneratorConfig::default();
    let sales = RetailSales::from_records(&RetailGenerator::new(&cfg).unwrap().generate()).unwrap();
    let monthly = sales.monthly_revenue().unwrap();

    let (peak, rest): (Vec<_>, Vec<_>) = monthly
        .iter()
        .partition(|(month, _)| month.ends_with("-11") || month.ends_with("-12"));
    assert_eq!(peak.len(), 2);
    let rest_avg = rest.iter().map(|(_, r)| r).sum::<f64>() / rest.len() as f64;
    for (month, revenue) in peak {
        assert!(*revenue > rest_avg, "{month}: {revenue} <= {rest_avg}");
    }
}

#[test]
fn same_seed_writes_identical_files() {
    let cfg = common::setup_short_config();
    let (_a, first) = common::setup_layout();
    let (_b, second) = common::setup_layout();

    let run_a = generate_datasets(&cfg, &first).unwrap();
    let run_b = generate_datasets(&cfg, &second).unwrap();
    assert_eq!(run_a.manifest, run_b.manifest);

    for (a, b) in run_a.files.iter().zip(&run_b.files) {
        assert_eq!(a.file_name(), b.file_name());
        assert_eq!(fs::read(a).unwrap(), fs::read(b).unwrap(), "{}", a.display());
    }
}

#[test]
fn different_seeds_diverge() {
    let cfg = common::setup_short_config();
    let a = RetailGenerator::new(&cfg).unwrap().generate();
    let b = RetailGenerator::new(&cfg.clone().with_seed(7)).unwrap().generate();
    assert_ne!(a, b);
}

#[test]
fn cleaned_csv_reads_back_into_the_same_tables() {
    let cfg = common::setup_short_config();
    let (_dir, layout) = common::setup_layout();
    let outcome = generate_datasets(&cfg, &layout).unwrap();

    let sales = RetailSales::from_csv(layout.retail_csv()).unwrap();
    let leads = MarketingLeads::from_csv(layout.leads_csv()).unwrap();

    assert!(sales.as_df().equals_missing(outcome.sales.as_df()));
    assert!(leads.as_df().equals_missing(outcome.leads.as_df()));
}

#[test]
fn lead_months_stay_inside_the_window() {
    let cfg = common::setup_short_config();
    let leads = LeadGenerator::new(&cfg).unwrap().generate();
    for lead in &leads {
        assert!(lead.lead_date >= cfg.window().start() && lead.lead_date <= cfg.window().end());
        assert_eq!(lead.lead_month(), format!("{}-{:02}", lead.lead_date.year(), lead.lead_date.month()));
    }
}
