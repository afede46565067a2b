use std::fs;

use bizsim::{format::money, prelude::*};

mod common;

#[test]
fn same_input_renders_identical_html() {
    let cfg = common::setup_short_config();
    let (_a, first) = common::setup_layout();
    let (_b, second) = common::setup_layout();
    generate_datasets(&cfg, &first).unwrap();
    generate_datasets(&cfg, &second).unwrap();

    let a = render_dashboards(&first).unwrap();
    let b = render_dashboards(&second).unwrap();

    for (x, y) in [
        (a.retail_dashboard, b.retail_dashboard),
        (a.lead_dashboard, b.lead_dashboard),
    ] {
        assert_eq!(fs::read(&x).unwrap(), fs::read(&y).unwrap(), "{}", x.display());
    }
}

#[test]
fn missing_input_produces_no_dashboards() {
    let (_dir, layout) = common::setup_layout();
    let err = render_dashboards(&layout).unwrap_err();
    assert!(err.is_missing_input());
    assert_eq!(layout.missing_inputs().len(), 2);
    assert!(!layout.retail_dashboard().exists());
    assert!(!layout.lead_dashboard().exists());
}

#[test]
fn one_missing_input_is_enough_to_stop() {
    let cfg = common::setup_short_config();
    let (_dir, layout) = common::setup_layout();
    generate_datasets(&cfg, &layout).unwrap();
    fs::remove_file(layout.leads_csv()).unwrap();

    let err = render_dashboards(&layout).unwrap_err();
    assert!(err.is_missing_input());
    assert!(!layout.dashboards_dir().exists());
}

#[test]
fn flat_price_total_revenue_kpi() {
    let n = 37;
    let (_dir, layout) = common::setup_layout();
    let sales = RetailSales::from_records(&common::setup_flat_price_sales(n)).unwrap();
    sales.to_csv(layout.data_dir()).unwrap();
    MarketingLeads::from_records(&[]).unwrap().to_csv(layout.data_dir()).unwrap();

    let rendered = render_dashboards(&layout).unwrap();
    assert_eq!(rendered.retail_rows, n as usize);
    assert_eq!(rendered.lead_rows, 0);

    let html = fs::read_to_string(rendered.retail_dashboard).unwrap();
    let kpi = format!(r#"id="kpiRevenue">{}</div>"#, money(100.0 * f64::from(n), 2));
    assert!(html.contains(&kpi), "missing {kpi}");
    assert!(html.contains(r#"id="kpiProducts">1</div>"#));

    let leads_html = fs::read_to_string(rendered.lead_dashboard).unwrap();
    assert!(leads_html.contains("No data"));
    assert!(leads_html.contains("const rawData = [];"));
}
