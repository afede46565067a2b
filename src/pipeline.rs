//! End-to-end stages behind the two binaries.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    config::{GeneratorConfig, LEADS_STREAM, RETAIL_STREAM},
    dashboard::{LeadDashboard, RetailDashboard},
    error::BizsimResult,
    io::{DataLayout, ensure_dir, write_json, write_text},
    record::DATE_FORMAT,
    report::{
        io::{FromCsv, ToCsv, ToJsonFile},
        marketing_leads::MarketingLeads,
        retail_sales::RetailSales,
    },
    sim::{LeadGenerator, RetailGenerator},
};

/// Provenance of one generation run, written next to the data files.
///
/// Holds no wall-clock time, so the same configuration always produces the
/// same manifest bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationManifest {
    pub seed: u64,
    pub window_start: String,
    pub window_end: String,
    /// blake3 digest of the postcard-encoded configuration.
    pub fingerprint: String,
    pub streams: Vec<StreamManifest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamManifest {
    pub name: String,
    pub seed: u64,
    pub rows: usize,
    pub files: Vec<String>,
}

/// Tables and files produced by [`generate_datasets`].
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub sales: RetailSales,
    pub leads: MarketingLeads,
    pub manifest: GenerationManifest,
    pub files: Vec<PathBuf>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Simulates both datasets and writes their CSV and JSON files plus the
/// manifest into the data directory.
#[instrument(skip_all, fields(seed = cfg.seed(), root = %layout.root().display()))]
pub fn generate_datasets(cfg: &GeneratorConfig, layout: &DataLayout) -> BizsimResult<GenerationOutcome> {
    cfg.validate()?;
    let data_dir = layout.data_dir();
    ensure_dir(&data_dir)?;

    let sales = RetailSales::from_records(&RetailGenerator::new(cfg)?.generate())?;
    let retail_files = [sales.to_csv(&data_dir)?, sales.to_json_file(&data_dir)?];
    info!(rows = sales.height(), "Wrote retail sales");

    let leads = MarketingLeads::from_records(&LeadGenerator::new(cfg)?.generate())?;
    let lead_files = [leads.to_csv(&data_dir)?, leads.to_json_file(&data_dir)?];
    info!(rows = leads.height(), "Wrote marketing leads");

    let manifest = GenerationManifest {
        seed: cfg.seed(),
        window_start: cfg.window().start().format(DATE_FORMAT).to_string(),
        window_end: cfg.window().end().format(DATE_FORMAT).to_string(),
        fingerprint: cfg.fingerprint()?,
        streams: vec![
            StreamManifest {
                name: RETAIL_STREAM.to_string(),
                seed: cfg.stream_seed(RETAIL_STREAM),
                rows: sales.height(),
                files: retail_files.iter().map(|p| file_name(p)).collect(),
            },
            StreamManifest {
                name: LEADS_STREAM.to_string(),
                seed: cfg.stream_seed(LEADS_STREAM),
                rows: leads.height(),
                files: lead_files.iter().map(|p| file_name(p)).collect(),
            },
        ],
    };
    let manifest_path = layout.manifest();
    write_json(&manifest_path, &manifest)?;

    let mut files: Vec<PathBuf> = retail_files.into_iter().chain(lead_files).collect();
    files.push(manifest_path);

    Ok(GenerationOutcome {
        sales,
        leads,
        manifest,
        files,
    })
}

/// Dashboards written by [`render_dashboards`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub retail_rows: usize,
    pub lead_rows: usize,
    pub retail_dashboard: PathBuf,
    pub lead_dashboard: PathBuf,
}

/// Reads both cleaned CSV files and writes the two dashboards.
///
/// Fails with a missing-input error before touching the dashboards
/// directory when either CSV is absent, and renders both documents before
/// writing either one.
#[instrument(skip_all, fields(root = %layout.root().display()))]
pub fn render_dashboards(layout: &DataLayout) -> BizsimResult<RenderOutcome> {
    layout.require_inputs()?;

    let sales = RetailSales::from_csv(layout.retail_csv())?;
    let leads = MarketingLeads::from_csv(layout.leads_csv())?;

    let retail_html = RetailDashboard::render(&sales)?;
    let lead_html = LeadDashboard::render(&leads)?;

    let retail_path = layout.retail_dashboard();
    let lead_path = layout.lead_dashboard();
    write_text(&retail_path, &retail_html)?;
    write_text(&lead_path, &lead_html)?;

    info!(
        retail = %retail_path.display(),
        leads = %lead_path.display(),
        "Wrote dashboards"
    );
    Ok(RenderOutcome {
        retail_rows: sales.height(),
        lead_rows: leads.height(),
        retail_dashboard: retail_path,
        lead_dashboard: lead_path,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::config::SimulationWindow;

    fn short_config() -> GeneratorConfig {
        let window = SimulationWindow::new(
            NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 11, 14).unwrap(),
        )
        .unwrap();
        GeneratorConfig::default().with_window(window)
    }

    #[test]
    fn manifest_describes_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let outcome = generate_datasets(&short_config(), &layout).unwrap();

        let m = &outcome.manifest;
        assert_eq!(m.seed, 42);
        assert_eq!(m.window_start, "2024-11-01");
        assert_eq!(m.streams[0].rows, outcome.sales.height());
        assert_eq!(
            m.streams[0].files,
            vec!["retail_sales_cleaned.csv", "retail_sales.json"]
        );
        assert_eq!(m.streams[1].files[1], "marketing_leads.json");
        assert_eq!(outcome.files.len(), 5);
        assert!(outcome.files.iter().all(|p| p.is_file()));
    }

    #[test]
    fn renders_after_generation() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let outcome = generate_datasets(&short_config(), &layout).unwrap();

        let rendered = render_dashboards(&layout).unwrap();
        assert_eq!(rendered.retail_rows, outcome.sales.height());
        assert_eq!(rendered.lead_rows, outcome.leads.height());
        assert!(rendered.retail_dashboard.ends_with("dashboards/retail-inventory.html"));
        assert!(rendered.lead_dashboard.ends_with("dashboards/lead-conversion.html"));
    }

    #[test]
    fn missing_inputs_leave_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let err = render_dashboards(&layout).unwrap_err();
        assert!(err.is_missing_input());
        assert!(!layout.dashboards_dir().exists());
    }
}
