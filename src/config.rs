use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    error::{BizsimResult, ConfigError},
    profile::{LeadProfiles, RetailProfiles},
    sim::funnel::StageThresholds,
};

// ================================================================================================
// Simulation Window
// ================================================================================================

/// Inclusive calendar range covered by the day-by-day simulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl SimulationWindow {
    /// Number of days the default window reaches back from its end date.
    pub const DEFAULT_SPAN_DAYS: i64 = 180;

    pub fn new(start: NaiveDate, end: NaiveDate) -> BizsimResult<Self> {
        if start > end {
            return Err(ConfigError::InvalidWindow {
                start: start.to_string(),
                end: end.to_string(),
                msg: "start date lies after end date".to_string(),
            }
            .into());
        }
        Ok(Self { start, end })
    }

    /// Window of `span_days` days ending at (and including) `end`.
    pub fn ending_at(end: NaiveDate, span_days: i64) -> BizsimResult<Self> {
        if span_days < 0 {
            return Err(ConfigError::InvalidWindow {
                start: "-".to_string(),
                end: end.to_string(),
                msg: format!("negative span of {span_days} days"),
            }
            .into());
        }
        Self::new(end - Duration::days(span_days), end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Days between start and end; a single-day window has a span of zero.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Iterates every date of the window, both ends included.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// Position of `date` inside the window, from `0.0` at the start to `1.0`
    /// at the end.
    pub fn progress(&self, date: NaiveDate) -> f64 {
        let span = self.span_days();
        if span == 0 {
            return 0.0;
        }
        (date - self.start).num_days() as f64 / span as f64
    }

    /// Whole days from `date` until the window end.
    pub fn days_until_end(&self, date: NaiveDate) -> i64 {
        (self.end - date).num_days()
    }
}

impl Default for SimulationWindow {
    fn default() -> Self {
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or(NaiveDate::MIN);
        Self {
            start: end - Duration::days(Self::DEFAULT_SPAN_DAYS),
            end,
        }
    }
}

// ================================================================================================
// Generator Configuration
// ================================================================================================

/// Stream label of the retail transaction generator.
pub const RETAIL_STREAM: &str = "retail";

/// Stream label of the marketing lead generator.
pub const LEADS_STREAM: &str = "leads";

/// Immutable blueprint for one generation run.
///
/// Everything that influences the produced datasets lives here, so two runs
/// with equal configs (and equal [`GeneratorConfig::fingerprint`]) produce
/// byte-identical output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    seed: u64,
    window: SimulationWindow,
    retail: RetailProfiles,
    leads: LeadProfiles,
    stage_thresholds: StageThresholds,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            window: SimulationWindow::default(),
            retail: RetailProfiles::default(),
            leads: LeadProfiles::default(),
            stage_thresholds: StageThresholds::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    pub fn with_window(self, window: SimulationWindow) -> Self {
        Self { window, ..self }
    }

    pub fn with_retail_profiles(self, retail: RetailProfiles) -> Self {
        Self { retail, ..self }
    }

    pub fn with_lead_profiles(self, leads: LeadProfiles) -> Self {
        Self { leads, ..self }
    }

    pub fn with_stage_thresholds(self, stage_thresholds: StageThresholds) -> Self {
        Self {
            stage_thresholds,
            ..self
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn window(&self) -> &SimulationWindow {
        &self.window
    }

    pub fn retail(&self) -> &RetailProfiles {
        &self.retail
    }

    pub fn leads(&self) -> &LeadProfiles {
        &self.leads
    }

    pub fn stage_thresholds(&self) -> &StageThresholds {
        &self.stage_thresholds
    }

    /// Rejects configurations the generators cannot sample from.
    pub fn validate(&self) -> BizsimResult<()> {
        self.retail.validate()?;
        self.leads.validate()?;
        self.stage_thresholds.validate()
    }

    /// Deterministic hash of this configuration.
    ///
    /// Recorded in the generation manifest to tell datasets of different
    /// configurations apart.
    pub fn fingerprint(&self) -> BizsimResult<String> {
        let mut hasher = blake3::Hasher::new();
        let bytes = postcard::to_stdvec(self).map_err(ConfigError::Encoding)?;
        hasher.update(&bytes);
        Ok(format!("{}", hasher.finalize()))
    }

    /// Derives an independent seed for the named random stream.
    ///
    /// Each dataset draws from its own stream so that changing one profile
    /// table leaves the other dataset untouched.
    pub fn stream_seed(&self, label: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(label.as_bytes());
        let digest = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest.as_bytes()[..8]);
        u64::from_le_bytes(head)
    }
}
