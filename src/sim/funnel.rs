use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

use crate::{
    error::{BizsimResult, ConfigError},
    profile::{LeadSourceProfile, RepSpecialty, SalesRepProfile},
    sim::weighted::WeightedTable,
};

// ================================================================================================
// Stage
// ================================================================================================

/// Position of a lead in the sales funnel.
///
/// Variants are declared in funnel order; iteration order is the display
/// order of the stage filter.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
    EnumCount,
)]
pub enum Stage {
    Lead,
    Contacted,
    Qualified,
    Proposal,
    Negotiation,
    #[strum(serialize = "Closed Won")]
    #[serde(rename = "Closed Won")]
    ClosedWon,
    #[strum(serialize = "Closed Lost")]
    #[serde(rename = "Closed Lost")]
    ClosedLost,
}

impl Stage {
    /// Probability that a lead in this stage ends up won.
    pub fn win_probability(&self) -> f64 {
        match self {
            Self::Lead => 0.10,
            Self::Contacted => 0.20,
            Self::Qualified => 0.40,
            Self::Proposal => 0.60,
            Self::Negotiation => 0.75,
            Self::ClosedWon => 1.0,
            Self::ClosedLost => 0.0,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::ClosedWon | Self::ClosedLost)
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

// ================================================================================================
// Stage Thresholds
// ================================================================================================

/// Lead-age bucket boundaries, in days since the lead was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StageThresholds {
    /// Younger leads are untouched.
    pub fresh_days: i64,
    /// Younger leads at most got contacted.
    pub contact_days: i64,
    /// Younger leads can reach the proposal stage.
    pub qualify_days: i64,
    /// Younger leads can reach negotiation; older ones may be closed.
    pub resolve_days: i64,
}

impl Default for StageThresholds {
    fn default() -> Self {
        Self {
            fresh_days: 7,
            contact_days: 14,
            qualify_days: 30,
            resolve_days: 60,
        }
    }
}

impl StageThresholds {
    pub fn validate(&self) -> BizsimResult<()> {
        let bounds = [
            self.fresh_days,
            self.contact_days,
            self.qualify_days,
            self.resolve_days,
        ];
        if bounds[0] < 0 || bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::InvalidThresholds(format!(
                "expected non-negative, strictly increasing bounds, got {bounds:?}"
            ))
            .into());
        }
        Ok(())
    }
}

// ================================================================================================
// Conversion
// ================================================================================================

pub const MIN_CONVERSION: f64 = 0.05;
pub const MAX_CONVERSION: f64 = 0.8;

/// Probability that a lead of `source` handled by `rep` advances.
pub fn conversion_probability(source: &LeadSourceProfile, rep: &SalesRepProfile) -> f64 {
    (source.quality + rep.close_rate_bonus).clamp(MIN_CONVERSION, MAX_CONVERSION)
}

/// Draws the stage of a lead from its age and conversion probability.
#[derive(Debug, Clone)]
pub struct StagePicker {
    thresholds: StageThresholds,
    contacting: WeightedTable<Stage>,
    early_converted: WeightedTable<Stage>,
    early_stalled: WeightedTable<Stage>,
    mid_converted: WeightedTable<Stage>,
    mid_stalled: WeightedTable<Stage>,
    late_converted: WeightedTable<Stage>,
    late_stalled: WeightedTable<Stage>,
}

impl StagePicker {
    pub fn new(thresholds: StageThresholds) -> BizsimResult<Self> {
        use Stage::*;

        thresholds.validate()?;
        Ok(Self {
            thresholds,
            contacting: WeightedTable::new("contacting", [(Lead, 30.0), (Contacted, 70.0)])?,
            early_converted: WeightedTable::new(
                "early converted",
                [(Contacted, 20.0), (Qualified, 50.0), (Proposal, 30.0)],
            )?,
            early_stalled: WeightedTable::new("early stalled", [(Lead, 40.0), (Contacted, 60.0)])?,
            mid_converted: WeightedTable::new(
                "mid converted",
                [(Qualified, 30.0), (Proposal, 40.0), (Negotiation, 30.0)],
            )?,
            mid_stalled: WeightedTable::new(
                "mid stalled",
                [(Lead, 30.0), (Contacted, 40.0), (Qualified, 30.0)],
            )?,
            late_converted: WeightedTable::new(
                "late converted",
                [(Proposal, 20.0), (Negotiation, 30.0), (ClosedWon, 50.0)],
            )?,
            late_stalled: WeightedTable::new("late stalled", [(Qualified, 30.0), (ClosedLost, 70.0)])?,
        })
    }

    pub fn pick<R: Rng + ?Sized>(&self, days_since_created: i64, conversion: f64, rng: &mut R) -> Stage {
        let t = &self.thresholds;
        if days_since_created < t.fresh_days {
            return Stage::Lead;
        }
        if days_since_created < t.contact_days {
            return *self.contacting.sample(rng);
        }

        let converted = rng.random::<f64>() < conversion;
        let table = if days_since_created < t.qualify_days {
            if converted { &self.early_converted } else { &self.early_stalled }
        } else if days_since_created < t.resolve_days {
            if converted { &self.mid_converted } else { &self.mid_stalled }
        } else if converted {
            &self.late_converted
        } else {
            &self.late_stalled
        };
        *table.sample(rng)
    }
}

// ================================================================================================
// Rep Assignment
// ================================================================================================

/// Deals above this value favour enterprise reps.
pub const ENTERPRISE_DEAL: u32 = 50_000;
/// Deals above this value favour mid-market reps.
pub const MID_MARKET_DEAL: u32 = 25_000;

/// Skill-weighted rep picker with a boost for the rep segment matching the
/// deal size.
#[derive(Debug, Clone)]
pub struct RepAssigner {
    enterprise: WeightedTable<usize>,
    mid_market: WeightedTable<usize>,
    standard: WeightedTable<usize>,
}

impl RepAssigner {
    pub fn new(reps: &[SalesRepProfile]) -> BizsimResult<Self> {
        let table = |label: &str, boosted: Option<(RepSpecialty, f64)>| {
            WeightedTable::new(
                label,
                reps.iter().enumerate().map(|(i, rep)| {
                    let weight = match boosted {
                        Some((specialty, factor)) if rep.specialty == specialty => rep.skill * factor,
                        _ => rep.skill,
                    };
                    (i, weight)
                }),
            )
        };
        Ok(Self {
            enterprise: table("enterprise reps", Some((RepSpecialty::Enterprise, 1.5)))?,
            mid_market: table("mid-market reps", Some((RepSpecialty::MidMarket, 1.3)))?,
            standard: table("reps", None)?,
        })
    }

    /// Index into the rep table for a deal of `deal_value`.
    pub fn pick<R: Rng + ?Sized>(&self, deal_value: u32, rng: &mut R) -> usize {
        let table = if deal_value > ENTERPRISE_DEAL {
            &self.enterprise
        } else if deal_value > MID_MARKET_DEAL {
            &self.mid_market
        } else {
            &self.standard
        };
        *table.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rand::{SeedableRng, rngs::StdRng};
    use strum::IntoEnumIterator;

    use super::*;
    use crate::profile::{LeadProfiles, LeadVolume};

    #[test]
    fn stage_labels_and_order() {
        let labels: Vec<String> = Stage::iter().map(|s| s.to_string()).collect();
        assert_eq!(
            labels,
            vec![
                "Lead",
                "Contacted",
                "Qualified",
                "Proposal",
                "Negotiation",
                "Closed Won",
                "Closed Lost"
            ]
        );
        assert_eq!(Stage::from_str("Closed Won").unwrap(), Stage::ClosedWon);
    }

    #[test]
    fn only_closed_stages_are_closed() {
        let closed: Vec<Stage> = Stage::iter().filter(Stage::is_closed).collect();
        assert_eq!(closed, vec![Stage::ClosedWon, Stage::ClosedLost]);
        assert_eq!(Stage::ClosedWon.win_probability(), 1.0);
        assert_eq!(Stage::ClosedLost.win_probability(), 0.0);
    }

    #[test]
    fn conversion_is_clamped() {
        let reps = LeadProfiles::default().reps;
        let great = LeadSourceProfile::new("g", LeadVolume::Low, 0.9, 1, 0);
        let awful = LeadSourceProfile::new("a", LeadVolume::Low, 0.0, 1, 0);
        assert_eq!(conversion_probability(&great, &reps[0]), MAX_CONVERSION);
        assert_eq!(conversion_probability(&awful, &reps[4]), MIN_CONVERSION);
    }

    #[test]
    fn fresh_leads_stay_leads_and_young_leads_never_close() {
        let picker = StagePicker::new(StageThresholds::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        for days in 0..60 {
            let stage = picker.pick(days, 0.8, &mut rng);
            if days < 7 {
                assert_eq!(stage, Stage::Lead);
            }
            assert!(!stage.is_closed(), "closed at {days} days");
        }
    }

    #[test]
    fn old_leads_can_close_both_ways() {
        let picker = StagePicker::new(StageThresholds::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let stages: Vec<Stage> = (0..500).map(|_| picker.pick(90, 0.5, &mut rng)).collect();
        assert!(stages.contains(&Stage::ClosedWon));
        assert!(stages.contains(&Stage::ClosedLost));
        assert!(!stages.contains(&Stage::Lead));
    }

    #[test]
    fn thresholds_must_increase() {
        let bad = StageThresholds {
            contact_days: 7,
            ..StageThresholds::default()
        };
        assert!(bad.validate().is_err());
        assert!(StagePicker::new(bad).is_err());
    }

    #[test]
    fn big_deals_lean_enterprise() {
        let reps = LeadProfiles::default().reps;
        let assigner = RepAssigner::new(&reps).unwrap();
        let mut rng = StdRng::seed_from_u64(10);
        let n = 4_000;
        let eva_big = (0..n).filter(|_| assigner.pick(60_000, &mut rng) == 0).count();
        let eva_small = (0..n).filter(|_| assigner.pick(10_000, &mut rng) == 0).count();
        assert!(eva_big > eva_small, "big {eva_big} small {eva_small}");
    }
}
