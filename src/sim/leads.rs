use chrono::{Duration, NaiveDate};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tracing::{debug, info, instrument};

use crate::{
    config::{GeneratorConfig, LEADS_STREAM, SimulationWindow},
    error::BizsimResult,
    profile::{ContactPools, LeadProfiles, LeadSourceProfile},
    record::{Lead, LeadId, lead::contact_email},
    sim::{
        demand::sample_count,
        funnel::{RepAssigner, StagePicker, conversion_probability},
    },
};

/// Deal value multiplier range around a source's average deal.
const DEAL_SPREAD: std::ops::Range<f64> = 0.5..2.0;

/// Days between lead creation and first contact.
const CONTACT_DELAY_DAYS: std::ops::RangeInclusive<i64> = 1..=5;

/// Days between lead creation and close for closed leads.
const CLOSE_DELAY_DAYS: std::ops::RangeInclusive<i64> = 30..=90;

/// Day-by-day simulation of inbound leads and their funnel stage at the end
/// of the window.
#[derive(Debug, Clone)]
pub struct LeadGenerator {
    seed: u64,
    window: SimulationWindow,
    profiles: LeadProfiles,
    reps: RepAssigner,
    stages: StagePicker,
}

impl LeadGenerator {
    pub fn new(cfg: &GeneratorConfig) -> BizsimResult<Self> {
        let profiles = cfg.leads().clone();
        profiles.validate()?;
        Ok(Self {
            seed: cfg.stream_seed(LEADS_STREAM),
            window: *cfg.window(),
            reps: RepAssigner::new(&profiles.reps)?,
            stages: StagePicker::new(*cfg.stage_thresholds())?,
            profiles,
        })
    }

    /// Number of leads `source` produces on `date`.
    fn daily_volume<R: Rng + ?Sized>(source: &LeadSourceProfile, date: NaiveDate, rng: &mut R) -> u32 {
        match &source.burst {
            Some(burst) if burst.is_active(date) => {
                let n = rng.random_range(burst.min_leads..=burst.max_leads);
                debug!(%date, source = %source.name, leads = n, "Lead burst");
                n
            }
            Some(_) => 0,
            None => sample_count(source.volume.daily_mean(), rng),
        }
    }

    #[instrument(skip(self), fields(seed = self.seed, start = %self.window.start(), end = %self.window.end()))]
    pub fn generate(&self) -> Vec<Lead> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut leads = Vec::new();
        let mut next_id = 1u32;

        for date in self.window.days() {
            for source in &self.profiles.sources {
                for _ in 0..Self::daily_volume(source, date, &mut rng) {
                    leads.push(self.draw_lead(LeadId(next_id), source, date, &mut rng));
                    next_id += 1;
                }
            }
        }

        info!(leads = leads.len(), "Marketing lead generation finished");
        leads
    }

    fn draw_lead<R: Rng + ?Sized>(
        &self,
        lead_id: LeadId,
        source: &LeadSourceProfile,
        lead_date: NaiveDate,
        rng: &mut R,
    ) -> Lead {
        let (first_name, last_name, company, industry) = draw_contact(&self.profiles.contacts, rng);

        let deal_value = (f64::from(source.avg_deal) * rng.random_range(DEAL_SPREAD)).floor() as u32;
        let rep = &self.profiles.reps[self.reps.pick(deal_value, rng)];
        let conversion = conversion_probability(source, rep);

        let days_in_pipeline = self.window.days_until_end(lead_date);
        let stage = self.stages.pick(days_in_pipeline, conversion, rng);

        let contact_date = lead_date + Duration::days(rng.random_range(CONTACT_DELAY_DAYS));
        let close_date = stage
            .is_closed()
            .then(|| lead_date + Duration::days(rng.random_range(CLOSE_DELAY_DAYS)));

        Lead {
            lead_id,
            email: contact_email(&first_name, &last_name, &company),
            first_name,
            last_name,
            company,
            industry,
            lead_date,
            contact_date,
            close_date,
            source: source.name.clone(),
            stage,
            deal_value,
            sales_rep: rep.name.clone(),
            days_in_pipeline,
            cost_per_lead: source.cost_per_lead,
        }
    }
}

/// Draws `(first name, last name, company, industry)` from the pools.
fn draw_contact<R: Rng + ?Sized>(pools: &ContactPools, rng: &mut R) -> (String, String, String, String) {
    let pick = |pool: &[String], rng: &mut R| pool.choose(rng).cloned().unwrap_or_default();
    let first = pick(&pools.first_names, rng);
    let last = pick(&pools.last_names, rng);
    let base = pick(&pools.companies, rng);
    let suffix = pick(&pools.company_suffixes, rng);
    let industry = pick(&pools.industries, rng);
    (first, last, format!("{base} {suffix}"), industry)
}
