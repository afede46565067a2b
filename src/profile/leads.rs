use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::{BizsimResult, ConfigError};

/// Daily lead volume bucket of a marketing source.
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
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeadVolume {
    High,
    Medium,
    Low,
}

impl LeadVolume {
    /// Mean of the daily Poisson lead count.
    pub fn daily_mean(&self) -> f64 {
        match self {
            Self::High => 3.0,
            Self::Medium => 2.0,
            Self::Low => 1.0,
        }
    }
}

/// Event-driven lead generation: a burst of leads on the first days of
/// selected months and nothing otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurstSchedule {
    pub months: Vec<u32>,
    /// Bursts happen on day-of-month `1..=last_day`.
    pub last_day: u32,
    pub min_leads: u32,
    pub max_leads: u32,
}

impl BurstSchedule {
    pub fn is_active(&self, date: NaiveDate) -> bool {
        self.months.contains(&date.month()) && date.day() <= self.last_day
    }
}

impl Default for BurstSchedule {
    fn default() -> Self {
        Self {
            months: vec![8, 11],
            last_day: 5,
            min_leads: 8,
            max_leads: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadSourceProfile {
    pub name: String,
    pub volume: LeadVolume,
    /// Base probability that a lead from this source converts.
    pub quality: f64,
    pub avg_deal: u32,
    pub cost_per_lead: u32,
    /// Replaces the Poisson volume with scheduled bursts when set.
    pub burst: Option<BurstSchedule>,
}

impl LeadSourceProfile {
    pub fn new(name: &str, volume: LeadVolume, quality: f64, avg_deal: u32, cost_per_lead: u32) -> Self {
        Self {
            name: name.to_string(),
            volume,
            quality,
            avg_deal,
            cost_per_lead,
            burst: None,
        }
    }

    pub fn with_burst(self, burst: BurstSchedule) -> Self {
        Self {
            burst: Some(burst),
            ..self
        }
    }
}

/// Deal segment a sales rep is strongest in.
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
    EnumIter,
    IntoStaticStr,
)]
pub enum RepSpecialty {
    Enterprise,
    #[strum(serialize = "Mid-Market")]
    #[serde(rename = "Mid-Market")]
    MidMarket,
    #[strum(serialize = "SMB")]
    #[serde(rename = "SMB")]
    Smb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRepProfile {
    pub name: String,
    pub skill: f64,
    pub specialty: RepSpecialty,
    /// Additive adjustment to the source's conversion quality.
    pub close_rate_bonus: f64,
}

impl SalesRepProfile {
    pub fn new(name: &str, skill: f64, specialty: RepSpecialty, close_rate_bonus: f64) -> Self {
        Self {
            name: name.to_string(),
            skill,
            specialty,
            close_rate_bonus,
        }
    }
}

/// Name pools used to fabricate contact identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPools {
    pub first_names: Vec<String>,
    pub last_names: Vec<String>,
    pub companies: Vec<String>,
    pub company_suffixes: Vec<String>,
    pub industries: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ContactPools {
    fn default() -> Self {
        Self {
            first_names: owned(&[
                "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda",
                "William", "Elizabeth", "David", "Susan", "Richard", "Jessica", "Joseph", "Sarah",
                "Thomas", "Karen", "Christopher", "Nancy", "Daniel", "Lisa", "Matthew", "Betty",
            ]),
            last_names: owned(&[
                "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
                "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson",
                "Thomas", "Taylor", "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson",
                "White",
            ]),
            companies: owned(&[
                "Acme Corp",
                "TechStart Inc",
                "Global Solutions",
                "InnovateCo",
                "DataDrive LLC",
                "CloudFirst",
                "Quantum Systems",
                "NexGen Industries",
                "PrimeLogic",
                "VelocityTech",
                "Summit Partners",
                "Horizon Group",
                "Atlas Enterprises",
                "Forge Digital",
                "Spark Ventures",
                "ClearPath Analytics",
                "BlueWave Solutions",
                "RedRock Systems",
                "GreenField Tech",
                "SilverLine Corp",
                "Northern Dynamics",
                "Pacific Digital",
                "Central Hub Inc",
                "Eastern Networks",
                "Western Systems",
            ]),
            company_suffixes: owned(&["Inc", "LLC", "Corp", "Group"]),
            industries: owned(&[
                "Technology",
                "Healthcare",
                "Finance",
                "Manufacturing",
                "Retail",
                "Education",
                "Services",
            ]),
        }
    }
}

/// Sources, reps and contact pools of the lead simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadProfiles {
    pub sources: Vec<LeadSourceProfile>,
    pub reps: Vec<SalesRepProfile>,
    pub contacts: ContactPools,
}

impl LeadProfiles {
    pub fn validate(&self) -> BizsimResult<()> {
        if self.sources.is_empty() {
            return Err(ConfigError::EmptyProfileTable("lead sources").into());
        }
        if self.reps.is_empty() {
            return Err(ConfigError::EmptyProfileTable("sales reps").into());
        }
        let pools = [
            ("first names", &self.contacts.first_names),
            ("last names", &self.contacts.last_names),
            ("companies", &self.contacts.companies),
            ("company suffixes", &self.contacts.company_suffixes),
            ("industries", &self.contacts.industries),
        ];
        if let Some((name, _)) = pools.iter().find(|(_, pool)| pool.is_empty()) {
            return Err(ConfigError::EmptyProfileTable(name).into());
        }
        for rep in &self.reps {
            if !(rep.skill.is_finite() && rep.skill > 0.0) {
                return Err(ConfigError::InvalidWeight {
                    name: rep.name.clone(),
                    weight: rep.skill,
                }
                .into());
            }
        }
        for source in &self.sources {
            let inverted = source
                .burst
                .as_ref()
                .is_some_and(|b| b.min_leads > b.max_leads);
            if inverted {
                return Err(ConfigError::InvalidWeight {
                    name: source.name.clone(),
                    weight: f64::NAN,
                }
                .into());
            }
        }
        Ok(())
    }
}

impl Default for LeadProfiles {
    fn default() -> Self {
        use LeadVolume::{High, Low, Medium};
        use RepSpecialty::{Enterprise, MidMarket, Smb};

        let s = LeadSourceProfile::new;
        let sources = vec![
            s("Google Ads", High, 0.15, 25_000, 150),
            s("Facebook Ads", High, 0.12, 18_000, 80),
            s("LinkedIn", Medium, 0.25, 45_000, 200),
            s("Referral", Low, 0.45, 55_000, 50),
            s("Organic Search", Medium, 0.20, 30_000, 0),
            s("Email Campaign", Medium, 0.18, 22_000, 25),
            s("Trade Show", Low, 0.35, 75_000, 500).with_burst(BurstSchedule::default()),
            s("Cold Outreach", Medium, 0.08, 15_000, 100),
        ];

        let r = SalesRepProfile::new;
        let reps = vec![
            r("Eva Martinez", 1.3, Enterprise, 0.15),
            r("James Wilson", 1.1, MidMarket, 0.05),
            r("Sarah Chen", 1.0, Smb, 0.0),
            r("Michael Brown", 0.95, MidMarket, -0.03),
            r("David Kim", 0.75, Smb, -0.10),
        ];

        Self {
            sources,
            reps,
            contacts: ContactPools::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_validate() {
        let profiles = LeadProfiles::default();
        profiles.validate().unwrap();
        assert_eq!(profiles.sources.len(), 8);
        assert_eq!(profiles.reps.len(), 5);
        assert_eq!(profiles.contacts.first_names.len(), 24);
        assert_eq!(profiles.contacts.companies.len(), 25);
    }

    #[test]
    fn only_trade_show_bursts() {
        let profiles = LeadProfiles::default();
        let bursting: Vec<_> = profiles
            .sources
            .iter()
            .filter(|s| s.burst.is_some())
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(bursting, vec!["Trade Show"]);
    }

    #[test]
    fn burst_window_covers_first_five_days_of_aug_and_nov() {
        let burst = BurstSchedule::default();
        let d = |m, d| NaiveDate::from_ymd_opt(2024, m, d).unwrap();
        assert!(burst.is_active(d(8, 1)));
        assert!(burst.is_active(d(11, 5)));
        assert!(!burst.is_active(d(11, 6)));
        assert!(!burst.is_active(d(9, 1)));
    }

    #[test]
    fn rep_specialty_labels() {
        assert_eq!(RepSpecialty::MidMarket.to_string(), "Mid-Market");
        assert_eq!(RepSpecialty::Smb.to_string(), "SMB");
        assert_eq!(RepSpecialty::Enterprise.to_string(), "Enterprise");
    }

    #[test]
    fn validate_rejects_empty_pools() {
        let mut profiles = LeadProfiles::default();
        profiles.contacts.industries.clear();
        let err = profiles.validate().unwrap_err();
        assert!(err.to_string().contains("industries"));
    }
}
