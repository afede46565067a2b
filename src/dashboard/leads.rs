use strum::IntoEnumIterator;
use tracing::{info, instrument};

use crate::{
    dashboard::{Template, data_period, embed_json, options_html},
    error::BizsimResult,
    format::{money, percent, thousands},
    report::{
        io::{Report, ToJson},
        marketing_leads::{LeadCol, MarketingLeads},
        polars_ext::DataFrameExt,
    },
    sim::Stage,
};

const TEMPLATE: Template = Template::new(
    "lead-conversion",
    include_str!("../../templates/lead_dashboard.html"),
);

pub const LEAD_TITLE: &str = "Lead Conversion Dashboard | Marketing Analytics";

/// First-paint headline figures of the lead dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadKpis {
    pub leads: usize,
    /// Sum of all deal values.
    pub pipeline_value: f64,
    pub won: usize,
    pub lost: usize,
    pub won_value: f64,
    pub total_days_in_pipeline: i64,
}

impl LeadKpis {
    pub fn from_leads(leads: &MarketingLeads) -> BizsimResult<Self> {
        let df = leads.as_df();
        let stages = df.str_col(LeadCol::Stage.as_str())?;
        let deals = df.u32_col(LeadCol::DealValue.as_str())?;
        let days = df.i64_col(LeadCol::DaysInPipeline.as_str())?;

        let mut kpis = Self {
            leads: df.height(),
            pipeline_value: 0.0,
            won: 0,
            lost: 0,
            won_value: 0.0,
            total_days_in_pipeline: days.into_no_null_iter().sum(),
        };
        for (stage, deal) in stages.into_no_null_iter().zip(deals.into_no_null_iter()) {
            let deal = f64::from(deal);
            kpis.pipeline_value += deal;
            if stage == Stage::ClosedWon.as_str() {
                kpis.won += 1;
                kpis.won_value += deal;
            } else if stage == Stage::ClosedLost.as_str() {
                kpis.lost += 1;
            }
        }
        Ok(kpis)
    }

    /// Won share of closed leads, zero while nothing is closed.
    pub fn conversion_rate(&self) -> f64 {
        let closed = self.won + self.lost;
        if closed == 0 {
            0.0
        } else {
            self.won as f64 / closed as f64
        }
    }

    pub fn avg_days_in_pipeline(&self) -> f64 {
        self.total_days_in_pipeline as f64 / self.leads.max(1) as f64
    }

    pub fn avg_deal_size(&self) -> f64 {
        self.pipeline_value / self.leads.max(1) as f64
    }
}

/// Renders the lead conversion dashboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadDashboard;

impl LeadDashboard {
    #[instrument(skip_all, fields(rows = leads.height()))]
    pub fn render(leads: &MarketingLeads) -> BizsimResult<String> {
        let kpis = LeadKpis::from_leads(leads)?;

        let sources = leads.unique_sorted(LeadCol::Source)?;
        let reps = leads.unique_sorted(LeadCol::SalesRep)?;
        let industries = leads.unique_sorted(LeadCol::Industry)?;
        let months = leads.unique_sorted(LeadCol::LeadMonth)?;
        let present_stages = leads.unique_sorted(LeadCol::Stage)?;
        let stages: Vec<&'static str> = Stage::iter()
            .map(|s| s.as_str())
            .filter(|s| present_stages.iter().any(|p| p == s))
            .collect();

        let same = |values: &[String]| options_html(values.iter().map(|v| (v.as_str(), v.as_str())));

        let html = TEMPLATE.render(&[
            ("__TITLE__", LEAD_TITLE.to_string()),
            ("__DATA_PERIOD__", data_period(leads.date_range()?)),
            ("__SOURCE_OPTIONS__", same(&sources)),
            ("__STAGE_OPTIONS__", options_html(stages.iter().map(|s| (*s, *s)))),
            ("__REP_OPTIONS__", same(&reps)),
            ("__INDUSTRY_OPTIONS__", same(&industries)),
            ("__MONTH_OPTIONS__", same(&months)),
            ("__KPI_LEADS__", thousands(kpis.leads as u64)),
            ("__KPI_PIPELINE__", money(kpis.pipeline_value, 2)),
            ("__KPI_CONVERSION__", percent(kpis.conversion_rate(), 1)),
            ("__KPI_WON__", money(kpis.won_value, 2)),
            ("__KPI_DAYS__", format!("{:.0}", kpis.avg_days_in_pipeline())),
            ("__KPI_DEAL_SIZE__", money(kpis.avg_deal_size(), 2)),
            ("__RAW_DATA__", embed_json(&leads.to_json()?)?),
        ])?;

        info!(bytes = html.len(), template = TEMPLATE.name(), "Rendered dashboard");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::record::{Lead, LeadId};

    fn lead(id: u32, stage: Stage, deal_value: u32, days: i64) -> Lead {
        let lead_date = NaiveDate::from_ymd_opt(2024, 9, id).unwrap();
        Lead {
            lead_id: LeadId(id),
            first_name: "Ada".into(),
            last_name: "Smith".into(),
            email: "ada.smith@acme.com".into(),
            company: "Acme <Corp>".into(),
            industry: "Technology".into(),
            lead_date,
            contact_date: lead_date + chrono::Days::new(2),
            close_date: stage.is_closed().then(|| lead_date + chrono::Days::new(40)),
            source: "Webinar".into(),
            stage,
            deal_value,
            sales_rep: "Sarah Johnson".into(),
            days_in_pipeline: days,
            cost_per_lead: 40,
        }
    }

    fn table() -> MarketingLeads {
        MarketingLeads::from_records(&[
            lead(1, Stage::ClosedWon, 10_000, 90),
            lead(2, Stage::ClosedLost, 5_000, 80),
            lead(3, Stage::ClosedLost, 3_000, 70),
            lead(4, Stage::Proposal, 2_000, 20),
        ])
        .unwrap()
    }

    #[test]
    fn kpis() {
        let kpis = LeadKpis::from_leads(&table()).unwrap();
        assert_eq!(kpis.leads, 4);
        assert_eq!(kpis.pipeline_value, 20_000.0);
        assert_eq!(kpis.won_value, 10_000.0);
        assert!((kpis.conversion_rate() - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(kpis.avg_days_in_pipeline(), 65.0);
        assert_eq!(kpis.avg_deal_size(), 5_000.0);
    }

    #[test]
    fn conversion_is_zero_without_closed_leads() {
        let leads = MarketingLeads::from_records(&[lead(1, Stage::Lead, 1_000, 2)]).unwrap();
        assert_eq!(LeadKpis::from_leads(&leads).unwrap().conversion_rate(), 0.0);
    }

    #[test]
    fn renders_stage_options_in_funnel_order() {
        let html = LeadDashboard::render(&table()).unwrap();
        let proposal = html.find(r#"<option value="Proposal">"#).unwrap();
        let won = html.find(r#"<option value="Closed Won">"#).unwrap();
        let lost = html.find(r#"<option value="Closed Lost">"#).unwrap();
        assert!(proposal < won && won < lost);
        assert!(!html.contains(r#"<option value="Negotiation">"#));

        assert!(html.contains(r#"id="kpiConversion">33.3%</div>"#));
        assert!(html.contains(r#"id="kpiPipeline">$20,000.00</div>"#));
        assert!(html.contains(r#"id="kpiDays">65</div>"#));
        assert!(html.contains("2024-09-01 to 2024-09-04"));
        assert!(!html.contains("__"), "unfilled placeholder");
    }

    #[test]
    fn rendering_is_deterministic() {
        let t = table();
        assert_eq!(LeadDashboard::render(&t).unwrap(), LeadDashboard::render(&t).unwrap());
    }
}
