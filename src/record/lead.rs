use std::{fmt, mem};

use chrono::NaiveDate;
use polars::{df, frame::DataFrame};
use serde::{Deserialize, Serialize};

use crate::{
    error::{BizsimError, BizsimResult},
    record::{DATE_FORMAT, MONTH_FORMAT},
    report::{marketing_leads::LeadCol, polars_ext::polars_to_bizsim_error},
    sim::funnel::Stage,
};

/// Sequential lead number, rendered as `LEAD00001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LeadId(pub u32);

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LEAD{:05}", self.0)
    }
}

/// A prospective customer as it stands at the end of the simulation window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub lead_id: LeadId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub industry: String,
    pub lead_date: NaiveDate,
    pub contact_date: NaiveDate,
    /// Present exactly when the stage is closed.
    pub close_date: Option<NaiveDate>,
    pub source: String,
    pub stage: Stage,
    pub deal_value: u32,
    pub sales_rep: String,
    pub days_in_pipeline: i64,
    pub cost_per_lead: u32,
}

impl Lead {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn probability(&self) -> f64 {
        self.stage.win_probability()
    }

    pub fn expected_value(&self) -> f64 {
        f64::from(self.deal_value) * self.probability()
    }

    pub fn lead_month(&self) -> String {
        self.lead_date.format(MONTH_FORMAT).to_string()
    }
}

/// Lower-cased `first.last@company.com`, keyed on the company's first word.
pub fn contact_email(first_name: &str, last_name: &str, company: &str) -> String {
    let domain = company.split_whitespace().next().unwrap_or(company);
    format!("{first_name}.{last_name}@{domain}.com").to_lowercase()
}

#[derive(Default, Debug)]
pub(crate) struct LeadSoA {
    lead_id: Vec<String>,
    first_name: Vec<String>,
    last_name: Vec<String>,
    full_name: Vec<String>,
    email: Vec<String>,
    company: Vec<String>,
    industry: Vec<String>,
    lead_date: Vec<String>,
    contact_date: Vec<String>,
    close_date: Vec<Option<String>>,
    source: Vec<String>,
    stage: Vec<String>,
    deal_value: Vec<u32>,
    probability: Vec<f64>,
    expected_value: Vec<f64>,
    sales_rep: Vec<String>,
    lead_month: Vec<String>,
    days_in_pipeline: Vec<i64>,
    cost_per_lead: Vec<u32>,
}

impl LeadSoA {
    fn push(&mut self, l: &Lead) {
        self.lead_id.push(l.lead_id.to_string());
        self.first_name.push(l.first_name.clone());
        self.last_name.push(l.last_name.clone());
        self.full_name.push(l.full_name());
        self.email.push(l.email.clone());
        self.company.push(l.company.clone());
        self.industry.push(l.industry.clone());
        self.lead_date.push(l.lead_date.format(DATE_FORMAT).to_string());
        self.contact_date
            .push(l.contact_date.format(DATE_FORMAT).to_string());
        self.close_date
            .push(l.close_date.map(|d| d.format(DATE_FORMAT).to_string()));
        self.source.push(l.source.clone());
        self.stage.push(l.stage.to_string());
        self.deal_value.push(l.deal_value);
        self.probability.push(l.probability());
        self.expected_value.push(l.expected_value());
        self.sales_rep.push(l.sales_rep.clone());
        self.lead_month.push(l.lead_month());
        self.days_in_pipeline.push(l.days_in_pipeline);
        self.cost_per_lead.push(l.cost_per_lead);
    }
}

impl<'a> FromIterator<&'a Lead> for LeadSoA {
    fn from_iter<I: IntoIterator<Item = &'a Lead>>(iter: I) -> Self {
        let mut soa = Self::default();
        iter.into_iter().for_each(|l| soa.push(l));
        soa
    }
}

impl TryFrom<LeadSoA> for DataFrame {
    type Error = BizsimError;

    fn try_from(mut soa: LeadSoA) -> BizsimResult<Self> {
        df![
            LeadCol::LeadId.as_str()         => mem::take(&mut soa.lead_id),
            LeadCol::FirstName.as_str()      => mem::take(&mut soa.first_name),
            LeadCol::LastName.as_str()       => mem::take(&mut soa.last_name),
            LeadCol::FullName.as_str()       => mem::take(&mut soa.full_name),
            LeadCol::Email.as_str()          => mem::take(&mut soa.email),
            LeadCol::Company.as_str()        => mem::take(&mut soa.company),
            LeadCol::Industry.as_str()       => mem::take(&mut soa.industry),
            LeadCol::LeadDate.as_str()       => mem::take(&mut soa.lead_date),
            LeadCol::ContactDate.as_str()    => mem::take(&mut soa.contact_date),
            LeadCol::CloseDate.as_str()      => mem::take(&mut soa.close_date),
            LeadCol::Source.as_str()         => mem::take(&mut soa.source),
            LeadCol::Stage.as_str()          => mem::take(&mut soa.stage),
            LeadCol::DealValue.as_str()      => mem::take(&mut soa.deal_value),
            LeadCol::Probability.as_str()    => mem::take(&mut soa.probability),
            LeadCol::ExpectedValue.as_str()  => mem::take(&mut soa.expected_value),
            LeadCol::SalesRep.as_str()       => mem::take(&mut soa.sales_rep),
            LeadCol::LeadMonth.as_str()      => mem::take(&mut soa.lead_month),
            LeadCol::DaysInPipeline.as_str() => mem::take(&mut soa.days_in_pipeline),
            LeadCol::CostPerLead.as_str()    => mem::take(&mut soa.cost_per_lead),
        ]
        .map_err(|e| polars_to_bizsim_error("marketing leads", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(stage: Stage) -> Lead {
        let d = NaiveDate::from_ymd_opt(2024, 8, 2).unwrap();
        Lead {
            lead_id: LeadId(42),
            first_name: "Mary".into(),
            last_name: "Lee".into(),
            email: contact_email("Mary", "Lee", "Acme Corp Inc"),
            company: "Acme Corp Inc".into(),
            industry: "Retail".into(),
            lead_date: d,
            contact_date: d + chrono::Duration::days(2),
            close_date: stage.is_closed().then(|| d + chrono::Duration::days(40)),
            source: "Trade Show".into(),
            stage,
            deal_value: 75_001,
            sales_rep: "Eva Martinez".into(),
            days_in_pipeline: 151,
            cost_per_lead: 500,
        }
    }

    #[test]
    fn derived_fields() {
        let l = lead(Stage::Negotiation);
        assert_eq!(l.lead_id.to_string(), "LEAD00042");
        assert_eq!(l.full_name(), "Mary Lee");
        assert_eq!(l.email, "mary.lee@acme.com");
        assert_eq!(l.lead_month(), "2024-08");
        assert_eq!(l.expected_value(), 75_001.0 * 0.75);
    }

    #[test]
    fn open_leads_serialize_null_close_date() {
        let records = [lead(Stage::Proposal), lead(Stage::ClosedWon)];
        let soa: LeadSoA = records.iter().collect();
        let df = DataFrame::try_from(soa).unwrap();
        let close = df.column("close_date").unwrap().str().unwrap();
        assert_eq!(close.get(0), None);
        assert_eq!(close.get(1), Some("2024-09-11"));
        assert_eq!(df.column("stage").unwrap().str().unwrap().get(1), Some("Closed Won"));
    }
}
