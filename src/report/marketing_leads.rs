use std::sync::Arc;

use itertools::izip;
use polars::{
    frame::DataFrame,
    prelude::{
        DataType, Expr, Field, IntoLazy, PlSmallStr, Schema, SchemaRef, SortMultipleOptions, col,
        len, lit,
    },
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{
    error::{BizsimError, BizsimResult, DataError},
    record::{Lead, lead::LeadSoA},
    report::{
        io::{Report, ReportName, ToSchema, conform_to_schema},
        polars_ext::{DataFrameExt, ExprExt, labelled_f64, polars_to_bizsim_error},
    },
    sim::funnel::Stage,
};

/// Columns of the marketing leads table, in file order.
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
    PartialOrd,
    Ord,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum LeadCol {
    // === Identity ===
    LeadId,
    FirstName,
    LastName,
    FullName,
    Email,
    Company,
    Industry,

    // === Timeline ===
    LeadDate,
    ContactDate,
    /// Null unless the lead is closed.
    CloseDate,

    // === Funnel ===
    Source,
    Stage,
    DealValue,
    /// Win probability of the stage.
    Probability,
    /// `deal_value * probability`.
    ExpectedValue,
    SalesRep,
    LeadMonth,
    /// Days from lead creation to the end of the window.
    DaysInPipeline,
    CostPerLead,
}

impl From<LeadCol> for PlSmallStr {
    fn from(value: LeadCol) -> Self {
        value.as_str().into()
    }
}

impl LeadCol {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Won/lost tally of one lead source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConversion {
    pub source: String,
    pub leads: u32,
    pub won: u32,
    pub lost: u32,
    /// `won / (won + lost)`, zero while nothing is closed.
    pub conversion_rate: f64,
}

/// Marketing leads table.
#[derive(Debug, Clone)]
pub struct MarketingLeads {
    df: DataFrame,
}

impl MarketingLeads {
    pub const BASE_NAME: &'static str = "marketing_leads";

    pub fn from_records(records: &[Lead]) -> BizsimResult<Self> {
        let soa: LeadSoA = records.iter().collect();
        Self::try_from(DataFrame::try_from(soa)?)
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Earliest and latest lead date, `None` for an empty table.
    pub fn date_range(&self) -> BizsimResult<Option<(String, String)>> {
        let dates = self.df.str_col(LeadCol::LeadDate.as_str())?;
        let min = dates.into_no_null_iter().min();
        let max = dates.into_no_null_iter().max();
        Ok(min.zip(max).map(|(a, b)| (a.to_string(), b.to_string())))
    }

    pub fn unique_sorted(&self, column: LeadCol) -> BizsimResult<Vec<String>> {
        let values = self.df.str_col(column.as_str())?;
        let mut out: Vec<String> = values.into_no_null_iter().map(str::to_string).collect();
        out.sort_unstable();
        out.dedup();
        Ok(out)
    }

    /// Sum of all deal values.
    pub fn total_pipeline(&self) -> BizsimResult<f64> {
        Ok(self
            .df
            .u32_col(LeadCol::DealValue.as_str())?
            .into_no_null_iter()
            .map(f64::from)
            .sum())
    }

    /// Sum of expected values over leads that are still open.
    pub fn active_pipeline_value(&self) -> BizsimResult<f64> {
        let stages = self.df.str_col(LeadCol::Stage.as_str())?;
        let expected = self.df.f64_col(LeadCol::ExpectedValue.as_str())?;
        Ok(stages
            .into_no_null_iter()
            .zip(expected.into_no_null_iter())
            .filter(|(stage, _)| !is_closed_label(stage))
            .map(|(_, ev)| ev)
            .sum())
    }

    /// Per-source won/lost tally, best converting source first.
    pub fn source_conversion(&self) -> BizsimResult<Vec<SourceConversion>> {
        let source = LeadCol::Source.as_str();
        let stage = LeadCol::Stage.as_str();

        let df = self
            .df
            .clone()
            .lazy()
            .group_by([col(source)])
            .agg([
                len().cast(DataType::UInt32).alias("leads"),
                col(stage)
                    .eq(lit(Stage::ClosedWon.as_str()))
                    .sum()
                    .cast(DataType::UInt32)
                    .alias("won"),
                col(stage)
                    .eq(lit(Stage::ClosedLost.as_str()))
                    .sum()
                    .cast(DataType::UInt32)
                    .alias("lost"),
            ])
            .with_column(
                col("won")
                    .cast(DataType::Float64)
                    .safe_div(
                        (col("won") + col("lost")).cast(DataType::Float64),
                        0.0,
                    )
                    .alias("conversion_rate"),
            )
            .sort(
                ["conversion_rate", source],
                SortMultipleOptions::default()
                    .with_order_descending_multi([true, false])
                    .with_maintain_order(true),
            )
            .collect()
            .map_err(|e| polars_to_bizsim_error("source conversion", e))?;

        let sources = df.str_col(source)?;
        let leads = df.u32_col("leads")?;
        let won = df.u32_col("won")?;
        let lost = df.u32_col("lost")?;
        let rate = df.f64_col("conversion_rate")?;

        let mut out = Vec::with_capacity(df.height());
        for (s, n, w, l, r) in izip!(
            sources.into_iter(),
            leads.into_iter(),
            won.into_iter(),
            lost.into_iter(),
            rate.into_iter()
        ) {
            out.push(SourceConversion {
                source: s
                    .ok_or_else(|| DataError::UnexpectedNull(source.to_string()))?
                    .to_string(),
                leads: n.unwrap_or(0),
                won: w.unwrap_or(0),
                lost: l.unwrap_or(0),
                conversion_rate: r.unwrap_or(0.0),
            });
        }
        Ok(out)
    }

    /// Closed-won deal value per rep, highest first.
    pub fn won_value_by_rep(&self) -> BizsimResult<Vec<(String, f64)>> {
        let value = col(LeadCol::DealValue.as_str()).cast(DataType::Float64).sum();
        let df = self.by_rep_for(Stage::ClosedWon, value)?;
        labelled_f64(&df, LeadCol::SalesRep.as_str(), "value")
    }

    /// Number of closed-lost leads per rep, most first.
    pub fn lost_deals_by_rep(&self) -> BizsimResult<Vec<(String, u32)>> {
        let rep = LeadCol::SalesRep.as_str();
        let df = self.by_rep_for(Stage::ClosedLost, len().cast(DataType::UInt32))?;

        let reps = df.str_col(rep)?;
        let counts = df.u32_col("value")?;
        izip!(reps.into_iter(), counts.into_iter())
            .map(|(r, n)| match (r, n) {
                (Some(r), Some(n)) => Ok((r.to_string(), n)),
                _ => Err(DataError::UnexpectedNull(rep.to_string()).into()),
            })
            .collect()
    }

    /// Aggregates `agg` per rep over the leads in `stage`, sorted by the
    /// aggregate (descending) and then by rep name.
    fn by_rep_for(&self, stage: Stage, agg: Expr) -> BizsimResult<DataFrame> {
        let rep = LeadCol::SalesRep.as_str();
        self.df
            .clone()
            .lazy()
            .filter(col(LeadCol::Stage.as_str()).eq(lit(stage.as_str())))
            .group_by([col(rep)])
            .agg([agg.alias("value")])
            .sort(
                ["value", rep],
                SortMultipleOptions::default()
                    .with_order_descending_multi([true, false])
                    .with_maintain_order(true),
            )
            .collect()
            .map_err(|e| polars_to_bizsim_error("rep breakdown", e))
    }
}

fn is_closed_label(stage: &str) -> bool {
    stage == Stage::ClosedWon.as_str() || stage == Stage::ClosedLost.as_str()
}

impl TryFrom<DataFrame> for MarketingLeads {
    type Error = BizsimError;

    fn try_from(df: DataFrame) -> BizsimResult<Self> {
        let df = conform_to_schema(df, &Self::to_schema())?;
        Ok(Self { df })
    }
}

impl ReportName for MarketingLeads {
    fn base_name(&self) -> String {
        Self::BASE_NAME.to_string()
    }
}

impl Report for MarketingLeads {
    fn as_df(&self) -> &DataFrame {
        &self.df
    }

    fn as_df_mut(&mut self) -> &mut DataFrame {
        &mut self.df
    }
}

impl ToSchema for MarketingLeads {
    fn to_schema() -> SchemaRef {
        let fields: Vec<Field> = LeadCol::iter()
            .map(|col| {
                let dtype = match col {
                    LeadCol::LeadId
                    | LeadCol::FirstName
                    | LeadCol::LastName
                    | LeadCol::FullName
                    | LeadCol::Email
                    | LeadCol::Company
                    | LeadCol::Industry
                    | LeadCol::LeadDate
                    | LeadCol::ContactDate
                    | LeadCol::CloseDate
                    | LeadCol::Source
                    | LeadCol::Stage
                    | LeadCol::SalesRep
                    | LeadCol::LeadMonth => DataType::String,

                    LeadCol::DealValue | LeadCol::CostPerLead => DataType::UInt32,

                    LeadCol::Probability | LeadCol::ExpectedValue => DataType::Float64,

                    LeadCol::DaysInPipeline => DataType::Int64,
                };
                Field::new(col.into(), dtype)
            })
            .collect();

        Arc::new(Schema::from_iter(fields))
    }
}
