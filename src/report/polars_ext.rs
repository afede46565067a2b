use polars::prelude::{
    Column, DataFrame, Expr, Float64Chunked, Int64Chunked, JsonFormat, JsonWriter,
    SerWriter, StringChunked, UInt32Chunked, lit, when,
};
use serde_json::Value;

use crate::error::{BizsimError, BizsimResult, DataError, IoError};

pub(crate) fn polars_to_bizsim_error(what: &str, e: polars::error::PolarsError) -> BizsimError {
    BizsimError::Data(DataError::DataFrame(format!(
        "Error while processing {what}: {e}"
    )))
}

pub trait ExprExt {
    /// Divides two expressions, returning `fallback` where the denominator
    /// is zero.
    fn safe_div(self, other: Expr, fallback: f64) -> Expr;
}

impl ExprExt for Expr {
    fn safe_div(self, other: Expr, fallback: f64) -> Expr {
        when(other.clone().eq(lit(0.0)))
            .then(lit(fallback))
            .otherwise(self / other)
    }
}

/// Typed, error-mapped column access plus row-wise JSON export.
pub trait DataFrameExt {
    fn to_json_rows(&self) -> BizsimResult<Vec<serde_json::Map<String, Value>>>;

    fn str_col(&self, name: &str) -> BizsimResult<&StringChunked>;

    fn f64_col(&self, name: &str) -> BizsimResult<&Float64Chunked>;

    fn u32_col(&self, name: &str) -> BizsimResult<&UInt32Chunked>;

    fn i64_col(&self, name: &str) -> BizsimResult<&Int64Chunked>;
}

impl DataFrameExt for DataFrame {
    fn to_json_rows(&self) -> BizsimResult<Vec<serde_json::Map<String, Value>>> {
        let height = self.height();
        if height == 0 {
            return Ok(Vec::new());
        }

        let estimated_row_size = self.width() * (1 << 6);
        let mut buf = Vec::with_capacity(height * estimated_row_size);

        JsonWriter::new(&mut buf)
            .with_json_format(JsonFormat::Json)
            .finish(&mut self.clone())
            .map_err(|e| DataError::DataFrame(e.to_string()))?;

        let json_val: Value = serde_json::from_slice(&buf).map_err(IoError::Json)?;

        match json_val {
            Value::Array(rows) => Ok(rows
                .into_iter()
                .filter_map(|v| match v {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect()),
            _ => {
                Err(DataError::DataFrame("Polars JSON output was not an array".to_string()).into())
            }
        }
    }

    fn str_col(&self, name: &str) -> BizsimResult<&StringChunked> {
        column(self, name)?
            .str()
            .map_err(|e| polars_to_bizsim_error(name, e))
    }

    fn f64_col(&self, name: &str) -> BizsimResult<&Float64Chunked> {
        column(self, name)?
            .f64()
            .map_err(|e| polars_to_bizsim_error(name, e))
    }

    fn u32_col(&self, name: &str) -> BizsimResult<&UInt32Chunked> {
        column(self, name)?
            .u32()
            .map_err(|e| polars_to_bizsim_error(name, e))
    }

    fn i64_col(&self, name: &str) -> BizsimResult<&Int64Chunked> {
        column(self, name)?
            .i64()
            .map_err(|e| polars_to_bizsim_error(name, e))
    }
}

fn column<'a>(df: &'a DataFrame, name: &str) -> BizsimResult<&'a Column> {
    df.column(name)
        .map_err(|_| DataError::MissingColumn(name.to_string()).into())
}

/// Collects an `(label, value)` pair list out of two columns of an
/// aggregated frame.
pub(crate) fn labelled_f64(
    df: &DataFrame,
    label: &str,
    value: &str,
) -> BizsimResult<Vec<(String, f64)>> {
    let labels = df.str_col(label)?;
    let values = df.f64_col(value)?;
    labels
        .into_iter()
        .zip(values)
        .map(|(l, v)| match (l, v) {
            (Some(l), Some(v)) => Ok((l.to_string(), v)),
            _ => Err(DataError::UnexpectedNull(format!("{label}/{value}")).into()),
        })
        .collect()
}
