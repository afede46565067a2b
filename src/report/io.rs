use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use polars::{
    frame::DataFrame,
    prelude::{
        CsvWriter, JsonFormat, JsonWriter, LazyCsvReader, LazyFileListReader, PlPath, SchemaRef,
        SerWriter,
    },
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    error::{BizsimError, BizsimResult, DataError, IoError},
    report::polars_ext::{DataFrameExt, polars_to_bizsim_error},
};

// ================================================================================================
// Traits
// ================================================================================================

/// Common interface of the tabular datasets.
pub trait Report {
    /// Access the underlying DataFrame (Immutable).
    fn as_df(&self) -> &DataFrame;

    /// Access the underlying DataFrame (Mutable).
    fn as_df_mut(&mut self) -> &mut DataFrame;
}

pub trait ReportName {
    fn base_name(&self) -> String;

    fn filename(&self, ext: FileExtension) -> String {
        report_filename(&self.base_name(), ext)
    }
}

pub trait ToSchema {
    /// Returns the canonical schema for this report type.
    fn to_schema() -> SchemaRef;
}

pub trait ToJson {
    /// Serializes the report to a generic JSON Value.
    /// Returns a `Value::Array` containing row objects.
    fn to_json(&self) -> BizsimResult<serde_json::Value>;
}

pub trait ToCsv {
    /// Writes the report as CSV (header row, canonical column order) into
    /// `dir` and returns the written path.
    ///
    /// Creates the directory if missing and overwrites an existing file.
    fn to_csv(&self, dir: impl AsRef<Path>) -> BizsimResult<PathBuf>;
}

pub trait ToJsonFile {
    /// Writes the report as a JSON array of row objects into `dir` and
    /// returns the written path.
    fn to_json_file(&self, dir: impl AsRef<Path>) -> BizsimResult<PathBuf>;
}

pub trait FromCsv: Sized {
    /// Loads a report previously written with [`ToCsv`].
    ///
    /// Fails with [`IoError::MissingInput`] when `path` does not exist.
    fn from_csv(path: impl AsRef<Path>) -> BizsimResult<Self>;
}

// ================================================================================================
// Blanket Implementations
// ================================================================================================

impl<T> ToJson for T
where
    T: Report,
{
    fn to_json(&self) -> BizsimResult<serde_json::Value> {
        let rows = self.as_df().to_json_rows()?;
        Ok(Value::Array(rows.into_iter().map(Value::Object).collect()))
    }
}

impl<T> ToCsv for T
where
    T: Report + ReportName,
{
    fn to_csv(&self, dir: impl AsRef<Path>) -> BizsimResult<PathBuf> {
        let file_path = create_target(dir.as_ref(), &self.filename(FileExtension::Csv))?;
        let mut file = File::create(&file_path).map_err(IoError::Io)?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut self.as_df().clone())
            .map_err(|e| {
                IoError::WriteFailed(format!("CSV to '{}': {e}", file_path.display()))
            })?;

        Ok(file_path)
    }
}

impl<T> ToJsonFile for T
where
    T: Report + ReportName,
{
    fn to_json_file(&self, dir: impl AsRef<Path>) -> BizsimResult<PathBuf> {
        let file_path = create_target(dir.as_ref(), &self.filename(FileExtension::Json))?;
        let mut file = File::create(&file_path).map_err(IoError::Io)?;

        JsonWriter::new(&mut file)
            .with_json_format(JsonFormat::Json)
            .finish(&mut self.as_df().clone())
            .map_err(|e| {
                IoError::WriteFailed(format!("JSON to '{}': {e}", file_path.display()))
            })?;

        Ok(file_path)
    }
}

impl<T> FromCsv for T
where
    T: ToSchema + TryFrom<DataFrame, Error = BizsimError>,
{
    fn from_csv(path: impl AsRef<Path>) -> BizsimResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(IoError::MissingInput(path.to_path_buf()).into());
        }

        let uri = path.to_str().ok_or_else(|| {
            IoError::FileSystem(format!(
                "Path contains invalid UTF-8 characters: {}",
                path.display()
            ))
        })?;

        let df = LazyCsvReader::new(PlPath::new(uri))
            .with_has_header(true)
            .with_schema(Some(T::to_schema()))
            .finish()
            .and_then(|lf| lf.collect())
            .map_err(|e| polars_to_bizsim_error(&format!("'{}'", path.display()), e))?;

        T::try_from(df)
    }
}

// ================================================================================================
// Helpers
// ================================================================================================

/// File name of a dataset export.
///
/// CSV exports carry a `_cleaned` suffix; they are the renderer's inputs.
pub fn report_filename(base_name: &str, ext: FileExtension) -> String {
    match ext {
        FileExtension::Csv => format!("{base_name}_cleaned.{ext}"),
        FileExtension::Json => format!("{base_name}.{ext}"),
    }
}

fn create_target(dir: &Path, filename: &str) -> BizsimResult<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| {
            IoError::FileSystem(format!(
                "Failed to create directory {}: {}",
                dir.display(),
                e
            ))
        })?;
    }
    Ok(dir.join(filename))
}

/// Selects the schema's columns in canonical order, casting each to its
/// canonical type.
pub(crate) fn conform_to_schema(df: DataFrame, schema: &SchemaRef) -> BizsimResult<DataFrame> {
    let mut columns = Vec::with_capacity(schema.len());
    for (name, dtype) in schema.iter() {
        let column = df
            .column(name.as_str())
            .map_err(|_| DataError::MissingColumn(name.to_string()))?;
        let column = column
            .cast(dtype)
            .map_err(|e| polars_to_bizsim_error(name.as_str(), e))?;
        columns.push(column);
    }
    DataFrame::new(columns).map_err(|e| polars_to_bizsim_error("conformed frame", e))
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum FileExtension {
    Csv,
    Json,
}
