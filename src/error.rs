use std::path::PathBuf;

use thiserror::Error;

pub type BizsimResult<T> = Result<T, BizsimError>;

#[derive(Debug, Error)]
pub enum BizsimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl BizsimError {
    /// Returns `true` when the error stems from a prerequisite input file
    /// that has not been generated yet.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, Self::Io(IoError::MissingInput(_)))
    }
}

/// Errors raised while validating generator or layout configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid simulation window (start: {start}, end: {end}): {msg}")]
    InvalidWindow {
        start: String,
        end: String,
        msg: String,
    },

    #[error("Profile table '{0}' must not be empty")]
    EmptyProfileTable(&'static str),

    #[error("Invalid weight for '{name}': {weight}")]
    InvalidWeight { name: String, weight: f64 },

    #[error("Invalid stage thresholds: {0}")]
    InvalidThresholds(String),

    #[error("Failed to encode configuration")]
    Encoding(#[from] postcard::Error),
}

/// Errors related to tabular data, column access and parsing.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Data frame error: {0}")]
    DataFrame(String),

    #[error("Missing column: '{0}'")]
    MissingColumn(String),

    #[error("Unexpected null in column '{0}'")]
    UnexpectedNull(String),
}

/// Errors related to file I/O and serialization.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("IO operation failed")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed")]
    Json(#[from] serde_json::Error),

    #[error("Missing input file: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("Failed to write data: {0}")]
    WriteFailed(String),
}

/// Errors related to dashboard rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template placeholder '{0}' not found")]
    MissingPlaceholder(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_input_counts_as_missing_input() {
        let missing: BizsimError = IoError::MissingInput(PathBuf::from("data/retail_sales_cleaned.csv")).into();
        assert!(missing.is_missing_input());
        assert_eq!(
            missing.to_string(),
            "Missing input file: data/retail_sales_cleaned.csv"
        );

        let column: BizsimError = DataError::MissingColumn("stage".into()).into();
        assert!(!column.is_missing_input());
        assert_eq!(column.to_string(), "Missing column: 'stage'");

        let render: BizsimError = RenderError::MissingPlaceholder("__TITLE__").into();
        assert!(!render.is_missing_input());
    }
}
