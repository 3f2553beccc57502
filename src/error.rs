// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the input series
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: expected 3 columns (Date, MMI, Nifty), found {found}")]
    ColumnCount { line: u64, found: usize },

    #[error("line {line}: unparsable date '{value}'")]
    Date { line: u64, value: String },

    #[error("line {line}: invalid {column} value '{value}'")]
    Number {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("no data rows in {0}")]
    Empty(PathBuf),
}

/// Errors raised by the numeric pipeline
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("forward horizon {0}d was not computed")]
    MissingHorizon(usize),

    #[error("series is empty")]
    EmptySeries,

    #[error("cannot annualize: first and last dates coincide (0 elapsed days)")]
    ZeroElapsed,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Errors raised while rendering the chart
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("not enough points to draw {0}")]
    NotEnoughData(&'static str),

    #[error("failed to render chart: {0}")]
    Render(String),
}

/// Errors raised while assembling settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
