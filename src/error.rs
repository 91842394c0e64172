// src/error.rs

//! Error types for the periodic table viewer

use thiserror::Error;

/// Main error type for dataset, trend, preference and export operations
#[derive(Error, Debug)]
pub enum PtError {
    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writer failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The dataset parsed but contained no elements
    #[error("Dataset contains no elements")]
    EmptyDataset,

    /// A record in the dataset violates the element invariants
    #[error("Invalid element {atomic_number}: {reason}")]
    InvalidElement { atomic_number: u32, reason: String },

    /// Trend key outside the fixed enumeration
    #[error("Unknown trend: {0}")]
    UnknownTrend(String),

    /// No element carries a value for the selected trend property
    #[error("No data available for trend: {0}")]
    NoTrendData(&'static str),

    /// Lookup by atomic number failed
    #[error("Element not found: {0}")]
    ElementNotFound(u32),

    /// Resource could not be fetched and has no cached copy
    #[error("Resource unavailable offline: {0}")]
    Offline(String),

    /// Export could not be produced
    #[error("Export error: {0}")]
    Export(String),

    /// Cairo / plotters drawing failure
    #[error("Render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, PtError>;

impl From<cairo::Error> for PtError {
    fn from(e: cairo::Error) -> Self {
        PtError::Render(e.to_string())
    }
}

impl From<cairo::IoError> for PtError {
    fn from(e: cairo::IoError) -> Self {
        PtError::Render(e.to_string())
    }
}
