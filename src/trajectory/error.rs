//! Error type shared by the trajectory core

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrajectoryError {
    /// Search year lies outside the catalog's year span
    #[error("no data for year {year}: catalog covers {min}..={max}")]
    OutOfRange { year: f64, min: i32, max: i32 },
    /// User supplied text or index that cannot be used
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Optional resource (config, theme) was not found on disk
    #[error("missing asset: {}", .0.display())]
    MissingAsset(PathBuf),
    /// Dataset row that failed to parse; dropped by the loader
    #[error("malformed row {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
    /// No milestones or samples to answer a positional query
    #[error("catalog is empty")]
    EmptyCatalog,
}

pub type Result<T> = std::result::Result<T, TrajectoryError>;
