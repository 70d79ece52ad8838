//! Error types for array acquisition.
//!
//! Every variant is a local validation failure: it blocks the requested
//! action and is shown to the user verbatim, so the display strings are the
//! user-facing messages.

use std::path::PathBuf;
use thiserror::Error;

use crate::builder::AcquisitionMode;

/// Errors that can occur while building a candidate array.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Generation Errors ===
    /// Count or a range bound is not an integer.
    #[error("Count and range bounds must be integers.")]
    NotAnInteger,

    /// Requested count is zero or negative.
    #[error("Count must be greater than 0.")]
    CountTooSmall { count: i64 },

    /// Requested count reaches the generation cap.
    #[error("Generation is limited to 3 million elements.")]
    CountTooLarge { count: i64 },

    /// Range is empty or a single value.
    #[error("Maximum must be greater than minimum.")]
    EmptyRange { min: i64, max: i64 },

    // === Import Errors ===
    /// File does not carry the import extension.
    #[error("Invalid file format. Expected a file with the .txt extension.")]
    UnsupportedFormat { name: String },

    /// File could not be read.
    #[error("An error occurred while reading the file.")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No line of the file holds an integer.
    #[error("The file contains no valid data.")]
    NoValidData { name: String },

    // === Submit Errors ===
    /// Nothing to submit.
    #[error("The array is empty.")]
    EmptyCandidate,

    /// A selected remote array needs at least two elements to be worth storing.
    #[error("Select an array with at least two elements.")]
    SelectionTooShort { len: usize },

    /// Sort requested while the imported file is invalid.
    #[error("Load a valid .txt file before sorting.")]
    InvalidImport,

    // === State Machine Errors ===
    /// Operation belongs to another acquisition mode.
    #[error("This action is not available in {actual} mode.")]
    WrongMode {
        expected: AcquisitionMode,
        actual: AcquisitionMode,
    },
}

/// Result type for acquisition operations.
pub type Result<T> = std::result::Result<T, IngestError>;
