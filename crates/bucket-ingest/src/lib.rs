//! Acquisition of candidate integer arrays.
//!
//! This crate turns heterogeneous raw input into a validated integer
//! sequence ready to be stored and sorted.
//!
//! # Sources
//!
//! - **Manual**: one value per confirmed entry, normalized at submit time
//! - **Bulk manual**: a whitespace-separated line, normalized on every edit
//! - **Generated**: `count` uniform values drawn from `[min, max]`
//! - **Imported**: a `.txt` file with one integer per line
//! - **Remote selected**: a detached copy of a stored record
//!
//! # Example
//!
//! ```
//! use bucket_ingest::{AcquisitionMode, ArrayBuilder, SubmitAction};
//!
//! let mut builder = ArrayBuilder::new();
//! builder.select_mode(AcquisitionMode::BulkManual);
//! assert_eq!(builder.set_bulk_text("5 x -3").unwrap(), 3);
//! assert_eq!(builder.candidate(SubmitAction::Sort).unwrap(), vec![5, 0, -3]);
//! ```

mod builder;
mod error;
mod generate;
mod import;
mod normalize;

// === Error Types ===
pub use error::{IngestError, Result};

// === Normalization ===
pub use normalize::{RawSequence, Token, classify_token, normalize, render_tokens, tokenize};

// === File Import ===
pub use import::{IMPORT_EXTENSION, import_file, import_text, parse_imported_lines};

// === Generation ===
pub use generate::{GenerateParams, GenerateSpec, MAX_GENERATED, generate, generate_with};

// === Builder ===
pub use builder::{
    AcquisitionMode, AcquisitionState, ArrayBuilder, ImportStatus, Notice, SubmitAction,
};
