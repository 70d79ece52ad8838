//! Data model for stored integer arrays.
//!
//! These types mirror the JSON shapes exchanged with the remote array store
//! and are shared by the ingestion, client, and workflow crates.

pub mod error;
pub mod ids;
pub mod outcome;
pub mod page;
pub mod record;
pub mod wire;

pub use error::{ModelError, Result};
pub use ids::ArrayId;
pub use outcome::SortOutcome;
pub use page::{PAGE_SIZE, Page};
pub use record::{ArrayRecord, PREVIEW_LEN, Timestamp};
pub use wire::{CreateArrayRequest, ListResponse, SortRequest, UpdateArrayRequest};
