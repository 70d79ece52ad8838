//! Workflows over the remote array store.
//!
//! - [`WorkflowOrchestrator`] runs the save and sort chains for a candidate
//!   array and guards them with its saving/sorting latches.
//! - [`CollectionBrowser`] pages through stored arrays or looks one up by id,
//!   ignoring results for superseded queries.
//! - [`EditSession`] edits one stored array and dispatches save, sort, and
//!   delete for it.
//! - [`ResultStore`] holds the latest sort outcome for the session.
//!
//! Each dispatched action ends with exactly one [`Status`] sent to the
//! orchestrator's [`StatusReporter`].

pub mod browser;
pub mod edit;
pub mod error;
pub mod status;
pub mod store;
pub mod workflow;

pub use browser::{BrowseState, CollectionBrowser, FetchTicket, PageControls, Query};
pub use edit::EditSession;
pub use error::{BUSY_MESSAGE, ChainStep, Result, WorkflowError};
pub use status::{LogReporter, RecordingReporter, Status, StatusReporter};
pub use store::ResultStore;
pub use workflow::{
    DELETED_MESSAGE, SAVED_AND_SORTED_MESSAGE, SAVED_MESSAGE, SortReport, UPDATED_AND_SORTED_MESSAGE,
    UPDATED_MESSAGE, WorkflowOrchestrator,
};
