//! Error types for workflows.

use std::fmt;

use thiserror::Error;

use bucket_client::GatewayError;
use bucket_ingest::IngestError;
use bucket_model::ArrayId;

/// Shown when a dispatch arrives while another save or sort is running.
pub const BUSY_MESSAGE: &str = "Please wait for the current operation to finish.";

/// One remote call inside a workflow chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainStep {
    Create,
    Update,
    Sort,
    Delete,
}

impl fmt::Display for ChainStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Sort => "sort",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while running a workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The candidate was rejected locally; nothing was sent.
    #[error(transparent)]
    Validation(#[from] IngestError),

    /// Another save or sort from the same orchestrator is still in flight.
    #[error("another save or sort is still in progress")]
    Busy,

    /// An edit action was dispatched with no record open.
    #[error("no array is open for editing")]
    NothingOpen,

    /// A remote step failed. Later steps of the chain were skipped.
    #[error("{step} step failed: {source}")]
    Step {
        step: ChainStep,
        /// Record that stays persisted despite the failure, if any.
        persisted: Option<ArrayId>,
        source: GatewayError,
    },
}

impl WorkflowError {
    pub(crate) fn step(step: ChainStep, source: GatewayError) -> Self {
        Self::Step {
            step,
            persisted: None,
            source,
        }
    }

    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Busy => BUSY_MESSAGE.to_string(),
            Self::NothingOpen => "Select an array to edit first.".to_string(),
            Self::Step { source, .. } => source.user_message().to_string(),
        }
    }

    /// The chain step that failed, for remote failures.
    pub fn failed_step(&self) -> Option<ChainStep> {
        match self {
            Self::Step { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// The record left persisted by a partially completed chain.
    pub fn persisted(&self) -> Option<ArrayId> {
        match self {
            Self::Step { persisted, .. } => *persisted,
            _ => None,
        }
    }
}

/// Result type alias for workflows.
pub type Result<T> = std::result::Result<T, WorkflowError>;
