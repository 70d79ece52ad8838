//! Workflow status reporting.

use std::sync::{Mutex, PoisonError};

/// Final status of one dispatched action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

impl Status {
    pub fn message(&self) -> &str {
        match self {
            Self::Info(message) | Self::Error(message) => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Receives the one status each workflow action ends with.
pub trait StatusReporter: Send + Sync {
    fn report(&self, status: &Status);
}

/// Writes statuses to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl StatusReporter for LogReporter {
    fn report(&self, status: &Status) {
        match status {
            Status::Info(message) => tracing::info!("{}", message),
            Status::Error(message) => tracing::error!("{}", message),
        }
    }
}

/// Keeps every reported status, in order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    statuses: Mutex<Vec<Status>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statuses(&self) -> Vec<Status> {
        self.statuses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Status> {
        self.statuses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl StatusReporter for RecordingReporter {
    fn report(&self, status: &Status) {
        self.statuses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(status.clone());
    }
}
