use serde::{Deserialize, Serialize};

/// Result of a remote sort call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortOutcome {
    pub data: Vec<i64>,
    /// Execution time exactly as reported by the store.
    pub execution_time: f64,
}

impl SortOutcome {
    pub fn new(data: Vec<i64>, execution_time: f64) -> Self {
        Self {
            data,
            execution_time,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
