//! In-process array store.
//!
//! Behaves like the remote store (ids assigned on create, pages of
//! [`PAGE_SIZE`], in-place sorting) and additionally records every call and
//! can be told to fail chosen operations.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;

use bucket_model::{ArrayId, ArrayRecord, PAGE_SIZE, Page, SortOutcome, Timestamp};

use crate::error::{GatewayError, Result};
use crate::gateway::RemoteArrayGateway;

/// Kind of gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Read,
    Create,
    Update,
    Delete,
    Sort,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::List => "list",
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Sort => "sort",
        };
        f.write_str(name)
    }
}

/// One recorded call, with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    List { page: u32 },
    Read { id: ArrayId },
    Create { data: Vec<i64> },
    Update {
        id: ArrayId,
        data: Vec<i64>,
        is_sorted: bool,
    },
    Delete { id: ArrayId },
    Sort { id: ArrayId },
}

impl GatewayCall {
    pub fn operation(&self) -> Operation {
        match self {
            Self::List { .. } => Operation::List,
            Self::Read { .. } => Operation::Read,
            Self::Create { .. } => Operation::Create,
            Self::Update { .. } => Operation::Update,
            Self::Delete { .. } => Operation::Delete,
            Self::Sort { .. } => Operation::Sort,
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    records: BTreeMap<ArrayId, ArrayRecord>,
    last_id: u64,
    calls: Vec<GatewayCall>,
    failing: HashSet<Operation>,
    latency: Option<Duration>,
}

/// Array store kept in memory.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `data` directly, without recording a call.
    pub fn seed(&self, data: Vec<i64>) -> ArrayRecord {
        let mut state = self.lock();
        state.last_id += 1;
        let id = ArrayId::new(state.last_id);
        let record = new_record(id, data);
        state.records.insert(id, record.clone());
        record
    }

    /// Store a record under its own id, without recording a call.
    pub fn insert(&self, record: ArrayRecord) {
        let mut state = self.lock();
        state.last_id = state.last_id.max(record.id.get());
        state.records.insert(record.id, record);
    }

    /// Snapshot of a stored record.
    pub fn get(&self, id: ArrayId) -> Option<ArrayRecord> {
        self.lock().records.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every future `operation` call fail with a server error.
    pub fn fail(&self, operation: Operation) {
        self.lock().failing.insert(operation);
    }

    /// Undo [`fail`](Self::fail).
    pub fn recover(&self, operation: Operation) {
        self.lock().failing.remove(&operation);
    }

    /// Delay every call by `latency` before it takes effect.
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.lock().latency = latency;
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    /// Number of calls of `operation` so far.
    pub fn count(&self, operation: Operation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Log the call, wait out the latency, then apply any injected failure.
    async fn enter(&self, call: GatewayCall) -> Result<()> {
        let operation = call.operation();
        let latency = {
            let mut state = self.lock();
            state.calls.push(call);
            state.latency
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.lock().failing.contains(&operation) {
            return Err(GatewayError::Status {
                status: 503,
                url: format!("memory://{operation}"),
                body: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

fn new_record(id: ArrayId, data: Vec<i64>) -> ArrayRecord {
    let now = Timestamp::from_datetime(Utc::now());
    ArrayRecord {
        id,
        data,
        is_sorted: false,
        created_at: now.clone(),
        updated_at: now,
    }
}

#[async_trait]
impl RemoteArrayGateway for MemoryGateway {
    async fn list(&self, page: u32) -> Result<Page> {
        self.enter(GatewayCall::List { page }).await?;
        if page == 0 {
            return Err(GatewayError::InvalidRequest(
                "page numbers start at 1".to_string(),
            ));
        }
        let state = self.lock();
        let skip = (page as usize - 1) * PAGE_SIZE;
        let items = state
            .records
            .values()
            .skip(skip)
            .take(PAGE_SIZE)
            .cloned()
            .collect();
        Page::listing(items, state.records.len() as u64, page)
            .map_err(|e| GatewayError::InvalidRequest(e.to_string()))
    }

    async fn read(&self, id: ArrayId) -> Result<ArrayRecord> {
        self.enter(GatewayCall::Read { id }).await?;
        self.get(id).ok_or(GatewayError::NotFound { id })
    }

    async fn create(&self, data: &[i64]) -> Result<ArrayRecord> {
        self.enter(GatewayCall::Create {
            data: data.to_vec(),
        })
        .await?;
        let mut state = self.lock();
        state.last_id += 1;
        let id = ArrayId::new(state.last_id);
        let record = new_record(id, data.to_vec());
        state.records.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: ArrayId, data: &[i64], is_sorted: bool) -> Result<()> {
        self.enter(GatewayCall::Update {
            id,
            data: data.to_vec(),
            is_sorted,
        })
        .await?;
        let mut state = self.lock();
        let record = state
            .records
            .get_mut(&id)
            .ok_or(GatewayError::NotFound { id })?;
        record.data = data.to_vec();
        record.is_sorted = is_sorted;
        record.updated_at = Timestamp::from_datetime(Utc::now());
        Ok(())
    }

    async fn delete(&self, id: ArrayId) -> Result<()> {
        self.enter(GatewayCall::Delete { id }).await?;
        self.lock()
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or(GatewayError::NotFound { id })
    }

    async fn sort(&self, id: ArrayId) -> Result<SortOutcome> {
        self.enter(GatewayCall::Sort { id }).await?;
        let mut state = self.lock();
        let record = state
            .records
            .get_mut(&id)
            .ok_or(GatewayError::NotFound { id })?;

        let started = Instant::now();
        record.data.sort_unstable();
        // Milliseconds rounded to four places, like the remote store.
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        let execution_time = (elapsed_ms * 10_000.0).round() / 10_000.0;

        record.is_sorted = true;
        record.updated_at = Timestamp::from_datetime(Utc::now());
        Ok(SortOutcome::new(record.data.clone(), execution_time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let gateway = MemoryGateway::new();
        let first = gateway.create(&[3, 1]).await.unwrap();
        let second = gateway.create(&[2]).await.unwrap();
        assert!(second.id > first.id);
        assert!(!first.is_sorted);
    }

    #[tokio::test]
    async fn test_sort_marks_record_sorted() {
        let gateway = MemoryGateway::new();
        let record = gateway.seed(vec![9, -2, 4]);

        let outcome = gateway.sort(record.id).await.unwrap();

        assert_eq!(outcome.data, vec![-2, 4, 9]);
        let stored = gateway.get(record.id).unwrap();
        assert!(stored.is_sorted);
        assert_eq!(stored.data, vec![-2, 4, 9]);
    }

    #[tokio::test]
    async fn test_update_clears_sort_flag() {
        let gateway = MemoryGateway::new();
        let record = gateway.seed(vec![2, 1]);
        gateway.sort(record.id).await.unwrap();

        gateway.update(record.id, &[5, 4], false).await.unwrap();

        let stored = gateway.get(record.id).unwrap();
        assert!(!stored.is_sorted);
        assert_eq!(stored.data, vec![5, 4]);
    }

    #[tokio::test]
    async fn test_list_pages_by_fifty() {
        let gateway = MemoryGateway::new();
        for i in 0..120 {
            gateway.seed(vec![i]);
        }

        let third = gateway.list(3).await.unwrap();

        assert_eq!(third.total_count, Some(120));
        assert_eq!(third.items.len(), 20);
        assert_eq!(third.items[0].data, vec![100]);
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let gateway = MemoryGateway::new();
        let id = ArrayId::new(404);
        assert!(gateway.read(id).await.unwrap_err().is_not_found());
        assert!(gateway.sort(id).await.unwrap_err().is_not_found());
        assert!(gateway.delete(id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_injected_failure_is_logged_and_recoverable() {
        let gateway = MemoryGateway::new();
        gateway.fail(Operation::Create);

        let err = gateway.create(&[1]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Status { status: 503, .. }));
        assert_eq!(gateway.count(Operation::Create), 1);
        assert!(gateway.is_empty());

        gateway.recover(Operation::Create);
        assert!(gateway.create(&[1]).await.is_ok());
    }
}
