//! Save and sort chains against the array store.
//!
//! Three chains are offered:
//!
//! | Chain | Calls | Writes the result store |
//! |-------|-------|-------------------------|
//! | save only | `create` | no |
//! | save then sort | `create`, then `sort(new id)` | yes |
//! | edit then sort | `update(id)`, then `sort(id)` | no |
//!
//! A later call is issued only after the previous one succeeded. A failed
//! sort leaves the created or updated record persisted; nothing is rolled
//! back.
//!
//! One orchestrator runs at most one save or sort at a time. Dispatches that
//! arrive while a chain is in flight are refused with
//! [`WorkflowError::Busy`]. Repeated dispatches from separate orchestrators
//! are not deduplicated.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bucket_client::RemoteArrayGateway;
use bucket_ingest::{ArrayBuilder, SubmitAction};
use bucket_model::{ArrayId, ArrayRecord, SortOutcome};

use crate::error::{ChainStep, Result, WorkflowError};
use crate::status::{Status, StatusReporter};
use crate::store::ResultStore;

pub const SAVED_MESSAGE: &str = "Array added to the database.";
pub const SAVED_AND_SORTED_MESSAGE: &str = "Array added to the database and sorted.";
pub const UPDATED_MESSAGE: &str = "Array updated.";
pub const UPDATED_AND_SORTED_MESSAGE: &str = "Array updated and sorted.";
pub const DELETED_MESSAGE: &str = "Array deleted.";

#[derive(Debug, Clone, Copy)]
enum Latch {
    Saving,
    Sorting,
}

#[derive(Debug, Default)]
struct LatchFlags {
    saving: bool,
    sorting: bool,
}

impl LatchFlags {
    fn slot(&mut self, latch: Latch) -> &mut bool {
        match latch {
            Latch::Saving => &mut self.saving,
            Latch::Sorting => &mut self.sorting,
        }
    }
}

/// Clears its flag when the chain settles, however it ends.
struct LatchGuard<'a> {
    flags: &'a Mutex<LatchFlags>,
    latch: Latch,
}

impl Drop for LatchGuard<'_> {
    fn drop(&mut self) {
        let mut flags = self.flags.lock().unwrap_or_else(PoisonError::into_inner);
        *flags.slot(self.latch) = false;
    }
}

/// Result of a completed save-then-sort chain.
#[derive(Debug, Clone, PartialEq)]
pub struct SortReport {
    /// The record created by the chain.
    pub id: ArrayId,
    pub outcome: SortOutcome,
}

/// Sequences create, update and sort calls for a candidate array.
pub struct WorkflowOrchestrator {
    gateway: Arc<dyn RemoteArrayGateway>,
    results: ResultStore,
    reporter: Arc<dyn StatusReporter>,
    flags: Mutex<LatchFlags>,
}

impl WorkflowOrchestrator {
    pub fn new(
        gateway: Arc<dyn RemoteArrayGateway>,
        results: ResultStore,
        reporter: Arc<dyn StatusReporter>,
    ) -> Self {
        Self {
            gateway,
            results,
            reporter,
            flags: Mutex::new(LatchFlags::default()),
        }
    }

    pub fn gateway(&self) -> &dyn RemoteArrayGateway {
        self.gateway.as_ref()
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    pub fn is_saving(&self) -> bool {
        self.lock_flags().saving
    }

    pub fn is_sorting(&self) -> bool {
        self.lock_flags().sorting
    }

    /// Whether a new dispatch would be refused right now.
    pub fn is_busy(&self) -> bool {
        let flags = self.lock_flags();
        flags.saving || flags.sorting
    }

    fn lock_flags(&self) -> MutexGuard<'_, LatchFlags> {
        self.flags.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acquire(&self, latch: Latch) -> Result<LatchGuard<'_>> {
        let mut flags = self.lock_flags();
        if flags.saving || flags.sorting {
            tracing::warn!(?latch, "Dispatch refused: a save or sort is in progress");
            return Err(WorkflowError::Busy);
        }
        *flags.slot(latch) = true;
        Ok(LatchGuard {
            flags: &self.flags,
            latch,
        })
    }

    /// Report the final status of a chain and hand the result back.
    fn settle<T>(&self, result: Result<T>, success: &str) -> Result<T> {
        match &result {
            Ok(_) => self.reporter.report(&Status::Info(success.to_string())),
            Err(WorkflowError::Busy) => {}
            Err(err) => {
                tracing::error!(error = %err, "Workflow failed");
                self.reporter.report(&Status::Error(err.user_message()));
            }
        }
        result
    }

    /// Persist `data` as a new, unsorted record.
    pub async fn save_only(&self, data: &[i64]) -> Result<ArrayRecord> {
        let _latch = self.acquire(Latch::Saving)?;
        tracing::debug!(elements = data.len(), "Saving array");

        let result = self
            .gateway
            .create(data)
            .await
            .map_err(|e| WorkflowError::step(ChainStep::Create, e));
        if let Ok(record) = &result {
            tracing::info!(id = %record.id, "Array saved");
        }
        self.settle(result, SAVED_MESSAGE)
    }

    /// Persist `data` as a new record, then sort that record.
    ///
    /// The sorted outcome replaces the one held in the result store. If the
    /// create fails, sort is never called.
    pub async fn save_then_sort(&self, data: &[i64]) -> Result<SortReport> {
        let _latch = self.acquire(Latch::Sorting)?;
        tracing::debug!(elements = data.len(), "Saving array before sort");

        let result = self.run_save_then_sort(data).await;
        self.settle(result, SAVED_AND_SORTED_MESSAGE)
    }

    async fn run_save_then_sort(&self, data: &[i64]) -> Result<SortReport> {
        let record = self
            .gateway
            .create(data)
            .await
            .map_err(|e| WorkflowError::step(ChainStep::Create, e))?;
        let id = record.id;

        let outcome = self
            .gateway
            .sort(id)
            .await
            .map_err(|source| WorkflowError::Step {
                step: ChainStep::Sort,
                persisted: Some(id),
                source,
            })?;

        tracing::info!(%id, execution_time = outcome.execution_time, "Array saved and sorted");
        self.results.put(outcome.clone());
        Ok(SortReport { id, outcome })
    }

    /// Overwrite an existing record with `data`, marking it unsorted.
    pub async fn update_only(&self, id: ArrayId, data: &[i64]) -> Result<()> {
        let _latch = self.acquire(Latch::Saving)?;
        tracing::debug!(%id, elements = data.len(), "Updating array");

        let result = self
            .gateway
            .update(id, data, false)
            .await
            .map_err(|e| WorkflowError::step(ChainStep::Update, e));
        self.settle(result, UPDATED_MESSAGE)
    }

    /// Overwrite an existing record with `data`, then sort it in place.
    ///
    /// No record is created and the result store is left alone. If the update
    /// fails, sort is never called; if the sort fails, the edited data stays
    /// persisted unsorted.
    pub async fn edit_then_sort(&self, id: ArrayId, data: &[i64]) -> Result<SortOutcome> {
        let _latch = self.acquire(Latch::Sorting)?;
        tracing::debug!(%id, elements = data.len(), "Updating array before sort");

        let result = self.run_edit_then_sort(id, data).await;
        self.settle(result, UPDATED_AND_SORTED_MESSAGE)
    }

    async fn run_edit_then_sort(&self, id: ArrayId, data: &[i64]) -> Result<SortOutcome> {
        self.gateway
            .update(id, data, false)
            .await
            .map_err(|e| WorkflowError::step(ChainStep::Update, e))?;

        let outcome = self
            .gateway
            .sort(id)
            .await
            .map_err(|source| WorkflowError::Step {
                step: ChainStep::Sort,
                persisted: Some(id),
                source,
            })?;
        tracing::info!(%id, execution_time = outcome.execution_time, "Array updated and sorted");
        Ok(outcome)
    }

    /// Delete a stored record. Deletion does not take a latch.
    pub async fn delete(&self, id: ArrayId) -> Result<()> {
        tracing::debug!(%id, "Deleting array");
        let result = self
            .gateway
            .delete(id)
            .await
            .map_err(|e| WorkflowError::step(ChainStep::Delete, e));
        if result.is_ok() {
            tracing::info!(%id, "Array deleted");
        }
        self.settle(result, DELETED_MESSAGE)
    }

    /// Take the builder's candidate and run the chain for `action`.
    ///
    /// The outcome message is written back into the builder's notice so the
    /// acquisition surface can show it inline.
    pub async fn submit(
        &self,
        builder: &mut ArrayBuilder,
        action: SubmitAction,
    ) -> Result<Option<SortReport>> {
        let data = builder.candidate(action)?;
        let result = match action {
            SubmitAction::Save => self.save_only(&data).await.map(|_| None),
            SubmitAction::Sort => self.save_then_sort(&data).await.map(Some),
        };
        match &result {
            Ok(_) => builder.set_info(match action {
                SubmitAction::Save => SAVED_MESSAGE,
                SubmitAction::Sort => SAVED_AND_SORTED_MESSAGE,
            }),
            Err(err) => builder.set_error(err.user_message()),
        }
        result
    }
}

impl std::fmt::Debug for WorkflowOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowOrchestrator")
            .field("results", &self.results)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use bucket_client::{MemoryGateway, Operation};

    use super::*;
    use crate::status::RecordingReporter;

    fn orchestrator(gateway: &Arc<MemoryGateway>) -> (WorkflowOrchestrator, Arc<RecordingReporter>) {
        let reporter = Arc::new(RecordingReporter::new());
        let orchestrator =
            WorkflowOrchestrator::new(gateway.clone(), ResultStore::new(), reporter.clone());
        (orchestrator, reporter)
    }

    #[tokio::test]
    async fn test_save_only_leaves_results_alone() {
        let gateway = Arc::new(MemoryGateway::new());
        let (orchestrator, reporter) = orchestrator(&gateway);

        let record = orchestrator.save_only(&[3, 1, 2]).await.unwrap();

        assert!(!record.is_sorted);
        assert!(orchestrator.results().is_empty());
        assert_eq!(gateway.count(Operation::Sort), 0);
        assert_eq!(reporter.last(), Some(Status::Info(SAVED_MESSAGE.to_string())));
        assert!(!orchestrator.is_busy());
    }

    #[tokio::test]
    async fn test_save_then_sort_stores_outcome() {
        let gateway = Arc::new(MemoryGateway::new());
        let (orchestrator, _) = orchestrator(&gateway);

        let report = orchestrator.save_then_sort(&[3, -1, 2]).await.unwrap();

        assert_eq!(report.outcome.data, vec![-1, 2, 3]);
        assert_eq!(orchestrator.results().latest(), Some(report.outcome));
        assert!(gateway.get(report.id).unwrap().is_sorted);
    }

    #[tokio::test]
    async fn test_latch_released_after_failure() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.fail(Operation::Create);
        let (orchestrator, _) = orchestrator(&gateway);

        assert!(orchestrator.save_only(&[1, 2]).await.is_err());
        assert!(!orchestrator.is_saving());

        gateway.recover(Operation::Create);
        assert!(orchestrator.save_only(&[1, 2]).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_only_clears_sort_flag() {
        let gateway = Arc::new(MemoryGateway::new());
        let record = gateway.seed(vec![1, 2]);
        let (orchestrator, _) = orchestrator(&gateway);
        orchestrator.edit_then_sort(record.id, &[2, 1]).await.unwrap();

        orchestrator.update_only(record.id, &[9, 8]).await.unwrap();

        let stored = gateway.get(record.id).unwrap();
        assert!(!stored.is_sorted);
        assert_eq!(stored.data, vec![9, 8]);
    }
}
