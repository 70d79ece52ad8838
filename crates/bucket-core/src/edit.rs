//! Editing one stored array.

use bucket_ingest::{Token, classify_token, render_tokens, tokenize};
use bucket_model::{ArrayId, ArrayRecord, SortOutcome};

use crate::browser::CollectionBrowser;
use crate::error::{ChainStep, Result, WorkflowError};
use crate::workflow::WorkflowOrchestrator;

/// Edit buffer for a record chosen from the collection.
///
/// The buffer is a detached copy of the record's data. Opening another
/// record, or the same record with different contents, re-seeds it and
/// discards unsaved edits.
///
/// Every action closes the session as soon as it is dispatched, but is still
/// awaited and reports its own result.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    source: Option<ArrayRecord>,
    buffer: Vec<Token>,
    open: bool,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `record` for editing.
    pub fn open(&mut self, record: ArrayRecord) {
        self.reseed(record);
        self.open = true;
    }

    /// Point the session at the latest copy of its record.
    ///
    /// Re-seeds the buffer if the record differs from the one it was seeded
    /// from. Returns whether unsaved edits were discarded.
    pub fn sync(&mut self, record: &ArrayRecord) -> bool {
        if self.source.as_ref() == Some(record) {
            return false;
        }
        let dirty = self.is_dirty();
        self.reseed(record.clone());
        dirty
    }

    fn reseed(&mut self, record: ArrayRecord) {
        tracing::debug!(id = %record.id, elements = record.len(), "Seeding edit buffer");
        self.buffer = record.data.iter().copied().map(Token::Value).collect();
        self.source = Some(record);
    }

    /// Close without dispatching anything.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn source(&self) -> Option<&ArrayRecord> {
        self.source.as_ref()
    }

    pub fn id(&self) -> Option<ArrayId> {
        self.source.as_ref().map(|record| record.id)
    }

    /// Buffer as whitespace-separated text.
    pub fn text(&self) -> String {
        render_tokens(&self.buffer)
    }

    /// Replace the buffer from edited text. Returns the element count.
    pub fn set_text(&mut self, raw: &str) -> usize {
        self.buffer = tokenize(raw).into_iter().map(classify_token).collect();
        self.buffer.len()
    }

    /// Buffer contents with pending tokens resolved to `0`.
    pub fn data(&self) -> Vec<i64> {
        self.buffer.iter().copied().map(Token::resolve).collect()
    }

    /// Whether the buffer differs from the record it was seeded from.
    pub fn is_dirty(&self) -> bool {
        match &self.source {
            Some(record) => {
                self.data() != record.data || self.buffer.iter().copied().any(Token::is_pending)
            }
            None => false,
        }
    }

    /// Close the surface and hand out what should be sent.
    fn dispatch(&mut self) -> Result<(ArrayId, Vec<i64>)> {
        let id = self.id().ok_or(WorkflowError::NothingOpen)?;
        if !self.open {
            return Err(WorkflowError::NothingOpen);
        }
        self.open = false;
        Ok((id, self.data()))
    }

    /// Write the edited data back unsorted, then refresh the listing.
    pub async fn save(
        &mut self,
        orchestrator: &WorkflowOrchestrator,
        browser: &mut CollectionBrowser,
    ) -> Result<()> {
        let (id, data) = self.dispatch()?;
        orchestrator.update_only(id, &data).await?;
        browser.refresh(orchestrator.gateway()).await;
        Ok(())
    }

    /// Write the edited data back and sort it in place.
    ///
    /// The listing is refreshed once the chain settles, if the update went
    /// through.
    pub async fn sort(
        &mut self,
        orchestrator: &WorkflowOrchestrator,
        browser: &mut CollectionBrowser,
    ) -> Result<SortOutcome> {
        let (id, data) = self.dispatch()?;
        let result = orchestrator.edit_then_sort(id, &data).await;
        let persisted = match &result {
            Ok(_) => true,
            Err(err) => err.failed_step() == Some(ChainStep::Sort),
        };
        if persisted {
            browser.refresh(orchestrator.gateway()).await;
        }
        result
    }

    /// Delete the record, then refresh the listing.
    pub async fn delete(
        &mut self,
        orchestrator: &WorkflowOrchestrator,
        browser: &mut CollectionBrowser,
    ) -> Result<()> {
        let (id, _) = self.dispatch()?;
        orchestrator.delete(id).await?;
        browser.refresh(orchestrator.gateway()).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bucket_model::Timestamp;

    use super::*;

    fn record(id: u64, data: Vec<i64>) -> ArrayRecord {
        ArrayRecord {
            id: ArrayId::new(id),
            data,
            is_sorted: false,
            created_at: Timestamp::new("2024-01-01T00:00:00Z"),
            updated_at: Timestamp::new("2024-01-01T00:00:00Z"),
        }
    }

    #[test]
    fn test_open_seeds_buffer() {
        let mut session = EditSession::new();
        session.open(record(1, vec![4, -2, 7]));
        assert!(session.is_open());
        assert_eq!(session.text(), "4 -2 7");
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_set_text_keeps_pending_tokens_visible() {
        let mut session = EditSession::new();
        session.open(record(1, vec![1]));

        assert_eq!(session.set_text("5 - x 8"), 4);

        assert_eq!(session.text(), "5 - 0 8");
        assert_eq!(session.data(), vec![5, 0, 0, 8]);
        assert!(session.is_dirty());
    }

    #[test]
    fn test_changed_record_discards_edits() {
        let mut session = EditSession::new();
        session.open(record(1, vec![1, 2]));
        session.set_text("9 9 9");

        let discarded = session.sync(&record(1, vec![2, 1]));

        assert!(discarded);
        assert_eq!(session.data(), vec![2, 1]);
    }

    #[test]
    fn test_same_record_keeps_edits() {
        let mut session = EditSession::new();
        session.open(record(1, vec![1, 2]));
        session.set_text("3 4");

        assert!(!session.sync(&record(1, vec![1, 2])));
        assert_eq!(session.data(), vec![3, 4]);
    }

    #[test]
    fn test_dispatch_requires_open_record() {
        let mut session = EditSession::new();
        assert!(matches!(session.dispatch(), Err(WorkflowError::NothingOpen)));

        session.open(record(3, vec![1]));
        session.close();
        assert!(matches!(session.dispatch(), Err(WorkflowError::NothingOpen)));
    }
}
