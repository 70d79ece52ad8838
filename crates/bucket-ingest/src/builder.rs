//! The acquisition state machine.
//!
//! An [`ArrayBuilder`] is always in exactly one [`AcquisitionState`]. Choosing
//! a mode is the only transition; its exit action clears the candidate
//! sequence and any pending notice, so a new mode always starts empty. Input
//! gathered in one mode is never merged into another.

use std::fmt;
use std::path::Path;

use rand::Rng;

use bucket_model::{ArrayId, ArrayRecord};

use crate::error::{IngestError, Result};
use crate::generate::{self, GenerateParams};
use crate::import;
use crate::normalize::{RawSequence, Token, classify_token, render_tokens, tokenize};

/// Input source selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcquisitionMode {
    Manual,
    BulkManual,
    Generated,
    Imported,
    RemoteSelected,
}

impl AcquisitionMode {
    pub const ALL: [Self; 5] = [
        Self::Manual,
        Self::BulkManual,
        Self::Generated,
        Self::Imported,
        Self::RemoteSelected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::BulkManual => "bulk manual",
            Self::Generated => "generated",
            Self::Imported => "imported",
            Self::RemoteSelected => "remote selected",
        }
    }
}

impl fmt::Display for AcquisitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validity of the imported source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatus {
    /// No file has been offered yet.
    Pending,
    Valid { name: String },
    Invalid { name: String },
}

impl ImportStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// Per-mode input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionState {
    /// Confirmed entries kept as typed, plus the entry being edited.
    Manual { entries: Vec<String>, current: String },
    /// One line, classified on every edit.
    BulkManual { tokens: Vec<Token> },
    Generated { values: Vec<i64> },
    Imported { values: Vec<i64>, status: ImportStatus },
    /// Detached copy of a stored record, editable as a line.
    RemoteSelected {
        tokens: Vec<Token>,
        source: Option<ArrayId>,
    },
}

impl AcquisitionState {
    /// Entry action of `mode`: an empty buffer.
    fn empty(mode: AcquisitionMode) -> Self {
        match mode {
            AcquisitionMode::Manual => Self::Manual {
                entries: Vec::new(),
                current: String::new(),
            },
            AcquisitionMode::BulkManual => Self::BulkManual { tokens: Vec::new() },
            AcquisitionMode::Generated => Self::Generated { values: Vec::new() },
            AcquisitionMode::Imported => Self::Imported {
                values: Vec::new(),
                status: ImportStatus::Pending,
            },
            AcquisitionMode::RemoteSelected => Self::RemoteSelected {
                tokens: Vec::new(),
                source: None,
            },
        }
    }

    pub fn mode(&self) -> AcquisitionMode {
        match self {
            Self::Manual { .. } => AcquisitionMode::Manual,
            Self::BulkManual { .. } => AcquisitionMode::BulkManual,
            Self::Generated { .. } => AcquisitionMode::Generated,
            Self::Imported { .. } => AcquisitionMode::Imported,
            Self::RemoteSelected { .. } => AcquisitionMode::RemoteSelected,
        }
    }

    /// The candidate sequence in whatever shape this mode keeps it.
    pub fn raw_sequence(&self) -> RawSequence<'_> {
        match self {
            Self::Manual { entries, .. } => RawSequence::Raw(entries),
            Self::BulkManual { tokens } | Self::RemoteSelected { tokens, .. } => {
                RawSequence::Tokens(tokens)
            }
            Self::Generated { values } | Self::Imported { values, .. } => {
                RawSequence::Values(values)
            }
        }
    }

    /// Number of elements currently in the candidate.
    pub fn len(&self) -> usize {
        self.raw_sequence().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Inline message shown next to the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Info(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Self::Error(message) | Self::Info(message) => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// What the user asked to do with the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    Save,
    Sort,
}

/// Builds one candidate array from the selected input source.
#[derive(Debug, Clone)]
pub struct ArrayBuilder {
    state: AcquisitionState,
    generate_params: GenerateParams,
    notice: Option<Notice>,
}

impl Default for ArrayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArrayBuilder {
    /// A builder in manual mode with an empty buffer.
    pub fn new() -> Self {
        Self {
            state: AcquisitionState::empty(AcquisitionMode::Manual),
            generate_params: GenerateParams::default(),
            notice: None,
        }
    }

    pub fn mode(&self) -> AcquisitionMode {
        self.state.mode()
    }

    pub fn state(&self) -> &AcquisitionState {
        &self.state
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn generate_params(&self) -> &GenerateParams {
        &self.generate_params
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::Info(message.into()));
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::Error(message.into()));
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Switch to `mode`.
    ///
    /// Exit action: the current buffer and notice are discarded, even when
    /// `mode` is already active.
    pub fn select_mode(&mut self, mode: AcquisitionMode) {
        let previous = self.state.mode();
        self.state = AcquisitionState::empty(mode);
        self.notice = None;
        tracing::debug!(from = %previous, to = %mode, "acquisition mode selected");
    }

    fn reject<T>(&mut self, err: IngestError) -> Result<T> {
        self.notice = Some(Notice::Error(err.to_string()));
        Err(err)
    }

    fn wrong_mode<T>(&mut self, expected: AcquisitionMode) -> Result<T> {
        let actual = self.mode();
        self.reject(IngestError::WrongMode { expected, actual })
    }

    // === Manual ===

    /// Replace the value being typed in manual mode.
    pub fn set_current_entry(&mut self, value: &str) -> Result<()> {
        match &mut self.state {
            AcquisitionState::Manual { current, .. } => {
                value.clone_into(current);
                Ok(())
            }
            _ => self.wrong_mode(AcquisitionMode::Manual),
        }
    }

    /// Confirm the value being typed, e.g. when the field loses focus.
    ///
    /// Returns `true` when an element was appended. Empty values are ignored.
    pub fn commit_entry(&mut self) -> Result<bool> {
        match &mut self.state {
            AcquisitionState::Manual { entries, current } => {
                if current.is_empty() {
                    return Ok(false);
                }
                entries.push(std::mem::take(current));
                Ok(true)
            }
            _ => self.wrong_mode(AcquisitionMode::Manual),
        }
    }

    /// Type and confirm one manual entry.
    pub fn push_entry(&mut self, value: &str) -> Result<bool> {
        self.set_current_entry(value)?;
        self.commit_entry()
    }

    // === Bulk manual ===

    /// Replace the bulk line. Returns the live element count.
    pub fn set_bulk_text(&mut self, raw: &str) -> Result<usize> {
        match &mut self.state {
            AcquisitionState::BulkManual { tokens } => {
                *tokens = tokenize(raw).into_iter().map(classify_token).collect();
                Ok(tokens.len())
            }
            _ => self.wrong_mode(AcquisitionMode::BulkManual),
        }
    }

    // === Generated ===

    pub fn set_generate_params(&mut self, params: GenerateParams) {
        self.generate_params = params;
    }

    /// Generate a fresh candidate with the thread-local generator.
    pub fn generate(&mut self) -> Result<usize> {
        self.generate_with(&mut rand::rng())
    }

    /// Generate a fresh candidate with `rng`. Returns the element count.
    pub fn generate_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<usize> {
        if self.mode() != AcquisitionMode::Generated {
            return self.wrong_mode(AcquisitionMode::Generated);
        }
        let spec = match self.generate_params.validate() {
            Ok(spec) => spec,
            Err(err) => return self.reject(err),
        };
        let generated = generate::generate_with(spec, rng);
        let count = generated.len();
        if let AcquisitionState::Generated { values } = &mut self.state {
            *values = generated;
        }
        self.notice = None;
        tracing::debug!(count, min = spec.min, max = spec.max, "generated array");
        Ok(count)
    }

    // === Imported ===

    /// Import a file from disk. Returns the element count.
    pub fn import_file(&mut self, path: &Path) -> Result<usize> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.apply_import(name, |_| import::import_file(path))
    }

    /// Import content already loaded under `name`.
    pub fn import_text(&mut self, name: &str, content: &str) -> Result<usize> {
        self.apply_import(name.to_string(), |name| import::import_text(name, content))
    }

    fn apply_import<F>(&mut self, name: String, load: F) -> Result<usize>
    where
        F: FnOnce(&str) -> Result<Vec<i64>>,
    {
        if self.mode() != AcquisitionMode::Imported {
            return self.wrong_mode(AcquisitionMode::Imported);
        }
        self.notice = None;
        let loaded = load(&name);
        let AcquisitionState::Imported { values, status } = &mut self.state else {
            return self.wrong_mode(AcquisitionMode::Imported);
        };
        match loaded {
            Ok(imported) => {
                *values = imported;
                *status = ImportStatus::Valid { name };
                Ok(values.len())
            }
            Err(err) => {
                // A rejected source leaves the previous candidate in place.
                *status = ImportStatus::Invalid { name };
                self.reject(err)
            }
        }
    }

    // === Remote selected ===

    /// Seed the candidate from a stored record. The record is not touched.
    pub fn select_record(&mut self, record: &ArrayRecord) -> Result<usize> {
        match &mut self.state {
            AcquisitionState::RemoteSelected { tokens, source } => {
                *tokens = record.data.iter().copied().map(Token::Value).collect();
                *source = Some(record.id);
                Ok(tokens.len())
            }
            _ => self.wrong_mode(AcquisitionMode::RemoteSelected),
        }
    }

    /// Re-type the selected array as a whitespace-separated line.
    pub fn set_selected_text(&mut self, raw: &str) -> Result<usize> {
        match &mut self.state {
            AcquisitionState::RemoteSelected { tokens, .. } => {
                *tokens = tokenize(raw).into_iter().map(classify_token).collect();
                Ok(tokens.len())
            }
            _ => self.wrong_mode(AcquisitionMode::RemoteSelected),
        }
    }

    /// Editable text of the current candidate, where the mode has one.
    pub fn text(&self) -> Option<String> {
        match &self.state {
            AcquisitionState::BulkManual { tokens }
            | AcquisitionState::RemoteSelected { tokens, .. } => Some(render_tokens(tokens)),
            _ => None,
        }
    }

    // === Submit ===

    /// Resolve the candidate into integers for `action`.
    ///
    /// A manual entry still being typed is confirmed first. Failures are
    /// recorded as an error notice and nothing is dispatched.
    pub fn candidate(&mut self, action: SubmitAction) -> Result<Vec<i64>> {
        if let AcquisitionState::Manual { .. } = self.state {
            self.commit_entry()?;
        }
        let len = self.state.len();
        if len == 0 {
            return self.reject(IngestError::EmptyCandidate);
        }
        let blocked = match &self.state {
            AcquisitionState::RemoteSelected { .. } if len <= 1 => {
                Some(IngestError::SelectionTooShort { len })
            }
            AcquisitionState::Imported { status, .. }
                if action == SubmitAction::Sort && !status.is_valid() =>
            {
                Some(IngestError::InvalidImport)
            }
            _ => None,
        };
        if let Some(err) = blocked {
            return self.reject(err);
        }
        self.notice = None;
        Ok(self.state.raw_sequence().resolve())
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
            created_at: Timestamp::new("2024-01-15T10:00:00Z"),
            updated_at: Timestamp::new("2024-01-15T10:00:00Z"),
        }
    }

    #[test]
    fn test_starts_in_manual_mode() {
        let builder = ArrayBuilder::new();
        assert_eq!(builder.mode(), AcquisitionMode::Manual);
        assert!(builder.is_empty());
        assert!(builder.notice().is_none());
    }

    #[test]
    fn test_mode_switch_always_empties_candidate() {
        let mut builder = ArrayBuilder::new();
        builder.push_entry("4").unwrap();
        builder.set_error("something");

        for mode in AcquisitionMode::ALL {
            builder.select_mode(mode);
            assert_eq!(builder.mode(), mode);
            assert!(builder.is_empty(), "{mode} should start empty");
            assert!(builder.notice().is_none());
        }
    }

    #[test]
    fn test_reselecting_same_mode_clears() {
        let mut builder = ArrayBuilder::new();
        builder.select_mode(AcquisitionMode::BulkManual);
        builder.set_bulk_text("1 2 3").unwrap();
        builder.select_mode(AcquisitionMode::BulkManual);
        assert!(builder.is_empty());
    }

    #[test]
    fn test_manual_entries_normalized_at_submit() {
        let mut builder = ArrayBuilder::new();
        assert!(builder.push_entry("12").unwrap());
        assert!(builder.push_entry("-").unwrap());
        assert!(!builder.push_entry("").unwrap());
        builder.set_current_entry("abc").unwrap();

        // Raw strings are kept until submit.
        match builder.state() {
            AcquisitionState::Manual { entries, current } => {
                assert_eq!(entries, &vec!["12".to_string(), "-".to_string()]);
                assert_eq!(current, "abc");
            }
            other => panic!("unexpected state {other:?}"),
        }

        assert_eq!(builder.candidate(SubmitAction::Save).unwrap(), vec![12, 0, 0]);
    }

    #[test]
    fn test_bulk_count_updates_live() {
        let mut builder = ArrayBuilder::new();
        builder.select_mode(AcquisitionMode::BulkManual);
        assert_eq!(builder.set_bulk_text("1 2").unwrap(), 2);
        assert_eq!(builder.set_bulk_text("1 2 -").unwrap(), 3);
        assert_eq!(builder.text().as_deref(), Some("1 2 -"));
        assert_eq!(builder.set_bulk_text("1 2 x").unwrap(), 3);
        assert_eq!(builder.text().as_deref(), Some("1 2 0"));
    }

    #[test]
    fn test_wrong_mode_is_reported() {
        let mut builder = ArrayBuilder::new();
        let err = builder.set_bulk_text("1").unwrap_err();
        assert!(matches!(err, IngestError::WrongMode { .. }));
        assert!(builder.notice().is_some_and(Notice::is_error));
    }

    #[test]
    fn test_generation_error_keeps_notice() {
        let mut builder = ArrayBuilder::new();
        builder.select_mode(AcquisitionMode::Generated);
        builder.set_generate_params(GenerateParams::new("0", "1", "5"));
        assert!(builder.generate().is_err());
        assert_eq!(
            builder.notice().map(Notice::message),
            Some("Count must be greater than 0.")
        );
        assert!(builder.is_empty());
    }

    #[test]
    fn test_generation_fills_candidate() {
        let mut builder = ArrayBuilder::new();
        builder.select_mode(AcquisitionMode::Generated);
        builder.set_generate_params(GenerateParams::new("25", "1", "3"));
        assert_eq!(builder.generate().unwrap(), 25);
        let values = builder.candidate(SubmitAction::Sort).unwrap();
        assert!(values.iter().all(|v| (1..=3).contains(v)));
    }

    #[test]
    fn test_import_marks_source() {
        let mut builder = ArrayBuilder::new();
        builder.select_mode(AcquisitionMode::Imported);

        assert!(builder.import_text("a.csv", "1\n2").is_err());
        assert!(matches!(
            builder.state(),
            AcquisitionState::Imported {
                status: ImportStatus::Invalid { .. },
                ..
            }
        ));

        assert_eq!(builder.import_text("a.txt", "10\nabc\n-5\n").unwrap(), 2);
        assert_eq!(builder.candidate(SubmitAction::Sort).unwrap(), vec![10, -5]);
    }

    #[test]
    fn test_sort_requires_valid_import() {
        let mut builder = ArrayBuilder::new();
        builder.select_mode(AcquisitionMode::Imported);
        builder.import_text("a.txt", "1\n2\n").unwrap();
        assert!(builder.import_text("b.txt", "none").is_err());

        // The earlier values remain, but the source is now invalid.
        assert_eq!(builder.len(), 2);
        assert!(matches!(
            builder.candidate(SubmitAction::Sort),
            Err(IngestError::InvalidImport)
        ));
        assert_eq!(builder.candidate(SubmitAction::Save).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_remote_selection_is_detached() {
        let source = record(9, vec![3, 1, 2]);
        let mut builder = ArrayBuilder::new();
        builder.select_mode(AcquisitionMode::RemoteSelected);
        builder.select_record(&source).unwrap();
        builder.set_selected_text("3 1 2 8").unwrap();

        assert_eq!(source.data, vec![3, 1, 2]);
        assert_eq!(builder.candidate(SubmitAction::Save).unwrap(), vec![3, 1, 2, 8]);
        assert!(matches!(
            builder.state(),
            AcquisitionState::RemoteSelected {
                source: Some(id),
                ..
            } if *id == ArrayId::new(9)
        ));
    }

    #[test]
    fn test_remote_selection_needs_two_elements() {
        let mut builder = ArrayBuilder::new();
        builder.select_mode(AcquisitionMode::RemoteSelected);
        builder.select_record(&record(1, vec![5])).unwrap();
        assert!(matches!(
            builder.candidate(SubmitAction::Sort),
            Err(IngestError::SelectionTooShort { len: 1 })
        ));
    }

    #[test]
    fn test_empty_candidate_rejected() {
        let mut builder = ArrayBuilder::new();
        assert!(matches!(
            builder.candidate(SubmitAction::Save),
            Err(IngestError::EmptyCandidate)
        ));
        assert_eq!(
            builder.notice(),
            Some(&Notice::Error("The array is empty.".to_string()))
        );
    }
}
