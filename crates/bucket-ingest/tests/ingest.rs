//! Integration tests for array acquisition.

use std::io::Write;

use proptest::prelude::*;

use bucket_ingest::{
    AcquisitionMode, ArrayBuilder, GenerateParams, IngestError, SubmitAction, import_file,
    normalize,
};

proptest! {
    #[test]
    fn normalize_preserves_length(tokens in prop::collection::vec(".{0,6}", 0..40)) {
        prop_assert_eq!(normalize(&tokens).len(), tokens.len());
    }

    #[test]
    fn normalize_keeps_exact_integers(value in any::<i64>()) {
        prop_assert_eq!(normalize(&[value.to_string()]), vec![value]);
    }

    #[test]
    fn normalize_zeroes_non_integers(token in "[a-zA-Z.+ ]{1,8}") {
        prop_assert_eq!(normalize(&[token]), vec![0]);
    }
}

#[test]
fn import_drops_invalid_lines() {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    write!(file, "10\nabc\n-5\n").unwrap();

    let values = import_file(file.path()).unwrap();

    assert_eq!(values, vec![10, -5]);
}

#[test]
fn import_rejects_wrong_extension_without_reading() {
    let dir = tempfile::tempdir().unwrap();
    // The file does not exist: a read attempt would surface FileRead instead.
    let err = import_file(&dir.path().join("numbers.csv")).unwrap_err();
    assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
}

#[test]
fn import_reports_unreadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = ArrayBuilder::new();
    builder.select_mode(AcquisitionMode::Imported);

    let err = builder
        .import_file(&dir.path().join("missing.txt"))
        .unwrap_err();

    assert!(matches!(err, IngestError::FileRead { .. }));
    assert_eq!(
        builder.notice().map(|notice| notice.message()),
        Some("An error occurred while reading the file.")
    );
}

#[test]
fn generation_validation_boundaries() {
    let cases = [
        (("0", "1", "9"), false),
        (("1", "1", "9"), true),
        (("3000000", "1", "9"), false),
        (("2999999", "1", "9"), true),
        (("5", "5", "5"), false),
        (("5", "5", "3"), false),
        (("5", "3", "5"), true),
    ];
    for ((count, min, max), accepted) in cases {
        let result = GenerateParams::new(count, min, max).validate();
        assert_eq!(result.is_ok(), accepted, "count={count} min={min} max={max}");
    }
}

#[test]
fn switching_modes_discards_previous_input() {
    let mut builder = ArrayBuilder::new();
    builder.select_mode(AcquisitionMode::BulkManual);
    builder.set_bulk_text("1 2 3").unwrap();

    builder.select_mode(AcquisitionMode::Generated);
    builder.select_mode(AcquisitionMode::BulkManual);

    assert!(builder.is_empty());
    assert!(matches!(
        builder.candidate(SubmitAction::Save),
        Err(IngestError::EmptyCandidate)
    ));
}
