//! Rendering tests for the command-line output.

use chrono::{DateTime, Utc};

use bucket_cli::render::{format_controls, format_outcome, format_record, format_timestamp};
use bucket_core::PageControls;
use bucket_model::{ArrayId, ArrayRecord, Page, SortOutcome, Timestamp};

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn record(data: Vec<i64>) -> ArrayRecord {
    ArrayRecord {
        id: ArrayId::new(42),
        data,
        is_sorted: true,
        created_at: Timestamp::new("2024-04-28T09:15:00Z"),
        updated_at: Timestamp::new("2024-05-01T10:00:00Z"),
    }
}

#[test]
fn test_outcome_is_truncated_after_thirty_elements() {
    let outcome = SortOutcome::new((1..=35).collect(), 0.0421);
    insta::assert_snapshot!(format_outcome(&outcome), @r"
    Sorted 35 elements in 0.0421 ms
    1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 ...
    ");
}

#[test]
fn test_short_outcome_has_no_ellipsis() {
    let outcome = SortOutcome::new(vec![-3, 0, 8], 0.5);
    insta::assert_snapshot!(format_outcome(&outcome), @r"
    Sorted 3 elements in 0.5 ms
    -3 0 8
    ");
}

#[test]
fn test_record_details() {
    insta::assert_snapshot!(format_record(&record(vec![1, 4, 9]), now()), @r"
    Array 42
    Length: 3
    Sorted: yes
    Created: 2024-04-28 09:15
    Updated: 2024-05-01 10:00 (2 hours ago)
    Elements: 1 4 9
    ");
}

#[test]
fn test_controls_on_middle_page() {
    let items = (0..50).map(|_| record(vec![1])).collect();
    let page = Page::listing(items, 120, 2).unwrap();
    let controls = PageControls::for_page(&page).unwrap();
    insta::assert_snapshot!(
        format_controls(&controls),
        @"Page 2 of 3 | previous: --page 1 | next: --page 3"
    );
}

#[test]
fn test_controls_on_last_page() {
    let items = (0..20).map(|_| record(vec![1])).collect();
    let page = Page::listing(items, 120, 3).unwrap();
    let controls = PageControls::for_page(&page).unwrap();
    insta::assert_snapshot!(format_controls(&controls), @"Page 3 of 3 | previous: --page 2");
}

#[test]
fn test_unreadable_timestamp_is_shown_verbatim() {
    assert_eq!(format_timestamp(&Timestamp::new("yesterday")), "yesterday");
}
