//! Terminal rendering of stored arrays and sort results.

use chrono::{DateTime, Utc};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use bucket_core::PageControls;
use bucket_model::{ArrayRecord, PREVIEW_LEN, Page, SortOutcome, Timestamp};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(4)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::UpperBoundary(Width::Percentage(55)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(16)),
            ColumnConstraint::LowerBoundary(Width::Fixed(12)),
        ]);
    }
}

/// Table of the records on one page.
pub fn records_table(page: &Page, now: DateTime<Utc>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Length"),
        header_cell("Elements"),
        header_cell("Sorted"),
        header_cell("Created"),
        header_cell("Updated"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);

    for record in &page.items {
        table.add_row(vec![
            Cell::new(record.id).add_attribute(Attribute::Bold),
            Cell::new(record.len()),
            Cell::new(record.preview(PREVIEW_LEN)),
            sorted_cell(record.is_sorted),
            Cell::new(format_timestamp(&record.created_at)),
            dim_cell(format_age(&record.updated_at, now)),
        ]);
    }
    table
}

/// Timestamp as `YYYY-MM-DD HH:MM` UTC, or verbatim if it cannot be read.
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    timestamp.to_utc().map_or_else(
        || timestamp.as_str().to_string(),
        |utc| utc.format("%Y-%m-%d %H:%M").to_string(),
    )
}

pub fn format_age(timestamp: &Timestamp, now: DateTime<Utc>) -> String {
    timestamp.age(now).unwrap_or_else(|| "-".to_string())
}

/// One-line position summary with the flags for neighbouring pages.
pub fn format_controls(controls: &PageControls) -> String {
    let mut line = format!("Page {} of {}", controls.current, controls.last);
    if controls.prev_enabled {
        line.push_str(&format!(" | previous: --page {}", controls.current - 1));
    }
    if controls.next_enabled {
        line.push_str(&format!(" | next: --page {}", controls.current + 1));
    }
    line
}

/// Sorted elements (truncated) and the store's reported execution time.
pub fn format_outcome(outcome: &SortOutcome) -> String {
    let shown = outcome
        .data
        .iter()
        .take(PREVIEW_LEN)
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    let ellipsis = if outcome.len() > PREVIEW_LEN { " ..." } else { "" };
    format!(
        "Sorted {} elements in {} ms\n{shown}{ellipsis}",
        outcome.len(),
        outcome.execution_time
    )
}

/// Full details of one record, all elements included.
pub fn format_record(record: &ArrayRecord, now: DateTime<Utc>) -> String {
    let elements = record
        .data
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "Array {}\nLength: {}\nSorted: {}\nCreated: {}\nUpdated: {} ({})\nElements: {elements}",
        record.id,
        record.len(),
        if record.is_sorted { "yes" } else { "no" },
        format_timestamp(&record.created_at),
        format_timestamp(&record.updated_at),
        format_age(&record.updated_at, now),
    )
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn sorted_cell(is_sorted: bool) -> Cell {
    if is_sorted {
        Cell::new("yes").fg(Color::Green)
    } else {
        dim_cell("no")
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
