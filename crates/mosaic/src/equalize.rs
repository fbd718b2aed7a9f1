//! Row height equalization.
//!
//! The second layout pass. It must run only after [`segment_into_rows`] has
//! cleared every override in the item set: measuring one item after a
//! sibling's height was already raised would read a constrained value
//! instead of the natural one.
//!
//! [`segment_into_rows`]: crate::rows::segment_into_rows

use mosaic_core::logging::targets;

use crate::geometry::{Measurable, content_height};
use crate::rows::{Row, segment_into_rows};

/// Give every item in `row` the height of its tallest member.
///
/// Rows with fewer than two items are left untouched. Returns the applied
/// height, or `None` when the row was skipped.
pub fn equalize_row<M: Measurable>(row: &mut [M]) -> Option<f32> {
    if row.len() < 2 {
        return None;
    }

    let tallest = row
        .iter()
        .map(|item| content_height(item))
        .fold(f32::NEG_INFINITY, f32::max);

    for item in row.iter_mut() {
        item.set_height_override(Some(tallest));
    }
    Some(tallest)
}

/// Equalize each of `rows` over `items`.
///
/// Every read happens before any write within a row, and rows do not
/// overlap, so no measurement in this pass observes a height this pass set.
/// Returns the number of rows that were equalized.
pub fn equalize_rows<M: Measurable>(items: &mut [M], rows: &[Row]) -> usize {
    let equalized = rows
        .iter()
        .filter_map(|row| equalize_row(row.items_mut(items)))
        .count();

    tracing::trace!(target: targets::LAYOUT, rows = rows.len(), equalized, "equalized row heights");
    equalized
}

/// Run both layout passes over `items`: segment into rows (clearing every
/// override), then equalize each row. Returns the rows.
pub fn match_heights_by_row<M: Measurable>(items: &mut [M]) -> Vec<Row> {
    let rows = segment_into_rows(items);
    equalize_rows(items, &rows);
    rows
}
