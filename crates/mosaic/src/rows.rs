//! Row segmentation.
//!
//! Items arrive in the reading order the packing step used to place them.
//! There is no explicit end-of-row marker: a row ends wherever the rounded
//! left coordinate fails to increase, i.e. the next item wrapped back toward
//! the left edge.
//!
//! Because every row is a contiguous run of the input, a [`Row`] is stored as
//! an index range into the item slice rather than as a list of items.

use std::ops::Range;

use mosaic_core::logging::targets;

use crate::geometry::{Measurable, rounded_left};

/// A visual row: a contiguous run of items sharing a horizontal band.
///
/// Rows are derived on every layout pass and are only meaningful for the
/// item slice they were computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    range: Range<usize>,
}

impl Row {
    fn new(range: Range<usize>) -> Self {
        debug_assert!(range.start < range.end, "rows are never empty");
        Self { range }
    }

    /// Number of items in the row.
    #[inline]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Always `false`; kept for parity with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// The index range this row covers.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// The row's items within the slice it was computed from.
    pub fn items<'a, M>(&self, items: &'a [M]) -> &'a [M] {
        &items[self.range()]
    }

    /// Mutable access to the row's items.
    pub fn items_mut<'a, M>(&self, items: &'a mut [M]) -> &'a mut [M] {
        &mut items[self.range()]
    }
}

/// Fold state: finished rows, where the open row starts, last rounded left.
struct Segmentation {
    rows: Vec<Row>,
    open_start: usize,
    last_left: i64,
}

/// Partition `items` into rows.
///
/// Every item's height override is cleared as it is visited, so that any
/// measurement taken afterwards reflects natural content height. This is the
/// first of the two layout passes; see [`crate::equalize`] for the second.
///
/// The concatenation of the returned rows is exactly `0..items.len()`. An
/// empty input yields no rows.
pub fn segment_into_rows<M: Measurable>(items: &mut [M]) -> Vec<Row> {
    let len = items.len();
    let initial = Segmentation {
        rows: Vec::new(),
        open_start: 0,
        last_left: 0,
    };

    let Segmentation {
        mut rows,
        open_start,
        ..
    } = items
        .iter_mut()
        .enumerate()
        .fold(initial, |mut state, (index, item)| {
            let left = rounded_left(&*item);
            item.set_height_override(None);

            // The very first item can sit at left 0, which would close an
            // empty row; only close rows that have something in them.
            if left <= state.last_left && index > state.open_start {
                state.rows.push(Row::new(state.open_start..index));
                state.open_start = index;
            }

            state.last_left = left;
            state
        });

    if open_start < len {
        rows.push(Row::new(open_start..len));
    }

    tracing::trace!(target: targets::LAYOUT, items = len, rows = rows.len(), "segmented rows");
    rows
}
