//! Pure progress derivation over a sequence cursor.
//!
//! No mutable state: everything here is recomputed from `(total, cursor)` on
//! every query.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Complete,
    Current,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub completed_count: usize,
    /// None once the cursor has moved past the last item.
    pub current_index: Option<usize>,
    pub total_count: usize,
    /// Count-based: completed items over total items, 0.0 ..= 100.0.
    pub percent_complete: f64,
}

pub fn progress(total: usize, cursor: usize) -> Progress {
    let completed = cursor.min(total);
    let percent = if total == 0 {
        100.0
    } else {
        completed as f64 / total as f64 * 100.0
    };
    Progress {
        completed_count: completed,
        current_index: (cursor < total).then_some(cursor),
        total_count: total,
        percent_complete: percent,
    }
}

/// Per-item status for progress displays: items before the cursor are
/// complete, the item at the cursor is current, items after are pending.
pub fn item_statuses(total: usize, cursor: usize) -> Vec<ItemStatus> {
    (0..total)
        .map(|i| match i.cmp(&cursor) {
            Ordering::Less => ItemStatus::Complete,
            Ordering::Equal => ItemStatus::Current,
            Ordering::Greater => ItemStatus::Pending,
        })
        .collect()
}
