use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::ActivityKind;
use crate::session::{ItemStatus, SessionState};

/// Every state change in the session core produces an Event.
/// The CLI prints them as JSON; collaborators (persistence, analytics)
/// subscribe to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        activity_index: usize,
        kind: ActivityKind,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// The current phase's countdown reached zero and the cursor advanced.
    PhaseCompleted {
        activity_index: usize,
        kind: ActivityKind,
        at: DateTime<Utc>,
    },
    /// Manual advance past the current phase.
    PhaseSkipped {
        from_index: usize,
        to_index: usize,
        at: DateTime<Utc>,
    },
    /// Jump back to an already-seen phase.
    JumpedBack {
        from_index: usize,
        to_index: usize,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    /// Terminal notification: every activity in the sequence has finished.
    /// `duration_actual_secs` counts seconds spent running; paused time is
    /// excluded.
    SessionCompleted {
        sequence_id: String,
        duration_actual_secs: u64,
        at: DateTime<Utc>,
    },
    /// Read-only snapshot for rendering and the `status` command.
    StateSnapshot {
        state: SessionState,
        activity_index: usize,
        kind: ActivityKind,
        title: String,
        remaining_secs: u64,
        total_secs: u64,
        percent_complete: f64,
        statuses: Vec<ItemStatus>,
        at: DateTime<Utc>,
    },
}
