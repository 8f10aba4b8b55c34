//! Session controller implementation.
//!
//! The controller is a caller-driven state machine. It owns the sequence
//! cursor and the phase timer and does not use internal threads -- the
//! caller (typically a [`SessionRunner`](super::SessionRunner) task or the
//! CLI) invokes `tick()` once per second, or `sync()` after a gap in
//! attention to catch up on wall-clock time.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused <-> Running) -> Complete
//! ```
//!
//! `Complete` is terminal: the only transition out of it is `reset()`, which
//! replays the sequence from the first activity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::progress::{self, ItemStatus, Progress};
use super::timer::{PhaseTimer, Tick};
use crate::activity::{Activity, ActivityKind};
use crate::error::SessionError;
use crate::events::Event;
use crate::sequence::Sequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    Complete,
}

/// Drives a [`Sequence`] from start to completion.
///
/// Exclusively owns the cursor and timer state. Presentation layers hold
/// read-only snapshots obtained from [`SessionController::snapshot`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionController {
    sequence: Sequence,
    state: SessionState,
    cursor: usize,
    timer: PhaseTimer,
    /// Seconds spent running, across pauses and jumps.
    elapsed_secs: u64,
    #[serde(default)]
    started_at: Option<DateTime<Utc>>,
    /// Epoch ms of the last wall-clock sync. None unless running.
    #[serde(default)]
    last_sync_epoch_ms: Option<u64>,
}

impl SessionController {
    /// Create a controller in the `Idle` state with the first activity
    /// loaded. Sequence validity (non-empty, unique ids) is enforced by
    /// [`Sequence::new`].
    pub fn new(sequence: Sequence) -> Self {
        let first_duration = sequence.get(0).map(|a| a.duration_secs).unwrap_or(0);
        Self {
            sequence,
            state: SessionState::Idle,
            cursor: 0,
            timer: PhaseTimer::new(first_duration),
            elapsed_secs: 0,
            started_at: None,
            last_sync_epoch_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn current_activity(&self) -> Option<&Activity> {
        self.sequence.get(self.cursor)
    }

    pub fn remaining_secs(&self) -> u64 {
        self.timer.remaining_secs()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    pub fn progress(&self) -> Progress {
        progress::progress(self.sequence.len(), self.cursor)
    }

    pub fn item_statuses(&self) -> Vec<ItemStatus> {
        progress::item_statuses(self.sequence.len(), self.cursor)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let activity = self
            .current_activity()
            .or_else(|| self.sequence.activities().last());
        Event::StateSnapshot {
            state: self.state,
            activity_index: self.cursor,
            kind: activity.map(|a| a.kind).unwrap_or(ActivityKind::Other),
            title: activity.map(|a| a.title.clone()).unwrap_or_default(),
            remaining_secs: self.timer.remaining_secs(),
            total_secs: self.timer.duration_secs(),
            percent_complete: self.progress().percent_complete,
            statuses: self.item_statuses(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin playback at the first activity.
    ///
    /// Returns `Ok(None)` when the session is already underway (running or
    /// paused) and `AlreadyComplete` after the terminal state.
    pub fn start(&mut self) -> Result<Option<Event>, SessionError> {
        match self.state {
            SessionState::Complete => Err(SessionError::AlreadyComplete),
            SessionState::Running | SessionState::Paused => Ok(None),
            SessionState::Idle => {
                self.state = SessionState::Running;
                self.started_at = Some(Utc::now());
                self.last_sync_epoch_ms = Some(now_ms());
                let Some(activity) = self.sequence.get(self.cursor) else {
                    return Ok(None);
                };
                Ok(Some(Event::SessionStarted {
                    activity_index: self.cursor,
                    kind: activity.kind,
                    duration_secs: activity.duration_secs,
                    at: Utc::now(),
                }))
            }
        }
    }

    /// Count down one whole second. Only ticks while running.
    ///
    /// When the current phase's remaining time reaches zero the cursor
    /// auto-advances; the final phase yields the `SessionCompleted`
    /// notification instead of a `PhaseCompleted`.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != SessionState::Running {
            return None;
        }
        // A zero-duration phase expires without consuming a second.
        let consumed = self.timer.remaining_secs() > 0;
        match self.timer.tick() {
            Tick::Remaining(_) => {
                self.elapsed_secs += 1;
                None
            }
            Tick::Expired => {
                if consumed {
                    self.elapsed_secs += 1;
                }
                let finished = self.cursor;
                let kind = self
                    .current_activity()
                    .map(|a| a.kind)
                    .unwrap_or(ActivityKind::Other);
                self.advance_cursor();
                if self.cursor == self.sequence.len() {
                    Some(self.finish())
                } else {
                    Some(Event::PhaseCompleted {
                        activity_index: finished,
                        kind,
                        at: Utc::now(),
                    })
                }
            }
        }
    }

    /// Manual skip past the current activity.
    pub fn advance(&mut self) -> Result<Event, SessionError> {
        if self.state == SessionState::Complete {
            return Err(SessionError::AlreadyComplete);
        }
        let from = self.cursor;
        self.advance_cursor();
        if self.cursor == self.sequence.len() {
            Ok(self.finish())
        } else {
            Ok(Event::PhaseSkipped {
                from_index: from,
                to_index: self.cursor,
                at: Utc::now(),
            })
        }
    }

    /// Jump back to an already-seen activity.
    ///
    /// Only indices at or before the cursor are allowed: skipping ahead
    /// past unseen content would bypass the safety-oriented phases of an
    /// emergency preset.
    pub fn jump_to(&mut self, index: usize) -> Result<Event, SessionError> {
        if self.state == SessionState::Complete {
            return Err(SessionError::AlreadyComplete);
        }
        if index >= self.sequence.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: self.sequence.len(),
            });
        }
        if index > self.cursor {
            return Err(SessionError::IndexUnseen {
                index,
                cursor: self.cursor,
            });
        }
        let from = self.cursor;
        self.cursor = index;
        let duration = self.sequence.get(index).map(|a| a.duration_secs).unwrap_or(0);
        self.timer.reload(duration);
        Ok(Event::JumpedBack {
            from_index: from,
            to_index: index,
            at: Utc::now(),
        })
    }

    /// Suspend the countdown without altering the cursor. No-op unless
    /// running; pausing then resuming preserves remaining time exactly.
    pub fn pause(&mut self) -> Option<Event> {
        if self.state != SessionState::Running {
            return None;
        }
        self.state = SessionState::Paused;
        self.last_sync_epoch_ms = None;
        Some(Event::SessionPaused {
            remaining_secs: self.timer.remaining_secs(),
            at: Utc::now(),
        })
    }

    /// Resume a paused countdown. No-op unless paused.
    pub fn resume(&mut self) -> Option<Event> {
        if self.state != SessionState::Paused {
            return None;
        }
        self.state = SessionState::Running;
        self.last_sync_epoch_ms = Some(now_ms());
        Some(Event::SessionResumed {
            remaining_secs: self.timer.remaining_secs(),
            at: Utc::now(),
        })
    }

    /// Replay from the top: cursor back to 0, timer reloaded, running.
    /// Accepted from any state, including `Complete`.
    pub fn reset(&mut self) -> Event {
        self.cursor = 0;
        self.timer
            .reload(self.sequence.get(0).map(|a| a.duration_secs).unwrap_or(0));
        self.elapsed_secs = 0;
        self.state = SessionState::Running;
        self.started_at = Some(Utc::now());
        self.last_sync_epoch_ms = Some(now_ms());
        Event::SessionReset { at: Utc::now() }
    }

    /// Wall-clock catch-up for detached callers (CLI invocations separated
    /// in time). Applies the whole seconds elapsed since the last sync as
    /// ticks, advancing through as many phases as that covers, and returns
    /// the events produced along the way.
    pub fn sync(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.state != SessionState::Running {
            return events;
        }
        let now = now_ms();
        let last = match self.last_sync_epoch_ms {
            Some(v) => v,
            None => {
                self.last_sync_epoch_ms = Some(now);
                return events;
            }
        };
        let whole_secs = now.saturating_sub(last) / 1000;
        // Keep the sub-second remainder for the next sync.
        self.last_sync_epoch_ms = Some(last + whole_secs * 1000);
        for _ in 0..whole_secs {
            if self.state != SessionState::Running {
                break;
            }
            if let Some(event) = self.tick() {
                events.push(event);
            }
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance_cursor(&mut self) {
        self.cursor += 1;
        if let Some(next) = self.sequence.get(self.cursor) {
            self.timer.reload(next.duration_secs);
        }
    }

    fn finish(&mut self) -> Event {
        self.state = SessionState::Complete;
        self.last_sync_epoch_ms = None;
        self.timer.reload(0);
        Event::SessionCompleted {
            sequence_id: self.sequence.id().to_string(),
            duration_actual_secs: self.elapsed_secs,
            at: Utc::now(),
        }
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityPayload, Tone};

    fn sequence(durations: &[u64]) -> Sequence {
        let activities = durations
            .iter()
            .enumerate()
            .map(|(i, &duration_secs)| Activity {
                id: format!("a{i}"),
                kind: ActivityKind::Focus,
                title: format!("Activity {i}"),
                description: String::new(),
                duration_secs,
                tone: Tone::Neutral,
                payload: ActivityPayload::None,
            })
            .collect();
        Sequence::new("seq", "Test", activities).unwrap()
    }

    fn running(durations: &[u64]) -> SessionController {
        let mut ctrl = SessionController::new(sequence(durations));
        ctrl.start().unwrap();
        ctrl
    }

    #[test]
    fn start_pause_resume() {
        let mut ctrl = SessionController::new(sequence(&[30]));
        assert_eq!(ctrl.state(), SessionState::Idle);

        assert!(ctrl.start().unwrap().is_some());
        assert_eq!(ctrl.state(), SessionState::Running);
        // Starting an already-running session is a no-op.
        assert!(ctrl.start().unwrap().is_none());

        assert!(ctrl.pause().is_some());
        assert_eq!(ctrl.state(), SessionState::Paused);
        assert!(ctrl.pause().is_none());

        assert!(ctrl.resume().is_some());
        assert_eq!(ctrl.state(), SessionState::Running);
        assert!(ctrl.resume().is_none());
    }

    #[test]
    fn pause_preserves_remaining_exactly() {
        let mut ctrl = running(&[30]);
        for _ in 0..10 {
            ctrl.tick();
        }
        assert_eq!(ctrl.remaining_secs(), 20);
        ctrl.pause();
        assert!(ctrl.tick().is_none());
        assert_eq!(ctrl.remaining_secs(), 20);
        ctrl.resume();
        assert_eq!(ctrl.remaining_secs(), 20);
    }

    #[test]
    fn n_advances_reach_complete_and_no_further() {
        let mut ctrl = running(&[30, 45, 30]);
        ctrl.advance().unwrap();
        ctrl.advance().unwrap();
        let last = ctrl.advance().unwrap();
        assert!(matches!(last, Event::SessionCompleted { .. }));
        assert_eq!(ctrl.state(), SessionState::Complete);
        assert!(matches!(
            ctrl.advance(),
            Err(SessionError::AlreadyComplete)
        ));
    }

    #[test]
    fn panic_attack_opening_ticks_through() {
        // The "Panic Attack" preset's first three phases: 30s, 45s, 30s.
        let mut ctrl = running(&[30, 45, 30]);
        assert_eq!(ctrl.cursor(), 0);

        for _ in 0..29 {
            assert!(ctrl.tick().is_none());
        }
        let event = ctrl.tick().unwrap();
        assert!(matches!(event, Event::PhaseCompleted { activity_index: 0, .. }));
        assert_eq!(ctrl.cursor(), 1);
        assert!((ctrl.progress().percent_complete - 33.333).abs() < 0.01);
        assert_eq!(ctrl.remaining_secs(), 45);

        for _ in 0..45 {
            ctrl.tick();
        }
        assert_eq!(ctrl.cursor(), 2);

        for _ in 0..29 {
            ctrl.tick();
        }
        let last = ctrl.tick().unwrap();
        match last {
            Event::SessionCompleted {
                duration_actual_secs,
                ..
            } => assert_eq!(duration_actual_secs, 105),
            other => panic!("expected SessionCompleted, got {other:?}"),
        }
        assert_eq!(ctrl.state(), SessionState::Complete);
        assert_eq!(ctrl.progress().percent_complete, 100.0);
    }

    #[test]
    fn zero_duration_phase_expires_on_next_tick() {
        let mut ctrl = running(&[0, 10]);
        let event = ctrl.tick().unwrap();
        assert!(matches!(event, Event::PhaseCompleted { activity_index: 0, .. }));
        assert_eq!(ctrl.cursor(), 1);
        assert_eq!(ctrl.remaining_secs(), 10);
        // The zero-duration phase consumed no time.
        assert_eq!(ctrl.elapsed_secs(), 0);
    }

    #[test]
    fn jump_back_allowed_ahead_rejected() {
        let mut ctrl = running(&[10, 10, 10]);
        assert!(matches!(
            ctrl.jump_to(1),
            Err(SessionError::IndexUnseen { index: 1, cursor: 0 })
        ));
        ctrl.advance().unwrap();
        ctrl.advance().unwrap();
        assert_eq!(ctrl.cursor(), 2);

        let event = ctrl.jump_to(0).unwrap();
        assert!(matches!(event, Event::JumpedBack { from_index: 2, to_index: 0, .. }));
        assert_eq!(ctrl.cursor(), 0);
        assert_eq!(ctrl.remaining_secs(), 10);

        assert!(matches!(
            ctrl.jump_to(5),
            Err(SessionError::IndexOutOfRange { index: 5, len: 3 })
        ));
    }

    #[test]
    fn jump_to_cursor_restarts_current_phase() {
        let mut ctrl = running(&[10]);
        for _ in 0..4 {
            ctrl.tick();
        }
        assert_eq!(ctrl.remaining_secs(), 6);
        ctrl.jump_to(0).unwrap();
        assert_eq!(ctrl.remaining_secs(), 10);
    }

    #[test]
    fn reset_replays_from_the_top() {
        let mut ctrl = running(&[5, 5]);
        ctrl.advance().unwrap();
        ctrl.advance().unwrap();
        assert_eq!(ctrl.state(), SessionState::Complete);

        let event = ctrl.reset();
        assert!(matches!(event, Event::SessionReset { .. }));
        assert_eq!(ctrl.state(), SessionState::Running);
        assert_eq!(ctrl.cursor(), 0);
        assert_eq!(ctrl.remaining_secs(), 5);
        assert_eq!(ctrl.elapsed_secs(), 0);
    }

    #[test]
    fn elapsed_excludes_paused_time() {
        let mut ctrl = running(&[30]);
        for _ in 0..5 {
            ctrl.tick();
        }
        ctrl.pause();
        ctrl.tick();
        ctrl.tick();
        ctrl.resume();
        ctrl.tick();
        assert_eq!(ctrl.elapsed_secs(), 6);
    }

    #[test]
    fn skipped_phase_contributes_only_time_spent() {
        let mut ctrl = running(&[30, 45]);
        for _ in 0..10 {
            ctrl.tick();
        }
        ctrl.advance().unwrap();
        let last = ctrl.advance().unwrap();
        match last {
            Event::SessionCompleted {
                duration_actual_secs,
                ..
            } => assert_eq!(duration_actual_secs, 10),
            other => panic!("expected SessionCompleted, got {other:?}"),
        }
    }

    #[test]
    fn snapshot_reflects_current_activity() {
        let ctrl = running(&[30, 45]);
        match ctrl.snapshot() {
            Event::StateSnapshot {
                state,
                activity_index,
                remaining_secs,
                percent_complete,
                statuses,
                ..
            } => {
                assert_eq!(state, SessionState::Running);
                assert_eq!(activity_index, 0);
                assert_eq!(remaining_secs, 30);
                assert_eq!(percent_complete, 0.0);
                assert_eq!(statuses.len(), 2);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn controller_round_trips_through_serde() {
        let mut ctrl = running(&[30, 45]);
        for _ in 0..3 {
            ctrl.tick();
        }
        let json = serde_json::to_string(&ctrl).unwrap();
        let restored: SessionController = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.state(), SessionState::Running);
        assert_eq!(restored.cursor(), 0);
        assert_eq!(restored.remaining_secs(), 27);
        assert_eq!(restored.elapsed_secs(), 3);
    }
}
