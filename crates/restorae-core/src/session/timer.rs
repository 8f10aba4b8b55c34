use serde::{Deserialize, Serialize};

/// Outcome of a single countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Seconds still remaining after the tick.
    Remaining(u64),
    /// The phase's time is up.
    Expired,
}

/// Countdown for the active phase, in whole seconds.
///
/// Pure state, no threads and no clock: the owner calls [`PhaseTimer::tick`]
/// once per elapsed second. Remaining time never goes below zero; a
/// zero-duration phase expires on the very first tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTimer {
    duration_secs: u64,
    remaining_secs: u64,
}

impl PhaseTimer {
    pub fn new(duration_secs: u64) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
        }
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_secs == 0
    }

    /// Count down one whole second.
    pub fn tick(&mut self) -> Tick {
        if self.remaining_secs == 0 {
            return Tick::Expired;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            Tick::Expired
        } else {
            Tick::Remaining(self.remaining_secs)
        }
    }

    /// Load the timer for a new phase.
    pub fn reload(&mut self, duration_secs: u64) {
        self.duration_secs = duration_secs;
        self.remaining_secs = duration_secs;
    }
}
