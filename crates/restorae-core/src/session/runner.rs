//! Scheduled tick driver.
//!
//! Drives a [`SessionController`] at a fixed one-second cadence on a tokio
//! task. Pausing or stopping aborts the pending tick task, so a stale
//! callback can never resurrect a session that has ended -- the one
//! correctness-sensitive cleanup contract in the core.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time;

use super::controller::{SessionController, SessionState};
use crate::error::SessionError;
use crate::events::Event;

pub struct SessionRunner {
    controller: Arc<Mutex<SessionController>>,
    ticker: Option<JoinHandle<()>>,
    tick_interval: Duration,
}

impl SessionRunner {
    pub fn new(controller: Arc<Mutex<SessionController>>) -> Self {
        Self::with_interval(controller, Duration::from_secs(1))
    }

    /// Shorter intervals are useful in tests; production playback is 1 Hz.
    pub fn with_interval(controller: Arc<Mutex<SessionController>>, tick_interval: Duration) -> Self {
        Self {
            controller,
            ticker: None,
            tick_interval,
        }
    }

    pub fn controller(&self) -> Arc<Mutex<SessionController>> {
        self.controller.clone()
    }

    /// Begin (or continue) playback and spawn the ticker.
    ///
    /// An idle controller is started, a paused one resumed, a running one
    /// left as-is. Fails with `AlreadyComplete` after the terminal state.
    pub async fn start(&mut self, events: UnboundedSender<Event>) -> Result<(), SessionError> {
        {
            let mut ctrl = self.controller.lock().await;
            match ctrl.state() {
                SessionState::Complete => return Err(SessionError::AlreadyComplete),
                SessionState::Idle => {
                    if let Some(event) = ctrl.start()? {
                        let _ = events.send(event);
                    }
                }
                SessionState::Paused => {
                    if let Some(event) = ctrl.resume() {
                        let _ = events.send(event);
                    }
                }
                SessionState::Running => {}
            }
        }
        self.spawn_ticker(events);
        Ok(())
    }

    /// Pause playback. The pending tick is aborted before the controller
    /// state changes, so no tick lands on a paused session.
    pub async fn pause(&mut self) -> Option<Event> {
        self.cancel_ticker();
        self.controller.lock().await.pause()
    }

    /// Stop driving ticks without touching controller state.
    pub fn cancel_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }

    fn spawn_ticker(&mut self, events: UnboundedSender<Event>) {
        self.cancel_ticker();
        let controller = self.controller.clone();
        let tick_interval = self.tick_interval;
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            // The first interval tick fires immediately; skip it so the
            // opening phase gets its full duration.
            interval.tick().await;
            loop {
                interval.tick().await;
                let mut ctrl = controller.lock().await;
                if ctrl.state() != SessionState::Running {
                    break;
                }
                if let Some(event) = ctrl.tick() {
                    let done = matches!(event, Event::SessionCompleted { .. });
                    let _ = events.send(event);
                    if done {
                        break;
                    }
                }
            }
        });
        self.ticker = Some(handle);
    }
}

impl Drop for SessionRunner {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}
