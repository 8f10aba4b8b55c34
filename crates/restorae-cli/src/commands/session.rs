use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::Subcommand;
use restorae_core::adapter::{ritual_from_program_day, sequence_from_preset};
use restorae_core::session::{SessionController, SessionRunner};
use restorae_core::storage::{Config, Database};
use restorae_core::{presets, Event, ProgramDay};
use tokio::sync::{mpsc, Mutex};

const CONTROLLER_KEY: &str = "session_controller";

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a session from an SOS preset or a ritual file
    Start {
        /// Preset id (defaults to the configured default preset)
        preset: Option<String>,
        /// Build a ritual from a program-day JSON file instead
        #[arg(long, conflicts_with = "preset")]
        ritual: Option<PathBuf>,
    },
    /// Pause the running session
    Pause,
    /// Resume a paused session
    Resume,
    /// Skip past the current activity
    Skip,
    /// Jump back to an already-seen activity
    Jump {
        /// 0-based activity index at or before the current one
        index: usize,
    },
    /// Replay the session from the first activity
    Reset,
    /// Print the current session state as JSON
    Status,
    /// Drive the session in real time until it completes
    Watch,
}

fn load_controller(db: &Database) -> Option<SessionController> {
    let json = db.kv_get(CONTROLLER_KEY).ok()??;
    serde_json::from_str(&json).ok()
}

fn save_controller(
    db: &Database,
    ctrl: &SessionController,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(ctrl)?;
    db.kv_set(CONTROLLER_KEY, &json)?;
    Ok(())
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

/// Record a finished session and clear the persisted controller.
fn finalize(db: &Database, ctrl: &SessionController) -> Result<(), Box<dyn std::error::Error>> {
    let sequence = ctrl.sequence();
    let source = if presets::find_preset(sequence.id()).is_some() {
        "preset"
    } else {
        "ritual"
    };
    db.record_session(
        sequence.id(),
        sequence.title(),
        source,
        sequence.total_duration_secs(),
        ctrl.elapsed_secs(),
        ctrl.started_at().unwrap_or_else(Utc::now),
        Utc::now(),
    )?;
    db.kv_delete(CONTROLLER_KEY)?;
    Ok(())
}

/// Catch up on wall-clock time, printing whatever happened meanwhile.
/// Returns true when the catch-up completed (and finalized) the session.
fn sync_and_settle(
    db: &Database,
    ctrl: &mut SessionController,
) -> Result<bool, Box<dyn std::error::Error>> {
    for event in ctrl.sync() {
        print_event(&event)?;
    }
    if ctrl.is_complete() {
        finalize(db, ctrl)?;
        return Ok(true);
    }
    Ok(false)
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        SessionAction::Start { preset, ritual } => {
            if let Some(existing) = load_controller(&db) {
                if !existing.is_complete() {
                    return Err(
                        "a session is already in progress (resume, watch, or reset it)".into(),
                    );
                }
            }
            let sequence = match ritual {
                Some(path) => {
                    let content = std::fs::read_to_string(&path)?;
                    let day: ProgramDay = serde_json::from_str(&content)?;
                    ritual_from_program_day(&day)?
                }
                None => {
                    let id = preset
                        .unwrap_or_else(|| Config::load_or_default().session.default_preset);
                    let preset = presets::find_preset(&id)
                        .ok_or_else(|| format!("unknown preset: {id}"))?;
                    sequence_from_preset(&preset)?
                }
            };
            let mut ctrl = SessionController::new(sequence);
            if let Some(event) = ctrl.start()? {
                print_event(&event)?;
            }
            save_controller(&db, &ctrl)?;
        }
        SessionAction::Pause => {
            let mut ctrl = load_controller(&db).ok_or("no active session")?;
            if sync_and_settle(&db, &mut ctrl)? {
                return Ok(());
            }
            match ctrl.pause() {
                Some(event) => print_event(&event)?,
                None => print_event(&ctrl.snapshot())?,
            }
            save_controller(&db, &ctrl)?;
        }
        SessionAction::Resume => {
            let mut ctrl = load_controller(&db).ok_or("no active session")?;
            match ctrl.resume() {
                Some(event) => print_event(&event)?,
                None => print_event(&ctrl.snapshot())?,
            }
            save_controller(&db, &ctrl)?;
        }
        SessionAction::Skip => {
            let mut ctrl = load_controller(&db).ok_or("no active session")?;
            if sync_and_settle(&db, &mut ctrl)? {
                return Ok(());
            }
            let event = ctrl.advance()?;
            print_event(&event)?;
            if ctrl.is_complete() {
                finalize(&db, &ctrl)?;
            } else {
                save_controller(&db, &ctrl)?;
            }
        }
        SessionAction::Jump { index } => {
            let mut ctrl = load_controller(&db).ok_or("no active session")?;
            if sync_and_settle(&db, &mut ctrl)? {
                return Ok(());
            }
            let event = ctrl.jump_to(index)?;
            print_event(&event)?;
            save_controller(&db, &ctrl)?;
        }
        SessionAction::Reset => {
            let mut ctrl = load_controller(&db).ok_or("no active session")?;
            let event = ctrl.reset();
            print_event(&event)?;
            save_controller(&db, &ctrl)?;
        }
        SessionAction::Status => {
            let Some(mut ctrl) = load_controller(&db) else {
                println!("{{\"active\": false}}");
                return Ok(());
            };
            let finished = sync_and_settle(&db, &mut ctrl)?;
            print_event(&ctrl.snapshot())?;
            if !finished {
                save_controller(&db, &ctrl)?;
            }
        }
        SessionAction::Watch => {
            let mut ctrl = load_controller(&db).ok_or("no active session (start one first)")?;
            if sync_and_settle(&db, &mut ctrl)? {
                return Ok(());
            }
            let ctrl = watch(ctrl)?;
            if ctrl.is_complete() {
                finalize(&db, &ctrl)?;
            } else {
                save_controller(&db, &ctrl)?;
            }
        }
    }

    Ok(())
}

/// Drive the session at 1 Hz until completion, printing events as they
/// happen. The runner aborts its pending tick when it is dropped.
fn watch(ctrl: SessionController) -> Result<SessionController, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let shared = Arc::new(Mutex::new(ctrl));
        let mut runner = SessionRunner::new(shared.clone());
        let (tx, mut rx) = mpsc::unbounded_channel();
        runner.start(tx).await?;

        while let Some(event) = rx.recv().await {
            let done = matches!(event, Event::SessionCompleted { .. });
            print_event(&event)?;
            if done {
                break;
            }
        }

        drop(runner);
        let ctrl = shared.lock().await.clone();
        Ok(ctrl)
    })
}
