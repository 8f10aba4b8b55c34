//! # Restorae Core Library
//!
//! This library provides the core business logic for Restorae guided
//! wellness sessions. It implements a CLI-first philosophy where all
//! operations are available via a standalone CLI binary, with any GUI shell
//! being a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Session Controller**: a caller-driven state machine that requires the
//!   caller to invoke `tick()` once per second (or `sync()` after a gap) for
//!   progress
//! - **Session Runner**: a tokio task driving the controller at 1 Hz, with
//!   the pending tick aborted on pause/stop
//! - **Presets & Adapter**: static SOS preset content and the conversion of
//!   authored content into playable sequences
//! - **Storage**: SQLite session history and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`SessionController`]: core session state machine
//! - [`SessionRunner`]: scheduled tick driver
//! - [`Database`]: session history and CLI state persistence
//! - [`Config`]: application configuration management

pub mod activity;
pub mod adapter;
pub mod error;
pub mod events;
pub mod presets;
pub mod sequence;
pub mod session;
pub mod storage;

pub use activity::{
    Activity, ActivityKind, ActivityPayload, BreathingPattern, Phase, PhaseRole, Tone,
};
pub use adapter::{ActivityDef, ProgramDay};
pub use error::{ConfigError, CoreError, DatabaseError, Result, SessionError};
pub use events::Event;
pub use presets::SosPreset;
pub use sequence::Sequence;
pub use session::{
    ItemStatus, PhaseTimer, Progress, SessionController, SessionRunner, SessionState, Tick,
};
pub use storage::{Config, Database, SessionRecord, Stats};
