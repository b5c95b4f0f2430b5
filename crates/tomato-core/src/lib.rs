//! # Tomato Core Library
//!
//! This library provides the core logic for the tomato Pomodoro timer: a
//! pure phase-transition engine and a suspend/resume-aware countdown
//! controller. Presentation layers (terminal, GUI) are thin shells over
//! this crate.
//!
//! ## Architecture
//!
//! - **Engine**: pure transition rules over [`EngineState`] -- no I/O,
//!   no clock, no timers
//! - **Countdown**: a wall-clock-based controller that requires the host
//!   to invoke `tick()` at ~1 Hz and to forward suspend/resume lifecycle
//!   signals; remaining time is always re-derived from absolute
//!   timestamps so suspension gaps cannot corrupt the countdown
//! - **Config**: TOML-based presentation preferences
//!
//! ## Key Components
//!
//! - [`EngineState`]: full session snapshot with pure transition rules
//! - [`CountdownController`]: tick-driven countdown state machine
//! - [`Notifier`] / [`Presenter`]: seams to the host environment
//! - [`Config`]: application configuration management

pub mod config;
pub mod error;
pub mod events;
pub mod timer;

pub use config::Config;
pub use error::{ConfigError, CoreError, NotifyError};
pub use events::Event;
pub use timer::{
    CountdownController, EngineState, Notifier, NullNotifier, NullPresenter, Phase, Presenter,
    COMPLETION_ALARM_ID, WORK_CYCLES_PER_LONG_BREAK,
};
