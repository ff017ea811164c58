//! Pomodoro focus timer.
//!
//! # Responsibility
//! - Model the single-flight countdown (`pomodoro`).
//! - Log completed intervals and notify on completion (`session`).
//!
//! # Invariants
//! - At most one tick source is active at a time.
//! - A completed interval is logged exactly once.

pub mod pomodoro;
pub mod session;

pub use pomodoro::{
    format_readout, ControlSurface, FocusTimer, StartOutcome, TickOutcome, TimerState,
    FOCUS_BUDGET_SECS,
};
pub use session::{FocusSession, SilentTone, ToneError, TonePlayer};
