//! Pomodoro phase rules.
//!
//! Pure data and a pure transition function -- no I/O, no clock, no
//! timers. The countdown controller decides *when* a phase is over and
//! calls [`EngineState::advance_phase`]; this module only decides what
//! comes next.
//!
//! ## Transitions
//!
//! ```text
//! Work -> ShortBreak -> Work -> ... -> Work -> LongBreak -> Work
//! ```
//!
//! Work flows into a short break until [`WORK_CYCLES_PER_LONG_BREAK`]
//! work phases have completed, then into the long one. The cycle count
//! grows on leaving a short break and resets on leaving the long break.

use serde::{Deserialize, Serialize};

/// Completed work phases before the next break is a long one.
pub const WORK_CYCLES_PER_LONG_BREAK: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    /// Fixed phase length in seconds.
    pub fn duration_secs(self) -> u64 {
        match self {
            Phase::Work => 25 * 60,
            Phase::ShortBreak => 5 * 60,
            Phase::LongBreak => 15 * 60,
        }
    }

    /// Human-readable display name.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

/// Full session snapshot.
///
/// One instance per session, created with [`EngineState::initial`] and
/// mutated only through [`EngineState::advance_phase`] and the countdown
/// controller. Serializable so a host can carry it across a suspension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    pub phase: Phase,
    /// Phase the engine will enter when the current one completes.
    /// Precomputed so the presentation layer can preview it.
    pub next_phase: Phase,
    /// Completed work phases since the last long break.
    pub completed_work_cycles: u32,
    /// Countdown value for the current phase. Never negative.
    pub seconds_remaining: u64,
    /// Whether a countdown is actively ticking.
    pub running: bool,
    /// Expected finish time (seconds since epoch). Recorded when the host
    /// suspends mid-countdown, consumed on resume, `None` otherwise.
    #[serde(default)]
    pub scheduled_finish_epoch: Option<u64>,
}

impl EngineState {
    /// The session-start snapshot: a full work phase, not yet running.
    pub fn initial() -> Self {
        Self {
            phase: Phase::Work,
            next_phase: next_after(Phase::Work, 0),
            completed_work_cycles: 0,
            seconds_remaining: Phase::Work.duration_secs(),
            running: false,
            scheduled_finish_epoch: None,
        }
    }

    /// Apply one phase transition. Total over every input.
    ///
    /// `running` and `scheduled_finish_epoch` are left untouched; whether
    /// the next phase starts ticking is the caller's decision.
    #[must_use]
    pub fn advance_phase(self) -> Self {
        let (phase, completed_work_cycles) = step(self.phase, self.completed_work_cycles);
        Self {
            phase,
            next_phase: next_after(phase, completed_work_cycles),
            completed_work_cycles,
            seconds_remaining: phase.duration_secs(),
            ..self
        }
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::initial()
    }
}

/// One row of the transition table: `(phase, cycles)` in, `(phase, cycles)` out.
fn step(phase: Phase, cycles: u32) -> (Phase, u32) {
    match phase {
        Phase::Work if cycles >= WORK_CYCLES_PER_LONG_BREAK - 1 => (Phase::LongBreak, cycles),
        Phase::Work => (Phase::ShortBreak, cycles),
        Phase::ShortBreak => (Phase::Work, cycles + 1),
        Phase::LongBreak => (Phase::Work, 0),
    }
}

/// The phase a transition from `(phase, cycles)` would land in.
pub(crate) fn next_after(phase: Phase, cycles: u32) -> Phase {
    step(phase, cycles).0
}
