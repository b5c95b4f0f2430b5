use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every countdown state change of interest produces an Event.
/// The presentation layer renders them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    CountdownStarted {
        phase: Phase,
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    CountdownStopped {
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    /// A countdown reached zero, by ticking or while suspended.
    PhaseCompleted {
        finished: Phase,
        entered: Phase,
        completed_work_cycles: u32,
        at: DateTime<Utc>,
    },
    /// Remaining time reconciled against the wall clock after a suspension.
    CountdownResumed {
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
}
