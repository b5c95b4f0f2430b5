//! Countdown controller implementation.
//!
//! The controller is a wall-clock-based state machine. It does not own
//! timers or threads -- the host invokes `tick()` at ~1 Hz while running
//! and forwards suspend/resume lifecycle signals. Whether a phase has
//! finished is always re-derived from absolute timestamps, never from a
//! tick count, because suspension can put arbitrarily large real-time
//! gaps between ticks.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Idle | Suspended) -> Running
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = CountdownController::new(notifier, presenter);
//! controller.start();
//! // In a host-owned ~1 Hz loop:
//! controller.tick(); // Returns Some(Event) when the phase completes
//! ```

use chrono::Utc;

use super::engine::{EngineState, Phase};
use super::hooks::{Notifier, Presenter, COMPLETION_ALARM_ID};
use crate::events::Event;

/// Drives one ticking countdown and reconciles it against wall-clock time
/// across suspension. Owns the session's [`EngineState`].
#[derive(Debug)]
pub struct CountdownController<N: Notifier, P: Presenter> {
    state: EngineState,
    notifier: N,
    presenter: P,
}

impl<N: Notifier, P: Presenter> CountdownController<N, P> {
    /// Create a controller at the session-start snapshot.
    pub fn new(notifier: N, presenter: P) -> Self {
        Self {
            state: EngineState::initial(),
            notifier,
            presenter,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Re-render without changing state. For host-initiated redraws,
    /// e.g. when the screen first appears.
    pub fn redraw(&mut self) {
        self.presenter.render(&self.state);
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin ticking the current phase and arm the completion alarm.
    /// No-op when already running.
    pub fn start(&mut self) -> Option<Event> {
        if self.state.running {
            return None;
        }
        self.state.running = true;
        self.arm_alarm(self.state.seconds_remaining);
        let event = Event::CountdownStarted {
            phase: self.state.phase,
            seconds_remaining: self.state.seconds_remaining,
            at: Utc::now(),
        };
        self.presenter.render(&self.state);
        Some(event)
    }

    /// Halt the countdown and cancel the pending alarm. Leaves
    /// `seconds_remaining` and the phase untouched. No-op when idle.
    ///
    /// After this returns no alarm is pending.
    pub fn stop(&mut self) -> Option<Event> {
        if !self.state.running {
            return None;
        }
        self.notifier.cancel(COMPLETION_ALARM_ID);
        self.state.running = false;
        let event = Event::CountdownStopped {
            seconds_remaining: self.state.seconds_remaining,
            at: Utc::now(),
        };
        self.presenter.render(&self.state);
        Some(event)
    }

    /// Host-driven, ~1 Hz while running. Counts down one second, clamped
    /// at zero; returns the completion event when the phase finishes.
    ///
    /// On completion the controller advances the phase and halts -- the
    /// user restarts the next phase manually.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.running {
            return None;
        }
        self.state.seconds_remaining = self.state.seconds_remaining.saturating_sub(1);
        if self.state.seconds_remaining > 0 {
            self.presenter.render(&self.state);
            return None;
        }
        Some(self.complete_phase(false))
    }

    /// Record the expected finish time before the host pauses the
    /// process. The host stops delivering ticks itself; there is no local
    /// timer to release. No-op when idle.
    pub fn on_suspend(&mut self) {
        self.on_suspend_at(now_secs());
    }

    pub fn on_suspend_at(&mut self, now_epoch_secs: u64) {
        if self.state.running {
            self.state.scheduled_finish_epoch =
                Some(now_epoch_secs + self.state.seconds_remaining);
        }
    }

    /// Reconcile the countdown against wall-clock time after the host
    /// wakes the process.
    ///
    /// Without a recorded finish time this is a no-op beyond a redraw, so
    /// a resume that never saw a suspension is harmless. If the finish
    /// time has passed, the phase completed while suspended: advance and
    /// keep ticking into the next phase. Otherwise the remaining seconds
    /// are recomputed from the finish time and the alarm is re-armed.
    pub fn on_resume(&mut self) -> Option<Event> {
        self.on_resume_at(now_secs())
    }

    pub fn on_resume_at(&mut self, now_epoch_secs: u64) -> Option<Event> {
        let Some(finish) = self.state.scheduled_finish_epoch.take() else {
            self.presenter.render(&self.state);
            return None;
        };
        if now_epoch_secs >= finish {
            return Some(self.complete_phase(true));
        }
        self.state.seconds_remaining = finish - now_epoch_secs;
        self.arm_alarm(self.state.seconds_remaining);
        let event = Event::CountdownResumed {
            seconds_remaining: self.state.seconds_remaining,
            at: Utc::now(),
        };
        self.presenter.render(&self.state);
        Some(event)
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// The phase hit zero: cancel the stale alarm, signal the presenter,
    /// advance, and either halt for a manual restart (tick expiry) or
    /// keep running (resume reconciliation).
    fn complete_phase(&mut self, keep_running: bool) -> Event {
        self.notifier.cancel(COMPLETION_ALARM_ID);
        let finished = self.state.phase;
        self.state = self.state.advance_phase();
        self.state.running = keep_running;
        if keep_running {
            self.arm_alarm(self.state.seconds_remaining);
        }
        let event = Event::PhaseCompleted {
            finished,
            entered: self.state.phase,
            completed_work_cycles: self.state.completed_work_cycles,
            at: Utc::now(),
        };
        self.presenter.phase_completed(finished, &self.state);
        self.presenter.render(&self.state);
        event
    }

    /// Cancel-then-request keeps at most one alarm pending. A failed
    /// request is surfaced and otherwise ignored; the on-screen countdown
    /// stays authoritative.
    fn arm_alarm(&mut self, fire_in_secs: u64) {
        self.notifier.cancel(COMPLETION_ALARM_ID);
        let title = format!("{} finished!", self.state.phase.label());
        if let Err(e) = self
            .notifier
            .request(&title, fire_in_secs, COMPLETION_ALARM_ID)
        {
            self.presenter.notification_failed(&e.to_string());
        }
    }
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotifyError;

    #[derive(Default)]
    struct RecordingNotifier {
        requests: Vec<(String, u64)>,
        cancels: usize,
        pending: Vec<String>,
        fail: bool,
    }

    impl Notifier for RecordingNotifier {
        fn request(
            &mut self,
            title: &str,
            fire_in_secs: u64,
            id: &str,
        ) -> Result<(), NotifyError> {
            if self.fail {
                return Err(NotifyError::Unavailable);
            }
            self.requests.push((title.to_string(), fire_in_secs));
            self.pending.push(id.to_string());
            Ok(())
        }

        fn cancel(&mut self, id: &str) {
            self.cancels += 1;
            self.pending.retain(|p| p != id);
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        renders: usize,
        completions: Vec<Phase>,
        failures: Vec<String>,
    }

    impl Presenter for RecordingPresenter {
        fn render(&mut self, _state: &EngineState) {
            self.renders += 1;
        }

        fn phase_completed(&mut self, finished: Phase, _state: &EngineState) {
            self.completions.push(finished);
        }

        fn notification_failed(&mut self, message: &str) {
            self.failures.push(message.to_string());
        }
    }

    fn controller() -> CountdownController<RecordingNotifier, RecordingPresenter> {
        CountdownController::new(RecordingNotifier::default(), RecordingPresenter::default())
    }

    #[test]
    fn start_arms_one_alarm_for_remaining_time() {
        let mut c = controller();
        let event = c.start();
        assert!(matches!(event, Some(Event::CountdownStarted { .. })));
        assert!(c.state().running);
        assert_eq!(c.notifier().pending, vec![COMPLETION_ALARM_ID]);
        assert_eq!(
            c.notifier().requests,
            vec![("Work finished!".to_string(), 25 * 60)]
        );
    }

    #[test]
    fn start_when_running_is_noop() {
        let mut c = controller();
        c.start();
        assert!(c.start().is_none());
        assert_eq!(c.notifier().requests.len(), 1);
    }

    #[test]
    fn stop_leaves_no_pending_alarm() {
        let mut c = controller();
        c.start();
        let event = c.stop();
        assert!(matches!(event, Some(Event::CountdownStopped { .. })));
        assert!(!c.state().running);
        assert_eq!(c.state().seconds_remaining, 25 * 60);
        assert_eq!(c.state().phase, Phase::Work);
        assert!(c.notifier().pending.is_empty());
    }

    #[test]
    fn stop_when_idle_is_noop() {
        let mut c = controller();
        assert!(c.stop().is_none());
        assert_eq!(c.notifier().cancels, 0);
    }

    #[test]
    fn tick_when_idle_is_noop() {
        let mut c = controller();
        assert!(c.tick().is_none());
        assert_eq!(c.state().seconds_remaining, 25 * 60);
    }

    #[test]
    fn full_work_countdown_completes_exactly_once() {
        let mut c = controller();
        c.start();
        let mut completions = 0;
        for _ in 0..25 * 60 {
            if c.tick().is_some() {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(c.presenter().completions, vec![Phase::Work]);
        let s = c.state();
        assert_eq!(s.phase, Phase::ShortBreak);
        assert_eq!(s.completed_work_cycles, 0);
        assert_eq!(s.seconds_remaining, 5 * 60);
        assert!(!s.running);
        assert!(c.notifier().pending.is_empty());
    }

    #[test]
    fn completion_event_carries_both_phases() {
        let mut c = controller();
        c.start();
        let mut last = None;
        for _ in 0..25 * 60 {
            if let Some(event) = c.tick() {
                last = Some(event);
            }
        }
        match last {
            Some(Event::PhaseCompleted {
                finished, entered, ..
            }) => {
                assert_eq!(finished, Phase::Work);
                assert_eq!(entered, Phase::ShortBreak);
            }
            other => panic!("expected PhaseCompleted, got {other:?}"),
        }
    }

    #[test]
    fn suspend_records_finish_epoch_only_while_running() {
        let mut c = controller();
        c.on_suspend_at(1_000);
        assert_eq!(c.state().scheduled_finish_epoch, None);

        c.start();
        c.on_suspend_at(1_000);
        assert_eq!(c.state().scheduled_finish_epoch, Some(1_000 + 25 * 60));
    }

    #[test]
    fn immediate_suspend_resume_roundtrip_preserves_remaining() {
        let mut c = controller();
        c.start();
        c.on_suspend_at(1_000);
        let event = c.on_resume_at(1_000);
        assert!(matches!(event, Some(Event::CountdownResumed { .. })));
        let s = c.state();
        assert_eq!(s.seconds_remaining, 25 * 60);
        assert!(s.running);
        assert_eq!(s.scheduled_finish_epoch, None);
    }

    #[test]
    fn resume_recomputes_remaining_from_wall_clock() {
        let mut c = controller();
        c.start();
        c.on_suspend_at(1_000);
        c.on_resume_at(1_000 + 100);
        assert_eq!(c.state().seconds_remaining, 25 * 60 - 100);
        // Alarm re-armed for the recomputed remainder.
        assert_eq!(c.notifier().requests.last().unwrap().1, 25 * 60 - 100);
        assert_eq!(c.notifier().pending.len(), 1);
    }

    #[test]
    fn phase_expires_while_suspended() {
        let mut c = controller();
        c.start();
        for _ in 0..25 * 60 - 10 {
            c.tick();
        }
        assert_eq!(c.state().seconds_remaining, 10);

        c.on_suspend_at(5_000);
        let event = c.on_resume_at(5_015);
        assert!(matches!(event, Some(Event::PhaseCompleted { .. })));
        let s = c.state();
        assert_eq!(s.phase, Phase::ShortBreak);
        assert_eq!(s.seconds_remaining, 5 * 60);
        assert!(s.running, "resume keeps ticking into the next phase");
        assert_eq!(s.scheduled_finish_epoch, None);
        // Alarm re-armed for the new phase's full duration.
        assert_eq!(c.notifier().requests.last().unwrap().1, 5 * 60);
    }

    #[test]
    fn resume_without_suspend_is_noop() {
        let mut c = controller();
        let before = *c.state();
        assert!(c.on_resume_at(99_999).is_none());
        assert_eq!(*c.state(), before);
        assert_eq!(c.presenter().renders, 1); // redraw only
    }

    #[test]
    fn failed_notification_does_not_block_countdown() {
        let mut c = CountdownController::new(
            RecordingNotifier {
                fail: true,
                ..Default::default()
            },
            RecordingPresenter::default(),
        );
        let event = c.start();
        assert!(matches!(event, Some(Event::CountdownStarted { .. })));
        assert!(c.state().running);
        assert_eq!(c.presenter().failures.len(), 1);
        assert!(c.tick().is_none());
        assert_eq!(c.state().seconds_remaining, 25 * 60 - 1);
    }
}
