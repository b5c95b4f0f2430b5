//! Seams between the countdown controller and its host environment.
//!
//! The core never talks to an OS notification center or a screen
//! directly; hosts implement these traits and the controller calls them.

use crate::error::NotifyError;
use crate::timer::engine::{EngineState, Phase};

/// Identifier for the single outstanding completion alarm. Reusing one id
/// keeps at most one notification pending at any time.
pub const COMPLETION_ALARM_ID: &str = "tomato-phase";

/// Host-side scheduler for future user-facing alerts.
///
/// Delivery is best effort -- the host may never fire the alarm, and the
/// on-screen countdown stays authoritative either way.
pub trait Notifier {
    /// Ask the host to alert the user `fire_in_secs` from now.
    fn request(&mut self, title: &str, fire_in_secs: u64, id: &str) -> Result<(), NotifyError>;

    /// Cancel a previously requested alert. Unknown ids are ignored.
    fn cancel(&mut self, id: &str);
}

/// Presentation-layer hooks, invoked by the controller after every state
/// change so the host can redraw.
pub trait Presenter {
    /// Redraw minutes/seconds, phase labels, and control affordances.
    fn render(&mut self, state: &EngineState);

    /// A phase just finished; show an alert or banner.
    fn phase_completed(&mut self, _finished: Phase, _state: &EngineState) {} // default no-op

    /// A notification request failed. Non-fatal.
    fn notification_failed(&mut self, _message: &str) {} // default no-op
}

/// Notifier that accepts and drops every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn request(&mut self, _title: &str, _fire_in_secs: u64, _id: &str) -> Result<(), NotifyError> {
        Ok(())
    }

    fn cancel(&mut self, _id: &str) {}
}

/// Presenter that renders nowhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render(&mut self, _state: &EngineState) {}
}
