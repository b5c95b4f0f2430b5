//! Foreground countdown loop.
//!
//! The CLI is the host environment for the core: it owns the ~1 Hz tick,
//! forwards suspend/resume signals, and renders state changes. The core
//! never learns how any of that is scheduled.

use std::io::Write;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tomato_core::{
    Config, CountdownController, EngineState, Notifier, NotifyError, Phase, Presenter,
};

/// A wall-clock jump larger than this between interval firings means the
/// process was not running (laptop sleep, SIGSTOP) and the countdown must
/// be reconciled rather than ticked.
const SUSPEND_GAP_SECS: u64 = 3;

/// Renders the countdown as a single redrawn terminal line.
struct TerminalPresenter {
    bell: bool,
}

impl Presenter for TerminalPresenter {
    fn render(&mut self, state: &EngineState) {
        let minutes = state.seconds_remaining / 60;
        let seconds = state.seconds_remaining % 60;
        let marker = if state.running { ">" } else { "=" };
        print!(
            "\r\x1b[2K{marker} {minutes:02}:{seconds:02}  {}  next: {}  pomodoro #{}",
            state.phase.label(),
            state.next_phase.label(),
            state.completed_work_cycles + 1,
        );
        let _ = std::io::stdout().flush();
    }

    fn phase_completed(&mut self, finished: Phase, state: &EngineState) {
        let bell = if self.bell { "\x07" } else { "" };
        println!(
            "\r\x1b[2K{bell}{} finished! Next up: {}.",
            finished.label(),
            state.phase.label(),
        );
    }

    fn notification_failed(&mut self, message: &str) {
        tracing::warn!(error = message, "notification request failed");
    }
}

/// Best-effort stand-in for a host notification scheduler. A terminal
/// cannot alert a backgrounded user, so requests are only logged; the
/// completion banner and bell come from the presenter instead.
struct LogNotifier {
    enabled: bool,
}

impl Notifier for LogNotifier {
    fn request(&mut self, title: &str, fire_in_secs: u64, id: &str) -> Result<(), NotifyError> {
        if self.enabled {
            tracing::debug!(title, fire_in_secs, id, "notification requested");
        }
        Ok(())
    }

    fn cancel(&mut self, id: &str) {
        tracing::debug!(id, "notification cancelled");
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_loop())
}

async fn run_loop() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut controller = CountdownController::new(
        LogNotifier {
            enabled: config.notifications.enabled,
        },
        TerminalPresenter {
            bell: config.notifications.sound,
        },
    );

    println!("tomato -- Enter starts/stops the countdown, Ctrl-C quits");
    controller.redraw();

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_seen = now_secs();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = now_secs();
                if now.saturating_sub(last_seen) >= SUSPEND_GAP_SECS {
                    // The process slept between firings; reconcile against
                    // the wall clock instead of ticking through the gap.
                    controller.on_suspend_at(last_seen);
                    controller.on_resume_at(now);
                } else {
                    controller.tick();
                }
                last_seen = now;
            }
            line = lines.next_line() => {
                match line? {
                    Some(_) => {
                        if controller.state().running {
                            controller.stop();
                        } else {
                            controller.start();
                        }
                    }
                    None => break, // stdin closed
                }
            }
            _ = tokio::signal::ctrl_c() => {
                controller.stop();
                break;
            }
        }
    }

    println!();
    Ok(())
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
