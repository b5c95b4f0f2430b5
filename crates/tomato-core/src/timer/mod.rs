mod countdown;
mod engine;
mod hooks;

pub use countdown::CountdownController;
pub use engine::{EngineState, Phase, WORK_CYCLES_PER_LONG_BREAK};
pub use hooks::{Notifier, NullNotifier, NullPresenter, Presenter, COMPLETION_ALARM_ID};
