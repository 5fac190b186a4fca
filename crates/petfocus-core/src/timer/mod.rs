mod engine;

pub use engine::{FocusSession, FocusTimer, TimerState, DEFAULT_DURATION_MIN};
