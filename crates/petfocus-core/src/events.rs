use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerState;

/// Every timer state change produces an Event.
/// The driver prints them; the coordinator forwards completion rewards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        session_id: String,
        duration_min: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        time_left_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        time_left_secs: u64,
        at: DateTime<Utc>,
    },
    /// Timer returned to idle; an unfinished session is dropped from history.
    TimerReset {
        discarded_session: Option<String>,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        session_id: String,
        duration_min: u32,
        xp_earned: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        duration_secs: u64,
        time_left_secs: u64,
        current_session_id: Option<String>,
        total_focus_time_min: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// XP carried by a completion event.
    pub fn xp_earned(&self) -> Option<u32> {
        match self {
            Event::SessionCompleted { xp_earned, .. } => Some(*xp_earned),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::TimerPaused {
            time_left_secs: 42,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "timer_paused");
        assert_eq!(json["time_left_secs"], 42);
        assert_eq!(event.xp_earned(), None);
    }
}
