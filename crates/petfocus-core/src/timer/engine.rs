//! Focus timer implementation.
//!
//! The timer is a discrete state machine. It does not use internal threads
//! or read the wall clock to count down - the caller invokes `tick()` once
//! per elapsed second while the timer is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --resume--> Running
//! Running --tick (time left hits 0) / complete--> Idle
//! Running | Paused --reset--> Idle   (unfinished session discarded)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = FocusTimer::new();
//! timer.start(25, None);
//! // Once per second:
//! if let Some(event) = timer.tick() { /* session completed */ }
//! ```

use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::Event;
use crate::rewards::{focus_minutes, focus_xp};
use crate::storage::Snapshot;

pub const DEFAULT_DURATION_MIN: u32 = 25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    #[default]
    Idle,
    Running,
    Paused,
}

/// One timed focus interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSession {
    pub id: String,
    /// Planned length in minutes.
    pub duration: u32,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Zero until the session completes.
    pub xp_earned: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet_id: Option<String>,
}

impl FocusSession {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Countdown state plus the log of focus sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusTimer {
    /// Configured length of the current/last session in seconds.
    duration: u64,
    /// Remaining seconds, `0..=duration`.
    time_left: u64,
    #[serde(default)]
    state: TimerState,
    #[serde(default)]
    current_session_id: Option<String>,
    #[serde(default)]
    focus_sessions: Vec<FocusSession>,
    /// Minutes of completed focus, all time.
    #[serde(default)]
    total_focus_time: u64,
}

impl Default for FocusTimer {
    fn default() -> Self {
        let secs = u64::from(DEFAULT_DURATION_MIN) * 60;
        Self {
            duration: secs,
            time_left: secs,
            state: TimerState::Idle,
            current_session_id: None,
            focus_sessions: Vec::new(),
            total_focus_time: 0,
        }
    }
}

impl Snapshot for FocusTimer {
    const KEY: &'static str = "timer-store";
}

impl FocusTimer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == TimerState::Paused
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration
    }

    pub fn time_left_secs(&self) -> u64 {
        self.time_left
    }

    pub fn current_session_id(&self) -> Option<&str> {
        self.current_session_id.as_deref()
    }

    pub fn sessions(&self) -> &[FocusSession] {
        &self.focus_sessions
    }

    pub fn session(&self, id: &str) -> Option<&FocusSession> {
        self.focus_sessions.iter().find(|s| s.id == id)
    }

    /// Completed focus minutes, all time.
    pub fn total_focus_time(&self) -> u64 {
        self.total_focus_time
    }

    /// 0.0 .. 1.0 progress through the current countdown.
    pub fn progress(&self) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        1.0 - (self.time_left as f64 / self.duration as f64)
    }

    /// Minutes from completed sessions started on the current local day.
    pub fn todays_focus_time(&self) -> u64 {
        self.todays_focus_time_at(Local::now())
    }

    pub fn todays_focus_time_at(&self, now: DateTime<Local>) -> u64 {
        let today = now.date_naive();
        self.completed_minutes(|s| s.started_at.with_timezone(&Local).date_naive() == today)
    }

    /// Minutes from completed sessions started within the last seven days.
    pub fn weekly_focus_time(&self) -> u64 {
        self.weekly_focus_time_at(Utc::now())
    }

    pub fn weekly_focus_time_at(&self, now: DateTime<Utc>) -> u64 {
        let since = now - Duration::days(7);
        self.completed_minutes(|s| s.started_at >= since)
    }

    fn completed_minutes(&self, include: impl Fn(&FocusSession) -> bool) -> u64 {
        self.focus_sessions
            .iter()
            .filter(|s| s.is_completed() && include(s))
            .map(|s| u64::from(s.duration))
            .sum()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            duration_secs: self.duration,
            time_left_secs: self.time_left,
            current_session_id: self.current_session_id.clone(),
            total_focus_time_min: self.total_focus_time,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a new session of `duration_min` minutes. Only valid when idle.
    pub fn start(&mut self, duration_min: u32, pet_id: Option<String>) -> Option<Event> {
        if self.state != TimerState::Idle {
            tracing::warn!(state = ?self.state, "timer already has a session in flight");
            return None;
        }
        let now = Utc::now();
        let session = FocusSession {
            id: Uuid::new_v4().to_string(),
            duration: duration_min,
            started_at: now,
            completed_at: None,
            xp_earned: 0,
            pet_id,
        };
        self.duration = u64::from(duration_min) * 60;
        self.time_left = self.duration;
        self.state = TimerState::Running;
        self.current_session_id = Some(session.id.clone());
        tracing::debug!(session_id = %session.id, duration_min, "focus session started");
        let event = Event::TimerStarted {
            session_id: session.id.clone(),
            duration_min,
            at: now,
        };
        self.focus_sessions.push(session);
        Some(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Paused;
                Some(Event::TimerPaused {
                    time_left_secs: self.time_left,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    pub fn resume(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Paused => {
                self.state = TimerState::Running;
                Some(Event::TimerResumed {
                    time_left_secs: self.time_left,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Return to idle. An unfinished session is removed from history.
    pub fn reset(&mut self) -> Option<Event> {
        let discarded = self.current_session_id.take();
        if let Some(ref id) = discarded {
            self.focus_sessions.retain(|s| &s.id != id);
            tracing::debug!(session_id = %id, "unfinished focus session discarded");
        }
        self.state = TimerState::Idle;
        self.time_left = self.duration;
        Some(Event::TimerReset {
            discarded_session: discarded,
            at: Utc::now(),
        })
    }

    /// Advance one second. Returns `Some(Event::SessionCompleted)` when the
    /// countdown reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            return self.finish_session();
        }
        None
    }

    /// Complete the in-flight session now and return the XP it earned.
    ///
    /// Returns 0 when no session is in flight.
    pub fn complete_session(&mut self) -> u32 {
        self.finish_session()
            .and_then(|e| e.xp_earned())
            .unwrap_or(0)
    }

    /// Complete the in-flight session and report it as an event.
    pub fn finish_session(&mut self) -> Option<Event> {
        let Some(id) = self.current_session_id.take() else {
            tracing::warn!("no focus session to complete");
            return None;
        };
        let now = Utc::now();
        let minutes = focus_minutes(self.duration);
        let xp_earned = focus_xp(self.duration);

        let session = self.focus_sessions.iter_mut().find(|s| s.id == id);
        let duration_min = match session {
            Some(session) => {
                session.completed_at = Some(now);
                session.xp_earned = xp_earned;
                session.duration
            }
            None => u32::try_from(minutes).unwrap_or(u32::MAX),
        };
        self.total_focus_time = self.total_focus_time.saturating_add(minutes);
        self.state = TimerState::Idle;
        self.time_left = self.duration;
        tracing::debug!(session_id = %id, xp_earned, "focus session completed");

        Some(Event::SessionCompleted {
            session_id: id,
            duration_min,
            xp_earned,
            at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn start_pause_resume() {
        let mut timer = FocusTimer::new();
        assert_eq!(timer.state(), TimerState::Idle);

        assert!(timer.start(25, None).is_some());
        assert!(timer.is_running());
        assert_eq!(timer.time_left_secs(), 25 * 60);

        assert!(timer.pause().is_some());
        assert!(timer.is_paused());
        assert!(!timer.is_running());
        assert!(timer.pause().is_none());

        assert!(timer.resume().is_some());
        assert!(timer.is_running());
        assert!(timer.resume().is_none());
    }

    #[test]
    fn start_while_running_is_rejected() {
        let mut timer = FocusTimer::new();
        timer.start(5, None);
        assert!(timer.start(10, None).is_none());
        assert_eq!(timer.sessions().len(), 1);
        assert_eq!(timer.duration_secs(), 300);
    }

    #[test]
    fn ticking_full_duration_completes_exactly_once() {
        let mut timer = FocusTimer::new();
        timer.start(3, Some("pet-1".into()));
        let id = timer.current_session_id().unwrap().to_string();

        let completions: Vec<Event> = (0..3 * 60).filter_map(|_| timer.tick()).collect();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].xp_earned(), Some(6));

        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.total_focus_time(), 3);
        assert_eq!(timer.time_left_secs(), 180);
        assert!(timer.current_session_id().is_none());

        let session = timer.session(&id).unwrap();
        assert!(session.is_completed());
        assert_eq!(session.xp_earned, 6);
        assert_eq!(session.pet_id.as_deref(), Some("pet-1"));

        assert!(timer.tick().is_none());
    }

    #[test]
    fn paused_timer_does_not_count_down() {
        let mut timer = FocusTimer::new();
        timer.start(1, None);
        timer.tick();
        timer.pause();
        for _ in 0..120 {
            assert!(timer.tick().is_none());
        }
        assert_eq!(timer.time_left_secs(), 59);
    }

    #[test]
    fn reset_discards_unfinished_session() {
        let mut timer = FocusTimer::new();
        timer.start(1, None);
        timer.complete_session();
        let before = timer.sessions().len();

        timer.start(10, None);
        timer.tick();
        timer.pause();
        match timer.reset() {
            Some(Event::TimerReset {
                discarded_session: Some(_),
                ..
            }) => {}
            other => panic!("Expected TimerReset with discarded session, got {other:?}"),
        }
        assert_eq!(timer.sessions().len(), before);
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.time_left_secs(), 600);
        assert_eq!(timer.total_focus_time(), 1);
    }

    #[test]
    fn explicit_complete_returns_xp() {
        let mut timer = FocusTimer::new();
        timer.start(25, None);
        timer.tick();
        assert_eq!(timer.complete_session(), 50);
        assert_eq!(timer.total_focus_time(), 25);
        assert_eq!(timer.complete_session(), 0);
        assert_eq!(timer.total_focus_time(), 25);
    }

    #[test]
    fn focus_time_aggregates_only_completed_sessions() {
        let mut timer = FocusTimer::new();
        let now = Local.with_ymd_and_hms(2026, 5, 20, 18, 0, 0).unwrap();
        let session = |id: &str, minutes: u32, started: DateTime<Local>, done: bool| FocusSession {
            id: id.into(),
            duration: minutes,
            started_at: started.with_timezone(&Utc),
            completed_at: done.then(|| started.with_timezone(&Utc)),
            xp_earned: if done { minutes * 2 } else { 0 },
            pet_id: None,
        };
        timer.focus_sessions = vec![
            session("a", 25, now - Duration::hours(2), true),
            session("b", 15, now - Duration::hours(1), false),
            session("c", 30, now - Duration::days(3), true),
            session("d", 50, now - Duration::days(9), true),
        ];
        assert_eq!(timer.todays_focus_time_at(now), 25);
        assert_eq!(timer.weekly_focus_time_at(now.with_timezone(&Utc)), 55);
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let timer = FocusTimer::new();
        match timer.snapshot() {
            Event::StateSnapshot {
                state,
                time_left_secs,
                current_session_id,
                ..
            } => {
                assert_eq!(state, TimerState::Idle);
                assert_eq!(time_left_secs, 25 * 60);
                assert!(current_session_id.is_none());
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }

    #[test]
    fn serialized_state_round_trips() {
        let mut timer = FocusTimer::new();
        timer.start(5, None);
        timer.tick();
        let json = serde_json::to_string(&timer).unwrap();
        assert!(json.contains("\"timeLeft\":299"));
        let restored: FocusTimer = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, timer);
    }

    #[test]
    fn completing_a_huge_session_saturates_instead_of_overflowing() {
        let mut timer = FocusTimer::new();
        timer.start(u32::MAX, None);
        assert_eq!(timer.complete_session(), u32::MAX);
        assert_eq!(timer.sessions()[0].duration, u32::MAX);
        assert_eq!(timer.total_focus_time(), u64::from(u32::MAX));
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn progress_tracks_elapsed_fraction() {
        let mut timer = FocusTimer::new();
        assert_eq!(timer.progress(), 0.0);
        timer.start(1, None);
        for _ in 0..30 {
            timer.tick();
        }
        assert!((timer.progress() - 0.5).abs() < f64::EPSILON);
    }
}
