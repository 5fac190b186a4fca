use clap::Subcommand;
use petfocus_core::{Config, Database, Event, PetFocus, TimerState};
use serde_json::json;
use std::time::Duration;

use super::{open_app, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a focus session tagged with the active pet
    Start {
        /// Session length in minutes (config `timer.default_duration_min` if omitted)
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Pause the running session
    Pause,
    /// Resume a paused session
    Resume,
    /// Discard the current session and return to idle
    Reset,
    /// Advance the countdown by one or more seconds
    Tick {
        #[arg(default_value = "1")]
        seconds: u64,
    },
    /// Complete the current session now and reward the active pet
    Complete,
    /// Print current timer state as JSON
    Status,
    /// Count down in the foreground until the session completes
    Run,
    /// Focus minutes completed today
    Today,
    /// Focus minutes completed in the last 7 days
    Week,
    /// Every recorded focus session
    Sessions,
}

fn report(event: Option<Event>, verb: &str) -> CmdResult {
    match event {
        Some(event) => print_json(&event),
        None => {
            println!("Timer not {verb}");
            Ok(())
        }
    }
}

/// Tick up to `seconds` times, stopping early once the session pays out.
fn advance(app: &mut PetFocus<Database>, seconds: u64) -> CmdResult {
    for _ in 0..seconds {
        if let Some((event, outcome)) = app.tick()? {
            print_json(&json!({ "event": event, "reward": outcome }))?;
            return Ok(());
        }
    }
    print_json(&app.timer().snapshot())
}

pub fn run(action: TimerAction) -> CmdResult {
    let mut app = open_app()?;

    match action {
        TimerAction::Start { minutes } => {
            let minutes =
                minutes.unwrap_or_else(|| Config::load_or_default().timer.default_duration_min);
            let event = app.start_timer(minutes)?;
            report(event, "started")?;
        }
        TimerAction::Pause => {
            let event = app.timer_mut().apply(|t| t.pause())?;
            report(event, "paused")?;
        }
        TimerAction::Resume => {
            let event = app.timer_mut().apply(|t| t.resume())?;
            report(event, "resumed")?;
        }
        TimerAction::Reset => {
            let event = app.timer_mut().apply(|t| t.reset())?;
            report(event, "reset")?;
        }
        TimerAction::Tick { seconds } => advance(&mut app, seconds)?,
        TimerAction::Complete => {
            let outcome = app.complete_session()?;
            print_json(&outcome)?;
        }
        TimerAction::Status => {
            let mut status = serde_json::to_value(app.timer().snapshot())?;
            status["progress"] = json!(app.timer().progress());
            print_json(&status)?;
        }
        TimerAction::Run => {
            if app.timer().state() == TimerState::Idle {
                println!("No session in flight; run `petfocus timer start` first");
                return Ok(());
            }
            while app.timer().is_running() {
                std::thread::sleep(Duration::from_secs(1));
                if let Some((event, outcome)) = app.tick()? {
                    print_json(&json!({ "event": event, "reward": outcome }))?;
                    return Ok(());
                }
                let left = app.timer().time_left_secs();
                eprint!("\r{:02}:{:02} remaining ", left / 60, left % 60);
            }
            eprintln!();
            print_json(&app.timer().snapshot())?;
        }
        TimerAction::Today => {
            print_json(&json!({ "focusMinutes": app.timer().todays_focus_time() }))?;
        }
        TimerAction::Week => {
            print_json(&json!({ "focusMinutes": app.timer().weekly_focus_time() }))?;
        }
        TimerAction::Sessions => {
            print_json(app.timer().sessions())?;
        }
    }
    Ok(())
}
