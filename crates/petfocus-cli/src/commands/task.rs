//! Task management commands for CLI.

use chrono::{DateTime, NaiveDate, Utc};
use clap::Subcommand;
use petfocus_core::{NewTask, Priority, TaskStatus, TaskUpdate};

use super::{open_app, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Priority: low, medium or high (default: low)
        #[arg(long, default_value = "low")]
        priority: Priority,
        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(long, value_parser = parse_due)]
        due: Option<DateTime<Utc>>,
    },
    /// List tasks
    List {
        /// Filter by status (todo, in_progress, completed)
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Get task details
    Show {
        /// Task ID
        id: String,
    },
    /// Mark a task as in progress
    Start {
        /// Task ID
        id: String,
    },
    /// Complete a task and reward the active pet
    Complete {
        /// Task ID
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New priority (rewards stay as created)
        #[arg(long)]
        priority: Option<Priority>,
        /// New status
        #[arg(long)]
        status: Option<TaskStatus>,
        /// New due date
        #[arg(long, value_parser = parse_due)]
        due: Option<DateTime<Utc>>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Counts by status
    Stats,
    /// Tasks created today
    Today,
}

fn parse_due(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("invalid date '{s}', expected YYYY-MM-DD or RFC 3339"))
}

pub fn run(action: TaskAction) -> CmdResult {
    let mut app = open_app()?;

    match action {
        TaskAction::Add {
            title,
            description,
            priority,
            due,
        } => {
            let new = NewTask {
                title,
                description,
                priority,
                due_date: due,
            };
            let task = app.tasks_mut().apply(|t| t.add_task(new))?;
            eprintln!("Task created: {}", task.id);
            print_json(&task)?;
        }
        TaskAction::List { status } => match status {
            Some(status) => print_json(&app.tasks().tasks_by_status(status))?,
            None => print_json(app.tasks().tasks())?,
        },
        TaskAction::Show { id } => match app.tasks().task(&id) {
            Some(task) => print_json(task)?,
            None => println!("Task not found: {id}"),
        },
        TaskAction::Start { id } => {
            match app.tasks_mut().apply(|t| t.start_task(&id).cloned())? {
                Some(task) => print_json(&task)?,
                None => println!("Task not started: {id}"),
            }
        }
        TaskAction::Complete { id } => {
            let outcome = app.complete_task(&id)?;
            print_json(&outcome)?;
        }
        TaskAction::Update {
            id,
            title,
            description,
            priority,
            status,
            due,
        } => {
            let update = TaskUpdate {
                title,
                description,
                priority,
                status,
                due_date: due,
            };
            match app.tasks_mut().apply(|t| t.update_task(&id, update).cloned())? {
                Some(task) => print_json(&task)?,
                None => println!("Task not updated: {id}"),
            }
        }
        TaskAction::Delete { id } => {
            if app.tasks_mut().apply(|t| t.delete_task(&id))? {
                println!("Task deleted: {id}");
            } else {
                println!("Task not found: {id}");
            }
        }
        TaskAction::Stats => {
            print_json(&app.tasks().completion_stats())?;
        }
        TaskAction::Today => {
            print_json(&app.tasks().todays_tasks())?;
        }
    }
    Ok(())
}
