//! Task registry: to-do items that pay out XP and treats when completed.
//!
//! Rewards are fixed from the priority when the task is created and never
//! change afterwards, even if the priority is edited.
//!
//! ```text
//!   TODO ─────────> IN_PROGRESS ─────────> COMPLETED
//!     |                                       ^
//!     +───────────────────────────────────────+
//! ```
//!
//! COMPLETED is terminal.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::rewards::{calculate_rewards, Reward};
use crate::storage::Snapshot;

/// Task priority. Drives the reward table.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

/// Task status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Check if a transition is valid.
    pub fn can_transition_to(&self, to: &TaskStatus) -> bool {
        match self {
            TaskStatus::Todo => true,
            TaskStatus::InProgress => matches!(to, TaskStatus::InProgress | TaskStatus::Completed),
            TaskStatus::Completed => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" | "done" => Ok(TaskStatus::Completed),
            _ => Err(format!("unknown task status: {s}")),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("unknown priority: {s}")),
        }
    }
}

/// A task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub xp_reward: u32,
    pub treat_reward: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    pub fn reward(&self) -> Reward {
        Reward {
            xp: self.xp_reward,
            treats: self.treat_reward,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// Input for [`TaskRegistry::add_task`].
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, priority: Priority) -> Self {
        Self {
            title: title.into(),
            priority,
            ..Self::default()
        }
    }
}

/// Partial update for [`TaskRegistry::update_task`]. Reward fields are not editable.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Counts by status, computed on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub todo: usize,
}

/// Collection of tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
}

impl Snapshot for TaskRegistry {
    const KEY: &'static str = "task-store";
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        let found = self.tasks.iter_mut().find(|t| t.id == id);
        if found.is_none() {
            tracing::warn!(task_id = id, "no task with this id");
        }
        found
    }

    pub fn tasks_by_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    /// Tasks created on the current local calendar day.
    pub fn todays_tasks(&self) -> Vec<&Task> {
        self.todays_tasks_at(Local::now())
    }

    pub fn todays_tasks_at(&self, now: DateTime<Local>) -> Vec<&Task> {
        let today = now.date_naive();
        self.tasks
            .iter()
            .filter(|t| t.created_at.with_timezone(&Local).date_naive() == today)
            .collect()
    }

    pub fn completion_stats(&self) -> CompletionStats {
        let count = |status: TaskStatus| self.tasks.iter().filter(|t| t.status == status).count();
        CompletionStats {
            total: self.tasks.len(),
            completed: count(TaskStatus::Completed),
            in_progress: count(TaskStatus::InProgress),
            todo: count(TaskStatus::Todo),
        }
    }

    /// Add a task. It always starts as TODO with rewards taken from its priority.
    pub fn add_task(&mut self, new: NewTask) -> Task {
        let reward = calculate_rewards(new.priority);
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            priority: new.priority,
            status: TaskStatus::Todo,
            xp_reward: reward.xp,
            treat_reward: reward.treats,
            created_at: Utc::now(),
            completed_at: None,
            due_date: new.due_date,
        };
        tracing::debug!(task_id = %task.id, priority = ?task.priority, "task added");
        self.tasks.push(task.clone());
        task
    }

    /// Move a task to IN_PROGRESS. Completed tasks are left alone.
    pub fn start_task(&mut self, id: &str) -> Option<&Task> {
        let task = self.task_mut(id)?;
        if !task.status.can_transition_to(&TaskStatus::InProgress) {
            tracing::warn!(task_id = id, status = %task.status, "cannot start task");
            return None;
        }
        task.status = TaskStatus::InProgress;
        Some(&*task)
    }

    /// Complete a task and hand back its reward for the caller to apply.
    ///
    /// Unknown or already-completed tasks yield [`Reward::NONE`].
    pub fn complete_task(&mut self, id: &str) -> Reward {
        let Some(task) = self.task_mut(id) else {
            return Reward::NONE;
        };
        if task.is_completed() {
            tracing::warn!(task_id = id, "task already completed");
            return Reward::NONE;
        }
        task.status = TaskStatus::Completed;
        task.completed_at = Some(Utc::now());
        tracing::debug!(task_id = id, xp = task.xp_reward, "task completed");
        task.reward()
    }

    /// Apply a partial update. Status changes must be valid transitions.
    pub fn update_task(&mut self, id: &str, update: TaskUpdate) -> Option<&Task> {
        let task = self.task_mut(id)?;
        if let Some(status) = update.status {
            if status != task.status && !task.status.can_transition_to(&status) {
                tracing::warn!(task_id = id, from = %task.status, to = %status, "invalid status change");
                return None;
            }
            if status == TaskStatus::Completed && task.completed_at.is_none() {
                task.completed_at = Some(Utc::now());
            }
            task.status = status;
        }
        if let Some(title) = update.title {
            task.title = title;
        }
        if let Some(description) = update.description {
            task.description = Some(description);
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(due) = update.due_date {
            task.due_date = Some(due);
        }
        Some(&*task)
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        if !removed {
            tracing::warn!(task_id = id, "no task to delete");
        }
        removed
    }
}
