//! # PetFocus Core Library
//!
//! Business logic for PetFocus: finish tasks and focus sessions to earn
//! experience for virtual pets that level up and evolve.
//!
//! ## Architecture
//!
//! - **Pet Registry**: adopted pets, care actions, leveling and evolution
//! - **Task Registry**: tasks whose priority fixes their reward
//! - **Focus Timer**: a tick-driven countdown state machine plus session log
//! - **Storage**: SQLite key-value persistence, TOML configuration, backups
//!
//! The three containers are independent. [`PetFocus`] owns one of each and
//! forwards earned XP to the active pet.
//!
//! ## Key Components
//!
//! - [`PetRegistry`]: pet collection and active-pet pointer
//! - [`TaskRegistry`]: task collection
//! - [`FocusTimer`]: timer state machine
//! - [`Persisted`]: save-after-apply wrapper around a container
//! - [`Database`]: SQLite key-value store
//! - [`Config`]: application configuration

pub mod app;
pub mod error;
pub mod events;
pub mod pet;
pub mod rewards;
pub mod storage;
pub mod task;
pub mod timer;

/// Version string written into exports and required on import.
pub const EXPORT_VERSION: &str = "1.0.0";

pub use app::{PetFocus, RewardOutcome};
pub use error::{ConfigError, CoreError, DatabaseError, ImportError};
pub use events::Event;
pub use pet::{ExperienceOutcome, Pet, PetRegistry, Species, StatUpdate};
pub use rewards::{calculate_rewards, Reward};
pub use storage::{Backup, Config, Database, MemoryStore, Persisted, StateStore};
pub use task::{CompletionStats, NewTask, Priority, Task, TaskRegistry, TaskStatus, TaskUpdate};
pub use timer::{FocusSession, FocusTimer, TimerState};
