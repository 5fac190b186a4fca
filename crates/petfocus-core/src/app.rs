//! Application service: owns the three containers and forwards rewards.
//!
//! The pet, task, and timer containers never call each other. This layer
//! reads what `complete_task` / `complete_session` return and applies the
//! XP to whichever pet is active at that moment.

use serde::Serialize;
use std::rc::Rc;

use crate::error::Result;
use crate::events::Event;
use crate::pet::{ExperienceOutcome, PetRegistry};
use crate::rewards::Reward;
use crate::storage::{Persisted, StateStore};
use crate::task::TaskRegistry;
use crate::timer::FocusTimer;

/// What happened to the active pet when a reward was paid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardOutcome {
    pub reward: Reward,
    /// Pet that received the XP; `None` if no pet is active or nothing was earned.
    pub pet_id: Option<String>,
    pub experience: Option<ExperienceOutcome>,
}

/// The three persisted containers, constructed once per process.
pub struct PetFocus<S> {
    store: Rc<S>,
    pets: Persisted<PetRegistry, Rc<S>>,
    tasks: Persisted<TaskRegistry, Rc<S>>,
    timer: Persisted<FocusTimer, Rc<S>>,
}

impl<S: StateStore> PetFocus<S> {
    /// Hydrate every container from `store`.
    ///
    /// # Errors
    /// Fails if any stored blob is corrupt.
    pub fn load(store: S) -> Result<Self> {
        let store = Rc::new(store);
        Ok(Self {
            pets: Persisted::load(Rc::clone(&store))?,
            tasks: Persisted::load(Rc::clone(&store))?,
            timer: Persisted::load(Rc::clone(&store))?,
            store,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn pets(&self) -> &PetRegistry {
        self.pets.get()
    }

    pub fn tasks(&self) -> &TaskRegistry {
        self.tasks.get()
    }

    pub fn timer(&self) -> &FocusTimer {
        self.timer.get()
    }

    pub fn pets_mut(&mut self) -> &mut Persisted<PetRegistry, Rc<S>> {
        &mut self.pets
    }

    pub fn tasks_mut(&mut self) -> &mut Persisted<TaskRegistry, Rc<S>> {
        &mut self.tasks
    }

    pub fn timer_mut(&mut self) -> &mut Persisted<FocusTimer, Rc<S>> {
        &mut self.timer
    }

    /// Re-read every container, e.g. after a backup was restored.
    pub fn reload(&mut self) -> Result<()> {
        self.pets = Persisted::load(Rc::clone(&self.store))?;
        self.tasks = Persisted::load(Rc::clone(&self.store))?;
        self.timer = Persisted::load(Rc::clone(&self.store))?;
        Ok(())
    }

    /// Start a focus session tagged with the active pet.
    pub fn start_timer(&mut self, duration_min: u32) -> Result<Option<Event>> {
        let pet_id = self.pets().active_pet_id().map(str::to_string);
        self.timer.apply(|t| t.start(duration_min, pet_id))
    }

    /// Complete a task and feed its XP to the active pet.
    pub fn complete_task(&mut self, id: &str) -> Result<RewardOutcome> {
        let reward = self.tasks.apply(|t| t.complete_task(id))?;
        self.pay_out(reward)
    }

    /// Complete the running session now and feed its XP to the active pet.
    pub fn complete_session(&mut self) -> Result<RewardOutcome> {
        let xp = self.timer.apply(|t| t.complete_session())?;
        self.pay_out(Reward { xp, treats: 0 })
    }

    /// Advance the timer one second, paying out if the session finished.
    pub fn tick(&mut self) -> Result<Option<(Event, RewardOutcome)>> {
        let Some(event) = self.timer.apply(|t| t.tick())? else {
            return Ok(None);
        };
        let xp = event.xp_earned().unwrap_or(0);
        let outcome = self.pay_out(Reward { xp, treats: 0 })?;
        Ok(Some((event, outcome)))
    }

    fn pay_out(&mut self, reward: Reward) -> Result<RewardOutcome> {
        let active = self.pets().active_pet_id().map(str::to_string);
        let (pet_id, experience) = match active {
            Some(pet_id) if reward.xp > 0 => {
                let outcome = self.pets.apply(|p| p.add_experience(&pet_id, reward.xp))?;
                (Some(pet_id), outcome)
            }
            _ => (None, None),
        };
        if reward.xp > 0 && pet_id.is_none() {
            tracing::info!(xp = reward.xp, "no active pet; reward not applied");
        }
        Ok(RewardOutcome {
            reward,
            pet_id,
            experience,
        })
    }
}
