//! Pet registry: adoption, care actions, experience, leveling and evolution.
//!
//! At most one pet is active at a time. Level and evolution stage never go
//! down, and happiness/hunger/energy always stay within `0..=100`.
//!
//! ```text
//! level           = min(10, experience / 100 + 1)
//! evolves when    level >= (stage + 1) * 3  and  stage < 3
//! ```

mod species;

pub use species::{EvolutionStage, InitialStats, Species, SpeciesInfo};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ImportError;
use crate::storage::Snapshot;
use crate::EXPORT_VERSION;

pub const MAX_LEVEL: u32 = 10;
pub const MAX_EVOLUTION_STAGE: u32 = 3;
pub const XP_PER_LEVEL: u32 = 100;
pub const STAT_MAX: u32 = 100;

const FEED_HUNGER_DROP: u32 = 30;
const FEED_HAPPINESS: u32 = 10;
const PLAY_HAPPINESS: u32 = 20;
const PLAY_ENERGY_COST: u32 = 15;
const PET_HAPPINESS: u32 = 15;
const LEVEL_UP_HAPPINESS: u32 = 25;

/// An adopted pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub species: Species,
    pub level: u32,
    pub experience: u32,
    pub happiness: u32,
    pub hunger: u32,
    pub energy: u32,
    pub evolution_stage: u32,
    #[serde(default)]
    pub is_active: bool,
    pub adopted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_fed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_played: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_petted: Option<DateTime<Utc>>,
}

impl Pet {
    fn new(name: String, species: Species, is_active: bool) -> Self {
        let stats = species.initial_stats();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            species,
            level: 1,
            experience: 0,
            happiness: stats.happiness,
            hunger: stats.hunger,
            energy: stats.energy,
            evolution_stage: 0,
            is_active,
            adopted_at: Utc::now(),
            last_fed: None,
            last_played: None,
            last_petted: None,
        }
    }

    /// Describe the first field outside its allowed range, if any.
    fn out_of_range(&self) -> Option<String> {
        let stats = [
            ("happiness", self.happiness),
            ("hunger", self.hunger),
            ("energy", self.energy),
        ];
        if let Some((field, value)) = stats.iter().find(|(_, v)| *v > STAT_MAX) {
            return Some(format!("pet {}: {field} {value} exceeds {STAT_MAX}", self.id));
        }
        if !(1..=MAX_LEVEL).contains(&self.level) {
            return Some(format!(
                "pet {}: level {} not in 1..={MAX_LEVEL}",
                self.id, self.level
            ));
        }
        if self.evolution_stage > MAX_EVOLUTION_STAGE {
            return Some(format!(
                "pet {}: evolution stage {} exceeds {MAX_EVOLUTION_STAGE}",
                self.id, self.evolution_stage
            ));
        }
        None
    }

    /// Whether the pet qualifies for its next evolution stage.
    pub fn can_evolve(&self) -> bool {
        self.evolution_stage < MAX_EVOLUTION_STAGE
            && self.level >= (self.evolution_stage + 1) * 3
    }

    /// Display name of the current evolution stage.
    pub fn stage_name(&self) -> &'static str {
        self.species.stage_name(self.evolution_stage)
    }

    /// Experience still needed to reach the next level, `None` at max level.
    pub fn xp_to_next_level(&self) -> Option<u32> {
        if self.level >= MAX_LEVEL {
            return None;
        }
        Some(experience_for_level(self.level).saturating_sub(self.experience))
    }
}

/// Total experience at which a pet leaves `level`.
pub fn experience_for_level(level: u32) -> u32 {
    level * XP_PER_LEVEL
}

/// Level reached with `experience` total points.
pub fn level_for_experience(experience: u32) -> u32 {
    (experience / XP_PER_LEVEL + 1).min(MAX_LEVEL)
}

fn add_stat(value: u32, delta: u32) -> u32 {
    value.saturating_add(delta).min(STAT_MAX)
}

fn sub_stat(value: u32, delta: u32) -> u32 {
    value.min(STAT_MAX).saturating_sub(delta)
}

/// Result of [`PetRegistry::add_experience`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceOutcome {
    pub experience: u32,
    pub previous_level: u32,
    pub level: u32,
    pub leveled_up: bool,
    pub evolved: bool,
    pub evolution_stage: u32,
}

/// Partial stat overwrite. Values above 100 are clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatUpdate {
    pub happiness: Option<u32>,
    pub hunger: Option<u32>,
    pub energy: Option<u32>,
}

/// Versioned document produced by [`PetRegistry::export_data`].
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PetExport {
    pets: Vec<Pet>,
    #[serde(default)]
    active_pet_id: Option<String>,
    #[serde(default)]
    exported_at: Option<DateTime<Utc>>,
    #[serde(default)]
    version: Option<String>,
}

/// Collection of adopted pets plus the active-pet pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetRegistry {
    pets: Vec<Pet>,
    active_pet_id: Option<String>,
}

impl Snapshot for PetRegistry {
    const KEY: &'static str = "pet-store";
}

impl PetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    pub fn active_pet_id(&self) -> Option<&str> {
        self.active_pet_id.as_deref()
    }

    pub fn active_pet(&self) -> Option<&Pet> {
        self.active_pet_id.as_deref().and_then(|id| self.pet(id))
    }

    pub fn pet(&self, id: &str) -> Option<&Pet> {
        self.pets.iter().find(|p| p.id == id)
    }

    fn pet_mut(&mut self, id: &str) -> Option<&mut Pet> {
        let found = self.pets.iter_mut().find(|p| p.id == id);
        if found.is_none() {
            tracing::warn!(pet_id = id, "no pet with this id");
        }
        found
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Adopt a new pet. The first pet adopted becomes active.
    pub fn adopt_pet(&mut self, name: impl Into<String>, species: Species) -> Pet {
        let first = self.pets.is_empty();
        let pet = Pet::new(name.into(), species, first);
        if first {
            self.active_pet_id = Some(pet.id.clone());
        }
        tracing::debug!(pet_id = %pet.id, %species, active = first, "pet adopted");
        self.pets.push(pet.clone());
        pet
    }

    /// Make `id` the only active pet. Unknown ids leave everything unchanged.
    pub fn set_active_pet(&mut self, id: &str) -> bool {
        if self.pet(id).is_none() {
            tracing::warn!(pet_id = id, "cannot activate unknown pet");
            return false;
        }
        for pet in &mut self.pets {
            pet.is_active = pet.id == id;
        }
        self.active_pet_id = Some(id.to_string());
        true
    }

    pub fn feed_pet(&mut self, id: &str) -> Option<&Pet> {
        let pet = self.pet_mut(id)?;
        pet.hunger = sub_stat(pet.hunger, FEED_HUNGER_DROP);
        pet.happiness = add_stat(pet.happiness, FEED_HAPPINESS);
        pet.last_fed = Some(Utc::now());
        Some(&*pet)
    }

    pub fn play_with_pet(&mut self, id: &str) -> Option<&Pet> {
        let pet = self.pet_mut(id)?;
        pet.happiness = add_stat(pet.happiness, PLAY_HAPPINESS);
        pet.energy = sub_stat(pet.energy, PLAY_ENERGY_COST);
        pet.last_played = Some(Utc::now());
        Some(&*pet)
    }

    pub fn pet_pet(&mut self, id: &str) -> Option<&Pet> {
        let pet = self.pet_mut(id)?;
        pet.happiness = add_stat(pet.happiness, PET_HAPPINESS);
        pet.last_petted = Some(Utc::now());
        Some(&*pet)
    }

    /// Overwrite any of happiness/hunger/energy, clamped to `0..=100`.
    pub fn update_pet_stats(&mut self, id: &str, update: StatUpdate) -> Option<&Pet> {
        let pet = self.pet_mut(id)?;
        if let Some(v) = update.happiness {
            pet.happiness = v.min(STAT_MAX);
        }
        if let Some(v) = update.hunger {
            pet.hunger = v.min(STAT_MAX);
        }
        if let Some(v) = update.energy {
            pet.energy = v.min(STAT_MAX);
        }
        Some(&*pet)
    }

    /// Add experience, recompute level, then run one evolution check.
    ///
    /// A level-up grants +25 happiness. Returns `None` for unknown ids.
    pub fn add_experience(&mut self, id: &str, xp: u32) -> Option<ExperienceOutcome> {
        let pet = self.pet_mut(id)?;
        let previous_level = pet.level;
        pet.experience = pet.experience.saturating_add(xp);
        pet.level = pet.level.max(level_for_experience(pet.experience));
        let leveled_up = pet.level > previous_level;
        if leveled_up {
            pet.happiness = add_stat(pet.happiness, LEVEL_UP_HAPPINESS);
            tracing::info!(pet_id = id, level = pet.level, "pet leveled up");
        }
        let experience = pet.experience;
        let level = pet.level;

        let evolved = self.check_evolution(id);
        let evolution_stage = self.pet(id).map(|p| p.evolution_stage).unwrap_or_default();
        Some(ExperienceOutcome {
            experience,
            previous_level,
            level,
            leveled_up,
            evolved,
            evolution_stage,
        })
    }

    /// Promote the pet by at most one evolution stage. Returns whether it evolved.
    pub fn check_evolution(&mut self, id: &str) -> bool {
        let Some(pet) = self.pet_mut(id) else {
            return false;
        };
        if !pet.can_evolve() {
            return false;
        }
        pet.evolution_stage += 1;
        tracing::info!(
            pet_id = id,
            stage = pet.evolution_stage,
            stage_name = pet.stage_name(),
            "pet evolved"
        );
        true
    }

    /// Remove every pet and clear the active pointer.
    pub fn reset_data(&mut self) {
        self.pets.clear();
        self.active_pet_id = None;
    }

    // ── Export / import ──────────────────────────────────────────────

    /// Pretty-printed `{pets, activePetId, exportedAt, version}` document.
    pub fn export_data(&self) -> serde_json::Result<String> {
        let doc = PetExport {
            pets: self.pets.clone(),
            active_pet_id: self.active_pet_id.clone(),
            exported_at: Some(Utc::now()),
            version: Some(EXPORT_VERSION.to_string()),
        };
        serde_json::to_string_pretty(&doc)
    }

    /// Replace the whole collection from an exported document.
    ///
    /// Nothing changes unless the document parses and every pet is well formed.
    pub fn import_data(&mut self, data: &str) -> Result<(), ImportError> {
        let value: serde_json::Value =
            serde_json::from_str(data).map_err(ImportError::InvalidJson)?;
        if !value.get("pets").is_some_and(serde_json::Value::is_array) {
            return Err(ImportError::MalformedPayload(
                "expected a `pets` array".into(),
            ));
        }
        let doc: PetExport = serde_json::from_value(value)
            .map_err(|e| ImportError::MalformedPayload(e.to_string()))?;
        if let Some(version) = doc.version.filter(|v| v != EXPORT_VERSION) {
            return Err(ImportError::UnsupportedVersion { found: version });
        }
        if let Some(err) = doc.pets.iter().find_map(|p| p.out_of_range()) {
            return Err(ImportError::MalformedPayload(err));
        }

        let active = doc
            .active_pet_id
            .filter(|id| doc.pets.iter().any(|p| &p.id == id));
        let mut pets = doc.pets;
        for pet in &mut pets {
            pet.is_active = active.as_deref() == Some(pet.id.as_str());
        }
        tracing::info!(count = pets.len(), "pets imported");
        self.pets = pets;
        self.active_pet_id = active;
        Ok(())
    }
}
