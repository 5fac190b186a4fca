//! Species catalogue: starting stats and display data for each kind of pet.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of adoptable species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
    Rabbit,
    Hamster,
    Parrot,
    Fish,
    Turtle,
}

/// Stats a freshly adopted pet starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialStats {
    pub happiness: u32,
    pub hunger: u32,
    pub energy: u32,
}

/// One named tier of a species' evolution line.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionStage {
    pub name: &'static str,
    pub description: &'static str,
    pub required_level: u32,
}

/// Display data for a species.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
    pub favorite_food: &'static str,
    pub favorite_activity: &'static str,
    pub personality: &'static str,
    pub evolution_stages: [EvolutionStage; 4],
}

const fn stage(name: &'static str, description: &'static str, required_level: u32) -> EvolutionStage {
    EvolutionStage {
        name,
        description,
        required_level,
    }
}

static DOG: SpeciesInfo = SpeciesInfo {
    name: "Golden Retriever",
    description: "Loyal and energetic companion",
    emoji: "🐕",
    favorite_food: "Premium dog food",
    favorite_activity: "Playing fetch",
    personality: "Loyal and energetic",
    evolution_stages: [
        stage("Small Puppy", "Tiny, fluffy, and playful", 1),
        stage("Growing Dog", "Bigger, stronger, more confident", 3),
        stage("Strong Adult", "Muscular, powerful, and wise", 6),
        stage("Alpha Dog", "Largest, strongest, pack leader", 9),
    ],
};

static CAT: SpeciesInfo = SpeciesInfo {
    name: "Maine Coon",
    description: "Independent and graceful",
    emoji: "🐱",
    favorite_food: "Fresh fish",
    favorite_activity: "Hunting and napping",
    personality: "Independent and graceful",
    evolution_stages: [
        stage("Tiny Kitten", "Small, curious, and fluffy", 1),
        stage("Young Cat", "Agile, sleek, and confident", 3),
        stage("Large Cat", "Big, strong, and majestic", 6),
        stage("Giant Maine Coon", "Massive, powerful, regal feline", 9),
    ],
};

static RABBIT: SpeciesInfo = SpeciesInfo {
    name: "Flemish Giant",
    description: "Gentle and peaceful",
    emoji: "🐰",
    favorite_food: "Fresh vegetables",
    favorite_activity: "Hopping and exploring",
    personality: "Gentle and peaceful",
    evolution_stages: [
        stage("Small Bunny", "Tiny, soft, and adorable", 1),
        stage("Medium Rabbit", "Bigger, faster, more athletic", 3),
        stage("Large Rabbit", "Strong, robust, and confident", 6),
        stage("Giant Rabbit", "Massive, powerful, impressive size", 9),
    ],
};

static HAMSTER: SpeciesInfo = SpeciesInfo {
    name: "Syrian Hamster",
    description: "Small but energetic",
    emoji: "🐹",
    favorite_food: "Sunflower seeds",
    favorite_activity: "Running on wheel",
    personality: "Energetic and curious",
    evolution_stages: [
        stage("Baby Hamster", "Tiny, pink, and vulnerable", 1),
        stage("Young Hamster", "Fluffy, active, and growing", 3),
        stage("Adult Hamster", "Chunky, strong, and confident", 6),
        stage("Alpha Hamster", "Largest, strongest, territory ruler", 9),
    ],
};

static PARROT: SpeciesInfo = SpeciesInfo {
    name: "Macaw",
    description: "Colorful and intelligent",
    emoji: "🦜",
    favorite_food: "Tropical fruits",
    favorite_activity: "Flying and talking",
    personality: "Smart and social",
    evolution_stages: [
        stage("Baby Chick", "Small, fluffy, learning to fly", 1),
        stage("Young Parrot", "Colorful feathers, strong wings", 3),
        stage("Adult Macaw", "Large, magnificent, powerful beak", 6),
        stage("Giant Macaw", "Massive wingspan, commanding presence", 9),
    ],
};

static FISH: SpeciesInfo = SpeciesInfo {
    name: "Goldfish",
    description: "Peaceful swimmer",
    emoji: "🐠",
    favorite_food: "Fish flakes",
    favorite_activity: "Swimming in circles",
    personality: "Calm and peaceful",
    evolution_stages: [
        stage("Tiny Fry", "Small, delicate, just learning to swim", 1),
        stage("Young Fish", "Growing fins, stronger swimmer", 3),
        stage("Large Fish", "Big, healthy, graceful movements", 6),
        stage("Giant Goldfish", "Massive size, tank dominator", 9),
    ],
};

static TURTLE: SpeciesInfo = SpeciesInfo {
    name: "Red-Eared Slider",
    description: "Wise and patient",
    emoji: "🐢",
    favorite_food: "Lettuce and crickets",
    favorite_activity: "Basking in sun",
    personality: "Patient and wise",
    evolution_stages: [
        stage("Baby Turtle", "Tiny shell, vulnerable and cute", 1),
        stage("Young Turtle", "Stronger shell, more confident", 3),
        stage("Adult Turtle", "Large shell, wise and strong", 6),
        stage("Ancient Turtle", "Massive shell, incredible wisdom", 9),
    ],
};

impl Species {
    pub const ALL: [Species; 7] = [
        Species::Dog,
        Species::Cat,
        Species::Rabbit,
        Species::Hamster,
        Species::Parrot,
        Species::Fish,
        Species::Turtle,
    ];

    /// Starting stats. Hunger is 40 for every species.
    pub fn initial_stats(self) -> InitialStats {
        let (happiness, energy) = match self {
            Species::Dog => (85, 95),
            Species::Cat => (75, 85),
            Species::Rabbit => (90, 100),
            Species::Hamster => (88, 95),
            Species::Parrot => (82, 88),
            Species::Fish => (70, 75),
            Species::Turtle => (78, 65),
        };
        InitialStats {
            happiness,
            hunger: 40,
            energy,
        }
    }

    pub fn info(self) -> &'static SpeciesInfo {
        match self {
            Species::Dog => &DOG,
            Species::Cat => &CAT,
            Species::Rabbit => &RABBIT,
            Species::Hamster => &HAMSTER,
            Species::Parrot => &PARROT,
            Species::Fish => &FISH,
            Species::Turtle => &TURTLE,
        }
    }

    /// Name of the given evolution stage; stages past the last one clamp to it.
    pub fn stage_name(self, evolution_stage: u32) -> &'static str {
        let stages = &self.info().evolution_stages;
        let idx = (evolution_stage as usize).min(stages.len() - 1);
        stages[idx].name
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
            Species::Rabbit => "rabbit",
            Species::Hamster => "hamster",
            Species::Parrot => "parrot",
            Species::Fish => "fish",
            Species::Turtle => "turtle",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Species::ALL
            .into_iter()
            .find(|sp| sp.as_str() == lower)
            .ok_or_else(|| format!("unknown species: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_species_starts_with_hunger_40() {
        for species in Species::ALL {
            assert_eq!(species.initial_stats().hunger, 40, "{species}");
        }
    }

    #[test]
    fn dog_stats() {
        let stats = Species::Dog.initial_stats();
        assert_eq!((stats.happiness, stats.energy), (85, 95));
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Turtle".parse::<Species>().unwrap(), Species::Turtle);
        assert!("dragon".parse::<Species>().is_err());
    }

    #[test]
    fn stage_names_follow_required_levels() {
        for species in Species::ALL {
            let levels: Vec<u32> = species
                .info()
                .evolution_stages
                .iter()
                .map(|s| s.required_level)
                .collect();
            assert_eq!(levels, vec![1, 3, 6, 9]);
        }
        assert_eq!(Species::Cat.stage_name(3), "Giant Maine Coon");
        assert_eq!(Species::Cat.stage_name(7), "Giant Maine Coon");
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Species::Hamster).unwrap(), "\"hamster\"");
    }
}
