//! Pet commands for CLI.

use clap::Subcommand;
use petfocus_core::{Database, PetFocus, Species, StatUpdate};
use serde_json::json;
use std::path::PathBuf;

use super::{open_app, print_json, CmdResult};

#[derive(Subcommand)]
pub enum PetAction {
    /// Adopt a new pet (the first one becomes active)
    Adopt {
        /// Pet name
        name: String,
        /// Species: dog, cat, rabbit, hamster, parrot, fish, turtle
        species: Species,
    },
    /// List adopted pets
    List,
    /// Show one pet (defaults to the active pet)
    Show { id: Option<String> },
    /// Show the active pet, or make another pet active
    Active { id: Option<String> },
    /// Feed a pet: hunger -30, happiness +10
    Feed { id: Option<String> },
    /// Play with a pet: happiness +20, energy -15
    Play { id: Option<String> },
    /// Pet a pet: happiness +15
    Pet { id: Option<String> },
    /// Grant experience directly
    Xp {
        /// Amount of XP
        amount: u32,
        /// Pet ID (defaults to the active pet)
        #[arg(long)]
        id: Option<String>,
    },
    /// Run an evolution check
    Evolve { id: Option<String> },
    /// Overwrite happiness/hunger/energy
    Stats {
        id: Option<String>,
        #[arg(long)]
        happiness: Option<u32>,
        #[arg(long)]
        hunger: Option<u32>,
        #[arg(long)]
        energy: Option<u32>,
    },
    /// Write all pets as a versioned JSON document
    Export {
        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replace all pets from an exported document
    Import { path: PathBuf },
    /// Describe every species
    Species,
    /// Remove every pet
    Reset,
}

fn resolve_id(app: &PetFocus<Database>, id: Option<String>) -> Result<String, String> {
    match id {
        Some(id) => Ok(id),
        None => app
            .pets()
            .active_pet_id()
            .map(str::to_string)
            .ok_or_else(|| "no active pet; adopt one first or pass an id".to_string()),
    }
}

fn print_pet(app: &PetFocus<Database>, id: &str) -> CmdResult {
    match app.pets().pet(id) {
        Some(pet) => print_json(&json!({
            "pet": pet,
            "stageName": pet.stage_name(),
            "xpToNextLevel": pet.xp_to_next_level(),
        })),
        None => {
            println!("Pet not found: {id}");
            Ok(())
        }
    }
}

pub fn run(action: PetAction) -> CmdResult {
    let mut app = open_app()?;

    match action {
        PetAction::Adopt { name, species } => {
            let pet = app.pets_mut().apply(|p| p.adopt_pet(name, species))?;
            eprintln!("Pet adopted: {}", pet.id);
            print_json(&pet)?;
        }
        PetAction::List => {
            print_json(app.pets().pets())?;
        }
        PetAction::Show { id } => {
            let id = resolve_id(&app, id)?;
            print_pet(&app, &id)?;
        }
        PetAction::Active { id: None } => match app.pets().active_pet() {
            Some(pet) => print_json(pet)?,
            None => println!("No active pet"),
        },
        PetAction::Active { id: Some(id) } => {
            if app.pets_mut().apply(|p| p.set_active_pet(&id))? {
                print_pet(&app, &id)?;
            } else {
                println!("Pet not found: {id}");
            }
        }
        PetAction::Feed { id } => {
            let id = resolve_id(&app, id)?;
            app.pets_mut().apply(|p| p.feed_pet(&id).is_some())?;
            print_pet(&app, &id)?;
        }
        PetAction::Play { id } => {
            let id = resolve_id(&app, id)?;
            app.pets_mut().apply(|p| p.play_with_pet(&id).is_some())?;
            print_pet(&app, &id)?;
        }
        PetAction::Pet { id } => {
            let id = resolve_id(&app, id)?;
            app.pets_mut().apply(|p| p.pet_pet(&id).is_some())?;
            print_pet(&app, &id)?;
        }
        PetAction::Xp { amount, id } => {
            let id = resolve_id(&app, id)?;
            match app.pets_mut().apply(|p| p.add_experience(&id, amount))? {
                Some(outcome) => print_json(&outcome)?,
                None => println!("Pet not found: {id}"),
            }
        }
        PetAction::Evolve { id } => {
            let id = resolve_id(&app, id)?;
            let evolved = app.pets_mut().apply(|p| p.check_evolution(&id))?;
            let stage = app.pets().pet(&id).map(|p| (p.evolution_stage, p.stage_name()));
            print_json(&json!({
                "evolved": evolved,
                "evolutionStage": stage.map(|s| s.0),
                "stageName": stage.map(|s| s.1),
            }))?;
        }
        PetAction::Stats {
            id,
            happiness,
            hunger,
            energy,
        } => {
            let id = resolve_id(&app, id)?;
            let update = StatUpdate {
                happiness,
                hunger,
                energy,
            };
            app.pets_mut().apply(|p| p.update_pet_stats(&id, update).is_some())?;
            print_pet(&app, &id)?;
        }
        PetAction::Export { output } => {
            let doc = app.pets().export_data()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, doc)?;
                    eprintln!("Pets exported to {}", path.display());
                }
                None => println!("{doc}"),
            }
        }
        PetAction::Import { path } => {
            let data = std::fs::read_to_string(&path)?;
            app.pets_mut().apply(|p| p.import_data(&data))??;
            eprintln!("Imported {} pets", app.pets().pets().len());
        }
        PetAction::Species => {
            let all: Vec<_> = Species::ALL
                .iter()
                .map(|s| {
                    let stats = s.initial_stats();
                    json!({
                        "species": s,
                        "info": s.info(),
                        "initialStats": {
                            "happiness": stats.happiness,
                            "hunger": stats.hunger,
                            "energy": stats.energy,
                        },
                    })
                })
                .collect();
            print_json(&all)?;
        }
        PetAction::Reset => {
            app.pets_mut().apply(|p| p.reset_data())?;
            println!("All pets removed");
        }
    }
    Ok(())
}
