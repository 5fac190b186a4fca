pub mod config;
pub mod data;
pub mod pet;
pub mod task;
pub mod timer;

use petfocus_core::{Database, PetFocus};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the on-disk store and hydrate every container.
pub fn open_app() -> Result<PetFocus<Database>, Box<dyn std::error::Error>> {
    Ok(PetFocus::load(Database::open()?)?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
