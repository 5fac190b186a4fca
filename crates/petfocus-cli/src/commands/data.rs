//! Whole-app backup commands.

use chrono::Local;
use clap::Subcommand;
use petfocus_core::storage::backup::{clear_all, data_size_kb, import_all};
use petfocus_core::{Backup, Config, Database};
use serde_json::json;
use std::path::PathBuf;

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum DataAction {
    /// Write a backup of pets, tasks and timer
    Export {
        /// Output file (defaults to petfocus-backup-<date>.json in the backup directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Restore a backup, replacing stored state
    Import { path: PathBuf },
    /// Delete all stored state
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
    /// Size of stored state in KiB
    Size,
}

fn default_backup_path() -> PathBuf {
    let name = Backup::file_name(Local::now().date_naive());
    match Config::load_or_default().backup.directory {
        Some(dir) => PathBuf::from(dir).join(name),
        None => PathBuf::from(name),
    }
}

pub fn run(action: DataAction) -> CmdResult {
    let db = Database::open()?;

    match action {
        DataAction::Export { output } => {
            let path = output.unwrap_or_else(default_backup_path);
            let backup = Backup::export(&db)?;
            std::fs::write(&path, backup.to_json()?)?;
            println!("Backup written to {}", path.display());
        }
        DataAction::Import { path } => {
            let data = std::fs::read_to_string(&path)?;
            let backup = import_all(&db, &data)?;
            println!("Backup from {} restored", backup.exported_at.to_rfc3339());
        }
        DataAction::Clear { yes } => {
            if !yes {
                return Err("refusing to clear data without --yes".into());
            }
            clear_all(&db)?;
            println!("All data cleared");
        }
        DataAction::Size => {
            print_json(&json!({ "sizeKb": data_size_kb(&db)? }))?;
        }
    }
    Ok(())
}
