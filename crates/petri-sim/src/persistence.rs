//! DNA save slots.
//!
//! The player's traits survive across runs: the save is read once at
//! startup to seed the player cell and written on game over with a mutated
//! next generation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use petri_core::types::Dna;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

pub const SAVE_VERSION: u32 = 1;

/// Full save data written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub generation: u32,
    pub dna: Dna,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            generation: 0,
            dna: Dna::default(),
        }
    }
}

fn save_path(dir: &Path, slot: &str) -> std::path::PathBuf {
    dir.join(format!("{}.json", slot))
}

pub fn save_to_file(dir: &Path, slot: &str, data: &SaveData) -> Result<(), String> {
    fs::create_dir_all(dir).map_err(|e| format!("Failed to create save directory: {e}"))?;
    let path = save_path(dir, slot);
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| format!("Failed to serialize save data: {e}"))?;
    fs::write(&path, json).map_err(|e| format!("Failed to write save file: {e}"))?;
    Ok(())
}

pub fn load_from_file(dir: &Path, slot: &str) -> Result<SaveData, String> {
    let path = save_path(dir, slot);
    let json = fs::read_to_string(&path).map_err(|e| format!("Failed to read save file: {e}"))?;
    let data: SaveData =
        serde_json::from_str(&json).map_err(|e| format!("Failed to parse save data: {e}"))?;
    Ok(data)
}

/// Derive the next run's save: bump the generation and drift each DNA color
/// channel a little, clamped to [0, 1].
pub fn next_generation(save: &SaveData, rng: &mut ChaCha8Rng) -> SaveData {
    let mut dna = save.dna;
    for channel in [&mut dna.r, &mut dna.g, &mut dna.b] {
        *channel = (*channel + rng.gen_range(-0.1..0.1)).clamp(0.0, 1.0);
    }
    SaveData {
        version: SAVE_VERSION,
        generation: save.generation + 1,
        dna,
    }
}
