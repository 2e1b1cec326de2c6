//! Headless driver: loads the player's DNA, runs the simulation on a
//! background thread, prints periodic stats, and writes the mutated
//! next-generation save when the run ends.

mod game_loop;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use petri_core::commands::PlayerCommand;
use petri_sim::engine::SimConfig;
use petri_sim::persistence::{self, SaveData};

use crate::game_loop::{spawn_game_loop, LoopCommand};

const SAVE_SLOT: &str = "player";

fn main() {
    let save_dir = PathBuf::from("saves");
    let save = match persistence::load_from_file(&save_dir, SAVE_SLOT) {
        Ok(save) => {
            println!(
                "Loaded generation {} (speed {:.2}, color {:.2}/{:.2}/{:.2})",
                save.generation, save.dna.speed, save.dna.r, save.dna.g, save.dna.b
            );
            save
        }
        Err(_) => {
            println!("No save found, starting generation 0");
            SaveData::default()
        }
    };

    let config = SimConfig {
        seed: 0xC0FFEE ^ u64::from(save.generation),
        starting_dna: save.dna,
        ..SimConfig::default()
    };

    let latest = Arc::new(Mutex::new(None));
    let (cmd_tx, handle) = spawn_game_loop(config, Arc::clone(&latest));

    // Scripted wander: rotate the steering heading once a second so the
    // cell roams the dish instead of idling at the center.
    let mut rng = ChaCha8Rng::seed_from_u64(u64::from(save.generation));
    while !handle.is_finished() {
        std::thread::sleep(Duration::from_secs(1));

        if let Ok(lock) = latest.lock() {
            if let Some(snapshot) = lock.as_ref() {
                println!(
                    "tick {:>6}  points {:>5}  food {:>4}  player r {:.1}",
                    snapshot.tick, snapshot.point_count, snapshot.food_count,
                    snapshot.player_radius
                );
            }
        }

        let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
        let command = LoopCommand::Player(PlayerCommand::Steer {
            x: angle.cos(),
            y: angle.sin(),
        });
        if cmd_tx.send(command).is_err() {
            break;
        }
    }

    let _ = cmd_tx.send(LoopCommand::Shutdown);
    let _ = handle.join();

    let final_radius = latest
        .lock()
        .ok()
        .and_then(|lock| lock.as_ref().map(|s| s.player_radius));
    match final_radius {
        Some(r) => println!("Run over with player radius {r:.1}"),
        None => println!("Run over before the first snapshot"),
    }

    let mut save_rng = ChaCha8Rng::seed_from_u64(u64::from(save.generation) + 1);
    let next = persistence::next_generation(&save, &mut save_rng);
    match persistence::save_to_file(&save_dir, SAVE_SLOT, &next) {
        Ok(()) => println!("Saved generation {}", next.generation),
        Err(e) => eprintln!("Failed to save: {e}"),
    }
}
