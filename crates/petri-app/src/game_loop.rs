//! Game loop thread — runs the engine at a fixed 60Hz timestep.
//!
//! The engine is created inside the thread because it's cleaner for
//! ownership. Commands arrive via `mpsc` channel; the latest snapshot is
//! stored in shared state for polling from the main thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use petri_core::commands::PlayerCommand;
use petri_core::constants::DT;
use petri_sim::engine::{Engine, GamePhase, SimConfig};
use petri_sim::systems::snapshot::StateSnapshot;

/// Frames longer than this are clamped before feeding the accumulator, so
/// one long stall produces at most a quarter second of catch-up stepping.
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(250);
/// Accumulated lag past this point is dropped outright instead of
/// simulated, breaking any catch-up spiral.
pub const LAG_RESET_THRESHOLD: Duration = Duration::from_secs(1);

/// Fixed-timestep accumulator. Render time is decoupled from simulation
/// time: the caller reports elapsed wall time, this hands back how many
/// whole fixed steps to run, and `alpha` exposes the leftover fraction for
/// render interpolation. The simulation itself never partially steps.
pub struct FixedTimestep {
    accumulator: f64,
    dt: f64,
}

impl FixedTimestep {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            dt: DT as f64,
        }
    }

    /// Feed one frame's elapsed time; returns the number of fixed steps the
    /// caller must run.
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.accumulator += frame_time.min(MAX_FRAME_TIME).as_secs_f64();
        if self.accumulator > LAG_RESET_THRESHOLD.as_secs_f64() {
            self.accumulator = 0.0;
            return 0;
        }
        let mut steps = 0;
        while self.accumulator >= self.dt {
            self.accumulator -= self.dt;
            steps += 1;
        }
        steps
    }

    /// Fraction of a step left in the accumulator, in `[0, 1)`.
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.dt) as f32
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new()
    }
}

pub enum LoopCommand {
    Player(PlayerCommand),
    Shutdown,
}

/// Spawns the game loop in a new thread. Returns the command sender and
/// the thread handle; the thread exits on game over, shutdown, or channel
/// disconnect.
pub fn spawn_game_loop(
    config: SimConfig,
    latest_snapshot: Arc<Mutex<Option<StateSnapshot>>>,
) -> (mpsc::Sender<LoopCommand>, JoinHandle<()>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let handle = std::thread::Builder::new()
        .name("petri-game-loop".into())
        .spawn(move || {
            run_game_loop(config, cmd_rx, &latest_snapshot);
        })
        .expect("Failed to spawn game loop thread");

    (cmd_tx, handle)
}

fn run_game_loop(
    config: SimConfig,
    cmd_rx: mpsc::Receiver<LoopCommand>,
    latest_snapshot: &Mutex<Option<StateSnapshot>>,
) {
    let mut engine = match Engine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Failed to build engine: {e}");
            return;
        }
    };
    let mut timestep = FixedTimestep::new();
    let mut last_frame = Instant::now();

    loop {
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Player(cmd)) => engine.queue_command(cmd),
                Ok(LoopCommand::Shutdown) => return,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        let now = Instant::now();
        let frame_time = now - last_frame;
        last_frame = now;

        for _ in 0..timestep.advance(frame_time) {
            match engine.tick(DT) {
                Ok(snapshot) => {
                    if let Ok(mut lock) = latest_snapshot.lock() {
                        *lock = Some(snapshot);
                    }
                }
                Err(e) => {
                    eprintln!("Simulation error: {e}");
                    return;
                }
            }
        }

        if engine.phase() == GamePhase::GameOver {
            return;
        }

        // A half-step nap keeps CPU use sane without starving the
        // accumulator.
        std::thread::sleep(Duration::from_secs_f64(DT as f64 / 2.0));
    }
}
