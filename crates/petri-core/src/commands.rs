//! Player commands sent from the driver to the simulation.
//!
//! Commands are queued and drained at the next tick boundary.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Steer the player cell toward a direction. The vector is normalized
    /// before use; a zero vector is treated as coasting.
    Steer { x: f32, y: f32 },
    /// Release input: the cell brakes to a stop.
    Coast,
}
