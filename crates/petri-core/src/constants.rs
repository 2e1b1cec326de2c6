//! Tuning constants for the simulation.

/// Fixed timestep: 60 Hz
pub const TICK_RATE: f32 = 60.0;
pub const DT: f32 = 1.0 / TICK_RATE;

/// Hard ceiling on live entities. All component stores, the entity pool and
/// the grid's intrusive `next` array are sized to this at construction.
pub const MAX_ENTITIES: usize = 10_000;

/// Sentinel for "no entity" in sparse arrays, grid chains and constraint data.
pub const NULL_ENTITY: i32 = -1;

/// World dimensions in world units
pub const WORLD_WIDTH: f32 = 1920.0;
pub const WORLD_HEIGHT: f32 = 1080.0;

/// Broad-phase cell size. Two points within one cell size of each other are
/// guaranteed to share a 3x3 neighbor query.
pub const GRID_CELL_SIZE: f32 = 100.0;

// --- Verlet solver ---

/// Gauss-Seidel relaxation passes per step. More iterations buy stiffness
/// accuracy at CPU cost.
pub const CONSTRAINT_ITERATIONS: u32 = 8;
/// Squared-distance floor in the constraint solver.
pub const MIN_DISTANCE_SQ: f32 = 1e-4;
/// Velocity retained (and reflected) when a point is clamped to the bounds.
pub const BOUNCE_DAMPING: f32 = 0.8;

// --- Predation ---

/// A predator must be strictly larger than ratio * prey radius to eat it.
pub const PREDATION_RATIO: f32 = 1.1;
/// Fraction of the prey's area the predator absorbs on an eat.
pub const ABSORPTION: f32 = 0.5;

// --- Food spawning ---

pub const TARGET_FOOD_COUNT: usize = 800;
pub const FOOD_SPAWN_PER_TICK: usize = 10;
pub const FOOD_RADIUS_MIN: f32 = 5.0;
pub const FOOD_RADIUS_MAX: f32 = 10.0;
pub const FOOD_FRICTION: f32 = 0.98;

// --- Cell building ---

pub const PLAYER_CELL_RADIUS: f32 = 50.0;
pub const PLAYER_CELL_SEGMENTS: u32 = 12;
pub const HOSTILE_CELL_RADIUS: f32 = 20.0;
pub const HOSTILE_CELL_SEGMENTS: u32 = 6;
pub const HOSTILE_CELL_COUNT: u32 = 3;
/// Spoke constraints (center to rim) are soft; rim constraints are stiff.
pub const SPOKE_STIFFNESS: f32 = 0.05;
pub const RIM_STIFFNESS: f32 = 0.8;
pub const CENTER_FRICTION: f32 = 0.95;
pub const SEGMENT_FRICTION: f32 = 0.9;
pub const SEGMENT_RADIUS: f32 = 5.0;

// --- Player control ---

/// Top speed in world units per tick.
pub const CONTROL_MAX_SPEED: f32 = 2.5;
/// Blend toward target velocity per tick while steering.
pub const CONTROL_ACCEL_FACTOR: f32 = 0.15;
/// Velocity reduction per tick while coasting.
pub const CONTROL_BRAKE_FACTOR: f32 = 0.3;
/// Below this speed a coasting player snaps to a stop.
pub const CONTROL_STOP_EPSILON: f32 = 0.01;

// --- Camera ---

pub const CAMERA_LERP_FACTOR: f32 = 0.1;
pub const CAMERA_ZOOM_LERP_FACTOR: f32 = 0.05;
pub const CAMERA_BASE_SCALE: f32 = 150.0;
