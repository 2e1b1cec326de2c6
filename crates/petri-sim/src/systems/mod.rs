pub mod camera;
pub mod control;
pub mod predation;
pub mod snapshot;
pub mod spawner;
