//! Core types and data store for the PETRI simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! the entity allocator, the sparse-set component store, the registry,
//! component definitions, constants and the error taxonomy. It has no
//! dependency on any runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod entity;
pub mod error;
pub mod registry;
pub mod store;
pub mod types;

pub use commands::PlayerCommand;
pub use entity::{Entity, EntityManager};
pub use error::EcsError;
pub use registry::Registry;
pub use store::{Column, ComponentStore, Element};
