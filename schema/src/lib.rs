// Pokemon Code Quest Schema - Shared type definitions
// This crate contains the static data vocabulary (types, species, moves,
// items, biomes) shared by the battle engine, the encounter generator and
// any tooling that produces reference data files.

// Re-export the main types
pub use battle_data::*;
pub use move_types::*;
pub use pokemon_types::*;
pub use species_data::*;

pub mod battle_data;
pub mod move_types;
pub mod pokemon_types;
pub mod species_data;
