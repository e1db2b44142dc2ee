//! Wild encounter generation: pick a species for a biome and depth, then
//! roll a fully-statted wild Pokemon for it.

pub mod generator;

pub use generator::{
    apply_rate_band, bonus_weight, candidate_pool, generate, instantiate, select_weighted,
    wild_level,
};
