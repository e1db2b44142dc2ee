pub mod rewards;

pub use rewards::RewardCalculator;

use crate::pokemon::{PokemonInst, MAX_LEVEL};

/// Total experience needed to reach `level` on the medium-fast curve (n^3).
pub fn exp_for_level(level: u8) -> u32 {
    let level = level.clamp(1, MAX_LEVEL) as u32;
    if level == 1 {
        0
    } else {
        level * level * level
    }
}

/// Highest level whose experience threshold `exp` has reached.
pub fn level_for_exp(exp: u32) -> u8 {
    let mut level = 1;
    while level < MAX_LEVEL && exp >= exp_for_level(level + 1) {
        level += 1;
    }
    level
}

/// Add experience, levelling up and recomputing stats as thresholds are crossed.
/// Returns every level reached, in order.
pub fn add_experience(pokemon: &mut PokemonInst, amount: u32) -> Vec<u8> {
    let cap = exp_for_level(MAX_LEVEL);
    pokemon.exp = pokemon.exp.saturating_add(amount).min(cap);

    let target = level_for_exp(pokemon.exp);
    let gained: Vec<u8> = ((pokemon.level + 1)..=target).collect();
    if !gained.is_empty() {
        pokemon.level = target;
        pokemon.recalculate_stats();
    }
    gained
}
