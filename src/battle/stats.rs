use crate::battle::combatant::Combatant;
use crate::battle::conditions::BattleModifiers;
use crate::pokemon::PokemonInst;
use schema::{Ailment, PokemonType, StatType};

pub const MIN_STAGE: i8 = -6;
pub const MAX_STAGE: i8 = 6;

/// Paralysis slows a Pokemon to three quarters of its speed.
const PARALYSIS_SPEED_FACTOR: f64 = 0.75;

/// Stat stage multiplier. Stages are clamped to [-6, 6].
/// Positive stages: (2 + stage) / 2
/// Negative stages: 2 / (2 - stage)
pub fn stage_multiplier(stage: i8) -> f64 {
    let stage = stage.clamp(MIN_STAGE, MAX_STAGE) as f64;
    if stage >= 0.0 {
        (2.0 + stage) / 2.0
    } else {
        2.0 / (2.0 - stage)
    }
}

/// Apply a stage multiplier to a stat, flooring the result.
pub fn apply_stage(base_stat: u16, stage: i8) -> u16 {
    (base_stat as f64 * stage_multiplier(stage)).floor() as u16
}

/// A stat after its battle stage is applied.
pub fn staged_stat(pokemon: &PokemonInst, modifiers: &BattleModifiers, stat: StatType) -> u16 {
    apply_stage(pokemon.stat(stat), modifiers.stage(stat))
}

/// The (attack, defense) stat pair a move of this type uses.
pub fn offensive_stats(move_type: PokemonType) -> (StatType, StatType) {
    if move_type.is_physical() {
        (StatType::Attack, StatType::Defense)
    } else {
        (StatType::SpecialAttack, StatType::SpecialDefense)
    }
}

/// Speed used for turn order: staged speed, reduced when paralyzed.
pub fn effective_speed(combatant: &Combatant) -> f64 {
    let speed = staged_stat(&combatant.pokemon, &combatant.modifiers, StatType::Speed) as f64;
    if combatant.pokemon.ailment() == Ailment::Paralysis {
        speed * PARALYSIS_SPEED_FACTOR
    } else {
        speed
    }
}
