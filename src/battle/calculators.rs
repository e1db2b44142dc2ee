//! Move effect resolution: damage, hit/evade, critical hits and the
//! secondary effects a move declares. Pure given its inputs and RNG; the
//! caller applies the returned deltas.

use crate::battle::conditions::BattleModifiers;
use crate::battle::state::TurnRng;
use crate::battle::stats::{offensive_stats, staged_stat};
use crate::pokemon::{MoveInstance, PokemonInst};
use phf::phf_map;
use schema::{Ailment, MoveMeta, StatType, TypeChart};

const STAB_MULTIPLIER: f64 = 1.5;
const CRITICAL_MULTIPLIER: f64 = 1.5;
const RANDOM_FACTOR_MIN: f64 = 0.85;
const RANDOM_FACTOR_SPAN: f64 = 0.15;
const MAX_EVADE_CHANCE: f64 = 50.0;

/// What a declared ailment name does to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AilmentEffect {
    Status(Ailment),
    Confusion,
}

/// Fixed table of ailment names a move's metadata may declare.
/// Names outside the table ("none", "trap", ...) have no effect here.
pub static AILMENT_NAMES: phf::Map<&'static str, AilmentEffect> = phf_map! {
    "poison" => AilmentEffect::Status(Ailment::Poison),
    "burn" => AilmentEffect::Status(Ailment::Burn),
    "paralysis" => AilmentEffect::Status(Ailment::Paralysis),
    "sleep" => AilmentEffect::Status(Ailment::Sleep),
    "freeze" => AilmentEffect::Status(Ailment::Freeze),
    "confusion" => AilmentEffect::Confusion,
};

pub fn ailment_effect(name: &str) -> Option<AilmentEffect> {
    AILMENT_NAMES.get(name).copied()
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoveEffectResult {
    pub damage: u16,
    pub is_critical: bool,
    pub effectiveness: f32,
    /// Accuracy passed and the defender did not evade.
    pub is_hit: bool,
    /// Accuracy check alone.
    pub is_successful_attack: bool,
    pub is_successful_evade: bool,
    /// Summed stage deltas, indexed like `StatType::index`.
    pub attacker_stat_changes: [i8; 6],
    pub defender_stat_changes: [i8; 6],
    pub flinched: bool,
    pub confused: bool,
    pub ailment: Option<Ailment>,
}

/// Critical hit chance for a crit-rate tier.
pub fn critical_chance(tier: u8) -> f64 {
    match tier {
        0 => 1.0 / 16.0,
        1 => 1.0 / 8.0,
        2 => 1.0 / 2.0,
        _ => 1.0,
    }
}

/// Chance (in percent) that a faster defender evades: the speed gap as a
/// share of the defender's speed, capped at 50.
pub fn evade_chance(attacker_speed: u16, defender_speed: u16) -> f64 {
    if defender_speed <= attacker_speed {
        return 0.0;
    }
    let gap = (defender_speed - attacker_speed) as f64 / defender_speed as f64 * 100.0;
    gap.min(MAX_EVADE_CHANCE)
}

/// Damage before the random factor and critical modifier are rolled.
/// Base = ((2 * level / 5 + 2) * power * atk / def) / 50 + 2, floored once at the end.
#[allow(clippy::too_many_arguments)]
pub fn calculate_damage(
    level: u8,
    power: u16,
    attack: u16,
    defense: u16,
    stab: bool,
    effectiveness: f32,
    random_factor: f64,
    critical: bool,
) -> u16 {
    let level = level as f64;
    let ratio = attack as f64 / (defense.max(1)) as f64;
    let mut damage = ((2.0 * level / 5.0 + 2.0) * power as f64 * ratio) / 50.0 + 2.0;

    if stab {
        damage *= STAB_MULTIPLIER;
    }
    damage *= effectiveness as f64;
    damage *= random_factor;
    if critical {
        damage *= CRITICAL_MULTIPLIER;
    }

    damage.max(0.0).floor().min(u16::MAX as f64) as u16
}

/// Resolve one use of `move_used` by `attacker` against `defender`.
///
/// Draw order is fixed so scripted tests can steer each branch: random
/// factor, critical, accuracy and evasion are always drawn; the secondary
/// effect rolls follow only on a hit.
pub fn resolve_move_effect(
    attacker: &PokemonInst,
    attacker_modifiers: &BattleModifiers,
    defender: &PokemonInst,
    defender_modifiers: &BattleModifiers,
    move_used: &MoveInstance,
    type_chart: &TypeChart,
    rng: &mut TurnRng,
) -> MoveEffectResult {
    let effectiveness = type_chart.effectiveness(move_used.move_type, &defender.types);
    let crit_tier = move_used.meta.as_ref().map_or(0, |meta| meta.crit_rate);

    let random_factor = RANDOM_FACTOR_MIN + rng.next_outcome("damage random factor") * RANDOM_FACTOR_SPAN;
    let critical_roll = rng.next_outcome("critical hit") < critical_chance(crit_tier);
    let accuracy_roll = rng.next_outcome("accuracy") * 100.0;
    let evade_roll = rng.next_outcome("evasion") * 100.0;

    let is_successful_attack = match move_used.accuracy {
        Some(accuracy) => accuracy_roll <= accuracy as f64,
        None => true,
    };
    let chance = evade_chance(
        staged_stat(attacker, attacker_modifiers, StatType::Speed),
        staged_stat(defender, defender_modifiers, StatType::Speed),
    );
    let is_successful_evade = is_successful_attack && evade_roll < chance;
    let is_hit = is_successful_attack && !is_successful_evade;

    let mut result = MoveEffectResult {
        effectiveness,
        is_hit,
        is_successful_attack,
        is_successful_evade,
        ..MoveEffectResult::default()
    };

    if !is_hit {
        return result;
    }

    if let Some(power) = move_used.power {
        let (attack_stat, defense_stat) = offensive_stats(move_used.move_type);
        let attack = staged_stat(attacker, attacker_modifiers, attack_stat);
        let defense = staged_stat(defender, defender_modifiers, defense_stat);
        let stab = attacker.types.contains(&move_used.move_type);

        result.is_critical = critical_roll;
        result.damage = calculate_damage(
            attacker.level,
            power,
            attack,
            defense,
            stab,
            effectiveness,
            random_factor,
            critical_roll,
        );

        // An immune target shrugs off the whole move.
        if effectiveness == 0.0 {
            return result;
        }
    }

    if let Some(meta) = &move_used.meta {
        apply_secondary_effects(meta, &mut result, rng);
    }

    result
}

fn apply_secondary_effects(meta: &MoveMeta, result: &mut MoveEffectResult, rng: &mut TurnRng) {
    // A chance of 0 marks the effect as the move's primary effect.
    if let Some(effect) = ailment_effect(&meta.ailment) {
        let lands = meta.ailment_chance == 0
            || rng.next_outcome("ailment chance") * 100.0 < meta.ailment_chance as f64;
        if lands {
            match effect {
                AilmentEffect::Status(ailment) => result.ailment = Some(ailment),
                AilmentEffect::Confusion => result.confused = true,
            }
        }
    }

    if meta.flinch_chance > 0 {
        result.flinched = rng.next_outcome("flinch chance") * 100.0 < meta.flinch_chance as f64;
    }

    if !meta.stat_changes.is_empty() {
        let lands = meta.stat_chance == 0
            || rng.next_outcome("stat change chance") * 100.0 < meta.stat_chance as f64;
        if lands {
            let bucket = if meta.target.is_user() {
                &mut result.attacker_stat_changes
            } else {
                &mut result.defender_stat_changes
            };
            for change in &meta.stat_changes {
                let slot = &mut bucket[change.stat.index()];
                *slot = slot.saturating_add(change.change);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_damage_scenario_level_50_stab() {
        // ((2*50/5 + 2) * 40 * 50/50) / 50 + 2 = 19.6. The floor comes after
        // every modifier: 19.6 * 1.5 = 29.4 gives 29, where flooring the base
        // first would give floor(19.6) * 1.5 = 28.
        assert_eq!(calculate_damage(50, 40, 50, 50, true, 1.0, 1.0, false), 29);
        assert_eq!(calculate_damage(50, 40, 50, 50, false, 1.0, 1.0, false), 19);
    }

    #[test]
    fn test_damage_modifiers() {
        let neutral = calculate_damage(50, 80, 100, 100, false, 1.0, 1.0, false);
        assert_eq!(neutral, 37); // 35.2 + 2
        assert_eq!(calculate_damage(50, 80, 100, 100, false, 2.0, 1.0, false), 74);
        assert_eq!(calculate_damage(50, 80, 100, 100, false, 0.0, 1.0, false), 0);
        assert_eq!(calculate_damage(50, 80, 100, 100, false, 1.0, 1.0, true), 55);
        assert!(calculate_damage(50, 80, 100, 100, false, 1.0, 0.85, false) < neutral);
    }

    #[rstest]
    #[case(0, 1.0 / 16.0)]
    #[case(1, 1.0 / 8.0)]
    #[case(2, 0.5)]
    #[case(3, 1.0)]
    #[case(7, 1.0)]
    fn test_critical_tiers(#[case] tier: u8, #[case] expected: f64) {
        assert_eq!(critical_chance(tier), expected);
    }

    #[rstest]
    #[case(100, 50, 0.0)]
    #[case(50, 50, 0.0)]
    #[case(75, 100, 25.0)]
    #[case(10, 100, 50.0)]
    fn test_evade_chance(#[case] attacker: u16, #[case] defender: u16, #[case] expected: f64) {
        assert_eq!(evade_chance(attacker, defender), expected);
    }

    #[test]
    fn test_ailment_name_table() {
        assert_eq!(
            ailment_effect("paralysis"),
            Some(AilmentEffect::Status(Ailment::Paralysis))
        );
        assert_eq!(ailment_effect("confusion"), Some(AilmentEffect::Confusion));
        assert_eq!(ailment_effect("none"), None);
        assert_eq!(ailment_effect(""), None);
    }
}
