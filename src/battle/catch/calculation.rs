use crate::battle::state::TurnRng;
use crate::pokemon::PokemonInst;
use schema::Ailment;

/// Capture probability in [0, 1].
/// Formula: a = ((3 - 2 * hp_ratio) * catch_rate * ball_modifier) / (3 * 255),
/// then x2 for sleep/freeze and x1.5 for poison/burn/paralysis.
pub fn capture_probability(
    base_catch_rate: u8,
    hp_ratio: f32,
    ball_modifier: f32,
    ailment: Ailment,
) -> f32 {
    let hp_ratio = hp_ratio.clamp(0.0, 1.0);
    let a = ((3.0 - 2.0 * hp_ratio) * base_catch_rate as f32 * ball_modifier) / (3.0 * 255.0);
    (a * ailment_multiplier(ailment)).clamp(0.0, 1.0)
}

/// Ailment multiplier for capture probability
fn ailment_multiplier(ailment: Ailment) -> f32 {
    match ailment {
        Ailment::Sleep | Ailment::Freeze => 2.0,
        Ailment::Poison | Ailment::Burn | Ailment::Paralysis => 1.5,
        Ailment::Healthy | Ailment::Fainted => 1.0,
    }
}

/// Raise a probability by a catch bonus given in percent, clamped to [0, 1].
pub fn apply_catch_bonus(probability: f32, catch_bonus_percent: f32) -> f32 {
    (probability * (1.0 + catch_bonus_percent / 100.0)).clamp(0.0, 1.0)
}

/// HP ratio used for capture: current HP over the species' base HP stat,
/// not the battle max HP.
pub fn capture_hp_ratio(target: &PokemonInst) -> f32 {
    let base_hp = target.base_stats.hp.max(1) as f32;
    (target.current_hp() as f32 / base_hp).clamp(0.0, 1.0)
}

/// Roll for catch success. Returns true if the catch succeeds.
pub fn roll_capture(probability: f32, rng: &mut TurnRng) -> bool {
    rng.next_outcome("catch roll") < probability as f64
}
