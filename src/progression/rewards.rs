use crate::battle::state::{BattleEvent, BattleMode, BattleSide, EventBus};
use crate::pokemon::PokemonInst;
use crate::progression::add_experience;

const WILD_EXP_FACTOR: f32 = 1.0;
const TRAINER_EXP_FACTOR: f32 = 1.5;
const EXP_DIVISOR: f32 = 7.0;

/// Experience rewards for defeating an opponent Pokemon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardCalculator {
    pub exp_multiplier: f32,
    /// Share of the active Pokemon's experience given to every other member.
    pub bench_share: f32,
}

impl RewardCalculator {
    pub fn new(exp_multiplier: f32, bench_share: f32) -> Self {
        Self {
            exp_multiplier,
            bench_share,
        }
    }

    /// Formula: floor(floor(mode_factor * base_exp * level / 7) * exp_multiplier)
    /// where mode_factor is 1.0 for wild and 1.5 for trainer battles.
    pub fn experience_for(&self, defeated: &PokemonInst, mode: BattleMode) -> u32 {
        let factor = match mode {
            BattleMode::Wild => WILD_EXP_FACTOR,
            BattleMode::Trainer => TRAINER_EXP_FACTOR,
        };
        let base = (factor * defeated.base_exp as f32 * defeated.level as f32 / EXP_DIVISOR).floor();
        (base * self.exp_multiplier).floor().max(0.0) as u32
    }

    pub fn bench_experience(&self, full: u32) -> u32 {
        (full as f32 * self.bench_share).floor() as u32
    }

    /// Grant experience for `defeated` to the whole roster: full share to the
    /// active member, the bench share to everyone else. Fainted members still
    /// learn from the battle but stay at 0 HP.
    pub fn distribute(
        &self,
        roster: &mut BattleSide,
        defeated: &PokemonInst,
        mode: BattleMode,
        bus: &mut EventBus,
    ) {
        let full = self.experience_for(defeated, mode);
        if full == 0 {
            return;
        }
        let bench = self.bench_experience(full);
        let active_index = roster.active_index;

        for (index, member) in roster.members.iter_mut().enumerate() {
            let amount = if index == active_index { full } else { bench };
            if amount == 0 {
                continue;
            }
            let pokemon = &mut member.pokemon;
            bus.push(BattleEvent::ExperienceGained {
                pokemon: pokemon.name.clone(),
                amount,
            });
            for new_level in add_experience(pokemon, amount) {
                bus.push(BattleEvent::LevelUp {
                    pokemon: pokemon.name.clone(),
                    new_level,
                });
            }
        }
    }
}
