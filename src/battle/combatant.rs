//! Per-combatant battle state machine.
//!
//! A `Combatant` owns one Pokemon for the length of a battle together with its
//! transient modifiers, and exposes the narrow mutation API the orchestrator
//! drives: damage, ailments, stage changes, PP, the round-start tick and the
//! action gate.

use crate::battle::catch::{apply_catch_bonus, capture_hp_ratio, capture_probability, roll_capture};
use crate::battle::conditions::BattleModifiers;
use crate::battle::state::{BattleEvent, EventBus, Side, TurnRng};
use crate::errors::{ActionError, BattleResult};
use crate::pokemon::PokemonInst;
use schema::{Ailment, Item, StatType};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

const SLEEP_WAKE_CHANCE: f64 = 0.33;
const FREEZE_THAW_CHANCE: f64 = 0.2;
const PARALYSIS_SKIP_CHANCE: f64 = 0.25;
const CONFUSION_SELF_HIT_CHANCE: f64 = 0.5;

/// How the acting Pokemon picks its move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveChoice {
    Fixed(u32),
    /// Uniformly among moves with PP left.
    Random,
}

/// Result of a ball throw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureAttempt {
    pub probability: f32,
    pub caught: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Combatant {
    pub pokemon: PokemonInst,
    pub side: Side,
    pub modifiers: BattleModifiers,
    /// Set by the round-start paralysis roll; the next action attempt fails.
    pub paralyzed_this_round: bool,
}

impl Combatant {
    pub fn new(pokemon: PokemonInst, side: Side) -> Self {
        Self {
            pokemon,
            side,
            modifiers: BattleModifiers::new(),
            paralyzed_this_round: false,
        }
    }

    pub fn name(&self) -> String {
        self.pokemon.name.clone()
    }

    pub fn reset_modifiers(&mut self) {
        self.modifiers.reset();
        self.paralyzed_this_round = false;
    }

    /// Apply damage, never dropping below zero. Returns the damage actually taken.
    pub fn apply_damage(&mut self, amount: u16) -> u16 {
        self.pokemon.take_damage(amount)
    }

    /// Inflict an ailment. Only a healthy Pokemon can pick one up.
    pub fn apply_ailment(&mut self, ailment: Ailment) -> bool {
        if self.pokemon.ailment() != Ailment::Healthy {
            return false;
        }
        self.pokemon.set_ailment(ailment)
    }

    /// Apply summed stage deltas (indexed like `StatType::index`), pushing one
    /// event per stat that was targeted.
    pub fn apply_stat_changes(&mut self, deltas: &[i8; 6], bus: &mut EventBus) {
        for stat in StatType::iter() {
            let delta = deltas[stat.index()];
            if delta == 0 {
                continue;
            }
            let (old_stage, new_stage) = self.modifiers.change_stage(stat, delta);
            bus.push(BattleEvent::StatStageChanged {
                side: self.side,
                pokemon: self.name(),
                stat,
                old_stage,
                new_stage,
            });
        }
    }

    pub fn decrement_pp(&mut self, slot: usize) -> bool {
        self.pokemon
            .moves
            .get_mut(slot)
            .is_some_and(|m| m.use_move())
    }

    /// Round-start tick, run once per completed round.
    pub fn round_check(&mut self, rng: &mut TurnRng, bus: &mut EventBus) {
        self.paralyzed_this_round = false;

        if self.pokemon.current_hp() == 0 {
            // set_hp keeps the fainted invariant in place
            self.pokemon.set_hp(0);
            return;
        }

        self.modifiers.flinched = false;
        let max_hp = self.pokemon.max_hp();

        match self.pokemon.ailment() {
            Ailment::Sleep => {
                if rng.next_outcome("sleep wake check") < SLEEP_WAKE_CHANCE {
                    self.cure(Ailment::Sleep, bus);
                } else {
                    let amount = self.pokemon.heal(max_hp / 8);
                    if amount > 0 {
                        bus.push(BattleEvent::SleepHealed {
                            side: self.side,
                            pokemon: self.name(),
                            amount,
                        });
                    }
                }
            }
            Ailment::Poison => self.ailment_damage(Ailment::Poison, max_hp / 8, bus),
            Ailment::Burn => self.ailment_damage(Ailment::Burn, max_hp / 16, bus),
            Ailment::Freeze => {
                if rng.next_outcome("freeze thaw check") < FREEZE_THAW_CHANCE {
                    self.cure(Ailment::Freeze, bus);
                }
            }
            Ailment::Paralysis => {
                if rng.next_outcome("paralysis check") < PARALYSIS_SKIP_CHANCE {
                    self.paralyzed_this_round = true;
                } else {
                    self.cure(Ailment::Paralysis, bus);
                }
            }
            Ailment::Healthy | Ailment::Fainted => {}
        }
    }

    fn cure(&mut self, ailment: Ailment, bus: &mut EventBus) {
        if self.pokemon.cure_ailment().is_some() {
            bus.push(BattleEvent::AilmentCured {
                side: self.side,
                pokemon: self.name(),
                ailment,
            });
        }
    }

    fn ailment_damage(&mut self, ailment: Ailment, amount: u16, bus: &mut EventBus) {
        let damage = self.apply_damage(amount);
        bus.push(BattleEvent::AilmentDamage {
            side: self.side,
            pokemon: self.name(),
            ailment,
            damage,
            remaining_hp: self.pokemon.current_hp(),
        });
        if self.pokemon.is_fainted() {
            bus.push(BattleEvent::PokemonFainted {
                side: self.side,
                pokemon: self.name(),
            });
        }
    }

    /// Action gate. Picks the move, then checks everything that can stop the
    /// Pokemon from using it. Returns the move slot on success; the move's PP
    /// is not touched here.
    pub fn get_hit_action(
        &mut self,
        choice: MoveChoice,
        rng: &mut TurnRng,
        bus: &mut EventBus,
    ) -> BattleResult<Option<usize>> {
        let slot = self.select_move(choice, rng)?;

        if self.pokemon.is_fainted() {
            return Ok(None);
        }

        let blocked = match self.pokemon.ailment() {
            Ailment::Sleep => Some(BattleEvent::FastAsleep {
                side: self.side,
                pokemon: self.name(),
            }),
            Ailment::Freeze => Some(BattleEvent::FrozenSolid {
                side: self.side,
                pokemon: self.name(),
            }),
            _ if self.paralyzed_this_round => Some(BattleEvent::FullyParalyzed {
                side: self.side,
                pokemon: self.name(),
            }),
            _ if self.modifiers.flinched => Some(BattleEvent::Flinched {
                side: self.side,
                pokemon: self.name(),
            }),
            _ => None,
        };
        if let Some(event) = blocked {
            bus.push(event);
            return Ok(None);
        }

        if self.modifiers.confused {
            self.effect_by_confused(rng, bus);
            return Ok(None);
        }

        let move_instance = &self.pokemon.moves[slot];
        if move_instance.pp == 0 {
            bus.push(BattleEvent::NoPP {
                side: self.side,
                pokemon: self.name(),
                move_name: move_instance.name.clone(),
            });
            return Ok(None);
        }

        Ok(Some(slot))
    }

    fn select_move(&self, choice: MoveChoice, rng: &mut TurnRng) -> BattleResult<usize> {
        match choice {
            MoveChoice::Fixed(move_id) => self
                .pokemon
                .move_by_id(move_id)
                .map(|(slot, _)| slot)
                .ok_or_else(|| ActionError::MoveNotKnown(move_id).into()),
            MoveChoice::Random => {
                let usable: Vec<usize> = self
                    .pokemon
                    .moves
                    .iter()
                    .enumerate()
                    .filter(|(_, m)| m.pp > 0)
                    .map(|(slot, _)| slot)
                    .collect();
                if usable.is_empty() {
                    return Err(ActionError::EmptyMoveList.into());
                }
                Ok(usable[rng.next_index(usable.len(), "random move choice")])
            }
        }
    }

    /// Confusion branch of the action gate. Half the time the Pokemon hurts
    /// itself for 1/8 of its max HP and stays confused; otherwise it snaps out.
    /// Returns true when it hurt itself.
    pub fn effect_by_confused(&mut self, rng: &mut TurnRng, bus: &mut EventBus) -> bool {
        bus.push(BattleEvent::IsConfused {
            side: self.side,
            pokemon: self.name(),
        });

        if rng.next_outcome("confusion self-hit") < CONFUSION_SELF_HIT_CHANCE {
            let damage = self.apply_damage(self.pokemon.max_hp() / 8);
            bus.push(BattleEvent::HurtByConfusion {
                side: self.side,
                pokemon: self.name(),
                damage,
                remaining_hp: self.pokemon.current_hp(),
            });
            if self.pokemon.is_fainted() {
                bus.push(BattleEvent::PokemonFainted {
                    side: self.side,
                    pokemon: self.name(),
                });
            }
            true
        } else {
            self.modifiers.confused = false;
            bus.push(BattleEvent::SnappedOutOfConfusion {
                side: self.side,
                pokemon: self.name(),
            });
            false
        }
    }

    /// Throw a ball at this Pokemon. The HP ratio is measured against the
    /// species' base HP stat. On success the Pokemon is tagged with the ball.
    pub fn throw_ball(
        &mut self,
        ball: Item,
        ball_modifier: f32,
        catch_bonus_percent: f32,
        rng: &mut TurnRng,
    ) -> CaptureAttempt {
        let base = capture_probability(
            self.pokemon.catch_rate,
            capture_hp_ratio(&self.pokemon),
            ball_modifier,
            self.pokemon.ailment(),
        );
        let probability = apply_catch_bonus(base, catch_bonus_percent);
        let caught = roll_capture(probability, rng);
        if caught {
            self.pokemon.caught_ball = Some(ball);
        }
        CaptureAttempt { probability, caught }
    }
}
