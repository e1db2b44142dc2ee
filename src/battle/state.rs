use crate::battle::combatant::Combatant;
use crate::difficulty::DifficultyRecommendation;
use crate::errors::{BattleResult, BattleStateError};
use crate::pokemon::PokemonInst;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::{Ailment, Biome, Item, StatType};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Copy)]
pub enum GameState {
    WaitingForAction,
    WaitingForReplacement, // Player's active Pokemon fainted and a bench member must be sent out
    Caught,
    Won,
    Lost,
    Escaped,
}

impl GameState {
    pub fn is_over(self) -> bool {
        matches!(
            self,
            GameState::Caught | GameState::Won | GameState::Lost | GameState::Escaped
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy)]
pub enum BattleMode {
    Wild,
    Trainer,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy, Hash)]
pub enum Side {
    Player,
    Opponent,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Battle Management
    BattleStarted {
        mode: BattleMode,
        opponent_name: String,
        pokemon: String,
        level: u8,
    },
    TurnStarted {
        turn_number: u32,
    },
    RoundFinished,
    BattleEnded {
        outcome: GameState,
    },
    /// A fatal error aborted the current action and reset the session.
    UnknownError {
        message: String,
    },

    // Pokemon Actions
    PokemonSwitched {
        side: Side,
        old_pokemon: String,
        new_pokemon: String,
    },
    PokemonSentOut {
        side: Side,
        pokemon: String,
    },
    MoveUsed {
        side: Side,
        pokemon: String,
        move_name: String,
    },
    MoveMissed {
        side: Side,
        pokemon: String,
    },
    MoveEvaded {
        side: Side,
        pokemon: String,
    },
    NoPP {
        side: Side,
        pokemon: String,
        move_name: String,
    },
    CriticalHit {
        side: Side,
        pokemon: String,
    },
    AttackTypeEffectiveness {
        multiplier: f32,
    },
    DamageDealt {
        side: Side,
        pokemon: String,
        damage: u16,
        remaining_hp: u16,
    },
    PokemonFainted {
        side: Side,
        pokemon: String,
    },

    // Ailments and volatile conditions
    AilmentApplied {
        side: Side,
        pokemon: String,
        ailment: Ailment,
    },
    AilmentCured {
        side: Side,
        pokemon: String,
        ailment: Ailment,
    },
    AilmentDamage {
        side: Side,
        pokemon: String,
        ailment: Ailment,
        damage: u16,
        remaining_hp: u16,
    },
    SleepHealed {
        side: Side,
        pokemon: String,
        amount: u16,
    },
    FastAsleep {
        side: Side,
        pokemon: String,
    },
    FrozenSolid {
        side: Side,
        pokemon: String,
    },
    FullyParalyzed {
        side: Side,
        pokemon: String,
    },
    Flinched {
        side: Side,
        pokemon: String,
    },
    BecameConfused {
        side: Side,
        pokemon: String,
    },
    IsConfused {
        side: Side,
        pokemon: String,
    },
    HurtByConfusion {
        side: Side,
        pokemon: String,
        damage: u16,
        remaining_hp: u16,
    },
    SnappedOutOfConfusion {
        side: Side,
        pokemon: String,
    },
    StatStageChanged {
        side: Side,
        pokemon: String,
        stat: StatType,
        old_stage: i8,
        new_stage: i8,
    },

    // Alternative turn actions
    BallThrown {
        ball: Item,
    },
    PokemonCaught {
        pokemon: String,
        ball: Item,
    },
    CatchFailed {
        pokemon: String,
    },
    ItemUsed {
        item: Item,
        pokemon: String,
        message: String,
    },
    ItemHadNoEffect {
        item: Item,
        pokemon: String,
        message: String,
    },
    EscapeSucceeded,
    EscapeFailed,

    // Progression
    ExperienceGained {
        pokemon: String,
        amount: u32,
    },
    LevelUp {
        pokemon: String,
        new_level: u8,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable line.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self) -> Option<String> {
        match self {
            // === Battle Management Events ===
            BattleEvent::BattleStarted { mode, opponent_name, pokemon, level } => match mode {
                BattleMode::Wild => Some(format!("A wild {} (Lv. {}) appeared!", pokemon, level)),
                BattleMode::Trainer => Some(format!(
                    "{} sent out {} (Lv. {})!",
                    opponent_name, pokemon, level
                )),
            },
            BattleEvent::TurnStarted { turn_number } => {
                Some(format!("=== Turn {} ===", turn_number))
            }
            BattleEvent::RoundFinished => None,
            BattleEvent::BattleEnded { outcome } => Some(match outcome {
                GameState::Caught => "The battle is over. A new friend joins you!".to_string(),
                GameState::Won => "You won the battle!".to_string(),
                GameState::Lost => "You have no Pokemon left to fight...".to_string(),
                GameState::Escaped => "You left the battle.".to_string(),
                GameState::WaitingForAction | GameState::WaitingForReplacement => return None,
            }),
            BattleEvent::UnknownError { message } => {
                Some(format!("Something went wrong ({}). Back to exploring.", message))
            }

            // === Pokemon Action Events ===
            BattleEvent::PokemonSwitched { side, old_pokemon, new_pokemon } => match side {
                Side::Player => Some(format!(
                    "Come back, {}! Go, {}!",
                    old_pokemon, new_pokemon
                )),
                Side::Opponent => Some(format!(
                    "The opponent withdrew {} and sent out {}!",
                    old_pokemon, new_pokemon
                )),
            },
            BattleEvent::PokemonSentOut { side, pokemon } => match side {
                Side::Player => Some(format!("Go, {}!", pokemon)),
                Side::Opponent => Some(format!("The opponent sent out {}!", pokemon)),
            },
            BattleEvent::MoveUsed { side, pokemon, move_name } => {
                Some(format!("{} used {}!", Self::who(*side, pokemon), move_name))
            }
            BattleEvent::MoveMissed { side, pokemon } => {
                Some(format!("{}'s attack missed!", Self::who(*side, pokemon)))
            }
            BattleEvent::MoveEvaded { side, pokemon } => {
                Some(format!("{} evaded the attack!", Self::who(*side, pokemon)))
            }
            BattleEvent::NoPP { side, pokemon, move_name } => Some(format!(
                "{} has no PP left for {}!",
                Self::who(*side, pokemon),
                move_name
            )),
            BattleEvent::CriticalHit { .. } => Some("A critical hit!".to_string()),
            BattleEvent::AttackTypeEffectiveness { multiplier } => match *multiplier {
                m if m == 0.0 => Some("It had no effect!".to_string()),
                m if m < 1.0 => Some("It's not very effective...".to_string()),
                m if m > 1.0 => Some("It's super effective!".to_string()),
                _ => None,
            },
            BattleEvent::DamageDealt { side, pokemon, damage, remaining_hp } => Some(format!(
                "{} took {} damage ({} HP left).",
                Self::who(*side, pokemon),
                damage,
                remaining_hp
            )),
            BattleEvent::PokemonFainted { side, pokemon } => {
                Some(format!("{} fainted!", Self::who(*side, pokemon)))
            }

            // === Ailment Events ===
            BattleEvent::AilmentApplied { side, pokemon, ailment } => {
                let who = Self::who(*side, pokemon);
                Some(match ailment {
                    Ailment::Poison => format!("{} was poisoned!", who),
                    Ailment::Burn => format!("{} was burned!", who),
                    Ailment::Paralysis => format!("{} is paralyzed! It may be unable to move!", who),
                    Ailment::Sleep => format!("{} fell asleep!", who),
                    Ailment::Freeze => format!("{} was frozen solid!", who),
                    Ailment::Healthy | Ailment::Fainted => return None,
                })
            }
            BattleEvent::AilmentCured { side, pokemon, ailment } => {
                let who = Self::who(*side, pokemon);
                Some(match ailment {
                    Ailment::Sleep => format!("{} woke up!", who),
                    Ailment::Freeze => format!("{} thawed out!", who),
                    Ailment::Paralysis => format!("{} is no longer paralyzed.", who),
                    other => format!("{} was cured of its {}.", who, other),
                })
            }
            BattleEvent::AilmentDamage { side, pokemon, ailment, .. } => Some(format!(
                "{} is hurt by its {}!",
                Self::who(*side, pokemon),
                ailment
            )),
            BattleEvent::SleepHealed { side, pokemon, amount } => Some(format!(
                "{} is sleeping soundly and recovered {} HP.",
                Self::who(*side, pokemon),
                amount
            )),
            BattleEvent::FastAsleep { side, pokemon } => {
                Some(format!("{} is fast asleep.", Self::who(*side, pokemon)))
            }
            BattleEvent::FrozenSolid { side, pokemon } => {
                Some(format!("{} is frozen solid!", Self::who(*side, pokemon)))
            }
            BattleEvent::FullyParalyzed { side, pokemon } => Some(format!(
                "{} is paralyzed! It can't move!",
                Self::who(*side, pokemon)
            )),
            BattleEvent::Flinched { side, pokemon } => {
                Some(format!("{} flinched!", Self::who(*side, pokemon)))
            }
            BattleEvent::BecameConfused { side, pokemon } => {
                Some(format!("{} became confused!", Self::who(*side, pokemon)))
            }
            BattleEvent::IsConfused { side, pokemon } => {
                Some(format!("{} is confused!", Self::who(*side, pokemon)))
            }
            BattleEvent::HurtByConfusion { .. } => {
                Some("It hurt itself in its confusion!".to_string())
            }
            BattleEvent::SnappedOutOfConfusion { side, pokemon } => Some(format!(
                "{} snapped out of its confusion!",
                Self::who(*side, pokemon)
            )),
            BattleEvent::StatStageChanged { side, pokemon, stat, old_stage, new_stage } => {
                let who = Self::who(*side, pokemon);
                let change = *new_stage - *old_stage;
                Some(match change {
                    0 if *new_stage > 0 => format!("{}'s {} won't go any higher!", who, stat),
                    0 => format!("{}'s {} won't go any lower!", who, stat),
                    1 => format!("{}'s {} rose!", who, stat),
                    c if c > 1 => format!("{}'s {} rose sharply!", who, stat),
                    -1 => format!("{}'s {} fell!", who, stat),
                    _ => format!("{}'s {} harshly fell!", who, stat),
                })
            }

            // === Alternative Actions ===
            BattleEvent::BallThrown { ball } => Some(format!("You threw a {}!", ball)),
            BattleEvent::PokemonCaught { pokemon, ball } => {
                Some(format!("Gotcha! {} was caught in the {}!", pokemon, ball))
            }
            BattleEvent::CatchFailed { pokemon } => {
                Some(format!("Oh no! {} broke free!", pokemon))
            }
            BattleEvent::ItemUsed { message, .. } => Some(message.clone()),
            BattleEvent::ItemHadNoEffect { message, .. } => Some(message.clone()),
            BattleEvent::EscapeSucceeded => Some("Got away safely!".to_string()),
            BattleEvent::EscapeFailed => Some("Can't escape!".to_string()),

            // === Progression ===
            BattleEvent::ExperienceGained { pokemon, amount } => {
                Some(format!("{} gained {} EXP. Points!", pokemon, amount))
            }
            BattleEvent::LevelUp { pokemon, new_level } => {
                Some(format!("{} grew to level {}!", pokemon, new_level))
            }
        }
    }

    fn who(side: Side, pokemon: &str) -> String {
        match side {
            Side::Player => pokemon.to_string(),
            Side::Opponent => format!("The opposing {}", pokemon),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        debug!("[event] {:?}", event);
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn contains(&self, predicate: impl Fn(&BattleEvent) -> bool) -> bool {
        self.events.iter().any(predicate)
    }

    /// All user-visible lines, in order. Silent events are skipped.
    pub fn formatted_lines(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }
}

enum RngSource {
    Scripted(VecDeque<f64>),
    Seeded(StdRng),
}

/// Source of every random decision in a battle or encounter.
/// Each draw is a uniform value in `[0, 1)`.
pub struct TurnRng {
    source: RngSource,
}

impl fmt::Debug for TurnRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            RngSource::Scripted(values) => write!(f, "TurnRng::Scripted({} left)", values.len()),
            RngSource::Seeded(_) => write!(f, "TurnRng::Seeded"),
        }
    }
}

impl TurnRng {
    /// A fixed script of draws. Running out of values is a test bug and panics.
    pub fn new_for_test(outcomes: Vec<f64>) -> Self {
        Self {
            source: RngSource::Scripted(outcomes.into()),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn new_random() -> Self {
        Self {
            source: RngSource::Seeded(StdRng::from_os_rng()),
        }
    }

    pub fn next_outcome(&mut self, reason: &str) -> f64 {
        let outcome = match &mut self.source {
            RngSource::Scripted(values) => match values.pop_front() {
                Some(value) => value,
                None => panic!(
                    "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                    reason
                ),
            },
            RngSource::Seeded(rng) => rng.random::<f64>(),
        };
        debug!("[RNG] Consumed {:.4} for: {}", outcome, reason);
        outcome
    }

    /// Uniform index into a collection of `len` elements. `len` must be non-zero.
    pub fn next_index(&mut self, len: usize, reason: &str) -> usize {
        let draw = self.next_outcome(reason);
        ((draw * len as f64) as usize).min(len.saturating_sub(1))
    }

    /// Uniform integer in `lo..=hi`.
    pub fn next_range_inclusive(&mut self, lo: u32, hi: u32, reason: &str) -> u32 {
        let span = (hi - lo) as f64 + 1.0;
        let draw = self.next_outcome(reason);
        lo + ((draw * span) as u32).min(hi - lo)
    }
}

/// One side of the field: a roster and the index of the member currently battling.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattleSide {
    pub name: String,
    pub side: Side,
    pub members: Vec<Combatant>,
    pub active_index: usize,
}

impl BattleSide {
    /// Builds a side whose first non-fainted member starts active.
    pub fn new(name: String, side: Side, roster: Vec<PokemonInst>) -> BattleResult<Self> {
        let active_index = roster
            .iter()
            .position(|p| !p.is_fainted())
            .ok_or(match side {
                Side::Player => BattleStateError::NoActiveCombatant,
                Side::Opponent => BattleStateError::NoOpponent,
            })?;

        Ok(Self {
            name,
            side,
            members: roster
                .into_iter()
                .map(|pokemon| Combatant::new(pokemon, side))
                .collect(),
            active_index,
        })
    }

    pub fn active(&self) -> &Combatant {
        &self.members[self.active_index]
    }

    pub fn active_mut(&mut self) -> &mut Combatant {
        &mut self.members[self.active_index]
    }

    pub fn has_healthy_members(&self) -> bool {
        self.members.iter().any(|c| !c.pokemon.is_fainted())
    }

    /// First non-fainted member other than the active one.
    pub fn next_healthy_index(&self) -> Option<usize> {
        self.members
            .iter()
            .enumerate()
            .find(|(i, c)| *i != self.active_index && !c.pokemon.is_fainted())
            .map(|(i, _)| i)
    }

    /// Make `index` the active member. The outgoing member loses its transient modifiers.
    pub fn switch_to(&mut self, index: usize) {
        self.active_mut().reset_modifiers();
        self.active_index = index;
    }

    pub fn roster(&self) -> Vec<PokemonInst> {
        self.members.iter().map(|c| c.pokemon.clone()).collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattleState {
    pub battle_id: String,
    pub mode: BattleMode,
    pub biome: Biome,
    pub player: BattleSide,
    pub opponent: BattleSide,
    pub turn_number: u32,
    pub game_state: GameState,
    pub run_attempts: u32,
    pub catch_attempted: bool,
    pub recommendation: DifficultyRecommendation,
}

impl BattleState {
    pub fn new(
        id: String,
        mode: BattleMode,
        biome: Biome,
        player: BattleSide,
        opponent: BattleSide,
        recommendation: DifficultyRecommendation,
    ) -> Self {
        Self {
            battle_id: id,
            mode,
            biome,
            player,
            opponent,
            turn_number: 0,
            game_state: GameState::WaitingForAction,
            run_attempts: 0,
            catch_attempted: false,
            recommendation,
        }
    }

    /// Mutable access to both sides at once, acting side first.
    pub fn sides_mut(&mut self, acting: Side) -> (&mut BattleSide, &mut BattleSide) {
        match acting {
            Side::Player => (&mut self.player, &mut self.opponent),
            Side::Opponent => (&mut self.opponent, &mut self.player),
        }
    }

    /// The started event for this battle, naming the opponent's lead.
    pub fn started_event(&self) -> BattleEvent {
        let lead = &self.opponent.active().pokemon;
        BattleEvent::BattleStarted {
            mode: self.mode,
            opponent_name: self.opponent.name.clone(),
            pokemon: lead.name.clone(),
            level: lead.level,
        }
    }
}
