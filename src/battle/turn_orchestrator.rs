use crate::battle::calculators::resolve_move_effect;
use crate::battle::catch::validate_catch_attempt;
use crate::battle::combatant::MoveChoice;
use crate::battle::items::ItemEffectStrategy;
use crate::battle::state::{
    BattleEvent, BattleMode, BattleState, EventBus, GameState, Side, TurnRng,
};
use crate::battle::stats::effective_speed;
use crate::config::BattleConfig;
use crate::errors::{ActionError, BattleResult, BattleStateError, StorageError};
use crate::progression::RewardCalculator;
use crate::storage::Inventory;
use log::{debug, info};
use schema::{Item, StatType, TypeChart};
use serde::{Deserialize, Serialize};

const ESCAPE_ATTEMPT_BONUS: u32 = 30;
const ESCAPE_GUARANTEED_ABOVE: u32 = 255;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum PlayerAction {
    Attack { move_id: u32 },
    ThrowBall { ball: Item },
    UseItem { item: Item, target: usize },
    Run,
    Switch { team_index: usize },
}

/// Everything outside the battle state a turn needs.
pub struct TurnContext<'a> {
    pub type_chart: &'a TypeChart,
    pub config: &'a BattleConfig,
    pub items: &'a dyn ItemEffectStrategy,
    pub inventory: &'a mut dyn Inventory,
}

/// Main entry point for turn resolution.
/// Runs one player action to completion and returns every event it produced.
pub fn resolve_turn(
    battle_state: &mut BattleState,
    action: PlayerAction,
    ctx: &mut TurnContext,
    rng: &mut TurnRng,
) -> BattleResult<EventBus> {
    if battle_state.game_state.is_over() {
        return Err(BattleStateError::BattleOver.into());
    }

    let mut bus = EventBus::new();

    if battle_state.game_state == GameState::WaitingForReplacement {
        let PlayerAction::Switch { team_index } = action else {
            return Err(ActionError::InvalidAction(
                "a replacement Pokemon must be sent out first".to_string(),
            )
            .into());
        };
        switch_player(battle_state, team_index, &mut bus)?;
        battle_state.game_state = GameState::WaitingForAction;
        return Ok(bus);
    }

    // The round runs on a working copy and is committed only once it settles,
    // together with the bag item it spent.
    let mut working = battle_state.clone();
    let spent = match action {
        PlayerAction::Attack { move_id } => {
            attack_turn(&mut working, move_id, ctx, rng, &mut bus)?;
            None
        }
        PlayerAction::ThrowBall { ball } => ball_turn(&mut working, ball, ctx, rng, &mut bus)?,
        PlayerAction::UseItem { item, target } => {
            item_turn(&mut working, item, target, ctx, rng, &mut bus)?
        }
        PlayerAction::Run => {
            run_turn(&mut working, ctx, rng, &mut bus)?;
            None
        }
        PlayerAction::Switch { team_index } => {
            switch_player(&mut working, team_index, &mut bus)?;
            free_attack(&mut working, ctx, rng, &mut bus)?;
            None
        }
    };

    if let Some(item) = spent {
        ctx.inventory.consume(item)?;
    }
    *battle_state = working;
    Ok(bus)
}

fn begin_turn(battle_state: &mut BattleState, bus: &mut EventBus) {
    battle_state.turn_number += 1;
    bus.push(BattleEvent::TurnStarted {
        turn_number: battle_state.turn_number,
    });
}

fn attack_turn(
    battle_state: &mut BattleState,
    move_id: u32,
    ctx: &mut TurnContext,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> BattleResult<()> {
    if battle_state.player.active().pokemon.move_by_id(move_id).is_none() {
        return Err(ActionError::MoveNotKnown(move_id).into());
    }
    begin_turn(battle_state, bus);

    let player_speed = effective_speed(battle_state.player.active());
    let opponent_speed = effective_speed(battle_state.opponent.active());
    debug!("Turn order speeds: player {} vs opponent {}", player_speed, opponent_speed);

    // Ties go to the player
    let order = if player_speed >= opponent_speed {
        [Side::Player, Side::Opponent]
    } else {
        [Side::Opponent, Side::Player]
    };

    for side in order {
        if either_active_fainted(battle_state) {
            break;
        }
        let choice = match side {
            Side::Player => MoveChoice::Fixed(move_id),
            Side::Opponent => MoveChoice::Random,
        };
        execute_attack(battle_state, side, choice, ctx.type_chart, rng, bus)?;
    }

    finish_round(battle_state, ctx, rng, bus);
    Ok(())
}

fn ball_turn(
    battle_state: &mut BattleState,
    ball: Item,
    ctx: &mut TurnContext,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> BattleResult<Option<Item>> {
    let ball_modifier = validate_catch_attempt(battle_state, ball)?;
    if ctx.inventory.count(ball) == 0 {
        return Err(StorageError::OutOfItem(ball).into());
    }
    begin_turn(battle_state, bus);

    bus.push(BattleEvent::BallThrown { ball });
    battle_state.catch_attempted = true;
    let catch_bonus = battle_state.recommendation.catch_bonus_percent;
    let target = battle_state.opponent.active_mut();
    let attempt = target.throw_ball(ball, ball_modifier, catch_bonus, rng);
    debug!(
        "Catch attempt on {}: p = {:.4}, caught = {}",
        target.pokemon.name, attempt.probability, attempt.caught
    );

    if attempt.caught {
        bus.push(BattleEvent::PokemonCaught {
            pokemon: target.name(),
            ball,
        });
        end_battle(battle_state, GameState::Caught, bus);
        return Ok(Some(ball));
    }

    bus.push(BattleEvent::CatchFailed {
        pokemon: target.name(),
    });
    free_attack(battle_state, ctx, rng, bus)?;
    Ok(Some(ball))
}

fn item_turn(
    battle_state: &mut BattleState,
    item: Item,
    target: usize,
    ctx: &mut TurnContext,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> BattleResult<Option<Item>> {
    if item.is_ball() {
        return Err(ActionError::InvalidAction(format!("a {} has to be thrown", item)).into());
    }
    let member = battle_state
        .player
        .members
        .get(target)
        .ok_or(ActionError::InvalidPokemonIndex(target))?;
    if ctx.inventory.count(item) == 0 {
        return Err(StorageError::OutOfItem(item).into());
    }

    let outcome = ctx.items.apply(&member.pokemon, item)?;
    if !outcome.item_used {
        // Nothing happened: the item stays in the bag and the turn is not spent.
        bus.push(BattleEvent::ItemHadNoEffect {
            item,
            pokemon: member.name(),
            message: outcome.message,
        });
        return Ok(None);
    }

    begin_turn(battle_state, bus);
    let member = &mut battle_state.player.members[target];
    member.pokemon = outcome.pokemon;
    bus.push(BattleEvent::ItemUsed {
        item,
        pokemon: member.name(),
        message: outcome.message,
    });
    free_attack(battle_state, ctx, rng, bus)?;
    Ok(Some(item))
}

/// Escape threshold: F = my_speed * 128 / max(opp_speed mod 256, 1) + 30 * attempts.
pub fn escape_threshold(my_speed: u16, opponent_speed: u16, attempts: u32) -> u32 {
    let divisor = (opponent_speed as u32 % 256).max(1);
    my_speed as u32 * 128 / divisor + ESCAPE_ATTEMPT_BONUS * attempts
}

/// Escape always works above 255 or when the runner is fainted; otherwise a
/// draw over 256 has to land below F.
pub fn attempt_escape(
    my_speed: u16,
    opponent_speed: u16,
    attempts: u32,
    runner_fainted: bool,
    rng: &mut TurnRng,
) -> bool {
    let threshold = escape_threshold(my_speed, opponent_speed, attempts);
    if runner_fainted || threshold > ESCAPE_GUARANTEED_ABOVE {
        return true;
    }
    rng.next_outcome("escape roll") * 256.0 < threshold as f64
}

fn run_turn(
    battle_state: &mut BattleState,
    ctx: &mut TurnContext,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> BattleResult<()> {
    if battle_state.mode == BattleMode::Trainer {
        return Err(ActionError::EscapeNotAllowed.into());
    }
    begin_turn(battle_state, bus);

    battle_state.run_attempts += 1;
    let runner = &battle_state.player.active().pokemon;
    let escaped = attempt_escape(
        runner.stat(StatType::Speed),
        battle_state.opponent.active().pokemon.stat(StatType::Speed),
        battle_state.run_attempts,
        runner.is_fainted(),
        rng,
    );

    if escaped {
        bus.push(BattleEvent::EscapeSucceeded);
        end_battle(battle_state, GameState::Escaped, bus);
        return Ok(());
    }

    bus.push(BattleEvent::EscapeFailed);
    free_attack(battle_state, ctx, rng, bus)
}

/// Bring in another roster member. Used both as a turn action and as the
/// forced replacement after a faint.
fn switch_player(
    battle_state: &mut BattleState,
    team_index: usize,
    bus: &mut EventBus,
) -> BattleResult<()> {
    let side = &battle_state.player;
    let incoming = side
        .members
        .get(team_index)
        .ok_or(ActionError::InvalidPokemonIndex(team_index))?;
    if team_index == side.active_index {
        return Err(ActionError::AlreadyActive.into());
    }
    if incoming.pokemon.is_fainted() {
        return Err(ActionError::TargetFainted.into());
    }

    let replacing_fainted = side.active().pokemon.is_fainted();
    let old_pokemon = side.active().name();
    let new_pokemon = incoming.name();

    if battle_state.game_state != GameState::WaitingForReplacement {
        begin_turn(battle_state, bus);
    }
    battle_state.player.switch_to(team_index);

    if replacing_fainted {
        bus.push(BattleEvent::PokemonSentOut {
            side: Side::Player,
            pokemon: new_pokemon,
        });
    } else {
        bus.push(BattleEvent::PokemonSwitched {
            side: Side::Player,
            old_pokemon,
            new_pokemon,
        });
    }
    Ok(())
}

/// The opponent's one-sided attack after a non-attack action, then the round ends.
fn free_attack(
    battle_state: &mut BattleState,
    ctx: &mut TurnContext,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> BattleResult<()> {
    if !either_active_fainted(battle_state) {
        execute_attack(
            battle_state,
            Side::Opponent,
            MoveChoice::Random,
            ctx.type_chart,
            rng,
            bus,
        )?;
    }
    finish_round(battle_state, ctx, rng, bus);
    Ok(())
}

fn either_active_fainted(battle_state: &BattleState) -> bool {
    battle_state.player.active().pokemon.is_fainted()
        || battle_state.opponent.active().pokemon.is_fainted()
}

/// One side's hit action: gate, PP, resolution, then applying the result.
pub fn execute_attack(
    battle_state: &mut BattleState,
    acting: Side,
    choice: MoveChoice,
    type_chart: &TypeChart,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> BattleResult<()> {
    let (attacking_side, defending_side) = battle_state.sides_mut(acting);
    let attacker = attacking_side.active_mut();
    let defender = defending_side.active_mut();

    let Some(slot) = attacker.get_hit_action(choice, rng, bus)? else {
        return Ok(());
    };
    attacker.decrement_pp(slot);
    let move_used = attacker.pokemon.moves[slot].clone();
    bus.push(BattleEvent::MoveUsed {
        side: acting,
        pokemon: attacker.name(),
        move_name: move_used.name.clone(),
    });

    let result = resolve_move_effect(
        &attacker.pokemon,
        &attacker.modifiers,
        &defender.pokemon,
        &defender.modifiers,
        &move_used,
        type_chart,
        rng,
    );

    if !result.is_successful_attack {
        bus.push(BattleEvent::MoveMissed {
            side: acting,
            pokemon: attacker.name(),
        });
        return Ok(());
    }
    if result.is_successful_evade {
        bus.push(BattleEvent::MoveEvaded {
            side: defender.side,
            pokemon: defender.name(),
        });
        return Ok(());
    }

    if move_used.power.is_some() {
        if result.is_critical {
            bus.push(BattleEvent::CriticalHit {
                side: acting,
                pokemon: attacker.name(),
            });
        }
        if result.effectiveness != 1.0 {
            bus.push(BattleEvent::AttackTypeEffectiveness {
                multiplier: result.effectiveness,
            });
        }
        if result.effectiveness == 0.0 {
            return Ok(());
        }

        let damage = defender.apply_damage(result.damage);
        bus.push(BattleEvent::DamageDealt {
            side: defender.side,
            pokemon: defender.name(),
            damage,
            remaining_hp: defender.pokemon.current_hp(),
        });
        if defender.pokemon.is_fainted() {
            bus.push(BattleEvent::PokemonFainted {
                side: defender.side,
                pokemon: defender.name(),
            });
        }
    }

    attacker.apply_stat_changes(&result.attacker_stat_changes, bus);
    if defender.pokemon.is_fainted() {
        return Ok(());
    }

    if let Some(ailment) = result.ailment {
        if defender.apply_ailment(ailment) {
            bus.push(BattleEvent::AilmentApplied {
                side: defender.side,
                pokemon: defender.name(),
                ailment,
            });
        }
    }
    if result.confused && !defender.modifiers.confused {
        defender.modifiers.confused = true;
        bus.push(BattleEvent::BecameConfused {
            side: defender.side,
            pokemon: defender.name(),
        });
    }
    if result.flinched {
        defender.modifiers.flinched = true;
    }
    defender.apply_stat_changes(&result.defender_stat_changes, bus);

    Ok(())
}

/// Round-finish: tick both active Pokemon, hand out rewards for a fainted
/// opponent and work out whether the battle continues.
fn finish_round(
    battle_state: &mut BattleState,
    ctx: &TurnContext,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) {
    bus.push(BattleEvent::RoundFinished);
    battle_state.player.active_mut().round_check(rng, bus);
    battle_state.opponent.active_mut().round_check(rng, bus);

    if battle_state.opponent.active().pokemon.is_fainted() {
        let defeated = battle_state.opponent.active().pokemon.clone();
        RewardCalculator::new(
            battle_state.recommendation.exp_multiplier,
            ctx.config.bench_exp_share,
        )
        .distribute(&mut battle_state.player, &defeated, battle_state.mode, bus);

        match battle_state.opponent.next_healthy_index() {
            Some(next) if battle_state.mode == BattleMode::Trainer => {
                battle_state.opponent.switch_to(next);
                bus.push(BattleEvent::PokemonSentOut {
                    side: Side::Opponent,
                    pokemon: battle_state.opponent.active().name(),
                });
            }
            _ => {
                end_battle(battle_state, GameState::Won, bus);
                return;
            }
        }
    }

    if battle_state.player.active().pokemon.is_fainted() {
        if battle_state.player.has_healthy_members() {
            battle_state.game_state = GameState::WaitingForReplacement;
        } else {
            end_battle(battle_state, GameState::Lost, bus);
        }
    }
}

fn end_battle(battle_state: &mut BattleState, outcome: GameState, bus: &mut EventBus) {
    info!(
        "Battle {} ended after {} turns: {:?}",
        battle_state.battle_id, battle_state.turn_number, outcome
    );
    battle_state.game_state = outcome;
    bus.push(BattleEvent::BattleEnded { outcome });
}
