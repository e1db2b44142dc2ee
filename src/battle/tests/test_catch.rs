use crate::battle::state::{BattleEvent, BattleMode, GameState, Side, TurnRng};
use crate::battle::tests::common::{
    assert_ok, create_battle_with_rosters, create_test_battle, predictable_rng, TestPokemonBuilder,
    TestTable,
};
use crate::battle::turn_orchestrator::PlayerAction;
use crate::errors::{ActionError, BattleEngineError, StorageError};
use crate::prefab_data::{PIDGEY, PIKACHU, TACKLE, THUNDER_SHOCK};
use crate::storage::{InMemoryInventory, Inventory};
use pretty_assertions::assert_eq;
use rstest::rstest;
use schema::Item;

fn wild_battle() -> crate::battle::state::BattleState {
    create_test_battle(
        TestPokemonBuilder::new(PIKACHU, 10)
            .with_moves(vec![THUNDER_SHOCK])
            .build(),
        TestPokemonBuilder::new(PIDGEY, 5).with_moves(vec![TACKLE]).build(),
    )
}

#[test]
fn test_successful_catch_ends_battle_without_counter_attack() {
    // Pidgey Lv5 has 19 HP against a base HP of 40: p = 2.05 * 255 / 765 = 0.683
    let mut state = wild_battle();
    let mut table = TestTable::new();
    let mut rng = TurnRng::new_for_test(vec![0.6]);

    let bus = assert_ok(table.resolve(&mut state, PlayerAction::ThrowBall { ball: Item::PokeBall }, &mut rng));

    assert_eq!(
        bus.events().to_vec(),
        vec![
            BattleEvent::TurnStarted { turn_number: 1 },
            BattleEvent::BallThrown { ball: Item::PokeBall },
            BattleEvent::PokemonCaught {
                pokemon: "Pidgey".to_string(),
                ball: Item::PokeBall,
            },
            BattleEvent::BattleEnded {
                outcome: GameState::Caught,
            },
        ]
    );
    assert_eq!(state.game_state, GameState::Caught);
    assert!(state.catch_attempted);
    assert_eq!(state.opponent.active().pokemon.caught_ball, Some(Item::PokeBall));
    assert_eq!(table.inventory.count(Item::PokeBall), 4);
}

#[test]
fn test_failed_catch_gives_opponent_a_free_attack() {
    let mut state = wild_battle();
    let mut table = TestTable::new();
    let mut rng = TurnRng::new_for_test(vec![0.7, 0.5, 0.5, 0.5, 0.5, 0.5]);

    let bus = assert_ok(table.resolve(&mut state, PlayerAction::ThrowBall { ball: Item::PokeBall }, &mut rng));

    assert_eq!(
        bus.events()[2],
        BattleEvent::CatchFailed {
            pokemon: "Pidgey".to_string()
        }
    );
    assert!(bus.contains(|e| matches!(e, BattleEvent::MoveUsed { side: Side::Opponent, .. })));
    assert_eq!(bus.events().last(), Some(&BattleEvent::RoundFinished));
    assert_eq!(state.game_state, GameState::WaitingForAction);
    assert!(state.catch_attempted);
}

#[test]
fn test_master_ball_never_fails() {
    let mut state = wild_battle();
    let mut table = TestTable::new();
    let mut rng = TurnRng::new_for_test(vec![0.999]);

    assert_ok(table.resolve(&mut state, PlayerAction::ThrowBall { ball: Item::MasterBall }, &mut rng));
    assert_eq!(state.game_state, GameState::Caught);
}

#[rstest]
#[case(BattleMode::Trainer, Item::PokeBall, ActionError::CatchNotAllowed)]
#[case(BattleMode::Wild, Item::Potion, ActionError::NotABall(Item::Potion))]
fn test_invalid_throws_are_rejected(
    #[case] mode: BattleMode,
    #[case] ball: Item,
    #[case] expected: ActionError,
) {
    let mut state = create_battle_with_rosters(
        mode,
        vec![TestPokemonBuilder::new(PIKACHU, 10).build()],
        vec![TestPokemonBuilder::new(PIDGEY, 5).build()],
    );
    let mut table = TestTable::new();

    let result = table.resolve(&mut state, PlayerAction::ThrowBall { ball }, &mut predictable_rng());

    assert_eq!(result.unwrap_err(), BattleEngineError::from(expected));
    assert_eq!(state.turn_number, 0);
    assert_eq!(table.inventory.count(Item::PokeBall), 5);
}

#[test]
fn test_throw_without_balls_fails() {
    let mut state = wild_battle();
    let mut table = TestTable::with_inventory(InMemoryInventory::new());

    let result = table.resolve(&mut state, PlayerAction::ThrowBall { ball: Item::PokeBall }, &mut predictable_rng());
    assert_eq!(
        result.unwrap_err(),
        BattleEngineError::from(StorageError::OutOfItem(Item::PokeBall))
    );
    assert!(!state.catch_attempted);
}

#[test]
fn test_run_succeeds_when_roll_is_under_threshold() {
    // Pikachu Lv10 speed 24 vs Pidgey Lv10 speed 17: F = 3072 / 17 + 30 = 210
    let mut state = create_test_battle(
        TestPokemonBuilder::new(PIKACHU, 10).build(),
        TestPokemonBuilder::new(PIDGEY, 10).with_moves(vec![TACKLE]).build(),
    );
    let mut table = TestTable::new();

    let bus = assert_ok(table.resolve(&mut state, PlayerAction::Run, &mut TurnRng::new_for_test(vec![0.5])));

    assert_eq!(
        bus.events().to_vec(),
        vec![
            BattleEvent::TurnStarted { turn_number: 1 },
            BattleEvent::EscapeSucceeded,
            BattleEvent::BattleEnded {
                outcome: GameState::Escaped
            },
        ]
    );
    assert_eq!(state.game_state, GameState::Escaped);
}

#[test]
fn test_failed_run_raises_next_threshold() {
    let mut state = create_test_battle(
        TestPokemonBuilder::new(PIKACHU, 10).build(),
        TestPokemonBuilder::new(PIDGEY, 10).with_moves(vec![TACKLE]).build(),
    );
    let mut table = TestTable::new();

    // 0.9 * 256 = 230.4 misses F = 210, then the opponent attacks
    let mut rng = TurnRng::new_for_test(vec![0.9, 0.5, 0.5, 0.5, 0.5, 0.5]);
    let bus = assert_ok(table.resolve(&mut state, PlayerAction::Run, &mut rng));
    assert_eq!(bus.events()[1], BattleEvent::EscapeFailed);
    assert_eq!(state.run_attempts, 1);
    assert_eq!(state.game_state, GameState::WaitingForAction);

    // Second attempt: F = 180 + 60 = 240 and the same roll gets away
    let bus = assert_ok(table.resolve(&mut state, PlayerAction::Run, &mut TurnRng::new_for_test(vec![0.9])));
    assert!(bus.contains(|e| *e == BattleEvent::EscapeSucceeded));
    assert_eq!(state.run_attempts, 2);
}

#[test]
fn test_cannot_run_from_trainer() {
    let mut state = create_battle_with_rosters(
        BattleMode::Trainer,
        vec![TestPokemonBuilder::new(PIKACHU, 10).build()],
        vec![TestPokemonBuilder::new(PIDGEY, 10).build()],
    );
    let mut table = TestTable::new();

    let result = table.resolve(&mut state, PlayerAction::Run, &mut predictable_rng());
    assert_eq!(
        result.unwrap_err(),
        BattleEngineError::from(ActionError::EscapeNotAllowed)
    );
    assert_eq!(state.run_attempts, 0);
}

#[test]
fn test_potion_heals_then_opponent_attacks() {
    let mut state = create_test_battle(
        TestPokemonBuilder::new(PIKACHU, 10).with_hp(10).build(),
        TestPokemonBuilder::new(PIDGEY, 10).with_moves(vec![TACKLE]).build(),
    );
    let mut table = TestTable::new();

    let bus = assert_ok(table.resolve(
        &mut state,
        PlayerAction::UseItem {
            item: Item::Potion,
            target: 0,
        },
        &mut predictable_rng(),
    ));

    assert_eq!(
        bus.events()[..2].to_vec(),
        vec![
            BattleEvent::TurnStarted { turn_number: 1 },
            BattleEvent::ItemUsed {
                item: Item::Potion,
                pokemon: "Pikachu".to_string(),
                message: "Pikachu recovered 18 HP!".to_string(),
            },
        ]
    );
    assert!(bus.contains(|e| *e
        == BattleEvent::DamageDealt {
            side: Side::Player,
            pokemon: "Pikachu".to_string(),
            damage: 9,
            remaining_hp: 19,
        }));
    assert_eq!(table.inventory.count(Item::Potion), 4);
}

#[test]
fn test_item_without_effect_keeps_item_and_turn() {
    let mut state = wild_battle();
    let mut table = TestTable::new();
    let before = state.player.active().pokemon.clone();

    let bus = assert_ok(table.resolve(
        &mut state,
        PlayerAction::UseItem {
            item: Item::Potion,
            target: 0,
        },
        &mut TurnRng::new_for_test(vec![]),
    ));

    assert_eq!(
        bus.events().to_vec(),
        vec![BattleEvent::ItemHadNoEffect {
            item: Item::Potion,
            pokemon: "Pikachu".to_string(),
            message: "The Potion had no effect on Pikachu.".to_string(),
        }]
    );
    assert_eq!(state.turn_number, 0);
    assert_eq!(state.player.active().pokemon, before);
    assert_eq!(table.inventory.count(Item::Potion), 5);
}

#[test]
fn test_revive_bench_member() {
    let mut state = create_battle_with_rosters(
        BattleMode::Wild,
        vec![
            TestPokemonBuilder::new(PIKACHU, 10).build(),
            TestPokemonBuilder::new(PIDGEY, 10).with_hp(0).build(),
        ],
        vec![TestPokemonBuilder::new(PIDGEY, 5).with_moves(vec![TACKLE]).build()],
    );
    let mut table = TestTable::new();

    assert_ok(table.resolve(
        &mut state,
        PlayerAction::UseItem {
            item: Item::Revive,
            target: 1,
        },
        &mut predictable_rng(),
    ));

    // Half of 29 max HP
    assert_eq!(state.player.members[1].pokemon.current_hp(), 14);
    assert!(!state.player.members[1].pokemon.is_fainted());
}

#[rstest]
#[case(Item::PokeBall, 0, "ball")]
#[case(Item::Potion, 5, "index")]
#[case(Item::HyperPotion, 0, "empty")]
fn test_invalid_item_use(#[case] item: Item, #[case] target: usize, #[case] reason: &str) {
    let mut state = create_test_battle(
        TestPokemonBuilder::new(PIKACHU, 10).with_hp(3).build(),
        TestPokemonBuilder::new(PIDGEY, 5).build(),
    );
    let mut table = TestTable::new();

    let err = table
        .resolve(&mut state, PlayerAction::UseItem { item, target }, &mut predictable_rng())
        .unwrap_err();

    let expected_match = match reason {
        "ball" => matches!(err, BattleEngineError::Action(ActionError::InvalidAction(_))),
        "index" => err == BattleEngineError::from(ActionError::InvalidPokemonIndex(5)),
        _ => err == BattleEngineError::from(StorageError::OutOfItem(Item::HyperPotion)),
    };
    assert!(expected_match, "unexpected error for {}: {:?}", reason, err);
    assert_eq!(state.turn_number, 0);
}

fn opponent_out_of_pp(player_hp: u16) -> crate::battle::state::BattleState {
    let mut state = create_test_battle(
        TestPokemonBuilder::new(PIKACHU, 10)
            .with_moves(vec![THUNDER_SHOCK])
            .with_hp(player_hp)
            .build(),
        TestPokemonBuilder::new(PIDGEY, 5).with_moves(vec![TACKLE]).build(),
    );
    state.opponent.active_mut().pokemon.moves[0].pp = 0;
    state
}

#[test]
fn test_failed_turn_keeps_the_ball() {
    let mut state = opponent_out_of_pp(28);
    let mut table = TestTable::new();

    // The throw misses and the counter-attack has nothing to use
    let result = table.resolve(
        &mut state,
        PlayerAction::ThrowBall { ball: Item::PokeBall },
        &mut TurnRng::new_for_test(vec![0.99; 10]),
    );

    assert_eq!(
        result.unwrap_err(),
        BattleEngineError::from(ActionError::EmptyMoveList)
    );
    assert_eq!(table.inventory.count(Item::PokeBall), 5);
    assert_eq!(state.turn_number, 0);
    assert!(!state.catch_attempted);
}

#[test]
fn test_failed_turn_keeps_the_potion_and_the_hp() {
    let mut state = opponent_out_of_pp(10);
    let mut table = TestTable::new();

    let result = table.resolve(
        &mut state,
        PlayerAction::UseItem {
            item: Item::Potion,
            target: 0,
        },
        &mut predictable_rng(),
    );

    assert_eq!(
        result.unwrap_err(),
        BattleEngineError::from(ActionError::EmptyMoveList)
    );
    assert_eq!(table.inventory.count(Item::Potion), 5);
    assert_eq!(state.player.active().pokemon.current_hp(), 10);
    assert_eq!(state.turn_number, 0);
}
