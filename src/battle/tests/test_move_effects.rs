use crate::battle::calculators::{resolve_move_effect, MoveEffectResult};
use crate::battle::conditions::BattleModifiers;
use crate::battle::state::{BattleEvent, Side, TurnRng};
use crate::battle::tests::common::{assert_ok, create_test_battle, TestPokemonBuilder, TestTable};
use crate::battle::turn_orchestrator::PlayerAction;
use crate::pokemon::{MoveInstance, PokemonInst};
use crate::prefab_data::*;
use crate::reference::ReferenceData;
use pretty_assertions::assert_eq;
use rstest::rstest;
use schema::{Ailment, StatType};

/// Four fixed draws (random factor, crit, accuracy, evasion) followed by
/// whatever secondary rolls the move needs.
fn draws(secondary: &[f64]) -> TurnRng {
    let mut values = vec![0.5, 0.5, 0.5, 0.5];
    values.extend_from_slice(secondary);
    TurnRng::new_for_test(values)
}

fn resolve(attacker: &PokemonInst, defender: &PokemonInst, move_id: u32, rng: &mut TurnRng) -> MoveEffectResult {
    resolve_with(&ReferenceData::builtin(), attacker, defender, move_id, rng)
}

fn resolve_with(
    reference: &ReferenceData,
    attacker: &PokemonInst,
    defender: &PokemonInst,
    move_id: u32,
    rng: &mut TurnRng,
) -> MoveEffectResult {
    let move_used = MoveInstance::new(reference.move_data(move_id).unwrap());
    resolve_move_effect(
        attacker,
        &BattleModifiers::default(),
        defender,
        &BattleModifiers::default(),
        &move_used,
        reference.type_chart(),
        rng,
    )
}

fn pikachu() -> PokemonInst {
    TestPokemonBuilder::new(PIKACHU, 10).build()
}

fn pidgey() -> PokemonInst {
    TestPokemonBuilder::new(PIDGEY, 10).build()
}

#[rstest]
#[case(0.05, Some(Ailment::Paralysis))]
#[case(0.10, None)] // 10% chance: the roll has to land strictly below
#[case(0.50, None)]
fn test_ailment_chance_gating(#[case] roll: f64, #[case] expected: Option<Ailment>) {
    let result = resolve(&pikachu(), &pidgey(), THUNDER_SHOCK, &mut draws(&[roll]));

    assert!(result.is_hit);
    assert_eq!(result.damage, 21);
    assert_eq!(result.ailment, expected);
}

#[test]
fn test_primary_ailment_needs_no_roll() {
    // Thunder Wave declares paralysis with chance 0: it always lands on a hit
    let result = resolve(&pikachu(), &pidgey(), THUNDER_WAVE, &mut draws(&[]));

    assert_eq!(result.damage, 0);
    assert_eq!(result.ailment, Some(Ailment::Paralysis));
}

#[rstest]
#[case(0.05, true)]
#[case(0.95, false)]
fn test_confusion_infliction(#[case] roll: f64, #[case] confused: bool) {
    let result = resolve(&pikachu(), &pidgey(), CONFUSION, &mut draws(&[roll]));

    assert_eq!(result.confused, confused);
    assert_eq!(result.ailment, None);
}

#[rstest]
#[case(0.2, true)]
#[case(0.4, false)]
fn test_flinch_chance(#[case] roll: f64, #[case] flinched: bool) {
    let result = resolve(&pidgey(), &pikachu(), BITE, &mut draws(&[roll]));

    assert!(result.damage > 0);
    assert_eq!(result.flinched, flinched);
}

#[test]
fn test_user_targeted_stat_change() {
    let result = resolve(&pikachu(), &pidgey(), SWORDS_DANCE, &mut draws(&[]));

    let mut expected = [0i8; 6];
    expected[StatType::Attack.index()] = 2;
    assert_eq!(result.attacker_stat_changes, expected);
    assert_eq!(result.defender_stat_changes, [0; 6]);
    assert_eq!(result.damage, 0);
}

#[test]
fn test_opponent_targeted_stat_change() {
    let result = resolve(&pikachu(), &pidgey(), TAIL_WHIP, &mut draws(&[]));

    assert_eq!(result.defender_stat_changes[StatType::Defense.index()], -1);
    assert_eq!(result.attacker_stat_changes, [0; 6]);
}

#[test]
fn test_critical_hit_multiplies_damage() {
    let normal = resolve(&pikachu(), &pidgey(), TACKLE, &mut draws(&[]));
    let critical = resolve(
        &pikachu(),
        &pidgey(),
        TACKLE,
        &mut TurnRng::new_for_test(vec![0.5, 0.01, 0.5, 0.5]),
    );

    assert!(!normal.is_critical);
    assert!(critical.is_critical);
    assert!(critical.damage > normal.damage);
}

#[test]
fn test_faster_defender_evades() {
    // Pidgey speed 17 against Pikachu speed 24: evade chance 7/24 = 29%
    let result = resolve(
        &pidgey(),
        &pikachu(),
        TACKLE,
        &mut TurnRng::new_for_test(vec![0.5, 0.5, 0.5, 0.1]),
    );

    assert!(result.is_successful_attack);
    assert!(result.is_successful_evade);
    assert!(!result.is_hit);
    assert_eq!(result.damage, 0);
}

#[test]
fn test_immune_target_ignores_secondary_effects() {
    let geodude = TestPokemonBuilder::new(GEODUDE, 10).build();

    // A 0.0 secondary roll would paralyze anything that is not immune
    let result = resolve(&pikachu(), &geodude, THUNDER_SHOCK, &mut draws(&[0.0]));

    assert!(result.is_hit);
    assert_eq!(result.effectiveness, 0.0);
    assert_eq!(result.damage, 0);
    assert_eq!(result.ailment, None);
}

#[test]
fn test_ailment_and_confusion_events_in_a_round() {
    let mut state = create_test_battle(
        TestPokemonBuilder::new(PIKACHU, 10)
            .with_moves(vec![THUNDER_SHOCK])
            .build(),
        TestPokemonBuilder::new(PIDGEY, 10).with_moves(vec![TACKLE]).build(),
    );
    let mut table = TestTable::new();
    let mut rng = TurnRng::new_for_test([vec![0.5; 4], vec![0.05], vec![0.5; 20]].concat());

    let bus = assert_ok(table.resolve(
        &mut state,
        PlayerAction::Attack {
            move_id: THUNDER_SHOCK,
        },
        &mut rng,
    ));

    assert!(bus.contains(|e| *e
        == BattleEvent::AilmentApplied {
            side: Side::Opponent,
            pokemon: "Pidgey".to_string(),
            ailment: Ailment::Paralysis,
        }));

    let mut state = create_test_battle(
        TestPokemonBuilder::new(PIKACHU, 10)
            .with_moves(vec![CONFUSION])
            .build(),
        TestPokemonBuilder::new(PIDGEY, 10).with_moves(vec![TACKLE]).build(),
    );
    let mut rng = TurnRng::new_for_test([vec![0.5; 4], vec![0.05], vec![0.5; 20]].concat());

    let bus = assert_ok(table.resolve(&mut state, PlayerAction::Attack { move_id: CONFUSION }, &mut rng));

    assert!(bus.contains(|e| *e
        == BattleEvent::BecameConfused {
            side: Side::Opponent,
            pokemon: "Pidgey".to_string(),
        }));
}

#[test]
fn test_damage_never_drops_hp_below_zero() {
    let species = [PIKACHU, PIDGEY, GEODUDE, MAGIKARP, DRATINI, BULBASAUR, MACHOP];
    let moves = [
        KARATE_CHOP, SCRATCH, TACKLE, BITE, EMBER, WATER_GUN, ICE_BEAM, THUNDER_SHOCK, ROCK_THROW,
        CONFUSION, SLUDGE, SWIFT, GROWL,
    ];
    let reference = ReferenceData::builtin();
    let mut seed = 0;

    for &attacker_id in &species {
        for &defender_id in &species {
            for level in [1, 50, 100] {
                let attacker = TestPokemonBuilder::new(attacker_id, level).build();
                for &move_id in &moves {
                    seed += 1;
                    let mut defender = TestPokemonBuilder::new(defender_id, 100 - level + 1)
                        .with_hp(1)
                        .build();
                    let result = resolve_with(
                        &reference,
                        &attacker,
                        &defender,
                        move_id,
                        &mut TurnRng::from_seed(seed),
                    );

                    defender.take_damage(result.damage);
                    assert!(defender.current_hp() <= 1);
                    if !result.is_hit {
                        assert_eq!(result.damage, 0);
                    }
                }
            }
        }
    }
}
