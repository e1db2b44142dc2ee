use crate::errors::BattleResult;
use crate::pokemon::PokemonInst;
use schema::{Ailment, Item};

const ETHER_PP: u8 = 10;

/// Result of using an item on a Pokemon. When `item_used` is false the
/// returned Pokemon is unchanged and the item should not be consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemOutcome {
    pub pokemon: PokemonInst,
    pub item_used: bool,
    pub message: String,
}

/// Item-effect collaborator consumed by the use-item turn.
pub trait ItemEffectStrategy: Send + Sync {
    fn apply(&self, pokemon: &PokemonInst, item: Item) -> BattleResult<ItemOutcome>;
}

/// Healing, revive, status cure and PP restore items.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardItemEffects;

impl StandardItemEffects {
    fn heal(pokemon: &mut PokemonInst, amount: u16) -> Option<String> {
        let healed = pokemon.heal(amount);
        (healed > 0).then(|| format!("{} recovered {} HP!", pokemon.name, healed))
    }

    fn revive(pokemon: &mut PokemonInst, hp: u16) -> Option<String> {
        pokemon
            .revive(hp)
            .then(|| format!("{} was revived!", pokemon.name))
    }

    fn cure(pokemon: &mut PokemonInst, cures: &[Ailment]) -> Option<String> {
        if !cures.contains(&pokemon.ailment()) {
            return None;
        }
        pokemon
            .cure_ailment()
            .map(|ailment| format!("{} was cured of its {}.", pokemon.name, ailment))
    }

    fn restore_pp(pokemon: &mut PokemonInst, amount: u8) -> Option<String> {
        let slot = pokemon.moves.iter_mut().find(|m| m.pp < m.max_pp)?;
        let restored = slot.restore_pp(amount);
        Some(format!("{}'s {} regained {} PP.", pokemon.name, slot.name, restored))
    }
}

impl ItemEffectStrategy for StandardItemEffects {
    fn apply(&self, pokemon: &PokemonInst, item: Item) -> BattleResult<ItemOutcome> {
        const ALL_STATUS: [Ailment; 5] = [
            Ailment::Poison,
            Ailment::Burn,
            Ailment::Paralysis,
            Ailment::Sleep,
            Ailment::Freeze,
        ];

        let mut updated = pokemon.clone();
        let max_hp = updated.max_hp();
        let message = match item {
            Item::Potion => Self::heal(&mut updated, 20),
            Item::SuperPotion => Self::heal(&mut updated, 50),
            Item::HyperPotion => Self::heal(&mut updated, 200),
            Item::MaxPotion => Self::heal(&mut updated, max_hp),
            Item::Revive => Self::revive(&mut updated, max_hp / 2),
            Item::MaxRevive => Self::revive(&mut updated, max_hp),
            Item::Antidote => Self::cure(&mut updated, &[Ailment::Poison]),
            Item::BurnHeal => Self::cure(&mut updated, &[Ailment::Burn]),
            Item::IceHeal => Self::cure(&mut updated, &[Ailment::Freeze]),
            Item::Awakening => Self::cure(&mut updated, &[Ailment::Sleep]),
            Item::ParalyzeHeal => Self::cure(&mut updated, &[Ailment::Paralysis]),
            Item::FullHeal => Self::cure(&mut updated, &ALL_STATUS),
            Item::Ether => Self::restore_pp(&mut updated, ETHER_PP),
            Item::MaxEther => Self::restore_pp(&mut updated, u8::MAX),
            Item::PokeBall | Item::GreatBall | Item::UltraBall | Item::MasterBall => None,
        };

        Ok(match message {
            Some(message) => ItemOutcome {
                pokemon: updated,
                item_used: true,
                message,
            },
            None => ItemOutcome {
                pokemon: pokemon.clone(),
                item_used: false,
                message: format!("The {} had no effect on {}.", item, pokemon.name),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::TestPokemonBuilder;
    use crate::prefab_data::{PIKACHU, TACKLE, THUNDER_SHOCK};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case(Item::Potion, 20)]
    #[case(Item::SuperPotion, 50)]
    fn test_potions_heal_fixed_amounts(#[case] item: Item, #[case] amount: u16) {
        let pokemon = TestPokemonBuilder::new(PIKACHU, 50).with_hp(10).build();
        let outcome = StandardItemEffects.apply(&pokemon, item).unwrap();
        assert!(outcome.item_used);
        assert_eq!(outcome.pokemon.current_hp(), 10 + amount);
    }

    #[test]
    fn test_max_potion_fills_hp() {
        let pokemon = TestPokemonBuilder::new(PIKACHU, 50).with_hp(1).build();
        let outcome = StandardItemEffects.apply(&pokemon, Item::MaxPotion).unwrap();
        assert_eq!(outcome.pokemon.current_hp(), outcome.pokemon.max_hp());
    }

    #[test]
    fn test_revive_only_works_on_fainted() {
        let fainted = TestPokemonBuilder::new(PIKACHU, 20).with_hp(0).build();
        let outcome = StandardItemEffects.apply(&fainted, Item::Revive).unwrap();
        assert!(outcome.item_used);
        assert_eq!(outcome.pokemon.current_hp(), fainted.max_hp() / 2);
        assert_eq!(outcome.pokemon.ailment(), Ailment::Healthy);

        let potion = StandardItemEffects.apply(&fainted, Item::Potion).unwrap();
        assert!(!potion.item_used, "potions cannot bring back a fainted Pokemon");
    }

    #[test]
    fn test_status_cures_match_their_ailment() {
        let poisoned = TestPokemonBuilder::new(PIKACHU, 20)
            .with_ailment(Ailment::Poison)
            .build();
        assert!(!StandardItemEffects.apply(&poisoned, Item::BurnHeal).unwrap().item_used);

        let outcome = StandardItemEffects.apply(&poisoned, Item::Antidote).unwrap();
        assert!(outcome.item_used);
        assert_eq!(outcome.pokemon.ailment(), Ailment::Healthy);

        let full_heal = StandardItemEffects.apply(&poisoned, Item::FullHeal).unwrap();
        assert_eq!(full_heal.pokemon.ailment(), Ailment::Healthy);
    }

    #[test]
    fn test_ether_restores_first_depleted_move() {
        let mut pokemon = TestPokemonBuilder::new(PIKACHU, 20)
            .with_moves(vec![TACKLE, THUNDER_SHOCK])
            .build();
        pokemon.moves[1].pp = 2;
        let outcome = StandardItemEffects.apply(&pokemon, Item::Ether).unwrap();
        assert!(outcome.item_used);
        assert_eq!(outcome.pokemon.moves[0].pp, pokemon.moves[0].max_pp);
        assert_eq!(outcome.pokemon.moves[1].pp, 12);
    }

    #[test]
    fn test_zero_effect_items_leave_pokemon_unchanged() {
        let healthy = TestPokemonBuilder::new(PIKACHU, 20).build();
        for item in Item::iter() {
            let outcome = StandardItemEffects.apply(&healthy, item).unwrap();
            assert!(!outcome.item_used, "{} should do nothing here", item);
            assert_eq!(outcome.pokemon, healthy);
        }
    }
}
