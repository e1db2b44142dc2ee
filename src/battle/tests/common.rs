use crate::battle::items::StandardItemEffects;
use crate::battle::state::{BattleMode, BattleSide, BattleState, EventBus, Side, TurnRng};
use crate::battle::turn_orchestrator::{resolve_turn, PlayerAction, TurnContext};
use crate::config::BattleConfig;
use crate::difficulty::DifficultyRecommendation;
use crate::errors::BattleResult;
use crate::pokemon::{MoveInstance, PokemonInst, PokemonTraits, MAX_MOVES};
use crate::reference::ReferenceData;
use crate::storage::InMemoryInventory;
use schema::{Ailment, Biome, Gender, Item, LearnMethod, Nature};

/// A builder for creating test Pokemon instances with common defaults:
/// IVs of 15, no EVs, a neutral nature and the species' first ability.
///
/// # Example
/// ```ignore
/// let pokemon = TestPokemonBuilder::new(PIKACHU, 25)
///     .with_moves(vec![THUNDER_SHOCK])
///     .with_ailment(Ailment::Paralysis)
///     .build();
/// ```
pub struct TestPokemonBuilder {
    species_id: u32,
    level: u8,
    moves: Option<Vec<u32>>,
    ailment: Option<Ailment>,
    current_hp: Option<u16>,
}

impl TestPokemonBuilder {
    pub fn new(species_id: u32, level: u8) -> Self {
        Self {
            species_id,
            level,
            moves: None,
            ailment: None,
            current_hp: None,
        }
    }

    /// Sets the moves by id. Without this the Pokemon knows its first
    /// level-up moves up to its level.
    pub fn with_moves(mut self, moves: Vec<u32>) -> Self {
        self.moves = Some(moves);
        self
    }

    pub fn with_ailment(mut self, ailment: Ailment) -> Self {
        self.ailment = Some(ailment);
        self
    }

    /// Sets the current HP. 0 leaves the Pokemon fainted.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn build(self) -> PokemonInst {
        let reference = ReferenceData::builtin();
        let species = match reference.species(self.species_id) {
            Ok(data) => data,
            Err(err) => panic!("Failed to load species {}: {}", self.species_id, err),
        };

        let move_ids = self.moves.unwrap_or_else(|| {
            species
                .learnset
                .iter()
                .filter(|m| m.method == LearnMethod::LevelUp && m.level <= self.level)
                .map(|m| m.move_id)
                .take(MAX_MOVES)
                .collect()
        });
        let moves = move_ids
            .iter()
            .map(|&id| match reference.move_data(id) {
                Ok(data) => MoveInstance::new(data),
                Err(err) => panic!("Failed to load move {}: {}", id, err),
            })
            .collect();

        let traits = PokemonTraits {
            id: format!("test-{}", self.species_id),
            level: self.level,
            ivs: [15; 6],
            nature: Nature::Hardy,
            ability: species.abilities.first().cloned().unwrap_or_default(),
            gender: Gender::Male,
            shiny: false,
        };
        let mut pokemon = PokemonInst::new(species, traits, moves);

        if let Some(ailment) = self.ailment {
            pokemon.set_ailment(ailment);
        }
        if let Some(hp) = self.current_hp {
            pokemon.set_hp(hp);
        }
        pokemon
    }
}

/// Creates a wild 1v1 battle in the grassland.
pub fn create_test_battle(player: PokemonInst, opponent: PokemonInst) -> BattleState {
    create_battle_with_rosters(BattleMode::Wild, vec![player], vec![opponent])
}

pub fn create_battle_with_rosters(
    mode: BattleMode,
    player: Vec<PokemonInst>,
    opponent: Vec<PokemonInst>,
) -> BattleState {
    let player = assert_ok(BattleSide::new("Player".to_string(), Side::Player, player));
    let opponent = assert_ok(BattleSide::new("Rival".to_string(), Side::Opponent, opponent));
    BattleState::new(
        "test_battle".to_string(),
        mode,
        Biome::Grassland,
        player,
        opponent,
        DifficultyRecommendation::default(),
    )
}

/// Owns everything a `TurnContext` borrows, so tests can resolve turns
/// without wiring up a runner.
pub struct TestTable {
    pub reference: ReferenceData,
    pub config: BattleConfig,
    pub items: StandardItemEffects,
    pub inventory: InMemoryInventory,
}

impl TestTable {
    /// Five of every ball and healing item a test is likely to need.
    pub fn new() -> Self {
        let inventory = [
            Item::PokeBall,
            Item::MasterBall,
            Item::Potion,
            Item::Revive,
            Item::FullHeal,
        ]
        .into_iter()
        .fold(InMemoryInventory::new(), |bag, item| bag.with_item(item, 5));
        Self::with_inventory(inventory)
    }

    pub fn with_inventory(inventory: InMemoryInventory) -> Self {
        Self {
            reference: ReferenceData::builtin(),
            config: BattleConfig::default(),
            items: StandardItemEffects,
            inventory,
        }
    }

    pub fn resolve(
        &mut self,
        state: &mut BattleState,
        action: PlayerAction,
        rng: &mut TurnRng,
    ) -> BattleResult<EventBus> {
        let mut ctx = TurnContext {
            type_chart: self.reference.type_chart(),
            config: &self.config,
            items: &self.items,
            inventory: &mut self.inventory,
        };
        resolve_turn(state, action, &mut ctx, rng)
    }
}

/// Creates a `TurnRng` filled with 0.5: every move hits, nothing crits, no
/// secondary effect lands, sleep and freeze persist, paralysis wears off
/// and confusion snaps.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![0.5; 100])
}

/// Helper function to assert that a Result is Ok and return the value.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
