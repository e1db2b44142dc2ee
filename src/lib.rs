// In: src/lib.rs

//! Pokemon Code Quest Battle Engine
//!
//! Wild encounters and turn-based battles for a coding-activity creature
//! collection game. Simulation is synchronous and returns ordered narrative
//! events; a single-flight async runner sequences player actions and talks
//! to the roster, inventory, difficulty and presentation collaborators.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod difficulty;
pub mod encounter;
pub mod errors;
pub mod pokemon;
pub mod prefab_data;
pub mod progression;
pub mod reference;
pub mod storage;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    Ailment, BaseStats, Biome, EncounterCandidate, Gender, Item, MoveData, MoveMeta, Nature,
    PokemonType, SpeciesData, StatType, TypeChart,
};

// --- From this crate's modules (`src/`) ---

// Battle flow and state.
pub use battle::runner::{
    BattleHandle, BattleRunner, BattleSnapshot, EngineServices, LogPresentation, Presentation,
    SessionPhase,
};
pub use battle::state::{BattleEvent, BattleMode, BattleState, EventBus, GameState, TurnRng};
pub use battle::turn_orchestrator::{resolve_turn, PlayerAction, TurnContext};

// Runtime Pokemon and reference data.
pub use pokemon::{MoveInstance, PokemonInst};
pub use reference::ReferenceData;

// Collaborators.
pub use battle::items::{ItemEffectStrategy, ItemOutcome, StandardItemEffects};
pub use difficulty::{AdaptiveDifficulty, DifficultyFeed, DifficultyRecommendation, OutcomeRecord};
pub use storage::{InMemoryInventory, InMemoryStore, Inventory, RosterStore};

pub use config::EngineConfig;

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleEngineError, BattleResult, BattleStateError, ConfigError, EncounterError,
    ReferenceDataError, StorageError,
};
