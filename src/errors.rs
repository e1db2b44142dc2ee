use schema::{Biome, Item};
use thiserror::Error;

/// Main error type for the battle and encounter engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BattleEngineError {
    /// Error related to species/move/biome reference data
    #[error("Reference data error: {0}")]
    ReferenceData(#[from] ReferenceDataError),
    /// Error related to invalid battle state
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    /// Error related to invalid player actions
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    /// Error raised while generating a wild encounter
    #[error("Encounter error: {0}")]
    Encounter(#[from] EncounterError),
    /// Error raised by the roster/inventory collaborator
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    /// The item-effect collaborator failed
    #[error("Item effect error: {0}")]
    ItemEffect(String),
    /// The runner task is gone and can no longer take requests
    #[error("The battle runner has shut down")]
    RunnerClosed,
}

/// Errors related to reference data lookups and loading
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceDataError {
    #[error("Species not found: {0}")]
    SpeciesNotFound(u32),
    #[error("Move not found: {0}")]
    MoveNotFound(u32),
    #[error("Biome not configured: {0}")]
    BiomeNotFound(Biome),
    #[error("Malformed reference data: {0}")]
    MalformedData(String),
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    #[error("No active Pokemon found")]
    NoActiveCombatant,
    #[error("No opponent Pokemon found")]
    NoOpponent,
    #[error("No battle in progress")]
    NoBattleInProgress,
    #[error("A battle is already in progress")]
    BattleInProgress,
    #[error("The battle is already over")]
    BattleOver,
}

/// Errors related to player actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Move {0} is not known by the active Pokemon")]
    MoveNotKnown(u32),
    #[error("No usable move to pick from")]
    EmptyMoveList,
    #[error("Invalid Pokemon index: {0}")]
    InvalidPokemonIndex(usize),
    #[error("Cannot switch to a fainted Pokemon")]
    TargetFainted,
    #[error("Pokemon is already active")]
    AlreadyActive,
    #[error("{0} cannot be thrown")]
    NotABall(Item),
    #[error("Catching is only allowed in wild battles")]
    CatchNotAllowed,
    #[error("Cannot run from a trainer battle")]
    EscapeNotAllowed,
    #[error("Invalid action: {0}")]
    InvalidAction(String),
}

/// Errors raised while generating a wild encounter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncounterError {
    #[error("No encounter candidates for {biome} at depth {depth}")]
    NoCandidates { biome: Biome, depth: u32 },
}

/// Errors raised by the roster and inventory collaborators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Failed to encode roster: {0}")]
    Encode(String),
    #[error("Failed to decode roster: {0}")]
    Decode(String),
    #[error("No {0} left in the bag")]
    OutOfItem(Item),
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using ReferenceDataError
pub type ReferenceDataResult<T> = Result<T, ReferenceDataError>;
