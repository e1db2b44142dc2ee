//! Battle simulation: stat stages, move resolution, capture, the
//! per-combatant state machine, turn orchestration and the session runner.

pub mod calculators;
pub mod catch;
pub mod combatant;
pub mod conditions;
pub mod items;
pub mod runner;
pub mod state;
pub mod stats;
pub mod turn_orchestrator;

#[cfg(test)]
pub(crate) mod tests;
