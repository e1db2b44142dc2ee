use crate::battle::stats::{MAX_STAGE, MIN_STAGE};
use schema::StatType;
use serde::{Deserialize, Serialize};

/// Battle-scoped modifiers of one combatant. Created fresh when a Pokemon
/// enters battle and dropped when it leaves.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BattleModifiers {
    stages: [i8; 6],
    pub flinched: bool,
    pub confused: bool,
}

impl BattleModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self, stat: StatType) -> i8 {
        self.stages[stat.index()]
    }

    pub fn stages(&self) -> [i8; 6] {
        self.stages
    }

    /// Add `delta` to a stat stage, clamped to [-6, 6]. Returns (old, new).
    pub fn change_stage(&mut self, stat: StatType, delta: i8) -> (i8, i8) {
        let old = self.stages[stat.index()];
        let new = old.saturating_add(delta).clamp(MIN_STAGE, MAX_STAGE);
        self.stages[stat.index()] = new;
        (old, new)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
