use crate::{PokemonType, StatType};
use serde::{Deserialize, Serialize};

/// Who the secondary effects of a move land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MoveTarget {
    User,
    #[default]
    SelectedPokemon,
    AllOpponents,
}

impl MoveTarget {
    pub fn is_user(self) -> bool {
        matches!(self, MoveTarget::User)
    }
}

/// A single declared stat-stage delta, e.g. Growl is `Attack, -1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatChange {
    pub stat: StatType,
    pub change: i8,
}

/// Secondary-effect metadata. Chances are percentages (0-100). An
/// `ailment_chance` or `stat_chance` of 0 means the effect is the move's
/// primary effect and always applies on hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MoveMeta {
    /// Name from the fixed ailment name table ("paralysis", "confusion", ...).
    pub ailment: String,
    pub ailment_chance: u8,
    pub flinch_chance: u8,
    /// 0 = 1/16, 1 = 1/8, 2 = 1/2, 3+ = always.
    pub crit_rate: u8,
    pub stat_chance: u8,
    pub stat_changes: Vec<StatChange>,
    pub target: MoveTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: u32,
    pub name: String,
    pub move_type: PokemonType,
    /// `None` for status moves.
    pub power: Option<u16>,
    /// `None` for moves that never miss.
    pub accuracy: Option<u8>,
    pub pp: u8,
    pub priority: i8,
    pub meta: Option<MoveMeta>,
}

impl MoveData {
    pub fn is_status(&self) -> bool {
        self.power.is_none()
    }
}
