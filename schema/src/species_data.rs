use crate::{Biome, PokemonType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

impl BaseStats {
    /// Stats in HP, ATK, DEF, SP.ATK, SP.DEF, SPD order.
    pub fn as_array(&self) -> [u8; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.sp_attack,
            self.sp_defense,
            self.speed,
        ]
    }

    pub fn total(&self) -> u16 {
        self.as_array().iter().map(|&s| s as u16).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LearnMethod {
    LevelUp,
    Machine,
    Tutor,
    Egg,
}

impl LearnMethod {
    /// Methods a wild creature can plausibly know a move through.
    pub fn is_wild_learnable(self) -> bool {
        matches!(
            self,
            LearnMethod::LevelUp | LearnMethod::Machine | LearnMethod::Tutor
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnableMove {
    pub move_id: u32,
    pub method: LearnMethod,
    /// Level for level-up moves, 0 otherwise.
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub id: u32,
    pub name: String,
    /// Localized display names keyed by language code.
    pub names: HashMap<String, String>,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    pub catch_rate: u8,
    pub base_exp: u16,
    /// Eighths female; -1 for genderless.
    pub gender_rate: i8,
    pub abilities: Vec<String>,
    pub learnset: Vec<LearnableMove>,
}

impl SpeciesData {
    pub fn localized_name(&self, language: &str) -> &str {
        self.names
            .get(language)
            .map(String::as_str)
            .unwrap_or(&self.name)
    }
}

/// A species that can be met in the wild, with its rarity data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterCandidate {
    pub species_id: u32,
    pub names: HashMap<String, String>,
    pub types: Vec<PokemonType>,
    pub catch_rate: u8,
    pub min_depth: u32,
    /// Base encounter weight; higher is more common.
    pub encounter_rate: f32,
}

impl EncounterCandidate {
    pub fn shares_type_with(&self, types: &[PokemonType]) -> bool {
        self.types.iter().any(|t| types.contains(t))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeData {
    pub biome: Biome,
    pub allowed_types: Vec<PokemonType>,
}
