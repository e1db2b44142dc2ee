//! Tunable engine knobs, loadable from RON.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub encounter: EncounterConfig,
    pub battle: BattleConfig,
    pub difficulty: DifficultyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    pub base_level: u8,
    pub level_per_depth: u8,
    /// Past this depth only the toxic pool spawns.
    pub max_depth: u32,
    pub toxic_species: Vec<u32>,
    /// Extra weight added to every candidate once the play-time ceiling is reached.
    pub max_bonus_weight: f32,
    pub bonus_ceiling_ms: u64,
    pub shiny_probability: f64,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            base_level: 5,
            level_per_depth: 2,
            max_depth: 20,
            toxic_species: vec![88, 109],
            max_bonus_weight: 20.0,
            bonus_ceiling_ms: 3_600_000,
            shiny_probability: 1.0 / 4096.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub max_roster_size: usize,
    /// Share of the active Pokemon's experience granted to the rest of the roster.
    pub bench_exp_share: f32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            max_roster_size: 6,
            bench_exp_share: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Number of recent outcomes the adaptive feed looks at.
    pub window: usize,
    /// Share of recent battles the player fainted in before easing off.
    pub struggle_threshold: f32,
    /// Share of recent battles won with high HP before pushing harder.
    pub dominance_threshold: f32,
    /// Remaining HP percent that counts as a comfortable win.
    pub comfortable_hp_percent: f32,
    pub max_level_offset: i8,
    pub max_catch_bonus_percent: f32,
    /// Encounter rate separating common species (at or above) from rare ones.
    pub rarity_split: f32,
    pub struggling_exp_multiplier: f32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            window: 10,
            struggle_threshold: 0.4,
            dominance_threshold: 0.7,
            comfortable_hp_percent: 60.0,
            max_level_offset: 5,
            max_catch_bonus_percent: 50.0,
            rarity_split: 30.0,
            struggling_exp_multiplier: 1.2,
        }
    }
}

impl EngineConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }
}
