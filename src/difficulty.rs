//! Dynamic difficulty: the recommendation consumed by encounters and
//! battles, and the feed that produces it from recent battle outcomes.

use crate::config::DifficultyConfig;
use log::debug;
use schema::Biome;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Inclusive encounter-rate band.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct RateBand {
    pub min: f32,
    pub max: f32,
}

impl RateBand {
    pub fn contains(&self, rate: f32) -> bool {
        rate >= self.min && rate <= self.max
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DifficultyRecommendation {
    pub band: Option<RateBand>,
    pub level_offset: i8,
    pub catch_bonus_percent: f32,
    pub exp_multiplier: f32,
}

impl Default for DifficultyRecommendation {
    fn default() -> Self {
        Self {
            band: None,
            level_offset: 0,
            catch_bonus_percent: 0.0,
            exp_multiplier: 1.0,
        }
    }
}

/// What happened in one finished battle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutcomeRecord {
    pub species_id: u32,
    pub biome: Biome,
    pub catch_attempted: bool,
    pub caught: bool,
    pub won: bool,
    pub player_fainted: bool,
    /// Remaining HP of the player's active Pokemon, in percent.
    pub remaining_hp_percent: f32,
}

/// Difficulty collaborator: supplies recommendations and learns from outcomes.
pub trait DifficultyFeed: Send {
    fn recommendation(&self) -> DifficultyRecommendation;
    fn record_outcome(&mut self, record: OutcomeRecord);
}

/// Always hands out the same recommendation.
#[derive(Debug, Clone, Default)]
pub struct StaticDifficulty {
    recommendation: DifficultyRecommendation,
    pub recorded: Vec<OutcomeRecord>,
}

impl StaticDifficulty {
    pub fn new(recommendation: DifficultyRecommendation) -> Self {
        Self {
            recommendation,
            recorded: Vec::new(),
        }
    }
}

impl DifficultyFeed for StaticDifficulty {
    fn recommendation(&self) -> DifficultyRecommendation {
        self.recommendation.clone()
    }

    fn record_outcome(&mut self, record: OutcomeRecord) {
        self.recorded.push(record);
    }
}

/// Adjusts to the last `window` battles. A struggling player gets lower
/// levels, a catch bonus, extra experience and common species; a dominant
/// player gets higher levels and rarer species.
#[derive(Debug, Clone)]
pub struct AdaptiveDifficulty {
    config: DifficultyConfig,
    history: VecDeque<OutcomeRecord>,
}

impl AdaptiveDifficulty {
    pub fn new(config: DifficultyConfig) -> Self {
        Self {
            config,
            history: VecDeque::new(),
        }
    }

    pub fn history(&self) -> impl Iterator<Item = &OutcomeRecord> {
        self.history.iter()
    }

    fn share(&self, predicate: impl Fn(&OutcomeRecord) -> bool) -> f32 {
        if self.history.is_empty() {
            return 0.0;
        }
        self.history.iter().filter(|r| predicate(r)).count() as f32 / self.history.len() as f32
    }

    fn scaled_offset(&self, share: f32) -> i8 {
        let max = self.config.max_level_offset as f32;
        (share * max).round().clamp(0.0, max) as i8
    }
}

impl DifficultyFeed for AdaptiveDifficulty {
    fn recommendation(&self) -> DifficultyRecommendation {
        let struggling = self.share(|r| r.player_fainted);
        let comfortable_hp = self.config.comfortable_hp_percent;
        let dominant =
            self.share(|r| (r.won || r.caught) && r.remaining_hp_percent >= comfortable_hp);

        if !self.history.is_empty() && struggling >= self.config.struggle_threshold {
            DifficultyRecommendation {
                band: Some(RateBand {
                    min: self.config.rarity_split,
                    max: f32::MAX,
                }),
                level_offset: -self.scaled_offset(struggling),
                catch_bonus_percent: (struggling * self.config.max_catch_bonus_percent)
                    .min(self.config.max_catch_bonus_percent),
                exp_multiplier: self.config.struggling_exp_multiplier,
            }
        } else if !self.history.is_empty() && dominant >= self.config.dominance_threshold {
            DifficultyRecommendation {
                band: Some(RateBand {
                    min: 0.0,
                    max: self.config.rarity_split,
                }),
                level_offset: self.scaled_offset(dominant),
                ..DifficultyRecommendation::default()
            }
        } else {
            DifficultyRecommendation::default()
        }
    }

    fn record_outcome(&mut self, record: OutcomeRecord) {
        debug!("Recording battle outcome: {:?}", record);
        self.history.push_back(record);
        while self.history.len() > self.config.window.max(1) {
            self.history.pop_front();
        }
    }
}
