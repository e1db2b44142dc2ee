use crate::battle::state::TurnRng;
use crate::config::EncounterConfig;
use crate::difficulty::{DifficultyRecommendation, RateBand};
use crate::errors::{BattleResult, EncounterError};
use crate::pokemon::{MoveInstance, PokemonInst, PokemonTraits, MAX_LEVEL, MAX_MOVES};
use crate::reference::ReferenceData;
use log::{debug, info};
use schema::{Biome, EncounterCandidate, Gender, Nature, SpeciesData};
use strum::IntoEnumIterator;

const MAX_IV: u32 = 31;
const GENDER_RATE_DIVISOR: f64 = 8.0;

/// Species that can spawn in `biome` at `depth`. Past the configured max
/// depth only the toxic pool spawns, whatever the biome.
pub fn candidate_pool<'a>(
    reference: &'a ReferenceData,
    config: &EncounterConfig,
    biome: Biome,
    depth: u32,
) -> BattleResult<Vec<&'a EncounterCandidate>> {
    let pool: Vec<&EncounterCandidate> = if depth > config.max_depth {
        reference
            .encounters()
            .iter()
            .filter(|c| config.toxic_species.contains(&c.species_id))
            .collect()
    } else {
        let allowed = &reference.biome(biome)?.allowed_types;
        reference
            .encounters()
            .iter()
            .filter(|c| c.shares_type_with(allowed) && c.min_depth <= depth)
            .collect()
    };

    if pool.is_empty() {
        return Err(EncounterError::NoCandidates { biome, depth }.into());
    }
    Ok(pool)
}

/// Narrow the pool to a recommended encounter-rate band. An empty result
/// falls back to the full pool.
pub fn apply_rate_band<'a>(
    pool: &[&'a EncounterCandidate],
    band: Option<RateBand>,
) -> Vec<&'a EncounterCandidate> {
    let Some(band) = band else {
        return pool.to_vec();
    };
    let filtered: Vec<&EncounterCandidate> = pool
        .iter()
        .copied()
        .filter(|c| band.contains(c.encounter_rate))
        .collect();
    if filtered.is_empty() {
        debug!("Rate band {:?} matched nothing, using the full pool", band);
        pool.to_vec()
    } else {
        filtered
    }
}

/// Bonus weight added to every candidate, growing linearly with play time
/// until the configured ceiling.
pub fn bonus_weight(config: &EncounterConfig, play_time_ms: u64) -> f32 {
    if config.bonus_ceiling_ms == 0 {
        return config.max_bonus_weight;
    }
    let progress = (play_time_ms as f64 / config.bonus_ceiling_ms as f64).min(1.0);
    config.max_bonus_weight * progress as f32
}

/// Weighted pick: draw over the boosted total and walk the list.
/// The first candidate is the fallback when float rounding leaves the draw unmatched.
pub fn select_weighted<'a>(
    pool: &[&'a EncounterCandidate],
    bonus: f32,
    rng: &mut TurnRng,
) -> Option<&'a EncounterCandidate> {
    let first = *pool.first()?;
    let weight = |c: &EncounterCandidate| (c.encounter_rate + bonus).max(0.0) as f64;
    let total: f64 = pool.iter().map(|c| weight(*c)).sum();

    let mut draw = rng.next_outcome("encounter species") * total;
    for &candidate in pool {
        let w = weight(candidate);
        if draw < w {
            return Some(candidate);
        }
        draw -= w;
    }
    Some(first)
}

/// Wild level for a depth, shifted by the difficulty offset, within 1..=100.
pub fn wild_level(config: &EncounterConfig, depth: u32, level_offset: i8) -> u8 {
    let level = config.base_level as i64
        + depth as i64 * config.level_per_depth as i64
        + level_offset as i64;
    level.clamp(1, MAX_LEVEL as i64) as u8
}

/// Build a fully-statted wild Pokemon of `species` at `level`.
pub fn instantiate(
    reference: &ReferenceData,
    config: &EncounterConfig,
    species: &SpeciesData,
    level: u8,
    rng: &mut TurnRng,
) -> BattleResult<PokemonInst> {
    let id = format!(
        "{}-{:08x}",
        species.id,
        rng.next_range_inclusive(0, u32::MAX - 1, "instance id")
    );

    let natures: Vec<Nature> = Nature::iter().collect();
    let nature = natures[rng.next_index(natures.len(), "nature")];

    let ability = if species.abilities.is_empty() {
        String::new()
    } else {
        species.abilities[rng.next_index(species.abilities.len(), "ability")].clone()
    };

    let mut ivs = [0u8; 6];
    for iv in ivs.iter_mut() {
        *iv = rng.next_range_inclusive(0, MAX_IV, "iv") as u8;
    }

    let moves = pick_moves(reference, species, level, rng)?;
    let gender = roll_gender(species.gender_rate, rng);
    let shiny = rng.next_outcome("shiny") < config.shiny_probability;

    Ok(PokemonInst::new(
        species,
        PokemonTraits {
            id,
            level,
            ivs,
            nature,
            ability,
            gender,
            shiny,
        },
        moves,
    ))
}

/// Up to four distinct moves, preferring ones a wild Pokemon of this level
/// could know (level-up at or below its level, machine, tutor). Falls back
/// to the whole learnset when nothing qualifies.
fn pick_moves(
    reference: &ReferenceData,
    species: &SpeciesData,
    level: u8,
    rng: &mut TurnRng,
) -> BattleResult<Vec<MoveInstance>> {
    let mut preferred: Vec<u32> = Vec::new();
    for entry in &species.learnset {
        let learnable = entry.method.is_wild_learnable()
            && (entry.method != schema::LearnMethod::LevelUp || entry.level <= level);
        if learnable && !preferred.contains(&entry.move_id) {
            preferred.push(entry.move_id);
        }
    }

    let mut remaining = if preferred.is_empty() {
        let mut all: Vec<u32> = Vec::new();
        for entry in &species.learnset {
            if !all.contains(&entry.move_id) {
                all.push(entry.move_id);
            }
        }
        all
    } else {
        preferred
    };

    let mut moves = Vec::new();
    while moves.len() < MAX_MOVES && !remaining.is_empty() {
        let move_id = remaining.swap_remove(rng.next_index(remaining.len(), "wild move"));
        moves.push(MoveInstance::new(reference.move_data(move_id)?));
    }
    Ok(moves)
}

/// Gender rate is in eighths female; -1 means genderless.
fn roll_gender(gender_rate: i8, rng: &mut TurnRng) -> Gender {
    if gender_rate < 0 {
        return Gender::Genderless;
    }
    if rng.next_outcome("gender") < gender_rate as f64 / GENDER_RATE_DIVISOR {
        Gender::Female
    } else {
        Gender::Male
    }
}

/// Generate the wild Pokemon for an encounter trigger.
pub fn generate(
    reference: &ReferenceData,
    config: &EncounterConfig,
    biome: Biome,
    depth: u32,
    recommendation: &DifficultyRecommendation,
    play_time_ms: u64,
    rng: &mut TurnRng,
) -> BattleResult<PokemonInst> {
    let pool = candidate_pool(reference, config, biome, depth)?;
    let pool = apply_rate_band(&pool, recommendation.band);
    let bonus = bonus_weight(config, play_time_ms);
    let candidate =
        select_weighted(&pool, bonus, rng).ok_or(EncounterError::NoCandidates { biome, depth })?;

    let species = reference.species(candidate.species_id)?;
    let level = wild_level(config, depth, recommendation.level_offset);
    let pokemon = instantiate(reference, config, species, level, rng)?;

    info!(
        "Wild {} (Lv. {}) appeared in {} at depth {}",
        pokemon.name, pokemon.level, biome, depth
    );
    Ok(pokemon)
}
