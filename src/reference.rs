//! Read-only species, move, biome and encounter tables.
//!
//! `ReferenceData` is built once at start-up (from RON text or from the
//! bundled prefab set) and handed to the resolvers by reference.

use crate::errors::{ReferenceDataError, ReferenceDataResult};
use log::info;
use schema::{Biome, BiomeData, EncounterCandidate, MoveData, SpeciesData, TypeChart};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// On-disk layout of a reference data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceDataFile {
    #[serde(default)]
    pub type_chart: Option<TypeChart>,
    pub species: Vec<SpeciesData>,
    pub moves: Vec<MoveData>,
    pub biomes: Vec<BiomeData>,
    pub encounters: Vec<EncounterCandidate>,
}

#[derive(Debug, Clone)]
pub struct ReferenceData {
    type_chart: TypeChart,
    species: HashMap<u32, SpeciesData>,
    moves: HashMap<u32, MoveData>,
    biomes: HashMap<Biome, BiomeData>,
    encounters: Vec<EncounterCandidate>,
}

impl ReferenceData {
    /// Build and cross-check the tables. Every encounter must point at a
    /// known species and every learnset entry at a known move.
    pub fn from_file_data(file: ReferenceDataFile) -> ReferenceDataResult<Self> {
        let moves: HashMap<u32, MoveData> = file.moves.into_iter().map(|m| (m.id, m)).collect();
        let species: HashMap<u32, SpeciesData> =
            file.species.into_iter().map(|s| (s.id, s)).collect();

        for data in species.values() {
            if data.types.is_empty() || data.types.len() > 2 {
                return Err(ReferenceDataError::MalformedData(format!(
                    "{} must have one or two types",
                    data.name
                )));
            }
            if let Some(missing) = data
                .learnset
                .iter()
                .find(|entry| !moves.contains_key(&entry.move_id))
            {
                return Err(ReferenceDataError::MalformedData(format!(
                    "{} learns unknown move {}",
                    data.name, missing.move_id
                )));
            }
        }

        if let Some(orphan) = file
            .encounters
            .iter()
            .find(|c| !species.contains_key(&c.species_id))
        {
            return Err(ReferenceDataError::SpeciesNotFound(orphan.species_id));
        }

        let biomes = file.biomes.into_iter().map(|b| (b.biome, b)).collect();

        Ok(Self {
            type_chart: file.type_chart.unwrap_or_default(),
            species,
            moves,
            biomes,
            encounters: file.encounters,
        })
    }

    pub fn from_ron_str(text: &str) -> ReferenceDataResult<Self> {
        let file: ReferenceDataFile = ron::from_str(text)
            .map_err(|e| ReferenceDataError::MalformedData(e.to_string()))?;
        Self::from_file_data(file)
    }

    pub fn load(path: &Path) -> ReferenceDataResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ReferenceDataError::MalformedData(format!("{}: {}", path.display(), e)))?;
        let data = Self::from_ron_str(&content)?;
        info!(
            "Loaded {} species, {} moves from {}",
            data.species.len(),
            data.moves.len(),
            path.display()
        );
        Ok(data)
    }

    /// The prefab data set shipped with the crate.
    pub fn builtin() -> Self {
        crate::prefab_data::builtin_reference_data()
    }

    pub fn type_chart(&self) -> &TypeChart {
        &self.type_chart
    }

    pub fn species(&self, id: u32) -> ReferenceDataResult<&SpeciesData> {
        self.species
            .get(&id)
            .ok_or(ReferenceDataError::SpeciesNotFound(id))
    }

    pub fn move_data(&self, id: u32) -> ReferenceDataResult<&MoveData> {
        self.moves.get(&id).ok_or(ReferenceDataError::MoveNotFound(id))
    }

    pub fn biome(&self, biome: Biome) -> ReferenceDataResult<&BiomeData> {
        self.biomes
            .get(&biome)
            .ok_or(ReferenceDataError::BiomeNotFound(biome))
    }

    pub fn encounters(&self) -> &[EncounterCandidate] {
        &self.encounters
    }
}
