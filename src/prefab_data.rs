//! Bundled reference data: a small starter set of species, moves and biomes
//! so the engine can run without an external data file.

use crate::reference::{ReferenceData, ReferenceDataFile};
use schema::{
    BaseStats, Biome, BiomeData, EncounterCandidate, LearnMethod, LearnableMove, MoveData,
    MoveMeta, MoveTarget, PokemonType, SpeciesData, StatChange, StatType,
};
use std::collections::HashMap;

use LearnMethod::*;
use PokemonType::*;

// Move ids
pub const KARATE_CHOP: u32 = 2;
pub const SCRATCH: u32 = 10;
pub const SWORDS_DANCE: u32 = 14;
pub const GUST: u32 = 16;
pub const VINE_WHIP: u32 = 22;
pub const TACKLE: u32 = 33;
pub const TAIL_WHIP: u32 = 39;
pub const POISON_STING: u32 = 40;
pub const BITE: u32 = 44;
pub const GROWL: u32 = 45;
pub const SUPERSONIC: u32 = 48;
pub const EMBER: u32 = 52;
pub const WATER_GUN: u32 = 55;
pub const ICE_BEAM: u32 = 58;
pub const POISON_POWDER: u32 = 77;
pub const SLEEP_POWDER: u32 = 79;
pub const THUNDER_SHOCK: u32 = 84;
pub const THUNDER_WAVE: u32 = 86;
pub const ROCK_THROW: u32 = 88;
pub const CONFUSION: u32 = 93;
pub const QUICK_ATTACK: u32 = 98;
pub const SMOG: u32 = 123;
pub const SLUDGE: u32 = 124;
pub const SWIFT: u32 = 129;

// Species ids
pub const BULBASAUR: u32 = 1;
pub const CHARMANDER: u32 = 4;
pub const SQUIRTLE: u32 = 7;
pub const PIDGEY: u32 = 16;
pub const RATTATA: u32 = 19;
pub const PIKACHU: u32 = 25;
pub const SANDSHREW: u32 = 27;
pub const CLEFAIRY: u32 = 35;
pub const VULPIX: u32 = 37;
pub const ZUBAT: u32 = 41;
pub const ODDISH: u32 = 43;
pub const ABRA: u32 = 63;
pub const MACHOP: u32 = 66;
pub const GEODUDE: u32 = 74;
pub const GRIMER: u32 = 88;
pub const KOFFING: u32 = 109;
pub const MAGIKARP: u32 = 129;
pub const DRATINI: u32 = 147;

fn damaging(id: u32, name: &str, move_type: PokemonType, power: u16, accuracy: Option<u8>, pp: u8) -> MoveData {
    MoveData {
        id,
        name: name.to_string(),
        move_type,
        power: Some(power),
        accuracy,
        pp,
        priority: 0,
        meta: None,
    }
}

fn status(id: u32, name: &str, move_type: PokemonType, accuracy: Option<u8>, pp: u8, meta: MoveMeta) -> MoveData {
    MoveData {
        id,
        name: name.to_string(),
        move_type,
        power: None,
        accuracy,
        pp,
        priority: 0,
        meta: Some(meta),
    }
}

fn ailment(name: &str, chance: u8) -> MoveMeta {
    MoveMeta {
        ailment: name.to_string(),
        ailment_chance: chance,
        ..MoveMeta::default()
    }
}

fn stat_meta(stat: StatType, change: i8, target: MoveTarget) -> MoveMeta {
    MoveMeta {
        ailment: "none".to_string(),
        stat_changes: vec![StatChange { stat, change }],
        target,
        ..MoveMeta::default()
    }
}

fn builtin_moves() -> Vec<MoveData> {
    let with_meta = |mut data: MoveData, meta: MoveMeta| {
        data.meta = Some(meta);
        data
    };

    let mut quick_attack = damaging(QUICK_ATTACK, "Quick Attack", Normal, 40, Some(100), 30);
    quick_attack.priority = 1;

    vec![
        with_meta(
            damaging(KARATE_CHOP, "Karate Chop", Fighting, 50, Some(100), 25),
            MoveMeta {
                ailment: "none".to_string(),
                crit_rate: 1,
                ..MoveMeta::default()
            },
        ),
        damaging(SCRATCH, "Scratch", Normal, 40, Some(100), 35),
        status(SWORDS_DANCE, "Swords Dance", Normal, None, 20, stat_meta(StatType::Attack, 2, MoveTarget::User)),
        damaging(GUST, "Gust", Flying, 40, Some(100), 35),
        damaging(VINE_WHIP, "Vine Whip", Grass, 45, Some(100), 25),
        damaging(TACKLE, "Tackle", Normal, 40, Some(100), 35),
        status(TAIL_WHIP, "Tail Whip", Normal, Some(100), 30, stat_meta(StatType::Defense, -1, MoveTarget::AllOpponents)),
        with_meta(damaging(POISON_STING, "Poison Sting", Poison, 15, Some(100), 35), ailment("poison", 30)),
        with_meta(
            damaging(BITE, "Bite", Dark, 60, Some(100), 25),
            MoveMeta {
                ailment: "none".to_string(),
                flinch_chance: 30,
                ..MoveMeta::default()
            },
        ),
        status(GROWL, "Growl", Normal, Some(100), 40, stat_meta(StatType::Attack, -1, MoveTarget::AllOpponents)),
        status(SUPERSONIC, "Supersonic", Normal, Some(55), 20, ailment("confusion", 0)),
        with_meta(damaging(EMBER, "Ember", Fire, 40, Some(100), 25), ailment("burn", 10)),
        damaging(WATER_GUN, "Water Gun", Water, 40, Some(100), 25),
        with_meta(damaging(ICE_BEAM, "Ice Beam", Ice, 90, Some(100), 10), ailment("freeze", 10)),
        status(POISON_POWDER, "Poison Powder", Poison, Some(75), 35, ailment("poison", 0)),
        status(SLEEP_POWDER, "Sleep Powder", Grass, Some(75), 15, ailment("sleep", 0)),
        with_meta(damaging(THUNDER_SHOCK, "Thunder Shock", Electric, 40, Some(100), 30), ailment("paralysis", 10)),
        status(THUNDER_WAVE, "Thunder Wave", Electric, Some(90), 20, ailment("paralysis", 0)),
        damaging(ROCK_THROW, "Rock Throw", Rock, 50, Some(90), 15),
        with_meta(damaging(CONFUSION, "Confusion", Psychic, 50, Some(100), 25), ailment("confusion", 10)),
        quick_attack,
        with_meta(damaging(SMOG, "Smog", Poison, 30, Some(70), 20), ailment("poison", 40)),
        with_meta(damaging(SLUDGE, "Sludge", Poison, 65, Some(100), 20), ailment("poison", 30)),
        damaging(SWIFT, "Swift", Normal, 60, None, 20),
    ]
}

struct Prefab {
    species: SpeciesData,
    min_depth: u32,
    encounter_rate: f32,
}

#[allow(clippy::too_many_arguments)]
fn prefab(
    id: u32,
    name: &str,
    japanese: &str,
    types: Vec<PokemonType>,
    stats: [u8; 6],
    catch_rate: u8,
    base_exp: u16,
    gender_rate: i8,
    abilities: &[&str],
    learnset: Vec<LearnableMove>,
    min_depth: u32,
    encounter_rate: f32,
) -> Prefab {
    let names = HashMap::from([
        ("en".to_string(), name.to_string()),
        ("ja".to_string(), japanese.to_string()),
    ]);
    Prefab {
        species: SpeciesData {
            id,
            name: name.to_string(),
            names,
            types,
            base_stats: BaseStats {
                hp: stats[0],
                attack: stats[1],
                defense: stats[2],
                sp_attack: stats[3],
                sp_defense: stats[4],
                speed: stats[5],
            },
            catch_rate,
            base_exp,
            gender_rate,
            abilities: abilities.iter().map(|a| a.to_string()).collect(),
            learnset,
        },
        min_depth,
        encounter_rate,
    }
}

fn learn(move_id: u32, method: LearnMethod, level: u8) -> LearnableMove {
    LearnableMove {
        move_id,
        method,
        level,
    }
}

fn builtin_species() -> Vec<Prefab> {
    vec![
        prefab(BULBASAUR, "Bulbasaur", "フシギダネ", vec![Grass, Poison], [45, 49, 49, 65, 65, 45], 45, 64, 1,
            &["overgrow", "chlorophyll"],
            vec![learn(TACKLE, LevelUp, 1), learn(GROWL, LevelUp, 1), learn(VINE_WHIP, LevelUp, 3),
                 learn(POISON_POWDER, LevelUp, 12), learn(SLEEP_POWDER, LevelUp, 12), learn(SWORDS_DANCE, Machine, 0)],
            5, 10.0),
        prefab(CHARMANDER, "Charmander", "ヒトカゲ", vec![Fire], [39, 52, 43, 60, 50, 65], 45, 62, 1,
            &["blaze", "solar-power"],
            vec![learn(SCRATCH, LevelUp, 1), learn(GROWL, LevelUp, 1), learn(EMBER, LevelUp, 4),
                 learn(SWORDS_DANCE, Machine, 0), learn(BITE, Egg, 0)],
            5, 10.0),
        prefab(SQUIRTLE, "Squirtle", "ゼニガメ", vec![Water], [44, 48, 65, 50, 64, 43], 45, 63, 1,
            &["torrent", "rain-dish"],
            vec![learn(TACKLE, LevelUp, 1), learn(TAIL_WHIP, LevelUp, 1), learn(WATER_GUN, LevelUp, 3),
                 learn(BITE, LevelUp, 12), learn(ICE_BEAM, Machine, 0)],
            5, 10.0),
        prefab(PIDGEY, "Pidgey", "ポッポ", vec![Normal, Flying], [40, 45, 40, 35, 35, 56], 255, 50, 4,
            &["keen-eye", "tangled-feet"],
            vec![learn(TACKLE, LevelUp, 1), learn(GUST, LevelUp, 9), learn(QUICK_ATTACK, LevelUp, 13),
                 learn(SWIFT, Machine, 0)],
            0, 90.0),
        prefab(RATTATA, "Rattata", "コラッタ", vec![Normal], [30, 56, 35, 25, 35, 72], 255, 51, 4,
            &["run-away", "guts"],
            vec![learn(TACKLE, LevelUp, 1), learn(TAIL_WHIP, LevelUp, 1), learn(QUICK_ATTACK, LevelUp, 4),
                 learn(BITE, LevelUp, 10), learn(SWIFT, Machine, 0)],
            0, 90.0),
        prefab(PIKACHU, "Pikachu", "ピカチュウ", vec![Electric], [35, 55, 40, 50, 50, 90], 190, 112, 4,
            &["static"],
            vec![learn(THUNDER_SHOCK, LevelUp, 1), learn(GROWL, LevelUp, 1), learn(TAIL_WHIP, LevelUp, 3),
                 learn(THUNDER_WAVE, LevelUp, 4), learn(QUICK_ATTACK, LevelUp, 6), learn(SWIFT, Machine, 0)],
            2, 40.0),
        prefab(SANDSHREW, "Sandshrew", "サンド", vec![Ground], [50, 75, 85, 20, 30, 40], 255, 60, 4,
            &["sand-veil"],
            vec![learn(SCRATCH, LevelUp, 1), learn(TAIL_WHIP, LevelUp, 1), learn(POISON_STING, LevelUp, 6),
                 learn(SWIFT, Machine, 0), learn(SWORDS_DANCE, Machine, 0)],
            1, 60.0),
        prefab(CLEFAIRY, "Clefairy", "ピッピ", vec![Fairy], [70, 45, 48, 60, 65, 35], 150, 113, 6,
            &["cute-charm", "magic-guard"],
            vec![learn(GROWL, LevelUp, 1), learn(SCRATCH, LevelUp, 1), learn(SWIFT, Tutor, 0),
                 learn(THUNDER_WAVE, Machine, 0)],
            6, 20.0),
        prefab(VULPIX, "Vulpix", "ロコン", vec![Fire], [38, 41, 40, 50, 65, 65], 190, 60, 6,
            &["flash-fire"],
            vec![learn(EMBER, LevelUp, 1), learn(TAIL_WHIP, LevelUp, 1), learn(QUICK_ATTACK, LevelUp, 9),
                 learn(CONFUSION, Tutor, 0)],
            3, 35.0),
        prefab(ZUBAT, "Zubat", "ズバット", vec![Poison, Flying], [40, 45, 35, 30, 40, 55], 255, 49, 4,
            &["inner-focus"],
            vec![learn(SUPERSONIC, LevelUp, 1), learn(POISON_STING, LevelUp, 5), learn(BITE, LevelUp, 11),
                 learn(SWIFT, Machine, 0)],
            0, 80.0),
        prefab(ODDISH, "Oddish", "ナゾノクサ", vec![Grass, Poison], [45, 50, 55, 75, 65, 30], 255, 64, 4,
            &["chlorophyll"],
            vec![learn(VINE_WHIP, LevelUp, 1), learn(POISON_POWDER, LevelUp, 14), learn(SLEEP_POWDER, LevelUp, 18),
                 learn(SWORDS_DANCE, Machine, 0)],
            0, 70.0),
        prefab(ABRA, "Abra", "ケーシィ", vec![Psychic], [25, 20, 15, 105, 55, 90], 200, 62, 2,
            &["synchronize", "inner-focus"],
            vec![learn(CONFUSION, Tutor, 0), learn(THUNDER_WAVE, Machine, 0), learn(SWIFT, Machine, 0)],
            3, 30.0),
        prefab(MACHOP, "Machop", "ワンリキー", vec![Fighting], [70, 80, 50, 35, 35, 35], 180, 61, 2,
            &["guts", "no-guard"],
            vec![learn(KARATE_CHOP, LevelUp, 1), learn(GROWL, LevelUp, 1), learn(ROCK_THROW, Machine, 0),
                 learn(SWORDS_DANCE, Machine, 0)],
            3, 50.0),
        prefab(GEODUDE, "Geodude", "イシツブテ", vec![Rock, Ground], [40, 80, 100, 30, 30, 20], 255, 60, 4,
            &["rock-head", "sturdy"],
            vec![learn(TACKLE, LevelUp, 1), learn(ROCK_THROW, LevelUp, 6), learn(SWORDS_DANCE, Machine, 0)],
            1, 70.0),
        prefab(GRIMER, "Grimer", "ベトベター", vec![Poison], [80, 80, 50, 40, 50, 25], 190, 65, 4,
            &["stench", "sticky-hold"],
            vec![learn(POISON_STING, LevelUp, 1), learn(SMOG, LevelUp, 4), learn(SLUDGE, LevelUp, 12)],
            4, 40.0),
        prefab(KOFFING, "Koffing", "ドガース", vec![Poison], [40, 65, 95, 60, 45, 35], 190, 68, 4,
            &["levitate"],
            vec![learn(TACKLE, LevelUp, 1), learn(SMOG, LevelUp, 1), learn(SLUDGE, LevelUp, 12)],
            4, 40.0),
        prefab(MAGIKARP, "Magikarp", "コイキング", vec![Water], [20, 10, 55, 15, 20, 80], 255, 40, 4,
            &["swift-swim"],
            vec![learn(TACKLE, LevelUp, 15)],
            0, 100.0),
        prefab(DRATINI, "Dratini", "ミニリュウ", vec![Dragon], [41, 64, 45, 50, 50, 50], 45, 60, 4,
            &["shed-skin"],
            vec![learn(THUNDER_WAVE, LevelUp, 1), learn(TACKLE, LevelUp, 1), learn(ICE_BEAM, Machine, 0),
                 learn(SWIFT, Tutor, 0)],
            12, 5.0),
    ]
}

fn builtin_biomes() -> Vec<BiomeData> {
    vec![
        BiomeData { biome: Biome::Grassland, allowed_types: vec![Normal, Grass, Bug, Flying, Electric, Fairy] },
        BiomeData { biome: Biome::Forest, allowed_types: vec![Grass, Bug, Poison, Normal, Flying] },
        BiomeData { biome: Biome::Cave, allowed_types: vec![Rock, Ground, Poison, Dark, Ghost, Fighting, Dragon] },
        BiomeData { biome: Biome::Ocean, allowed_types: vec![Water, Ice] },
        BiomeData { biome: Biome::Mountain, allowed_types: vec![Rock, Ground, Fighting, Ice, Flying, Dragon] },
        BiomeData { biome: Biome::Desert, allowed_types: vec![Ground, Rock, Fire] },
        BiomeData { biome: Biome::Volcano, allowed_types: vec![Fire, Rock, Ground] },
        BiomeData { biome: Biome::City, allowed_types: vec![Normal, Electric, Poison, Psychic, Steel, Fighting] },
        BiomeData { biome: Biome::Swamp, allowed_types: vec![Poison, Water, Grass, Bug] },
    ]
}

pub fn builtin_reference_data() -> ReferenceData {
    let prefabs = builtin_species();
    let encounters = prefabs
        .iter()
        .map(|p| EncounterCandidate {
            species_id: p.species.id,
            names: p.species.names.clone(),
            types: p.species.types.clone(),
            catch_rate: p.species.catch_rate,
            min_depth: p.min_depth,
            encounter_rate: p.encounter_rate,
        })
        .collect();

    let file = ReferenceDataFile {
        type_chart: None,
        species: prefabs.into_iter().map(|p| p.species).collect(),
        moves: builtin_moves(),
        biomes: builtin_biomes(),
        encounters,
    };

    match ReferenceData::from_file_data(file) {
        Ok(data) => data,
        Err(err) => panic!("Bundled reference data is inconsistent: {}", err),
    }
}
