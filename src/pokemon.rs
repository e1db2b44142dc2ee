use schema::{
    Ailment, BaseStats, Gender, Item, MoveData, MoveMeta, Nature, PokemonType, SpeciesData,
    StatType,
};
use serde::{Deserialize, Serialize};

pub const MAX_LEVEL: u8 = 100;
pub const MAX_MOVES: usize = 4;

/// A move slot on a live Pokemon: a copy of the move's data plus current PP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub move_id: u32,
    pub name: String,
    pub move_type: PokemonType,
    pub power: Option<u16>,
    pub accuracy: Option<u8>,
    pub pp: u8,
    pub max_pp: u8,
    pub priority: i8,
    pub meta: Option<MoveMeta>,
}

impl MoveInstance {
    /// Create a new move instance with max PP
    pub fn new(data: &MoveData) -> Self {
        MoveInstance {
            move_id: data.id,
            name: data.name.clone(),
            move_type: data.move_type,
            power: data.power,
            accuracy: data.accuracy,
            pp: data.pp,
            max_pp: data.pp,
            priority: data.priority,
            meta: data.meta.clone(),
        }
    }

    /// Use the move (decrease PP)
    pub fn use_move(&mut self) -> bool {
        if self.pp > 0 {
            self.pp -= 1;
            true
        } else {
            false
        }
    }

    /// Restore PP, returning how much was actually restored
    pub fn restore_pp(&mut self, amount: u8) -> u8 {
        let before = self.pp;
        self.pp = self.pp.saturating_add(amount).min(self.max_pp);
        self.pp - before
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonInst {
    pub id: String,
    pub species_id: u32,
    pub name: String,                    // Species name if no nickname
    pub level: u8,
    pub exp: u32,                        // Total accumulated experience
    pub base_stats: BaseStats,
    pub base_exp: u16,
    pub catch_rate: u8,
    pub ivs: [u8; 6],                    // HP, ATK, DEF, SP.ATK, SP.DEF, SPD
    pub evs: [u8; 6],                    // HP, ATK, DEF, SP.ATK, SP.DEF, SPD
    pub stats: [u16; 6],                 // HP, ATK, DEF, SP.ATK, SP.DEF, SPD; stats[0] is max HP
    current_hp: u16,
    pub types: Vec<PokemonType>,
    pub ability: String,
    pub nature: Nature,
    pub gender: Gender,
    pub shiny: bool,
    ailment: Ailment,
    pub moves: Vec<MoveInstance>,        // Up to 4 moves
    pub caught_ball: Option<Item>,
}

/// Everything about a new Pokemon that is rolled rather than looked up.
#[derive(Debug, Clone)]
pub struct PokemonTraits {
    pub id: String,
    pub level: u8,
    pub ivs: [u8; 6],
    pub nature: Nature,
    pub ability: String,
    pub gender: Gender,
    pub shiny: bool,
}

impl PokemonInst {
    /// Create a new Pokemon instance from species data. EVs start at zero
    /// and the Pokemon starts at full HP.
    pub fn new(species: &SpeciesData, traits: PokemonTraits, moves: Vec<MoveInstance>) -> Self {
        let level = traits.level.clamp(1, MAX_LEVEL);
        let evs = [0; 6];
        let stats = calculate_stats(&species.base_stats, level, &traits.ivs, &evs, traits.nature);

        PokemonInst {
            id: traits.id,
            species_id: species.id,
            name: species.name.clone(),
            level,
            exp: crate::progression::exp_for_level(level),
            base_stats: species.base_stats,
            base_exp: species.base_exp,
            catch_rate: species.catch_rate,
            ivs: traits.ivs,
            evs,
            stats,
            current_hp: stats[0],
            types: species.types.clone(),
            ability: traits.ability,
            nature: traits.nature,
            gender: traits.gender,
            shiny: traits.shiny,
            ailment: Ailment::Healthy,
            moves: moves.into_iter().take(MAX_MOVES).collect(),
            caught_ball: None,
        }
    }

    pub fn max_hp(&self) -> u16 {
        self.stats[0]
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    pub fn stat(&self, stat: StatType) -> u16 {
        self.stats[stat.index()]
    }

    pub fn ailment(&self) -> Ailment {
        self.ailment
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn hp_percent(&self) -> f32 {
        if self.max_hp() == 0 {
            return 0.0;
        }
        self.current_hp as f32 / self.max_hp() as f32 * 100.0
    }

    /// Apply damage, never dropping below zero. Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        let taken = amount.min(self.current_hp);
        self.current_hp -= taken;
        if self.current_hp == 0 {
            self.ailment = Ailment::Fainted;
        }
        taken
    }

    /// Restore HP up to the maximum. Fainted Pokemon cannot be healed, only revived.
    pub fn heal(&mut self, amount: u16) -> u16 {
        if self.is_fainted() {
            return 0;
        }
        let healed = amount.min(self.max_hp() - self.current_hp);
        self.current_hp += healed;
        healed
    }

    /// Bring a fainted Pokemon back with the given HP.
    pub fn revive(&mut self, hp: u16) -> bool {
        if !self.is_fainted() {
            return false;
        }
        self.current_hp = hp.clamp(1, self.max_hp());
        self.ailment = Ailment::Healthy;
        true
    }

    /// Set HP directly, keeping the fainted invariant.
    pub fn set_hp(&mut self, hp: u16) {
        self.current_hp = hp.min(self.max_hp());
        if self.current_hp == 0 {
            self.ailment = Ailment::Fainted;
        } else if self.ailment == Ailment::Fainted {
            self.ailment = Ailment::Healthy;
        }
    }

    /// Change the ailment. `Fainted` is only reachable through HP reaching zero,
    /// and a fainted Pokemon keeps its fainted status.
    pub fn set_ailment(&mut self, ailment: Ailment) -> bool {
        if self.is_fainted() || ailment == Ailment::Fainted {
            return false;
        }
        self.ailment = ailment;
        true
    }

    pub fn cure_ailment(&mut self) -> Option<Ailment> {
        match self.ailment {
            Ailment::Healthy | Ailment::Fainted => None,
            previous => {
                self.ailment = Ailment::Healthy;
                Some(previous)
            }
        }
    }

    pub fn move_by_id(&self, move_id: u32) -> Option<(usize, &MoveInstance)> {
        self.moves
            .iter()
            .enumerate()
            .find(|(_, m)| m.move_id == move_id)
    }

    /// Recompute stats after a level or EV change. Current HP moves by the
    /// same amount max HP did, and stays at zero for a fainted Pokemon.
    pub fn recalculate_stats(&mut self) {
        let old_max = self.max_hp();
        self.stats = calculate_stats(&self.base_stats, self.level, &self.ivs, &self.evs, self.nature);
        if !self.is_fainted() {
            let gained = self.max_hp().saturating_sub(old_max);
            self.current_hp = (self.current_hp + gained).min(self.max_hp());
        }
    }
}

/// Calculate stats from base stats, level, IVs, EVs and nature.
/// Uses the Gen 3+ stat formulas.
pub fn calculate_stats(
    base_stats: &BaseStats,
    level: u8,
    ivs: &[u8; 6],
    evs: &[u8; 6],
    nature: Nature,
) -> [u16; 6] {
    let base = base_stats.as_array();
    let level = level as u32;
    let mut stats = [0u16; 6];

    for (i, stat_type) in [
        StatType::Hp,
        StatType::Attack,
        StatType::Defense,
        StatType::SpecialAttack,
        StatType::SpecialDefense,
        StatType::Speed,
    ]
    .into_iter()
    .enumerate()
    {
        let core = 2 * base[i] as u32 + ivs[i] as u32 + evs[i] as u32 / 4;
        let stat = if stat_type == StatType::Hp {
            // HP = floor((2 * Base + IV + floor(EV / 4)) * Level / 100) + Level + 10
            core * level / 100 + level + 10
        } else {
            // Other = floor((floor((2 * Base + IV + floor(EV / 4)) * Level / 100) + 5) * Nature)
            let raw = core * level / 100 + 5;
            (raw as f32 * nature.modifier(stat_type)).floor() as u32
        };
        stats[i] = stat.min(u16::MAX as u32) as u16;
    }

    stats
}
