use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, EnumString};

/// Persistent status condition of a creature.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Ailment {
    #[default]
    Healthy,
    Poison,
    Burn,
    Paralysis,
    Sleep,
    Freeze,
    Fainted,
}

impl Ailment {
    pub fn is_healthy(self) -> bool {
        matches!(self, Ailment::Healthy)
    }
}

impl fmt::Display for Ailment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ailment::Healthy => "healthy",
            Ailment::Poison => "poison",
            Ailment::Burn => "burn",
            Ailment::Paralysis => "paralysis",
            Ailment::Sleep => "sleep",
            Ailment::Freeze => "freeze",
            Ailment::Fainted => "fainted",
        };
        write!(f, "{}", name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum StatType {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl StatType {
    /// Position of the stat in `[u16; 6]`-style stat arrays.
    pub fn index(self) -> usize {
        match self {
            StatType::Hp => 0,
            StatType::Attack => 1,
            StatType::Defense => 2,
            StatType::SpecialAttack => 3,
            StatType::SpecialDefense => 4,
            StatType::Speed => 5,
        }
    }
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatType::Hp => "HP",
            StatType::Attack => "Attack",
            StatType::Defense => "Defense",
            StatType::SpecialAttack => "Special Attack",
            StatType::SpecialDefense => "Special Defense",
            StatType::Speed => "Speed",
        };
        write!(f, "{}", name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Nature {
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

impl Nature {
    /// Multiplier this nature applies to a non-HP stat (0.9, 1.0 or 1.1).
    pub fn modifier(self, stat: StatType) -> f32 {
        use StatType::*;
        match self {
            Nature::Hardy | Nature::Docile | Nature::Serious | Nature::Bashful | Nature::Quirky => {
                1.0
            }
            Nature::Lonely => bonus(stat, Attack, Defense),
            Nature::Brave => bonus(stat, Attack, Speed),
            Nature::Adamant => bonus(stat, Attack, SpecialAttack),
            Nature::Naughty => bonus(stat, Attack, SpecialDefense),
            Nature::Bold => bonus(stat, Defense, Attack),
            Nature::Relaxed => bonus(stat, Defense, Speed),
            Nature::Impish => bonus(stat, Defense, SpecialAttack),
            Nature::Lax => bonus(stat, Defense, SpecialDefense),
            Nature::Timid => bonus(stat, Speed, Attack),
            Nature::Hasty => bonus(stat, Speed, Defense),
            Nature::Jolly => bonus(stat, Speed, SpecialAttack),
            Nature::Naive => bonus(stat, Speed, SpecialDefense),
            Nature::Modest => bonus(stat, SpecialAttack, Attack),
            Nature::Mild => bonus(stat, SpecialAttack, Defense),
            Nature::Quiet => bonus(stat, SpecialAttack, Speed),
            Nature::Rash => bonus(stat, SpecialAttack, SpecialDefense),
            Nature::Calm => bonus(stat, SpecialDefense, Attack),
            Nature::Gentle => bonus(stat, SpecialDefense, Defense),
            Nature::Sassy => bonus(stat, SpecialDefense, Speed),
            Nature::Careful => bonus(stat, SpecialDefense, SpecialAttack),
        }
    }
}

fn bonus(stat: StatType, boosted: StatType, lowered: StatType) -> f32 {
    if stat == boosted {
        1.1
    } else if stat == lowered {
        0.9
    } else {
        1.0
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Genderless,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Item {
    // Balls
    PokeBall,
    GreatBall,
    UltraBall,
    MasterBall,
    // Healing
    Potion,
    SuperPotion,
    HyperPotion,
    MaxPotion,
    Revive,
    MaxRevive,
    // Status cures
    Antidote,
    BurnHeal,
    IceHeal,
    Awakening,
    ParalyzeHeal,
    FullHeal,
    // PP
    Ether,
    MaxEther,
}

impl Item {
    /// Capture modifier for balls, `None` for every other item.
    pub fn ball_modifier(self) -> Option<f32> {
        match self {
            Item::PokeBall => Some(1.0),
            Item::GreatBall => Some(1.5),
            Item::UltraBall => Some(2.0),
            Item::MasterBall => Some(255.0),
            _ => None,
        }
    }

    pub fn is_ball(self) -> bool {
        self.ball_modifier().is_some()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Item::PokeBall => "Poké Ball",
            Item::GreatBall => "Great Ball",
            Item::UltraBall => "Ultra Ball",
            Item::MasterBall => "Master Ball",
            Item::Potion => "Potion",
            Item::SuperPotion => "Super Potion",
            Item::HyperPotion => "Hyper Potion",
            Item::MaxPotion => "Max Potion",
            Item::Revive => "Revive",
            Item::MaxRevive => "Max Revive",
            Item::Antidote => "Antidote",
            Item::BurnHeal => "Burn Heal",
            Item::IceHeal => "Ice Heal",
            Item::Awakening => "Awakening",
            Item::ParalyzeHeal => "Paralyze Heal",
            Item::FullHeal => "Full Heal",
            Item::Ether => "Ether",
            Item::MaxEther => "Max Ether",
        };
        write!(f, "{}", name)
    }
}

/// Where an encounter happens; each biome admits a set of types.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Biome {
    Grassland,
    Forest,
    Cave,
    Ocean,
    Mountain,
    Desert,
    Volcano,
    City,
    Swamp,
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_there_are_25_natures() {
        assert_eq!(Nature::iter().count(), 25);
    }

    #[test]
    fn test_nature_modifiers() {
        assert_eq!(Nature::Adamant.modifier(StatType::Attack), 1.1);
        assert_eq!(Nature::Adamant.modifier(StatType::SpecialAttack), 0.9);
        assert_eq!(Nature::Adamant.modifier(StatType::Speed), 1.0);
        assert_eq!(Nature::Hardy.modifier(StatType::Attack), 1.0);
    }

    #[test]
    fn test_every_nature_is_balanced() {
        for nature in Nature::iter() {
            let product: f32 = StatType::iter()
                .filter(|s| *s != StatType::Hp)
                .map(|s| nature.modifier(s))
                .product();
            assert!((product - 1.0).abs() < 0.02, "{:?}", nature);
        }
    }

    #[test]
    fn test_ball_modifiers() {
        assert_eq!(Item::PokeBall.ball_modifier(), Some(1.0));
        assert_eq!(Item::UltraBall.ball_modifier(), Some(2.0));
        assert_eq!(Item::Potion.ball_modifier(), None);
        assert!(!Item::FullHeal.is_ball());
    }
}
