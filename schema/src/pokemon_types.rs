use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use strum::{EnumIter, EnumString, IntoEnumIterator};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum PokemonType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl PokemonType {
    /// Whether moves of this type use the physical stat pair
    /// (attack/defense) rather than the special pair.
    pub fn is_physical(self) -> bool {
        use PokemonType::*;
        matches!(
            self,
            Normal | Fighting | Flying | Poison | Ground | Rock | Bug | Ghost | Steel
        )
    }

    /// The canonical matchup chart.
    /// Returns: 2.0 = Super Effective, 1.0 = Normal, 0.5 = Not Very Effective, 0.0 = No Effect
    pub fn standard_matchup(attacking: PokemonType, defending: PokemonType) -> f32 {
        use PokemonType::*;

        match (attacking, defending) {
            // Normal
            (Normal, Rock) | (Normal, Steel) => 0.5,
            (Normal, Ghost) => 0.0,

            // Fire
            (Fire, Fire) | (Fire, Water) | (Fire, Rock) | (Fire, Dragon) => 0.5,
            (Fire, Grass) | (Fire, Ice) | (Fire, Bug) | (Fire, Steel) => 2.0,

            // Water
            (Water, Water) | (Water, Grass) | (Water, Dragon) => 0.5,
            (Water, Fire) | (Water, Ground) | (Water, Rock) => 2.0,

            // Electric
            (Electric, Electric) | (Electric, Grass) | (Electric, Dragon) => 0.5,
            (Electric, Ground) => 0.0,
            (Electric, Water) | (Electric, Flying) => 2.0,

            // Grass
            (Grass, Fire)
            | (Grass, Grass)
            | (Grass, Poison)
            | (Grass, Flying)
            | (Grass, Bug)
            | (Grass, Dragon)
            | (Grass, Steel) => 0.5,
            (Grass, Water) | (Grass, Ground) | (Grass, Rock) => 2.0,

            // Ice
            (Ice, Fire) | (Ice, Water) | (Ice, Ice) | (Ice, Steel) => 0.5,
            (Ice, Grass) | (Ice, Ground) | (Ice, Flying) | (Ice, Dragon) => 2.0,

            // Fighting
            (Fighting, Poison)
            | (Fighting, Flying)
            | (Fighting, Psychic)
            | (Fighting, Bug)
            | (Fighting, Fairy) => 0.5,
            (Fighting, Ghost) => 0.0,
            (Fighting, Normal)
            | (Fighting, Ice)
            | (Fighting, Rock)
            | (Fighting, Dark)
            | (Fighting, Steel) => 2.0,

            // Poison
            (Poison, Poison) | (Poison, Ground) | (Poison, Rock) | (Poison, Ghost) => 0.5,
            (Poison, Steel) => 0.0,
            (Poison, Grass) | (Poison, Fairy) => 2.0,

            // Ground
            (Ground, Grass) | (Ground, Bug) => 0.5,
            (Ground, Flying) => 0.0,
            (Ground, Fire)
            | (Ground, Electric)
            | (Ground, Poison)
            | (Ground, Rock)
            | (Ground, Steel) => 2.0,

            // Flying
            (Flying, Electric) | (Flying, Rock) | (Flying, Steel) => 0.5,
            (Flying, Grass) | (Flying, Fighting) | (Flying, Bug) => 2.0,

            // Psychic
            (Psychic, Psychic) | (Psychic, Steel) => 0.5,
            (Psychic, Dark) => 0.0,
            (Psychic, Fighting) | (Psychic, Poison) => 2.0,

            // Bug
            (Bug, Fire)
            | (Bug, Fighting)
            | (Bug, Poison)
            | (Bug, Flying)
            | (Bug, Ghost)
            | (Bug, Steel)
            | (Bug, Fairy) => 0.5,
            (Bug, Grass) | (Bug, Psychic) | (Bug, Dark) => 2.0,

            // Rock
            (Rock, Fighting) | (Rock, Ground) | (Rock, Steel) => 0.5,
            (Rock, Fire) | (Rock, Ice) | (Rock, Flying) | (Rock, Bug) => 2.0,

            // Ghost
            (Ghost, Normal) => 0.0,
            (Ghost, Dark) => 0.5,
            (Ghost, Psychic) | (Ghost, Ghost) => 2.0,

            // Dragon
            (Dragon, Steel) => 0.5,
            (Dragon, Fairy) => 0.0,
            (Dragon, Dragon) => 2.0,

            // Dark
            (Dark, Fighting) | (Dark, Dark) | (Dark, Fairy) => 0.5,
            (Dark, Psychic) | (Dark, Ghost) => 2.0,

            // Steel
            (Steel, Fire) | (Steel, Water) | (Steel, Electric) | (Steel, Steel) => 0.5,
            (Steel, Ice) | (Steel, Rock) | (Steel, Fairy) => 2.0,

            // Fairy
            (Fairy, Fire) | (Fairy, Poison) | (Fairy, Steel) => 0.5,
            (Fairy, Fighting) | (Fairy, Dragon) | (Fairy, Dark) => 2.0,

            _ => 1.0,
        }
    }
}

/// One non-neutral cell of a type chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypeMatchup {
    pub attacking: PokemonType,
    pub defending: PokemonType,
    pub multiplier: f32,
}

/// Attack-type x defense-type multiplier table.
///
/// Only non-neutral pairs are stored; any pair missing from the table is
/// treated as 1.0. Built once and passed around by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TypeMatchup>", into = "Vec<TypeMatchup>")]
pub struct TypeChart {
    cells: HashMap<(PokemonType, PokemonType), f32>,
}

impl TypeChart {
    /// The standard 18x18 chart.
    pub fn standard() -> Self {
        let mut matchups = Vec::new();
        for attacking in PokemonType::iter() {
            for defending in PokemonType::iter() {
                let multiplier = PokemonType::standard_matchup(attacking, defending);
                if multiplier != 1.0 {
                    matchups.push(TypeMatchup {
                        attacking,
                        defending,
                        multiplier,
                    });
                }
            }
        }
        Self::from(matchups)
    }

    /// Multiplier of a single attacking type against a single defending type.
    pub fn matchup(&self, attacking: PokemonType, defending: PokemonType) -> f32 {
        self.cells
            .get(&(attacking, defending))
            .copied()
            .unwrap_or(1.0)
    }

    /// Product of the per-type multipliers against every defending type.
    pub fn effectiveness(&self, attacking: PokemonType, defending: &[PokemonType]) -> f32 {
        defending
            .iter()
            .map(|&defending_type| self.matchup(attacking, defending_type))
            .product()
    }

    pub fn is_immune(&self, attacking: PokemonType, defending: &[PokemonType]) -> bool {
        self.effectiveness(attacking, defending) == 0.0
    }
}

impl Default for TypeChart {
    fn default() -> Self {
        Self::standard()
    }
}

impl From<Vec<TypeMatchup>> for TypeChart {
    fn from(matchups: Vec<TypeMatchup>) -> Self {
        let cells = matchups
            .into_iter()
            .map(|m| ((m.attacking, m.defending), m.multiplier))
            .collect();
        Self { cells }
    }
}

impl From<TypeChart> for Vec<TypeMatchup> {
    fn from(chart: TypeChart) -> Self {
        let mut matchups: Vec<TypeMatchup> = chart
            .cells
            .into_iter()
            .map(|((attacking, defending), multiplier)| TypeMatchup {
                attacking,
                defending,
                multiplier,
            })
            .collect();
        // HashMap order is unstable; keep serialized output reproducible.
        matchups.sort_by_key(|m| (m.attacking as u8, m.defending as u8));
        matchups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unlisted_pairs_are_neutral() {
        let chart = TypeChart::from(vec![]);
        assert_eq!(chart.matchup(PokemonType::Fire, PokemonType::Grass), 1.0);
    }

    #[test]
    fn test_dual_types_multiply() {
        let chart = TypeChart::standard();
        // Fire vs Grass/Water: 2.0 * 0.5
        assert_eq!(
            chart.effectiveness(PokemonType::Fire, &[PokemonType::Grass, PokemonType::Water]),
            1.0
        );
        // Electric vs Water/Flying: 2.0 * 2.0
        assert_eq!(
            chart.effectiveness(
                PokemonType::Electric,
                &[PokemonType::Water, PokemonType::Flying]
            ),
            4.0
        );
    }

    #[test]
    fn test_effectiveness_is_multiplicative_for_every_pair() {
        let chart = TypeChart::standard();
        for attacking in PokemonType::iter() {
            for a in PokemonType::iter() {
                for b in PokemonType::iter() {
                    let combined = chart.effectiveness(attacking, &[a, b]);
                    let separate =
                        chart.effectiveness(attacking, &[a]) * chart.effectiveness(attacking, &[b]);
                    assert_eq!(combined, separate, "{attacking} vs {a}/{b}");
                }
            }
        }
    }

    #[test]
    fn test_chart_values_are_restricted() {
        let chart = TypeChart::standard();
        for attacking in PokemonType::iter() {
            for defending in PokemonType::iter() {
                let value = chart.matchup(attacking, defending);
                assert!([0.0, 0.5, 1.0, 2.0].contains(&value));
            }
        }
    }

    #[test]
    fn test_immunities() {
        let chart = TypeChart::standard();
        assert!(chart.is_immune(PokemonType::Normal, &[PokemonType::Ghost]));
        assert!(chart.is_immune(PokemonType::Ground, &[PokemonType::Flying, PokemonType::Fire]));
        assert!(!chart.is_immune(PokemonType::Water, &[PokemonType::Fire]));
    }

    #[test]
    fn test_physical_types() {
        assert!(PokemonType::Normal.is_physical());
        assert!(PokemonType::Steel.is_physical());
        assert!(!PokemonType::Fire.is_physical());
        assert!(!PokemonType::Dark.is_physical());
    }

    #[test]
    fn test_parse_type_name() {
        use std::str::FromStr;
        assert_eq!(PokemonType::from_str("fire"), Ok(PokemonType::Fire));
        assert_eq!(PokemonType::from_str("GHOST"), Ok(PokemonType::Ghost));
    }
}
