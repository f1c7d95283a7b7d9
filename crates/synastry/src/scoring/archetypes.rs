use crate::aspects::Aspect;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Romantic,
    Crush,
    Friend,
    Business,
    Family,
}

impl RelationshipKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipKind::Romantic => "romantic",
            RelationshipKind::Crush => "crush",
            RelationshipKind::Friend => "friend",
            RelationshipKind::Business => "business",
            RelationshipKind::Family => "family",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "romantic" => Ok(RelationshipKind::Romantic),
            "crush" => Ok(RelationshipKind::Crush),
            "friend" => Ok(RelationshipKind::Friend),
            "business" => Ok(RelationshipKind::Business),
            "family" => Ok(RelationshipKind::Family),
            other => Err(format!("Unknown relationship type: {other}")),
        }
    }
}

/// Pair list and calibration multiplier for one relationship archetype.
#[derive(Debug, Clone)]
pub struct Archetype {
    pub key: RelationshipKind,
    pub multiplier: f64,
    pub pairs: Vec<(&'static str, &'static str)>,
}

impl Archetype {
    pub fn matches(&self, aspect: &Aspect) -> bool {
        self.pairs.iter().any(|(a, b)| aspect.connects(a, b))
    }
}

lazy_static::lazy_static! {
    /// Archetype templates in tie-break order. Multipliers are calibration
    /// constants and are not derived from anything else.
    pub static ref ARCHETYPES: Vec<Archetype> = vec![
        Archetype {
            key: RelationshipKind::Romantic,
            multiplier: 1.15,
            pairs: vec![
                ("Venus", "Mars"),
                ("Sun", "Venus"),
                ("Moon", "Venus"),
                ("Sun", "Moon"),
                ("Venus", "Pluto"),
            ],
        },
        Archetype {
            key: RelationshipKind::Crush,
            multiplier: 1.0,
            pairs: vec![
                ("Venus", "Mars"),
                ("Mars", "Pluto"),
                ("Venus", "Uranus"),
                ("Sun", "Mars"),
                ("Moon", "Mars"),
            ],
        },
        Archetype {
            key: RelationshipKind::Friend,
            multiplier: 1.0,
            pairs: vec![
                ("Mercury", "Mercury"),
                ("Sun", "Jupiter"),
                ("Moon", "Jupiter"),
                ("Mercury", "Jupiter"),
                ("Venus", "Jupiter"),
                ("Sun", "Mercury"),
            ],
        },
        Archetype {
            key: RelationshipKind::Business,
            multiplier: 0.95,
            pairs: vec![
                ("Sun", "Saturn"),
                ("Jupiter", "Saturn"),
                ("Mercury", "Saturn"),
                ("Mars", "Jupiter"),
                ("Sun", "Jupiter"),
            ],
        },
        Archetype {
            key: RelationshipKind::Family,
            multiplier: 1.05,
            pairs: vec![
                ("Moon", "Moon"),
                ("Moon", "Saturn"),
                ("Sun", "Moon"),
                ("Moon", "Jupiter"),
                ("Sun", "Saturn"),
            ],
        },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_kind_parse() {
        assert_eq!("Romantic".parse::<RelationshipKind>(), Ok(RelationshipKind::Romantic));
        assert!("rival".parse::<RelationshipKind>().is_err());
    }

    #[test]
    fn test_archetype_order_and_multipliers() {
        let keys: Vec<_> = ARCHETYPES.iter().map(|a| (a.key, a.multiplier)).collect();
        assert_eq!(
            keys,
            vec![
                (RelationshipKind::Romantic, 1.15),
                (RelationshipKind::Crush, 1.0),
                (RelationshipKind::Friend, 1.0),
                (RelationshipKind::Business, 0.95),
                (RelationshipKind::Family, 1.05),
            ]
        );
    }
}
