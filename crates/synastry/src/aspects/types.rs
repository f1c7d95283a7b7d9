use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectType {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

impl AspectType {
    pub fn as_str(self) -> &'static str {
        match self {
            AspectType::Conjunction => "conjunction",
            AspectType::Sextile => "sextile",
            AspectType::Square => "square",
            AspectType::Trine => "trine",
            AspectType::Opposition => "opposition",
        }
    }

    /// Trines, sextiles and conjunctions.
    pub fn is_harmonious(self) -> bool {
        matches!(
            self,
            AspectType::Trine | AspectType::Sextile | AspectType::Conjunction
        )
    }

    /// Squares and oppositions.
    pub fn is_challenging(self) -> bool {
        matches!(self, AspectType::Square | AspectType::Opposition)
    }
}

impl fmt::Display for AspectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectDefinition {
    pub aspect_type: AspectType,
    /// Exact angle (0, 60, 90, 120, 180)
    pub angle: f64,
    /// Maximum accepted deviation from `angle`
    pub orb: f64,
}

/// Aspect definitions in scan priority. The first definition whose orb
/// contains a separation wins, so the order here is the tie-break.
pub const ASPECT_DEFINITIONS: &[AspectDefinition] = &[
    AspectDefinition {
        aspect_type: AspectType::Conjunction,
        angle: 0.0,
        orb: 8.0,
    },
    AspectDefinition {
        aspect_type: AspectType::Sextile,
        angle: 60.0,
        orb: 5.0,
    },
    AspectDefinition {
        aspect_type: AspectType::Square,
        angle: 90.0,
        orb: 7.0,
    },
    AspectDefinition {
        aspect_type: AspectType::Trine,
        angle: 120.0,
        orb: 7.0,
    },
    AspectDefinition {
        aspect_type: AspectType::Opposition,
        angle: 180.0,
        orb: 8.0,
    },
];

/// A detected angular relationship. `planet1`/`planet2` keep detection
/// order; matchers must accept either order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aspect {
    pub planet1: String,
    pub planet2: String,
    #[serde(rename = "type")]
    pub aspect_type: AspectType,
    /// Deviation from the exact angle in degrees, rounded to 2 decimals
    pub orb: f64,
    pub is_applying: bool,
}

impl Aspect {
    /// Whether this aspect joins `a` and `b`, in either order.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.planet1 == a && self.planet2 == b) || (self.planet1 == b && self.planet2 == a)
    }

    pub fn involves(&self, body: &str) -> bool {
        self.planet1 == body || self.planet2 == body
    }

    /// "Venus trine Mars"
    pub fn label(&self) -> String {
        format!("{} {} {}", self.planet1, self.aspect_type, self.planet2)
    }
}
