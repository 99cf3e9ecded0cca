//! Measurement units accepted for `ingredient_quantity`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Oz,
    G,
    Cup,
    Tsp,
    Tbsp,
    Ml,
    L,
}

/// Spellings accepted in a recipe submission's `unit` field.
pub const UNIT_NAMES: &[&str] = &["oz", "g", "cup", "tsp", "tbsp", "ml", "l"];

impl Unit {
    pub const ALL: [Unit; 7] = [
        Unit::Oz,
        Unit::G,
        Unit::Cup,
        Unit::Tsp,
        Unit::Tbsp,
        Unit::Ml,
        Unit::L,
    ];

    /// Wire and storage spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Oz => "oz",
            Unit::G => "g",
            Unit::Cup => "cup",
            Unit::Tsp => "tsp",
            Unit::Tbsp => "tbsp",
            Unit::Ml => "ml",
            Unit::L => "l",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = UnknownUnit;

    /// Matching is exact: "Tsp" and " tsp" are not units.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::ALL
            .into_iter()
            .find(|unit| unit.as_str() == s)
            .ok_or_else(|| UnknownUnit(s.to_string()))
    }
}
