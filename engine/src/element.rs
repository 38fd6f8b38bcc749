use std::fmt;

use serde::{Deserialize, Serialize};

/// Elemental affinity of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Fire,
    Water,
    Earth,
    Air,
    #[default]
    #[serde(other)]
    Neutral,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Fire,
        Element::Water,
        Element::Earth,
        Element::Air,
        Element::Neutral,
    ];

    /// Damage modifier in percent when `self` strikes `target`.
    ///
    /// Only three pairings differ from 100; the table is not symmetric.
    pub fn modifier_pct(self, target: Element) -> u32 {
        use Element::*;
        match (self, target) {
            (Fire, Water) => 50,
            (Fire, Earth) => 150,
            (Water, Fire) => 150,
            _ => 100,
        }
    }

    pub fn modifier(self, target: Element) -> f64 {
        f64::from(self.modifier_pct(target)) / 100.0
    }

    /// Scale `raw` damage against `target`, truncating toward zero.
    pub fn apply(self, target: Element, raw: i32) -> i32 {
        let scaled = i64::from(raw) * i64::from(self.modifier_pct(target)) / 100;
        i32::try_from(scaled).unwrap_or(i32::MAX)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Earth => "earth",
            Element::Air => "air",
            Element::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
