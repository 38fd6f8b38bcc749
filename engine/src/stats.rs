//! Numeric attributes and the formulas derived from them.

use serde::{Deserialize, Serialize};

pub const BASE_HEALTH: i32 = 100;
pub const HEALTH_PER_STRENGTH: i32 = 10;
pub const DAMAGE_PER_STRENGTH: i32 = 2;

pub const CRIT_PER_FOCUS: u32 = 5;
pub const CRIT_CAP: u32 = 40;
pub const COMBO_PER_FOCUS: u32 = 3;
pub const COMBO_CAP: u32 = 30;
pub const DODGE_PER_DEXTERITY: u32 = 5;
pub const DODGE_CAP: u32 = 40;
pub const COUNTER_PER_DEXTERITY: u32 = 3;
pub const COUNTER_CAP: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub damage: u32,
}

impl Weapon {
    pub fn new(name: impl Into<String>, damage: u32) -> Self {
        Self {
            name: name.into(),
            damage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: u32,
    pub dexterity: u32,
    pub focus: u32,
}

impl Attributes {
    pub fn new(strength: u32, dexterity: u32, focus: u32) -> Self {
        Self {
            strength,
            dexterity,
            focus,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.strength > 0 && self.dexterity > 0 && self.focus > 0
    }

    /// Every attribute raised to at least 1.
    pub fn clamped(self) -> Self {
        Self::new(self.strength.max(1), self.dexterity.max(1), self.focus.max(1))
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::new(5, 5, 5)
    }
}

fn to_i32(v: u64) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// Max health granted by strength alone: 100 + 10×strength.
pub fn health_for_strength(strength: u32) -> i32 {
    to_i32(BASE_HEALTH as u64 + HEALTH_PER_STRENGTH as u64 * u64::from(strength))
}

/// weapon damage + 2×strength.
pub fn base_damage(weapon: &Weapon, strength: u32) -> i32 {
    to_i32(u64::from(weapon.damage) + DAMAGE_PER_STRENGTH as u64 * u64::from(strength))
}

pub fn crit_chance(focus: u32) -> u32 {
    focus.saturating_mul(CRIT_PER_FOCUS).min(CRIT_CAP)
}

pub fn combo_chance(focus: u32) -> u32 {
    focus.saturating_mul(COMBO_PER_FOCUS).min(COMBO_CAP)
}

pub fn dodge_chance(dexterity: u32) -> u32 {
    dexterity.saturating_mul(DODGE_PER_DEXTERITY).min(DODGE_CAP)
}

pub fn counter_chance(dexterity: u32) -> u32 {
    dexterity.saturating_mul(COUNTER_PER_DEXTERITY).min(COUNTER_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chances_clamp_at_their_caps() {
        assert_eq!(crit_chance(7), 35);
        assert_eq!(crit_chance(8), 40);
        assert_eq!(crit_chance(40), 40);
        assert_eq!(combo_chance(10), 30);
        assert_eq!(combo_chance(u32::MAX), 30);
        assert_eq!(dodge_chance(1), 5);
        assert_eq!(counter_chance(6), 18);
    }

    #[test]
    fn derived_values_follow_strength() {
        let w = Weapon::new("Rusty Sword", 10);
        assert_eq!(base_damage(&w, 5), 20);
        assert_eq!(health_for_strength(5), 150);
    }
}
