//! Experience and level-ups.

use serde::{Deserialize, Serialize};

use crate::Dice;
use crate::actor::Actor;

pub const XP_PER_LEVEL: u64 = 100;
pub const LEVEL_UP_HEAL: i32 = 20;
pub const VITALITY_BONUS: i32 = 10;
/// Level-ups processed per award at most. Experience beyond that stays
/// banked for the next award.
pub const MAX_LEVEL_UPS_PER_AWARD: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Upgrade {
    Strength,
    Dexterity,
    Focus,
    Vitality,
}

impl Upgrade {
    pub const ALL: [Upgrade; 4] = [
        Upgrade::Strength,
        Upgrade::Dexterity,
        Upgrade::Focus,
        Upgrade::Vitality,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    pub level: u32,
    pub upgrade: Upgrade,
}

/// Experience needed to leave `level`.
pub fn threshold(level: u32) -> u64 {
    u64::from(level).saturating_mul(XP_PER_LEVEL)
}

/// floor(sqrt(base damage × max health)) of the fallen actor.
pub fn experience_for_kill(fallen: &Actor) -> u64 {
    let dmg = u64::try_from(fallen.base_damage().max(0)).unwrap_or(0);
    let hp = u64::try_from(fallen.max_hp().max(0)).unwrap_or(0);
    dmg.saturating_mul(hp).isqrt()
}

/// Bank experience and level up while it covers the current threshold.
/// The dead gain nothing.
pub fn gain_experience(
    actor: &mut Actor,
    amount: u64,
    dice: &mut Dice,
    mut log: impl FnMut(String),
) -> Vec<LevelUp> {
    let mut gained = Vec::new();
    if !actor.is_alive() {
        return gained;
    }

    actor.experience = actor.experience.saturating_add(amount);
    log(format!(
        "[XP][{}] +{} (now {})",
        actor.name, amount, actor.experience
    ));

    while actor.experience >= threshold(actor.level) {
        if gained.len() as u32 >= MAX_LEVEL_UPS_PER_AWARD {
            tracing::warn!(
                actor = %actor.name,
                banked = actor.experience,
                "level-up cap reached; remaining experience stays banked"
            );
            break;
        }
        actor.experience -= threshold(actor.level);
        actor.level += 1;

        let upgrade = Upgrade::ALL[dice.pick(Upgrade::ALL.len())];
        match upgrade {
            Upgrade::Strength => {
                actor.attributes.strength = actor.attributes.strength.saturating_add(1)
            }
            Upgrade::Dexterity => {
                actor.attributes.dexterity = actor.attributes.dexterity.saturating_add(1)
            }
            Upgrade::Focus => actor.attributes.focus = actor.attributes.focus.saturating_add(1),
            Upgrade::Vitality => {
                let raised = actor.health.max_hp.saturating_add(VITALITY_BONUS);
                actor.health.raise_max(raised);
            }
        }
        actor.recompute_derived();
        let before = actor.health.hp;
        actor.health.hp = before.saturating_add(LEVEL_UP_HEAL).min(actor.health.max_hp);

        log(format!(
            "[LEVEL][{}] reaches level {} ({:?} up, HP {} → {}/{})",
            actor.name, actor.level, upgrade, before, actor.health.hp, actor.health.max_hp
        ));
        tracing::info!(actor = %actor.name, level = actor.level, ?upgrade, "level up");
        gained.push(LevelUp {
            level: actor.level,
            upgrade,
        });
    }
    gained
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorSpec, Roster};
    use crate::stats::Weapon;

    #[test]
    fn threshold_scales_with_level() {
        assert_eq!(threshold(1), 100);
        assert_eq!(threshold(4), 400);
    }

    #[test]
    fn kill_experience_is_geometric_mean() {
        let mut roster = Roster::new();
        // base damage 20, max hp 150 → sqrt(3000) = 54.77
        let id = roster.spawn(ActorSpec::opponent("Gob", Weapon::new("Axe", 10)));
        assert_eq!(experience_for_kill(roster.get(id).unwrap()), 54);
    }
}
