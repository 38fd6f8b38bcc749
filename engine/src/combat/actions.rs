use std::ops::{Deref, DerefMut};

use crate::Dice;
use crate::actor::{ActorId, Roster};
use crate::combat::attack::{AttackReport, resolve_attack};
use crate::error::Rejected;
use crate::life;
use crate::stats::Weapon;

/// A potion restores this share of max health.
pub const POTION_HEAL_PCT: i32 = 50;
/// Dexterity granted by raising a shield, for the one attack that follows.
pub const SHIELD_DEXTERITY: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealOutcome {
    pub applied: bool,
    pub amount_restored: i32,
    pub potions_left: u32,
    pub rejected: Option<Rejected>,
}

impl HealOutcome {
    fn rejected(reason: Rejected, potions_left: u32) -> Self {
        Self {
            applied: false,
            amount_restored: 0,
            potions_left,
            rejected: Some(reason),
        }
    }
}

/// Consume one potion for half of max health, capped at max.
pub fn drink_potion(roster: &mut Roster, id: ActorId, mut log: impl FnMut(String)) -> HealOutcome {
    let actor = match roster.actor_mut(id) {
        Ok(actor) => actor,
        Err(e) => return HealOutcome::rejected(e, 0),
    };
    if let Err(e) = actor.ensure_alive() {
        return HealOutcome::rejected(e, actor.potions);
    }
    if actor.potions == 0 {
        log(format!("[HEAL][{}] reaches for a potion, finds none", actor.name));
        return HealOutcome::rejected(
            Rejected::NoPotions {
                name: actor.name.clone(),
            },
            0,
        );
    }

    actor.potions -= 1;
    let amount = i64::from(actor.health.max_hp) * i64::from(POTION_HEAL_PCT) / 100;
    let amount = i32::try_from(amount).unwrap_or(i32::MAX);
    let restored = life::heal(&actor.name, &mut actor.health, amount, &mut log);
    log(format!(
        "[ITEM][{}] potion used, {} left",
        actor.name, actor.potions
    ));
    HealOutcome {
        applied: true,
        amount_restored: restored,
        potions_left: actor.potions,
        rejected: None,
    }
}

/// Equip an inventory slot and recompute derived stats.
pub fn equip_slot(
    roster: &mut Roster,
    id: ActorId,
    slot: usize,
    mut log: impl FnMut(String),
) -> Result<Weapon, Rejected> {
    let actor = roster.actor_mut(id)?;
    let picked = actor.inventory_mut()?.get(slot).cloned();
    let Some(weapon) = picked else {
        return Err(Rejected::NoSuchSlot {
            name: actor.name.clone(),
            slot,
        });
    };
    actor.weapon = weapon.clone();
    actor.recompute_derived();
    log(format!(
        "[EQUIP][{}] wields {} (base damage {})",
        actor.name, weapon.name, actor.base_damage
    ));
    Ok(weapon)
}

/// Equip `weapon`, adding it to the inventory first if it is not there yet.
pub fn equip(
    roster: &mut Roster,
    id: ActorId,
    weapon: Weapon,
    log: impl FnMut(String),
) -> Result<(), Rejected> {
    let inventory = roster.actor_mut(id)?.inventory_mut()?;
    let slot = match inventory.iter().position(|w| *w == weapon) {
        Some(slot) => slot,
        None => {
            inventory.push(weapon);
            inventory.len() - 1
        }
    };
    equip_slot(roster, id, slot, log).map(|_| ())
}

/// Add a weapon to the inventory without equipping it.
pub fn grant_weapon(
    roster: &mut Roster,
    id: ActorId,
    weapon: Weapon,
    mut log: impl FnMut(String),
) -> Result<(), Rejected> {
    let actor = roster.actor_mut(id)?;
    let name = actor.name.clone();
    let inventory = actor.inventory_mut()?;
    log(format!(
        "[LOOT][{}] finds {} (damage {})",
        name, weapon.name, weapon.damage
    ));
    inventory.push(weapon);
    Ok(())
}

/// Temporary dexterity bonus that is taken back when the guard drops, however
/// the guarded code exits.
pub struct DexterityBuff<'a> {
    roster: &'a mut Roster,
    id: ActorId,
    bonus: u32,
}

impl<'a> DexterityBuff<'a> {
    pub fn apply(roster: &'a mut Roster, id: ActorId, bonus: u32) -> Result<Self, Rejected> {
        let applied = {
            let actor = roster.actor_mut(id)?;
            actor.ensure_alive()?;
            let before = actor.attributes.dexterity;
            actor.attributes.dexterity = before.saturating_add(bonus);
            actor.attributes.dexterity - before
        };
        Ok(Self {
            roster,
            id,
            bonus: applied,
        })
    }
}

impl Deref for DexterityBuff<'_> {
    type Target = Roster;

    fn deref(&self) -> &Roster {
        self.roster
    }
}

impl DerefMut for DexterityBuff<'_> {
    fn deref_mut(&mut self) -> &mut Roster {
        self.roster
    }
}

impl Drop for DexterityBuff<'_> {
    fn drop(&mut self) {
        if let Some(actor) = self.roster.get_mut(self.id) {
            actor.attributes.dexterity = actor.attributes.dexterity.saturating_sub(self.bonus);
        }
    }
}

/// Raise a shield (+2 dexterity) and attack; the bonus lasts for this one
/// attack, including any counters and combos it sets off.
pub fn guarded_attack(
    roster: &mut Roster,
    dice: &mut Dice,
    attacker: ActorId,
    defender: ActorId,
    mut log: impl FnMut(String),
) -> Result<AttackReport, Rejected> {
    let mut buffed = DexterityBuff::apply(roster, attacker, SHIELD_DEXTERITY)?;
    let name = buffed.actor(attacker)?.name().to_string();
    log(format!(
        "[BUFF][{}] raises a shield (+{} DEX)",
        name, SHIELD_DEXTERITY
    ));
    let result = resolve_attack(&mut buffed, dice, attacker, defender, &mut log);
    drop(buffed);
    log(format!("[BUFF][{}] lowers the shield", name));
    result
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;
    use crate::actor::ActorSpec;

    #[test]
    fn buff_is_reverted_when_the_guarded_code_panics() {
        let mut roster = Roster::new();
        let id = roster.spawn(ActorSpec::controlled("Hero", Weapon::new("Sword", 10)));

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let buffed = DexterityBuff::apply(&mut roster, id, SHIELD_DEXTERITY).unwrap();
            assert_eq!(buffed.actor(id).unwrap().attributes().dexterity, 7);
            panic!("attack blew up");
        }));

        assert!(outcome.is_err());
        assert_eq!(roster.get(id).unwrap().attributes().dexterity, 5);
    }

    #[test]
    fn dead_actors_cannot_raise_a_shield() {
        let mut roster = Roster::new();
        let id = roster.spawn(ActorSpec::controlled("Hero", Weapon::new("Sword", 10)));
        roster.damage(id, 1_000, |_| {});
        assert!(matches!(
            DexterityBuff::apply(&mut roster, id, SHIELD_DEXTERITY),
            Err(Rejected::ActorDead { .. })
        ));
    }
}
