//! Damage-over-time effects, ticked once per actor per round.

use serde::{Deserialize, Serialize};

use crate::actor::{ActorId, Roster};

pub const BURN_DAMAGE: i32 = 5;
pub const BURN_TICKS: u32 = 3;
pub const BURN_CHANCE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Burn,
}

impl EffectKind {
    pub fn damage_per_tick(self) -> i32 {
        match self {
            EffectKind::Burn => BURN_DAMAGE,
        }
    }

    /// Journal tag, shared with the line logged when the effect is applied.
    pub fn tag(self) -> &'static str {
        match self {
            EffectKind::Burn => "BURN",
        }
    }
}

/// One stack of an effect. Stacks of the same kind tick independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: EffectKind,
    pub remaining: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLedger {
    effects: Vec<StatusEffect>,
}

impl StatusLedger {
    pub fn push(&mut self, kind: EffectKind, ticks: u32) {
        if ticks > 0 {
            self.effects.push(StatusEffect {
                kind,
                remaining: ticks,
            });
        }
    }

    pub fn ignite(&mut self) {
        self.push(EffectKind::Burn, BURN_TICKS);
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn count(&self, kind: EffectKind) -> usize {
        self.effects.iter().filter(|e| e.kind == kind).count()
    }

    /// Advance every stack by one tick in insertion order and drop the
    /// expired ones. Returns the total damage owed.
    pub fn tick(&mut self, name: &str, mut log: impl FnMut(String)) -> i32 {
        let mut total = 0i32;
        for effect in self.effects.iter_mut() {
            let dmg = effect.kind.damage_per_tick();
            total = total.saturating_add(dmg);
            effect.remaining -= 1;
            log(format!(
                "[{}][{}] {} damage ({} ticks left)",
                effect.kind.tag(),
                name,
                dmg,
                effect.remaining
            ));
        }
        let before = self.effects.len();
        self.effects.retain(|e| e.remaining > 0);
        if self.effects.len() < before {
            log(format!(
                "[COND][{}] {} effect(s) wear off",
                name,
                before - self.effects.len()
            ));
        }
        total
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub damage: i32,
    pub died: bool,
}

/// Tick an actor's ledger and apply the summed damage at once, so death is
/// checked only after every stack has been applied. Dead or unknown actors
/// are left untouched.
pub fn tick_effects(roster: &mut Roster, id: ActorId, mut log: impl FnMut(String)) -> TickReport {
    let Some(actor) = roster.get_mut(id) else {
        return TickReport::default();
    };
    if !actor.is_alive() || actor.effects.is_empty() {
        return TickReport::default();
    }
    let name = actor.name.clone();
    let damage = actor.effects.tick(&name, &mut log);
    let died = roster.damage(id, damage, &mut log);
    TickReport { damage, died }
}
