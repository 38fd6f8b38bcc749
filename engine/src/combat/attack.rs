//! Resolution of a single attack and every strike it sets off.
//!
//! Combo follow-ups and counter-attacks chain without a fixed depth, so the
//! resolver runs from an explicit stack of pending steps instead of recursing.
//! Each step does one unit of work and pushes its continuations; the pop
//! order reproduces the depth-first order of the rolls.

use serde::{Deserialize, Serialize};

use crate::Dice;
use crate::actor::{ActorId, Roster};
use crate::error::Rejected;
use crate::progression::{self, LevelUp};
use crate::stats;
use crate::status::{BURN_CHANCE, EffectKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrikeKind {
    Initial,
    Combo,
    Counter,
}

/// What happened during one strike of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrikeReport {
    pub kind: StrikeKind,
    pub attacker: ActorId,
    pub defender: ActorId,
    /// After crit and elemental scaling; not applied when `dodged`.
    pub damage: i32,
    pub crit: bool,
    pub dodged: bool,
    pub countered: bool,
    pub combo: bool,
    pub burned: bool,
    pub killed: bool,
    pub experience: u64,
    pub level_ups: Vec<LevelUp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttackReport {
    pub final_damage: i32,
    pub was_crit: bool,
    pub was_dodged: bool,
    /// The targeted defender is dead once the whole chain has settled.
    pub defender_died: bool,
    /// Every strike in resolution order, the initial one first.
    pub strikes: Vec<StrikeReport>,
}

impl AttackReport {
    pub fn total_experience(&self, actor: ActorId) -> u64 {
        self.strikes
            .iter()
            .filter(|s| s.attacker == actor)
            .map(|s| s.experience)
            .sum()
    }
}

/// How a defender met an incoming blow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Defense {
    /// The defender was already dead; nothing happened.
    Ignored,
    Dodged { countered: bool },
    Hit { died: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefenseReport {
    pub defense: Defense,
    /// Counter-attack chain set off by the dodge, if any.
    pub strikes: Vec<StrikeReport>,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Strike {
        attacker: ActorId,
        defender: ActorId,
        kind: StrikeKind,
    },
    /// Combo roll once the defender has survived the strike at `at`.
    FollowUp {
        attacker: ActorId,
        defender: ActorId,
        at: usize,
    },
    /// Burn roll, after any combo started at `at` has fully resolved.
    Burn { defender: ActorId, at: usize },
}

/// Resolve `attacker` striking `defender`, including every combo and
/// counter-attack it triggers. Rejected calls mutate nothing and draw no dice.
pub fn resolve_attack(
    roster: &mut Roster,
    dice: &mut Dice,
    attacker: ActorId,
    defender: ActorId,
    mut log: impl FnMut(String),
) -> Result<AttackReport, Rejected> {
    let a = roster.actor(attacker)?;
    let d = roster.actor(defender)?;
    a.ensure_alive()?;
    if attacker == defender {
        return Err(Rejected::SelfTarget {
            name: a.name().to_string(),
        });
    }
    if !d.is_alive() {
        return Err(Rejected::TargetDead {
            name: d.name().to_string(),
        });
    }

    let mut strikes = Vec::new();
    let pending = vec![Step::Strike {
        attacker,
        defender,
        kind: StrikeKind::Initial,
    }];
    run(roster, dice, pending, &mut strikes, &mut log);

    let defender_died = !roster.is_alive(defender);
    let (final_damage, was_crit, was_dodged) = strikes
        .first()
        .map(|s| (s.damage, s.crit, s.dodged))
        .unwrap_or_default();
    tracing::debug!(
        %attacker,
        %defender,
        strikes = strikes.len(),
        defender_died,
        "attack resolved"
    );
    Ok(AttackReport {
        final_damage,
        was_crit,
        was_dodged,
        defender_died,
        strikes,
    })
}

/// Defense resolution on its own: `defender` takes `amount` from `attacker`
/// unless it dodges, in which case it may counter-attack. No experience is
/// awarded here; that belongs to a full attack.
pub fn receive_damage(
    roster: &mut Roster,
    dice: &mut Dice,
    defender: ActorId,
    amount: i32,
    attacker: ActorId,
    mut log: impl FnMut(String),
) -> Result<DefenseReport, Rejected> {
    roster.actor(defender)?;
    roster.actor(attacker)?;
    let mut pending = Vec::new();
    let defense = defend(roster, dice, attacker, defender, amount, &mut pending, &mut log);
    let mut strikes = Vec::new();
    run(roster, dice, pending, &mut strikes, &mut log);
    Ok(DefenseReport { defense, strikes })
}

fn run<L: FnMut(String)>(
    roster: &mut Roster,
    dice: &mut Dice,
    mut pending: Vec<Step>,
    strikes: &mut Vec<StrikeReport>,
    log: &mut L,
) {
    while let Some(step) = pending.pop() {
        match step {
            Step::Strike {
                attacker,
                defender,
                kind,
            } => strike(
                roster,
                dice,
                attacker,
                defender,
                kind,
                strikes,
                &mut pending,
                log,
            ),
            Step::FollowUp {
                attacker,
                defender,
                at,
            } => follow_up(
                roster,
                dice,
                attacker,
                defender,
                at,
                strikes,
                &mut pending,
                log,
            ),
            Step::Burn { defender, at } => burn(roster, dice, defender, at, strikes, log),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn strike<L: FnMut(String)>(
    roster: &mut Roster,
    dice: &mut Dice,
    attacker: ActorId,
    defender: ActorId,
    kind: StrikeKind,
    strikes: &mut Vec<StrikeReport>,
    pending: &mut Vec<Step>,
    log: &mut L,
) {
    let (Some(a), Some(d)) = (roster.get(attacker), roster.get(defender)) else {
        return;
    };
    if !a.is_alive() || !d.is_alive() {
        return;
    }

    let crit = dice.chance(stats::crit_chance(a.attributes().focus));
    let raw = if crit {
        a.base_damage().saturating_mul(2)
    } else {
        a.base_damage()
    };
    let damage = a.element().apply(d.element(), raw);
    log(format!(
        "[ATTACK][{}] {:?} strike at {} with {} → {}{}",
        a.name(),
        kind,
        d.name(),
        a.weapon().name,
        damage,
        if crit { " CRIT!" } else { "" }
    ));

    let at = strikes.len();
    strikes.push(StrikeReport {
        kind,
        attacker,
        defender,
        damage,
        crit,
        dodged: false,
        countered: false,
        combo: false,
        burned: false,
        killed: false,
        experience: 0,
        level_ups: Vec::new(),
    });

    // Runs after any counter chain; a no-op if the defender has fallen by then.
    pending.push(Step::FollowUp {
        attacker,
        defender,
        at,
    });
    match defend(roster, dice, attacker, defender, damage, pending, log) {
        Defense::Dodged { countered } => {
            strikes[at].dodged = true;
            strikes[at].countered = countered;
        }
        Defense::Hit { died: true } => {
            strikes[at].killed = true;
            award_kill(roster, dice, attacker, defender, &mut strikes[at], log);
        }
        Defense::Hit { died: false } | Defense::Ignored => {}
    }
}

fn defend<L: FnMut(String)>(
    roster: &mut Roster,
    dice: &mut Dice,
    attacker: ActorId,
    defender: ActorId,
    amount: i32,
    pending: &mut Vec<Step>,
    log: &mut L,
) -> Defense {
    let Some(d) = roster.get(defender) else {
        return Defense::Ignored;
    };
    if !d.is_alive() {
        return Defense::Ignored;
    }
    let dexterity = d.attributes().dexterity;
    let name = d.name().to_string();

    if dice.chance(stats::dodge_chance(dexterity)) {
        log(format!("[DODGE][{}] evades the blow", name));
        let countered = dice.chance(stats::counter_chance(dexterity));
        if countered {
            log(format!("[COUNTER][{}] strikes back", name));
            pending.push(Step::Strike {
                attacker: defender,
                defender: attacker,
                kind: StrikeKind::Counter,
            });
        }
        return Defense::Dodged { countered };
    }

    Defense::Hit {
        died: roster.damage(defender, amount, &mut *log),
    }
}

fn award_kill<L: FnMut(String)>(
    roster: &mut Roster,
    dice: &mut Dice,
    attacker: ActorId,
    defender: ActorId,
    report: &mut StrikeReport,
    log: &mut L,
) {
    let Some(fallen) = roster.get(defender) else {
        return;
    };
    let xp = progression::experience_for_kill(fallen);
    let Some(victor) = roster.get_mut(attacker) else {
        return;
    };
    report.experience = xp;
    report.level_ups = progression::gain_experience(victor, xp, dice, &mut *log);
}

#[allow(clippy::too_many_arguments)]
fn follow_up<L: FnMut(String)>(
    roster: &mut Roster,
    dice: &mut Dice,
    attacker: ActorId,
    defender: ActorId,
    at: usize,
    strikes: &mut [StrikeReport],
    pending: &mut Vec<Step>,
    log: &mut L,
) {
    if !roster.is_alive(defender) {
        return;
    }
    let Some(a) = roster.get(attacker) else {
        return;
    };
    pending.push(Step::Burn { defender, at });
    // A fallen attacker still rolls for the combo but cannot land it.
    let combo = dice.chance(stats::combo_chance(a.attributes().focus));
    if combo && a.is_alive() {
        strikes[at].combo = true;
        log(format!("[COMBO][{}] presses the attack", a.name()));
        pending.push(Step::Strike {
            attacker,
            defender,
            kind: StrikeKind::Combo,
        });
    }
}

fn burn<L: FnMut(String)>(
    roster: &mut Roster,
    dice: &mut Dice,
    defender: ActorId,
    at: usize,
    strikes: &mut [StrikeReport],
    log: &mut L,
) {
    if !roster.is_alive(defender) {
        return;
    }
    if !dice.chance(BURN_CHANCE) {
        return;
    }
    let Some(d) = roster.get_mut(defender) else {
        return;
    };
    d.effects.ignite();
    strikes[at].burned = true;
    log(format!(
        "[{}][{}] catches fire ({} stack(s))",
        EffectKind::Burn.tag(),
        d.name(),
        d.effects.len()
    ));
}
