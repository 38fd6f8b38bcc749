//! Turn order, victory/defeat and post-fight rewards.
//!
//! Player decisions come from an [`ActionProvider`] (and a [`TargetProvider`]
//! when several opponents stand), so the controller works the same for a
//! console adapter, a script, or an automated policy.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::Dice;
use crate::actor::{Actor, ActorId, Roster};
use crate::combat::actions::{drink_potion, equip_slot, grant_weapon, guarded_attack};
use crate::combat::attack::resolve_attack;
use crate::element::Element;
use crate::error::Rejected;
use crate::stats::Weapon;
use crate::status::{EffectKind, tick_effects};

pub const OPPONENT_HEAL_CHANCE: u32 = 10;
pub const WEAPON_DROP_CHANCE: u32 = 25;
pub const POTION_DROP_CHANCE: u32 = 40;
pub const LOOT_DAMAGE_MIN: u32 = 10;
pub const LOOT_DAMAGE_MAX: u32 = 30;
pub const LOOT_WEAPON_KINDS: [&str; 3] = ["Sword", "Axe", "Dagger"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    Attack,
    Heal,
    /// Attack with +2 dexterity for the duration of that one attack.
    ShieldAttack,
    /// Equip the inventory weapon at this index.
    SwapWeapon(usize),
    Pass,
}

/// Read-only snapshot of an actor handed to providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorView {
    pub id: ActorId,
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub potions: u32,
    pub level: u32,
    pub element: Element,
    pub weapon: Weapon,
    pub burning: usize,
}

impl ActorView {
    pub fn of(id: ActorId, actor: &Actor) -> Self {
        Self {
            id,
            name: actor.name().to_string(),
            hp: actor.hp(),
            max_hp: actor.max_hp(),
            potions: actor.potions(),
            level: actor.level(),
            element: actor.element(),
            weapon: actor.weapon().clone(),
            burning: actor.effects().count(EffectKind::Burn),
        }
    }
}

pub struct TurnView<'a> {
    pub round: u32,
    pub player: ActorView,
    /// Living opponents in encounter order; target indices refer to this list.
    pub opponents: Vec<ActorView>,
    pub inventory: Vec<Weapon>,
    /// Journal lines written since the player's previous turn.
    pub recent: &'a [String],
}

pub trait ActionProvider {
    fn next_action(&mut self, view: &TurnView<'_>) -> PlayerAction;
}

impl<F> ActionProvider for F
where
    F: FnMut(&TurnView<'_>) -> PlayerAction,
{
    fn next_action(&mut self, view: &TurnView<'_>) -> PlayerAction {
        self(view)
    }
}

pub trait TargetProvider {
    /// Index into `view.opponents`; `None` or an out-of-range index skips the turn.
    fn pick_target(&mut self, view: &TurnView<'_>) -> Option<usize>;
}

impl<F> TargetProvider for F
where
    F: FnMut(&TurnView<'_>) -> Option<usize>,
{
    fn pick_target(&mut self, view: &TurnView<'_>) -> Option<usize> {
        self(view)
    }
}

/// Replays queued actions, then keeps attacking.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    actions: VecDeque<PlayerAction>,
}

impl Scripted {
    pub fn new(actions: impl IntoIterator<Item = PlayerAction>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }
}

impl ActionProvider for Scripted {
    fn next_action(&mut self, _view: &TurnView<'_>) -> PlayerAction {
        self.actions.pop_front().unwrap_or(PlayerAction::Attack)
    }
}

/// Always targets the first living opponent.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLiving;

impl TargetProvider for FirstLiving {
    fn pick_target(&mut self, view: &TurnView<'_>) -> Option<usize> {
        (!view.opponents.is_empty()).then_some(0)
    }
}

/// Drinks a potion below a health threshold, otherwise attacks the weakest
/// living opponent.
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    pub heal_below_pct: i32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { heal_below_pct: 35 }
    }
}

impl ActionProvider for Autopilot {
    fn next_action(&mut self, view: &TurnView<'_>) -> PlayerAction {
        let p = &view.player;
        let wounded = i64::from(p.hp) * 100 < i64::from(p.max_hp) * i64::from(self.heal_below_pct);
        if p.potions > 0 && wounded {
            PlayerAction::Heal
        } else {
            PlayerAction::Attack
        }
    }
}

impl TargetProvider for Autopilot {
    fn pick_target(&mut self, view: &TurnView<'_>) -> Option<usize> {
        view.opponents
            .iter()
            .enumerate()
            .min_by_key(|(_, o)| o.hp)
            .map(|(i, _)| i)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Victory,
    Defeat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Loot {
    Weapon(Weapon),
    Potion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncounterResult {
    pub outcome: Outcome,
    pub loot: Vec<Loot>,
    pub rounds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterState {
    Ongoing,
    PlayerVictory,
    PlayerDefeat,
}

pub fn encounter_state(roster: &Roster, player: ActorId, opponents: &[ActorId]) -> EncounterState {
    if !roster.is_alive(player) {
        EncounterState::PlayerDefeat
    } else if opponents.iter().all(|&o| !roster.is_alive(o)) {
        EncounterState::PlayerVictory
    } else {
        EncounterState::Ongoing
    }
}

fn validate(roster: &Roster, player: ActorId, opponents: &[ActorId]) -> Result<(), Rejected> {
    let p = roster.actor(player)?;
    p.ensure_alive()?;
    for &o in opponents {
        roster.actor(o)?;
        if o == player {
            return Err(Rejected::SelfTarget {
                name: p.name().to_string(),
            });
        }
    }
    Ok(())
}

fn name_of(roster: &Roster, id: ActorId) -> String {
    roster
        .get(id)
        .map(|a| a.name().to_string())
        .unwrap_or_else(|| id.to_string())
}

/// Strict alternation between the player and one opponent, player first.
pub fn run_single_encounter(
    roster: &mut Roster,
    dice: &mut Dice,
    player: ActorId,
    opponent: ActorId,
    actions: &mut impl ActionProvider,
    journal: &mut Vec<String>,
) -> Result<EncounterResult, Rejected> {
    let opponents = [opponent];
    validate(roster, player, &opponents)?;
    journal.push(format!(
        "[START] {} vs {}",
        name_of(roster, player),
        name_of(roster, opponent)
    ));
    tracing::info!(%player, %opponent, "single encounter started");

    let mut seen = journal.len();
    let mut rounds = 0u32;
    while encounter_state(roster, player, &opponents) == EncounterState::Ongoing {
        rounds += 1;
        let player_turn = rounds % 2 == 1;
        let actor = if player_turn { player } else { opponent };
        journal.push(format!("[ROUND] {} → {}", rounds, name_of(roster, actor)));

        tick_round(roster, player, &opponents, journal);
        if encounter_state(roster, player, &opponents) != EncounterState::Ongoing {
            break;
        }

        if player_turn {
            take_player_turn(
                roster,
                dice,
                player,
                &opponents,
                rounds,
                actions,
                &mut FirstLiving,
                &mut seen,
                journal,
            );
        } else {
            opponent_turn(roster, dice, opponent, player, journal);
        }
    }

    Ok(conclude(roster, dice, player, &opponents, rounds, journal))
}

/// Each round the player acts once, then every living opponent acts once in
/// encounter order.
pub fn run_group_encounter(
    roster: &mut Roster,
    dice: &mut Dice,
    player: ActorId,
    opponents: &[ActorId],
    actions: &mut impl ActionProvider,
    targets: &mut impl TargetProvider,
    journal: &mut Vec<String>,
) -> Result<EncounterResult, Rejected> {
    validate(roster, player, opponents)?;
    let names: Vec<String> = opponents.iter().map(|&o| name_of(roster, o)).collect();
    journal.push(format!(
        "[START] {} vs {}",
        name_of(roster, player),
        names.join(", ")
    ));
    tracing::info!(%player, opponents = opponents.len(), "group encounter started");

    let mut seen = journal.len();
    let mut rounds = 0u32;
    while encounter_state(roster, player, opponents) == EncounterState::Ongoing {
        rounds += 1;
        journal.push(format!("[ROUND] {}", rounds));

        tick_round(roster, player, opponents, journal);
        if encounter_state(roster, player, opponents) != EncounterState::Ongoing {
            break;
        }

        take_player_turn(
            roster, dice, player, opponents, rounds, actions, targets, &mut seen, journal,
        );

        for &opponent in opponents {
            if !roster.is_alive(player) {
                break;
            }
            opponent_turn(roster, dice, opponent, player, journal);
        }
    }

    Ok(conclude(roster, dice, player, opponents, rounds, journal))
}

fn tick_round(
    roster: &mut Roster,
    player: ActorId,
    opponents: &[ActorId],
    journal: &mut Vec<String>,
) {
    tick_effects(roster, player, |msg| journal.push(msg));
    for &o in opponents {
        tick_effects(roster, o, |msg| journal.push(msg));
    }
}

#[allow(clippy::too_many_arguments)]
fn take_player_turn(
    roster: &mut Roster,
    dice: &mut Dice,
    player: ActorId,
    opponents: &[ActorId],
    round: u32,
    actions: &mut impl ActionProvider,
    targets: &mut impl TargetProvider,
    seen: &mut usize,
    journal: &mut Vec<String>,
) {
    let Some(me) = roster.get(player) else {
        return;
    };
    let name = me.name().to_string();
    let (action, target) = {
        let view = TurnView {
            round,
            player: ActorView::of(player, me),
            opponents: opponents
                .iter()
                .filter_map(|&o| {
                    roster
                        .get(o)
                        .filter(|a| a.is_alive())
                        .map(|a| ActorView::of(o, a))
                })
                .collect(),
            inventory: me.inventory().map(<[Weapon]>::to_vec).unwrap_or_default(),
            recent: &journal[*seen..],
        };
        let action = actions.next_action(&view);
        let target = match action {
            PlayerAction::Attack | PlayerAction::ShieldAttack => targets
                .pick_target(&view)
                .and_then(|i| view.opponents.get(i))
                .map(|o| o.id),
            _ => None,
        };
        (action, target)
    };
    *seen = journal.len();

    let mut log = |msg: String| journal.push(msg);
    let rejected = match action {
        PlayerAction::Attack | PlayerAction::ShieldAttack => match target {
            None => {
                log(format!("[TURN][{}] no valid target, turn skipped", name));
                None
            }
            Some(t) if action == PlayerAction::Attack => {
                resolve_attack(roster, dice, player, t, &mut log).err()
            }
            Some(t) => guarded_attack(roster, dice, player, t, &mut log).err(),
        },
        PlayerAction::Heal => drink_potion(roster, player, &mut log).rejected,
        PlayerAction::SwapWeapon(slot) => equip_slot(roster, player, slot, &mut log).err(),
        PlayerAction::Pass => {
            log(format!("[TURN][{}] passes", name));
            None
        }
    };
    if let Some(reason) = rejected {
        tracing::debug!(%reason, "player action rejected");
        log(format!("[TURN][{}] {:?} rejected: {}", name, action, reason));
    }
}

/// Fixed opponent policy: 10% chance to drink when potions remain, otherwise attack.
pub fn opponent_turn(
    roster: &mut Roster,
    dice: &mut Dice,
    opponent: ActorId,
    target: ActorId,
    journal: &mut Vec<String>,
) {
    let Some(me) = roster.get(opponent) else {
        return;
    };
    if !me.is_alive() {
        return;
    }
    let has_potions = me.potions() > 0;
    let name = me.name().to_string();
    let mut log = |msg: String| journal.push(msg);
    if dice.chance(OPPONENT_HEAL_CHANCE) && has_potions {
        drink_potion(roster, opponent, &mut log);
    } else if let Err(reason) = resolve_attack(roster, dice, opponent, target, &mut log) {
        log(format!("[TURN][{}] attack rejected: {}", name, reason));
    }
}

/// Roll the drops for one defeated opponent.
pub fn roll_loot(dice: &mut Dice) -> Vec<Loot> {
    let mut loot = Vec::new();
    if dice.chance(WEAPON_DROP_CHANCE) {
        let kind = LOOT_WEAPON_KINDS[dice.pick(LOOT_WEAPON_KINDS.len())];
        let damage = dice.range(LOOT_DAMAGE_MIN, LOOT_DAMAGE_MAX);
        loot.push(Loot::Weapon(Weapon::new(format!("Magic {}", kind), damage)));
    }
    if dice.chance(POTION_DROP_CHANCE) {
        loot.push(Loot::Potion);
    }
    loot
}

fn conclude(
    roster: &mut Roster,
    dice: &mut Dice,
    player: ActorId,
    opponents: &[ActorId],
    rounds: u32,
    journal: &mut Vec<String>,
) -> EncounterResult {
    let outcome = match encounter_state(roster, player, opponents) {
        EncounterState::PlayerVictory => Outcome::Victory,
        _ => Outcome::Defeat,
    };

    let mut loot = Vec::new();
    if outcome == Outcome::Victory {
        for &o in opponents {
            if roster.is_alive(o) {
                continue;
            }
            for item in roll_loot(dice) {
                award(roster, player, &item, journal);
                loot.push(item);
            }
        }
    }

    journal.push(format!(
        "[END] outcome={:?} rounds={} loot={}",
        outcome,
        rounds,
        loot.len()
    ));
    tracing::info!(?outcome, rounds, loot = loot.len(), "encounter finished");
    EncounterResult {
        outcome,
        loot,
        rounds,
    }
}

fn award(roster: &mut Roster, player: ActorId, item: &Loot, journal: &mut Vec<String>) {
    match item {
        Loot::Weapon(weapon) => {
            if let Err(reason) = grant_weapon(roster, player, weapon.clone(), |m| journal.push(m)) {
                journal.push(format!("[LOOT] {} left behind: {}", weapon.name, reason));
            }
        }
        Loot::Potion => {
            if let Some(p) = roster.get_mut(player) {
                p.potions += 1;
                journal.push(format!("[LOOT][{}] finds a potion ({} now)", p.name(), p.potions));
            }
        }
    }
}
