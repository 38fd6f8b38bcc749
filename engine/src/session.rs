use crate::Dice;
use crate::actor::{Actor, ActorId, ActorSpec, Roster};
use crate::combat::actions::{self, HealOutcome};
use crate::combat::attack::{self, AttackReport, DefenseReport};
use crate::encounter::{self, ActionProvider, EncounterResult, TargetProvider};
use crate::error::Rejected;
use crate::progression::{self, LevelUp};
use crate::stats::Weapon;
use crate::status::{self, TickReport};

/// One play session: the actors, the live-actor counter, the dice and the
/// combat journal.
pub struct Session {
    roster: Roster,
    dice: Dice,
    journal: Vec<String>,
}

impl Session {
    pub fn new(dice: Dice) -> Self {
        Self {
            roster: Roster::new(),
            dice,
            journal: Vec::new(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new(Dice::from_seed(seed))
    }

    pub fn new_actor(&mut self, spec: ActorSpec) -> ActorId {
        self.roster.spawn(spec)
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.roster.get(id)
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Constructed actors that are still alive.
    pub fn living(&self) -> usize {
        self.roster.living()
    }

    pub fn dice_mut(&mut self) -> &mut Dice {
        &mut self.dice
    }

    pub fn journal(&self) -> &[String] {
        &self.journal
    }

    pub fn take_journal(&mut self) -> Vec<String> {
        std::mem::take(&mut self.journal)
    }

    pub fn resolve_attack(
        &mut self,
        attacker: ActorId,
        defender: ActorId,
    ) -> Result<AttackReport, Rejected> {
        attack::resolve_attack(
            &mut self.roster,
            &mut self.dice,
            attacker,
            defender,
            |msg| self.journal.push(msg),
        )
    }

    pub fn receive_damage(
        &mut self,
        defender: ActorId,
        amount: i32,
        attacker: ActorId,
    ) -> Result<DefenseReport, Rejected> {
        attack::receive_damage(
            &mut self.roster,
            &mut self.dice,
            defender,
            amount,
            attacker,
            |msg| self.journal.push(msg),
        )
    }

    pub fn shield_attack(
        &mut self,
        attacker: ActorId,
        defender: ActorId,
    ) -> Result<AttackReport, Rejected> {
        actions::guarded_attack(
            &mut self.roster,
            &mut self.dice,
            attacker,
            defender,
            |msg| self.journal.push(msg),
        )
    }

    pub fn heal(&mut self, id: ActorId) -> HealOutcome {
        actions::drink_potion(&mut self.roster, id, |msg| self.journal.push(msg))
    }

    pub fn equip(&mut self, id: ActorId, weapon: Weapon) -> Result<(), Rejected> {
        actions::equip(&mut self.roster, id, weapon, |msg| self.journal.push(msg))
    }

    pub fn equip_slot(&mut self, id: ActorId, slot: usize) -> Result<Weapon, Rejected> {
        actions::equip_slot(&mut self.roster, id, slot, |msg| self.journal.push(msg))
    }

    pub fn grant_weapon(&mut self, id: ActorId, weapon: Weapon) -> Result<(), Rejected> {
        actions::grant_weapon(&mut self.roster, id, weapon, |msg| self.journal.push(msg))
    }

    /// Discovered weapons of a controlled actor.
    pub fn list_inventory(&self, id: ActorId) -> Result<&[Weapon], Rejected> {
        let actor = self.roster.actor(id)?;
        actor.inventory().ok_or_else(|| Rejected::NotControlled {
            name: actor.name().to_string(),
        })
    }

    pub fn tick_effects(&mut self, id: ActorId) -> TickReport {
        status::tick_effects(&mut self.roster, id, |msg| self.journal.push(msg))
    }

    pub fn gain_experience(&mut self, id: ActorId, amount: u64) -> Result<Vec<LevelUp>, Rejected> {
        let actor = self.roster.actor_mut(id)?;
        Ok(progression::gain_experience(
            actor,
            amount,
            &mut self.dice,
            |msg| self.journal.push(msg),
        ))
    }

    pub fn run_single_encounter(
        &mut self,
        player: ActorId,
        opponent: ActorId,
        actions: &mut impl ActionProvider,
    ) -> Result<EncounterResult, Rejected> {
        encounter::run_single_encounter(
            &mut self.roster,
            &mut self.dice,
            player,
            opponent,
            actions,
            &mut self.journal,
        )
    }

    pub fn run_group_encounter(
        &mut self,
        player: ActorId,
        opponents: &[ActorId],
        actions: &mut impl ActionProvider,
        targets: &mut impl TargetProvider,
    ) -> Result<EncounterResult, Rejected> {
        encounter::run_group_encounter(
            &mut self.roster,
            &mut self.dice,
            player,
            opponents,
            actions,
            targets,
            &mut self.journal,
        )
    }
}
