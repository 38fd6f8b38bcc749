use std::fmt;

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::error::Rejected;
use crate::life::{self, Health, LifeState, LiveCounter};
use crate::stats::{self, Attributes, Weapon};
use crate::status::StatusLedger;

pub const CONTROLLED_POTIONS: u32 = 3;

/// Handle to an actor owned by a [`Roster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(usize);

impl ActorId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Player-controlled: carries an inventory and starts with potions.
    Controlled,
    #[default]
    Opponent,
}

/// Everything needed to construct an actor. Derived values are computed at
/// spawn time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSpec {
    pub name: String,
    pub weapon: Weapon,
    #[serde(default)]
    pub element: Element,
    #[serde(default)]
    pub attributes: Attributes,
    /// Defaults to 3 for controlled actors and 0 for opponents.
    #[serde(default)]
    pub potions: Option<u32>,
    #[serde(default)]
    pub role: Role,
    /// Start wounded; clamped to `1..=max_health`.
    #[serde(default)]
    pub health: Option<i32>,
}

impl ActorSpec {
    pub fn new(name: impl Into<String>, weapon: Weapon, role: Role) -> Self {
        Self {
            name: name.into(),
            weapon,
            element: Element::Neutral,
            attributes: Attributes::default(),
            potions: None,
            role,
            health: None,
        }
    }

    pub fn controlled(name: impl Into<String>, weapon: Weapon) -> Self {
        Self::new(name, weapon, Role::Controlled)
    }

    pub fn opponent(name: impl Into<String>, weapon: Weapon) -> Self {
        Self::new(name, weapon, Role::Opponent)
    }

    pub fn element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    pub fn attributes(mut self, strength: u32, dexterity: u32, focus: u32) -> Self {
        self.attributes = Attributes::new(strength, dexterity, focus);
        self
    }

    pub fn potions(mut self, potions: u32) -> Self {
        self.potions = Some(potions);
        self
    }

    pub fn health(mut self, hp: i32) -> Self {
        self.health = Some(hp);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Actor {
    pub(crate) name: String,
    pub(crate) role: Role,
    pub(crate) element: Element,
    pub(crate) attributes: Attributes,
    pub(crate) weapon: Weapon,
    pub(crate) inventory: Option<Vec<Weapon>>,
    pub(crate) potions: u32,
    pub(crate) health: Health,
    pub(crate) base_damage: i32,
    pub(crate) level: u32,
    pub(crate) experience: u64,
    pub(crate) effects: StatusLedger,
}

impl Actor {
    fn from_spec(spec: ActorSpec) -> Self {
        let potions = spec.potions.unwrap_or(match spec.role {
            Role::Controlled => CONTROLLED_POTIONS,
            Role::Opponent => 0,
        });
        let inventory = match spec.role {
            Role::Controlled => Some(vec![spec.weapon.clone()]),
            Role::Opponent => None,
        };
        let attributes = spec.attributes.clamped();
        let mut health = Health::new(stats::health_for_strength(attributes.strength));
        if let Some(hp) = spec.health {
            health.hp = hp.clamp(1, health.max_hp);
        }
        let mut actor = Self {
            name: spec.name,
            role: spec.role,
            element: spec.element,
            attributes,
            weapon: spec.weapon,
            inventory,
            potions,
            health,
            base_damage: 0,
            level: 1,
            experience: 0,
            effects: StatusLedger::default(),
        };
        actor.recompute_derived();
        actor
    }

    /// Bring max health and base damage in line with strength and weapon.
    /// Max health only ever grows.
    pub(crate) fn recompute_derived(&mut self) {
        self.health
            .raise_max(stats::health_for_strength(self.attributes.strength));
        self.base_damage = stats::base_damage(&self.weapon, self.attributes.strength);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn element(&self) -> Element {
        self.element
    }

    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    pub fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    pub fn inventory(&self) -> Option<&[Weapon]> {
        self.inventory.as_deref()
    }

    pub fn potions(&self) -> u32 {
        self.potions
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn hp(&self) -> i32 {
        self.health.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.health.max_hp
    }

    pub fn state(&self) -> LifeState {
        self.health.state
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    pub fn base_damage(&self) -> i32 {
        self.base_damage
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u64 {
        self.experience
    }

    pub fn effects(&self) -> &StatusLedger {
        &self.effects
    }

    pub(crate) fn ensure_alive(&self) -> Result<(), Rejected> {
        if self.is_alive() {
            Ok(())
        } else {
            Err(Rejected::ActorDead {
                name: self.name.clone(),
            })
        }
    }

    pub(crate) fn inventory_mut(&mut self) -> Result<&mut Vec<Weapon>, Rejected> {
        match self.inventory.as_mut() {
            Some(inv) => Ok(inv),
            None => Err(Rejected::NotControlled {
                name: self.name.clone(),
            }),
        }
    }
}

/// Owns every actor in a session together with the live-actor counter.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Roster {
    actors: Vec<Actor>,
    living: LiveCounter,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, spec: ActorSpec) -> ActorId {
        let id = ActorId(self.actors.len());
        let actor = Actor::from_spec(spec);
        tracing::debug!(%id, name = %actor.name, hp = actor.health.max_hp, "spawned actor");
        self.actors.push(actor);
        self.living.spawned();
        id
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id.0)
    }

    pub fn actor(&self, id: ActorId) -> Result<&Actor, Rejected> {
        self.get(id).ok_or(Rejected::UnknownActor(id))
    }

    pub(crate) fn actor_mut(&mut self, id: ActorId) -> Result<&mut Actor, Rejected> {
        self.get_mut(id).ok_or(Rejected::UnknownActor(id))
    }

    pub fn living(&self) -> usize {
        self.living.count()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActorId, &Actor)> {
        self.actors.iter().enumerate().map(|(i, a)| (ActorId(i), a))
    }

    pub fn is_alive(&self, id: ActorId) -> bool {
        self.get(id).is_some_and(Actor::is_alive)
    }

    /// The only route by which an actor loses health. Returns true on the
    /// alive→dead transition.
    pub(crate) fn damage(&mut self, id: ActorId, amount: i32, log: impl FnMut(String)) -> bool {
        let Some(actor) = self.actors.get_mut(id.0) else {
            return false;
        };
        life::apply_damage(&actor.name, &mut actor.health, &mut self.living, amount, log)
    }
}
