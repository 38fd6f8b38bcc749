use thiserror::Error;

use crate::actor::ActorId;

/// An action the engine refused. Always recoverable: nothing was mutated and
/// the caller decides what to do next.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("no actor with id {0}")]
    UnknownActor(ActorId),
    #[error("{name} is dead and cannot act")]
    ActorDead { name: String },
    #[error("{name} is already dead")]
    TargetDead { name: String },
    #[error("{name} cannot target itself")]
    SelfTarget { name: String },
    #[error("{name} has no potions left")]
    NoPotions { name: String },
    #[error("{name} does not carry an inventory")]
    NotControlled { name: String },
    #[error("{name} has no weapon in slot {slot}")]
    NoSuchSlot { name: String, slot: usize },
}
