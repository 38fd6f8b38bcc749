use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod actor;
pub mod api;
pub mod combat;
pub mod content;
pub mod element;
pub mod encounter;
pub mod error;
pub mod life;
pub mod progression;
pub mod session;
pub mod stats;
pub mod status;

pub use actor::{Actor, ActorId, ActorSpec, Role, Roster};
pub use combat::actions::HealOutcome;
pub use combat::attack::{AttackReport, Defense, DefenseReport, StrikeKind, StrikeReport};
pub use element::Element;
pub use encounter::{
    ActionProvider, EncounterResult, Loot, Outcome, PlayerAction, TargetProvider, TurnView,
};
pub use error::Rejected;
pub use life::{Health, LifeState, LiveCounter};
pub use progression::{LevelUp, Upgrade};
pub use session::Session;
pub use stats::{Attributes, Weapon};
pub use status::{EffectKind, StatusEffect, StatusLedger, TickReport};

/// Value every draw yields once a scripted queue runs dry. High enough that
/// every percentage check in the rules fails.
pub const SCRIPT_EXHAUSTED: u32 = 99;

enum Source {
    Seeded(ChaCha8Rng),
    Scripted(VecDeque<u32>),
}

/// The single random source threaded through every resolution call.
pub struct Dice {
    source: Source,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Replay a fixed roll sequence. Each draw takes the next value reduced
    /// modulo the draw's bound; an exhausted queue yields [`SCRIPT_EXHAUSTED`].
    pub fn from_scripted(rolls: Vec<u32>) -> Self {
        Self {
            source: Source::Scripted(rolls.into()),
        }
    }

    fn draw(&mut self, bound: u32) -> u32 {
        debug_assert!(bound > 0);
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_range(0..bound),
            Source::Scripted(queue) => queue.pop_front().unwrap_or(SCRIPT_EXHAUSTED) % bound,
        }
    }

    /// Percentile roll in `0..100`.
    pub fn percent(&mut self) -> u32 {
        self.draw(100)
    }

    /// Succeeds with `pct` percent probability. Always consumes a draw, so the
    /// roll sequence does not depend on the chance being zero.
    pub fn chance(&mut self, pct: u32) -> bool {
        self.percent() < pct
    }

    /// Uniform index in `0..len`. Returns 0 without drawing for empty choices.
    pub fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let bound = u32::try_from(len).unwrap_or(u32::MAX);
        self.draw(bound) as usize
    }

    /// Uniform value in `lo..=hi`.
    pub fn range(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        lo + self.draw((hi - lo).saturating_add(1))
    }

    /// Rolls left in a scripted queue; `None` for seeded dice.
    pub fn scripted_remaining(&self) -> Option<usize> {
        match &self.source {
            Source::Seeded(_) => None,
            Source::Scripted(queue) => Some(queue.len()),
        }
    }
}
