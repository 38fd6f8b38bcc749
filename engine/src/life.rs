use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeState {
    Alive,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub(crate) hp: i32,
    pub(crate) max_hp: i32,
    pub(crate) state: LifeState,
}

impl Health {
    pub fn new(max_hp: i32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            state: LifeState::Alive,
        }
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn state(&self) -> LifeState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == LifeState::Alive
    }

    /// Raise the ceiling; never lowers it. Current health is left alone.
    pub(crate) fn raise_max(&mut self, max_hp: i32) {
        self.max_hp = self.max_hp.max(max_hp);
    }
}

/// Number of constructed actors that are still alive.
///
/// Only spawning and the alive→dead transition in [`apply_damage`] move it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LiveCounter(usize);

impl LiveCounter {
    pub fn count(&self) -> usize {
        self.0
    }

    pub(crate) fn spawned(&mut self) {
        self.0 += 1;
    }

    fn died(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }
}

/// Apply damage and handle the drop-to-0 transition. Returns true if the
/// creature died this call. Damage to the dead is ignored.
pub fn apply_damage(
    name: &str,
    health: &mut Health,
    living: &mut LiveCounter,
    dmg: i32,
    mut log: impl FnMut(String),
) -> bool {
    if !health.is_alive() {
        return false;
    }

    let before = health.hp;
    health.hp = health.hp.saturating_sub(dmg);
    if health.hp > 0 {
        log(format!(
            "[DMG][{}] {} → {} (−{}) of {}",
            name, before, health.hp, dmg, health.max_hp
        ));
        return false;
    }

    health.hp = 0;
    health.state = LifeState::Dead;
    living.died();
    log(format!("[DMG][{}] {} → 0 (−{})", name, before, dmg));
    log(format!("[STATE][{}] falls → Dead", name));
    tracing::debug!(actor = name, damage = dmg, "actor died");
    true
}

/// Healing, capped at max. Returns how much was actually restored.
pub fn heal(name: &str, health: &mut Health, amount: i32, mut log: impl FnMut(String)) -> i32 {
    if amount <= 0 || !health.is_alive() {
        return 0;
    }
    let before = health.hp;
    health.hp = health.hp.saturating_add(amount).min(health.max_hp);
    let restored = health.hp - before;
    log(format!(
        "[HEAL][{}] +{} HP ({} → {})",
        name, restored, before, health.hp
    ));
    restored
}
