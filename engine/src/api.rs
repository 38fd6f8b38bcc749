use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::actor::{ActorSpec, Role};
use crate::content::{builtin_encounters, builtin_opponents};
use crate::encounter::{ActionProvider, Autopilot, Loot, Outcome, TargetProvider};
use crate::stats::Weapon;
use crate::{Dice, Session};

pub const DEFAULT_PLAYER_NAME: &str = "Adventurer";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DuelConfig {
    #[serde(default)]
    pub opponent_id: Option<String>,
    #[serde(default)]
    pub opponent_path: Option<String>,
    /// Falls back to [`default_player`].
    #[serde(default)]
    pub player: Option<ActorSpec>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub player_hp: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DuelResult {
    pub winner: String,
    pub rounds: u32,
    pub player_hp_end: i32,
    pub opponent_hp_end: i32,
    pub player_level: u32,
    pub loot: Vec<Loot>,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuelStats {
    pub samples: u32,
    pub player_wins: u32,
    pub opponent_wins: u32,
    pub win_rate: f64,
    pub avg_rounds: f64,
    pub median_rounds: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EncounterConfig {
    #[serde(default)]
    pub encounter_id: Option<String>,
    #[serde(default)]
    pub encounter_path: Option<String>,
    #[serde(default)]
    pub player: Option<ActorSpec>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub player_hp: Option<i32>,
}

/// An opponent either by builtin id or spelled out in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpponentRef {
    Id(String),
    Inline(ActorSpec),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterData {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub opponents: Vec<OpponentRef>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EncounterSummary {
    pub name: String,
    pub outcome: Outcome,
    pub rounds: u32,
    pub player_hp_end: i32,
    pub player_level: u32,
    pub opponents_standing: usize,
    pub loot: Vec<Loot>,
    pub log: Vec<String>,
}

/// The adventurer every run starts with unless a config supplies one.
pub fn default_player() -> ActorSpec {
    ActorSpec::controlled(DEFAULT_PLAYER_NAME, Weapon::new("Fists", 5))
}

/// The controlled actor for a run: `player` or the default adventurer,
/// optionally starting wounded.
pub fn player_spec(player: Option<ActorSpec>, hp: Option<i32>) -> ActorSpec {
    let mut spec = player.unwrap_or_else(default_player);
    spec.role = Role::Controlled;
    if hp.is_some() {
        spec.health = hp;
    }
    spec
}

pub fn simulate_duel(cfg: DuelConfig) -> Result<DuelResult> {
    let opponent = resolve_opponent(cfg.opponent_id.as_deref(), cfg.opponent_path.as_deref())?;
    let player = player_spec(cfg.player, cfg.player_hp);
    run_duel(player, opponent, Dice::from_seed(cfg.seed), &mut Autopilot::default())
}

/// One-on-one fight with player decisions from `actions`.
pub fn run_duel(
    player: ActorSpec,
    opponent: ActorSpec,
    dice: Dice,
    actions: &mut impl ActionProvider,
) -> Result<DuelResult> {
    let mut session = Session::new(dice);
    let player = session.new_actor(player);
    let enemy = session.new_actor(opponent);

    let result = session.run_single_encounter(player, enemy, actions)?;
    let (player_hp_end, player_level) = {
        let hero = session.roster().actor(player)?;
        (hero.hp(), hero.level())
    };
    let opponent_hp_end = session.roster().actor(enemy)?.hp();
    let winner = match result.outcome {
        Outcome::Victory => "player",
        Outcome::Defeat => "opponent",
    };

    Ok(DuelResult {
        winner: winner.to_string(),
        rounds: result.rounds,
        player_hp_end,
        opponent_hp_end,
        player_level,
        loot: result.loot,
        log: session.take_journal(),
    })
}

/// Run `samples` duels on consecutive seeds starting at `cfg.seed`.
pub fn simulate_duel_many(cfg: DuelConfig, samples: u32) -> Result<DuelStats> {
    let opponent = resolve_opponent(cfg.opponent_id.as_deref(), cfg.opponent_path.as_deref())?;
    let player = player_spec(cfg.player, cfg.player_hp);
    duel_stats(&player, &opponent, cfg.seed, samples)
}

pub fn duel_stats(
    player: &ActorSpec,
    opponent: &ActorSpec,
    seed: u64,
    samples: u32,
) -> Result<DuelStats> {
    if samples == 0 {
        bail!("samples must be at least 1");
    }
    let mut player_wins = 0u32;
    let mut rounds = Vec::with_capacity(samples as usize);
    for i in 0..samples {
        let dice = Dice::from_seed(seed.wrapping_add(u64::from(i)));
        let res = run_duel(player.clone(), opponent.clone(), dice, &mut Autopilot::default())
            .with_context(|| format!("trial {} failed", i))?;
        if res.winner == "player" {
            player_wins += 1;
        }
        rounds.push(res.rounds);
    }
    rounds.sort_unstable();
    let total: u64 = rounds.iter().map(|&r| u64::from(r)).sum();
    let mid = rounds.len() / 2;
    let median_rounds = if rounds.len() % 2 == 1 {
        rounds[mid]
    } else {
        (rounds[mid - 1] + rounds[mid]) / 2
    };
    tracing::info!(samples, player_wins, "duel batch finished");
    Ok(DuelStats {
        samples,
        player_wins,
        opponent_wins: samples - player_wins,
        win_rate: f64::from(player_wins) / f64::from(samples),
        avg_rounds: total as f64 / f64::from(samples),
        median_rounds,
    })
}

pub fn simulate_encounter(cfg: EncounterConfig) -> Result<EncounterSummary> {
    let data = resolve_encounter(cfg.encounter_id.as_deref(), cfg.encounter_path.as_deref())?;
    let player = player_spec(cfg.player, cfg.player_hp);
    let mut actions = Autopilot::default();
    let mut targets = Autopilot::default();
    run_encounter(
        &data,
        player,
        Dice::from_seed(cfg.seed),
        &mut actions,
        &mut targets,
    )
}

/// Play an encounter: one opponent runs in strict alternation, several in
/// group mode with `targets` picking who to hit.
pub fn run_encounter(
    data: &EncounterData,
    player: ActorSpec,
    dice: Dice,
    actions: &mut impl ActionProvider,
    targets: &mut impl TargetProvider,
) -> Result<EncounterSummary> {
    let specs = encounter_opponents(data)?;

    let mut session = Session::new(dice);
    let player = session.new_actor(player);
    let foes: Vec<_> = specs.into_iter().map(|s| session.new_actor(s)).collect();

    let result = match foes.as_slice() {
        [only] => session.run_single_encounter(player, *only, actions)?,
        many => session.run_group_encounter(player, many, actions, targets)?,
    };

    let (player_hp_end, player_level) = {
        let hero = session.roster().actor(player)?;
        (hero.hp(), hero.level())
    };
    let opponents_standing = foes
        .iter()
        .filter(|&&f| session.roster().is_alive(f))
        .count();
    Ok(EncounterSummary {
        name: data.name.clone(),
        outcome: result.outcome,
        rounds: result.rounds,
        player_hp_end,
        player_level,
        opponents_standing,
        loot: result.loot,
        log: session.take_journal(),
    })
}

/// Resolve every opponent reference of an encounter to a spec.
pub fn encounter_opponents(data: &EncounterData) -> Result<Vec<ActorSpec>> {
    if data.opponents.is_empty() {
        bail!("encounter '{}' has no opponents", data.name);
    }
    data.opponents.iter().map(opponent_from_ref).collect()
}

fn resolve_opponent(id: Option<&str>, path: Option<&str>) -> Result<ActorSpec> {
    match (id, path) {
        (Some(id), _) => builtin_opponent(id),
        (None, Some(path)) => load_opponent(path),
        (None, None) => bail!("either opponent_id or opponent_path is required"),
    }
}

fn resolve_encounter(id: Option<&str>, path: Option<&str>) -> Result<EncounterData> {
    match (id, path) {
        (Some(id), _) => builtin_encounter(id),
        (None, Some(path)) => load_encounter(path),
        (None, None) => bail!("either encounter_id or encounter_path is required"),
    }
}

fn opponent_from_ref(r: &OpponentRef) -> Result<ActorSpec> {
    match r {
        OpponentRef::Id(id) => builtin_opponent(id),
        OpponentRef::Inline(spec) => as_opponent(spec.clone()),
    }
}

pub fn builtin_opponent(id: &str) -> Result<ActorSpec> {
    let text = builtin_opponents()
        .get(id)
        .copied()
        .ok_or_else(|| anyhow!("unknown opponent id '{}'", id))?;
    let spec: ActorSpec = serde_json::from_str(text)
        .with_context(|| format!("failed to parse builtin opponent: {}", id))?;
    as_opponent(spec)
}

pub fn builtin_encounter(id: &str) -> Result<EncounterData> {
    let text = builtin_encounters()
        .get(id)
        .copied()
        .ok_or_else(|| anyhow!("unknown encounter id '{}'", id))?;
    serde_json::from_str(text).with_context(|| format!("failed to parse builtin encounter: {}", id))
}

pub fn load_opponent(path: &str) -> Result<ActorSpec> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read opponent: {}", path))?;
    parse_opponent(path, &text)
}

pub fn load_encounter(path: &str) -> Result<EncounterData> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read encounter: {}", path))?;
    parse_encounter(path, &text)
}

/// Parse opponent text already read from `path`.
pub fn parse_opponent(path: &str, text: &str) -> Result<ActorSpec> {
    let spec: ActorSpec = parse_content(path, text)?;
    as_opponent(spec).with_context(|| format!("invalid opponent: {}", path))
}

/// Loaded opponents always fight on the opposing side and need positive attributes.
fn as_opponent(mut spec: ActorSpec) -> Result<ActorSpec> {
    if !spec.attributes.is_positive() {
        bail!(
            "'{}' has attributes {:?}; every attribute must be at least 1",
            spec.name,
            spec.attributes
        );
    }
    spec.role = Role::Opponent;
    Ok(spec)
}

pub fn parse_encounter(path: &str, text: &str) -> Result<EncounterData> {
    parse_content(path, text)
}

/// YAML for `.yaml`/`.yml`, JSON otherwise.
pub fn parse_content<T: DeserializeOwned>(path: &str, text: &str) -> Result<T> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("yaml" | "yml") => {
            serde_yaml::from_str(text).with_context(|| format!("failed to parse YAML: {}", path))
        }
        _ => serde_json::from_str(text).with_context(|| format!("failed to parse JSON: {}", path)),
    }
}
