use std::{io, path::PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use skirmish::api::{self, DuelResult, EncounterSummary};
use skirmish::content::{builtin_encounters, builtin_opponents};
use skirmish::encounter::Autopilot;
use skirmish::{Dice, Loot};
use skirmish_cli::{console, files, init_tracing};

#[derive(Subcommand)]
enum Cmd {
    /// Fight one opponent
    Duel {
        /// Builtin opponent id (see `list`)
        #[arg(long, conflicts_with = "opponent_file")]
        opponent: Option<String>,
        /// Opponent JSON or YAML file
        #[arg(long)]
        opponent_file: Option<PathBuf>,
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Start the player wounded
        #[arg(long)]
        player_hp: Option<i32>,
        /// Choose the player's actions from stdin instead of the autopilot
        #[arg(long)]
        interactive: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play a builtin or file-defined encounter
    Encounter {
        /// Builtin encounter id (see `list`)
        #[arg(long, conflicts_with = "file")]
        id: Option<String>,
        /// Encounter JSON or YAML file
        #[arg(long)]
        file: Option<PathBuf>,
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Start the player wounded
        #[arg(long)]
        player_hp: Option<i32>,
        /// Choose actions and targets from stdin instead of the autopilot
        #[arg(long)]
        interactive: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List builtin opponents and encounters
    List,
    /// Serialize the default player to JSON (stdout)
    ActorDump {
        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Parser)]
#[command(name = "skirmish")]
#[command(about = "Turn-based combat harness")]
struct Cli {
    /// More diagnostics on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

fn loot_list(loot: &[Loot]) -> String {
    let names: Vec<String> = loot
        .iter()
        .map(|l| match l {
            Loot::Weapon(w) => format!("{} ({})", w.name, w.damage),
            Loot::Potion => "potion".to_string(),
        })
        .collect();
    if names.is_empty() {
        "nothing".to_string()
    } else {
        names.join(", ")
    }
}

/// Journal lines not yet echoed by the interactive prompt. The `[START]`
/// line precedes the first prompt and is never echoed.
fn unseen(log: &[String], echoed: Option<usize>) -> &[String] {
    match echoed {
        Some(n) => &log[(n + 1).min(log.len())..],
        None => log,
    }
}

fn print_duel(res: &DuelResult, echoed: Option<usize>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(res)?);
        return Ok(());
    }
    for line in unseen(&res.log, echoed) {
        println!("{}", line);
    }
    println!(
        "winner={} rounds={} player_hp={} opponent_hp={} level={} loot={}",
        res.winner,
        res.rounds,
        res.player_hp_end,
        res.opponent_hp_end,
        res.player_level,
        loot_list(&res.loot)
    );
    Ok(())
}

fn print_encounter(sum: &EncounterSummary, echoed: Option<usize>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(sum)?);
        return Ok(());
    }
    for line in unseen(&sum.log, echoed) {
        println!("{}", line);
    }
    println!(
        "{}: {:?} after {} rounds | player_hp={} level={} standing={} loot={}",
        sum.name,
        sum.outcome,
        sum.rounds,
        sum.player_hp_end,
        sum.player_level,
        sum.opponents_standing,
        loot_list(&sum.loot)
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Cmd::Duel {
            opponent,
            opponent_file,
            seed,
            player_hp,
            interactive,
            json,
        } => {
            let foe = files::opponent(opponent.as_deref(), opponent_file.as_deref())?;
            let player = api::player_spec(None, player_hp);
            let dice = Dice::from_seed(seed);
            if interactive {
                let (mut actions, _) = console::console(io::stdin().lock());
                let res = api::run_duel(player, foe, dice, &mut actions)?;
                print_duel(&res, Some(actions.echoed()), json)?;
            } else {
                let res = api::run_duel(player, foe, dice, &mut Autopilot::default())?;
                print_duel(&res, None, json)?;
            }
        }
        Cmd::Encounter {
            id,
            file,
            seed,
            player_hp,
            interactive,
            json,
        } => {
            let data = files::encounter(id.as_deref(), file.as_deref())?;
            let player = api::player_spec(None, player_hp);
            let dice = Dice::from_seed(seed);
            if interactive {
                println!("== {} ==", data.name);
                if !data.description.is_empty() {
                    println!("{}", data.description);
                }
                let (mut actions, mut targets) = console::console(io::stdin().lock());
                let sum = api::run_encounter(&data, player, dice, &mut actions, &mut targets)?;
                print_encounter(&sum, Some(actions.echoed()), json)?;
            } else {
                let sum = api::run_encounter(
                    &data,
                    player,
                    dice,
                    &mut Autopilot::default(),
                    &mut Autopilot::default(),
                )?;
                print_encounter(&sum, None, json)?;
            }
        }
        Cmd::List => {
            println!("opponents:");
            for id in builtin_opponents().keys() {
                let spec = api::builtin_opponent(id)?;
                println!(
                    "  {:<18} {} [{}] {} ({})",
                    id, spec.name, spec.element, spec.weapon.name, spec.weapon.damage
                );
            }
            println!("encounters:");
            for id in builtin_encounters().keys() {
                let data = api::builtin_encounter(id)?;
                println!(
                    "  {:<18} {} ({} opponent(s))",
                    id,
                    data.name,
                    data.opponents.len()
                );
            }
        }
        Cmd::ActorDump { pretty } => {
            let player = api::default_player();
            if pretty {
                println!("{}", serde_json::to_string_pretty(&player)?);
            } else {
                println!("{}", serde_json::to_string(&player)?);
            }
        }
    }
    Ok(())
}
