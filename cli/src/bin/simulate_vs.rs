use std::path::PathBuf;

use clap::Parser;
use skirmish::api;
use skirmish_cli::{files, init_tracing};

#[derive(Parser)]
#[command(name = "simulate-vs")]
#[command(about = "Monte Carlo sim: many autopilot duels vs one opponent")]
struct Args {
    /// Builtin opponent id
    #[arg(long, conflicts_with = "opponent_file")]
    opponent: Option<String>,

    /// Opponent JSON or YAML file
    #[arg(long)]
    opponent_file: Option<PathBuf>,

    /// Number of trials
    #[arg(long, default_value_t = 1000)]
    trials: u32,

    /// RNG base seed (trial i uses seed+i)
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Start the player wounded in every trial
    #[arg(long)]
    player_hp: Option<i32>,

    /// More diagnostics on stderr
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let foe = files::opponent(args.opponent.as_deref(), args.opponent_file.as_deref())?;
    let player = api::player_spec(None, args.player_hp);
    let stats = api::duel_stats(&player, &foe, args.seed, args.trials)?;

    println!("simulate-vs results");
    println!("-------------------");
    println!("trials:             {}", stats.samples);
    println!(
        "opponent:           {} [{}] {} ({})",
        foe.name, foe.element, foe.weapon.name, foe.weapon.damage
    );
    println!("player:             {} ({})", player.name, player.weapon.name);
    println!();
    println!("win rate:           {:.1}%", stats.win_rate * 100.0);
    println!("player wins:        {}", stats.player_wins);
    println!("opponent wins:      {}", stats.opponent_wins);
    println!("avg rounds:         {:.2}", stats.avg_rounds);
    println!("median rounds:      {}", stats.median_rounds);

    Ok(())
}
