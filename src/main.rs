//! Play a game at the terminal.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rust_monopoly::console::{ConsoleDecisions, ConsoleObserver};
use rust_monopoly::core::{GameConfig, PlayerId};
use rust_monopoly::dice::ScriptedDice;
use rust_monopoly::input::{DecisionProvider, Prompt};
use rust_monopoly::session::SessionBuilder;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Property-trading board game for 2-8 players
#[derive(Parser, Debug)]
#[command(name = "monopoly")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Number of players (2-8)
    #[arg(short, long, default_value_t = 2)]
    players: usize,

    /// Player name; repeat once per seat. Missing names are asked for.
    #[arg(short, long = "name")]
    names: Vec<String>,

    /// Seed for dice and deck shuffles
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Starting cash per player
    #[arg(long, default_value_t = 1500)]
    cash: i64,

    /// Credit for passing Go (0 disables it)
    #[arg(long, default_value_t = 0)]
    go_bonus: i64,

    /// Replay dice from a file of face pairs instead of rolling
    #[arg(long)]
    dice_script: Option<PathBuf>,

    /// Roll to decide who goes first
    #[arg(long)]
    roll_for_order: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = GameConfig::new(cli.players)
        .with_starting_cash(cli.cash)
        .with_pass_go_bonus(cli.go_bonus)
        .with_seed(cli.seed);
    config.validate()?;

    let mut decisions = ConsoleDecisions::stdio();
    let mut names = cli.names;
    names.truncate(cli.players);
    while names.len() < cli.players {
        let seat = PlayerId::new(u8::try_from(names.len())?);
        names.push(decisions.ask_text(&Prompt::PlayerName { seat })?);
    }

    let mut builder = SessionBuilder::with_config(config)
        .names(names)
        .decisions(decisions)
        .observer(ConsoleObserver::stdout())
        .roll_for_order(cli.roll_for_order);
    if let Some(path) = cli.dice_script {
        let script = std::fs::read_to_string(&path)
            .with_context(|| format!("reading dice script {}", path.display()))?;
        builder = builder.dice(ScriptedDice::parse(&script)?);
    }

    let mut session = builder.build()?;
    let outcome = session.run()?;
    info!(winner = %outcome.winner, rounds = outcome.rounds, "finished");
    Ok(())
}
