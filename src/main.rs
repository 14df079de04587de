//! Plinko Drop headless driver
//!
//! Runs the game core on a simulated 60 Hz clock: auto-play a session, or
//! drop many tokens to check a board's slot distribution.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use plinko_drop::consts::TICK_RATE_HZ;
use plinko_drop::sim::{Board, BoardConfig, Game, PhaseKind, RiskTier, simulate_drop};
use plinko_drop::{Currency, GameConfig};

/// Upper bound on ticks for one drop before it is reported as stuck
const MAX_DROP_TICKS: u32 = 60 * TICK_RATE_HZ;

#[derive(Parser)]
#[command(name = "plinko-drop", about = "Plinko Drop game core driver")]
struct Cli {
    /// JSON config file (fields not given use defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the RNG seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Override peg rows (8, 10, 12, 14, 16)
    #[arg(long, global = true)]
    rows: Option<u8>,

    /// Override risk tier (low, medium, high)
    #[arg(long, global = true)]
    risk: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Auto-play rounds with a fixed bet
    Play {
        /// Rounds to play (stops early when broke)
        #[arg(short = 'n', long, default_value_t = 10)]
        rounds: u32,

        /// Bet per round, as typed into the bet box
        #[arg(short, long, default_value = "10")]
        bet: String,

        /// Currency code (USD, BTC, ...)
        #[arg(long)]
        currency: Option<String>,
    },
    /// Drop many tokens and print the slot histogram
    Histogram {
        #[arg(short = 'n', long, default_value_t = 1000)]
        drops: u32,
    },
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(rows) = cli.rows {
        config.rows = rows;
    }
    if let Some(risk) = &cli.risk {
        config.risk = RiskTier::parse(risk)?;
    }
    config.validate()?;
    Ok(config)
}

fn play(config: GameConfig, rounds: u32, bet: &str, currency: Option<&str>) -> Result<()> {
    let mut game = Game::new(config)?;
    if let Some(code) = currency {
        let Some(currency) = Currency::from_code(code) else {
            bail!("Unknown currency: {}", code);
        };
        game.set_currency(currency)?;
    }
    let frame = Duration::from_secs(1) / TICK_RATE_HZ;

    for _ in 0..rounds {
        if game.bet().is_zero() {
            if let Err(err) = game.select_bet(bet) {
                log::warn!("Stopping: {}", err);
                break;
            }
        }
        if let Err(err) = game.start() {
            log::warn!("Stopping: {}", err);
            break;
        }

        // Both clocks advance once per frame until betting reopens
        let mut ticks = 0;
        while game.phase_kind() != PhaseKind::Betting {
            game.advance_clock(frame);
            game.tick();
            ticks += 1;
            if ticks > MAX_DROP_TICKS * 2 {
                bail!("Round did not finish after {} frames", ticks);
            }
        }
        println!("{}", game.status());
    }

    let history = game.history();
    let currency = game.currency();
    println!();
    println!("Games played:   {}", history.games_played());
    println!("Total staked:   {}", history.total_staked().display(currency));
    println!("Total returned: {}", history.total_returned().display(currency));
    println!("Total won:      {}", game.total_won().display(currency));
    println!("Balance:        {}", game.balance().display(currency));
    if let Some(best) = history.biggest_win() {
        println!(
            "Biggest win:    {} (round {}, {})",
            best.payout.winnings.display(currency),
            best.round,
            best.payout.multiplier
        );
    }
    Ok(())
}

fn histogram(config: GameConfig, drops: u32) -> Result<()> {
    let board = Board::generate(BoardConfig::new(config.rows, config.risk)?)?;
    let mut rng = Pcg32::seed_from_u64(config.seed);
    let mut counts = vec![0u32; board.slots.len()];
    for i in 0..drops {
        let slot = simulate_drop(&board, &mut rng, MAX_DROP_TICKS)
            .with_context(|| format!("Drop {} did not settle", i))?;
        counts[slot] += 1;
    }

    // Return per unit staked, from the multipliers in hundredths
    let returned: u64 = counts
        .iter()
        .zip(&board.slots)
        .map(|(n, s)| *n as u64 * s.multiplier.hundredths() as u64)
        .sum();
    println!(
        "{} rows, {} risk, {} drops",
        config.rows, config.risk, drops
    );
    for (slot, n) in board.slots.iter().zip(&counts) {
        let share = *n as f64 / drops.max(1) as f64;
        println!(
            "{:>8} {:>6} {:5.1}% {}",
            slot.multiplier.to_string(),
            n,
            share * 100.0,
            "#".repeat((share * 100.0).round() as usize)
        );
    }
    println!(
        "Return to player: {:.2}%",
        returned as f64 / drops.max(1) as f64
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    log::info!("Plinko Drop (native) starting...");

    match cli.command {
        Commands::Play {
            rounds,
            ref bet,
            ref currency,
        } => play(config, rounds, bet, currency.as_deref()),
        Commands::Histogram { drops } => histogram(config, drops),
    }
}
