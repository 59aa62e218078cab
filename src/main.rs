//! Headless runner
//!
//! Plays a match with the demo pilot and reports the outcome. Useful for
//! balance checks and for reproducing a run from its seed.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use nebula_strike::consts::{DEFAULT_SEED, FRAME_MS};
use nebula_strike::{Clock, Engine, ManualClock, SystemClock, Tuning, Viewport};

#[derive(Parser, Debug)]
#[command(name = "nebula-strike")]
#[command(about = "Run a headless Nebula Strike match with the demo pilot")]
struct Cli {
    /// Ticks to simulate
    #[arg(long, default_value_t = 3600)]
    frames: u64,
    /// Run seed, decimal or 0x-prefixed hex
    #[arg(long)]
    seed: Option<String>,
    /// JSON balance table; missing fields keep their defaults
    #[arg(long)]
    tuning: Option<PathBuf>,
    #[arg(long, default_value_t = 800.0)]
    width: f32,
    #[arg(long, default_value_t = 600.0)]
    height: f32,
    /// Pace ticks against the real clock instead of simulated time
    #[arg(long)]
    realtime: bool,
    /// Print the final frame as JSON
    #[arg(long)]
    json: bool,
}

fn parse_seed(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    };
    parsed.map_err(|e| anyhow!("invalid seed '{raw}': {e}"))
}

/// Tick until the frame budget runs out or the match ends
fn play<C: Clock>(engine: &mut Engine<C>, frames: u64, mut pace: impl FnMut(&C, u64)) {
    engine.set_autopilot(true);
    engine.start();
    for frame in 1..=frames {
        pace(engine.clock(), frame);
        if !engine.advance() || engine.state().is_game_complete() {
            break;
        }
    }
}

fn report<C: Clock>(engine: &Engine<C>, json: bool) -> Result<()> {
    let state = engine.state();
    log::info!(
        "Finished after {} frames: score {}, round {}, lives {}",
        state.frame_count,
        state.score,
        state.rounds.current_round(),
        state.lives
    );
    if json {
        let out = serde_json::to_string_pretty(&engine.snapshot()).context("serializing snapshot")?;
        println!("{out}");
    } else {
        let outcome = if state.is_game_complete() {
            "all rounds cleared"
        } else if state.game_over {
            "game over"
        } else {
            "frame budget reached"
        };
        println!(
            "{outcome}: score={} round={} lives={} frames={}",
            state.score,
            state.rounds.current_round(),
            state.lives,
            state.frame_count
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let seed = cli.seed.as_deref().map(parse_seed).transpose()?.unwrap_or(DEFAULT_SEED);
    let tuning = match &cli.tuning {
        Some(path) => Tuning::load(path).with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };
    let surface = Some(Viewport::new(cli.width, cli.height));

    if cli.realtime {
        let mut engine = Engine::new(surface, tuning, SystemClock::new(), seed)?;
        let frame = Duration::from_secs_f64(FRAME_MS / 1000.0);
        play(&mut engine, cli.frames, |_, _| std::thread::sleep(frame));
        report(&engine, cli.json)
    } else {
        let mut engine = Engine::new(surface, tuning, ManualClock::new(0), seed)?;
        play(&mut engine, cli.frames, |clock, frame| {
            clock.set((frame as f64 * FRAME_MS) as u64);
        });
        report(&engine, cli.json)
    }
}
