//! Keystone headless runner
//!
//! Loads a campaign and plays it with the seeded autopilot, logging what
//! happens. Useful for soak-testing level files.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use keystone::consts::TICK_RATE;
use keystone::sim::{Autopilot, FrameEvents};
use keystone::{BestRecords, Campaign, Session, Tuning};

/// Run a Keystone campaign without a display
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Campaign JSON file
    campaign: PathBuf,

    /// Maximum ticks to simulate
    #[arg(short, long, default_value_t = 60 * 60 * 5)]
    ticks: u64,

    /// Autopilot seed
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Tuning overrides (JSON)
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Host tick rate the tuning should be rescaled to
    #[arg(long, default_value_t = TICK_RATE)]
    tick_rate: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    keystone::logging::init(args.verbose);

    let campaign = load_campaign(&args)?;
    let tuning = load_tuning(&args)?;
    let mut session = Session::new(&campaign, tuning).context("campaign failed validation")?;
    let mut pilot = Autopilot::new(args.seed);
    let mut best = BestRecords::new();

    let mut ticks = 0;
    while ticks < args.ticks && !session.is_finished() {
        let input = pilot.next_input(session.world());
        let records_before = session.records().len();
        let events = session.advance(&input);
        report(&events);

        for record in &session.records()[records_before..] {
            best.submit(record.clone());
        }
        ticks += 1;
    }

    let world = session.world();
    log::info!(
        "Stopped after {} ticks on level {}/{} ({} death(s), {:.1}s elapsed)",
        ticks,
        session.level_index() + 1,
        session.level_count(),
        world.deaths,
        world.elapsed_secs
    );

    if !best.is_empty() {
        println!("{}", best.to_json().context("failed to serialize records")?);
    }
    Ok(())
}

fn load_campaign(args: &Args) -> Result<Campaign> {
    let json = fs::read_to_string(&args.campaign)
        .with_context(|| format!("failed to read {}", args.campaign.display()))?;
    Campaign::from_json(&json)
        .with_context(|| format!("invalid campaign {}", args.campaign.display()))
}

fn load_tuning(args: &Args) -> Result<Tuning> {
    let tuning = match &args.tuning {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Tuning::from_json(&json).with_context(|| format!("invalid tuning {}", path.display()))?
        }
        None => Tuning::default(),
    };
    Ok(tuning.rescaled(args.tick_rate))
}

fn report(events: &FrameEvents) {
    if events.is_quiet() {
        return;
    }
    for kind in &events.collected {
        log::debug!("Picked up {:?}", kind);
    }
    if events.door_opened {
        log::debug!("Door opened");
    }
    if events.damage_taken {
        log::debug!("Player hit");
    }
    if events.monster_killed {
        log::debug!("Monster down");
    }
}
