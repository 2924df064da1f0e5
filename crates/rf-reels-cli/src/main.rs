//! Headless reel spin runner
//!
//! Usage:
//!   rf-reels --spins 5 --seed 42
//!   rf-reels --profile turbo --fix 0:1:CHERRY --json
//!   rf-reels --config reels.yaml --cash 3

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use rf_reels::{
    CashBalance, DEFAULT_CASH, FixedSymbol, FixerService, FixerSettings, ReelConfig, ResultGrid,
    SpinController, TimingConfig, TimingProfile, TriggerResponse,
};

#[derive(Parser)]
#[command(name = "rf-reels", about = "Run reel spins headlessly and print the result grids")]
struct Cli {
    /// Number of spins to run
    #[arg(short, long, default_value_t = 1)]
    spins: u32,

    /// Seed for reproducible symbol draws
    #[arg(long)]
    seed: Option<u64>,

    /// Reel config file (.yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Timing profile, overrides the config file
    #[arg(short, long, value_enum)]
    profile: Option<ProfileArg>,

    /// Starting cash
    #[arg(long, default_value_t = DEFAULT_CASH)]
    cash: i64,

    /// Force a cell, as reel:row:SYMBOL (repeatable)
    #[arg(long = "fix")]
    fixes: Vec<FixedSymbol>,

    /// Print one JSON report per spin
    #[arg(long)]
    json: bool,

    /// Give up on a spin after this many frames
    #[arg(long, default_value_t = 10_000)]
    max_frames: u32,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProfileArg {
    Normal,
    Turbo,
    Mobile,
    Studio,
}

impl From<ProfileArg> for TimingProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Normal => TimingProfile::Normal,
            ProfileArg::Turbo => TimingProfile::Turbo,
            ProfileArg::Mobile => TimingProfile::Mobile,
            ProfileArg::Studio => TimingProfile::Studio,
        }
    }
}

#[derive(Serialize)]
struct SpinReport<'a> {
    spin: u64,
    frames: u32,
    grid: &'a ResultGrid,
    cash: i64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ReelConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ReelConfig::default(),
    };
    if let Some(profile) = cli.profile {
        config.timing = TimingConfig::from_profile(profile.into());
    }

    let balance = CashBalance::new(cli.cash);
    let fixer = FixerService::new();
    if !cli.fixes.is_empty() {
        fixer.set_settings(Some(FixerSettings::new(cli.fixes.clone())));
    }

    let (tx, rx) = crossbeam_channel::unbounded();
    let controller = match cli.seed {
        Some(seed) => SpinController::with_seed(config, balance.clone(), tx, seed),
        None => SpinController::new(config, balance.clone(), tx),
    }
    .context("Failed to build spin controller")?;
    let mut controller = controller.with_fixer(&fixer);

    log::info!(
        "Running {} spin(s) on {} reels, cash {}",
        cli.spins,
        controller.reels().len(),
        balance.cash()
    );

    for _ in 0..cli.spins {
        match controller.press_spin()? {
            TriggerResponse::Started => {}
            TriggerResponse::Locked => {
                println!("Out of cash after {} spin(s)", controller.spin_count());
                break;
            }
            TriggerResponse::AlreadySpinning => bail!("previous spin still running"),
        }

        let mut frames = 0;
        while controller.is_spinning() {
            if frames >= cli.max_frames {
                bail!("spin {} did not stop within {} frames", controller.spin_count(), frames);
            }
            controller.advance_frame();
            frames += 1;
        }

        let Ok(grid) = rx.try_recv() else {
            log::warn!("Spin {} finished without a result", controller.spin_count());
            continue;
        };

        if cli.json {
            let report = SpinReport {
                spin: controller.spin_count(),
                frames,
                grid: &grid,
                cash: balance.cash(),
            };
            println!("{}", serde_json::to_string(&report)?);
        } else {
            println!(
                "Spin {} ({} frames, cash {})\n{}\n",
                controller.spin_count(),
                frames,
                balance.cash(),
                grid
            );
        }
    }

    Ok(())
}
