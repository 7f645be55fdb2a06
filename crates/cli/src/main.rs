// Blinky - Bare-metal LED Toggle
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::Context;
use blinky_config::BoardConfig;
use clap::{Args, Parser, Subcommand};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Blinky LED toggle simulator and memory image tools",
    long_about = None
)]
struct Cli {
    /// Enable per-access debug tracing
    #[arg(short, long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the toggle loop against the simulated board and check its timing
    Simulate(SimulateArgs),
    /// Render a firmware ELF into a `$readmemh` memory image
    Hex(HexArgs),
    /// Pad a memory image with zero words up to the memory size
    Pad(PadArgs),
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Path to the board descriptor (YAML); defaults to the RV32I soft-core
    #[arg(short, long)]
    board: Option<PathBuf>,

    /// Number of toggles to run after switching the LED on
    #[arg(long)]
    toggles: Option<u64>,

    /// Counter value at power-on
    #[arg(long)]
    counter_start: Option<u32>,

    /// Counter ticks that elapse per poll
    #[arg(long)]
    poll_cost: Option<u32>,

    /// Write a JSON report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct HexArgs {
    /// Path to the firmware ELF file
    #[arg(short, long)]
    firmware: PathBuf,

    /// Output hex image
    #[arg(short, long)]
    output: PathBuf,

    /// Memory size in 32-bit words
    #[arg(long, default_value_t = blinky_loader::DEFAULT_MEMORY_WORDS)]
    words: usize,
}

#[derive(Args, Debug)]
struct PadArgs {
    /// Hex image to pad in place
    file: PathBuf,

    /// Memory size in 32-bit words
    #[arg(long, default_value_t = blinky_loader::DEFAULT_MEMORY_WORDS)]
    words: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    match cli.command {
        Command::Simulate(args) => simulate(args),
        Command::Hex(args) => hex(args),
        Command::Pad(args) => pad(args),
    }
}

fn simulate(args: SimulateArgs) -> anyhow::Result<()> {
    info!("Starting Blinky Simulator");

    let mut board = if let Some(path) = &args.board {
        info!("Loading board descriptor: {:?}", path);
        BoardConfig::from_file(path)?
    } else {
        info!("Using default hardware configuration");
        BoardConfig::default()
    };

    if let Some(toggles) = args.toggles {
        board.simulation.toggles = toggles;
    }
    if let Some(start) = args.counter_start {
        board.simulation.counter_start = start;
    }
    if let Some(cost) = args.poll_cost {
        board.simulation.poll_cost_us = cost;
    }
    board.validate()?;

    let metrics = Arc::new(blinky_core::metrics::ToggleMetrics::new());
    let mut machine = blinky_core::Machine::from_config(&board)?;
    machine.observers.push(metrics.clone());

    let report = machine
        .run(board.simulation.toggles)
        .context("Simulation aborted")?;

    info!(
        "{} toggles, interval {}..{} ticks (nominal {}), {:.1} polls per toggle",
        report.toggles,
        report.min_interval.unwrap_or(0),
        report.max_interval.unwrap_or(0),
        report.interval_us,
        metrics.get_polls_per_toggle()
    );
    info!("Host speed: {:.0} polls/s", metrics.get_polls_per_sec());

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {:?}", path))?;
        info!("Report written to {:?}", path);
    }

    report.verify().context("LED timing check failed")?;
    info!("LED timing check passed");
    Ok(())
}

fn hex(args: HexArgs) -> anyhow::Result<()> {
    info!("Loading firmware: {:?}", args.firmware);
    let program = blinky_loader::load_elf(&args.firmware)?;
    match program.end_addr() {
        Some(end) => info!(
            "Entry Point: {:#x}, image ends at {:#x}",
            program.entry_point, end
        ),
        None => warn!(
            "Entry Point: {:#x}, a segment runs past the end of the address space",
            program.entry_point
        ),
    }

    let image = blinky_loader::render_hex(&program, args.words)?;
    std::fs::write(&args.output, &image)
        .with_context(|| format!("Failed to write hex image to {:?}", args.output))?;

    let digest = Sha256::digest(image.as_bytes());
    info!(
        "Wrote {} words to {:?} (sha256 {:x})",
        args.words, args.output, digest
    );
    Ok(())
}

fn pad(args: PadArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read hex image {:?}", args.file))?;
    let before = text.lines().count();
    if before > args.words {
        warn!(
            "{:?} already holds {} words, more than the {}-word memory",
            args.file,
            before,
            args.words
        );
    }

    let padded = blinky_loader::pad_hex(&text, args.words);
    if padded != text {
        std::fs::write(&args.file, &padded)
            .with_context(|| format!("Failed to write hex image {:?}", args.file))?;
    }
    info!(
        "{:?}: {} -> {} words",
        args.file,
        before,
        padded.lines().count()
    );
    Ok(())
}
