//! Command-line runner for taukin models.
//!
//! Loads a JSON description, reports its structure, and when given a run
//! time drives it through the requested stimuli and writes the recorded
//! concentrations as CSV.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod table;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{info, warn};

use taukin_engine::{SimConfig, Simulation, Stimulus, StimulusQueue};
use taukin_model::load_from_path;

pub use table::{select_columns, write_csv};

/// Command-line arguments.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "taukin")]
#[command(about = "Load, check and simulate a reduced-order kinetic model")]
pub struct Cli {
    /// Model description (JSON).
    pub model: PathBuf,

    /// Run time in seconds. Without it the model is only loaded and checked.
    #[arg(short, long, default_value_t = 0.0)]
    pub runtime: f64,

    /// Stimulus: molecule conc [start [stop]]. Repeatable. Defaults:
    /// start = 0, stop = runtime.
    #[arg(
        short,
        long,
        num_args = 1..=4,
        action = ArgAction::Append,
        value_names = ["MOL", "CONC", "START", "STOP"],
    )]
    pub stimulus: Vec<Vec<String>>,

    /// Comma-separated molecules to output. Default: all.
    #[arg(short, long, value_delimiter = ',')]
    pub plots: Vec<String>,

    /// Output step. Default: chosen from the run time.
    #[arg(long)]
    pub dt: Option<f64>,

    /// Internal integration step, at most the output step.
    #[arg(long)]
    pub internal_dt: Option<f64>,

    /// Write CSV here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the command described by `cli`.
pub fn execute(cli: &Cli) -> Result<()> {
    let loaded = load_from_path(&cli.model)
        .with_context(|| format!("failed to load model {}", cli.model.display()))?;
    let model = &loaded.model;
    info!(
        molecules = model.molecule_count(),
        reactions = model.reactions().len(),
        equations = model.equations().len(),
        depth = model.sequence_depth(),
        loops_broken = model.loops_broken(),
        "model checked"
    );

    if cli.runtime <= 0.0 {
        return Ok(());
    }

    let mut config = SimConfig::for_runtime(cli.runtime)?;
    if let Some(dt) = cli.dt {
        config.dt = dt;
    }
    config.internal_dt = cli.internal_dt;

    let scale = loaded.unit.scale();
    let mut sim = Simulation::new(loaded.model, config).context("invalid run configuration")?;

    let mut queue = StimulusQueue::new();
    let skipped = queue.extend_lossy(
        &sim,
        cli.stimulus
            .iter()
            .map(|fields| Stimulus::parse(fields.as_slice(), cli.runtime, scale)),
    );
    if skipped > 0 {
        warn!(skipped, "some stimuli were ignored");
    }

    let summary = queue.run(&mut sim, cli.runtime);
    info!(
        runtime = summary.runtime,
        events = summary.events_applied,
        rows = sim.history().len(),
        "run complete"
    );

    let columns = select_columns(sim.model(), &cli.plots);
    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            write_csv(&mut out, &sim, &columns, scale)?;
            out.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            write_csv(&mut out, &sim, &columns, scale)?;
            out.flush()?;
        }
    }
    Ok(())
}
