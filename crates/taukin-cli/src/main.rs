//! `taukin` - load, check and run a reduced-order kinetic model.
//!
//! Logs go to stderr (filter with `RUST_LOG`, default `taukin=info`);
//! the concentration table goes to stdout or `--output`.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taukin_cli::{execute, Cli};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taukin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    execute(&cli)
}
