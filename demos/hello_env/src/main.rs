//! `hello-env` entry point: resolve options through the environment overlay,
//! then print the greeting.

use env_overlay::EnvOverlay;
use tracing_subscriber::EnvFilter;

use hello_env::cli::GreetCli;
use hello_env::error::Result;
use hello_env::message::{build_plan, print_plan};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    run().map_err(color_eyre::eyre::Report::from)
}

fn run() -> Result<()> {
    let overlay = EnvOverlay::new("hello-env", env!("CARGO_PKG_VERSION"));
    let cli: GreetCli = overlay.parse_typed();
    tracing::debug!(?cli, "resolved options");
    let plan = build_plan(&cli)?;
    print_plan(&plan)?;
    Ok(())
}
