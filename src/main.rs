//! Entry point wiring CLI dispatch to the extractors.

use anyhow::Result;
use ddi_features::{cli::Cli, config::Settings, logging};
use tracing::info;

fn main() -> Result<()> {
    logging::init_tracing()?;
    let settings = Settings::load()?;
    let cli = Cli::parse();

    info!(?cli, "starting command");
    cli.dispatch(settings)
}
