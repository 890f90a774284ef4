//! CLI entry-point for entity pair feature extraction.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{config::Settings, nlp};

/// Args for the `pairs` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Directory of DDI corpus XML files.
    pub dir: PathBuf,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let stdout = std::io::stdout();
    nlp::extract_pairs(&settings, &args.dir, stdout.lock())
}
