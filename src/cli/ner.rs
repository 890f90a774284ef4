//! CLI entry-point for token feature extraction.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{config::Settings, nlp};

/// Args for the `ner` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Directory of DDI corpus XML files.
    pub dir: PathBuf,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let stdout = std::io::stdout();
    nlp::extract_ner(&settings, &args.dir, stdout.lock())
}
