//! Command-line interface wiring for ddi-features.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod ner;
pub mod pairs;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Feature extraction for drug NER and DDI classification",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Ner(args) => ner::run(args, settings),
            Commands::Pairs(args) => pairs::run(args, settings),
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Emit per-token BIO tags and features for every corpus file.
    Ner(ner::Args),
    /// Emit per-pair interaction labels and features for every corpus file.
    Pairs(pairs::Args),
}
