//! Runtime configuration utilities for ddi-features.

use std::{env, path::PathBuf};

use anyhow::Context;

use crate::nlp::relation::BetweenWalk;

/// Extractor configuration resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// DrugBank lexicon, one `name|type` entry per line.
    pub drugbank_path: PathBuf,
    /// HSDB lexicon, one name per line.
    pub hsdb_path: PathBuf,
    /// Folder holding `<stem>.conllu` parses. Falls back to the corpus folder.
    pub parse_dir: Option<PathBuf>,
    /// How the pair extractor walks the tokens between two entity heads.
    pub between_walk: BetweenWalk,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let resources_dir = env::var("DDI_RESOURCES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./resources"));
        let drugbank_path = env::var("DDI_DRUGBANK_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| resources_dir.join("DrugBank.txt"));
        let hsdb_path = env::var("DDI_HSDB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| resources_dir.join("hsdb.txt"));
        let parse_dir = env::var("DDI_PARSE_DIR").ok().map(PathBuf::from);
        let between_walk = match env::var("DDI_BETWEEN_WALK") {
            Ok(raw) => raw.parse().context("parsing DDI_BETWEEN_WALK")?,
            Err(_) => BetweenWalk::default(),
        };

        Ok(Self {
            drugbank_path,
            hsdb_path,
            parse_dir,
            between_walk,
        })
    }

    /// Folder to search for parses of files living in `corpus_dir`.
    pub fn parse_dir_for(&self, corpus_dir: &std::path::Path) -> PathBuf {
        self.parse_dir
            .clone()
            .unwrap_or_else(|| corpus_dir.to_path_buf())
    }
}
