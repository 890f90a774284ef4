//! Typed errors raised while reading corpora, lexicons and parses.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning a corpus file into sentences.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("reading corpus file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corpus XML in {path} does not match the expected schema: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::DeError,
    },

    #[error("entity {entity} in sentence {sentence} has malformed charOffset {offset:?}")]
    BadOffset {
        sentence: String,
        entity: String,
        offset: String,
    },

    #[error("pair {e1}/{e2} in sentence {sentence} references unknown entity {missing}")]
    UnknownEntity {
        sentence: String,
        e1: String,
        e2: String,
        missing: String,
    },

    #[error("pair {e1}/{e2} in sentence {sentence} is marked ddi=true but has no type")]
    MissingDdiType {
        sentence: String,
        e1: String,
        e2: String,
    },

    #[error("pair {e1}/{e2} in sentence {sentence} has ddi={value:?}, expected true or false")]
    BadDdiFlag {
        sentence: String,
        e1: String,
        e2: String,
        value: String,
    },
}

/// Failures while loading the drug lexicons.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("reading lexicon {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line_no}: expected `name|type`, got {line:?}")]
    MalformedLine {
        path: PathBuf,
        line_no: usize,
        line: String,
    },
}

/// Failures while loading dependency parses.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("reading parse file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line_no}: {reason}")]
    Malformed {
        path: PathBuf,
        line_no: usize,
        reason: String,
    },

    #[error("no dependency parse for sentence {sentence}")]
    MissingSentence { sentence: String },
}

/// Invalid runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown between-token walk {0:?}, expected `all-content-words` or `first-content-word`")]
    UnknownBetweenWalk(String),
}
