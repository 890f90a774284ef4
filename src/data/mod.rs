//! Corpus, lexicon and parse ingestion plus feature stream output.

pub mod conllu;
pub mod corpus;
pub mod lexicon;
pub mod tsv;
