//! Feature extraction for drug named-entity tagging and drug-drug
//! interaction classification over DDI corpus XML.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod nlp;
