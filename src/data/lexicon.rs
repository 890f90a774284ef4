//! Drug name lexicons loaded once before a batch and shared read-only.

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use tracing::{info, warn};

use crate::{config::Settings, error::LexiconError};

/// DrugBank names (lowercased) mapped to their drug type.
#[derive(Debug, Clone, Default)]
pub struct DrugBank {
    types: HashMap<String, String>,
}

impl DrugBank {
    /// Parse `name|type` lines. Later duplicates win.
    pub fn from_lines(path: &Path, text: &str) -> Result<Self, LexiconError> {
        let mut types = HashMap::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let Some((name, kind)) = line.split_once('|') else {
                return Err(LexiconError::MalformedLine {
                    path: path.to_path_buf(),
                    line_no: idx + 1,
                    line: line.to_string(),
                });
            };
            types.insert(name.to_lowercase(), kind.trim().to_string());
        }
        Ok(Self { types })
    }

    /// Drug type for a token, case-insensitively.
    pub fn lookup(&self, token: &str) -> Option<&str> {
        self.types.get(&token.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DrugBank {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let types = iter
            .into_iter()
            .map(|(k, v)| (k.into().to_lowercase(), v.into()))
            .collect();
        Self { types }
    }
}

/// Hazardous Substances Data Bank names, lowercased.
#[derive(Debug, Clone, Default)]
pub struct Hsdb {
    names: HashSet<String>,
}

impl Hsdb {
    pub fn from_lines(text: &str) -> Self {
        let names = text
            .lines()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();
        Self { names }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.names.contains(&token.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Hsdb {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let names = iter.into_iter().map(|s| s.into().to_lowercase()).collect();
        Self { names }
    }
}

/// Immutable lexicon bundle handed to the token extractor.
#[derive(Debug, Clone, Default)]
pub struct Lexicons {
    pub drugbank: DrugBank,
    pub hsdb: Hsdb,
}

impl Lexicons {
    /// Load both lexicons from the configured paths.
    ///
    /// A missing file leaves that lexicon empty; a malformed one is fatal.
    pub fn load(settings: &Settings) -> Result<Self, LexiconError> {
        let drugbank = match read_optional(&settings.drugbank_path)? {
            Some(text) => DrugBank::from_lines(&settings.drugbank_path, &text)?,
            None => DrugBank::default(),
        };
        let hsdb = read_optional(&settings.hsdb_path)?
            .map(|text| Hsdb::from_lines(&text))
            .unwrap_or_default();
        info!(
            drugbank = drugbank.len(),
            hsdb = hsdb.len(),
            "loaded lexicons"
        );
        Ok(Self { drugbank, hsdb })
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, LexiconError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "lexicon missing; lookups will never match");
            Ok(None)
        }
        Err(source) => Err(LexiconError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
