//! DDI corpus reader: typed XML schema and conversion into sentences.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use quick_xml::de::from_str;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::CorpusError;

/// Annotated character span, end inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub start: usize,
    pub end: usize,
    pub kind: String,
}

/// Drug mention keyed by id within its sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: String,
    pub start: usize,
    pub end: usize,
    pub kind: String,
}

impl Entity {
    pub fn span(&self) -> EntitySpan {
        EntitySpan {
            start: self.start,
            end: self.end,
            kind: self.kind.clone(),
        }
    }

    /// Whether `[start, end]` lies inside this entity.
    pub fn contains(&self, start: usize, end: usize) -> bool {
        start >= self.start && end <= self.end
    }
}

/// Candidate interaction between two entities of a sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub e1: String,
    pub e2: String,
    /// Interaction type when the pair is a DDI, `null` otherwise.
    pub label: String,
}

/// A sentence with its annotations, decoupled from the XML tree.
#[derive(Debug, Clone)]
pub struct Sentence {
    pub id: String,
    pub text: String,
    pub entities: IndexMap<String, Entity>,
    pub pairs: Vec<Pair>,
}

impl Sentence {
    /// Entity spans in document order, as consumed by the span tagger.
    pub fn spans(&self) -> Vec<EntitySpan> {
        self.entities.values().map(Entity::span).collect()
    }
}

#[derive(Debug, Deserialize)]
struct XmlDocument {
    #[serde(rename = "sentence", default)]
    sentences: Vec<XmlSentence>,
}

#[derive(Debug, Deserialize)]
struct XmlSentence {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@text")]
    text: String,
    #[serde(rename = "entity", default)]
    entities: Vec<XmlEntity>,
    #[serde(rename = "pair", default)]
    pairs: Vec<XmlPair>,
}

#[derive(Debug, Deserialize)]
struct XmlEntity {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@charOffset")]
    char_offset: String,
    #[serde(rename = "@type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct XmlPair {
    #[serde(rename = "@e1")]
    e1: String,
    #[serde(rename = "@e2")]
    e2: String,
    #[serde(rename = "@ddi")]
    ddi: String,
    #[serde(rename = "@type")]
    kind: Option<String>,
}

/// Corpus files directly inside `dir`, in file-name order.
pub fn corpus_files(dir: &Path) -> Result<Vec<PathBuf>, CorpusError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| CorpusError::Io {
            path: dir.to_path_buf(),
            source: err.into(),
        })?;
        let is_xml = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
        if entry.file_type().is_file() && is_xml {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Read and validate every sentence of a corpus file.
pub fn read_file(path: &Path) -> Result<Vec<Sentence>, CorpusError> {
    let xml = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&xml, path)
}

/// Parse one `<document>` worth of XML held in memory.
pub fn parse_str(xml: &str) -> Result<Vec<Sentence>, CorpusError> {
    parse_document(xml, Path::new("<memory>"))
}

fn parse_document(xml: &str, path: &Path) -> Result<Vec<Sentence>, CorpusError> {
    let document: XmlDocument = from_str(xml).map_err(|source| CorpusError::Xml {
        path: path.to_path_buf(),
        source,
    })?;
    document
        .sentences
        .into_iter()
        .map(XmlSentence::into_sentence)
        .collect()
}

impl XmlSentence {
    fn into_sentence(self) -> Result<Sentence, CorpusError> {
        let mut entities = IndexMap::with_capacity(self.entities.len());
        for raw in self.entities {
            let (start, end) =
                parse_char_offset(&raw.char_offset).ok_or_else(|| CorpusError::BadOffset {
                    sentence: self.id.clone(),
                    entity: raw.id.clone(),
                    offset: raw.char_offset.clone(),
                })?;
            entities.insert(
                raw.id.clone(),
                Entity {
                    id: raw.id,
                    start,
                    end,
                    kind: raw.kind,
                },
            );
        }

        let mut pairs = Vec::with_capacity(self.pairs.len());
        for raw in self.pairs {
            for id in [&raw.e1, &raw.e2] {
                if !entities.contains_key(id.as_str()) {
                    return Err(CorpusError::UnknownEntity {
                        sentence: self.id.clone(),
                        e1: raw.e1.clone(),
                        e2: raw.e2.clone(),
                        missing: id.clone(),
                    });
                }
            }
            let label = match raw.ddi.as_str() {
                "true" => raw.kind.ok_or_else(|| CorpusError::MissingDdiType {
                    sentence: self.id.clone(),
                    e1: raw.e1.clone(),
                    e2: raw.e2.clone(),
                })?,
                "false" => "null".to_string(),
                other => {
                    return Err(CorpusError::BadDdiFlag {
                        sentence: self.id.clone(),
                        e1: raw.e1.clone(),
                        e2: raw.e2.clone(),
                        value: other.to_string(),
                    })
                }
            };
            pairs.push(Pair {
                e1: raw.e1,
                e2: raw.e2,
                label,
            });
        }

        Ok(Sentence {
            id: self.id,
            text: self.text,
            entities,
            pairs,
        })
    }
}

/// Parse `start-end[;start-end...]`, keeping only the first segment.
///
/// Discontinuous mentions lose their trailing fragments.
pub fn parse_char_offset(raw: &str) -> Option<(usize, usize)> {
    let first = raw.split(';').next()?;
    let (start, end) = first.trim().split_once('-')?;
    let start = start.trim().parse().ok()?;
    let end = end.trim().parse().ok()?;
    (start <= end).then_some((start, end))
}
