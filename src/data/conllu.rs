//! Pre-computed dependency parses stored as CoNLL-U.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    data::corpus::Sentence,
    error::ParseError,
    nlp::deptree::{DepNode, DepTree, DependencyParser},
};

/// Extra characters searched past a normalised form for the next word.
const RESYNC_SLACK: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    form: String,
    lemma: String,
    tag: String,
    rel: String,
    head: Option<usize>,
    /// Inclusive char range from the MISC column, when the parser wrote one.
    range: Option<(usize, usize)>,
}

/// Parses of one corpus file, keyed by `# sent_id`.
#[derive(Debug, Clone, Default)]
pub struct ConlluParses {
    sentences: HashMap<String, Vec<Row>>,
}

impl ConlluParses {
    pub fn load(path: &Path) -> Result<Self, ParseError> {
        let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_text(path, &text)
    }

    /// Parse CoNLL-U text; `path` only labels errors.
    pub fn from_text(path: &Path, text: &str) -> Result<Self, ParseError> {
        let malformed = |line_no: usize, reason: String| ParseError::Malformed {
            path: path.to_path_buf(),
            line_no,
            reason,
        };

        let mut sentences = HashMap::new();
        let mut sent_id: Option<String> = None;
        let mut rows: Vec<Row> = Vec::new();
        let mut block_start = 1;

        let lines = text.lines().map(Some).chain(std::iter::once(None));
        for (idx, line) in lines.enumerate() {
            let line_no = idx + 1;
            let line = line.map(str::trim_end);
            match line {
                None | Some("") => {
                    if let Some(id) = sent_id.take() {
                        sentences.insert(id, std::mem::take(&mut rows));
                    } else if !rows.is_empty() {
                        return Err(malformed(block_start, "sentence without `# sent_id`".into()));
                    }
                    block_start = line_no + 1;
                }
                Some(comment) if comment.starts_with('#') => {
                    if let Some(id) = comment
                        .trim_start_matches('#')
                        .trim()
                        .strip_prefix("sent_id")
                        .and_then(|rest| rest.trim_start().strip_prefix('='))
                    {
                        sent_id = Some(id.trim().to_string());
                    }
                }
                Some(row) => {
                    if let Some(parsed) = parse_row(row, rows.len() + 1)
                        .map_err(|reason| malformed(line_no, reason))?
                    {
                        rows.push(parsed);
                    }
                }
            }
        }
        debug!(path = %path.display(), sentences = sentences.len(), "loaded conllu parses");
        Ok(Self { sentences })
    }

    /// Parse file expected for a corpus file: `<parse_dir>/<stem>.conllu`.
    pub fn path_for(parse_dir: &Path, corpus_file: &Path) -> PathBuf {
        let mut name = corpus_file
            .file_stem()
            .unwrap_or(corpus_file.as_os_str())
            .to_os_string();
        name.push(".conllu");
        parse_dir.join(name)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// `Ok(None)` for multiword-token and empty-node lines.
fn parse_row(line: &str, expected_id: usize) -> Result<Option<Row>, String> {
    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() < 8 {
        return Err(format!("expected at least 8 columns, found {}", cols.len()));
    }
    let id = cols[0];
    if id.contains('-') || id.contains('.') {
        return Ok(None);
    }
    let id: usize = id.parse().map_err(|_| format!("bad token id {id:?}"))?;
    if id != expected_id {
        return Err(format!("token id {id} out of sequence, expected {expected_id}"));
    }
    let head: usize = cols[6]
        .parse()
        .map_err(|_| format!("bad head {:?}", cols[6]))?;
    let tag = if cols[4] != "_" { cols[4] } else { cols[3] };
    Ok(Some(Row {
        form: cols[1].to_string(),
        lemma: cols[2].to_string(),
        tag: tag.to_string(),
        rel: cols[7].to_string(),
        head: head.checked_sub(1),
        range: cols.get(9).and_then(|misc| misc_range(misc)),
    }))
}

/// `TokenRange=s:e` (UDPipe) or `start_char=s|end_char=e` (Stanza), both
/// with exclusive ends.
fn misc_range(misc: &str) -> Option<(usize, usize)> {
    let mut start: Option<usize> = None;
    let mut end: Option<usize> = None;
    for item in misc.split('|') {
        match item.split_once('=') {
            Some(("TokenRange", range)) => {
                let (s, e) = range.split_once(':')?;
                start = s.parse().ok();
                end = e.parse().ok();
            }
            Some(("start_char", s)) => start = s.parse().ok(),
            Some(("end_char", e)) => end = e.parse().ok(),
            _ => {}
        }
    }
    match (start, end) {
        (Some(s), Some(e)) if e > s => Some((s, e - 1)),
        _ => None,
    }
}

/// Char spans for each parse word, anchored left to right.
///
/// A word is placed at the next non-whitespace position only when its form
/// starts there. A word the parser normalised gets no span, and the cursor
/// resumes where the following word anchors close by, or past as many
/// characters as the normalised form has.
fn anchor_spans(text: &str, forms: &[&str]) -> Vec<Option<(usize, usize)>> {
    let chars: Vec<char> = text.chars().collect();
    let forms: Vec<Vec<char>> = forms.iter().map(|f| f.chars().collect()).collect();
    let matches_at = |pos: usize, form: &[char]| {
        !form.is_empty() && chars.get(pos..pos + form.len()) == Some(form)
    };

    let mut spans = Vec::with_capacity(forms.len());
    let mut cursor = 0;
    for (idx, form) in forms.iter().enumerate() {
        while cursor < chars.len() && chars[cursor].is_whitespace() {
            cursor += 1;
        }
        if matches_at(cursor, form.as_slice()) {
            spans.push(Some((cursor, cursor + form.len() - 1)));
            cursor += form.len();
            continue;
        }
        spans.push(None);
        let window = cursor + form.len().max(1) + RESYNC_SLACK;
        cursor = forms
            .get(idx + 1)
            .and_then(|next| {
                (cursor + 1..=window).find(|&pos| matches_at(pos, next.as_slice()))
            })
            .unwrap_or_else(|| (cursor + form.len()).min(chars.len()));
    }
    spans
}

impl DependencyParser for ConlluParses {
    fn parse(&self, sentence: &Sentence) -> Result<DepTree, ParseError> {
        let rows = self
            .sentences
            .get(&sentence.id)
            .ok_or_else(|| ParseError::MissingSentence {
                sentence: sentence.id.clone(),
            })?;

        let forms: Vec<&str> = rows.iter().map(|r| r.form.as_str()).collect();
        let anchored = anchor_spans(&sentence.text, &forms);
        let nodes = rows
            .iter()
            .zip(anchored)
            .map(|(row, anchored)| DepNode {
                form: row.form.clone(),
                lemma: row.lemma.clone(),
                tag: row.tag.clone(),
                rel: row.rel.clone(),
                head: row.head,
                span: row.range.or(anchored),
            })
            .collect();
        Ok(DepTree::new(nodes))
    }
}
