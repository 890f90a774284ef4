//! Natural language processing orchestration layer.

pub mod deptree;
pub mod features;
pub mod lexical;
pub mod relation;
pub mod tagging;
pub mod tokenize;

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::{
    config::Settings,
    data::{
        conllu::ConlluParses,
        corpus::{self, Sentence},
        lexicon::Lexicons,
        tsv::TsvWriter,
    },
    nlp::{
        deptree::DependencyParser,
        features::TokenFeatureExtractor,
        relation::PairFeatureExtractor,
        tagging::bio_tag,
        tokenize::{tokenize, RegexTokenizer, WordTokenizer},
    },
};

/// Token-level extractor for the NER stream.
pub struct NerExtractor<'a> {
    tokenizer: &'a dyn WordTokenizer,
    features: TokenFeatureExtractor<'a>,
}

impl<'a> NerExtractor<'a> {
    pub fn new(tokenizer: &'a dyn WordTokenizer, lexicons: &'a Lexicons) -> Self {
        Self {
            tokenizer,
            features: TokenFeatureExtractor::new(lexicons),
        }
    }

    pub fn with_features(mut self, features: TokenFeatureExtractor<'a>) -> Self {
        self.features = features;
        self
    }

    /// One row per token followed by a blank line.
    pub fn write_sentence<W: Write>(
        &self,
        sentence: &Sentence,
        out: &mut TsvWriter<W>,
    ) -> csv::Result<()> {
        let spans = sentence.spans();
        let tokens = tokenize(self.tokenizer, &sentence.text);
        let features = self.features.extract(&tokens);
        for (token, feats) in tokens.iter().zip(&features) {
            let tag = bio_tag(token, &spans);
            out.ner_row(&sentence.id, token, &tag, feats)?;
        }
        out.end_sentence()
    }
}

/// Write pair rows for every sentence with at least two entities.
///
/// Returns the number of rows written; pairs without features are dropped.
pub fn write_pairs<W: Write>(
    sentences: &[Sentence],
    parser: &dyn DependencyParser,
    extractor: &PairFeatureExtractor,
    out: &mut TsvWriter<W>,
) -> Result<usize> {
    let mut written = 0;
    for sentence in sentences.iter().filter(|s| s.entities.len() > 1) {
        let tree = parser
            .parse(sentence)
            .with_context(|| format!("parse for sentence {}", sentence.id))?;
        for pair in &sentence.pairs {
            let feats = extractor.extract(&tree, &sentence.entities, &pair.e1, &pair.e2);
            if feats.is_empty() {
                debug!(sentence = %sentence.id, e1 = %pair.e1, e2 = %pair.e2, "pair skipped");
                continue;
            }
            out.pair_row(&sentence.id, &pair.e1, &pair.e2, &pair.label, &feats)?;
            written += 1;
        }
    }
    Ok(written)
}

/// Run the NER extractor over every corpus file in `dir`.
///
/// Each file is rendered in full before any of it reaches `out`.
pub fn extract_ner<W: Write>(settings: &Settings, dir: &Path, mut out: W) -> Result<()> {
    let lexicons = Lexicons::load(settings)?;
    let tokenizer = RegexTokenizer;
    let extractor = NerExtractor::new(&tokenizer, &lexicons);

    for path in corpus::corpus_files(dir)? {
        let sentences = corpus::read_file(&path)?;
        let mut buffer = TsvWriter::new(Vec::new());
        for sentence in &sentences {
            extractor
                .write_sentence(sentence, &mut buffer)
                .with_context(|| format!("writing sentence {}", sentence.id))?;
        }
        out.write_all(&buffer.into_inner()?)?;
        info!(path = %path.display(), sentences = sentences.len(), "extracted token features");
    }
    out.flush()?;
    Ok(())
}

/// Run the pair extractor over every corpus file in `dir`.
pub fn extract_pairs<W: Write>(settings: &Settings, dir: &Path, mut out: W) -> Result<()> {
    let parse_dir = settings.parse_dir_for(dir);
    let extractor = PairFeatureExtractor::new(settings.between_walk);
    info!(walk = ?settings.between_walk, parse_dir = %parse_dir.display(), "extracting pair features");

    for path in corpus::corpus_files(dir)? {
        let sentences = corpus::read_file(&path)?;
        if sentences.iter().all(|s| s.entities.len() < 2) {
            info!(path = %path.display(), "no candidate pairs");
            continue;
        }
        let parse_path: PathBuf = ConlluParses::path_for(&parse_dir, &path);
        let parses = ConlluParses::load(&parse_path)?;
        let mut buffer = TsvWriter::new(Vec::new());
        let rows = write_pairs(&sentences, &parses, &extractor, &mut buffer)
            .with_context(|| format!("extracting pairs from {}", path.display()))?;
        out.write_all(&buffer.into_inner()?)?;
        info!(path = %path.display(), rows, "extracted pair features");
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::lexicon::DrugBank;

    const DOC: &str = r#"<document id="d">
  <sentence id="d.s0" text="Drug-A inhibits Drug-B activity.">
    <entity id="d.s0.e0" charOffset="0-5" type="drug"/>
    <entity id="d.s0.e1" charOffset="16-21" type="drug"/>
    <pair id="d.s0.p0" e1="d.s0.e0" e2="d.s0.e1" ddi="true" type="effect"/>
  </sentence>
</document>"#;

    #[test]
    fn ner_sentence_rows_carry_tags_and_blank_separator() {
        let sentences = corpus::parse_str(DOC).unwrap();
        let lexicons = Lexicons {
            drugbank: DrugBank::from_iter([("drug-b", "drug")]),
            ..Lexicons::default()
        };
        let tokenizer = RegexTokenizer;
        let extractor = NerExtractor::new(&tokenizer, &lexicons);
        let mut out = TsvWriter::new(Vec::new());
        extractor.write_sentence(&sentences[0], &mut out).unwrap();
        let text = String::from_utf8(out.into_inner().unwrap()).unwrap();

        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("d.s0\tDrug-A\t0\t5\tB-drug\tform=Drug-A\t"));
        assert!(lines[1].starts_with("d.s0\tinhibits\t7\t14\tO\t"));
        assert!(lines[2].contains("\tB-drug\t"));
        assert!(lines[2].contains("\tdrugBankType=drug\t"));
        assert!(lines[4].ends_with("\tEoS"));
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "");
    }
}
