//! Tab-separated feature streams consumed by the training scripts.

use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::nlp::{features::Feature, tokenize::Token};

/// Writes NER and pair rows; fields are never quoted.
///
/// Each row goes through its own csv writer so the sentence separator can be
/// written as a bare newline; csv renders an empty record as `""`.
pub struct TsvWriter<W: Write> {
    out: W,
}

impl<W: Write> TsvWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_row(&mut self, record: &[String]) -> csv::Result<()> {
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut self.out);
        writer.write_record(record)?;
        writer.flush()?;
        Ok(())
    }

    /// `sid  form  start  end  tag  feat...`
    pub fn ner_row<'f, I>(
        &mut self,
        sid: &str,
        token: &Token,
        tag: &str,
        feats: I,
    ) -> csv::Result<()>
    where
        I: IntoIterator<Item = &'f Feature>,
    {
        let mut record = vec![
            sid.to_string(),
            token.form.clone(),
            token.start.to_string(),
            token.end.to_string(),
            tag.to_string(),
        ];
        record.extend(feats.into_iter().map(ToString::to_string));
        self.write_row(&record)
    }

    /// Blank line separating NER sentences.
    pub fn end_sentence(&mut self) -> csv::Result<()> {
        self.out.write_all(b"\n")?;
        Ok(())
    }

    /// `sid  e1  e2  label  feat...`
    pub fn pair_row<'f, I>(
        &mut self,
        sid: &str,
        e1: &str,
        e2: &str,
        label: &str,
        feats: I,
    ) -> csv::Result<()>
    where
        I: IntoIterator<Item = &'f Feature>,
    {
        let mut record = vec![
            sid.to_string(),
            e1.to_string(),
            e2.to_string(),
            label.to_string(),
        ];
        record.extend(feats.into_iter().map(ToString::to_string));
        self.write_row(&record)
    }

    pub fn into_inner(mut self) -> anyhow::Result<W> {
        self.out
            .flush()
            .map_err(|err| anyhow::anyhow!("flushing feature stream: {err}"))?;
        Ok(self.out)
    }
}
