//! Word tokenization with character-offset alignment.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// A token with inclusive character offsets into its sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub form: String,
    pub start: usize,
    pub end: usize,
}

/// Anything that can split sentence text into surface words.
///
/// Implementations may normalise words; those that cannot be found verbatim
/// in the text are dropped during alignment.
pub trait WordTokenizer: Send + Sync {
    fn words<'t>(&self, text: &'t str) -> Vec<&'t str>;
}

/// Treebank-flavoured tokenizer: keeps hyphenated compounds and grouped
/// numbers whole, splits every other punctuation mark off.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexTokenizer;

static WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \d{1,3}(?:,\d{3})+(?:\.\d+)?          # 1,000 or 12,500.5
        | [\p{L}\p{N}]+(?:[-./][\p{L}\p{N}]+)* # words, Drug-A, 5-HT3, 0.5
        | [^\s\p{L}\p{N}]                      # any other single symbol
        ",
    )
    .expect("valid regex")
});

impl WordTokenizer for RegexTokenizer {
    fn words<'t>(&self, text: &'t str) -> Vec<&'t str> {
        WORD.find_iter(text).map(|m| m.as_str()).collect()
    }
}

/// Tokenize `text` and attach character spans to every word.
pub fn tokenize(tokenizer: &dyn WordTokenizer, text: &str) -> Vec<Token> {
    align(text, tokenizer.words(text))
}

/// Locate each word in `text`, searching forward from the end of the previous
/// match so repeated forms never snap back to an earlier occurrence.
pub fn align<I>(text: &str, words: I) -> Vec<Token>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut tokens = Vec::new();
    let mut byte_cursor = 0;
    let mut char_cursor = 0;
    for word in words {
        let word = word.as_ref();
        if word.is_empty() {
            continue;
        }
        let Some(rel) = text[byte_cursor..].find(word) else {
            debug!(%word, offset = char_cursor, "word not found in sentence; skipped");
            continue;
        };
        let byte_start = byte_cursor + rel;
        let start = char_cursor + text[byte_cursor..byte_start].chars().count();
        let len = word.chars().count();
        tokens.push(Token {
            form: word.to_string(),
            start,
            end: start + len - 1,
        });
        byte_cursor = byte_start + word.len();
        char_cursor = start + len;
    }
    tokens
}
