//! BIO tagging of tokens against annotated entity spans.

use crate::{data::corpus::EntitySpan, nlp::tokenize::Token};

/// Outside-of-entity tag.
pub const OUTSIDE: &str = "O";

/// Tag a token against spans in list order; the first matching span wins.
///
/// A token starting on a span but running past its end does not match that
/// span and may still match a later one.
pub fn bio_tag(token: &Token, spans: &[EntitySpan]) -> String {
    for span in spans {
        if token.start == span.start && token.end <= span.end {
            return format!("B-{}", span.kind);
        } else if token.start >= span.start && token.end <= span.end {
            return format!("I-{}", span.kind);
        }
    }
    OUTSIDE.to_string()
}
