//! Single-token lexical predicates used by the NER feature assembler.
//!
//! Every function is pure and independent; the assembler decides which ones
//! run through [`LexicalToggles`].

use once_cell::sync::Lazy;
use regex::Regex;

/// Pharmacological stems found in generic drug names.
pub const DRUG_STEMS: &[&str] = &[
    "floxacin", "olone", "mycin", "antifungal", "caine", "dronate", "pramine", "profen",
    "onide", "tadine", "terol", "tretin", "thiazide", "olol", "triptan", "afil", "mab",
    "parin", "pred", "vir", "glitazone", "tyline", "bital", "phylline", "bicin", "zolam",
    "setron", "lamide", "mustine", "asone", "zodone", "cillin", "gliptin", "sulfa", "vudine",
    "zepam", "cycline", "pril", "oprazole", "cort", "iramine", "cef", "ceph", "sartan",
    "dipine", "ridone", "semide", "tinib", "trel", "dazole", "statin", "zosin", "nacin",
    "eprazole", "fenac",
];

/// Compounds the `drug_n` class is known to contain.
pub const DRUG_N_NAMES: &[&str] = &["ch12", "flavo", "catechin", "endoxifen", "beta-endorphin"];

/// Which lexical predicates contribute features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalToggles {
    pub abbreviation: bool,
    pub common_drug_name: bool,
    pub numbers_with_commas: bool,
    pub uppercase: bool,
    pub number: bool,
    pub drugbank: bool,
    pub hsdb: bool,
    pub drug_n: bool,
    pub hyphen: bool,
}

impl Default for LexicalToggles {
    fn default() -> Self {
        Self {
            abbreviation: true,
            common_drug_name: true,
            numbers_with_commas: true,
            uppercase: true,
            number: true,
            drugbank: true,
            hsdb: true,
            drug_n: true,
            hyphen: true,
        }
    }
}

/// All-caps token of two to four characters, e.g. `MAOI`.
pub fn is_abbreviation(token: &str) -> bool {
    let len = token.chars().count();
    is_upper(token) && (2..=4).contains(&len)
}

/// At least one cased character and no lowercase ones.
fn is_upper(token: &str) -> bool {
    token.chars().any(char::is_uppercase) && !token.chars().any(char::is_lowercase)
}

/// Token contains one of the [`DRUG_STEMS`] (case-sensitive).
pub fn has_common_drug_name(token: &str) -> bool {
    DRUG_STEMS.iter().any(|stem| token.contains(stem))
}

static GROUPED_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,3}(,\d{3})*").expect("valid regex"));

/// Searches for a grouped-digit run anywhere in the token, so any digit hits.
pub fn has_numbers_with_commas(token: &str) -> bool {
    GROUPED_DIGITS.is_match(token)
}

pub fn has_uppercase(token: &str) -> bool {
    token.chars().any(char::is_uppercase)
}

static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").expect("valid regex"));

/// Decimal digits only; vulgar fractions and roman numerals do not count.
pub fn has_number(token: &str) -> bool {
    DIGIT.is_match(token)
}

/// Token contains one of the [`DRUG_N_NAMES`].
pub fn drug_n_match(token: &str) -> bool {
    DRUG_N_NAMES.iter().any(|name| token.contains(name))
}

/// Split on the first hyphen: text before it and text up to the second one.
///
/// `"ACE-inhibitor"` gives `("ACE", "inhibitor")`; anything past a second
/// hyphen is ignored.
pub fn hyphen_split(token: &str) -> Option<(&str, &str)> {
    let mut parts = token.split('-');
    let prefix = parts.next()?;
    let suffix = parts.next()?;
    Some((prefix, suffix))
}

/// Last `n` characters of the token, or the whole token when shorter.
pub fn suffix(token: &str, n: usize) -> &str {
    let count = token.chars().count();
    if count <= n {
        return token;
    }
    let (idx, _) = token
        .char_indices()
        .nth(count - n)
        .unwrap_or((0, ' '));
    &token[idx..]
}
