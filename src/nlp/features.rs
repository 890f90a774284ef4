//! Typed features and the per-token feature assembler for drug NER.

use std::fmt;

use crate::{
    data::lexicon::Lexicons,
    nlp::{
        lexical::{self, LexicalToggles},
        tokenize::Token,
    },
};

/// One sparse feature, rendered as `name=value` or a bare `name` marker.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Feature {
    pub name: String,
    pub value: Option<String>,
}

impl Feature {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Valueless marker such as `BoS`.
    pub fn marker(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// `T`/`F` flag.
    pub fn flag(name: impl Into<String>, on: bool) -> Self {
        Self::new(name, if on { "T" } else { "F" })
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.name, value),
            None => f.write_str(&self.name),
        }
    }
}

/// Builds the ordered feature list of every token in a sentence.
///
/// Lexicons are borrowed for the lifetime of the extractor and never mutated.
#[derive(Debug, Clone, Copy)]
pub struct TokenFeatureExtractor<'a> {
    lexicons: &'a Lexicons,
    toggles: LexicalToggles,
}

impl<'a> TokenFeatureExtractor<'a> {
    pub fn new(lexicons: &'a Lexicons) -> Self {
        Self {
            lexicons,
            toggles: LexicalToggles::default(),
        }
    }

    pub fn with_toggles(mut self, toggles: LexicalToggles) -> Self {
        self.toggles = toggles;
        self
    }

    /// Features for each token, in token order.
    pub fn extract(&self, tokens: &[Token]) -> Vec<Vec<Feature>> {
        (0..tokens.len())
            .map(|k| self.token_features(tokens, k))
            .collect()
    }

    fn token_features(&self, tokens: &[Token], k: usize) -> Vec<Feature> {
        let t = tokens[k].form.as_str();
        let mut feats = vec![
            Feature::new("form", t),
            Feature::new("suf3", lexical::suffix(t, 3)),
        ];
        self.lexical_features(t, &mut feats);

        match k.checked_sub(1).map(|p| tokens[p].form.as_str()) {
            Some(prev) => {
                feats.push(Feature::new("formPrev", prev));
                feats.push(Feature::new("suf3Prev", lexical::suffix(prev, 3)));
                feats.push(Feature::flag("abbrPrev", lexical::is_abbreviation(prev)));
            }
            None => feats.push(Feature::marker("BoS")),
        }

        match tokens.get(k + 1).map(|t| t.form.as_str()) {
            Some(next) => {
                feats.push(Feature::new("formNext", next));
                feats.push(Feature::new("suf3Next", lexical::suffix(next, 3)));
                feats.push(Feature::flag("abbrNext", lexical::is_abbreviation(next)));
            }
            None => feats.push(Feature::marker("EoS")),
        }
        feats
    }

    /// Sparse flags: only predicates that hold are emitted.
    fn lexical_features(&self, t: &str, feats: &mut Vec<Feature>) {
        let on = &self.toggles;
        if on.abbreviation && lexical::is_abbreviation(t) {
            feats.push(Feature::flag("abbr", true));
        }
        if on.common_drug_name && lexical::has_common_drug_name(t) {
            feats.push(Feature::flag("commonDrugName", true));
        }
        if on.numbers_with_commas && lexical::has_numbers_with_commas(t) {
            feats.push(Feature::flag("hasNumbersWithCommas", true));
        }
        if on.uppercase && lexical::has_uppercase(t) {
            feats.push(Feature::flag("hasUppercase", true));
        }
        if on.number && lexical::has_number(t) {
            feats.push(Feature::flag("hasNumber", true));
        }
        if on.drugbank {
            if let Some(kind) = self.lexicons.drugbank.lookup(t) {
                feats.push(Feature::new("drugBankType", kind.trim()));
            }
        }
        if on.hsdb && self.lexicons.hsdb.contains(t) {
            feats.push(Feature::flag("hsdb", true));
        }
        if on.drug_n && lexical::drug_n_match(t) {
            feats.push(Feature::new("drug_n", "True"));
        }
        if on.hyphen {
            if let Some((prefix, suffix)) = lexical::hyphen_split(t) {
                feats.push(Feature::new("prefixGuion", prefix));
                feats.push(Feature::new("sufixGuion", suffix));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::lexicon::{DrugBank, Hsdb},
        nlp::tokenize::{tokenize, RegexTokenizer},
    };

    fn render(feats: &[Feature]) -> Vec<String> {
        feats.iter().map(ToString::to_string).collect()
    }

    fn lexicons() -> Lexicons {
        Lexicons {
            drugbank: DrugBank::from_iter([("warfarin", "drug")]),
            hsdb: Hsdb::from_iter(["ethanol"]),
        }
    }

    #[test]
    fn features_follow_fixed_order() {
        let lex = lexicons();
        let tokens = tokenize(&RegexTokenizer, "NSAID-X and Warfarin");
        let feats = TokenFeatureExtractor::new(&lex).extract(&tokens);

        assert_eq!(
            render(&feats[0]),
            vec![
                "form=NSAID-X",
                "suf3=D-X",
                "hasUppercase=T",
                "prefixGuion=NSAID",
                "sufixGuion=X",
                "BoS",
                "formNext=and",
                "suf3Next=and",
                "abbrNext=F",
            ]
        );
        assert_eq!(
            render(&feats[2]),
            vec![
                "form=Warfarin",
                "suf3=rin",
                "hasUppercase=T",
                "drugBankType=drug",
                "formPrev=and",
                "suf3Prev=and",
                "abbrPrev=F",
                "EoS",
            ]
        );
    }

    #[test]
    fn previous_abbreviation_is_explicit() {
        let lex = Lexicons::default();
        let tokens = tokenize(&RegexTokenizer, "MAO inhibitors");
        let feats = TokenFeatureExtractor::new(&lex).extract(&tokens);
        assert!(render(&feats[0]).contains(&"abbr=T".to_string()));
        assert!(render(&feats[1]).contains(&"abbrPrev=T".to_string()));
    }

    #[test]
    fn toggled_off_predicates_are_silent() {
        let lex = lexicons();
        let tokens = tokenize(&RegexTokenizer, "ethanol");
        let toggles = LexicalToggles {
            hsdb: false,
            ..LexicalToggles::default()
        };
        let feats = TokenFeatureExtractor::new(&lex)
            .with_toggles(toggles)
            .extract(&tokens);
        assert_eq!(render(&feats[0]), vec!["form=ethanol", "suf3=nol", "BoS", "EoS"]);

        let feats = TokenFeatureExtractor::new(&lex).extract(&tokens);
        assert!(render(&feats[0]).contains(&"hsdb=T".to_string()));
    }

    #[test]
    fn drug_n_and_numbers() {
        let lex = Lexicons::default();
        let tokens = tokenize(&RegexTokenizer, "catechin 1,500");
        let feats = TokenFeatureExtractor::new(&lex).extract(&tokens);
        assert!(render(&feats[0]).contains(&"drug_n=True".to_string()));
        let second = render(&feats[1]);
        assert!(second.contains(&"hasNumbersWithCommas=T".to_string()));
        assert!(second.contains(&"hasNumber=T".to_string()));
    }
}
