//! Pair-level features for DDI classification: tokens between the two
//! entity heads, the dependency path joining them, and relation cue verbs.

use std::{collections::BTreeSet, str::FromStr};

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    data::corpus::Entity,
    error::ConfigError,
    nlp::{deptree::DependencyTree, features::Feature},
};

/// Unordered feature set; iteration order is sorted and therefore stable.
pub type PairFeatures = BTreeSet<Feature>;

/// How tokens between the two heads feed the `lib`/`wib`/`lpib` features.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BetweenWalk {
    /// Every non-stopword strictly between the heads contributes.
    #[default]
    AllContentWords,
    /// Only the first non-stopword at or after `head(e1) + 1` contributes,
    /// even when it lies past `head(e2)`. Running off the sentence while
    /// skipping stopwords makes the pair unfeaturizable.
    FirstContentWord,
}

impl FromStr for BetweenWalk {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all-content-words" => Ok(Self::AllContentWords),
            "first-content-word" => Ok(Self::FirstContentWord),
            other => Err(ConfigError::UnknownBetweenWalk(other.to_string())),
        }
    }
}

/// Interaction class suggested by a cue verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CueClass {
    Adverse,
    Beneficial,
    Neutral,
}

impl CueClass {
    pub const ALL: [CueClass; 3] = [Self::Adverse, Self::Beneficial, Self::Neutral];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Adverse => "adverse",
            Self::Beneficial => "beneficial",
            Self::Neutral => "neutral",
        }
    }

    /// Verb lemmas signalling this class.
    pub fn lemmas(self) -> &'static [&'static str] {
        match self {
            Self::Adverse => &[
                "interact", "potentiate", "inhibit", "reduce", "decrease", "impair", "worsen",
                "block", "prevent", "depress", "suppress", "negate", "counteract", "nullify",
                "compete", "disrupt", "interfere",
            ],
            Self::Beneficial => &[
                "enhance", "augment", "boost", "potentiate", "increase", "improve", "elevate",
                "stimulate", "facilitate", "synergize", "promote", "accelerate", "upregulate",
            ],
            Self::Neutral => &[
                "affect", "modify", "alter", "change", "influence", "impact", "induce", "produce",
                "result in", "cause", "control", "determine", "direct", "effect", "instruct",
            ],
        }
    }

    /// Every class listing `lemma`; `potentiate` is both adverse and beneficial.
    pub fn classes_for(lemma: &str) -> impl Iterator<Item = CueClass> + '_ {
        Self::ALL
            .into_iter()
            .filter(move |class| class.lemmas().contains(&lemma))
    }
}

/// Extracts the feature set of an entity pair from a dependency tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairFeatureExtractor {
    walk: BetweenWalk,
}

impl PairFeatureExtractor {
    pub fn new(walk: BetweenWalk) -> Self {
        Self { walk }
    }

    /// Features for the pair `(e1, e2)`.
    ///
    /// An empty set means the pair cannot be featurized: a head or their
    /// common ancestor could not be resolved, or the legacy walk ran off the
    /// sentence.
    pub fn extract<T: DependencyTree + ?Sized>(
        &self,
        tree: &T,
        entities: &IndexMap<String, Entity>,
        e1: &str,
        e2: &str,
    ) -> PairFeatures {
        let mut feats = PairFeatures::new();
        let (Some(ent1), Some(ent2)) = (entities.get(e1), entities.get(e2)) else {
            debug!(%e1, %e2, "pair references unknown entity");
            return feats;
        };
        let (Some(h1), Some(h2)) = (
            tree.fragment_head(ent1.start, ent1.end),
            tree.fragment_head(ent2.start, ent2.end),
        ) else {
            debug!(%e1, %e2, "entity head unresolved");
            return feats;
        };
        let Some(lcs) = tree.lcs(h1, h2) else {
            debug!(%e1, %e2, h1, h2, "heads share no ancestor");
            return feats;
        };
        let between = h1 + 1..h2.max(h1 + 1);

        if !self.between_words(tree, h1, h2, &mut feats) {
            debug!(%e1, %e2, "ran past sentence end skipping stopwords");
            return PairFeatures::new();
        }

        let eib = between.clone().any(|tk| tree.is_entity(tk, entities));
        feats.insert(Feature::new("eib", if eib { "True" } else { "False" }));

        let path1 = tree
            .up_path(h1, lcs)
            .into_iter()
            .map(|n| step(tree, n))
            .collect::<Vec<_>>()
            .join("<");
        let path2 = tree
            .down_path(lcs, h2)
            .into_iter()
            .map(|n| step(tree, n))
            .collect::<Vec<_>>()
            .join(">");
        let path = format!("{path1}<{}>{path2}", step(tree, lcs));
        feats.insert(Feature::new("path1", path1));
        feats.insert(Feature::new("path2", path2));
        feats.insert(Feature::new("path", path));

        for (idx, tk) in between.clone().enumerate() {
            let idx = idx + 1;
            feats.insert(Feature::new(format!("pos_{idx}"), tree.tag(tk)));
            feats.insert(Feature::new(format!("lemma_{idx}"), tree.lemma(tk)));
            feats.insert(Feature::new(format!("relType_{idx}"), tree.rel(tk)));
            if let Some(entity) = tree.entity_at(tk, entities) {
                feats.insert(Feature::new(format!("entityType_{idx}"), entity.kind.as_str()));
            }
        }

        // Cue positions count from zero, unlike the positional features above.
        for (idx, tk) in between.enumerate() {
            let lemma = tree.lemma(tk).to_lowercase();
            for class in CueClass::classes_for(&lemma) {
                feats.insert(Feature::new(format!("relation_{idx}"), class.as_str()));
            }
        }

        feats
    }

    /// Adds `lib`/`wib`/`lpib`; `false` when the legacy walk exhausts the
    /// sentence.
    fn between_words<T: DependencyTree + ?Sized>(
        &self,
        tree: &T,
        h1: usize,
        h2: usize,
        feats: &mut PairFeatures,
    ) -> bool {
        match self.walk {
            BetweenWalk::AllContentWords => {
                for tk in h1 + 1..h2 {
                    if !tree.is_stopword(tk) {
                        insert_word(tree, tk, feats);
                    }
                }
                true
            }
            BetweenWalk::FirstContentWord => {
                if h1 + 1 >= h2 {
                    return true;
                }
                let mut tk = h1 + 1;
                while tk < tree.len() && tree.is_stopword(tk) {
                    tk += 1;
                }
                if tk >= tree.len() {
                    return false;
                }
                insert_word(tree, tk, feats);
                true
            }
        }
    }
}

fn insert_word<T: DependencyTree + ?Sized>(tree: &T, tk: usize, feats: &mut PairFeatures) {
    let lemma = tree.lemma(tk).to_lowercase();
    feats.insert(Feature::new("lib", lemma.as_str()));
    feats.insert(Feature::new("wib", tree.word(tk)));
    feats.insert(Feature::new("lpib", format!("{lemma}_{}", tree.tag(tk))));
}

/// `lemma_relation` label of one path node.
fn step<T: DependencyTree + ?Sized>(tree: &T, node: usize) -> String {
    format!("{}_{}", tree.lemma(node), tree.rel(node))
}
