//! Dependency trees and the path queries the pair extractor relies on.

use indexmap::IndexMap;

use crate::{
    data::corpus::{Entity, Sentence},
    error::ParseError,
};

/// Read-only view over a dependency parse of one sentence.
///
/// Implementors provide per-node accessors; tree navigation comes for free.
pub trait DependencyTree {
    fn len(&self) -> usize;
    fn word(&self, idx: usize) -> &str;
    fn lemma(&self, idx: usize) -> &str;
    fn tag(&self, idx: usize) -> &str;
    fn rel(&self, idx: usize) -> &str;
    /// Governor of `idx`, `None` for the root.
    fn parent(&self, idx: usize) -> Option<usize>;
    /// Inclusive character span of the node in the sentence text.
    fn span(&self, idx: usize) -> Option<(usize, usize)>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Out-of-range indices are never stopwords.
    fn is_stopword(&self, idx: usize) -> bool {
        idx < self.len() && is_stopword(self.word(idx))
    }

    /// First entity, in document order, whose span contains node `idx`.
    fn entity_at<'e>(
        &self,
        idx: usize,
        entities: &'e IndexMap<String, Entity>,
    ) -> Option<&'e Entity> {
        let (start, end) = self.span(idx)?;
        entities.values().find(|e| e.contains(start, end))
    }

    fn is_entity(&self, idx: usize, entities: &IndexMap<String, Entity>) -> bool {
        self.entity_at(idx, entities).is_some()
    }

    /// Ancestors of `idx` including itself, nearest first.
    ///
    /// Stops at the first repeated node, so a cyclic parse terminates.
    fn ancestors(&self, idx: usize) -> Vec<usize> {
        let mut chain = vec![idx];
        let mut current = idx;
        while let Some(parent) = self.parent(current) {
            if chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    fn depth(&self, idx: usize) -> usize {
        self.ancestors(idx).len() - 1
    }

    /// Syntactic head of the nodes overlapping `[start, end]`: the one
    /// closest to the root, leftmost on ties.
    fn fragment_head(&self, start: usize, end: usize) -> Option<usize> {
        (0..self.len())
            .filter(|&i| matches!(self.span(i), Some((s, e)) if s <= end && e >= start))
            .min_by_key(|&i| (self.depth(i), i))
    }

    /// Lowest common ancestor of two nodes.
    fn lcs(&self, a: usize, b: usize) -> Option<usize> {
        let up_a = self.ancestors(a);
        self.ancestors(b).into_iter().find(|n| up_a.contains(n))
    }

    /// Nodes from `from` up to `lcs`, excluding `lcs`.
    fn up_path(&self, from: usize, lcs: usize) -> Vec<usize> {
        self.ancestors(from)
            .into_iter()
            .take_while(|&n| n != lcs)
            .collect()
    }

    /// Nodes from below `lcs` down to `to`, excluding `lcs`.
    fn down_path(&self, lcs: usize, to: usize) -> Vec<usize> {
        let mut path = self.up_path(to, lcs);
        path.reverse();
        path
    }
}

/// One parsed word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepNode {
    pub form: String,
    pub lemma: String,
    pub tag: String,
    pub rel: String,
    pub head: Option<usize>,
    pub span: Option<(usize, usize)>,
}

/// Arena-backed dependency tree with zero-based node indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepTree {
    nodes: Vec<DepNode>,
}

impl DepTree {
    pub fn new(nodes: Vec<DepNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[DepNode] {
        &self.nodes
    }
}

impl DependencyTree for DepTree {
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn word(&self, idx: usize) -> &str {
        &self.nodes[idx].form
    }

    fn lemma(&self, idx: usize) -> &str {
        &self.nodes[idx].lemma
    }

    fn tag(&self, idx: usize) -> &str {
        &self.nodes[idx].tag
    }

    fn rel(&self, idx: usize) -> &str {
        &self.nodes[idx].rel
    }

    fn parent(&self, idx: usize) -> Option<usize> {
        self.nodes.get(idx)?.head.filter(|&h| h < self.nodes.len())
    }

    fn span(&self, idx: usize) -> Option<(usize, usize)> {
        self.nodes.get(idx)?.span
    }
}

/// Source of dependency parses for corpus sentences.
pub trait DependencyParser: Send + Sync {
    fn parse(&self, sentence: &Sentence) -> Result<DepTree, ParseError>;
}

/// NLTK English stopword list.
pub const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

pub fn is_stopword(word: &str) -> bool {
    let lower = word.to_lowercase();
    STOPWORDS.contains(&lower.as_str())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a tree from `(form, lemma, tag, rel, head)` rows, spacing the
    /// forms out by one character as if joined with single spaces.
    pub(crate) fn tree(rows: &[(&str, &str, &str, &str, Option<usize>)]) -> DepTree {
        let mut offset = 0;
        let nodes = rows
            .iter()
            .map(|&(form, lemma, tag, rel, head)| {
                let len = form.chars().count();
                let node = DepNode {
                    form: form.into(),
                    lemma: lemma.into(),
                    tag: tag.into(),
                    rel: rel.into(),
                    head,
                    span: Some((offset, offset + len - 1)),
                };
                offset += len + 1;
                node
            })
            .collect();
        DepTree::new(nodes)
    }

    // 0 Warfarin <-nsubj- 4 reduces, 1 and -cc-> 2, 2 aspirin -conj-> 0,
    // 3 strongly -advmod-> 4, 5 the -det-> 6, 6 effect -obj-> 4,
    // 7 of -case-> 8, 8 heparin -nmod-> 6
    fn sample() -> DepTree {
        tree(&[
            ("Warfarin", "warfarin", "NN", "nsubj", Some(4)),
            ("and", "and", "CC", "cc", Some(2)),
            ("aspirin", "aspirin", "NN", "conj", Some(0)),
            ("strongly", "strongly", "RB", "advmod", Some(4)),
            ("reduces", "reduce", "VBZ", "root", None),
            ("the", "the", "DT", "det", Some(6)),
            ("effect", "effect", "NN", "obj", Some(4)),
            ("of", "of", "IN", "case", Some(8)),
            ("heparin", "heparin", "NN", "nmod", Some(6)),
        ])
    }

    #[test]
    fn lcs_and_paths() {
        let t = sample();
        assert_eq!(t.lcs(2, 8), Some(4));
        assert_eq!(t.up_path(2, 4), vec![2, 0]);
        assert_eq!(t.down_path(4, 8), vec![6, 8]);
    }

    #[test]
    fn lcs_of_ancestor_is_the_ancestor() {
        let t = sample();
        assert_eq!(t.lcs(8, 6), Some(6));
        assert!(t.up_path(6, 6).is_empty());
        assert_eq!(t.down_path(6, 8), vec![8]);
    }

    #[test]
    fn fragment_head_prefers_node_nearest_root() {
        let t = sample();
        // "the effect of heparin"
        let start = t.span(5).unwrap().0;
        let end = t.span(8).unwrap().1;
        assert_eq!(t.fragment_head(start, end), Some(6));
        assert_eq!(t.fragment_head(1000, 1005), None);
    }

    #[test]
    fn disconnected_nodes_have_no_lcs() {
        let t = tree(&[
            ("a", "a", "DT", "root", None),
            ("b", "b", "NN", "root", None),
        ]);
        assert_eq!(t.lcs(0, 1), None);
    }

    #[test]
    fn cyclic_heads_terminate() {
        let t = tree(&[
            ("a", "a", "NN", "dep", Some(1)),
            ("b", "b", "NN", "dep", Some(0)),
        ]);
        assert_eq!(t.ancestors(0), vec![0, 1]);
        assert_eq!(t.lcs(0, 1), Some(1));
    }

    #[test]
    fn stopwords_and_entities() {
        let t = sample();
        assert!(t.is_stopword(1));
        assert!(!t.is_stopword(2));
        assert!(!t.is_stopword(99));

        let mut entities = IndexMap::new();
        entities.insert(
            "e0".to_string(),
            Entity {
                id: "e0".into(),
                start: 13,
                end: 19,
                kind: "drug".into(),
            },
        );
        assert_eq!(t.entity_at(2, &entities).map(|e| e.id.as_str()), Some("e0"));
        assert!(!t.is_entity(3, &entities));
    }
}
