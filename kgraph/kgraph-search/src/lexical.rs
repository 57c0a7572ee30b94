//! In-memory BM25 lexical index.

use async_trait::async_trait;
use kgraph_core::{EntityId, EntityKind, LexicalSearchAdapter, Node, Result, SearchCandidate};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

const K1: f64 = 1.2;
const B: f64 = 0.75;

/// Lowercased unicode words of `text`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words().map(str::to_lowercase).collect()
}

/// Searchable text of a node: its name followed by its scalar attribute values.
pub fn node_text(node: &Node) -> String {
    let mut text = node.name.clone();
    for value in node.attributes.values() {
        append_value(&mut text, value);
    }
    text
}

fn append_value(text: &mut String, value: &serde_json::Value) {
    match value {
        serde_json::Value::String(s) => {
            text.push(' ');
            text.push_str(s);
        }
        serde_json::Value::Number(n) => {
            text.push(' ');
            text.push_str(&n.to_string());
        }
        serde_json::Value::Array(items) => items.iter().for_each(|item| append_value(text, item)),
        _ => {}
    }
}

#[derive(Debug)]
struct IndexedText {
    kind: EntityKind,
    term_freqs: HashMap<String, usize>,
    length: usize,
}

/// Full-text index scoring with Okapi BM25 (`k1 = 1.2`, `b = 0.75`).
///
/// Returns every entity matching at least one query term, best first.
#[derive(Debug, Default)]
pub struct InMemoryLexicalIndex {
    entries: RwLock<BTreeMap<EntityId, IndexedText>>,
}

impl InMemoryLexicalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index_node(&self, node: &Node) {
        self.index_text(node.id, EntityKind::Node, &node_text(node));
    }

    /// Index or replace the text of an entity.
    pub fn index_text(&self, id: impl Into<EntityId>, kind: EntityKind, text: &str) {
        let tokens = tokenize(text);
        let mut term_freqs = HashMap::new();
        for token in &tokens {
            *term_freqs.entry(token.clone()).or_insert(0) += 1;
        }
        self.entries.write().insert(
            id.into(),
            IndexedText {
                kind,
                term_freqs,
                length: tokens.len(),
            },
        );
    }

    pub fn remove(&self, id: impl Into<EntityId>) -> bool {
        self.entries.write().remove(&id.into()).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn score(&self, query: &str) -> Vec<SearchCandidate> {
        let terms: HashSet<String> = tokenize(query).into_iter().collect();
        let entries = self.entries.read();
        if terms.is_empty() || entries.is_empty() {
            return Vec::new();
        }

        let doc_count = entries.len() as f64;
        let avg_length = entries.values().map(|e| e.length).sum::<usize>() as f64 / doc_count;
        let idf: HashMap<&str, f64> = terms
            .iter()
            .map(|term| {
                let df = entries.values().filter(|e| e.term_freqs.contains_key(term)).count() as f64;
                (term.as_str(), ((doc_count - df + 0.5) / (df + 0.5) + 1.0).ln())
            })
            .collect();

        let mut candidates: Vec<SearchCandidate> = entries
            .iter()
            .filter_map(|(id, entry)| {
                let length_norm = if avg_length > 0.0 { entry.length as f64 / avg_length } else { 0.0 };
                let score: f64 = terms
                    .iter()
                    .filter_map(|term| entry.term_freqs.get(term).map(|tf| (term, *tf as f64)))
                    .map(|(term, tf)| idf[term.as_str()] * tf * (K1 + 1.0) / (tf + K1 * (1.0 - B + B * length_norm)))
                    .sum();
                (score > 0.0).then(|| SearchCandidate::new(*id, entry.kind, score))
            })
            .collect();

        candidates.sort_by(|a, b| b.raw_score.total_cmp(&a.raw_score).then_with(|| a.entity_id.cmp(&b.entity_id)));
        candidates
    }
}

#[async_trait]
impl LexicalSearchAdapter for InMemoryLexicalIndex {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>> {
        let candidates = self.score(query);
        debug!("Lexical search for '{}' matched {} entities", query, candidates.len());
        Ok(candidates)
    }
}
