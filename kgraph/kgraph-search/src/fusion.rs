//! Score fusion of lexical and vector candidate lists.
//!
//! Each list is min-max normalized on its own, the lists are unioned by
//! entity id, and every entity receives
//! `weights.lexical * norm_lexical + weights.vector * norm_vector`, where a
//! side the entity is missing from contributes 0. The ranking is sorted by
//! fused score, then raw lexical score (entities absent from the lexical
//! list rank lowest), then entity id.

use crate::error::{Result, SearchError};
use kgraph_core::{EntityId, EntityKind, FusionWeights, PageRequest, RankedResult, SearchCandidate, SearchPage, SearchType};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// A candidate's raw and normalized score within one list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedScore {
    pub kind: EntityKind,
    pub raw: f64,
    pub normalized: f64,
}

/// Min-max normalize one candidate list to `[0, 1]`.
///
/// A repeated id keeps its highest raw score. A single candidate, or a list
/// whose candidates all share one score, normalizes to 1.0. Non-finite raw
/// scores are dropped.
pub fn normalize(candidates: &[SearchCandidate]) -> HashMap<EntityId, NormalizedScore> {
    let mut best: HashMap<EntityId, (EntityKind, f64)> = HashMap::new();
    for candidate in candidates.iter().filter(|c| c.raw_score.is_finite()) {
        best.entry(candidate.entity_id)
            .and_modify(|(_, raw)| *raw = raw.max(candidate.raw_score))
            .or_insert((candidate.entity_kind, candidate.raw_score));
    }

    let min = best.values().map(|(_, raw)| *raw).fold(f64::INFINITY, f64::min);
    let max = best.values().map(|(_, raw)| *raw).fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    best.into_iter()
        .map(|(id, (kind, raw))| {
            let normalized = if range > 0.0 { (raw - min) / range } else { 1.0 };
            (id, NormalizedScore { kind, raw, normalized })
        })
        .collect()
}

/// Fuse two candidate lists into one fully ranked list.
pub fn fuse(lexical: &[SearchCandidate], vector: &[SearchCandidate], weights: FusionWeights) -> Vec<RankedResult> {
    let lexical = normalize(lexical);
    let vector = normalize(vector);

    let mut ids: Vec<EntityId> = lexical.keys().chain(vector.keys()).copied().collect();
    ids.sort_unstable();
    ids.dedup();

    let mut fused: Vec<RankedResult> = ids
        .into_iter()
        .map(|id| {
            let lex = lexical.get(&id);
            let vec = vector.get(&id);
            let lexical_score = lex.map_or(0.0, |s| s.normalized);
            let vector_score = vec.map_or(0.0, |s| s.normalized);
            let entity_kind = lex.or(vec).map_or(EntityKind::Node, |s| s.kind);

            RankedResult {
                entity_id: id,
                entity_kind,
                rank: 0,
                score: weights.lexical * lexical_score + weights.vector * vector_score,
                lexical_score,
                vector_score,
                raw_lexical_score: lex.map(|s| s.raw),
                raw_vector_score: vec.map(|s| s.raw),
            }
        })
        .collect();

    fused.sort_by(compare_ranked);
    for (position, result) in fused.iter_mut().enumerate() {
        result.rank = position + 1;
    }
    fused
}

fn compare_ranked(a: &RankedResult, b: &RankedResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| compare_raw_desc(a.raw_lexical_score, b.raw_lexical_score))
        .then_with(|| a.entity_id.cmp(&b.entity_id))
}

/// Descending by raw score with a missing score ranked last.
fn compare_raw_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Cut one page out of a fused ranking and attach its metadata.
///
/// Score bounds and type facets describe the whole ranking, not just the
/// returned page. A page past the end is empty.
pub fn paginate(
    ranked: Vec<RankedResult>,
    page: PageRequest,
    query: &str,
    search_type: SearchType,
    weights: FusionWeights,
) -> Result<SearchPage> {
    if page.size == 0 {
        return Err(SearchError::InvalidPage("page size must be positive".to_string()));
    }

    let total_elements = ranked.len();
    let total_pages = total_elements.div_ceil(page.size);
    let min_score = ranked.iter().map(|r| r.score).reduce(f64::min);
    let max_score = ranked.iter().map(|r| r.score).reduce(f64::max);

    let mut type_facets = BTreeMap::new();
    for result in &ranked {
        *type_facets.entry(result.entity_kind).or_insert(0) += 1;
    }

    let results = ranked.into_iter().skip(page.offset()).take(page.size).collect();

    Ok(SearchPage {
        results,
        total_elements,
        total_pages,
        current_page: page.page,
        page_size: page.size,
        query: query.to_string(),
        search_type,
        weights,
        min_score,
        max_score,
        type_facets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use kgraph_core::{DocumentId, NodeId};

    fn id(v: u128) -> EntityId {
        NodeId::from_u128(v).into()
    }

    fn cand(v: u128, score: f64) -> SearchCandidate {
        SearchCandidate::node(NodeId::from_u128(v), score)
    }

    fn order(results: &[RankedResult]) -> Vec<EntityId> {
        results.iter().map(|r| r.entity_id).collect()
    }

    #[test]
    fn test_min_max_normalization() {
        let scores = normalize(&[cand(1, 2.0), cand(2, 4.0), cand(3, 3.0)]);
        assert_relative_eq!(scores[&id(1)].normalized, 0.0);
        assert_relative_eq!(scores[&id(2)].normalized, 1.0);
        assert_relative_eq!(scores[&id(3)].normalized, 0.5);
    }

    #[test]
    fn test_single_and_uniform_lists_normalize_to_one() {
        let single = normalize(&[cand(1, 0.3)]);
        assert_relative_eq!(single[&id(1)].normalized, 1.0);

        let uniform = normalize(&[cand(1, 0.8), cand(2, 0.8)]);
        assert!(uniform.values().all(|s| s.normalized == 1.0));
    }

    #[test]
    fn test_duplicate_id_keeps_best_score() {
        let scores = normalize(&[cand(1, 0.2), cand(1, 0.9), cand(2, 0.5)]);
        assert_eq!(scores.len(), 2);
        assert_relative_eq!(scores[&id(1)].raw, 0.9);
        assert_relative_eq!(scores[&id(1)].normalized, 1.0);
    }

    #[test]
    fn test_empty_lists() {
        assert!(normalize(&[]).is_empty());
        assert!(fuse(&[], &[], FusionWeights::balanced()).is_empty());
    }

    #[test]
    fn test_vector_only_candidate_gets_weighted_vector_score() {
        let weights = FusionWeights::new(0.6, 0.4).unwrap();
        let fused = fuse(&[cand(1, 5.0), cand(2, 1.0)], &[cand(3, 0.9), cand(1, 0.8)], weights);

        let only_vector = fused.iter().find(|r| r.entity_id == id(3)).unwrap();
        assert_relative_eq!(only_vector.score, 0.4);
        assert_relative_eq!(only_vector.lexical_score, 0.0);
        assert_eq!(only_vector.raw_lexical_score, None);
    }

    #[test]
    fn test_fused_ordering_and_ranks() {
        let fused = fuse(
            &[cand(1, 10.0), cand(2, 5.0), cand(3, 0.0)],
            &[cand(3, 3.0), cand(2, 2.0), cand(4, 1.0)],
            FusionWeights::balanced(),
        );
        // 1: 0.5, 2: 0.25 + 0.25, 3: 0.5, 4: 0.0
        // 1 and 2 tie with 3 at 0.5; raw lexical breaks the tie
        assert_eq!(order(&fused), vec![id(1), id(2), id(3), id(4)]);
        assert_eq!(fused.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_ties_fall_back_to_id() {
        let fused = fuse(&[], &[cand(9, 0.5), cand(4, 0.5)], FusionWeights::balanced());
        assert_eq!(order(&fused), vec![id(4), id(9)]);
    }

    #[test]
    fn test_lexical_only_weights_reproduce_lexical_order() {
        let lexical = [cand(1, 1.0), cand(2, 3.0), cand(3, 2.0)];
        let vector = [cand(1, 0.99), cand(4, 0.98)];
        let fused = fuse(&lexical, &vector, FusionWeights::lexical_only());
        assert_eq!(&order(&fused)[..3], &[id(2), id(3), id(1)]);
    }

    #[test]
    fn test_entity_kind_survives_fusion() {
        let doc = DocumentId::from_u128(7);
        let fused = fuse(
            &[],
            &[SearchCandidate::new(doc, EntityKind::Document, 0.9)],
            FusionWeights::balanced(),
        );
        assert_eq!(fused[0].entity_kind, EntityKind::Document);
    }

    #[test]
    fn test_paginate_metadata() {
        let fused = fuse(
            &[cand(1, 3.0), cand(2, 2.0), cand(3, 1.0)],
            &[],
            FusionWeights::lexical_only(),
        );
        let page = paginate(
            fused,
            PageRequest::new(1, 2),
            "ada",
            SearchType::Hybrid,
            FusionWeights::lexical_only(),
        )
        .unwrap();

        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].rank, 3);
        assert_eq!(page.max_score, Some(1.0));
        assert_eq!(page.min_score, Some(0.0));
        assert_eq!(page.type_facets[&EntityKind::Node], 3);
    }

    #[test]
    fn test_paginate_past_the_end_and_zero_size() {
        let fused = fuse(&[cand(1, 1.0)], &[], FusionWeights::balanced());
        let page = paginate(fused.clone(), PageRequest::new(5, 10), "q", SearchType::Hybrid, FusionWeights::balanced()).unwrap();
        assert!(page.results.is_empty());
        assert_eq!(page.total_elements, 1);

        let err = paginate(fused, PageRequest::new(0, 0), "q", SearchType::Hybrid, FusionWeights::balanced()).unwrap_err();
        assert!(matches!(err, SearchError::InvalidPage(_)));
    }
}
