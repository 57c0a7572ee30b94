//! Adaptive fusion weight selection.
//!
//! A single deterministic pass: each candidate list gets a quality signal
//! computed from its top candidates, and weight moves toward a list only when
//! its quality beats the other's by a fixed margin.

use kgraph_core::config::AdaptiveConfig;
use kgraph_core::{FusionWeights, SearchCandidate};
use serde::Serialize;

/// Quality signal of one candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ListQuality {
    /// Share of the probe slots holding a candidate close to the top score
    pub coverage: f64,
    /// Relative spread `(max - min) / max` over the probed candidates
    pub discrimination: f64,
    pub score: f64,
}

impl ListQuality {
    const EMPTY: Self = Self {
        coverage: 0.0,
        discrimination: 0.0,
        score: 0.0,
    };
}

/// Which list the selector favored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Favored {
    Lexical,
    Vector,
    Neither,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightSelection {
    pub weights: FusionWeights,
    pub favored: Favored,
    pub lexical_quality: ListQuality,
    pub vector_quality: ListQuality,
}

/// Measure one list over its `probe_size` best raw scores.
pub fn list_quality(candidates: &[SearchCandidate], config: &AdaptiveConfig) -> ListQuality {
    let mut scores: Vec<f64> = candidates
        .iter()
        .map(|c| c.raw_score)
        .filter(|s| s.is_finite())
        .collect();
    if scores.is_empty() || config.probe_size == 0 {
        return ListQuality::EMPTY;
    }

    scores.sort_by(|a, b| b.total_cmp(a));
    scores.truncate(config.probe_size);

    let top = scores[0];
    let bottom = scores[scores.len() - 1];

    let strong = scores
        .iter()
        .filter(|s| **s >= config.relative_threshold * top)
        .count();
    let coverage = strong as f64 / config.probe_size as f64;
    let discrimination = if top > 0.0 { ((top - bottom) / top).clamp(0.0, 1.0) } else { 0.0 };

    ListQuality {
        coverage,
        discrimination,
        score: 0.5 * coverage + 0.5 * discrimination,
    }
}

/// Pick fusion weights from the two lists' quality signals.
pub fn select_weights(
    lexical: &[SearchCandidate],
    vector: &[SearchCandidate],
    config: &AdaptiveConfig,
) -> WeightSelection {
    let lexical_quality = list_quality(lexical, config);
    let vector_quality = list_quality(vector, config);

    let favored_weight = config.favored_weight.clamp(0.5, 1.0);
    let other_weight = 1.0 - favored_weight;
    let (weights, favored) = if vector_quality.score - lexical_quality.score > config.margin {
        (
            FusionWeights {
                lexical: other_weight,
                vector: favored_weight,
            },
            Favored::Vector,
        )
    } else if lexical_quality.score - vector_quality.score > config.margin {
        (
            FusionWeights {
                lexical: favored_weight,
                vector: other_weight,
            },
            Favored::Lexical,
        )
    } else {
        (FusionWeights::balanced(), Favored::Neither)
    };

    WeightSelection {
        weights,
        favored,
        lexical_quality,
        vector_quality,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use kgraph_core::NodeId;

    fn list(scores: &[f64]) -> Vec<SearchCandidate> {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| SearchCandidate::node(NodeId::from_u128(i as u128 + 1), *s))
            .collect()
    }

    #[test]
    fn test_empty_list_has_zero_quality() {
        let quality = list_quality(&[], &AdaptiveConfig::default());
        assert_eq!(quality, ListQuality::EMPTY);
    }

    #[test]
    fn test_quality_components() {
        // top 5 of [10, 8, 6, 2, 1, 0.5]: strong = 10, 8, 6 (>= 5)
        let quality = list_quality(&list(&[10.0, 8.0, 6.0, 2.0, 1.0, 0.5]), &AdaptiveConfig::default());
        assert_relative_eq!(quality.coverage, 0.6);
        assert_relative_eq!(quality.discrimination, 0.9);
        assert_relative_eq!(quality.score, 0.75);
    }

    #[test]
    fn test_non_positive_top_has_no_discrimination() {
        let quality = list_quality(&list(&[0.0, -1.0]), &AdaptiveConfig::default());
        assert_relative_eq!(quality.discrimination, 0.0);
    }

    #[test]
    fn test_favors_stronger_vector_list() {
        let selection = select_weights(&[], &list(&[0.95, 0.9, 0.88, 0.5, 0.2]), &AdaptiveConfig::default());
        assert_eq!(selection.favored, Favored::Vector);
        assert_relative_eq!(selection.weights.vector, 0.7);
        assert_relative_eq!(selection.weights.lexical, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_favors_stronger_lexical_list() {
        let selection = select_weights(&list(&[12.0, 9.0, 7.0, 1.0]), &list(&[0.71]), &AdaptiveConfig::default());
        assert_eq!(selection.favored, Favored::Lexical);
        assert_relative_eq!(selection.weights.lexical, 0.7);
    }

    #[test]
    fn test_similar_quality_keeps_balance() {
        let scores = [5.0, 4.0, 3.0];
        let selection = select_weights(&list(&scores), &list(&scores), &AdaptiveConfig::default());
        assert_eq!(selection.favored, Favored::Neither);
        assert_eq!(selection.weights, FusionWeights::balanced());
    }
}
