//! Ranking engine
//!
//! Filters the catalog, scores each remaining item with a composite distance
//! and returns the `top_k` closest in ascending distance order. Ties keep
//! catalog order.

use crate::config::RankingConfig;
use crate::distance::{negative_penalty, similarity_score, HybridWeights};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use stylematch_core::{
    Catalog, CatalogItem, Error, Filter, Result, SearchFilters, TextEmbedding, VisualEmbedding,
};
use tracing::{debug, warn};

/// How component distances are combined
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoringMode {
    Visual,
    Text,
    Hybrid(HybridWeights),
}

/// Query signals, filters and result size for one ranking pass
#[derive(Debug, Clone)]
pub struct RankQuery<'a> {
    pub visual: Option<&'a VisualEmbedding>,
    pub text: Option<&'a TextEmbedding>,
    pub negative: Option<&'a TextEmbedding>,
    pub filters: SearchFilters,
    pub top_k: usize,
    /// Weighting used when both visual and text signals are present
    pub weights: HybridWeights,
}

impl<'a> RankQuery<'a> {
    pub fn new() -> Self {
        Self {
            visual: None,
            text: None,
            negative: None,
            filters: SearchFilters::default(),
            top_k: 10,
            weights: HybridWeights::LOOK,
        }
    }

    pub fn visual(embedding: &'a VisualEmbedding) -> Self {
        Self::new().with_visual(Some(embedding))
    }

    pub fn text(embedding: &'a TextEmbedding) -> Self {
        Self::new().with_text(Some(embedding))
    }

    #[must_use]
    pub fn with_visual(mut self, embedding: Option<&'a VisualEmbedding>) -> Self {
        self.visual = embedding;
        self
    }

    #[must_use]
    pub fn with_text(mut self, embedding: Option<&'a TextEmbedding>) -> Self {
        self.text = embedding;
        self
    }

    #[must_use]
    pub fn with_negative(mut self, embedding: Option<&'a TextEmbedding>) -> Self {
        self.negative = embedding;
        self
    }

    #[must_use]
    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    #[must_use]
    pub fn with_weights(mut self, weights: HybridWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn mode(&self) -> Result<ScoringMode> {
        match (self.visual, self.text) {
            (Some(_), Some(_)) => Ok(ScoringMode::Hybrid(self.weights)),
            (Some(_), None) => Ok(ScoringMode::Visual),
            (None, Some(_)) => Ok(ScoringMode::Text),
            (None, None) => Err(Error::EmptyQuery(
                "neither a visual nor a text embedding was provided".to_string(),
            )),
        }
    }

    /// Reject query embeddings whose size differs from the catalog's.
    /// `None` skips the check for that family.
    pub fn check_dims(&self, visual_dim: Option<usize>, text_dim: Option<usize>) -> Result<()> {
        let checks = [
            (self.visual.map(|e| e.dim()), visual_dim),
            (self.text.map(|e| e.dim()), text_dim),
            (self.negative.map(|e| e.dim()), text_dim),
        ];
        for (actual, expected) in checks {
            if let (Some(actual), Some(expected)) = (actual, expected) {
                if actual != expected {
                    return Err(Error::InvalidDimension { expected, actual });
                }
            }
        }
        Ok(())
    }
}

impl Default for RankQuery<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// A ranked catalog item with its distance breakdown
#[derive(Debug, Clone)]
pub struct ScoredMatch {
    pub item: CatalogItem,
    /// Composite distance, lower is better
    pub distance: f32,
    /// `max(0, 1 - distance)`
    pub score: f32,
    pub visual_distance: Option<f32>,
    pub text_distance: Option<f32>,
    /// Similarity to the negative query, `1 - negative distance`
    pub negative_similarity: Option<f32>,
}

#[derive(Debug, Clone, Copy)]
struct Scores {
    distance: f32,
    visual_distance: Option<f32>,
    text_distance: Option<f32>,
    negative_similarity: Option<f32>,
}

#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    config: RankingConfig,
}

impl RankingEngine {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Clamp a caller-supplied `top_k` into the configured bounds
    pub fn clamp_top_k(&self, top_k: usize) -> usize {
        let clamped = top_k.clamp(self.config.min_top_k, self.config.max_top_k);
        if clamped != top_k {
            warn!(
                "top_k {} outside {}..={}, using {}",
                top_k, self.config.min_top_k, self.config.max_top_k, clamped
            );
        }
        clamped
    }

    /// Rank `items` against `query`.
    ///
    /// Items missing an embedding the mode needs are skipped. The negative
    /// penalty applies in every mode, to items that carry a text embedding.
    pub fn rank(&self, items: &[CatalogItem], query: &RankQuery<'_>) -> Result<Vec<ScoredMatch>> {
        let mode = query.mode()?;
        query.check_dims(
            items
                .iter()
                .find_map(|item| item.visual_embedding.as_ref().map(|e| e.dim())),
            items
                .iter()
                .find_map(|item| item.text_embedding.as_ref().map(|e| e.dim())),
        )?;
        let top_k = self.clamp_top_k(query.top_k);
        let penalty_weight = if query.visual.is_some() {
            self.config.image_penalty
        } else {
            self.config.text_penalty
        };
        let filter = query.filters.to_filter();

        let mut scored: Vec<(usize, Scores)> = items
            .par_iter()
            .enumerate()
            .filter(|(_, item)| filter.matches(item))
            .filter_map(|(idx, item)| {
                Self::score_item(item, query, mode, penalty_weight).map(|s| (idx, s))
            })
            .collect();

        debug!(
            "Scored {} of {} items with {:?}",
            scored.len(),
            items.len(),
            mode
        );

        scored.sort_by_key(|(idx, s)| (OrderedFloat(s.distance), *idx));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(idx, s)| ScoredMatch {
                item: items[idx].clone(),
                distance: s.distance,
                score: similarity_score(s.distance),
                visual_distance: s.visual_distance,
                text_distance: s.text_distance,
                negative_similarity: s.negative_similarity,
            })
            .collect())
    }

    /// Rank the items of a catalog store
    pub fn rank_catalog(&self, catalog: &Catalog, query: &RankQuery<'_>) -> Result<Vec<ScoredMatch>> {
        let config = catalog.config();
        query.check_dims(Some(config.visual_dim), Some(config.text_dim))?;
        catalog.with_items(|items| self.rank(items, query))
    }

    fn score_item(
        item: &CatalogItem,
        query: &RankQuery<'_>,
        mode: ScoringMode,
        penalty_weight: f32,
    ) -> Option<Scores> {
        let visual_distance = match query.visual {
            Some(q) => Some(item.visual_embedding.as_ref()?.cosine_distance(q)),
            None => None,
        };
        let text_distance = match query.text {
            Some(q) => Some(item.text_embedding.as_ref()?.cosine_distance(q)),
            None => None,
        };

        let mut distance = match (mode, visual_distance, text_distance) {
            (ScoringMode::Hybrid(weights), Some(v), Some(t)) => weights.combine(v, t),
            (ScoringMode::Visual, Some(v), _) => v,
            (ScoringMode::Text, _, Some(t)) => t,
            _ => return None,
        };

        let negative_similarity = match (query.negative, item.text_embedding.as_ref()) {
            (Some(negative), Some(item_text)) => {
                let negative_distance = item_text.cosine_distance(negative);
                distance += negative_penalty(negative_distance, penalty_weight);
                Some(1.0 - negative_distance)
            }
            _ => None,
        };

        Some(Scores {
            distance,
            visual_distance,
            text_distance,
            negative_similarity,
        })
    }
}
