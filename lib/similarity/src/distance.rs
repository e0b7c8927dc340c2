//! Distance composition
//!
//! Component distances are cosine distances in [0, 2] where 0 means identical.
//! Lower composite distance ranks first.

use serde::{Deserialize, Serialize};

/// Relative trust in the visual and text signals for hybrid ranking
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridWeights {
    pub visual: f32,
    pub text: f32,
}

impl HybridWeights {
    /// Explicit category requested with both image and text: text dominates
    pub const CATEGORY_FOCUSED: HybridWeights = HybridWeights {
        visual: 0.3,
        text: 0.7,
    };

    /// Cross-category "shop the look": the photo dominates
    pub const LOOK: HybridWeights = HybridWeights {
        visual: 0.6,
        text: 0.4,
    };

    #[inline]
    pub fn combine(&self, visual_distance: f32, text_distance: f32) -> f32 {
        self.visual * visual_distance + self.text * text_distance
    }
}

/// Penalty weight when an image anchors the search
pub const IMAGE_ANCHORED_PENALTY: f32 = 0.5;
/// Penalty weight for pure text searches
pub const TEXT_ONLY_PENALTY: f32 = 0.6;

/// Soft penalty for resembling an excluded concept.
///
/// `1 - negative_distance` is the item's similarity to the negative query, so
/// the penalty never decreases as the item gets closer to it.
#[inline]
pub fn negative_penalty(negative_distance: f32, weight: f32) -> f32 {
    (1.0 - negative_distance) * weight
}

/// Caller-facing similarity, saturating at 0
#[inline]
pub fn similarity_score(distance: f32) -> f32 {
    (1.0 - distance).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_focused_example() {
        let composite = HybridWeights::CATEGORY_FOCUSED.combine(0.1, 0.2);
        assert!((composite - 0.17).abs() < 1e-6);
        assert!((similarity_score(composite) - 0.83).abs() < 1e-6);
    }

    #[test]
    fn test_look_weights() {
        let composite = HybridWeights::LOOK.combine(0.1, 0.2);
        assert!((composite - 0.14).abs() < 1e-6);
    }

    #[test]
    fn test_score_saturates() {
        assert_eq!(similarity_score(0.0), 1.0);
        assert_eq!(similarity_score(1.7), 0.0);
    }

    #[test]
    fn test_penalty_monotonic_in_similarity() {
        let mut previous = f32::NEG_INFINITY;
        // Walk negative distance from 2 (opposite) down to 0 (identical)
        for step in 0..=20 {
            let negative_distance = 2.0 - step as f32 * 0.1;
            let total = 0.4 + negative_penalty(negative_distance, IMAGE_ANCHORED_PENALTY);
            assert!(total >= previous);
            previous = total;
        }
        assert!((negative_penalty(0.0, TEXT_ONLY_PENALTY) - 0.6).abs() < 1e-6);
    }
}
