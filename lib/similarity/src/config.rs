use serde::{Deserialize, Serialize};
use stylematch_core::{Error, Result};
use crate::distance::{HybridWeights, IMAGE_ANCHORED_PENALTY, TEXT_ONLY_PENALTY};

/// Ranking constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub category_weights: HybridWeights,
    pub look_weights: HybridWeights,
    pub image_penalty: f32,
    pub text_penalty: f32,
    pub min_top_k: usize,
    pub max_top_k: usize,
    pub default_top_k: usize,
    /// Results kept per category in "shop the look"
    pub look_per_category: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            category_weights: HybridWeights::CATEGORY_FOCUSED,
            look_weights: HybridWeights::LOOK,
            image_penalty: IMAGE_ANCHORED_PENALTY,
            text_penalty: TEXT_ONLY_PENALTY,
            min_top_k: 1,
            max_top_k: 50,
            default_top_k: 10,
            look_per_category: 4,
        }
    }
}

impl RankingConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, weights) in [("category_weights", self.category_weights), ("look_weights", self.look_weights)] {
            if weights.visual < 0.0 || weights.text < 0.0 || weights.visual + weights.text <= 0.0 {
                return Err(Error::InvalidConfig(format!("{} must be non-negative and not both zero", name)));
            }
        }
        if self.image_penalty < 0.0 || self.text_penalty < 0.0 {
            return Err(Error::InvalidConfig("penalty weights must be non-negative".to_string()));
        }
        if self.min_top_k == 0 || self.min_top_k > self.max_top_k {
            return Err(Error::InvalidConfig(format!(
                "top_k bounds {}..={} are invalid",
                self.min_top_k, self.max_top_k
            )));
        }
        if !(self.min_top_k..=self.max_top_k).contains(&self.default_top_k) {
            return Err(Error::InvalidConfig(format!(
                "default_top_k {} outside {}..={}",
                self.default_top_k, self.min_top_k, self.max_top_k
            )));
        }
        if self.look_per_category == 0 {
            return Err(Error::InvalidConfig("look_per_category must be positive".to_string()));
        }
        Ok(())
    }
}
