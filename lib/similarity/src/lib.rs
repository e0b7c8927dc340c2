//! # stylematch Similarity
//!
//! Hybrid visual/text ranking over a product catalog.
//!
//! ## Features
//!
//! - **Scoring modes**: visual only, text only, or a weighted hybrid of both
//! - **Negative queries**: soft penalty for items resembling an excluded concept
//! - **Filters**: conjunctive category, brand, color and price constraints
//! - **Shop the look**: per-category complementary matches
//! - **Query parsing**: structured filters from natural-language text
//!
//! ## Example
//!
//! ```rust
//! use stylematch_core::{CatalogItem, Category, VisualEmbedding};
//! use stylematch_similarity::{RankQuery, RankingEngine};
//!
//! let items = vec![
//!     CatalogItem::new("a", "Canvas sneaker", Category::Footwear, 60.0)
//!         .with_visual(VisualEmbedding::new(vec![1.0, 0.0])),
//!     CatalogItem::new("b", "Wool coat", Category::Outerwear, 180.0)
//!         .with_visual(VisualEmbedding::new(vec![0.0, 1.0])),
//! ];
//!
//! let engine = RankingEngine::default();
//! let query = VisualEmbedding::new(vec![0.9, 0.1]);
//! let results = engine.rank(&items, &RankQuery::visual(&query)).unwrap();
//! assert_eq!(results[0].item.id.as_str(), "a");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Filters   │────>│   Scoring   │────>│  Sort/TopK  │
//! │ (payload)   │     │ (hybrid+neg)│     │ (stable)    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```

pub mod config;
pub mod distance;
pub mod look;
pub mod parser;
pub mod rank;

// Re-export main types for convenience
pub use config::RankingConfig;
pub use distance::{
    negative_penalty, similarity_score, HybridWeights, IMAGE_ANCHORED_PENALTY, TEXT_ONLY_PENALTY,
};
pub use look::{resolve_targets, CategoryMatches};
pub use parser::{parse_or_fallback, ParsedQuery, QueryParser};
pub use rank::{RankQuery, RankingEngine, ScoredMatch, ScoringMode};
