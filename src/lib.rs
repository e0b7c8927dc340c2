//! # stylematch
//!
//! Visual and textual product matching for fashion search.
//!
//! stylematch isolates the garment a shopper cares about in a photo, embeds
//! that crop, and ranks catalog products by a composite of visual similarity,
//! text similarity and a soft penalty against excluded attributes.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! stylematch region --detection person.json --category footwear --width 640 --height 640
//! stylematch rank --catalog catalog.json --request query.json
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use stylematch::prelude::*;
//!
//! let catalog = Catalog::new(CatalogConfig { visual_dim: 2, text_dim: 2 });
//! catalog
//!     .upsert(
//!         CatalogItem::new("sku-1", "White canvas sneaker", Category::Footwear, 59.0)
//!             .with_visual(VisualEmbedding::new(vec![1.0, 0.0]))
//!             .with_text(TextEmbedding::new(vec![0.0, 1.0])),
//!     )
//!     .unwrap();
//!
//! let engine = RankingEngine::default();
//! let query = VisualEmbedding::new(vec![0.8, 0.2]);
//! let results = engine.rank_catalog(&catalog, &RankQuery::visual(&query)).unwrap();
//! assert_eq!(results.len(), 1);
//! ```
//!
//! ## Crate Structure
//!
//! - [`stylematch-core`](stylematch_core) - embeddings, categories, catalog, filters, errors
//! - [`stylematch-vision`](stylematch_vision) - keypoint geometry, region selection, query embedding
//! - [`stylematch-similarity`](stylematch_similarity) - hybrid ranking, shop the look, query parsing

pub mod config;
pub mod service;

// Re-export core types
pub use stylematch_core::{
    Catalog, CatalogConfig, CatalogItem, Category, Error, ProductId, Result, SearchFilters,
    TextEmbedding, VisualEmbedding,
};

// Re-export vision
pub use stylematch_vision::{
    EmbeddingQueryBuilder, ModelHandles, NormalizedRegion, ObjectRegionSelector, Region,
    RegionConfig, RegionSelector, SelectedRegion,
};

// Re-export ranking
pub use stylematch_similarity::{
    HybridWeights, ParsedQuery, QueryParser, RankQuery, RankingConfig, RankingEngine, ScoredMatch,
};

pub use config::AppConfig;
pub use service::{ImageSearchRequest, LookRequest, ProductMatch, SearchService};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AppConfig, Catalog, CatalogConfig, CatalogItem, Category, EmbeddingQueryBuilder, Error,
        HybridWeights, ImageSearchRequest, LookRequest, ModelHandles, ProductMatch, RankQuery,
        RankingEngine, RegionSelector, Result, SearchFilters, SearchService, TextEmbedding,
        VisualEmbedding,
    };
}
