//! # stylematch Core
//!
//! Core library for the stylematch product-matching engine.
//!
//! This crate provides the shared data model:
//!
//! - [`Embedding`] - Family-tagged embedding vectors with cosine distance
//! - [`Category`] - The fixed garment category enumeration
//! - [`CatalogItem`] - A product with stored visual and semantic embeddings
//! - [`Catalog`] - Read-mostly product store iterated in stable order
//! - [`SearchFilters`] - Category, brand, color and price filters
//!
//! ## Example
//!
//! ```rust
//! use stylematch_core::{Catalog, CatalogConfig, CatalogItem, Category, VisualEmbedding};
//!
//! let catalog = Catalog::new(CatalogConfig { visual_dim: 3, text_dim: 3 });
//! let item = CatalogItem::new("sku-1", "White sneakers", Category::Footwear, 89.0)
//!     .with_visual(VisualEmbedding::new(vec![1.0, 0.0, 0.0]));
//! catalog.upsert(item).unwrap();
//! assert_eq!(catalog.len(), 1);
//! ```

pub mod catalog;
pub mod category;
pub mod error;
pub mod filter;
pub mod item;
pub mod vector;

pub use catalog::{Catalog, CatalogConfig};
pub use category::{Category, LOOK_CATEGORIES};
pub use error::{Error, Result};
pub use filter::{parse_price, Filter, FilterCondition, ItemFilter, SearchFilters};
pub use item::{CatalogItem, ProductId};
pub use vector::{Embedding, Family, Semantic, TextEmbedding, Visual, VisualEmbedding};
