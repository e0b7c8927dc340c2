use serde::{Deserialize, Serialize};
use std::fmt;
use crate::category::Category;
use crate::vector::{TextEmbedding, VisualEmbedding};

/// Unique product identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A catalog product with its stored embeddings.
///
/// Embeddings are optional because the import process may not have produced
/// them yet; ranking skips items missing the embedding a query needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub brand: String,
    pub category: Category,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub style_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_embedding: Option<VisualEmbedding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_embedding: Option<TextEmbedding>,
}

impl CatalogItem {
    #[must_use]
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>, category: Category, price: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            brand: String::new(),
            category,
            price,
            image_url: None,
            product_url: None,
            colors: Vec::new(),
            style_tags: Vec::new(),
            visual_embedding: None,
            text_embedding: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_colors(mut self, colors: Vec<String>) -> Self {
        self.colors = colors;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_visual(mut self, embedding: VisualEmbedding) -> Self {
        self.visual_embedding = Some(embedding);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_text(mut self, embedding: TextEmbedding) -> Self {
        self.text_embedding = Some(embedding);
        self
    }
}
