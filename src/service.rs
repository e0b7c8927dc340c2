//! Request orchestration: image search, text search and "shop the look".

use crate::config::AppConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stylematch_core::{
    Catalog, Category, Error, ProductId, Result, SearchFilters, TextEmbedding,
};
use stylematch_similarity::{
    parse_or_fallback, CategoryMatches, ParsedQuery, QueryParser, RankQuery,
    RankingEngine, ScoredMatch,
};
use image::DynamicImage;
use stylematch_vision::{decode_image, EmbeddingQueryBuilder, ModelHandles, NormalizedRegion};
use tracing::{info, warn};

/// Image search parameters. Everything besides the image is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSearchRequest {
    pub text: Option<String>,
    pub negative_text: Option<String>,
    pub category: Option<Category>,
    pub brand: Option<String>,
    pub color: Option<String>,
    /// Raw price ceiling, e.g. "$120"; unparseable values are ignored
    pub max_price: Option<String>,
    pub top_k: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LookRequest {
    pub text: Option<String>,
    /// Empty means the default look categories
    pub categories: Vec<Category>,
    /// Category of the garment in the photo
    pub source_category: Option<Category>,
    pub max_price: Option<String>,
}

/// Caller-facing match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMatch {
    pub id: ProductId,
    pub title: String,
    pub brand: String,
    pub category: Category,
    pub price: f64,
    pub image_url: Option<String>,
    pub product_url: Option<String>,
    pub score: f32,
    pub distance: f32,
}

impl From<ScoredMatch> for ProductMatch {
    fn from(scored: ScoredMatch) -> Self {
        let item = scored.item;
        Self {
            id: item.id,
            title: item.title,
            brand: item.brand,
            category: item.category,
            price: item.price,
            image_url: item.image_url,
            product_url: item.product_url,
            score: scored.score,
            distance: scored.distance,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub matches: Vec<ProductMatch>,
    /// Detected garment region, normalized to the image size
    pub region: Option<NormalizedRegion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextSearchResponse {
    pub parsed: ParsedQuery,
    pub matches: Vec<ProductMatch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LookGroup {
    pub category: Category,
    pub matches: Vec<ProductMatch>,
}

impl From<CategoryMatches> for LookGroup {
    fn from(group: CategoryMatches) -> Self {
        Self {
            category: group.category,
            matches: group.matches.into_iter().map(ProductMatch::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LookResponse {
    pub region: Option<NormalizedRegion>,
    pub looks: Vec<LookGroup>,
}

/// Shared, read-only search state. Cheap to clone across request threads.
#[derive(Clone)]
pub struct SearchService {
    catalog: Catalog,
    queries: EmbeddingQueryBuilder,
    engine: Arc<RankingEngine>,
    parser: Option<Arc<dyn QueryParser>>,
}

impl SearchService {
    pub fn new(config: AppConfig, catalog: Catalog, models: ModelHandles) -> Self {
        Self {
            catalog,
            queries: EmbeddingQueryBuilder::new(models, config.region),
            engine: Arc::new(RankingEngine::new(config.ranking)),
            parser: None,
        }
    }

    #[must_use]
    pub fn with_parser(mut self, parser: Arc<dyn QueryParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn engine(&self) -> &RankingEngine {
        &self.engine
    }

    /// Decode raw upload bytes and search
    pub fn search_by_image_bytes(
        &self,
        bytes: &[u8],
        request: &ImageSearchRequest,
    ) -> Result<SearchResponse> {
        let image = decode_image(bytes)?;
        self.search_by_image(&image, request)
    }

    pub fn search_by_image(
        &self,
        image: &DynamicImage,
        request: &ImageSearchRequest,
    ) -> Result<SearchResponse> {
        let query = self.queries.build_query_embedding(image, request.category)?;
        let models = self.queries.handles();
        let text = models.embed_text_or_absent(request.text.as_deref());
        let negative = models.embed_text_or_absent(request.negative_text.as_deref());

        let config = self.engine.config();
        let weights = if request.category.is_some() && text.is_some() {
            config.category_weights
        } else {
            config.look_weights
        };

        let filters = SearchFilters {
            category: request.category.map(|c| c.as_str().to_string()),
            brand: request.brand.clone(),
            color: request.color.clone(),
            max_price: None,
        }
        .with_raw_max_price(request.max_price.as_deref());

        let rank_query = RankQuery::visual(&query.visual)
            .with_text(text.as_ref())
            .with_negative(negative.as_ref())
            .with_filters(filters)
            .with_weights(weights)
            .with_top_k(request.top_k.unwrap_or(config.default_top_k));

        let matches = self.rank(&rank_query)?;
        info!(
            "Image search returned {} matches (category {:?})",
            matches.len(),
            request.category
        );
        Ok(SearchResponse {
            matches,
            region: query.normalized_region(),
        })
    }

    /// Free-text search. The refined query is the primary signal, so a text
    /// encoder failure on it fails the request.
    pub fn search_by_text(&self, text: &str, top_k: Option<usize>) -> Result<TextSearchResponse> {
        if text.trim().is_empty() {
            return Err(Error::EmptyQuery("search text is blank".to_string()));
        }

        let parsed = parse_or_fallback(self.parser.as_deref(), text);
        let models = self.queries.handles();
        let positive = self.embed_primary_text(&parsed.refined_query)?;
        let negative = models.embed_text_or_absent(parsed.negative_query.as_deref());

        let rank_query = RankQuery::text(&positive)
            .with_negative(negative.as_ref())
            .with_filters(parsed.filters())
            .with_top_k(top_k.unwrap_or(self.engine.config().default_top_k));

        let matches = self.rank(&rank_query)?;
        info!("Text search '{}' returned {} matches", parsed.refined_query, matches.len());
        Ok(TextSearchResponse { parsed, matches })
    }

    /// Complementary items per category for the outfit in `image`
    pub fn shop_the_look(&self, image: &DynamicImage, request: &LookRequest) -> Result<LookResponse> {
        let query = self.queries.build_query_embedding(image, None)?;
        let text = self
            .queries
            .handles()
            .embed_text_or_absent(request.text.as_deref());

        let rank_query = RankQuery::visual(&query.visual)
            .with_text(text.as_ref())
            .with_filters(SearchFilters::new().with_raw_max_price(request.max_price.as_deref()));

        let looks = self.catalog.with_items(|items| {
            self.engine
                .shop_the_look(items, &rank_query, &request.categories, request.source_category)
        })?;

        Ok(LookResponse {
            region: query.normalized_region(),
            looks: looks.into_iter().map(LookGroup::from).collect(),
        })
    }

    fn embed_primary_text(&self, text: &str) -> Result<TextEmbedding> {
        let embedding = self
            .queries
            .handles()
            .text
            .embed_text(text)
            .map_err(|e| Error::Encoding(format!("text embedding failed: {e}")))?;
        if embedding.is_empty() {
            warn!("Text encoder returned an empty embedding for '{}'", text);
            return Err(Error::Encoding("text encoder returned an empty embedding".to_string()));
        }
        Ok(embedding.normalized())
    }

    fn rank(&self, query: &RankQuery<'_>) -> Result<Vec<ProductMatch>> {
        Ok(self
            .engine
            .rank_catalog(&self.catalog, query)?
            .into_iter()
            .map(ProductMatch::from)
            .collect())
    }
}
