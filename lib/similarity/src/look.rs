//! "Shop the look": one ranking pass per complementary category.

use crate::rank::{RankQuery, RankingEngine, ScoredMatch};
use stylematch_core::{Category, Result, SearchFilters, LOOK_CATEGORIES};
use tracing::debug;

/// Matches for one target category
#[derive(Debug, Clone)]
pub struct CategoryMatches {
    pub category: Category,
    pub matches: Vec<ScoredMatch>,
}

/// Resolve the categories to search.
///
/// An empty request means every look category. Duplicates collapse in
/// request order. The source garment's own category is dropped whenever
/// more than one target remains, so a single explicit target is honored.
pub fn resolve_targets(requested: &[Category], source: Option<Category>) -> Vec<Category> {
    let base: &[Category] = if requested.is_empty() {
        &LOOK_CATEGORIES
    } else {
        requested
    };

    let mut targets: Vec<Category> = Vec::with_capacity(base.len());
    for category in base {
        if !targets.contains(category) {
            targets.push(*category);
        }
    }

    if targets.len() > 1 {
        if let Some(source) = source {
            targets.retain(|c| *c != source);
        }
    }
    targets
}

impl RankingEngine {
    /// Rank complementary items for each target category.
    ///
    /// The query's own category filter is replaced per target, other filters
    /// still apply. Hybrid queries use the look weights. Categories with no
    /// surviving items are omitted.
    pub fn shop_the_look(
        &self,
        items: &[stylematch_core::CatalogItem],
        query: &RankQuery<'_>,
        requested: &[Category],
        source: Option<Category>,
    ) -> Result<Vec<CategoryMatches>> {
        // Surface an empty query before doing any per-category work
        query.mode()?;

        let per_category = self.config().look_per_category;
        let mut looks = Vec::new();

        for category in resolve_targets(requested, source) {
            let filters = SearchFilters {
                category: Some(category.as_str().to_string()),
                ..query.filters.clone()
            };
            let scoped = query
                .clone()
                .with_filters(filters)
                .with_weights(self.config().look_weights)
                .with_top_k(per_category);

            let matches: Vec<ScoredMatch> = self
                .rank(items, &scoped)?
                .into_iter()
                .filter(|m| m.item.category == category)
                .collect();

            debug!("Look category {}: {} matches", category, matches.len());
            if !matches.is_empty() {
                looks.push(CategoryMatches { category, matches });
            }
        }

        Ok(looks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylematch_core::{CatalogItem, VisualEmbedding};

    fn item(id: &str, category: Category, visual: Vec<f32>) -> CatalogItem {
        CatalogItem::new(id, id, category, 20.0).with_visual(VisualEmbedding::new(visual))
    }

    #[test]
    fn test_resolve_excludes_source() {
        let targets = resolve_targets(&[Category::Tops, Category::Footwear], Some(Category::Footwear));
        assert_eq!(targets, vec![Category::Tops]);
    }

    #[test]
    fn test_resolve_keeps_single_target() {
        let targets = resolve_targets(&[Category::Footwear], Some(Category::Footwear));
        assert_eq!(targets, vec![Category::Footwear]);
    }

    #[test]
    fn test_resolve_defaults_and_dedupes() {
        let targets = resolve_targets(&[], Some(Category::Tops));
        assert!(!targets.contains(&Category::Tops));
        assert_eq!(targets.len(), LOOK_CATEGORIES.len() - 1);

        let targets = resolve_targets(&[Category::Bags, Category::Bags, Category::Tops], None);
        assert_eq!(targets, vec![Category::Bags, Category::Tops]);
    }

    #[test]
    fn test_shop_the_look_groups_and_limits() {
        let engine = RankingEngine::default();
        let mut items = Vec::new();
        for i in 0..6 {
            items.push(item(&format!("top{i}"), Category::Tops, vec![1.0, i as f32 * 0.1]));
        }
        items.push(item("boot", Category::Footwear, vec![1.0, 0.0]));
        items.push(item("jacket", Category::Outerwear, vec![0.0, 1.0]));

        let query = VisualEmbedding::new(vec![1.0, 0.0]);
        let looks = engine
            .shop_the_look(
                &items,
                &RankQuery::visual(&query),
                &[Category::Tops, Category::Footwear, Category::Bottoms, Category::Outerwear],
                Some(Category::Outerwear),
            )
            .unwrap();

        let categories: Vec<Category> = looks.iter().map(|l| l.category).collect();
        // Bottoms has no items, outerwear is the source
        assert_eq!(categories, vec![Category::Tops, Category::Footwear]);
        assert_eq!(looks[0].matches.len(), 4);
        assert_eq!(looks[0].matches[0].item.id.as_str(), "top0");
        assert_eq!(looks[1].matches.len(), 1);
    }
}
