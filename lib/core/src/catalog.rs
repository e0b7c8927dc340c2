use crate::{CatalogItem, Category, Error, Result};
use ahash::AHashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Configuration for a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub visual_dim: usize,
    pub text_dim: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        // CLIP ViT-B/32 and MiniLM-L6
        Self {
            visual_dim: 512,
            text_dim: 384,
        }
    }
}

struct Items {
    ordered: Vec<CatalogItem>,
    index: AHashMap<String, usize>,
}

/// Product catalog, read-only from the ranking side.
///
/// Iteration order is insertion order; an upsert of an existing id replaces
/// the item in place so ranking tie-breaks stay stable across imports.
#[derive(Clone)]
pub struct Catalog {
    config: CatalogConfig,
    items: Arc<RwLock<Items>>,
}

impl Catalog {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            items: Arc::new(RwLock::new(Items {
                ordered: Vec::new(),
                index: AHashMap::new(),
            })),
        }
    }

    pub fn config(&self) -> CatalogConfig {
        self.config
    }

    pub fn len(&self) -> usize {
        self.items.read().ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_dims(&self, item: &CatalogItem) -> Result<()> {
        if let Some(v) = &item.visual_embedding {
            if v.dim() != self.config.visual_dim {
                return Err(Error::InvalidDimension {
                    expected: self.config.visual_dim,
                    actual: v.dim(),
                });
            }
        }
        if let Some(t) = &item.text_embedding {
            if t.dim() != self.config.text_dim {
                return Err(Error::InvalidDimension {
                    expected: self.config.text_dim,
                    actual: t.dim(),
                });
            }
        }
        Ok(())
    }

    /// Insert or update an item
    pub fn upsert(&self, item: CatalogItem) -> Result<()> {
        self.check_dims(&item)?;

        let mut items = self.items.write();
        let key = item.id.as_str().to_string();
        if let Some(&pos) = items.index.get(&key) {
            items.ordered[pos] = item;
        } else {
            let pos = items.ordered.len();
            items.ordered.push(item);
            items.index.insert(key, pos);
        }
        Ok(())
    }

    pub fn batch_upsert(&self, items: Vec<CatalogItem>) -> Result<()> {
        for item in items {
            self.upsert(item)?;
        }
        Ok(())
    }

    /// Get an item by product id
    pub fn get(&self, id: &str) -> Option<CatalogItem> {
        let items = self.items.read();
        items.index.get(id).map(|&pos| items.ordered[pos].clone())
    }

    /// Run `f` over the items in catalog order while holding a read lock
    pub fn with_items<R>(&self, f: impl FnOnce(&[CatalogItem]) -> R) -> R {
        let items = self.items.read();
        f(&items.ordered)
    }

    pub fn categories_present(&self) -> BTreeSet<Category> {
        self.with_items(|items| items.iter().map(|i| i.category).collect())
    }

    /// Import a JSON array of catalog items
    pub fn load_json<P: AsRef<Path>>(path: P, config: CatalogConfig) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading catalog from {:?}", path);
        let bytes = std::fs::read(path)?;
        let items: Vec<CatalogItem> = serde_json::from_slice(&bytes)?;

        let catalog = Catalog::new(config);
        catalog.batch_upsert(items)?;
        info!("Loaded {} catalog items from {:?}", catalog.len(), path);
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TextEmbedding, VisualEmbedding};
    use std::io::Write;

    fn small_config() -> CatalogConfig {
        CatalogConfig {
            visual_dim: 2,
            text_dim: 3,
        }
    }

    #[test]
    fn test_upsert_preserves_order() {
        let catalog = Catalog::new(small_config());
        catalog.upsert(CatalogItem::new("a", "A", Category::Tops, 1.0)).unwrap();
        catalog.upsert(CatalogItem::new("b", "B", Category::Tops, 2.0)).unwrap();
        catalog.upsert(CatalogItem::new("a", "A2", Category::Tops, 3.0)).unwrap();

        assert_eq!(catalog.len(), 2);
        let titles = catalog.with_items(|items| {
            items.iter().map(|i| i.title.clone()).collect::<Vec<_>>()
        });
        assert_eq!(titles, vec!["A2", "B"]);
        assert_eq!(catalog.get("a").unwrap().price, 3.0);
    }

    #[test]
    fn test_dimension_check() {
        let catalog = Catalog::new(small_config());
        let bad = CatalogItem::new("a", "A", Category::Tops, 1.0)
            .with_visual(VisualEmbedding::new(vec![1.0, 0.0, 0.0]));
        assert!(matches!(
            catalog.upsert(bad),
            Err(Error::InvalidDimension { expected: 2, actual: 3 })
        ));

        let bad_text = CatalogItem::new("b", "B", Category::Tops, 1.0)
            .with_text(TextEmbedding::new(vec![1.0]));
        assert!(catalog.upsert(bad_text).is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": "p1", "title": "Linen shirt", "category": "tops", "price": 35.0,
                  "visual_embedding": [1.0, 0.0], "text_embedding": [0.0, 1.0, 0.0]}},
                {{"id": "p2", "title": "Loafers", "category": "footwear", "price": 120.0}}
            ]"#
        )
        .unwrap();

        let catalog = Catalog::load_json(file.path(), small_config()).unwrap();
        assert_eq!(catalog.len(), 2);
        let present = catalog.categories_present();
        assert!(present.contains(&Category::Tops));
        assert!(present.contains(&Category::Footwear));
    }
}
