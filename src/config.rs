//! Application configuration: JSON file plus environment overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use stylematch_core::{CatalogConfig, Error, Result};
use stylematch_similarity::RankingConfig;
use stylematch_vision::RegionConfig;
use tracing::{info, warn};

pub const ENV_TOP_K: &str = "STYLEMATCH_TOP_K";
pub const ENV_MIN_REGION: &str = "STYLEMATCH_MIN_REGION";
pub const ENV_DETECT_CONFIDENCE: &str = "STYLEMATCH_DETECT_CONFIDENCE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub region: RegionConfig,
    pub ranking: RankingConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Load from an optional JSON file, apply environment overrides, validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                info!("Loading configuration from {:?}", path);
                let raw = std::fs::read_to_string(path)?;
                serde_json::from_str(&raw)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from `lookup`. Unparseable values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(top_k) = parse_override::<usize>(&lookup, ENV_TOP_K) {
            self.ranking.default_top_k = top_k;
        }
        if let Some(min_size) = parse_override::<u32>(&lookup, ENV_MIN_REGION) {
            self.region.min_size_px = min_size;
        }
        if let Some(confidence) = parse_override::<f32>(&lookup, ENV_DETECT_CONFIDENCE) {
            self.region.detect_confidence = confidence;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.region.validate()?;
        self.ranking.validate()?;
        if self.catalog.visual_dim == 0 || self.catalog.text_dim == 0 {
            return Err(Error::InvalidConfig(
                "catalog embedding dimensions must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(lookup(&[
            (ENV_TOP_K, "25"),
            (ENV_MIN_REGION, "64"),
            (ENV_DETECT_CONFIDENCE, "oops"),
        ]));
        assert_eq!(config.ranking.default_top_k, 25);
        assert_eq!(config.region.min_size_px, 64);
        assert_eq!(config.region.detect_confidence, RegionConfig::default().detect_confidence);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"ranking": {{"look_per_category": 2}}}}"#).unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.ranking.look_per_category, 2);
        assert_eq!(config.ranking.max_top_k, 50);
        assert_eq!(config.region.min_size_px, RegionConfig::default().min_size_px);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"ranking": {{"min_top_k": 0}}}}"#).unwrap();
        assert!(AppConfig::load(Some(file.path())).is_err());
    }
}
