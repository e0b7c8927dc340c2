//! Region heuristics
//!
//! Empirically tuned constants, kept as named configuration so they can be
//! tested and swapped without touching the selection logic.

use serde::{Deserialize, Serialize};
use stylematch_core::{Category, Error, Result};
use crate::detection::{
    KeypointIndex, BACKPACK_CLASS_ID, BOTTLE_CLASS_ID, HANDBAG_CLASS_ID, SUITCASE_CLASS_ID,
};

/// Keypoint subset and symmetric padding fraction for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeypointRule {
    pub indices: Vec<usize>,
    pub padding: f32,
}

impl KeypointRule {
    fn new(indices: &[KeypointIndex], padding: f32) -> Self {
        Self {
            indices: indices.iter().map(|k| k.idx()).collect(),
            padding,
        }
    }
}

/// Asymmetric padding for footwear.
///
/// Shoes sit below the ankle keypoints, so the downward pad is much larger than
/// the upward one, and both are floored by the person size to survive a narrow
/// keypoint spread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootwearRule {
    pub indices: Vec<usize>,
    /// Horizontal pad as a fraction of the keypoint spread width
    pub horizontal_spread: f32,
    /// Floor for the horizontal pad as a fraction of the person width
    pub horizontal_person: f32,
    /// Upward pad as a fraction of the keypoint spread height
    pub up_spread: f32,
    /// Downward pad as a fraction of the keypoint spread height
    pub down_spread: f32,
    /// Floor for the downward pad as a fraction of the person height
    pub down_person: f32,
}

impl Default for FootwearRule {
    fn default() -> Self {
        Self {
            indices: [
                KeypointIndex::LeftKnee,
                KeypointIndex::RightKnee,
                KeypointIndex::LeftAnkle,
                KeypointIndex::RightAnkle,
            ]
            .iter()
            .map(|k| k.idx())
            .collect(),
            horizontal_spread: 0.8,
            horizontal_person: 0.3,
            up_spread: 0.2,
            down_spread: 1.0,
            down_person: 0.25,
        }
    }
}

/// Vertical slice of the person box used when keypoints are unavailable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "fraction")]
pub enum PersonSlice {
    /// Top fraction of the person height
    Top(f32),
    /// Everything below `fraction` of the person height
    Below(f32),
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    pub tops: KeypointRule,
    pub bottoms: KeypointRule,
    pub outerwear: KeypointRule,
    pub footwear: FootwearRule,
    pub tops_fallback: PersonSlice,
    pub bottoms_fallback: PersonSlice,
    /// Keypoint boxes with either side at or under this many pixels are discarded
    pub degenerate_px: f32,
    /// Minimum crop side in pixels
    pub min_size_px: u32,
    /// Padding fraction around object detections
    pub object_padding: f32,
    pub bag_classes: Vec<u32>,
    pub bottle_classes: Vec<u32>,
    /// Detector confidence threshold for pose and object passes
    pub detect_confidence: f32,
}

impl Default for RegionConfig {
    fn default() -> Self {
        use KeypointIndex::*;
        Self {
            tops: KeypointRule::new(&[LeftShoulder, RightShoulder, LeftHip, RightHip], 0.2),
            bottoms: KeypointRule::new(&[LeftHip, RightHip, LeftAnkle, RightAnkle], 0.1),
            outerwear: KeypointRule::new(&[LeftShoulder, RightShoulder, LeftKnee, RightKnee], 0.15),
            footwear: FootwearRule::default(),
            tops_fallback: PersonSlice::Top(0.6),
            bottoms_fallback: PersonSlice::Below(0.4),
            degenerate_px: 10.0,
            min_size_px: 50,
            object_padding: 0.1,
            bag_classes: vec![BACKPACK_CLASS_ID, HANDBAG_CLASS_ID, SUITCASE_CLASS_ID],
            bottle_classes: vec![BOTTLE_CLASS_ID],
            detect_confidence: 0.25,
        }
    }
}

impl RegionConfig {
    /// Person-box slice used when the category's keypoints are all absent
    pub fn fallback_slice(&self, category: Category) -> PersonSlice {
        match category {
            Category::Tops => self.tops_fallback,
            Category::Bottoms => self.bottoms_fallback,
            _ => PersonSlice::Full,
        }
    }

    /// Object-detector class allow-list, empty for skeleton categories
    pub fn object_classes(&self, category: Category) -> &[u32] {
        match category {
            Category::Bags => &self.bag_classes,
            Category::Bottles => &self.bottle_classes,
            _ => &[],
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fractions = [
            ("tops.padding", self.tops.padding),
            ("bottoms.padding", self.bottoms.padding),
            ("outerwear.padding", self.outerwear.padding),
            ("object_padding", self.object_padding),
            ("footwear.horizontal_spread", self.footwear.horizontal_spread),
            ("footwear.horizontal_person", self.footwear.horizontal_person),
            ("footwear.up_spread", self.footwear.up_spread),
            ("footwear.down_spread", self.footwear.down_spread),
            ("footwear.down_person", self.footwear.down_person),
        ];
        for (name, value) in fractions {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(Error::InvalidConfig(format!("{} must be >= 0, got {}", name, value)));
            }
        }

        for slice in [self.tops_fallback, self.bottoms_fallback] {
            match slice {
                PersonSlice::Top(f) | PersonSlice::Below(f) if !(0.0..=1.0).contains(&f) => {
                    return Err(Error::InvalidConfig(format!("slice fraction {} outside [0, 1]", f)));
                }
                _ => {}
            }
        }

        if self.min_size_px == 0 {
            return Err(Error::InvalidConfig("min_size_px must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.detect_confidence) {
            return Err(Error::InvalidConfig(format!(
                "detect_confidence {} outside [0, 1]",
                self.detect_confidence
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RegionConfig::default();
        config.validate().unwrap();
        assert_eq!(config.tops.indices, vec![5, 6, 11, 12]);
        assert_eq!(config.bottoms.indices, vec![11, 12, 15, 16]);
        assert_eq!(config.outerwear.indices, vec![5, 6, 13, 14]);
        assert_eq!(config.footwear.indices, vec![13, 14, 15, 16]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: RegionConfig =
            serde_json::from_str(r#"{"min_size_px": 64, "tops_fallback": {"kind": "top", "fraction": 0.5}}"#).unwrap();
        assert_eq!(config.min_size_px, 64);
        assert_eq!(config.tops_fallback, PersonSlice::Top(0.5));
        assert_eq!(config.degenerate_px, 10.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = RegionConfig::default();
        config.bottoms_fallback = PersonSlice::Below(1.5);
        assert!(config.validate().is_err());

        let mut config = RegionConfig::default();
        config.footwear.down_person = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_object_classes() {
        let config = RegionConfig::default();
        assert_eq!(config.object_classes(Category::Bottles), &[BOTTLE_CLASS_ID]);
        assert!(config.object_classes(Category::Tops).is_empty());
    }
}
