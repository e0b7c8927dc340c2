use stylematch_core::Category;
use tracing::debug;
use crate::config::RegionConfig;
use crate::detection::{best_detection, Detection};
use crate::region::{RegionSource, SelectedRegion};

/// Region selection for carried objects (bags, bottles) from object-detector output
#[derive(Debug, Clone, Default)]
pub struct ObjectRegionSelector {
    config: RegionConfig,
}

impl ObjectRegionSelector {
    pub fn new(config: RegionConfig) -> Self {
        Self { config }
    }

    /// Crop around the highest-confidence detection in the category's class
    /// allow-list, padded by the configured fraction on every side.
    ///
    /// `None` means nothing matched; the caller embeds the whole image instead.
    pub fn select(
        &self,
        detections: &[Detection],
        category: Category,
        image_width: u32,
        image_height: u32,
    ) -> Option<SelectedRegion> {
        let allowed = self.config.object_classes(category);
        let best = best_detection(
            detections,
            |d| d.confidence,
            |d| allowed.contains(&d.class_id),
        )?;

        debug!(
            "Object {} ({}) conf {:.2} for {}",
            best.class_id, best.class_name, best.confidence, category
        );

        Some(SelectedRegion::finalize(
            &best.bbox.padded(self.config.object_padding),
            RegionSource::Object,
            self.config.min_size_px,
            image_width,
            image_height,
        ))
    }
}
