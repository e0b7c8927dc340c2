//! Query embedding
//!
//! detect -> select region -> crop -> embed. Detection and selection problems
//! are recovered here by embedding the whole image; only a failure of the image
//! encoder itself reaches the caller.

use image::{DynamicImage, GenericImageView};
use stylematch_core::{Category, Error, Result, VisualEmbedding};
use tracing::{debug, info, warn};
use crate::config::RegionConfig;
use crate::crop::{crop, CropArtifact};
use crate::detection::best_person;
use crate::encoder::ModelHandles;
use crate::geometry::NormalizedRegion;
use crate::object::ObjectRegionSelector;
use crate::region::{RegionSelector, SelectedRegion};

/// Visual anchor for a search plus the region it was taken from
#[derive(Debug, Clone)]
pub struct QueryEmbedding {
    pub visual: VisualEmbedding,
    /// `None` when the whole image was embedded
    pub region: Option<SelectedRegion>,
}

impl QueryEmbedding {
    pub fn normalized_region(&self) -> Option<NormalizedRegion> {
        self.region.map(|r| r.normalized)
    }
}

#[derive(Clone)]
pub struct EmbeddingQueryBuilder {
    handles: ModelHandles,
    regions: RegionSelector,
    objects: ObjectRegionSelector,
    confidence: f32,
}

impl EmbeddingQueryBuilder {
    pub fn new(handles: ModelHandles, config: RegionConfig) -> Self {
        let confidence = config.detect_confidence;
        Self {
            handles,
            regions: RegionSelector::new(config.clone()),
            objects: ObjectRegionSelector::new(config),
            confidence,
        }
    }

    pub fn handles(&self) -> &ModelHandles {
        &self.handles
    }

    /// Run the detector for `category` and pick a crop.
    ///
    /// `None` means no qualifying person or object was found (or the detector
    /// failed) and the whole image should be used.
    pub fn locate(&self, image: &DynamicImage, category: Option<Category>) -> Option<SelectedRegion> {
        match self.detect_region(image, category) {
            Ok(selected) => Some(selected),
            Err(e @ Error::NoDetection(_)) => {
                debug!("{}, using whole image", e);
                None
            }
            Err(e) => {
                warn!("Detection failed, using whole image: {}", e);
                None
            }
        }
    }

    fn detect_region(&self, image: &DynamicImage, category: Option<Category>) -> Result<SelectedRegion> {
        let (width, height) = image.dimensions();

        match category {
            Some(category) if category.is_object() => {
                let detections = self.handles.objects.detect_objects(image, self.confidence)?;
                self.objects
                    .select(&detections, category, width, height)
                    .ok_or_else(|| {
                        Error::NoDetection(format!(
                            "no {} among {} objects",
                            category,
                            detections.len()
                        ))
                    })
            }
            _ => {
                let poses = self.handles.pose.detect_poses(image, self.confidence)?;
                let person = best_person(&poses).ok_or_else(|| {
                    Error::NoDetection(format!("no person among {} pose detections", poses.len()))
                })?;
                debug!("Person detected with confidence {:.2}", person.detection.confidence);
                Ok(self.regions.select(
                    &person.detection.bbox,
                    &person.keypoints,
                    category,
                    width,
                    height,
                ))
            }
        }
    }

    /// Embed the garment region for `category`, or the whole image when nothing
    /// was located. Fails only when the image encoder produces no embedding.
    pub fn build_query_embedding(&self, image: &DynamicImage, category: Option<Category>) -> Result<QueryEmbedding> {
        let region = self.locate(image, category);

        let visual = match &region {
            Some(selected) => {
                info!("Embedding {:?} crop {:?}", selected.source, selected.region);
                self.embed_pixels(&crop(image, &selected.region))?
            }
            None => {
                info!("Embedding whole image");
                self.embed_pixels(image)?
            }
        };

        Ok(QueryEmbedding { visual, region })
    }

    fn embed_pixels(&self, image: &DynamicImage) -> Result<VisualEmbedding> {
        let artifact = CropArtifact::write(image)?;
        let embedding = self
            .handles
            .image
            .embed_image(artifact.path())
            .map_err(|e| Error::Encoding(format!("image embedding failed: {e}")))?;

        if embedding.is_empty() {
            return Err(Error::Encoding("image encoder returned an empty embedding".to_string()));
        }
        Ok(embedding.normalized())
    }
}
