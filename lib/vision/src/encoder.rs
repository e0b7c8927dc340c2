//! Contracts for the external models
//!
//! Detectors and encoders are loaded once at startup and shared read-only
//! between requests; implementations must tolerate concurrent calls.

use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;
use stylematch_core::{Result, TextEmbedding, VisualEmbedding};
use tracing::warn;
use crate::detection::{Detection, PoseDetection};

pub trait PoseDetector: Send + Sync {
    /// Person detections with keypoints. Nothing above `confidence` is an empty list, not an error.
    fn detect_poses(&self, image: &DynamicImage, confidence: f32) -> Result<Vec<PoseDetection>>;
}

pub trait ObjectDetector: Send + Sync {
    fn detect_objects(&self, image: &DynamicImage, confidence: f32) -> Result<Vec<Detection>>;
}

pub trait ImageEncoder: Send + Sync {
    /// Embed the image stored at `path`
    fn embed_image(&self, path: &Path) -> Result<VisualEmbedding>;
}

pub trait TextEncoder: Send + Sync {
    fn embed_text(&self, text: &str) -> Result<TextEmbedding>;
}

/// Shared model handles
#[derive(Clone)]
pub struct ModelHandles {
    pub pose: Arc<dyn PoseDetector>,
    pub objects: Arc<dyn ObjectDetector>,
    pub image: Arc<dyn ImageEncoder>,
    pub text: Arc<dyn TextEncoder>,
}

impl ModelHandles {
    pub fn new(
        pose: Arc<dyn PoseDetector>,
        objects: Arc<dyn ObjectDetector>,
        image: Arc<dyn ImageEncoder>,
        text: Arc<dyn TextEncoder>,
    ) -> Self {
        Self {
            pose,
            objects,
            image,
            text,
        }
    }

    /// Embed optional text for a secondary signal. Failures become `None`.
    pub fn embed_text_or_absent(&self, text: Option<&str>) -> Option<TextEmbedding> {
        let text = text.map(str::trim).filter(|t| !t.is_empty())?;
        match self.text.embed_text(text) {
            Ok(embedding) if !embedding.is_empty() => Some(embedding.normalized()),
            Ok(_) => {
                warn!("Text encoder returned an empty embedding for '{}'", text);
                None
            }
            Err(e) => {
                warn!("Text embedding failed for '{}', continuing without it: {}", text, e);
                None
            }
        }
    }
}
