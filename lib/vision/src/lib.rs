//! # stylematch Vision
//!
//! Region-of-interest extraction ahead of image embedding.
//!
//! A full-body photograph is reduced to the garment the user asked about
//! before it reaches the image encoder:
//!
//! ```text
//! image ──> detector ──> RegionSelector / ObjectRegionSelector ──> crop ──> encoder
//!              │                                                   ▲
//!              └────────── no person / object: whole image ────────┘
//! ```
//!
//! - [`geometry`] - keypoint boxes, clamping, minimum-size floor
//! - [`RegionSelector`] - per-category keypoint rules with fallbacks
//! - [`ObjectRegionSelector`] - bags and bottles from object detections
//! - [`EmbeddingQueryBuilder`] - the detect, crop, embed pipeline
//!
//! ## Example
//!
//! ```rust
//! use stylematch_core::Category;
//! use stylematch_vision::{BoundingBox, Keypoint, RegionSelector};
//!
//! let selector = RegionSelector::default();
//! let mut keypoints = vec![Keypoint::ABSENT; 17];
//! keypoints[15] = Keypoint::new(150.0, 480.0);
//! keypoints[16] = Keypoint::new(250.0, 485.0);
//!
//! let person = BoundingBox::new(100.0, 50.0, 300.0, 500.0);
//! let selected = selector.select(&person, &keypoints, Some(Category::Footwear), 640, 640);
//! assert!(selected.region.y2 > 485);
//! ```

pub mod config;
pub mod crop;
pub mod detection;
pub mod encoder;
pub mod geometry;
pub mod object;
pub mod query;
pub mod region;

pub use config::{FootwearRule, KeypointRule, PersonSlice, RegionConfig};
pub use crop::{crop, decode_image, CropArtifact};
pub use detection::{best_person, BoundingBox, Detection, Keypoint, KeypointIndex, PoseDetection};
pub use encoder::{ImageEncoder, ModelHandles, ObjectDetector, PoseDetector, TextEncoder};
pub use geometry::{bounding_box_of, NormalizedRegion, Region};
pub use object::ObjectRegionSelector;
pub use query::{EmbeddingQueryBuilder, QueryEmbedding};
pub use region::{RegionSelector, RegionSource, SelectedRegion};

pub use image;
