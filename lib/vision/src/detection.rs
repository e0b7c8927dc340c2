//! Detector output types
//!
//! Boxes are in pixel space of the source image. Pose detections carry the
//! 17-point COCO skeleton; a coordinate `<= 0` marks the keypoint as absent.

use serde::{Deserialize, Serialize};

/// COCO class id of "person"
pub const PERSON_CLASS_ID: u32 = 0;
pub const BACKPACK_CLASS_ID: u32 = 24;
pub const HANDBAG_CLASS_ID: u32 = 26;
pub const SUITCASE_CLASS_ID: u32 = 28;
pub const BOTTLE_CLASS_ID: u32 = 39;

pub const NUM_KEYPOINTS: usize = 17;

/// COCO keypoint layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    #[inline]
    pub fn idx(self) -> usize {
        self as usize
    }
}

/// Axis-aligned box (x1, y1) top-left, (x2, y2) bottom-right
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    #[inline]
    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Grow by a fraction of the box's own width/height on every side
    #[must_use]
    pub fn padded(&self, fraction: f32) -> Self {
        let pad_x = self.width() * fraction;
        let pad_y = self.height() * fraction;
        Self {
            x1: self.x1 - pad_x,
            y1: self.y1 - pad_y,
            x2: self.x2 + pad_x,
            y2: self.y2 + pad_y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
}

impl Keypoint {
    pub const ABSENT: Keypoint = Keypoint { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_present(&self) -> bool {
        self.x > 0.0 && self.y > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_id: u32,
    #[serde(default)]
    pub class_name: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(class_id: u32, class_name: impl Into<String>, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            class_id,
            class_name: class_name.into(),
            confidence,
            bbox,
        }
    }

    pub fn is_person(&self) -> bool {
        self.class_id == PERSON_CLASS_ID
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseDetection {
    #[serde(flatten)]
    pub detection: Detection,
    pub keypoints: Vec<Keypoint>,
}

impl PoseDetection {
    pub fn new(detection: Detection, keypoints: Vec<Keypoint>) -> Self {
        Self {
            detection,
            keypoints,
        }
    }

    /// Keypoint at a COCO index, absent if the detector returned fewer points
    pub fn keypoint(&self, index: KeypointIndex) -> Keypoint {
        self.keypoints
            .get(index.idx())
            .copied()
            .unwrap_or(Keypoint::ABSENT)
    }
}

/// Pick the highest-confidence detection accepted by `accept`.
///
/// Ties keep the first detection encountered; the comparison is strict so a
/// later detection with equal confidence never displaces an earlier one.
pub fn best_detection<'a, T, F>(candidates: &'a [T], confidence: impl Fn(&T) -> f32, accept: F) -> Option<&'a T>
where
    F: Fn(&T) -> bool,
{
    let mut best: Option<(&T, f32)> = None;
    for candidate in candidates.iter().filter(|c| accept(c)) {
        let score = confidence(candidate);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }
    best.map(|(c, _)| c)
}

/// Highest-confidence person pose, first encountered on ties
pub fn best_person(poses: &[PoseDetection]) -> Option<&PoseDetection> {
    best_detection(poses, |p| p.detection.confidence, |p| p.detection.is_person())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(confidence: f32, x1: f32) -> PoseDetection {
        PoseDetection::new(
            Detection::new(PERSON_CLASS_ID, "person", confidence, BoundingBox::new(x1, 0.0, x1 + 10.0, 10.0)),
            vec![Keypoint::ABSENT; NUM_KEYPOINTS],
        )
    }

    #[test]
    fn test_best_person_prefers_confidence() {
        let poses = vec![person(0.4, 1.0), person(0.9, 2.0), person(0.6, 3.0)];
        assert_eq!(best_person(&poses).unwrap().detection.bbox.x1, 2.0);
    }

    #[test]
    fn test_best_person_tie_keeps_first() {
        let poses = vec![person(0.8, 1.0), person(0.8, 2.0)];
        assert_eq!(best_person(&poses).unwrap().detection.bbox.x1, 1.0);
    }

    #[test]
    fn test_best_person_ignores_other_classes() {
        let mut dog = person(0.99, 5.0);
        dog.detection.class_id = 16;
        let poses = vec![dog, person(0.3, 7.0)];
        assert_eq!(best_person(&poses).unwrap().detection.bbox.x1, 7.0);
        assert!(best_person(&[]).is_none());
    }

    #[test]
    fn test_keypoint_absence() {
        assert!(!Keypoint::new(0.0, 12.0).is_present());
        assert!(!Keypoint::new(-3.0, 12.0).is_present());
        assert!(Keypoint::new(1.0, 1.0).is_present());

        let short = PoseDetection::new(person(0.5, 0.0).detection, vec![Keypoint::new(5.0, 5.0)]);
        assert!(!short.keypoint(KeypointIndex::RightAnkle).is_present());
    }
}
