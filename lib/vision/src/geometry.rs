//! Keypoint geometry helpers
//!
//! Keypoint-derived boxes stay in unclamped float space; only the final
//! [`Region`] is clamped to the image and held to the minimum-size floor.

use serde::{Deserialize, Serialize};
use crate::detection::{BoundingBox, Keypoint};

/// Enclosing box of the present keypoints among `indices`, padded by
/// `padding * width` horizontally and `padding * height` vertically.
///
/// Returns `None` when none of the requested keypoints are present.
pub fn bounding_box_of(keypoints: &[Keypoint], indices: &[usize], padding: f32) -> Option<BoundingBox> {
    spread_of(keypoints, indices).map(|spread| spread.padded(padding.max(0.0)))
}

/// Unpadded enclosing box of the present keypoints among `indices`
pub fn spread_of(keypoints: &[Keypoint], indices: &[usize]) -> Option<BoundingBox> {
    let mut present = indices
        .iter()
        .filter_map(|&i| keypoints.get(i))
        .filter(|k| k.is_present());

    let first = present.next()?;
    let mut bbox = BoundingBox::new(first.x, first.y, first.x, first.y);
    for k in present {
        bbox.x1 = bbox.x1.min(k.x);
        bbox.y1 = bbox.y1.min(k.y);
        bbox.x2 = bbox.x2.max(k.x);
        bbox.y2 = bbox.y2.max(k.y);
    }
    Some(bbox)
}

/// Pixel crop rectangle inside an image of known size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Region {
    #[inline]
    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    /// Whole image
    pub fn full(image_width: u32, image_height: u32) -> Self {
        Self {
            x1: 0,
            y1: 0,
            x2: image_width,
            y2: image_height,
        }
    }

    /// Clamp a float box to `[0, W] x [0, H]`, rounding outward to whole pixels
    pub fn clamped(bbox: &BoundingBox, image_width: u32, image_height: u32) -> Self {
        let w = image_width as f32;
        let h = image_height as f32;
        let clamp = |v: f32, max: f32| if v.is_finite() { v.clamp(0.0, max) } else { 0.0 };

        let x1 = clamp(bbox.x1, w).floor() as u32;
        let y1 = clamp(bbox.y1, h).floor() as u32;
        let x2 = clamp(bbox.x2, w).ceil() as u32;
        let y2 = clamp(bbox.y2, h).ceil() as u32;

        Self {
            x1: x1.min(image_width),
            y1: y1.min(image_height),
            x2: x2.max(x1).min(image_width),
            y2: y2.max(y1).min(image_height),
        }
    }

    /// Expand each side shorter than `min_size` symmetrically around its center.
    ///
    /// The window is shifted back inside the image when the expansion crosses an
    /// edge, so the result is always `min(min_size, image_dim)` or longer.
    #[must_use]
    pub fn with_min_size(&self, min_size: u32, image_width: u32, image_height: u32) -> Self {
        let (x1, x2) = expand_axis(self.x1, self.x2, min_size, image_width);
        let (y1, y2) = expand_axis(self.y1, self.y2, min_size, image_height);
        Self { x1, y1, x2, y2 }
    }

    pub fn contains(&self, other: &Region) -> bool {
        other.x1 >= self.x1 && other.y1 >= self.y1 && other.x2 <= self.x2 && other.y2 <= self.y2
    }

    /// Coordinates divided by the image size
    pub fn normalized(&self, image_width: u32, image_height: u32) -> NormalizedRegion {
        let w = image_width.max(1) as f32;
        let h = image_height.max(1) as f32;
        NormalizedRegion {
            x1: self.x1 as f32 / w,
            y1: self.y1 as f32 / h,
            x2: self.x2 as f32 / w,
            y2: self.y2 as f32 / h,
        }
    }
}

fn expand_axis(lo: u32, hi: u32, min_size: u32, limit: u32) -> (u32, u32) {
    let floor = min_size.min(limit);
    if hi.saturating_sub(lo) >= floor {
        return (lo, hi);
    }

    let center = (lo as i64 + hi as i64) / 2;
    let mut start = center - floor as i64 / 2;
    let mut end = start + floor as i64;
    if start < 0 {
        end -= start;
        start = 0;
    }
    if end > limit as i64 {
        start -= end - limit as i64;
        end = limit as i64;
    }
    (start.max(0) as u32, end as u32)
}

/// Region in `[0, 1]` image coordinates, for overlaying without the raw image size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRegion {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl NormalizedRegion {
    /// Back to pixels, rounding to the nearest pixel
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> Region {
        let w = image_width as f32;
        let h = image_height as f32;
        Region {
            x1: (self.x1 * w).round() as u32,
            y1: (self.y1 * h).round() as u32,
            x2: (self.x2 * w).round() as u32,
            y2: (self.y2 * h).round() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kps(points: &[(usize, f32, f32)]) -> Vec<Keypoint> {
        let mut out = vec![Keypoint::ABSENT; 17];
        for &(i, x, y) in points {
            out[i] = Keypoint::new(x, y);
        }
        out
    }

    #[test]
    fn test_bounding_box_of_pads_independently() {
        let keypoints = kps(&[(5, 100.0, 100.0), (6, 200.0, 100.0), (11, 110.0, 300.0), (12, 190.0, 300.0)]);
        let bbox = bounding_box_of(&keypoints, &[5, 6, 11, 12], 0.2).unwrap();
        assert!((bbox.x1 - 80.0).abs() < 1e-4);
        assert!((bbox.x2 - 220.0).abs() < 1e-4);
        assert!((bbox.y1 - 60.0).abs() < 1e-4);
        assert!((bbox.y2 - 340.0).abs() < 1e-4);
    }

    #[test]
    fn test_bounding_box_of_skips_absent() {
        let keypoints = kps(&[(15, 150.0, 480.0)]);
        let bbox = bounding_box_of(&keypoints, &[13, 14, 15, 16], 0.5).unwrap();
        assert_eq!(bbox, BoundingBox::new(150.0, 480.0, 150.0, 480.0));
        assert!(bounding_box_of(&keypoints, &[5, 6], 0.2).is_none());
        assert!(bounding_box_of(&keypoints, &[40], 0.2).is_none());
    }

    #[test]
    fn test_bounding_box_is_not_clamped() {
        let keypoints = kps(&[(5, 2.0, 2.0), (6, 100.0, 2.0)]);
        let bbox = bounding_box_of(&keypoints, &[5, 6], 0.5).unwrap();
        assert!(bbox.x1 < 0.0);
    }

    #[test]
    fn test_clamp_to_image() {
        let region = Region::clamped(&BoundingBox::new(-20.0, -5.5, 700.2, 300.4), 640, 480);
        assert_eq!(region, Region { x1: 0, y1: 0, x2: 640, y2: 301 });
    }

    #[test]
    fn test_min_size_expands_symmetrically() {
        let region = Region { x1: 100, y1: 100, x2: 110, y2: 200 }.with_min_size(50, 640, 480);
        assert_eq!(region.width(), 50);
        assert_eq!(region.x1, 80);
        assert_eq!(region.height(), 100);
    }

    #[test]
    fn test_min_size_shifts_inside_edges() {
        let region = Region { x1: 630, y1: 0, x2: 640, y2: 5 }.with_min_size(50, 640, 480);
        assert_eq!(region, Region { x1: 590, y1: 0, x2: 640, y2: 50 });

        let tiny_image = Region { x1: 10, y1: 10, x2: 12, y2: 12 }.with_min_size(50, 30, 40);
        assert_eq!(tiny_image, Region { x1: 0, y1: 0, x2: 30, y2: 40 });
    }

    #[test]
    fn test_normalized_round_trip() {
        let region = Region { x1: 37, y1: 91, x2: 413, y2: 599 };
        let back = region.normalized(641, 777).to_pixels(641, 777);
        assert!((back.x1 as i64 - region.x1 as i64).abs() <= 1);
        assert!((back.y1 as i64 - region.y1 as i64).abs() <= 1);
        assert!((back.x2 as i64 - region.x2 as i64).abs() <= 1);
        assert!((back.y2 as i64 - region.y2 as i64).abs() <= 1);
    }
}
