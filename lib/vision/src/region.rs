//! Pose-guided garment region selection
//!
//! Maps a person detection and a requested category to a single crop. Keypoint
//! rules come from [`RegionConfig`]; every path ends with the same clamp and
//! minimum-size step so the result always lies inside the image.

use serde::{Deserialize, Serialize};
use stylematch_core::{Category, Error, Result};
use tracing::debug;
use crate::config::{FootwearRule, PersonSlice, RegionConfig};
use crate::detection::{BoundingBox, Keypoint};
use crate::geometry::{bounding_box_of, spread_of, NormalizedRegion, Region};

/// Where a selected region came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionSource {
    Keypoints,
    PersonSlice,
    PersonBox,
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectedRegion {
    pub region: Region,
    pub normalized: NormalizedRegion,
    pub source: RegionSource,
}

impl SelectedRegion {
    pub(crate) fn finalize(
        bbox: &BoundingBox,
        source: RegionSource,
        min_size_px: u32,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        let region = Region::clamped(bbox, image_width, image_height)
            .with_min_size(min_size_px, image_width, image_height);
        Self {
            region,
            normalized: region.normalized(image_width, image_height),
            source,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegionSelector {
    config: RegionConfig,
}

impl RegionSelector {
    pub fn new(config: RegionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RegionConfig {
        &self.config
    }

    /// Select the crop for `category` on a detected person.
    ///
    /// `None` uses the whole person box. Absent keypoints fall back to a slice of
    /// the person box; keypoint boxes at or under the degenerate size fall back to
    /// the full person box.
    pub fn select(
        &self,
        person: &BoundingBox,
        keypoints: &[Keypoint],
        category: Option<Category>,
        image_width: u32,
        image_height: u32,
    ) -> SelectedRegion {
        let (bbox, source) = match category {
            Some(category) => self.category_box(person, keypoints, category),
            None => (*person, RegionSource::PersonBox),
        };

        let selected = SelectedRegion::finalize(
            &bbox,
            source,
            self.config.min_size_px,
            image_width,
            image_height,
        );
        debug!(
            "Selected {:?} region {:?} for {:?}",
            selected.source, selected.region, category
        );
        selected
    }

    fn category_box(
        &self,
        person: &BoundingBox,
        keypoints: &[Keypoint],
        category: Category,
    ) -> (BoundingBox, RegionSource) {
        let keypoint_box = match category {
            Category::Tops => {
                bounding_box_of(keypoints, &self.config.tops.indices, self.config.tops.padding)
            }
            Category::Bottoms => {
                bounding_box_of(keypoints, &self.config.bottoms.indices, self.config.bottoms.padding)
            }
            Category::Outerwear => {
                bounding_box_of(keypoints, &self.config.outerwear.indices, self.config.outerwear.padding)
            }
            Category::Footwear => footwear_box(keypoints, person, &self.config.footwear),
            _ => return (*person, RegionSource::PersonBox),
        };

        match checked_keypoint_box(keypoint_box, category, self.config.degenerate_px) {
            Ok(bbox) => (bbox, RegionSource::Keypoints),
            Err(e @ Error::DegenerateRegion { .. }) => {
                debug!("{} from {} keypoints, using person box", e, category);
                (*person, RegionSource::PersonBox)
            }
            Err(e) => {
                debug!("{}, slicing person box", e);
                let slice = self.config.fallback_slice(category);
                let source = match slice {
                    PersonSlice::Full => RegionSource::PersonBox,
                    _ => RegionSource::PersonSlice,
                };
                (slice_person(person, slice), source)
            }
        }
    }
}

/// Keypoint box if one exists and both sides exceed `degenerate_px`
fn checked_keypoint_box(
    keypoint_box: Option<BoundingBox>,
    category: Category,
    degenerate_px: f32,
) -> Result<BoundingBox> {
    let bbox = keypoint_box
        .ok_or_else(|| Error::NoDetection(format!("no {} keypoints present", category)))?;
    if bbox.width() <= degenerate_px || bbox.height() <= degenerate_px {
        return Err(Error::DegenerateRegion {
            width: bbox.width(),
            height: bbox.height(),
        });
    }
    Ok(bbox)
}

/// Knee-to-ankle box with asymmetric padding
fn footwear_box(keypoints: &[Keypoint], person: &BoundingBox, rule: &FootwearRule) -> Option<BoundingBox> {
    let spread = spread_of(keypoints, &rule.indices)?;

    let pad_x = (spread.width() * rule.horizontal_spread).max(person.width() * rule.horizontal_person);
    let pad_up = spread.height() * rule.up_spread;
    let pad_down = (spread.height() * rule.down_spread).max(person.height() * rule.down_person);

    Some(BoundingBox::new(
        spread.x1 - pad_x,
        spread.y1 - pad_up,
        spread.x2 + pad_x,
        spread.y2 + pad_down,
    ))
}

fn slice_person(person: &BoundingBox, slice: PersonSlice) -> BoundingBox {
    let height = person.height();
    match slice {
        PersonSlice::Top(fraction) => {
            BoundingBox::new(person.x1, person.y1, person.x2, person.y1 + height * fraction)
        }
        PersonSlice::Below(fraction) => {
            BoundingBox::new(person.x1, person.y1 + height * fraction, person.x2, person.y2)
        }
        PersonSlice::Full => *person,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const W: u32 = 640;
    const H: u32 = 640;

    fn person() -> BoundingBox {
        BoundingBox::new(100.0, 50.0, 300.0, 500.0)
    }

    fn kps(points: &[(usize, f32, f32)]) -> Vec<Keypoint> {
        let mut out = vec![Keypoint::ABSENT; 17];
        for &(i, x, y) in points {
            out[i] = Keypoint::new(x, y);
        }
        out
    }

    fn full_body() -> Vec<Keypoint> {
        kps(&[
            (5, 140.0, 120.0),
            (6, 260.0, 120.0),
            (11, 150.0, 280.0),
            (12, 250.0, 280.0),
            (13, 150.0, 390.0),
            (14, 250.0, 390.0),
            (15, 150.0, 480.0),
            (16, 250.0, 485.0),
        ])
    }

    #[test]
    fn test_footwear_from_ankles() {
        let selector = RegionSelector::default();
        let keypoints = kps(&[(15, 150.0, 480.0), (16, 250.0, 485.0)]);
        let selected = selector.select(&person(), &keypoints, Some(Category::Footwear), W, H);

        assert_eq!(selected.source, RegionSource::Keypoints);
        // Downward pad floor: 0.25 * person height = 112.5
        assert!(selected.region.y2 as f32 >= 485.0 + 112.5 - 1.0);
        assert!(selected.region.width() >= 60);
        assert!(selected.region.y1 <= 480);
    }

    #[test]
    fn test_footwear_pad_is_asymmetric() {
        let selector = RegionSelector::default();
        let selected = selector.select(&person(), &full_body(), Some(Category::Footwear), W, H);
        let region = selected.region;

        // Spread: knees y=390 to ankles y=485 (95 px)
        let above = 390 - region.y1 as i64;
        let below = region.y2 as i64 - 485;
        assert!(below > above);
        assert_eq!(above, 19);
    }

    #[test]
    fn test_tops_uses_torso() {
        let selector = RegionSelector::default();
        let selected = selector.select(&person(), &full_body(), Some(Category::Tops), W, H);
        // Shoulders 120 to hips 280, 20% vertical pad of 160 = 32
        assert_eq!(selected.region.y1, 88);
        assert_eq!(selected.region.y2, 312);
        assert_eq!(selected.source, RegionSource::Keypoints);
    }

    #[test]
    fn test_fallback_slices() {
        let selector = RegionSelector::default();
        let none = vec![Keypoint::ABSENT; 17];

        let tops = selector.select(&person(), &none, Some(Category::Tops), W, H);
        assert_eq!(tops.source, RegionSource::PersonSlice);
        assert_eq!(tops.region, Region { x1: 100, y1: 50, x2: 300, y2: 320 });

        let bottoms = selector.select(&person(), &none, Some(Category::Bottoms), W, H);
        assert_eq!(bottoms.region, Region { x1: 100, y1: 230, x2: 300, y2: 500 });

        for category in [Category::Footwear, Category::Outerwear] {
            let selected = selector.select(&person(), &none, Some(category), W, H);
            assert_eq!(selected.source, RegionSource::PersonBox);
            assert_eq!(selected.region, Region { x1: 100, y1: 50, x2: 300, y2: 500 });
        }
    }

    #[test]
    fn test_degenerate_keypoint_box_uses_person_box() {
        let selector = RegionSelector::default();
        // Single shoulder: zero-area box after padding
        let keypoints = kps(&[(5, 140.0, 120.0)]);
        let selected = selector.select(&person(), &keypoints, Some(Category::Tops), W, H);
        assert_eq!(selected.source, RegionSource::PersonBox);
        assert_eq!(selected.region, Region { x1: 100, y1: 50, x2: 300, y2: 500 });
    }

    #[test]
    fn test_checked_keypoint_box_errors() {
        assert!(matches!(
            checked_keypoint_box(None, Category::Bottoms, 10.0),
            Err(Error::NoDetection(_))
        ));
        let thin = BoundingBox::new(100.0, 100.0, 108.0, 300.0);
        assert!(matches!(
            checked_keypoint_box(Some(thin), Category::Tops, 10.0),
            Err(Error::DegenerateRegion { width, .. }) if (width - 8.0).abs() < 1e-6
        ));
        let torso = BoundingBox::new(100.0, 100.0, 200.0, 300.0);
        assert_eq!(checked_keypoint_box(Some(torso), Category::Tops, 10.0).unwrap(), torso);
    }

    #[test]
    fn test_no_category_uses_person_box() {
        let selector = RegionSelector::default();
        let tiny = BoundingBox::new(10.0, 10.0, 30.0, 20.0);
        let selected = selector.select(&tiny, &full_body(), None, W, H);
        assert_eq!(selected.source, RegionSource::PersonBox);
        assert!(selected.region.width() >= 50);
        assert!(selected.region.height() >= 50);

        let accessories = selector.select(&person(), &full_body(), Some(Category::Accessories), W, H);
        assert_eq!(accessories.source, RegionSource::PersonBox);
    }

    #[test]
    fn test_normalized_matches_pixels() {
        let selector = RegionSelector::default();
        let selected = selector.select(&person(), &full_body(), Some(Category::Bottoms), 800, 600);
        let back = selected.normalized.to_pixels(800, 600);
        assert!((back.x1 as i64 - selected.region.x1 as i64).abs() <= 1);
        assert!((back.y2 as i64 - selected.region.y2 as i64).abs() <= 1);
    }

    #[test]
    fn test_region_always_inside_image_and_above_floor() {
        let selector = RegionSelector::default();
        let mut rng = StdRng::seed_from_u64(42);
        let categories = [
            None,
            Some(Category::Tops),
            Some(Category::Bottoms),
            Some(Category::Footwear),
            Some(Category::Outerwear),
            Some(Category::Accessories),
        ];

        for _ in 0..500 {
            let w = rng.random_range(60u32..1200);
            let h = rng.random_range(60u32..1200);
            let x1 = rng.random_range(-50.0f32..w as f32);
            let y1 = rng.random_range(-50.0f32..h as f32);
            let bbox = BoundingBox::new(
                x1,
                y1,
                x1 + rng.random_range(1.0f32..400.0),
                y1 + rng.random_range(1.0f32..600.0),
            );
            let keypoints: Vec<Keypoint> = (0..17)
                .map(|_| {
                    if rng.random_bool(0.3) {
                        Keypoint::ABSENT
                    } else {
                        Keypoint::new(
                            rng.random_range(-20.0f32..(w as f32 + 50.0)),
                            rng.random_range(-20.0f32..(h as f32 + 50.0)),
                        )
                    }
                })
                .collect();

            for category in categories {
                let selected = selector.select(&bbox, &keypoints, category, w, h);
                let region = selected.region;
                assert!(Region::full(w, h).contains(&region), "{:?} outside {}x{}", region, w, h);
                assert!(region.width() >= 50 && region.height() >= 50, "{:?} below floor", region);
            }
        }
    }
}
