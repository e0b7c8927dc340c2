//! Crop extraction and temporary materialization for encoders that read files.

use image::{DynamicImage, ImageFormat};
use std::io::Write;
use std::path::Path;
use stylematch_core::{Error, Result};
use tempfile::NamedTempFile;
use crate::geometry::Region;

/// Decode raw image bytes (PNG or JPEG)
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| Error::Image(format!("decode failed: {e}")))
}

/// Copy out the pixels inside `region`
pub fn crop(image: &DynamicImage, region: &Region) -> DynamicImage {
    let x = region.x1.min(image.width());
    let y = region.y1.min(image.height());
    let w = region.width().min(image.width() - x);
    let h = region.height().min(image.height() - y);
    image.crop_imm(x, y, w, h)
}

/// An image written to a uniquely named temporary file.
///
/// The file is removed when the artifact is dropped, on success and error
/// paths alike.
pub struct CropArtifact {
    file: NamedTempFile,
    width: u32,
    height: u32,
}

impl CropArtifact {
    pub fn write(image: &DynamicImage) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("stylematch-crop-")
            .suffix(".png")
            .tempfile()?;

        image
            .write_to(file.as_file_mut(), ImageFormat::Png)
            .map_err(|e| Error::Image(format!("failed to write crop: {e}")))?;
        file.as_file_mut().flush()?;

        Ok(Self {
            file,
            width: image.width(),
            height: image.height(),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 0])))
    }

    #[test]
    fn test_crop_extracts_exact_pixels() {
        let image = gradient(120, 90);
        let cropped = crop(&image, &Region { x1: 10, y1: 20, x2: 60, y2: 80 });
        assert_eq!(cropped.dimensions(), (50, 60));
        assert_eq!(&cropped.get_pixel(0, 0).0[..3], &[10u8, 20, 0]);
        assert_eq!(&cropped.get_pixel(49, 59).0[..3], &[59u8, 79, 0]);
    }

    #[test]
    fn test_artifact_removed_on_drop() {
        let artifact = CropArtifact::write(&gradient(64, 64)).unwrap();
        let path = artifact.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(artifact.dimensions(), (64, 64));

        let reloaded = image::open(&path).unwrap();
        assert_eq!(reloaded.dimensions(), (64, 64));

        drop(artifact);
        assert!(!path.exists());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_image(b"not an image"), Err(Error::Image(_))));
    }
}
