// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode, preview resize, enhancement, and encoding for
// capture and rectified images. Operates on in-memory images using the
// `image` crate.

use image::{DynamicImage, ImageFormat};
use blattwerk_core::error::BlattwerkError;
use tracing::{debug, info, instrument};

/// Image pipeline operating on a single in-memory image.
///
/// All operations are non-destructive: each method consumes `self` and
/// returns a new `ImageProcessor` wrapping the transformed image, so steps
/// chain naturally:
///
/// ```ignore
/// let preview = ImageProcessor::from_bytes(&capture)?
///     .fit_within(1024, 1024)
///     .to_png_bytes()?;
/// ```
#[derive(Debug)]
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode a capture from raw encoded bytes (JPEG, PNG, TIFF, ...).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, BlattwerkError> {
        let image = image::load_from_memory(data).map_err(|err| {
            BlattwerkError::ImageDecode(format!("failed to decode capture: {}", err))
        })?;
        info!(
            width = image.width(),
            height = image.height(),
            "capture decoded"
        );
        Ok(Self { image })
    }

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, BlattwerkError> {
        let image = image::open(path.as_ref()).map_err(|err| {
            BlattwerkError::ImageDecode(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        Ok(Self { image })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Shrink the image to fit within `max_width` x `max_height`, preserving
    /// aspect ratio. Images already inside the bounds pass through untouched
    /// (previews never upscale). Triangle filtering keeps preview generation
    /// fast on large captures.
    #[instrument(skip(self), fields(max_width, max_height))]
    pub fn fit_within(self, max_width: u32, max_height: u32) -> Self {
        if self.image.width() <= max_width && self.image.height() <= max_height {
            return self;
        }
        let resized =
            self.image
                .resize(max_width, max_height, image::imageops::FilterType::Triangle);
        debug!(
            new_w = resized.width(),
            new_h = resized.height(),
            "capture downscaled for preview"
        );
        Self { image: resized }
    }

    /// Convert to grayscale (luma).
    #[instrument(skip(self))]
    pub fn grayscale(self) -> Self {
        Self {
            image: self.image.grayscale(),
        }
    }

    /// Adjust contrast. Positive values increase contrast, negative decrease;
    /// the scan enhancement step uses a mild boost to lift faded print.
    #[instrument(skip(self), fields(amount))]
    pub fn adjust_contrast(self, amount: f32) -> Self {
        Self {
            image: self.image.adjust_contrast(amount),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, BlattwerkError> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| {
                BlattwerkError::ImageProcess(format!("PNG encoding failed: {}", err))
            })?;
        Ok(buffer)
    }

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, BlattwerkError> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder).map_err(|err| {
            BlattwerkError::ImageProcess(format!("JPEG encoding failed: {}", err))
        })?;
        Ok(buffer)
    }

    /// Write the image to a file; format inferred from the extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), BlattwerkError> {
        self.image.save(path.as_ref()).map_err(|err| {
            BlattwerkError::ImageProcess(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn checker(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        }))
    }

    #[test]
    fn from_bytes_rejects_garbage() {
        let err = ImageProcessor::from_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, BlattwerkError::ImageDecode(_)));
    }

    #[test]
    fn fit_within_downscales_preserving_aspect() {
        let proc = ImageProcessor::from_dynamic(checker(400, 200)).fit_within(100, 100);
        assert_eq!(proc.width(), 100);
        assert_eq!(proc.height(), 50);
    }

    #[test]
    fn fit_within_never_upscales() {
        let proc = ImageProcessor::from_dynamic(checker(40, 20)).fit_within(1000, 1000);
        assert_eq!((proc.width(), proc.height()), (40, 20));
    }

    #[test]
    fn png_bytes_round_trip() {
        let bytes = ImageProcessor::from_dynamic(checker(16, 16))
            .to_png_bytes()
            .unwrap();
        let reloaded = ImageProcessor::from_bytes(&bytes).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (16, 16));
    }

    #[test]
    fn jpeg_encoding_produces_output() {
        let bytes = ImageProcessor::from_dynamic(checker(16, 16))
            .to_jpeg_bytes(90)
            .unwrap();
        assert!(!bytes.is_empty());
        // JPEG SOI marker
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn grayscale_and_contrast_chain() {
        let proc = ImageProcessor::from_dynamic(checker(8, 8))
            .grayscale()
            .adjust_contrast(20.0);
        assert_eq!((proc.width(), proc.height()), (8, 8));
    }
}
