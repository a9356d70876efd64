// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Blattwerk document scanner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one scanning session (one source photo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the source photo came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureSource {
    /// User picked an image file on this device.
    FilePicker,
    /// Captured directly from a camera device.
    Camera,
}

/// Standard paper sizes for the rectified output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Pixel dimensions (width, height) of the output page at the given dpi.
    pub fn dimensions_px(&self, dpi: u32) -> (u32, u32) {
        let (w_mm, h_mm) = self.dimensions_mm();
        let to_px = |mm: u32| (mm as f64 * dpi as f64 / 25.4).round() as u32;
        (to_px(w_mm), to_px(h_mm))
    }

    /// Width-to-height ratio of the page.
    pub fn aspect_ratio(&self) -> f64 {
        let (w, h) = self.dimensions_mm();
        w as f64 / h as f64
    }
}

/// Supported export formats for a rectified scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Png,
    Jpeg,
    Pdf,
}

impl ExportFormat {
    /// MIME type string for the exported document.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Pdf => "application/pdf",
        }
    }

    /// Conventional file extension (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Pdf => "pdf",
        }
    }
}

/// Pixel dimensions of a decoded raster image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Encoded size of the capture in bytes.
    pub byte_len: usize,
}

/// One scanning session: a single source photo being worked on.
///
/// The envelope editor owns the quadrilateral and pointer set for the
/// lifetime of one session; starting a new session discards both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSession {
    pub id: SessionId,
    pub source: CaptureSource,
    /// Natural pixel dimensions of the capture.
    pub image: ImageInfo,
    /// Display name of the capture (file stem, usually).
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl ScanSession {
    pub fn new(source: CaptureSource, image: ImageInfo, name: String) -> Self {
        Self {
            id: SessionId::new(),
            source,
            image,
            name,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_pixel_dimensions_at_150_dpi() {
        let (w, h) = PaperSize::A4.dimensions_px(150);
        assert_eq!(w, 1240);
        assert_eq!(h, 1754);
    }

    #[test]
    fn custom_paper_dimensions() {
        let paper = PaperSize::Custom {
            width_mm: 100,
            height_mm: 50,
        };
        assert_eq!(paper.dimensions_mm(), (100, 50));
        assert!((paper.aspect_ratio() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn export_format_metadata() {
        assert_eq!(ExportFormat::Pdf.mime_type(), "application/pdf");
        assert_eq!(ExportFormat::Jpeg.extension(), "jpg");
    }
}
