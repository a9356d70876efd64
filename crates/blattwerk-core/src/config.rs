// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

/// Persistent application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Paper size the rectified output is mapped onto.
    pub paper_size: crate::PaperSize,
    /// Output resolution of the rectified page in dots per inch.
    pub export_dpi: u32,
    /// Quality used for JPEG exports (1-100).
    pub jpeg_quality: u8,
    /// Corner handle pick radius in physical screen pixels.
    pub handle_radius_px: f64,
    /// Inset fraction used to seed the envelope when no document is detected
    /// (0.1 places the corners at 10% / 90% of the displayed image).
    pub envelope_margin: f64,
    /// Maximum width in pixels for the on-screen preview of a capture.
    pub preview_max_width: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            paper_size: crate::PaperSize::A4,
            export_dpi: 150,
            jpeg_quality: 90,
            handle_radius_px: 25.0,
            envelope_margin: 0.1,
            preview_max_width: 1024,
        }
    }
}
