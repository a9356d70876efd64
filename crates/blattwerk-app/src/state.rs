// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state — one scanning session shared across the wizard
// pages via a Dioxus signal.

use blattwerk_core::{AppConfig, ScanSession};

/// Shared state accessible to all pages via `use_context`.
///
/// The envelope editor itself lives inside the envelope page; this struct
/// carries what flows BETWEEN pages: the capture, its preview, and the
/// confirmed corner array.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The active scanning session, if a photo has been loaded.
    pub session: Option<ScanSession>,
    /// Raw encoded bytes of the capture at natural resolution (the input to
    /// the full-quality rectification).
    pub capture_bytes: Option<Vec<u8>>,
    /// PNG-encoded downscaled preview shown under the envelope editor.
    pub preview_png: Option<Vec<u8>>,
    /// Pixel dimensions of the preview.
    pub preview_width: u32,
    pub preview_height: u32,
    /// Corners suggested by automatic document detection, flattened
    /// TL,TR,BR,BL in natural pixel space.
    pub detected_corners: Option<Vec<f64>>,
    /// Corners confirmed on the envelope page, flattened TL,TR,BR,BL in
    /// natural pixel space — the rectifier's input.
    pub corners: Option<Vec<f64>>,
    /// Application settings.
    pub config: AppConfig,
    /// Status message for user feedback.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            session: None,
            capture_bytes: None,
            preview_png: None,
            preview_width: 0,
            preview_height: 0,
            detected_corners: None,
            corners: None,
            config,
            status_message: None,
        }
    }

    /// Scale factor from natural-image pixels to preview pixels
    /// (`preview_width / natural_width`). Dividing preview-space coordinates
    /// by this maps them back into natural pixel space.
    pub fn display_scale(&self) -> f64 {
        match &self.session {
            Some(session) if session.image.width > 0 => {
                self.preview_width as f64 / session.image.width as f64
            }
            _ => 1.0,
        }
    }

    /// Discard the current session (new photo, or cancel). Settings survive.
    pub fn clear_session(&mut self) {
        self.session = None;
        self.capture_bytes = None;
        self.preview_png = None;
        self.preview_width = 0;
        self.preview_height = 0;
        self.detected_corners = None;
        self.corners = None;
        self.status_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blattwerk_core::{CaptureSource, ImageInfo};

    #[test]
    fn display_scale_relates_preview_to_natural_width() {
        let mut state = AppState::new(AppConfig::default());
        state.session = Some(blattwerk_core::ScanSession::new(
            CaptureSource::FilePicker,
            ImageInfo {
                width: 4000,
                height: 3000,
                byte_len: 0,
            },
            "photo".into(),
        ));
        state.preview_width = 1000;
        assert!((state.display_scale() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn clear_session_keeps_settings() {
        let mut config = AppConfig::default();
        config.export_dpi = 300;
        let mut state = AppState::new(config);
        state.corners = Some(vec![0.0; 8]);
        state.clear_session();
        assert!(state.corners.is_none());
        assert_eq!(state.config.export_dpi, 300);
    }
}
