// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capture page — load a photo of the document and start a scanning session.
//
// The "capture" button opens a file dialog; a camera bridge can feed the same
// path with the photo bytes.

use dioxus::prelude::*;

use blattwerk_core::error::Result;
use blattwerk_core::{CaptureSource, ImageInfo, PaperSize, ScanSession};
use blattwerk_core::human_errors::humanize_error;
use blattwerk_document::{ImageProcessor, Rectifier};

use crate::Route;
use crate::services::settings;
use crate::state::AppState;

#[component]
pub fn Capture() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let nav = use_navigator();
    let mut status_msg = use_signal(|| Option::<String>::None);

    let paper_label = match state.read().config.paper_size {
        PaperSize::A4 => "A4",
        PaperSize::A5 => "A5",
        PaperSize::Letter => "Letter",
        PaperSize::Legal => "Legal",
        PaperSize::Custom { .. } => "Custom",
    };

    rsx! {
        div {
            h2 { "Scan your document" }
            p { style: "color: #666;", "Take a photo of the page, or pick one from disk." }

            button {
                style: "width: 100%; padding: 16px; border-radius: 12px; border: 2px dashed #007aff; color: #007aff; background: white; font-size: 16px; margin: 16px 0;",
                onclick: move |_| {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Images", &["jpg", "jpeg", "png", "tiff", "tif", "bmp"])
                        .pick_file()
                    {
                        match std::fs::read(&path) {
                            Ok(bytes) => {
                                let name = path.file_stem()
                                    .map(|n| n.to_string_lossy().to_string())
                                    .unwrap_or_else(|| "document".into());
                                match begin_session(&mut state.write(), bytes, name) {
                                    Ok(()) => {
                                        nav.push(Route::Envelope {});
                                    }
                                    Err(err) => {
                                        let human = humanize_error(&err);
                                        status_msg.set(Some(format!("{} {}", human.message, human.suggestion)));
                                    }
                                }
                            }
                            Err(e) => {
                                status_msg.set(Some(format!("Error: {e}")));
                            }
                        }
                    }
                },
                "\u{1F4F7} Open Photo"
            }

            // Output paper setting, persisted across runs.
            div { style: "display: flex; align-items: center; gap: 8px; margin-top: 8px;",
                label { style: "color: #666; font-size: 14px;", "Output paper:" }
                select {
                    style: "padding: 6px 10px; border-radius: 6px; border: 1px solid #ccc; background: white;",
                    value: "{paper_label}",
                    onchange: move |ev| {
                        let paper = match ev.value().as_str() {
                            "A5" => PaperSize::A5,
                            "Letter" => PaperSize::Letter,
                            "Legal" => PaperSize::Legal,
                            _ => PaperSize::A4,
                        };
                        state.write().config.paper_size = paper;
                        if let Err(e) = settings::save_config(&state.read().config) {
                            tracing::warn!(error = %e, "settings not saved");
                        }
                    },
                    option { value: "A4", "A4" }
                    option { value: "A5", "A5" }
                    option { value: "Letter", "Letter" }
                    option { value: "Legal", "Legal" }
                }
            }

            if let Some(ref msg) = *status_msg.read() {
                p { style: "margin-top: 12px; color: #c0392b; font-size: 14px;", "{msg}" }
            }
        }
    }
}

/// Decode the capture, build the preview, try automatic corner detection, and
/// store everything the later pages need.
fn begin_session(state: &mut AppState, bytes: Vec<u8>, name: String) -> Result<()> {
    let processor = ImageProcessor::from_bytes(&bytes)?;
    let natural = ImageInfo {
        width: processor.width(),
        height: processor.height(),
        byte_len: bytes.len(),
    };

    let max = state.config.preview_max_width;
    let preview = processor.fit_within(max, max);
    let (preview_w, preview_h) = (preview.width(), preview.height());

    // Corner suggestion runs on the preview (cheaper); results are scaled
    // back into natural pixel space.
    let to_natural = natural.width as f64 / preview_w as f64;
    let detected = Rectifier::detect_quad(preview.as_dynamic()).map(|quad| {
        quad.iter()
            .flat_map(|(x, y)| [*x as f64 * to_natural, *y as f64 * to_natural])
            .collect::<Vec<f64>>()
    });

    let preview_png = preview.to_png_bytes()?;

    let session = ScanSession::new(CaptureSource::FilePicker, natural, name);
    tracing::info!(
        session = %session.id,
        width = natural.width,
        height = natural.height,
        detected = detected.is_some(),
        "scanning session started"
    );

    state.session = Some(session);
    state.capture_bytes = Some(bytes);
    state.preview_png = Some(preview_png);
    state.preview_width = preview_w;
    state.preview_height = preview_h;
    state.detected_corners = detected;
    state.corners = None;
    state.status_message = None;
    Ok(())
}
