// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Result page — rectified preview, optional enhancement, and export.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use dioxus::prelude::*;
use image::DynamicImage;

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::human_errors::humanize_error;
use blattwerk_document::{ImageProcessor, PdfExporter, Rectifier};

use crate::Route;
use crate::state::AppState;

#[component]
pub fn ScanResult() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let nav = use_navigator();
    let mut status_msg = use_signal(|| Option::<String>::None);
    let mut enhanced = use_signal(|| false);

    // Rectify once on entry; enhancement replaces the stored page in place.
    let mut outcome = use_signal(|| run_rectification(&state.read()));

    let preview_url = use_memo(move || {
        outcome
            .read()
            .as_ref()
            .ok()
            .and_then(|page| preview_data_url(page))
    });

    // Snapshot for this frame: either the page dimensions or a friendly
    // failure banner.
    let (page_dims, failure) = match &*outcome.read() {
        Ok(page) => (Some(format!("{} x {} px", page.width(), page.height())), None),
        Err(err) => (None, Some(humanize_error(err))),
    };

    rsx! {
        div {
            h2 { "Share it" }

            if let Some(ref dims) = page_dims {
                p { style: "color: #666; font-size: 14px;", "Rectified page: {dims}" }
            }

            if let Some(ref human) = failure {
                div { style: "padding: 12px; border-radius: 8px; background: #fdecea; color: #c0392b; margin: 12px 0;",
                    strong { "{human.message}" }
                    p { style: "margin: 4px 0 0;", "{human.suggestion}" }
                }
                Link { to: Route::Envelope {}, "Back to corner editing" }
            }

            if let Some(ref url) = *preview_url.read() {
                img {
                    src: "{url}",
                    style: "width: 100%; max-width: 480px; display: block; margin: 12px auto; border: 1px solid #ccc; box-shadow: 0 2px 8px rgba(0,0,0,0.15);",
                }
            }

            div { style: "display: flex; gap: 8px; margin-top: 16px; flex-wrap: wrap;",
                button {
                    style: "flex: 1; padding: 12px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                    disabled: outcome.read().is_err() || *enhanced.read(),
                    onclick: move |_| {
                        let mut guard = outcome.write();
                        if let Ok(page) = &*guard {
                            let boosted = ImageProcessor::from_dynamic(page.clone())
                                .grayscale()
                                .adjust_contrast(25.0)
                                .into_dynamic();
                            *guard = Ok(boosted);
                            drop(guard);
                            enhanced.set(true);
                            status_msg.set(Some("Contrast enhanced.".into()));
                        }
                    },
                    "Enhance"
                }
                button {
                    style: "flex: 1; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white;",
                    disabled: outcome.read().is_err(),
                    onclick: move |_| {
                        if let Ok(page) = &*outcome.read() {
                            match export_image(&state.read(), page, "png") {
                                Ok(Some(path)) => status_msg.set(Some(format!("Saved {path}"))),
                                Ok(None) => {}
                                Err(err) => {
                                    let human = humanize_error(&err);
                                    status_msg.set(Some(format!("{} {}", human.message, human.suggestion)));
                                }
                            }
                        }
                    },
                    "Export PNG"
                }
                button {
                    style: "flex: 1; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white;",
                    disabled: outcome.read().is_err(),
                    onclick: move |_| {
                        if let Ok(page) = &*outcome.read() {
                            match export_image(&state.read(), page, "jpg") {
                                Ok(Some(path)) => status_msg.set(Some(format!("Saved {path}"))),
                                Ok(None) => {}
                                Err(err) => {
                                    let human = humanize_error(&err);
                                    status_msg.set(Some(format!("{} {}", human.message, human.suggestion)));
                                }
                            }
                        }
                    },
                    "Export JPEG"
                }
                button {
                    style: "flex: 1; padding: 12px; border-radius: 8px; border: none; background: #34495e; color: white;",
                    disabled: outcome.read().is_err(),
                    onclick: move |_| {
                        if let Ok(page) = &*outcome.read() {
                            match export_pdf(&state.read(), page) {
                                Ok(Some(path)) => status_msg.set(Some(format!("Saved {path}"))),
                                Ok(None) => {}
                                Err(err) => {
                                    let human = humanize_error(&err);
                                    status_msg.set(Some(format!("{} {}", human.message, human.suggestion)));
                                }
                            }
                        }
                    },
                    "Export PDF"
                }
            }

            button {
                style: "width: 100%; padding: 8px; border-radius: 8px; border: 1px solid #007aff; color: #007aff; background: white; font-size: 14px; margin-top: 12px;",
                onclick: move |_| {
                    state.write().clear_session();
                    nav.push(Route::Capture {});
                },
                "New Scan"
            }

            if let Some(ref msg) = *status_msg.read() {
                p { style: "margin-top: 12px; color: #666; font-size: 14px; text-align: center;", "{msg}" }
            }
        }
    }
}

/// Decode the full-resolution capture and warp the confirmed corner region
/// onto the configured paper.
fn run_rectification(state: &AppState) -> Result<DynamicImage> {
    let bytes = state.capture_bytes.as_ref().ok_or(BlattwerkError::NoCapture)?;
    let corners = state.corners.as_ref().ok_or(BlattwerkError::NoCapture)?;

    let capture = ImageProcessor::from_bytes(bytes)?.into_dynamic();
    let rectifier = Rectifier::new(state.config.paper_size, state.config.export_dpi);
    rectifier.rectify(&capture, corners)
}

/// Downscaled data-URL preview of the rectified page.
fn preview_data_url(page: &DynamicImage) -> Option<String> {
    let png = ImageProcessor::from_dynamic(page.clone())
        .fit_within(720, 720)
        .to_png_bytes()
        .ok()?;
    Some(format!("data:image/png;base64,{}", BASE64.encode(&png)))
}

/// Default export file stem: session name plus scan date.
fn export_stem(state: &AppState) -> String {
    match &state.session {
        Some(session) => format!(
            "{}-{}",
            session.name,
            session.created_at.format("%Y-%m-%d")
        ),
        None => "scan".into(),
    }
}

/// Save the page as PNG or JPEG via a save dialog. `Ok(None)` means the user
/// dismissed the dialog.
fn export_image(
    state: &AppState,
    page: &DynamicImage,
    extension: &str,
) -> Result<Option<String>> {
    let Some(path) = rfd::FileDialog::new()
        .set_file_name(format!("{}.{extension}", export_stem(state)))
        .save_file()
    else {
        return Ok(None);
    };

    let processor = ImageProcessor::from_dynamic(page.clone());
    if extension == "jpg" {
        let bytes = processor.to_jpeg_bytes(state.config.jpeg_quality)?;
        std::fs::write(&path, bytes)?;
    } else {
        processor.save(&path)?;
    }

    tracing::info!(path = %path.display(), "scan exported");
    Ok(Some(path.display().to_string()))
}

/// Save the page as a single-page PDF via a save dialog.
fn export_pdf(state: &AppState, page: &DynamicImage) -> Result<Option<String>> {
    let Some(path) = rfd::FileDialog::new()
        .set_file_name(format!("{}.pdf", export_stem(state)))
        .save_file()
    else {
        return Ok(None);
    };

    let mut exporter = PdfExporter::new(state.config.paper_size, state.config.export_dpi);
    exporter.set_title(export_stem(state));
    exporter.write_to_file(page, &path)?;

    tracing::info!(path = %path.display(), "scan exported as PDF");
    Ok(Some(path.display().to_string()))
}
