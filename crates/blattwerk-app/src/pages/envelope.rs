// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Envelope page — drag the four corner handles onto the document's edges.
//
// The photo preview sits under an SVG overlay whose geometry is rendered
// purely from the editor's state. Mouse and touch events are normalised into
// surface-relative coordinates and fed to the editor core; everything about
// grabbing and dragging lives there, not here.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;

use blattwerk_editor::pointer::PRIMARY_BUTTON;
use blattwerk_editor::{DeviceKind, EnvelopeEditor, Polygon, Vec2};

use crate::Route;
use crate::state::AppState;

/// Stroke colors for the four corner handles, TL/TR/BR/BL.
const HANDLE_COLORS: [&str; 4] = ["#ff0", "#0ff", "#f0f", "#fff"];

#[component]
pub fn Envelope() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let nav = use_navigator();

    if state.read().session.is_none() {
        return rsx! {
            div {
                p { style: "color: #888;", "No photo loaded yet." }
                Link { to: Route::Capture {}, "Back to capture" }
            }
        };
    }

    let mut editor = use_signal(|| build_editor(&state.read()));
    // Top-left of the overlay in client coordinates; touch positions are
    // made surface-relative by subtracting it.
    let mut surface_origin = use_signal(|| (0.0f64, 0.0f64));

    let data_url = use_memo(move || {
        state
            .read()
            .preview_png
            .as_ref()
            .map(|png| format!("data:image/png;base64,{}", BASE64.encode(png)))
    });

    let (width, height) = {
        let s = state.read();
        (s.preview_width, s.preview_height)
    };

    // Snapshot the geometry for this frame; handlers below mutate the editor
    // and the signal write schedules the next render.
    let (outline, handles, radius) = {
        let ed = editor.read();
        let polygon = ed.polygon();
        let outline = polygon
            .vertices()
            .iter()
            .map(|v| format!("{:.1},{:.1}", v.x, v.y))
            .collect::<Vec<_>>()
            .join(" ");
        (outline, polygon.vertices().to_vec(), polygon.handle_radius())
    };

    rsx! {
        div {
            nav {
                style: "width: 100%; display: flex; justify-content: space-between; margin-bottom: 12px;",
                button {
                    style: "width: 30%; padding: 12px; border-radius: 8px; border: none; background: #c0392b; color: white; font-weight: bolder;",
                    onclick: move |_| {
                        // Cancel carries no payload: the session is simply
                        // dropped.
                        tracing::info!("envelope editing cancelled");
                        state.write().clear_session();
                        nav.push(Route::Capture {});
                    },
                    "Cancel"
                }
                button {
                    style: "width: 30%; padding: 12px; border-radius: 8px; border: none; background: #27ae60; color: white; font-weight: bolder;",
                    onclick: move |_| {
                        // Hand-off: corners leave in natural pixel space.
                        let scale = state.read().display_scale();
                        let corners = editor.read().flattened_coords(scale);
                        tracing::info!(?corners, "envelope confirmed");
                        state.write().corners = Some(corners);
                        nav.push(Route::ScanResult {});
                    },
                    "Correct"
                }
            }

            p { style: "color: #666; font-size: 14px;",
                "Drag the handles onto the document's corners. Two fingers can move two corners at once."
            }

            div {
                style: "position: relative; width: {width}px; height: {height}px; background: #222;",

                if let Some(ref url) = *data_url.read() {
                    img {
                        src: "{url}",
                        style: "position: absolute; left: 0; top: 0; width: {width}px; height: {height}px; -webkit-user-drag: none; user-select: none;",
                        draggable: "false",
                    }
                }

                svg {
                    style: "position: absolute; left: 0; top: 0; touch-action: none; cursor: crosshair;",
                    width: "{width}",
                    height: "{height}",

                    onmounted: move |ev| {
                        spawn(async move {
                            if let Ok(rect) = ev.data().get_client_rect().await {
                                surface_origin.set((rect.origin.x, rect.origin.y));
                            }
                        });
                    },

                    // Mouse: primary button only; other buttons never create
                    // a pointer.
                    onmousedown: move |ev| {
                        if ev.trigger_button() == Some(MouseButton::Primary) {
                            ev.prevent_default();
                            let p = ev.element_coordinates();
                            editor.write().pointer_down(
                                DeviceKind::Mouse,
                                PRIMARY_BUTTON,
                                Vec2::new(p.x, p.y),
                            );
                        }
                    },
                    onmousemove: move |ev| {
                        ev.prevent_default();
                        let p = ev.element_coordinates();
                        // Moves without a preceding press are dropped by the
                        // tracker.
                        editor.write().pointer_move(
                            DeviceKind::Mouse,
                            PRIMARY_BUTTON,
                            Vec2::new(p.x, p.y),
                        );
                    },
                    onmouseup: move |ev| {
                        if ev.trigger_button() == Some(MouseButton::Primary) {
                            ev.prevent_default();
                            editor.write().pointer_up(DeviceKind::Mouse, PRIMARY_BUTTON);
                        }
                    },

                    // Touch: every changed contact is its own pointer.
                    ontouchstart: move |ev| {
                        ev.prevent_default();
                        let origin = *surface_origin.read();
                        for touch in ev.touches_changed() {
                            let p = touch.client_coordinates();
                            editor.write().pointer_down(
                                DeviceKind::Touch,
                                touch.identifier() as i64,
                                Vec2::new(p.x - origin.0, p.y - origin.1),
                            );
                        }
                    },
                    ontouchmove: move |ev| {
                        ev.prevent_default();
                        let origin = *surface_origin.read();
                        for touch in ev.touches_changed() {
                            let p = touch.client_coordinates();
                            editor.write().pointer_move(
                                DeviceKind::Touch,
                                touch.identifier() as i64,
                                Vec2::new(p.x - origin.0, p.y - origin.1),
                            );
                        }
                    },
                    ontouchend: move |ev| {
                        ev.prevent_default();
                        for touch in ev.touches_changed() {
                            editor.write().pointer_up(DeviceKind::Touch, touch.identifier() as i64);
                        }
                    },
                    ontouchcancel: move |ev| {
                        // Cancelled contacts release exactly like lifted
                        // ones; the editor routes both through one path.
                        ev.prevent_default();
                        for touch in ev.touches_changed() {
                            editor.write().pointer_cancel(DeviceKind::Touch, touch.identifier() as i64);
                        }
                    },

                    polygon {
                        points: "{outline}",
                        fill: "rgba(255, 255, 255, 0.25)",
                        stroke: "red",
                        stroke_width: "2",
                    }

                    for (i, v) in handles.iter().enumerate() {
                        circle {
                            key: "{i}",
                            cx: "{v.x}",
                            cy: "{v.y}",
                            r: "{radius}",
                            fill: "rgba(255, 255, 255, 0.25)",
                            stroke: HANDLE_COLORS[i % HANDLE_COLORS.len()],
                            stroke_width: "2",
                        }
                    }
                }
            }
        }
    }
}

/// Build the editor for the current session: detected corners if the capture
/// page found some, otherwise the default inset quad. Detected corners are
/// stored in natural pixel space and displayed in preview space.
fn build_editor(state: &AppState) -> EnvelopeEditor {
    let scale = state.display_scale();
    let mut editor = match &state.detected_corners {
        Some(flat) if flat.len() == 8 => {
            let mut polygon = Polygon::new();
            for pair in flat.chunks(2) {
                polygon.add_vertex(Vec2::new(pair[0] * scale, pair[1] * scale));
            }
            EnvelopeEditor::from_polygon(polygon)
        }
        _ => EnvelopeEditor::seeded(
            state.preview_width as f64,
            state.preview_height as f64,
            state.config.envelope_margin,
        ),
    };
    editor.set_handle_radius(state.config.handle_radius_px);
    editor
}
