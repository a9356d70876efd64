// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// blattwerk-editor — the interactive quadrilateral envelope editor.
//
// Provides the geometry model (2D vectors and polygons with handle
// hit-testing), a pointer-tracking surface that unifies mouse and multi-touch
// input into a stable set of identified pointers, and the editor controller
// that binds pointer events to vertex drags.
//
// The crate has no UI dependency: the host feeds it surface-relative pointer
// events and renders from its state. This keeps the whole editing core
// testable with synthetic event sequences.

pub mod editor;
pub mod geometry;
pub mod pointer;

pub use editor::{EnvelopeEditor, PointerState};
pub use geometry::{Polygon, Vec2};
pub use pointer::{DeviceKind, Pointer, PointerId, PointerTracker, SurfaceObserver};
