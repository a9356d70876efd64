// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Envelope editor controller — binds pointer lifecycle events to vertex drags
// on the document envelope.

use tracing::{debug, trace};

use crate::geometry::{DEFAULT_HANDLE_RADIUS, Polygon, Vec2};
use crate::pointer::{DeviceKind, Pointer, PointerId, PointerTracker, SurfaceObserver};

/// Tracking state of one pointer key, as seen by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerState {
    /// No pointer with this key is active.
    Idle,
    /// Pointer active but not attached to any vertex.
    TrackingEmpty,
    /// Pointer active and dragging the vertex with this index.
    TrackingVertex(usize),
}

/// Reacts to pointer events by mutating the envelope polygon.
///
/// Kept separate from [`EnvelopeEditor`] so the tracker can borrow it as the
/// observer while remaining a sibling field.
struct EditSession {
    polygon: Polygon,
    needs_redraw: bool,
}

impl SurfaceObserver for EditSession {
    fn pointer_created(&mut self, tracker: &PointerTracker, id: PointerId, pointer: &mut Pointer) {
        // Hit-test exactly once, at creation. A pointer that misses every
        // handle stays empty for its whole lifetime.
        if let Some(vertex) = self.polygon.pointed_vertex_index(pointer.position()) {
            pointer.grab(vertex);
            debug!(pointer = %id, vertex, active = tracker.len(), "handle grabbed");
        } else {
            trace!(pointer = %id, "pointer created over empty area");
        }
    }

    fn pointer_moved(&mut self, id: PointerId, pointer: &mut Pointer, new_position: Vec2) {
        let Some(vertex) = pointer.grabbed() else {
            return;
        };
        // `pointer.position()` is still the previous position here, so the
        // delta covers exactly the ground since the last recorded event.
        let delta = new_position - pointer.position();
        self.polygon.move_vertex(vertex, delta.x, delta.y);
        self.needs_redraw = true;
        trace!(pointer = %id, vertex, dx = delta.x, dy = delta.y, "vertex dragged");
    }

    fn pointer_deleted(&mut self, id: PointerId, pointer: Option<&Pointer>) {
        if let Some(p) = pointer {
            trace!(pointer = %id, grabbed = ?p.grabbed(), "pointer released");
        }
    }
}

/// Interactive editor for the document envelope of one scanning session.
///
/// Owns the quadrilateral and the pointer set. The host feeds it
/// surface-relative pointer events in screen pixels; the editor converts them
/// through the view scale into its logical (canvas) coordinate space, where
/// all vertex arithmetic happens. Starting a new session replaces the whole
/// editor.
///
/// Per-pointer states: `Idle` → `TrackingEmpty` | `TrackingVertex` on
/// pointer-down, back to `Idle` on pointer-up/cancel. Pointers are fully
/// independent: two fingers can drag two corners at once without disturbing
/// each other's deltas.
pub struct EnvelopeEditor {
    surface: PointerTracker,
    session: EditSession,
    /// Ratio of on-screen pixels to logical canvas pixels.
    view_scale: f64,
    /// Pick radius in physical screen pixels; the polygon's effective radius
    /// is this divided by the view scale.
    base_handle_radius: f64,
}

impl EnvelopeEditor {
    /// Create an editor over a canvas of `width` x `height` logical pixels,
    /// with the quadrilateral seeded `margin` (fraction) in from each edge.
    ///
    /// Seeding order is top-left, top-right, bottom-right, bottom-left; this
    /// winding flows through [`Self::flattened_coords`] into the rectifier
    /// and decides which corner of the photo lands where on the page.
    pub fn seeded(width: f64, height: f64, margin: f64) -> Self {
        let mut polygon = Polygon::new();
        polygon
            .add_vertex(Vec2::new(margin * width, margin * height))
            .add_vertex(Vec2::new((1.0 - margin) * width, margin * height))
            .add_vertex(Vec2::new((1.0 - margin) * width, (1.0 - margin) * height))
            .add_vertex(Vec2::new(margin * width, (1.0 - margin) * height));
        Self::from_polygon(polygon)
    }

    /// Create an editor around an already-built polygon (e.g. corners found
    /// by the automatic document detection).
    pub fn from_polygon(polygon: Polygon) -> Self {
        let base_handle_radius = polygon.handle_radius();
        Self {
            surface: PointerTracker::new(),
            session: EditSession {
                polygon,
                needs_redraw: true,
            },
            view_scale: 1.0,
            base_handle_radius,
        }
    }

    /// Set the pick radius in physical screen pixels.
    pub fn set_handle_radius(&mut self, radius: f64) {
        self.base_handle_radius = radius;
        self.apply_effective_radius();
    }

    /// Record the ratio between on-screen and logical canvas pixels.
    ///
    /// Incoming pointer coordinates are divided by this scale, and the pick
    /// radius is scaled inversely, so the touch target stays constant in
    /// physical pixels no matter the zoom.
    pub fn set_view_scale(&mut self, scale: f64) {
        self.view_scale = scale;
        self.apply_effective_radius();
    }

    fn apply_effective_radius(&mut self) {
        self.session
            .polygon
            .set_handle_radius(self.base_handle_radius / self.view_scale);
    }

    fn to_canvas(&self, screen: Vec2) -> Vec2 {
        screen.scale(1.0 / self.view_scale)
    }

    /// Pointer-down (mouse primary button pressed, or new touch contact).
    pub fn pointer_down(&mut self, kind: DeviceKind, device: i64, screen_position: Vec2) {
        let position = self.to_canvas(screen_position);
        self.surface
            .pointer_created(kind, device, position, &mut self.session);
    }

    /// Pointer-move. Moves for unknown keys are ignored by the tracker.
    pub fn pointer_move(&mut self, kind: DeviceKind, device: i64, screen_position: Vec2) {
        let position = self.to_canvas(screen_position);
        self.surface
            .pointer_moved(kind, device, position, &mut self.session);
    }

    /// Pointer-up (mouse released, touch lifted).
    pub fn pointer_up(&mut self, kind: DeviceKind, device: i64) {
        self.surface
            .pointer_deleted(kind, device, &mut self.session);
    }

    /// Cancelled pointers release exactly like ended ones, whatever the
    /// cause.
    pub fn pointer_cancel(&mut self, kind: DeviceKind, device: i64) {
        self.pointer_up(kind, device);
    }

    /// Tracking state of a pointer key.
    pub fn pointer_state(&self, kind: DeviceKind, device: i64) -> PointerState {
        match self.surface.get(&PointerId::new(kind, device)) {
            None => PointerState::Idle,
            Some(p) => match p.grabbed() {
                None => PointerState::TrackingEmpty,
                Some(vertex) => PointerState::TrackingVertex(vertex),
            },
        }
    }

    /// Number of currently active pointers.
    pub fn active_pointers(&self) -> usize {
        self.surface.len()
    }

    /// The envelope polygon, in logical canvas coordinates.
    pub fn polygon(&self) -> &Polygon {
        &self.session.polygon
    }

    /// Flattened corner coordinates divided by `scale` — with
    /// `display_width / natural_width` this yields source-image pixel space
    /// for the rectifier.
    pub fn flattened_coords(&self, scale: f64) -> Vec<f64> {
        self.session.polygon.flattened_coords(scale)
    }

    /// True once since the last geometry change; the host redraws when it
    /// reads `true`.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.session.needs_redraw, false)
    }

    /// Discard all pointers and re-seed the quadrilateral for a new canvas.
    pub fn reset(&mut self, width: f64, height: f64, margin: f64) {
        self.surface.clear();
        let mut replacement = Self::seeded(width, height, margin);
        replacement.set_handle_radius(self.base_handle_radius);
        replacement.set_view_scale(self.view_scale);
        self.session = replacement.session;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOUSE: DeviceKind = DeviceKind::Mouse;
    const TOUCH: DeviceKind = DeviceKind::Touch;

    fn editor_100x100() -> EnvelopeEditor {
        // Seeds corners at (10,10), (90,10), (90,90), (10,90).
        EnvelopeEditor::seeded(100.0, 100.0, 0.1)
    }

    fn corners(editor: &EnvelopeEditor) -> Vec<Vec2> {
        editor.polygon().vertices().to_vec()
    }

    #[test]
    fn seeding_winds_tl_tr_br_bl() {
        let editor = editor_100x100();
        assert_eq!(
            corners(&editor),
            vec![
                Vec2::new(10.0, 10.0),
                Vec2::new(90.0, 10.0),
                Vec2::new(90.0, 90.0),
                Vec2::new(10.0, 90.0),
            ]
        );
    }

    #[test]
    fn end_to_end_drag_scenario() {
        let mut editor = editor_100x100();

        editor.pointer_down(MOUSE, 0, Vec2::new(10.0, 10.0));
        assert_eq!(editor.pointer_state(MOUSE, 0), PointerState::TrackingVertex(0));

        editor.pointer_move(MOUSE, 0, Vec2::new(20.0, 15.0));
        assert_eq!(editor.polygon().vertices()[0], Vec2::new(20.0, 15.0));
        assert_eq!(editor.polygon().vertices()[1], Vec2::new(90.0, 10.0));
        assert_eq!(editor.polygon().vertices()[2], Vec2::new(90.0, 90.0));
        assert_eq!(editor.polygon().vertices()[3], Vec2::new(10.0, 90.0));

        editor.pointer_up(MOUSE, 0);
        assert_eq!(editor.pointer_state(MOUSE, 0), PointerState::Idle);

        assert_eq!(
            editor.flattened_coords(1.0),
            vec![20.0, 15.0, 90.0, 10.0, 90.0, 90.0, 10.0, 90.0]
        );
    }

    #[test]
    fn consecutive_moves_use_delta_since_previous_event() {
        let mut editor = editor_100x100();

        editor.pointer_down(MOUSE, 0, Vec2::new(12.0, 12.0)); // within radius of v0
        editor.pointer_move(MOUSE, 0, Vec2::new(22.0, 12.0)); // +10 x
        editor.pointer_move(MOUSE, 0, Vec2::new(22.0, 32.0)); // +20 y

        // v0 started at (10,10) and saw deltas (+10,0) then (0,+20).
        assert_eq!(editor.polygon().vertices()[0], Vec2::new(20.0, 30.0));
    }

    #[test]
    fn miss_at_center_tracks_empty_and_mutates_nothing() {
        let mut editor = editor_100x100();
        let before = corners(&editor);

        editor.pointer_down(MOUSE, 0, Vec2::new(50.0, 50.0));
        assert_eq!(editor.pointer_state(MOUSE, 0), PointerState::TrackingEmpty);

        editor.pointer_move(MOUSE, 0, Vec2::new(60.0, 60.0));
        // The hit-test ran once, at creation; drifting near a handle later
        // never attaches.
        editor.pointer_move(MOUSE, 0, Vec2::new(88.0, 88.0));
        assert_eq!(editor.pointer_state(MOUSE, 0), PointerState::TrackingEmpty);
        assert_eq!(corners(&editor), before);

        editor.pointer_up(MOUSE, 0);
        assert_eq!(corners(&editor), before);
    }

    #[test]
    fn two_pointers_drag_independent_vertices() {
        let mut editor = editor_100x100();

        editor.pointer_down(TOUCH, 1, Vec2::new(10.0, 10.0)); // grabs v0
        editor.pointer_down(TOUCH, 2, Vec2::new(90.0, 90.0)); // grabs v2
        assert_eq!(editor.pointer_state(TOUCH, 1), PointerState::TrackingVertex(0));
        assert_eq!(editor.pointer_state(TOUCH, 2), PointerState::TrackingVertex(2));

        editor.pointer_move(TOUCH, 1, Vec2::new(5.0, 5.0));
        editor.pointer_move(TOUCH, 2, Vec2::new(95.0, 80.0));

        assert_eq!(editor.polygon().vertices()[0], Vec2::new(5.0, 5.0));
        assert_eq!(editor.polygon().vertices()[2], Vec2::new(95.0, 80.0));
        // Untouched corners stay put.
        assert_eq!(editor.polygon().vertices()[1], Vec2::new(90.0, 10.0));
        assert_eq!(editor.polygon().vertices()[3], Vec2::new(10.0, 90.0));
    }

    #[test]
    fn touch_cancel_behaves_exactly_like_touch_end() {
        let drag = |finish: fn(&mut EnvelopeEditor)| {
            let mut editor = editor_100x100();
            editor.pointer_down(TOUCH, 3, Vec2::new(90.0, 10.0));
            editor.pointer_move(TOUCH, 3, Vec2::new(80.0, 20.0));
            finish(&mut editor);
            (corners(&editor), editor.active_pointers(), editor.pointer_state(TOUCH, 3))
        };

        let ended = drag(|e| e.pointer_up(TOUCH, 3));
        let cancelled = drag(|e| e.pointer_cancel(TOUCH, 3));
        assert_eq!(ended, cancelled);
        assert_eq!(ended.2, PointerState::Idle);
    }

    #[test]
    fn move_after_release_is_ignored() {
        let mut editor = editor_100x100();

        editor.pointer_down(MOUSE, 0, Vec2::new(10.0, 10.0));
        editor.pointer_up(MOUSE, 0);
        editor.pointer_move(MOUSE, 0, Vec2::new(40.0, 40.0));

        assert_eq!(editor.polygon().vertices()[0], Vec2::new(10.0, 10.0));
        assert_eq!(editor.active_pointers(), 0);
    }

    #[test]
    fn view_scale_keeps_touch_target_constant_in_screen_pixels() {
        let mut editor = editor_100x100();
        editor.set_handle_radius(25.0);
        // Canvas displayed at twice its logical size: corner v0 sits at
        // screen (20, 20).
        editor.set_view_scale(2.0);

        // 24 screen px from the handle centre: inside the 25 px target.
        editor.pointer_down(TOUCH, 1, Vec2::new(44.0, 20.0));
        assert_eq!(editor.pointer_state(TOUCH, 1), PointerState::TrackingVertex(0));
        editor.pointer_up(TOUCH, 1);

        // 26 screen px away: outside.
        editor.pointer_down(TOUCH, 2, Vec2::new(46.0, 20.0));
        assert_eq!(editor.pointer_state(TOUCH, 2), PointerState::TrackingEmpty);
    }

    #[test]
    fn drag_under_view_scale_moves_in_logical_space() {
        let mut editor = editor_100x100();
        editor.set_view_scale(2.0);

        editor.pointer_down(MOUSE, 0, Vec2::new(20.0, 20.0)); // canvas (10,10)
        editor.pointer_move(MOUSE, 0, Vec2::new(40.0, 30.0)); // canvas (20,15)

        assert_eq!(editor.polygon().vertices()[0], Vec2::new(20.0, 15.0));
    }

    #[test]
    fn redraw_flag_set_by_drag_and_consumed_once() {
        let mut editor = editor_100x100();
        // Seeding leaves an initial draw pending.
        assert!(editor.take_redraw());
        assert!(!editor.take_redraw());

        editor.pointer_down(MOUSE, 0, Vec2::new(10.0, 10.0));
        assert!(!editor.take_redraw()); // grabbing alone draws nothing new

        editor.pointer_move(MOUSE, 0, Vec2::new(15.0, 15.0));
        assert!(editor.take_redraw());
        assert!(!editor.take_redraw());
    }

    #[test]
    fn reset_discards_pointers_and_reseeds() {
        let mut editor = editor_100x100();
        editor.pointer_down(MOUSE, 0, Vec2::new(10.0, 10.0));
        editor.pointer_move(MOUSE, 0, Vec2::new(30.0, 30.0));

        editor.reset(200.0, 100.0, 0.1);

        assert_eq!(editor.active_pointers(), 0);
        assert_eq!(editor.polygon().vertices()[0], Vec2::new(20.0, 10.0));
        assert_eq!(editor.polygon().vertices()[2], Vec2::new(180.0, 90.0));
        // The old mouse pointer is gone; its moves are ignored.
        editor.pointer_move(MOUSE, 0, Vec2::new(50.0, 50.0));
        assert_eq!(editor.polygon().vertices()[0], Vec2::new(20.0, 10.0));
    }

    #[test]
    fn flattened_coords_scale_into_source_pixel_space() {
        let mut editor = editor_100x100();
        editor.pointer_down(MOUSE, 0, Vec2::new(10.0, 10.0));
        editor.pointer_move(MOUSE, 0, Vec2::new(20.0, 15.0));
        editor.pointer_up(MOUSE, 0);

        // Displayed at 100 px wide for a 400 px wide source: scale 0.25, so
        // dividing maps display coordinates up into source pixels.
        let coords = editor.flattened_coords(0.25);
        assert_eq!(
            coords,
            vec![80.0, 60.0, 360.0, 40.0, 360.0, 360.0, 40.0, 360.0]
        );
    }
}
