// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pointer tracking — unifies mouse and multi-touch input into a stable set of
// identified pointers with attached payloads.
//
// The tracker is deliberately free of any real event-source wiring: the host
// extracts surface-relative coordinates from its UI toolkit and calls
// `pointer_created` / `pointer_moved` / `pointer_deleted`, passing an observer
// that reacts to the lifecycle. Tests drive it with synthetic sequences.

use std::collections::HashMap;

use tracing::trace;

use crate::geometry::Vec2;

/// Mouse button index treated as the primary (and only tracked) button.
pub const PRIMARY_BUTTON: i64 = 0;

/// Kind of input device a pointer originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Mouse,
    Touch,
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mouse => write!(f, "mouse"),
            Self::Touch => write!(f, "touch"),
        }
    }
}

/// Stable identity of one pointer: device kind plus the device-supplied
/// identifier (mouse button index, or touch-contact identifier).
///
/// Touch identifiers are only unique while the contact is active; combining
/// them with the kind keeps the key stable for the pointer's lifetime and
/// distinct from any concurrent mouse pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId {
    pub kind: DeviceKind,
    pub device: i64,
}

impl PointerId {
    pub fn new(kind: DeviceKind, device: i64) -> Self {
        Self { kind, device }
    }
}

impl std::fmt::Display for PointerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.kind, self.device)
    }
}

/// One active pointer: its current position on the surface and the vertex it
/// grabbed on creation, if any.
#[derive(Debug, Clone)]
pub struct Pointer {
    position: Vec2,
    grabbed: Option<usize>,
}

impl Pointer {
    fn new(position: Vec2) -> Self {
        Self {
            position,
            grabbed: None,
        }
    }

    /// Current position. During a `pointer_moved` notification this is still
    /// the PREVIOUS position; the tracker overwrites it after the observer
    /// returns, which is what makes delta computation possible.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Attach a vertex index to this pointer.
    pub fn grab(&mut self, vertex: usize) {
        self.grabbed = Some(vertex);
    }

    /// Detach any grabbed vertex.
    pub fn release(&mut self) {
        self.grabbed = None;
    }

    /// The grabbed vertex index, if any.
    pub fn grabbed(&self) -> Option<usize> {
        self.grabbed
    }
}

/// Receives pointer lifecycle notifications from a [`PointerTracker`].
///
/// Default implementations are no-ops so observers only implement what they
/// react to.
pub trait SurfaceObserver {
    /// A pointer appeared. Invoked BEFORE the pointer enters the active set,
    /// so `tracker` still reflects the state without it (e.g. "is this the
    /// first contact"). The observer may attach a payload via
    /// [`Pointer::grab`].
    fn pointer_created(&mut self, tracker: &PointerTracker, id: PointerId, pointer: &mut Pointer) {
        let _ = (tracker, id, pointer);
    }

    /// A tracked pointer moved to `new_position`. `pointer` still carries its
    /// previous position; the tracker records `new_position` after this
    /// returns.
    fn pointer_moved(&mut self, id: PointerId, pointer: &mut Pointer, new_position: Vec2) {
        let _ = (id, pointer, new_position);
    }

    /// A pointer ended (button released, touch lifted or cancelled).
    /// `pointer` is `None` when the key was never created — that case must be
    /// tolerated, not treated as a bug.
    fn pointer_deleted(&mut self, id: PointerId, pointer: Option<&Pointer>) {
        let _ = (id, pointer);
    }
}

/// The set of currently active pointers on one input surface.
#[derive(Debug, Default)]
pub struct PointerTracker {
    pointers: HashMap<PointerId, Pointer>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active pointers.
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    pub fn get(&self, id: &PointerId) -> Option<&Pointer> {
        self.pointers.get(id)
    }

    pub fn contains(&self, id: &PointerId) -> bool {
        self.pointers.contains_key(id)
    }

    /// Drop all pointers without notifications. Used when an editing session
    /// is torn down.
    pub fn clear(&mut self) {
        self.pointers.clear();
    }

    /// Register a new pointer at `position`.
    ///
    /// The observer is notified before insertion and may attach a payload to
    /// the pointer; the (possibly modified) pointer is then stored.
    pub fn pointer_created<O: SurfaceObserver>(
        &mut self,
        kind: DeviceKind,
        device: i64,
        position: Vec2,
        observer: &mut O,
    ) {
        let id = PointerId::new(kind, device);
        let mut pointer = Pointer::new(position);
        trace!(pointer = %id, x = position.x, y = position.y, "pointer created");

        observer.pointer_created(&*self, id, &mut pointer);

        self.pointers.insert(id, pointer);
    }

    /// Move a tracked pointer to `new_position`.
    ///
    /// Events for unknown keys are ignored silently — residual mouse moves
    /// after a mouse-up land here. For known keys the observer sees the
    /// pointer with its old position, then the new position is recorded.
    pub fn pointer_moved<O: SurfaceObserver>(
        &mut self,
        kind: DeviceKind,
        device: i64,
        new_position: Vec2,
        observer: &mut O,
    ) {
        let id = PointerId::new(kind, device);
        let Some(pointer) = self.pointers.get_mut(&id) else {
            return;
        };

        observer.pointer_moved(id, pointer, new_position);

        pointer.position = new_position;
    }

    /// End a pointer. The observer receives the pointer being removed, or
    /// `None` when the key was never created (which must not panic).
    pub fn pointer_deleted<O: SurfaceObserver>(
        &mut self,
        kind: DeviceKind,
        device: i64,
        observer: &mut O,
    ) {
        let id = PointerId::new(kind, device);
        let removed = self.pointers.remove(&id);
        trace!(pointer = %id, existed = removed.is_some(), "pointer deleted");

        observer.pointer_deleted(id, removed.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Observer that records every notification it receives.
    #[derive(Default)]
    struct Recorder {
        created: Vec<(PointerId, usize)>, // (id, tracker len at notification)
        moved: Vec<(PointerId, Vec2, Vec2)>, // (id, old pos, new pos)
        deleted: Vec<(PointerId, bool)>,  // (id, pointer existed)
    }

    impl SurfaceObserver for Recorder {
        fn pointer_created(
            &mut self,
            tracker: &PointerTracker,
            id: PointerId,
            _pointer: &mut Pointer,
        ) {
            self.created.push((id, tracker.len()));
        }

        fn pointer_moved(&mut self, id: PointerId, pointer: &mut Pointer, new_position: Vec2) {
            self.moved.push((id, pointer.position(), new_position));
        }

        fn pointer_deleted(&mut self, id: PointerId, pointer: Option<&Pointer>) {
            self.deleted.push((id, pointer.is_some()));
        }
    }

    #[test]
    fn created_notification_fires_before_insertion() {
        let mut tracker = PointerTracker::new();
        let mut obs = Recorder::default();

        tracker.pointer_created(DeviceKind::Touch, 7, Vec2::new(1.0, 2.0), &mut obs);
        tracker.pointer_created(DeviceKind::Touch, 8, Vec2::new(3.0, 4.0), &mut obs);

        // First contact saw an empty set, second saw one pointer.
        assert_eq!(obs.created[0].1, 0);
        assert_eq!(obs.created[1].1, 1);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn moved_notification_carries_old_position() {
        let mut tracker = PointerTracker::new();
        let mut obs = Recorder::default();

        tracker.pointer_created(DeviceKind::Mouse, 0, Vec2::new(10.0, 10.0), &mut obs);
        tracker.pointer_moved(DeviceKind::Mouse, 0, Vec2::new(20.0, 15.0), &mut obs);

        let (_, old, new) = obs.moved[0];
        assert_eq!(old, Vec2::new(10.0, 10.0));
        assert_eq!(new, Vec2::new(20.0, 15.0));

        // After the notification the stored position is the new one.
        let id = PointerId::new(DeviceKind::Mouse, 0);
        assert_eq!(tracker.get(&id).unwrap().position(), Vec2::new(20.0, 15.0));
    }

    #[test]
    fn create_then_delete_removes_and_later_moves_are_ignored() {
        let mut tracker = PointerTracker::new();
        let mut obs = Recorder::default();

        tracker.pointer_created(DeviceKind::Mouse, 0, Vec2::new(5.0, 5.0), &mut obs);
        tracker.pointer_deleted(DeviceKind::Mouse, 0, &mut obs);
        assert!(tracker.is_empty());

        // Residual mouse-move after mouse-up: ignored, not recreated.
        tracker.pointer_moved(DeviceKind::Mouse, 0, Vec2::new(50.0, 50.0), &mut obs);
        assert!(tracker.is_empty());
        assert!(obs.moved.is_empty());
    }

    #[test]
    fn deleting_unknown_pointer_notifies_with_none() {
        let mut tracker = PointerTracker::new();
        let mut obs = Recorder::default();

        tracker.pointer_deleted(DeviceKind::Touch, 42, &mut obs);

        assert_eq!(obs.deleted, vec![(PointerId::new(DeviceKind::Touch, 42), false)]);
    }

    #[test]
    fn mouse_and_touch_keys_never_collide() {
        let mut tracker = PointerTracker::new();
        let mut obs = Recorder::default();

        tracker.pointer_created(DeviceKind::Mouse, 0, Vec2::new(0.0, 0.0), &mut obs);
        tracker.pointer_created(DeviceKind::Touch, 0, Vec2::new(9.0, 9.0), &mut obs);

        assert_eq!(tracker.len(), 2);
        let mouse = PointerId::new(DeviceKind::Mouse, 0);
        let touch = PointerId::new(DeviceKind::Touch, 0);
        assert_eq!(tracker.get(&mouse).unwrap().position(), Vec2::new(0.0, 0.0));
        assert_eq!(tracker.get(&touch).unwrap().position(), Vec2::new(9.0, 9.0));
    }

    #[test]
    fn pointer_id_display_format() {
        assert_eq!(
            PointerId::new(DeviceKind::Mouse, 0).to_string(),
            "mouse-0"
        );
        assert_eq!(
            PointerId::new(DeviceKind::Touch, 17).to_string(),
            "touch-17"
        );
    }

    #[test]
    fn observer_can_attach_payload_during_creation() {
        struct Grabber;
        impl SurfaceObserver for Grabber {
            fn pointer_created(
                &mut self,
                _tracker: &PointerTracker,
                _id: PointerId,
                pointer: &mut Pointer,
            ) {
                pointer.grab(3);
            }
        }

        let mut tracker = PointerTracker::new();
        tracker.pointer_created(DeviceKind::Touch, 1, Vec2::new(0.0, 0.0), &mut Grabber);

        let id = PointerId::new(DeviceKind::Touch, 1);
        assert_eq!(tracker.get(&id).unwrap().grabbed(), Some(3));
    }
}
