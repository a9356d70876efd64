// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry model — 2D vectors and the envelope polygon.

use serde::{Deserialize, Serialize};

/// Handle pick radius in pixels used when none is configured.
pub const DEFAULT_HANDLE_RADIUS: f64 = 25.0;

/// A 2D point / displacement.
///
/// All transforms return new values; coordinates are plain finite `f64`s and
/// NaN/infinity propagate without guards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean norm.
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Angle of the vector in radians (atan2 convention).
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Distance to another point.
    pub fn distance(self, other: Vec2) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Uniformly scaled copy.
    pub fn scale(self, factor: f64) -> Self {
        self.scale_xy(factor, factor)
    }

    /// Copy scaled per axis.
    pub fn scale_xy(self, sx: f64, sy: f64) -> Self {
        Self::new(self.x * sx, self.y * sy)
    }

    /// Copy shifted by the given offsets.
    pub fn shift(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An ordered polygon with draggable vertex handles.
///
/// Insertion order is winding order; the outline is implicitly closed back to
/// vertex 0. The model supports any vertex count, though the envelope editor
/// only ever works with four corners (seeded top-left, top-right,
/// bottom-right, bottom-left).
///
/// Degenerate shapes (zero area, self-intersecting) are accepted without
/// validation; producing a sane warp from them is the rectifier's problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Vec2>,
    /// Pick radius for vertex handles, in the polygon's coordinate space.
    handle_radius: f64,
}

impl Polygon {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            handle_radius: DEFAULT_HANDLE_RADIUS,
        }
    }

    /// Append a vertex. Chainable; used to seed the corners.
    pub fn add_vertex(&mut self, point: Vec2) -> &mut Self {
        self.vertices.push(point);
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn handle_radius(&self) -> f64 {
        self.handle_radius
    }

    pub fn set_handle_radius(&mut self, radius: f64) {
        self.handle_radius = radius;
    }

    /// Whether `index` addresses an existing vertex.
    pub fn is_index_valid(&self, index: usize) -> bool {
        index < self.vertices.len()
    }

    /// Index of the vertex handle under `cursor`, if any.
    ///
    /// Vertices are scanned in insertion order and the FIRST one within the
    /// handle radius wins, so ties go to the lowest index. This is not a
    /// nearest-vertex search.
    pub fn pointed_vertex_index(&self, cursor: Vec2) -> Option<usize> {
        self.vertices
            .iter()
            .position(|v| v.distance(cursor) <= self.handle_radius)
    }

    /// Shift vertex `index` by `(dx, dy)`.
    ///
    /// Out-of-range indices are a silent no-op. Callers drive this with the
    /// delta since the pointer's previously recorded position, so repeated
    /// moves never accumulate drift.
    pub fn move_vertex(&mut self, index: usize, dx: f64, dy: f64) {
        if !self.is_index_valid(index) {
            return;
        }
        self.vertices[index] = self.vertices[index].shift(dx, dy);
    }

    /// All vertex coordinates as a flat array, each divided by `scale`:
    /// `[x0/s, y0/s, x1/s, y1/s, ...]` in exact vertex order.
    ///
    /// This is the hand-off format for the perspective rectifier; the order
    /// decides which on-screen corner maps to which output corner, so it must
    /// match the seeding winding (TL, TR, BR, BL).
    pub fn flattened_coords(&self, scale: f64) -> Vec<f64> {
        let mut coords = Vec::with_capacity(self.vertices.len() * 2);
        for v in &self.vertices {
            coords.push(v.x / scale);
            coords.push(v.y / scale);
        }
        coords
    }
}

impl Default for Polygon {
    fn default() -> Self {
        Self::new()
    }
}
