// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification — maps the four user-marked document corners onto
// a paper-sized rectangle, and offers automatic corner detection to pre-seed
// the envelope editor.
//
// The homography itself is delegated to `imageproc`
// (`Projection::from_control_points` + `warp_into`); this module only
// assembles corner sets and target rectangles around it.

use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use imageproc::hough::{LineDetectionOptions, PolarLine, detect_lines};
use blattwerk_core::PaperSize;
use blattwerk_core::error::BlattwerkError;
use tracing::{debug, info, instrument, warn};

/// Canny hysteresis thresholds for document-edge detection.
const CANNY_LOW: f32 = 90.0;
const CANNY_HIGH: f32 = 100.0;

/// Minimum share of the image area a detected quadrilateral must cover to be
/// believed; smaller hits are usually text blocks or noise.
const MIN_QUAD_AREA_FRACTION: f32 = 0.15;

/// Maps a marked quadrilateral in a capture onto a flat, paper-sized page.
pub struct Rectifier {
    paper_size: PaperSize,
    dpi: u32,
}

impl Rectifier {
    pub fn new(paper_size: PaperSize, dpi: u32) -> Self {
        Self { paper_size, dpi }
    }

    /// Pixel dimensions (width, height) of the rectified output page.
    pub fn target_dimensions(&self) -> (u32, u32) {
        self.paper_size.dimensions_px(self.dpi)
    }

    /// Warp the region inside `corners` onto the full target page.
    ///
    /// `corners` is the flat hand-off array from the envelope editor —
    /// exactly 4 points (8 numbers) in source-image pixel space, ordered
    /// top-left, top-right, bottom-right, bottom-left. The corner order is
    /// what ties each marked corner to its page corner; the editor guarantees
    /// it by seeding winding.
    ///
    /// Degenerate corner sets (collinear or coincident points) are rejected
    /// by the projection solver and surface as [`BlattwerkError::Rectify`];
    /// the editor itself never validates geometry.
    #[instrument(skip(self, image, corners), fields(corner_count = corners.len() / 2))]
    pub fn rectify(
        &self,
        image: &DynamicImage,
        corners: &[f64],
    ) -> Result<DynamicImage, BlattwerkError> {
        if corners.len() != 8 {
            return Err(BlattwerkError::Rectify(format!(
                "expected 4 corners (8 coordinates), got {}",
                corners.len()
            )));
        }

        let src: [(f32, f32); 4] = [
            (corners[0] as f32, corners[1] as f32),
            (corners[2] as f32, corners[3] as f32),
            (corners[4] as f32, corners[5] as f32),
            (corners[6] as f32, corners[7] as f32),
        ];

        let (out_w, out_h) = self.target_dimensions();
        let dst: [(f32, f32); 4] = [
            (0.0, 0.0),
            (out_w as f32, 0.0),
            (out_w as f32, out_h as f32),
            (0.0, out_h as f32),
        ];

        let projection = Projection::from_control_points(src, dst).ok_or_else(|| {
            BlattwerkError::Rectify(
                "corner set is degenerate; no perspective mapping exists".into(),
            )
        })?;

        let rgba = image.to_rgba8();
        let page_white = Rgba([255u8, 255, 255, 255]);
        let mut output = RgbaImage::new(out_w, out_h);
        warp_into(&rgba, &projection, Interpolation::Bilinear, page_white, &mut output);

        info!(out_w, out_h, dpi = self.dpi, "capture rectified");
        Ok(DynamicImage::ImageRgba8(output))
    }

    /// Try to find the document's corners automatically.
    ///
    /// Runs blur → Canny → Hough line detection, picks the outermost
    /// horizontal and vertical edges, and intersects them. Returns corners in
    /// top-left, top-right, bottom-right, bottom-left order, suitable for
    /// seeding the envelope editor — or `None` when the photo has no clear
    /// document borders, in which case the editor falls back to its default
    /// inset quad.
    #[instrument(skip(image), fields(width = image.width(), height = image.height()))]
    pub fn detect_quad(image: &DynamicImage) -> Option<[(f32, f32); 4]> {
        let (width, height) = (image.width(), image.height());

        let gray = image.to_luma8();
        let blurred = gaussian_blur_f32(&gray, 1.5);
        let edges = canny(&blurred, CANNY_LOW, CANNY_HIGH);

        // Vote threshold proportional to the image diagonal so detection
        // scales with resolution.
        let diagonal = ((width as f64).powi(2) + (height as f64).powi(2)).sqrt();
        let options = LineDetectionOptions {
            vote_threshold: (diagonal * 0.2).max(60.0) as u32,
            suppression_radius: 10,
        };
        let lines = detect_lines(&edges, options);
        debug!(line_count = lines.len(), "hough lines detected");

        let sides = DocumentEdges::from_lines(&lines)?;
        let quad = sides.corners()?;

        // Reject implausibly small hits.
        let area = quad_area(&quad);
        let min_area = width as f32 * height as f32 * MIN_QUAD_AREA_FRACTION;
        if area < min_area {
            warn!(area, min_area, "detected quadrilateral too small, discarding");
            return None;
        }

        debug!(?quad, "document corners detected");
        Some(quad)
    }
}

/// The four outermost straight edges of a document in a photo.
struct DocumentEdges {
    top: PolarLine,
    bottom: PolarLine,
    left: PolarLine,
    right: PolarLine,
}

impl DocumentEdges {
    /// Bucket Hough lines into roughly-horizontal and roughly-vertical sets
    /// and pick the extreme line of each side. Lines steeper than ~25 degrees
    /// off either axis are ambiguous and ignored.
    fn from_lines(lines: &[PolarLine]) -> Option<Self> {
        let mut horizontal = Vec::new();
        let mut vertical = Vec::new();

        for line in lines {
            let angle = line.angle_in_degrees;
            // angle is 0..180: ~0/~180 means a vertical edge normal
            // (horizontal line), ~90 a vertical line.
            if angle <= 25 || angle >= 155 {
                vertical.push(*line);
            } else if (65..=115).contains(&angle) {
                horizontal.push(*line);
            }
        }

        if horizontal.len() < 2 || vertical.len() < 2 {
            debug!(
                horizontal = horizontal.len(),
                vertical = vertical.len(),
                "not enough axis-aligned lines for a document outline"
            );
            return None;
        }

        fn by_r(a: &&PolarLine, b: &&PolarLine) -> std::cmp::Ordering {
            a.r.partial_cmp(&b.r).unwrap_or(std::cmp::Ordering::Equal)
        }

        Some(Self {
            top: *horizontal.iter().min_by(by_r)?,
            bottom: *horizontal.iter().max_by(by_r)?,
            left: *vertical.iter().min_by(by_r)?,
            right: *vertical.iter().max_by(by_r)?,
        })
    }

    /// Intersect the edges pairwise into TL, TR, BR, BL corners.
    fn corners(&self) -> Option<[(f32, f32); 4]> {
        Some([
            intersect(&self.top, &self.left)?,
            intersect(&self.top, &self.right)?,
            intersect(&self.bottom, &self.right)?,
            intersect(&self.bottom, &self.left)?,
        ])
    }
}

/// Intersection of two lines in polar (Hough) form: a `PolarLine` with
/// parameters `(r, theta)` is the line `x*cos(theta) + y*sin(theta) = r`.
/// Returns `None` for (nearly) parallel lines.
fn intersect(a: &PolarLine, b: &PolarLine) -> Option<(f32, f32)> {
    let theta_a = (a.angle_in_degrees as f64).to_radians();
    let theta_b = (b.angle_in_degrees as f64).to_radians();

    let (sin_a, cos_a) = theta_a.sin_cos();
    let (sin_b, cos_b) = theta_b.sin_cos();

    let denom = cos_a * sin_b - sin_a * cos_b;
    if denom.abs() < 1e-6 {
        return None;
    }

    let (r_a, r_b) = (a.r as f64, b.r as f64);
    let x = (r_a * sin_b - r_b * sin_a) / denom;
    let y = (r_b * cos_a - r_a * cos_b) / denom;
    Some((x as f32, y as f32))
}

/// Shoelace area of a quadrilateral with vertices in winding order.
fn quad_area(corners: &[(f32, f32); 4]) -> f32 {
    let mut doubled = 0.0f32;
    for i in 0..4 {
        let j = (i + 1) % 4;
        doubled += corners[i].0 * corners[j].1 - corners[j].0 * corners[i].1;
    }
    doubled.abs() / 2.0
}
