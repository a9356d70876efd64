// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// blattwerk-document — Document processing for the Blattwerk scanner.
//
// Provides the image pipeline (decode, preview resize, enhancement, encode),
// the perspective rectifier that maps a user-marked quadrilateral onto a
// paper-sized rectangle, automatic document-edge detection for seeding the
// envelope editor, and PDF export of rectified pages.

pub mod image;
pub mod pdf;
pub mod rectify;

pub use image::processor::ImageProcessor;
pub use pdf::exporter::PdfExporter;
pub use rectify::Rectifier;
