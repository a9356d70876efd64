// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — export of rectified scans as single-page PDFs.

pub mod exporter;

pub use exporter::PdfExporter;
