// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Blattwerk.

use thiserror::Error;

/// Top-level error type for all Blattwerk operations.
///
/// The interactive editor core never produces errors (invalid indices and
/// unmatched pointer events are silent no-ops); everything here belongs to the
/// capture, rectification, and export collaborators.
#[derive(Debug, Error)]
pub enum BlattwerkError {
    // -- Capture / image errors --
    #[error("image decoding failed: {0}")]
    ImageDecode(String),

    #[error("image processing failed: {0}")]
    ImageProcess(String),

    #[error("no capture loaded")]
    NoCapture,

    // -- Rectification --
    #[error("perspective rectification failed: {0}")]
    Rectify(String),

    // -- Export --
    #[error("PDF export failed: {0}")]
    PdfExport(String),

    // -- Persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BlattwerkError>;
