// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the scanning UI.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how the UI presents the message.

use crate::error::BlattwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Retrying (or retrying with a small adjustment) is likely to work.
    Transient,
    /// User must do something (pick a different photo, adjust the corners).
    ActionRequired,
    /// Cannot be fixed by retrying — unsupported file, disk problem, etc.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `BlattwerkError` into a message a non-technical user can act on.
pub fn humanize_error(err: &BlattwerkError) -> HumanError {
    match err {
        BlattwerkError::ImageDecode(detail) => HumanError {
            message: "We couldn't open that picture.".into(),
            suggestion: format!(
                "Make sure it's a JPEG, PNG, or TIFF file and try again. ({detail})"
            ),
            severity: Severity::ActionRequired,
        },

        BlattwerkError::ImageProcess(detail) => HumanError {
            message: "Something went wrong while preparing the picture.".into(),
            suggestion: format!("Try loading the photo again. ({detail})"),
            severity: Severity::Transient,
        },

        BlattwerkError::NoCapture => HumanError {
            message: "No photo loaded yet.".into(),
            suggestion: "Open a photo of your document first, then mark its corners.".into(),
            severity: Severity::ActionRequired,
        },

        BlattwerkError::Rectify(detail) => HumanError {
            message: "We couldn't straighten the document.".into(),
            suggestion: format!(
                "Drag the four corners so they sit on the document's edges and don't \
                 overlap, then try again. ({detail})"
            ),
            severity: Severity::ActionRequired,
        },

        BlattwerkError::PdfExport(detail) => HumanError {
            message: "The PDF couldn't be created.".into(),
            suggestion: format!("Try exporting as PNG instead. ({detail})"),
            severity: Severity::Transient,
        },

        BlattwerkError::Io(detail) => HumanError {
            message: "A file couldn't be read or written.".into(),
            suggestion: format!(
                "Check that you have permission and enough disk space. ({detail})"
            ),
            severity: Severity::Permanent,
        },

        BlattwerkError::Serialization(detail) => HumanError {
            message: "Your settings couldn't be saved or loaded.".into(),
            suggestion: format!("Default settings will be used instead. ({detail})"),
            severity: Severity::Transient,
        },
    }
}
