// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF exporter — embeds a rectified scan as a full-bleed single page using
// `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use image::DynamicImage;
use blattwerk_core::PaperSize;
use blattwerk_core::error::BlattwerkError;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

/// Exports rectified pages as PDF documents.
///
/// A rectified scan already has the exact aspect ratio of the target paper,
/// so pages are laid out full-bleed: the raster covers the page edge to edge
/// with no margins.
pub struct PdfExporter {
    paper_size: PaperSize,
    /// Resolution the rectified raster was produced at.
    dpi: u32,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfExporter {
    pub fn new(paper_size: PaperSize, dpi: u32) -> Self {
        Self {
            paper_size,
            dpi,
            title: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    fn page_dimensions(&self) -> (Mm, Mm) {
        let (w_mm, h_mm) = self.paper_size.dimensions_mm();
        (Mm(w_mm as f32), Mm(h_mm as f32))
    }

    /// Build a single-page PDF containing the rectified image.
    #[instrument(skip(self, page_image), fields(width = page_image.width(), height = page_image.height()))]
    pub fn export_page(&self, page_image: &DynamicImage) -> Result<Vec<u8>, BlattwerkError> {
        let (page_w, page_h) = self.page_dimensions();
        let title = self.title.as_deref().unwrap_or("Blattwerk Scan");

        info!(paper = ?self.paper_size, title, "exporting rectified page as PDF");

        let rgb = page_image.to_rgb8();
        let (img_w, img_h) = (rgb.width() as usize, rgb.height() as usize);
        let raw = RawImage {
            pixels: RawImageData::U8(rgb.into_raw()),
            width: img_w,
            height: img_h,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };

        let mut doc = PdfDocument::new(title);
        let xobject_id = doc.add_image(&raw);

        // Stretch the raster across the whole page. At the export dpi the
        // raster's natural size already matches the paper, so the scale
        // factors land at ~1.0 and only mop up rounding.
        let dpi = self.dpi as f32;
        let img_w_pt = img_w as f32 / dpi * 72.0;
        let img_h_pt = img_h as f32 / dpi * 72.0;
        let scale_x = page_w.into_pt().0 / img_w_pt;
        let scale_y = page_h.into_pt().0 / img_h_pt;

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: Some(scale_x),
                scale_y: Some(scale_y),
                dpi: Some(dpi),
                rotate: None,
            },
        }];

        doc.with_pages(vec![PdfPage::new(page_w, page_h, ops)]);

        debug!(scale_x, scale_y, "page assembled");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

        Ok(output)
    }

    /// Build the PDF and write it directly to a file.
    pub fn write_to_file(
        &self,
        page_image: &DynamicImage,
        path: impl AsRef<Path>,
    ) -> Result<(), BlattwerkError> {
        let bytes = self.export_page(page_image)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("wrote PDF to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, GrayImage};

    fn page() -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(124, 175, Luma([230u8])))
    }

    #[test]
    fn export_produces_pdf_bytes() {
        let exporter = PdfExporter::new(PaperSize::A4, 15);
        let bytes = exporter.export_page(&page()).unwrap();
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn export_with_title_still_valid() {
        let mut exporter = PdfExporter::new(PaperSize::Letter, 15);
        exporter.set_title("Scan 2026-08-07");
        let bytes = exporter.export_page(&page()).unwrap();
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn write_to_file_creates_nonempty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");

        let exporter = PdfExporter::new(PaperSize::A4, 15);
        exporter.write_to_file(&page(), &path).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
    }
}
