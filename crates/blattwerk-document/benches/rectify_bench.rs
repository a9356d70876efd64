// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for perspective rectification. Warps a small synthetic
// capture onto a reduced-resolution page, which tracks the cost profile of
// the real A4 warp without multi-second iterations.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, GrayImage, Luma};

use blattwerk_core::PaperSize;
use blattwerk_document::Rectifier;

/// Warp a 320x240 capture with a slightly skewed corner set onto a 50x50 mm
/// page at 102 dpi (~200x200 px output).
fn bench_rectify(c: &mut Criterion) {
    let mut img = GrayImage::from_pixel(320, 240, Luma([40u8]));
    for y in 30..210 {
        for x in 40..280 {
            img.put_pixel(x, y, Luma([235u8]));
        }
    }
    let capture = DynamicImage::ImageLuma8(img);

    let rectifier = Rectifier::new(
        PaperSize::Custom {
            width_mm: 50,
            height_mm: 50,
        },
        102,
    );
    let corners = [45.0, 28.0, 284.0, 34.0, 276.0, 212.0, 38.0, 206.0];

    c.bench_function("rectify (320x240 -> 200x200)", |b| {
        b.iter(|| {
            let out = rectifier
                .rectify(black_box(&capture), black_box(&corners))
                .expect("warp succeeds");
            black_box(out);
        });
    });
}

/// Automatic corner detection on the same synthetic capture.
fn bench_detect_quad(c: &mut Criterion) {
    let mut img = GrayImage::from_pixel(320, 240, Luma([40u8]));
    for y in 30..210 {
        for x in 40..280 {
            img.put_pixel(x, y, Luma([235u8]));
        }
    }
    let capture = DynamicImage::ImageLuma8(img);

    c.bench_function("detect_quad (320x240)", |b| {
        b.iter(|| {
            black_box(Rectifier::detect_quad(black_box(&capture)));
        });
    });
}

criterion_group!(benches, bench_rectify, bench_detect_quad);
criterion_main!(benches);
