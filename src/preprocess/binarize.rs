//! Adaptive local-mean binarization.
//!
//! Each pixel is compared against the mean of its surrounding window minus a
//! constant offset; pixels darker than that threshold become ink (255). The
//! inversion makes ink the foreground, and the local window tolerates uneven
//! scan illumination that would defeat a single global threshold.

use super::filter::{integral_image, window_mean};
use crate::image::{GrayImageU8, ImageF32};

/// Inverted adaptive mean threshold: ink where `src <= mean(window) - offset`.
/// `window` is the full window side length (odd); borders use the clamped
/// partial window.
pub fn adaptive_threshold_inv(src: &ImageF32, window: usize, offset: f32) -> GrayImageU8 {
    assert!(window % 2 == 1, "threshold window must be odd");
    let (w, h) = (src.w, src.h);
    let mut out = GrayImageU8::new(w, h);
    if w == 0 || h == 0 {
        return out;
    }
    let sums = integral_image(src);
    let radius = window / 2;
    for y in 0..h {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius).min(h - 1);
        for x in 0..w {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius).min(w - 1);
            let mean = window_mean(&sums, w, x0, y0, x1, y1) as f32;
            if src.get(x, y) <= mean - offset {
                out.set(x, y, 255);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_image_produces_empty_mask() {
        let mut img = ImageF32::new(32, 32);
        for v in &mut img.data {
            *v = 255.0;
        }
        let mask = adaptive_threshold_inv(&img, 21, 10.0);
        assert_eq!(mask.ink_count(), 0);
    }

    #[test]
    fn dark_stroke_becomes_ink() {
        let mut img = ImageF32::new(40, 40);
        for v in &mut img.data {
            *v = 220.0;
        }
        for x in 10..30 {
            img.set(x, 20, 20.0);
        }
        let mask = adaptive_threshold_inv(&img, 21, 10.0);
        for x in 10..30 {
            assert!(mask.is_ink(x, 20), "stroke pixel {x} not ink");
        }
        assert!(!mask.is_ink(5, 5));
    }

    #[test]
    fn tolerates_illumination_gradient() {
        // Background ramps from 120 to 240 across the image; a global
        // threshold would misclassify one side.
        let mut img = ImageF32::new(60, 20);
        for y in 0..20 {
            for x in 0..60 {
                img.set(x, y, 120.0 + 2.0 * x as f32);
            }
        }
        for x in 5..55 {
            img.set(x, 10, 30.0);
        }
        let mask = adaptive_threshold_inv(&img, 21, 10.0);
        for x in 5..55 {
            assert!(mask.is_ink(x, 10));
        }
        assert!(!mask.is_ink(2, 2));
        assert!(!mask.is_ink(58, 18));
    }
}
