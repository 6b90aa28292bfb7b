//! Difference heatmap rendering.
//!
//! Visualizes where two normalized masks disagree: the absolute difference
//! is smoothed, stretched to full range and mapped through a jet palette,
//! then blended over the questioned sample's mask rendering (ink bright on
//! dark) so the examiner can relate hot regions back to the handwriting.

use crate::image::{GrayImageU8, ImageF32, RgbImageU8};
use crate::preprocess::filter::gaussian_blur;
use crate::preprocess::resize::resize_gray_area;

const BLUR_SIGMA: f32 = 2.0;
const OVERLAY_ALPHA: f32 = 0.5;

/// Smoothed, min-max normalized absolute difference of the two masks on
/// their common shape. Values are in [0, 1]; identical inputs produce all
/// zeros.
pub fn normalized_difference(a: &GrayImageU8, b: &GrayImageU8) -> ImageF32 {
    let w = a.w.min(b.w).max(1);
    let h = a.h.min(b.h).max(1);
    let a = fit(a, w, h);
    let b = fit(b, w, h);

    let mut diff = ImageF32::new(w, h);
    for i in 0..w * h {
        diff.data[i] = (a.data[i] as f32 - b.data[i] as f32).abs();
    }
    let mut diff = gaussian_blur(&diff, BLUR_SIGMA);

    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in &diff.data {
        min = min.min(v);
        max = max.max(v);
    }
    if max - min < 1e-8 {
        for v in &mut diff.data {
            *v = 0.0;
        }
        return diff;
    }
    let range = max - min;
    for v in &mut diff.data {
        *v = (*v - min) / range;
    }
    diff
}

/// Render the difference heatmap: jet-colored differences blended 50/50
/// over the questioned mask rendering (ink = 255).
pub fn difference_heatmap(questioned: &GrayImageU8, known: &GrayImageU8) -> RgbImageU8 {
    let diff = normalized_difference(questioned, known);
    let (w, h) = (diff.w, diff.h);
    let base = fit(questioned, w, h);

    let mut out = RgbImageU8::filled(w, h, [0, 0, 0]);
    for y in 0..h {
        for x in 0..w {
            let gray = base.get(x, y);
            let jet = jet_color(diff.get(x, y));
            let mut px = [0u8; 3];
            for ch in 0..3 {
                let v = OVERLAY_ALPHA * gray as f32 + (1.0 - OVERLAY_ALPHA) * jet[ch] as f32;
                px[ch] = v.round().clamp(0.0, 255.0) as u8;
            }
            out.set(x, y, px);
        }
    }
    out
}

/// Piecewise-linear jet approximation: blue through green to red.
fn jet_color(v: f32) -> [u8; 3] {
    let v = v.clamp(0.0, 1.0);
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [
        channel(1.5 - (4.0 * v - 3.0).abs()),
        channel(1.5 - (4.0 * v - 2.0).abs()),
        channel(1.5 - (4.0 * v - 1.0).abs()),
    ]
}

fn fit(src: &GrayImageU8, w: usize, h: usize) -> GrayImageU8 {
    if src.w == w && src.h == h {
        src.clone()
    } else {
        resize_gray_area(src, w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_ink(w: usize, h: usize) -> GrayImageU8 {
        let mut img = GrayImageU8::new(w, h);
        for y in 0..h {
            for x in 0..w / 2 {
                img.set(x, y, 255);
            }
        }
        img
    }

    #[test]
    fn identical_inputs_yield_zero_difference() {
        let img = half_ink(40, 30);
        let diff = normalized_difference(&img, &img);
        assert!(diff.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn difference_is_normalized_to_unit_range() {
        let a = half_ink(40, 30);
        let b = GrayImageU8::new(40, 30);
        let diff = normalized_difference(&a, &b);
        let max = diff.data.iter().cloned().fold(0.0f32, f32::max);
        let min = diff.data.iter().cloned().fold(1.0f32, f32::min);
        assert!((max - 1.0).abs() < 1e-5);
        assert!(min.abs() < 1e-5);
    }

    #[test]
    fn heatmap_has_common_shape() {
        let a = half_ink(50, 30);
        let b = half_ink(40, 35);
        let map = difference_heatmap(&a, &b);
        assert_eq!((map.w, map.h), (40, 30));
    }

    #[test]
    fn blend_base_is_the_mask_rendering() {
        // Identical inputs: zero difference everywhere, so every pixel is
        // half mask value, half the cold end of the palette.
        let img = half_ink(40, 30);
        let map = difference_heatmap(&img, &img);
        let cold = jet_color(0.0);
        assert_eq!(map.get(5, 5), [128, 128, 192]); // ink pixel, value 255
        assert_eq!(map.get(30, 5), [0, 0, cold[2] / 2]); // background
    }

    #[test]
    fn jet_runs_blue_to_red() {
        let cold = jet_color(0.0);
        assert!(cold[2] > cold[0] && cold[2] > cold[1]);
        let hot = jet_color(1.0);
        assert!(hot[0] > hot[1] && hot[0] > hot[2]);
        let mid = jet_color(0.5);
        assert_eq!(mid[1], 255);
    }
}
