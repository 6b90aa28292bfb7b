//! Holistic image similarity between two normalized binary masks.
//!
//! Two complementary measures are computed on the pair reduced to their
//! common shape: SSIM captures local structural agreement, normalized
//! cross-correlation captures global ink placement. Both are remapped to
//! [0, 1].

use crate::image::GrayImageU8;
use crate::preprocess::resize::resize_gray_area;
use serde::Serialize;

const SSIM_WINDOW: usize = 7;
// Standard stabilizers for an 8-bit dynamic range: (0.01·255)², (0.03·255)².
const SSIM_C1: f64 = 6.5025;
const SSIM_C2: f64 = 58.5225;

/// Image-level similarity of one sample pair.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ImageSimilarity {
    /// Mean structural similarity; 1 for identical images, near zero (or
    /// slightly below) for anti-correlated ones.
    pub ssim: f32,
    /// Pearson correlation remapped from [-1, 1] to [0, 1].
    pub ncc: f32,
}

impl ImageSimilarity {
    /// Combined image score: the mean of both measures, clamped to [0, 1].
    pub fn score(&self) -> f32 {
        ((self.ssim + self.ncc) / 2.0).clamp(0.0, 1.0)
    }
}

/// Reduce both masks to their common shape and compare them.
///
/// The common shape is the element-wise minimum of the two sizes, so the
/// comparison never invents content by upscaling.
pub fn compare_images(a: &GrayImageU8, b: &GrayImageU8) -> ImageSimilarity {
    let w = a.w.min(b.w).max(1);
    let h = a.h.min(b.h).max(1);
    let a = fit(a, w, h);
    let b = fit(b, w, h);
    ImageSimilarity {
        ssim: ssim(&a, &b),
        ncc: cross_correlation(&a, &b),
    }
}

fn fit(src: &GrayImageU8, w: usize, h: usize) -> GrayImageU8 {
    if src.w == w && src.h == h {
        src.clone()
    } else {
        resize_gray_area(src, w, h)
    }
}

/// Mean SSIM over uniform 7×7 windows. Images smaller than one window fall
/// back to a single global window.
pub fn ssim(a: &GrayImageU8, b: &GrayImageU8) -> f32 {
    assert_eq!((a.w, a.h), (b.w, b.h), "ssim inputs must share a shape");
    let (w, h) = (a.w, a.h);
    if w == 0 || h == 0 {
        return 0.0;
    }
    if w < SSIM_WINDOW || h < SSIM_WINDOW {
        return window_ssim(a, b, 0, 0, w, h) as f32;
    }
    let mut sum = 0.0f64;
    let mut count = 0usize;
    for y in 0..=h - SSIM_WINDOW {
        for x in 0..=w - SSIM_WINDOW {
            sum += window_ssim(a, b, x, y, SSIM_WINDOW, SSIM_WINDOW);
            count += 1;
        }
    }
    (sum / count as f64) as f32
}

fn window_ssim(a: &GrayImageU8, b: &GrayImageU8, x0: usize, y0: usize, ww: usize, wh: usize) -> f64 {
    let n = (ww * wh) as f64;
    let mut sum_a = 0.0f64;
    let mut sum_b = 0.0f64;
    let mut sum_aa = 0.0f64;
    let mut sum_bb = 0.0f64;
    let mut sum_ab = 0.0f64;
    for y in y0..y0 + wh {
        for x in x0..x0 + ww {
            let va = a.get(x, y) as f64;
            let vb = b.get(x, y) as f64;
            sum_a += va;
            sum_b += vb;
            sum_aa += va * va;
            sum_bb += vb * vb;
            sum_ab += va * vb;
        }
    }
    let mu_a = sum_a / n;
    let mu_b = sum_b / n;
    let var_a = sum_aa / n - mu_a * mu_a;
    let var_b = sum_bb / n - mu_b * mu_b;
    let cov = sum_ab / n - mu_a * mu_b;
    ((2.0 * mu_a * mu_b + SSIM_C1) * (2.0 * cov + SSIM_C2))
        / ((mu_a * mu_a + mu_b * mu_b + SSIM_C1) * (var_a + var_b + SSIM_C2))
}

/// Pearson correlation of the two images remapped to [0, 1]. Constant
/// images carry no correlation signal and report the neutral 0.5.
pub fn cross_correlation(a: &GrayImageU8, b: &GrayImageU8) -> f32 {
    assert_eq!((a.w, a.h), (b.w, b.h), "correlation inputs must share a shape");
    let n = (a.w * a.h) as f64;
    if n == 0.0 {
        return 0.5;
    }
    let mean_a = a.data.iter().map(|&v| v as f64).sum::<f64>() / n;
    let mean_b = b.data.iter().map(|&v| v as f64).sum::<f64>() / n;
    let mut cov = 0.0f64;
    let mut var_a = 0.0f64;
    let mut var_b = 0.0f64;
    for (&va, &vb) in a.data.iter().zip(b.data.iter()) {
        let da = va as f64 - mean_a;
        let db = vb as f64 - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    let denom = (var_a / n).sqrt() * (var_b / n).sqrt();
    if denom < 1e-8 {
        return 0.5;
    }
    let r = (cov / n / denom).clamp(-1.0, 1.0);
    ((r + 1.0) / 2.0) as f32
}
