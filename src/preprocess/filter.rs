//! Separable filtering primitives used across the pipeline.
//!
//! All filters run on [`ImageF32`] with clamped (replicate) borders and a
//! horizontal + vertical pass, the same structure as a pyramid-style
//! separable blur, generalized to an arbitrary Gaussian radius.

use crate::image::ImageF32;

/// Normalized 1D Gaussian kernel with radius `ceil(3σ)`.
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let sigma = sigma.max(0.1);
    let radius = (3.0 * sigma).ceil() as i32;
    let denom = 2.0 * sigma * sigma;
    let mut kernel = Vec::with_capacity((2 * radius + 1) as usize);
    let mut sum = 0.0f32;
    for i in -radius..=radius {
        let v = (-(i * i) as f32 / denom).exp();
        kernel.push(v);
        sum += v;
    }
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

/// Separable Gaussian blur with replicate borders.
pub fn gaussian_blur(src: &ImageF32, sigma: f32) -> ImageF32 {
    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as i32;
    let (w, h) = (src.w, src.h);
    let mut tmp = ImageF32::new(w, h);
    // horizontal
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for (k, &kv) in kernel.iter().enumerate() {
                let sx = (x as i32 + k as i32 - radius).clamp(0, w as i32 - 1) as usize;
                acc += kv * src.get(sx, y);
            }
            tmp.set(x, y, acc);
        }
    }
    // vertical
    let mut out = ImageF32::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for (k, &kv) in kernel.iter().enumerate() {
                let sy = (y as i32 + k as i32 - radius).clamp(0, h as i32 - 1) as usize;
                acc += kv * tmp.get(x, sy);
            }
            out.set(x, y, acc);
        }
    }
    out
}

/// Unsharp masking: `(1 + amount) * src - amount * blur(src, sigma)`.
/// Output stays on the source scale; callers clamp when quantizing.
pub fn unsharp_mask(src: &ImageF32, sigma: f32, amount: f32) -> ImageF32 {
    let blurred = gaussian_blur(src, sigma);
    let mut out = ImageF32::new(src.w, src.h);
    for i in 0..src.data.len() {
        out.data[i] = (1.0 + amount) * src.data[i] - amount * blurred.data[i];
    }
    out
}

/// Summed-area table with a (w+1)×(h+1) layout; `sums[(y+1)*(w+1)+(x+1)]`
/// holds the sum of the rectangle [0..=x, 0..=y].
pub fn integral_image(src: &ImageF32) -> Vec<f64> {
    let (w, h) = (src.w, src.h);
    let stride = w + 1;
    let mut sums = vec![0.0f64; stride * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0.0f64;
        for x in 0..w {
            row_sum += src.get(x, y) as f64;
            sums[(y + 1) * stride + (x + 1)] = sums[y * stride + (x + 1)] + row_sum;
        }
    }
    sums
}

/// Mean over the clamped window [x0..=x1, y0..=y1] of an integral image.
#[inline]
pub fn window_mean(sums: &[f64], w: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> f64 {
    let stride = w + 1;
    let total = sums[(y1 + 1) * stride + (x1 + 1)] - sums[y0 * stride + (x1 + 1)]
        - sums[(y1 + 1) * stride + x0]
        + sums[y0 * stride + x0];
    total / ((x1 - x0 + 1) * (y1 - y0 + 1)) as f64
}
