//! Area-filter resampling.
//!
//! Each destination pixel averages the exact source rectangle it covers,
//! weighting partially-overlapped cells by their overlap. This is the
//! resampling used for size normalization, common-shape reduction and
//! thumbnails: it removes scan resolution as a confound without the
//! aliasing a point-sampled downscale would introduce.

use crate::image::{GrayImageU8, RgbImageU8};

/// Per-axis list of (source index, weight) pairs covering one destination
/// cell; weights sum to the cell's source extent.
fn axis_overlaps(src_len: usize, dst_len: usize, d: usize) -> Vec<(usize, f32)> {
    let scale = src_len as f32 / dst_len as f32;
    let f0 = d as f32 * scale;
    let f1 = ((d + 1) as f32 * scale).min(src_len as f32);
    let i0 = f0.floor() as usize;
    let i1 = (f1.ceil() as usize).min(src_len);
    let mut cells = Vec::with_capacity(i1 - i0);
    for i in i0..i1 {
        let lo = f0.max(i as f32);
        let hi = f1.min((i + 1) as f32);
        let w = hi - lo;
        if w > 0.0 {
            cells.push((i, w));
        }
    }
    cells
}

/// Resample a grayscale buffer to `dw × dh` with an area filter.
pub fn resize_gray_area(src: &GrayImageU8, dw: usize, dh: usize) -> GrayImageU8 {
    assert!(dw > 0 && dh > 0, "target dimensions must be positive");
    let mut out = GrayImageU8::new(dw, dh);
    if src.w == 0 || src.h == 0 {
        return out;
    }
    let cols: Vec<Vec<(usize, f32)>> = (0..dw).map(|d| axis_overlaps(src.w, dw, d)).collect();
    for dy in 0..dh {
        let rows = axis_overlaps(src.h, dh, dy);
        for (dx, col) in cols.iter().enumerate() {
            let mut acc = 0.0f32;
            let mut total = 0.0f32;
            for &(sy, wy) in &rows {
                for &(sx, wx) in col {
                    acc += wx * wy * src.get(sx, sy) as f32;
                    total += wx * wy;
                }
            }
            if total > 0.0 {
                out.set(dx, dy, (acc / total).round().clamp(0.0, 255.0) as u8);
            }
        }
    }
    out
}

/// Resample an RGB buffer to `dw × dh` with an area filter.
pub fn resize_rgb_area(src: &RgbImageU8, dw: usize, dh: usize) -> RgbImageU8 {
    assert!(dw > 0 && dh > 0, "target dimensions must be positive");
    let mut out = RgbImageU8::filled(dw, dh, [0, 0, 0]);
    if src.w == 0 || src.h == 0 {
        return out;
    }
    let cols: Vec<Vec<(usize, f32)>> = (0..dw).map(|d| axis_overlaps(src.w, dw, d)).collect();
    for dy in 0..dh {
        let rows = axis_overlaps(src.h, dh, dy);
        for (dx, col) in cols.iter().enumerate() {
            let mut acc = [0.0f32; 3];
            let mut total = 0.0f32;
            for &(sy, wy) in &rows {
                for &(sx, wx) in col {
                    let px = src.get(sx, sy);
                    let w = wx * wy;
                    for ch in 0..3 {
                        acc[ch] += w * px[ch] as f32;
                    }
                    total += w;
                }
            }
            if total > 0.0 {
                out.set(
                    dx,
                    dy,
                    [
                        (acc[0] / total).round().clamp(0.0, 255.0) as u8,
                        (acc[1] / total).round().clamp(0.0, 255.0) as u8,
                        (acc[2] / total).round().clamp(0.0, 255.0) as u8,
                    ],
                );
            }
        }
    }
    out
}

/// Rescale to a fixed height preserving aspect ratio.
pub fn normalize_height(src: &GrayImageU8, target_height: usize) -> GrayImageU8 {
    assert!(target_height > 0, "target height must be positive");
    if src.h == 0 || src.w == 0 {
        return GrayImageU8::new(1, target_height);
    }
    let scale = target_height as f32 / src.h as f32;
    let new_w = ((src.w as f32 * scale).round() as usize).max(1);
    resize_gray_area(src, new_w, target_height)
}
