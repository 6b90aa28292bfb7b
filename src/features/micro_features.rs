//! Stroke-level habits: pen width distribution, contour curvature, skeleton
//! topology.
//!
//! Stroke width is sampled as the exact Euclidean distance from each
//! skeleton pixel to the nearest background pixel of the binary mask (half
//! the pen width, independent of stroke direction). Curvature is
//! the turning angle along the traced stroke centerlines, and topology
//! counts branch/end points of the thinned skeleton.

use crate::geometry::{connected_components, trace_boundaries};
use crate::image::GrayImageU8;
use log::debug;
use serde::Serialize;

/// Number of histogram bins for the stroke width distribution; bin `i`
/// covers center-to-edge distances in `[i, i + 1)` pixels.
pub const STROKE_WIDTH_BINS: usize = 20;

/// Tuning for the micro extractor.
#[derive(Clone, Debug)]
pub struct MicroParams {
    /// Minimum skeleton samples before the width histogram is trusted.
    pub min_width_samples: usize,
    /// Minimum boundary length, in points, for curvature measurement.
    pub min_contour_points: usize,
}

impl Default for MicroParams {
    fn default() -> Self {
        Self {
            min_width_samples: 10,
            min_contour_points: 10,
        }
    }
}

/// Stroke-level measurements of one sample.
#[derive(Clone, Debug, Serialize)]
pub struct MicroFeatures {
    /// Normalized stroke width histogram; all-zero when the sample has too
    /// little ink to measure.
    pub stroke_width_hist: [f32; STROKE_WIDTH_BINS],
    /// Mean absolute turning angle along ink boundaries, radians.
    pub curvature_mean: f32,
    /// Standard deviation of the turning angle, radians.
    pub curvature_std: f32,
    /// Largest absolute turning angle observed, radians.
    pub curvature_max: f32,
    /// Branch points (more than two skeleton neighbors) per skeleton pixel.
    pub branch_ratio: f32,
    /// End points (exactly one skeleton neighbor) per skeleton pixel.
    pub end_ratio: f32,
    /// Connected components of the skeleton.
    pub num_components: usize,
}

pub fn extract_micro_features(
    binary: &GrayImageU8,
    skeleton: &GrayImageU8,
    params: &MicroParams,
) -> MicroFeatures {
    let stroke_width_hist = stroke_width_histogram(binary, skeleton, params.min_width_samples);
    let (curvature_mean, curvature_std, curvature_max) =
        curvature_stats(skeleton, params.min_contour_points);
    let (branch_ratio, end_ratio) = topology_ratios(skeleton);
    let num_components = connected_components(skeleton).len();
    debug!(
        "micro features: curvature mean={curvature_mean:.3} branch={branch_ratio:.4} \
         end={end_ratio:.4} components={num_components}"
    );
    MicroFeatures {
        stroke_width_hist,
        curvature_mean,
        curvature_std,
        curvature_max,
        branch_ratio,
        end_ratio,
        num_components,
    }
}

/// Normalized histogram of stroke widths sampled along the skeleton.
fn stroke_width_histogram(
    binary: &GrayImageU8,
    skeleton: &GrayImageU8,
    min_samples: usize,
) -> [f32; STROKE_WIDTH_BINS] {
    let mut hist = [0.0f32; STROKE_WIDTH_BINS];
    let dist = distance_to_background(binary);
    let mut counts = [0usize; STROKE_WIDTH_BINS];
    let mut total = 0usize;
    for y in 0..skeleton.h {
        for x in 0..skeleton.w {
            if !skeleton.is_ink(x, y) {
                continue;
            }
            let bin = dist[y * binary.w + x] as usize;
            if bin < STROKE_WIDTH_BINS {
                counts[bin] += 1;
                total += 1;
            }
        }
    }
    if total < min_samples {
        return hist;
    }
    for (h, &c) in hist.iter_mut().zip(counts.iter()) {
        *h = c as f32 / total as f32;
    }
    hist
}

/// Exact Euclidean distance from each pixel to the nearest background pixel
/// (Felzenszwalb-Huttenlocher two-pass transform). Background pixels get 0.
fn distance_to_background(mask: &GrayImageU8) -> Vec<f32> {
    let (w, h) = (mask.w, mask.h);
    let inf = (w + h) as f32 * (w + h) as f32 + 1.0;
    let mut sq: Vec<f32> = mask
        .data
        .iter()
        .map(|&v| if v > 0 { inf } else { 0.0 })
        .collect();
    if w == 0 || h == 0 {
        return sq;
    }

    // Columns, then rows.
    let mut line = vec![0.0f32; w.max(h)];
    for x in 0..w {
        for y in 0..h {
            line[y] = sq[y * w + x];
        }
        let out = edt_1d(&line[..h]);
        for y in 0..h {
            sq[y * w + x] = out[y];
        }
    }
    for y in 0..h {
        line[..w].copy_from_slice(&sq[y * w..y * w + w]);
        let out = edt_1d(&line[..w]);
        sq[y * w..y * w + w].copy_from_slice(&out);
    }

    sq.iter().map(|&d| d.sqrt()).collect()
}

/// One-dimensional squared-distance transform by lower envelope of
/// parabolas.
fn edt_1d(f: &[f32]) -> Vec<f32> {
    let n = f.len();
    let mut out = vec![0.0f32; n];
    if n == 0 {
        return out;
    }
    let mut v = vec![0usize; n];
    let mut z = vec![0.0f32; n + 1];
    let mut k = 0usize;
    z[0] = f32::NEG_INFINITY;
    z[1] = f32::INFINITY;
    for q in 1..n {
        loop {
            let p = v[k];
            let s = ((f[q] + (q * q) as f32) - (f[p] + (p * p) as f32))
                / (2 * q - 2 * p) as f32;
            if s <= z[k] {
                if k == 0 {
                    break;
                }
                k -= 1;
            } else {
                k += 1;
                v[k] = q;
                z[k] = s;
                z[k + 1] = f32::INFINITY;
                break;
            }
        }
    }
    k = 0;
    for q in 0..n {
        while z[k + 1] < q as f32 {
            k += 1;
        }
        let p = v[k];
        let d = q as f32 - p as f32;
        out[q] = d * d + f[p];
    }
    out
}

/// Mean, standard deviation and maximum of the absolute turning angle along
/// traced stroke paths. On a 1 px skeleton the Moore trace walks each
/// stroke out and back, so the angles measure the centerline's bends.
/// Contours shorter than `min_points` are skipped; with no usable contour
/// all three statistics are zero.
fn curvature_stats(mask: &GrayImageU8, min_points: usize) -> (f32, f32, f32) {
    let mut angles: Vec<f32> = Vec::new();
    for contour in trace_boundaries(mask) {
        let n = contour.len();
        // The 2-step turning angle needs at least five points.
        if n < min_points.max(5) {
            continue;
        }
        for i in 2..n - 2 {
            let a = &contour[i - 2];
            let b = &contour[i];
            let c = &contour[i + 2];
            let v1 = ((b.x - a.x) as f32, (b.y - a.y) as f32);
            let v2 = ((c.x - b.x) as f32, (c.y - b.y) as f32);
            let cross = v1.0 * v2.1 - v1.1 * v2.0;
            let dot = v1.0 * v2.0 + v1.1 * v2.1;
            angles.push(cross.atan2(dot).abs());
        }
    }
    if angles.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let n = angles.len() as f32;
    let mean = angles.iter().sum::<f32>() / n;
    let var = angles.iter().map(|a| (a - mean) * (a - mean)).sum::<f32>() / n;
    let max = angles.iter().cloned().fold(0.0f32, f32::max);
    (mean, var.sqrt(), max)
}

/// Branch and end point counts of the skeleton, each normalized by the
/// total skeleton pixel count.
fn topology_ratios(skeleton: &GrayImageU8) -> (f32, f32) {
    let total = skeleton.ink_count();
    if total == 0 {
        return (0.0, 0.0);
    }
    let mut branches = 0usize;
    let mut ends = 0usize;
    for y in 0..skeleton.h {
        for x in 0..skeleton.w {
            if !skeleton.is_ink(x, y) {
                continue;
            }
            let mut neighbors = 0usize;
            for dy in -1i32..=1 {
                for dx in -1i32..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = x as i32 + dx;
                    let ny = y as i32 + dy;
                    if nx >= 0
                        && ny >= 0
                        && (nx as usize) < skeleton.w
                        && (ny as usize) < skeleton.h
                        && skeleton.is_ink(nx as usize, ny as usize)
                    {
                        neighbors += 1;
                    }
                }
            }
            if neighbors > 2 {
                branches += 1;
            } else if neighbors == 1 {
                ends += 1;
            }
        }
    }
    (branches as f32 / total as f32, ends as f32 / total as f32)
}
