//! Skew estimation and correction for the binary ink mask.
//!
//! The skew estimate is the minimum-area-rectangle orientation of all ink
//! pixels, mapped into (-45°, 45°]. Only angles strictly inside the
//! configured band are corrected: smaller ones are treated as already
//! aligned, larger ones as artifacts of sparse or unusual ink rather than
//! genuine page skew. Rotation resamples with a Catmull-Rom bicubic kernel
//! and fills the border with background.

use crate::geometry::{min_area_rect_angle, PixelPoint};
use crate::image::GrayImageU8;
use log::debug;
use nalgebra::{Matrix3, Vector3};

/// Estimate the skew angle in degrees, or `None` when fewer than `min_ink`
/// ink pixels exist (too sparse for a meaningful estimate).
pub fn estimate_skew_angle(binary: &GrayImageU8, min_ink: usize) -> Option<f32> {
    let mut points = Vec::new();
    for y in 0..binary.h {
        for x in 0..binary.w {
            if binary.is_ink(x, y) {
                points.push(PixelPoint {
                    x: x as i32,
                    y: y as i32,
                });
            }
        }
    }
    if points.len() <= min_ink {
        return None;
    }
    Some(min_area_rect_angle(&points))
}

/// Correct skew when the estimated angle falls strictly inside
/// `(min_angle_deg, max_angle_deg)`; otherwise return the mask unchanged.
pub fn deskew(
    binary: GrayImageU8,
    min_ink: usize,
    min_angle_deg: f32,
    max_angle_deg: f32,
) -> GrayImageU8 {
    let Some(angle) = estimate_skew_angle(&binary, min_ink) else {
        return binary;
    };
    if angle.abs() <= min_angle_deg || angle.abs() >= max_angle_deg {
        debug!("deskew skipped, angle={angle:.2}°");
        return binary;
    }
    debug!("deskew rotating by {angle:.2}°");
    rotate_about_center(&binary, angle)
}

/// Rotate a mask about its center by `angle_deg` (bicubic sampling,
/// background border fill). Output has the same dimensions as the input.
pub fn rotate_about_center(src: &GrayImageU8, angle_deg: f32) -> GrayImageU8 {
    let (w, h) = (src.w, src.h);
    let mut out = GrayImageU8::new(w, h);
    if w == 0 || h == 0 {
        return out;
    }
    let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
    let theta = angle_deg.to_radians();
    let (s, c) = theta.sin_cos();
    // Inverse mapping: destination → source, rotation about the center.
    let rotate = Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0);
    let to_center = Matrix3::new(1.0, 0.0, -cx, 0.0, 1.0, -cy, 0.0, 0.0, 1.0);
    let from_center = Matrix3::new(1.0, 0.0, cx, 0.0, 1.0, cy, 0.0, 0.0, 1.0);
    let inverse = from_center * rotate * to_center;

    for y in 0..h {
        for x in 0..w {
            let dst = Vector3::new(x as f32, y as f32, 1.0);
            let srcp = inverse * dst;
            let v = sample_bicubic(src, srcp.x, srcp.y);
            out.set(x, y, v.clamp(0.0, 255.0).round() as u8);
        }
    }
    out
}

/// Catmull-Rom cubic convolution weight (a = -0.5).
fn cubic_weight(t: f32) -> f32 {
    let a = -0.5f32;
    let x = t.abs();
    if x <= 1.0 {
        (a + 2.0) * x * x * x - (a + 3.0) * x * x + 1.0
    } else if x < 2.0 {
        a * x * x * x - 5.0 * a * x * x + 8.0 * a * x - 4.0 * a
    } else {
        0.0
    }
}

fn sample_bicubic(src: &GrayImageU8, sx: f32, sy: f32) -> f32 {
    let x0 = sx.floor() as i32;
    let y0 = sy.floor() as i32;
    let fx = sx - x0 as f32;
    let fy = sy - y0 as f32;
    let mut acc = 0.0f32;
    for j in -1..=2 {
        let wy = cubic_weight(fy - j as f32);
        if wy == 0.0 {
            continue;
        }
        for i in -1..=2 {
            let wx = cubic_weight(fx - i as f32);
            if wx == 0.0 {
                continue;
            }
            let (px, py) = (x0 + i, y0 + j);
            // Constant (background) border fill.
            let v = if px < 0 || py < 0 || px >= src.w as i32 || py >= src.h as i32 {
                0.0
            } else {
                src.get(px as usize, py as usize) as f32
            };
            acc += wx * wy * v;
        }
    }
    acc
}
