//! Topology-preserving thinning (Zhang-Suen).
//!
//! Reduces an ink mask to a 1-pixel-wide centerline while keeping
//! connectivity, so every stroke-level measurement sees the same amount of
//! "stroke" regardless of pen width. The output is always a subset of the
//! input ink pixels.

use crate::image::GrayImageU8;

/// Thin a 0/255 mask to its 1-pixel-wide skeleton.
pub fn skeletonize(mask: &GrayImageU8) -> GrayImageU8 {
    let (w, h) = (mask.w, mask.h);
    let mut grid: Vec<bool> = mask.data.iter().map(|&v| v > 0).collect();
    if w == 0 || h == 0 {
        return GrayImageU8::new(w, h);
    }

    let mut to_clear: Vec<usize> = Vec::new();
    loop {
        let mut changed = false;
        for pass in 0..2 {
            to_clear.clear();
            for y in 0..h {
                for x in 0..w {
                    let idx = y * w + x;
                    if grid[idx] && removable(&grid, w, h, x, y, pass) {
                        to_clear.push(idx);
                    }
                }
            }
            if !to_clear.is_empty() {
                changed = true;
                for &idx in &to_clear {
                    grid[idx] = false;
                }
            }
        }
        if !changed {
            break;
        }
    }

    let data = grid.iter().map(|&b| if b { 255 } else { 0 }).collect();
    GrayImageU8::from_raw(w, h, data)
}

/// Zhang-Suen deletion test for one sub-iteration.
///
/// Neighbor labels follow the usual convention: p2 = north, then clockwise
/// p3..p9. Pixels outside the image count as background.
fn removable(grid: &[bool], w: usize, h: usize, x: usize, y: usize, pass: usize) -> bool {
    let at = |dx: i32, dy: i32| -> bool {
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        nx >= 0 && ny >= 0 && (nx as usize) < w && (ny as usize) < h && grid[ny as usize * w + nx as usize]
    };
    let p2 = at(0, -1);
    let p3 = at(1, -1);
    let p4 = at(1, 0);
    let p5 = at(1, 1);
    let p6 = at(0, 1);
    let p7 = at(-1, 1);
    let p8 = at(-1, 0);
    let p9 = at(-1, -1);

    let ring = [p2, p3, p4, p5, p6, p7, p8, p9];
    let b: usize = ring.iter().filter(|&&v| v).count();
    if !(2..=6).contains(&b) {
        return false;
    }
    // Number of 0→1 transitions around the ring.
    let a = ring
        .iter()
        .zip(ring.iter().cycle().skip(1))
        .filter(|&(&curr, &next)| !curr && next)
        .count();
    if a != 1 {
        return false;
    }
    if pass == 0 {
        !(p2 && p4 && p6) && !(p4 && p6 && p8)
    } else {
        !(p2 && p4 && p8) && !(p2 && p6 && p8)
    }
}
