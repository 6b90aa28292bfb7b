//! Synthetic handwriting-like pages for integration tests.
//!
//! Real scans are not checked into the repository; these builders produce
//! deterministic pages with enough stroke structure for the pipeline to
//! measure, plus deliberately mismatched pairs for the negative cases.

use scriptmatch::image::RgbImageU8;

const PAPER: [u8; 3] = [248, 246, 240];
const INK: [u8; 3] = [28, 26, 34];

/// A blank page with no ink at all.
pub fn blank_page(w: usize, h: usize) -> RgbImageU8 {
    RgbImageU8::filled(w, h, PAPER)
}

fn draw_stroke(img: &mut RgbImageU8, x0: f32, y0: f32, angle_deg: f32, len: f32, thickness: usize) {
    let (s, c) = (angle_deg.to_radians().sin(), angle_deg.to_radians().cos());
    let steps = len as usize * 2;
    for t in 0..steps {
        let d = t as f32 / 2.0;
        let x = x0 + d * c;
        let y = y0 - d * s;
        for oy in 0..thickness {
            for ox in 0..thickness {
                let px = (x as i32 + ox as i32) as usize;
                let py = (y as i32 + oy as i32) as usize;
                if px < img.w && py < img.h {
                    img.set(px, py, INK);
                }
            }
        }
    }
}

fn draw_arc(img: &mut RgbImageU8, cx: f32, cy: f32, radius: f32, thickness: usize) {
    let steps = (radius * 8.0) as usize;
    for t in 0..steps {
        let theta = std::f32::consts::PI * t as f32 / steps as f32;
        let x = cx + radius * theta.cos();
        let y = cy + radius * theta.sin();
        for oy in 0..thickness {
            for ox in 0..thickness {
                let px = (x as i32 + ox as i32) as usize;
                let py = (y as i32 + oy as i32) as usize;
                if px < img.w && py < img.h {
                    img.set(px, py, INK);
                }
            }
        }
    }
}

/// A page with three text-like lines of mixed vertical strokes and arcs,
/// leaning by `slant_deg`.
pub fn handwriting_page(slant_deg: f32) -> RgbImageU8 {
    let mut img = blank_page(400, 300);
    for line in 0..3 {
        let base_y = 70.0 + line as f32 * 90.0;
        let mut x = 30.0;
        let mut glyph = 0usize;
        while x < 360.0 {
            if glyph % 3 == 2 {
                draw_arc(&mut img, x + 8.0, base_y - 12.0, 9.0, 3);
            } else {
                draw_stroke(&mut img, x, base_y, 90.0 - slant_deg, 28.0, 3);
            }
            x += 22.0 + (glyph % 4) as f32 * 4.0;
            glyph += 1;
        }
    }
    img
}

/// A slightly perturbed copy of `src`: every 13th ink pixel is erased and a
/// faint global brightness shift is applied, simulating a second scan of
/// the same writing.
pub fn perturbed_copy(src: &RgbImageU8) -> RgbImageU8 {
    let mut out = src.clone();
    let mut counter = 0usize;
    for y in 0..out.h {
        for x in 0..out.w {
            let px = out.get(x, y);
            if px[0] < 128 {
                counter += 1;
                if counter % 13 == 0 {
                    out.set(x, y, PAPER);
                    continue;
                }
            }
            let lifted = [
                px[0].saturating_add(4),
                px[1].saturating_add(4),
                px[2].saturating_add(4),
            ];
            out.set(x, y, lifted);
        }
    }
    out
}

/// Sparse thick dashes leaning ~35°: structurally unlike
/// [`crosshatch_page`] in slant, stroke width, layout and topology.
pub fn dash_page() -> RgbImageU8 {
    let mut img = blank_page(400, 300);
    for row in 0..3 {
        for col in 0..4 {
            let x = 40.0 + col as f32 * 90.0;
            let y = 80.0 + row as f32 * 90.0;
            draw_stroke(&mut img, x, y, 35.0, 40.0, 7);
        }
    }
    img
}

/// A dense fine crosshatch covering the whole page: thin strokes, heavy
/// ink coverage and a branch point at every crossing.
pub fn crosshatch_page() -> RgbImageU8 {
    let mut img = blank_page(400, 300);
    let mut x = 10;
    while x < 390 {
        for y in 10..290 {
            img.set(x, y, INK);
        }
        x += 12;
    }
    let mut y = 10;
    while y < 290 {
        for x in 10..390 {
            img.set(x, y, INK);
        }
        y += 12;
    }
    img
}
