//! Page-level habits: slant, letter proportions, line spacing.
//!
//! All three measurements operate on the full-resolution deskewed binary
//! mask; the reported values are angles and ratios, so they compare across
//! samples without size normalization.

use crate::geometry::{connected_components, convex_hull, min_area_rect_angle, Component};
use crate::image::GrayImageU8;
use log::debug;
use serde::Serialize;

/// Tuning for the macro extractor. The absolute filters are defined in
/// scan-resolution pixels.
#[derive(Clone, Debug)]
pub struct MacroParams {
    /// Components below this pixel count are ignored by the slant estimate.
    pub min_slant_area: usize,
    /// Minimum bounding-box width of a letter candidate.
    pub min_letter_width: i32,
    /// Minimum bounding-box height of a letter candidate.
    pub min_letter_height: i32,
    /// Letter candidates taller than this fraction of the image are
    /// discarded as whole-line blobs.
    pub max_letter_height_frac: f32,
    /// A row counts as a text row when its ink count exceeds this fraction
    /// of the densest row.
    pub row_ink_frac: f32,
}

impl Default for MacroParams {
    fn default() -> Self {
        Self {
            min_slant_area: 50,
            min_letter_width: 5,
            min_letter_height: 10,
            max_letter_height_frac: 0.8,
            row_ink_frac: 0.1,
        }
    }
}

/// Neutral letter width/height ratio reported when no candidate survives
/// filtering.
pub const DEFAULT_LETTER_RATIO: f32 = 0.5;

/// Neutral normalized line spacing reported when fewer than two text bands
/// exist.
pub const DEFAULT_LINE_SPACING: f32 = 0.1;

/// Page-level measurements of one sample.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct MacroFeatures {
    /// Dominant stroke slant in degrees, in (-45, 45]. Positive leans right.
    pub slant_deg: f32,
    /// Mean width/height ratio of letter-sized components.
    pub letter_ratio: f32,
    /// Mean gap between text bands as a fraction of image height.
    pub line_spacing: f32,
}

pub fn extract_macro_features(mask: &GrayImageU8, params: &MacroParams) -> MacroFeatures {
    let components = connected_components(mask);
    let features = MacroFeatures {
        slant_deg: estimate_slant(&components, params),
        letter_ratio: letter_ratio(&components, mask.h, params),
        line_spacing: line_spacing(mask, params),
    };
    debug!(
        "macro features: slant={:.1}° ratio={:.3} spacing={:.3}",
        features.slant_deg, features.letter_ratio, features.line_spacing
    );
    features
}

/// Average min-area-rectangle orientation over components large enough to
/// carry a stable orientation. Zero when none qualify.
fn estimate_slant(components: &[Component], params: &MacroParams) -> f32 {
    let mut sum = 0.0f32;
    let mut n = 0usize;
    for comp in components {
        if comp.area() <= params.min_slant_area {
            continue;
        }
        let hull = convex_hull(&comp.points);
        if hull.len() < 3 {
            continue;
        }
        sum += min_area_rect_angle(&comp.points);
        n += 1;
    }
    if n == 0 {
        0.0
    } else {
        sum / n as f32
    }
}

/// Mean width/height ratio over letter-sized components.
fn letter_ratio(components: &[Component], image_h: usize, params: &MacroParams) -> f32 {
    let max_h = (image_h as f32 * params.max_letter_height_frac) as i32;
    let mut sum = 0.0f32;
    let mut n = 0usize;
    for comp in components {
        let b = &comp.bbox;
        if b.w > params.min_letter_width && b.h > params.min_letter_height && b.h < max_h {
            sum += b.w as f32 / b.h as f32;
            n += 1;
        }
    }
    if n == 0 {
        DEFAULT_LETTER_RATIO
    } else {
        sum / n as f32
    }
}

/// Mean gap between consecutive text bands, normalized by image height.
///
/// A text band is a maximal run of rows whose ink count exceeds
/// `row_ink_frac` of the densest row's count.
fn line_spacing(mask: &GrayImageU8, params: &MacroParams) -> f32 {
    if mask.h == 0 {
        return DEFAULT_LINE_SPACING;
    }
    let projection: Vec<usize> = (0..mask.h)
        .map(|y| (0..mask.w).filter(|&x| mask.is_ink(x, y)).count())
        .collect();
    let max = match projection.iter().max() {
        Some(&m) if m > 0 => m,
        _ => return DEFAULT_LINE_SPACING,
    };
    let threshold = (max as f32 * params.row_ink_frac).max(1.0) as usize;

    // Centers of the text bands, top to bottom.
    let mut centers = Vec::new();
    let mut band_start: Option<usize> = None;
    for y in 0..=mask.h {
        let is_text = y < mask.h && projection[y] >= threshold;
        match (band_start, is_text) {
            (None, true) => band_start = Some(y),
            (Some(start), false) => {
                centers.push((start + y - 1) as f32 / 2.0);
                band_start = None;
            }
            _ => {}
        }
    }
    if centers.len() < 2 {
        return DEFAULT_LINE_SPACING;
    }
    let gaps: f32 = centers.windows(2).map(|p| p[1] - p[0]).sum();
    gaps / (centers.len() - 1) as f32 / mask.h as f32
}
