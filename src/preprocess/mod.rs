//! Preprocessing pipeline: raw scan → normalized derived representations.
//!
//! Stages, in order, each consuming the previous stage's output:
//! 1. luma grayscale conversion
//! 2. unsharp masking to crisp stroke edges before thresholding
//! 3. adaptive local-mean binarization (ink = 255)
//! 4. deskew inside the configured angle band
//! 5. aspect-preserving rescale to a fixed height (area filter)
//! 6. Zhang-Suen thinning to a 1 px skeleton
//!
//! The pipeline is total on decoded images: degenerate inputs (e.g. a blank
//! page) produce structurally valid empty masks rather than errors.

pub mod binarize;
pub mod deskew;
pub mod filter;
pub mod resize;
pub mod skeleton;

use crate::image::{GrayImageU8, ImageF32, RgbImageU8};
use log::debug;

/// Knobs for the preprocessing stages. Defaults carry the documented
/// pipeline constants.
#[derive(Clone, Debug)]
pub struct PreprocessParams {
    /// Gaussian sigma of the unsharp mask.
    pub sharpen_sigma: f32,
    /// Unsharp amount: output = (1 + amount)·src − amount·blur.
    pub sharpen_amount: f32,
    /// Side length of the adaptive threshold window (odd).
    pub threshold_window: usize,
    /// Constant subtracted from the local mean before comparison.
    pub threshold_offset: f32,
    /// Minimum ink pixels before a skew estimate is attempted.
    pub deskew_min_ink: usize,
    /// Angles at or below this magnitude are treated as already aligned.
    pub deskew_min_angle_deg: f32,
    /// Angles at or above this magnitude are treated as artifacts, not skew.
    pub deskew_max_angle_deg: f32,
    /// Height of the normalized representation in pixels.
    pub target_height: usize,
}

impl Default for PreprocessParams {
    fn default() -> Self {
        Self {
            sharpen_sigma: 3.0,
            sharpen_amount: 0.5,
            threshold_window: 21,
            threshold_offset: 10.0,
            deskew_min_ink: 100,
            deskew_min_angle_deg: 0.5,
            deskew_max_angle_deg: 15.0,
            target_height: 400,
        }
    }
}

/// Derived representations of one input image.
///
/// `skeleton` always has the dimensions of `normalized` and is a subset of
/// its ink pixels.
#[derive(Clone, Debug)]
pub struct PreprocessedImage {
    pub gray: GrayImageU8,
    pub sharpened: GrayImageU8,
    pub binary: GrayImageU8,
    pub normalized: GrayImageU8,
    pub skeleton: GrayImageU8,
}

/// Run the full preprocessing pipeline on a decoded image.
pub fn preprocess(image: &RgbImageU8, params: &PreprocessParams) -> PreprocessedImage {
    let gray = image.to_gray();
    let gray_f = ImageF32::from_gray(&gray);

    let sharp_f = filter::unsharp_mask(&gray_f, params.sharpen_sigma, params.sharpen_amount);
    let sharpened = sharp_f.to_gray_u8();

    let binary = binarize::adaptive_threshold_inv(
        &sharp_f,
        params.threshold_window,
        params.threshold_offset,
    );
    debug!(
        "preprocess {}x{}: {} ink pixels after threshold",
        image.w,
        image.h,
        binary.ink_count()
    );

    let binary = deskew::deskew(
        binary,
        params.deskew_min_ink,
        params.deskew_min_angle_deg,
        params.deskew_max_angle_deg,
    );

    let normalized = resize::normalize_height(&binary, params.target_height);
    let skeleton = skeleton::skeletonize(&normalized);
    assert_eq!(
        (skeleton.w, skeleton.h),
        (normalized.w, normalized.h),
        "skeleton dimensions diverged from the normalized mask"
    );

    PreprocessedImage {
        gray,
        sharpened,
        binary,
        normalized,
        skeleton,
    }
}
