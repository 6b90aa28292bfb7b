//! Handwriting feature extraction.
//!
//! Two families of measurements, both computed on the normalized binary
//! mask and its skeleton:
//! - macro features describe page- and word-level habits (slant, letter
//!   proportions, line spacing),
//! - micro features describe stroke-level habits (pen width distribution,
//!   curvature, skeleton topology).

pub mod macro_features;
pub mod micro_features;

pub use macro_features::{extract_macro_features, MacroFeatures, MacroParams};
pub use micro_features::{
    extract_micro_features, MicroFeatures, MicroParams, STROKE_WIDTH_BINS,
};

use crate::preprocess::PreprocessedImage;
use serde::Serialize;

/// All measurements taken from one preprocessed sample.
#[derive(Clone, Debug, Serialize)]
pub struct FeatureSet {
    #[serde(rename = "macro")]
    pub macro_features: MacroFeatures,
    #[serde(rename = "micro")]
    pub micro_features: MicroFeatures,
}

/// Parameters for both feature families.
#[derive(Clone, Debug, Default)]
pub struct FeatureParams {
    pub macro_params: MacroParams,
    pub micro_params: MicroParams,
}

/// Extract macro and micro features from a preprocessed sample.
///
/// Macro features read the full-resolution deskewed mask so the absolute
/// letter filters (minimum blob area, width, height) apply at scan
/// resolution; micro features read the size-normalized mask and skeleton.
pub fn extract_features(pre: &PreprocessedImage, params: &FeatureParams) -> FeatureSet {
    FeatureSet {
        macro_features: extract_macro_features(&pre.binary, &params.macro_params),
        micro_features: extract_micro_features(
            &pre.normalized,
            &pre.skeleton,
            &params.micro_params,
        ),
    }
}
