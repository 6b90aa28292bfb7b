//! Feature extraction on synthetic pages with known geometry.

mod common;

use common::synthetic_image::{crosshatch_page, dash_page, handwriting_page};
use scriptmatch::features::{extract_features, FeatureParams};
use scriptmatch::preprocess::{preprocess, PreprocessParams};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn features_of(page: &scriptmatch::image::RgbImageU8) -> scriptmatch::features::FeatureSet {
    let pre = preprocess(page, &PreprocessParams::default());
    extract_features(&pre, &FeatureParams::default())
}

#[test]
fn extraction_is_deterministic() {
    init();
    let page = handwriting_page(12.0);
    let a = features_of(&page);
    let b = features_of(&page);
    assert_eq!(a.macro_features.slant_deg, b.macro_features.slant_deg);
    assert_eq!(a.macro_features.line_spacing, b.macro_features.line_spacing);
    assert_eq!(
        a.micro_features.stroke_width_hist,
        b.micro_features.stroke_width_hist
    );
    assert_eq!(a.micro_features.num_components, b.micro_features.num_components);
}

#[test]
fn slant_separates_upright_from_leaning_writing() {
    init();
    let upright = features_of(&handwriting_page(0.0));
    let leaning = features_of(&handwriting_page(15.0));
    let diff = (upright.macro_features.slant_deg - leaning.macro_features.slant_deg).abs();
    assert!(diff > 4.0, "upright={} leaning={}", upright.macro_features.slant_deg, leaning.macro_features.slant_deg);
}

#[test]
fn line_spacing_matches_page_pitch() {
    init();
    let f = features_of(&handwriting_page(8.0));
    // Three lines with a 90 px pitch on a 300 px page.
    let spacing = f.macro_features.line_spacing;
    assert!((0.2..0.4).contains(&spacing), "spacing={spacing}");
}

#[test]
fn stroke_width_histogram_is_a_distribution() {
    init();
    let f = features_of(&handwriting_page(8.0));
    let sum: f32 = f.micro_features.stroke_width_hist.iter().sum();
    assert!((sum - 1.0).abs() < 1e-4, "sum={sum}");
    assert!(f.micro_features.stroke_width_hist.iter().all(|&v| v >= 0.0));
}

#[test]
fn thick_and_thin_writing_have_different_width_profiles() {
    init();
    let thick = features_of(&dash_page());
    let thin = features_of(&crosshatch_page());
    let overlap = scriptmatch::score::bhattacharyya(
        &thick.micro_features.stroke_width_hist,
        &thin.micro_features.stroke_width_hist,
    );
    assert!(overlap < 0.7, "overlap={overlap}");
}

#[test]
fn crosshatch_is_more_branched_than_dashes() {
    init();
    let dashes = features_of(&dash_page());
    let hatch = features_of(&crosshatch_page());
    assert!(
        hatch.micro_features.branch_ratio > dashes.micro_features.branch_ratio,
        "hatch={} dashes={}",
        hatch.micro_features.branch_ratio,
        dashes.micro_features.branch_ratio
    );
}

#[test]
fn curvature_statistics_are_finite_and_ordered() {
    init();
    let f = features_of(&handwriting_page(8.0));
    let m = &f.micro_features;
    assert!(m.curvature_mean.is_finite());
    assert!(m.curvature_std.is_finite());
    assert!(m.curvature_max >= m.curvature_mean);
    assert!(m.curvature_mean >= 0.0);
}
