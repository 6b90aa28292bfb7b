//! End-to-end comparison behavior on synthetic pages.

mod common;

use common::synthetic_image::{
    blank_page, crosshatch_page, dash_page, handwriting_page, perturbed_copy,
};
use scriptmatch::heatmap::normalized_difference;
use scriptmatch::preprocess::{preprocess, PreprocessParams};
use scriptmatch::{CompareParams, Comparator, Verdict};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn self_comparison_scores_near_perfect() {
    init();
    let page = handwriting_page(10.0);
    let comparator = Comparator::new(CompareParams::default());
    let result = comparator.compare(&page, &page, false).unwrap();
    assert!(
        result.composite_score >= 95.0,
        "score={}",
        result.composite_score
    );
    assert_eq!(result.verdict, Verdict::HighProbabilitySameWriter);

    let pre = preprocess(&page, &PreprocessParams::default());
    let diff = normalized_difference(&pre.normalized, &pre.normalized);
    assert!(diff.data.iter().all(|&v| v == 0.0));
}

#[test]
fn second_scan_of_same_writing_stays_above_inconclusive() {
    init();
    let original = handwriting_page(12.0);
    let rescan = perturbed_copy(&original);
    let comparator = Comparator::new(CompareParams::default());
    let result = comparator.compare(&original, &rescan, false).unwrap();
    assert!(
        result.composite_score >= 70.0,
        "score={}",
        result.composite_score
    );
}

#[test]
fn structurally_different_pages_score_low() {
    init();
    let comparator = Comparator::new(CompareParams::default());
    let result = comparator
        .compare(&dash_page(), &crosshatch_page(), false)
        .unwrap();
    assert!(
        result.composite_score < 50.0,
        "score={}",
        result.composite_score
    );
    assert_eq!(result.verdict, Verdict::LikelyDifferentWriters);
}

#[test]
fn blank_pages_stay_in_range() {
    init();
    let comparator = Comparator::new(CompareParams::default());
    let result = comparator
        .compare(&blank_page(300, 200), &blank_page(200, 300), false)
        .unwrap();
    assert!((0.0..=100.0).contains(&result.composite_score));
    for sub in &result.sub_scores {
        assert!(
            (0.0..=100.0).contains(&sub.score),
            "{} out of range: {}",
            sub.name,
            sub.score
        );
    }
}

#[test]
fn comparison_is_symmetric() {
    init();
    let a = handwriting_page(5.0);
    let b = handwriting_page(20.0);
    let comparator = Comparator::new(CompareParams::default());
    let ab = comparator.compare(&a, &b, false).unwrap();
    let ba = comparator.compare(&b, &a, false).unwrap();
    assert!(
        (ab.composite_score - ba.composite_score).abs() < 1e-3,
        "ab={} ba={}",
        ab.composite_score,
        ba.composite_score
    );
    for (x, y) in ab.sub_scores.iter().zip(ba.sub_scores.iter()) {
        assert_eq!(x.name, y.name);
        assert!((x.score - y.score).abs() < 1e-3, "{} asymmetric", x.name);
    }
}

#[test]
fn report_carries_all_renderings() {
    init();
    let comparator = Comparator::new(CompareParams::default());
    let result = comparator
        .compare(&handwriting_page(8.0), &handwriting_page(9.0), false)
        .unwrap();
    let r = &result.renderings;
    for png in [
        &r.processed_questioned,
        &r.processed_known,
        &r.skeleton_questioned,
        &r.skeleton_known,
        &r.heatmap,
        &r.thumbnail_questioned,
        &r.thumbnail_known,
    ] {
        assert!(!png.is_empty());
    }
    assert!(result.latency_ms > 0.0);
}

#[test]
fn heatmap_uses_the_pairwise_minimum_shape() {
    init();
    let a = preprocess(&handwriting_page(8.0), &PreprocessParams::default());
    let b = preprocess(&blank_page(300, 300), &PreprocessParams::default());
    let diff = normalized_difference(&a.normalized, &b.normalized);
    assert_eq!(diff.h, a.normalized.h.min(b.normalized.h));
    assert_eq!(diff.w, a.normalized.w.min(b.normalized.w));
}

#[test]
fn result_serializes_to_json() {
    init();
    let comparator = Comparator::new(CompareParams::default());
    let result = comparator
        .compare(&handwriting_page(8.0), &handwriting_page(8.0), false)
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert!(json["composite_score"].is_number());
    assert!(json["sub_scores"].as_array().unwrap().len() >= 7);
    assert!(json.get("ai_narrative").is_none());
}
