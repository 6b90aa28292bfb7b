//! Composite scoring and verdict policy.
//!
//! Every feature difference is mapped to a [0, 1] similarity through a
//! linear falloff with a feature-specific tolerance, the stroke width
//! histograms are compared with the Bhattacharyya coefficient, and the
//! weighted blend is reported on a 0-100 scale with a three-tier verdict.

use crate::features::{FeatureSet, STROKE_WIDTH_BINS};
use crate::similarity::ImageSimilarity;
use serde::Serialize;

/// Slant differences of this many degrees or more score zero.
pub const SLANT_TOLERANCE_DEG: f32 = 30.0;
/// Letter ratio differences of this much or more score zero.
pub const RATIO_TOLERANCE: f32 = 0.5;
/// Line spacing differences of this much or more score zero.
pub const SPACING_TOLERANCE: f32 = 0.2;
/// Curvature mean differences of this much or more score zero.
pub const CURVATURE_TOLERANCE: f32 = 0.5;
/// Branch ratio differences of 0.02 or more score zero.
pub const BRANCH_FALLOFF: f32 = 50.0;

/// Linear falloff: 1 at zero difference, 0 at `tolerance` and beyond.
fn falloff(diff: f32, tolerance: f32) -> f32 {
    (1.0 - diff.abs() / tolerance).max(0.0)
}

pub fn slant_score(a_deg: f32, b_deg: f32) -> f32 {
    falloff(a_deg - b_deg, SLANT_TOLERANCE_DEG)
}

pub fn ratio_score(a: f32, b: f32) -> f32 {
    falloff(a - b, RATIO_TOLERANCE)
}

pub fn spacing_score(a: f32, b: f32) -> f32 {
    falloff(a - b, SPACING_TOLERANCE)
}

pub fn curvature_score(a: f32, b: f32) -> f32 {
    falloff(a - b, CURVATURE_TOLERANCE)
}

pub fn branch_score(a: f32, b: f32) -> f32 {
    (1.0 - (a - b).abs() * BRANCH_FALLOFF).max(0.0)
}

/// Bhattacharyya coefficient of two normalized histograms: 1 for identical
/// distributions, 0 for disjoint ones. Degenerate (all-zero) histograms
/// score 0 against anything.
pub fn bhattacharyya(p: &[f32; STROKE_WIDTH_BINS], q: &[f32; STROKE_WIDTH_BINS]) -> f32 {
    let sum_p: f32 = p.iter().sum();
    let sum_q: f32 = q.iter().sum();
    if sum_p < 1e-8 || sum_q < 1e-8 {
        return 0.0;
    }
    p.iter()
        .zip(q.iter())
        .map(|(&a, &b)| (a * b).sqrt())
        .sum::<f32>()
        .clamp(0.0, 1.0)
}

/// Weighting of the four score groups. The AI weights reserve a share for
/// the model's holistic judgement; without it that share folds back into
/// the classical groups.
#[derive(Clone, Copy, Debug)]
pub struct Weights {
    pub macro_w: f32,
    pub micro_w: f32,
    pub image_w: f32,
    pub ai_w: f32,
}

impl Weights {
    pub fn with_ai() -> Self {
        Self {
            macro_w: 0.20,
            micro_w: 0.25,
            image_w: 0.20,
            ai_w: 0.35,
        }
    }

    pub fn without_ai() -> Self {
        Self {
            macro_w: 0.30,
            micro_w: 0.35,
            image_w: 0.35,
            ai_w: 0.0,
        }
    }
}

/// Per-group [0, 1] similarities feeding the composite.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct GroupScores {
    pub slant: f32,
    pub letter_ratio: f32,
    pub line_spacing: f32,
    pub stroke_width: f32,
    pub curvature: f32,
    pub connectivity: f32,
    pub image: f32,
}

impl GroupScores {
    pub fn macro_score(&self) -> f32 {
        (self.slant + self.letter_ratio + self.line_spacing) / 3.0
    }

    pub fn micro_score(&self) -> f32 {
        (self.stroke_width + self.curvature + self.connectivity) / 3.0
    }
}

/// Score one feature pair plus the holistic image similarity.
pub fn score_pair(a: &FeatureSet, b: &FeatureSet, image: &ImageSimilarity) -> GroupScores {
    GroupScores {
        slant: slant_score(a.macro_features.slant_deg, b.macro_features.slant_deg),
        letter_ratio: ratio_score(a.macro_features.letter_ratio, b.macro_features.letter_ratio),
        line_spacing: spacing_score(a.macro_features.line_spacing, b.macro_features.line_spacing),
        stroke_width: bhattacharyya(
            &a.micro_features.stroke_width_hist,
            &b.micro_features.stroke_width_hist,
        ),
        curvature: curvature_score(a.micro_features.curvature_mean, b.micro_features.curvature_mean),
        connectivity: branch_score(a.micro_features.branch_ratio, b.micro_features.branch_ratio),
        image: image.score(),
    }
}

/// Blend the group scores into a 0-100 composite. `ai_score` is the model's
/// [0, 1] judgement when one is in play.
pub fn composite_score(groups: &GroupScores, weights: &Weights, ai_score: Option<f32>) -> f32 {
    let ai = ai_score.unwrap_or(0.0);
    let blended = weights.macro_w * groups.macro_score()
        + weights.micro_w * groups.micro_score()
        + weights.image_w * groups.image
        + weights.ai_w * ai;
    (blended * 100.0).clamp(0.0, 100.0)
}

/// Composite score at or above this is a positive finding.
pub const SAME_WRITER_THRESHOLD: f32 = 88.0;
/// Composite score at or above this (but below the positive threshold) is
/// inconclusive.
pub const INCONCLUSIVE_THRESHOLD: f32 = 70.0;

/// Three-tier examiner verdict derived from the composite score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    HighProbabilitySameWriter,
    Inconclusive,
    LikelyDifferentWriters,
}

impl Verdict {
    pub fn from_score(score: f32) -> Self {
        if score >= SAME_WRITER_THRESHOLD {
            Verdict::HighProbabilitySameWriter
        } else if score >= INCONCLUSIVE_THRESHOLD {
            Verdict::Inconclusive
        } else {
            Verdict::LikelyDifferentWriters
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::HighProbabilitySameWriter => "High probability same writer",
            Verdict::Inconclusive => "Inconclusive - further examination needed",
            Verdict::LikelyDifferentWriters => "Likely different writers",
        }
    }

    /// Display color for UI surfaces.
    pub fn color(&self) -> &'static str {
        match self {
            Verdict::HighProbabilitySameWriter => "#22c55e",
            Verdict::Inconclusive => "#f59e0b",
            Verdict::LikelyDifferentWriters => "#ef4444",
        }
    }
}
