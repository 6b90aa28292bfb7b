//! The top-level comparison engine.
//!
//! [`Comparator::compare`] runs the whole examination: both samples are
//! preprocessed and measured in parallel, compared holistically, rendered
//! into report artifacts and blended into a composite score with a verdict.

pub mod params;

pub use params::CompareParams;

use crate::ai::{ScoredNarrative, SimilarityAssessor};
use crate::error::CompareError;
use crate::features::{extract_features, FeatureSet};
use crate::heatmap::difference_heatmap;
use crate::image::{io, RgbImageU8};
use crate::preprocess::{preprocess, PreprocessedImage};
use crate::score::{composite_score, score_pair, GroupScores, Verdict, Weights};
use crate::similarity::{compare_images, ImageSimilarity};
use crate::types::{ComparisonResult, Renderings, SubScore};
use log::debug;
use std::time::Instant;

struct AnalyzedSample {
    pre: PreprocessedImage,
    features: FeatureSet,
}

/// Handwriting comparison engine. Construct once, compare many pairs.
pub struct Comparator {
    params: CompareParams,
    assessor: Option<Box<dyn SimilarityAssessor + Send + Sync>>,
}

impl Comparator {
    pub fn new(params: CompareParams) -> Self {
        Self {
            params,
            assessor: None,
        }
    }

    /// Attach a holistic assessor; it only runs when `compare` is asked to
    /// use it.
    pub fn with_assessor(
        mut self,
        assessor: Box<dyn SimilarityAssessor + Send + Sync>,
    ) -> Self {
        self.assessor = Some(assessor);
        self
    }

    /// Compare a questioned sample against a known exemplar.
    ///
    /// `use_ai` requests the model-assisted assessment; it is honored only
    /// when an assessor is attached, and its failure never fails the
    /// comparison.
    pub fn compare(
        &self,
        questioned: &RgbImageU8,
        known: &RgbImageU8,
        use_ai: bool,
    ) -> Result<ComparisonResult, CompareError> {
        let started = Instant::now();

        let (q, k) = rayon::join(
            || self.analyze(questioned),
            || self.analyze(known),
        );

        let image_sim = compare_images(&q.pre.normalized, &k.pre.normalized);
        let heatmap = difference_heatmap(&q.pre.normalized, &k.pre.normalized);

        let ai = match (&self.assessor, use_ai) {
            (Some(assessor), true) => Some(assess(assessor.as_ref(), questioned, known)?),
            _ => None,
        };

        let groups = score_pair(&q.features, &k.features, &image_sim);
        let weights = if ai.is_some() {
            Weights::with_ai()
        } else {
            Weights::without_ai()
        };
        let score = composite_score(&groups, &weights, ai.as_ref().map(|a| a.score));
        debug_assert!((0.0..=100.0).contains(&score));
        let verdict = Verdict::from_score(score);

        let sub_scores = build_sub_scores(&q.features, &k.features, &image_sim, &groups, ai.as_ref());
        let renderings = Renderings {
            processed_questioned: io::gray_png_base64(&q.pre.normalized)?,
            processed_known: io::gray_png_base64(&k.pre.normalized)?,
            skeleton_questioned: io::gray_png_base64(&q.pre.skeleton)?,
            skeleton_known: io::gray_png_base64(&k.pre.skeleton)?,
            heatmap: io::rgb_png_base64(&heatmap)?,
            thumbnail_questioned: io::thumbnail_base64(questioned)?,
            thumbnail_known: io::thumbnail_base64(known)?,
        };

        let latency_ms = started.elapsed().as_secs_f64() * 1e3;
        debug!("comparison finished: score={score:.1} verdict={verdict:?} in {latency_ms:.1} ms");

        Ok(ComparisonResult {
            composite_score: score,
            verdict,
            verdict_label: verdict.label().to_owned(),
            verdict_color: verdict.color().to_owned(),
            sub_scores,
            renderings,
            ai_narrative: ai.map(|a| a.narrative),
            latency_ms,
        })
    }

    fn analyze(&self, image: &RgbImageU8) -> AnalyzedSample {
        let pre = preprocess(image, &self.params.preprocess);
        let features = extract_features(&pre, &self.params.features);
        AnalyzedSample { pre, features }
    }
}

/// The assessor sees the raw scans, not the binarized masks: pressure and
/// texture cues survive only in the originals.
fn assess(
    assessor: &(dyn SimilarityAssessor + Send + Sync),
    questioned: &RgbImageU8,
    known: &RgbImageU8,
) -> Result<ScoredNarrative, CompareError> {
    let q_png = io::rgb_png_bytes(questioned)?;
    let k_png = io::rgb_png_bytes(known)?;
    Ok(assessor.assess(&q_png, &k_png))
}

fn build_sub_scores(
    q: &FeatureSet,
    k: &FeatureSet,
    image_sim: &ImageSimilarity,
    groups: &GroupScores,
    ai: Option<&ScoredNarrative>,
) -> Vec<SubScore> {
    let mut scores = vec![
        SubScore {
            name: "Slant".into(),
            score: groups.slant * 100.0,
            description: format!(
                "Slant: {:.1}° vs {:.1}°",
                q.macro_features.slant_deg, k.macro_features.slant_deg
            ),
        },
        SubScore {
            name: "Letter proportions".into(),
            score: groups.letter_ratio * 100.0,
            description: format!(
                "Width/height ratio: {:.2} vs {:.2}",
                q.macro_features.letter_ratio, k.macro_features.letter_ratio
            ),
        },
        SubScore {
            name: "Line spacing".into(),
            score: groups.line_spacing * 100.0,
            description: format!(
                "Normalized spacing: {:.3} vs {:.3}",
                q.macro_features.line_spacing, k.macro_features.line_spacing
            ),
        },
        SubScore {
            name: "Stroke width".into(),
            score: groups.stroke_width * 100.0,
            description: "Pen width distribution overlap".into(),
        },
        SubScore {
            name: "Curvature".into(),
            score: groups.curvature * 100.0,
            description: format!(
                "Mean turning angle: {:.3} vs {:.3} rad",
                q.micro_features.curvature_mean, k.micro_features.curvature_mean
            ),
        },
        SubScore {
            name: "Connectivity".into(),
            score: groups.connectivity * 100.0,
            description: format!(
                "Branch point density: {:.4} vs {:.4}",
                q.micro_features.branch_ratio, k.micro_features.branch_ratio
            ),
        },
        SubScore {
            name: "Image similarity".into(),
            score: groups.image * 100.0,
            description: format!(
                "SSIM {:.3}, correlation {:.3}",
                image_sim.ssim, image_sim.ncc
            ),
        },
    ];
    if let Some(ai) = ai {
        scores.push(SubScore {
            name: "AI assessment".into(),
            score: ai.score * 100.0,
            description: "Model-assisted holistic judgement".into(),
        });
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::NEUTRAL_AI_SCORE;
    use std::sync::{Arc, Mutex};

    struct FixedAssessor(f32);

    impl SimilarityAssessor for FixedAssessor {
        fn assess(&self, _q: &[u8], _k: &[u8]) -> ScoredNarrative {
            ScoredNarrative {
                score: self.0,
                narrative: "fixture narrative".into(),
            }
        }
    }

    fn sample_page() -> RgbImageU8 {
        let mut img = RgbImageU8::filled(160, 80, [250, 250, 250]);
        for line in 0..2 {
            let y0 = 20 + line * 30;
            for x in 20..140 {
                for dy in 0..3 {
                    img.set(x, y0 + dy, [30, 30, 30]);
                }
            }
        }
        img
    }

    #[test]
    fn ai_disabled_leaves_no_narrative() {
        let comparator = Comparator::new(CompareParams::default());
        let page = sample_page();
        let result = comparator.compare(&page, &page, true).unwrap();
        assert!(result.ai_narrative.is_none());
        assert_eq!(result.sub_scores.len(), 7);
    }

    #[test]
    fn attached_assessor_contributes_when_requested() {
        let comparator = Comparator::new(CompareParams::default())
            .with_assessor(Box::new(FixedAssessor(0.9)));
        let page = sample_page();

        let with_ai = comparator.compare(&page, &page, true).unwrap();
        assert_eq!(with_ai.ai_narrative.as_deref(), Some("fixture narrative"));
        assert_eq!(with_ai.sub_scores.len(), 8);

        let without = comparator.compare(&page, &page, false).unwrap();
        assert!(without.ai_narrative.is_none());
        assert_eq!(without.sub_scores.len(), 7);
    }

    struct RecordingAssessor {
        sizes: Arc<Mutex<Vec<(usize, usize)>>>,
    }

    impl SimilarityAssessor for RecordingAssessor {
        fn assess(&self, q: &[u8], k: &[u8]) -> ScoredNarrative {
            let mut sizes = self.sizes.lock().unwrap();
            for png in [q, k] {
                let img = io::decode_rgb(png).unwrap();
                sizes.push((img.w, img.h));
            }
            ScoredNarrative {
                score: 0.5,
                narrative: "recorded".into(),
            }
        }
    }

    #[test]
    fn assessor_receives_the_original_scans() {
        let sizes = Arc::new(Mutex::new(Vec::new()));
        let comparator = Comparator::new(CompareParams::default()).with_assessor(Box::new(
            RecordingAssessor {
                sizes: Arc::clone(&sizes),
            },
        ));
        let page = sample_page();
        comparator.compare(&page, &page, true).unwrap();
        // Raw input dimensions, not the height-normalized masks.
        assert_eq!(sizes.lock().unwrap().as_slice(), &[(160, 80), (160, 80)]);
    }

    #[test]
    fn neutral_assessor_pulls_self_comparison_down() {
        let page = sample_page();
        let plain = Comparator::new(CompareParams::default());
        let neutral = Comparator::new(CompareParams::default())
            .with_assessor(Box::new(FixedAssessor(NEUTRAL_AI_SCORE)));
        let a = plain.compare(&page, &page, false).unwrap();
        let b = neutral.compare(&page, &page, true).unwrap();
        assert!(b.composite_score < a.composite_score);
    }
}
