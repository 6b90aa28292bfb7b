//! Report types produced by a comparison.

use crate::score::Verdict;
use serde::Serialize;

/// One named component of the composite score, with an examiner-readable
/// description of what was measured.
#[derive(Clone, Debug, Serialize)]
pub struct SubScore {
    pub name: String,
    /// Similarity on the 0-100 scale.
    pub score: f32,
    pub description: String,
}

/// Base64 PNG renderings for the report UI.
#[derive(Clone, Debug, Serialize)]
pub struct Renderings {
    /// Normalized binary masks, questioned then known.
    pub processed_questioned: String,
    pub processed_known: String,
    /// Thinned skeletons, questioned then known.
    pub skeleton_questioned: String,
    pub skeleton_known: String,
    /// Jet difference heatmap over the questioned sample.
    pub heatmap: String,
    /// Small previews of the original inputs.
    pub thumbnail_questioned: String,
    pub thumbnail_known: String,
}

/// Full result of one questioned-vs-known comparison.
#[derive(Clone, Debug, Serialize)]
pub struct ComparisonResult {
    /// Weighted blend of all evidence, 0-100.
    pub composite_score: f32,
    pub verdict: Verdict,
    pub verdict_label: String,
    pub verdict_color: String,
    pub sub_scores: Vec<SubScore>,
    pub renderings: Renderings,
    /// Narrative from the model-assisted assessment, when one ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_narrative: Option<String>,
    /// Wall-clock duration of the comparison in milliseconds.
    pub latency_ms: f64,
}
