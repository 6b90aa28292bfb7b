//! Optional model-assisted assessment.
//!
//! A [`SimilarityAssessor`] looks at the two processed samples and returns
//! a holistic similarity plus a narrative for the report. The trait keeps
//! the comparison pipeline independent of any particular backend; the
//! bundled [`vision::VisionAssessor`] talks to an OpenAI-compatible vision
//! endpoint.

pub mod vision;

pub use vision::VisionAssessor;

/// Score reported when the assessor fails or returns nothing parseable.
/// Neutral by construction: it neither supports nor contradicts the
/// classical evidence.
pub const NEUTRAL_AI_SCORE: f32 = 0.5;

/// Holistic judgement of one sample pair.
#[derive(Clone, Debug)]
pub struct ScoredNarrative {
    /// Similarity in [0, 1].
    pub score: f32,
    /// Free-form examiner narrative for the report.
    pub narrative: String,
}

impl ScoredNarrative {
    /// The neutral fallback used whenever no usable judgement exists.
    pub fn neutral(reason: &str) -> Self {
        Self {
            score: NEUTRAL_AI_SCORE,
            narrative: format!("AI analysis unavailable: {reason}"),
        }
    }
}

/// Backend-agnostic holistic assessor. Implementations must not panic on
/// backend failure; they degrade to [`ScoredNarrative::neutral`] instead.
pub trait SimilarityAssessor {
    /// Assess the two samples, given as PNG-encoded original scans.
    fn assess(&self, questioned_png: &[u8], known_png: &[u8]) -> ScoredNarrative;
}

/// Extract the 0-100 similarity from a model response and map it to [0, 1].
///
/// The response contract puts the number on a line starting with
/// `SIMILARITY_SCORE:`; anything else around it is narrative. Returns
/// `None` when no such line carries a number.
pub fn parse_similarity_score(text: &str) -> Option<f32> {
    for line in text.lines() {
        let line = line.trim();
        let Some(rest) = line.strip_prefix("SIMILARITY_SCORE:") else {
            continue;
        };
        let digits: String = rest
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        if let Ok(value) = digits.parse::<f32>() {
            return Some((value.clamp(0.0, 100.0)) / 100.0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_score_line() {
        let text = "SIMILARITY_SCORE: 72\nCONFIDENCE: high\n...";
        assert_eq!(parse_similarity_score(text), Some(0.72));
    }

    #[test]
    fn parses_score_with_decoration() {
        let text = "Analysis follows.\nSIMILARITY_SCORE: 85.5/100\n";
        let score = parse_similarity_score(text).unwrap();
        assert!((score - 0.855).abs() < 1e-6);
    }

    #[test]
    fn clamps_out_of_range_scores() {
        assert_eq!(parse_similarity_score("SIMILARITY_SCORE: 250"), Some(1.0));
    }

    #[test]
    fn missing_score_line_yields_none() {
        assert_eq!(parse_similarity_score("the samples look similar"), None);
        assert_eq!(parse_similarity_score("SIMILARITY_SCORE: n/a"), None);
    }

    #[test]
    fn neutral_narrative_carries_the_reason() {
        let n = ScoredNarrative::neutral("request timed out");
        assert_eq!(n.score, NEUTRAL_AI_SCORE);
        assert!(n.narrative.contains("request timed out"));
    }
}
