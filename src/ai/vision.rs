//! Vision-model assessor for an OpenAI-compatible chat completions API.

use super::{parse_similarity_score, ScoredNarrative, SimilarityAssessor};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::{debug, warn};
use serde_json::{json, Value};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o";

const SYSTEM_PROMPT: &str = "You are a forensic document examiner with decades of experience \
in handwriting comparison. You analyze two handwriting samples and judge whether the same \
writer produced both, considering slant, letter formation, spacing, pressure patterns, \
connecting strokes and overall rhythm.";

const INSTRUCTION: &str = "Compare these two handwriting samples. The first is the questioned \
document, the second the known exemplar. Respond in exactly this format:\n\
SIMILARITY_SCORE: <0-100>\n\
CONFIDENCE: <low|medium|high>\n\
KEY_SIMILARITIES: <comma-separated observations>\n\
KEY_DIFFERENCES: <comma-separated observations>\n\
DETAILED_ANALYSIS: <2-3 sentences of examiner narrative>";

/// Assessor backed by an OpenAI-compatible vision endpoint.
///
/// All failures (transport, HTTP status, malformed response) degrade to the
/// neutral judgement rather than failing the comparison.
pub struct VisionAssessor {
    client: reqwest::blocking::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl VisionAssessor {
    pub fn new(api_key: String, endpoint: String, model: String) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key,
            endpoint,
            model,
        })
    }

    /// Build an assessor from the environment, or `None` when no API key is
    /// configured. Endpoint and model fall back to the OpenAI defaults.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("SCRIPTMATCH_API_KEY").ok()?;
        let endpoint =
            std::env::var("SCRIPTMATCH_API_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.into());
        let model =
            std::env::var("SCRIPTMATCH_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        match Self::new(api_key, endpoint, model) {
            Ok(assessor) => Some(assessor),
            Err(err) => {
                warn!("could not build HTTP client for AI assessment: {err}");
                None
            }
        }
    }

    fn request_body(&self, questioned_png: &[u8], known_png: &[u8]) -> Value {
        let image = |png: &[u8]| {
            json!({
                "type": "image_url",
                "image_url": { "url": format!("data:image/png;base64,{}", BASE64.encode(png)) }
            })
        };
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": INSTRUCTION },
                        image(questioned_png),
                        image(known_png),
                    ]
                }
            ],
            "max_tokens": 600
        })
    }

    fn send(&self, body: &Value) -> Result<String, String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .map_err(|e| format!("request failed: {e}"))?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("endpoint returned {status}"));
        }
        let payload: Value = response
            .json()
            .map_err(|e| format!("malformed response body: {e}"))?;
        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| "response carried no message content".into())
    }
}

impl SimilarityAssessor for VisionAssessor {
    fn assess(&self, questioned_png: &[u8], known_png: &[u8]) -> ScoredNarrative {
        let body = self.request_body(questioned_png, known_png);
        // One retry covers transient transport failures.
        let text = match self.send(&body) {
            Ok(text) => text,
            Err(first) => {
                debug!("AI assessment retry after: {first}");
                match self.send(&body) {
                    Ok(text) => text,
                    Err(second) => {
                        warn!("AI assessment failed: {second}");
                        return ScoredNarrative::neutral(&second);
                    }
                }
            }
        };
        match parse_similarity_score(&text) {
            Some(score) => ScoredNarrative {
                score,
                narrative: text,
            },
            None => {
                warn!("AI response carried no similarity score");
                ScoredNarrative::neutral("response did not follow the expected format")
            }
        }
    }
}
