//! Inference engine contract
//!
//! The engine accepts a batch of rendered prompts plus a response-format
//! constraint and returns one structured prediction per prompt, in order.
//! Batching and parallel dispatch are owned by the engine implementation and
//! invisible to callers.

use async_trait::async_trait;
use schemars::{gen::SchemaSettings, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use risk_atlas_common::{AtlasError, Result};

/// Response-format contract for one `generate` call.
///
/// Each variant carries its own JSON schema, postprocessing directive, and
/// parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseFormat {
    /// A JSON array of strings drawn from an enumerated label set.
    LabelList { labels: Vec<String> },
    /// A JSON object with a single required `answer` field, "Yes" or "No".
    YesNoObject,
}

impl ResponseFormat {
    /// JSON schema sent to the engine as the output constraint.
    pub fn schema(&self) -> Value {
        match self {
            ResponseFormat::LabelList { labels } => json!({
                "type": "array",
                "items": {
                    "type": "string",
                    "enum": labels,
                }
            }),
            ResponseFormat::YesNoObject => {
                let generator = SchemaSettings::draft07()
                    .with(|settings| {
                        settings.inline_subschemas = true;
                        settings.meta_schema = None;
                    })
                    .into_generator();
                let schema = generator.into_root_schema_for::<YesNoVerdict>();
                serde_json::to_value(schema).unwrap_or_default()
            }
        }
    }

    /// Postprocessing directive name for this format.
    pub fn postprocessor(&self) -> &'static str {
        match self {
            ResponseFormat::LabelList { .. } => "list_of_str",
            ResponseFormat::YesNoObject => "json_object",
        }
    }

    /// Parse a raw completion into the prediction variant this format
    /// promises. Fenced JSON is tolerated; anything else non-conforming is a
    /// malformed response.
    pub fn parse(&self, raw: &str) -> Result<Prediction> {
        let text = strip_code_fences(raw);
        match self {
            ResponseFormat::LabelList { .. } => {
                let labels: Vec<String> = serde_json::from_str(text).map_err(|e| {
                    AtlasError::MalformedResponse(format!(
                        "expected a JSON array of strings, got {text:?}: {e}"
                    ))
                })?;
                Ok(Prediction::Labels(labels))
            }
            ResponseFormat::YesNoObject => {
                let verdict: YesNoVerdict = serde_json::from_str(text).map_err(|e| {
                    AtlasError::MalformedResponse(format!(
                        "expected a Yes/No answer object, got {text:?}: {e}"
                    ))
                })?;
                Ok(Prediction::Answer(verdict.answer))
            }
        }
    }
}

/// Yes/No verdict object returned for single-risk questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct YesNoVerdict {
    pub answer: YesNo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum YesNo {
    Yes,
    No,
}

/// Structured prediction parsed from one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prediction {
    Labels(Vec<String>),
    Answer(YesNo),
}

/// One engine output per prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceOutput {
    pub prediction: Prediction,
    /// Completion text before postprocessing, kept for logging.
    pub raw: String,
}

#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Generate one output per prompt, order-preserving.
    async fn generate(
        &self,
        prompts: Vec<String>,
        format: &ResponseFormat,
    ) -> Result<Vec<InferenceOutput>>;
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
