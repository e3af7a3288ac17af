//! Prompt templates and rendering for risk identification
//!
//! Templates use named `{placeholder}` slots filled by [`PromptBuilder`].
//! The catalog JSON embedded in the batch template is serialized with
//! 4-space indentation; prompt tuning depends on that exact layout.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use risk_atlas_common::{AtlasError, CotExample, Result, RiskCatalog};

/// Batched identification prompt: all catalog risks against one use case.
pub const RISK_IDENTIFICATION_BATCH_TEMPLATE: &str = "\
You are an AI risk analyst. Decide which of the potential risks below apply to the described use case.

Respond with a JSON array containing the names of the applicable risk categories, most relevant first. \
Respond with valid JSON only: no markdown fences, no text outside the array. \
Select at most {max_risk} categories. If none apply, respond with an empty array.

{cot_examples}Potential risks:
{risks}

Use case:
{usecase}

Answer:";

/// Single-risk identification prompt: one Yes/No question.
pub const RISK_IDENTIFICATION_TEMPLATE: &str = "\
You are an AI risk analyst. Decide whether the risk below is a concern for the described use case.

Respond with a JSON object of the form {\"answer\": \"Yes\"} or {\"answer\": \"No\"}. \
Respond with valid JSON only: no markdown fences, no text outside the object.

Risk: {risk_name}
Description: {risk_description}

Use case:
{usecase}

Answer:";

/// Renders a template by substituting named `{placeholder}` slots.
///
/// Pure string rendering, no side effects. Placeholders the template does
/// not contain are ignored; substitution values are inserted literally.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: &'static str,
    values: Vec<(&'static str, String)>,
}

impl PromptBuilder {
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            values: Vec::new(),
        }
    }

    pub fn set(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.values.push((name, value.into()));
        self
    }

    pub fn build(self) -> String {
        self.values
            .iter()
            .fold(self.template.to_string(), |prompt, (name, value)| {
                prompt.replace(&format!("{{{name}}}"), value)
            })
    }
}

/// Render chain-of-thought exemplars for the `{cot_examples}` slot.
///
/// Each exemplar shows a use case and the JSON answer expected for it.
/// Returns an empty string for an empty example set.
pub fn render_examples(examples: &[CotExample]) -> String {
    let mut out = String::new();
    for example in examples {
        let answer =
            serde_json::to_string(&example.risks).unwrap_or_else(|_| "[]".to_string());
        out.push_str("Example use case:\n");
        out.push_str(&example.usecase);
        out.push_str("\nExample answer:\n");
        out.push_str(&answer);
        out.push_str("\n\n");
    }
    out
}

#[derive(Serialize)]
struct RiskPromptEntry<'a> {
    category: &'a str,
    description: &'a str,
}

/// Serialize the catalog as `{category, description}` pairs with 4-space
/// indentation for the `{risks}` slot.
pub fn catalog_prompt_json(catalog: &RiskCatalog) -> Result<String> {
    let entries: Vec<RiskPromptEntry<'_>> = catalog
        .iter()
        .map(|risk| RiskPromptEntry {
            category: &risk.name,
            description: &risk.description,
        })
        .collect();

    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    entries
        .serialize(&mut serializer)
        .map_err(AtlasError::Serialization)?;
    String::from_utf8(buf).map_err(|e| AtlasError::Catalog(e.to_string()))
}
