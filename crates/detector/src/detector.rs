//! Generic risk detector
//!
//! Classifies use case descriptions against a risk catalog by prompting an
//! inference engine, either with one batched question per use case or with
//! one Yes/No question per catalog entry.

use std::sync::Arc;
use tracing::{debug, instrument};

use risk_atlas_common::{
    load_examples, AtlasError, CotExample, Result, Risk, RiskCatalog, SystemConfig,
};

use crate::inference::{InferenceEngine, Prediction, ResponseFormat, YesNo};
use crate::prompts::{
    catalog_prompt_json, render_examples, PromptBuilder, RISK_IDENTIFICATION_BATCH_TEMPLATE,
    RISK_IDENTIFICATION_TEMPLATE,
};

pub struct RiskDetector {
    engine: Arc<dyn InferenceEngine>,
    catalog: RiskCatalog,
    examples: Vec<CotExample>,
    max_risk: usize,
}

impl RiskDetector {
    pub fn new(
        engine: Arc<dyn InferenceEngine>,
        catalog: RiskCatalog,
        examples: Vec<CotExample>,
        max_risk: usize,
    ) -> Self {
        Self {
            engine,
            catalog,
            examples,
            max_risk,
        }
    }

    /// Wire up a detector from the system configuration: loads the catalog
    /// and example files and caps the embedded examples at `num_examples`.
    pub fn from_config(engine: Arc<dyn InferenceEngine>, config: &SystemConfig) -> Result<Self> {
        let catalog = RiskCatalog::from_json_file(&config.detector.catalog_path)?;
        let mut examples = match &config.detector.examples_path {
            Some(path) => load_examples(path)?,
            None => Vec::new(),
        };
        examples.truncate(config.detector.num_examples);
        Ok(Self::new(engine, catalog, examples, config.detector.max_risk))
    }

    pub fn catalog(&self) -> &RiskCatalog {
        &self.catalog
    }

    /// Classify each use case with one batched prompt covering the whole
    /// catalog. Returns one ordered risk list per use case; a single
    /// inference round-trip serves the entire batch.
    ///
    /// An empty predicted list is a valid "no risks detected" outcome.
    /// Predicted names absent from the catalog are dropped.
    #[instrument(skip(self, usecases), fields(usecases = usecases.len(), risks = self.catalog.len()))]
    pub async fn detect(&self, usecases: &[String]) -> Result<Vec<Vec<Risk>>> {
        if usecases.is_empty() {
            return Ok(Vec::new());
        }

        let examples = render_examples(&self.examples);
        let risks_json = catalog_prompt_json(&self.catalog)?;
        let prompts: Vec<String> = usecases
            .iter()
            .map(|usecase| {
                PromptBuilder::new(RISK_IDENTIFICATION_BATCH_TEMPLATE)
                    .set("cot_examples", examples.as_str())
                    .set("usecase", usecase.as_str())
                    .set("risks", risks_json.as_str())
                    .set("max_risk", self.max_risk.to_string())
                    .build()
            })
            .collect();

        let format = ResponseFormat::LabelList {
            labels: self.catalog.names(),
        };
        let outputs = self.engine.generate(prompts, &format).await?;
        if outputs.len() != usecases.len() {
            return Err(AtlasError::MalformedResponse(format!(
                "expected {} outputs, engine returned {}",
                usecases.len(),
                outputs.len()
            )));
        }

        outputs
            .iter()
            .map(|output| match &output.prediction {
                Prediction::Labels(names) => {
                    let unknown: Vec<&String> =
                        names.iter().filter(|n| !self.catalog.contains(n)).collect();
                    if !unknown.is_empty() {
                        debug!(?unknown, "Dropping predicted names not in the catalog");
                    }
                    Ok(self
                        .catalog
                        .iter()
                        .filter(|risk| names.contains(&risk.name))
                        .cloned()
                        .collect())
                }
                Prediction::Answer(_) => Err(AtlasError::MalformedResponse(
                    "expected a label list prediction".to_string(),
                )),
            })
            .collect()
    }

    /// Classify each use case by asking a separate Yes/No question for every
    /// catalog entry: one inference call per use case, one prompt per risk.
    /// Use cases are processed sequentially relative to one another.
    #[instrument(skip(self, usecases), fields(usecases = usecases.len(), risks = self.catalog.len()))]
    pub async fn detect_one(&self, usecases: &[String]) -> Result<Vec<Vec<Risk>>> {
        let mut all_risks = Vec::with_capacity(usecases.len());
        for usecase in usecases {
            // Explicit (risk, prompt) pairs: answers are matched back to the
            // entry their prompt was rendered from, never to a bare index.
            let pairs: Vec<(&Risk, String)> = self
                .catalog
                .iter()
                .map(|risk| {
                    let prompt = PromptBuilder::new(RISK_IDENTIFICATION_TEMPLATE)
                        .set("usecase", usecase.as_str())
                        .set("risk_name", risk.name.as_str())
                        .set("risk_description", risk.description.as_str())
                        .build();
                    (risk, prompt)
                })
                .collect();

            let prompts = pairs.iter().map(|(_, prompt)| prompt.clone()).collect();
            let outputs = self
                .engine
                .generate(prompts, &ResponseFormat::YesNoObject)
                .await?;
            if outputs.len() != pairs.len() {
                return Err(AtlasError::MalformedResponse(format!(
                    "expected {} outputs, engine returned {}",
                    pairs.len(),
                    outputs.len()
                )));
            }

            let mut risks = Vec::new();
            for ((risk, _), output) in pairs.iter().zip(&outputs) {
                match &output.prediction {
                    Prediction::Answer(YesNo::Yes) => risks.push((*risk).clone()),
                    Prediction::Answer(YesNo::No) => {}
                    Prediction::Labels(_) => {
                        return Err(AtlasError::MalformedResponse(
                            "expected a Yes/No answer prediction".to_string(),
                        ))
                    }
                }
            }
            all_risks.push(risks);
        }

        Ok(all_risks)
    }
}
