//! Risk detection over an LLM inference service
//!
//! Renders prompt templates from a risk catalog and use case descriptions,
//! invokes an inference engine under a constrained output schema, and parses
//! the structured predictions back into matched risk lists.

pub mod detector;
pub mod inference;
pub mod openai;
pub mod prompts;

pub use detector::RiskDetector;
pub use inference::{
    InferenceEngine, InferenceOutput, Prediction, ResponseFormat, YesNo, YesNoVerdict,
};
pub use openai::OpenAiEngine;
