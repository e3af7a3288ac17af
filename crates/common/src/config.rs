use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    pub inference: InferenceConfig,
    pub detector: DetectorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Base URL of an OpenAI-compatible chat completion endpoint,
    /// e.g. "http://localhost:11434/v1".
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key. Local servers usually
    /// accept any value, so this is optional.
    pub api_key_env: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// JSON file with the risk catalog (array of {name, description}).
    pub catalog_path: PathBuf,
    /// JSON file with chain-of-thought examples (array of {usecase, risks}).
    pub examples_path: Option<PathBuf>,
    /// Maximum number of risk categories the model is asked to select.
    #[serde(default = "default_max_risk")]
    pub max_risk: usize,
    /// How many chain-of-thought examples to embed per batch prompt.
    #[serde(default = "default_num_examples")]
    pub num_examples: usize,
}

fn default_temperature() -> f32 {
    0.0
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_risk() -> usize {
    5
}

fn default_num_examples() -> usize {
    3
}

impl SystemConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SystemConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_loads_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[inference]
base_url = "http://localhost:11434/v1"
model = "granite3.2:8b"

[detector]
catalog_path = "risks.json"
"#
        )
        .unwrap();

        let config = SystemConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.inference.model, "granite3.2:8b");
        assert_eq!(config.inference.timeout_secs, 120);
        assert_eq!(config.detector.max_risk, 5);
        assert_eq!(config.detector.num_examples, 3);
        assert!(config.detector.examples_path.is_none());
    }
}
