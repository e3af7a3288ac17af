//! Shared data model for risk detection

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AtlasError, Result};

/// A named, described category of potential harm used for classification.
///
/// `name` is the unique, case-sensitive identifier referenced by prompt
/// schemas and inference predictions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    pub name: String,
    pub description: String,
}

impl Risk {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Ordered, read-only collection of risk definitions.
///
/// Catalog order is canonical: it drives the label enumeration sent to the
/// inference engine and the pairing of per-risk answers back to entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskCatalog {
    risks: Vec<Risk>,
}

impl RiskCatalog {
    /// Build a catalog from an ordered list of risks.
    ///
    /// Duplicate names are rejected; predictions are matched back to
    /// entries by name.
    pub fn from_risks(risks: Vec<Risk>) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for risk in &risks {
            if !seen.insert(risk.name.as_str()) {
                return Err(AtlasError::Catalog(format!(
                    "duplicate risk name: {}",
                    risk.name
                )));
            }
        }
        Ok(Self { risks })
    }

    /// Parse a catalog from a JSON array of `{name, description}` records.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let risks: Vec<Risk> = serde_json::from_str(json)?;
        Self::from_risks(risks)
    }

    /// Load a catalog from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Risk names in catalog order.
    pub fn names(&self) -> Vec<String> {
        self.risks.iter().map(|r| r.name.clone()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Risk> {
        self.risks.iter()
    }

    pub fn len(&self) -> usize {
        self.risks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.risks.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Risk> {
        self.risks.iter().find(|r| r.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Chain-of-thought exemplar embedded in the batch identification prompt:
/// a use case paired with the risk names expected for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CotExample {
    pub usecase: String,
    pub risks: Vec<String>,
}

/// Load chain-of-thought examples from a JSON file.
pub fn load_examples(path: impl AsRef<Path>) -> Result<Vec<CotExample>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn catalog() -> RiskCatalog {
        RiskCatalog::from_risks(vec![
            Risk::new("Bias", "Unfair treatment of groups or individuals"),
            Risk::new("Privacy", "Exposure of personal data"),
        ])
        .unwrap()
    }

    #[test]
    fn test_names_preserve_catalog_order() {
        assert_eq!(catalog().names(), vec!["Bias", "Privacy"]);
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let result = RiskCatalog::from_risks(vec![
            Risk::new("Bias", "first"),
            Risk::new("Bias", "second"),
        ]);
        assert!(matches!(result, Err(AtlasError::Catalog(_))));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let catalog = catalog();
        assert!(catalog.contains("Bias"));
        assert!(!catalog.contains("bias"));
    }

    #[test]
    fn test_catalog_loads_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "Bias", "description": "d1"}}, {{"name": "Privacy", "description": "d2"}}]"#
        )
        .unwrap();

        let catalog = RiskCatalog::from_json_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("Privacy").unwrap().description, "d2");
    }
}
