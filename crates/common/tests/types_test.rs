use risk_atlas_common::types::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_catalog_from_json_file_preserves_order() {
    let temp_dir = TempDir::new().unwrap();
    let catalog_path = temp_dir.path().join("risks.json");

    let catalog_content = r#"[
        {"name": "Privacy", "description": "Exposure of personal data"},
        {"name": "Bias", "description": "Unfair treatment"},
        {"name": "Misuse", "description": "Use outside the intended scope"}
    ]"#;

    fs::write(&catalog_path, catalog_content).unwrap();

    let catalog = RiskCatalog::from_json_file(&catalog_path).unwrap();
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.names(), vec!["Privacy", "Bias", "Misuse"]);
    assert_eq!(catalog.get("Bias").unwrap().description, "Unfair treatment");
}

#[test]
fn test_catalog_duplicate_names_fail_to_load() {
    let temp_dir = TempDir::new().unwrap();
    let catalog_path = temp_dir.path().join("duplicates.json");

    let catalog_content = r#"[
        {"name": "Bias", "description": "first"},
        {"name": "Bias", "description": "second"}
    ]"#;

    fs::write(&catalog_path, catalog_content).unwrap();

    let result = RiskCatalog::from_json_file(&catalog_path);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("duplicate"));
}

#[test]
fn test_catalog_rejects_malformed_json() {
    let result = RiskCatalog::from_json_str("{not json");
    assert!(result.is_err());
}

#[test]
fn test_risk_serde_round_trip() {
    let risk = Risk::new("Bias", "Unfair treatment");
    let json = serde_json::to_string(&risk).unwrap();
    let parsed: Risk = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, risk);
}

#[test]
fn test_load_examples_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let examples_path = temp_dir.path().join("examples.json");

    let examples_content = r#"[
        {"usecase": "Medical chatbot", "risks": ["Privacy"]},
        {"usecase": "Weather summarizer", "risks": []}
    ]"#;

    fs::write(&examples_path, examples_content).unwrap();

    let examples = load_examples(&examples_path).unwrap();
    assert_eq!(examples.len(), 2);
    assert_eq!(examples[0].usecase, "Medical chatbot");
    assert_eq!(examples[0].risks, vec!["Privacy"]);
    assert!(examples[1].risks.is_empty());
}
