//! Scan documents: a named formula stored as JSON or TOML.

use std::path::Path;

use anyhow::{Context, Result};
use scan_core::formula::BooleanNode;
use serde::{Deserialize, Serialize};

/// A scan as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanDocument {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub formula: BooleanNode,
}

impl ScanDocument {
    /// Label used in messages: the name, or the file it came from.
    pub fn label<'a>(&'a self, path: &'a Path) -> std::borrow::Cow<'a, str> {
        if self.name.is_empty() {
            path.display().to_string().into()
        } else {
            self.name.as_str().into()
        }
    }
}

pub fn parse_toml(content: &str) -> Result<ScanDocument> {
    toml::from_str(content).context("invalid TOML scan document")
}

pub fn parse_json(content: &str) -> Result<ScanDocument> {
    serde_json::from_str(content).context("invalid JSON scan document")
}

/// Read a scan document, picking the format by extension. Files with any
/// other extension are tried as JSON, then TOML.
pub fn load_document(path: &Path) -> Result<ScanDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let document = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => parse_toml(&content)?,
        Some("json") => parse_json(&content)?,
        _ => parse_json(&content).or_else(|_| parse_toml(&content))?,
    };
    tracing::debug!(path = %path.display(), name = %document.name, "read scan document");
    Ok(document)
}

/// Write `document` as pretty JSON.
pub fn save_document(path: &Path, document: &ScanDocument) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scan_core::ids::NumericRangeFieldId;

    fn bid_equals(value: f64) -> BooleanNode {
        BooleanNode::NumericFieldEquals {
            field_id: NumericRangeFieldId::Bid,
            value,
        }
    }

    #[test]
    fn parse_json_document() {
        let doc = parse_json(
            r#"{
                "name": "bids",
                "formula": {"and": [
                    {"numeric_field_equals": {"field_id": "bid", "value": 100.0}},
                    {"numeric_field_equals": {"field_id": "bid", "value": 101.0}}
                ]}
            }"#,
        )
        .unwrap();
        assert_eq!(doc.name, "bids");
        assert_eq!(doc.description, "");
        assert_eq!(doc.formula, BooleanNode::and([bid_equals(100.0), bid_equals(101.0)]));
    }

    #[test]
    fn parse_toml_document() {
        let doc = parse_toml(
            r#"
name = "bids"
description = "two bids"

[formula]
or = [
    { numeric_field_equals = { field_id = "bid", value = 100.0 } },
    { numeric_field_equals = { field_id = "bid", value = 101.0 } },
]
"#,
        )
        .unwrap();
        assert_eq!(doc.description, "two bids");
        assert_eq!(doc.formula, BooleanNode::or([bid_equals(100.0), bid_equals(101.0)]));
    }

    #[test]
    fn unknown_extension_falls_back_to_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.txt");
        std::fs::write(&path, "formula = \"none\"\n").unwrap();
        let doc = load_document(&path).unwrap();
        assert_eq!(doc.formula, BooleanNode::None);
        assert_eq!(doc.label(&path), path.display().to_string());
    }

    #[test]
    fn missing_formula_is_an_error() {
        let err = parse_json(r#"{"name": "empty"}"#).unwrap_err();
        assert!(format!("{err:#}").contains("formula"), "{err:#}");
    }

    #[test]
    fn saved_document_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let doc = ScanDocument {
            name: "bids".to_string(),
            description: String::new(),
            formula: bid_equals(100.0),
        };
        save_document(&path, &doc).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("description"));
        assert_eq!(load_document(&path).unwrap(), doc);
    }
}
