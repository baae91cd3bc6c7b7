//! Reading preview documents from disk.

use anyhow::{Context, Result};
use std::path::Path;
use tally_core::{CodeInterner, Document};
use tracing::debug;

/// Parse a document from JSON text.
pub fn parse_document(source: &str) -> Result<Document> {
    let mut document: Document = serde_json::from_str(source)?;

    let mut interner = CodeInterner::new();
    document.intern_codes(&mut interner);
    debug!(codes = interner.len(), "interned document codes");

    Ok(document)
}

/// Read and parse a document file.
pub fn load_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        anyhow::bail!("file not found: {}", path.display());
    }

    debug!(path = %path.display(), "loading document");
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let document =
        parse_document(&source).with_context(|| format!("failed to parse {}", path.display()))?;

    debug!(
        items = document.items.len(),
        adjustments = document.adjustments.len(),
        claims = document.claims.len(),
        readings = document.meters.readings.len(),
        "loaded document"
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_shares_codes() {
        let doc = parse_document(
            r#"{
                "currency": "TZS",
                "meters": {
                    "readings": [
                        {"product_id": "DSL", "tank_id": "T1", "opening": "0", "closing": "5"},
                        {"product_id": "DSL", "tank_id": "T2", "opening": 1, "closing": 2}
                    ]
                }
            }"#,
        )
        .unwrap();
        let readings = &doc.meters.readings;
        assert!(readings[0].product_id.ptr_eq(&readings[1].product_id));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_document(Path::new("/nonexistent/preview.json")).unwrap_err();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_load_reports_parse_context() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"currency\": \"TZS\", \"items\": [{{\"quantity\": \"x\"}}]}}").unwrap();

        let err = load_document(file.path()).unwrap_err();
        assert!(format!("{err:#}").starts_with("failed to parse"));
    }
}
