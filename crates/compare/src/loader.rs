//! Loading JMH result documents into measurement records.
//!
//! Malformed documents and invalid entries never abort a run: they are
//! skipped and recorded as diagnostics. Only a side that yields no records
//! at all is terminal.

use benchdelta_core::{
    CompareError, Diagnostic, DiagnosticKind, Diagnostics, MeasurementRecord, Result, Side,
};
use serde_json::Value;
use std::io;
use tracing::{debug, info, warn};

/// One raw input document.
#[derive(Debug)]
pub struct RawDocument {
    /// Identifier used in diagnostics, usually the file name.
    pub id: String,
    /// Document text, or the error hit while reading it.
    pub contents: io::Result<String>,
}

impl RawDocument {
    /// Create a readable document.
    pub fn new(id: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            contents: Ok(contents.into()),
        }
    }

    /// Create a document that failed to read.
    pub fn unreadable(id: impl Into<String>, error: io::Error) -> Self {
        Self {
            id: id.into(),
            contents: Err(error),
        }
    }
}

/// A provider of raw documents for one side of the comparison.
#[cfg_attr(test, mockall::automock)]
pub trait DocumentSource {
    /// Short description used in logs and errors, e.g. a directory path.
    fn describe(&self) -> String;

    /// All documents of this source, in a stable order.
    fn documents(&self) -> Result<Vec<RawDocument>>;
}

/// Parse one document into records, recording every problem.
pub fn parse_document(
    document: &RawDocument,
    side: Side,
    diagnostics: &mut Diagnostics,
) -> Vec<MeasurementRecord> {
    let text = match &document.contents {
        Ok(text) => text,
        Err(e) => {
            warn!(side = %side, document = %document.id, error = %e, "Skipping unreadable document");
            diagnostics.push(Diagnostic::new(
                side,
                &document.id,
                DiagnosticKind::UnreadableDocument,
                format!("could not read document: {e}"),
            ));
            return Vec::new();
        }
    };

    let entries = match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            warn!(side = %side, document = %document.id, "Skipping document without a top-level array");
            diagnostics.push(Diagnostic::new(
                side,
                &document.id,
                DiagnosticKind::MalformedDocument,
                "expected a JSON array of benchmark results",
            ));
            return Vec::new();
        }
        Err(e) => {
            warn!(side = %side, document = %document.id, error = %e, "Skipping malformed document");
            diagnostics.push(Diagnostic::new(
                side,
                &document.id,
                DiagnosticKind::MalformedDocument,
                format!("invalid JSON: {e}"),
            ));
            return Vec::new();
        }
    };

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match MeasurementRecord::from_json(entry) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(side = %side, document = %document.id, entry = index, error = %e, "Skipping invalid entry");
                diagnostics.push(Diagnostic::new(
                    side,
                    &document.id,
                    DiagnosticKind::InvalidRecord,
                    format!("entry {index}: {e}"),
                ));
            }
        }
    }

    if records.is_empty() {
        warn!(side = %side, document = %document.id, "Document contains no valid entries");
        diagnostics.push(Diagnostic::new(
            side,
            &document.id,
            DiagnosticKind::EmptyDocument,
            "no valid benchmark entries",
        ));
    } else {
        debug!(side = %side, document = %document.id, records = records.len(), "Loaded document");
    }

    records
}

/// Parse a sequence of documents and concatenate their records in order.
pub fn load_documents<I>(
    documents: I,
    side: Side,
    diagnostics: &mut Diagnostics,
) -> Vec<MeasurementRecord>
where
    I: IntoIterator<Item = RawDocument>,
{
    documents
        .into_iter()
        .flat_map(|document| parse_document(&document, side, diagnostics))
        .collect()
}

/// Load every record of one side.
///
/// # Errors
///
/// Returns [`CompareError::EmptyInput`] when the source yields no valid
/// records, and propagates errors from [`DocumentSource::documents`].
pub fn load_side(
    source: &dyn DocumentSource,
    side: Side,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<MeasurementRecord>> {
    let documents = source.documents()?;
    let document_count = documents.len();
    let records = load_documents(documents, side, diagnostics);

    if records.is_empty() {
        return Err(CompareError::EmptyInput {
            side,
            origin: source.describe(),
        });
    }

    info!(
        side = %side,
        source = %source.describe(),
        documents = document_count,
        records = records.len(),
        "Loaded benchmark records"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"[
        {
            "benchmark": "org.acme.Bench.a",
            "mode": "thrpt",
            "threads": 1,
            "forks": 2,
            "measurementIterations": 5,
            "primaryMetric": { "score": 100.0, "scoreUnit": "ops/s" }
        }
    ]"#;

    #[test]
    fn test_malformed_and_valid_document() {
        let mut diagnostics = Diagnostics::new();
        let documents = vec![
            RawDocument::new("broken.json", "[{\"benchmark\": "),
            RawDocument::new("good.json", VALID),
        ];

        let records = load_documents(documents, Side::Baseline, &mut diagnostics);

        assert_eq!(records.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::MalformedDocument);
        assert_eq!(diagnostic.origin, "broken.json");
    }

    #[test]
    fn test_invalid_entries_are_skipped_individually() {
        let text = r#"[
            { "benchmark": "A", "mode": "avgt", "primaryMetric": { "score": 1.5 } },
            { "mode": "avgt", "primaryMetric": { "score": 2.5 } },
            { "benchmark": "C", "mode": "avgt", "primaryMetric": { "score": "NaN" } }
        ]"#;
        let mut diagnostics = Diagnostics::new();
        let document = RawDocument::new("mixed.json", text);
        let records = parse_document(&document, Side::Treatment, &mut diagnostics);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identity.benchmark, "A");
        assert_eq!(diagnostics.count_of(DiagnosticKind::InvalidRecord), 2);
        assert!(diagnostics.iter().any(|d| d.message.starts_with("entry 1:")));
        assert!(diagnostics.iter().any(|d| d.message.starts_with("entry 2:")));
    }

    #[test]
    fn test_negative_scores_become_invalid_records() {
        let text = r#"[
            { "benchmark": "Up", "mode": "thrpt", "primaryMetric": { "score": -10.0 } },
            { "benchmark": "Ok", "mode": "thrpt", "primaryMetric": { "score": 5.0 } }
        ]"#;
        let mut diagnostics = Diagnostics::new();
        let document = RawDocument::new("neg.json", text);
        let records = parse_document(&document, Side::Baseline, &mut diagnostics);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identity.benchmark, "Ok");
        assert_eq!(diagnostics.count_of(DiagnosticKind::InvalidRecord), 1);
        assert!(diagnostics.iter().any(|d| d.message.contains("must not be negative")));
    }

    #[test]
    fn test_empty_and_non_array_documents() {
        let mut diagnostics = Diagnostics::new();
        for (id, text) in [("empty.json", "[]"), ("obj.json", "{}")] {
            let document = RawDocument::new(id, text);
            assert!(parse_document(&document, Side::Baseline, &mut diagnostics).is_empty());
        }

        assert_eq!(diagnostics.count_of(DiagnosticKind::EmptyDocument), 1);
        assert_eq!(diagnostics.count_of(DiagnosticKind::MalformedDocument), 1);
    }

    #[test]
    fn test_unreadable_document() {
        let mut diagnostics = Diagnostics::new();
        let document = RawDocument::unreadable(
            "locked.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        assert!(parse_document(&document, Side::Baseline, &mut diagnostics).is_empty());
        assert_eq!(diagnostics.count_of(DiagnosticKind::UnreadableDocument), 1);
    }

    #[test]
    fn test_load_side_reads_from_source() {
        let mut source = MockDocumentSource::new();
        source.expect_describe().return_const("mock".to_string());
        source
            .expect_documents()
            .times(1)
            .returning(|| Ok(vec![RawDocument::new("good.json", VALID)]));

        let mut diagnostics = Diagnostics::new();
        let records = load_side(&source, Side::Baseline, &mut diagnostics).unwrap();
        assert_eq!(records.len(), 1);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_load_side_without_records_is_terminal() {
        let mut source = MockDocumentSource::new();
        source.expect_describe().return_const("results/treatment".to_string());
        source
            .expect_documents()
            .returning(|| Ok(vec![RawDocument::new("broken.json", "not json")]));

        let mut diagnostics = Diagnostics::new();
        let err = load_side(&source, Side::Treatment, &mut diagnostics).unwrap_err();

        assert!(matches!(
            err,
            CompareError::EmptyInput { side: Side::Treatment, ref origin }
                if origin == "results/treatment"
        ));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_load_side_propagates_source_errors() {
        let mut source = MockDocumentSource::new();
        source.expect_documents().returning(|| {
            Err(CompareError::MissingSource {
                path: "nowhere".into(),
            })
        });

        let mut diagnostics = Diagnostics::new();
        let err = load_side(&source, Side::Baseline, &mut diagnostics).unwrap_err();
        assert!(matches!(err, CompareError::MissingSource { .. }));
    }
}
