use serde::Serialize;

use crate::error::ExtractionError;

/// Condition met while extracting from one source node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionIssue {
    /// Zero-based position of the list item or message node, in document order
    pub index: usize,
    pub error: ExtractionError,
}

/// Result of one extraction call
///
/// `records` holds everything that could be emitted. `issues` lists every condition met,
/// both the ones answered with a sentinel or default and the ones that caused a node to be
/// skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionReport<T> {
    pub records: Vec<T>,
    pub issues: Vec<ExtractionIssue>,
}

impl<T> ExtractionReport<T> {
    pub fn new() -> Self {
        Self { records: Vec::new(), issues: Vec::new() }
    }

    pub fn push_issue(&mut self, index: usize, error: ExtractionError) {
        self.issues.push(ExtractionIssue { index, error });
    }

    /// True when no issue of any kind was recorded
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

impl<T> Default for ExtractionReport<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_tracks_issues() {
        let mut report: ExtractionReport<u32> = ExtractionReport::new();
        assert!(report.is_clean());

        report.records.push(7);
        report.push_issue(3, ExtractionError::MissingTimestamp);

        assert!(!report.is_clean());
        assert_eq!(report.issues[0].index, 3);
        assert_eq!(report.into_records(), vec![7]);
    }

    #[test]
    fn test_report_serialization() {
        let mut report: ExtractionReport<&str> = ExtractionReport::new();
        report.records.push("a");
        report.push_issue(0, ExtractionError::MissingContent);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "records": ["a"],
                "issues": [{"index": 0, "error": {"kind": "missing_content"}}]
            })
        );
    }
}
