//! Violation records produced by the report ingestor

use std::path::PathBuf;

use serde::Serialize;

/// Severity of a reported violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "info" => Some(Severity::Info),
            "warning" => Some(Severity::Warning),
            "error" => Some(Severity::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic from a violation report.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    /// Line number (1-based).
    pub line: usize,
    /// Column number (1-based); absent for whole-file diagnostics.
    pub column: Option<usize>,
    pub severity: Severity,
    /// Fully-qualified check name or short alias that produced this.
    pub check_id: String,
    pub message: String,
    /// File the enclosing report element named.
    pub file_name: PathBuf,
}

impl Violation {
    pub fn new(
        line: usize,
        column: Option<usize>,
        severity: Severity,
        check_id: impl Into<String>,
        message: impl Into<String>,
        file_name: impl Into<PathBuf>,
    ) -> Self {
        Self {
            line,
            column,
            severity,
            check_id: check_id.into(),
            message: message.into(),
            file_name: file_name.into(),
        }
    }

    /// Whether this violation addresses the given printed position.
    /// A violation without a column matches on line alone.
    pub fn addresses(&self, line: usize, column: usize) -> bool {
        self.line == line && self.column.map_or(true, |c| c == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("error"), Some(Severity::Error));
        assert_eq!(Severity::parse("warning"), Some(Severity::Warning));
        assert_eq!(Severity::parse("info"), Some(Severity::Info));
        assert_eq!(Severity::parse("fatal"), None);
    }

    #[test]
    fn test_addresses_with_and_without_column() {
        let with = Violation::new(2, Some(12), Severity::Error, "c", "m", "A.java");
        assert!(with.addresses(2, 12));
        assert!(!with.addresses(2, 13));

        let without = Violation::new(2, None, Severity::Error, "c", "m", "A.java");
        assert!(without.addresses(2, 12));
        assert!(!without.addresses(3, 12));
    }
}
