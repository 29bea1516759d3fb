use std::fmt;

use serde::Serialize;

/// Pipeline stage that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Layout,
    Zones,
    Greenways,
    Routing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Layout => "layout",
            Self::Zones => "zones",
            Self::Greenways => "greenways",
            Self::Routing => "routing",
        };
        f.write_str(s)
    }
}

/// How critical a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Invalidates the result.
    Error,
    /// Non-fatal; the result is usable but degraded.
    Warning,
    /// Summary counts and progress notes.
    Info,
}

/// A single validation finding.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub stage: Stage,
    pub severity: Severity,
    pub message: String,
}

/// Cumulative three-severity validation report.
///
/// Every stage appends findings and keeps processing its remaining items,
/// so one run yields a complete diagnostic pass. Any error marks the whole
/// report invalid; warnings and info never do.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub valid: bool,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub info: Vec<Finding>,
}

impl Report {
    /// Creates an empty, valid report.
    #[must_use]
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
        }
    }

    /// Adds an error finding and marks the report invalid.
    pub fn error(&mut self, stage: Stage, message: impl Into<String>) {
        self.errors.push(Finding {
            stage,
            severity: Severity::Error,
            message: message.into(),
        });
        self.valid = false;
    }

    /// Adds a warning finding.
    pub fn warning(&mut self, stage: Stage, message: impl Into<String>) {
        self.warnings.push(Finding {
            stage,
            severity: Severity::Warning,
            message: message.into(),
        });
    }

    /// Adds an informational finding.
    pub fn info(&mut self, stage: Stage, message: impl Into<String>) {
        self.info.push(Finding {
            stage,
            severity: Severity::Info,
            message: message.into(),
        });
    }

    /// Merges another report into this one, combining validity.
    pub fn merge(&mut self, other: Report) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.info.extend(other.info);
        self.valid &= other.valid;
    }

    /// Returns a one-line count summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} errors, {} warnings, {} info",
            self.errors.len(),
            self.warnings.len(),
            self.info.len()
        )
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_report_is_valid() {
        let report = Report::new();
        assert!(report.valid);
        assert_eq!(report.summary(), "0 errors, 0 warnings, 0 info");
    }

    #[test]
    fn error_invalidates() {
        let mut report = Report::new();
        report.error(Stage::Layout, "empty cell");
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn warnings_do_not_invalidate() {
        let mut report = Report::new();
        report.warning(Stage::Layout, "coverage low");
        report.info(Stage::Routing, "routed 42 segments");
        assert!(report.valid);
        assert_eq!(report.summary(), "0 errors, 1 warnings, 1 info");
    }

    #[test]
    fn merge_combines_validity_and_findings() {
        let mut a = Report::new();
        a.info(Stage::Layout, "laid out 6 pods");
        let mut b = Report::new();
        b.error(Stage::Routing, "no junctions");
        a.merge(b);
        assert!(!a.valid);
        assert_eq!(a.errors.len(), 1);
        assert_eq!(a.info.len(), 1);
    }
}
