//! Run results and reporting
//!
//! [`RunResult`] is the triple returned by a single target run. A
//! [`RunReport`] collects one [`TargetReport`] per target for console and
//! JSON output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate counts of a run
///
/// `total_field_assignments` always equals `total_records * field_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Fields configured for the target
    pub field_count: usize,

    /// Records processed across all pages
    pub total_records: usize,

    /// Field assignments performed across all pages
    pub total_field_assignments: usize,
}

impl RunResult {
    /// Empty result for a target with `field_count` fields
    pub fn new(field_count: usize) -> Self {
        Self {
            field_count,
            total_records: 0,
            total_field_assignments: 0,
        }
    }

    /// Adds one page's counts
    pub fn add_page(&mut self, records: usize, assignments: usize) {
        self.total_records += records;
        self.total_field_assignments += assignments;
    }

    /// Checks the assignments invariant
    pub fn is_consistent(&self) -> bool {
        self.total_field_assignments == self.total_records * self.field_count
    }

    /// `(field_count, total_records, total_field_assignments)`
    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (
            self.field_count,
            self.total_records,
            self.total_field_assignments,
        )
    }
}

/// Outcome of one target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetReport {
    /// Target name
    pub name: String,

    /// Model (table) name
    pub model: String,

    /// Counts
    pub result: RunResult,

    /// Pages processed
    pub pages: usize,

    /// Whether persistence was skipped
    pub dry_run: bool,

    /// Wall-clock time in milliseconds
    pub elapsed_ms: u64,
}

/// Outcome of a whole invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the first target started
    pub started_at: DateTime<Utc>,

    /// When the last target finished
    pub finished_at: Option<DateTime<Utc>>,

    /// Whether persistence was skipped
    pub dry_run: bool,

    /// Per-target outcomes, in run order
    pub targets: Vec<TargetReport>,
}

impl RunReport {
    /// Starts a new report
    pub fn new(dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            dry_run,
            targets: Vec::new(),
        }
    }

    /// Records a finished target
    pub fn add_target(&mut self, target: TargetReport) {
        self.targets.push(target);
    }

    /// Marks the report finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Records across all targets
    pub fn total_records(&self) -> usize {
        self.targets.iter().map(|t| t.result.total_records).sum()
    }

    /// Field assignments across all targets
    pub fn total_field_assignments(&self) -> usize {
        self.targets
            .iter()
            .map(|t| t.result.total_field_assignments)
            .sum()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            targets = self.targets.len(),
            total_records = self.total_records(),
            total_field_assignments = self.total_field_assignments(),
            dry_run = self.dry_run,
            "Anonymization completed"
        );
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        if self.dry_run {
            output.push_str("              ANONYMIZATION REPORT (DRY RUN)                   \n");
        } else {
            output.push_str("                    ANONYMIZATION REPORT                       \n");
        }
        output.push_str("═══════════════════════════════════════════════════════════════\n");

        for target in &self.targets {
            output.push_str(&format!("\n  {} ({})\n", target.name, target.model));
            output.push_str(&format!("    Fields:             {}\n", target.result.field_count));
            output.push_str(&format!("    Records:            {}\n", target.result.total_records));
            output.push_str(&format!(
                "    Field assignments:  {}\n",
                target.result.total_field_assignments
            ));
            output.push_str(&format!("    Pages:              {}\n", target.pages));
            output.push_str(&format!("    Elapsed:            {} ms\n", target.elapsed_ms));
        }

        output.push_str("\n───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("  Total records:           {}\n", self.total_records()));
        output.push_str(&format!(
            "  Total field assignments: {}\n",
            self.total_field_assignments()
        ));
        output.push_str("═══════════════════════════════════════════════════════════════\n");

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(name: &str, records: usize, fields: usize) -> TargetReport {
        let mut result = RunResult::new(fields);
        result.add_page(records, records * fields);
        TargetReport {
            name: name.to_string(),
            model: name.to_string(),
            result,
            pages: 1,
            dry_run: false,
            elapsed_ms: 3,
        }
    }

    #[test]
    fn test_run_result_accumulates() {
        let mut result = RunResult::new(2);
        result.add_page(2, 4);
        result.add_page(2, 4);
        result.add_page(1, 2);
        assert_eq!(result.as_tuple(), (2, 5, 10));
        assert!(result.is_consistent());
    }

    #[test]
    fn test_run_result_inconsistent() {
        let mut result = RunResult::new(2);
        result.add_page(3, 5);
        assert!(!result.is_consistent());
    }

    #[test]
    fn test_report_totals() {
        let mut report = RunReport::new(false);
        report.add_target(target("users", 10, 3));
        report.add_target(target("orders", 4, 1));
        report.finish();

        assert_eq!(report.total_records(), 14);
        assert_eq!(report.total_field_assignments(), 34);
        assert!(report.finished_at.is_some());
    }

    #[test]
    fn test_format_console() {
        let mut report = RunReport::new(true);
        report.add_target(target("users", 10, 3));

        let output = report.format_console();
        assert!(output.contains("DRY RUN"));
        assert!(output.contains("users (users)"));
        assert!(output.contains("Total records:           10"));
    }

    #[test]
    fn test_format_json() {
        let mut report = RunReport::new(false);
        report.add_target(target("users", 2, 2));

        let json = report.format_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["targets"][0]["result"]["total_field_assignments"], 4);
    }
}
