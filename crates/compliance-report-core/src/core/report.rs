// crates/compliance-report-core/src/core/report.rs
// ============================================================================
// Module: Compliance Reports
// Description: Derived control summaries/details and the persisted report records.
// Purpose: Define report shapes and the pure merge rules used for upserts.
// Dependencies: crate::core::{identifiers, results, spec, time}, serde
// ============================================================================

//! ## Overview
//! Two records are persisted per spec: a [`SummaryReport`] keyed by the
//! lowercase spec name and a [`DetailReport`] keyed by the lowercase
//! `<spec-name>-details`. Both are owned by the storage layer; the engine only
//! replaces the fields it owns through [`SummaryReport::merged`] and
//! [`DetailReport::merged`], leaving every other field (annotations, revision)
//! exactly as stored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::CheckId;
use crate::core::identifiers::ControlId;
use crate::core::results::ResultDetail;
use crate::core::results::ScanResult;
use crate::core::spec::ComplianceSpec;
use crate::core::spec::Severity;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Record Names
// ============================================================================

/// Suffix appended to the spec name for the detail report record.
const DETAIL_REPORT_SUFFIX: &str = "details";

/// Returns the summary report record name for a spec name.
#[must_use]
pub fn summary_report_name(spec_name: &str) -> String {
    spec_name.to_lowercase()
}

/// Returns the detail report record name for a spec name.
#[must_use]
pub fn detail_report_name(spec_name: &str) -> String {
    format!("{spec_name}-{DETAIL_REPORT_SUFFIX}").to_lowercase()
}

// ============================================================================
// SECTION: Record Metadata
// ============================================================================

/// Metadata shared by persisted report records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordMeta {
    /// Record name (storage key).
    pub name: String,
    /// Labels owned by the engine; replaced on every run.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Annotations owned by other writers; never modified by the engine.
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    /// Store-managed revision used for optimistic concurrency.
    #[serde(default)]
    pub revision: u64,
}

impl RecordMeta {
    /// Creates metadata for a new record.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Persisted record with store-managed metadata.
pub trait ReportRecord: Clone {
    /// Stable record kind label used by storage backends.
    const RECORD_KIND: &'static str;

    /// Returns the record metadata.
    fn metadata(&self) -> &RecordMeta;

    /// Returns mutable record metadata.
    fn metadata_mut(&mut self) -> &mut RecordMeta;
}

impl ReportRecord for SummaryReport {
    const RECORD_KIND: &'static str = "summary";

    fn metadata(&self) -> &RecordMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut RecordMeta {
        &mut self.metadata
    }
}

impl ReportRecord for DetailReport {
    const RECORD_KIND: &'static str = "detail";

    fn metadata(&self) -> &RecordMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut RecordMeta {
        &mut self.metadata
    }
}

// ============================================================================
// SECTION: Control Summaries
// ============================================================================

/// Global pass/fail counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComplianceSummary {
    /// Number of passing (or warning) detail records.
    pub pass_count: u64,
    /// Number of failing detail records.
    pub fail_count: u64,
}

/// Aggregated totals for one control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlCheckSummary {
    /// Control identifier.
    pub id: ControlId,
    /// Control name.
    pub name: String,
    /// Control description.
    pub description: String,
    /// Control severity.
    pub severity: Severity,
    /// Count of details with status Pass or Warn.
    pub pass_total: u64,
    /// Count of details with status Fail.
    pub fail_total: u64,
}

/// Status block of the summary report.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportStatus {
    /// Time of the last engine update; `None` on a freshly created shell.
    #[serde(default)]
    pub update_timestamp: Option<Timestamp>,
    /// Global totals.
    #[serde(default)]
    pub summary: ComplianceSummary,
    /// Per-control totals; empty whenever both global totals are zero.
    #[serde(default)]
    pub control_checks: Vec<ControlCheckSummary>,
}

/// Persisted summary report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Record metadata.
    pub metadata: RecordMeta,
    /// Snapshot of the spec the status was computed from.
    pub spec: ComplianceSpec,
    /// Computed status.
    #[serde(default)]
    pub status: ReportStatus,
}

impl SummaryReport {
    /// Creates the empty shell record a caller pre-creates for a spec.
    #[must_use]
    pub fn shell(spec: ComplianceSpec) -> Self {
        Self {
            metadata: RecordMeta::new(summary_report_name(&spec.name)),
            spec,
            status: ReportStatus::default(),
        }
    }

    /// Returns a copy of `self` with only the engine-owned fields replaced.
    ///
    /// Labels, spec, and status come from `update`; the update timestamp is
    /// forced strictly past the stored one. Name, annotations, and revision are
    /// kept from `self`.
    #[must_use]
    pub fn merged(&self, update: SummaryReportUpdate) -> Self {
        let mut copied = self.clone();
        copied.metadata.labels = update.labels;
        copied.spec = update.spec;
        copied.status = ReportStatus {
            update_timestamp: Some(update.stamped_at.after(self.status.update_timestamp)),
            summary: update.summary,
            control_checks: update.control_checks,
        };
        copied
    }
}

/// Engine-owned fields written into a summary report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryReportUpdate {
    /// Labels to set.
    pub labels: BTreeMap<String, String>,
    /// Spec snapshot.
    pub spec: ComplianceSpec,
    /// Global totals.
    pub summary: ComplianceSummary,
    /// Per-control totals (already suppressed when totals are zero).
    pub control_checks: Vec<ControlCheckSummary>,
    /// Candidate update timestamp.
    pub stamped_at: Timestamp,
}

// ============================================================================
// SECTION: Control Details
// ============================================================================

/// Verbatim copy of one scanner result inside a detail report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerCheckResult {
    /// Check identifier.
    pub id: CheckId,
    /// Object type the check applies to.
    pub object_type: String,
    /// Remediation guidance.
    pub remediation: String,
    /// Per-resource details.
    pub details: Vec<ResultDetail>,
}

impl From<&ScanResult> for ScannerCheckResult {
    fn from(result: &ScanResult) -> Self {
        Self {
            id: result.id.clone(),
            object_type: result.object_type.clone(),
            remediation: result.remediation.clone(),
            details: result.details.clone(),
        }
    }
}

/// Full-fidelity results for one (control, check) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlCheckDetail {
    /// Control identifier.
    pub id: ControlId,
    /// Control name.
    pub name: String,
    /// Control description.
    pub description: String,
    /// Control severity.
    pub severity: Severity,
    /// Results of the check, one per contributing scanner result.
    pub scanner_check_results: Vec<ScannerCheckResult>,
}

/// Identity of the spec a detail report was produced from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComplianceType {
    /// Lowercase spec kind.
    pub kind: String,
    /// Detail report name.
    pub name: String,
    /// Lowercase spec description.
    pub description: String,
    /// Spec version.
    pub version: String,
}

/// Report block of the detail report.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DetailReportData {
    /// Time of the last engine update.
    #[serde(default)]
    pub update_timestamp: Option<Timestamp>,
    /// Global totals.
    #[serde(default)]
    pub summary: ComplianceSummary,
    /// Spec identity.
    #[serde(rename = "type", default)]
    pub compliance_type: ComplianceType,
    /// Details per (control, check) pair with results.
    #[serde(default)]
    pub control_checks: Vec<ControlCheckDetail>,
}

/// Persisted detail report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailReport {
    /// Record metadata.
    pub metadata: RecordMeta,
    /// Report contents.
    #[serde(default)]
    pub report: DetailReportData,
}

impl DetailReport {
    /// Builds a brand-new record from an update.
    #[must_use]
    pub fn from_update(name: impl Into<String>, update: DetailReportUpdate) -> Self {
        let mut metadata = RecordMeta::new(name);
        metadata.labels = update.labels;
        let mut report = update.report;
        report.update_timestamp = Some(update.stamped_at);
        Self {
            metadata,
            report,
        }
    }

    /// Returns a copy of `self` with only labels and report replaced.
    #[must_use]
    pub fn merged(&self, update: DetailReportUpdate) -> Self {
        let mut copied = self.clone();
        copied.metadata.labels = update.labels;
        copied.report = update.report;
        copied.report.update_timestamp =
            Some(update.stamped_at.after(self.report.update_timestamp));
        copied
    }
}

/// Engine-owned fields written into a detail report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailReportUpdate {
    /// Labels to set.
    pub labels: BTreeMap<String, String>,
    /// Report contents; its timestamp is overwritten on write.
    pub report: DetailReportData,
    /// Candidate update timestamp.
    pub stamped_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::ComplianceSummary;
    use super::DetailReport;
    use super::DetailReportData;
    use super::DetailReportUpdate;
    use super::SummaryReport;
    use super::SummaryReportUpdate;
    use super::detail_report_name;
    use super::summary_report_name;
    use crate::core::spec::ComplianceSpec;
    use crate::core::time::Timestamp;

    fn spec(name: &str) -> ComplianceSpec {
        ComplianceSpec {
            name: name.to_string(),
            kind: "Compliance".to_string(),
            description: "Bench".to_string(),
            version: "1.0".to_string(),
            controls: Vec::new(),
        }
    }

    #[test]
    fn record_names_are_lowercase() {
        assert_eq!(summary_report_name("CIS-1.5"), "cis-1.5");
        assert_eq!(detail_report_name("CIS-1.5"), "cis-1.5-details");
    }

    #[test]
    fn summary_merge_keeps_foreign_fields() {
        let mut existing = SummaryReport::shell(spec("NSA"));
        existing.metadata.annotations.insert("owner".to_string(), "platform".to_string());
        existing.metadata.labels.insert("stale".to_string(), "yes".to_string());
        existing.metadata.revision = 7;
        existing.status.update_timestamp = Some(Timestamp::UnixMillis(500));

        let labels = BTreeMap::from([("fresh".to_string(), "yes".to_string())]);
        let merged = existing.merged(SummaryReportUpdate {
            labels: labels.clone(),
            spec: spec("nsa"),
            summary: ComplianceSummary {
                pass_count: 3,
                fail_count: 1,
            },
            control_checks: Vec::new(),
            stamped_at: Timestamp::UnixMillis(100),
        });

        assert_eq!(merged.metadata.name, "nsa");
        assert_eq!(merged.metadata.revision, 7);
        assert_eq!(merged.metadata.annotations, existing.metadata.annotations);
        assert_eq!(merged.metadata.labels, labels);
        assert_eq!(merged.spec.name, "nsa");
        assert_eq!(merged.status.summary.pass_count, 3);
        assert_eq!(merged.status.update_timestamp, Some(Timestamp::UnixMillis(501)));
    }

    #[test]
    fn detail_merge_replaces_report_and_advances_timestamp() {
        let created = DetailReport::from_update(
            "nsa-details",
            DetailReportUpdate {
                labels: BTreeMap::new(),
                report: DetailReportData::default(),
                stamped_at: Timestamp::Logical(4),
            },
        );
        assert_eq!(created.report.update_timestamp, Some(Timestamp::Logical(4)));

        let mut report = DetailReportData::default();
        report.summary.fail_count = 2;
        let merged = created.merged(DetailReportUpdate {
            labels: BTreeMap::new(),
            report,
            stamped_at: Timestamp::Logical(4),
        });
        assert_eq!(merged.report.summary.fail_count, 2);
        assert_eq!(merged.report.update_timestamp, Some(Timestamp::Logical(5)));
        assert_eq!(merged.metadata.name, "nsa-details");
    }
}
