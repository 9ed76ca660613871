// crates/compliance-report-core/src/core/mod.rs
// ============================================================================
// Module: Compliance Report Core Types
// Description: Canonical compliance spec, scan result, and report structures.
// Purpose: Provide stable, serializable types shared by every pipeline stage.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Core types define the compliance specification, the raw per-check results
//! produced by scanner mappers, the derived per-control summaries and details,
//! and the two persisted report records. These types are the canonical source
//! of truth for storage backends and configuration.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod hashing;
pub mod identifiers;
pub mod report;
pub mod results;
pub mod spec;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::DetailAction;
pub use audit::ReportAuditEvent;
pub use audit::ReportAuditEventParams;
pub use audit::ReportOutcome;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use identifiers::CheckId;
pub use identifiers::ControlId;
pub use identifiers::ScannerId;
pub use report::ComplianceSummary;
pub use report::ComplianceType;
pub use report::ControlCheckDetail;
pub use report::ControlCheckSummary;
pub use report::DetailReport;
pub use report::DetailReportData;
pub use report::DetailReportUpdate;
pub use report::RecordMeta;
pub use report::ReportRecord;
pub use report::ReportStatus;
pub use report::ScannerCheckResult;
pub use report::SummaryReport;
pub use report::SummaryReportUpdate;
pub use report::detail_report_name;
pub use report::summary_report_name;
pub use results::CheckResultMap;
pub use results::CheckStatus;
pub use results::ResourceList;
pub use results::ResultDetail;
pub use results::ScanResult;
pub use spec::Check;
pub use spec::ComplianceSpec;
pub use spec::Control;
pub use spec::Mapping;
pub use spec::Severity;
pub use spec::SpecError;
pub use time::Clock;
pub use time::FixedClock;
pub use time::SystemClock;
pub use time::Timestamp;
