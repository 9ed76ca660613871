// crates/compliance-report-core/src/core/audit.rs
// ============================================================================
// Module: Report Audit Events
// Description: Structured audit payloads for report generation runs.
// Purpose: Describe each engine run as a single JSON-serializable event.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! One [`ReportAuditEvent`] is emitted per report generation attempt, whether
//! it succeeded or not. Events carry counts and labels only; scanner payloads
//! are never copied into the audit stream.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome of a report generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOutcome {
    /// Both reports were written.
    Ok,
    /// The run stopped with an error.
    Error,
}

/// What happened to the detail report during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailAction {
    /// A new detail record was created.
    Created,
    /// The existing detail record was updated.
    Updated,
    /// The run stopped before the detail record was written.
    None,
}

/// Report generation audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ReportAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp taken from the engine clock.
    pub timestamp: Timestamp,
    /// Spec name the run was started for.
    pub spec_name: String,
    /// Canonical spec hash (hex) when it could be computed.
    pub spec_hash: Option<String>,
    /// Run outcome.
    pub outcome: ReportOutcome,
    /// Global pass count (zero when the run failed early).
    pub pass_count: u64,
    /// Global fail count (zero when the run failed early).
    pub fail_count: u64,
    /// Number of controls in the spec.
    pub control_count: usize,
    /// Detail report action.
    pub detail_action: DetailAction,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
}

/// Inputs required to construct a report audit event.
pub struct ReportAuditEventParams {
    /// Time the run finished, from the engine clock.
    pub timestamp: Timestamp,
    /// Spec name the run was started for.
    pub spec_name: String,
    /// Canonical spec hash (hex) when it could be computed.
    pub spec_hash: Option<String>,
    /// Run outcome.
    pub outcome: ReportOutcome,
    /// Global pass count.
    pub pass_count: u64,
    /// Global fail count.
    pub fail_count: u64,
    /// Number of controls in the spec.
    pub control_count: usize,
    /// Detail report action.
    pub detail_action: DetailAction,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
}

impl ReportAuditEvent {
    /// Creates a new audit event.
    #[must_use]
    pub fn new(params: ReportAuditEventParams) -> Self {
        Self {
            event: "compliance_report",
            timestamp: params.timestamp,
            spec_name: params.spec_name,
            spec_hash: params.spec_hash,
            outcome: params.outcome,
            pass_count: params.pass_count,
            fail_count: params.fail_count,
            control_count: params.control_count,
            detail_action: params.detail_action,
            error_kind: params.error_kind,
        }
    }
}
