// crates/compliance-report-core/src/runtime/upsert.rs
// ============================================================================
// Module: Report Upsert Coordinator
// Description: Builds report updates and reconciles them with stored records.
// Purpose: Apply update-only and create-or-update rules to the two reports.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The summary report is update-only: the caller pre-creates its shell and a
//! missing record is a configuration error. The detail report is
//! create-or-update. Both updates go through the pure merge functions on the
//! record types, so only engine-owned fields change.
//!
//! When global pass and fail totals are both zero the summary's control list
//! is written empty.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::ComplianceSpec;
use crate::core::ComplianceSummary;
use crate::core::ComplianceType;
use crate::core::ControlCheckDetail;
use crate::core::ControlCheckSummary;
use crate::core::DetailAction;
use crate::core::DetailReport;
use crate::core::DetailReportData;
use crate::core::DetailReportUpdate;
use crate::core::SummaryReport;
use crate::core::SummaryReportUpdate;
use crate::core::Timestamp;
use crate::core::detail_report_name;
use crate::interfaces::ReportStore;
use crate::runtime::engine::CancellationFlag;
use crate::runtime::engine::EngineError;
use crate::runtime::totals::SummaryTotals;

// ============================================================================
// SECTION: Update Builders
// ============================================================================

/// Builds the summary report update, suppressing zero-value control lists.
#[must_use]
pub fn build_summary_update(
    spec: &ComplianceSpec,
    labels: BTreeMap<String, String>,
    totals: SummaryTotals,
    summaries: Vec<ControlCheckSummary>,
    stamped_at: Timestamp,
) -> SummaryReportUpdate {
    let control_checks = if totals.is_zero() { Vec::new() } else { summaries };
    SummaryReportUpdate {
        labels,
        spec: spec.clone(),
        summary: ComplianceSummary::from(totals),
        control_checks,
        stamped_at,
    }
}

/// Builds the detail report update.
#[must_use]
pub fn build_detail_update(
    spec: &ComplianceSpec,
    labels: BTreeMap<String, String>,
    totals: SummaryTotals,
    details: Vec<ControlCheckDetail>,
    stamped_at: Timestamp,
) -> DetailReportUpdate {
    DetailReportUpdate {
        labels,
        report: DetailReportData {
            update_timestamp: Some(stamped_at),
            summary: ComplianceSummary::from(totals),
            compliance_type: ComplianceType {
                kind: spec.kind.to_lowercase(),
                name: detail_report_name(&spec.name),
                description: spec.description.to_lowercase(),
                version: spec.version.clone(),
            },
            control_checks: details,
        },
        stamped_at,
    }
}

// ============================================================================
// SECTION: Reconciliation
// ============================================================================

/// Creates or updates the detail report.
///
/// Load failures other than not-found abort the run.
///
/// # Errors
///
/// Returns [`EngineError::Store`] when a store call fails and
/// [`EngineError::Cancelled`] when the run is cancelled.
pub fn upsert_detail<S>(
    store: &S,
    name: &str,
    update: DetailReportUpdate,
    cancel: &CancellationFlag,
) -> Result<(DetailReport, DetailAction), EngineError>
where
    S: ReportStore + ?Sized,
{
    cancel.check()?;
    let existing = store.load_detail(name)?;
    cancel.check()?;
    match existing {
        Some(existing) => {
            let stored = store.update_detail(&existing.merged(update))?;
            Ok((stored, DetailAction::Updated))
        }
        None => {
            let stored = store.create_detail(&DetailReport::from_update(name, update))?;
            Ok((stored, DetailAction::Created))
        }
    }
}

/// Updates the pre-created summary report.
///
/// # Errors
///
/// Returns [`EngineError::MissingReport`] when no summary record exists,
/// [`EngineError::Store`] when a store call fails, and
/// [`EngineError::Cancelled`] when the run is cancelled.
pub fn update_summary<S>(
    store: &S,
    name: &str,
    update: SummaryReportUpdate,
    cancel: &CancellationFlag,
) -> Result<SummaryReport, EngineError>
where
    S: ReportStore + ?Sized,
{
    cancel.check()?;
    let existing =
        store.load_summary(name)?.ok_or_else(|| EngineError::MissingReport(name.to_string()))?;
    cancel.check()?;
    Ok(store.update_summary(&existing.merged(update))?)
}
