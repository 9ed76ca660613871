// crates/compliance-report-core/src/runtime/aggregate.rs
// ============================================================================
// Module: Control Aggregator
// Description: Per-control totals and per-check detail records.
// Purpose: Fold merged scanner results into control summaries and details.
// Dependencies: crate::{core, runtime}
// ============================================================================

//! ## Overview
//! One pass over the indexed controls builds both outputs:
//! - one [`ControlCheckSummary`] per indexed control, even with zero totals;
//! - one [`ControlCheckDetail`] per (control, check) pair with at least one
//!   result. A control with N resolving checks yields N details.
//!
//! Warn counts toward the pass total and Info counts toward neither.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ControlCheckDetail;
use crate::core::ControlCheckSummary;
use crate::core::ScannerCheckResult;
use crate::runtime::collector::CheckResultTable;
use crate::runtime::index::SpecIndex;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Aggregation output for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// Per-control totals in control order.
    pub summaries: Vec<ControlCheckSummary>,
    /// Per-(control, check) details in control then check order.
    pub details: Vec<ControlCheckDetail>,
}

// ============================================================================
// SECTION: Aggregation
// ============================================================================

/// Aggregates merged results against the indexed controls.
#[must_use]
pub fn aggregate(index: &SpecIndex, table: &CheckResultTable) -> Aggregation {
    let mut aggregation = Aggregation::default();
    for control_id in index.control_order() {
        // Controls missing from the metadata index are dropped.
        let Some(control) = index.control(control_id) else {
            continue;
        };
        let mut pass_total = 0_u64;
        let mut fail_total = 0_u64;
        for check_id in index.checks_of(control_id) {
            let results = table.results_for(check_id);
            if results.is_empty() {
                continue;
            }
            for detail in results.iter().flat_map(|result| result.details.iter()) {
                if detail.status.counts_as_pass() {
                    pass_total = pass_total.saturating_add(1);
                } else if detail.status.counts_as_fail() {
                    fail_total = fail_total.saturating_add(1);
                }
            }
            aggregation.details.push(ControlCheckDetail {
                id: control.id.clone(),
                name: control.name.clone(),
                description: control.description.clone(),
                severity: control.severity,
                scanner_check_results: results.iter().map(ScannerCheckResult::from).collect(),
            });
        }
        aggregation.summaries.push(ControlCheckSummary {
            id: control.id.clone(),
            name: control.name.clone(),
            description: control.description.clone(),
            severity: control.severity,
            pass_total,
            fail_total,
        });
    }
    aggregation
}
