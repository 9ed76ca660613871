// crates/compliance-report-core/src/runtime/totals.rs
// ============================================================================
// Module: Totals Reducer
// Description: Global pass/fail totals across control summaries.
// Purpose: Reduce per-control totals into the report-level summary.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Pure reduction with no failure modes; zero summaries reduce to `(0, 0)`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ComplianceSummary;
use crate::core::ControlCheckSummary;

// ============================================================================
// SECTION: Totals
// ============================================================================

/// Global totals accumulated over control summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SummaryTotals {
    /// Sum of control pass totals.
    pub pass_count: u64,
    /// Sum of control fail totals.
    pub fail_count: u64,
}

impl SummaryTotals {
    /// Sums pass and fail totals across summaries.
    #[must_use]
    pub fn reduce(summaries: &[ControlCheckSummary]) -> Self {
        summaries.iter().fold(Self::default(), |totals, summary| Self {
            pass_count: totals.pass_count.saturating_add(summary.pass_total),
            fail_count: totals.fail_count.saturating_add(summary.fail_total),
        })
    }

    /// Returns true when nothing passed or failed.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.pass_count == 0 && self.fail_count == 0
    }
}

impl From<SummaryTotals> for ComplianceSummary {
    fn from(totals: SummaryTotals) -> Self {
        Self {
            pass_count: totals.pass_count,
            fail_count: totals.fail_count,
        }
    }
}
