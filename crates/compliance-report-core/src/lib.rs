// crates/compliance-report-core/src/lib.rs
// ============================================================================
// Module: Compliance Report Core Library
// Description: Public API surface for the compliance report core.
// Purpose: Expose core types, collaborator interfaces, and runtime pipeline.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Compliance report core aggregates per-resource scanner check results into
//! pass/fail totals per control and persists two report artifacts: a summary
//! report and a detail report. Scanners, resource acquisition, and storage are
//! reached only through the traits in [`interfaces`], so the core stays
//! backend-agnostic and deterministic.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::MapperError;
pub use interfaces::MapperResolver;
pub use interfaces::ReportAuditSink;
pub use interfaces::ReportStore;
pub use interfaces::ResourceSource;
pub use interfaces::ResultMapper;
pub use interfaces::SourceError;
pub use interfaces::StoreError;
pub use runtime::CancellationFlag;
pub use runtime::CheckResultTable;
pub use runtime::ComplianceEngine;
pub use runtime::EngineConfig;
pub use runtime::EngineError;
pub use runtime::FileAuditSink;
pub use runtime::InMemoryReportStore;
pub use runtime::InMemoryResourceSource;
pub use runtime::KindPolicy;
pub use runtime::SPEC_HASH_LABEL;
pub use runtime::NoopAuditSink;
pub use runtime::ScannerKindPolicy;
pub use runtime::SharedReportStore;
pub use runtime::SpecIndex;
pub use runtime::StderrAuditSink;
pub use runtime::SummaryTotals;

#[cfg(test)]
mod tests {
    //! Test-only lint relaxations for panic-based assertions and debug output.
    #![allow(
        clippy::panic,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::use_debug,
        clippy::dbg_macro,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        reason = "Test-only output and panic-based assertions are permitted."
    )]
}
