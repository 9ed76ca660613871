// crates/compliance-report-core/src/runtime/mod.rs
// ============================================================================
// Module: Compliance Report Runtime
// Description: Report pipeline stages, engine, and in-memory collaborators.
// Purpose: Turn a compliance spec plus scanner output into persisted reports.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the pipeline stages in dependency order
//! (indexer, collector, aggregator, reducer, upsert coordinator) and the
//! [`ComplianceEngine`] that drives them. All callers must go through the
//! engine so every run follows the same ordering and audit rules.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod aggregate;
pub mod audit;
pub mod collector;
pub mod engine;
pub mod index;
pub mod kinds;
pub mod store;
pub mod totals;
pub mod upsert;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use aggregate::Aggregation;
pub use aggregate::aggregate;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use collector::CheckResultTable;
pub use collector::collect_results;
pub use engine::CancellationFlag;
pub use engine::ComplianceEngine;
pub use engine::EngineConfig;
pub use engine::EngineError;
pub use engine::SPEC_HASH_LABEL;
pub use index::SpecIndex;
pub use kinds::CONFIG_AUDIT_SCANNER;
pub use kinds::KUBE_BENCH_SCANNER;
pub use kinds::KindPolicy;
pub use kinds::NODE_KIND;
pub use kinds::ScannerKindPolicy;
pub use kinds::WORKLOAD_KIND;
pub use kinds::WORKLOAD_KINDS;
pub use store::InMemoryReportStore;
pub use store::InMemoryResourceSource;
pub use store::SharedReportStore;
pub use totals::SummaryTotals;
pub use upsert::build_detail_update;
pub use upsert::build_summary_update;
pub use upsert::update_summary;
pub use upsert::upsert_detail;
