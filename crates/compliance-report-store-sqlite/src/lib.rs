// crates/compliance-report-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Report Store
// Description: Durable ReportStore backend using SQLite WAL.
// Purpose: Provide production-grade persistence for compliance reports.
// Dependencies: compliance-report-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`ReportStore`] implementation that
//! persists canonical report snapshots in a versioned history table keyed by
//! record kind and name. Updates are compare-and-swap on the record revision,
//! and loads verify integrity hashes before deserializing.
//!
//! [`ReportStore`]: compliance_report_core::ReportStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_REPORT_BYTES;
pub use store::SqliteReportStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
