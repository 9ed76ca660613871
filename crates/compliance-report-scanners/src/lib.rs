// crates/compliance-report-scanners/src/lib.rs
// ============================================================================
// Module: Compliance Report Scanners
// Description: Built-in scanner result mappers and resource sources.
// Purpose: Translate scanner report objects into common check results.
// Dependencies: compliance-report-core, serde, serde_json, serde_yaml
// ============================================================================

//! ## Overview
//! This crate ships the built-in result mappers (`kube-bench`, `config-audit`),
//! a [`MapperRegistry`] that resolves mappers by scanner identity, and a
//! [`FileResourceSource`] that reads scanner report objects from disk.
//! Report objects are untrusted input: mappers skip what they cannot parse and
//! the file source enforces path and size limits.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config_audit;
pub mod file_source;
pub mod kube_bench;
pub mod registry;
pub mod resource;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config_audit::ConfigAuditMapper;
pub use file_source::FileResourceSource;
pub use file_source::FileResourceSourceConfig;
pub use kube_bench::KubeBenchMapper;
pub use registry::MapperRegistry;
pub use resource::ObjectMeta;
