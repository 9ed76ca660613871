// crates/compliance-report-config/src/lib.rs
// ============================================================================
// Module: Compliance Report Config Library
// Description: Canonical config model, validation, and collaborator builders.
// Purpose: Single source of truth for compliance-report.toml semantics.
// Dependencies: compliance-report-core, compliance-report-scanners, serde, toml
// ============================================================================

//! ## Overview
//! `compliance-report-config` defines the configuration model for the
//! compliance report engine. It provides strict, fail-closed validation and
//! turns a validated config into the engine's collaborators: report store,
//! resource source, mapper registry, kind policy, and audit sink.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod build;
pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use build::ConfiguredEngine;
pub use config::*;
