// crates/compliance-report-core/src/core/spec.rs
// ============================================================================
// Module: Compliance Specification
// Description: Declarative controls bound to a scanner and a set of checks.
// Purpose: Define the immutable input of one aggregation run with validation.
// Dependencies: crate::core::{hashing, identifiers}, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`ComplianceSpec`] lists controls. Each control is bound to exactly one
//! scanner identity through its [`Mapping`] and names the scanner checks that
//! evidence it. Specs are immutable for the duration of a run.
//!
//! Duplicate control ids are accepted on purpose: the indexer resolves them
//! with last-write-wins for metadata and append for check lists.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::hashing::DEFAULT_HASH_ALGORITHM;
use crate::core::hashing::HashDigest;
use crate::core::hashing::HashError;
use crate::core::hashing::hash_canonical_json;
use crate::core::identifiers::CheckId;
use crate::core::identifiers::ControlId;
use crate::core::identifiers::ScannerId;

// ============================================================================
// SECTION: Compliance Specification
// ============================================================================

/// Canonical compliance specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSpec {
    /// Spec name; the lowercase form keys both persisted reports.
    pub name: String,
    /// Spec kind (for example `compliance`).
    #[serde(default)]
    pub kind: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Spec version string.
    #[serde(default)]
    pub version: String,
    /// Controls in declaration order.
    #[serde(default)]
    pub controls: Vec<Control>,
}

impl ComplianceSpec {
    /// Computes the canonical hash of the spec.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Canonicalization`] when serialization fails.
    pub fn canonical_hash(&self) -> Result<HashDigest, HashError> {
        hash_canonical_json(DEFAULT_HASH_ALGORITHM, self)
    }

    /// Validates the spec invariants required to key and route a run.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] when validation fails.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.name.trim().is_empty() {
            return Err(SpecError::MissingName);
        }
        for control in &self.controls {
            if control.id.as_str().trim().is_empty() {
                return Err(SpecError::MissingControlId);
            }
            if control.mapping.scanner.as_str().trim().is_empty() {
                return Err(SpecError::MissingScanner(control.id.to_string()));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Controls
// ============================================================================

/// A named compliance requirement evidenced by scanner checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    /// Control identifier.
    pub id: ControlId,
    /// Control name.
    #[serde(default)]
    pub name: String,
    /// Control description.
    #[serde(default)]
    pub description: String,
    /// Declared resource kinds (for example `Workload` or `Node`).
    ///
    /// The kinds actually fetched are derived from these by a kind policy.
    #[serde(default)]
    pub kinds: Vec<String>,
    /// Scanner binding for the control.
    pub mapping: Mapping,
    /// Control severity.
    #[serde(default)]
    pub severity: Severity,
}

/// Binding of a control to one scanner and its checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// Scanner identity.
    pub scanner: ScannerId,
    /// Checks in declaration order; duplicates are preserved.
    #[serde(default)]
    pub checks: Vec<Check>,
}

/// Reference to a scanner check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    /// Check identifier.
    pub id: CheckId,
}

/// Control severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Critical severity.
    Critical,
    /// High severity.
    High,
    /// Medium severity.
    Medium,
    /// Low severity.
    Low,
    /// Severity not stated.
    #[default]
    Unknown,
}

impl Severity {
    /// Returns the stable upper-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Spec validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// Spec name is empty.
    #[error("compliance spec name must be non-empty")]
    MissingName,
    /// A control has an empty identifier.
    #[error("control id must be non-empty")]
    MissingControlId,
    /// A control has no scanner identity.
    #[error("control {0} has no scanner identity")]
    MissingScanner(String),
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic, reason = "Test-only panic-based assertions are permitted.")]

    use super::Check;
    use super::ComplianceSpec;
    use super::Control;
    use super::Mapping;
    use super::Severity;
    use super::SpecError;

    fn control(id: &str, scanner: &str) -> Control {
        Control {
            id: id.into(),
            name: format!("{id} name"),
            description: String::new(),
            kinds: Vec::new(),
            mapping: Mapping {
                scanner: scanner.into(),
                checks: vec![Check {
                    id: "1.1.1".into(),
                }],
            },
            severity: Severity::High,
        }
    }

    fn spec(controls: Vec<Control>) -> ComplianceSpec {
        ComplianceSpec {
            name: "cis-1.5".to_string(),
            kind: "compliance".to_string(),
            description: "CIS benchmark".to_string(),
            version: "1.0".to_string(),
            controls,
        }
    }

    #[test]
    fn validate_accepts_duplicate_control_ids() {
        let spec = spec(vec![control("C1", "kube-bench"), control("C1", "kube-bench")]);
        assert_eq!(spec.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_blank_name_and_scanner() {
        let mut blank_name = spec(Vec::new());
        blank_name.name = "  ".to_string();
        assert_eq!(blank_name.validate(), Err(SpecError::MissingName));

        let blank_scanner = spec(vec![control("C2", "")]);
        assert_eq!(blank_scanner.validate(), Err(SpecError::MissingScanner("C2".to_string())));
    }

    #[test]
    fn severity_deserializes_upper_case_and_defaults_to_unknown() {
        let parsed: Control = serde_json::from_str(
            r#"{"id":"C3","mapping":{"scanner":"config-audit","checks":[]},"severity":"CRITICAL"}"#,
        )
        .unwrap_or_else(|err| panic!("control should parse: {err}"));
        assert_eq!(parsed.severity, Severity::Critical);

        let parsed: Control =
            serde_json::from_str(r#"{"id":"C4","mapping":{"scanner":"config-audit"}}"#)
                .unwrap_or_else(|err| panic!("control should parse: {err}"));
        assert_eq!(parsed.severity, Severity::Unknown);
        assert!(parsed.mapping.checks.is_empty());
    }
}
