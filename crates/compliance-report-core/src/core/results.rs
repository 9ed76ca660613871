// crates/compliance-report-core/src/core/results.rs
// ============================================================================
// Module: Scanner Results
// Description: Live resource collections and raw per-check scan results.
// Purpose: Define the common shape every scanner-specific mapper produces.
// Dependencies: crate::core::identifiers, serde, serde_json
// ============================================================================

//! ## Overview
//! Scanners report in their own formats. Mappers translate a [`ResourceList`]
//! into a [`CheckResultMap`] keyed by check id, so aggregation never has to
//! know which scanner produced a result.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::CheckId;

// ============================================================================
// SECTION: Resource Collections
// ============================================================================

/// Every live resource instance of one kind, as returned by a resource source.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceList {
    /// Resource kind the list was fetched for.
    pub kind: String,
    /// Raw resource documents.
    pub items: Vec<Value>,
}

impl ResourceList {
    /// Creates a resource list for a kind.
    #[must_use]
    pub fn new(kind: impl Into<String>, items: Vec<Value>) -> Self {
        Self {
            kind: kind.into(),
            items,
        }
    }

    /// Returns true when the list holds no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============================================================================
// SECTION: Check Results
// ============================================================================

/// Outcome of one check against one resource instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    /// Check passed.
    Pass,
    /// Check raised a warning; counted as a pass in totals.
    Warn,
    /// Check failed.
    Fail,
    /// Informational result; counted in neither total.
    Info,
}

impl CheckStatus {
    /// Parses a scanner status label case-insensitively.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "PASS" => Some(Self::Pass),
            "WARN" => Some(Self::Warn),
            "FAIL" => Some(Self::Fail),
            "INFO" => Some(Self::Info),
            _ => None,
        }
    }

    /// Returns true when the status counts toward the pass total.
    #[must_use]
    pub const fn counts_as_pass(self) -> bool {
        matches!(self, Self::Pass | Self::Warn)
    }

    /// Returns true when the status counts toward the fail total.
    #[must_use]
    pub const fn counts_as_fail(self) -> bool {
        matches!(self, Self::Fail)
    }

    /// Returns the stable upper-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Warn => "WARN",
            Self::Fail => "FAIL",
            Self::Info => "INFO",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finest-grained result: one resource instance's outcome for one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDetail {
    /// Resource name.
    pub name: String,
    /// Resource namespace (empty for cluster-scoped resources).
    #[serde(default)]
    pub namespace: String,
    /// Scanner message.
    #[serde(default)]
    pub msg: String,
    /// Check status.
    pub status: CheckStatus,
}

/// Raw scanner result for a single check id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Check identifier.
    pub id: CheckId,
    /// Object type the check applies to (for example `Node` or `Pod`).
    #[serde(default)]
    pub object_type: String,
    /// Remediation guidance.
    #[serde(default)]
    pub remediation: String,
    /// Per-resource details in scan order.
    #[serde(default)]
    pub details: Vec<ResultDetail>,
}

/// Mapper output: one result per check id.
pub type CheckResultMap = BTreeMap<CheckId, ScanResult>;
