// crates/compliance-report-scanners/src/resource.rs
// ============================================================================
// Module: Report Object Metadata
// Description: Shared metadata shape of scanner report objects.
// Purpose: Resolve the scanned resource identity from report labels.
// Dependencies: compliance-report-core, serde
// ============================================================================

//! ## Overview
//! Scanner report objects name the resource they describe through labels.
//! When a label is absent the report object's own metadata is used.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use compliance_report_core::CheckId;
use compliance_report_core::CheckResultMap;
use compliance_report_core::ResultDetail;
use compliance_report_core::ScanResult;
use serde::Deserialize;

// ============================================================================
// SECTION: Labels
// ============================================================================

/// Label naming the scanned resource kind.
pub const RESOURCE_KIND_LABEL: &str = "starboard.resource.kind";

/// Label naming the scanned resource.
pub const RESOURCE_NAME_LABEL: &str = "starboard.resource.name";

/// Label naming the scanned resource namespace.
pub const RESOURCE_NAMESPACE_LABEL: &str = "starboard.resource.namespace";

// ============================================================================
// SECTION: Object Metadata
// ============================================================================

/// Metadata of a scanner report object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ObjectMeta {
    /// Report object name.
    #[serde(default)]
    pub name: String,
    /// Report object namespace.
    #[serde(default)]
    pub namespace: String,
    /// Report object labels.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl ObjectMeta {
    /// Returns a non-empty label value.
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str).filter(|value| !value.is_empty())
    }

    /// Returns the scanned resource name.
    #[must_use]
    pub fn resource_name(&self) -> &str {
        self.label(RESOURCE_NAME_LABEL).unwrap_or(&self.name)
    }

    /// Returns the scanned resource namespace.
    #[must_use]
    pub fn resource_namespace(&self) -> &str {
        self.label(RESOURCE_NAMESPACE_LABEL).unwrap_or(&self.namespace)
    }

    /// Returns the scanned resource kind, falling back to `requested`.
    #[must_use]
    pub fn resource_kind<'a>(&'a self, requested: &'a str) -> &'a str {
        self.label(RESOURCE_KIND_LABEL).unwrap_or(requested)
    }
}

// ============================================================================
// SECTION: Result Folding
// ============================================================================

/// Appends a detail under its check id, creating the result on first use.
///
/// Object type and remediation are taken from the first detail of a check.
pub(crate) fn push_detail(
    mapped: &mut CheckResultMap,
    check_id: &str,
    object_type: &str,
    remediation: &str,
    detail: ResultDetail,
) {
    mapped
        .entry(CheckId::new(check_id))
        .or_insert_with(|| ScanResult {
            id: CheckId::new(check_id),
            object_type: object_type.to_string(),
            remediation: remediation.to_string(),
            details: Vec::new(),
        })
        .details
        .push(detail);
}

/// Returns `None` for an empty map.
pub(crate) fn non_empty(mapped: CheckResultMap) -> Option<CheckResultMap> {
    if mapped.is_empty() { None } else { Some(mapped) }
}
