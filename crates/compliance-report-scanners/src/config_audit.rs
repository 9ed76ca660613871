// crates/compliance-report-scanners/src/config_audit.rs
// ============================================================================
// Module: Configuration Audit Mapper
// Description: Result mapper for workload configuration audit reports.
// Purpose: Turn per-workload audit checks into pass/fail check results.
// Dependencies: compliance-report-core, serde
// ============================================================================

//! ## Overview
//! A config audit report object describes one workload, named through the
//! `starboard.resource.*` labels. Each entry of `report.checks[]` becomes a
//! detail under its `checkID`: `success` maps to Pass, anything else to Fail.

// ============================================================================
// SECTION: Imports
// ============================================================================

use compliance_report_core::CheckResultMap;
use compliance_report_core::CheckStatus;
use compliance_report_core::ResourceList;
use compliance_report_core::ResultDetail;
use compliance_report_core::ResultMapper;
use serde::Deserialize;

use crate::resource::ObjectMeta;
use crate::resource::non_empty;
use crate::resource::push_detail;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Separator used when joining check messages.
const MESSAGE_SEPARATOR: &str = "; ";

// ============================================================================
// SECTION: Report Shape
// ============================================================================

/// Config audit report object.
#[derive(Debug, Deserialize)]
struct ConfigAuditReport {
    /// Report object metadata.
    #[serde(default)]
    metadata: ObjectMeta,
    /// Audit body.
    report: ConfigAuditBody,
}

/// Audit body.
#[derive(Debug, Deserialize)]
struct ConfigAuditBody {
    /// Audit checks.
    #[serde(default)]
    checks: Vec<ConfigAuditCheck>,
}

/// Single audit check.
#[derive(Debug, Deserialize)]
struct ConfigAuditCheck {
    /// Check identifier (for example `KSV001`).
    #[serde(rename = "checkID")]
    check_id: String,
    /// Check title.
    #[serde(default)]
    title: String,
    /// Whether the workload passed the check.
    #[serde(default)]
    success: bool,
    /// Failure messages.
    #[serde(default)]
    messages: Vec<String>,
    /// Remediation guidance.
    #[serde(default)]
    remediation: String,
}

impl ConfigAuditCheck {
    /// Returns the detail message: joined messages, or the title.
    fn message(&self) -> String {
        if self.messages.is_empty() {
            self.title.clone()
        } else {
            self.messages.join(MESSAGE_SEPARATOR)
        }
    }
}

// ============================================================================
// SECTION: Mapper
// ============================================================================

/// Result mapper for config audit reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigAuditMapper;

impl ResultMapper for ConfigAuditMapper {
    fn map_results(&self, kind: &str, resources: &ResourceList) -> Option<CheckResultMap> {
        let mut mapped = CheckResultMap::new();
        for item in &resources.items {
            let Ok(report) = ConfigAuditReport::deserialize(item) else {
                continue;
            };
            let metadata = &report.metadata;
            for check in &report.report.checks {
                let status = if check.success { CheckStatus::Pass } else { CheckStatus::Fail };
                push_detail(
                    &mut mapped,
                    &check.check_id,
                    metadata.resource_kind(kind),
                    &check.remediation,
                    ResultDetail {
                        name: metadata.resource_name().to_string(),
                        namespace: metadata.resource_namespace().to_string(),
                        msg: check.message(),
                        status,
                    },
                );
            }
        }
        non_empty(mapped)
    }
}
