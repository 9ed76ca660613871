// crates/compliance-report-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Helpers
// Description: Shared fixtures for compliance report core integration tests.
// Purpose: Provide spec builders, a fixture mapper, and capturing collaborators.
// Dependencies: compliance-report-core, serde_json
// ============================================================================

#![allow(
    dead_code,
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Shared helpers are not used by every test binary."
)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use compliance_report_core::Check;
use compliance_report_core::CheckId;
use compliance_report_core::CheckResultMap;
use compliance_report_core::CheckStatus;
use compliance_report_core::ComplianceSpec;
use compliance_report_core::Control;
use compliance_report_core::Mapping;
use compliance_report_core::MapperError;
use compliance_report_core::MapperResolver;
use compliance_report_core::ReportAuditEvent;
use compliance_report_core::ReportAuditSink;
use compliance_report_core::ResourceList;
use compliance_report_core::ResultDetail;
use compliance_report_core::ResultMapper;
use compliance_report_core::ScanResult;
use compliance_report_core::ScannerId;
use compliance_report_core::Severity;
use serde_json::Value;
use serde_json::json;

/// Builds a control bound to a scanner with the given checks.
pub fn control(id: &str, scanner: &str, checks: &[&str]) -> Control {
    Control {
        id: id.into(),
        name: format!("control {id}"),
        description: format!("description of {id}"),
        kinds: Vec::new(),
        mapping: Mapping {
            scanner: scanner.into(),
            checks: checks
                .iter()
                .map(|check| Check {
                    id: (*check).into(),
                })
                .collect(),
        },
        severity: Severity::High,
    }
}

/// Builds a spec with the given controls.
pub fn spec(name: &str, controls: Vec<Control>) -> ComplianceSpec {
    ComplianceSpec {
        name: name.to_string(),
        kind: "Compliance".to_string(),
        description: "CIS Kubernetes Benchmark".to_string(),
        version: "1.5".to_string(),
        controls,
    }
}

/// Builds a fixture resource reporting one check outcome.
pub fn finding(check: &str, resource: &str, status: &str) -> Value {
    json!({ "check": check, "resource": resource, "status": status })
}

/// Mapper reading `{check, resource, status}` fixture documents.
pub struct FixtureMapper;

impl ResultMapper for FixtureMapper {
    fn map_results(&self, kind: &str, resources: &ResourceList) -> Option<CheckResultMap> {
        let mut mapped = CheckResultMap::new();
        for item in &resources.items {
            let Some(check) = item.get("check").and_then(Value::as_str) else {
                continue;
            };
            let Some(status) =
                item.get("status").and_then(Value::as_str).and_then(CheckStatus::parse)
            else {
                continue;
            };
            let resource = item.get("resource").and_then(Value::as_str).unwrap_or_default();
            mapped
                .entry(CheckId::new(check))
                .or_insert_with(|| ScanResult {
                    id: CheckId::new(check),
                    object_type: kind.to_string(),
                    remediation: format!("fix {check}"),
                    details: Vec::new(),
                })
                .details
                .push(ResultDetail {
                    name: resource.to_string(),
                    namespace: String::new(),
                    msg: format!("{check} on {resource}"),
                    status,
                });
        }
        if mapped.is_empty() { None } else { Some(mapped) }
    }
}

/// Resolver knowing a fixed set of scanners, all using [`FixtureMapper`].
pub struct FixtureResolver {
    mappers: BTreeMap<ScannerId, FixtureMapper>,
}

impl FixtureResolver {
    pub fn new(scanners: &[&str]) -> Self {
        Self {
            mappers: scanners.iter().map(|scanner| (ScannerId::new(*scanner), FixtureMapper)).collect(),
        }
    }
}

impl MapperResolver for FixtureResolver {
    fn resolve(&self, scanner: &ScannerId) -> Result<&dyn ResultMapper, MapperError> {
        self.mappers
            .get(scanner)
            .map(|mapper| mapper as &dyn ResultMapper)
            .ok_or_else(|| MapperError::UnknownScanner(scanner.to_string()))
    }
}

/// Audit sink keeping every recorded event.
#[derive(Default)]
pub struct CapturingAuditSink {
    pub events: Mutex<Vec<ReportAuditEvent>>,
}

impl CapturingAuditSink {
    pub fn events(&self) -> Vec<ReportAuditEvent> {
        self.events.lock().expect("audit events lock").clone()
    }
}

impl ReportAuditSink for CapturingAuditSink {
    fn record(&self, event: &ReportAuditEvent) {
        self.events.lock().expect("audit events lock").push(event.clone());
    }
}
