// crates/compliance-report-scanners/src/kube_bench.rs
// ============================================================================
// Module: CIS Benchmark Mapper
// Description: Result mapper for kube-bench node benchmark reports.
// Purpose: Flatten benchmark sections into per-check node results.
// Dependencies: compliance-report-core, serde
// ============================================================================

//! ## Overview
//! A kube-bench report object describes one node. Its results are nested as
//! `report.sections[].tests[].results[]`; every result carries the check id in
//! `test_number`. Results with an unrecognized status are skipped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use compliance_report_core::CheckResultMap;
use compliance_report_core::CheckStatus;
use compliance_report_core::ResourceList;
use compliance_report_core::ResultDetail;
use compliance_report_core::ResultMapper;
use compliance_report_core::runtime::NODE_KIND;
use serde::Deserialize;

use crate::resource::ObjectMeta;
use crate::resource::non_empty;
use crate::resource::push_detail;

// ============================================================================
// SECTION: Report Shape
// ============================================================================

/// kube-bench report object.
#[derive(Debug, Deserialize)]
struct KubeBenchReport {
    /// Report object metadata.
    #[serde(default)]
    metadata: ObjectMeta,
    /// Benchmark body.
    report: KubeBenchBody,
}

/// Benchmark body.
#[derive(Debug, Deserialize)]
struct KubeBenchBody {
    /// Benchmark sections.
    #[serde(default)]
    sections: Vec<KubeBenchSection>,
}

/// Benchmark section.
#[derive(Debug, Deserialize)]
struct KubeBenchSection {
    /// Test groups.
    #[serde(default)]
    tests: Vec<KubeBenchTests>,
}

/// Benchmark test group.
#[derive(Debug, Deserialize)]
struct KubeBenchTests {
    /// Individual check results.
    #[serde(default)]
    results: Vec<KubeBenchResult>,
}

/// Single benchmark check result.
#[derive(Debug, Deserialize)]
struct KubeBenchResult {
    /// Check identifier (for example `1.1.1`).
    test_number: String,
    /// Check description.
    #[serde(default)]
    test_desc: String,
    /// Remediation guidance.
    #[serde(default)]
    remediation: String,
    /// Status label.
    status: String,
}

// ============================================================================
// SECTION: Mapper
// ============================================================================

/// Result mapper for kube-bench reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct KubeBenchMapper;

impl ResultMapper for KubeBenchMapper {
    fn map_results(&self, _kind: &str, resources: &ResourceList) -> Option<CheckResultMap> {
        let mut mapped = CheckResultMap::new();
        for item in &resources.items {
            let Ok(report) = KubeBenchReport::deserialize(item) else {
                continue;
            };
            let node = report.metadata.resource_name();
            let results = report
                .report
                .sections
                .iter()
                .flat_map(|section| section.tests.iter())
                .flat_map(|tests| tests.results.iter());
            for result in results {
                let Some(status) = CheckStatus::parse(&result.status) else {
                    continue;
                };
                push_detail(
                    &mut mapped,
                    &result.test_number,
                    NODE_KIND,
                    &result.remediation,
                    ResultDetail {
                        name: node.to_string(),
                        namespace: String::new(),
                        msg: result.test_desc.clone(),
                        status,
                    },
                );
            }
        }
        non_empty(mapped)
    }
}
