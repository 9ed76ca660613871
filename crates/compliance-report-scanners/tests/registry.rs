// crates/compliance-report-scanners/tests/registry.rs
// ============================================================================
// Module: Mapper Registry Tests
// Description: Tests for scanner mapper resolution and end-to-end report runs.
// Purpose: Ensure built-in mappers resolve and drive the engine from disk.
// Dependencies: compliance-report-core, compliance-report-scanners, tempfile
// ============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;

use compliance_report_core::Check;
use compliance_report_core::ComplianceEngine;
use compliance_report_core::ComplianceSpec;
use compliance_report_core::Control;
use compliance_report_core::EngineConfig;
use compliance_report_core::InMemoryReportStore;
use compliance_report_core::Mapping;
use compliance_report_core::MapperError;
use compliance_report_core::MapperResolver;
use compliance_report_core::ReportStore;
use compliance_report_core::ScannerId;
use compliance_report_core::Severity;
use compliance_report_core::SummaryReport;
use compliance_report_core::detail_report_name;
use compliance_report_scanners::FileResourceSource;
use compliance_report_scanners::FileResourceSourceConfig;
use compliance_report_scanners::KubeBenchMapper;
use compliance_report_scanners::MapperRegistry;
use serde_json::json;

#[test]
fn builtin_mappers_resolve_by_scanner_identity() {
    let registry = MapperRegistry::with_builtin_mappers();
    assert!(registry.resolve(&ScannerId::new("kube-bench")).is_ok());
    assert!(registry.resolve(&ScannerId::new("config-audit")).is_ok());
    let scanners: Vec<&str> = registry.scanners().map(ScannerId::as_str).collect();
    assert_eq!(scanners, vec!["config-audit", "kube-bench"]);
}

#[test]
fn unknown_scanner_is_an_error() {
    let registry = MapperRegistry::with_builtin_mappers();
    let err = registry.resolve(&ScannerId::new("polaris")).err().expect("unknown scanner");
    assert_eq!(err, MapperError::UnknownScanner("polaris".to_string()));
}

#[test]
fn retained_scanners_limit_resolution() {
    let mut registry = MapperRegistry::new();
    registry.register_mapper("node-bench", KubeBenchMapper);
    registry.register_builtin_mappers();
    registry.retain_scanners(&[ScannerId::new("node-bench")]);
    assert!(registry.contains(&ScannerId::new("node-bench")));
    assert!(!registry.contains(&ScannerId::new("kube-bench")));
}

fn bench_spec() -> ComplianceSpec {
    ComplianceSpec {
        name: "CIS-1.5".to_string(),
        kind: "Compliance".to_string(),
        description: "CIS Kubernetes Benchmark".to_string(),
        version: "1.5".to_string(),
        controls: vec![
            Control {
                id: "1.1".into(),
                name: "Control plane configuration files".to_string(),
                description: String::new(),
                kinds: Vec::new(),
                mapping: Mapping {
                    scanner: "kube-bench".into(),
                    checks: vec![Check { id: "1.1.1".into() }, Check { id: "1.1.2".into() }],
                },
                severity: Severity::High,
            },
            Control {
                id: "5.2".into(),
                name: "Pod security policies".to_string(),
                description: String::new(),
                kinds: vec!["Workload".to_string()],
                mapping: Mapping {
                    scanner: "config-audit".into(),
                    checks: vec![Check { id: "KSV012".into() }],
                },
                severity: Severity::Critical,
            },
        ],
    }
}

#[test]
fn engine_generates_reports_from_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let node_dir = dir.path().join("kube-bench").join("Node");
    fs::create_dir_all(&node_dir).expect("node dir");
    let node = json!({
        "metadata": { "name": "master-1" },
        "report": { "sections": [{ "tests": [{ "results": [
            { "test_number": "1.1.1", "test_desc": "perms", "status": "PASS" },
            { "test_number": "1.1.2", "test_desc": "owner", "status": "FAIL" },
        ]}]}]},
    });
    fs::write(node_dir.join("master-1.json"), node.to_string()).expect("write node");
    let pod_dir = dir.path().join("config-audit").join("Pod");
    fs::create_dir_all(&pod_dir).expect("pod dir");
    let pod = json!({
        "metadata": { "labels": { "starboard.resource.name": "web", "starboard.resource.kind": "Pod" } },
        "report": { "checks": [{ "checkID": "KSV012", "success": false, "messages": ["runs as root"] }] },
    });
    fs::write(pod_dir.join("web.json"), pod.to_string()).expect("write pod");

    let spec = bench_spec();
    let store = InMemoryReportStore::new();
    store.create_summary(&SummaryReport::shell(spec.clone())).expect("shell");
    let engine = ComplianceEngine::new(
        FileResourceSource::new(FileResourceSourceConfig::new(dir.path())),
        MapperRegistry::with_builtin_mappers(),
        store,
        EngineConfig::default(),
    );

    let summary = engine.generate_report(&spec).expect("report");

    assert_eq!(summary.metadata.name, "cis-1.5");
    assert_eq!(summary.status.summary.pass_count, 1);
    assert_eq!(summary.status.summary.fail_count, 2);
    let totals: Vec<(u64, u64)> = summary
        .status
        .control_checks
        .iter()
        .map(|entry| (entry.pass_total, entry.fail_total))
        .collect();
    assert_eq!(totals, vec![(1, 1), (0, 1)]);

    let detail = engine
        .store()
        .load_detail(&detail_report_name(&spec.name))
        .expect("load")
        .expect("detail");
    assert_eq!(detail.report.control_checks.len(), 3);
    assert_eq!(detail.report.compliance_type.kind, "compliance");
}
