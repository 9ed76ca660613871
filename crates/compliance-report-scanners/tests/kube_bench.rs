// crates/compliance-report-scanners/tests/kube_bench.rs
// ============================================================================
// Module: CIS Benchmark Mapper Tests
// Description: Tests for flattening kube-bench reports into check results.
// Purpose: Validate check grouping, status parsing, and resource naming.
// Dependencies: compliance-report-core, compliance-report-scanners, serde_json
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

use compliance_report_core::CheckId;
use compliance_report_core::CheckStatus;
use compliance_report_core::ResourceList;
use compliance_report_core::ResultMapper;
use compliance_report_scanners::KubeBenchMapper;
use serde_json::Value;
use serde_json::json;

fn node_report(node: &str, results: &[(&str, &str)]) -> Value {
    let results: Vec<Value> = results
        .iter()
        .map(|(id, status)| {
            json!({
                "test_number": id,
                "test_desc": format!("check {id}"),
                "remediation": format!("fix {id}"),
                "status": status,
            })
        })
        .collect();
    json!({
        "metadata": {
            "name": format!("{node}-report"),
            "labels": { "starboard.resource.name": node },
        },
        "report": {
            "sections": [{ "id": "1", "tests": [{ "section": "1.1", "results": results }] }],
        },
    })
}

#[test]
fn results_from_all_nodes_fold_under_one_check() {
    let resources = ResourceList::new(
        "Node",
        vec![
            node_report("master-1", &[("1.1.1", "PASS"), ("1.1.2", "FAIL")]),
            node_report("worker-1", &[("1.1.1", "WARN")]),
        ],
    );

    let mapped = KubeBenchMapper.map_results("Node", &resources).expect("results");

    let first = mapped.get(&CheckId::new("1.1.1")).expect("1.1.1");
    assert_eq!(first.object_type, "Node");
    assert_eq!(first.remediation, "fix 1.1.1");
    assert_eq!(first.details.len(), 2);
    assert_eq!(first.details[0].name, "master-1");
    assert_eq!(first.details[0].status, CheckStatus::Pass);
    assert_eq!(first.details[1].name, "worker-1");
    assert_eq!(first.details[1].status, CheckStatus::Warn);
    assert_eq!(first.details[1].msg, "check 1.1.1");

    let second = mapped.get(&CheckId::new("1.1.2")).expect("1.1.2");
    assert_eq!(second.details[0].status, CheckStatus::Fail);
}

#[test]
fn node_name_falls_back_to_report_name() {
    let mut report = node_report("ignored", &[("1.2.1", "INFO")]);
    report["metadata"]["labels"] = json!({});
    let resources = ResourceList::new("Node", vec![report]);

    let mapped = KubeBenchMapper.map_results("Node", &resources).expect("results");

    let result = mapped.get(&CheckId::new("1.2.1")).expect("1.2.1");
    assert_eq!(result.details[0].name, "ignored-report");
    assert_eq!(result.details[0].status, CheckStatus::Info);
}

#[test]
fn malformed_reports_and_unknown_statuses_are_skipped() {
    let resources = ResourceList::new(
        "Node",
        vec![
            json!({ "metadata": { "name": "broken" } }),
            json!("not an object"),
            node_report("master-1", &[("1.3.1", "SKIPPED")]),
        ],
    );

    assert!(KubeBenchMapper.map_results("Node", &resources).is_none());
}
