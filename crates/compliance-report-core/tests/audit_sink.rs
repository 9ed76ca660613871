// crates/compliance-report-core/tests/audit_sink.rs
// ============================================================================
// Module: Audit Sink Tests
// Description: Tests for JSON-lines report audit sinks.
// Purpose: Ensure file audit output is one parseable JSON object per event.
// Dependencies: compliance-report-core, serde_json, tempfile
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

use compliance_report_core::DetailAction;
use compliance_report_core::FileAuditSink;
use compliance_report_core::NoopAuditSink;
use compliance_report_core::ReportAuditEvent;
use compliance_report_core::ReportAuditEventParams;
use compliance_report_core::ReportAuditSink;
use compliance_report_core::ReportOutcome;
use compliance_report_core::Timestamp;
use serde_json::Value;

fn event(outcome: ReportOutcome, error_kind: Option<&'static str>) -> ReportAuditEvent {
    ReportAuditEvent::new(ReportAuditEventParams {
        timestamp: Timestamp::UnixMillis(1_700_000_000_000),
        spec_name: "cis-1.5".to_string(),
        spec_hash: None,
        outcome,
        pass_count: 3,
        fail_count: 1,
        control_count: 2,
        detail_action: DetailAction::Updated,
        error_kind,
    })
}

#[test]
fn file_sink_appends_json_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("audit.log");
    let sink = FileAuditSink::new(&path).expect("open sink");

    sink.record(&event(ReportOutcome::Ok, None));
    sink.record(&event(ReportOutcome::Error, Some("missing_report")));

    let contents = std::fs::read_to_string(&path).expect("read log");
    let lines: Vec<Value> =
        contents.lines().map(|line| serde_json::from_str(line).expect("json line")).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["event"], "compliance_report");
    assert_eq!(lines[0]["outcome"], "ok");
    assert_eq!(lines[0]["detail_action"], "updated");
    assert_eq!(lines[0]["pass_count"], 3);
    assert_eq!(lines[0]["timestamp"]["kind"], "unix_millis");
    assert_eq!(lines[0]["timestamp"]["value"], 1_700_000_000_000_i64);
    assert_eq!(lines[1]["outcome"], "error");
    assert_eq!(lines[1]["error_kind"], "missing_report");
}

#[test]
fn noop_sink_accepts_events() {
    NoopAuditSink.record(&event(ReportOutcome::Ok, None));
}
