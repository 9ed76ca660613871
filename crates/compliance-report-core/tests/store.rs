// crates/compliance-report-core/tests/store.rs
// ============================================================================
// Module: In-Memory Report Store Tests
// Description: Tests for the in-memory report store and shared wrapper.
// Purpose: Validate create, revision compare-and-swap, and not-found behavior.
// Dependencies: compliance-report-core
// ============================================================================
//! ## Overview
//! Ensures the in-memory store follows the same revision rules as durable
//! stores so engine behavior is identical across backends.

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

use std::collections::BTreeMap;

use compliance_report_core::ComplianceSpec;
use compliance_report_core::DetailReport;
use compliance_report_core::DetailReportData;
use compliance_report_core::DetailReportUpdate;
use compliance_report_core::InMemoryReportStore;
use compliance_report_core::ReportStore;
use compliance_report_core::SharedReportStore;
use compliance_report_core::StoreError;
use compliance_report_core::SummaryReport;
use compliance_report_core::Timestamp;

fn spec(name: &str) -> ComplianceSpec {
    ComplianceSpec {
        name: name.to_string(),
        kind: "compliance".to_string(),
        description: String::new(),
        version: "1.0".to_string(),
        controls: Vec::new(),
    }
}

fn detail(name: &str) -> DetailReport {
    DetailReport::from_update(
        name,
        DetailReportUpdate {
            labels: BTreeMap::new(),
            report: DetailReportData::default(),
            stamped_at: Timestamp::Logical(1),
        },
    )
}

#[test]
fn load_missing_record_returns_none() {
    let store = InMemoryReportStore::new();
    assert!(store.load_summary("nsa").expect("load").is_none());
    assert!(store.load_detail("nsa-details").expect("load").is_none());
}

#[test]
fn create_assigns_first_revision_and_rejects_duplicates() {
    let store = InMemoryReportStore::new();
    let created = store.create_summary(&SummaryReport::shell(spec("NSA"))).expect("create");
    assert_eq!(created.metadata.name, "nsa");
    assert_eq!(created.metadata.revision, 1);

    let err = store.create_summary(&SummaryReport::shell(spec("nsa"))).expect_err("duplicate");
    assert!(matches!(err, StoreError::AlreadyExists(_)));
    assert!(!err.is_retryable());
}

#[test]
fn update_requires_current_revision() {
    let store = InMemoryReportStore::new();
    let created = store.create_detail(&detail("nsa-details")).expect("create");

    let updated = store.update_detail(&created).expect("update");
    assert_eq!(updated.metadata.revision, 2);

    let err = store.update_detail(&created).expect_err("stale revision");
    assert!(matches!(err, StoreError::Conflict(_)));
    assert!(err.is_retryable());
    assert_eq!(err.kind_label(), "store_conflict");
}

#[test]
fn update_of_missing_record_is_invalid() {
    let store = InMemoryReportStore::new();
    let err = store.update_summary(&SummaryReport::shell(spec("cis"))).expect_err("missing");
    assert!(matches!(err, StoreError::Invalid(_)));
}

#[test]
fn summary_and_detail_names_do_not_collide() {
    let store = InMemoryReportStore::new();
    let mut shell = SummaryReport::shell(spec("same"));
    shell.metadata.name = "same".to_string();
    store.create_summary(&shell).expect("create summary");
    store.create_detail(&detail("same")).expect("create detail");
    assert_eq!(store.summary_count().expect("count"), 1);
    assert_eq!(store.detail_count().expect("count"), 1);
}

#[test]
fn shared_store_delegates_to_inner_store() {
    let inner = InMemoryReportStore::new();
    let shared = SharedReportStore::from_store(inner.clone());
    shared.create_summary(&SummaryReport::shell(spec("cis"))).expect("create");
    assert!(inner.load_summary("cis").expect("load").is_some());
}
