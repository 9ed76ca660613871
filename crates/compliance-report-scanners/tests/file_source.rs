// crates/compliance-report-scanners/tests/file_source.rs
// ============================================================================
// Module: File Resource Source Tests
// Description: Tests for reading scanner report objects from a directory tree.
// Purpose: Validate layout, ordering, limits, and path validation.
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
use std::path::Path;

use compliance_report_core::ResourceSource;
use compliance_report_core::ScannerId;
use compliance_report_core::SourceError;
use compliance_report_scanners::FileResourceSource;
use compliance_report_scanners::FileResourceSourceConfig;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    fs::write(path, contents).expect("write file");
}

#[test]
fn reads_sorted_documents_and_flattens_arrays() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "kube-bench/Node/b.json", r#"{"metadata":{"name":"b"}}"#);
    write(dir.path(), "kube-bench/Node/a.json", r#"[{"metadata":{"name":"a1"}},{"metadata":{"name":"a2"}}]"#);
    write(dir.path(), "kube-bench/Node/c.yaml", "metadata:\n  name: c\n");
    write(dir.path(), "kube-bench/Node/notes.txt", "ignored");
    let source = FileResourceSource::new(FileResourceSourceConfig::new(dir.path()));

    let list = source.fetch(&ScannerId::new("kube-bench"), "Node").expect("fetch");

    assert_eq!(list.kind, "Node");
    let names: Vec<&str> = list
        .items
        .iter()
        .map(|item| item["metadata"]["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["a1", "a2", "b", "c"]);
}

#[test]
fn missing_directory_is_an_empty_collection() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = FileResourceSource::new(FileResourceSourceConfig::new(dir.path()));

    let list = source.fetch(&ScannerId::new("config-audit"), "Pod").expect("fetch");

    assert!(list.is_empty());
}

#[test]
fn yml_extension_is_read_as_yaml() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "config-audit/Pod/a.yml", "- metadata:\n    name: a\n");
    let source = FileResourceSource::new(FileResourceSourceConfig::new(dir.path()));

    let list = source.fetch(&ScannerId::new("config-audit"), "Pod").expect("fetch");

    assert_eq!(list.items.len(), 1);
    assert_eq!(list.items[0]["metadata"]["name"], "a");
}

#[test]
fn yaml_can_be_disabled() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "config-audit/Pod/a.yaml", "metadata:\n  name: a\n");
    write(dir.path(), "config-audit/Pod/b.yml", "metadata:\n  name: b\n");
    let mut config = FileResourceSourceConfig::new(dir.path());
    config.allow_yaml = false;
    let source = FileResourceSource::new(config);

    let list = source.fetch(&ScannerId::new("config-audit"), "Pod").expect("fetch");

    assert!(list.is_empty());
}

#[test]
fn oversized_files_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "kube-bench/Node/big.json", &format!("\"{}\"", "x".repeat(64)));
    let mut config = FileResourceSourceConfig::new(dir.path());
    config.max_file_bytes = 16;
    let source = FileResourceSource::new(config);

    let err = source.fetch(&ScannerId::new("kube-bench"), "Node").expect_err("too large");

    assert!(matches!(err, SourceError::Invalid(message) if message.contains("size limit")));
}

#[test]
fn invalid_json_fails_closed() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "kube-bench/Node/bad.json", "{not json");
    let source = FileResourceSource::new(FileResourceSourceConfig::new(dir.path()));

    let err = source.fetch(&ScannerId::new("kube-bench"), "Node").expect_err("invalid json");

    assert!(matches!(err, SourceError::Invalid(_)));
}

#[test]
fn path_traversal_components_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = FileResourceSource::new(FileResourceSourceConfig::new(dir.path()));

    for (scanner, kind) in [("..", "Node"), ("kube-bench", "../Node"), ("", "Node"), ("kube-bench", ".")] {
        let err = source.fetch(&ScannerId::new(scanner), kind).expect_err("invalid component");
        assert!(matches!(err, SourceError::Invalid(_)), "{scanner}/{kind}");
    }
}
