//! Config load validation tests for compliance-report-config.
// crates/compliance-report-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

mod common;

use std::io::Write;
use std::path::Path;

use common::TestResult;
use common::assert_invalid;
use common::minimal_toml;
use compliance_report_config::ComplianceReportConfig;
use compliance_report_config::ConfigError;
use tempfile::NamedTempFile;

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(ComplianceReportConfig::load(Some(path)), "config path exceeds max length")
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(ComplianceReportConfig::load(Some(path)), "config path component too long")
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'#'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(ComplianceReportConfig::load(Some(file.path())), "config file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(ComplianceReportConfig::load(Some(file.path())), "config file must be utf-8")
}

#[test]
fn load_reports_missing_file_as_io_error() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    match ComplianceReportConfig::load(Some(&dir.path().join("absent.toml"))) {
        Err(ConfigError::Io(_)) => Ok(()),
        _ => Err("expected io error".to_string()),
    }
}

#[test]
fn load_reports_malformed_toml_as_parse_error() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[sources\nroot = ").map_err(|err| err.to_string())?;
    match ComplianceReportConfig::load(Some(file.path())) {
        Err(ConfigError::Parse(_)) => Ok(()),
        _ => Err("expected parse error".to_string()),
    }
}

#[test]
fn load_accepts_minimal_config_with_defaults() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(minimal_toml(dir.path()).as_bytes()).map_err(|err| err.to_string())?;

    let config = ComplianceReportConfig::load(Some(file.path())).map_err(|err| err.to_string())?;

    if config.sources.root.as_deref() != Some(dir.path()) {
        return Err("sources.root not loaded".to_string());
    }
    if config.sources.max_file_bytes != 4 * 1024 * 1024 || config.sources.max_files != 10_000 {
        return Err("source limits did not default".to_string());
    }
    if !config.sources.allow_yaml || !config.report.labels.is_empty() {
        return Err("unexpected defaults".to_string());
    }
    Ok(())
}
