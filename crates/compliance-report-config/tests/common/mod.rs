// crates/compliance-report-config/tests/common/mod.rs
// ============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for compliance-report-config integration tests.
// Purpose: Write config files and assert on validation failures.
// Dependencies: compliance-report-config, tempfile
// ============================================================================

#![allow(dead_code, reason = "Shared helpers are not used by every test binary.")]

use std::path::Path;

use compliance_report_config::ComplianceReportConfig;
use compliance_report_config::ConfigError;

pub type TestResult = Result<(), String>;

/// Returns a minimal valid config rooted at the given resource directory.
pub fn minimal_toml(root: &Path) -> String {
    format!("[sources]\nroot = {:?}\n", root.display().to_string())
}

/// Asserts that a config result failed with a message containing `needle`.
pub fn assert_invalid(
    result: Result<ComplianceReportConfig, ConfigError>,
    needle: &str,
) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
