// crates/compliance-report-config/src/build.rs
// ============================================================================
// Module: Collaborator Builders
// Description: Turn validated configuration into engine collaborators.
// Purpose: Wire store, source, mappers, kind policy, and audit sink.
// Dependencies: compliance-report-core, compliance-report-scanners,
//               compliance-report-store-sqlite
// ============================================================================

//! ## Overview
//! Builders assume the configuration already passed
//! [`ComplianceReportConfig::validate`]; they still fail closed when a
//! required field is absent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use compliance_report_core::ComplianceEngine;
use compliance_report_core::EngineConfig;
use compliance_report_core::FileAuditSink;
use compliance_report_core::InMemoryReportStore;
use compliance_report_core::NoopAuditSink;
use compliance_report_core::ReportAuditSink;
use compliance_report_core::ScannerId;
use compliance_report_core::ScannerKindPolicy;
use compliance_report_core::SharedReportStore;
use compliance_report_core::StderrAuditSink;
use compliance_report_scanners::FileResourceSource;
use compliance_report_scanners::FileResourceSourceConfig;
use compliance_report_scanners::MapperRegistry;
use compliance_report_store_sqlite::SqliteReportStore;
use compliance_report_store_sqlite::SqliteStoreConfig;

use crate::config::AuditConfig;
use crate::config::AuditSinkType;
use crate::config::ComplianceReportConfig;
use crate::config::ConfigError;
use crate::config::KindsConfig;
use crate::config::ReportConfig;
use crate::config::ReportStoreConfig;
use crate::config::ReportStoreType;
use crate::config::SourcesConfig;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Engine assembled from configuration.
pub type ConfiguredEngine = ComplianceEngine<FileResourceSource, MapperRegistry, SharedReportStore>;

// ============================================================================
// SECTION: Builders
// ============================================================================

impl ComplianceReportConfig {
    /// Builds a fully wired engine from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails or a collaborator cannot
    /// be initialized.
    pub fn build_engine(&self) -> Result<ConfiguredEngine, ConfigError> {
        self.validate()?;
        let engine = ComplianceEngine::new(
            self.sources.build_source()?,
            self.sources.build_mapper_registry(),
            self.store.build_store()?,
            self.report.engine_config(),
        )
        .with_kind_policy(self.kinds.kind_policy())
        .with_audit_sink(self.audit.build_sink()?);
        Ok(engine)
    }
}

impl ReportConfig {
    /// Returns the engine configuration carrying the static labels.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            labels: self.labels.clone(),
        }
    }
}

impl KindsConfig {
    /// Returns the kind policy with configured overrides applied.
    #[must_use]
    pub fn kind_policy(&self) -> ScannerKindPolicy {
        let base =
            if self.replace_builtin { ScannerKindPolicy::empty() } else { ScannerKindPolicy::default() };
        self.scanners
            .iter()
            .fold(base, |policy, (scanner, kinds)| {
                policy.with_default(ScannerId::new(scanner.as_str()), kinds.clone())
            })
    }
}

impl ReportStoreConfig {
    /// Builds the configured report store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the sqlite store cannot be opened.
    pub fn build_store(&self) -> Result<SharedReportStore, ConfigError> {
        let store = match self.store_type {
            ReportStoreType::Memory => SharedReportStore::from_store(InMemoryReportStore::new()),
            ReportStoreType::Sqlite => {
                let path = self
                    .path
                    .clone()
                    .ok_or_else(|| ConfigError::Invalid("sqlite store requires path".to_string()))?;
                let sqlite_config = SqliteStoreConfig {
                    path,
                    busy_timeout_ms: self.busy_timeout_ms,
                    journal_mode: self.journal_mode,
                    sync_mode: self.sync_mode,
                    max_versions: self.max_versions,
                };
                let store = SqliteReportStore::new(sqlite_config)
                    .map_err(|err| ConfigError::Init(err.to_string()))?;
                SharedReportStore::from_store(store)
            }
        };
        Ok(store)
    }
}

impl SourcesConfig {
    /// Builds the file resource source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when no root directory is configured.
    pub fn build_source(&self) -> Result<FileResourceSource, ConfigError> {
        let root = self
            .root
            .clone()
            .ok_or_else(|| ConfigError::Invalid("sources.root must be set".to_string()))?;
        Ok(FileResourceSource::new(FileResourceSourceConfig {
            root,
            max_file_bytes: self.max_file_bytes,
            max_files: self.max_files,
            allow_yaml: self.allow_yaml,
        }))
    }

    /// Builds the mapper registry limited to the enabled scanners.
    #[must_use]
    pub fn build_mapper_registry(&self) -> MapperRegistry {
        let mut registry = MapperRegistry::with_builtin_mappers();
        if !self.enabled_scanners.is_empty() {
            let enabled: Vec<ScannerId> =
                self.enabled_scanners.iter().map(|scanner| ScannerId::new(scanner.as_str())).collect();
            registry.retain_scanners(&enabled);
        }
        registry
    }
}

impl AuditConfig {
    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the audit file cannot be opened.
    pub fn build_sink(&self) -> Result<Arc<dyn ReportAuditSink>, ConfigError> {
        let sink: Arc<dyn ReportAuditSink> = match self.sink {
            AuditSinkType::Stderr => Arc::new(StderrAuditSink),
            AuditSinkType::None => Arc::new(NoopAuditSink),
            AuditSinkType::File => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("file audit sink requires path".to_string())
                })?;
                let sink =
                    FileAuditSink::new(path).map_err(|err| ConfigError::Init(err.to_string()))?;
                Arc::new(sink)
            }
        };
        Ok(sink)
    }
}
