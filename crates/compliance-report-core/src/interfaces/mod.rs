// crates/compliance-report-core/src/interfaces/mod.rs
// ============================================================================
// Module: Compliance Report Interfaces
// Description: Backend-agnostic interfaces for resources, mappers, and storage.
// Purpose: Define the collaborator surfaces used by the report engine.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the report engine integrates with resource listing,
//! scanner-specific result parsing, report persistence, and audit logging
//! without embedding backend details. Implementations must fail closed on
//! invalid data and report not-found as `Ok(None)` rather than an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::CheckResultMap;
use crate::core::DetailReport;
use crate::core::ReportAuditEvent;
use crate::core::ResourceList;
use crate::core::SummaryReport;
use crate::core::identifiers::ScannerId;

// ============================================================================
// SECTION: Resource Source
// ============================================================================

/// Resource source errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Source I/O error.
    #[error("resource source io error: {0}")]
    Io(String),
    /// Source returned data that could not be read.
    #[error("resource source invalid data: {0}")]
    Invalid(String),
    /// Source reported an error.
    #[error("resource source error: {0}")]
    Source(String),
}

/// Lists every live resource instance of a kind for a scanner.
pub trait ResourceSource {
    /// Fetches the resource collection for `(scanner, kind)`.
    ///
    /// An empty collection is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the collection cannot be listed.
    fn fetch(&self, scanner: &ScannerId, kind: &str) -> Result<ResourceList, SourceError>;
}

// ============================================================================
// SECTION: Result Mappers
// ============================================================================

/// Scanner-specific translation of raw resources into check results.
pub trait ResultMapper {
    /// Maps a resource collection into results keyed by check id.
    ///
    /// Returns `None` when nothing in the collection applies.
    fn map_results(&self, kind: &str, resources: &ResourceList) -> Option<CheckResultMap>;
}

/// Mapper resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapperError {
    /// No mapper is registered for the scanner identity.
    #[error("unknown scanner: {0}")]
    UnknownScanner(String),
}

/// Name-keyed lookup of result mappers.
pub trait MapperResolver {
    /// Resolves the mapper for a scanner identity.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::UnknownScanner`] when no mapper is registered.
    fn resolve(&self, scanner: &ScannerId) -> Result<&dyn ResultMapper, MapperError>;
}

// ============================================================================
// SECTION: Report Store
// ============================================================================

/// Report store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Stored revision differs from the one the update was based on.
    #[error("report store conflict: {0}")]
    Conflict(String),
    /// A record with the same name already exists.
    #[error("report store record already exists: {0}")]
    AlreadyExists(String),
    /// Store I/O error.
    #[error("report store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("report store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("report store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("report store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("report store error: {0}")]
    Store(String),
}

impl StoreError {
    /// Returns true when the caller may retry the whole run.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Returns a stable label for audit output.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Conflict(_) => "store_conflict",
            Self::AlreadyExists(_) => "store_already_exists",
            Self::Io(_) => "store_io",
            Self::Corrupt(_) => "store_corrupt",
            Self::VersionMismatch(_) => "store_version_mismatch",
            Self::Invalid(_) => "store_invalid",
            Self::Store(_) => "store_error",
        }
    }
}

/// Persistence for the two report records.
///
/// Loads return `Ok(None)` when the record does not exist. Updates compare the
/// incoming `metadata.revision` with the stored one and return the record as
/// stored, carrying its new revision.
pub trait ReportStore {
    /// Loads a summary report by name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn load_summary(&self, name: &str) -> Result<Option<SummaryReport>, StoreError>;

    /// Creates a summary report.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] when the name is taken.
    fn create_summary(&self, report: &SummaryReport) -> Result<SummaryReport, StoreError>;

    /// Updates an existing summary report.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the revision is stale.
    fn update_summary(&self, report: &SummaryReport) -> Result<SummaryReport, StoreError>;

    /// Loads a detail report by name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn load_detail(&self, name: &str) -> Result<Option<DetailReport>, StoreError>;

    /// Creates a detail report.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] when the name is taken.
    fn create_detail(&self, report: &DetailReport) -> Result<DetailReport, StoreError>;

    /// Updates an existing detail report.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the revision is stale.
    fn update_detail(&self, report: &DetailReport) -> Result<DetailReport, StoreError>;
}

// ============================================================================
// SECTION: Audit Sink
// ============================================================================

/// Destination for structured report audit events.
pub trait ReportAuditSink: Send + Sync {
    /// Records one audit event.
    fn record(&self, event: &ReportAuditEvent);
}
