// crates/compliance-report-core/src/runtime/store.rs
// ============================================================================
// Module: In-Memory Collaborators
// Description: In-memory report store and resource source.
// Purpose: Provide deterministic collaborator implementations without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`InMemoryReportStore`] applies the same revision rules as durable stores:
//! creates start at revision 1, updates must carry the stored revision and
//! bump it by one. [`InMemoryResourceSource`] serves fixed resource lists per
//! `(scanner, kind)` pair. Both are intended for tests and local runs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use serde_json::Value;

use crate::core::DetailReport;
use crate::core::ReportRecord;
use crate::core::ResourceList;
use crate::core::ScannerId;
use crate::core::SummaryReport;
use crate::interfaces::ReportStore;
use crate::interfaces::ResourceSource;
use crate::interfaces::SourceError;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Report Store
// ============================================================================

/// Records of one kind keyed by name.
type RecordMap<T> = Arc<Mutex<BTreeMap<String, T>>>;

/// In-memory report store for tests and local runs.
#[derive(Debug, Default, Clone)]
pub struct InMemoryReportStore {
    /// Summary reports by name.
    summaries: RecordMap<SummaryReport>,
    /// Detail reports by name.
    details: RecordMap<DetailReport>,
}

impl InMemoryReportStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored summary reports.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Store`] when the store mutex is poisoned.
    pub fn summary_count(&self) -> Result<usize, StoreError> {
        Ok(lock(&self.summaries)?.len())
    }

    /// Returns the number of stored detail reports.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Store`] when the store mutex is poisoned.
    pub fn detail_count(&self) -> Result<usize, StoreError> {
        Ok(lock(&self.details)?.len())
    }
}

impl ReportStore for InMemoryReportStore {
    fn load_summary(&self, name: &str) -> Result<Option<SummaryReport>, StoreError> {
        load_record(&self.summaries, name)
    }

    fn create_summary(&self, report: &SummaryReport) -> Result<SummaryReport, StoreError> {
        create_record(&self.summaries, report)
    }

    fn update_summary(&self, report: &SummaryReport) -> Result<SummaryReport, StoreError> {
        update_record(&self.summaries, report)
    }

    fn load_detail(&self, name: &str) -> Result<Option<DetailReport>, StoreError> {
        load_record(&self.details, name)
    }

    fn create_detail(&self, report: &DetailReport) -> Result<DetailReport, StoreError> {
        create_record(&self.details, report)
    }

    fn update_detail(&self, report: &DetailReport) -> Result<DetailReport, StoreError> {
        update_record(&self.details, report)
    }
}

/// Locks a record map.
fn lock<T>(
    records: &RecordMap<T>,
) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, T>>, StoreError> {
    records.lock().map_err(|_| StoreError::Store("report store mutex poisoned".to_string()))
}

/// Loads a record by name.
fn load_record<T: ReportRecord>(
    records: &RecordMap<T>,
    name: &str,
) -> Result<Option<T>, StoreError> {
    Ok(lock(records)?.get(name).cloned())
}

/// Inserts a new record at revision 1.
fn create_record<T: ReportRecord>(records: &RecordMap<T>, record: &T) -> Result<T, StoreError> {
    let name = record.metadata().name.clone();
    if name.is_empty() {
        return Err(StoreError::Invalid(format!("{} report name is empty", T::RECORD_KIND)));
    }
    let mut guard = lock(records)?;
    if guard.contains_key(&name) {
        return Err(StoreError::AlreadyExists(format!("{} report {name}", T::RECORD_KIND)));
    }
    let mut stored = record.clone();
    stored.metadata_mut().revision = 1;
    guard.insert(name, stored.clone());
    drop(guard);
    Ok(stored)
}

/// Replaces a record when its revision matches the stored one.
fn update_record<T: ReportRecord>(records: &RecordMap<T>, record: &T) -> Result<T, StoreError> {
    let name = record.metadata().name.clone();
    let mut guard = lock(records)?;
    let Some(current) = guard.get(&name) else {
        return Err(StoreError::Invalid(format!(
            "{} report {name} does not exist",
            T::RECORD_KIND
        )));
    };
    let current_revision = current.metadata().revision;
    if current_revision != record.metadata().revision {
        return Err(StoreError::Conflict(format!(
            "{} report {name} is at revision {current_revision}, update based on {}",
            T::RECORD_KIND,
            record.metadata().revision
        )));
    }
    let mut stored = record.clone();
    stored.metadata_mut().revision = current_revision.saturating_add(1);
    guard.insert(name, stored.clone());
    drop(guard);
    Ok(stored)
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared report store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedReportStore {
    /// Inner store implementation.
    inner: Arc<dyn ReportStore + Send + Sync>,
}

impl SharedReportStore {
    /// Wraps a report store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl ReportStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn ReportStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl ReportStore for SharedReportStore {
    fn load_summary(&self, name: &str) -> Result<Option<SummaryReport>, StoreError> {
        self.inner.load_summary(name)
    }

    fn create_summary(&self, report: &SummaryReport) -> Result<SummaryReport, StoreError> {
        self.inner.create_summary(report)
    }

    fn update_summary(&self, report: &SummaryReport) -> Result<SummaryReport, StoreError> {
        self.inner.update_summary(report)
    }

    fn load_detail(&self, name: &str) -> Result<Option<DetailReport>, StoreError> {
        self.inner.load_detail(name)
    }

    fn create_detail(&self, report: &DetailReport) -> Result<DetailReport, StoreError> {
        self.inner.create_detail(report)
    }

    fn update_detail(&self, report: &DetailReport) -> Result<DetailReport, StoreError> {
        self.inner.update_detail(report)
    }
}

// ============================================================================
// SECTION: In-Memory Resource Source
// ============================================================================

/// Fixed resource lists keyed by scanner and kind.
#[derive(Debug, Default, Clone)]
pub struct InMemoryResourceSource {
    /// Resources per `(scanner, kind)`.
    resources: BTreeMap<(ScannerId, String), Vec<Value>>,
}

impl InMemoryResourceSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends resources for a scanner kind.
    #[must_use]
    pub fn with_resources(
        mut self,
        scanner: impl Into<ScannerId>,
        kind: impl Into<String>,
        items: Vec<Value>,
    ) -> Self {
        self.insert(scanner, kind, items);
        self
    }

    /// Appends resources for a scanner kind in place.
    pub fn insert(
        &mut self,
        scanner: impl Into<ScannerId>,
        kind: impl Into<String>,
        items: Vec<Value>,
    ) {
        self.resources.entry((scanner.into(), kind.into())).or_default().extend(items);
    }
}

impl ResourceSource for InMemoryResourceSource {
    fn fetch(&self, scanner: &ScannerId, kind: &str) -> Result<ResourceList, SourceError> {
        let items =
            self.resources.get(&(scanner.clone(), kind.to_string())).cloned().unwrap_or_default();
        Ok(ResourceList::new(kind, items))
    }
}
