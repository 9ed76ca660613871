// crates/compliance-report-core/src/runtime/engine.rs
// ============================================================================
// Module: Compliance Report Engine
// Description: Single entry point for generating compliance reports.
// Purpose: Run indexing, collection, aggregation, reduction, and upsert.
// Dependencies: crate::{core, interfaces, runtime}, thiserror
// ============================================================================

//! ## Overview
//! [`ComplianceEngine::generate_report`] is the canonical execution path. A
//! run is synchronous and sequential:
//! index, collect, aggregate, reduce, upsert detail, update summary.
//! The detail report is written before the summary report; callers must not
//! assume atomicity across the two. Every run emits exactly one audit event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use thiserror::Error;

use crate::core::Clock;
use crate::core::ComplianceSpec;
use crate::core::DetailAction;
use crate::core::HashDigest;
use crate::core::HashError;
use crate::core::ReportAuditEvent;
use crate::core::ReportAuditEventParams;
use crate::core::ReportOutcome;
use crate::core::SpecError;
use crate::core::SummaryReport;
use crate::core::SystemClock;
use crate::core::detail_report_name;
use crate::core::summary_report_name;
use crate::interfaces::MapperError;
use crate::interfaces::MapperResolver;
use crate::interfaces::ReportAuditSink;
use crate::interfaces::ReportStore;
use crate::interfaces::ResourceSource;
use crate::interfaces::SourceError;
use crate::interfaces::StoreError;
use crate::runtime::aggregate::aggregate;
use crate::runtime::audit::NoopAuditSink;
use crate::runtime::collector::collect_results;
use crate::runtime::index::SpecIndex;
use crate::runtime::kinds::KindPolicy;
use crate::runtime::kinds::ScannerKindPolicy;
use crate::runtime::totals::SummaryTotals;
use crate::runtime::upsert::build_detail_update;
use crate::runtime::upsert::build_summary_update;
use crate::runtime::upsert::update_summary;
use crate::runtime::upsert::upsert_detail;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Label carrying the canonical spec hash on both reports.
pub const SPEC_HASH_LABEL: &str = "compliance.report/spec-hash";

// ============================================================================
// SECTION: Engine Configuration
// ============================================================================

/// Configuration for the compliance report engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Static labels written to both reports.
    pub labels: BTreeMap<String, String>,
}

// ============================================================================
// SECTION: Cancellation
// ============================================================================

/// Shared cancellation flag checked before every external call.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    /// Cancellation state shared across clones.
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    /// Creates a flag that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; later checks fail.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fails when cancellation was requested.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Cancelled`] when the flag is set.
    pub fn check(&self) -> Result<(), EngineError> {
        if self.is_cancelled() { Err(EngineError::Cancelled) } else { Ok(()) }
    }
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Compliance report engine bound to its collaborators.
pub struct ComplianceEngine<R, M, S> {
    /// Resource source.
    source: R,
    /// Mapper resolver.
    mappers: M,
    /// Report store.
    store: S,
    /// Kind derivation policy.
    kind_policy: Box<dyn KindPolicy + Send + Sync>,
    /// Clock used to stamp reports.
    clock: Box<dyn Clock + Send + Sync>,
    /// Audit sink for run events.
    audit: Arc<dyn ReportAuditSink>,
    /// Cancellation flag.
    cancel: CancellationFlag,
    /// Engine configuration.
    config: EngineConfig,
}

impl<R, M, S> ComplianceEngine<R, M, S>
where
    R: ResourceSource,
    M: MapperResolver,
    S: ReportStore,
{
    /// Creates an engine with the default kind policy, the system clock, and
    /// no audit output.
    #[must_use]
    pub fn new(source: R, mappers: M, store: S, config: EngineConfig) -> Self {
        Self {
            source,
            mappers,
            store,
            kind_policy: Box::new(ScannerKindPolicy::default()),
            clock: Box::new(SystemClock),
            audit: Arc::new(NoopAuditSink),
            cancel: CancellationFlag::new(),
            config,
        }
    }

    /// Replaces the kind derivation policy.
    #[must_use]
    pub fn with_kind_policy(mut self, policy: impl KindPolicy + Send + Sync + 'static) -> Self {
        self.kind_policy = Box::new(policy);
        self
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn ReportAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Replaces the cancellation flag.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns the report store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generates and persists both reports for a spec.
    ///
    /// Returns the stored summary report. The detail report is persisted as a
    /// side effect.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when validation, collection, or persistence
    /// fails, or when the run is cancelled.
    pub fn generate_report(&self, spec: &ComplianceSpec) -> Result<SummaryReport, EngineError> {
        let mut progress = RunProgress::new();
        let result = self.run(spec, &mut progress);
        let (outcome, error_kind) = match &result {
            Ok(_) => (ReportOutcome::Ok, None),
            Err(err) => (ReportOutcome::Error, Some(err.kind_label())),
        };
        self.audit.record(&ReportAuditEvent::new(ReportAuditEventParams {
            timestamp: self.clock.now(),
            spec_name: spec.name.clone(),
            spec_hash: progress.spec_hash,
            outcome,
            pass_count: progress.totals.pass_count,
            fail_count: progress.totals.fail_count,
            control_count: progress.control_count,
            detail_action: progress.detail_action,
            error_kind,
        }));
        result
    }

    /// Executes one run, recording progress for the audit event.
    fn run(
        &self,
        spec: &ComplianceSpec,
        progress: &mut RunProgress,
    ) -> Result<SummaryReport, EngineError> {
        self.cancel.check()?;
        spec.validate()?;
        let spec_hash = spec.canonical_hash()?;
        progress.spec_hash = Some(spec_hash.value.clone());

        let index = SpecIndex::build(spec, self.kind_policy.as_ref());
        progress.control_count = index.control_count();

        let table = collect_results(&index, &self.source, &self.mappers, &self.cancel)?;
        let aggregation = aggregate(&index, &table);
        let totals = SummaryTotals::reduce(&aggregation.summaries);
        progress.totals = totals;

        let labels = self.report_labels(&spec_hash);
        let stamped_at = self.clock.now();

        let detail_update =
            build_detail_update(spec, labels.clone(), totals, aggregation.details, stamped_at);
        let (_, action) = upsert_detail(
            &self.store,
            &detail_report_name(&spec.name),
            detail_update,
            &self.cancel,
        )?;
        progress.detail_action = action;

        let summary_update =
            build_summary_update(spec, labels, totals, aggregation.summaries, stamped_at);
        update_summary(&self.store, &summary_report_name(&spec.name), summary_update, &self.cancel)
    }

    /// Returns configured labels plus the spec hash label.
    fn report_labels(&self, spec_hash: &HashDigest) -> BTreeMap<String, String> {
        let mut labels = self.config.labels.clone();
        labels.insert(SPEC_HASH_LABEL.to_string(), spec_hash.value.clone());
        labels
    }
}

/// Facts gathered during a run for the audit event.
struct RunProgress {
    /// Hex spec hash once computed.
    spec_hash: Option<String>,
    /// Number of distinct controls indexed.
    control_count: usize,
    /// Global totals once reduced.
    totals: SummaryTotals,
    /// Detail report action once written.
    detail_action: DetailAction,
}

impl RunProgress {
    /// Creates progress for a run that has not started.
    const fn new() -> Self {
        Self {
            spec_hash: None,
            control_count: 0,
            totals: SummaryTotals {
                pass_count: 0,
                fail_count: 0,
            },
            detail_action: DetailAction::None,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Compliance report engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Spec failed validation.
    #[error("invalid compliance spec: {0}")]
    InvalidSpec(#[from] SpecError),
    /// A control references a scanner with no registered mapper.
    #[error("unknown scanner: {0}")]
    UnknownScanner(String),
    /// The pre-created summary report record does not exist.
    #[error("report record for name `{0}` is missing")]
    MissingReport(String),
    /// Resource source failed.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// Report store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Spec hashing failed.
    #[error(transparent)]
    Hash(#[from] HashError),
    /// Run was cancelled.
    #[error("report generation cancelled")]
    Cancelled,
}

impl EngineError {
    /// Returns true for configuration errors that retrying cannot fix.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidSpec(_) | Self::UnknownScanner(_) | Self::MissingReport(_))
    }

    /// Returns true when the caller may retry the run.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Store(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Returns a stable label for audit output.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::InvalidSpec(_) => "invalid_spec",
            Self::UnknownScanner(_) => "unknown_scanner",
            Self::MissingReport(_) => "missing_report",
            Self::Source(_) => "source",
            Self::Store(err) => err.kind_label(),
            Self::Hash(_) => "hash",
            Self::Cancelled => "cancelled",
        }
    }
}

impl From<MapperError> for EngineError {
    fn from(err: MapperError) -> Self {
        match err {
            MapperError::UnknownScanner(name) => Self::UnknownScanner(name),
        }
    }
}
