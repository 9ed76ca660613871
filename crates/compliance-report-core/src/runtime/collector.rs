// crates/compliance-report-core/src/runtime/collector.rs
// ============================================================================
// Module: Scanner Result Collector
// Description: Fetches resources per scanner kind and merges mapper output.
// Purpose: Build the check-id to results table consumed by aggregation.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! For every scanner in the [`SpecIndex`], the collector resolves the scanner's
//! mapper once, then fetches each needed resource kind and merges the mapper
//! output into a [`CheckResultTable`]. Merging only appends, so one check can be
//! evidenced by several kinds or several scanners.
//!
//! Security posture: resource payloads are untrusted; mappers skip what they
//! cannot parse and the collector never inspects payloads itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::CheckId;
use crate::core::CheckResultMap;
use crate::core::ScanResult;
use crate::interfaces::MapperResolver;
use crate::interfaces::ResourceSource;
use crate::runtime::engine::CancellationFlag;
use crate::runtime::engine::EngineError;
use crate::runtime::index::SpecIndex;

// ============================================================================
// SECTION: Result Table
// ============================================================================

/// Merged results keyed by check id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckResultTable {
    /// Results per check id in merge order.
    results: BTreeMap<CheckId, Vec<ScanResult>>,
}

impl CheckResultTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            results: BTreeMap::new(),
        }
    }

    /// Appends every entry of a mapper output.
    pub fn merge(&mut self, mapped: CheckResultMap) {
        for (check_id, result) in mapped {
            self.results.entry(check_id).or_default().push(result);
        }
    }

    /// Returns the results recorded for a check id.
    #[must_use]
    pub fn results_for(&self, check_id: &CheckId) -> &[ScanResult] {
        self.results.get(check_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the number of distinct check ids with results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true when no results were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

// ============================================================================
// SECTION: Collection
// ============================================================================

/// Collects and merges scanner results for every indexed scanner kind.
///
/// # Errors
///
/// Returns [`EngineError::UnknownScanner`] when a scanner has no mapper,
/// [`EngineError::Source`] when a fetch fails, and [`EngineError::Cancelled`]
/// when the run is cancelled between external calls.
pub fn collect_results<R, M>(
    index: &SpecIndex,
    source: &R,
    mappers: &M,
    cancel: &CancellationFlag,
) -> Result<CheckResultTable, EngineError>
where
    R: ResourceSource + ?Sized,
    M: MapperResolver + ?Sized,
{
    let mut table = CheckResultTable::new();
    for (scanner, kinds) in index.scanner_kinds() {
        let mapper = mappers.resolve(scanner)?;
        for kind in kinds {
            cancel.check()?;
            let resources = source.fetch(scanner, kind)?;
            if let Some(mapped) = mapper.map_results(kind, &resources) {
                table.merge(mapped);
            }
        }
    }
    Ok(table)
}
