// crates/compliance-report-core/src/runtime/kinds.rs
// ============================================================================
// Module: Resource Kind Policy
// Description: Derivation of the resource kinds a control needs.
// Purpose: Map declared control kinds and scanner defaults to concrete kinds.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The indexer treats kind derivation as an opaque pure function supplied by a
//! [`KindPolicy`]. [`ScannerKindPolicy`] expands the `Workload` pseudo-kind,
//! passes other declared kinds through, and falls back to a per-scanner
//! default table for controls that declare nothing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::core::Control;
use crate::core::ScannerId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Pseudo-kind standing for every workload resource kind.
pub const WORKLOAD_KIND: &str = "Workload";

/// Concrete kinds the `Workload` pseudo-kind expands to.
pub const WORKLOAD_KINDS: [&str; 7] =
    ["Pod", "ReplicationController", "ReplicaSet", "StatefulSet", "DaemonSet", "CronJob", "Job"];

/// Node resource kind.
pub const NODE_KIND: &str = "Node";

/// Scanner identity of the CIS node benchmark.
pub const KUBE_BENCH_SCANNER: &str = "kube-bench";

/// Scanner identity of the workload configuration auditor.
pub const CONFIG_AUDIT_SCANNER: &str = "config-audit";

// ============================================================================
// SECTION: Policy Trait
// ============================================================================

/// Pure function from a control to the resource kinds it needs.
pub trait KindPolicy {
    /// Returns the resource kinds to fetch for a control.
    fn kinds_of(&self, control: &Control) -> BTreeSet<String>;
}

impl<F> KindPolicy for F
where
    F: Fn(&Control) -> BTreeSet<String>,
{
    fn kinds_of(&self, control: &Control) -> BTreeSet<String> {
        self(control)
    }
}

// ============================================================================
// SECTION: Scanner Kind Policy
// ============================================================================

/// Kind policy driven by declared kinds and per-scanner defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerKindPolicy {
    /// Declared kinds used when a control declares none, keyed by scanner.
    defaults: BTreeMap<ScannerId, Vec<String>>,
}

impl Default for ScannerKindPolicy {
    fn default() -> Self {
        Self::empty()
            .with_default(ScannerId::new(KUBE_BENCH_SCANNER), vec![NODE_KIND.to_string()])
            .with_default(ScannerId::new(CONFIG_AUDIT_SCANNER), vec![WORKLOAD_KIND.to_string()])
    }
}

impl ScannerKindPolicy {
    /// Creates a policy with no scanner defaults.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            defaults: BTreeMap::new(),
        }
    }

    /// Sets (or replaces) the default declared kinds for a scanner.
    #[must_use]
    pub fn with_default(mut self, scanner: ScannerId, kinds: Vec<String>) -> Self {
        self.defaults.insert(scanner, kinds);
        self
    }

    /// Returns the default declared kinds for a scanner.
    #[must_use]
    pub fn default_for(&self, scanner: &ScannerId) -> Option<&[String]> {
        self.defaults.get(scanner).map(Vec::as_slice)
    }
}

impl KindPolicy for ScannerKindPolicy {
    fn kinds_of(&self, control: &Control) -> BTreeSet<String> {
        let declared = if control.kinds.is_empty() {
            self.default_for(&control.mapping.scanner).unwrap_or_default()
        } else {
            control.kinds.as_slice()
        };
        expand_kinds(declared)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Expands pseudo-kinds and collapses duplicates.
fn expand_kinds(declared: &[String]) -> BTreeSet<String> {
    let mut kinds = BTreeSet::new();
    for kind in declared {
        let kind = kind.trim();
        if kind.is_empty() {
            continue;
        }
        if kind == WORKLOAD_KIND {
            kinds.extend(WORKLOAD_KINDS.iter().map(|kind| (*kind).to_string()));
        } else {
            kinds.insert(kind.to_string());
        }
    }
    kinds
}
