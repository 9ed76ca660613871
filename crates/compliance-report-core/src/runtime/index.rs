// crates/compliance-report-core/src/runtime/index.rs
// ============================================================================
// Module: Spec Indexer
// Description: Fast-lookup indices derived from a compliance spec.
// Purpose: Precompute scanner kinds, control metadata, and control checks.
// Dependencies: crate::core, crate::runtime::kinds
// ============================================================================

//! ## Overview
//! [`SpecIndex`] is built once per run and discarded afterwards. Indexing is a
//! pure transformation with no failure modes:
//! - scanner kinds are unioned as sets,
//! - control metadata is last-write-wins on duplicate ids,
//! - control check lists are appended with duplicates preserved,
//! - a control id that never maps a check gets no check list and no position
//!   in the output order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::core::CheckId;
use crate::core::ComplianceSpec;
use crate::core::Control;
use crate::core::ControlId;
use crate::core::ScannerId;
use crate::runtime::kinds::KindPolicy;

// ============================================================================
// SECTION: Spec Index
// ============================================================================

/// Lookup indices for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecIndex {
    /// Scanner to the union of resource kinds its controls need.
    scanner_kinds: BTreeMap<ScannerId, BTreeSet<String>>,
    /// Control id to control metadata.
    controls: BTreeMap<ControlId, Control>,
    /// Control id to check ids in declaration order.
    control_checks: BTreeMap<ControlId, Vec<CheckId>>,
    /// Ids of controls with checks, in order of first appearance.
    control_order: Vec<ControlId>,
}

impl SpecIndex {
    /// Builds the indices for a spec.
    #[must_use]
    pub fn build(spec: &ComplianceSpec, policy: &dyn KindPolicy) -> Self {
        let mut index = Self::default();
        for control in &spec.controls {
            index
                .scanner_kinds
                .entry(control.mapping.scanner.clone())
                .or_default()
                .extend(policy.kinds_of(control));
            index.controls.insert(control.id.clone(), control.clone());
            if control.mapping.checks.is_empty() {
                continue;
            }
            if !index.control_checks.contains_key(&control.id) {
                index.control_order.push(control.id.clone());
            }
            index
                .control_checks
                .entry(control.id.clone())
                .or_default()
                .extend(control.mapping.checks.iter().map(|check| check.id.clone()));
        }
        index
    }

    /// Returns scanners with the kinds each needs, in scanner order.
    #[must_use]
    pub const fn scanner_kinds(&self) -> &BTreeMap<ScannerId, BTreeSet<String>> {
        &self.scanner_kinds
    }

    /// Returns the metadata for a control id.
    #[must_use]
    pub fn control(&self, id: &ControlId) -> Option<&Control> {
        self.controls.get(id)
    }

    /// Returns the check ids of a control.
    #[must_use]
    pub fn checks_of(&self, id: &ControlId) -> &[CheckId] {
        self.control_checks.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns ids of controls with checks, in order of first appearance.
    #[must_use]
    pub fn control_order(&self) -> &[ControlId] {
        &self.control_order
    }

    /// Returns the number of distinct control ids with at least one check.
    #[must_use]
    pub fn control_count(&self) -> usize {
        self.control_order.len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::SpecIndex;
    use crate::core::Check;
    use crate::core::CheckId;
    use crate::core::ComplianceSpec;
    use crate::core::Control;
    use crate::core::ControlId;
    use crate::core::Mapping;
    use crate::core::ScannerId;
    use crate::core::Severity;

    fn control(id: &str, name: &str, scanner: &str, kinds: &[&str], checks: &[&str]) -> Control {
        Control {
            id: id.into(),
            name: name.to_string(),
            description: String::new(),
            kinds: kinds.iter().map(|kind| (*kind).to_string()).collect(),
            mapping: Mapping {
                scanner: scanner.into(),
                checks: checks
                    .iter()
                    .map(|check| Check {
                        id: (*check).into(),
                    })
                    .collect(),
            },
            severity: Severity::Low,
        }
    }

    fn declared(control: &Control) -> BTreeSet<String> {
        control.kinds.iter().cloned().collect()
    }

    #[test]
    fn scanner_kinds_union_across_controls() {
        let spec = ComplianceSpec {
            name: "nsa".to_string(),
            kind: String::new(),
            description: String::new(),
            version: String::new(),
            controls: vec![
                control("C1", "a", "config-audit", &["Pod", "Job"], &["KSV001"]),
                control("C2", "b", "config-audit", &["Pod", "DaemonSet"], &["KSV002"]),
                control("C3", "c", "kube-bench", &[], &["1.1.1"]),
            ],
        };
        let index = SpecIndex::build(&spec, &declared);
        let audit = index.scanner_kinds().get(&ScannerId::new("config-audit"));
        assert_eq!(audit.map(BTreeSet::len), Some(3));
        let bench = index.scanner_kinds().get(&ScannerId::new("kube-bench"));
        assert_eq!(bench.map(BTreeSet::is_empty), Some(true));
    }

    #[test]
    fn duplicate_control_ids_overwrite_metadata_and_append_checks() {
        let spec = ComplianceSpec {
            name: "dup".to_string(),
            kind: String::new(),
            description: String::new(),
            version: String::new(),
            controls: vec![
                control("C1", "first", "kube-bench", &[], &["1.1.1", "1.1.1"]),
                control("C2", "other", "kube-bench", &[], &["2.1"]),
                control("C1", "second", "kube-bench", &[], &["1.1.2"]),
            ],
        };
        let index = SpecIndex::build(&spec, &declared);
        let c1 = ControlId::new("C1");
        assert_eq!(index.control(&c1).map(|control| control.name.as_str()), Some("second"));
        assert_eq!(
            index.checks_of(&c1),
            &[CheckId::new("1.1.1"), CheckId::new("1.1.1"), CheckId::new("1.1.2")]
        );
        assert_eq!(index.control_order(), &[ControlId::new("C1"), ControlId::new("C2")]);
        assert_eq!(index.control_count(), 2);
    }

    #[test]
    fn checkless_controls_are_not_ordered() {
        let spec = ComplianceSpec {
            name: "sparse".to_string(),
            kind: String::new(),
            description: String::new(),
            version: String::new(),
            controls: vec![
                control("C0", "empty", "kube-bench", &[], &[]),
                control("C1", "bench", "kube-bench", &[], &["1.1.1"]),
                control("C0", "filled", "kube-bench", &[], &["1.2.1"]),
                control("C2", "empty", "config-audit", &["Pod"], &[]),
            ],
        };
        let index = SpecIndex::build(&spec, &declared);
        assert_eq!(index.control_order(), &[ControlId::new("C1"), ControlId::new("C0")]);
        assert_eq!(index.control_count(), 2);
        assert!(index.checks_of(&ControlId::new("C2")).is_empty());
        assert!(index.control(&ControlId::new("C2")).is_some());
        assert!(index.scanner_kinds().contains_key(&ScannerId::new("config-audit")));
    }
}
