// crates/compliance-report-scanners/src/registry.rs
// ============================================================================
// Module: Mapper Registry
// Description: Registry of result mappers keyed by scanner identity.
// Purpose: Resolve scanner-specific mappers without runtime type inspection.
// Dependencies: compliance-report-core
// ============================================================================

//! ## Overview
//! The mapper registry implements [`MapperResolver`] over a static table of
//! result mappers. Unknown scanner identities fail with
//! [`MapperError::UnknownScanner`], which aborts the report run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use compliance_report_core::MapperError;
use compliance_report_core::MapperResolver;
use compliance_report_core::ResultMapper;
use compliance_report_core::ScannerId;
use compliance_report_core::runtime::CONFIG_AUDIT_SCANNER;
use compliance_report_core::runtime::KUBE_BENCH_SCANNER;

use crate::ConfigAuditMapper;
use crate::KubeBenchMapper;

// ============================================================================
// SECTION: Mapper Registry
// ============================================================================

/// Result mapper registry.
#[derive(Default)]
pub struct MapperRegistry {
    /// Mapper implementations keyed by scanner identity.
    mappers: BTreeMap<ScannerId, Box<dyn ResultMapper + Send + Sync>>,
}

impl MapperRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in mappers registered.
    #[must_use]
    pub fn with_builtin_mappers() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_mappers();
        registry
    }

    /// Registers a mapper under a scanner identity, replacing any previous one.
    pub fn register_mapper(
        &mut self,
        scanner: impl Into<ScannerId>,
        mapper: impl ResultMapper + Send + Sync + 'static,
    ) {
        self.mappers.insert(scanner.into(), Box::new(mapper));
    }

    /// Registers the built-in mappers.
    pub fn register_builtin_mappers(&mut self) {
        self.register_mapper(KUBE_BENCH_SCANNER, KubeBenchMapper);
        self.register_mapper(CONFIG_AUDIT_SCANNER, ConfigAuditMapper);
    }

    /// Retains only the listed scanners.
    pub fn retain_scanners(&mut self, enabled: &[ScannerId]) {
        self.mappers.retain(|scanner, _| enabled.contains(scanner));
    }

    /// Returns registered scanner identities in sorted order.
    pub fn scanners(&self) -> impl Iterator<Item = &ScannerId> {
        self.mappers.keys()
    }

    /// Returns true when a mapper is registered for the scanner.
    #[must_use]
    pub fn contains(&self, scanner: &ScannerId) -> bool {
        self.mappers.contains_key(scanner)
    }
}

impl MapperResolver for MapperRegistry {
    fn resolve(&self, scanner: &ScannerId) -> Result<&dyn ResultMapper, MapperError> {
        let Some(mapper) = self.mappers.get(scanner) else {
            return Err(MapperError::UnknownScanner(scanner.to_string()));
        };
        let mapper: &dyn ResultMapper = &**mapper;
        Ok(mapper)
    }
}
