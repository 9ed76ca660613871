// crates/compliance-report-scanners/src/file_source.rs
// ============================================================================
// Module: File Resource Source
// Description: Resource source reading scanner report objects from disk.
// Purpose: Serve `(scanner, kind)` collections from a directory tree.
// Dependencies: compliance-report-core, serde_json, serde_yaml
// ============================================================================

//! ## Overview
//! Resources for `(scanner, kind)` live under `<root>/<scanner>/<kind>/` as
//! one document per file. A file holding an array contributes each element.
//! A missing directory is an empty collection. Files are read in sorted name
//! order and every file is size-limited.
//! Security posture: scanner and kind names are untrusted; path components are
//! validated and resolved paths must stay under the root.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use compliance_report_core::ResourceList;
use compliance_report_core::ResourceSource;
use compliance_report_core::ScannerId;
use compliance_report_core::SourceError;
use serde_json::Value;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default maximum size of one resource file.
pub const DEFAULT_MAX_FILE_BYTES: usize = 4 * 1024 * 1024;

/// Default maximum number of files per `(scanner, kind)` directory.
pub const DEFAULT_MAX_FILES: usize = 10_000;

/// Configuration for the file resource source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResourceSourceConfig {
    /// Root directory.
    pub root: PathBuf,
    /// Maximum size of one file, in bytes.
    pub max_file_bytes: usize,
    /// Maximum number of files per directory.
    pub max_files: usize,
    /// Accept `.yaml` and `.yml` files.
    pub allow_yaml: bool,
}

impl FileResourceSourceConfig {
    /// Creates a configuration with default limits.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_files: DEFAULT_MAX_FILES,
            allow_yaml: true,
        }
    }
}

// ============================================================================
// SECTION: File Resource Source
// ============================================================================

/// Resource source backed by a directory tree.
#[derive(Debug, Clone)]
pub struct FileResourceSource {
    /// Source configuration.
    config: FileResourceSourceConfig,
}

impl FileResourceSource {
    /// Creates a file resource source.
    #[must_use]
    pub const fn new(config: FileResourceSourceConfig) -> Self {
        Self {
            config,
        }
    }

    /// Returns the source configuration.
    #[must_use]
    pub const fn config(&self) -> &FileResourceSourceConfig {
        &self.config
    }

    /// Lists candidate files in sorted order.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
        let entries = fs::read_dir(dir)
            .map_err(|err| SourceError::Io(format!("unable to list {}: {err}", dir.display())))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| SourceError::Io(err.to_string()))?;
            let path = entry.path();
            if !path.is_file() || document_format(&path, self.config.allow_yaml).is_none() {
                continue;
            }
            files.push(path);
            if files.len() > self.config.max_files {
                return Err(SourceError::Invalid(format!(
                    "{} holds more than {} resource files",
                    dir.display(),
                    self.config.max_files
                )));
            }
        }
        files.sort();
        Ok(files)
    }
}

impl ResourceSource for FileResourceSource {
    fn fetch(&self, scanner: &ScannerId, kind: &str) -> Result<ResourceList, SourceError> {
        validate_component(scanner.as_str())?;
        validate_component(kind)?;
        let dir = self.config.root.join(scanner.as_str()).join(kind);
        if !dir.is_dir() {
            return Ok(ResourceList::new(kind, Vec::new()));
        }
        let mut items = Vec::new();
        for path in self.list_files(&dir)? {
            let content = read_file_limited(&path, self.config.max_file_bytes)?;
            match parse_document(&path, &content, self.config.allow_yaml)? {
                Value::Array(values) => items.extend(values),
                value => items.push(value),
            }
        }
        Ok(ResourceList::new(kind, items))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

/// Returns the document format implied by a file extension.
fn document_format(path: &Path, allow_yaml: bool) -> Option<DocumentFormat> {
    let ext = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
    match ext.to_ascii_lowercase().as_str() {
        "json" => Some(DocumentFormat::Json),
        "yaml" | "yml" if allow_yaml => Some(DocumentFormat::Yaml),
        _ => None,
    }
}

/// Rejects names that would leave the `<root>/<scanner>/<kind>` layout.
fn validate_component(component: &str) -> Result<(), SourceError> {
    let invalid = component.is_empty()
        || component == "."
        || component == ".."
        || component.contains(['/', '\\'])
        || component.chars().any(char::is_control);
    if invalid {
        return Err(SourceError::Invalid(format!("invalid resource path component: {component:?}")));
    }
    Ok(())
}

/// Reads a file while enforcing a maximum byte limit.
fn read_file_limited(path: &Path, max_bytes: usize) -> Result<Vec<u8>, SourceError> {
    let file = File::open(path)
        .map_err(|err| SourceError::Io(format!("unable to open {}: {err}", path.display())))?;
    let limit = u64::try_from(max_bytes.saturating_add(1))
        .map_err(|_| SourceError::Invalid("resource size limit exceeds u64".to_string()))?;
    let mut buf = Vec::new();
    file.take(limit)
        .read_to_end(&mut buf)
        .map_err(|err| SourceError::Io(format!("unable to read {}: {err}", path.display())))?;
    if buf.len() > max_bytes {
        return Err(SourceError::Invalid(format!(
            "{} exceeds size limit of {max_bytes} bytes",
            path.display()
        )));
    }
    Ok(buf)
}

/// Parses a JSON or YAML document.
fn parse_document(path: &Path, content: &[u8], allow_yaml: bool) -> Result<Value, SourceError> {
    match document_format(path, allow_yaml) {
        Some(DocumentFormat::Yaml) => serde_yaml::from_slice(content)
            .map_err(|err| SourceError::Invalid(format!("invalid yaml in {}: {err}", path.display()))),
        _ => serde_json::from_slice(content)
            .map_err(|err| SourceError::Invalid(format!("invalid json in {}: {err}", path.display()))),
    }
}
