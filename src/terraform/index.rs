//! Dependency index keyed by target and name

use super::extractor::extract_dependencies;
use super::writer::read_terraform_file;
use crate::domain::{DependencyKey, DependencyRecord, Target};
use crate::error::{LookupError, ScanError};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Typed map of dependency records
#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    records: BTreeMap<DependencyKey, DependencyRecord>,
}

impl DependencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record; a later record with the same key replaces the earlier one
    pub fn insert(&mut self, record: DependencyRecord) {
        let key = record.key();
        if let Some(previous) = self.records.get(&key) {
            tracing::warn!(
                key = %key,
                previous = %previous.file_path.display(),
                current = %record.file_path.display(),
                "Duplicate declaration, keeping the later one"
            );
        }
        self.records.insert(key, record);
    }

    /// Looks up a record by target and name
    pub fn get(&self, target: Target, name: &str) -> Result<&DependencyRecord, LookupError> {
        self.records
            .get(&DependencyKey::new(target, name))
            .ok_or_else(|| LookupError::NotFound {
                target,
                name: name.to_string(),
            })
    }

    /// Returns the records for one target, ordered by name
    pub fn by_target(&self, target: Target) -> impl Iterator<Item = &DependencyRecord> {
        self.records
            .iter()
            .filter(move |(key, _)| key.target == target)
            .map(|(_, record)| record)
    }

    pub fn records(&self) -> impl Iterator<Item = &DependencyRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reads every file and indexes the declarations found, in file order
pub fn scan_files(files: &[PathBuf]) -> Result<DependencyIndex, ScanError> {
    let mut index = DependencyIndex::new();
    for path in files {
        let content = read_terraform_file(path)?;
        for record in extract_dependencies(path, &content) {
            index.insert(record);
        }
    }
    Ok(index)
}
