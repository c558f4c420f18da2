use crate::domain::model::DinosaurRecord;
use crate::utils::error::{RelayError, Result};
use std::collections::HashMap;
use std::path::Path;

const EMBEDDED_DATASET: &str = include_str!("../../data/dinosaurs.json");

/// Read-only dinosaur dataset, indexed by lower-cased name.
#[derive(Debug, Clone)]
pub struct DinosaurIndex {
    records: Vec<DinosaurRecord>,
    by_name: HashMap<String, usize>,
}

/// Outcome of a dataset query.
#[derive(Debug, PartialEq)]
pub enum DinosaurLookup<'a> {
    All(&'a [DinosaurRecord]),
    Found(&'a DinosaurRecord),
    NotFound,
}

impl DinosaurIndex {
    pub fn new(records: Vec<DinosaurRecord>) -> Self {
        let mut by_name = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            // first entry wins, same as a front-to-back scan
            by_name.entry(record.name.to_lowercase()).or_insert(position);
        }
        Self { records, by_name }
    }

    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_DATASET)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let records: Vec<DinosaurRecord> = serde_json::from_str(content)?;
        Ok(Self::new(records))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| RelayError::DatasetError {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_json_str(&content)
    }

    pub fn lookup(&self, name: &str) -> Option<&DinosaurRecord> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&position| &self.records[position])
    }

    pub fn query(&self, name: Option<&str>) -> DinosaurLookup<'_> {
        match name {
            None => DinosaurLookup::All(&self.records),
            Some(name) => self
                .lookup(name)
                .map_or(DinosaurLookup::NotFound, DinosaurLookup::Found),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
