//! Class label list, index-aligned with the model's output vector.

use crate::error::{BreedScanError, Result};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelList {
    names: Vec<String>,
}

impl LabelList {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Parse a JSON array of class-name strings.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let names: Vec<String> = serde_json::from_str(raw)
            .map_err(|e| BreedScanError::LabelLoad(format!("expected a JSON array of strings: {e}")))?;
        Ok(Self { names })
    }

    /// Read and parse a label file such as `class_names.json`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            BreedScanError::LabelLoad(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// User-facing form of a label: underscores become spaces.
    pub fn display_name(&self, index: usize) -> Option<String> {
        self.get(index).map(|name| name.replace('_', " "))
    }
}
