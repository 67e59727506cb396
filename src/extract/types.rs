//! Extraction types

use crate::types::JsonValue;

/// Messages extracted from a capture, plus what was dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Parsed top-level objects, in capture order
    pub records: Vec<JsonValue>,
    /// Balanced fragments that were not valid JSON, plus a trailing unbalanced one
    pub malformed: usize,
    /// Valid objects dropped for lacking the required key
    pub filtered: usize,
}

impl Extraction {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
