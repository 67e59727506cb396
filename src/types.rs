//! Common types used throughout jb-schema-gen
//!
//! This module contains shared type definitions, type aliases,
//! and small naming helpers used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Category
// ============================================================================

/// Top-level record category a received state update belongs to
///
/// `ALL` is also the processing order used when emitting: the first
/// category that contains an enum field claims that enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Per-player state (`player:<id>` / `bc:customer:<id>`)
    Player,
    /// Shared room state (`room` / `bc:room`)
    Room,
}

impl Category {
    /// All categories in emission order
    pub const ALL: [Category; 2] = [Category::Player, Category::Room];

    /// Capitalized name, used as type-name prefix
    pub fn name(self) -> &'static str {
        match self {
            Category::Player => "Player",
            Category::Room => "Room",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Naming
// ============================================================================

/// Uppercase the first character, leaving the rest untouched
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
