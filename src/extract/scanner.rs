//! Brace-depth scanner over capture text

use super::types::Extraction;
use crate::types::JsonValue;
use tracing::debug;

/// Extracts JSON objects embedded in arbitrary text
#[derive(Debug, Clone, Default)]
pub struct CaptureExtractor {
    /// Top-level key every kept message must carry
    required_key: Option<String>,
}

/// Scanner state; carries across lines and files
#[derive(Debug, Default)]
struct ScanState {
    depth: usize,
    in_string: bool,
    escaped: bool,
    fragment: String,
}

impl CaptureExtractor {
    /// Create an extractor that keeps every object
    pub fn new() -> Self {
        Self::default()
    }

    /// Only keep objects that contain `key` at the top level
    #[must_use]
    pub fn with_required_key(mut self, key: impl Into<String>) -> Self {
        self.required_key = Some(key.into());
        self
    }

    pub fn required_key(&self) -> Option<&str> {
        self.required_key.as_deref()
    }

    /// Extract every balanced top-level object from `text`
    ///
    /// Text outside braces is ignored. Braces inside JSON string literals do
    /// not count towards nesting. A string literal still open at the end of a
    /// line abandons its fragment.
    pub fn extract(&self, text: &str) -> Extraction {
        let mut extraction = Extraction::default();
        let mut state = ScanState::default();

        for c in text.chars() {
            if state.depth == 0 {
                if c == '{' {
                    state.depth = 1;
                    state.fragment.push(c);
                }
                continue;
            }

            if state.in_string && c == '\n' {
                // JSON strings cannot hold a raw newline: the quote was noise
                debug!(
                    "Dropping fragment with an unterminated string ({} bytes)",
                    state.fragment.len()
                );
                extraction.malformed += 1;
                state = ScanState::default();
                continue;
            }

            state.fragment.push(c);
            if state.in_string {
                if state.escaped {
                    state.escaped = false;
                } else if c == '\\' {
                    state.escaped = true;
                } else if c == '"' {
                    state.in_string = false;
                }
                continue;
            }

            match c {
                '"' => state.in_string = true,
                '{' => state.depth += 1,
                '}' => {
                    state.depth -= 1;
                    if state.depth == 0 {
                        self.finish_fragment(&state.fragment, &mut extraction);
                        state.fragment.clear();
                    }
                }
                _ => {}
            }
        }

        if !state.fragment.is_empty() {
            debug!(
                "Dropping unterminated fragment of {} bytes",
                state.fragment.len()
            );
            extraction.malformed += 1;
        }

        extraction
    }

    fn finish_fragment(&self, fragment: &str, extraction: &mut Extraction) {
        match serde_json::from_str::<JsonValue>(fragment) {
            Ok(value) => {
                let keep = match (&self.required_key, &value) {
                    (None, _) => true,
                    (Some(key), JsonValue::Object(map)) => map.contains_key(key),
                    (Some(_), _) => false,
                };
                if keep {
                    extraction.records.push(value);
                } else {
                    extraction.filtered += 1;
                }
            }
            Err(e) => {
                debug!("Skipping malformed fragment: {e}");
                extraction.malformed += 1;
            }
        }
    }
}
