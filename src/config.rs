//! Generator configuration
//!
//! Settings can come from an optional YAML file; command-line arguments are
//! applied on top of it.
//!
//! ```yaml
//! namespace_root: JackboxGPT
//! project_dir: ../JackboxGPT
//! enum_names: [state, kind]
//! key_fields: [action, key]
//! required_key: opcode
//! scaffold: true
//! ```

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Valid C# identifier (ASCII subset)
static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Root of the generated namespace (`<root>.Games.<Game>.Models`)
    pub namespace_root: String,

    /// Project checkout that receives the generated files
    pub project_dir: PathBuf,

    /// Field names whose string values become enumerations
    pub enum_names: Vec<String>,

    /// Fields kept literally when fingerprinting sent messages
    pub key_fields: Vec<String>,

    /// Top-level key a captured message must carry to be considered
    pub required_key: Option<String>,

    /// Write client/engine templates next to the models
    pub scaffold: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            namespace_root: "JackboxGPT".to_string(),
            project_dir: PathBuf::from("."),
            enum_names: Vec::new(),
            key_fields: vec!["action".to_string(), "key".to_string()],
            required_key: Some("opcode".to_string()),
            scaffold: true,
        }
    }
}

impl GeneratorConfig {
    /// Load and validate a YAML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a YAML config
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every setting can produce valid output
    pub fn validate(&self) -> Result<()> {
        if self.namespace_root.is_empty()
            || !self
                .namespace_root
                .split('.')
                .all(|part| IDENTIFIER_REGEX.is_match(part))
        {
            return Err(Error::invalid_value(
                "namespace_root",
                format!("'{}' is not a valid namespace", self.namespace_root),
            ));
        }

        if self.enum_names.iter().any(String::is_empty) {
            return Err(Error::invalid_value(
                "enum_names",
                format!("empty enum name in {:?}", self.enum_names),
            ));
        }

        if self.key_fields.iter().any(String::is_empty) {
            return Err(Error::invalid_value("key_fields", "empty field name"));
        }

        if self.required_key.as_deref() == Some("") {
            return Err(Error::invalid_value(
                "required_key",
                "must be omitted rather than empty",
            ));
        }

        Ok(())
    }

    /// Add enum names given on the command line, skipping duplicates
    pub fn add_enum_names<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.enum_names.contains(&name) {
                self.enum_names.push(name);
            }
        }
    }

    /// `<project>/src`
    pub fn src_dir(&self) -> PathBuf {
        self.project_dir.join("src")
    }

    /// `<project>/src/Engines`, whose presence marks a valid checkout
    pub fn engines_dir(&self) -> PathBuf {
        self.src_dir().join("Engines")
    }

    /// `<project>/src/Games/<game>/Models`
    pub fn models_dir(&self, game_name: &str) -> PathBuf {
        self.src_dir().join("Games").join(game_name).join("Models")
    }

    /// Fail unless the project checkout looks like the expected layout
    pub fn check_layout(&self) -> Result<()> {
        if self.engines_dir().is_dir() {
            Ok(())
        } else {
            Err(Error::layout(format!(
                "'{}' does not exist; run against the client project root or set project_dir",
                self.engines_dir().display()
            )))
        }
    }
}

/// Validate a game name for use as a C# type and namespace segment
pub fn validate_game_name(name: &str) -> Result<()> {
    if IDENTIFIER_REGEX.is_match(name) {
        Ok(())
    } else {
        Err(Error::invalid_value(
            "game",
            format!("'{name}' is not a valid identifier"),
        ))
    }
}
