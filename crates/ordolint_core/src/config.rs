//! Linter configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::LinterError;
use crate::fix::DEFAULT_MAX_PASSES;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

/// File names probed by [`LinterConfig::discover`], in order.
pub const CONFIG_FILE_NAMES: &[&str] = &[".ordolint.jsonc", ".ordolint.json"];

/// Configuration for the linter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinterConfig {
    /// Upper bound on autocorrect passes per format call.
    #[serde(default = "default_max_format_passes")]
    pub max_format_passes: usize,

    /// Qualified ids of rules that are never scheduled.
    #[serde(default)]
    pub disabled_rules: Vec<String>,

    /// Whether `ordolint-disable` style comments are honoured.
    #[serde(default = "default_inline_directives")]
    pub inline_directives: bool,
}

fn default_max_format_passes() -> usize {
    DEFAULT_MAX_PASSES
}

fn default_inline_directives() -> bool {
    true
}

impl LinterConfig {
    /// Creates a configuration with every default.
    pub fn new() -> Self {
        Self {
            max_format_passes: default_max_format_passes(),
            disabled_rules: Vec::new(),
            inline_directives: default_inline_directives(),
        }
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.ordolint.jsonc`, `.ordolint.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| LinterError::config(format!("Failed to read config: {}", e)))?;
        debug!("Loaded config from {}", path.display());
        Self::from_json(&content)
    }

    /// Looks for a config file directly inside `dir`.
    ///
    /// Returns `Ok(None)` when none of [`CONFIG_FILE_NAMES`] exists.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Option<Self>, LinterError> {
        match find_config_file(dir.as_ref()) {
            Some(path) => Self::from_file(path).map(Some),
            None => Ok(None),
        }
    }

    /// Parses configuration from a JSON (or JSONC) string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, LinterError> {
        // Comments and trailing commas are accepted; an empty document is `{}`.
        let value: serde_json::Value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| LinterError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        let schema = config_schema()?;
        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(LinterError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| LinterError::config(format!("Invalid config: {}", e)))
    }

    /// Whether the rule with qualified id `rule_id` may be scheduled.
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        !self.disabled_rules.iter().any(|id| id == rule_id)
    }

    /// Computes a hash of the configuration, e.g. for result caching by callers.
    pub fn hash(&self) -> Result<String, LinterError> {
        let json = serde_json::to_string(self)
            .map_err(|e| LinterError::internal(format!("Failed to serialize config: {}", e)))?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn config_schema() -> Result<&'static Validator, LinterError> {
    CONFIG_SCHEMA
        .get_or_init(|| {
            let schema_json: serde_json::Value = serde_json::from_str(SCHEMA_JSON)
                .map_err(|e| format!("Invalid embedded config schema: {}", e))?;
            Validator::new(&schema_json)
                .map_err(|e| format!("Invalid config schema compilation: {}", e))
        })
        .as_ref()
        .map_err(|e| LinterError::internal(e.clone()))
}

fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
