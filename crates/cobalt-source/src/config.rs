use std::path::Path;

use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Highest warning level accepted in `[diagnostics] warning_level`.
pub const MAX_WARNING_LEVEL: u8 = 4;

/// Compiler configuration, usually read from `cobalt.toml`.
///
/// ```toml
/// [compiler]
/// stdlib = true
/// chain_base_finalizer = true
///
/// [diagnostics]
/// warning_level = 4
/// warnings_as_errors = false
/// suppress = [109]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CompilerConfig {
    /// Settings that change what the compiler produces
    #[serde(default)]
    pub compiler: CompilerSection,

    /// Settings that change which diagnostics are reported
    #[serde(default)]
    pub diagnostics: DiagnosticsSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompilerSection {
    /// Register the platform library types (`System.Object` and friends)
    /// before compiling. Turned off only when compiling the platform library
    /// itself, where `System.Object` is a source declaration.
    #[serde(default = "default_true")]
    pub stdlib: bool,

    /// Make the `finally` block of a user finalizer call the base
    /// finalizer. Historical compilers did not.
    #[serde(default = "default_true")]
    pub chain_base_finalizer: bool,
}

impl Default for CompilerSection {
    fn default() -> Self {
        Self {
            stdlib: true,
            chain_base_finalizer: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticsSection {
    /// Warnings whose level is above this are dropped.
    #[serde(default = "default_warning_level")]
    pub warning_level: u8,

    /// Report every warning as an error.
    #[serde(default)]
    pub warnings_as_errors: bool,

    /// Warning codes that are never reported.
    #[serde(default)]
    pub suppress: Vec<i32>,
}

impl Default for DiagnosticsSection {
    fn default() -> Self {
        Self {
            warning_level: default_warning_level(),
            warnings_as_errors: false,
            suppress: vec![],
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_warning_level() -> u8 {
    MAX_WARNING_LEVEL
}

impl CompilerConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: CompilerConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Loading compiler configuration from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.diagnostics.warning_level > MAX_WARNING_LEVEL {
            return Err(ConfigError::InvalidValue {
                key: "diagnostics.warning_level".to_string(),
                message: format!(
                    "expected a level between 0 and {MAX_WARNING_LEVEL}, found {}",
                    self.diagnostics.warning_level
                ),
            });
        }
        Ok(())
    }

    pub fn suppressed_codes(&self) -> FxHashSet<i32> {
        self.diagnostics.suppress.iter().copied().collect()
    }
}
