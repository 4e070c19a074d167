use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while loading the compiler configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Error reading compiler configuration {path}: {source}")]
    #[diagnostic(
        code("CONFIG-001"),
        help("Check file permissions and ensure the file exists")
    )]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has the wrong shape
    #[error("Invalid compiler configuration: {0}")]
    #[diagnostic(
        code("CONFIG-002"),
        help("Check your cobalt.toml syntax against the documented sections")
    )]
    Parse(String),

    /// A setting is present but out of range
    #[error("Invalid value for `{key}`: {message}")]
    #[diagnostic(code("CONFIG-003"))]
    InvalidValue { key: String, message: String },
}
