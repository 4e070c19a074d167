use std::path::PathBuf;

use cobalt_source::ConfigError;
use cobalt_syntax::ManifestError;
use miette::Diagnostic;
use thiserror::Error;

/// CLI-specific error type that provides rich diagnostics
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Failed while {operation}")]
    #[diagnostic(code(cobalt::cli::io_error))]
    IoError {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No declaration manifest given")]
    #[diagnostic(code(cobalt::cli::no_input), help("Pass one or more manifest files, e.g. `cobalt check shapes.toml`"))]
    NoInput,

    #[error("Resolution failed with {errors} error(s) and {warnings} warning(s)")]
    #[diagnostic(code(cobalt::cli::resolution_failed))]
    ResolutionFailed { errors: usize, warnings: usize },
}
