use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors produced while reading a declaration manifest.
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error("Error reading declaration manifest {path}: {source}")]
    #[diagnostic(code(cobalt_syntax::manifest_read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid declaration manifest: {message}")]
    #[diagnostic(
        code(cobalt_syntax::manifest_parse),
        help("Declarations are listed as [[types]] tables with [[types.members]] entries")
    )]
    Parse { message: String },

    #[error("Unknown modifier `{0}`")]
    #[diagnostic(code(cobalt_syntax::unknown_modifier))]
    UnknownModifier(String),
}
