use std::path::Path;

use crate::ast::CompilationUnit;
use crate::error::ManifestError;

/// Parses a declaration manifest.
///
/// ```toml
/// file = "shapes.cs"
/// usings = ["System"]
///
/// [[namespaces]]
/// name = "Shapes"
///
/// [[namespaces.types]]
/// kind = "class"
/// name = "Circle"
/// bases = ["Shape"]
///
/// [[namespaces.types.members]]
/// member = "method"
/// name = "Area"
/// returns = "double"
/// modifiers = ["public", "override"]
/// body = 1
/// ```
pub fn parse_manifest(text: &str) -> Result<CompilationUnit, ManifestError> {
    toml::from_str(text).map_err(|e| ManifestError::Parse { message: e.to_string() })
}

/// Reads and parses the manifest at `path`. The unit's `file` defaults to
/// the manifest path when the manifest does not name one.
pub fn load_manifest(path: &Path) -> Result<CompilationUnit, ManifestError> {
    log::debug!("Loading declaration manifest {}", path.display());
    let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut unit = parse_manifest(&text)?;
    if unit.file.is_empty() {
        unit.file = path.display().to_string();
    }
    Ok(unit)
}
