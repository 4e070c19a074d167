//! Declaration records for the Cobalt compiler.
//!
//! The parser hands the resolution passes one `CompilationUnit` per source
//! file. A unit holds namespaces, `using` directives and type declarations;
//! type declarations hold member declarations whose type names are still
//! unresolved strings and whose executable parts are opaque handles
//! (`BlockId`, `ExprId`) owned by the statement compiler.
//!
//! Units can also be read from a TOML declaration manifest, which is how the
//! command line driver and the integration tests feed the resolver.

pub mod ast;
mod error;
mod manifest;

pub use ast::*;
pub use error::ManifestError;
pub use manifest::{load_manifest, parse_manifest};
