use std::fmt;

use miette::SourceSpan;
use serde::{Deserialize, Serialize};

/// A position in the source text a declaration was parsed from.
///
/// Locations are byte offsets plus a length, which is all miette needs to
/// underline a span. `line` is carried separately for plain-text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    /// 1-based line number, or 0 when unknown.
    #[serde(default)]
    pub line: u32,
    /// Byte offset of the first character.
    #[serde(default)]
    pub offset: usize,
    /// Length of the span in bytes.
    #[serde(default)]
    pub length: usize,
}

impl Location {
    /// A location that carries no position information. Used for members the
    /// compiler synthesizes itself.
    pub const NULL: Location = Location { line: 0, offset: 0, length: 0 };

    pub fn new(line: u32, offset: usize, length: usize) -> Self {
        Self { line, offset, length }
    }

    /// A location known only by its line.
    pub fn at_line(line: u32) -> Self {
        Self { line, offset: 0, length: 0 }
    }

    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }
}

impl From<Location> for SourceSpan {
    fn from(loc: Location) -> Self {
        SourceSpan::new(loc.offset.into(), loc.length)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "<internal>")
        } else {
            write!(f, "({})", self.line)
        }
    }
}
