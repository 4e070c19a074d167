use std::fmt;

use bitflags::bitflags;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::ManifestError;

bitflags! {
    /// Declaration modifiers as written in source.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        const NEW       = 1 << 0;
        const PUBLIC    = 1 << 1;
        const PROTECTED = 1 << 2;
        const INTERNAL  = 1 << 3;
        const PRIVATE   = 1 << 4;
        const ABSTRACT  = 1 << 5;
        const SEALED    = 1 << 6;
        const STATIC    = 1 << 7;
        const READONLY  = 1 << 8;
        const VIRTUAL   = 1 << 9;
        const OVERRIDE  = 1 << 10;
        const EXTERN    = 1 << 11;
        const VOLATILE  = 1 << 12;
        const UNSAFE    = 1 << 13;

        const ACCESSIBILITY = Self::PUBLIC.bits()
            | Self::PROTECTED.bits()
            | Self::INTERNAL.bits()
            | Self::PRIVATE.bits();
    }
}

const KEYWORDS: &[(&str, Modifiers)] = &[
    ("new", Modifiers::NEW),
    ("public", Modifiers::PUBLIC),
    ("protected", Modifiers::PROTECTED),
    ("internal", Modifiers::INTERNAL),
    ("private", Modifiers::PRIVATE),
    ("abstract", Modifiers::ABSTRACT),
    ("sealed", Modifiers::SEALED),
    ("static", Modifiers::STATIC),
    ("readonly", Modifiers::READONLY),
    ("virtual", Modifiers::VIRTUAL),
    ("override", Modifiers::OVERRIDE),
    ("extern", Modifiers::EXTERN),
    ("volatile", Modifiers::VOLATILE),
    ("unsafe", Modifiers::UNSAFE),
];

impl Modifiers {
    /// Parses a single modifier keyword.
    pub fn from_keyword(word: &str) -> Result<Modifiers, ManifestError> {
        KEYWORDS
            .iter()
            .find(|(kw, _)| *kw == word)
            .map(|(_, m)| *m)
            .ok_or_else(|| ManifestError::UnknownModifier(word.to_string()))
    }

    /// Parses a whitespace separated modifier list such as `"public static"`.
    pub fn parse(text: &str) -> Result<Modifiers, ManifestError> {
        text.split_whitespace()
            .try_fold(Modifiers::empty(), |acc, w| Ok(acc | Modifiers::from_keyword(w)?))
    }

    /// The keywords set in this mask, in canonical order.
    pub fn keywords(self) -> impl Iterator<Item = &'static str> {
        KEYWORDS
            .iter()
            .filter(move |(_, m)| self.contains(*m))
            .map(|(kw, _)| *kw)
    }

    /// Whether any access modifier was written.
    pub fn has_access(self) -> bool {
        self.intersects(Modifiers::ACCESSIBILITY)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words: Vec<&str> = self.keywords().collect();
        write!(f, "{}", words.join(" "))
    }
}

impl Serialize for Modifiers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let words: Vec<&str> = self.keywords().collect();
        let mut seq = serializer.serialize_seq(Some(words.len()))?;
        for w in words {
            seq.serialize_element(w)?;
        }
        seq.end()
    }
}

/// Accepts either `["public", "static"]` or `"public static"`.
impl<'de> Deserialize<'de> for Modifiers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ModifierVisitor;

        impl<'de> Visitor<'de> for ModifierVisitor {
            type Value = Modifiers;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a list of modifier keywords")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Modifiers, E> {
                Modifiers::parse(v).map_err(E::custom)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Modifiers, A::Error> {
                let mut mods = Modifiers::empty();
                while let Some(word) = seq.next_element::<String>()? {
                    mods |= Modifiers::from_keyword(&word).map_err(de::Error::custom)?;
                }
                Ok(mods)
            }
        }

        deserializer.deserialize_any(ModifierVisitor)
    }
}
