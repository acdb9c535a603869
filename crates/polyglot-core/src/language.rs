//! Language registry: the fixed set of codes the translator accepts.

use crate::error::{InvalidLanguageCode, Side};
use std::fmt;

/// Code that asks the provider to detect the source language itself.
pub const AUTO: &str = "auto";

/// Supported languages, in display order.
const LANGUAGES: &[(&str, &str)] = &[
    ("ca", "Catalan"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("nl", "Dutch"),
    ("en", "English"),
    ("et", "Estonian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("de", "German"),
    ("el", "Greek"),
    ("ht", "Haitian Creole"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("it", "Italian"),
    ("lv", "Latvian"),
    ("lt", "Lithuanian"),
    ("no", "Norwegian"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("sl", "Slovenian"),
    ("es", "Spanish"),
    ("sv", "Swedish"),
    ("th", "Thai"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("ru", "Russian"),
    ("zh", "Chinese"),
];

/// A registry-validated language. Only obtainable through [`Language::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    code: &'static str,
    name: &'static str,
}

impl Language {
    /// Default target when nothing else is configured.
    pub const ENGLISH: Self = Self {
        code: "en",
        name: "English",
    };

    /// Find a language by its exact (lowercase) code.
    pub fn lookup(code: &str) -> Option<Self> {
        LANGUAGES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|&(code, name)| Self { code, name })
    }

    /// Validate a user-supplied code, reporting which side it was meant for.
    pub fn parse(code: &str, side: Side) -> Result<Self, InvalidLanguageCode> {
        Self::lookup(code).ok_or_else(|| InvalidLanguageCode::new(side, code))
    }

    /// Every registered language, in display order.
    pub fn all() -> impl Iterator<Item = Self> {
        LANGUAGES
            .iter()
            .map(|&(code, name)| Self { code, name })
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

/// Source side of a translation: a concrete language or provider detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Source {
    #[default]
    Auto,
    Lang(Language),
}

impl Source {
    /// Parse a source code; `auto` selects detection.
    pub fn parse(code: &str) -> Result<Self, InvalidLanguageCode> {
        if code == AUTO {
            return Ok(Self::Auto);
        }
        Language::parse(code, Side::Source).map(Self::Lang)
    }

    /// The code to send to providers that accept `auto`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Auto => AUTO,
            Self::Lang(l) => l.code(),
        }
    }

    /// The concrete language, if one was given.
    pub fn language(&self) -> Option<Language> {
        match self {
            Self::Auto => None,
            Self::Lang(l) => Some(*l),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
