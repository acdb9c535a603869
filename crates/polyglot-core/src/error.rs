use std::fmt;
use thiserror::Error;

/// Top-level error type for Polyglot.
#[derive(Debug, Error)]
pub enum PolyglotError {
    /// A command argument named a language outside the registry.
    #[error(transparent)]
    InvalidLanguage(#[from] InvalidLanguageCode),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// The selected provider lacks the credentials it needs to run.
    #[error("provider misconfigured: {0}")]
    MisconfiguredProvider(String),

    /// Error from a translation provider.
    #[error("translation error: {0}")]
    Translation(#[from] TranslateError),

    /// Error from the game host.
    #[error("host error: {0}")]
    Host(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single provider round trip. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// Credential exchange failed or returned no token.
    #[error("authorization failed: {0}")]
    Auth(String),

    /// Transport error or non-2xx response.
    #[error("network failure: {0}")]
    Network(String),

    /// The provider answered with nothing usable.
    #[error("empty result")]
    EmptyResult,
}

/// Which side of a language pair a code was given for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// A language code that is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {side} language: {code}")]
pub struct InvalidLanguageCode {
    pub side: Side,
    pub code: String,
}

impl InvalidLanguageCode {
    pub fn new(side: Side, code: impl Into<String>) -> Self {
        Self {
            side,
            code: code.into(),
        }
    }
}
