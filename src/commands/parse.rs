//! Argument grammars for the translation commands.

use polyglot_core::{
    error::{InvalidLanguageCode, Side},
    language::{Language, Source},
    sanitize::strip_colors,
};
use regex::Regex;
use std::sync::LazyLock;

/// `<source>*<target>` at the very start, then whitespace or end of input.
static LANGUAGE_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(\w*)\*(\w*)(?:\s+(.*))?$").expect("valid regex")
});

/// `on|off` followed by an optional language code.
static TRANSAUTO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(on|off)(?:\s+(\w+))?$").expect("valid regex"));

/// Why a command argument was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing after the command name.
    MissingData,
    /// The argument does not follow the command's grammar.
    InvalidData,
    InvalidLanguage(InvalidLanguageCode),
}

impl From<InvalidLanguageCode> for ParseError {
    fn from(e: InvalidLanguageCode) -> Self {
        Self::InvalidLanguage(e)
    }
}

impl ParseError {
    /// The line shown to the player, pointing at the help for `command`.
    pub fn reply(&self, command: &str) -> String {
        match self {
            Self::MissingData => format!("^7missing data, try ^3!^7help {command}"),
            Self::InvalidData => format!("^7invalid data, try ^3!^7help {command}"),
            Self::InvalidLanguage(e) => {
                format!(
                    "^7invalid ^1{} ^7language specified, try ^3!^7translang",
                    e.side
                )
            }
        }
    }
}

/// A fully resolved `!translate` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateRequest {
    pub source: Source,
    pub target: Language,
    pub message: String,
}

/// Parse `[<source>*<target>] <message>`.
///
/// Language codes are only recognised at the start of the argument; a `*`
/// anywhere else belongs to the message. Empty codes fall back to the given
/// defaults. Color codes are stripped from the message.
pub fn parse_translate(
    args: &str,
    default_source: Source,
    default_target: Language,
) -> Result<TranslateRequest, ParseError> {
    let args = args.trim();
    if args.is_empty() {
        return Err(ParseError::MissingData);
    }

    let (source, target, message) = match LANGUAGE_PAIR.captures(args) {
        Some(caps) => {
            let message = caps.get(3).map_or("", |m| m.as_str());
            let source = match caps[1].to_lowercase().as_str() {
                "" => default_source,
                code => Source::parse(code)?,
            };
            let target = match caps[2].to_lowercase().as_str() {
                "" => default_target,
                code => Language::parse(code, Side::Target)?,
            };
            (source, target, message)
        }
        None => (default_source, default_target, args),
    };

    let message = strip_colors(message).trim().to_string();
    if message.is_empty() {
        return Err(ParseError::InvalidData);
    }
    Ok(TranslateRequest {
        source,
        target,
        message,
    })
}

/// Parse the optional `!translast` target.
pub fn parse_translast(args: &str, default_target: Language) -> Result<Language, ParseError> {
    match args.trim() {
        "" => Ok(default_target),
        code => Ok(Language::parse(&code.to_lowercase(), Side::Target)?),
    }
}

/// A parsed `!transauto` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransAuto {
    /// Enable, optionally switching to a new target.
    On(Option<Language>),
    Off,
}

/// Parse `<on|off> [<target>]`.
pub fn parse_transauto(args: &str) -> Result<TransAuto, ParseError> {
    let args = args.trim();
    if args.is_empty() {
        return Err(ParseError::MissingData);
    }
    let caps = TRANSAUTO.captures(args).ok_or(ParseError::InvalidData)?;
    if caps[1].eq_ignore_ascii_case("off") {
        return Ok(TransAuto::Off);
    }
    let target = caps
        .get(2)
        .map(|m| Language::parse(&m.as_str().to_lowercase(), Side::Target))
        .transpose()?;
    Ok(TransAuto::On(target))
}
