//! Translation commands: `!translate`, `!translast`, `!transauto`, `!translang`.
//!
//! Handling is synchronous: it reads and updates dispatcher state and tells
//! the gateway what to send. Provider calls are left to the gateway.

mod parse;


pub use parse::{
    parse_translast, parse_transauto, parse_translate, ParseError, TransAuto, TranslateRequest,
};

use crate::gateway::state::{DispatcherState, Preference};
use polyglot_core::{
    config::Settings,
    language::{Language, Source},
    message::{Client, ReplyMode},
};

/// Grouped context for command execution.
pub struct CommandContext<'a> {
    pub settings: &'a Settings,
    pub state: &'a DispatcherState,
    pub client: &'a Client,
    pub args: &'a str,
}

/// Known translation commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Translate,
    TransLast,
    TransAuto,
    TransLang,
}

/// A recognised command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub command: Command,
    pub mode: ReplyMode,
    /// Everything after the command name, trimmed.
    pub args: &'a str,
}

impl Command {
    /// Match a command name or alias, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "translate" | "tr" => Some(Self::Translate),
            "translast" | "tl" => Some(Self::TransLast),
            "transauto" | "ta" => Some(Self::TransAuto),
            "translang" | "tlang" => Some(Self::TransLang),
            _ => None,
        }
    }

    /// Parse a chat line. Returns `None` for ordinary chat and for commands
    /// this plugin does not own.
    pub fn parse<'a>(text: &'a str, prefixes: &[char]) -> Option<Invocation<'a>> {
        let text = text.trim_start();
        let mut chars = text.chars();
        let prefix = chars.next().filter(|c| prefixes.contains(c))?;
        let rest = chars.as_str();
        let (name, args) = rest
            .split_once(char::is_whitespace)
            .unwrap_or((rest, ""));
        Some(Invocation {
            command: Self::from_name(name)?,
            mode: ReplyMode::from_prefix(prefix),
            args: args.trim(),
        })
    }
}

/// What the gateway should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Tell only the invoking player.
    Private(String),
    /// Reply using the invocation's reply mode.
    Respond(String),
    /// Translate, then reply using the invocation's reply mode.
    Translate(TranslateRequest),
}

/// Replies use the game's colour codes, like delivered translations.
pub const UNABLE_TO_TRANSLATE: &str = "^7unable to translate";
const NO_LAST_MESSAGE: &str = "^7unable to translate last message";

/// Handle a command and return what to send.
pub fn handle(cmd: Command, ctx: &CommandContext<'_>) -> Outcome {
    match cmd {
        Command::Translate => handle_translate(ctx),
        Command::TransLast => handle_translast(ctx),
        Command::TransAuto => handle_transauto(ctx),
        Command::TransLang => Outcome::Respond(format!("^7Languages: {}", language_list())),
    }
}

fn handle_translate(ctx: &CommandContext<'_>) -> Outcome {
    let settings = ctx.settings;
    match parse_translate(ctx.args, settings.default_source, settings.default_target) {
        Ok(request) => Outcome::Translate(request),
        Err(e) => Outcome::Private(e.reply("translate")),
    }
}

fn handle_translast(ctx: &CommandContext<'_>) -> Outcome {
    let Some(last) = ctx.state.last_message() else {
        return Outcome::Private(NO_LAST_MESSAGE.to_string());
    };
    match parse_translast(ctx.args, ctx.settings.default_target) {
        Ok(target) => Outcome::Translate(TranslateRequest {
            source: Source::Auto,
            target,
            message: last.text,
        }),
        Err(e) => Outcome::Private(e.reply("translast")),
    }
}

fn handle_transauto(ctx: &CommandContext<'_>) -> Outcome {
    let id = &ctx.client.id;
    match parse_transauto(ctx.args) {
        Ok(TransAuto::On(target)) => {
            // Re-enabling without a code keeps the player's current target.
            let target = target
                .or_else(|| ctx.state.preference(id).map(|p| p.target))
                .unwrap_or(ctx.settings.default_target);
            ctx.state.set_preference(
                id.clone(),
                Preference {
                    auto_translate_enabled: true,
                    target,
                },
            );
            Outcome::Private(format!(
                "^7Transauto: ^2enabled^7. Language: ^3{}",
                target.name()
            ))
        }
        Ok(TransAuto::Off) => {
            ctx.state.clear_preference(id);
            Outcome::Private("^7Transauto: ^1disabled".to_string())
        }
        Err(e) => Outcome::Private(e.reply("transauto")),
    }
}

/// Every supported language as `^2code^7:Name`, comma separated.
pub fn language_list() -> String {
    Language::all()
        .map(|l| format!("^2{}^7:{}", l.code(), l.name()))
        .collect::<Vec<_>>()
        .join(", ")
}
