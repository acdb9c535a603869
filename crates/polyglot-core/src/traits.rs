use crate::{
    error::{PolyglotError, TranslateError},
    language::{Language, Source},
    message::{Client, ClientId, HostEvent, ReplyMode},
};
use async_trait::async_trait;

/// Translation provider trait.
///
/// Every translation backend (Google web endpoint, Microsoft Translator, ...)
/// implements this trait. The returned text is the provider's raw output;
/// callers sanitize it before showing it to players.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Translate `text` from `source` into `target`.
    async fn translate(
        &self,
        text: &str,
        source: Source,
        target: Language,
    ) -> Result<String, TranslateError>;
}

/// Game host trait: the bot framework the translator plugs into.
///
/// The host owns the player list, chat delivery, and the set of characters
/// that mark a chat line as a bot command.
#[async_trait]
pub trait Host: Send + Sync {
    /// Human-readable host name.
    fn name(&self) -> &str;

    /// Start listening for chat events.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<HostEvent>, PolyglotError>;

    /// Currently connected players.
    async fn clients(&self) -> Vec<Client>;

    /// Send a private message to one player.
    async fn message(&self, client: &ClientId, text: &str) -> Result<(), PolyglotError>;

    /// Reply to a command, privately or publicly depending on `mode`.
    async fn respond(
        &self,
        client: &ClientId,
        text: &str,
        mode: ReplyMode,
    ) -> Result<(), PolyglotError>;

    /// Characters that mark a chat line as a bot command.
    fn command_prefixes(&self) -> &[char];

    /// Called once the consumer has finished handling the last event taken
    /// from the receiver. Hosts that track the player list themselves wait
    /// for this before applying the next event, so `clients()` always
    /// matches the event being handled.
    async fn acknowledge(&self) {}

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), PolyglotError> {
        Ok(())
    }
}
