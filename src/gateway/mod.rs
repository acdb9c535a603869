//! Gateway: the event loop connecting the game host to the translator.
//!
//! Chat lines are routed either to the command handlers or to automatic
//! translation. Translation jobs run in the background or inline depending
//! on `settings.dispatch`.

mod auto;
pub mod state;


use crate::commands::{self, Command, CommandContext, Invocation, Outcome, UNABLE_TO_TRANSLATE};
use polyglot_core::{
    config::{DispatchMode, Settings},
    error::TranslateError,
    language::{Language, Source},
    message::{Client, ClientId, HostEvent, ReplyMode},
    sanitize::sanitize,
    traits::{Host, Translator},
};
use state::DispatcherState;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Routes host events to commands and automatic translation.
pub struct Gateway {
    pub(super) translator: Arc<dyn Translator>,
    pub(super) host: Arc<dyn Host>,
    pub(super) settings: Settings,
    pub(super) state: DispatcherState,
    /// In-flight background jobs, drained on shutdown.
    jobs: Mutex<JoinSet<()>>,
}

impl Gateway {
    pub fn new(translator: Arc<dyn Translator>, host: Arc<dyn Host>, settings: Settings) -> Self {
        Self {
            translator,
            host,
            settings,
            state: DispatcherState::new(),
            jobs: Mutex::new(JoinSet::new()),
        }
    }

    /// Run until Ctrl-C or until the host closes its event stream.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        let mut rx = self
            .host
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("failed to start host {}: {e}", self.host.name()))?;

        info!(
            "Polyglot gateway running | host: {} | provider: {} | dispatch: {} | auto-translate: {}",
            self.host.name(),
            self.translator.name(),
            self.settings.dispatch,
            self.settings.effective_auto_translate(),
        );

        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Some(event) => {
                        self.handle_event(event).await;
                        self.host.acknowledge().await;
                    }
                    None => {
                        info!("Host {} closed its event stream", self.host.name());
                        break;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown().await;
        Ok(())
    }

    /// Process one host event. Events are handled in arrival order.
    pub async fn handle_event(self: &Arc<Self>, event: HostEvent) {
        match event {
            HostEvent::Say {
                client, text, at, ..
            } => {
                let text = text.trim();
                if let Some(invocation) = Command::parse(text, self.host.command_prefixes()) {
                    self.handle_command(&client, invocation).await;
                } else {
                    self.auto_translate(&client, text, at).await;
                }
            }
            HostEvent::Disconnect { client } => {
                if self.state.clear_preference(&client) {
                    debug!("cleared auto-translate preference of {client}");
                }
            }
        }
    }

    async fn handle_command(self: &Arc<Self>, client: &Client, invocation: Invocation<'_>) {
        debug!(
            "{} ran {:?} ({:?}): {}",
            client.name, invocation.command, invocation.mode, invocation.args
        );
        let ctx = CommandContext {
            settings: &self.settings,
            state: &self.state,
            client,
            args: invocation.args,
        };
        match commands::handle(invocation.command, &ctx) {
            Outcome::Private(text) => self.send_private(&client.id, &text).await,
            Outcome::Respond(text) => self.send_reply(&client.id, &text, invocation.mode).await,
            Outcome::Translate(request) => {
                let gw = self.clone();
                let id = client.id.clone();
                let mode = invocation.mode;
                self.run_job(async move {
                    match gw
                        .translate(&request.message, request.source, request.target)
                        .await
                    {
                        Ok(text) => {
                            let line = gw.format_delivery(&text);
                            gw.send_reply(&id, &line, mode).await;
                        }
                        Err(e) => {
                            warn!("translation for {id} failed: {e}");
                            gw.send_private(&id, UNABLE_TO_TRANSLATE).await;
                        }
                    }
                })
                .await;
            }
        }
    }

    /// Run a translation job according to the dispatch mode.
    pub(super) async fn run_job<F>(&self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self.settings.dispatch {
            DispatchMode::Inline => job.await,
            DispatchMode::Background => {
                let mut jobs = self.jobs.lock().await;
                while let Some(result) = jobs.try_join_next() {
                    log_job_result(result);
                }
                jobs.spawn(job);
            }
        }
    }

    /// Call the provider and clean its output for chat.
    pub(super) async fn translate(
        &self,
        text: &str,
        source: Source,
        target: Language,
    ) -> Result<String, TranslateError> {
        debug!(
            "translating via {} ({source} -> {target}): {text}",
            self.translator.name()
        );
        let raw = self.translator.translate(text, source, target).await?;
        let clean = sanitize(&raw);
        if clean.is_empty() {
            return Err(TranslateError::EmptyResult);
        }
        Ok(clean)
    }

    /// Prefix a translated line with the configured name and color.
    pub(super) fn format_delivery(&self, text: &str) -> String {
        let s = &self.settings;
        if s.display_translator_name {
            format!("{} {}{}", s.translator_name, s.message_prefix, text)
        } else {
            format!("{}{}", s.message_prefix, text)
        }
    }

    pub(super) async fn send_private(&self, client: &ClientId, text: &str) {
        if let Err(e) = self.host.message(client, text).await {
            error!("failed to message {client}: {e}");
        }
    }

    async fn send_reply(&self, client: &ClientId, text: &str, mode: ReplyMode) {
        if let Err(e) = self.host.respond(client, text, mode).await {
            error!("failed to reply to {client}: {e}");
        }
    }

    /// Graceful shutdown: wait for in-flight jobs, then stop the host.
    pub async fn shutdown(&self) {
        info!("Shutting down...");

        let mut jobs = self.jobs.lock().await;
        if !jobs.is_empty() {
            info!("waiting for {} translation job(s)", jobs.len());
        }
        while let Some(result) = jobs.join_next().await {
            log_job_result(result);
        }
        drop(jobs);

        if let Err(e) = self.host.stop().await {
            warn!("failed to stop host {}: {e}", self.host.name());
        }

        info!("Shutdown complete.");
    }
}

fn log_job_result(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            error!("translation job panicked: {e}");
        } else {
            warn!("translation job cancelled: {e}");
        }
    }
}
