//! Automatic translation of ordinary chat for players who opted in.

use super::state::LastMessage;
use super::Gateway;
use chrono::{DateTime, Utc};
use polyglot_core::{
    config::AutoTranslatePolicy,
    language::{Language, Source},
    message::{Client, ClientId},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// One provider call and the players who receive its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Batch {
    pub target: Language,
    pub recipients: Vec<ClientId>,
}

/// Group listeners into provider calls.
///
/// `Shared` makes a single call with `default_target`. `PerClient` makes one
/// call per distinct preferred target, in order of first appearance.
pub(super) fn plan_batches(
    listeners: Vec<(ClientId, Language)>,
    policy: AutoTranslatePolicy,
    default_target: Language,
) -> Vec<Batch> {
    match policy {
        AutoTranslatePolicy::Shared => vec![Batch {
            target: default_target,
            recipients: listeners.into_iter().map(|(id, _)| id).collect(),
        }],
        AutoTranslatePolicy::PerClient => {
            let mut batches: Vec<Batch> = Vec::new();
            for (id, target) in listeners {
                match batches.iter_mut().find(|b| b.target == target) {
                    Some(batch) => batch.recipients.push(id),
                    None => batches.push(Batch {
                        target,
                        recipients: vec![id],
                    }),
                }
            }
            batches
        }
    }
}

impl Gateway {
    /// Handle an ordinary chat line.
    pub(super) async fn auto_translate(
        self: &Arc<Self>,
        author: &Client,
        text: &str,
        at: DateTime<Utc>,
    ) {
        let settings = &self.settings;
        if text.chars().count() < settings.min_sentence_length {
            return;
        }
        if text.starts_with(self.host.command_prefixes()) {
            return;
        }

        self.state.remember(LastMessage {
            text: text.to_string(),
            author: author.clone(),
            at,
        });

        let clients = self.host.clients().await;
        let listeners = self.state.listeners(&clients, &author.id);
        if listeners.is_empty() {
            return;
        }

        if settings.rate_limited()
            && !self
                .state
                .try_acquire_rate(Instant::now(), settings.min_time_between)
        {
            debug!("auto-translate skipped: rate limited");
            return;
        }

        let batches = plan_batches(
            listeners,
            settings.effective_auto_translate(),
            settings.default_target,
        );
        for batch in batches {
            let gw = self.clone();
            let text = text.to_string();
            self.run_job(async move { gw.deliver_batch(&text, batch).await })
                .await;
        }
    }

    /// Translate once and send the result to every recipient. A failed
    /// translation is logged and nothing is sent.
    async fn deliver_batch(&self, text: &str, batch: Batch) {
        let translated = match self.translate(text, Source::Auto, batch.target).await {
            Ok(t) => t,
            Err(e) => {
                warn!("auto-translation to {} failed: {e}", batch.target);
                return;
            }
        };
        let line = self.format_delivery(&translated);
        for recipient in &batch.recipients {
            self.send_private(recipient, &line).await;
        }
    }
}
