//! Mutable state shared by the command and auto-translate paths.

use chrono::{DateTime, Utc};
use polyglot_core::{
    language::Language,
    message::{Client, ClientId},
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// The most recent chat line eligible for translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastMessage {
    pub text: String,
    pub author: Client,
    pub at: DateTime<Utc>,
}

/// A player's automatic translation choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preference {
    pub auto_translate_enabled: bool,
    pub target: Language,
}

/// Dispatcher state, owned by the gateway.
///
/// Each field sits behind its own lock and every update is a single
/// assignment, so readers never see a half-written value.
#[derive(Debug, Default)]
pub struct DispatcherState {
    last_message: Mutex<Option<LastMessage>>,
    last_auto_translation: Mutex<Option<Instant>>,
    preferences: Mutex<HashMap<ClientId, Preference>>,
}

/// A poisoned lock only means another task panicked mid-read; the data
/// behind it is still a complete value.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DispatcherState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remember(&self, message: LastMessage) {
        *lock(&self.last_message) = Some(message);
    }

    pub fn last_message(&self) -> Option<LastMessage> {
        lock(&self.last_message).clone()
    }

    pub fn preference(&self, client: &ClientId) -> Option<Preference> {
        lock(&self.preferences).get(client).copied()
    }

    pub fn set_preference(&self, client: ClientId, preference: Preference) {
        lock(&self.preferences).insert(client, preference);
    }

    /// Drop a player's preference. Returns whether one existed.
    pub fn clear_preference(&self, client: &ClientId) -> bool {
        lock(&self.preferences).remove(client).is_some()
    }

    /// Connected players, other than `author`, who want automatic
    /// translation, with their preferred targets. Keeps `clients` order.
    pub fn listeners(&self, clients: &[Client], author: &ClientId) -> Vec<(ClientId, Language)> {
        let preferences = lock(&self.preferences);
        clients
            .iter()
            .filter(|c| &c.id != author)
            .filter_map(|c| {
                preferences
                    .get(&c.id)
                    .filter(|p| p.auto_translate_enabled)
                    .map(|p| (c.id.clone(), p.target))
            })
            .collect()
    }

    /// Rate-limit gate for automatic translation.
    ///
    /// Returns `true` and records `now` when at least `min_interval` has
    /// passed since the last accepted call. A rejected call leaves the
    /// clock untouched.
    pub fn try_acquire_rate(&self, now: Instant, min_interval: Duration) -> bool {
        let mut last = lock(&self.last_auto_translation);
        if let Some(previous) = *last {
            if now.saturating_duration_since(previous) < min_interval {
                return false;
            }
        }
        *last = Some(now);
        true
    }
}
