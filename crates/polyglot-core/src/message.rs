use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Host-assigned identity of a connected player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(pub String);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A connected player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    /// Display name as shown in game.
    pub name: String,
}

impl Client {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ClientId(id.into()),
            name: name.into(),
        }
    }
}

/// An event delivered by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HostEvent {
    /// A player wrote in chat (public or team).
    Say {
        client: Client,
        text: String,
        /// Team chat rather than global chat.
        #[serde(default)]
        team: bool,
        at: DateTime<Utc>,
    },
    /// A player left the server.
    Disconnect { client: ClientId },
}

/// How a command reply should be routed, chosen by the prefix the player used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyMode {
    /// Only the invoking player sees the reply.
    #[default]
    Private,
    /// Everyone sees the reply.
    Loud,
    /// Everyone sees the reply, shown prominently.
    Big,
}

impl ReplyMode {
    /// Map a command prefix to its reply mode. Prefixes follow the usual
    /// admin-bot convention: `!` and `/` private, `@` loud, `&` big.
    pub fn from_prefix(prefix: char) -> Self {
        match prefix {
            '@' => Self::Loud,
            '&' => Self::Big,
            _ => Self::Private,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_mode_from_prefix() {
        assert_eq!(ReplyMode::from_prefix('!'), ReplyMode::Private);
        assert_eq!(ReplyMode::from_prefix('/'), ReplyMode::Private);
        assert_eq!(ReplyMode::from_prefix('@'), ReplyMode::Loud);
        assert_eq!(ReplyMode::from_prefix('&'), ReplyMode::Big);
    }

    #[test]
    fn test_say_event_team_defaults_false() {
        let json = r#"{"Say":{"client":{"id":"3","name":"Fenix"},"text":"hi","at":"2024-01-01T00:00:00Z"}}"#;
        let event: HostEvent = serde_json::from_str(json).unwrap();
        match event {
            HostEvent::Say { client, team, .. } => {
                assert_eq!(client.id, ClientId::from("3"));
                assert!(!team);
            }
            HostEvent::Disconnect { .. } => panic!("expected Say"),
        }
    }
}
