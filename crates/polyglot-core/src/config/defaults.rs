//! Compiled-in fallbacks for every configuration field.

pub(super) const DEFAULT_TRANSLATOR_NAME: &str = "^7[^1T^7]";
pub(super) const DEFAULT_MESSAGE_PREFIX: &str = "^3";
pub(super) const DEFAULT_MIN_SENTENCE_LENGTH: usize = 6;
pub(super) const DEFAULT_MIN_TIME_BETWEEN_SECS: u64 = 30;

/// Environment override for the Microsoft client id.
pub const ENV_MS_CLIENT_ID: &str = "POLYGLOT_MS_CLIENT_ID";
/// Environment override for the Microsoft client secret.
pub const ENV_MS_CLIENT_SECRET: &str = "POLYGLOT_MS_CLIENT_SECRET";

pub(super) fn default_log_level() -> String {
    "info".to_string()
}
pub(super) fn default_command_prefixes() -> Vec<char> {
    vec!['!', '@', '&', '/']
}
