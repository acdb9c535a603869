//! The `[settings]` and `[microsoft]` tables.
//!
//! Every field is read on its own: a missing or malformed value is logged and
//! replaced by its default without affecting any other field.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::{debug, error, warn};

use super::defaults::*;
use crate::error::PolyglotError;
use crate::language::{Language, Source};

/// Which translation backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Google Translate web endpoint. No credentials.
    #[default]
    Google,
    /// Microsoft Translator. Needs a client id and secret.
    Microsoft,
}

/// Where translation jobs run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Spawn each job as its own task; handlers return immediately.
    #[default]
    Background,
    /// Await each job inside the handler, one provider call at a time.
    Inline,
}

/// Which target language automatic translation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoTranslatePolicy {
    /// One call per distinct preferred target among listeners.
    #[default]
    PerClient,
    /// One call with the default target, broadcast to every listener.
    Shared,
}

macro_rules! keyword_enum {
    ($ty:ty { $($name:literal => $variant:expr),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($name => Ok($variant),)+
                    other => Err(format!(
                        "unknown value '{other}' (expected one of: {})",
                        [$($name),+].join(", ")
                    )),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                $(if *self == $variant {
                    return f.write_str($name);
                })+
                Ok(())
            }
        }
    };
}

keyword_enum!(ProviderKind {
    "google" => ProviderKind::Google,
    "microsoft" => ProviderKind::Microsoft,
});
keyword_enum!(DispatchMode {
    "background" => DispatchMode::Background,
    "inline" => DispatchMode::Inline,
});
keyword_enum!(AutoTranslatePolicy {
    "per_client" => AutoTranslatePolicy::PerClient,
    "shared" => AutoTranslatePolicy::Shared,
});

/// Microsoft Translator credentials.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MicrosoftCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl MicrosoftCredentials {
    pub fn is_complete(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

impl fmt::Debug for MicrosoftCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MicrosoftCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// Operator settings, immutable after load.
#[derive(Debug, Clone)]
pub struct Settings {
    pub default_source: Source,
    pub default_target: Language,
    pub display_translator_name: bool,
    pub translator_name: String,
    /// Prepended to every translated line.
    pub message_prefix: String,
    pub min_sentence_length: usize,
    /// Zero disables rate limiting.
    pub min_time_between: Duration,
    pub provider: ProviderKind,
    pub dispatch: DispatchMode,
    pub auto_translate: AutoTranslatePolicy,
    pub microsoft: MicrosoftCredentials,
    /// False when the selected provider lacks its credentials.
    pub enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_source: Source::Auto,
            default_target: Language::ENGLISH,
            display_translator_name: true,
            translator_name: DEFAULT_TRANSLATOR_NAME.to_string(),
            message_prefix: DEFAULT_MESSAGE_PREFIX.to_string(),
            min_sentence_length: DEFAULT_MIN_SENTENCE_LENGTH,
            min_time_between: Duration::from_secs(DEFAULT_MIN_TIME_BETWEEN_SECS),
            provider: ProviderKind::default(),
            dispatch: DispatchMode::default(),
            auto_translate: AutoTranslatePolicy::default(),
            microsoft: MicrosoftCredentials::default(),
            enabled: true,
        }
    }
}

impl Settings {
    /// Read settings from a parsed config document, taking Microsoft
    /// credentials from the environment when set there.
    pub fn from_table(table: &toml::Table) -> Self {
        Self::resolve(table, |key| std::env::var(key).ok())
    }

    /// Read settings with an explicit environment lookup.
    pub fn resolve(table: &toml::Table, env: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let section = Section::new(table, "settings");

        let default_source = section.read("default_source_language", d.default_source, |v| {
            let s = expect_str(v)?;
            if s.is_empty() {
                debug!("default source language empty: using automatic language detection");
                return Ok(Source::Auto);
            }
            Source::parse(s).map_err(|e| e.to_string())
        });
        let default_target = section.read("default_target_language", d.default_target, |v| {
            Language::lookup(expect_str(v)?).ok_or_else(|| "not a supported language".to_string())
        });
        let display_translator_name =
            section.read("display_translator_name", d.display_translator_name, expect_bool);
        let translator_name = section.read("translator_name", d.translator_name, |v| {
            expect_str(v).map(str::to_string)
        });
        let message_prefix = section.read("message_prefix", d.message_prefix, |v| {
            expect_str(v).map(str::to_string)
        });
        let min_sentence_length = section.read("min_sentence_length", d.min_sentence_length, |v| {
            match expect_int(v)? {
                n if n > 0 => usize::try_from(n).map_err(|e| e.to_string()),
                _ => Err("minimum sentence length must be positive".to_string()),
            }
        });
        let min_time_between = section.read(
            "min_time_between",
            Seconds(d.min_time_between),
            |v| match expect_int(v)? {
                n if n >= 0 => Ok(Seconds(Duration::from_secs(n.unsigned_abs()))),
                _ => Err("interval must not be negative".to_string()),
            },
        );
        let provider = section.read("provider", d.provider, |v| expect_str(v)?.parse());
        let dispatch = section.read("dispatch", d.dispatch, |v| expect_str(v)?.parse());
        let auto_translate =
            section.read("auto_translate", d.auto_translate, |v| expect_str(v)?.parse());

        let microsoft = read_microsoft(table, provider, &env);
        let enabled = provider != ProviderKind::Microsoft || microsoft.is_complete();
        if !enabled {
            warn!("microsoft translator is not configured properly: disabling the plugin");
        }

        Self {
            default_source,
            default_target,
            display_translator_name,
            translator_name,
            message_prefix,
            min_sentence_length,
            min_time_between: min_time_between.0,
            provider,
            dispatch,
            auto_translate,
            microsoft,
            enabled,
        }
    }

    /// Fail with `MisconfiguredProvider` when loading disabled the plugin.
    pub fn ensure_enabled(&self) -> Result<(), PolyglotError> {
        if self.enabled {
            return Ok(());
        }
        Err(PolyglotError::MisconfiguredProvider(format!(
            "{} provider needs microsoft.client_id and microsoft.client_secret \
             (or {ENV_MS_CLIENT_ID} / {ENV_MS_CLIENT_SECRET})",
            self.provider
        )))
    }

    /// Whether the auto-translate gate enforces a minimum interval.
    pub fn rate_limited(&self) -> bool {
        !self.min_time_between.is_zero()
    }

    /// The policy actually applied: inline dispatch always shares one call.
    pub fn effective_auto_translate(&self) -> AutoTranslatePolicy {
        match self.dispatch {
            DispatchMode::Inline => AutoTranslatePolicy::Shared,
            DispatchMode::Background => self.auto_translate,
        }
    }
}

fn read_microsoft(
    table: &toml::Table,
    provider: ProviderKind,
    env: &impl Fn(&str) -> Option<String>,
) -> MicrosoftCredentials {
    let section = table.get("microsoft").and_then(toml::Value::as_table);
    let read = |key: &str, env_key: &str| -> String {
        if let Some(v) = env(env_key).filter(|v| !v.is_empty()) {
            debug!("microsoft/{key} taken from {env_key}");
            return v;
        }
        match section.and_then(|s| s.get(key)) {
            Some(toml::Value::String(s)) if !s.is_empty() => s.clone(),
            Some(toml::Value::String(_)) | None => {
                if provider == ProviderKind::Microsoft {
                    warn!("microsoft/{key} not specified: plugin will be disabled");
                }
                String::new()
            }
            Some(other) => {
                error!("could not load microsoft/{key} config value ({other}): expected a string");
                String::new()
            }
        }
    };
    MicrosoftCredentials {
        client_id: read("client_id", ENV_MS_CLIENT_ID),
        client_secret: read("client_secret", ENV_MS_CLIENT_SECRET),
    }
}

/// A named config table whose fields are read independently.
struct Section<'a> {
    name: &'static str,
    table: Option<&'a toml::Table>,
}

impl<'a> Section<'a> {
    fn new(root: &'a toml::Table, name: &'static str) -> Self {
        let table = match root.get(name) {
            Some(toml::Value::Table(t)) => Some(t),
            Some(other) => {
                error!("[{name}] must be a table, found {}", other.type_str());
                None
            }
            None => None,
        };
        Self { name, table }
    }

    /// Read `key`, falling back to `default` with a warning when missing and
    /// an error when present but invalid.
    fn read<T: fmt::Display>(
        &self,
        key: &str,
        default: T,
        parse: impl FnOnce(&toml::Value) -> Result<T, String>,
    ) -> T {
        let name = self.name;
        let Some(value) = self.table.and_then(|t| t.get(key)) else {
            warn!("could not find {name}/{key} in config file, using default: {default}");
            return default;
        };
        match parse(value) {
            Ok(v) => {
                debug!("loaded {name}/{key} setting: {v}");
                v
            }
            Err(e) => {
                error!("invalid value in {name}/{key} ({value}): {e}, using default: {default}");
                default
            }
        }
    }
}

/// Display wrapper so intervals log as plain seconds.
struct Seconds(Duration);

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0.as_secs())
    }
}

fn expect_str(v: &toml::Value) -> Result<&str, String> {
    v.as_str()
        .ok_or_else(|| format!("expected a string, found {}", v.type_str()))
}

fn expect_int(v: &toml::Value) -> Result<i64, String> {
    v.as_integer()
        .ok_or_else(|| format!("expected an integer, found {}", v.type_str()))
}

/// Booleans may also be written the way INI-style bot configs spell them.
fn expect_bool(v: &toml::Value) -> Result<bool, String> {
    match v {
        toml::Value::Boolean(b) => Ok(*b),
        toml::Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "1" | "yes" | "true" | "on" => Ok(true),
            "0" | "no" | "false" | "off" => Ok(false),
            _ => Err(format!("not a boolean: {s}")),
        },
        other => Err(format!("expected a boolean, found {}", other.type_str())),
    }
}
