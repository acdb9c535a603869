//! Google Translate web endpoint.
//!
//! Uses the public `translate_a/single` endpoint the browser widget calls.
//! No API key. The order of the query parameters matters to the endpoint.

use async_trait::async_trait;
use polyglot_core::{
    error::TranslateError,
    language::{Language, Source},
    traits::Translator,
};
use serde::Deserialize;
use tracing::debug;

/// Public endpoint used by the Google Translate browser widget.
pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// The endpoint rejects requests without a browser user agent.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:45.0) Gecko/20100101 Firefox/45.0";

/// Google provider.
pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Point the provider at a different endpoint (proxy, test server).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

// --- Serde types ---

#[derive(Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    sentences: Vec<GoogleSentence>,
}

#[derive(Deserialize)]
struct GoogleSentence {
    /// Absent on the trailing transliteration entry.
    #[serde(default)]
    trans: Option<String>,
}

/// Query parameters in the order the endpoint expects; `q` must be last.
fn build_query<'a>(
    text: &'a str,
    source: Source,
    target: Language,
) -> Vec<(&'static str, &'a str)> {
    vec![
        ("client", "gtx"),
        ("sl", source.code()),
        ("tl", target.code()),
        ("hl", "en-US"),
        ("dt", "t"),
        ("dt", "bd"),
        ("dj", "1"),
        ("source", "input"),
        ("q", text),
    ]
}

/// Join the translated sentences of a `dj=1` response.
fn extract_translation(body: &str) -> Result<String, TranslateError> {
    let parsed: GoogleResponse = serde_json::from_str(body).map_err(|e| {
        debug!("google: failed to parse response: {e}");
        TranslateError::EmptyResult
    })?;

    let text: String = parsed
        .sentences
        .into_iter()
        .filter_map(|s| s.trans)
        .collect();

    if text.trim().is_empty() {
        return Err(TranslateError::EmptyResult);
    }
    Ok(text)
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(
        &self,
        text: &str,
        source: Source,
        target: Language,
    ) -> Result<String, TranslateError> {
        debug!("google: GET {} [{source} -> {target}]", self.endpoint);

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&build_query(text, source, target))
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .map_err(|e| TranslateError::Network(format!("google request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(TranslateError::Network(format!("google returned {status}")));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| TranslateError::Network(format!("google: failed to read response: {e}")))?;

        extract_translation(&body)
    }
}
