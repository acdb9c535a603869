//! Microsoft Translator provider.
//!
//! Every translation first exchanges the client id and secret for a bearer
//! token, then calls the HTTP `Translate` method with it. The method answers
//! with the translation wrapped in a serialized `<string>` element; callers
//! strip the markup when sanitizing.

use async_trait::async_trait;
use polyglot_core::{
    config::MicrosoftCredentials,
    error::TranslateError,
    language::{Language, Source},
    traits::Translator,
};
use serde::Deserialize;
use tracing::debug;

/// OAuth token service.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://datamarket.accesscontrol.windows.net/v2/OAuth2-13";
/// HTTP `Translate` method.
pub const DEFAULT_TRANSLATE_ENDPOINT: &str =
    "http://api.microsofttranslator.com/v2/Http.svc/Translate";
/// Scope requested with the client-credentials grant.
const SCOPE: &str = "http://api.microsofttranslator.com";

/// Microsoft provider.
pub struct MicrosoftTranslator {
    client: reqwest::Client,
    credentials: MicrosoftCredentials,
    token_endpoint: String,
    translate_endpoint: String,
}

impl MicrosoftTranslator {
    /// Create from configured credentials.
    pub fn from_config(credentials: MicrosoftCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            token_endpoint: DEFAULT_TOKEN_ENDPOINT.to_string(),
            translate_endpoint: DEFAULT_TRANSLATE_ENDPOINT.to_string(),
        }
    }

    /// Point the provider at different endpoints (proxy, test server).
    pub fn with_endpoints(
        mut self,
        token_endpoint: impl Into<String>,
        translate_endpoint: impl Into<String>,
    ) -> Self {
        self.token_endpoint = token_endpoint.into();
        self.translate_endpoint = translate_endpoint.into();
        self
    }

    /// Exchange the client credentials for a bearer token.
    async fn access_token(&self) -> Result<String, TranslateError> {
        debug!("microsoft: requesting access token");

        let form = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("grant_type", "client_credentials"),
            ("scope", SCOPE),
        ];

        let resp = self
            .client
            .post(&self.token_endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| TranslateError::Auth(format!("token request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(TranslateError::Auth(format!("token service returned {status}")));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| TranslateError::Auth(format!("failed to read token response: {e}")))?;

        parse_token(&body)
    }
}

// --- Serde types ---

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

fn parse_token(body: &str) -> Result<String, TranslateError> {
    let parsed: TokenResponse = serde_json::from_str(body)
        .map_err(|e| TranslateError::Auth(format!("failed to parse token response: {e}")))?;
    parsed
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| TranslateError::Auth("no access_token in token response".to_string()))
}

/// Query for the `Translate` method; `from` is omitted to let the service
/// detect the source language.
fn build_query<'a>(
    text: &'a str,
    source: Source,
    target: Language,
) -> Vec<(&'static str, &'a str)> {
    let mut query = vec![("text", text), ("to", target.code())];
    if let Some(from) = source.language() {
        query.push(("from", from.code()));
    }
    query
}

#[async_trait]
impl Translator for MicrosoftTranslator {
    fn name(&self) -> &str {
        "microsoft"
    }

    async fn translate(
        &self,
        text: &str,
        source: Source,
        target: Language,
    ) -> Result<String, TranslateError> {
        let token = self.access_token().await?;

        debug!(
            "microsoft: GET {} [{source} -> {target}]",
            self.translate_endpoint
        );

        let resp = self
            .client
            .get(&self.translate_endpoint)
            .query(&build_query(text, source, target))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| TranslateError::Network(format!("microsoft request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(TranslateError::Network(format!(
                "microsoft returned {status}"
            )));
        }

        let body = resp.text().await.map_err(|e| {
            TranslateError::Network(format!("microsoft: failed to read response: {e}"))
        })?;

        if body.trim().is_empty() {
            return Err(TranslateError::EmptyResult);
        }
        Ok(body)
    }
}
