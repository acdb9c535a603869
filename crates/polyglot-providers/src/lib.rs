//! # polyglot-providers
//!
//! Translation provider implementations for Polyglot.

pub mod google;
pub mod microsoft;

use polyglot_core::{
    config::{ProviderKind, Settings},
    error::PolyglotError,
    traits::Translator,
};
use std::sync::Arc;

/// Build the provider selected in settings. Called once at startup.
pub fn build_translator(settings: &Settings) -> Result<Arc<dyn Translator>, PolyglotError> {
    settings.ensure_enabled()?;
    match settings.provider {
        ProviderKind::Google => Ok(Arc::new(google::GoogleTranslator::new())),
        ProviderKind::Microsoft => Ok(Arc::new(microsoft::MicrosoftTranslator::from_config(
            settings.microsoft.clone(),
        ))),
    }
}
