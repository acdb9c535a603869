//! # polyglot-core
//!
//! Core types, traits, configuration, and error handling for the Polyglot
//! chat translator.

pub mod config;
pub mod error;
pub mod language;
pub mod message;
pub mod sanitize;
pub mod traits;
