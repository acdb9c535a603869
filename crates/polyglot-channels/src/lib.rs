//! # polyglot-channels
//!
//! Game host integrations for Polyglot.

pub mod console;
