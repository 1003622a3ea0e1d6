//! Sentiment providers.
//!
//! - [`GoogleLanguageClient`]: the Google Cloud Natural Language
//!   `documents:analyzeSentiment` REST endpoint
//! - [`StaticProvider`]: an in-process provider returning a fixed outcome,
//!   used by tests and offline runs

mod fixed;
mod google;

pub use fixed::StaticProvider;
pub use google::{GoogleLanguageClient, LanguageConfig};
