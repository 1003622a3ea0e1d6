//! # Sentiment Core
//!
//! Core types, errors, and traits shared by every crate in the sentiment workspace.
//!
//! - **Types**: sentences, provider results, sort order and the shaped response
//! - **Errors**: a single [`SentimentError`] used across crates
//! - **Constants**: configuration defaults
//! - **Traits**: the [`SentimentProvider`] capability implemented by remote clients
//! - **Context**: [`RequestContext`], the per-request cancellation/deadline signal
//!
//! ## Example
//!
//! ```rust
//! use sentiment_core::{Response, ScoredText};
//!
//! let response: Response = vec![ScoredText::new("great day", 0.9)];
//! let json = serde_json::to_string(&response).unwrap();
//! assert_eq!(json, r#"[{"great day":0.9}]"#);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod context;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use context::RequestContext;
pub use error::{Result, SentimentError};
pub use traits::*;
pub use types::*;
