//! # Sentiment Service
//!
//! The caching pipeline in front of a remote sentiment provider.
//!
//! 1. [`normalize_key`] derives a cache key from the raw input
//! 2. [`ResultCache`](sentiment_cache::ResultCache) is consulted; hits are
//!    decoded with [`codec::decode`]
//! 3. On a miss the provider is called with the raw input, and the result is
//!    stored best-effort via [`codec::encode`]
//! 4. [`shape`] sorts, truncates, and projects the sentences
//!
//! ## Example
//!
//! ```rust,ignore
//! let service = SentimentService::new(Arc::new(provider));
//! let response = service
//!     .handle(&RequestContext::new(), "What a day. Awful traffic.", SortOrder::Descending, 3)
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod codec;
mod key;
mod pipeline;
mod shaper;

pub use key::{normalize_key, CacheKey};
pub use pipeline::{SentimentService, ServiceConfig};
pub use shaper::{compare_scores, shape};
