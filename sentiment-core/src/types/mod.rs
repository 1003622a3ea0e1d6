//! Domain types for the sentiment front-end.
//!
//! - [`Sentence`]: one scored text span returned by the provider
//! - [`SentimentResult`]: the full provider result, as stored in the cache
//! - [`SortOrder`]: requested ordering of the shaped response
//! - [`ScoredText`] / [`Response`]: the externally visible response shape

mod response;
mod sentence;

pub use response::*;
pub use sentence::*;
