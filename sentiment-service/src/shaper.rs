//! Sort, truncate, and project provider sentences into a response.

use std::cmp::Ordering;

use sentiment_core::types::{Response, ScoredText, Sentence, SortOrder};

/// Compares two scores under `order`.
///
/// Scores compare numerically (`-0.0 == 0.0`). NaN sorts after every number
/// in ascending order and before every number in descending order.
pub fn compare_scores(order: SortOrder, a: f32, b: f32) -> Ordering {
    let ascending = a
        .partial_cmp(&b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()));
    match order {
        SortOrder::Ascending => ascending,
        SortOrder::Descending => ascending.reverse(),
    }
}

/// Shapes `sentences` into the external response.
///
/// Stable sort by score, keep the first `limit` entries (all of them when
/// `limit` is negative), then map each to `{text: score}`. Sentences with the
/// same text are kept as separate entries.
pub fn shape(sentences: &[Sentence], order: SortOrder, limit: i64) -> Response {
    let mut sorted: Vec<&Sentence> = sentences.iter().collect();
    sorted.sort_by(|a, b| compare_scores(order, a.score, b.score));

    let keep = match usize::try_from(limit) {
        Ok(n) => n.min(sorted.len()),
        Err(_) => sorted.len(),
    };

    sorted
        .into_iter()
        .take(keep)
        .map(|s| ScoredText::new(s.text.clone(), s.score))
        .collect()
}
