use crate::types::{CandidateName, Ranking, SimilarityScore};

/// Sorts scored candidate names into a `Ranking`.
///
/// ### Sorting Order:
/// - **Primary:** Sorts by score in descending order (higher score first).
/// - **Secondary:** If two candidates have the same score, sorts by name in
///   ascending lexicographical order for deterministic ordering.
///
/// ### Example:
/// ```rust
/// use product_sniffer::utils::sort_results;
///
/// let sorted = sort_results(vec![
///     ("Whole Milk".to_string(), 1.0),
///     ("Almond Milk".to_string(), 1.8),
///     ("Milk Bar".to_string(), 1.0),
/// ]);
/// assert_eq!(sorted, vec![
///     ("Almond Milk".to_string(), 1.8),
///     ("Milk Bar".to_string(), 1.0),
///     ("Whole Milk".to_string(), 1.0),
/// ]);
/// ```
pub fn sort_results(mut results: Vec<(CandidateName, SimilarityScore)>) -> Ranking {
    results.sort_by(|a, b| {
        b.1.partial_cmp(&a.1) // Sort by score (descending)
            .unwrap_or(std::cmp::Ordering::Equal) // Handle NaN gracefully
            .then_with(|| a.0.cmp(&b.0)) // Secondary sort by name (ascending)
    });

    results
}
