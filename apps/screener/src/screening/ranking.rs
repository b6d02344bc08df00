//! Ranker: orders successful analyses by fit percentage.
//!
//! Sort is descending and stable: equal scores keep submission order, because
//! successes arrive here in the order their documents were submitted.

use crate::analysis::AnalysisRecord;

pub const TOP_N: usize = 5;

/// Sorts by `overall_fit_percentage` (missing = 0) and stamps `rank` 1..=N.
pub fn rank_results(mut records: Vec<AnalysisRecord>) -> Vec<AnalysisRecord> {
    records.sort_by(|a, b| b.fit_percentage().total_cmp(&a.fit_percentage()));
    for (i, record) in records.iter_mut().enumerate() {
        record.set_rank(i + 1);
    }
    records
}

/// The first `n` ranked entries, or all of them if there are fewer.
pub fn top_n(ranked: &[AnalysisRecord], n: usize) -> Vec<AnalysisRecord> {
    ranked.iter().take(n).cloned().collect()
}
