use serde::Serialize;

use crate::candidates::diagnostics::Diagnostics;
use crate::candidates::filter::{filter_candidates, FilterPlan};
use crate::candidates::rank::{rank_candidates, RankPlan};
use crate::candidates::record::CandidateRecord;
use crate::candidates::stats::{aggregate_stats, AggregateStats};

/// Output of applying a plan to the dataset.
#[derive(Debug, Serialize)]
pub struct SearchResult<'a> {
    pub filtered_count: usize,
    /// Every filtered record, ranked.
    pub candidates: Vec<&'a CandidateRecord>,
    /// Computed over the filtered set.
    pub stats: AggregateStats,
    pub diagnostics: Diagnostics,
}

/// Filter, then rank and aggregate the survivors.
pub fn search<'a>(
    records: &'a [CandidateRecord],
    filter: &FilterPlan,
    rank: &RankPlan,
) -> SearchResult<'a> {
    let mut diagnostics = Diagnostics::new();

    let filtered = filter_candidates(records, filter, &mut diagnostics);
    let stats = aggregate_stats(&filtered);
    let candidates = rank_candidates(&filtered, rank, &mut diagnostics);

    SearchResult {
        filtered_count: filtered.len(),
        candidates,
        stats,
        diagnostics,
    }
}
