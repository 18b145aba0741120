use crate::data::types::{Bet, ProbPoint};

/// Convert raw trade events into an ascending probability series.
///
/// Stable sort by creation time: events with equal timestamps keep their
/// input order, and no event is dropped. Probabilities are rounded to the
/// nearest integer percent and clamped to 0..=100.
pub fn bets_to_series(bets: &[Bet]) -> Vec<ProbPoint> {
    let mut sorted: Vec<&Bet> = bets.iter().collect();
    sorted.sort_by_key(|b| b.created_time);

    sorted
        .into_iter()
        .map(|b| ProbPoint {
            t: b.created_time,
            p: (b.prob_after * 100.0).round().clamp(0.0, 100.0) as u8,
        })
        .collect()
}
