use super::domain::Dimension;
use super::scoring::{ScoreSet, ScoredDimension};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankedDimension<D> {
    pub key: D,
    pub label: &'static str,
    pub raw_sum: u8,
    pub percentile: u8,
    /// Bar value for rendering only, nudged so that no two rows are equal.
    pub display_percentile: u8,
    pub rank: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DominantPair<D> {
    pub first: D,
    pub second: D,
}

impl<D: Dimension> DominantPair<D> {
    pub fn labels(&self) -> (&'static str, &'static str) {
        (self.first.label(), self.second.label())
    }
}

/// Dimensions in descending order with the dominant pair resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranking<D> {
    pub ranked: Vec<RankedDimension<D>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_pair: Option<DominantPair<D>>,
}

impl<D: Dimension> Ranking<D> {
    pub fn at_rank(&self, rank: usize) -> Option<&RankedDimension<D>> {
        rank.checked_sub(1).and_then(|index| self.ranked.get(index))
    }
}

pub struct DominanceResolver;

impl DominanceResolver {
    pub fn rank_set<D: Dimension>(scores: &ScoreSet<D>) -> Ranking<D> {
        Self::rank(scores.dimensions())
    }

    /// Percentile, then raw sum, then canonical position.
    pub fn rank<D: Dimension>(scores: &[ScoredDimension<D>]) -> Ranking<D> {
        let mut sorted = scores.to_vec();
        sorted.sort_by(compare_for_rank);

        let mut ranked: Vec<RankedDimension<D>> = Vec::with_capacity(sorted.len());
        for (index, scored) in sorted.into_iter().enumerate() {
            let display_percentile = match ranked.last() {
                Some(previous) if scored.percentile >= previous.display_percentile => {
                    previous.display_percentile.saturating_sub(1)
                }
                _ => scored.percentile,
            };

            ranked.push(RankedDimension {
                key: scored.key,
                label: scored.key.label(),
                raw_sum: scored.raw_sum,
                percentile: scored.percentile,
                display_percentile,
                rank: index + 1,
            });
        }

        let dominant_pair = match ranked.as_slice() {
            [first, second, ..] => Some(DominantPair {
                first: first.key,
                second: second.key,
            }),
            _ => None,
        };

        Ranking {
            ranked,
            dominant_pair,
        }
    }
}

fn compare_for_rank<D: Dimension>(left: &ScoredDimension<D>, right: &ScoredDimension<D>) -> Ordering {
    right
        .percentile
        .cmp(&left.percentile)
        .then_with(|| right.raw_sum.cmp(&left.raw_sum))
        .then_with(|| {
            left.key
                .canonical_position()
                .cmp(&right.key.canonical_position())
        })
}
