use super::domain::{Dimension, NeedId, TraitId};
use super::validation::{validate, Likert};
use serde::Serialize;
use serde_json::Value;

pub const PERCENTILE_FLOOR: u8 = 20;
pub const PERCENTILE_CEILING: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Positive,
    Negative,
}

use Direction::{Negative as Neg, Positive as Pos};
use TraitId::{
    Agreeableness as A, Conscientiousness as C, Extraversion as E, Neuroticism as N, Openness as O,
};

/// IPIP-50 key: (zero-based item index, trait, direction).
const TRAIT_KEY: [(usize, TraitId, Direction); 50] = [
    (0, E, Pos),
    (1, A, Neg),
    (2, C, Pos),
    (3, N, Neg),
    (4, O, Pos),
    (5, E, Neg),
    (6, A, Pos),
    (7, C, Neg),
    (8, N, Pos),
    (9, O, Neg),
    (10, E, Pos),
    (11, A, Neg),
    (12, C, Pos),
    (13, N, Neg),
    (14, O, Pos),
    (15, E, Neg),
    (16, A, Pos),
    (17, C, Neg),
    (18, N, Pos),
    (19, O, Neg),
    (20, E, Pos),
    (21, A, Neg),
    (22, C, Pos),
    (23, N, Neg),
    (24, O, Pos),
    (25, E, Neg),
    (26, A, Pos),
    (27, C, Neg),
    (28, N, Neg),
    (29, O, Neg),
    (30, E, Pos),
    (31, A, Neg),
    (32, C, Pos),
    (33, N, Neg),
    (34, O, Pos),
    (35, E, Neg),
    (36, A, Pos),
    (37, C, Neg),
    (38, N, Neg),
    (39, O, Pos),
    (40, E, Pos),
    (41, A, Pos),
    (42, C, Pos),
    (43, N, Neg),
    (44, O, Pos),
    (45, E, Neg),
    (46, A, Pos),
    (47, C, Pos),
    (48, N, Neg),
    (49, O, Pos),
];

const TRAIT_RAW_RANGE: (u8, u8) = (10, 50);
const NEED_BLOCK_LEN: usize = 7;
const NEED_RAW_RANGE: (u8, u8) = (7, 35);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoredDimension<D> {
    pub key: D,
    pub raw_sum: u8,
    pub percentile: u8,
}

/// Five scored dimensions held in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreSet<D> {
    dimensions: Vec<ScoredDimension<D>>,
}

pub type TraitScores = ScoreSet<TraitId>;
pub type NeedScores = ScoreSet<NeedId>;

impl<D: Dimension> ScoreSet<D> {
    fn from_raw_sums(raw_sums: [u8; 5], (min, max): (u8, u8)) -> Self {
        let dimensions = D::CANONICAL
            .into_iter()
            .zip(raw_sums)
            .map(|(key, raw_sum)| ScoredDimension {
                key,
                raw_sum,
                percentile: percentile(raw_sum, min, max),
            })
            .collect();
        Self { dimensions }
    }

    pub fn dimensions(&self) -> &[ScoredDimension<D>] {
        &self.dimensions
    }

    pub fn get(&self, key: D) -> Option<&ScoredDimension<D>> {
        self.dimensions.iter().find(|scored| scored.key == key)
    }

    pub fn raw_sum(&self, key: D) -> Option<u8> {
        self.get(key).map(|scored| scored.raw_sum)
    }

    pub fn percentile(&self, key: D) -> Option<u8> {
        self.get(key).map(|scored| scored.percentile)
    }
}

/// Linear map of a raw sum from `[min, max]` onto `[20, 100]`.
pub fn percentile(raw_sum: u8, min: u8, max: u8) -> u8 {
    if max <= min {
        return PERCENTILE_FLOOR;
    }
    let span = f64::from(PERCENTILE_CEILING - PERCENTILE_FLOOR);
    let fraction = (f64::from(raw_sum) - f64::from(min)) / f64::from(max - min);
    let scaled = f64::from(PERCENTILE_FLOOR) + fraction * span;
    scaled
        .round()
        .clamp(f64::from(PERCENTILE_FLOOR), f64::from(PERCENTILE_CEILING)) as u8
}

/// Applies the signed 50-item key to the Big Five answers.
pub struct TraitScorer;

impl TraitScorer {
    pub fn score(raw: &[Value]) -> Option<TraitScores> {
        validate::<50>(raw).map(|answers| Self::score_answers(&answers))
    }

    pub fn score_answers(answers: &[Likert; 50]) -> TraitScores {
        let mut raw_sums = [0u8; 5];
        for (index, trait_id, direction) in TRAIT_KEY {
            let answer = answers[index];
            let scored = match direction {
                Direction::Positive => answer.value(),
                Direction::Negative => answer.reversed(),
            };
            raw_sums[trait_id.canonical_position()] += scored;
        }
        ScoreSet::from_raw_sums(raw_sums, TRAIT_RAW_RANGE)
    }
}

/// Sums the five contiguous 7-item blocks of the Basic Needs answers.
pub struct NeedScorer;

impl NeedScorer {
    pub fn score(raw: &[Value]) -> Option<NeedScores> {
        validate::<35>(raw).map(|answers| Self::score_answers(&answers))
    }

    pub fn score_answers(answers: &[Likert; 35]) -> NeedScores {
        let mut raw_sums = [0u8; 5];
        for (slot, block) in raw_sums.iter_mut().zip(answers.chunks(NEED_BLOCK_LEN)) {
            *slot = block.iter().map(|answer| answer.value()).sum();
        }
        ScoreSet::from_raw_sums(raw_sums, NEED_RAW_RANGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn uniform(value: u8, len: usize) -> Vec<Value> {
        vec![json!(value); len]
    }

    #[test]
    fn key_covers_every_item_once_with_ten_items_per_trait() {
        for (position, (index, _, _)) in TRAIT_KEY.iter().enumerate() {
            assert_eq!(position, *index);
        }
        for trait_id in TraitId::CANONICAL {
            let count = TRAIT_KEY
                .iter()
                .filter(|(_, keyed, _)| *keyed == trait_id)
                .count();
            assert_eq!(count, 10, "{trait_id:?}");
        }
    }

    #[test]
    fn neutral_answers_land_in_the_middle() {
        let scores = TraitScorer::score(&uniform(3, 50)).expect("complete");
        for scored in scores.dimensions() {
            assert_eq!(scored.raw_sum, 30, "{:?}", scored.key);
            assert_eq!(scored.percentile, 60, "{:?}", scored.key);
        }
    }

    #[test]
    fn reverse_keyed_items_pull_the_sum_down() {
        // Every item answered 5: positive items give 5, negative items give 1.
        let scores = TraitScorer::score(&uniform(5, 50)).expect("complete");
        assert_eq!(scores.raw_sum(TraitId::Extraversion), Some(30));
        assert_eq!(scores.raw_sum(TraitId::Agreeableness), Some(34));
        assert_eq!(scores.raw_sum(TraitId::Conscientiousness), Some(34));
        assert_eq!(scores.raw_sum(TraitId::Neuroticism), Some(18));
        assert_eq!(scores.raw_sum(TraitId::Openness), Some(38));
        assert_eq!(scores.percentile(TraitId::Neuroticism), Some(36));
    }

    #[test]
    fn need_blocks_are_contiguous() {
        let mut raw = uniform(1, 35);
        for value in raw.iter_mut().skip(14).take(7) {
            *value = json!(5);
        }
        let scores = NeedScorer::score(&raw).expect("complete");
        assert_eq!(scores.raw_sum(NeedId::Survival), Some(7));
        assert_eq!(scores.raw_sum(NeedId::Love), Some(7));
        assert_eq!(scores.raw_sum(NeedId::Freedom), Some(35));
        assert_eq!(scores.percentile(NeedId::Freedom), Some(100));
        assert_eq!(scores.percentile(NeedId::Fun), Some(20));
    }

    #[test]
    fn all_fives_saturate_every_need() {
        let scores = NeedScorer::score(&uniform(5, 35)).expect("complete");
        for scored in scores.dimensions() {
            assert_eq!(scored.raw_sum, 35);
            assert_eq!(scored.percentile, 100);
        }
    }

    #[test]
    fn incomplete_answers_score_as_none() {
        assert!(TraitScorer::score(&uniform(3, 35)).is_none());
        assert!(NeedScorer::score(&uniform(3, 50)).is_none());

        let mut raw = uniform(3, 50);
        raw[10] = Value::Null;
        assert!(TraitScorer::score(&raw).is_none());
    }

    #[test]
    fn percentile_rounds_to_nearest() {
        assert_eq!(percentile(7, 7, 35), 20);
        assert_eq!(percentile(8, 7, 35), 23);
        assert_eq!(percentile(21, 7, 35), 60);
        assert_eq!(percentile(35, 7, 35), 100);
        assert_eq!(percentile(0, 10, 50), 20);
        assert_eq!(percentile(60, 10, 50), 100);
    }
}
