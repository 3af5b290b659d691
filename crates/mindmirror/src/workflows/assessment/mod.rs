//! Questionnaire scoring: validation, per-dimension sums, ranking, and asset codes.

pub mod assets;
pub mod domain;
pub mod inventory;
pub mod ranking;
pub mod scoring;
pub mod validation;

pub use assets::{AssetKey, AssetKeyMapper, IllustrationCategory};
pub use domain::{Dimension, DimensionSet, NeedId, RespondentRecord, TraitId};
pub use inventory::Inventory;
pub use ranking::{DominanceResolver, DominantPair, RankedDimension, Ranking};
pub use scoring::{NeedScorer, NeedScores, ScoreSet, ScoredDimension, TraitScorer, TraitScores};
pub use validation::{is_complete, Likert};

use serde::Serialize;

/// Both rankings of a respondent; `None` marks a test that is not completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentOutcome {
    pub big_five: Option<Ranking<TraitId>>,
    pub basic_needs: Option<Ranking<NeedId>>,
}

impl AssessmentOutcome {
    pub fn from_record(record: &RespondentRecord) -> Self {
        let big_five = TraitScorer::score(record.answers_for(DimensionSet::Traits))
            .map(|scores| DominanceResolver::rank_set(&scores));
        let basic_needs = NeedScorer::score(record.answers_for(DimensionSet::Needs))
            .map(|scores| DominanceResolver::rank_set(&scores));

        Self {
            big_five,
            basic_needs,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.big_five.is_some() && self.basic_needs.is_some()
    }
}

/// Completion flags used by profile views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionStatus {
    pub big_five: bool,
    pub basic_needs: bool,
}

impl CompletionStatus {
    pub fn from_record(record: &RespondentRecord) -> Self {
        Self {
            big_five: is_complete(
                record.answers_for(DimensionSet::Traits),
                DimensionSet::Traits.expected_answers(),
            ),
            basic_needs: is_complete(
                record.answers_for(DimensionSet::Needs),
                DimensionSet::Needs.expected_answers(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outcome_marks_missing_tests_as_not_completed() {
        let record = RespondentRecord {
            bigfive_answers: Some(vec![json!(3); 50]),
            basicneeds_answers: Some(vec![json!(3); 20]),
            ..RespondentRecord::default()
        };

        let outcome = AssessmentOutcome::from_record(&record);
        assert!(outcome.big_five.is_some());
        assert!(outcome.basic_needs.is_none());
        assert!(!outcome.is_complete());

        let status = CompletionStatus::from_record(&record);
        assert!(status.big_five);
        assert!(!status.basic_needs);
    }
}
