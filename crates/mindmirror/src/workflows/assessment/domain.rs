use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use std::hash::Hash;

/// Shared behaviour of the two five-member dimension sets.
///
/// `CANONICAL` is the fixed order used as the last tie-break when ranking and
/// as the presentation order for unranked listings.
pub trait Dimension: Copy + Eq + Hash + Debug + Serialize + 'static {
    const CANONICAL: [Self; 5];
    const SET: DimensionSet;

    fn label(self) -> &'static str;

    /// Single letter used to build composite asset codes.
    fn asset_letter(self) -> char;

    /// Key of the long-form description in the description corpus.
    fn corpus_name(self) -> &'static str {
        self.label()
    }

    fn canonical_position(self) -> usize {
        Self::CANONICAL
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or(Self::CANONICAL.len())
    }

    fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim();
        Self::CANONICAL
            .into_iter()
            .find(|candidate| candidate.label().eq_ignore_ascii_case(wanted))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionSet {
    Traits,
    Needs,
}

impl DimensionSet {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Traits => "Big Five",
            Self::Needs => "Basic Needs",
        }
    }

    pub const fn expected_answers(self) -> usize {
        match self {
            Self::Traits => 50,
            Self::Needs => 35,
        }
    }

    pub const fn not_completed_message(self) -> &'static str {
        match self {
            Self::Traits => "Big Five test not completed or invalid answers.",
            Self::Needs => "Basic Needs test not completed or invalid answers.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitId {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl TraitId {
    /// Pole the raw sum actually measures under the item key.
    ///
    /// Neuroticism items are keyed towards calmness, so a high raw sum means an
    /// emotionally stable respondent while the score keeps the Neuroticism label.
    pub const fn measured_pole(self) -> &'static str {
        match self {
            Self::Neuroticism => "Emotional Stability",
            other => other.display_label(),
        }
    }

    const fn display_label(self) -> &'static str {
        match self {
            Self::Openness => "Openness",
            Self::Conscientiousness => "Conscientiousness",
            Self::Extraversion => "Extraversion",
            Self::Agreeableness => "Agreeableness",
            Self::Neuroticism => "Neuroticism",
        }
    }
}

impl Dimension for TraitId {
    const CANONICAL: [Self; 5] = [
        Self::Openness,
        Self::Conscientiousness,
        Self::Extraversion,
        Self::Agreeableness,
        Self::Neuroticism,
    ];
    const SET: DimensionSet = DimensionSet::Traits;

    fn label(self) -> &'static str {
        self.display_label()
    }

    fn asset_letter(self) -> char {
        match self {
            Self::Openness => 'O',
            Self::Conscientiousness => 'C',
            Self::Extraversion => 'E',
            Self::Agreeableness => 'A',
            Self::Neuroticism => 'M',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedId {
    Survival,
    Love,
    Freedom,
    Power,
    Fun,
}

impl Dimension for NeedId {
    const CANONICAL: [Self; 5] = [
        Self::Survival,
        Self::Love,
        Self::Freedom,
        Self::Power,
        Self::Fun,
    ];
    const SET: DimensionSet = DimensionSet::Needs;

    fn label(self) -> &'static str {
        match self {
            Self::Survival => "Survival",
            Self::Love => "Love",
            Self::Freedom => "Freedom",
            Self::Power => "Power",
            Self::Fun => "Fun",
        }
    }

    fn asset_letter(self) -> char {
        match self {
            Self::Survival => 'S',
            Self::Love => 'L',
            Self::Freedom => 'F',
            Self::Power => 'P',
            Self::Fun => 'U',
        }
    }
}

/// Read-only respondent row handed over by the storage collaborator.
///
/// Answer arrays stay as raw JSON so that in-progress (`null`) or malformed
/// entries reach the validator instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RespondentRecord {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bigfive_answers: Option<Vec<Value>>,
    #[serde(default)]
    pub basicneeds_answers: Option<Vec<Value>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_status: Option<String>,
}

impl RespondentRecord {
    pub fn answers_for(&self, set: DimensionSet) -> &[Value] {
        let answers = match set {
            DimensionSet::Traits => self.bigfive_answers.as_deref(),
            DimensionSet::Needs => self.basicneeds_answers.as_deref(),
        };
        answers.unwrap_or(&[])
    }

    /// Name shown on the cover and used for the artifact name.
    ///
    /// Falls back to the local part of the email address, then to `user`.
    pub fn display_name(&self) -> String {
        if let Some(name) = self
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
        {
            return name.to_string();
        }

        self.email
            .as_deref()
            .map(str::trim)
            .and_then(|email| email.split('@').next())
            .filter(|local| !local.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| "user".to_string())
    }

    /// Completion date in long US form, e.g. `November 3, 2025`.
    pub fn completion_date_label(&self) -> String {
        match self.created_at {
            Some(created) => created.format("%B %-d, %Y").to_string(),
            None => "the day you took the test".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn canonical_positions_follow_declaration_order() {
        assert_eq!(TraitId::Openness.canonical_position(), 0);
        assert_eq!(TraitId::Neuroticism.canonical_position(), 4);
        assert_eq!(NeedId::Fun.canonical_position(), 4);
    }

    #[test]
    fn neuroticism_reports_under_its_own_label_but_measures_stability() {
        assert_eq!(TraitId::Neuroticism.label(), "Neuroticism");
        assert_eq!(TraitId::Neuroticism.measured_pole(), "Emotional Stability");
        assert_eq!(TraitId::Openness.measured_pole(), "Openness");
    }

    #[test]
    fn from_label_ignores_case_and_whitespace() {
        assert_eq!(TraitId::from_label(" openness "), Some(TraitId::Openness));
        assert_eq!(NeedId::from_label("FUN"), Some(NeedId::Fun));
        assert_eq!(NeedId::from_label("Curiosity"), None);
    }

    #[test]
    fn display_name_prefers_full_name_then_email_local_part() {
        let mut record = RespondentRecord {
            full_name: Some("  Ada Lovelace ".to_string()),
            email: Some("ada@example.com".to_string()),
            ..RespondentRecord::default()
        };
        assert_eq!(record.display_name(), "Ada Lovelace");

        record.full_name = Some("   ".to_string());
        assert_eq!(record.display_name(), "ada");

        record.email = None;
        assert_eq!(record.display_name(), "user");
    }

    #[test]
    fn completion_date_uses_long_month_format() {
        let record = RespondentRecord {
            created_at: Some(Utc.with_ymd_and_hms(2025, 11, 3, 9, 30, 0).unwrap()),
            ..RespondentRecord::default()
        };
        assert_eq!(record.completion_date_label(), "November 3, 2025");
        assert_eq!(
            RespondentRecord::default().completion_date_label(),
            "the day you took the test"
        );
    }

    #[test]
    fn record_deserializes_partial_answers() {
        let record: RespondentRecord = serde_json::from_value(serde_json::json!({
            "user_id": "u-1",
            "email": "someone@example.com",
            "bigfive_answers": [1, null, "3"],
        }))
        .expect("record parses");

        assert_eq!(record.answers_for(DimensionSet::Traits).len(), 3);
        assert!(record.answers_for(DimensionSet::Needs).is_empty());
    }
}
