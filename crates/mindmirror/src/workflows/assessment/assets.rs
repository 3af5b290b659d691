use super::domain::{Dimension, NeedId, TraitId};
use super::ranking::DominantPair;
use serde::{Deserialize, Serialize};

/// Letter used when a label does not name any known dimension.
pub const PLACEHOLDER_LETTER: char = 'X';

/// Illustration families; each has its own image folder and narrative corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IllustrationCategory {
    Head,
    Body,
    Legs,
}

impl IllustrationCategory {
    pub const fn letter(self) -> char {
        match self {
            Self::Head => 'H',
            Self::Body => 'B',
            Self::Legs => 'L',
        }
    }

    pub const fn folder(self) -> &'static str {
        match self {
            Self::Head => "heads",
            Self::Body => "bodies",
            Self::Legs => "legs",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Head => "Your Head",
            Self::Body => "Your Body",
            Self::Legs => "Your Legs",
        }
    }
}

/// Composite code of a dominant pair for one illustration category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AssetKey {
    pub code: String,
    pub category: IllustrationCategory,
}

impl AssetKey {
    /// Base key in the narrative corpus, e.g. `AC-H`.
    pub fn corpus_key(&self) -> String {
        format!("{}-{}", self.code, self.category.letter())
    }

    /// Image location, e.g. `/heads/AC-H.jpg`.
    pub fn image_path(&self) -> String {
        format!("/{}/{}.jpg", self.category.folder(), self.corpus_key())
    }
}

pub struct AssetKeyMapper;

impl AssetKeyMapper {
    pub fn letter<D: Dimension>(dimension: D) -> char {
        dimension.asset_letter()
    }

    pub fn trait_letter_for_label(label: &str) -> char {
        TraitId::from_label(label)
            .map(TraitId::asset_letter)
            .unwrap_or(PLACEHOLDER_LETTER)
    }

    pub fn need_letter_for_label(label: &str) -> char {
        NeedId::from_label(label)
            .map(NeedId::asset_letter)
            .unwrap_or(PLACEHOLDER_LETTER)
    }

    /// Two-letter code in rank order: rank 1 letter, then rank 2 letter.
    pub fn pair_code<D: Dimension>(pair: &DominantPair<D>) -> String {
        [pair.first.asset_letter(), pair.second.asset_letter()]
            .iter()
            .collect()
    }

    pub fn asset_key<D: Dimension>(
        pair: &DominantPair<D>,
        category: IllustrationCategory,
    ) -> AssetKey {
        AssetKey {
            code: Self::pair_code(pair),
            category,
        }
    }
}
