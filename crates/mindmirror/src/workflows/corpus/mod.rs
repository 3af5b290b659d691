//! Flat-file narrative and description corpora.

pub mod parser;
pub mod source;

pub use parser::{parse, CorpusEntries, CorpusFormat};
pub use source::{AssetError, AssetSource, DirectoryAssets, InMemoryAssets};

use crate::workflows::assessment::{DimensionSet, IllustrationCategory};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorpusId {
    HeadNarratives,
    BodyNarratives,
    LegNarratives,
    TraitDescriptions,
    NeedDescriptions,
}

impl CorpusId {
    pub const fn path(self) -> &'static str {
        match self {
            Self::HeadNarratives => "/texts/heads.txt",
            Self::BodyNarratives => "/texts/bodies.txt",
            Self::LegNarratives => "/texts/legs.txt",
            Self::TraitDescriptions => "/texts/traits.txt",
            Self::NeedDescriptions => "/texts/needs.txt",
        }
    }

    pub const fn format(self) -> CorpusFormat {
        match self {
            Self::HeadNarratives | Self::BodyNarratives | Self::LegNarratives => {
                CorpusFormat::NumberedLines
            }
            Self::TraitDescriptions => CorpusFormat::NamedBlocks,
            Self::NeedDescriptions => CorpusFormat::NamedLines,
        }
    }

    pub const fn for_category(category: IllustrationCategory) -> Self {
        match category {
            IllustrationCategory::Head => Self::HeadNarratives,
            IllustrationCategory::Body => Self::BodyNarratives,
            IllustrationCategory::Legs => Self::LegNarratives,
        }
    }

    pub const fn descriptions(set: DimensionSet) -> Self {
        match set {
            DimensionSet::Traits => Self::TraitDescriptions,
            DimensionSet::Needs => Self::NeedDescriptions,
        }
    }
}

/// Memoized corpus lookups over an [`AssetSource`].
///
/// Each corpus is parsed at most once while the index lives. Failed fetches are
/// not remembered, so a later call retries the source.
pub struct CorpusIndex {
    source: Arc<dyn AssetSource>,
    cache: RwLock<HashMap<CorpusId, Arc<CorpusEntries>>>,
}

impl fmt::Debug for CorpusIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorpusIndex")
            .field("source", &self.source)
            .field("cached", &self.cached_len())
            .finish()
    }
}

impl CorpusIndex {
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        Self {
            source,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> Arc<dyn AssetSource> {
        Arc::clone(&self.source)
    }

    pub fn entries(&self, id: CorpusId) -> Arc<CorpusEntries> {
        if let Some(entries) = self.cached(id) {
            return entries;
        }

        match self.source.fetch_text(id.path()) {
            Ok(text) => {
                let entries = Arc::new(parse(&text, id.format()));
                debug!(corpus = ?id, keys = entries.len(), "corpus loaded");
                let mut cache = self
                    .cache
                    .write()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                cache.insert(id, Arc::clone(&entries));
                entries
            }
            Err(err) => {
                warn!(corpus = ?id, error = %err, "corpus unavailable; using fallback text");
                Arc::new(CorpusEntries::default())
            }
        }
    }

    /// Paragraphs stored under `key`, empty when the key or corpus is missing.
    pub fn lookup(&self, id: CorpusId, key: &str) -> Vec<String> {
        self.entries(id).get(key).to_vec()
    }

    pub fn lookup_or(&self, id: CorpusId, key: &str, fallback: Vec<String>) -> Vec<String> {
        let found = self.lookup(id, key);
        if found.is_empty() {
            debug!(corpus = ?id, key, "corpus key missing; using fallback text");
            fallback
        } else {
            found
        }
    }

    pub fn reset(&self) {
        self.cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn cached(&self, id: CorpusId) -> Option<Arc<CorpusEntries>> {
        self.cache
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&id)
            .cloned()
    }
}
