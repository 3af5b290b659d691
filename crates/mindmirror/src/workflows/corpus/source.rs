use std::collections::HashMap;
use std::fmt::Debug;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset {path} not found")]
    NotFound { path: String },
    #[error("asset path {path} escapes the asset root")]
    InvalidPath { path: String },
    #[error("asset {path} could not be read: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("asset {path} is not valid UTF-8 text")]
    Encoding { path: String },
}

/// Loader for text corpora and image files.
///
/// Paths are store-relative with a leading slash, e.g. `/heads/AC-H.jpg`.
pub trait AssetSource: Debug + Send + Sync {
    fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, AssetError>;

    fn fetch_text(&self, path: &str) -> Result<String, AssetError> {
        let bytes = self.fetch_bytes(path)?;
        String::from_utf8(bytes).map_err(|_| AssetError::Encoding {
            path: path.to_string(),
        })
    }
}

/// Assets served from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, AssetError> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)));
        if escapes || relative.as_os_str().is_empty() {
            return Err(AssetError::InvalidPath {
                path: path.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl AssetSource for DirectoryAssets {
    fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let resolved = self.resolve(path)?;
        std::fs::read(&resolved).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                AssetError::NotFound {
                    path: path.to_string(),
                }
            } else {
                AssetError::Io {
                    path: path.to_string(),
                    source,
                }
            }
        })
    }
}

/// Assets held in memory, keyed by path.
#[derive(Debug, Default)]
pub struct InMemoryAssets {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(self, path: &str, text: &str) -> Self {
        self.insert(path, text.as_bytes().to_vec());
        self
    }

    pub fn with_bytes(self, path: &str, bytes: Vec<u8>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn insert(&self, path: &str, bytes: Vec<u8>) {
        let mut guard = self
            .files
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.insert(normalize(path), bytes);
    }
}

impl AssetSource for InMemoryAssets {
    fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let guard = self
            .files
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| AssetError::NotFound {
                path: path.to_string(),
            })
    }
}

fn normalize(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}
