//! Ordered list of image addresses backing the grid.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::domain::entities::ResourceKey;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog {path} contains no image addresses")]
    Empty { path: String },
}

/// Grid data source: position `i` shows the image at `urls[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceCatalog {
    keys: Vec<ResourceKey>,
}

impl ResourceCatalog {
    #[must_use]
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: urls.into_iter().map(ResourceKey::new).collect(),
        }
    }

    /// Parses one address per line. Blank lines and `#` comments are skipped.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Loads a catalog file.
    ///
    /// # Errors
    /// Returns `CatalogError` if the file cannot be read or lists no addresses.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let catalog = Self::parse(&content);
        if catalog.is_empty() {
            return Err(CatalogError::Empty {
                path: path.display().to_string(),
            });
        }

        info!(path = %path.display(), count = catalog.len(), "Loaded image catalog");
        Ok(catalog)
    }

    /// Maps a grid position to its key; `None` past the end.
    #[must_use]
    pub fn key_for_index(&self, index: usize) -> Option<&ResourceKey> {
        self.keys.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceKey> {
        self.keys.iter()
    }
}
