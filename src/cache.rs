// SPDX-License-Identifier: MIT

//! On-device favorites cache.
//!
//! One JSON file holding the serialized favorites array, read and written
//! wholesale. The cache trails the remote subcollection (every live
//! snapshot is written through) and is served only when the remote store
//! cannot be reached; it is never authoritative while the store is up.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::Favorite;

/// File name of the persisted favorites key.
const FAVORITES_FILE: &str = "favorites.json";

/// Durable key-value store for the last-known favorites list.
#[derive(Debug, Clone)]
pub struct FavoritesCache {
    path: PathBuf,
}

impl FavoritesCache {
    /// Cache rooted in the given directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            path: dir.as_ref().join(FAVORITES_FILE),
        }
    }

    /// Read the whole favorites array. A missing file is an empty list.
    pub fn read(&self) -> Result<Vec<Favorite>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path).map_err(|e| AppError::Cache(e.to_string()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| AppError::Cache(e.to_string()))
    }

    /// Replace the whole favorites array.
    pub fn write(&self, favorites: &[Favorite]) -> Result<()> {
        let file = File::create(&self.path).map_err(|e| AppError::Cache(e.to_string()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer(writer, favorites).map_err(|e| AppError::Cache(e.to_string()))?;

        tracing::debug!(count = favorites.len(), path = %self.path.display(), "Favorites cache written");
        Ok(())
    }

    /// Read, tolerating an unreadable cache by serving an empty list.
    /// Used on the fallback path, where a cache problem must not surface.
    pub fn read_or_empty(&self) -> Vec<Favorite> {
        match self.read() {
            Ok(favorites) => favorites,
            Err(err) => {
                tracing::warn!(error = %err, "Favorites cache unreadable, serving empty list");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecipeSource;

    fn favorite(id: &str) -> Favorite {
        Favorite {
            id: id.to_string(),
            title: format!("Recipe {}", id),
            image: "https://example.com/r.jpg".to_string(),
            ready_in_minutes: Some(20),
            summary: String::new(),
            ingredients: String::new(),
            source: RecipeSource::Api,
        }
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FavoritesCache::new(dir.path());
        assert!(cache.read().unwrap().is_empty());
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FavoritesCache::new(dir.path());

        let favorites = vec![favorite("42"), favorite("abc")];
        cache.write(&favorites).unwrap();
        assert_eq!(cache.read().unwrap(), favorites);

        // Wholesale replacement, not append.
        cache.write(&[favorite("7")]).unwrap();
        assert_eq!(cache.read().unwrap(), vec![favorite("7")]);
    }

    #[test]
    fn test_corrupt_file_errors_on_read_but_not_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FavoritesCache::new(dir.path());
        std::fs::write(dir.path().join(FAVORITES_FILE), "not json").unwrap();

        assert!(matches!(cache.read(), Err(AppError::Cache(_))));
        assert!(cache.read_or_empty().is_empty());
    }
}
