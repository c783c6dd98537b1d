//! The static news catalog.
//!
//! Each step the acting agent sees a fresh uniform sample of catalog
//! items as candidate material for an original post.

use std::path::Path;

use rand::Rng;
use rand::seq::index;

use flock_types::NewsItem;

use crate::error::SimError;

/// An in-memory news catalog.
pub struct NewsCatalog {
    items: Vec<NewsItem>,
}

impl NewsCatalog {
    /// Load the catalog from a JSON array file. Extra fields on catalog
    /// entries (links, dates) are ignored.
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SimError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let items = serde_json::from_str(&raw).map_err(|source| SimError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self { items })
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Draw `count` distinct items uniformly, fewer if the catalog is
    /// smaller.
    pub fn sample(&self, count: usize, rng: &mut impl Rng) -> Vec<NewsItem> {
        let amount = count.min(self.items.len());
        index::sample(rng, self.items.len(), amount)
            .into_iter()
            .filter_map(|i| self.items.get(i).cloned())
            .collect()
    }
}
