//! The fixed set of preloaded models the user can pick from.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog entry not found: {0}")]
    UnknownModel(String),
}

/// One selectable model.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    /// Stable identifier used by the selection surface.
    pub id: String,
    /// Human-readable label.
    pub label: String,
    /// Model asset reference handed to the viewer.
    pub source: String,
    /// Id of the related "cut" variant entry, if this model has one.
    #[serde(default)]
    pub cut_variant: Option<String>,
}

/// Ordered list of selectable models.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelCatalog {
    entries: Vec<ModelEntry>,
}

impl ModelCatalog {
    /// Load a catalog from a JSON file of the form
    /// `{"entries": [{"id": ..., "label": ..., "source": ...}, ...]}`.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let data = std::fs::read_to_string(path)?;
        let catalog: Self = serde_json::from_str(&data)?;
        Ok(catalog)
    }

    pub fn entries(&self) -> &[ModelEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by id.
    pub fn entry(&self, id: &str) -> Option<&ModelEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Look up an entry by position in the selection list.
    pub fn entry_at(&self, index: usize) -> Option<&ModelEntry> {
        self.entries.get(index)
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        let entry = |id: &str, label: &str, source: &str, cut: Option<&str>| ModelEntry {
            id: id.to_owned(),
            label: label.to_owned(),
            source: source.to_owned(),
            cut_variant: cut.map(str::to_owned),
        };

        Self {
            entries: vec![
                entry("130", "Scan 130", "models/130.glb", None),
                entry("bottle", "Bottle", "models/bottle.glb", None),
                entry("kidney", "Kidney", "models/kidney.glb", Some("kidney-cut")),
                entry("kidney-cut", "Kidney (cut)", "models/kidney_cut.glb", None),
            ],
        }
    }
}

/// Startup preload pass: stat every catalog asset under `base_dir` so missing
/// files surface in the log before the user reaches for them. Returns the
/// number of assets found on disk.
pub fn preload_models(catalog: &ModelCatalog, base_dir: &Path) -> usize {
    let mut found = 0;
    for entry in catalog.entries() {
        let path = base_dir.join(&entry.source);
        if path.is_file() {
            found += 1;
        } else {
            warn!("model asset missing: {} ({})", entry.id, path.display());
        }
    }
    info!("{found}/{} model assets present", catalog.len());
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_links_kidney_to_cut_variant() {
        let catalog = ModelCatalog::default();
        let kidney = catalog.entry("kidney").unwrap();
        let cut_id = kidney.cut_variant.as_deref().unwrap();

        let cut = catalog.entry(cut_id).unwrap();
        assert_eq!(cut.source, "models/kidney_cut.glb");
        assert!(cut.cut_variant.is_none());
    }

    #[test]
    fn test_entry_lookup_by_index_and_id() {
        let catalog = ModelCatalog::default();
        assert_eq!(catalog.entry_at(0).unwrap().id, "130");
        assert!(catalog.entry("bottle").is_some());
        assert!(catalog.entry("missing").is_none());
    }

    #[test]
    fn test_catalog_parses_from_json() {
        let json = r#"{
            "entries": [
                {"id": "a", "label": "A", "source": "models/a.glb"},
                {"id": "b", "label": "B", "source": "models/b.glb", "cut_variant": "a"}
            ]
        }"#;
        let catalog: ModelCatalog = serde_json::from_str(json).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entry("b").unwrap().cut_variant.as_deref(), Some("a"));
    }

    #[test]
    fn test_preload_counts_missing_assets() {
        let catalog = ModelCatalog::default();
        let found = preload_models(&catalog, Path::new("/nonexistent"));
        assert_eq!(found, 0);
    }
}
