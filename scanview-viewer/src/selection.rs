//! Selection handling for the model dropdown and the cut-view control.

use tracing::info;

use crate::catalog::{CatalogError, ModelCatalog};
use crate::display::{ModelViewer, ViewerState};

/// Maps selection events onto viewer state.
///
/// Selecting a model sets the viewer's model source and resets the camera
/// orbit to the default framing. The auxiliary cut-view control is visible
/// only while the selected entry has a cut variant; activating it selects
/// that variant, which updates the selection to match and hides the control.
pub struct SelectionController {
    catalog: ModelCatalog,
    selected: Option<String>,
}

impl SelectionController {
    pub fn new(catalog: ModelCatalog) -> Self {
        Self {
            catalog,
            selected: None,
        }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Id of the currently selected entry, if any.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Whether the cut-view control should be shown.
    pub fn cut_view_visible(&self) -> bool {
        self.selected
            .as_deref()
            .and_then(|id| self.catalog.entry(id))
            .is_some_and(|entry| entry.cut_variant.is_some())
    }

    /// Select a catalog entry by id.
    pub fn select<V: ModelViewer>(
        &mut self,
        id: &str,
        state: &mut ViewerState<V>,
    ) -> Result<(), CatalogError> {
        let entry = self
            .catalog
            .entry(id)
            .ok_or_else(|| CatalogError::UnknownModel(id.to_owned()))?;

        info!("model selected: {} ({})", entry.label, entry.source);
        state.set_model(entry.source.clone());
        state.reset_orbit();
        self.selected = Some(entry.id.clone());
        Ok(())
    }

    /// Select a catalog entry by position in the selection list.
    pub fn select_index<V: ModelViewer>(
        &mut self,
        index: usize,
        state: &mut ViewerState<V>,
    ) -> Result<(), CatalogError> {
        let id = self
            .catalog
            .entry_at(index)
            .map(|entry| entry.id.clone())
            .ok_or_else(|| CatalogError::UnknownModel(format!("#{index}")))?;
        self.select(&id, state)
    }

    /// Switch to the selected entry's cut variant. No-op when the control is
    /// not visible.
    pub fn activate_cut_view<V: ModelViewer>(
        &mut self,
        state: &mut ViewerState<V>,
    ) -> Result<(), CatalogError> {
        let cut_id = self
            .selected
            .as_deref()
            .and_then(|id| self.catalog.entry(id))
            .and_then(|entry| entry.cut_variant.clone());

        match cut_id {
            Some(cut_id) => self.select(&cut_id, state),
            None => Ok(()),
        }
    }
}
