//! Scanview Viewer - display state for the embedded 3D model viewer
//!
//! The renderer itself is an external component; this crate talks to it
//! through the [`ModelViewer`] trait, which accepts a model source, an
//! orientation string, and a camera-orbit string. Everything here is plain
//! synchronous state: the model catalog, selection handling, and the
//! keyboard-driven orientation accumulators.

mod catalog;
mod display;
mod orientation;
mod selection;

pub use catalog::{CatalogError, ModelCatalog, ModelEntry, preload_models};
pub use display::{CameraOrbit, ModelViewer, Orientation, ViewerState};
pub use orientation::{OrientationController, ROTATION_STEP_DEGREES};
pub use selection::SelectionController;
