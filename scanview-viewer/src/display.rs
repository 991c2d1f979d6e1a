//! Viewer display state and the boundary trait to the external renderer.

/// Model orientation as pitch/yaw/roll accumulators in whole degrees.
///
/// Unbounded and unclamped; out-of-range values are the renderer's problem
/// to interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Orientation {
    pub pitch: i32,
    pub yaw: i32,
    pub roll: i32,
}

impl Orientation {
    /// Render as the viewer's orientation attribute, e.g. `"0deg -10deg -5deg"`.
    pub fn attribute(&self) -> String {
        format!("{}deg {}deg {}deg", self.pitch, self.yaw, self.roll)
    }
}

/// Camera orbit parameters: azimuth, polar angle, and orbit radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraOrbit {
    pub azimuth_deg: i32,
    pub polar_deg: i32,
    pub radius_pct: u32,
}

impl CameraOrbit {
    /// Render as the viewer's camera-orbit attribute, e.g. `"0deg 75deg 105%"`.
    pub fn attribute(&self) -> String {
        format!(
            "{}deg {}deg {}%",
            self.azimuth_deg, self.polar_deg, self.radius_pct
        )
    }
}

impl Default for CameraOrbit {
    fn default() -> Self {
        Self {
            azimuth_deg: 0,
            polar_deg: 75,
            radius_pct: 105,
        }
    }
}

/// Write-only boundary to the embedded 3D viewer component.
pub trait ModelViewer {
    /// Point the viewer at a model asset (URI or path).
    fn set_model_source(&mut self, source: &str);

    /// Apply an orientation string (`"<deg> <deg> <deg>"`).
    fn set_orientation(&mut self, orientation: &str);

    /// Apply a camera-orbit string (`"<deg> <deg> <percent>"`).
    fn set_camera_orbit(&mut self, orbit: &str);
}

/// The currently displayed model, orientation, and orbit.
///
/// Every mutation is pushed straight through to the wrapped viewer. Multiple
/// writers (selection, upload completion, orientation keys) share this state
/// with no mutual exclusion: last write wins.
pub struct ViewerState<V: ModelViewer> {
    viewer: V,
    model: Option<String>,
    orientation: Orientation,
    orbit: CameraOrbit,
}

impl<V: ModelViewer> ViewerState<V> {
    pub fn new(viewer: V) -> Self {
        Self {
            viewer,
            model: None,
            orientation: Orientation::default(),
            orbit: CameraOrbit::default(),
        }
    }

    /// The displayed model source, if any.
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn orbit(&self) -> CameraOrbit {
        self.orbit
    }

    /// Display a model.
    pub fn set_model(&mut self, source: impl Into<String>) {
        let source = source.into();
        self.viewer.set_model_source(&source);
        self.model = Some(source);
    }

    /// Apply the result of a successful upload. `None` (no model reference in
    /// the response) leaves the display untouched.
    pub fn apply_scan_result(&mut self, model_url: Option<String>) {
        if let Some(url) = model_url {
            self.set_model(url);
        }
    }

    /// Replace the orientation and push it to the viewer.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.viewer.set_orientation(&orientation.attribute());
    }

    /// Reset the camera orbit to the default framing.
    pub fn reset_orbit(&mut self) {
        self.orbit = CameraOrbit::default();
        self.viewer.set_camera_orbit(&self.orbit.attribute());
    }

    /// Access the wrapped viewer.
    pub fn viewer(&self) -> &V {
        &self.viewer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingViewer {
        sources: Vec<String>,
        orientations: Vec<String>,
        orbits: Vec<String>,
    }

    impl ModelViewer for RecordingViewer {
        fn set_model_source(&mut self, source: &str) {
            self.sources.push(source.to_owned());
        }

        fn set_orientation(&mut self, orientation: &str) {
            self.orientations.push(orientation.to_owned());
        }

        fn set_camera_orbit(&mut self, orbit: &str) {
            self.orbits.push(orbit.to_owned());
        }
    }

    #[test]
    fn test_orientation_attribute_format() {
        let orientation = Orientation {
            pitch: 0,
            yaw: -10,
            roll: -5,
        };
        assert_eq!(orientation.attribute(), "0deg -10deg -5deg");
    }

    #[test]
    fn test_default_orbit_attribute() {
        assert_eq!(CameraOrbit::default().attribute(), "0deg 75deg 105%");
    }

    #[test]
    fn test_set_model_pushes_to_viewer() {
        let mut state = ViewerState::new(RecordingViewer::default());
        state.set_model("models/bottle.glb");

        assert_eq!(state.model(), Some("models/bottle.glb"));
        assert_eq!(state.viewer().sources, vec!["models/bottle.glb"]);
    }

    #[test]
    fn test_scan_result_with_model_updates_display() {
        let mut state = ViewerState::new(RecordingViewer::default());
        state.apply_scan_result(Some("models/130.glb".to_owned()));
        assert_eq!(state.model(), Some("models/130.glb"));
    }

    #[test]
    fn test_scan_result_without_model_leaves_display_unchanged() {
        let mut state = ViewerState::new(RecordingViewer::default());
        state.set_model("models/bottle.glb");
        state.apply_scan_result(None);

        assert_eq!(state.model(), Some("models/bottle.glb"));
        assert_eq!(state.viewer().sources.len(), 1);
    }

    #[test]
    fn test_orientation_and_orbit_pushed_as_strings() {
        let mut state = ViewerState::new(RecordingViewer::default());
        state.set_orientation(Orientation {
            pitch: 0,
            yaw: 5,
            roll: -15,
        });
        state.reset_orbit();

        assert_eq!(state.viewer().orientations, vec!["0deg 5deg -15deg"]);
        assert_eq!(state.viewer().orbits, vec!["0deg 75deg 105%"]);
    }
}
