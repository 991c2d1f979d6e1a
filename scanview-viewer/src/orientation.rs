//! Keyboard-driven rotation of the displayed model.

use crate::display::Orientation;

/// Degrees applied per recognized key press.
pub const ROTATION_STEP_DEGREES: i32 = 5;

/// Maps key presses onto the orientation accumulators.
///
/// Keys are case-insensitive: `w`/`s` drive yaw, `a`/`d` drive roll. The
/// pitch accumulator exists and is rendered but no key adjusts it; that
/// asymmetry is inherited behavior, kept until there is product guidance for
/// a pitch binding.
#[derive(Debug, Clone)]
pub struct OrientationController {
    orientation: Orientation,
    step: i32,
}

impl OrientationController {
    pub fn new(step: i32) -> Self {
        Self {
            orientation: Orientation::default(),
            step,
        }
    }

    /// The accumulated orientation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Apply one key press. Returns the updated orientation for recognized
    /// keys and `None` for everything else.
    pub fn handle_key(&mut self, key: char) -> Option<Orientation> {
        match key.to_ascii_lowercase() {
            'w' => self.orientation.yaw -= self.step,
            's' => self.orientation.yaw += self.step,
            'a' => self.orientation.roll -= self.step,
            'd' => self.orientation.roll += self.step,
            _ => return None,
        }
        Some(self.orientation)
    }
}

impl Default for OrientationController {
    fn default() -> Self {
        Self::new(ROTATION_STEP_DEGREES)
    }
}
