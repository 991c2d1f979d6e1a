//! Scanview Capture - camera sessions and still-frame capture
//!
//! This crate owns the acquire-preview-capture sequence: open a camera
//! session, read one frame at the stream's native resolution, release the
//! session, and encode the frame as a JPEG ready for upload.
//!
//! Camera backends implement the `CameraSource` trait:
//!
//! - Webcams (via nokhwa, requires `webcam` feature)
//!
//! ## Example
//!
//! ```ignore
//! use scanview_capture::{CaptureConfig, CaptureController, WebcamOpener};
//!
//! let mut controller = CaptureController::new(CaptureConfig::default(), Box::new(WebcamOpener));
//! controller.start_capture()?;
//! let frame = controller.capture_frame()?;
//! ```

mod controller;
mod source;

#[cfg(feature = "webcam")]
mod webcam;

pub use controller::{CaptureConfig, CaptureController, CaptureState};
pub use source::{CameraOpener, CameraSource, CaptureError, CapturedFrame};

#[cfg(feature = "webcam")]
pub use webcam::{WebcamOpener, WebcamSource};
