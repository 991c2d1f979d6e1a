//! Common camera source types and traits.

use chrono::{DateTime, Utc};
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use thiserror::Error;

/// Errors that can occur while acquiring a camera or capturing a frame.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Permission denied, no device, or the device refused to open.
    #[error("Camera access failed: {0}")]
    CameraAccess(String),

    #[error("Failed to read frame: {0}")]
    FrameRead(String),

    #[error("Failed to encode frame: {0}")]
    Encode(#[from] image::ImageError),

    /// `capture_frame` was called without an active session.
    #[error("No active camera session")]
    NoSession,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A still photo taken from a camera session, encoded and ready for upload.
///
/// Immutable once produced. Dimensions are the source's native resolution at
/// the instant of capture, not the requested preview size.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// JPEG-encoded image data.
    pub jpeg: Vec<u8>,
    /// Pixel width of the captured raster.
    pub width: u32,
    /// Pixel height of the captured raster.
    pub height: u32,
    /// Wall-clock time of the capture.
    pub captured_at: DateTime<Utc>,
}

impl CapturedFrame {
    /// Encode an RGB raster as JPEG at the given quality (0-100).
    pub fn from_image(
        image: &RgbImage,
        quality: u8,
        captured_at: DateTime<Utc>,
    ) -> Result<Self, CaptureError> {
        let (width, height) = image.dimensions();
        let mut jpeg = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, quality);
        encoder.encode_image(image)?;

        Ok(Self {
            jpeg,
            width,
            height,
            captured_at,
        })
    }

    /// Timestamp-derived upload filename, e.g. `scan_1724630400000.jpg`.
    pub fn filename(&self) -> String {
        format!("scan_{}.jpg", self.captured_at.timestamp_millis())
    }

    /// Image dimensions (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// An open camera session that can produce frames.
///
/// Implementations own the underlying device handle; `stop` must release it
/// so no capture indicator stays lit after the session ends. Sessions are not
/// required to be `Send`: open and consume them on one thread.
pub trait CameraSource {
    /// Read the current frame from the live stream.
    fn grab_frame(&mut self) -> Result<RgbImage, CaptureError>;

    /// The stream's native resolution (width, height).
    fn resolution(&self) -> (u32, u32);

    /// Whether the session still holds the device.
    fn is_active(&self) -> bool;

    /// Release the device and all underlying tracks.
    fn stop(&mut self);
}

/// Factory for camera sessions. The controller asks it for a fresh session on
/// every acquire, so tests can hand out synthetic sources.
pub trait CameraOpener: Send {
    /// Open a camera session at (or near) the preferred resolution.
    fn open(
        &self,
        device_index: u32,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn CameraSource>, CaptureError>;
}
