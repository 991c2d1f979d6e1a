//! Webcam sessions using nokhwa.

use image::RgbImage;
use nokhwa::Camera;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution};
use tracing::{debug, info};

use crate::source::{CameraOpener, CameraSource, CaptureError};

/// An open webcam session.
pub struct WebcamSource {
    camera: Camera,
    active: bool,
    resolution: (u32, u32),
}

impl WebcamSource {
    /// Open the webcam at `index`, asking for the closest match to the
    /// preferred resolution. The device decides the actual format.
    pub fn open(index: u32, width: u32, height: u32) -> Result<Self, CaptureError> {
        info!("Opening webcam {} at preferred {}x{}", index, width, height);

        let camera_index = CameraIndex::Index(index);
        let format = CameraFormat::new(Resolution::new(width, height), FrameFormat::MJPEG, 30);
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));

        let camera = Camera::new(camera_index, requested)
            .map_err(|e| CaptureError::CameraAccess(e.to_string()))?;

        let resolution = camera.resolution();
        info!(
            "Webcam opened: {}x{} @ {:?} fps",
            resolution.width(),
            resolution.height(),
            camera.frame_rate()
        );

        Ok(Self {
            camera,
            active: true,
            resolution: (resolution.width(), resolution.height()),
        })
    }

    /// List available webcam devices.
    pub fn list_devices() -> Result<Vec<String>, CaptureError> {
        let devices = nokhwa::query(nokhwa::utils::ApiBackend::Auto)
            .map_err(|e| CaptureError::CameraAccess(e.to_string()))?;

        Ok(devices
            .into_iter()
            .map(|info| format!("{}: {}", info.index(), info.human_name()))
            .collect())
    }
}

impl CameraSource for WebcamSource {
    fn grab_frame(&mut self) -> Result<RgbImage, CaptureError> {
        if !self.active {
            return Err(CaptureError::NoSession);
        }

        let frame = self
            .camera
            .frame()
            .map_err(|e| CaptureError::FrameRead(e.to_string()))?;

        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| CaptureError::FrameRead(e.to_string()))?;

        let (width, height) = (decoded.width(), decoded.height());
        debug!("grabbed {}x{} frame", width, height);

        RgbImage::from_raw(width, height, decoded.into_raw())
            .ok_or_else(|| CaptureError::FrameRead("failed to assemble RGB image".to_string()))
    }

    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn stop(&mut self) {
        if self.active {
            let _ = self.camera.stop_stream();
            self.active = false;
            info!("webcam session released");
        }
    }
}

impl Drop for WebcamSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Opens nokhwa-backed webcam sessions.
pub struct WebcamOpener;

impl CameraOpener for WebcamOpener {
    fn open(
        &self,
        device_index: u32,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn CameraSource>, CaptureError> {
        Ok(Box::new(WebcamSource::open(device_index, width, height)?))
    }
}
