//! Capture controller: acquire, preview, one-shot capture, release.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::source::{CameraOpener, CameraSource, CaptureError, CapturedFrame};

/// Where the controller is in the acquire-capture cycle.
///
/// `Acquiring` falls back to `Idle` on permission/device failure. `Captured`
/// transitions to `Idle` as soon as encoding finishes, independent of what
/// happens to the frame afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Acquiring,
    Previewing,
    Captured,
}

/// Capture configuration.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Device index to open.
    pub device_index: u32,
    /// Preferred stream width.
    pub width: u32,
    /// Preferred stream height.
    pub height: u32,
    /// JPEG quality (0-100).
    pub jpeg_quality: u8,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            width: 1280,
            height: 720,
            jpeg_quality: 90,
        }
    }
}

/// Owns the camera session and drives the capture state machine.
///
/// At most one session is alive at a time; `start_capture` while a session is
/// active is a no-op. Capture is one-shot: after `capture_frame` the session
/// is released and a new `start_capture` is required.
pub struct CaptureController {
    config: CaptureConfig,
    opener: Box<dyn CameraOpener>,
    session: Option<Box<dyn CameraSource>>,
    state: CaptureState,
}

impl CaptureController {
    pub fn new(config: CaptureConfig, opener: Box<dyn CameraOpener>) -> Self {
        Self {
            config,
            opener,
            session: None,
            state: CaptureState::Idle,
        }
    }

    /// Current state machine position.
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Whether a camera session is currently held.
    pub fn session_active(&self) -> bool {
        self.session.is_some()
    }

    /// Acquire a camera session at the preferred resolution.
    ///
    /// Idempotent: if a session is already active this returns without
    /// touching the device. On failure the controller is back in `Idle` and
    /// the error must be surfaced to the user, not propagated as a crash.
    pub fn start_capture(&mut self) -> Result<(), CaptureError> {
        if self.session.is_some() {
            debug!("start_capture: session already active, ignoring");
            return Ok(());
        }

        self.state = CaptureState::Acquiring;
        let opened =
            self.opener
                .open(self.config.device_index, self.config.width, self.config.height);
        let source = match opened {
            Ok(source) => source,
            Err(e) => {
                warn!("camera acquisition failed: {e}");
                self.state = CaptureState::Idle;
                return Err(e);
            }
        };

        let (width, height) = source.resolution();
        info!("camera session open at {width}x{height}");
        self.session = Some(source);
        self.state = CaptureState::Previewing;
        Ok(())
    }

    /// Capture one still frame from the live session.
    ///
    /// Reads the frame at the stream's native resolution, stops the session
    /// before encoding, then encodes JPEG at the configured quality. The
    /// session is always released, even when the read fails.
    pub fn capture_frame(&mut self) -> Result<CapturedFrame, CaptureError> {
        let mut source = self.session.take().ok_or(CaptureError::NoSession)?;

        let grabbed = source.grab_frame();
        source.stop();

        let image = match grabbed {
            Ok(image) => image,
            Err(e) => {
                self.state = CaptureState::Idle;
                return Err(e);
            }
        };

        self.state = CaptureState::Captured;
        let captured_at = Utc::now();
        let frame = CapturedFrame::from_image(&image, self.config.jpeg_quality, captured_at);
        self.state = CaptureState::Idle;

        let frame = frame?;
        info!(
            "captured {}x{} frame ({} bytes jpeg)",
            frame.width,
            frame.height,
            frame.jpeg.len()
        );
        Ok(frame)
    }

    /// Release the session without capturing, if one is active.
    pub fn release(&mut self) {
        if let Some(mut source) = self.session.take() {
            source.stop();
        }
        self.state = CaptureState::Idle;
    }
}

impl Drop for CaptureController {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    /// Synthetic source backed by a solid-color raster.
    struct FakeSource {
        width: u32,
        height: u32,
        stopped: Arc<AtomicBool>,
        fail_grab: bool,
    }

    impl CameraSource for FakeSource {
        fn grab_frame(&mut self) -> Result<RgbImage, CaptureError> {
            if self.fail_grab {
                return Err(CaptureError::FrameRead("device unplugged".into()));
            }
            Ok(RgbImage::new(self.width, self.height))
        }

        fn resolution(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn is_active(&self) -> bool {
            !self.stopped.load(Ordering::SeqCst)
        }

        fn stop(&mut self) {
            self.stopped.store(true, Ordering::SeqCst);
        }
    }

    struct FakeOpener {
        width: u32,
        height: u32,
        opens: Arc<AtomicU32>,
        stopped: Arc<AtomicBool>,
        fail_open: bool,
        fail_grab: bool,
    }

    impl FakeOpener {
        fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                opens: Arc::new(AtomicU32::new(0)),
                stopped: Arc::new(AtomicBool::new(false)),
                fail_open: false,
                fail_grab: false,
            }
        }
    }

    impl CameraOpener for FakeOpener {
        fn open(
            &self,
            _device_index: u32,
            _width: u32,
            _height: u32,
        ) -> Result<Box<dyn CameraSource>, CaptureError> {
            if self.fail_open {
                return Err(CaptureError::CameraAccess("permission denied".into()));
            }
            self.opens.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeSource {
                width: self.width,
                height: self.height,
                stopped: self.stopped.clone(),
                fail_grab: self.fail_grab,
            }))
        }
    }

    fn controller_with(opener: FakeOpener) -> (CaptureController, Arc<AtomicU32>, Arc<AtomicBool>) {
        let opens = opener.opens.clone();
        let stopped = opener.stopped.clone();
        let controller = CaptureController::new(CaptureConfig::default(), Box::new(opener));
        (controller, opens, stopped)
    }

    #[test]
    fn test_start_capture_is_idempotent() {
        let (mut controller, opens, _) = controller_with(FakeOpener::new(640, 480));

        controller.start_capture().unwrap();
        controller.start_capture().unwrap();
        controller.start_capture().unwrap();

        assert_eq!(opens.load(Ordering::SeqCst), 1);
        assert_eq!(controller.state(), CaptureState::Previewing);
    }

    #[test]
    fn test_acquisition_failure_returns_to_idle() {
        let mut opener = FakeOpener::new(640, 480);
        opener.fail_open = true;
        let (mut controller, _, _) = controller_with(opener);

        let err = controller.start_capture().unwrap_err();
        assert!(matches!(err, CaptureError::CameraAccess(_)));
        assert_eq!(controller.state(), CaptureState::Idle);
        assert!(!controller.session_active());
    }

    #[test]
    fn test_capture_sizes_output_to_native_resolution() {
        let (mut controller, _, _) = controller_with(FakeOpener::new(1920, 1080));

        controller.start_capture().unwrap();
        let frame = controller.capture_frame().unwrap();

        assert_eq!(frame.dimensions(), (1920, 1080));
        assert!(!frame.jpeg.is_empty());
    }

    #[test]
    fn test_capture_stops_session_and_is_one_shot() {
        let (mut controller, _, stopped) = controller_with(FakeOpener::new(640, 480));

        controller.start_capture().unwrap();
        controller.capture_frame().unwrap();

        assert!(stopped.load(Ordering::SeqCst));
        assert!(!controller.session_active());
        assert_eq!(controller.state(), CaptureState::Idle);

        // A second capture without restarting the session must fail.
        let err = controller.capture_frame().unwrap_err();
        assert!(matches!(err, CaptureError::NoSession));
    }

    #[test]
    fn test_failed_grab_still_releases_session() {
        let mut opener = FakeOpener::new(640, 480);
        opener.fail_grab = true;
        let (mut controller, _, stopped) = controller_with(opener);

        controller.start_capture().unwrap();
        let err = controller.capture_frame().unwrap_err();

        assert!(matches!(err, CaptureError::FrameRead(_)));
        assert!(stopped.load(Ordering::SeqCst));
        assert_eq!(controller.state(), CaptureState::Idle);
    }

    #[test]
    fn test_restart_after_capture_opens_new_session() {
        let (mut controller, opens, _) = controller_with(FakeOpener::new(640, 480));

        controller.start_capture().unwrap();
        controller.capture_frame().unwrap();
        controller.start_capture().unwrap();

        assert_eq!(opens.load(Ordering::SeqCst), 2);
        assert_eq!(controller.state(), CaptureState::Previewing);
    }

    #[test]
    fn test_filename_uses_capture_timestamp() {
        let (mut controller, _, _) = controller_with(FakeOpener::new(64, 64));

        controller.start_capture().unwrap();
        let frame = controller.capture_frame().unwrap();

        let name = frame.filename();
        assert!(name.starts_with("scan_"));
        assert!(name.ends_with(".jpg"));
        let millis: i64 = name["scan_".len()..name.len() - ".jpg".len()]
            .parse()
            .unwrap();
        assert_eq!(millis, frame.captured_at.timestamp_millis());
    }
}
