//! Capture-and-upload pipeline.
//!
//! One cycle: acquire the camera on a worker thread, wait out the preview
//! delay, capture and encode a frame, then hand the upload to the tokio
//! runtime. The outcome comes back to the event loop as a [`ScanEvent`].
//! Capture and upload are decoupled: the in-flight guard clears as soon as
//! the camera session is released, so a slow or failed upload never blocks
//! the next capture. Overlapping uploads are not coordinated; the last
//! response to arrive wins.

use chrono::Utc;
use scanview_capture::{
    CaptureConfig, CaptureController, CaptureError, CapturedFrame, WebcamOpener,
};
use scanview_client::{UploadClient, UploadError};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info};
use winit::event_loop::EventLoopProxy;

/// Outcome of a scan cycle, delivered to the event loop.
#[derive(Debug)]
pub enum ScanEvent {
    /// Camera acquisition or frame capture failed; nothing was uploaded.
    CaptureFailed(CaptureError),
    /// The upload finished, successfully or not.
    UploadFinished(Result<Option<String>, UploadError>),
}

pub struct ScanPipeline {
    capture_config: CaptureConfig,
    delay: Duration,
    client: Arc<UploadClient>,
    runtime: Handle,
    proxy: EventLoopProxy<ScanEvent>,
    in_flight: Arc<AtomicBool>,
}

impl ScanPipeline {
    pub fn new(
        capture_config: CaptureConfig,
        delay: Duration,
        client: Arc<UploadClient>,
        runtime: Handle,
        proxy: EventLoopProxy<ScanEvent>,
    ) -> Self {
        Self {
            capture_config,
            delay,
            client,
            runtime,
            proxy,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start a capture-and-upload cycle. While a camera session is active
    /// this is a no-op, so mashing the trigger cannot acquire twice.
    pub fn trigger_scan(&self) {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!("scan already in progress, ignoring trigger");
            return;
        }

        let config = self.capture_config.clone();
        let delay = self.delay;
        let client = self.client.clone();
        let runtime = self.runtime.clone();
        let proxy = self.proxy.clone();
        let in_flight = self.in_flight.clone();

        std::thread::spawn(move || {
            let mut controller = CaptureController::new(config, Box::new(WebcamOpener));
            let frame = controller.start_capture().and_then(|()| {
                // Preview window before the shot, as on the capture page.
                std::thread::sleep(delay);
                controller.capture_frame()
            });

            // Session released; the cycle is re-triggerable from here on.
            in_flight.store(false, Ordering::SeqCst);

            match frame {
                Ok(frame) => spawn_upload(&runtime, client, proxy, frame),
                Err(e) => {
                    let _ = proxy.send_event(ScanEvent::CaptureFailed(e));
                }
            }
        });
    }

    /// File-input fallback: upload an existing image instead of a camera
    /// shot. The image goes through the same JPEG re-encode and upload path.
    pub fn upload_file(&self, path: PathBuf) {
        let quality = self.capture_config.jpeg_quality;
        let client = self.client.clone();
        let runtime = self.runtime.clone();
        let proxy = self.proxy.clone();

        std::thread::spawn(move || {
            info!("uploading image file {}", path.display());
            let frame = image::open(&path)
                .map_err(CaptureError::Encode)
                .and_then(|img| CapturedFrame::from_image(&img.to_rgb8(), quality, Utc::now()));

            match frame {
                Ok(frame) => spawn_upload(&runtime, client, proxy, frame),
                Err(e) => {
                    let _ = proxy.send_event(ScanEvent::CaptureFailed(e));
                }
            }
        });
    }
}

fn spawn_upload(
    runtime: &Handle,
    client: Arc<UploadClient>,
    proxy: EventLoopProxy<ScanEvent>,
    frame: CapturedFrame,
) {
    runtime.spawn(async move {
        let result = client.upload_scan(&frame).await;
        // The event loop may already be gone during shutdown.
        let _ = proxy.send_event(ScanEvent::UploadFinished(result));
    });
}
