//! Application state and the winit event loop.

use crate::Args;
use crate::keys::{Command, map_key};
use crate::pipeline::{ScanEvent, ScanPipeline};
use scanview_capture::{CaptureConfig, WebcamSource};
use scanview_client::UploadClient;
use scanview_viewer::{
    ModelCatalog, ModelViewer, OrientationController, SelectionController, ViewerState,
    preload_models,
};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

const WINDOW_TITLE: &str = "scanview";

/// Stand-in for the embedded third-party renderer: accepts the same three
/// writable properties and logs what it would display.
pub struct LogViewer;

impl ModelViewer for LogViewer {
    fn set_model_source(&mut self, source: &str) {
        info!("viewer model source: {source}");
    }

    fn set_orientation(&mut self, orientation: &str) {
        info!("viewer orientation: {orientation}");
    }

    fn set_camera_orbit(&mut self, orbit: &str) {
        info!("viewer camera orbit: {orbit}");
    }
}

/// Build everything and run the event loop until the window closes.
pub fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if args.list_devices {
        for device in WebcamSource::list_devices()? {
            println!("{device}");
        }
        return Ok(());
    }

    let catalog = match &args.catalog {
        Some(path) => ModelCatalog::from_json_file(path)?,
        None => ModelCatalog::default(),
    };
    preload_models(&catalog, &args.models_dir);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let client = Arc::new(UploadClient::new(args.endpoint.clone())?);
    info!("scan endpoint: {}", client.endpoint());

    let event_loop = EventLoop::<ScanEvent>::with_user_event().build()?;

    let capture_config = CaptureConfig {
        device_index: args.camera,
        width: args.width,
        height: args.height,
        ..CaptureConfig::default()
    };
    let pipeline = ScanPipeline::new(
        capture_config,
        Duration::from_millis(args.delay_ms),
        client,
        runtime.handle().clone(),
        event_loop.create_proxy(),
    );

    let mut app = ScanApp::new(catalog, args.step, pipeline);
    event_loop.run_app(&mut app)?;
    Ok(())
}

struct ScanApp {
    window: Option<Arc<Window>>,
    viewer: ViewerState<LogViewer>,
    selection: SelectionController,
    orientation: OrientationController,
    pipeline: ScanPipeline,
}

impl ScanApp {
    fn new(catalog: ModelCatalog, step: i32, pipeline: ScanPipeline) -> Self {
        Self {
            window: None,
            viewer: ViewerState::new(LogViewer),
            selection: SelectionController::new(catalog),
            orientation: OrientationController::new(step),
            pipeline,
        }
    }

    /// Surface a failure to the user without touching viewer state. Nothing
    /// here is fatal; every action stays re-triggerable.
    fn notify(&self, message: &str) {
        error!("{message}");
        if let Some(window) = &self.window {
            window.set_title(&format!("{WINDOW_TITLE} - {message}"));
        }
    }

    fn clear_notice(&self) {
        if let Some(window) = &self.window {
            window.set_title(WINDOW_TITLE);
        }
    }

    fn handle_command(&mut self, event_loop: &ActiveEventLoop, command: Command) {
        match command {
            Command::Quit => event_loop.exit(),
            Command::TriggerScan => {
                self.clear_notice();
                self.pipeline.trigger_scan();
            }
            Command::PickFile => {
                let picked = rfd::FileDialog::new()
                    .add_filter("image", &["jpg", "jpeg", "png"])
                    .pick_file();
                if let Some(path) = picked {
                    self.clear_notice();
                    self.pipeline.upload_file(path);
                }
            }
            Command::SelectModel(index) => {
                if let Err(e) = self.selection.select_index(index, &mut self.viewer) {
                    warn!("{e}");
                }
            }
            Command::CutView => {
                if self.selection.cut_view_visible() {
                    if let Err(e) = self.selection.activate_cut_view(&mut self.viewer) {
                        warn!("{e}");
                    }
                }
            }
            Command::Rotate(key) => {
                if let Some(orientation) = self.orientation.handle_key(key) {
                    self.viewer.set_orientation(orientation);
                }
            }
        }
    }
}

impl ApplicationHandler<ScanEvent> for ScanApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // No rendering happens here, so only wake up for events.
        event_loop.set_control_flow(ControlFlow::Wait);

        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(1280, 720));
        match event_loop.create_window(attributes) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        logical_key,
                        ..
                    },
                ..
            } => {
                if let Some(command) = map_key(&logical_key) {
                    self.handle_command(event_loop, command);
                }
            }
            _ => {}
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: ScanEvent) {
        match event {
            ScanEvent::CaptureFailed(e) => {
                self.notify(&format!("Could not capture photo: {e}"));
            }
            ScanEvent::UploadFinished(Ok(model_url)) => {
                self.clear_notice();
                self.viewer.apply_scan_result(model_url);
            }
            ScanEvent::UploadFinished(Err(e)) => {
                // Viewer state stays exactly as it was; the user re-triggers
                // capture to retry.
                self.notify(&format!("Scan upload failed: {e}"));
            }
        }
    }
}
