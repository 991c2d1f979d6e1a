//! Scanview Application
//!
//! Desktop client for scan-to-model workflows:
//! - Photograph an object with the device camera and upload it for scanning
//! - Display whichever 3D model the scan endpoint returns
//! - Pick among the preloaded model catalog
//! - Rotate the displayed model with the keyboard

mod app;
mod keys;
mod pipeline;

use clap::Parser;
use std::path::PathBuf;
use url::Url;

/// Scanview - capture, upload, and view 3D scans
#[derive(Parser, Debug)]
#[command(name = "scanview")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scan upload endpoint
    #[arg(long, default_value = "http://127.0.0.1:5001/api/scan")]
    endpoint: Url,

    /// Camera device index
    #[arg(long, default_value_t = 0)]
    camera: u32,

    /// Preferred capture width
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Preferred capture height
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Delay between opening the camera and taking the photo, in milliseconds
    #[arg(long, default_value_t = 2000)]
    delay_ms: u64,

    /// Rotation step per key press, in degrees
    #[arg(long, default_value_t = 5)]
    step: i32,

    /// Directory model source paths are resolved against for preloading
    #[arg(long, default_value = ".")]
    models_dir: PathBuf,

    /// Optional JSON model catalog replacing the built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// List capture devices and exit
    #[arg(long)]
    list_devices: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    if let Err(e) = app::run(args) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
