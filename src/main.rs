//! MP4 Batch Converter
//!
//! Main entry point for the application.

use mp4_batch_converter::{ConverterApp, ConverterConfig};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("Starting MP4 Batch Converter v{}", env!("CARGO_PKG_VERSION"));

    let config = ConverterConfig::discover();

    // Configure native options
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 340.0])
            .with_min_inner_size([380.0, 300.0])
            .with_title("Video Converter"),
        ..Default::default()
    };

    // Run the app
    eframe::run_native(
        "MP4 Batch Converter",
        native_options,
        Box::new(move |_cc| Box::new(ConverterApp::new(config))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))
}
