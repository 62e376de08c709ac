//! nanovis viewer
//!
//! Demo host for the debugging overlay: binds a few animated values,
//! shows them in panels and orbits a ground grid with the mouse.

mod app;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use eframe::egui;

#[derive(Parser)]
#[command(name = "nanovis")]
#[command(about = "Live debugging overlay demo")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Window title
    #[arg(long)]
    title: Option<String>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => nanovis_core::config::load_from(path)?,
        None => nanovis_core::config::load(),
    };
    if let Some(title) = cli.title {
        config.window.title = title;
    }
    if let Some(width) = cli.width {
        config.window.width = width;
    }
    if let Some(height) = cli.height {
        config.window.height = height;
    }

    tracing::info!(
        "Starting {} ({}x{})",
        config.window.title,
        config.window.width,
        config.window.height
    );

    let title = config.window.title.clone();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size([config.window.width as f32, config.window.height as f32]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| Ok(Box::new(app::ViewerApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    Ok(())
}
