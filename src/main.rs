// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! YOLO Labeler
//!
//! A desktop application for drawing axis-aligned bounding boxes in the
//! normalized YOLO text format, with a rotation mode for straightening
//! source images before they are labeled.

mod app;
mod config;
mod engine;
mod error;
mod io;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::LabelerApp;
use config::{Settings, SETTINGS_FILE};
use std::path::Path;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let settings = Settings::load(Path::new(SETTINGS_FILE));
    let classes = io::class_file::load_classes(&settings.classes_file).unwrap_or_else(|e| {
        log::warn!("{}, using default classes", e);
        models::classes::ClassTable::default()
    });

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height])
            .with_min_inner_size([800.0, 600.0])
            .with_title("YOLO Image Labeler"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "YOLO Labeler",
        options,
        Box::new(move |_cc| Ok(Box::new(LabelerApp::new(settings, classes)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
