// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! User settings loaded from `labeler.yaml` in the working directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "labeler.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window_width: f32,
    pub window_height: f32,
    /// Canvas size assumed until the first layout pass reports the real one.
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Minimum drawn box extent in canvas pixels, both axes.
    pub min_box_size: f64,
    /// Degrees of rotation per pixel of horizontal drag.
    pub drag_sensitivity: f64,
    pub resize_debounce_ms: u64,
    pub auto_save: bool,
    pub thumbnail_size: u32,
    pub classes_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: 1200.0,
            window_height: 800.0,
            canvas_width: 800,
            canvas_height: 600,
            min_box_size: 5.0,
            drag_sensitivity: 0.5,
            resize_debounce_ms: 200,
            auto_save: true,
            thumbnail_size: 100,
            classes_file: PathBuf::from("classes.txt"),
        }
    }
}

impl Settings {
    /// Load settings from `path`; a missing or broken file yields defaults.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Cannot read {}: {}, using default settings", path.display(), e);
                return Self::default();
            }
        };

        match serde_yaml::from_str(&text) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
