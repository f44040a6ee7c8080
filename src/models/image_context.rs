// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! State of the single image currently open for labeling.
//!
//! An `ImageContext` bundles the pixels as loaded from disk, the pixels as
//! currently displayed (after any pending rotation), the image's boxes and
//! its rotation state. Exactly one context is live at a time.

use super::annotation::AnnotationSet;
use image::RgbImage;
use std::path::PathBuf;

/// Interaction mode of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Labeling,
    Rotation,
}

/// Pending rotation of the displayed image relative to the file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    /// Whole degrees in `0..360`.
    pub discrete_angle: u32,
    /// Degrees in `[0, 360)`.
    pub drag_angle: f64,
    /// Displayed pixels differ from the file and have not been written back.
    pub dirty: bool,
}

#[derive(Debug, Clone)]
pub struct ImageContext {
    pub path: PathBuf,
    pub original: RgbImage,
    pub displayed: RgbImage,
    pub annotations: AnnotationSet,
    pub rotation: RotationState,
}

impl ImageContext {
    /// Create a context for freshly loaded pixels with a clean rotation state.
    pub fn new(path: PathBuf, pixels: RgbImage, annotations: AnnotationSet) -> Self {
        Self {
            path,
            displayed: pixels.clone(),
            original: pixels,
            annotations,
            rotation: RotationState::default(),
        }
    }

    /// Path of the label file that belongs to this image.
    pub fn label_path(&self) -> PathBuf {
        crate::io::labels::label_path_for(&self.path)
    }

    pub fn displayed_size(&self) -> (u32, u32) {
        self.displayed.dimensions()
    }
}
