// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading and writing.
//!
//! This module handles decoding source images into RGB buffers, writing
//! rotated pixels back in the format implied by the file extension, and
//! enumerating the images of a folder.

use crate::error::{LabelerError, Result};
use image::RgbImage;
use std::path::{Path, PathBuf};

/// Extensions offered in file dialogs and picked up from folders.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Decode an image file into an 8-bit RGB buffer.
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let img = image::open(path).map_err(|source| LabelerError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.into_rgb8())
}

/// Encode `pixels` to `path`, inferring the format from the extension.
pub fn save_image(pixels: &RgbImage, path: &Path) -> Result<()> {
    pixels.save(path).map_err(|source| LabelerError::ImageWrite {
        path: path.to_path_buf(),
        source,
    })
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|ext| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Supported images directly inside `dir`, sorted by path.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| LabelerError::io(dir, e))?;
    let mut images: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_supported_image(p))
        .collect();
    images.sort();
    Ok(images)
}

/// Downscale an image to fit within `max_side` x `max_side` for the thumbnail strip.
pub fn load_thumbnail(path: &Path, max_side: u32) -> Result<RgbImage> {
    let img = image::open(path).map_err(|source| LabelerError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.thumbnail(max_side, max_side).into_rgb8())
}
