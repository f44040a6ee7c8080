// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the labeling core.
//!
//! Every fallible engine or session operation reports one of these values
//! to the presentation layer, which shows it to the user. Nothing is retried
//! automatically.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LabelerError>;

#[derive(Debug, Error)]
pub enum LabelerError {
    /// The image could not be read or decoded.
    #[error("cannot decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A label, class or settings file could not be read or written.
    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rotated pixels could not be written back to the image file.
    #[error("cannot write image {}: {source}", path.display())]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no images found in {}", dir.display())]
    NoImages { dir: PathBuf },

    #[error("index {index} out of range for {len} bounding boxes")]
    OutOfRange { index: usize, len: usize },
}

impl LabelerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
