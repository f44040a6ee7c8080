// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Labeling core: box drawing, rotation and the session that drives them.
//!
//! Engines receive the image context and letterbox layout explicitly on
//! every call. They return a [`Redraw`] telling the presentation layer how
//! much of the canvas has to be refreshed.

pub mod annotation;
pub mod rotation;
pub mod scene;
pub mod session;

/// Canvas refresh needed after an operation, ordered by cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Redraw {
    #[default]
    None,
    /// Boxes, preview or guides changed.
    Overlay,
    /// Displayed pixels or layout changed; rescale and re-upload the image.
    Image,
}
