// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the normalized bounding box and the ordered set of
//! boxes belonging to one image.

use crate::error::{LabelerError, Result};

/// An axis-aligned box in normalized (0.0 to 1.0) image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub class_id: usize,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Create a new box from its class and normalized center/extent.
    pub fn new(class_id: usize, center_x: f64, center_y: f64, width: f64, height: f64) -> Self {
        Self {
            class_id,
            center_x,
            center_y,
            width,
            height,
        }
    }
}

/// Boxes of exactly one image, in insertion (display) order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationSet {
    boxes: Vec<BoundingBox>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bbox: BoundingBox) {
        self.boxes.push(bbox);
    }

    /// Remove the box at ordinal position `index`.
    pub fn remove(&mut self, index: usize) -> Result<BoundingBox> {
        if index >= self.boxes.len() {
            return Err(LabelerError::OutOfRange {
                index,
                len: self.boxes.len(),
            });
        }
        Ok(self.boxes.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundingBox> {
        self.boxes.iter()
    }

    pub fn get(&self, index: usize) -> Option<&BoundingBox> {
        self.boxes.get(index)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl FromIterator<BoundingBox> for AnnotationSet {
    fn from_iter<I: IntoIterator<Item = BoundingBox>>(iter: I) -> Self {
        Self {
            boxes: iter.into_iter().collect(),
        }
    }
}
