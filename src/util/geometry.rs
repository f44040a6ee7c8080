// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the letterbox layout of an image inside the canvas
//! and the transformations between canvas pixel coordinates and normalized
//! box coordinates.
//!
//! The displayed image is resized once to `image_width` x `image_height` and
//! drawn 1:1, centered with integer offsets. Normalized coordinates are
//! therefore fractions of the resized dimensions.

use crate::models::annotation::BoundingBox;

/// Convert pixel coordinates to normalized coordinates (0.0 to 1.0).
pub fn normalize_coordinates(pixel_x: f64, pixel_y: f64, width: u32, height: u32) -> (f64, f64) {
    (pixel_x / width as f64, pixel_y / height as f64)
}

/// Convert normalized coordinates to pixel coordinates.
pub fn denormalize_coordinates(x: f64, y: f64, width: u32, height: u32) -> (f64, f64) {
    (x * width as f64, y * height as f64)
}

/// Rectangle in canvas pixel space, `(x1, y1)` top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CanvasRect {
    /// Rectangle spanned by two arbitrary corners.
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            x1: a.0.min(b.0),
            y1: a.1.min(b.1),
            x2: a.0.max(b.0),
            y2: a.1.max(b.1),
        }
    }
}

/// Placement of the displayed image inside the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub scale: f64,
    /// Resized image width in canvas pixels.
    pub image_width: u32,
    /// Resized image height in canvas pixels.
    pub image_height: u32,
    pub offset_x: i64,
    pub offset_y: i64,
}

impl Letterbox {
    /// Fit a `source` sized image into `canvas`, preserving aspect ratio.
    ///
    /// Returns `None` for degenerate canvases (< 2 px) or when the resized
    /// image would collapse below one pixel.
    pub fn fit(canvas: (u32, u32), source: (u32, u32)) -> Option<Self> {
        let (canvas_width, canvas_height) = canvas;
        let (src_w, src_h) = source;
        if canvas_width < 2 || canvas_height < 2 || src_w == 0 || src_h == 0 {
            return None;
        }

        let scale = (canvas_width as f64 / src_w as f64).min(canvas_height as f64 / src_h as f64);
        let image_width = (src_w as f64 * scale) as u32;
        let image_height = (src_h as f64 * scale) as u32;
        if image_width < 1 || image_height < 1 {
            return None;
        }

        Some(Self {
            canvas_width,
            canvas_height,
            scale,
            image_width,
            image_height,
            offset_x: (canvas_width as i64 - image_width as i64).div_euclid(2),
            offset_y: (canvas_height as i64 - image_height as i64).div_euclid(2),
        })
    }

    /// Canvas rectangle of a normalized box.
    pub fn box_to_canvas(&self, bbox: &BoundingBox) -> CanvasRect {
        let (x1, y1) = self.to_canvas(bbox.center_x - bbox.width / 2.0, bbox.center_y - bbox.height / 2.0);
        let (x2, y2) = self.to_canvas(bbox.center_x + bbox.width / 2.0, bbox.center_y + bbox.height / 2.0);
        CanvasRect { x1, y1, x2, y2 }
    }

    /// Canvas position of a normalized point.
    pub fn to_canvas(&self, x: f64, y: f64) -> (f64, f64) {
        let (px, py) = denormalize_coordinates(x, y, self.image_width, self.image_height);
        (px + self.offset_x as f64, py + self.offset_y as f64)
    }

    /// Position relative to the resized image's top-left corner (unclamped).
    pub fn canvas_to_image(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.offset_x as f64, y - self.offset_y as f64)
    }

    /// Normalized `(center_x, center_y, width, height)` of the rectangle
    /// spanned by two canvas points, clamped to the image.
    ///
    /// Returns `None` when nothing of the rectangle lies on the image.
    pub fn rect_to_normalized(&self, a: (f64, f64), b: (f64, f64)) -> Option<(f64, f64, f64, f64)> {
        let rect = CanvasRect::from_corners(a, b);
        let (img_w, img_h) = (self.image_width as f64, self.image_height as f64);
        let (x1, y1) = self.canvas_to_image(rect.x1, rect.y1);
        let (x2, y2) = self.canvas_to_image(rect.x2, rect.y2);
        let (x1, y1) = (x1.max(0.0), y1.max(0.0));
        let (x2, y2) = (x2.min(img_w), y2.min(img_h));
        if x1 >= x2 || y1 >= y2 {
            return None;
        }

        let (cx, cy) = normalize_coordinates((x1 + x2) / 2.0, (y1 + y2) / 2.0, self.image_width, self.image_height);
        let (w, h) = normalize_coordinates(x2 - x1, y2 - y1, self.image_width, self.image_height);
        Some((cx, cy, w, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_denormalize_roundtrip() {
        let width = 1920;
        let height = 1080;
        let pixel_x = 960.0;
        let pixel_y = 540.0;

        let (nx, ny) = normalize_coordinates(pixel_x, pixel_y, width, height);
        let (denorm_x, denorm_y) = denormalize_coordinates(nx, ny, width, height);

        assert!((denorm_x - pixel_x).abs() < 0.0001);
        assert!((denorm_y - pixel_y).abs() < 0.0001);
    }

    #[test]
    fn test_fit_exact() {
        let lb = Letterbox::fit((800, 600), (400, 300)).unwrap();
        assert_eq!(lb.scale, 2.0);
        assert_eq!((lb.image_width, lb.image_height), (800, 600));
        assert_eq!((lb.offset_x, lb.offset_y), (0, 0));
    }

    #[test]
    fn test_fit_pads_one_axis() {
        // Tall image in a wide canvas: horizontal padding only
        let lb = Letterbox::fit((800, 600), (300, 400)).unwrap();
        assert_eq!(lb.scale, 1.5);
        assert_eq!((lb.image_width, lb.image_height), (450, 600));
        assert_eq!((lb.offset_x, lb.offset_y), (175, 0));
    }

    #[test]
    fn test_fit_degenerate_canvas() {
        assert!(Letterbox::fit((1, 600), (400, 300)).is_none());
        assert!(Letterbox::fit((800, 600), (0, 300)).is_none());
    }

    #[test]
    fn test_rect_to_normalized_scenario() {
        let lb = Letterbox::fit((800, 600), (400, 300)).unwrap();
        let (cx, cy, w, h) = lb.rect_to_normalized((200.0, 150.0), (600.0, 450.0)).unwrap();
        assert_eq!((cx, cy, w, h), (0.5, 0.5, 0.5, 0.5));
    }

    #[test]
    fn test_rect_to_normalized_clamps_to_image() {
        let lb = Letterbox::fit((800, 600), (300, 400)).unwrap();
        // Starts in the left padding, ends past the bottom edge
        let (cx, cy, w, h) = lb.rect_to_normalized((100.0, 300.0), (400.0, 700.0)).unwrap();
        let expected_w = (400.0 - 175.0) / 450.0;
        assert!((w - expected_w).abs() < 1e-12);
        assert!((cx - expected_w / 2.0).abs() < 1e-12);
        assert!((h - 0.5).abs() < 1e-12);
        assert!((cy - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_rect_entirely_in_padding() {
        let lb = Letterbox::fit((800, 600), (300, 400)).unwrap();
        assert!(lb.rect_to_normalized((10.0, 10.0), (150.0, 200.0)).is_none());
    }

    #[test]
    fn test_canvas_roundtrip_across_layouts() {
        let bbox = BoundingBox::new(3, 0.42, 0.37, 0.25, 0.125);
        let layouts = [
            ((800, 600), (400, 300)),
            ((800, 600), (300, 400)),
            ((1024, 700), (1920, 1080)),
            ((640, 640), (123, 457)),
        ];
        for (canvas, source) in layouts {
            let lb = Letterbox::fit(canvas, source).unwrap();
            let rect = lb.box_to_canvas(&bbox);
            let (cx, cy, w, h) = lb.rect_to_normalized((rect.x1, rect.y1), (rect.x2, rect.y2)).unwrap();
            let tol_x = 1.0 / lb.image_width as f64;
            let tol_y = 1.0 / lb.image_height as f64;
            assert!((cx - bbox.center_x).abs() < tol_x, "{:?}", lb);
            assert!((cy - bbox.center_y).abs() < tol_y, "{:?}", lb);
            assert!((w - bbox.width).abs() < tol_x, "{:?}", lb);
            assert!((h - bbox.height).abs() < tol_y, "{:?}", lb);
        }
    }
}
