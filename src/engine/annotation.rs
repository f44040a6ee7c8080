// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Bounding-box drawing and deletion.
//!
//! The engine only holds the in-progress gesture. The boxes themselves live
//! in the `ImageContext` passed to each call, and every mutation is written
//! to the image's label file immediately.

use super::Redraw;
use crate::error::Result;
use crate::io::labels;
use crate::models::{annotation::BoundingBox, image_context::ImageContext};
use crate::util::geometry::{CanvasRect, Letterbox};

/// Box drawing state for the labeling mode.
#[derive(Debug, Clone)]
pub struct AnnotationEngine {
    min_box_size: f64,
    anchor: Option<(f64, f64)>,
    preview: Option<CanvasRect>,
}

impl AnnotationEngine {
    pub fn new(min_box_size: f64) -> Self {
        Self {
            min_box_size,
            anchor: None,
            preview: None,
        }
    }

    /// Start a gesture at a canvas point, discarding any previous preview.
    pub fn begin_box(&mut self, x: f64, y: f64) -> Redraw {
        let had_preview = self.preview.take().is_some();
        self.anchor = Some((x, y));
        if had_preview {
            Redraw::Overlay
        } else {
            Redraw::None
        }
    }

    /// Stretch the preview rectangle to the pointer.
    pub fn update_box(&mut self, x: f64, y: f64) -> Redraw {
        match self.anchor {
            Some(anchor) => {
                self.preview = Some(CanvasRect::from_corners(anchor, (x, y)));
                Redraw::Overlay
            }
            None => Redraw::None,
        }
    }

    /// Rectangle of the gesture in progress, in canvas space.
    pub fn preview(&self) -> Option<CanvasRect> {
        self.preview
    }

    /// Drop the gesture in progress without creating a box.
    pub fn cancel(&mut self) {
        self.anchor = None;
        self.preview = None;
    }

    /// Finish the gesture and append a box when it is large enough.
    ///
    /// Gestures under the minimum extent on either axis, or lying entirely
    /// in the letterbox padding, are dropped silently. If the label file
    /// cannot be written the box is kept and the error returned, so a later
    /// save can retry.
    pub fn commit_box(
        &mut self,
        ctx: &mut ImageContext,
        layout: &Letterbox,
        class_id: usize,
        x: f64,
        y: f64,
    ) -> Result<Redraw> {
        let Some(anchor) = self.anchor.take() else {
            return Ok(Redraw::None);
        };
        self.preview = None;

        if (x - anchor.0).abs() < self.min_box_size || (y - anchor.1).abs() < self.min_box_size {
            return Ok(Redraw::Overlay);
        }
        let Some((cx, cy, w, h)) = layout.rect_to_normalized(anchor, (x, y)) else {
            return Ok(Redraw::Overlay);
        };

        ctx.annotations.push(BoundingBox::new(class_id, cx, cy, w, h));
        log::info!(
            "Added box class {} at ({:.3}, {:.3}) size {:.3}x{:.3}, total: {}",
            class_id,
            cx,
            cy,
            w,
            h,
            ctx.annotations.len()
        );
        save(ctx)?;
        Ok(Redraw::Overlay)
    }

    /// Remove the box whose center is closest to the pointer.
    pub fn delete_nearest(&mut self, ctx: &mut ImageContext, layout: &Letterbox, x: f64, y: f64) -> Result<Redraw> {
        let (px, py) = layout.canvas_to_image(x, y);
        let (img_w, img_h) = (layout.image_width as f64, layout.image_height as f64);

        let mut nearest: Option<(usize, f64)> = None;
        for (i, b) in ctx.annotations.iter().enumerate() {
            let dx = b.center_x * img_w - px;
            let dy = b.center_y * img_h - py;
            let dist = dx * dx + dy * dy;
            if nearest.map_or(true, |(_, best)| dist < best) {
                nearest = Some((i, dist));
            }
        }

        let Some((index, _)) = nearest else {
            return Ok(Redraw::None);
        };
        self.delete_by_index(ctx, index)
    }

    /// Remove the box at list position `index`.
    ///
    /// The box stays in memory when the label file cannot be written.
    pub fn delete_by_index(&mut self, ctx: &mut ImageContext, index: usize) -> Result<Redraw> {
        let mut remaining = ctx.annotations.clone();
        let removed = remaining.remove(index)?;
        labels::serialize(&remaining, &ctx.label_path())?;
        ctx.annotations = remaining;
        log::info!(
            "Deleted box {} (class {}), total: {}",
            index,
            removed.class_id,
            ctx.annotations.len()
        );
        Ok(Redraw::Overlay)
    }
}

/// Persist the context's boxes to its label file.
pub fn save(ctx: &ImageContext) -> Result<()> {
    labels::serialize(&ctx.annotations, &ctx.label_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LabelerError;
    use crate::models::annotation::AnnotationSet;
    use image::RgbImage;

    fn context(dir: &tempfile::TempDir, w: u32, h: u32) -> ImageContext {
        ImageContext::new(dir.path().join("img.png"), RgbImage::new(w, h), AnnotationSet::new())
    }

    #[test]
    fn test_commit_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir, 400, 300);
        let layout = Letterbox::fit((800, 600), ctx.displayed_size()).unwrap();
        let mut engine = AnnotationEngine::new(5.0);

        engine.begin_box(200.0, 150.0);
        assert_eq!(engine.update_box(600.0, 450.0), Redraw::Overlay);
        assert!(ctx.annotations.is_empty());

        engine.commit_box(&mut ctx, &layout, 1, 600.0, 450.0).unwrap();
        assert_eq!(ctx.annotations.len(), 1);
        assert_eq!(*ctx.annotations.get(0).unwrap(), BoundingBox::new(1, 0.5, 0.5, 0.5, 0.5));
        assert!(engine.preview().is_none());

        let saved = std::fs::read_to_string(dir.path().join("img.txt")).unwrap();
        assert_eq!(saved, "1 0.500000 0.500000 0.500000 0.500000\n");
    }

    #[test]
    fn test_small_gestures_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir, 400, 300);
        let layout = Letterbox::fit((800, 600), ctx.displayed_size()).unwrap();
        let mut engine = AnnotationEngine::new(5.0);

        for (dx, dy) in [(4.9, 100.0), (100.0, 4.0), (-3.0, -300.0), (0.0, 0.0)] {
            engine.begin_box(300.0, 300.0);
            engine.commit_box(&mut ctx, &layout, 0, 300.0 + dx, 300.0 + dy).unwrap();
        }

        assert!(ctx.annotations.is_empty());
        assert!(!dir.path().join("img.txt").exists());
    }

    #[test]
    fn test_commit_without_anchor_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir, 400, 300);
        let layout = Letterbox::fit((800, 600), ctx.displayed_size()).unwrap();
        let mut engine = AnnotationEngine::new(5.0);

        assert_eq!(engine.update_box(10.0, 10.0), Redraw::None);
        assert_eq!(engine.commit_box(&mut ctx, &layout, 0, 500.0, 500.0).unwrap(), Redraw::None);
        assert!(ctx.annotations.is_empty());
    }

    #[test]
    fn test_new_gesture_discards_preview() {
        let mut engine = AnnotationEngine::new(5.0);
        engine.begin_box(0.0, 0.0);
        engine.update_box(50.0, 50.0);
        assert_eq!(engine.begin_box(100.0, 100.0), Redraw::Overlay);
        assert!(engine.preview().is_none());
    }

    #[test]
    fn test_delete_nearest_picks_closest_center() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir, 400, 400);
        let layout = Letterbox::fit((400, 400), ctx.displayed_size()).unwrap();
        ctx.annotations.push(BoundingBox::new(0, 0.25, 0.25, 0.1, 0.1));
        ctx.annotations.push(BoundingBox::new(1, 0.75, 0.75, 0.1, 0.1));
        let mut engine = AnnotationEngine::new(5.0);

        engine.delete_nearest(&mut ctx, &layout, 110.0, 90.0).unwrap();

        assert_eq!(ctx.annotations.len(), 1);
        assert_eq!(ctx.annotations.get(0).unwrap().class_id, 1);
        assert!(dir.path().join("img.txt").exists());
    }

    #[test]
    fn test_delete_nearest_tie_prefers_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir, 400, 400);
        let layout = Letterbox::fit((400, 400), ctx.displayed_size()).unwrap();
        ctx.annotations.push(BoundingBox::new(0, 0.25, 0.5, 0.1, 0.1));
        ctx.annotations.push(BoundingBox::new(1, 0.75, 0.5, 0.1, 0.1));
        let mut engine = AnnotationEngine::new(5.0);

        engine.delete_nearest(&mut ctx, &layout, 200.0, 200.0).unwrap();
        assert_eq!(ctx.annotations.get(0).unwrap().class_id, 1);
    }

    #[test]
    fn test_delete_nearest_accounts_for_offset() {
        let dir = tempfile::tempdir().unwrap();
        // 300x400 image in an 800x600 canvas: offset_x = 175, resized 450x600
        let mut ctx = context(&dir, 300, 400);
        let layout = Letterbox::fit((800, 600), ctx.displayed_size()).unwrap();
        ctx.annotations.push(BoundingBox::new(0, 0.1, 0.5, 0.1, 0.1));
        ctx.annotations.push(BoundingBox::new(1, 0.9, 0.5, 0.1, 0.1));
        let mut engine = AnnotationEngine::new(5.0);

        // Right box center sits at canvas x = 175 + 405 = 580
        engine.delete_nearest(&mut ctx, &layout, 580.0, 300.0).unwrap();
        assert_eq!(ctx.annotations.get(0).unwrap().class_id, 0);
    }

    #[test]
    fn test_delete_on_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir, 400, 400);
        let layout = Letterbox::fit((400, 400), ctx.displayed_size()).unwrap();
        let mut engine = AnnotationEngine::new(5.0);

        assert_eq!(engine.delete_nearest(&mut ctx, &layout, 1.0, 1.0).unwrap(), Redraw::None);
    }

    #[test]
    fn test_delete_last_box_removes_label_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir, 400, 400);
        ctx.annotations.push(BoundingBox::new(0, 0.5, 0.5, 0.1, 0.1));
        save(&ctx).unwrap();
        assert!(dir.path().join("img.txt").exists());

        let mut engine = AnnotationEngine::new(5.0);
        engine.delete_by_index(&mut ctx, 0).unwrap();

        assert!(ctx.annotations.is_empty());
        assert!(!dir.path().join("img.txt").exists());
        assert!(engine.delete_by_index(&mut ctx, 0).is_err());
    }

    #[test]
    fn test_label_write_failure_keeps_boxes() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = ImageContext::new(
            dir.path().join("missing").join("img.png"),
            RgbImage::new(400, 300),
            AnnotationSet::new(),
        );
        let layout = Letterbox::fit((800, 600), ctx.displayed_size()).unwrap();
        let mut engine = AnnotationEngine::new(5.0);

        engine.begin_box(200.0, 150.0);
        let err = engine.commit_box(&mut ctx, &layout, 2, 600.0, 450.0).unwrap_err();
        assert!(matches!(err, LabelerError::Io { .. }));
        assert_eq!(*ctx.annotations.get(0).unwrap(), BoundingBox::new(2, 0.5, 0.5, 0.5, 0.5));

        ctx.annotations.push(BoundingBox::new(0, 0.25, 0.25, 0.1, 0.1));
        let err = engine.delete_by_index(&mut ctx, 0).unwrap_err();
        assert!(matches!(err, LabelerError::Io { .. }));
        assert_eq!(ctx.annotations.len(), 2);
        assert_eq!(ctx.annotations.get(0).unwrap().class_id, 2);

        // Retry succeeds once the directory exists
        std::fs::create_dir(dir.path().join("missing")).unwrap();
        engine.delete_by_index(&mut ctx, 0).unwrap();
        assert_eq!(ctx.annotations.len(), 1);
        assert!(dir.path().join("missing").join("img.txt").exists());
    }
}
