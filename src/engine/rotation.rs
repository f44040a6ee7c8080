// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image rotation before labeling.
//!
//! Displayed pixels are always regenerated from the context's original
//! pixels, never from a previously rotated buffer. Committing writes the
//! displayed pixels over the source file; boxes are not transformed.

use super::Redraw;
use crate::error::Result;
use crate::io::media;
use crate::models::image_context::{ImageContext, RotationState};
use image::{imageops, Rgb, RgbImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};

/// Fill for canvas area uncovered by a free-angle rotation.
pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragOrigin {
    x: f64,
    start_angle: f64,
}

/// Rotation drag state for the rotation mode.
#[derive(Debug, Clone)]
pub struct RotationEngine {
    sensitivity: f64,
    drag: Option<DragOrigin>,
}

impl RotationEngine {
    pub fn new(sensitivity: f64) -> Self {
        Self {
            sensitivity,
            drag: None,
        }
    }

    /// Turn the image by 90° and mark it dirty.
    pub fn rotate_discrete(&mut self, ctx: &mut ImageContext, direction: Direction) -> Redraw {
        let angle = &mut ctx.rotation.discrete_angle;
        *angle = match direction {
            Direction::Left => (*angle + 270) % 360,
            Direction::Right => (*angle + 90) % 360,
        };
        ctx.rotation.drag_angle = ctx.rotation.discrete_angle as f64;
        ctx.rotation.dirty = true;
        ctx.displayed = rotate_quarter_turns(&ctx.original, ctx.rotation.discrete_angle);
        log::debug!("Rotated {:?} to {}°", direction, ctx.rotation.discrete_angle);
        Redraw::Image
    }

    /// Remember where a rotation drag started.
    pub fn begin_drag(&mut self, ctx: &ImageContext, x: f64) {
        self.drag = Some(DragOrigin {
            x,
            start_angle: ctx.rotation.drag_angle,
        });
    }

    /// Rotate by the horizontal distance dragged since `begin_drag`.
    pub fn update_drag(&mut self, ctx: &mut ImageContext, x: f64) -> Redraw {
        let Some(origin) = self.drag else {
            return Redraw::None;
        };
        let delta = (x - origin.x) * self.sensitivity;
        ctx.rotation.drag_angle = normalize_angle(origin.start_angle + delta);
        ctx.displayed = rotate_free(&ctx.original, ctx.rotation.drag_angle);
        Redraw::Image
    }

    /// Snap the discrete angle to the dragged angle and mark dirty.
    pub fn end_drag(&mut self, ctx: &mut ImageContext) -> Redraw {
        if self.drag.take().is_none() {
            return Redraw::None;
        }
        ctx.rotation.drag_angle = normalize_angle(ctx.rotation.drag_angle);
        ctx.rotation.discrete_angle = (ctx.rotation.drag_angle.round() as u32) % 360;
        ctx.rotation.dirty = true;
        log::debug!("Drag rotation ended at {:.1}°", ctx.rotation.drag_angle);
        Redraw::None
    }

    /// Forget any drag in progress.
    pub fn cancel(&mut self) {
        self.drag = None;
    }

    /// Write the rotated pixels over the image file.
    ///
    /// Returns `Ok(false)` when there was nothing to write. On failure the
    /// context is left untouched so the user can retry.
    pub fn commit(&mut self, ctx: &mut ImageContext) -> Result<bool> {
        if !ctx.rotation.dirty {
            return Ok(false);
        }
        media::save_image(&ctx.displayed, &ctx.path)?;
        ctx.original = ctx.displayed.clone();
        ctx.rotation = RotationState::default();
        self.drag = None;
        log::info!("Saved rotated image {}", ctx.path.display());
        Ok(true)
    }

    pub fn has_unsaved_changes(ctx: &ImageContext) -> bool {
        ctx.rotation.dirty
    }
}

fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Clockwise rotation by a whole number of degrees.
///
/// Multiples of 90° are exact and swap dimensions for 90/270. Any other
/// angle (left over from a drag) falls back to the resampled rotation.
pub fn rotate_quarter_turns(src: &RgbImage, angle: u32) -> RgbImage {
    match angle % 360 {
        0 => src.clone(),
        90 => imageops::rotate90(src),
        180 => imageops::rotate180(src),
        270 => imageops::rotate270(src),
        other => rotate_free(src, other as f64),
    }
}

/// Clockwise bilinear rotation about the image center.
///
/// The output grows to the rotated bounding box of the source so no corner
/// is clipped; uncovered pixels are `BACKGROUND`.
pub fn rotate_free(src: &RgbImage, angle_deg: f64) -> RgbImage {
    let (w, h) = src.dimensions();
    let theta = angle_deg.to_radians();
    let (abs_sin, abs_cos) = (theta.sin().abs(), theta.cos().abs());

    let new_w = ((h as f64 * abs_sin + w as f64 * abs_cos) as u32).max(1);
    let new_h = ((h as f64 * abs_cos + w as f64 * abs_sin) as u32).max(1);

    let projection = Projection::translate(new_w as f32 / 2.0, new_h as f32 / 2.0)
        * Projection::rotate(theta as f32)
        * Projection::translate(-(w as f32) / 2.0, -(h as f32) / 2.0);

    let mut out = RgbImage::from_pixel(new_w, new_h, BACKGROUND);
    warp_into(src, &projection, Interpolation::Bilinear, BACKGROUND, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::AnnotationSet;

    fn gradient(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]))
    }

    fn context(path: std::path::PathBuf, w: u32, h: u32) -> ImageContext {
        ImageContext::new(path, gradient(w, h), AnnotationSet::new())
    }

    #[test]
    fn test_rotate_right_scenario() {
        let mut ctx = context("unused.png".into(), 400, 300);
        let mut engine = RotationEngine::new(0.5);

        assert_eq!(engine.rotate_discrete(&mut ctx, Direction::Right), Redraw::Image);
        assert_eq!(ctx.rotation.discrete_angle, 90);
        assert_eq!(ctx.rotation.drag_angle, 90.0);
        assert!(ctx.rotation.dirty);
        assert_eq!(ctx.displayed_size(), (300, 400));
        // Clockwise: the top-left source pixel ends up top-right
        assert_eq!(ctx.displayed.get_pixel(299, 0), ctx.original.get_pixel(0, 0));
    }

    #[test]
    fn test_four_turns_restore() {
        let mut ctx = context("unused.png".into(), 400, 300);
        let mut engine = RotationEngine::new(0.5);

        for _ in 0..4 {
            engine.rotate_discrete(&mut ctx, Direction::Left);
        }
        assert_eq!(ctx.rotation.discrete_angle, 0);
        assert_eq!(ctx.displayed_size(), (400, 300));
        assert_eq!(ctx.displayed, ctx.original);
    }

    #[test]
    fn test_left_wraps() {
        let mut ctx = context("unused.png".into(), 10, 20);
        let mut engine = RotationEngine::new(0.5);
        engine.rotate_discrete(&mut ctx, Direction::Left);
        assert_eq!(ctx.rotation.discrete_angle, 270);
        assert_eq!(ctx.displayed_size(), (20, 10));
    }

    #[test]
    fn test_drag_angle_from_pointer_delta() {
        let mut ctx = context("unused.png".into(), 40, 30);
        let mut engine = RotationEngine::new(0.5);

        engine.begin_drag(&ctx, 100.0);
        engine.update_drag(&mut ctx, 160.0);
        assert_eq!(ctx.rotation.drag_angle, 30.0);

        // Dragging left past zero wraps into [0, 360)
        engine.update_drag(&mut ctx, 40.0);
        assert_eq!(ctx.rotation.drag_angle, 330.0);
        assert!(!ctx.rotation.dirty);

        engine.end_drag(&mut ctx);
        assert_eq!(ctx.rotation.discrete_angle, 330);
        assert!(ctx.rotation.dirty);
        // Drag state cleared: further motion does nothing
        assert_eq!(engine.update_drag(&mut ctx, 500.0), Redraw::None);
    }

    #[test]
    fn test_drag_never_compounds() {
        let mut engine = RotationEngine::new(0.5);

        let mut twice = context("unused.png".into(), 64, 48);
        engine.begin_drag(&twice, 0.0);
        engine.update_drag(&mut twice, 60.0);
        engine.update_drag(&mut twice, 20.0);

        let mut once = context("unused.png".into(), 64, 48);
        engine.begin_drag(&once, 0.0);
        engine.update_drag(&mut once, 20.0);

        assert_eq!(twice.rotation.drag_angle, 10.0);
        assert_eq!(twice.displayed, once.displayed);
    }

    #[test]
    fn test_drag_continues_from_previous_angle() {
        let mut ctx = context("unused.png".into(), 40, 30);
        let mut engine = RotationEngine::new(0.5);
        engine.rotate_discrete(&mut ctx, Direction::Right);

        engine.begin_drag(&ctx, 0.0);
        engine.update_drag(&mut ctx, 10.0);
        assert_eq!(ctx.rotation.drag_angle, 95.0);
    }

    #[test]
    fn test_update_without_begin_is_noop() {
        let mut ctx = context("unused.png".into(), 40, 30);
        let mut engine = RotationEngine::new(0.5);
        assert_eq!(engine.update_drag(&mut ctx, 50.0), Redraw::None);
        assert_eq!(engine.end_drag(&mut ctx), Redraw::None);
        assert!(!ctx.rotation.dirty);
    }

    #[test]
    fn test_quarter_turn_after_drag_resamples() {
        let mut ctx = context("unused.png".into(), 40, 30);
        let mut engine = RotationEngine::new(0.5);
        engine.begin_drag(&ctx, 0.0);
        engine.update_drag(&mut ctx, 60.0);
        engine.end_drag(&mut ctx);
        assert_eq!(ctx.rotation.discrete_angle, 30);

        engine.rotate_discrete(&mut ctx, Direction::Right);

        assert_eq!(ctx.rotation.discrete_angle, 120);
        assert_eq!(ctx.rotation.drag_angle, 120.0);
        assert_eq!(ctx.displayed, rotate_free(&ctx.original, 120.0));
        assert_ne!(ctx.displayed_size(), (30, 40));
        assert_ne!(ctx.displayed_size(), (40, 30));
    }

    #[test]
    fn test_free_rotation_expands_canvas() {
        let src = gradient(400, 300);
        let rotated = rotate_free(&src, 30.0);
        let (s, c) = (0.5_f64, 3f64.sqrt() / 2.0);
        assert_eq!(rotated.width(), (300.0 * s + 400.0 * c) as u32);
        assert_eq!(rotated.height(), (300.0 * c + 400.0 * s) as u32);
        // Corners of the expanded canvas are uncovered background
        assert_eq!(*rotated.get_pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn test_free_rotation_zero_keeps_size() {
        let src = gradient(40, 30);
        assert_eq!(rotate_free(&src, 0.0).dimensions(), (40, 30));
    }

    #[test]
    fn test_commit_writes_and_resets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        let mut ctx = context(path.clone(), 40, 30);
        media::save_image(&ctx.original, &path).unwrap();
        let mut engine = RotationEngine::new(0.5);

        assert!(!engine.commit(&mut ctx).unwrap());

        engine.rotate_discrete(&mut ctx, Direction::Right);
        assert!(RotationEngine::has_unsaved_changes(&ctx));
        assert!(engine.commit(&mut ctx).unwrap());

        assert_eq!(ctx.rotation, RotationState::default());
        assert_eq!(ctx.original.dimensions(), (30, 40));
        assert_eq!(media::load_image(&path).unwrap(), ctx.displayed);
    }

    #[test]
    fn test_commit_failure_keeps_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("photo.png");
        let mut ctx = context(path, 40, 30);
        let mut engine = RotationEngine::new(0.5);

        engine.rotate_discrete(&mut ctx, Direction::Right);
        assert!(engine.commit(&mut ctx).is_err());
        assert!(ctx.rotation.dirty);
        assert_eq!(ctx.rotation.discrete_angle, 90);
        assert_eq!(ctx.original.dimensions(), (40, 30));
    }
}
