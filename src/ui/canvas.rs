// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and box annotation.
//!
//! This module paints the letterboxed image and the scene overlay, and
//! turns pointer input into canvas-space actions for the session. It does
//! no annotation math of its own.

use crate::engine::scene::{GuideLine, Scene};
use crate::models::image_context::Mode;
use crate::util::geometry::{CanvasRect, Letterbox};

/// Result of canvas interaction, in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasAction {
    PointerDown(f64, f64),
    PointerDrag(f64, f64),
    PointerUp(f64, f64),
    /// Secondary or middle click.
    Delete(f64, f64),
}

pub struct CanvasOutput {
    /// Size of the canvas area this frame.
    pub size: (u32, u32),
    pub actions: Vec<CanvasAction>,
}

/// Display the main canvas area and handle mouse interactions.
pub fn show(
    ui: &mut egui::Ui,
    mode: Mode,
    image_texture: Option<(&egui::TextureHandle, Letterbox)>,
    scene: &Scene,
) -> CanvasOutput {
    let available_size = ui.available_size();
    let (rect, response) = ui.allocate_exact_size(available_size, egui::Sense::click_and_drag());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, egui::Color32::WHITE);

    let to_screen = |x: f64, y: f64| rect.min + egui::vec2(x as f32, y as f32);
    let to_canvas = |pos: egui::Pos2| {
        let rel = pos - rect.min;
        (rel.x as f64, rel.y as f64)
    };

    let mut actions = Vec::new();

    if let Some((texture, layout)) = image_texture {
        // The texture is pre-scaled, so it is drawn 1:1 at the letterbox offset
        let image_rect = egui::Rect::from_min_size(
            to_screen(layout.offset_x as f64, layout.offset_y as f64),
            egui::vec2(layout.image_width as f32, layout.image_height as f32),
        );
        painter.image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        for scene_box in &scene.boxes {
            let [r, g, b] = scene_box.color;
            let color = egui::Color32::from_rgb(r, g, b);
            let screen_rect = screen_rect(&scene_box.rect, &to_screen);
            painter.rect_stroke(screen_rect, 0.0, egui::Stroke::new(2.0, color));
            painter.text(
                screen_rect.left_top() - egui::vec2(0.0, 10.0),
                egui::Align2::LEFT_CENTER,
                &scene_box.label,
                egui::FontId::proportional(13.0),
                color,
            );
        }

        if let Some(preview) = &scene.preview {
            let r = screen_rect(preview, &to_screen);
            let outline = [r.left_top(), r.right_top(), r.right_bottom(), r.left_bottom(), r.left_top()];
            painter.extend(egui::Shape::dashed_line(
                &outline,
                egui::Stroke::new(2.0, egui::Color32::RED),
                5.0,
                5.0,
            ));
        }

        for GuideLine { from, to } in &scene.guides {
            painter.extend(egui::Shape::dashed_line(
                &[to_screen(from.0, from.1), to_screen(to.0, to.1)],
                egui::Stroke::new(1.0, egui::Color32::BLUE),
                4.0,
                4.0,
            ));
        }

        if response.drag_started_by(egui::PointerButton::Primary) {
            if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
                let (x, y) = to_canvas(origin);
                actions.push(CanvasAction::PointerDown(x, y));
            }
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = to_canvas(pos);
                actions.push(CanvasAction::PointerDrag(x, y));
            }
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos().or_else(|| ui.input(|i| i.pointer.latest_pos())) {
                let (x, y) = to_canvas(pos);
                actions.push(CanvasAction::PointerUp(x, y));
            }
        }
        if response.secondary_clicked() || response.middle_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = to_canvas(pos);
                actions.push(CanvasAction::Delete(x, y));
            }
        }

        let cursor = match mode {
            Mode::Labeling => egui::CursorIcon::Crosshair,
            Mode::Rotation => egui::CursorIcon::Default,
        };
        response.on_hover_cursor(cursor);
    } else {
        // Show welcome message when no file is loaded
        painter.text(
            rect.center() - egui::vec2(0.0, 20.0),
            egui::Align2::CENTER_CENTER,
            "YOLO Labeler",
            egui::FontId::proportional(32.0),
            egui::Color32::from_gray(90),
        );
        painter.text(
            rect.center() + egui::vec2(0.0, 20.0),
            egui::Align2::CENTER_CENTER,
            "Open an image folder or file to begin labeling",
            egui::FontId::proportional(14.0),
            egui::Color32::from_gray(130),
        );
    }

    CanvasOutput {
        size: (rect.width().max(0.0) as u32, rect.height().max(0.0) as u32),
        actions,
    }
}

fn screen_rect(rect: &CanvasRect, to_screen: &impl Fn(f64, f64) -> egui::Pos2) -> egui::Rect {
    egui::Rect::from_min_max(to_screen(rect.x1, rect.y1), to_screen(rect.x2, rect.y2))
}
