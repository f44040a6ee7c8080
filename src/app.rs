// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module is the presentation layer: it lays out the window, forwards
//! pointer, keyboard and button input to the labeling [`Session`], and
//! turns the session's redraw requests into texture uploads. Canvas
//! resizes are debounced before the image is rescaled.

use crate::config::Settings;
use crate::engine::{
    rotation::Direction,
    session::{Navigation, Outcome, PendingAction, Saved, Session},
    Redraw,
};
use crate::error::LabelerError;
use crate::io::media::IMAGE_EXTENSIONS;
use crate::models::{classes::ClassTable, image_context::Mode};
use crate::ui::{canvas, class_editor::ClassEditor, confirm, properties, thumbnails::ThumbnailStrip, toolbar};
use crate::util::{debounce::Debouncer, geometry::Letterbox};
use std::time::{Duration, Instant};

/// Message shown in the status bar.
struct Status {
    text: String,
    is_error: bool,
}

/// Main application state.
pub struct LabelerApp {
    session: Session,

    /// Pre-scaled display texture and the layout it was scaled for
    image_texture: Option<(egui::TextureHandle, Letterbox)>,

    /// Displayed pixels or layout changed since the last upload
    texture_stale: bool,

    /// Canvas size seen on the previous frame
    last_canvas_size: (u32, u32),

    /// Pending canvas re-layout
    resize_debounce: Debouncer<(u32, u32)>,

    /// Action waiting for the unsaved-rotation prompt
    pending: Option<PendingAction>,

    /// Set once the session agreed to exit
    allow_close: bool,

    class_editor: ClassEditor,
    thumbnails: ThumbnailStrip,
    thumbnail_size: u32,
    status: Option<Status>,
}

impl LabelerApp {
    /// Create a new application instance.
    pub fn new(settings: Settings, classes: ClassTable) -> Self {
        Self {
            session: Session::new(&settings, classes),
            image_texture: None,
            texture_stale: false,
            last_canvas_size: (0, 0),
            resize_debounce: Debouncer::new(Duration::from_millis(settings.resize_debounce_ms)),
            pending: None,
            allow_close: false,
            class_editor: ClassEditor::default(),
            thumbnails: ThumbnailStrip::default(),
            thumbnail_size: settings.thumbnail_size,
            status: None,
        }
    }

    fn info(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            is_error: false,
        });
    }

    fn report(&mut self, err: LabelerError) {
        log::error!("{}", err);
        self.status = Some(Status {
            text: err.to_string(),
            is_error: true,
        });
    }

    fn apply(&mut self, redraw: Redraw) {
        if redraw == Redraw::Image {
            self.texture_stale = true;
        }
    }

    fn apply_result(&mut self, result: Result<Redraw, LabelerError>) {
        match result {
            Ok(redraw) => self.apply(redraw),
            Err(e) => self.report(e),
        }
    }

    /// Run an image-replacing action through the session.
    fn request(&mut self, action: PendingAction, ctx: &egui::Context) {
        let outcome = self.session.request(action);
        self.handle_outcome(outcome, ctx);
    }

    fn handle_outcome(&mut self, outcome: Result<Outcome, LabelerError>, ctx: &egui::Context) {
        match outcome {
            Ok(Outcome::Done(redraw)) => {
                self.apply(redraw);
                if redraw == Redraw::Image {
                    self.status = None;
                }
            }
            Ok(Outcome::Confirm(action)) => self.pending = Some(action),
            Ok(Outcome::Exit) => {
                self.allow_close = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            Err(e) => self.report(e),
        }
        self.thumbnails.sync(self.session.images(), self.thumbnail_size);
        self.refresh_thumbnails();
    }

    /// Reload thumbnails of images overwritten by a rotation commit.
    fn refresh_thumbnails(&mut self) {
        for path in self.session.take_rewritten() {
            self.thumbnails.invalidate(&path, self.thumbnail_size);
        }
    }

    fn save(&mut self) {
        match self.session.save() {
            Ok(Saved::Rotation) => {
                self.texture_stale = true;
                self.info("Rotated image saved");
            }
            Ok(Saved::Labels) => self.info("Labels saved"),
            Ok(Saved::NothingToSave) => self.info("No rotation to save"),
            Ok(Saved::NoImage) => self.info("No image to save"),
            Err(e) => self.report(e),
        }
        self.refresh_thumbnails();
    }

    fn handle_toolbar(&mut self, action: toolbar::ToolbarAction, ctx: &egui::Context) {
        use toolbar::ToolbarAction;

        match action {
            ToolbarAction::OpenFolder => {
                if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                    self.request(PendingAction::OpenFolder(dir), ctx);
                }
            }
            ToolbarAction::OpenFile => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Images", &IMAGE_EXTENSIONS)
                    .pick_file()
                {
                    self.request(PendingAction::OpenFile(path), ctx);
                }
            }
            ToolbarAction::EditClasses => self.class_editor.open(self.session.classes()),
            ToolbarAction::SetMode(mode) => {
                let redraw = self.session.set_mode(mode);
                self.apply(redraw);
            }
            ToolbarAction::RotateLeft => {
                let redraw = self.session.rotate(Direction::Left);
                self.apply(redraw);
            }
            ToolbarAction::RotateRight => {
                let redraw = self.session.rotate(Direction::Right);
                self.apply(redraw);
            }
            ToolbarAction::Save => self.save(),
            ToolbarAction::SetAutoSave(enabled) => self.session.set_auto_save(enabled),
            ToolbarAction::Prev => self.request(PendingAction::Navigate(Navigation::Prev), ctx),
            ToolbarAction::Next => self.request(PendingAction::Navigate(Navigation::Next), ctx),
            ToolbarAction::None => {}
        }
    }

    fn handle_canvas(&mut self, actions: Vec<canvas::CanvasAction>) {
        use canvas::CanvasAction;

        for action in actions {
            match action {
                CanvasAction::PointerDown(x, y) => {
                    let redraw = self.session.pointer_down(x, y);
                    self.apply(redraw);
                }
                CanvasAction::PointerDrag(x, y) => {
                    let redraw = self.session.pointer_drag(x, y);
                    self.apply(redraw);
                }
                CanvasAction::PointerUp(x, y) => {
                    let result = self.session.pointer_up(x, y);
                    self.apply_result(result);
                }
                CanvasAction::Delete(x, y) => {
                    let result = self.session.pointer_delete(x, y);
                    self.apply_result(result);
                }
            }
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        // Only process if no text field is focused (class editor)
        if ctx.wants_keyboard_input() || self.pending.is_some() {
            return;
        }
        let (left, right, labeling, rotation) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
                i.key_pressed(egui::Key::W),
                i.key_pressed(egui::Key::R),
            )
        });

        if left {
            self.request(PendingAction::Navigate(Navigation::Prev), ctx);
        } else if right {
            self.request(PendingAction::Navigate(Navigation::Next), ctx);
        }
        if labeling {
            let redraw = self.session.set_mode(Mode::Labeling);
            self.apply(redraw);
        } else if rotation {
            let redraw = self.session.set_mode(Mode::Rotation);
            self.apply(redraw);
        }
    }

    /// Debounce canvas size changes into a single re-layout.
    fn track_canvas_size(&mut self, size: (u32, u32), ctx: &egui::Context) {
        let now = Instant::now();
        if size != self.last_canvas_size {
            self.last_canvas_size = size;
            self.resize_debounce.arm(now, size);
        }
        if let Some((w, h)) = self.resize_debounce.poll(now) {
            log::debug!("Canvas re-layout at {}x{}", w, h);
            let redraw = self.session.set_canvas_size(w, h);
            self.apply(redraw);
        }
        if let Some(remaining) = self.resize_debounce.remaining(now) {
            ctx.request_repaint_after(remaining);
        }
    }

    /// Rescale the displayed pixels and upload them.
    fn refresh_texture(&mut self, ctx: &egui::Context) {
        self.texture_stale = false;
        let (Some(pixels), Some(layout)) = (self.session.display_pixels(), self.session.layout()) else {
            self.image_texture = None;
            return;
        };

        let size = [pixels.width() as usize, pixels.height() as usize];
        let color_image = egui::ColorImage::from_rgb(size, pixels.as_raw());
        match &mut self.image_texture {
            Some((texture, current_layout)) => {
                texture.set(color_image, egui::TextureOptions::LINEAR);
                *current_layout = layout;
            }
            None => {
                let texture = ctx.load_texture("displayed_image", color_image, egui::TextureOptions::LINEAR);
                self.image_texture = Some((texture, layout));
            }
        }
        ctx.request_repaint();
    }
}

impl eframe::App for LabelerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Closing with an unsaved rotation goes through the prompt
        if ctx.input(|i| i.viewport().close_requested()) && !self.allow_close {
            match self.session.request(PendingAction::Exit) {
                Ok(Outcome::Exit) => self.allow_close = true,
                Ok(Outcome::Confirm(action)) => {
                    ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
                    self.pending = Some(action);
                }
                Ok(Outcome::Done(_)) => {}
                Err(e) => {
                    ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
                    self.report(e);
                }
            }
        }

        self.thumbnails.poll(ctx);
        self.handle_keyboard(ctx);

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                let info = self.session.image_info();
                toolbar::show(ui, self.session.mode(), self.session.auto_save(), info.as_deref())
            })
            .inner;
        self.handle_toolbar(toolbar_action, ctx);

        // Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| match &self.status {
            Some(status) if status.is_error => {
                ui.colored_label(egui::Color32::RED, &status.text);
            }
            Some(status) => {
                ui.label(&status.text);
            }
            None => {
                ui.label(format!("Mode: {:?}", self.session.mode()));
            }
        });

        // Thumbnails (left side)
        if !self.session.images().is_empty() {
            let clicked = egui::SidePanel::left("thumbnails")
                .exact_width(self.thumbnail_size as f32 + 24.0)
                .show(ctx, |ui| self.thumbnails.show(ui, self.session.index(), self.thumbnail_size))
                .inner;
            if let Some(index) = clicked {
                self.request(PendingAction::Navigate(Navigation::Jump(index)), ctx);
            }
        }

        // Classes and labels (right side)
        let properties_action = egui::SidePanel::right("properties")
            .default_width(260.0)
            .show(ctx, |ui| {
                let entries = self.session.label_entries();
                properties::show(
                    ui,
                    self.session.mode(),
                    self.session.classes(),
                    self.session.current_class(),
                    &entries,
                )
            })
            .inner;
        match properties_action {
            properties::PropertiesAction::SelectClass(id) => self.session.set_current_class(id),
            properties::PropertiesAction::DeleteBox(index) => {
                let result = self.session.delete_box(index);
                self.apply_result(result);
            }
            properties::PropertiesAction::None => {}
        }

        if let Some(text) = self.class_editor.show(ctx) {
            let result = self.session.replace_classes(&text);
            self.apply_result(result);
        }

        if let Some(action) = self.pending.clone() {
            if let Some(decision) = confirm::show(ctx) {
                self.pending = None;
                let outcome = self.session.resolve(action, decision);
                self.handle_outcome(outcome, ctx);
            }
        }

        if self.texture_stale {
            self.refresh_texture(ctx);
        }

        // Main canvas (center)
        let scene = self.session.scene();
        let mode = self.session.mode();
        let output = egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let texture = self.image_texture.as_ref().map(|(t, layout)| (t, *layout));
                canvas::show(ui, mode, texture, &scene)
            })
            .inner;

        if self.pending.is_none() {
            self.handle_canvas(output.actions);
        }
        self.track_canvas_size(output.size, ctx);

        if self.texture_stale {
            self.refresh_texture(ctx);
        }
    }
}
