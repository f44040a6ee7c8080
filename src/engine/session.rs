// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Labeling session: the interface the presentation layer drives.
//!
//! The session owns the image list, the single live [`ImageContext`], the
//! interaction mode and the class table. Pointer events are routed to the
//! annotation or rotation engine by mode. Actions that would replace the
//! current image go through [`Session::request`], which auto-saves when
//! enabled and asks for confirmation while a rotation is still unsaved.

use super::annotation::{self, AnnotationEngine};
use super::rotation::{Direction, RotationEngine};
use super::scene::Scene;
use super::Redraw;
use crate::config::Settings;
use crate::error::{LabelerError, Result};
use crate::io::{class_file, labels, media};
use crate::models::{
    classes::ClassTable,
    image_context::{ImageContext, Mode},
};
use crate::util::geometry::Letterbox;
use image::{imageops, RgbImage};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Prev,
    Next,
    Jump(usize),
}

/// An action that discards the current image context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Navigate(Navigation),
    OpenFolder(PathBuf),
    OpenFile(PathBuf),
    Exit,
}

/// User answer to the unsaved-rotation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Save,
    Discard,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done(Redraw),
    /// A rotation is unsaved; ask the user, then call [`Session::resolve`].
    Confirm(PendingAction),
    /// The application may close now.
    Exit,
}

/// Result of an explicit save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saved {
    Rotation,
    Labels,
    NothingToSave,
    NoImage,
}

pub struct Session {
    images: Vec<PathBuf>,
    index: usize,
    current: Option<ImageContext>,
    mode: Mode,
    classes: ClassTable,
    classes_path: PathBuf,
    current_class: usize,
    auto_save: bool,
    canvas: (u32, u32),
    annotation: AnnotationEngine,
    rotation: RotationEngine,
    /// Image files overwritten by rotation commits, not yet picked up.
    rewritten: Vec<PathBuf>,
}

impl Session {
    pub fn new(settings: &Settings, classes: ClassTable) -> Self {
        Self {
            images: Vec::new(),
            index: 0,
            current: None,
            mode: Mode::default(),
            classes,
            classes_path: settings.classes_file.clone(),
            current_class: 0,
            auto_save: settings.auto_save,
            canvas: (settings.canvas_width, settings.canvas_height),
            annotation: AnnotationEngine::new(settings.min_box_size),
            rotation: RotationEngine::new(settings.drag_sensitivity),
            rewritten: Vec::new(),
        }
    }

    // ----- image loading and navigation -----

    /// Load `path` and its labels as the live context.
    ///
    /// On failure the previous context stays in place.
    pub fn open_image(&mut self, path: &Path) -> Result<Redraw> {
        let pixels = media::load_image(path)?;
        let boxes = labels::deserialize(&labels::label_path_for(path))?;
        log::info!(
            "Loaded image: {} ({}x{}) with {} boxes",
            path.display(),
            pixels.width(),
            pixels.height(),
            boxes.len()
        );

        self.annotation.cancel();
        self.rotation.cancel();
        self.current = Some(ImageContext::new(path.to_path_buf(), pixels, boxes));
        Ok(Redraw::Image)
    }

    /// Ask to perform an action that replaces the current image.
    pub fn request(&mut self, action: PendingAction) -> Result<Outcome> {
        if !self.is_actionable(&action) {
            return Ok(Outcome::Done(Redraw::None));
        }
        if self.auto_save {
            self.flush()?;
        }
        if self.has_unsaved_rotation() {
            return Ok(Outcome::Confirm(action));
        }
        self.perform(action)
    }

    /// Finish an action after the user answered the unsaved-rotation prompt.
    pub fn resolve(&mut self, action: PendingAction, decision: Decision) -> Result<Outcome> {
        match decision {
            Decision::Cancel => Ok(Outcome::Done(Redraw::None)),
            Decision::Save => {
                self.commit_rotation()?;
                self.perform(action)
            }
            Decision::Discard => {
                log::info!("Discarding unsaved rotation");
                self.perform(action)
            }
        }
    }

    fn is_actionable(&self, action: &PendingAction) -> bool {
        match action {
            PendingAction::Navigate(nav) => self.target_index(*nav).is_some(),
            PendingAction::OpenFolder(_) | PendingAction::OpenFile(_) | PendingAction::Exit => true,
        }
    }

    fn target_index(&self, nav: Navigation) -> Option<usize> {
        let len = self.images.len();
        match nav {
            Navigation::Prev if self.index > 0 && len > 0 => Some(self.index - 1),
            Navigation::Next if self.index + 1 < len => Some(self.index + 1),
            Navigation::Jump(i) if i < len => Some(i),
            _ => None,
        }
    }

    fn perform(&mut self, action: PendingAction) -> Result<Outcome> {
        match action {
            PendingAction::Navigate(nav) => {
                let Some(target) = self.target_index(nav) else {
                    return Ok(Outcome::Done(Redraw::None));
                };
                let path = self.images[target].clone();
                let redraw = self.open_image(&path)?;
                self.index = target;
                Ok(Outcome::Done(redraw))
            }
            PendingAction::OpenFolder(dir) => {
                let images = media::list_images(&dir)?;
                let Some(first) = images.first() else {
                    return Err(LabelerError::NoImages { dir });
                };
                let redraw = self.open_image(first)?;
                log::info!("Opened folder {} with {} images", dir.display(), images.len());
                self.images = images;
                self.index = 0;
                Ok(Outcome::Done(redraw))
            }
            PendingAction::OpenFile(path) => {
                let redraw = self.open_image(&path)?;
                self.images = vec![path];
                self.index = 0;
                Ok(Outcome::Done(redraw))
            }
            PendingAction::Exit => Ok(Outcome::Exit),
        }
    }

    /// Auto-save step run before leaving an image: rotation first, then labels.
    pub fn flush(&mut self) -> Result<()> {
        self.commit_rotation()?;
        self.flush_labels()
    }

    fn flush_labels(&self) -> Result<()> {
        match self.current.as_ref() {
            Some(ctx) => annotation::save(ctx),
            None => Ok(()),
        }
    }

    // ----- pointer events -----

    pub fn pointer_down(&mut self, x: f64, y: f64) -> Redraw {
        let Some(ctx) = self.current.as_ref() else {
            return Redraw::None;
        };
        match self.mode {
            Mode::Labeling => self.annotation.begin_box(x, y),
            Mode::Rotation => {
                self.rotation.begin_drag(ctx, x);
                Redraw::None
            }
        }
    }

    pub fn pointer_drag(&mut self, x: f64, y: f64) -> Redraw {
        let Some(ctx) = self.current.as_mut() else {
            return Redraw::None;
        };
        match self.mode {
            Mode::Labeling => self.annotation.update_box(x, y),
            Mode::Rotation => self.rotation.update_drag(ctx, x),
        }
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) -> Result<Redraw> {
        let Some(layout) = self.layout() else {
            return Ok(Redraw::None);
        };
        let Some(ctx) = self.current.as_mut() else {
            return Ok(Redraw::None);
        };
        match self.mode {
            Mode::Labeling => self.annotation.commit_box(ctx, &layout, self.current_class, x, y),
            Mode::Rotation => Ok(self.rotation.end_drag(ctx)),
        }
    }

    /// Secondary click: delete the nearest box in labeling mode.
    pub fn pointer_delete(&mut self, x: f64, y: f64) -> Result<Redraw> {
        let Some(layout) = self.layout() else {
            return Ok(Redraw::None);
        };
        match (self.mode, self.current.as_mut()) {
            (Mode::Labeling, Some(ctx)) => self.annotation.delete_nearest(ctx, &layout, x, y),
            (Mode::Rotation, _) | (_, None) => Ok(Redraw::None),
        }
    }

    /// Delete the box at a position of the label list.
    pub fn delete_box(&mut self, index: usize) -> Result<Redraw> {
        match (self.mode, self.current.as_mut()) {
            (Mode::Labeling, Some(ctx)) => self.annotation.delete_by_index(ctx, index),
            (Mode::Rotation, _) | (_, None) => Ok(Redraw::None),
        }
    }

    // ----- mode, rotation and saving -----

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) -> Redraw {
        if self.mode == mode {
            return Redraw::None;
        }
        self.annotation.cancel();
        // A drag in progress keeps its angle and becomes an unsaved rotation
        if let Some(ctx) = self.current.as_mut() {
            self.rotation.end_drag(ctx);
        }
        self.mode = mode;
        log::info!("Switched to {:?} mode", mode);
        Redraw::Overlay
    }

    /// Turn the image by 90°; only available in rotation mode.
    pub fn rotate(&mut self, direction: Direction) -> Redraw {
        match (self.mode, self.current.as_mut()) {
            (Mode::Rotation, Some(ctx)) => self.rotation.rotate_discrete(ctx, direction),
            (Mode::Labeling, _) | (_, None) => Redraw::None,
        }
    }

    pub fn commit_rotation(&mut self) -> Result<bool> {
        let Some(ctx) = self.current.as_mut() else {
            return Ok(false);
        };
        let written = self.rotation.commit(ctx)?;
        if written {
            self.rewritten.push(ctx.path.clone());
        }
        Ok(written)
    }

    /// Drain the image files rewritten by rotation commits since the last call.
    pub fn take_rewritten(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.rewritten)
    }

    pub fn has_unsaved_rotation(&self) -> bool {
        self.current.as_ref().is_some_and(RotationEngine::has_unsaved_changes)
    }

    /// Explicit save: the rotation in rotation mode, the labels otherwise.
    pub fn save(&mut self) -> Result<Saved> {
        if self.current.is_none() {
            return Ok(Saved::NoImage);
        }
        match self.mode {
            Mode::Rotation => Ok(if self.commit_rotation()? {
                Saved::Rotation
            } else {
                Saved::NothingToSave
            }),
            Mode::Labeling => {
                self.flush_labels()?;
                Ok(Saved::Labels)
            }
        }
    }

    pub fn auto_save(&self) -> bool {
        self.auto_save
    }

    pub fn set_auto_save(&mut self, enabled: bool) {
        self.auto_save = enabled;
    }

    // ----- classes -----

    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    pub fn current_class(&self) -> usize {
        self.current_class
    }

    pub fn set_current_class(&mut self, class_id: usize) {
        if class_id < self.classes.len() {
            self.current_class = class_id;
        }
    }

    /// Replace the class table from editor text and write it to the class file.
    pub fn replace_classes(&mut self, text: &str) -> Result<Redraw> {
        let table = ClassTable::from_lines(text.lines());
        class_file::save_classes(&table, &self.classes_path)?;
        log::info!("Class table replaced with {} classes", table.len());
        self.classes = table;
        self.current_class = 0;
        Ok(Redraw::Overlay)
    }

    // ----- layout and presentation -----

    /// Apply a (debounced) canvas size.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) -> Redraw {
        if self.canvas == (width, height) {
            return Redraw::None;
        }
        self.canvas = (width, height);
        Redraw::Image
    }

    pub fn layout(&self) -> Option<Letterbox> {
        let ctx = self.current.as_ref()?;
        Letterbox::fit(self.canvas, ctx.displayed_size())
    }

    /// Displayed pixels scaled to the current layout.
    pub fn display_pixels(&self) -> Option<RgbImage> {
        let ctx = self.current.as_ref()?;
        let layout = self.layout()?;
        Some(imageops::resize(
            &ctx.displayed,
            layout.image_width,
            layout.image_height,
            imageops::FilterType::Triangle,
        ))
    }

    /// Everything to draw over the image.
    pub fn scene(&self) -> Scene {
        let (Some(ctx), Some(layout)) = (self.current.as_ref(), self.layout()) else {
            return Scene::default();
        };
        Scene {
            boxes: Scene::boxes(&ctx.annotations, &self.classes, &layout),
            preview: match self.mode {
                Mode::Labeling => self.annotation.preview(),
                Mode::Rotation => None,
            },
            guides: match self.mode {
                Mode::Rotation => Scene::guides(self.canvas.0, self.canvas.1),
                Mode::Labeling => Vec::new(),
            },
        }
    }

    /// Label list entries: `"<n>. <class> (<w>x<h>)"`.
    pub fn label_entries(&self) -> Vec<String> {
        let Some(ctx) = self.current() else {
            return Vec::new();
        };
        ctx.annotations
            .iter()
            .enumerate()
            .map(|(i, b)| format!("{}. {} ({:.3}x{:.3})", i + 1, self.classes.label(b.class_id), b.width, b.height))
            .collect()
    }

    /// Position and name of the current image, e.g. `"3/12 - cat.jpg"`.
    pub fn image_info(&self) -> Option<String> {
        let path = self.images.get(self.index)?;
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        Some(format!("{}/{} - {}", self.index + 1, self.images.len(), name))
    }

    pub fn current(&self) -> Option<&ImageContext> {
        self.current.as_ref()
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn index(&self) -> usize {
        self.index
    }
}
