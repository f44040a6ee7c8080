// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with file, mode, rotation, save and navigation controls.

use crate::models::image_context::Mode;

/// Button or toggle activated in the toolbar this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolbarAction {
    None,
    OpenFolder,
    OpenFile,
    EditClasses,
    SetMode(Mode),
    RotateLeft,
    RotateRight,
    Save,
    SetAutoSave(bool),
    Prev,
    Next,
}

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, mode: Mode, auto_save: bool, image_info: Option<&str>) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.button("📁 Open Folder").clicked() {
            action = ToolbarAction::OpenFolder;
        }
        if ui.button("🖼 Open Image").clicked() {
            action = ToolbarAction::OpenFile;
        }
        if ui.button("Classes…").clicked() {
            action = ToolbarAction::EditClasses;
        }

        ui.separator();

        ui.label("Mode:");
        if ui.selectable_label(mode == Mode::Labeling, "▭ Labeling (W)").clicked() {
            action = ToolbarAction::SetMode(Mode::Labeling);
        }
        if ui.selectable_label(mode == Mode::Rotation, "⟳ Rotation (R)").clicked() {
            action = ToolbarAction::SetMode(Mode::Rotation);
        }

        ui.separator();

        let rotating = mode == Mode::Rotation;
        if ui.add_enabled(rotating, egui::Button::new("⟲ 90° Left")).clicked() {
            action = ToolbarAction::RotateLeft;
        }
        if ui.add_enabled(rotating, egui::Button::new("⟳ 90° Right")).clicked() {
            action = ToolbarAction::RotateRight;
        }

        ui.separator();

        let mut auto = auto_save;
        if ui.checkbox(&mut auto, "Auto-save").changed() {
            action = ToolbarAction::SetAutoSave(auto);
        }
        if ui.button("💾 Save").clicked() {
            action = ToolbarAction::Save;
        }

        ui.separator();

        if ui.button("◀ Prev").clicked() {
            action = ToolbarAction::Prev;
        }
        if ui.button("Next ▶").clicked() {
            action = ToolbarAction::Next;
        }
        ui.label(image_info.unwrap_or("No image"));

        ui.separator();

        // Mode description
        let hint = match mode {
            Mode::Labeling => "Drag to draw a box, right-click to delete the nearest box",
            Mode::Rotation => "Drag horizontally to rotate, then save",
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    action
}
