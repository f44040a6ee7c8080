// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Side panel with the class selector and the current image's box list.

use crate::models::{classes::ClassTable, image_context::Mode};

/// Result of properties panel interaction.
pub enum PropertiesAction {
    None,
    SelectClass(usize),
    DeleteBox(usize),
}

/// Display the class selector and label list.
pub fn show(
    ui: &mut egui::Ui,
    mode: Mode,
    classes: &ClassTable,
    current_class: usize,
    entries: &[String],
) -> PropertiesAction {
    let mut action = PropertiesAction::None;
    let labeling = mode == Mode::Labeling;

    ui.heading("Classes");
    ui.separator();
    egui::ScrollArea::vertical()
        .id_source("class_list")
        .max_height(300.0)
        .show(ui, |ui| {
            ui.add_enabled_ui(labeling, |ui| {
                for (i, name) in classes.names().iter().enumerate() {
                    let [r, g, b] = ClassTable::color(i);
                    let text = egui::RichText::new(name).color(egui::Color32::from_rgb(r, g, b));
                    if ui.selectable_label(i == current_class, text).clicked() {
                        action = PropertiesAction::SelectClass(i);
                    }
                }
            });
        });

    ui.add_space(12.0);
    ui.heading("Labels");
    ui.separator();

    if entries.is_empty() {
        ui.label(egui::RichText::new("No boxes").weak());
        return action;
    }

    ui.label(egui::RichText::new("Double-click an entry to delete it").italics().weak());
    egui::ScrollArea::vertical().id_source("label_list").show(ui, |ui| {
        for (i, entry) in entries.iter().enumerate() {
            if ui.selectable_label(false, entry).double_clicked() {
                action = PropertiesAction::DeleteBox(i);
            }
        }
    });

    action
}
