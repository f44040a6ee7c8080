// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Prompt shown when an action would discard an unsaved rotation.

use crate::engine::session::Decision;

/// Display the prompt. Returns the user's answer once a button is pressed.
pub fn show(ctx: &egui::Context) -> Option<Decision> {
    let mut decision = None;

    egui::Window::new("Unsaved rotation")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label("The rotated image has not been saved. Save it before continuing?");
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    decision = Some(Decision::Save);
                }
                if ui.button("Discard").clicked() {
                    decision = Some(Decision::Discard);
                }
                if ui.button("Cancel").clicked() {
                    decision = Some(Decision::Cancel);
                }
            });
        });

    decision
}
