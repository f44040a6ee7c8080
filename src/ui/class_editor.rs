// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Window for editing the class list as plain text, one class per line.

use crate::models::classes::ClassTable;

#[derive(Default)]
pub struct ClassEditor {
    open: bool,
    text: String,
}

impl ClassEditor {
    pub fn open(&mut self, classes: &ClassTable) {
        self.text = classes.names().join("\n");
        self.open = true;
    }

    /// Show the editor if open. Returns the edited text when saved.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<String> {
        if !self.open {
            return None;
        }

        let mut saved = None;
        let mut open = self.open;
        egui::Window::new("Class Setup")
            .open(&mut open)
            .collapsible(false)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.label("One class per line; line order defines the class id.");
                ui.add(
                    egui::TextEdit::multiline(&mut self.text)
                        .desired_rows(15)
                        .desired_width(f32::INFINITY),
                );
                if ui.button("Save").clicked() {
                    saved = Some(self.text.clone());
                }
            });

        self.open = open && saved.is_none();
        saved
    }
}
