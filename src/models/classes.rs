// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Class table: ordered class names where the index is the class id.

/// Classes used when no class file exists.
pub const DEFAULT_CLASSES: [&str; 5] = ["person", "car", "bike", "dog", "cat"];

/// Outline palette (red, blue, green, yellow, purple, orange), picked by `class_id % 6`.
const PALETTE: [[u8; 3]; 6] = [
    [255, 0, 0],
    [0, 0, 255],
    [0, 255, 0],
    [255, 255, 0],
    [160, 32, 240],
    [255, 165, 0],
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTable {
    names: Vec<String>,
}

impl Default for ClassTable {
    fn default() -> Self {
        Self {
            names: DEFAULT_CLASSES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ClassTable {
    /// Build a table from raw lines, trimming and dropping blank ones.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            names: lines
                .into_iter()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Display name for a class id; ids beyond the table become `Class<N>`.
    pub fn label(&self, class_id: usize) -> String {
        self.names
            .get(class_id)
            .cloned()
            .unwrap_or_else(|| format!("Class{}", class_id))
    }

    pub fn color(class_id: usize) -> [u8; 3] {
        PALETTE[class_id % PALETTE.len()]
    }
}
