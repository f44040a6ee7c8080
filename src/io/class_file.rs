// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Reading and writing the class list file (one class name per line).

use crate::error::{LabelerError, Result};
use crate::models::classes::ClassTable;
use std::path::Path;

/// Load the class table, falling back to the defaults when the file is absent.
pub fn load_classes(path: &Path) -> Result<ClassTable> {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            let table = ClassTable::from_lines(text.lines());
            log::info!("Loaded {} classes from {}", table.len(), path.display());
            Ok(table)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("No class file at {}, using defaults", path.display());
            Ok(ClassTable::default())
        }
        Err(e) => Err(LabelerError::io(path, e)),
    }
}

pub fn save_classes(table: &ClassTable, path: &Path) -> Result<()> {
    std::fs::write(path, table.names().join("\n")).map_err(|e| LabelerError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let table = load_classes(&dir.path().join("classes.txt")).unwrap();
        assert_eq!(table, ClassTable::default());
        assert_eq!(table.label(0), "person");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classes.txt");
        let table = ClassTable::from_lines(["leaf", "stem", "flower"]);

        save_classes(&table, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "leaf\nstem\nflower");
        assert_eq!(load_classes(&path).unwrap(), table);
    }
}
