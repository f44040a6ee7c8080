// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label file serialization and deserialization.
//!
//! Each image has a sibling `.txt` file with one box per line:
//! `<class_id> <cx> <cy> <w> <h>`. A missing file means the image has no
//! boxes; an empty set is never written as a zero-byte file.

use crate::error::{LabelerError, Result};
use crate::models::annotation::{AnnotationSet, BoundingBox};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Label file path for an image: same basename, `.txt` extension.
pub fn label_path_for(image_path: &Path) -> PathBuf {
    image_path.with_extension("txt")
}

/// Render boxes in label-file format, 6 decimal places per float.
pub fn format_labels(set: &AnnotationSet) -> String {
    let mut out = String::new();
    for b in set.iter() {
        let _ = writeln!(
            out,
            "{} {:.6} {:.6} {:.6} {:.6}",
            b.class_id, b.center_x, b.center_y, b.width, b.height
        );
    }
    out
}

/// Parse label-file text. Lines that are not exactly five numbers are skipped.
pub fn parse_labels(text: &str) -> AnnotationSet {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parsed = parse_line(line);
            if parsed.is_none() {
                log::debug!("Skipping malformed label line: {:?}", line);
            }
            parsed
        })
        .collect()
}

fn parse_line(line: &str) -> Option<BoundingBox> {
    let values = line
        .split_whitespace()
        .map(|t| t.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect::<Option<Vec<f64>>>()?;

    match values[..] {
        [class, cx, cy, w, h] if class >= 0.0 => Some(BoundingBox::new(class.trunc() as usize, cx, cy, w, h)),
        _ => None,
    }
}

/// Write the set to `path`, or remove `path` when the set is empty.
pub fn serialize(set: &AnnotationSet, path: &Path) -> Result<()> {
    if set.is_empty() {
        return match std::fs::remove_file(path) {
            Ok(()) => {
                log::info!("Removed empty label file {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LabelerError::io(path, e)),
        };
    }

    std::fs::write(path, format_labels(set)).map_err(|e| LabelerError::io(path, e))?;
    log::info!("Saved {} boxes to {}", set.len(), path.display());
    Ok(())
}

/// Read the boxes stored at `path`; a missing file yields an empty set.
pub fn deserialize(path: &Path) -> Result<AnnotationSet> {
    match std::fs::read(path) {
        // Undecodable bytes only spoil the lines they appear on
        Ok(bytes) => Ok(parse_labels(&String::from_utf8_lossy(&bytes))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AnnotationSet::new()),
        Err(e) => Err(LabelerError::io(path, e)),
    }
}
