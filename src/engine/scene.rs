// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas-space description of everything drawn over the image.

use crate::models::{annotation::AnnotationSet, classes::ClassTable};
use crate::util::geometry::{CanvasRect, Letterbox};

#[derive(Debug, Clone, PartialEq)]
pub struct SceneBox {
    pub rect: CanvasRect,
    pub label: String,
    pub color: [u8; 3],
}

/// Straight line in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub boxes: Vec<SceneBox>,
    /// Box being drawn.
    pub preview: Option<CanvasRect>,
    /// Horizontal and vertical center lines, rotation mode only.
    pub guides: Vec<GuideLine>,
}

impl Scene {
    pub fn boxes(set: &AnnotationSet, classes: &ClassTable, layout: &Letterbox) -> Vec<SceneBox> {
        set.iter()
            .map(|b| SceneBox {
                rect: layout.box_to_canvas(b),
                label: classes.label(b.class_id),
                color: ClassTable::color(b.class_id),
            })
            .collect()
    }

    /// Dashed cross through the canvas center.
    pub fn guides(canvas_width: u32, canvas_height: u32) -> Vec<GuideLine> {
        let (w, h) = (canvas_width as f64, canvas_height as f64);
        let (cx, cy) = ((canvas_width / 2) as f64, (canvas_height / 2) as f64);
        vec![
            GuideLine {
                from: (0.0, cy),
                to: (w, cy),
            },
            GuideLine {
                from: (cx, 0.0),
                to: (cx, h),
            },
        ]
    }
}
