// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the labeler window.

pub mod canvas;
pub mod class_editor;
pub mod confirm;
pub mod properties;
pub mod thumbnails;
pub mod toolbar;
