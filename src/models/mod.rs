// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data models for boxes, classes and the open image.

pub mod annotation;
pub mod classes;
pub mod image_context;
