// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Thumbnail strip for the open folder.
//!
//! Thumbnails are decoded on a background thread and sent back over a
//! channel, then uploaded as textures as they arrive.

use crate::io::media;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Result of background thumbnail decoding for one image.
struct LoadedThumbnail {
    index: usize,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[derive(Default)]
pub struct ThumbnailStrip {
    paths: Vec<PathBuf>,
    textures: Vec<Option<egui::TextureHandle>>,
    loader: Option<Receiver<LoadedThumbnail>>,
    sender: Option<Sender<LoadedThumbnail>>,
}

impl ThumbnailStrip {
    /// Restart loading when the image list changed.
    pub fn sync(&mut self, paths: &[PathBuf], size: u32) {
        if self.paths == paths {
            return;
        }
        self.paths = paths.to_vec();
        self.textures = vec![None; paths.len()];

        let (sender, receiver) = channel();
        self.loader = Some(receiver);
        self.sender = Some(sender.clone());
        spawn_loader(sender, self.paths.iter().cloned().enumerate().collect(), size);
    }

    /// Reload the thumbnail of a file that was rewritten on disk.
    pub fn invalidate(&mut self, path: &Path, size: u32) {
        let Some(sender) = self.sender.clone() else {
            return;
        };
        let mut jobs = Vec::new();
        for (index, p) in self.paths.iter().enumerate() {
            if p == path {
                self.textures[index] = None;
                jobs.push((index, p.clone()));
            }
        }
        if !jobs.is_empty() {
            log::debug!("Reloading thumbnail for {}", path.display());
            spawn_loader(sender, jobs, size);
        }
    }

    /// Upload thumbnails that finished decoding.
    pub fn poll(&mut self, ctx: &egui::Context) {
        let Some(receiver) = &self.loader else {
            return;
        };
        let mut received = false;
        while let Ok(thumb) = receiver.try_recv() {
            let size = [thumb.width as usize, thumb.height as usize];
            let image = egui::ColorImage::from_rgb(size, &thumb.pixels);
            if let Some(slot) = self.textures.get_mut(thumb.index) {
                *slot = Some(ctx.load_texture(format!("thumb_{}", thumb.index), image, egui::TextureOptions::LINEAR));
            }
            received = true;
        }
        if received || self.textures.iter().any(Option::is_none) {
            ctx.request_repaint();
        }
    }

    /// Display the strip. Returns the index of a clicked thumbnail.
    pub fn show(&self, ui: &mut egui::Ui, current: usize, size: u32) -> Option<usize> {
        let mut clicked = None;
        let side = size as f32;

        egui::ScrollArea::vertical().id_source("thumbnails").show(ui, |ui| {
            for (i, texture) in self.textures.iter().enumerate() {
                let response = match texture {
                    Some(texture) => {
                        let sized = egui::load::SizedTexture::new(texture.id(), texture.size_vec2());
                        ui.add(egui::ImageButton::new(sized).selected(i == current))
                    }
                    None => ui.add_sized([side, side], egui::SelectableLabel::new(i == current, format!("{}", i + 1))),
                };
                if response.clicked() {
                    clicked = Some(i);
                }
            }
        });

        clicked
    }
}

/// Decode `jobs` on a background thread and send them to the strip.
fn spawn_loader(sender: Sender<LoadedThumbnail>, jobs: Vec<(usize, PathBuf)>, size: u32) {
    std::thread::spawn(move || {
        for (index, path) in jobs {
            match media::load_thumbnail(&path, size) {
                Ok(thumb) => {
                    let loaded = LoadedThumbnail {
                        index,
                        width: thumb.width(),
                        height: thumb.height(),
                        pixels: thumb.into_raw(),
                    };
                    // Receiver gone means a newer folder replaced this one
                    if sender.send(loaded).is_err() {
                        return;
                    }
                }
                Err(e) => log::warn!("No thumbnail for {}: {}", path.display(), e),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{imageops, Rgb, RgbImage};
    use std::time::Duration;

    fn next_size(strip: &ThumbnailStrip) -> (usize, u32, u32) {
        let thumb = strip
            .loader
            .as_ref()
            .unwrap()
            .recv_timeout(Duration::from_secs(10))
            .unwrap();
        (thumb.index, thumb.width, thumb.height)
    }

    #[test]
    fn test_invalidate_reloads_rewritten_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        let wide = RgbImage::from_pixel(200, 100, Rgb([10, 20, 30]));
        media::save_image(&wide, &a).unwrap();
        media::save_image(&wide, &b).unwrap();

        let mut strip = ThumbnailStrip::default();
        let paths = vec![a.clone(), b];
        strip.sync(&paths, 50);
        assert_eq!(next_size(&strip), (0, 50, 25));
        assert_eq!(next_size(&strip), (1, 50, 25));

        // Same list again does not reload
        strip.sync(&paths, 50);
        assert!(strip.loader.as_ref().unwrap().try_recv().is_err());

        media::save_image(&imageops::rotate90(&wide), &a).unwrap();
        strip.invalidate(&a, 50);
        assert!(strip.textures[0].is_none());
        assert_eq!(next_size(&strip), (0, 25, 50));
    }
}
