// Frame sources backed by decoded still images.
// A directory of frames plays back in file-name order and loops.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use image::imageops::FilterType;
use tracing::info;

use crate::compositor::FrameSource;
use crate::error::{Error, Result};
use crate::types::PixelBuffer;

const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tga", "webp"];

pub struct FrameSequence {
    frames: Vec<RgbaImage>,
    index: usize,
    playing: bool,
    rendered: (u32, u32),
}

impl FrameSequence {
    /// Rendered size defaults to the first frame's size.
    pub fn from_frames(frames: Vec<RgbaImage>) -> Result<Self> {
        let first = frames
            .first()
            .ok_or_else(|| Error::frame_load("frame sequence is empty"))?;
        let rendered = first.dimensions();
        Ok(Self {
            frames,
            index: 0,
            playing: false,
            rendered,
        })
    }

    /// Load one image, or every image inside a directory.
    pub fn from_path(path: &Path) -> Result<Self> {
        let paths = if path.is_dir() {
            frame_paths(path)?
        } else {
            vec![path.to_path_buf()]
        };

        let frames = paths
            .iter()
            .map(|p| {
                image::open(p)
                    .map(|img| img.into_rgba8())
                    .map_err(|e| Error::frame_load(format!("{}: {e}", p.display())))
            })
            .collect::<Result<Vec<_>>>()?;

        let seq = Self::from_frames(frames)?;
        info!(
            path = %path.display(),
            frames = seq.len(),
            width = seq.rendered.0,
            height = seq.rendered.1,
            "frame sequence loaded"
        );
        Ok(seq)
    }

    /// Override the rendered size frames are drawn at.
    pub fn set_rendered_size(&mut self, width: u32, height: u32) {
        self.rendered = (width, height);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the frame the next draw will show.
    pub fn position(&self) -> usize {
        self.index
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl FrameSource for FrameSequence {
    fn rendered_size(&self) -> (u32, u32) {
        self.rendered
    }

    fn play(&mut self) -> Result<()> {
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn draw_into(&mut self, target: &mut PixelBuffer) -> Result<()> {
        target.draw_scaled(&self.frames[self.index], FilterType::Nearest);
        if self.playing {
            self.index = (self.index + 1) % self.frames.len();
        }
        Ok(())
    }
}

fn frame_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| Error::frame_load(format!("{}: {e}", dir.display())))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| Error::frame_load(format!("{}: {e}", dir.display())))?
            .path();
        if is_frame_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(Error::frame_load(format!(
            "{}: no image frames found",
            dir.display()
        )));
    }
    Ok(paths)
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
