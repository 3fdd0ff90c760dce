#![allow(dead_code)]

use std::collections::VecDeque;

use chroma_key::{
    BackgroundStore, Control, Error, FrameSource, Host, OutputSurface, PixelBuffer, Result,
};
use image::{Rgba, RgbaImage};

/// Video source that always shows one frame. Frames are drawn as-is when the
/// target matches, otherwise the target is flooded with the frame's first pixel.
pub struct StillSource {
    pub size: (u32, u32),
    pub frame: PixelBuffer,
    pub plays: u32,
    pub draws: u32,
    /// Draw attempt (1-based) that fails like a dropped camera frame.
    pub fail_on: Option<u32>,
}

impl StillSource {
    pub fn new(frame: PixelBuffer) -> Self {
        Self {
            size: frame.dimensions(),
            frame,
            plays: 0,
            draws: 0,
            fail_on: None,
        }
    }

    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::new(PixelBuffer::filled(width, height, rgba))
    }
}

impl FrameSource for StillSource {
    fn rendered_size(&self) -> (u32, u32) {
        self.size
    }

    fn play(&mut self) -> Result<()> {
        self.plays += 1;
        Ok(())
    }

    fn draw_into(&mut self, target: &mut PixelBuffer) -> Result<()> {
        self.draws += 1;
        if self.fail_on == Some(self.draws) {
            return Err(Error::CameraFrame("transient".into()));
        }
        if target.dimensions() == self.frame.dimensions() {
            target.copy_from(&self.frame);
        } else if let Some(px) = self.frame.pixel(0, 0) {
            let (w, h) = target.dimensions();
            *target = PixelBuffer::filled(w, h, px);
        }
        Ok(())
    }
}

/// Surface that records what it was shown and replays scripted controls.
#[derive(Default)]
pub struct RecordingSurface {
    pub presented: Vec<PixelBuffer>,
    /// Unkeyed video handed along with each presented canvas.
    pub videos: Vec<Option<PixelBuffer>>,
    pub controls: VecDeque<Vec<Control>>,
    /// How many more `is_open` checks report true.
    pub open_for: usize,
    pub hidden: bool,
}

impl RecordingSurface {
    pub fn last(&self) -> &PixelBuffer {
        self.presented.last().expect("nothing presented")
    }
}

impl OutputSurface for RecordingSurface {
    fn present(&mut self, canvas: &PixelBuffer, video: Option<&PixelBuffer>) -> Result<()> {
        self.presented.push(canvas.clone());
        self.videos.push(video.cloned());
        Ok(())
    }
}

impl Host for RecordingSurface {
    fn is_open(&self) -> bool {
        self.open_for > 0
    }

    fn poll_controls(&mut self) -> Vec<Control> {
        self.open_for = self.open_for.saturating_sub(1);
        self.controls.pop_front().unwrap_or_default()
    }

    fn toggle_visibility(&mut self) -> bool {
        self.hidden = !self.hidden;
        !self.hidden
    }
}

pub fn solid_background(width: u32, height: u32, rgba: [u8; 4]) -> BackgroundStore {
    BackgroundStore::new(RgbaImage::from_pixel(width, height, Rgba(rgba)))
}
