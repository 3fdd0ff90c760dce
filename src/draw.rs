// Window output for the compositor.
// Visual: a window showing the composited canvas; keys drive playback.
//   Space / P  start playback
//   S          stop playback
//   T          hide the canvas and show the raw video beneath it (and back)
//   Esc        quit

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use tracing::debug;

use crate::compositor::OutputSurface;
use crate::error::{Error, Result};
use crate::scheduler::{Control, Host};
use crate::types::PixelBuffer;

pub struct Drawer {
    window: Window,
    visible: bool,
    // 0x00RRGGBB staging buffer, reused every frame
    staging: Vec<u32>,
}

impl Drawer {
    /// Create a window sized to the rendered video, refreshed at most `fps` times a second.
    pub fn new(title: &str, width: usize, height: usize, fps: usize) -> Result<Self> {
        let mut window = Window::new(title, width.max(1), height.max(1), WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        // update_with_buffer sleeps to hold this rate; that sleep is our display refresh.
        window.set_target_fps(fps);
        Ok(Self {
            window,
            visible: true,
            staging: Vec::new(),
        })
    }
}

/// Which layer the window shows. The canvas sits on top of the video; hiding
/// it uncovers the unkeyed frame, or nothing when no frame was read.
pub fn shown_layer<'a>(
    canvas_visible: bool,
    canvas: &'a PixelBuffer,
    video: Option<&'a PixelBuffer>,
) -> Option<&'a PixelBuffer> {
    if canvas_visible { Some(canvas) } else { video }
}

impl OutputSurface for Drawer {
    fn present(&mut self, canvas: &PixelBuffer, video: Option<&PixelBuffer>) -> Result<()> {
        if canvas.is_empty() {
            // Nothing laid out yet; update() still paces the loop and pumps input.
            self.window.update();
            return Ok(());
        }

        // 1) Pick the layer: canvas on top, raw video underneath, else blank.
        match shown_layer(self.visible, canvas, video) {
            Some(layer) => layer.write_xrgb(&mut self.staging),
            None => {
                self.staging.clear();
                self.staging
                    .resize(canvas.width() as usize * canvas.height() as usize, 0);
            }
        }

        // 2) Push to the window. Visual: the new frame appears on screen here.
        self.window
            .update_with_buffer(&self.staging, canvas.width() as usize, canvas.height() as usize)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }
}

impl Host for Drawer {
    fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    fn poll_controls(&mut self) -> Vec<Control> {
        let mut controls = Vec::new();
        let pressed = |key| self.window.is_key_pressed(key, KeyRepeat::No);

        if pressed(Key::Space) || pressed(Key::P) {
            controls.push(Control::Start);
        }
        if pressed(Key::S) {
            controls.push(Control::Stop);
        }
        if pressed(Key::T) {
            controls.push(Control::ToggleVisibility);
        }
        if !controls.is_empty() {
            debug!(?controls, "controls pressed");
        }
        controls
    }

    fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }
}
