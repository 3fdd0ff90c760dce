// Drives the compositor once per display refresh.
// The loop never stops on its own; it ends when the host goes away.

use std::time::{Duration, Instant};

use tracing::info;

use crate::compositor::{Compositor, FrameOutcome, FrameSource, OutputSurface};
use crate::error::Result;

/// Requests coming from the user-facing controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Start,
    Stop,
    ToggleVisibility,
}

/// The environment the loop runs in: it paces ticks, reports teardown and
/// delivers control requests.
pub trait Host {
    /// False once the host has been torn down.
    fn is_open(&self) -> bool;

    /// Controls triggered since the last call.
    fn poll_controls(&mut self) -> Vec<Control>;

    /// Show or hide the output. Returns the new visibility.
    fn toggle_visibility(&mut self) -> bool;
}

/// Frames-per-second measurement, reported once a second.
struct FpsCounter {
    window_start: Instant,
    frames: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
        }
    }

    fn frame(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.duration_since(self.window_start);
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(fps)
    }
}

pub struct FrameScheduler<S, O> {
    compositor: Compositor<S, O>,
    running: bool,
    ticks: u64,
    fps: FpsCounter,
}

impl<S, O> FrameScheduler<S, O>
where
    S: FrameSource,
    O: OutputSurface + Host,
{
    /// Owning a `Compositor` means its background is already decoded,
    /// so the scheduler can be started right away.
    pub fn new(compositor: Compositor<S, O>) -> Self {
        Self {
            compositor,
            running: false,
            ticks: 0,
            fps: FpsCounter::new(),
        }
    }

    pub fn compositor(&self) -> &Compositor<S, O> {
        &self.compositor
    }

    pub fn compositor_mut(&mut self) -> &mut Compositor<S, O> {
        &mut self.compositor
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.fps = FpsCounter::new();
        info!("render loop started");
    }

    /// One refresh: apply pending controls, then render. Returns `None` before `start`.
    /// Only surface and control errors come back; a missing video frame does not.
    pub fn tick(&mut self) -> Result<Option<FrameOutcome>> {
        if !self.running {
            return Ok(None);
        }

        for control in self.compositor.surface_mut().poll_controls() {
            self.apply(control)?;
        }

        let outcome = self.compositor.render_frame()?;
        self.ticks += 1;

        if let Some(fps) = self.fps.frame(Instant::now()) {
            info!(playing = self.compositor.is_playing(), "FPS: {fps:.1}");
        }
        Ok(Some(outcome))
    }

    /// Start and tick until the host is torn down. Returns the number of ticks.
    pub fn run(&mut self) -> Result<u64> {
        self.start();
        while self.compositor.surface().is_open() {
            self.tick()?;
        }
        info!(ticks = self.ticks, "render loop ended");
        Ok(self.ticks)
    }

    fn apply(&mut self, control: Control) -> Result<()> {
        match control {
            Control::Start => self.compositor.start()?,
            Control::Stop => self.compositor.stop(),
            Control::ToggleVisibility => {
                let visible = self.compositor.surface_mut().toggle_visibility();
                info!(visible, "output visibility toggled");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_reports_after_a_second() {
        let mut fps = FpsCounter::new();
        let start = fps.window_start;
        for _ in 0..29 {
            assert!(fps.frame(start + Duration::from_millis(500)).is_none());
        }
        let rate = fps.frame(start + Duration::from_secs(1)).unwrap();
        assert!((rate - 30.0).abs() < 0.01);
        assert_eq!(fps.frames, 0);
    }
}
