// The per-frame chroma-key pipeline.
// Each tick: size everything from the source, draw the background, and when
// playing, replace key-colored video pixels with reference background pixels.

use tracing::{debug, info, warn};

use crate::background::BackgroundStore;
use crate::error::Result;
use crate::matcher::is_key;
use crate::types::{CHANNELS, KeyColor, PixelBuffer};

/// Supplies decoded video frames.
pub trait FrameSource {
    /// Rendered size of the video. Read once per tick; every buffer is sized from it.
    fn rendered_size(&self) -> (u32, u32);

    /// Begin playback.
    fn play(&mut self) -> Result<()>;

    /// Halt playback. Sources that cannot pause ignore this.
    fn pause(&mut self) {}

    /// Draw the current frame scaled to `target`'s dimensions.
    fn draw_into(&mut self, target: &mut PixelBuffer) -> Result<()>;
}

/// The visible drawing target.
pub trait OutputSurface {
    /// Show one tick's result. `canvas` is the composited output; `video` is the
    /// unkeyed frame that sits beneath it, when one was read this tick.
    /// Called every tick, even with an empty canvas, so the surface keeps its refresh.
    fn present(&mut self, canvas: &PixelBuffer, video: Option<&PixelBuffer>) -> Result<()>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

/// What a single `render_frame` call ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Nothing laid out yet; buffers are zero-sized.
    Empty,
    /// Not playing: only the background was drawn.
    BackgroundOnly,
    /// Reference geometry was stale; replacement skipped, recapture pending.
    Skipped,
    /// The source failed to deliver a frame; only the background was shown.
    Dropped,
    /// Video frame composited; `replaced` pixels came from the background.
    Composited { replaced: usize },
}

pub struct Compositor<S, O> {
    key: KeyColor,
    source: S,
    surface: O,
    background: BackgroundStore,
    canvas: PixelBuffer,
    scratch: PixelBuffer,
    playback: PlaybackState,
}

impl<S: FrameSource, O: OutputSurface> Compositor<S, O> {
    pub fn new(key: KeyColor, source: S, background: BackgroundStore, surface: O) -> Self {
        Self {
            key,
            source,
            surface,
            background,
            canvas: PixelBuffer::default(),
            scratch: PixelBuffer::default(),
            playback: PlaybackState::Stopped,
        }
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    pub fn is_playing(&self) -> bool {
        self.playback == PlaybackState::Playing
    }

    /// Start playback. Calling it while already playing does nothing.
    pub fn start(&mut self) -> Result<()> {
        if self.is_playing() {
            return Ok(());
        }
        self.source.play()?;
        self.playback = PlaybackState::Playing;
        info!("playback started");
        Ok(())
    }

    /// Stop playback and end the session; the next start recaptures the reference.
    pub fn stop(&mut self) {
        if !self.is_playing() {
            return;
        }
        self.source.pause();
        self.playback = PlaybackState::Stopped;
        self.background.invalidate_reference();
        info!("playback stopped");
    }

    /// The output canvas as of the last tick.
    pub fn canvas(&self) -> &PixelBuffer {
        &self.canvas
    }

    pub fn background(&self) -> &BackgroundStore {
        &self.background
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn surface(&self) -> &O {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut O {
        &mut self.surface
    }

    /// Render and present one frame.
    /// Source failures never escape: the frame falls back to the background.
    pub fn render_frame(&mut self) -> Result<FrameOutcome> {
        // 1) Size everything from the video's rendered size.
        //    Visual: resetting wipes last tick's canvas, like resizing a canvas does.
        let (width, height) = self.source.rendered_size();
        if self.canvas.dimensions() != (width, height) {
            debug!(width, height, "output dimensions changed");
        }
        self.canvas.reset(width, height);
        if self.canvas.is_empty() {
            // Nothing laid out yet; the surface still gets its refresh.
            self.surface.present(&self.canvas, None)?;
            return Ok(FrameOutcome::Empty);
        }

        // 2) Draw the background. Visual: this alone is what shows before play.
        let background = self.background.prepare(width, height);
        self.canvas.copy_from(background);

        // 3) Not playing: no video is read, the background is the frame.
        let outcome = if self.is_playing() {
            self.composite(width, height)
        } else {
            FrameOutcome::BackgroundOnly
        };

        // 6) Present. The raw video goes along only when it was read this tick.
        let video = matches!(outcome, FrameOutcome::Composited { .. }).then_some(&self.scratch);
        self.surface.present(&self.canvas, video)?;
        Ok(outcome)
    }

    fn composite(&mut self, width: u32, height: u32) -> FrameOutcome {
        // 4a) A reference from another geometry is useless; drop it and show
        //     the background this tick. The next tick recaptures.
        if self.background.has_reference() && !self.background.reference_matches(width, height) {
            warn!(width, height, "reference background is stale; skipping replacement");
            self.background.invalidate_reference();
            return FrameOutcome::Skipped;
        }

        // 4b) First playing tick: snapshot the canvas, which holds only the background.
        self.background.capture_reference(&self.canvas);

        // 4c) Grab the video frame into the scratch buffer.
        self.scratch.reset(width, height);
        if let Err(e) = self.source.draw_into(&mut self.scratch) {
            warn!(error = %e, "video frame unavailable; showing background only");
            return FrameOutcome::Dropped;
        }

        let Some(reference) = self.background.reference() else {
            return FrameOutcome::Skipped;
        };

        // 5) Copy the video onto the canvas and key it out there, leaving the
        //    scratch frame untouched. Visual: green pixels turn into background.
        self.canvas.copy_from(&self.scratch);
        let replaced = key_out(&mut self.canvas, reference, &self.key);
        FrameOutcome::Composited { replaced }
    }
}

/// Replace every key pixel of `frame` with the RGB of `reference` at the same
/// offset; alpha is kept. Returns how many pixels were replaced.
/// Buffers of different geometry are left untouched.
pub fn key_out(frame: &mut PixelBuffer, reference: &PixelBuffer, key: &KeyColor) -> usize {
    if frame.dimensions() != reference.dimensions() {
        return 0;
    }

    let mut replaced = 0;
    for (px, bg) in frame
        .as_bytes_mut()
        .chunks_exact_mut(CHANNELS)
        .zip(reference.as_bytes().chunks_exact(CHANNELS))
    {
        if is_key(px[0], px[1], px[2], key) {
            px[..3].copy_from_slice(&bg[..3]);
            replaced += 1;
        }
    }
    replaced
}
