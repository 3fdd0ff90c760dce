//! Real-time chroma-key compositing.
//!
//! A [`FrameScheduler`] ticks once per display refresh and asks the
//! [`Compositor`] to render: the background is drawn every tick, and while
//! playing, every video pixel close enough to the [`KeyColor`] is replaced with
//! the pixel at the same offset in the reference background frame.

pub mod background;
#[cfg(feature = "camera")]
pub mod camera;
pub mod compositor;
pub mod config;
pub mod draw;
pub mod error;
pub mod matcher;
pub mod scheduler;
pub mod source;
pub mod types;

pub use background::BackgroundStore;
#[cfg(feature = "camera")]
pub use camera::CameraSource;
pub use compositor::{Compositor, FrameOutcome, FrameSource, OutputSurface, PlaybackState, key_out};
pub use config::{Cli, Settings, VideoLocator};
pub use draw::Drawer;
pub use error::{Error, Result};
pub use matcher::is_key;
pub use scheduler::{Control, FrameScheduler, Host};
pub use source::FrameSequence;
pub use types::{KeyColor, PixelBuffer};
