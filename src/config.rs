// Startup configuration: command line flags, optionally layered over a TOML file.
// Everything is read once, before the background starts loading.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::Parser;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::KeyColor;

pub const DEFAULT_FPS: usize = 60;

#[derive(Parser, Debug, Default)]
#[command(name = "chroma-key", version, about = "Real-time chroma-key compositor")]
pub struct Cli {
    /// TOML file with the same keys as the flags below; flags win.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Key color as R,G,B (0-255 each).
    #[arg(long)]
    pub key_color: Option<Rgb>,

    /// Per-channel tolerance around the key color.
    #[arg(long)]
    pub tolerance: Option<u16>,

    /// Video source: `camera:<index>`, an image, or a directory of frames.
    #[arg(long)]
    pub video: Option<VideoLocator>,

    /// Background image.
    #[arg(long)]
    pub background: Option<PathBuf>,

    /// Rendered video size as WxH (defaults to the source's own size).
    #[arg(long)]
    pub size: Option<Size>,

    /// Target display refresh rate.
    #[arg(long)]
    pub fps: Option<usize>,

    /// Start playing without waiting for the start key.
    #[arg(long)]
    pub autoplay: bool,

    /// Log filter, e.g. `debug` or `chroma_key=trace` (RUST_LOG also works).
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Config file contents. Every key is optional; the command line fills gaps.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub key_color: Option<String>,
    pub tolerance: Option<u16>,
    pub video: Option<String>,
    pub background: Option<PathBuf>,
    pub size: Option<String>,
    pub fps: Option<usize>,
    pub autoplay: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("read {}: {e}", path.display())))?;
        Self::parse(&text).map_err(|e| Error::config(format!("{}: {e}", path.display())))
    }

    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::config(e.to_string()))
    }
}

/// Fully resolved settings the binary runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub key: KeyColor,
    pub video: VideoLocator,
    pub background: PathBuf,
    pub size: Option<Size>,
    pub fps: usize,
    pub autoplay: bool,
}

impl Settings {
    /// Load the config file named on the command line (if any) and merge.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    pub fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
        let rgb = match (cli.key_color, file.key_color) {
            (Some(rgb), _) => rgb,
            (None, Some(s)) => s.parse()?,
            (None, None) => return Err(Error::config("missing key color")),
        };
        let tolerance = cli
            .tolerance
            .or(file.tolerance)
            .ok_or_else(|| Error::config("missing tolerance"))?;
        let video = match (&cli.video, file.video) {
            (Some(v), _) => v.clone(),
            (None, Some(s)) => s.parse()?,
            (None, None) => return Err(Error::config("missing video source")),
        };
        let background = cli
            .background
            .clone()
            .or(file.background)
            .ok_or_else(|| Error::config("missing background image"))?;
        let size = match (cli.size, file.size) {
            (Some(size), _) => Some(size),
            (None, Some(s)) => Some(s.parse()?),
            (None, None) => None,
        };
        let fps = cli.fps.or(file.fps).unwrap_or(DEFAULT_FPS);
        if fps == 0 {
            return Err(Error::config("fps must be at least 1"));
        }

        Ok(Self {
            key: KeyColor::new(rgb.0, rgb.1, rgb.2, tolerance),
            video,
            background,
            size,
            fps,
            autoplay: cli.autoplay || file.autoplay.unwrap_or(false),
        })
    }
}

/// Three comma-separated channel values, e.g. `0,255,0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let channels = s
            .split(',')
            .map(|c| {
                c.trim()
                    .parse::<u8>()
                    .map_err(|e| Error::config(format!("key color channel '{}': {e}", c.trim())))
            })
            .collect::<Result<Vec<_>>>()?;
        match channels[..] {
            [r, g, b] => Ok(Self(r, g, b)),
            _ => Err(Error::config(format!(
                "key color '{s}' needs exactly three channels"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl FromStr for Size {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| Error::config(format!("size '{s}' is not WxH")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| Error::config(format!("size '{s}': {e}")))
        };
        Ok(Self {
            width: parse(w)?,
            height: parse(h)?,
        })
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Where the video comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoLocator {
    Camera(u32),
    Path(PathBuf),
}

impl FromStr for VideoLocator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.strip_prefix("camera:") {
            Some(index) => index
                .parse()
                .map(Self::Camera)
                .map_err(|e| Error::config(format!("camera index '{index}': {e}"))),
            None if s.is_empty() => Err(Error::config("empty video locator")),
            None => Ok(Self::Path(PathBuf::from(s))),
        }
    }
}
