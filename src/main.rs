// Opens a window and chroma-keys a video source over a background image.
// Nothing is drawn until the background has decoded; then the background shows
// alone until playback starts (Space / P), after which the keyed video appears.

use anyhow::Context as _;
use chroma_key::{
    BackgroundStore, Cli, Compositor, Drawer, FrameScheduler, FrameSequence, FrameSource,
    Settings, VideoLocator,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let settings = Settings::resolve(&cli).context("resolve configuration")?;
    info!(
        key = ?settings.key,
        video = ?settings.video,
        background = %settings.background.display(),
        "configuration loaded"
    );

    // The loop only starts once this succeeds.
    let background = BackgroundStore::load(&settings.background)
        .with_context(|| format!("load background '{}'", settings.background.display()))?;

    match &settings.video {
        VideoLocator::Path(path) => {
            let mut source = FrameSequence::from_path(path)
                .with_context(|| format!("load video frames '{}'", path.display()))?;
            if let Some(size) = settings.size {
                source.set_rendered_size(size.width, size.height);
            }
            run(source, background, &settings)
        }
        VideoLocator::Camera(index) => run_camera(*index, background, &settings),
    }
}

#[cfg(feature = "camera")]
fn run_camera(index: u32, background: BackgroundStore, settings: &Settings) -> anyhow::Result<()> {
    let (w, h) = settings
        .size
        .map(|s| (s.width, s.height))
        .unwrap_or((640, 480));
    let mut source = chroma_key::CameraSource::open(index, w, h).context("open camera")?;
    if let Some(size) = settings.size {
        source.set_rendered_size(size.width, size.height);
    }
    run(source, background, settings)
}

#[cfg(not(feature = "camera"))]
fn run_camera(_index: u32, _background: BackgroundStore, _settings: &Settings) -> anyhow::Result<()> {
    anyhow::bail!("camera sources need the `camera` feature")
}

fn run<S: FrameSource>(source: S, background: BackgroundStore, settings: &Settings) -> anyhow::Result<()> {
    let (w, h) = source.rendered_size();
    let window = Drawer::new("Chroma Key", w as usize, h as usize, settings.fps)?;

    let mut compositor = Compositor::new(settings.key, source, background, window);
    if settings.autoplay {
        compositor.start()?;
    }

    let mut scheduler = FrameScheduler::new(compositor);
    let ticks = scheduler.run()?;
    info!(ticks, "window closed");
    Ok(())
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
