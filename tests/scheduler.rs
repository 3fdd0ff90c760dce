mod common;

use chroma_key::{Compositor, Control, FrameOutcome, FrameScheduler, KeyColor, PixelBuffer};
use common::{RecordingSurface, StillSource, solid_background};

const BLUE_KEY: KeyColor = KeyColor::new(0, 0, 255, 20);
const SKY: [u8; 4] = [120, 180, 240, 255];

fn scheduler(surface: RecordingSurface) -> FrameScheduler<StillSource, RecordingSurface> {
    scheduler_with(StillSource::solid(2, 2, [5, 5, 250, 255]), surface)
}

fn scheduler_with(
    source: StillSource,
    surface: RecordingSurface,
) -> FrameScheduler<StillSource, RecordingSurface> {
    FrameScheduler::new(Compositor::new(
        BLUE_KEY,
        source,
        solid_background(2, 2, SKY),
        surface,
    ))
}

#[test]
fn no_ticks_before_start() {
    let mut sched = scheduler(RecordingSurface::default());
    assert_eq!(sched.tick().unwrap(), None);
    assert_eq!(sched.ticks(), 0);
    assert!(sched.compositor().surface().presented.is_empty());
}

#[test]
fn loop_renders_background_until_started() {
    let mut surface = RecordingSurface::default();
    surface.controls = vec![vec![], vec![Control::Start], vec![]].into();
    let mut sched = scheduler(surface);
    sched.start();

    assert_eq!(sched.tick().unwrap(), Some(FrameOutcome::BackgroundOnly));
    assert_eq!(
        sched.tick().unwrap(),
        Some(FrameOutcome::Composited { replaced: 4 })
    );
    assert!(sched.compositor().is_playing());
    assert_eq!(sched.compositor().canvas(), &PixelBuffer::filled(2, 2, SKY));
}

#[test]
fn run_ends_when_host_closes() {
    let surface = RecordingSurface {
        open_for: 5,
        ..Default::default()
    };
    let mut sched = scheduler(surface);

    let ticks = sched.run().unwrap();

    assert_eq!(ticks, 5);
    assert!(sched.is_running());
    assert_eq!(sched.compositor().surface().presented.len(), 5);
}

#[test]
fn toggle_visibility_leaves_playback_alone() {
    let mut surface = RecordingSurface::default();
    surface.controls = vec![vec![Control::Start, Control::ToggleVisibility]].into();
    let mut sched = scheduler(surface);
    sched.start();

    let outcome = sched.tick().unwrap();

    assert_eq!(outcome, Some(FrameOutcome::Composited { replaced: 4 }));
    assert!(sched.compositor().surface().hidden);
    assert!(sched.compositor().is_playing());
}

#[test]
fn stop_control_ends_the_session() {
    let mut surface = RecordingSurface::default();
    surface.controls = vec![vec![Control::Start], vec![Control::Stop]].into();
    let mut sched = scheduler(surface);
    sched.start();

    sched.tick().unwrap();
    assert!(sched.compositor().background().has_reference());

    assert_eq!(sched.tick().unwrap(), Some(FrameOutcome::BackgroundOnly));
    assert!(!sched.compositor().is_playing());
    assert!(!sched.compositor().background().has_reference());
}

#[test]
fn dropped_video_frame_does_not_end_the_loop() {
    let mut source = StillSource::solid(2, 2, [5, 5, 250, 255]);
    source.fail_on = Some(2);
    let surface = RecordingSurface {
        open_for: 10,
        controls: vec![vec![Control::Start]].into(),
        ..Default::default()
    };
    let mut sched = scheduler_with(source, surface);

    let ticks = sched.run().unwrap();

    assert_eq!(ticks, 10);
    let surface = sched.compositor().surface();
    assert_eq!(surface.presented.len(), 10);
    assert_eq!(surface.presented[1], PixelBuffer::filled(2, 2, SKY));
    assert!(surface.videos[1].is_none());
    assert!(surface.videos[2].is_some());
}

#[test]
fn zero_size_output_still_refreshes_the_host() {
    let mut source = StillSource::solid(2, 2, [5, 5, 250, 255]);
    source.size = (0, 338);
    let surface = RecordingSurface {
        open_for: 50,
        ..Default::default()
    };
    let mut sched = scheduler_with(source, surface);

    assert_eq!(sched.run().unwrap(), 50);
    assert_eq!(sched.compositor().surface().presented.len(), 50);
}
