use super::*;
use crate::config::params::EffectId;

fn source() -> SourceImage {
    SourceImage::from_rgba(4, 4, [90u8, 60, 30, 255].repeat(16)).unwrap()
}

fn scanline_config() -> GlitchConfig {
    GlitchConfig {
        shader_modules: vec![EffectId::Scanlines],
        ..GlitchConfig::default()
    }
}

fn seeded(config: GlitchConfig, offload: bool) -> FrameScheduler {
    FrameScheduler::new(
        config,
        SchedulerOpts {
            seed: Some(5),
            offload,
            ..SchedulerOpts::default()
        },
    )
    .unwrap()
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn idle_until_an_image_is_loaded() {
    let t0 = Instant::now();
    let mut s = seeded(scanline_config(), false);
    assert_eq!(s.state(), PlaybackState::Idle);
    assert_eq!(s.tick(t0).unwrap(), TickOutcome::Idle);
    assert!(s.frame().is_none());
}

#[test]
fn running_tick_renders_source_through_pipeline() {
    let t0 = Instant::now();
    let mut s = seeded(scanline_config(), false);
    s.load_image(source(), t0);
    assert_eq!(s.state(), PlaybackState::Running);

    let out = s.tick(t0 + ms(500)).unwrap();
    assert_eq!(out, TickOutcome::Rendered { progress: 0.25 });
    let frame = s.frame().unwrap();
    assert_eq!(frame.pixel(0, 0), Some([63, 42, 21, 255]));
    assert_eq!(frame.pixel(0, 1), Some([90, 60, 30, 255]));

    // Each tick starts from the untouched source.
    s.tick(t0 + ms(600)).unwrap();
    assert_eq!(s.frame().unwrap().pixel(0, 0), Some([63, 42, 21, 255]));
}

#[test]
fn looping_wraps_progress_and_reverse_flips_it() {
    let t0 = Instant::now();
    let mut cfg = scanline_config();
    cfg.reverse = true;
    let mut s = seeded(cfg, false);
    s.load_image(source(), t0);
    assert_eq!(
        s.tick(t0 + ms(2500)).unwrap(),
        TickOutcome::Rendered { progress: 0.75 }
    );
}

#[test]
fn non_looping_playback_finishes_and_freezes() {
    let t0 = Instant::now();
    let mut cfg = scanline_config();
    cfg.looping = false;
    let mut s = seeded(cfg, false);
    s.load_image(source(), t0);
    s.tick(t0 + ms(1000)).unwrap();
    let shown = s.frame().cloned();

    assert_eq!(s.tick(t0 + ms(2000)).unwrap(), TickOutcome::Finished);
    assert_eq!(s.state(), PlaybackState::Finished);
    assert_eq!(s.tick(t0 + ms(2100)).unwrap(), TickOutcome::Finished);
    assert_eq!(s.frame().cloned(), shown);
}

#[test]
fn pause_and_resume_keep_position() {
    let t0 = Instant::now();
    let mut s = seeded(scanline_config(), false);
    s.load_image(source(), t0);
    s.pause(t0 + ms(400));
    assert_eq!(s.tick(t0 + ms(900)).unwrap(), TickOutcome::Paused);
    s.resume(t0 + ms(1000));
    // 400 ms played before the pause, 100 ms after.
    assert_eq!(
        s.tick(t0 + ms(1100)).unwrap(),
        TickOutcome::Rendered { progress: 0.25 }
    );
}

#[test]
fn set_config_restarts_timing() {
    let t0 = Instant::now();
    let mut s = seeded(scanline_config(), false);
    s.load_image(source(), t0);
    let before = s.generation();
    let mut next = scanline_config();
    next.duration = 4.0;
    s.set_config(next, t0 + ms(1000)).unwrap();
    assert!(s.generation() > before);
    assert_eq!(
        s.tick(t0 + ms(2000)).unwrap(),
        TickOutcome::Rendered { progress: 0.25 }
    );
}

#[test]
fn image_source_change_goes_idle_without_stale_frame() {
    let t0 = Instant::now();
    let mut s = seeded(scanline_config(), false);
    s.load_image(source(), t0);
    s.tick(t0 + ms(10)).unwrap();
    assert!(s.frame().is_some());

    let mut next = scanline_config();
    next.image_source = Some("other.png".to_owned());
    s.set_config(next, t0 + ms(20)).unwrap();
    assert_eq!(s.state(), PlaybackState::Idle);
    assert!(s.frame().is_none());
    assert_eq!(s.tick(t0 + ms(30)).unwrap(), TickOutcome::Idle);

    s.load_image(source(), t0 + ms(40));
    assert!(matches!(
        s.tick(t0 + ms(50)).unwrap(),
        TickOutcome::Rendered { .. }
    ));
}

#[test]
fn invalid_config_is_rejected() {
    let t0 = Instant::now();
    let mut s = seeded(scanline_config(), false);
    let mut bad = scanline_config();
    bad.duration = 0.0;
    assert!(s.set_config(bad, t0).is_err());
    assert_eq!(s.config().duration, 2.0);
}

#[test]
fn ticks_feed_the_performance_monitor() {
    let t0 = Instant::now();
    let mut s = seeded(scanline_config(), false);
    s.load_image(source(), t0);
    for i in 0..5 {
        s.tick(t0 + ms(i * 25)).unwrap();
    }
    assert_eq!(s.perf().metrics().samples, 4);
    assert_eq!(s.perf().metrics().fps, 40);
}

#[test]
fn offloaded_frames_arrive_via_the_worker() {
    let t0 = Instant::now();
    let mut s = seeded(scanline_config(), true);
    s.load_image(source(), t0);
    assert_eq!(s.tick(t0 + ms(500)).unwrap(), TickOutcome::Pending);
    assert!(s.frame().is_none());
    assert!(s.settle(Duration::from_secs(10), t0 + ms(510)).unwrap());
    assert_eq!(s.frame().unwrap().pixel(0, 0), Some([63, 42, 21, 255]));
}

#[test]
fn stale_offloaded_results_are_discarded() {
    let t0 = Instant::now();
    let mut s = seeded(scanline_config(), true);
    s.load_image(source(), t0);
    assert_eq!(s.tick(t0 + ms(100)).unwrap(), TickOutcome::Pending);

    // New config while the job is in flight.
    let mut next = scanline_config();
    next.duration = 3.0;
    s.set_config(next, t0 + ms(110)).unwrap();
    assert!(!s.settle(Duration::from_secs(10), t0 + ms(120)).unwrap());
    assert!(s.frame().is_none());

    assert_eq!(s.tick(t0 + ms(130)).unwrap(), TickOutcome::Pending);
    assert!(s.settle(Duration::from_secs(10), t0 + ms(140)).unwrap());
    assert!(s.frame().is_some());
}

#[test]
fn pause_discards_the_frame_in_flight() {
    let t0 = Instant::now();
    let mut s = seeded(scanline_config(), true);
    s.load_image(source(), t0);
    assert_eq!(s.tick(t0 + ms(100)).unwrap(), TickOutcome::Pending);

    s.pause(t0 + ms(110));
    assert!(!s.settle(Duration::from_secs(10), t0 + ms(120)).unwrap());
    assert_eq!(s.state(), PlaybackState::Paused);
    assert!(s.frame().is_none());

    s.resume(t0 + ms(200));
    assert_eq!(s.tick(t0 + ms(210)).unwrap(), TickOutcome::Pending);
    assert!(s.settle(Duration::from_secs(10), t0 + ms(220)).unwrap());
    assert!(s.frame().is_some());
}

#[test]
fn dispose_releases_everything() {
    let t0 = Instant::now();
    let mut s = seeded(scanline_config(), true);
    s.load_image(source(), t0);
    s.tick(t0 + ms(10)).unwrap();
    s.dispose();
    assert_eq!(s.state(), PlaybackState::Idle);
    assert!(!s.has_source());
    assert!(s.frame().is_none());
    assert_eq!(s.tick(t0 + ms(20)).unwrap(), TickOutcome::Idle);
    assert!(!s.settle(Duration::from_millis(1), t0 + ms(30)).unwrap());
}
