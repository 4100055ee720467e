use super::*;

#[test]
fn empty_monitor_reports_zero() {
    let m = PerformanceMonitor::default();
    assert_eq!(m.metrics(), PerfMetrics::default());
}

#[test]
fn steady_frames_average_out() {
    let t0 = Instant::now();
    let mut m = PerformanceMonitor::new(60);
    for i in 0..=10u64 {
        m.record_frame(t0 + Duration::from_millis(i * 20));
    }
    let metrics = m.metrics();
    assert_eq!(metrics.samples, 10);
    assert_eq!(metrics.fps, 50);
    assert_eq!(metrics.frame_time_ms, 20.0);
}

#[test]
fn window_keeps_latest_intervals() {
    let t0 = Instant::now();
    let mut m = PerformanceMonitor::new(3);
    let mut t = t0;
    m.record_frame(t);
    for ms in [100, 100, 10, 10, 10] {
        t += Duration::from_millis(ms);
        m.record_frame(t);
    }
    let metrics = m.metrics();
    assert_eq!(metrics.samples, 3);
    assert_eq!(metrics.fps, 100);
    assert_eq!(metrics.frame_time_ms, 10.0);
}

#[test]
fn reset_restarts_the_clock() {
    let t0 = Instant::now();
    let mut m = PerformanceMonitor::new(10);
    m.record_frame(t0);
    m.record_frame(t0 + Duration::from_millis(16));
    m.reset();
    assert_eq!(m.metrics().samples, 0);
    m.record_frame(t0 + Duration::from_secs(5));
    assert_eq!(m.metrics().samples, 0);
}
