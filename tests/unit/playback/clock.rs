use super::*;

#[test]
fn clock_walks_idle_running_complete() {
    let mut clock = SegmentClock::new(100, Fps::thirty(), Pacing::Offline);
    assert_eq!(clock.state(), ClockState::Idle);
    assert!(clock.next_tick().is_none());

    clock.start();
    assert_eq!(clock.state(), ClockState::Running);
    let ticks: Vec<Tick> = std::iter::from_fn(|| clock.next_tick()).collect();
    assert_eq!(ticks.len(), 3);
    assert_eq!(clock.state(), ClockState::Complete);
    assert!(clock.next_tick().is_none());
    clock.start();
    assert_eq!(clock.state(), ClockState::Complete);
}

#[test]
fn frame_count_is_ceil_of_duration_times_fps() {
    assert_eq!(SegmentClock::new(1000, Fps::thirty(), Pacing::Offline).frame_count(), 30);
    assert_eq!(SegmentClock::new(1001, Fps::thirty(), Pacing::Offline).frame_count(), 31);
    assert_eq!(SegmentClock::new(2000, Fps::thirty(), Pacing::Offline).frame_count(), 60);
}

#[test]
fn progress_is_monotonic_and_ends_at_one() {
    let ticks: Vec<Tick> = SegmentClock::new(2000, Fps::thirty(), Pacing::Offline).collect();
    assert_eq!(ticks.len(), 60);
    assert_eq!(ticks[0].progress, 0.0);
    assert_eq!(ticks[0].elapsed_ms, 0.0);
    assert!((ticks[15].elapsed_ms - 500.0).abs() < 1e-9);
    assert!((ticks[30].progress - 0.5).abs() < 1e-9);
    for pair in ticks.windows(2) {
        assert!(pair[1].progress >= pair[0].progress);
        assert_eq!(pair[1].frame, pair[0].frame + 1);
    }
    let last = ticks.last().unwrap();
    assert!(last.is_last);
    assert_eq!(last.progress, 1.0);
    assert!(ticks[..59].iter().all(|t| !t.is_last));
}

#[test]
fn real_time_pacing_waits_for_wall_clock() {
    let start = std::time::Instant::now();
    let n = SegmentClock::new(100, Fps::thirty(), Pacing::RealTime).count();
    assert_eq!(n, 3);
    assert!(start.elapsed() >= std::time::Duration::from_millis(60));
}

#[test]
fn cancel_token_is_shared_between_clones() {
    let token = CancelToken::new();
    let other = token.clone();
    assert!(!other.is_cancelled());
    token.cancel();
    assert!(other.is_cancelled());
}
