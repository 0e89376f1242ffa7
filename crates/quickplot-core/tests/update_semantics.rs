// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
//! End-to-end update semantics against the headless surface, in both
//! cooperative and render-thread modes.

use quickplot_core::{
    Cooperative, HeadlessHandle, HeadlessSurface, InputEvent, Plot, PlotDefaults, RenderThread,
    Rgb, Series, UpdateStatus,
};
use std::thread;
use std::time::{Duration, Instant};

fn defaults(framerate: f64) -> PlotDefaults {
    PlotDefaults {
        framerate,
        ..PlotDefaults::default()
    }
}

fn cooperative(framerate: f64) -> (Plot<Cooperative<HeadlessSurface>>, HeadlessHandle) {
    let (surface, handle) = HeadlessSurface::new();
    (Plot::new(surface, "t", &defaults(framerate)), handle)
}

fn threaded(framerate: f64) -> (Plot<RenderThread>, HeadlessHandle) {
    let (surface, handle) = HeadlessSurface::new();
    let plot = Plot::spawn("t", &defaults(framerate), move || Ok(surface)).unwrap();
    (plot, handle)
}

#[test]
fn example_scenario_truncates_and_uses_default_color() {
    let (mut plot, handle) = cooperative(60.0);
    plot.set_bounds(0.0, 10.0, -2.0, 2.0).unwrap();

    let status = plot.update(Series::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]));
    assert_eq!(status, UpdateStatus::Ok);
    assert_eq!(status.code(), 1);
    let committed: Vec<_> = plot.vertices().positions().collect();
    assert_eq!(committed, vec![(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
    assert!(plot.vertices().iter().all(|v| v.color.is_none()));
    let frame = handle.last_frame().unwrap();
    assert!(frame
        .points
        .iter()
        .all(|p| p.color == Rgb::from_hex(0xffff33)));

    let status = plot.update(Series::new(&[0.0, 1.0], &[0.0, 1.0, 0.0]));
    assert_eq!(status, UpdateStatus::Ok);
    let committed: Vec<_> = plot.vertices().positions().collect();
    assert_eq!(committed, vec![(0.0, 0.0), (1.0, 1.0)]);
    assert_eq!(handle.last_frame().unwrap().points.len(), 2);
}

#[test]
fn if_ready_at_ten_fps_ten_ms_apart() {
    let (mut plot, handle) = cooperative(10.0);
    let a = [0.0, 1.0];
    let b = [5.0];
    assert_eq!(plot.update_if_ready(Series::new(&a, &a)), UpdateStatus::Ok);
    thread::sleep(Duration::from_millis(10));
    let second = plot.update_if_ready(Series::new(&b, &b));
    assert_eq!(second, UpdateStatus::NotReady);
    assert_eq!(second.code(), 2);
    assert_eq!(plot.vertices().len(), 2);
    assert_eq!(handle.frame_count(), 1);
}

#[test]
fn vanishingly_small_framerate_still_throttles() {
    let (mut plot, handle) = cooperative(1e-20);
    let a = [0.0, 1.0];
    assert_eq!(plot.update_if_ready(Series::new(&a, &a)), UpdateStatus::Ok);
    assert_eq!(
        plot.update_if_ready(Series::new(&a, &a)),
        UpdateStatus::NotReady
    );
    assert_eq!(handle.frame_count(), 1);
}

#[test]
fn nan_framerate_leaves_cap_in_place() {
    let (mut plot, _handle) = cooperative(60.0);
    plot.set_framerate(f64::NAN);
    assert!((plot.framerate() - 60.0).abs() < f64::EPSILON);
    let a = [0.0];
    assert_eq!(plot.update_if_ready(Series::new(&a, &a)), UpdateStatus::Ok);
    assert_eq!(
        plot.update_if_ready(Series::new(&a, &a)),
        UpdateStatus::NotReady
    );
}

#[test]
fn if_ready_at_ten_fps_one_hundred_fifty_ms_apart() {
    let (mut plot, handle) = cooperative(10.0);
    let a = [0.0, 1.0];
    let b = [5.0];
    assert_eq!(plot.update_if_ready(Series::new(&a, &a)), UpdateStatus::Ok);
    thread::sleep(Duration::from_millis(150));
    assert_eq!(plot.update_if_ready(Series::new(&b, &b)), UpdateStatus::Ok);
    assert_eq!(plot.vertices().len(), 1);
    assert_eq!(handle.frame_count(), 2);
}

#[test]
fn update_ignores_the_frame_clock() {
    let (mut plot, handle) = cooperative(1.0);
    let a = [0.0];
    for _ in 0..3 {
        assert_eq!(plot.update(Series::new(&a, &a)), UpdateStatus::Ok);
    }
    assert_eq!(plot.redraw(), UpdateStatus::Ok);
    assert_eq!(handle.frame_count(), 4);
    assert_eq!(plot.draw_count(), 4);
}

fn assert_wait_paces(gaps: &[Instant], interval: Duration, elapsed: Duration) {
    // float-to-Duration conversion of 1/framerate may lose a nanosecond
    let slack = Duration::from_micros(100);
    for pair in gaps.windows(2) {
        assert!(
            pair[1] - pair[0] + slack >= interval,
            "draws {:?} apart, interval {interval:?}",
            pair[1] - pair[0]
        );
    }
    let draws = u32::try_from(gaps.len()).unwrap();
    // average rate converges on the target from below
    assert!(elapsed + slack * draws >= interval * (draws - 1));
    assert!(elapsed < interval * draws * 4);
}

#[test]
fn wait_never_exceeds_target_rate_cooperative() {
    let (mut plot, handle) = cooperative(50.0);
    let a = [0.0];
    let started = Instant::now();
    for _ in 0..15 {
        assert_eq!(plot.update_wait(Series::new(&a, &a)), UpdateStatus::Ok);
    }
    assert_wait_paces(
        &handle.presented_at(),
        Duration::from_millis(20),
        started.elapsed(),
    );
}

#[test]
fn wait_never_exceeds_target_rate_threaded() {
    let (mut plot, handle) = threaded(50.0);
    let a = [0.0];
    let started = Instant::now();
    for _ in 0..15 {
        assert_eq!(plot.update_wait(Series::new(&a, &a)), UpdateStatus::Ok);
    }
    assert_wait_paces(
        &handle.presented_at(),
        Duration::from_millis(20),
        started.elapsed(),
    );
}

#[test]
fn every_update_after_close_reports_closed_cooperative() {
    let (mut plot, handle) = cooperative(60.0);
    let a = [0.0];
    assert_eq!(plot.update(Series::new(&a, &a)), UpdateStatus::Ok);
    handle.push_event(InputEvent::CloseRequested);
    assert_eq!(plot.update(Series::new(&a, &a)), UpdateStatus::Closed);
    assert_eq!(plot.update_if_ready(Series::new(&a, &a)), UpdateStatus::Closed);
    assert_eq!(plot.update_wait(Series::new(&a, &a)), UpdateStatus::Closed);
    assert_eq!(plot.redraw(), UpdateStatus::Closed);
    assert!(plot.is_closed());
    assert_eq!(handle.frame_count(), 1);
    assert_eq!(handle.release_count(), 1);
    assert_eq!(handle.calls_after_release(), 0);
    plot.delete();
    assert_eq!(handle.release_count(), 1);
}

#[test]
fn every_update_after_close_reports_closed_threaded() {
    let (mut plot, handle) = threaded(60.0);
    let a = [0.0];
    assert_eq!(plot.update(Series::new(&a, &a)), UpdateStatus::Ok);
    handle.push_event(InputEvent::CloseRequested);
    let deadline = Instant::now() + Duration::from_secs(2);
    while !plot.is_closed() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(plot.update(Series::new(&a, &a)), UpdateStatus::Closed);
    assert_eq!(plot.update_if_ready(Series::new(&a, &a)), UpdateStatus::Closed);
    assert_eq!(plot.update_wait(Series::new(&a, &a)), UpdateStatus::Closed);
    assert_eq!(handle.frame_count(), 1);
    assert_eq!(handle.calls_after_release(), 0);
}

#[test]
fn close_interrupts_a_pending_wait() {
    for threaded_mode in [false, true] {
        let (surface, handle) = HeadlessSurface::new();
        let d = defaults(0.5);
        let a = [0.0];
        let closer = handle.clone();
        let waiter = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            closer.push_event(InputEvent::CloseRequested);
        });
        let started = Instant::now();
        let status = if threaded_mode {
            let mut plot = Plot::spawn("t", &d, move || Ok(surface)).unwrap();
            assert_eq!(plot.update(Series::new(&a, &a)), UpdateStatus::Ok);
            plot.update_wait(Series::new(&a, &a))
        } else {
            let mut plot = Plot::new(surface, "t", &d);
            assert_eq!(plot.update(Series::new(&a, &a)), UpdateStatus::Ok);
            plot.update_wait(Series::new(&a, &a))
        };
        waiter.join().unwrap();
        assert_eq!(status, UpdateStatus::Closed);
        // the next frame was two seconds away
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(handle.frame_count(), 1);
    }
}

#[test]
fn rejected_updates_keep_the_previous_buffer() {
    let (mut plot, handle) = threaded(60.0);
    let a = [1.0, 2.0, 3.0];
    assert_eq!(plot.update(Series::new(&a, &a)), UpdateStatus::Ok);
    let status = plot.update(Series::from_parts(Some(&a), None, None));
    assert_eq!(status, UpdateStatus::Rejected);
    assert_eq!(status.code(), -1);
    assert_eq!(
        plot.update_wait(Series::from_parts(None, Some(&a), None)),
        UpdateStatus::Rejected
    );
    assert_eq!(plot.vertices().len(), 3);
    assert_eq!(handle.frame_count(), 1);
}

#[test]
fn grid_hotkey_repaints_while_caller_is_idle() {
    let (mut plot, handle) = threaded(60.0);
    plot.set_grid_x(0.0, 0.5, Rgb::WHITE);
    let a = [0.0];
    assert_eq!(plot.update(Series::new(&a, &a)), UpdateStatus::Ok);
    assert_eq!(handle.last_frame().unwrap().grid.len(), 5);
    handle.push_event(InputEvent::ToggleGrid);
    let deadline = Instant::now() + Duration::from_secs(2);
    while handle.frame_count() < 2 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(1));
    }
    assert!(!plot.grid_visible());
    assert!(handle.last_frame().unwrap().grid.is_empty());
    assert_eq!(plot.config().grid_x.interval.to_bits(), 0.5_f64.to_bits());
    assert_eq!(plot.draw_count(), 1);
}

#[test]
fn spawn_reports_surface_failure() {
    let err = Plot::spawn("t", &defaults(60.0), || {
        Err::<HeadlessSurface, _>(quickplot_core::SurfaceError::Unsupported(
            "no display".into(),
        ))
    })
    .unwrap_err();
    assert!(matches!(err, quickplot_core::PlotError::Surface(_)));
}
