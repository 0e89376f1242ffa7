// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Update scheduling: the three update semantics over one frame clock.
//!
//! `update`, `update_if_ready` and `update_wait` are a single primitive,
//! [`try_commit_and_draw`], parameterized by [`UpdatePolicy`]. It is written
//! against [`FrameDriver`], so the same gating rule applies whether the render
//! loop runs on the caller's thread ([`Cooperative`]) or its own
//! ([`crate::render_thread::RenderThread`]).

use crate::render_loop::RenderLoop;
use crate::state::PlotState;
use crate::surface::Surface;
use crate::vertex::{build, Series};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Upper bound on how long `update_wait` sleeps between close checks.
pub const POLL_INTERVAL: Duration = Duration::from_millis(4);

/// Outcome of an update call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateStatus {
    /// Data committed and drawn.
    Ok,
    /// The window is closed; nothing was drawn.
    Closed,
    /// Frame not due; data discarded (`update_if_ready` only).
    NotReady,
    /// Input was missing x or y; previous buffer kept.
    Rejected,
}

impl UpdateStatus {
    /// Integer code used at the binding boundary.
    pub const fn code(self) -> i32 {
        match self {
            Self::Ok => 1,
            Self::Closed => 0,
            Self::NotReady => 2,
            Self::Rejected => -1,
        }
    }

    /// Inverse of [`UpdateStatus::code`].
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Ok),
            0 => Some(Self::Closed),
            2 => Some(Self::NotReady),
            -1 => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Ok => "ok",
            Self::Closed => "closed",
            Self::NotReady => "not-ready",
            Self::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// How an update interacts with the frame clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdatePolicy {
    /// Commit and draw regardless of the clock.
    Immediate,
    /// Commit and draw only if a frame is due; otherwise drop the data.
    IfReady,
    /// Block until a frame is due, then commit and draw.
    Wait,
}

/// Capability the scheduler needs from whatever runs the render loop.
pub trait FrameDriver {
    /// Shared state of the driven plot.
    fn state(&self) -> &Arc<PlotState>;
    /// Let the render side service input for up to `timeout`.
    /// A zero timeout must return without waiting.
    fn idle(&mut self, timeout: Duration);
    /// Draw the committed buffer now. Returns `false` if the plot is closed.
    fn draw_now(&mut self) -> bool;
    /// Stop the render side and release the surface.
    fn shutdown(&mut self);
}

/// Single-threaded driver: the caller's thread owns the render loop and
/// ticks it from inside every update call.
pub struct Cooperative<S: Surface> {
    render: RenderLoop<S>,
}

impl<S: Surface> Cooperative<S> {
    /// Wrap a render loop.
    pub fn new(render: RenderLoop<S>) -> Self {
        Self { render }
    }

    /// Service input without drawing data; hotkeys still repaint.
    /// Use this to keep the window responsive while not updating.
    pub fn pump(&mut self, timeout: Duration) {
        self.idle(timeout);
    }
}

impl<S: Surface> FrameDriver for Cooperative<S> {
    fn state(&self) -> &Arc<PlotState> {
        self.render.state()
    }

    fn idle(&mut self, timeout: Duration) {
        if self.render.process_events(timeout) {
            self.render.repaint();
        }
    }

    fn draw_now(&mut self) -> bool {
        self.render.redraw()
    }

    fn shutdown(&mut self) {
        self.render.release();
    }
}

/// Build, gate, commit and draw. All three update entry points land here.
///
/// Malformed input is rejected before anything else; the closed flag is
/// checked before any commit or surface access.
pub fn try_commit_and_draw<D>(
    driver: &mut D,
    series: Series<'_>,
    policy: UpdatePolicy,
) -> UpdateStatus
where
    D: FrameDriver + ?Sized,
{
    let buffer = match build(series) {
        Ok(buffer) => buffer,
        Err(err) => {
            debug!(plot = %driver.state().id(), %err, "update rejected");
            return UpdateStatus::Rejected;
        }
    };
    driver.idle(Duration::ZERO);
    let state = Arc::clone(driver.state());
    if state.is_closed() {
        return UpdateStatus::Closed;
    }
    match policy {
        UpdatePolicy::Immediate => {}
        UpdatePolicy::IfReady => {
            if !state.due_for_update(Instant::now()) {
                debug!(plot = %state.id(), "frame not due; update dropped");
                return UpdateStatus::NotReady;
            }
        }
        UpdatePolicy::Wait => loop {
            let remaining = state.time_until_due(Instant::now());
            if remaining.is_zero() {
                break;
            }
            driver.idle(remaining.min(POLL_INTERVAL));
            if state.is_closed() {
                return UpdateStatus::Closed;
            }
        },
    }
    state.commit_vertices(buffer);
    if driver.draw_now() {
        UpdateStatus::Ok
    } else {
        UpdateStatus::Closed
    }
}

/// Draw the committed buffer unconditionally (stamps the clock).
pub fn force_redraw<D>(driver: &mut D) -> UpdateStatus
where
    D: FrameDriver + ?Sized,
{
    driver.idle(Duration::ZERO);
    if driver.state().is_closed() || !driver.draw_now() {
        return UpdateStatus::Closed;
    }
    UpdateStatus::Ok
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::defaults::PlotDefaults;
    use crate::headless::{HeadlessHandle, HeadlessSurface};
    use crate::surface::InputEvent;

    fn driver(framerate: f64) -> (Cooperative<HeadlessSurface>, HeadlessHandle) {
        let defaults = PlotDefaults {
            framerate,
            ..PlotDefaults::default()
        };
        let state = Arc::new(PlotState::new("t", &defaults));
        let (surface, handle) = HeadlessSurface::new();
        (Cooperative::new(RenderLoop::new(surface, state)), handle)
    }

    #[test]
    fn codes_match_binding_contract() {
        assert_eq!(UpdateStatus::Ok.code(), 1);
        assert_eq!(UpdateStatus::Closed.code(), 0);
        assert_eq!(UpdateStatus::NotReady.code(), 2);
        assert_eq!(UpdateStatus::Rejected.code(), -1);
        for s in [
            UpdateStatus::Ok,
            UpdateStatus::Closed,
            UpdateStatus::NotReady,
            UpdateStatus::Rejected,
        ] {
            assert_eq!(UpdateStatus::from_code(s.code()), Some(s));
        }
        assert_eq!(UpdateStatus::from_code(7), None);
    }

    #[test]
    fn rejected_input_keeps_previous_buffer() {
        let (mut d, handle) = driver(60.0);
        let xs = [1.0, 2.0];
        let status = try_commit_and_draw(&mut d, Series::new(&xs, &xs), UpdatePolicy::Immediate);
        assert_eq!(status, UpdateStatus::Ok);
        let status = try_commit_and_draw(
            &mut d,
            Series::from_parts(None, Some(&xs), None),
            UpdatePolicy::Immediate,
        );
        assert_eq!(status, UpdateStatus::Rejected);
        assert_eq!(d.state().vertices().len(), 2);
        assert_eq!(d.state().commit_count(), 1);
        assert_eq!(handle.frames().len(), 1);
    }

    #[test]
    fn if_ready_drops_data_inside_the_interval() {
        let (mut d, handle) = driver(1.0);
        let a = [0.0];
        let b = [0.0, 1.0];
        assert_eq!(
            try_commit_and_draw(&mut d, Series::new(&a, &a), UpdatePolicy::IfReady),
            UpdateStatus::Ok
        );
        assert_eq!(
            try_commit_and_draw(&mut d, Series::new(&b, &b), UpdatePolicy::IfReady),
            UpdateStatus::NotReady
        );
        assert_eq!(d.state().vertices().len(), 1);
        assert_eq!(handle.frames().len(), 1);
    }

    #[test]
    fn uncapped_framerate_makes_every_policy_immediate() {
        let (mut d, handle) = driver(0.0);
        let a = [0.0];
        for policy in [UpdatePolicy::IfReady, UpdatePolicy::Wait, UpdatePolicy::IfReady] {
            assert_eq!(
                try_commit_and_draw(&mut d, Series::new(&a, &a), policy),
                UpdateStatus::Ok
            );
        }
        assert_eq!(handle.frames().len(), 3);
    }

    #[test]
    fn close_is_observed_before_commit() {
        let (mut d, handle) = driver(60.0);
        handle.push_event(InputEvent::CloseRequested);
        let a = [0.0];
        for policy in [UpdatePolicy::Immediate, UpdatePolicy::IfReady, UpdatePolicy::Wait] {
            assert_eq!(
                try_commit_and_draw(&mut d, Series::new(&a, &a), policy),
                UpdateStatus::Closed
            );
        }
        assert_eq!(d.state().commit_count(), 0);
        assert!(handle.frames().is_empty());
        assert_eq!(force_redraw(&mut d), UpdateStatus::Closed);
    }

    #[test]
    fn wait_returns_closed_when_window_closes_mid_wait() {
        let (mut d, handle) = driver(0.5);
        let a = [0.0];
        assert_eq!(
            try_commit_and_draw(&mut d, Series::new(&a, &a), UpdatePolicy::Wait),
            UpdateStatus::Ok
        );
        // next frame is two seconds out; close arrives on a later poll
        handle.push_event_after(InputEvent::CloseRequested, 3);
        let started = Instant::now();
        assert_eq!(
            try_commit_and_draw(&mut d, Series::new(&a, &a), UpdatePolicy::Wait),
            UpdateStatus::Closed
        );
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn hotkey_during_wait_repaints_without_stamping() {
        let (mut d, handle) = driver(20.0);
        let a = [0.0];
        try_commit_and_draw(&mut d, Series::new(&a, &a), UpdatePolicy::Immediate);
        handle.push_event(InputEvent::ToggleHelp);
        assert_eq!(
            try_commit_and_draw(&mut d, Series::new(&a, &a), UpdatePolicy::Wait),
            UpdateStatus::Ok
        );
        assert!(d.state().help_visible());
        assert_eq!(d.state().draw_count(), 2);
        assert_eq!(handle.frames().len(), 3);
    }
}
