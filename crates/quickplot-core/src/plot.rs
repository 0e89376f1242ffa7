// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The owned per-plot handle.
//!
//! A [`Plot`] is created by a constructor (`init`) and destroyed by
//! [`Plot::delete`] or by dropping it; either way the surface is released
//! once. Using a plot after delete is impossible in safe Rust. Binding
//! layers that hand out raw handles must guard against reuse themselves.

use crate::color::Rgb;
use crate::defaults::PlotDefaults;
use crate::error::PlotError;
use crate::render_loop::RenderLoop;
use crate::render_thread::RenderThread;
use crate::scheduler::{
    force_redraw, try_commit_and_draw, Cooperative, FrameDriver, UpdatePolicy, UpdateStatus,
};
use crate::state::{PlotConfig, PlotId, PlotState};
use crate::surface::{Surface, SurfaceError};
use crate::vertex::{Series, VertexBuffer};
use crate::view::{Bounds, GridLine};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// One live plot window.
pub struct Plot<D: FrameDriver> {
    driver: D,
}

impl<S: Surface> Plot<Cooperative<S>> {
    /// Plot driven from the caller's thread. Every update call services
    /// window input; call [`Plot::pump`] to stay responsive while idle.
    #[instrument(skip(surface, defaults))]
    pub fn new(surface: S, title: &str, defaults: &PlotDefaults) -> Self {
        let state = Arc::new(PlotState::new(title, defaults));
        info!(plot = %state.id(), "plot opened");
        Self {
            driver: Cooperative::new(RenderLoop::new(surface, state)),
        }
    }

    /// Service window input for up to `timeout` without drawing new data.
    pub fn pump(&mut self, timeout: Duration) {
        self.driver.pump(timeout);
    }
}

impl Plot<RenderThread> {
    /// Plot whose render loop runs on a dedicated thread; `factory` builds
    /// the surface on that thread.
    #[instrument(skip(defaults, factory))]
    pub fn spawn<S, F>(
        title: &str,
        defaults: &PlotDefaults,
        factory: F,
    ) -> Result<Self, PlotError>
    where
        S: Surface + 'static,
        F: FnOnce() -> Result<S, SurfaceError> + Send + 'static,
    {
        let state = Arc::new(PlotState::new(title, defaults));
        let driver = RenderThread::spawn(Arc::clone(&state), factory)?;
        info!(plot = %state.id(), "plot opened on render thread");
        Ok(Self { driver })
    }
}

impl<D: FrameDriver> Plot<D> {
    fn state(&self) -> &PlotState {
        self.driver.state()
    }

    /// Process-unique plot identity.
    pub fn id(&self) -> PlotId {
        self.state().id()
    }

    /// Window title.
    pub fn title(&self) -> &str {
        self.state().title()
    }

    /// Commit `series` and draw it now, regardless of the frame clock.
    pub fn update(&mut self, series: Series<'_>) -> UpdateStatus {
        try_commit_and_draw(&mut self.driver, series, UpdatePolicy::Immediate)
    }

    /// Commit and draw only if a frame is due; otherwise the data is
    /// discarded and [`UpdateStatus::NotReady`] returned.
    pub fn update_if_ready(&mut self, series: Series<'_>) -> UpdateStatus {
        try_commit_and_draw(&mut self.driver, series, UpdatePolicy::IfReady)
    }

    /// Block until a frame is due (or the window closes), then commit and
    /// draw.
    pub fn update_wait(&mut self, series: Series<'_>) -> UpdateStatus {
        try_commit_and_draw(&mut self.driver, series, UpdatePolicy::Wait)
    }

    /// Redraw the committed buffer, ignoring the frame clock.
    pub fn redraw(&mut self) -> UpdateStatus {
        force_redraw(&mut self.driver)
    }

    /// Whether the window has been closed.
    pub fn is_closed(&self) -> bool {
        self.state().is_closed()
    }

    /// Set the view rectangle. Rejected bounds leave the old ones in place.
    pub fn set_bounds(
        &self,
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    ) -> Result<(), PlotError> {
        self.state().set_bounds(x_min, x_max, y_min, y_max)
    }

    /// Current view rectangle.
    pub fn bounds(&self) -> Bounds {
        self.state().bounds()
    }

    /// Vertical grid lines.
    pub fn set_grid_x(&self, anchor: f64, interval: f64, color: Rgb) {
        self.state().set_grid_x(GridLine {
            anchor,
            interval,
            color,
        });
    }

    /// Horizontal grid lines.
    pub fn set_grid_y(&self, anchor: f64, interval: f64, color: Rgb) {
        self.state().set_grid_y(GridLine {
            anchor,
            interval,
            color,
        });
    }

    /// Color for points supplied without colors.
    pub fn set_point_color(&self, color: Rgb) {
        self.state().set_point_color(color);
    }

    /// Marker width in pixels.
    pub fn set_point_size(&self, pixels: f32) -> Result<(), PlotError> {
        self.state().set_point_size(pixels)
    }

    /// Point opacity in `[0, 1]`.
    pub fn set_point_alpha(&self, alpha: f32) -> Result<(), PlotError> {
        self.state().set_point_alpha(alpha)
    }

    /// Polyline (`true`) or scatter (`false`).
    pub fn set_connected(&self, connected: bool) {
        self.state().set_connected(connected);
    }

    /// Clear color.
    pub fn set_bg_color(&self, color: Rgb) {
        self.state().set_background(color);
    }

    /// Frame cap in frames per second; `<= 0` uncaps.
    pub fn set_framerate(&self, framerate: f64) {
        self.state().set_framerate(framerate);
    }

    /// Current frame cap.
    pub fn framerate(&self) -> f64 {
        self.state().framerate()
    }

    /// Configuration snapshot.
    pub fn config(&self) -> PlotConfig {
        self.state().config()
    }

    /// The committed vertex buffer.
    pub fn vertices(&self) -> Arc<VertexBuffer> {
        self.state().vertices()
    }

    /// Number of data draws so far.
    pub fn draw_count(&self) -> u64 {
        self.state().draw_count()
    }

    /// Whether grid lines are currently shown.
    pub fn grid_visible(&self) -> bool {
        self.state().grid_visible()
    }

    /// Destroy the plot and release its window.
    pub fn delete(self) {
        drop(self);
    }
}

impl<D: FrameDriver> Drop for Plot<D> {
    fn drop(&mut self) {
        self.driver.shutdown();
        info!(plot = %self.driver.state().id(), "plot deleted");
    }
}

impl<D: FrameDriver> std::fmt::Debug for Plot<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plot")
            .field("id", &self.id())
            .field("title", &self.title())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
