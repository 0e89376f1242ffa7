// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-plot state shared between the caller's thread and the render loop.
//!
//! Configuration is written by the caller and read by the render loop once
//! per frame; a value set mid-frame shows up on the next frame. The vertex
//! buffer is swapped as a whole `Arc` under a lock, so a draw always sees
//! one complete commit. The closed flag is written only by the render side.

use crate::clock::FrameClock;
use crate::color::Rgb;
use crate::defaults::PlotDefaults;
use crate::error::PlotError;
use crate::vertex::VertexBuffer;
use crate::view::{Bounds, GridLine};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing::warn;

/// Process-unique identity of a live plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlotId(u64);

impl PlotId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value (stable for the plot's lifetime).
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "plot#{}", self.0)
    }
}

/// Caller-controlled appearance of a plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    /// Visible data rectangle.
    pub bounds: Bounds,
    /// Clear color.
    pub background: Rgb,
    /// Color for points without a per-point color.
    pub point_color: Rgb,
    /// Point opacity in `[0, 1]`.
    pub point_alpha: f32,
    /// Marker width in pixels.
    pub point_size: f32,
    /// Polyline instead of markers.
    pub connected: bool,
    /// Vertical grid lines.
    pub grid_x: GridLine,
    /// Horizontal grid lines.
    pub grid_y: GridLine,
}

impl From<&PlotDefaults> for PlotConfig {
    fn from(d: &PlotDefaults) -> Self {
        Self {
            bounds: d.bounds,
            background: d.background,
            point_color: d.point_color,
            point_alpha: d.point_alpha,
            point_size: d.point_size,
            connected: d.connected,
            grid_x: d.grid_x,
            grid_y: d.grid_y,
        }
    }
}

/// Shared state of one plot.
#[derive(Debug)]
pub struct PlotState {
    id: PlotId,
    title: String,
    config: RwLock<PlotConfig>,
    vertices: Mutex<Arc<VertexBuffer>>,
    clock: Mutex<FrameClock>,
    closed: AtomicBool,
    grid_visible: AtomicBool,
    help_visible: AtomicBool,
    commits: AtomicU64,
    draws: AtomicU64,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PlotState {
    /// Fresh state seeded from `defaults`, with an empty vertex buffer.
    pub fn new(title: impl Into<String>, defaults: &PlotDefaults) -> Self {
        Self {
            id: PlotId::next(),
            title: title.into(),
            config: RwLock::new(PlotConfig::from(defaults)),
            vertices: Mutex::new(Arc::new(VertexBuffer::new())),
            clock: Mutex::new(FrameClock::new(defaults.framerate)),
            closed: AtomicBool::new(false),
            grid_visible: AtomicBool::new(true),
            help_visible: AtomicBool::new(false),
            commits: AtomicU64::new(0),
            draws: AtomicU64::new(0),
        }
    }

    /// Plot identity.
    pub fn id(&self) -> PlotId {
        self.id
    }

    /// Window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> PlotConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn edit_config(&self, f: impl FnOnce(&mut PlotConfig)) {
        let mut cfg = self.config.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut cfg);
    }

    /// Current view bounds.
    pub fn bounds(&self) -> Bounds {
        self.config().bounds
    }

    /// Set the view bounds. Invalid bounds are rejected and the previous
    /// bounds stay in effect.
    pub fn set_bounds(
        &self,
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    ) -> Result<(), PlotError> {
        let bounds = Bounds::new(x_min, x_max, y_min, y_max)?;
        self.edit_config(|c| c.bounds = bounds);
        Ok(())
    }

    /// Set vertical grid lines.
    pub fn set_grid_x(&self, grid: GridLine) {
        self.edit_config(|c| c.grid_x = grid);
    }

    /// Set horizontal grid lines.
    pub fn set_grid_y(&self, grid: GridLine) {
        self.edit_config(|c| c.grid_y = grid);
    }

    /// Set the default point color.
    pub fn set_point_color(&self, color: Rgb) {
        self.edit_config(|c| c.point_color = color);
    }

    /// Set the marker width in pixels; must be finite and positive.
    pub fn set_point_size(&self, pixels: f32) -> Result<(), PlotError> {
        if !(pixels.is_finite() && pixels > 0.0) {
            return Err(PlotError::InvalidPointSize(pixels));
        }
        self.edit_config(|c| c.point_size = pixels);
        Ok(())
    }

    /// Set point opacity; must lie in `[0, 1]`.
    pub fn set_point_alpha(&self, alpha: f32) -> Result<(), PlotError> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(PlotError::InvalidAlpha(alpha));
        }
        self.edit_config(|c| c.point_alpha = alpha);
        Ok(())
    }

    /// Choose polyline (`true`) or scatter (`false`) drawing.
    pub fn set_connected(&self, connected: bool) {
        self.edit_config(|c| c.connected = connected);
    }

    /// Set the clear color.
    pub fn set_background(&self, color: Rgb) {
        self.edit_config(|c| c.background = color);
    }

    /// Set the frame cap; `<= 0` uncaps. NaN is ignored and the previous
    /// cap stays in effect.
    pub fn set_framerate(&self, framerate: f64) {
        if framerate.is_nan() {
            warn!(plot = %self.id, "ignoring NaN framerate");
            return;
        }
        lock(&self.clock).set_framerate(framerate);
    }

    /// Current frame cap.
    pub fn framerate(&self) -> f64 {
        lock(&self.clock).framerate()
    }

    /// Whether a throttled update may draw at `now`.
    pub fn due_for_update(&self, now: Instant) -> bool {
        lock(&self.clock).due_for_update(now)
    }

    /// Time left before a throttled update may draw.
    pub fn time_until_due(&self, now: Instant) -> Duration {
        lock(&self.clock).time_until_due(now)
    }

    pub(crate) fn record_draw(&self, now: Instant) {
        lock(&self.clock).record_draw(now);
        self.draws.fetch_add(1, Ordering::Relaxed);
    }

    /// Replace the drawable buffer as a single swap; returns the commit
    /// generation (1 for the first commit).
    pub fn commit_vertices(&self, buffer: VertexBuffer) -> u64 {
        let next = Arc::new(buffer);
        let mut slot = lock(&self.vertices);
        *slot = next;
        self.commits.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// The most recently committed buffer.
    pub fn vertices(&self) -> Arc<VertexBuffer> {
        Arc::clone(&lock(&self.vertices))
    }

    /// Number of commits so far.
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::Acquire)
    }

    /// Number of data draws (updates and redraws) so far.
    pub fn draw_count(&self) -> u64 {
        self.draws.load(Ordering::Relaxed)
    }

    /// True once the window has been closed; terminal.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub(crate) fn mark_closed(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Whether grid lines are currently shown (hotkey-controlled).
    pub fn grid_visible(&self) -> bool {
        self.grid_visible.load(Ordering::Relaxed)
    }

    pub(crate) fn toggle_grid(&self) {
        self.grid_visible.fetch_xor(true, Ordering::Relaxed);
    }

    /// Whether the hotkey help overlay is shown.
    pub fn help_visible(&self) -> bool {
        self.help_visible.load(Ordering::Relaxed)
    }

    pub(crate) fn toggle_help(&self) {
        self.help_visible.fetch_xor(true, Ordering::Relaxed);
    }
}
