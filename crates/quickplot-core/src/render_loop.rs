// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The render loop: sole owner of a plot's [`Surface`].
//!
//! Each tick services input (hotkeys, close), then, unless the plot is
//! closed, transforms the committed buffer through the view and presents it.
//! Closing is checked before the surface is touched, and the surface is
//! released exactly once.

use crate::state::{PlotConfig, PlotState};
use crate::surface::{Frame, GridSegment, InputEvent, PlotPoint, Surface, Topology};
use crate::view::ViewTransform;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Drives one plot's surface.
pub struct RenderLoop<S: Surface> {
    surface: S,
    state: Arc<PlotState>,
    events: Vec<InputEvent>,
    released: bool,
}

impl<S: Surface> RenderLoop<S> {
    /// Take ownership of `surface` for the plot described by `state`.
    pub fn new(surface: S, state: Arc<PlotState>) -> Self {
        Self {
            surface,
            state,
            events: Vec::new(),
            released: false,
        }
    }

    /// Shared plot state.
    pub fn state(&self) -> &Arc<PlotState> {
        &self.state
    }

    /// Service pending input, waiting up to `timeout` for the first event.
    ///
    /// Returns `true` when a hotkey or resize asks for a repaint.
    pub fn process_events(&mut self, timeout: Duration) -> bool {
        if self.released {
            return false;
        }
        let mut events = std::mem::take(&mut self.events);
        events.clear();
        self.surface.poll_events(timeout, &mut events);
        let mut repaint = false;
        for ev in events.drain(..) {
            match ev {
                InputEvent::CloseRequested => {
                    self.close();
                    repaint = false;
                    break;
                }
                InputEvent::ToggleGrid => {
                    self.state.toggle_grid();
                    debug!(plot = %self.state.id(), visible = self.state.grid_visible(), "grid toggled");
                    repaint = true;
                }
                InputEvent::ToggleHelp => {
                    self.state.toggle_help();
                    repaint = true;
                }
                InputEvent::Resized { width, height } => {
                    debug!(plot = %self.state.id(), width, height, "surface resized");
                    repaint = true;
                }
            }
        }
        self.events = events;
        repaint
    }

    /// Draw the committed buffer now, ignoring the frame clock, and stamp
    /// the clock. Returns `false` if the plot is closed.
    pub fn redraw(&mut self) -> bool {
        self.draw(true)
    }

    /// Repaint the committed buffer without stamping the frame clock
    /// (used for hotkey toggles and resizes).
    pub fn repaint(&mut self) -> bool {
        self.draw(false)
    }

    fn draw(&mut self, stamp: bool) -> bool {
        if self.released || self.state.is_closed() {
            return false;
        }
        let frame = compose_frame(&self.state);
        match self.surface.present(&frame) {
            Ok(()) => {}
            Err(err) if err.is_fatal() => {
                error!(plot = %self.state.id(), %err, "surface failed; closing plot");
                self.close();
                return false;
            }
            Err(err) => {
                warn!(plot = %self.state.id(), %err, "frame dropped");
            }
        }
        if stamp {
            self.state.record_draw(Instant::now());
        }
        true
    }

    /// Free the surface and mark the plot closed.
    pub fn close(&mut self) {
        if !self.state.is_closed() {
            info!(plot = %self.state.id(), title = self.state.title(), "plot closed");
        }
        self.release();
        self.state.mark_closed();
    }

    /// Free the surface if that has not happened yet.
    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.surface.release();
        }
    }
}

impl<S: Surface> Drop for RenderLoop<S> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Build the frame for the state's current configuration and buffer.
pub fn compose_frame(state: &PlotState) -> Frame {
    let cfg = state.config();
    let vertices = state.vertices();
    let view = ViewTransform::new(&cfg.bounds);
    let points = vertices
        .iter()
        .map(|v| PlotPoint {
            pos: view.to_device(v.x, v.y).to_array(),
            color: v.color.unwrap_or(cfg.point_color),
        })
        .collect();
    let grid = if state.grid_visible() {
        grid_segments(&cfg, &view)
    } else {
        Vec::new()
    };
    Frame {
        background: cfg.background,
        points,
        alpha: cfg.point_alpha,
        topology: if cfg.connected {
            Topology::LineStrip
        } else {
            Topology::Points {
                size_px: cfg.point_size,
            }
        },
        grid,
        show_help: state.help_visible(),
    }
}

fn grid_segments(cfg: &PlotConfig, view: &ViewTransform) -> Vec<GridSegment> {
    let b = &cfg.bounds;
    let verticals = cfg
        .grid_x
        .positions(b.x_min(), b.x_max())
        .into_iter()
        .map(|x| {
            let dx = view.device_x(x);
            GridSegment {
                from: [dx, -1.0],
                to: [dx, 1.0],
                color: cfg.grid_x.color,
            }
        });
    let horizontals = cfg
        .grid_y
        .positions(b.y_min(), b.y_max())
        .into_iter()
        .map(|y| {
            let dy = view.device_y(y);
            GridSegment {
                from: [-1.0, dy],
                to: [1.0, dy],
                color: cfg.grid_y.color,
            }
        });
    verticals.chain(horizontals).collect()
}
