// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Port trait for the window/GPU backend, plus the frame it consumes.
//!
//! The render loop is the only caller of a [`Surface`]; backends never see
//! plot state directly, only finished [`Frame`]s.

use crate::color::Rgb;
use std::time::Duration;
use thiserror::Error;

/// Input the backend reports, already mapped from raw window events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// OS close button, or the `Esc`/`Q` hotkeys.
    CloseRequested,
    /// `G`: flip grid visibility.
    ToggleGrid,
    /// `H`: flip the help overlay.
    ToggleHelp,
    /// Drawable area changed size (physical pixels).
    Resized {
        /// New width.
        width: u32,
        /// New height.
        height: u32,
    },
}

/// A point after the view transform, in normalised device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    /// Device-space position.
    pub pos: [f32; 2],
    /// Resolved color (per-point or the plot default).
    pub color: Rgb,
}

/// A grid line segment in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSegment {
    /// Start point.
    pub from: [f32; 2],
    /// End point.
    pub to: [f32; 2],
    /// Line color.
    pub color: Rgb,
}

/// How the committed points are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Topology {
    /// Discrete square markers of the given width in pixels.
    Points {
        /// Marker width in pixels.
        size_px: f32,
    },
    /// One polyline through the points in input order.
    LineStrip,
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Clear color.
    pub background: Rgb,
    /// Points in input order.
    pub points: Vec<PlotPoint>,
    /// Alpha applied to every point.
    pub alpha: f32,
    /// Marker or polyline drawing.
    pub topology: Topology,
    /// Grid lines (empty when hidden or not configured).
    pub grid: Vec<GridSegment>,
    /// Whether to draw the hotkey help overlay.
    pub show_help: bool,
}

/// Hotkey reference shown by the help overlay.
pub const HOTKEY_HELP: &[(&str, &str)] = &[
    ("G", "toggle grid"),
    ("H", "toggle this help"),
    ("Esc / Q", "close the plot"),
];

/// Backend failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The swapchain/surface was lost and could not be recovered.
    #[error("surface lost")]
    Lost,
    /// The GPU ran out of memory; fatal for this plot.
    #[error("out of GPU memory")]
    OutOfMemory,
    /// The platform cannot host this surface (e.g. wrong thread).
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// Any other backend error.
    #[error("backend error: {0}")]
    Backend(String),
}

impl SurfaceError {
    /// Whether the plot must be torn down after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SurfaceError::OutOfMemory | SurfaceError::Unsupported(_))
    }
}

/// Window + GPU capability owned by exactly one render loop.
pub trait Surface {
    /// Drain pending input into `out`, waiting at most `timeout` for the
    /// first event. Must not spin.
    fn poll_events(&mut self, timeout: Duration, out: &mut Vec<InputEvent>);
    /// Draw and present a frame.
    fn present(&mut self, frame: &Frame) -> Result<(), SurfaceError>;
    /// Free window/GPU resources. Called at most once.
    fn release(&mut self);
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn poll_events(&mut self, timeout: Duration, out: &mut Vec<InputEvent>) {
        (**self).poll_events(timeout, out);
    }

    fn present(&mut self, frame: &Frame) -> Result<(), SurfaceError> {
        (**self).present(frame)
    }

    fn release(&mut self) {
        (**self).release();
    }
}
