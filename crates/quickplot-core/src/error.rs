// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type for plot construction and configuration.

use crate::surface::SurfaceError;
use thiserror::Error;

/// Errors surfaced by plot setters and constructors.
///
/// Setter errors are local and non-fatal: the previous value stays in effect.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlotError {
    /// View bounds were non-finite or not strictly increasing.
    #[error("invalid bounds: x [{x_min}, {x_max}], y [{y_min}, {y_max}]")]
    InvalidBounds {
        /// Requested left edge.
        x_min: f64,
        /// Requested right edge.
        x_max: f64,
        /// Requested bottom edge.
        y_min: f64,
        /// Requested top edge.
        y_max: f64,
    },
    /// Point size must be finite and positive.
    #[error("point size must be positive and finite, got {0}")]
    InvalidPointSize(f32),
    /// Point alpha must lie in `[0, 1]`.
    #[error("point alpha must lie in [0, 1], got {0}")]
    InvalidAlpha(f32),
    /// The backend could not create the plot's surface.
    #[error("surface creation failed: {0}")]
    Surface(#[from] SurfaceError),
    /// The render thread went away before reporting its surface.
    #[error("render thread terminated before the surface was ready")]
    RenderThreadLost,
}
