// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! View bounds, the data→device transform, and grid line generation.
//!
//! The view rectangle is stretched onto the whole drawable area: aspect ratio
//! is not preserved, so `[x_min, x_max] × [y_min, y_max]` always maps exactly
//! onto normalised device coordinates `[-1, 1] × [-1, 1]`.

use crate::color::Rgb;
use crate::error::PlotError;
use glam::{DVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Upper bound on generated grid lines per axis.
pub const MAX_GRID_LINES: usize = 512;

/// Visible data-space rectangle. Always satisfies `x_min < x_max` and
/// `y_min < y_max` with finite values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct Bounds {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Bounds {
    /// Validate and build bounds. Both spans must also be finite, so the
    /// view transform never divides by an overflowed width.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self, PlotError> {
        let finite = [x_min, x_max, y_min, y_max, x_max - x_min, y_max - y_min]
            .iter()
            .all(|v| v.is_finite());
        if finite && x_min < x_max && y_min < y_max {
            Ok(Self {
                x_min,
                x_max,
                y_min,
                y_max,
            })
        } else {
            Err(PlotError::InvalidBounds {
                x_min,
                x_max,
                y_min,
                y_max,
            })
        }
    }

    /// Left edge.
    pub fn x_min(&self) -> f64 {
        self.x_min
    }
    /// Right edge.
    pub fn x_max(&self) -> f64 {
        self.x_max
    }
    /// Bottom edge.
    pub fn y_min(&self) -> f64 {
        self.y_min
    }
    /// Top edge.
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// `(x_min, x_max, y_min, y_max)`.
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.x_min, self.x_max, self.y_min, self.y_max)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            x_min: -1.0,
            x_max: 1.0,
            y_min: -1.0,
            y_max: 1.0,
        }
    }
}

impl TryFrom<[f64; 4]> for Bounds {
    type Error = PlotError;

    fn try_from([x_min, x_max, y_min, y_max]: [f64; 4]) -> Result<Self, Self::Error> {
        Self::new(x_min, x_max, y_min, y_max)
    }
}

impl From<Bounds> for [f64; 4] {
    fn from(b: Bounds) -> Self {
        [b.x_min, b.x_max, b.y_min, b.y_max]
    }
}

/// Grid descriptor for one axis: lines at `anchor + k * interval`.
///
/// A non-positive interval is legal and simply draws nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    /// A coordinate where one line sits exactly.
    pub anchor: f64,
    /// Spacing between lines.
    pub interval: f64,
    /// Line color.
    pub color: Rgb,
}

impl Default for GridLine {
    fn default() -> Self {
        Self {
            anchor: 0.0,
            interval: 0.0,
            color: Rgb::from_hex(0x808080),
        }
    }
}

impl GridLine {
    /// Line coordinates inside `[min, max]`, ascending, at most
    /// [`MAX_GRID_LINES`] of them.
    pub fn positions(&self, min: f64, max: f64) -> Vec<f64> {
        let usable = self.interval > 0.0
            && self.interval.is_finite()
            && self.anchor.is_finite()
            && min.is_finite()
            && max.is_finite();
        if !usable || min > max {
            return Vec::new();
        }
        let first = ((min - self.anchor) / self.interval).ceil();
        let mut out = Vec::new();
        // one spare step: rounding can put the first candidate just below min
        for k in 0..=MAX_GRID_LINES {
            if out.len() == MAX_GRID_LINES {
                break;
            }
            #[allow(clippy::cast_precision_loss)]
            let v = self.anchor + (first + k as f64) * self.interval;
            if v > max {
                break;
            }
            if v >= min && out.last().is_none_or(|&last| v > last) {
                out.push(v);
            }
        }
        out
    }
}

/// Linear map from data space to normalised device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    origin: DVec2,
    scale: DVec2,
}

impl ViewTransform {
    /// Transform for the given view bounds.
    pub fn new(bounds: &Bounds) -> Self {
        let min = DVec2::new(bounds.x_min, bounds.y_min);
        let max = DVec2::new(bounds.x_max, bounds.y_max);
        Self {
            origin: min,
            scale: DVec2::splat(2.0) / (max - min),
        }
    }

    /// Map a data-space point into device coordinates (`[-1, 1]` when inside
    /// the view; points outside land outside and are clipped by the GPU).
    pub fn to_device(&self, x: f64, y: f64) -> Vec2 {
        ((DVec2::new(x, y) - self.origin) * self.scale - DVec2::ONE).as_vec2()
    }

    /// Device x for a data-space x.
    pub fn device_x(&self, x: f64) -> f32 {
        self.to_device(x, self.origin.y).x
    }

    /// Device y for a data-space y.
    pub fn device_y(&self, y: f64) -> f32 {
        self.to_device(self.origin.x, y).y
    }
}
