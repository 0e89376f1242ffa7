// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Defaults applied to every new plot (style, pacing, window size).

use crate::color::Rgb;
use crate::view::{Bounds, GridLine};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Saved defaults for new plots. Missing fields take built-in values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotDefaults {
    /// Target frames per second; `<= 0` uncaps.
    pub framerate: f64,
    /// Clear color.
    pub background: Rgb,
    /// Color for points supplied without per-point colors.
    pub point_color: Rgb,
    /// Point opacity in `[0, 1]`.
    pub point_alpha: f32,
    /// Marker width in pixels (ignored when connected).
    pub point_size: f32,
    /// Draw a polyline instead of markers.
    pub connected: bool,
    /// Initial view rectangle.
    pub bounds: Bounds,
    /// Vertical grid lines.
    pub grid_x: GridLine,
    /// Horizontal grid lines.
    pub grid_y: GridLine,
    /// Initial window size.
    pub window: WindowPrefs,
}

/// Initial window geometry in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowPrefs {
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl Default for WindowPrefs {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

impl Default for PlotDefaults {
    fn default() -> Self {
        Self {
            framerate: 60.0,
            background: Rgb::BLACK,
            point_color: Rgb::from_hex(0xffff33),
            point_alpha: 1.0,
            point_size: 1.0,
            connected: false,
            bounds: Bounds::default(),
            grid_x: GridLine::default(),
            grid_y: GridLine::default(),
            window: WindowPrefs::default(),
        }
    }
}

impl PlotDefaults {
    /// Replace out-of-range values with built-ins, field by field.
    pub fn sanitized(mut self) -> Self {
        let builtin = Self::default();
        if !(self.point_alpha >= 0.0 && self.point_alpha <= 1.0) {
            warn!(alpha = self.point_alpha, "ignoring configured point alpha");
            self.point_alpha = builtin.point_alpha;
        }
        if !(self.point_size.is_finite() && self.point_size > 0.0) {
            warn!(size = self.point_size, "ignoring configured point size");
            self.point_size = builtin.point_size;
        }
        if self.framerate.is_nan() {
            warn!("ignoring NaN framerate");
            self.framerate = builtin.framerate;
        }
        if self.window.width == 0 || self.window.height == 0 {
            warn!(
                width = self.window.width,
                height = self.window.height,
                "ignoring zero-sized window"
            );
            self.window = builtin.window;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn partial_json_fills_in_builtins() {
        let d: PlotDefaults =
            serde_json::from_str(r#"{ "framerate": 30.0, "background": 16777215 }"#).unwrap();
        assert!((d.framerate - 30.0).abs() < f64::EPSILON);
        assert_eq!(d.background, Rgb::WHITE);
        assert_eq!(d.point_color, Rgb::from_hex(0xffff33));
        assert_eq!(d.window, WindowPrefs::default());
    }

    #[test]
    fn sanitize_repairs_out_of_range_values() {
        let d = PlotDefaults {
            point_alpha: 3.0,
            point_size: -1.0,
            framerate: f64::NAN,
            window: WindowPrefs {
                width: 0,
                height: 10,
            },
            ..PlotDefaults::default()
        }
        .sanitized();
        assert!((d.point_alpha - 1.0).abs() < f32::EPSILON);
        assert!((d.point_size - 1.0).abs() < f32::EPSILON);
        assert!((d.framerate - 60.0).abs() < f64::EPSILON);
        assert_eq!(d.window, WindowPrefs::default());
    }

    #[test]
    fn uncapped_framerate_survives_sanitize() {
        let d = PlotDefaults {
            framerate: 0.0,
            ..PlotDefaults::default()
        }
        .sanitized();
        assert!(d.framerate.abs() < f64::EPSILON);
    }
}
