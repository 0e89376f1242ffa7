// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Vertex staging: turns caller coordinate/color arrays into a drawable buffer.
//!
//! Staging is a pure function of its inputs and runs on the caller's thread
//! before anything is handed to the render side.

use crate::color::Rgb;
use thiserror::Error;

/// One plotted point. `color == None` means "use the plot's default color".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// X coordinate in data space.
    pub x: f64,
    /// Y coordinate in data space.
    pub y: f64,
    /// Per-point color, or `None` for the default point color.
    pub color: Option<Rgb>,
}

/// Ordered sequence of vertices ready to be committed to a plot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexBuffer {
    vertices: Vec<Vertex>,
}

impl VertexBuffer {
    /// An empty buffer (what a fresh plot draws).
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
        }
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertices in input order.
    pub fn as_slice(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Iterate vertices in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, Vertex> {
        self.vertices.iter()
    }

    /// `(x, y)` pairs in input order.
    pub fn positions(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.vertices.iter().map(|v| (v.x, v.y))
    }
}

impl<'a> IntoIterator for &'a VertexBuffer {
    type Item = &'a Vertex;
    type IntoIter = std::slice::Iter<'a, Vertex>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Which coordinate array was missing from an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// The x array.
    X,
    /// The y array.
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// Reasons staging refuses an update. Never fatal: the previous buffer stays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StageError {
    /// The caller passed no array for one of the axes.
    #[error("no {0} coordinates supplied")]
    MissingCoordinates(Axis),
}

/// Borrowed view over one update's input arrays.
///
/// Any array may be absent; binding layers map a null pointer to `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Series<'a> {
    /// X coordinates.
    pub xs: Option<&'a [f64]>,
    /// Y coordinates.
    pub ys: Option<&'a [f64]>,
    /// Optional per-point colors.
    pub colors: Option<&'a [Rgb]>,
}

impl<'a> Series<'a> {
    /// Uncolored series; points use the plot's default color.
    pub fn new(xs: &'a [f64], ys: &'a [f64]) -> Self {
        Self {
            xs: Some(xs),
            ys: Some(ys),
            colors: None,
        }
    }

    /// Attach per-point colors.
    pub fn with_colors(mut self, colors: &'a [Rgb]) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Build from possibly-absent arrays, as a binding layer sees them.
    pub fn from_parts(
        xs: Option<&'a [f64]>,
        ys: Option<&'a [f64]>,
        colors: Option<&'a [Rgb]>,
    ) -> Self {
        Self { xs, ys, colors }
    }

    /// Number of points staging will keep: the shortest supplied array.
    pub fn point_count(&self) -> Option<usize> {
        let n = self.xs?.len().min(self.ys?.len());
        Some(self.colors.map_or(n, |c| n.min(c.len())))
    }
}

/// Stage a series into a vertex buffer.
///
/// Length mismatches are never an error: the result holds
/// `min(len(xs), len(ys), len(colors))` points, in input order.
pub fn build(series: Series<'_>) -> Result<VertexBuffer, StageError> {
    let xs = series.xs.ok_or(StageError::MissingCoordinates(Axis::X))?;
    let ys = series.ys.ok_or(StageError::MissingCoordinates(Axis::Y))?;
    let vertices = match series.colors {
        Some(colors) => xs
            .iter()
            .zip(ys)
            .zip(colors)
            .map(|((&x, &y), &c)| Vertex {
                x,
                y,
                color: Some(c),
            })
            .collect(),
        None => xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| Vertex { x, y, color: None })
            .collect(),
    };
    Ok(VertexBuffer { vertices })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn absent_arrays_are_rejected() {
        let xs = [1.0, 2.0];
        assert_eq!(
            build(Series::from_parts(None, Some(&xs), None)),
            Err(StageError::MissingCoordinates(Axis::X))
        );
        assert_eq!(
            build(Series::from_parts(Some(&xs), None, None)),
            Err(StageError::MissingCoordinates(Axis::Y))
        );
    }

    #[test]
    fn truncates_to_shortest_coordinate_array() {
        let buf = build(Series::new(&[0.0, 1.0], &[0.0, 1.0, 0.0])).unwrap();
        assert_eq!(
            buf.positions().collect::<Vec<_>>(),
            vec![(0.0, 0.0), (1.0, 1.0)]
        );
        assert!(buf.iter().all(|v| v.color.is_none()));
    }

    #[test]
    fn colors_bound_the_length_too() {
        let colors = [Rgb::from_hex(0xff0000)];
        let buf = build(Series::new(&[0.0, 1.0, 2.0], &[3.0, 4.0, 5.0]).with_colors(&colors))
            .unwrap();
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.as_slice()[0].color, Some(Rgb::from_hex(0xff0000)));
    }

    #[test]
    fn longer_colors_are_ignored_past_coordinates() {
        let colors = [Rgb::BLACK, Rgb::WHITE, Rgb::BLACK];
        let buf = build(Series::new(&[0.0, 1.0], &[0.0, 1.0]).with_colors(&colors)).unwrap();
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.as_slice()[1].color, Some(Rgb::WHITE));
    }

    #[test]
    fn empty_arrays_make_an_empty_buffer() {
        let buf = build(Series::new(&[], &[])).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn point_count_matches_build() {
        let s = Series::new(&[0.0; 5], &[0.0; 3]);
        assert_eq!(s.point_count(), Some(3));
        assert_eq!(Series::from_parts(None, None, None).point_count(), None);
    }
}
