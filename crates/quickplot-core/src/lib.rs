// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! quickplot-core: frame-paced live 2D plotting engine.
//!
//! A numeric loop hands (x, y, color) arrays to a [`Plot`]; the engine turns
//! them into a vertex buffer, swaps it in atomically and draws it through a
//! [`Surface`] backend, pacing draws against a monotonic [`FrameClock`].
//! The render loop runs either on the caller's thread ([`Cooperative`]) or
//! on its own ([`RenderThread`]); window close is the only cancellation
//! signal and is observed by every update call.
#![forbid(unsafe_code)]

/// Frame pacing against a monotonic clock.
pub mod clock;
/// sRGB colors.
pub mod color;
/// Config port and service for persisted defaults.
pub mod config;
/// Defaults applied to new plots.
pub mod defaults;
mod error;
pub mod headless;
pub mod plot;
pub mod render_loop;
pub mod render_thread;
pub mod scheduler;
/// Shared per-plot state.
pub mod state;
pub mod surface;
/// Vertex staging: caller arrays to drawable buffers.
pub mod vertex;
/// View bounds, grid lines and the data-to-device transform.
pub mod view;

pub use clock::FrameClock;
pub use color::Rgb;
pub use config::{ConfigError, ConfigService, ConfigStore, DefaultsPort, DEFAULTS_KEY};
pub use defaults::{PlotDefaults, WindowPrefs};
pub use error::PlotError;
pub use headless::{HeadlessHandle, HeadlessSurface};
pub use plot::Plot;
pub use render_loop::RenderLoop;
pub use render_thread::RenderThread;
pub use scheduler::{Cooperative, FrameDriver, UpdatePolicy, UpdateStatus, POLL_INTERVAL};
pub use state::{PlotConfig, PlotId, PlotState};
pub use surface::{
    Frame, GridSegment, InputEvent, PlotPoint, Surface, SurfaceError, Topology, HOTKEY_HELP,
};
pub use vertex::{build, Axis, Series, StageError, Vertex, VertexBuffer};
pub use view::{Bounds, GridLine, ViewTransform, MAX_GRID_LINES};
