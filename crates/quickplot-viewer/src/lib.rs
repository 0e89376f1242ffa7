// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! quickplot-viewer: winit + wgpu windows for quickplot live plots.
//!
//! [`open`] drives the plot from the calling thread: every update services
//! the window, so a tight numeric loop keeps the window responsive.
//! [`spawn`] moves the window onto a render thread instead, which platforms
//! that pin windowing to the main thread (macOS) do not support.
//!
//! ```no_run
//! use quickplot_core::{Series, UpdateStatus};
//!
//! let mut plot = quickplot_viewer::open("sine")?;
//! let xs: Vec<f64> = (0..256).map(|i| f64::from(i) / 16.0).collect();
//! let ys: Vec<f64> = xs.iter().map(|x| x.sin()).collect();
//! while plot.update_wait(Series::new(&xs, &ys)) == UpdateStatus::Ok {}
//! # Ok::<(), quickplot_core::PlotError>(())
//! ```

mod backend;
mod gpu;
mod input;
mod overlay;
mod render;
mod surface;
mod viewport;

pub use input::{hotkey, map_window_event};
pub use surface::WinitSurface;

use quickplot_core::{Cooperative, Plot, PlotDefaults, PlotError, RenderThread};
use tracing::instrument;

/// Plot driven from the thread that opened it.
pub type ViewerPlot = Plot<Cooperative<WinitSurface>>;
/// Plot whose window lives on its own render thread.
pub type ThreadedPlot = Plot<RenderThread>;

/// Open a plot window using the user's saved defaults.
pub fn open(title: &str) -> Result<ViewerPlot, PlotError> {
    open_with(title, &quickplot_config_fs::user_defaults())
}

/// Open a plot window with explicit defaults.
#[instrument(skip(defaults))]
pub fn open_with(title: &str, defaults: &PlotDefaults) -> Result<ViewerPlot, PlotError> {
    let surface = WinitSurface::open(title, defaults)?;
    Ok(Plot::new(surface, title, defaults))
}

/// Open a plot window on a render thread using the user's saved defaults.
pub fn spawn(title: &str) -> Result<ThreadedPlot, PlotError> {
    spawn_with(title, &quickplot_config_fs::user_defaults())
}

/// Open a plot window on a render thread with explicit defaults.
///
/// A process gets one window thread: once any plot has opened a window,
/// opening one from another thread fails with
/// [`quickplot_core::SurfaceError::Unsupported`].
pub fn spawn_with(title: &str, defaults: &PlotDefaults) -> Result<ThreadedPlot, PlotError> {
    let window_title = title.to_owned();
    let window_defaults = defaults.clone();
    Plot::spawn(title, defaults, move || {
        WinitSurface::open_any_thread(&window_title, &window_defaults)
    })
}
