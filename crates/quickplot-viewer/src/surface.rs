// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! [`Surface`] implementation over a winit window and a wgpu swapchain.

use crate::backend::{self, Backend};
use egui_winit::winit::window::WindowId;
use quickplot_core::{Frame, InputEvent, PlotDefaults, Surface, SurfaceError};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// One plot window. Lives on the thread that opened it.
pub struct WinitSurface {
    backend: Rc<RefCell<Backend>>,
    window: WindowId,
    released: bool,
}

impl WinitSurface {
    /// Open a window on the current thread, which must be the main thread
    /// on platforms that require it.
    pub fn open(title: &str, defaults: &PlotDefaults) -> Result<Self, SurfaceError> {
        Self::open_on(title, defaults, false)
    }

    /// Open a window from a non-main thread where the platform allows it
    /// (X11/Wayland and Windows).
    pub fn open_any_thread(title: &str, defaults: &PlotDefaults) -> Result<Self, SurfaceError> {
        Self::open_on(title, defaults, true)
    }

    fn open_on(title: &str, defaults: &PlotDefaults, any_thread: bool) -> Result<Self, SurfaceError> {
        let backend = backend::current(any_thread)?;
        let window = backend.borrow_mut().open_window(title, defaults.window)?;
        Ok(Self {
            backend,
            window,
            released: false,
        })
    }
}

impl Surface for WinitSurface {
    fn poll_events(&mut self, timeout: Duration, out: &mut Vec<InputEvent>) {
        if self.released {
            return;
        }
        let mut backend = self.backend.borrow_mut();
        backend.pump(timeout);
        backend.drain_events(self.window, out);
    }

    fn present(&mut self, frame: &Frame) -> Result<(), SurfaceError> {
        if self.released {
            return Err(SurfaceError::Lost);
        }
        self.backend.borrow_mut().present(self.window, frame)
    }

    fn release(&mut self) {
        if std::mem::replace(&mut self.released, true) {
            return;
        }
        let mut backend = self.backend.borrow_mut();
        backend.close_window(self.window);
        // let the platform process the destroy before we go quiet
        backend.pump(Duration::ZERO);
    }
}

impl Drop for WinitSurface {
    fn drop(&mut self) {
        self.release();
    }
}
