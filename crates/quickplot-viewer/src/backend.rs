// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-thread winit event loop shared by every plot window on that thread.
//!
//! winit allows one event loop per process and ties it to the thread that
//! built it. Plots on that thread share it: each [`crate::WinitSurface`]
//! pumps the loop when polled and reads back only its own window's input.

use crate::{gpu::Gpu, input, overlay::Overlay, render, viewport::Viewport};
use anyhow::{Context, Result};
use egui_winit::winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{WindowAttributes, WindowId},
};
use egui_wgpu::wgpu;
use quickplot_core::{Frame, InputEvent, SurfaceError, WindowPrefs, POLL_INTERVAL};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long `open` waits for the platform to hand back a window.
const OPEN_TIMEOUT: Duration = Duration::from_secs(5);

thread_local! {
    static BACKEND: RefCell<Option<Rc<RefCell<Backend>>>> = const { RefCell::new(None) };
}

/// This thread's backend, built on first use.
pub fn current(any_thread: bool) -> Result<Rc<RefCell<Backend>>, SurfaceError> {
    BACKEND.with(|slot| {
        let mut slot = slot.borrow_mut();
        if let Some(backend) = slot.as_ref() {
            return Ok(Rc::clone(backend));
        }
        let event_loop = build_event_loop(any_thread)
            .map_err(|err| SurfaceError::Unsupported(format!("{err:#}")))?;
        info!(any_thread, "window backend started");
        let backend = Rc::new(RefCell::new(Backend {
            event_loop,
            hub: Hub::new(),
        }));
        *slot = Some(Rc::clone(&backend));
        Ok(backend)
    })
}

fn build_event_loop(any_thread: bool) -> Result<EventLoop<()>> {
    let mut builder = EventLoop::builder();
    #[cfg(target_os = "linux")]
    if any_thread {
        use egui_winit::winit::platform::x11::EventLoopBuilderExtX11;
        builder.with_any_thread(true);
    }
    #[cfg(target_os = "windows")]
    if any_thread {
        use egui_winit::winit::platform::windows::EventLoopBuilderExtWindows;
        builder.with_any_thread(true);
    }
    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    let _ = any_thread;
    builder.build().context("create event loop")
}

pub struct Backend {
    event_loop: EventLoop<()>,
    hub: Hub,
}

impl Backend {
    /// Ask for a window and pump until the platform creates it.
    pub fn open_window(&mut self, title: &str, prefs: WindowPrefs) -> Result<WindowId, SurfaceError> {
        let ticket = self.hub.request(title, prefs);
        let deadline = Instant::now() + OPEN_TIMEOUT;
        loop {
            if let Some(created) = self.hub.created.remove(&ticket) {
                return created.map_err(SurfaceError::Backend);
            }
            let now = Instant::now();
            if now >= deadline {
                self.hub.pending.retain(|req| req.ticket != ticket);
                return Err(SurfaceError::Backend(format!(
                    "window '{title}' not created within {OPEN_TIMEOUT:?}"
                )));
            }
            self.pump((deadline - now).min(POLL_INTERVAL));
        }
    }

    /// Run the event loop for at most `timeout`.
    pub fn pump(&mut self, timeout: Duration) {
        let Backend { event_loop, hub } = self;
        if let PumpStatus::Exit(code) = event_loop.pump_app_events(Some(timeout), hub) {
            warn!(code, "event loop exited");
        }
    }

    /// Move `window`'s queued input into `out`.
    pub fn drain_events(&mut self, window: WindowId, out: &mut Vec<InputEvent>) {
        if let Some(vp) = self.hub.windows.get_mut(&window) {
            out.append(&mut vp.events);
        }
    }

    pub fn present(&mut self, window: WindowId, frame: &Frame) -> Result<(), SurfaceError> {
        let vp = self
            .hub
            .windows
            .get_mut(&window)
            .ok_or(SurfaceError::Lost)?;
        render::draw(vp, frame)
    }

    /// Drop a window and its GPU resources.
    pub fn close_window(&mut self, window: WindowId) {
        if self.hub.windows.remove(&window).is_some() {
            debug!(?window, "window closed");
        }
    }
}

struct WindowRequest {
    ticket: u64,
    title: String,
    prefs: WindowPrefs,
}

/// Event-loop handler owning every window on this thread.
struct Hub {
    instance: wgpu::Instance,
    windows: HashMap<WindowId, Viewport>,
    pending: Vec<WindowRequest>,
    created: HashMap<u64, Result<WindowId, String>>,
    next_ticket: u64,
}

impl Hub {
    fn new() -> Self {
        Self {
            instance: wgpu::Instance::new(&wgpu::InstanceDescriptor::default()),
            windows: HashMap::new(),
            pending: Vec::new(),
            created: HashMap::new(),
            next_ticket: 0,
        }
    }

    fn request(&mut self, title: &str, prefs: WindowPrefs) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending.push(WindowRequest {
            ticket,
            title: title.to_owned(),
            prefs,
        });
        ticket
    }

    fn create_pending(&mut self, event_loop: &ActiveEventLoop) {
        for req in std::mem::take(&mut self.pending) {
            let created = self
                .create_window(event_loop, &req)
                .map_err(|err| format!("{err:#}"));
            if let Err(err) = &created {
                warn!(title = %req.title, %err, "window creation failed");
            }
            self.created.insert(req.ticket, created);
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop, req: &WindowRequest) -> Result<WindowId> {
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(req.title.as_str())
                    .with_inner_size(LogicalSize::new(req.prefs.width, req.prefs.height))
                    .with_visible(true),
            )
            .context("create window")?;
        let window = Arc::new(window);
        let gpu = Gpu::new(&self.instance, Arc::clone(&window))?;
        let overlay = Overlay::new(event_loop, &gpu.device, gpu.config.format);
        let id = window.id();
        self.windows.insert(
            id,
            Viewport {
                window,
                gpu,
                overlay,
                events: Vec::new(),
            },
        );
        debug!(?id, title = %req.title, "window created");
        Ok(id)
    }
}

impl ApplicationHandler for Hub {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(vp) = self.windows.get_mut(&window_id) else {
            return;
        };
        vp.overlay.on_window_event(&vp.window, &event);
        if let WindowEvent::Resized(size) = event {
            vp.gpu.resize(size);
        }
        if let Some(ev) = input::map_window_event(&event) {
            vp.events.push(ev);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.pending.is_empty() {
            self.create_pending(event_loop);
        }
    }
}
