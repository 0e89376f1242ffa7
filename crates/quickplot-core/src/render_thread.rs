// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Dedicated render thread driver.
//!
//! The thread builds the surface itself (window systems often bind a surface
//! to its creating thread), then services input every [`POLL_INTERVAL`] and
//! executes draw commands sent over a channel. Whatever ends the thread,
//! the plot ends up closed.

use crate::error::PlotError;
use crate::render_loop::RenderLoop;
use crate::scheduler::{FrameDriver, POLL_INTERVAL};
use crate::state::PlotState;
use crate::surface::{Surface, SurfaceError};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// How long a caller waits for the render thread to acknowledge a draw.
///
/// A draw still unacknowledged at the deadline is left in flight and
/// counted as delivered unless the plot has closed meanwhile; the render
/// thread presents it when its surface returns.
pub const DRAW_ACK_TIMEOUT: Duration = Duration::from_secs(1);

enum Command {
    Draw { ack: Sender<bool> },
    Shutdown,
}

struct CloseOnExit(Arc<PlotState>);

impl Drop for CloseOnExit {
    fn drop(&mut self) {
        self.0.mark_closed();
    }
}

/// Driver whose render loop lives on its own thread.
pub struct RenderThread {
    state: Arc<PlotState>,
    commands: Sender<Command>,
    handle: Option<JoinHandle<()>>,
}

impl RenderThread {
    /// Start the thread and build the surface there with `factory`.
    ///
    /// Returns once the surface exists; a factory failure is returned as
    /// [`PlotError::Surface`].
    pub fn spawn<S, F>(state: Arc<PlotState>, factory: F) -> Result<Self, PlotError>
    where
        S: Surface + 'static,
        F: FnOnce() -> Result<S, SurfaceError> + Send + 'static,
    {
        let (commands, inbox) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), SurfaceError>>();
        let thread_state = Arc::clone(&state);
        let handle = thread::Builder::new()
            .name(format!("quickplot-{}", state.id().value()))
            .spawn(move || {
                let _closer = CloseOnExit(Arc::clone(&thread_state));
                let surface = match factory() {
                    Ok(surface) => surface,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                drop(ready_tx);
                serve(RenderLoop::new(surface, thread_state), &inbox);
            })
            .map_err(|err| PlotError::Surface(SurfaceError::Backend(err.to_string())))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                state,
                commands,
                handle: Some(handle),
            }),
            Ok(Err(err)) => {
                let _ = handle.join();
                Err(PlotError::Surface(err))
            }
            Err(_) => {
                let _ = handle.join();
                Err(PlotError::RenderThreadLost)
            }
        }
    }
}

fn serve<S: Surface>(mut render: RenderLoop<S>, inbox: &Receiver<Command>) {
    loop {
        if render.process_events(Duration::ZERO) {
            render.repaint();
        }
        if render.state().is_closed() {
            break;
        }
        match inbox.recv_timeout(POLL_INTERVAL) {
            Ok(Command::Draw { ack }) => {
                let drawn = render.redraw();
                let _ = ack.send(drawn);
            }
            Ok(Command::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }
    debug!(plot = %render.state().id(), "render thread exiting");
}

impl FrameDriver for RenderThread {
    fn state(&self) -> &Arc<PlotState> {
        &self.state
    }

    fn idle(&mut self, timeout: Duration) {
        if !timeout.is_zero() {
            thread::sleep(timeout);
        }
    }

    /// Hand a draw to the render thread and wait up to
    /// [`DRAW_ACK_TIMEOUT`] for it. A late ack is not an error.
    fn draw_now(&mut self) -> bool {
        if self.state.is_closed() {
            return false;
        }
        let (ack, done) = mpsc::channel();
        if self.commands.send(Command::Draw { ack }).is_err() {
            return false;
        }
        match done.recv_timeout(DRAW_ACK_TIMEOUT) {
            Ok(drawn) => drawn,
            Err(RecvTimeoutError::Timeout) => {
                warn!(plot = %self.state.id(), "render thread did not acknowledge draw");
                !self.state.is_closed()
            }
            Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let _ = self.commands.send(Command::Shutdown);
        if handle.join().is_err() {
            warn!(plot = %self.state.id(), "render thread panicked");
        }
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}
