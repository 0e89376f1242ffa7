// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory [`Surface`] for tests and windowless runs.
//!
//! The surface records every presented frame and serves scripted input; a
//! cloneable [`HeadlessHandle`] observes and drives it from another thread.

use crate::surface::{Frame, InputEvent, Surface, SurfaceError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Shared {
    // (polls left before delivery, event)
    pending: VecDeque<(usize, InputEvent)>,
    frames: Vec<(Instant, Frame)>,
    fail_next: Option<SurfaceError>,
    polls: usize,
    releases: usize,
    after_release: usize,
}

/// Surface that draws nowhere.
#[derive(Debug)]
pub struct HeadlessSurface {
    shared: Arc<Mutex<Shared>>,
}

/// Observer/driver for a [`HeadlessSurface`].
#[derive(Debug, Clone)]
pub struct HeadlessHandle {
    shared: Arc<Mutex<Shared>>,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

impl HeadlessSurface {
    /// A surface plus the handle that observes it.
    pub fn new() -> (Self, HeadlessHandle) {
        let shared = Arc::new(Mutex::new(Shared::default()));
        (
            Self {
                shared: Arc::clone(&shared),
            },
            HeadlessHandle { shared },
        )
    }
}

impl Surface for HeadlessSurface {
    fn poll_events(&mut self, timeout: Duration, out: &mut Vec<InputEvent>) {
        let before = out.len();
        {
            let mut s = lock(&self.shared);
            if s.releases > 0 {
                s.after_release += 1;
            }
            s.polls += 1;
            let mut keep = VecDeque::with_capacity(s.pending.len());
            while let Some((left, ev)) = s.pending.pop_front() {
                if left <= 1 {
                    out.push(ev);
                } else {
                    keep.push_back((left - 1, ev));
                }
            }
            s.pending = keep;
        }
        if out.len() == before && !timeout.is_zero() {
            std::thread::sleep(timeout);
        }
    }

    fn present(&mut self, frame: &Frame) -> Result<(), SurfaceError> {
        let mut s = lock(&self.shared);
        if s.releases > 0 {
            s.after_release += 1;
        }
        if let Some(err) = s.fail_next.take() {
            return Err(err);
        }
        s.frames.push((Instant::now(), frame.clone()));
        Ok(())
    }

    fn release(&mut self) {
        lock(&self.shared).releases += 1;
    }
}

impl HeadlessHandle {
    /// Deliver `event` on the next poll.
    pub fn push_event(&self, event: InputEvent) {
        self.push_event_after(event, 1);
    }

    /// Deliver `event` on the `polls`-th poll from now (`0` behaves like `1`).
    pub fn push_event_after(&self, event: InputEvent, polls: usize) {
        lock(&self.shared).pending.push_back((polls, event));
    }

    /// Make the next `present` fail with `err`.
    pub fn fail_next_present(&self, err: SurfaceError) {
        lock(&self.shared).fail_next = Some(err);
    }

    /// Frames presented so far, oldest first.
    pub fn frames(&self) -> Vec<Frame> {
        lock(&self.shared)
            .frames
            .iter()
            .map(|(_, f)| f.clone())
            .collect()
    }

    /// Most recent frame.
    pub fn last_frame(&self) -> Option<Frame> {
        lock(&self.shared).frames.last().map(|(_, f)| f.clone())
    }

    /// Number of frames presented.
    pub fn frame_count(&self) -> usize {
        lock(&self.shared).frames.len()
    }

    /// When each frame was presented.
    pub fn presented_at(&self) -> Vec<Instant> {
        lock(&self.shared).frames.iter().map(|(t, _)| *t).collect()
    }

    /// Number of `poll_events` calls.
    pub fn poll_count(&self) -> usize {
        lock(&self.shared).polls
    }

    /// Number of `release` calls (should never exceed one).
    pub fn release_count(&self) -> usize {
        lock(&self.shared).releases
    }

    /// Surface calls made after release (should stay zero).
    pub fn calls_after_release(&self) -> usize {
        lock(&self.shared).after_release
    }
}
