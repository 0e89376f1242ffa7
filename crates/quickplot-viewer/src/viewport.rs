// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bundle of window + GPU + overlay state for a single plot window.

use crate::{gpu::Gpu, overlay::Overlay};
use egui_winit::winit::window::Window;
use quickplot_core::InputEvent;
use std::sync::Arc;

pub struct Viewport {
    pub window: Arc<Window>,
    pub gpu: Gpu,
    pub overlay: Overlay,
    /// Mapped input waiting for the plot's next poll.
    pub events: Vec<InputEvent>,
}
