// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Input handling: map winit window events onto plot input events.

use egui_winit::winit::{
    event::{ElementState, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};
use quickplot_core::InputEvent;

/// Hotkey binding for a physical key, if any.
pub fn hotkey(code: KeyCode) -> Option<InputEvent> {
    match code {
        KeyCode::KeyG => Some(InputEvent::ToggleGrid),
        KeyCode::KeyH => Some(InputEvent::ToggleHelp),
        KeyCode::Escape | KeyCode::KeyQ => Some(InputEvent::CloseRequested),
        _ => None,
    }
}

/// Plot-relevant meaning of a window event. Key repeats are ignored so a
/// held `G` does not strobe the grid.
pub fn map_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::CloseRequested => Some(InputEvent::CloseRequested),
        WindowEvent::Resized(size) => Some(InputEvent::Resized {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::KeyboardInput { event, .. }
            if event.state == ElementState::Pressed && !event.repeat =>
        {
            match event.physical_key {
                PhysicalKey::Code(code) => hotkey(code),
                PhysicalKey::Unidentified(_) => None,
            }
        }
        _ => None,
    }
}
