// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! egui hotkey-help overlay.

use egui_wgpu::wgpu;
use egui_winit::winit::event::WindowEvent;
use egui_winit::winit::event_loop::ActiveEventLoop;
use egui_winit::winit::window::Window;
use egui_winit::State as EguiWinitState;
use quickplot_core::HOTKEY_HELP;

/// Per-window egui context, input state and renderer.
pub struct Overlay {
    ctx: egui::Context,
    state: EguiWinitState,
    renderer: egui_wgpu::Renderer,
}

/// Tessellated overlay output for one frame.
pub struct OverlayFrame {
    pub paint_jobs: Vec<egui::epaint::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub screen: egui_wgpu::ScreenDescriptor,
}

impl Overlay {
    pub fn new(
        event_loop: &ActiveEventLoop,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
    ) -> Self {
        let ctx = egui::Context::default();
        let state = EguiWinitState::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            event_loop,
            None,
            None,
            None,
        );
        let renderer =
            egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());
        Self {
            ctx,
            state,
            renderer,
        }
    }

    /// Feed a window event to egui. The overlay is static text painted with
    /// every plot frame, so egui's repaint request is not needed; hotkeys and
    /// resizes already repaint through [`quickplot_core::InputEvent`].
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) {
        let _ = self.state.on_window_event(window, event);
    }

    /// Run the UI for this frame.
    pub fn run(&mut self, window: &Window, size_px: [u32; 2], show_help: bool) -> OverlayFrame {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, |ctx| {
            if show_help {
                help_window(ctx);
            }
        });
        self.state
            .handle_platform_output(window, full_output.platform_output);
        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        OverlayFrame {
            paint_jobs,
            textures_delta: full_output.textures_delta,
            screen: egui_wgpu::ScreenDescriptor {
                size_in_pixels: size_px,
                pixels_per_point: full_output.pixels_per_point,
            },
        }
    }

    /// Record the overlay on top of `target`. Returns the encoder work egui
    /// needs submitted ahead of it.
    pub fn paint(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        frame: OverlayFrame,
    ) -> Vec<wgpu::CommandBuffer> {
        let OverlayFrame {
            paint_jobs,
            textures_delta,
            screen,
        } = frame;
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("overlay-encoder"),
        });
        for (id, delta) in &textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        let mut cmds =
            self.renderer
                .update_buffers(device, queue, &mut encoder, &paint_jobs, &screen);
        {
            let rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("overlay"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            let mut rpass = rpass.forget_lifetime();
            self.renderer.render(&mut rpass, &paint_jobs, &screen);
        }
        for id in &textures_delta.free {
            self.renderer.free_texture(id);
        }
        cmds.push(encoder.finish());
        cmds
    }
}

fn help_window(ctx: &egui::Context) {
    egui::Window::new("Hotkeys")
        .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            egui::Grid::new("hotkey_grid")
                .num_columns(2)
                .spacing([16.0, 4.0])
                .show(ui, |ui| {
                    for (key, action) in HOTKEY_HELP {
                        ui.monospace(*key);
                        ui.label(*action);
                        ui.end_row();
                    }
                });
        });
}
