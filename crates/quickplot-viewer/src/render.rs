// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Render helper: uploads a composed frame and draws it plus the overlay.

use crate::{
    gpu::{Globals, Gpu, GpuVertex},
    viewport::Viewport,
};
use egui_wgpu::wgpu;
use quickplot_core::{Frame, Rgb, SurfaceError, Topology};

/// Markers are instanced quads of two triangles.
const QUAD_VERTICES: u32 = 6;

/// Draw and present one frame into the viewport's window.
pub fn draw(vp: &mut Viewport, frame: &Frame) -> Result<(), SurfaceError> {
    let Viewport {
        window,
        gpu,
        overlay,
        ..
    } = vp;

    let point_size = match frame.topology {
        Topology::Points { size_px } => size_px,
        Topology::LineStrip => 1.0,
    };
    gpu.queue.write_buffer(
        &gpu.globals_buf,
        0,
        bytemuck::bytes_of(&globals(gpu, point_size)),
    );

    let srgb = gpu.srgb_target();
    let points: Vec<GpuVertex> = frame
        .points
        .iter()
        .map(|p| GpuVertex {
            pos: p.pos,
            color: rgba(p.color, frame.alpha, srgb),
        })
        .collect();
    let grid: Vec<GpuVertex> = frame
        .grid
        .iter()
        .flat_map(|seg| {
            let color = rgba(seg.color, 1.0, srgb);
            [
                GpuVertex {
                    pos: seg.from,
                    color,
                },
                GpuVertex { pos: seg.to, color },
            ]
        })
        .collect();
    let point_count = draw_count(points.len())?;
    let grid_count = draw_count(grid.len())?;

    match frame.topology {
        Topology::Points { .. } => gpu.points.write(&gpu.device, &gpu.queue, &points),
        Topology::LineStrip => gpu.polyline.write(&gpu.device, &gpu.queue, &points),
    }
    gpu.grid.write(&gpu.device, &gpu.queue, &grid);

    let target = acquire(gpu)?;
    let view = target
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("plot-encoder"),
        });
    {
        let [r, g, b, _] = rgba(frame.background, 1.0, srgb);
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("plot"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: f64::from(r),
                        g: f64::from(g),
                        b: f64::from(b),
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        rpass.set_bind_group(0, &gpu.bind_group, &[]);

        // grid sits under the data
        if grid_count > 0 {
            rpass.set_pipeline(&gpu.pipelines.grid);
            rpass.set_vertex_buffer(0, gpu.grid.buf.slice(..));
            rpass.draw(0..grid_count, 0..1);
        }
        match frame.topology {
            Topology::Points { .. } if point_count > 0 => {
                rpass.set_pipeline(&gpu.pipelines.points);
                rpass.set_vertex_buffer(0, gpu.points.buf.slice(..));
                rpass.draw(0..QUAD_VERTICES, 0..point_count);
            }
            Topology::LineStrip if point_count > 1 => {
                rpass.set_pipeline(&gpu.pipelines.polyline);
                rpass.set_vertex_buffer(0, gpu.polyline.buf.slice(..));
                rpass.draw(0..point_count, 0..1);
            }
            _ => {}
        }
    }
    let cmd_main = encoder.finish();

    let ui = overlay.run(
        window,
        [gpu.config.width, gpu.config.height],
        frame.show_help,
    );
    let cmds_ui = overlay.paint(&gpu.device, &gpu.queue, &view, ui);

    gpu.queue
        .submit(std::iter::once(cmd_main).chain(cmds_ui));
    window.pre_present_notify();
    target.present();
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn globals(gpu: &Gpu, point_size: f32) -> Globals {
    Globals {
        viewport: [gpu.config.width as f32, gpu.config.height as f32],
        point_size,
        pad: 0.0,
    }
}

/// Color as written to the target: linearised for sRGB swapchains, which
/// re-encode on store.
fn rgba(color: Rgb, alpha: f32, srgb_target: bool) -> [f32; 4] {
    let [r, g, b] = if srgb_target {
        color.to_linear()
    } else {
        color.to_unit()
    };
    [r, g, b, alpha]
}

fn draw_count(len: usize) -> Result<u32, SurfaceError> {
    u32::try_from(len).map_err(|_| SurfaceError::Backend(format!("{len} vertices exceed a draw")))
}

/// Acquire the next swapchain image, reconfiguring once on a stale surface.
fn acquire(gpu: &Gpu) -> Result<wgpu::SurfaceTexture, SurfaceError> {
    match gpu.surface.get_current_texture() {
        Ok(texture) => Ok(texture),
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            gpu.reconfigure();
            gpu.surface
                .get_current_texture()
                .map_err(map_surface_error)
        }
        Err(err) => Err(map_surface_error(err)),
    }
}

fn map_surface_error(err: wgpu::SurfaceError) -> SurfaceError {
    match err {
        wgpu::SurfaceError::OutOfMemory => SurfaceError::OutOfMemory,
        wgpu::SurfaceError::Lost => SurfaceError::Lost,
        other => SurfaceError::Backend(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn colors_linearise_only_for_srgb_targets() {
        let grey = Rgb::new(128, 128, 128);
        let unit = rgba(grey, 0.5, false);
        assert_relative_eq!(unit[0], 128.0 / 255.0, epsilon = 1e-6);
        assert_relative_eq!(unit[3], 0.5);
        let linear = rgba(grey, 0.5, true);
        assert!(linear[0] < unit[0]);
        assert_relative_eq!(linear[0], 0.2158, epsilon = 1e-3);
    }

    #[test]
    fn surface_errors_map_by_severity() {
        assert!(map_surface_error(wgpu::SurfaceError::OutOfMemory).is_fatal());
        assert_eq!(
            map_surface_error(wgpu::SurfaceError::Lost),
            SurfaceError::Lost
        );
        assert!(!map_surface_error(wgpu::SurfaceError::Timeout).is_fatal());
    }

    #[test]
    fn draw_counts_fit_u32() {
        assert_eq!(draw_count(12).unwrap(), 12);
    }
}
