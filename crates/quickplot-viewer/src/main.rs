// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! quickplot-demo: animated sine wave driven through the live plot API.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use quickplot_core::{FrameDriver, Plot, Rgb, Series, UpdateStatus};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Draw only when a frame is due; skip the rest.
    IfReady,
    /// Block until a frame is due, then draw.
    Wait,
    /// Draw every update regardless of the frame clock.
    Immediate,
}

#[derive(Parser, Debug)]
#[command(name = "quickplot-demo", about = "Animated sine wave in a live plot window")]
struct Args {
    /// Number of points per frame.
    #[arg(long, default_value_t = 2000)]
    points: u32,
    /// Target framerate; 0 or less uncaps.
    #[arg(long, default_value_t = 60.0)]
    framerate: f64,
    /// Draw a polyline instead of markers.
    #[arg(long)]
    connected: bool,
    /// Update policy for each frame.
    #[arg(long, value_enum, default_value_t = Mode::Wait)]
    mode: Mode,
    /// Run the window on its own render thread.
    #[arg(long)]
    threaded: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();
    let args = Args::parse();
    if args.threaded {
        animate(quickplot_viewer::spawn("quickplot demo")?, &args)
    } else {
        animate(quickplot_viewer::open("quickplot demo")?, &args)
    }
}

fn animate<D: FrameDriver>(mut plot: Plot<D>, args: &Args) -> Result<()> {
    plot.set_framerate(args.framerate);
    plot.set_connected(args.connected);
    plot.set_bounds(0.0, std::f64::consts::TAU, -1.5, 1.5)?;
    plot.set_grid_x(0.0, std::f64::consts::FRAC_PI_2, Rgb::from_hex(0x303030));
    plot.set_grid_y(0.0, 0.5, Rgb::from_hex(0x303030));
    plot.set_point_size(3.0)?;

    let n = args.points.max(2);
    let xs: Vec<f64> = (0..n)
        .map(|i| std::f64::consts::TAU * f64::from(i) / f64::from(n - 1))
        .collect();
    let colors: Vec<Rgb> = (0..n).map(|i| hue(f64::from(i) / f64::from(n))).collect();
    let mut ys = vec![0.0; xs.len()];

    let start = Instant::now();
    let (mut drawn, mut skipped) = (0_u64, 0_u64);
    loop {
        let t = start.elapsed().as_secs_f64();
        for (y, x) in ys.iter_mut().zip(&xs) {
            *y = (x * 3.0 + t * 2.0).sin() * (t * 0.7).cos();
        }
        let series = Series::new(&xs, &ys).with_colors(&colors);
        let status = match args.mode {
            Mode::IfReady => plot.update_if_ready(series),
            Mode::Wait => plot.update_wait(series),
            Mode::Immediate => plot.update(series),
        };
        match status {
            UpdateStatus::Ok => drawn += 1,
            UpdateStatus::NotReady => skipped += 1,
            UpdateStatus::Closed => break,
            UpdateStatus::Rejected => anyhow::bail!("plot rejected the demo series"),
        }
    }
    let secs = start.elapsed().as_secs_f64();
    #[allow(clippy::cast_precision_loss)]
    let fps = drawn as f64 / secs.max(f64::EPSILON);
    info!(drawn, skipped, fps = (fps * 10.0).round() / 10.0, "plot closed");
    plot.delete();
    Ok(())
}

/// Fully saturated color at `h` turns around the hue wheel.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn hue(h: f64) -> Rgb {
    let channel = |offset: f64| {
        let v = ((h + offset) * std::f64::consts::TAU).cos().mul_add(0.5, 0.5);
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };
    Rgb::new(channel(0.0), channel(2.0 / 3.0), channel(1.0 / 3.0))
}
